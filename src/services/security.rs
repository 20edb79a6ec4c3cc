//! 安全能力服务 - 业务能力层
//!
//! 输入净化、输入校验和提交限流
//!
//! 限流器是显式持有、按需注入的组件，不是进程级全局单例，
//! 多实例部署时可以替换为基于分布式存储的实现

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

/// 纯文本净化：去除首尾空白并转义 HTML 敏感字符
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 邮箱净化：去空白 + 小写
pub fn sanitize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

/// 邮箱格式校验（含长度上限 254）
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && validator::validate_email(email)
}

/// 校验邮箱域名是否在允许范围内
pub fn email_domain_allowed(email: &str, pattern: &Regex) -> bool {
    pattern.is_match(email)
}

/// 文本长度校验（按字符计，去除首尾空白后）
pub fn is_valid_text(text: &str, min_len: usize, max_len: usize) -> bool {
    let len = text.trim().chars().count();
    len >= min_len && len <= max_len
}

/// 题号格式校验：纯字母数字，1..=50 位
pub fn is_valid_question_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 50 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 单个标识符的尝试窗口
#[derive(Debug)]
struct AttemptWindow {
    count: u32,
    reset_at: Instant,
}

/// 提交限流器
///
/// 职责：
/// - 按标识符统计窗口内的尝试次数
/// - 超过上限时拒绝，窗口过期后重新开窗
/// - 不出现 Question / Session
#[derive(Debug, Default)]
pub struct RateLimiter {
    attempts: Mutex<HashMap<String, AttemptWindow>>,
}

impl RateLimiter {
    /// 创建新的限流器
    pub fn new() -> Self {
        Self::default()
    }

    /// 判断标识符是否已被限流
    pub fn is_rate_limited(&self, identifier: &str, max_attempts: u32, window: Duration) -> bool {
        let now = Instant::now();
        let Ok(mut attempts) = self.attempts.lock() else {
            return false;
        };

        let entry = attempts
            .entry(identifier.to_string())
            .or_insert_with(|| AttemptWindow {
                count: 0,
                reset_at: now + window,
            });

        if now > entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + window;
        }

        if entry.count >= max_attempts {
            debug!("标识符 {} 已被限流", identifier);
            return true;
        }

        entry.count += 1;
        false
    }

    /// 清除标识符的限流状态
    pub fn reset(&self, identifier: &str) {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.remove(identifier);
        }
    }
}
