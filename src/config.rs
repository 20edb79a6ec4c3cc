/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库资源位置（http(s) URL 或本地 CSV 路径）
    pub bank_source: String,
    /// 作答文档所在集合名
    pub responses_collection: String,
    /// ILO 类别的期望顺序，类别不在列表中的题目会被丢弃
    ///
    /// 历史版本中存在 `IC/PD` 与 `IR/PR` 两种写法，这里做成可配置项
    pub ilo_order: Vec<String>,
    /// 允许登录的邮箱域名正则
    pub allowed_email_pattern: String,
    /// 答题提交限流：窗口内最大次数
    pub rate_limit_max_attempts: u32,
    /// 答题提交限流：窗口长度（秒）
    pub rate_limit_window_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_source: "data/legacy_questions.csv".to_string(),
            responses_collection: "responses".to_string(),
            ilo_order: ["CR", "IC", "PD", "SW", "IE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_email_pattern: r"(?i)@(minerva\.edu|uni\.minerva\.edu)$".to_string(),
            rate_limit_max_attempts: 30,
            rate_limit_window_secs: 60,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bank_source: std::env::var("BANK_SOURCE").unwrap_or(default.bank_source),
            responses_collection: std::env::var("RESPONSES_COLLECTION").unwrap_or(default.responses_collection),
            ilo_order: std::env::var("ILO_ORDER")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.ilo_order),
            allowed_email_pattern: std::env::var("ALLOWED_EMAIL_PATTERN").unwrap_or(default.allowed_email_pattern),
            rate_limit_max_attempts: std::env::var("RATE_LIMIT_MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.rate_limit_max_attempts),
            rate_limit_window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.rate_limit_window_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
