//! 会话编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：构建存储与限流器、拉取题库、抽样生成题目序列
//! 2. **登录引导**：校验机构邮箱并生成本次会话的用户身份
//! 3. **会话驱动**：逐题展示、读取作答、驱动 SurveyFlow
//! 4. **结果展示**：会话完成后调用 ResultResolver 并输出最终 vibe
//! 5. **全局统计**：输出会话统计信息

use std::sync::Arc;

use anyhow::Result;
use rand::thread_rng;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::MemoryStore;
use crate::models::identity::Identity;
use crate::models::question::QuestionRecord;
use crate::models::response::ResultSummary;
use crate::services::bank_service::QuestionBank;
use crate::services::resolver::{Resolution, ResultResolver};
use crate::services::sampler;
use crate::services::security::{self, RateLimiter};
use crate::utils::logging::truncate_text;
use crate::workflow::{SubmitOutcome, SurveyCtx, SurveyFlow};

/// 会话统计
#[derive(Debug, Default)]
struct SessionStats {
    answered: usize,
    rejected: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    store: MemoryStore,
    rate_limiter: Arc<RateLimiter>,
    questions: Vec<QuestionRecord>,
    email_pattern: Regex,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let email_pattern = Regex::new(&config.allowed_email_pattern)
            .map_err(|e| AppError::invalid_pattern(&config.allowed_email_pattern, e))?;

        // 拉取题库并抽样出本次会话的题目序列
        let bank = QuestionBank::new(&config);
        let records = bank.load().await;
        let questions = sampler::build_sequence(&records, &config.ilo_order, &mut thread_rng());
        info!("✓ 本次会话共 {} 道题目", questions.len());

        Ok(Self {
            config,
            store: MemoryStore::new(),
            rate_limiter: Arc::new(RateLimiter::new()),
            questions,
            email_pattern,
        })
    }

    /// 运行一次完整的作答会话
    pub async fn run(&self) -> Result<()> {
        if self.questions.is_empty() {
            warn!("⚠️ 题目序列为空（题库缺失或为空），会话结束");
            println!("Loading questions...");
            return Ok(());
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        // 登录引导
        let identity = self.sign_in(&mut lines).await?;
        info!("✓ 用户登录: {}", identity.email);

        // 逐题作答
        let flow = SurveyFlow::new(&self.config, self.store.clone(), self.rate_limiter.clone());
        let total = self.questions.len();
        let mut session_id: Option<String> = None;
        let mut stats = SessionStats::default();

        for (index, question) in self.questions.iter().enumerate() {
            let question_index = index + 1;
            let ctx = SurveyCtx::new(
                identity.clone(),
                question_index,
                total,
                question.ilo.clone(),
            );

            if self.config.verbose_logging {
                info!("{} 题干: {}", ctx, truncate_text(&question.question, 80));
            }

            // 写入失败或输入无效时停在本题，允许用户重试
            loop {
                print_question(question, question_index, total);
                let Some(input) = lines.next_line().await? else {
                    anyhow::bail!("输入流已关闭，会话中止");
                };

                let Some(answer_label) = pick_answer(question, &input) else {
                    println!("Please select a valid option (A-E).");
                    stats.rejected += 1;
                    continue;
                };

                match flow
                    .submit_answer(session_id.as_deref(), &ctx, question, answer_label)
                    .await
                {
                    Ok(SubmitOutcome::Recorded { session_id: id })
                    | Ok(SubmitOutcome::Completed { session_id: id }) => {
                        session_id = Some(id);
                        stats.answered += 1;
                        break;
                    }
                    Ok(SubmitOutcome::RateLimited) => {
                        println!("You're submitting answers too quickly. Please wait a moment.");
                        stats.rejected += 1;
                    }
                    Ok(SubmitOutcome::Rejected(reason)) => {
                        println!("{}", reason);
                        stats.rejected += 1;
                    }
                    Err(e) => {
                        warn!("作答写入失败: {}", e);
                        println!("Failed to save response. Please try again.");
                        stats.rejected += 1;
                    }
                }
            }
        }

        // 判定并展示结果
        let resolver = ResultResolver::new(self.store.clone(), &self.config.responses_collection);
        match resolver.resolve(&identity.user_id).await {
            Ok(Resolution::Summary(summary)) => print_final(&summary),
            Ok(Resolution::NoResponse) => println!("No response found."),
            Ok(Resolution::NoAnswers) => println!("No valid responses found."),
            Err(e) => {
                warn!("读取作答记录失败: {}", e);
                println!("Error retrieving responses.");
            }
        }

        log_session_complete(&stats, total);

        Ok(())
    }

    /// 登录引导：循环读取邮箱直到通过格式与域名校验
    async fn sign_in(&self, lines: &mut Lines<BufReader<Stdin>>) -> Result<Identity> {
        loop {
            println!("Enter your Minerva email:");
            let Some(input) = lines.next_line().await? else {
                anyhow::bail!("输入流已关闭，会话中止");
            };

            let email = security::sanitize_email(&input);
            if security::is_valid_email(&email)
                && security::email_domain_allowed(&email, &self.email_pattern)
            {
                // 身份标识由身份协作方提供，这里用随机 id 代替
                return Ok(Identity::new(Uuid::new_v4().to_string(), email));
            }

            println!("Please use a valid Minerva email address");
        }
    }
}

/// 选项输入解析：单个字母 A-E，映射为对应的分组标签
fn pick_answer<'a>(question: &'a QuestionRecord, input: &str) -> Option<&'a str> {
    let selection = input.trim();
    let mut chars = selection.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    let label = question.group(letter);
    if label.trim().is_empty() {
        None
    } else {
        Some(label)
    }
}

/// 展示一道题目
fn print_question(question: &QuestionRecord, index: usize, total: usize) {
    println!();
    println!("Question {} of {}", index, total);
    println!("{}", question.question);
    for choice in question.choices() {
        println!("  {}. {}", choice.letter, choice.text);
    }
    println!("Your answer (A-E):");
}

/// 展示最终结果
fn print_final(summary: &ResultSummary) {
    println!();
    println!("Congratulations!");
    println!("You've successfully completed the Minerva Identity Survey");
    println!("Your Minerva vibe is: {}", summary.minerva_vibe);
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 问卷会话模式");
    info!("📚 题库来源: {}", config.bank_source);
    info!("📋 类别顺序: {}", config.ilo_order.join(", "));
    info!("{}", "=".repeat(60));
}

fn log_session_complete(stats: &SessionStats, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 会话完成统计");
    info!("✅ 已作答: {}/{}", stats.answered, total);
    info!("❌ 无效提交: {}", stats.rejected);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_answer_maps_letter_to_label() {
        let question = QuestionRecord {
            ilo: "CR".to_string(),
            question: "Q?".to_string(),
            group_a: "Tower".to_string(),
            group_b: "Ocean".to_string(),
            ..Default::default()
        };

        assert_eq!(pick_answer(&question, "A"), Some("Tower"));
        assert_eq!(pick_answer(&question, " b "), Some("Ocean"));
        // 没有对应选项或多余输入都视为无效
        assert_eq!(pick_answer(&question, "C"), None);
        assert_eq!(pick_answer(&question, "AB"), None);
        assert_eq!(pick_answer(&question, ""), None);
    }
}
