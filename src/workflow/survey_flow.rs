//! 作答处理流程 - 流程层
//!
//! 核心职责：定义"一次作答"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验答案 → 2. 限流检查 → 3. 净化入库内容 → 4. 写入存储 → 5.（最后一题）标记完成

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::infrastructure::DocumentStore;
use crate::models::question::QuestionRecord;
use crate::services::recorder::ResponseRecorder;
use crate::services::security::{self, RateLimiter};
use crate::workflow::survey_ctx::SurveyCtx;

/// 单次作答的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 已记录，附（可能新建的）会话 id
    Recorded { session_id: String },
    /// 已记录且会话已标记完成
    Completed { session_id: String },
    /// 当前用户提交过于频繁
    RateLimited,
    /// 输入不合法，附用户可见的原因
    Rejected(String),
}

/// 作答处理流程
///
/// 职责：
/// - 编排一次作答的完整流程
/// - 不直接持有存储资源（通过 ResponseRecorder 使用）
/// - 只依赖业务能力（services）
pub struct SurveyFlow<S> {
    recorder: ResponseRecorder<S>,
    rate_limiter: Arc<RateLimiter>,
    max_attempts: u32,
    window: Duration,
}

impl<S: DocumentStore> SurveyFlow<S> {
    /// 创建新的作答处理流程
    pub fn new(config: &Config, store: S, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            recorder: ResponseRecorder::new(store, &config.responses_collection),
            rate_limiter,
            max_attempts: config.rate_limit_max_attempts,
            window: Duration::from_secs(config.rate_limit_window_secs),
        }
    }

    /// 处理一次作答
    ///
    /// 作答写入失败会原样向上传播，由调用方提示用户手动重试；
    /// 完成标记的写入失败只记日志
    pub async fn submit_answer(
        &self,
        session_id: Option<&str>,
        ctx: &SurveyCtx,
        question: &QuestionRecord,
        answer_label: &str,
    ) -> Result<SubmitOutcome, StoreError> {
        // 答案不能为空
        if answer_label.trim().is_empty() {
            return Ok(SubmitOutcome::Rejected(
                "Please select an answer before continuing.".to_string(),
            ));
        }

        // 限流检查（按用户维度）
        let limiter_key = format!("question-{}", ctx.identity.user_id);
        if self
            .rate_limiter
            .is_rate_limited(&limiter_key, self.max_attempts, self.window)
        {
            warn!("⚠️ {} 提交过于频繁", ctx);
            return Ok(SubmitOutcome::RateLimited);
        }

        // 净化入库内容
        let answer = security::sanitize_text(answer_label);
        let question_text = security::sanitize_text(&question.question);
        if answer.is_empty() || question_text.is_empty() {
            return Ok(SubmitOutcome::Rejected(
                "Invalid data detected. Please try again.".to_string(),
            ));
        }

        // 写入存储
        let session_id = self
            .recorder
            .record_answer(
                session_id,
                &ctx.identity,
                ctx.total_questions,
                ctx.question_index,
                &ctx.ilo,
                &answer,
                &question_text,
            )
            .await?;

        // 最后一题：单独一次写入标记完成
        if ctx.is_last() {
            if let Err(e) = self.recorder.mark_completed(&session_id).await {
                warn!("⚠️ 会话完成标记写入失败（忽略）: {}", e);
            } else {
                info!("✓ 会话 {} 已标记完成", session_id);
            }
            return Ok(SubmitOutcome::Completed { session_id });
        }

        Ok(SubmitOutcome::Recorded { session_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{DocumentStore, MemoryStore};
    use crate::models::identity::Identity;

    fn question(ilo: &str, text: &str, label: &str) -> QuestionRecord {
        QuestionRecord {
            ilo: ilo.to_string(),
            question: text.to_string(),
            group_a: label.to_string(),
            option_a: "First option".to_string(),
            ..Default::default()
        }
    }

    fn ctx(index: usize, total: usize, ilo: &str) -> SurveyCtx {
        SurveyCtx::new(
            Identity::new("u-1", "student@minerva.edu"),
            index,
            total,
            ilo.to_string(),
        )
    }

    fn flow(store: MemoryStore) -> SurveyFlow<MemoryStore> {
        SurveyFlow::new(&Config::default(), store, Arc::new(RateLimiter::new()))
    }

    #[tokio::test]
    async fn test_empty_answer_is_rejected_without_write() {
        let store = MemoryStore::new();
        let flow = flow(store.clone());
        let q = question("CR", "Q1", "Tower");

        let outcome = flow
            .submit_answer(None, &ctx(1, 2, "CR"), &q, "   ")
            .await
            .expect("流程应该成功");
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));

        let docs = store.query("responses", "userId", "u-1").await.expect("查询应该成功");
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_submission_is_refused() {
        let config = Config {
            rate_limit_max_attempts: 1,
            ..Config::default()
        };
        let flow = SurveyFlow::new(&config, MemoryStore::new(), Arc::new(RateLimiter::new()));
        let q = question("CR", "Q1", "Tower");

        let first = flow
            .submit_answer(None, &ctx(1, 3, "CR"), &q, "Tower")
            .await
            .expect("流程应该成功");
        let SubmitOutcome::Recorded { session_id } = first else {
            panic!("第一次提交应该被记录");
        };

        let second = flow
            .submit_answer(Some(&session_id), &ctx(2, 3, "CR"), &q, "Tower")
            .await
            .expect("流程应该成功");
        assert_eq!(second, SubmitOutcome::RateLimited);
    }

    #[tokio::test]
    async fn test_last_question_marks_session_complete() {
        let store = MemoryStore::new();
        let flow = flow(store.clone());
        let q1 = question("CR", "Q1", "Tower");
        let q2 = question("IC", "Q2", "Plaza");

        let first = flow
            .submit_answer(None, &ctx(1, 2, "CR"), &q1, "Tower")
            .await
            .expect("流程应该成功");
        let SubmitOutcome::Recorded { session_id } = first else {
            panic!("第一次提交应该被记录");
        };

        let last = flow
            .submit_answer(Some(&session_id), &ctx(2, 2, "IC"), &q2, "Plaza")
            .await
            .expect("流程应该成功");
        assert_eq!(
            last,
            SubmitOutcome::Completed {
                session_id: session_id.clone()
            }
        );

        let (_, doc) = store
            .query("responses", "userId", "u-1")
            .await
            .expect("查询应该成功")
            .remove(0);
        assert_eq!(doc["isCompleted"], true);
        assert_eq!(doc["q2_IC"]["answer"], "Plaza");
    }
}
