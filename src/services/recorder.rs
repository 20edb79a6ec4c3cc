//! 作答记录服务 - 业务能力层
//!
//! 只负责"把一次作答写入存储"能力，不关心流程

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::{json, Map, Value as JsonValue};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::infrastructure::DocumentStore;
use crate::models::identity::Identity;
use crate::models::response::{answer_key, AnswerEntry, ResponseSession};

/// 作答记录服务
///
/// 职责：
/// - 首次作答时新建会话文档并内嵌第一条作答
/// - 之后按 q{题号}_{ILO} 做顶层合并写入，同 key 重复提交为后写覆盖
/// - 每次写入都是一次持久化调用，失败原样向上传播，不自动重试
pub struct ResponseRecorder<S> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> ResponseRecorder<S> {
    /// 创建新的作答记录服务
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// 记录一次作答，返回（可能新建的）会话文档 id
    pub async fn record_answer(
        &self,
        session_id: Option<&str>,
        identity: &Identity,
        total_questions: usize,
        question_index: usize,
        ilo: &str,
        answer_label: &str,
        question_text: &str,
    ) -> Result<String, StoreError> {
        let now = Utc::now();
        let key = answer_key(question_index, ilo);
        let entry = AnswerEntry {
            answer: answer_label.to_string(),
            question: question_text.to_string(),
            question_index,
            ilo: ilo.to_string(),
            timestamp: now,
        };

        match session_id {
            None => {
                // 首次作答：新建会话文档
                let mut answers = IndexMap::new();
                answers.insert(key, entry);
                let session = ResponseSession {
                    user_id: identity.user_id.clone(),
                    user_email: identity.email.clone(),
                    started_at: now,
                    last_updated: now,
                    total_questions,
                    answers,
                };

                let id = self.store.create(&self.collection, to_document(&session)?).await?;
                info!("✓ 新建作答文档: {}", id);
                Ok(id)
            }
            Some(id) => {
                // 已有会话：合并写入本题作答并刷新更新时间
                let mut patch = Map::new();
                patch.insert(key, to_document(&entry)?);
                patch.insert("lastUpdated".to_string(), to_document(&now)?);

                self.store
                    .update(&self.collection, id, JsonValue::Object(patch))
                    .await?;
                debug!("作答已合并到文档 {} (题目 {})", id, question_index);
                Ok(id.to_string())
            }
        }
    }

    /// 标记会话完成
    ///
    /// 在最后一题的作答写入之后单独写一次
    pub async fn mark_completed(&self, session_id: &str) -> Result<(), StoreError> {
        let patch = json!({
            "isCompleted": true,
            "completedAt": Utc::now(),
        });
        self.store.update(&self.collection, session_id, patch).await
    }
}

/// 序列化为文档值
fn to_document<T: serde::Serialize>(value: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::WriteFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    fn identity() -> Identity {
        Identity::new("u-1", "student@minerva.edu")
    }

    fn recorder() -> (MemoryStore, ResponseRecorder<MemoryStore>) {
        let store = MemoryStore::new();
        (store.clone(), ResponseRecorder::new(store, "responses"))
    }

    async fn read_session(store: &MemoryStore) -> JsonValue {
        store
            .query("responses", "userId", "u-1")
            .await
            .expect("查询应该成功")
            .remove(0)
            .1
    }

    #[tokio::test]
    async fn test_first_answer_creates_session_document() {
        let (store, recorder) = recorder();

        let id = recorder
            .record_answer(None, &identity(), 8, 1, "CR", "Tower", "How do you decide?")
            .await
            .expect("首次作答应该成功");
        assert!(!id.is_empty());

        let doc = read_session(&store).await;
        assert_eq!(doc["userId"], "u-1");
        assert_eq!(doc["userEmail"], "student@minerva.edu");
        assert_eq!(doc["totalQuestions"], 8);
        assert_eq!(doc["q1_CR"]["answer"], "Tower");
        assert_eq!(doc["q1_CR"]["ilo"], "CR");
    }

    #[tokio::test]
    async fn test_following_answers_merge_into_same_document() {
        let (store, recorder) = recorder();

        let id = recorder
            .record_answer(None, &identity(), 8, 1, "CR", "Tower", "Q1")
            .await
            .expect("首次作答应该成功");
        let same_id = recorder
            .record_answer(Some(&id), &identity(), 8, 2, "IC", "Plaza", "Q2")
            .await
            .expect("后续作答应该成功");
        assert_eq!(id, same_id);

        let doc = read_session(&store).await;
        assert_eq!(doc["q1_CR"]["answer"], "Tower");
        assert_eq!(doc["q2_IC"]["answer"], "Plaza");
    }

    #[tokio::test]
    async fn test_same_key_overwrites_with_last_write() {
        let (store, recorder) = recorder();

        let id = recorder
            .record_answer(None, &identity(), 8, 1, "CR", "Tower", "Q1")
            .await
            .expect("首次作答应该成功");
        recorder
            .record_answer(Some(&id), &identity(), 8, 1, "CR", "Ocean", "Q1")
            .await
            .expect("重复作答应该成功");

        let doc = read_session(&store).await;
        // 同 key 只保留第二次写入
        assert_eq!(doc["q1_CR"]["answer"], "Ocean");
        let answer_fields = doc
            .as_object()
            .map(|m| m.keys().filter(|k| k.starts_with('q')).count())
            .unwrap_or_default();
        assert_eq!(answer_fields, 1);
    }

    #[tokio::test]
    async fn test_mark_completed_sets_flag() {
        let (store, recorder) = recorder();

        let id = recorder
            .record_answer(None, &identity(), 1, 1, "CR", "Tower", "Q1")
            .await
            .expect("作答应该成功");
        recorder.mark_completed(&id).await.expect("完成标记应该成功");

        let doc = read_session(&store).await;
        assert_eq!(doc["isCompleted"], true);
        assert!(doc.get("completedAt").is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_session_propagates_error() {
        let (_, recorder) = recorder();

        let result = recorder
            .record_answer(Some("no-such-id"), &identity(), 8, 1, "CR", "Tower", "Q1")
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
