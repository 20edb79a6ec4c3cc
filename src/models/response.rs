use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单题作答记录
///
/// 正常流程下每个 key 只写一次；同 key 重复提交时后写覆盖
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    /// 被选中的分组标签（vibe 代码），也是最终统计的 key
    pub answer: String,
    /// 题干文本
    pub question: String,
    /// 题目在序列中的序号（从1开始）
    pub question_index: usize,
    /// 题目所属的 ILO 类别码
    pub ilo: String,
    pub timestamp: DateTime<Utc>,
}

/// 一次作答会话的完整文档
///
/// 字段名与既有线上数据保持一致（camelCase），
/// 每条作答以 q{题号}_{ILO} 为 key 平铺在文档顶层
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSession {
    pub user_id: String,
    pub user_email: String,
    pub started_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub total_questions: usize,
    #[serde(flatten)]
    pub answers: IndexMap<String, AnswerEntry>,
}

/// 会话完成后回写的统计结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    /// 计数最高的标签
    pub top_category: String,
    /// 从对应结果池中随机选出的最终 vibe
    pub minerva_vibe: String,
    /// 标签 → 计数，保持插入顺序
    pub category_tally: IndexMap<String, u32>,
    pub calculated_at: DateTime<Utc>,
}

/// 作答记录在文档中的 key：q{题号}_{ILO}
pub fn answer_key(question_index: usize, ilo: &str) -> String {
    format!("q{}_{}", question_index, ilo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_key_format() {
        assert_eq!(answer_key(1, "CR"), "q1_CR");
        assert_eq!(answer_key(12, "IE"), "q12_IE");
    }

    #[test]
    fn test_session_document_shape() {
        let now = Utc::now();
        let mut answers = IndexMap::new();
        answers.insert(
            answer_key(1, "CR"),
            AnswerEntry {
                answer: "Tower".to_string(),
                question: "Q?".to_string(),
                question_index: 1,
                ilo: "CR".to_string(),
                timestamp: now,
            },
        );

        let session = ResponseSession {
            user_id: "u-1".to_string(),
            user_email: "a@minerva.edu".to_string(),
            started_at: now,
            last_updated: now,
            total_questions: 10,
            answers,
        };

        let doc = serde_json::to_value(&session).expect("会话应该可以序列化");
        assert_eq!(doc["userId"], "u-1");
        assert_eq!(doc["totalQuestions"], 10);
        // 作答平铺在顶层
        assert_eq!(doc["q1_CR"]["answer"], "Tower");
        assert_eq!(doc["q1_CR"]["questionIndex"], 1);
    }
}
