//! 作答上下文
//!
//! 封装"谁正在回答第几题"这一信息

use std::fmt::Display;

use crate::models::identity::Identity;

/// 单题作答上下文
///
/// 包含处理一次作答所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct SurveyCtx {
    /// 当前用户身份
    pub identity: Identity,

    /// 题目在序列中的序号（从1开始）
    pub question_index: usize,

    /// 本次会话题目总数
    pub total_questions: usize,

    /// 当前题目的 ILO 类别码
    pub ilo: String,
}

impl SurveyCtx {
    /// 创建新的作答上下文
    pub fn new(
        identity: Identity,
        question_index: usize,
        total_questions: usize,
        ilo: String,
    ) -> Self {
        Self {
            identity,
            question_index,
            total_questions,
            ilo,
        }
    }

    /// 是否最后一题
    pub fn is_last(&self) -> bool {
        self.question_index >= self.total_questions
    }
}

impl Display for SurveyCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[用户#{} 题目#{}/{} 类别#{}]",
            self.identity.user_id, self.question_index, self.total_questions, self.ilo
        )
    }
}
