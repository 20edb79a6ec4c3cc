//! 题库服务 - 业务能力层
//!
//! 只负责"拉取并解析题库"能力，不关心流程

use tracing::{error, info};

use crate::config::Config;
use crate::error::BankError;
use crate::models::loaders::csv_loader;
use crate::models::question::QuestionRecord;

/// 题库服务
///
/// 职责：
/// - 从配置的资源位置拉取 CSV 文本（http(s) URL 或本地路径）
/// - 解析为题目记录列表
/// - 拉取失败时返回空列表，调用方视为加载中/空态
/// - 失败不重试
pub struct QuestionBank {
    source: String,
    client: reqwest::Client,
}

impl QuestionBank {
    /// 创建新的题库服务
    pub fn new(config: &Config) -> Self {
        Self {
            source: config.bank_source.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// 加载整个题库
    ///
    /// 错误只记录日志，对外表现为空题库
    pub async fn load(&self) -> Vec<QuestionRecord> {
        let raw = match self.fetch_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                error!("❌ 题库加载失败: {}", e);
                return Vec::new();
            }
        };

        let records = csv_loader::parse_question_bank(&raw);
        info!("✓ 题库加载完成，共 {} 道题目", records.len());
        records
    }

    /// 拉取原始 CSV 文本
    async fn fetch_raw(&self) -> Result<String, BankError> {
        if self.source.starts_with("http://") || self.source.starts_with("https://") {
            let response = self
                .client
                .get(&self.source)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| BankError::FetchFailed {
                    location: self.source.clone(),
                    source: Box::new(e),
                })?;
            response.text().await.map_err(|e| BankError::FetchFailed {
                location: self.source.clone(),
                source: Box::new(e),
            })
        } else {
            tokio::fs::read_to_string(&self.source)
                .await
                .map_err(|e| BankError::FetchFailed {
                    location: self.source.clone(),
                    source: Box::new(e),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 资源不存在时应该得到空题库而不是错误
    #[tokio::test]
    async fn test_missing_source_yields_empty_bank() {
        let config = Config {
            bank_source: "no/such/file.csv".to_string(),
            ..Config::default()
        };

        let bank = QuestionBank::new(&config);
        assert!(bank.load().await.is_empty());
    }
}
