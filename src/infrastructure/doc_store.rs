//! 文档存储接口 - 基础设施层
//!
//! 只暴露"文档读写"的能力

use std::future::Future;

use serde_json::Value as JsonValue;

use crate::error::StoreError;

/// 文档存储能力
///
/// 职责：
/// - 暴露 create / update / query 三个能力
/// - 不认识 Question / Session
/// - 不处理业务流程
pub trait DocumentStore: Send + Sync {
    /// 新建文档，返回生成的文档 id
    fn create(
        &self,
        collection: &str,
        data: JsonValue,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// 按 id 更新已有文档，顶层字段浅合并（同名字段覆盖）
    fn update(
        &self,
        collection: &str,
        id: &str,
        partial: JsonValue,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// 查询指定字段等于给定值的所有文档
    fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<(String, JsonValue)>, StoreError>> + Send;
}
