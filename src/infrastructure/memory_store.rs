//! 内存文档存储 - 基础设施层
//!
//! 持有全部集合数据，只暴露文档读写能力；
//! 线上部署时可整体替换为任意文档型后端

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::doc_store::DocumentStore;
use crate::error::StoreError;

/// 集合 = 文档 id → 文档内容，保持插入顺序
type Collection = IndexMap<String, JsonValue>;

/// 内存文档存储
///
/// 职责：
/// - 持有全部集合数据（集合名 → 文档 id → 文档）
/// - create 生成随机文档 id
/// - update 做顶层字段浅合并（同 key 覆盖）
/// - clone 共享同一份底层数据
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, data: JsonValue) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: JsonValue) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        merge_top_level(doc, partial);
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, JsonValue)>, StoreError> {
        let collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, doc)| doc.get(field).and_then(JsonValue::as_str) == Some(value))
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect())
    }
}

/// 顶层浅合并：partial 的每个字段覆盖同名字段，新字段追加到末尾
fn merge_top_level(doc: &mut JsonValue, partial: JsonValue) {
    match (doc, partial) {
        (JsonValue::Object(doc_map), JsonValue::Object(partial_map)) => {
            for (key, value) in partial_map {
                doc_map.insert(key, value);
            }
        }
        (doc, partial) => *doc = partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_then_query_by_field() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let id = store
                .create("responses", json!({"userId": "u-1", "totalQuestions": 3}))
                .await
                .expect("创建文档应该成功");

            let hits = store.query("responses", "userId", "u-1").await.expect("查询应该成功");
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].0, id);

            let misses = store.query("responses", "userId", "u-2").await.expect("查询应该成功");
            assert!(misses.is_empty());
        });
    }

    #[test]
    fn test_update_merges_top_level_fields() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let id = store
                .create("responses", json!({"userId": "u-1", "q1_CR": {"answer": "Tower"}}))
                .await
                .expect("创建文档应该成功");

            // 同 key 覆盖，新 key 追加
            store
                .update(
                    "responses",
                    &id,
                    json!({"q1_CR": {"answer": "Ocean"}, "q2_IC": {"answer": "Plaza"}}),
                )
                .await
                .expect("更新应该成功");

            let (_, doc) = store
                .query("responses", "userId", "u-1")
                .await
                .expect("查询应该成功")
                .remove(0);
            assert_eq!(doc["q1_CR"]["answer"], "Ocean");
            assert_eq!(doc["q2_IC"]["answer"], "Plaza");
            assert_eq!(doc["userId"], "u-1");
        });
    }

    #[test]
    fn test_update_missing_document_reports_not_found() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let result = store.update("responses", "no-such-id", json!({"x": 1})).await;
            assert!(matches!(result, Err(StoreError::NotFound { .. })));
        });
    }
}
