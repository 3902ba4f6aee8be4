use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Condition, DocumentStore, QueryOp, StoreError};

/// In-process document collection. Reference implementation for local
/// development and the integration tests; a deployment swaps in a real
/// document database behind the same trait.
pub struct MemoryStore {
    collection: String,
    docs: RwLock<BTreeMap<String, Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self { collection: collection.into(), docs: RwLock::new(BTreeMap::new()) }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Map<String, Value>>, StoreError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, doc: Map<String, Value>) -> Result<(), StoreError> {
        tracing::debug!(collection = %self.collection, id, "put document");
        self.docs.write().await.insert(id.to_string(), doc);
        Ok(())
    }

    async fn update(&self, id: &str, patch: Map<String, Value>) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        match docs.get_mut(id) {
            Some(doc) => {
                for (key, value) in patch {
                    doc.insert(key, value);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.docs.write().await.remove(id).is_some())
    }

    async fn query(&self, conditions: &[Condition]) -> Result<Vec<Map<String, Value>>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs
            .values()
            .filter(|doc| conditions.iter().all(|cond| matches(doc, cond)))
            .cloned()
            .collect())
    }
}

fn matches(doc: &Map<String, Value>, cond: &Condition) -> bool {
    let Some(actual) = doc.get(&cond.field) else {
        return false;
    };
    match cond.op {
        QueryOp::Eq => actual == &cond.value,
        op => match (actual.as_f64(), cond.value.as_f64()) {
            (Some(a), Some(b)) => match op {
                QueryOp::Gt => a > b,
                QueryOp::Gte => a >= b,
                QueryOp::Lt => a < b,
                QueryOp::Lte => a <= b,
                QueryOp::Eq => a == b,
            },
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn put_get_update_delete() {
        let store = MemoryStore::new("announcements");
        store.put("a", doc(json!({"id": "a", "price": 100}))).await.unwrap();

        assert!(store.get("a").await.unwrap().is_some());
        assert!(store.get("b").await.unwrap().is_none());

        assert!(store.update("a", doc(json!({"price": 200}))).await.unwrap());
        assert_eq!(store.get("a").await.unwrap().unwrap()["price"], json!(200));
        assert!(!store.update("b", doc(json!({"price": 200}))).await.unwrap());

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn query_equality_and_range() {
        let store = MemoryStore::new("announcements");
        store.put("a", doc(json!({"id": "a", "kind": "house", "price": 100}))).await.unwrap();
        store.put("b", doc(json!({"id": "b", "kind": "loft", "price": 250}))).await.unwrap();
        store.put("c", doc(json!({"id": "c", "kind": "house", "price": 400}))).await.unwrap();

        let houses = store.query(&[Condition::eq("kind", "house")]).await.unwrap();
        assert_eq!(houses.len(), 2);

        let mid = store
            .query(&[
                Condition::range("price", QueryOp::Gte, 150),
                Condition::range("price", QueryOp::Lte, 300),
            ])
            .await
            .unwrap();
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0]["id"], json!("b"));

        // Missing field never matches
        let none = store.query(&[Condition::eq("missing", "x")]).await.unwrap();
        assert!(none.is_empty());
    }
}
