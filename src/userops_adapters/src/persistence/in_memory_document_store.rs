use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use userops_core::{DocumentData, DocumentStore, DocumentStoreError};

type DocumentKey = (String, String);

#[derive(Default, Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentKey, DocumentData>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: &str, id: &str) -> DocumentKey {
        (collection.to_string(), id.to_string())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentData>, DocumentStoreError> {
        let documents = self.documents.read().await;
        Ok(documents.get(&Self::key(collection, id)).cloned())
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: DocumentData,
    ) -> Result<(), DocumentStoreError> {
        let mut documents = self.documents.write().await;
        documents.insert(Self::key(collection, id), data);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        let mut documents = self.documents.write().await;
        documents.remove(&Self::key(collection, id));
        Ok(())
    }
}
