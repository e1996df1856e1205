use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level fields of a stored document.
pub type DocumentData = Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DocumentStoreError {
    #[error("Unsupported document value: {0}")]
    InvalidDocument(String),
    #[error("{0}")]
    Unexpected(String),
}

/// Port to the document database holding user profiles.
///
/// Documents are addressed by collection name and document id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `None` when the document does not exist.
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentData>, DocumentStoreError>;

    /// Creates the document or replaces its contents.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: DocumentData,
    ) -> Result<(), DocumentStoreError>;

    /// Deleting a document that does not exist succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError>;
}
