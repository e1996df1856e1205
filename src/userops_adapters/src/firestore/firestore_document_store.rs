use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use userops_core::{DocumentData, DocumentStore, DocumentStoreError};

use super::value::{decode_fields, encode_fields};
use crate::rest::{endpoint, error_message, parse_base_url};

/// Document store backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    http_client: Client,
    base_url: Url,
    project_id: String,
    database_id: String,
    access_token: Secret<String>,
}

impl FirestoreDocumentStore {
    pub fn new(
        base_url: &str,
        project_id: String,
        database_id: String,
        access_token: Secret<String>,
        http_client: Client,
    ) -> Result<Self, String> {
        Ok(Self {
            http_client,
            base_url: parse_base_url(base_url)?,
            project_id,
            database_id,
            access_token,
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<Url, DocumentStoreError> {
        endpoint(
            &self.base_url,
            &[
                "v1",
                "projects",
                &self.project_id,
                "databases",
                &self.database_id,
                "documents",
                collection,
                id,
            ],
        )
        .map_err(DocumentStoreError::Unexpected)
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreDocumentStore {
    #[tracing::instrument(name = "Firestore::get_document", skip(self))]
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentData>, DocumentStoreError> {
        let response = self
            .http_client
            .get(self.document_url(collection, id)?)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| DocumentStoreError::Unexpected(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document: FirestoreDocument = response
                    .json()
                    .await
                    .map_err(|e| DocumentStoreError::Unexpected(e.to_string()))?;
                decode_fields(&document.fields).map(Some)
            }
            _ => Err(DocumentStoreError::Unexpected(
                error_message(response).await,
            )),
        }
    }

    #[tracing::instrument(name = "Firestore::set_document", skip(self, data))]
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: DocumentData,
    ) -> Result<(), DocumentStoreError> {
        // A PATCH without an update mask replaces the whole document.
        let body = FirestoreDocument {
            fields: encode_fields(&data),
        };

        let response = self
            .http_client
            .patch(self.document_url(collection, id)?)
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DocumentStoreError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DocumentStoreError::Unexpected(
                error_message(response).await,
            ));
        }

        Ok(())
    }

    #[tracing::instrument(name = "Firestore::delete_document", skip(self))]
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        let response = self
            .http_client
            .delete(self.document_url(collection, id)?)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| DocumentStoreError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DocumentStoreError::Unexpected(
                error_message(response).await,
            ));
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}
