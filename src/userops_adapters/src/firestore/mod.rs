pub mod firestore_document_store;
pub mod value;

pub use firestore_document_store::FirestoreDocumentStore;
