pub mod in_memory_document_store;
pub mod in_memory_identity_provider;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use in_memory_identity_provider::InMemoryIdentityProvider;
