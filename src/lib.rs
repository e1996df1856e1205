//! # UserOps - User Administration Callables
//!
//! This is a facade crate that re-exports all public APIs from the service components.
//! Use this crate to get access to all user administration functionality in one place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Uid`, `UserRecord`, `UserUpdate`, `AuthContext`, etc.
//! - **Ports**: `IdentityProvider`, `DocumentStore`, `TokenVerifier`
//! - **Use cases**: `DeleteUserUseCase`, `UpdateUserAuthUseCase`
//! - **Adapters**: `IdentityToolkitClient`, `FirestoreDocumentStore`, in-memory stand-ins, etc.
//! - **Service**: `UserOpsService` - The main entry point for the callables

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use userops_core::*;
}

// Re-export most commonly used core types at the root level
pub use userops_core::{AuthContext, Capability, Uid, UidError, UserRecord, UserUpdate};

// ============================================================================
// Ports and Policies
// ============================================================================

pub use userops_core::{
    AuthorizationError, AuthorizationPolicy, DocumentStore, DocumentStoreError, IdentityProvider,
    IdentityProviderError, RequireAuthenticated, RequireCapability, TokenVerifier, Unrestricted,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use userops_application::*;
}

pub use userops_application::{DeleteUserUseCase, UpdateUserAuthUseCase};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Callable protocol, routes and shared route state
    pub mod http {
        pub use userops_adapters::http::*;
    }

    /// In-memory implementations
    pub mod persistence {
        pub use userops_adapters::persistence::*;
    }

    /// Identity Toolkit client
    pub mod identity {
        pub use userops_adapters::identity::*;
    }

    /// Firestore client and value codec
    pub mod firestore {
        pub use userops_adapters::firestore::*;
    }

    /// Identity token verification
    pub mod auth {
        pub use userops_adapters::auth_validation::*;
    }

    /// Configuration
    pub mod config {
        pub use userops_adapters::config::*;
    }
}

pub use userops_adapters::{
    auth_validation::{FirebaseTokenVerifier, HmacTokenVerifier, TokenVerifierConfig},
    config::Settings,
    firestore::FirestoreDocumentStore,
    http::{AccessPolicies, CallableState},
    identity::IdentityToolkitClient,
    persistence::{InMemoryDocumentStore, InMemoryIdentityProvider},
};

// ============================================================================
// Service (Main Entry Point)
// ============================================================================

pub use userops_service::{UserOpsService, telemetry};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the ports
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
