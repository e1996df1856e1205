//! Authorization policies for callable operations.
//!
//! A policy looks at the (possibly absent) caller context and either lets the
//! call through or says why not. Operations take their policy as a parameter,
//! so role-based rules can be swapped in without touching the use cases.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::auth_context::{AuthContext, Capability};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("The function must be called while authenticated.")]
    Unauthenticated,
    #[error("Missing required capability: {}", .0.as_str())]
    PermissionDenied(Capability),
}

pub trait AuthorizationPolicy: Send + Sync {
    fn authorize(&self, context: Option<&AuthContext>) -> Result<(), AuthorizationError>;
}

/// Lets every call through, authenticated or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl AuthorizationPolicy for Unrestricted {
    fn authorize(&self, _context: Option<&AuthContext>) -> Result<(), AuthorizationError> {
        Ok(())
    }
}

/// Requires a caller context, nothing more.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAuthenticated;

impl AuthorizationPolicy for RequireAuthenticated {
    fn authorize(&self, context: Option<&AuthContext>) -> Result<(), AuthorizationError> {
        context
            .map(|_| ())
            .ok_or(AuthorizationError::Unauthenticated)
    }
}

/// Requires an authenticated caller holding the given capability.
#[derive(Debug, Clone, Copy)]
pub struct RequireCapability(pub Capability);

impl AuthorizationPolicy for RequireCapability {
    fn authorize(&self, context: Option<&AuthContext>) -> Result<(), AuthorizationError> {
        let context = context.ok_or(AuthorizationError::Unauthenticated)?;
        if context.has_capability(self.0) {
            Ok(())
        } else {
            Err(AuthorizationError::PermissionDenied(self.0))
        }
    }
}

impl<P: AuthorizationPolicy + ?Sized> AuthorizationPolicy for Arc<P> {
    fn authorize(&self, context: Option<&AuthContext>) -> Result<(), AuthorizationError> {
        (**self).authorize(context)
    }
}

impl<P: AuthorizationPolicy + ?Sized> AuthorizationPolicy for &P {
    fn authorize(&self, context: Option<&AuthContext>) -> Result<(), AuthorizationError> {
        (**self).authorize(context)
    }
}
