pub mod auth_validation;
pub mod config;
pub mod firestore;
pub mod http;
pub mod identity;
pub mod persistence;
mod rest;
