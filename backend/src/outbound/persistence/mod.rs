//! Diesel-backed persistence adapters for the PostgreSQL schema.

mod diesel_contact_repository;
mod diesel_credential_repository;
pub(crate) mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_credential_repository::DieselCredentialRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
