//! PostgreSQL-backed `ContactRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ContactMessage;
use crate::domain::ports::{ContactRepository, ContactStoreError};

use super::models::NewContactMessageRow;
use super::pool::{DbPool, PoolError};
use super::schema::contact_messages;

/// Diesel-backed implementation of the `ContactRepository` port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ContactStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ContactStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ContactStoreError::connection("database connection error")
        }
        _ => ContactStoreError::query("database error"),
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn record(&self, message: &ContactMessage) -> Result<(), ContactStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewContactMessageRow {
            id: Uuid::new_v4(),
            contact_name: message.name(),
            contact_email: message.email().as_ref(),
            contact_phone_number: message.phone().as_ref(),
            contact_message: message.message(),
        };

        diesel::insert_into(contact_messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }
}
