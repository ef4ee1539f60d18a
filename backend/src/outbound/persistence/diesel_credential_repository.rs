//! PostgreSQL-backed `CredentialRepository` implementation using Diesel.
//!
//! The unique indexes on `users.username` and `users.email` are the atomic
//! safety net for signup: a racing identical submission surfaces here as a
//! unique violation, which is mapped back to the matching constraint field.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    CredentialRepository, CredentialStoreError, NewUser, unique_fields,
};
use crate::domain::{
    EmailAddress, PasswordHash, PhoneNumber, User, UserId, Username,
};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `CredentialRepository` port.
#[derive(Clone)]
pub struct DieselCredentialRepository {
    pool: DbPool,
}

impl DieselCredentialRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CredentialStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CredentialStoreError::connection(message)
        }
    }
}

/// Identify which unique index rejected a write.
///
/// PostgreSQL names the indexes `users_username_key` and `users_email_key`;
/// fall back to the error message when the constraint name is unavailable.
fn violated_field(constraint_name: Option<&str>, message: &str) -> &'static str {
    let haystack = constraint_name.unwrap_or(message);
    if haystack.contains("email") {
        unique_fields::EMAIL
    } else {
        unique_fields::USERNAME
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CredentialStoreError {
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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            CredentialStoreError::constraint_violation(violated_field(
                info.constraint_name(),
                info.message(),
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CredentialStoreError::connection("database connection error")
        }
        DieselError::NotFound => CredentialStoreError::query("record not found"),
        _ => CredentialStoreError::query("database error"),
    }
}

/// Convert a database row to a domain user.
///
/// Rows predate the application-level validators only if the database was
/// mutated out-of-band, so a conversion failure is a query-level fault.
fn row_to_user(row: UserRow) -> Result<User, CredentialStoreError> {
    let map_invalid =
        |err: crate::domain::UserValidationError| CredentialStoreError::query(err.to_string());
    Ok(User::new(
        UserId::from(row.id),
        Username::new(row.username).map_err(map_invalid)?,
        EmailAddress::new(row.email).map_err(map_invalid)?,
        PhoneNumber::new(row.phone_number).map_err(map_invalid)?,
        PasswordHash::new(row.password_hash).map_err(map_invalid)?,
    ))
}

#[async_trait]
impl CredentialRepository for DieselCredentialRepository {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = Uuid::new_v4();
        let row = NewUserRow {
            id,
            username: new_user.username.as_ref(),
            email: new_user.email.as_ref(),
            phone_number: new_user.phone.as_ref(),
            password_hash: new_user.password_hash.expose(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(User::new(
            UserId::from(id),
            new_user.username,
            new_user.email,
            new_user.phone,
            new_user.password_hash,
        ))
    }

    async fn update_password_hash(
        &self,
        user_id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(users::table.filter(users::id.eq(user_id.as_uuid())))
            .set((
                users::password_hash.eq(password_hash.expose()),
                users::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(CredentialStoreError::query(format!(
                "no user with id {user_id}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Mapping behaviour that does not require a live database.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("users_username_key"), "duplicate key", unique_fields::USERNAME)]
    #[case(Some("users_email_key"), "duplicate key", unique_fields::EMAIL)]
    #[case(None, "duplicate key value violates unique constraint \"users_email_key\"", unique_fields::EMAIL)]
    #[case(None, "duplicate key", unique_fields::USERNAME)]
    fn violated_field_resolution(
        #[case] constraint: Option<&str>,
        #[case] message: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(violated_field(constraint, message), expected);
    }

    #[test]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, CredentialStoreError::Query { .. }));
    }
}
