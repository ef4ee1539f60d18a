//! Port abstraction for the credential store and its errors.
//!
//! The store owns the uniqueness rules: `create` must be atomic with respect
//! to the unique indexes on username and email, so concurrent identical
//! signups cannot both succeed regardless of any advisory pre-checks the
//! flows perform.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, PhoneNumber, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "credential store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "credential store query failed: {message}",
        /// A unique index rejected the write.
        ConstraintViolation { field: String } => "unique constraint violated on {field}",
    }
}

/// Field names reported in [`CredentialStoreError::ConstraintViolation`].
pub mod unique_fields {
    /// The username unique index.
    pub const USERNAME: &str = "username";
    /// The email unique index.
    pub const EMAIL: &str = "email";
}

/// Insertable user record; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Requested unique login name.
    pub username: Username,
    /// Requested unique contact email.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone: PhoneNumber,
    /// Hash of the initial password.
    pub password_hash: PasswordHash,
}

/// Driven port for persisted credential records.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Resolve a session principal back to its user record.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, CredentialStoreError>;

    /// Fetch a user by unique username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, CredentialStoreError>;

    /// Fetch a user by unique email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, CredentialStoreError>;

    /// Insert a new user, assigning its id.
    ///
    /// Fails with [`CredentialStoreError::ConstraintViolation`] when the
    /// username or email is already taken; the check and the insert are a
    /// single atomic step inside the adapter.
    async fn create(&self, new_user: NewUser) -> Result<User, CredentialStoreError>;

    /// Replace the stored password hash for an existing user.
    async fn update_password_hash(
        &self,
        user_id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), CredentialStoreError>;
}

/// Mutex-guarded in-memory credential store.
///
/// Serves as the pool-less fallback adapter and as the repository used by
/// HTTP tests. Uniqueness checks and the insert happen under one lock, so the
/// adapter honours the same atomicity contract as the SQL-backed store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialRepository {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryCredentialRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, CredentialStoreError> {
        self.users
            .lock()
            .map_err(|_| CredentialStoreError::query("credential store lock poisoned"))
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let users = self.lock()?;
        Ok(users.iter().find(|user| user.id() == user_id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, CredentialStoreError> {
        let users = self.lock()?;
        Ok(users.iter().find(|user| user.username() == username).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, CredentialStoreError> {
        let users = self.lock()?;
        Ok(users.iter().find(|user| user.email() == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, CredentialStoreError> {
        let mut users = self.lock()?;
        if users
            .iter()
            .any(|user| user.username() == &new_user.username)
        {
            return Err(CredentialStoreError::constraint_violation(
                unique_fields::USERNAME,
            ));
        }
        if users.iter().any(|user| user.email() == &new_user.email) {
            return Err(CredentialStoreError::constraint_violation(
                unique_fields::EMAIL,
            ));
        }

        let user = User::new(
            UserId::random(),
            new_user.username,
            new_user.email,
            new_user.phone,
            new_user.password_hash,
        );
        users.push(user.clone());
        Ok(user)
    }

    async fn update_password_hash(
        &self,
        user_id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), CredentialStoreError> {
        let mut users = self.lock()?;
        match users.iter_mut().find(|user| user.id() == user_id) {
            Some(user) => {
                *user = user.clone().with_password_hash(password_hash.clone());
                Ok(())
            }
            None => Err(CredentialStoreError::query(format!(
                "no user with id {user_id}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory adapter's store contract.
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: Username::new(username).expect("valid username"),
            email: EmailAddress::new(email).expect("valid email"),
            phone: PhoneNumber::new("555-0100").expect("valid phone"),
            password_hash: PasswordHash::new("$argon2id$stub").expect("valid hash"),
        }
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids_and_finds_back() {
        let repo = InMemoryCredentialRepository::new();
        let alice = repo.create(new_user("alice", "a@x.com")).await.expect("create alice");
        let bob = repo.create(new_user("bob", "b@y.com")).await.expect("create bob");
        assert_ne!(alice.id(), bob.id());

        let found = repo
            .find_by_username(alice.username())
            .await
            .expect("lookup succeeds")
            .expect("alice exists");
        assert_eq!(found, alice);

        let by_email = repo
            .find_by_email(bob.email())
            .await
            .expect("lookup succeeds")
            .expect("bob exists");
        assert_eq!(by_email, bob);

        let by_id = repo
            .find_by_id(alice.id())
            .await
            .expect("lookup succeeds")
            .expect("alice resolvable by id");
        assert_eq!(by_id, alice);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let repo = InMemoryCredentialRepository::new();
        repo.create(new_user("alice", "a@x.com")).await.expect("first insert");

        let err = repo
            .create(new_user("alice", "fresh@y.com"))
            .await
            .expect_err("duplicate username must fail");
        assert_eq!(
            err,
            CredentialStoreError::constraint_violation(unique_fields::USERNAME)
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let repo = InMemoryCredentialRepository::new();
        repo.create(new_user("alice", "a@x.com")).await.expect("first insert");

        let err = repo
            .create(new_user("someone-else", "a@x.com"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(
            err,
            CredentialStoreError::constraint_violation(unique_fields::EMAIL)
        );
    }

    #[tokio::test]
    async fn update_password_hash_replaces_stored_hash() {
        let repo = InMemoryCredentialRepository::new();
        let user = repo.create(new_user("alice", "a@x.com")).await.expect("create");

        let replacement = PasswordHash::new("$argon2id$new").expect("valid hash");
        repo.update_password_hash(user.id(), &replacement)
            .await
            .expect("update succeeds");

        let stored = repo
            .find_by_username(user.username())
            .await
            .expect("lookup succeeds")
            .expect("still present");
        assert_eq!(stored.password_hash(), &replacement);
        assert_eq!(stored.id(), user.id());
    }

    #[tokio::test]
    async fn update_password_hash_for_unknown_user_is_a_query_error() {
        let repo = InMemoryCredentialRepository::new();
        let hash = PasswordHash::new("$argon2id$new").expect("valid hash");
        let err = repo
            .update_password_hash(&UserId::random(), &hash)
            .await
            .expect_err("unknown user must fail");
        assert!(matches!(err, CredentialStoreError::Query { .. }));
    }
}
