//! Credential lifecycle flows over the store and hasher ports.
//!
//! Each flow is a short synchronous sequence of at most one read and one
//! write against the credential store; no state is retained between calls.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    AuthService, CredentialFlowError, CredentialRepository, CredentialStoreError, NewUser,
    PasswordHashError, PasswordHasher, SignupError, unique_fields,
};
use crate::domain::{
    Error, LoginCredentials, PasswordChange, PasswordHash, SignupDetails, User, Username,
};

/// [`AuthService`] implementation over a credential repository and a password
/// hasher.
#[derive(Clone)]
pub struct CredentialAuthService {
    credentials: Arc<dyn CredentialRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => Error::service_unavailable(message),
        CredentialStoreError::Query { message } => Error::internal(message),
        CredentialStoreError::ConstraintViolation { field } => {
            // Flows translate violations on known fields before this mapping
            // runs; anything left over is an unexpected schema mismatch.
            Error::internal(format!("unexpected constraint violation on {field}"))
        }
    }
}

fn map_hasher_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

impl CredentialAuthService {
    /// Create the service from its two collaborator ports.
    pub fn new(credentials: Arc<dyn CredentialRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            credentials,
            hasher,
        }
    }

    /// Lookup-then-verify step shared by login and change-password.
    async fn verified_user(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<User, CredentialFlowError> {
        let user = self
            .credentials
            .find_by_username(username)
            .await
            .map_err(map_store_error)?
            .ok_or(CredentialFlowError::NotRegistered)?;

        let valid = self
            .hasher
            .verify(password, user.password_hash())
            .map_err(map_hasher_error)?;
        if !valid {
            return Err(CredentialFlowError::InvalidCredentials);
        }
        Ok(user)
    }
}

#[async_trait]
impl AuthService for CredentialAuthService {
    async fn signup(&self, details: SignupDetails) -> Result<User, SignupError> {
        // Advisory pre-checks decide which duplicate is reported; username
        // collisions take priority over email collisions. The store's unique
        // indexes remain the authority under concurrency.
        if self
            .credentials
            .find_by_username(details.username())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            debug!(username = %details.username(), "signup rejected: username taken");
            return Err(SignupError::DuplicateUsername);
        }

        if self
            .credentials
            .find_by_email(details.email())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            debug!(username = %details.username(), "signup rejected: email taken");
            return Err(SignupError::DuplicateEmail);
        }

        let password_hash = self
            .hasher
            .hash(details.password())
            .map_err(map_hasher_error)?;

        let created = self
            .credentials
            .create(NewUser {
                username: details.username().clone(),
                email: details.email().clone(),
                phone: details.phone().clone(),
                password_hash,
            })
            .await
            .map_err(|error| match error {
                // A racing identical signup can slip past the pre-checks and
                // land on the unique index instead.
                CredentialStoreError::ConstraintViolation { ref field }
                    if field == unique_fields::USERNAME =>
                {
                    SignupError::DuplicateUsername
                }
                CredentialStoreError::ConstraintViolation { ref field }
                    if field == unique_fields::EMAIL =>
                {
                    SignupError::DuplicateEmail
                }
                other => SignupError::Internal(map_store_error(other)),
            })?;

        info!(username = %created.username(), user_id = %created.id(), "user registered");
        Ok(created)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, CredentialFlowError> {
        let user = self
            .verified_user(credentials.username(), credentials.password())
            .await?;
        info!(user_id = %user.id(), "login verified");
        Ok(user)
    }

    async fn change_password(&self, change: PasswordChange) -> Result<(), CredentialFlowError> {
        let user = self
            .verified_user(change.username(), change.current_password())
            .await?;

        let replacement: PasswordHash = self
            .hasher
            .hash(change.new_password())
            .map_err(map_hasher_error)?;

        self.credentials
            .update_password_hash(user.id(), &replacement)
            .await
            .map_err(map_store_error)?;

        info!(user_id = %user.id(), "password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Flow behaviour over the in-memory store and stub hashers.
    use super::*;
    use crate::domain::ports::InMemoryCredentialRepository;
    use crate::domain::{EmailAddress, ErrorCode};
    use rstest::rstest;

    /// Reversible stub: "salts" with a per-call counter so equal plaintexts
    /// produce distinct hashes that still verify.
    #[derive(Default)]
    struct StubHasher {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl PasswordHasher for StubHasher {
        fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
            let salt = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            PasswordHash::new(format!("stub${salt}${plaintext}"))
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        }

        fn verify(
            &self,
            plaintext: &str,
            stored: &PasswordHash,
        ) -> Result<bool, PasswordHashError> {
            let suffix = stored
                .expose()
                .rsplit('$')
                .next()
                .ok_or_else(|| PasswordHashError::malformed_hash("missing payload"))?;
            Ok(suffix == plaintext)
        }
    }

    struct FailingHasher;

    impl PasswordHasher for FailingHasher {
        fn hash(&self, _plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
            Err(PasswordHashError::hash("rng unavailable"))
        }

        fn verify(&self, _: &str, _: &PasswordHash) -> Result<bool, PasswordHashError> {
            Err(PasswordHashError::malformed_hash("unreadable"))
        }
    }

    /// Store stub whose pre-checks see nothing but whose insert collides,
    /// simulating a concurrent identical signup winning the race.
    struct RacingStore {
        violated_field: &'static str,
    }

    #[async_trait]
    impl CredentialRepository for RacingStore {
        async fn find_by_id(
            &self,
            _: &crate::domain::UserId,
        ) -> Result<Option<User>, CredentialStoreError> {
            Ok(None)
        }

        async fn find_by_username(
            &self,
            _: &Username,
        ) -> Result<Option<User>, CredentialStoreError> {
            Ok(None)
        }

        async fn find_by_email(
            &self,
            _: &EmailAddress,
        ) -> Result<Option<User>, CredentialStoreError> {
            Ok(None)
        }

        async fn create(&self, _: NewUser) -> Result<User, CredentialStoreError> {
            Err(CredentialStoreError::constraint_violation(
                self.violated_field,
            ))
        }

        async fn update_password_hash(
            &self,
            _: &crate::domain::UserId,
            _: &PasswordHash,
        ) -> Result<(), CredentialStoreError> {
            Ok(())
        }
    }

    fn service() -> CredentialAuthService {
        CredentialAuthService::new(
            Arc::new(InMemoryCredentialRepository::new()),
            Arc::new(StubHasher::default()),
        )
    }

    fn signup_details(username: &str, password: &str, phone: &str, email: &str) -> SignupDetails {
        SignupDetails::try_from_parts(username, password, phone, email).expect("valid signup")
    }

    fn login_credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid credentials")
    }

    #[tokio::test]
    async fn signup_stores_a_hash_that_differs_from_the_plaintext() {
        let auth = service();
        let user = auth
            .signup(signup_details("alice", "pw1", "555-0100", "a@x.com"))
            .await
            .expect("signup succeeds");

        assert_eq!(user.username().as_ref(), "alice");
        assert_ne!(user.password_hash().expose(), "pw1");
    }

    #[tokio::test]
    async fn duplicate_username_wins_over_duplicate_email() {
        let auth = service();
        auth.signup(signup_details("alice", "pw1", "555-0100", "a@x.com"))
            .await
            .expect("first signup succeeds");

        // Both username and email collide; username must be reported.
        let err = auth
            .signup(signup_details("alice", "pw2", "555-0200", "a@x.com"))
            .await
            .expect_err("duplicate signup must fail");
        assert_eq!(err, SignupError::DuplicateUsername);

        // Fresh username, duplicate email.
        let err = auth
            .signup(signup_details("bob", "pw2", "555-0200", "a@x.com"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(err, SignupError::DuplicateEmail);
    }

    #[rstest]
    #[case(unique_fields::USERNAME, SignupError::DuplicateUsername)]
    #[case(unique_fields::EMAIL, SignupError::DuplicateEmail)]
    #[tokio::test]
    async fn racing_insert_maps_constraint_violation_back_to_duplicate(
        #[case] violated_field: &'static str,
        #[case] expected: SignupError,
    ) {
        let auth = CredentialAuthService::new(
            Arc::new(RacingStore { violated_field }),
            Arc::new(StubHasher::default()),
        );
        let err = auth
            .signup(signup_details("alice", "pw1", "555-0100", "a@x.com"))
            .await
            .expect_err("racing insert must fail");
        assert_eq!(err, expected);
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_user_from_wrong_password() {
        let auth = service();
        auth.signup(signup_details("alice", "pw1", "555-0100", "a@x.com"))
            .await
            .expect("signup succeeds");

        let err = auth
            .login(login_credentials("nobody", "pw1"))
            .await
            .expect_err("unknown user must fail");
        assert_eq!(err, CredentialFlowError::NotRegistered);

        let err = auth
            .login(login_credentials("alice", "wrong"))
            .await
            .expect_err("wrong password must fail");
        assert_eq!(err, CredentialFlowError::InvalidCredentials);

        let user = auth
            .login(login_credentials("alice", "pw1"))
            .await
            .expect("correct credentials succeed");
        assert_eq!(user.username().as_ref(), "alice");
    }

    #[tokio::test]
    async fn change_password_replaces_hash_only_on_correct_current_password() {
        let auth = service();
        auth.signup(signup_details("alice", "pw1", "555-0100", "a@x.com"))
            .await
            .expect("signup succeeds");

        let err = auth
            .change_password(
                PasswordChange::try_from_parts("alice", "wrong", "pw3").expect("valid change"),
            )
            .await
            .expect_err("wrong current password must fail");
        assert_eq!(err, CredentialFlowError::InvalidCredentials);

        // Stored hash unchanged: the old password still logs in.
        auth.login(login_credentials("alice", "pw1"))
            .await
            .expect("old password still valid");

        auth.change_password(
            PasswordChange::try_from_parts("alice", "pw1", "pw3").expect("valid change"),
        )
        .await
        .expect("change succeeds");

        let err = auth
            .login(login_credentials("alice", "pw1"))
            .await
            .expect_err("old password must no longer verify");
        assert_eq!(err, CredentialFlowError::InvalidCredentials);

        auth.login(login_credentials("alice", "pw3"))
            .await
            .expect("new password verifies");
    }

    #[tokio::test]
    async fn hasher_failures_surface_as_internal_not_as_user_facing_kinds() {
        let auth = CredentialAuthService::new(
            Arc::new(InMemoryCredentialRepository::new()),
            Arc::new(FailingHasher),
        );
        let err = auth
            .signup(signup_details("alice", "pw1", "555-0100", "a@x.com"))
            .await
            .expect_err("hasher failure must fail the flow");
        match err {
            SignupError::Internal(inner) => assert_eq!(inner.code(), ErrorCode::InternalError),
            other => panic!("expected internal failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn store_connection_loss_maps_to_service_unavailable() {
        struct DownStore;

        #[async_trait]
        impl CredentialRepository for DownStore {
            async fn find_by_id(
                &self,
                _: &crate::domain::UserId,
            ) -> Result<Option<User>, CredentialStoreError> {
                Err(CredentialStoreError::connection("store offline"))
            }

            async fn find_by_username(
                &self,
                _: &Username,
            ) -> Result<Option<User>, CredentialStoreError> {
                Err(CredentialStoreError::connection("store offline"))
            }

            async fn find_by_email(
                &self,
                _: &EmailAddress,
            ) -> Result<Option<User>, CredentialStoreError> {
                Err(CredentialStoreError::connection("store offline"))
            }

            async fn create(&self, _: NewUser) -> Result<User, CredentialStoreError> {
                Err(CredentialStoreError::connection("store offline"))
            }

            async fn update_password_hash(
                &self,
                _: &crate::domain::UserId,
                _: &PasswordHash,
            ) -> Result<(), CredentialStoreError> {
                Err(CredentialStoreError::connection("store offline"))
            }
        }

        let auth =
            CredentialAuthService::new(Arc::new(DownStore), Arc::new(StubHasher::default()));
        let err = auth
            .login(login_credentials("alice", "pw1"))
            .await
            .expect_err("offline store must fail");
        match err {
            CredentialFlowError::Internal(inner) => {
                assert_eq!(inner.code(), ErrorCode::ServiceUnavailable);
            }
            other => panic!("expected internal failure, got {other:?}"),
        }
    }
}
