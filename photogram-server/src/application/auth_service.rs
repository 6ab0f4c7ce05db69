use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{Error as HashError, SaltString, rand_core::OsRng},
};
use tracing::{debug, info};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginAttempt, Registration, UserSummary};
use crate::infrastructure::jwt::JwtService;

/// Хеш, с которым сверяется пароль для неизвестного логина.
const DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

#[derive(Debug, Clone)]
pub(crate) struct AuthSession {
    pub(crate) user: UserSummary,
    pub(crate) access_token: String,
}

/// Учётные записи и bearer-токены.
///
/// Сессий на сервере нет: токен лишь позволяет созданию публикации узнать
/// автора (`userId`). Всё остальное API доступно анонимно.
pub(crate) struct AuthService<R: UserRepository> {
    users: R,
    tokens: JwtService,
    hasher: Argon2<'static>,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(users: R, tokens: JwtService) -> Self {
        Self {
            users,
            tokens,
            hasher: Argon2::default(),
        }
    }

    pub(crate) async fn register(&self, form: Registration) -> Result<AuthSession, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .hasher
            .hash_password(form.password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(format!("password hashing failed: {err}")))?
            .to_string();

        let user = self
            .users
            .create_user(NewUser {
                username: form.user_name,
                name: form.name,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "account registered");
        self.issue(user)
    }

    /// На каждую попытку приходится ровно одна проверка argon2, найден логин или нет.
    pub(crate) async fn login(&self, attempt: LoginAttempt) -> Result<AuthSession, DomainError> {
        let found = self.users.find_by_username(&attempt.user_name).await?;
        let stored_hash = found
            .as_ref()
            .map_or(DECOY_HASH, |credentials| credentials.password_hash.as_str());
        let password_ok = self.password_matches(&attempt.password, stored_hash)?;

        match found {
            Some(credentials) if password_ok => {
                info!(user_id = credentials.user.id, "account signed in");
                self.issue(credentials.user)
            }
            _ => {
                debug!(user_name = %attempt.user_name, "sign-in refused");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// `None` для любого токена, который не прошёл проверку.
    pub(crate) fn identify(&self, token: &str) -> Option<i64> {
        match self.tokens.verify_token(token) {
            Ok(claims) => {
                debug!(user_id = claims.user_id, username = %claims.username, "bearer token accepted");
                Some(claims.user_id)
            }
            Err(err) => {
                debug!(error = %err, "bearer token rejected");
                None
            }
        }
    }

    fn issue(&self, user: UserSummary) -> Result<AuthSession, DomainError> {
        let access_token = self
            .tokens
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(AuthSession { user, access_token })
    }

    fn password_matches(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| DomainError::Unexpected(format!("stored hash is malformed: {err}")))?;

        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(DomainError::Unexpected(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuthService;
    use crate::application::fakes::FakeUserRepo;
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginAttempt, Registration};
    use crate::infrastructure::jwt::JwtService;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service(users: FakeUserRepo) -> AuthService<FakeUserRepo> {
        AuthService::new(users, JwtService::new(SECRET, 3600))
    }

    fn carla() -> Registration {
        Registration::parse("carla", "Carla Ourém", "pôr-do-sol-2024".to_string())
            .expect("registration must be valid")
    }

    #[tokio::test]
    async fn login_token_identifies_the_registered_author() {
        let users = FakeUserRepo::new();
        let accounts = service(users.clone());

        let registered = accounts.register(carla()).await.expect("register must succeed");
        assert_eq!(registered.user.name, "Carla Ourém");
        assert_eq!(accounts.identify(&registered.access_token), Some(registered.user.id));

        let stored = users.stored_hash("carla").expect("hash must be stored");
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("pôr-do-sol-2024"));

        let attempt = LoginAttempt::parse("carla", "pôr-do-sol-2024".to_string())
            .expect("attempt must be valid");
        let session = accounts.login(attempt).await.expect("login must succeed");
        assert_eq!(session.user, registered.user);
        assert_eq!(accounts.identify(&session.access_token), Some(registered.user.id));
    }

    #[tokio::test]
    async fn taken_user_name_is_a_conflict() {
        let accounts = service(FakeUserRepo::new());
        accounts.register(carla()).await.expect("first register must succeed");

        let err = accounts.register(carla()).await.expect_err("second must fail");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let accounts = service(FakeUserRepo::new());
        accounts.register(carla()).await.expect("register must succeed");

        for (user_name, password) in [("carla", "wrong-password"), ("nobody", "pôr-do-sol-2024")] {
            let attempt = LoginAttempt::parse(user_name, password.to_string())
                .expect("attempt must be valid");
            let err = accounts.login(attempt).await.expect_err("login must fail");
            assert!(matches!(err, DomainError::InvalidCredentials));
        }
    }

    #[test]
    fn tokens_from_another_secret_are_ignored() {
        let accounts = service(FakeUserRepo::new());

        let foreign = JwtService::new("another-secret-another-secret-0000", 3600)
            .generate_token(1, "carla")
            .expect("token must be generated");

        assert_eq!(accounts.identify(&foreign), None);
        assert_eq!(accounts.identify("not-a-jwt"), None);
    }
}
