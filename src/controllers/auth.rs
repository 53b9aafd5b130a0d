use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::api_client::{ApiClient, ApiError};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::notifications::NotificationSink;
use crate::services::session::{AuthSession, SessionError};
use crate::validation::{first_error, Field};

pub const LOGIN_FAILED: &str = "Login failed";
pub const LOGIN_ERROR: &str = "Login error";
pub const REGISTRATION_SUCCESS: &str = "Registration successful!";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const REGISTER_ERROR: &str = "Register error";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Поле формы не прошло проверку; запрос не отправлялся.
    #[error("{0}")]
    Invalid(&'static str),
    /// Сервер ответил 2xx, но без токена.
    #[error("server did not issue a token")]
    Rejected,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Вход и регистрация. Полученный токен сохраняется в сессию.
pub struct AuthController {
    api: ApiClient,
    session: Arc<AuthSession>,
    notifier: Arc<dyn NotificationSink>,
}

impl AuthController {
    pub fn new(
        api: ApiClient,
        session: Arc<AuthSession>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    /// Возвращает имя, под которым пользователь вошел (или email, если сервер имени не прислал).
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.validate(&[(Field::Email, email), (Field::Password, password)])?;

        let response: LoginResponse = match self
            .api
            .post("/auth/login", &LoginRequest { email, password }, None)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Login request failed: {}", e);
                self.notifier.error(LOGIN_ERROR);
                return Err(e.into());
            }
        };

        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            warn!("Login response for {} has no token", email);
            self.notifier.error(LOGIN_FAILED);
            return Err(AuthError::Rejected);
        };

        let name = response.name.unwrap_or_else(|| email.to_string());
        self.session.login(&token, &name)?;
        Ok(name)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<RegisterResponse, AuthError> {
        self.validate(&[
            (Field::Email, email),
            (Field::Password, password),
            (Field::Name, name),
        ])?;

        let response: RegisterResponse = match self
            .api
            .post("/auth/register", &RegisterRequest { email, password, name }, None)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Register request failed: {}", e);
                self.notifier.error(REGISTER_ERROR);
                return Err(e.into());
            }
        };

        let Some(token) = response.token.as_deref().filter(|t| !t.is_empty()) else {
            warn!("Register response for {} has no token", email);
            self.notifier.error(REGISTRATION_FAILED);
            return Err(AuthError::Rejected);
        };

        let display_name = response
            .user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or(name);
        self.session.login(token, display_name)?;
        self.notifier.success(REGISTRATION_SUCCESS);
        Ok(response)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.logout()?;
        Ok(())
    }

    fn validate(&self, fields: &[(Field, &str)]) -> Result<(), AuthError> {
        match first_error(fields) {
            Some(message) => {
                self.notifier.error(message);
                Err(AuthError::Invalid(message))
            }
            None => Ok(()),
        }
    }
}
