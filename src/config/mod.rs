use serde::Deserialize;
use std::env;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub notifications: NotificationConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
    pub log_format: LogFormat,
}

// Формат логов: обычный текст или JSON-строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

// Настройки HTTP API кинотеатра
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

// Где хранится токен и имя пользователя между запусками
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub file: String,
}

// Сколько живет всплывающее уведомление
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub ttl_ms: i64,
}

// Плоское представление переменных окружения с префиксом CINEMA_
#[derive(Debug, Deserialize)]
struct EnvSettings {
    api_base: String,
    request_timeout_secs: u64,
    session_file: String,
    notification_ttl_ms: i64,
    log_format: LogFormat,
}

impl Config {
    /// Читает настройки из окружения (`CINEMA_API_BASE`, `CINEMA_SESSION_FILE`,
    /// `CINEMA_NOTIFICATION_TTL_MS`, `CINEMA_REQUEST_TIMEOUT_SECS`, `CINEMA_LOG_FORMAT`)
    /// поверх значений по умолчанию.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("CINEMA").try_parsing(true))
    }

    pub fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: EnvSettings = config::Config::builder()
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("request_timeout_secs", 30)?
            .set_default("session_file", ".cinema-session.json")?
            .set_default("notification_ttl_ms", 2500)?
            .set_default("log_format", "text")?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Ok(Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_booking=info".to_string()),
                log_format: settings.log_format,
            },
            api: ApiConfig {
                base_url: settings.api_base.trim_end_matches('/').to_string(),
                request_timeout_secs: settings.request_timeout_secs,
            },
            session: SessionConfig {
                file: settings.session_file,
            },
            notifications: NotificationConfig {
                ttl_ms: settings.notification_ttl_ms,
            },
        })
    }
}
