//! session.rs
//!
//! Долговременное хранение токена и имени пользователя между запусками.
//!
//! 1.  **KeyValueStore**: минимальное строковое хранилище ключ-значение
//!     (файл с JSON-объектом или память для тестов).
//! 2.  **AuthSession**: текущий токен и имя; при старте читаются из хранилища,
//!     при входе записываются, при выходе удаляются.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_NAME_KEY: &str = "userName";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("session storage is corrupted: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Хранилище в памяти, живет пока жив процесс.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Хранилище в JSON-файле. Файл перезаписывается целиком при каждом изменении.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Открывает файл; отсутствующий файл означает пустое хранилище.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Session store opened at {}", path.display());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    token: Option<String>,
    user_name: Option<String>,
}

/// Авторизация текущего пользователя.
pub struct AuthSession {
    store: Box<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl AuthSession {
    /// Поднимает сессию из хранилища (токен и имя сохраняются при входе).
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let state = SessionState {
            token: store.get(TOKEN_KEY).filter(|t| !t.is_empty()),
            user_name: store.get(USER_NAME_KEY).filter(|n| !n.is_empty()),
        };
        Self {
            store,
            state: RwLock::new(state),
        }
    }

    /// Сессия без сохранения на диск.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user_name(&self) -> Option<String> {
        self.read().user_name.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Сначала пишет в хранилище, память обновляется только после успешной записи.
    /// Если имя записать не удалось, уже записанный токен откатывается.
    pub fn login(&self, token: &str, name: &str) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, token)?;
        if let Err(e) = self.store.set(USER_NAME_KEY, name) {
            if let Err(rollback) = self.store.remove(TOKEN_KEY) {
                warn!("Failed to roll back stored token: {}", rollback);
            }
            return Err(e);
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(token.to_string());
        state.user_name = Some(name.to_string());
        info!("Logged in as {}", name);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_NAME_KEY)?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = SessionState::default();
        info!("Logged out");
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
