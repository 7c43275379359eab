use axum::extract::FromRef;
use sea_orm::DatabaseConnection;
use worldbite_auth_types::identity::JwtSecret;

use crate::infra::cache::CodeCacheBackend;
use crate::infra::db::{
    DbAddressRepository, DbLoginHistoryRepository, DbOutboxRepository, DbSessionRepository,
    DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cache: CodeCacheBackend,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub expose_test_codes: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn login_history_repo(&self) -> DbLoginHistoryRepository {
        DbLoginHistoryRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn address_repo(&self) -> DbAddressRepository {
        DbAddressRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_cache(&self) -> CodeCacheBackend {
        self.cache.clone()
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
