use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::CodeCache;
use crate::error::AccountsError;

/// Process-local expiring map. Not shared between instances; the database
/// copy of the code stays authoritative.
#[derive(Clone, Default)]
pub struct MemoryCodeCache {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryCodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, AccountsError> {
        self.entries
            .lock()
            .map_err(|_| AccountsError::Internal(anyhow!("code cache mutex poisoned")))
    }
}

impl CodeCache for MemoryCodeCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AccountsError> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_owned(), (value.to_owned(), now + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AccountsError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some((value, expires)) if *expires > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AccountsError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[derive(Clone)]
pub struct RedisCodeCache {
    pub pool: Pool,
}

impl CodeCache for RedisCodeCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AccountsError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AccountsError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AccountsError::Internal(e.into()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AccountsError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AccountsError::Internal(e.into()))?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| AccountsError::Internal(e.into()))?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), AccountsError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AccountsError::Internal(e.into()))?;
        let (): () = conn
            .del(key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AccountsError::Internal(e.into()))?;
        Ok(())
    }
}

/// Cache selected at startup: Redis when `REDIS_URL` is set, memory otherwise.
#[derive(Clone)]
pub enum CodeCacheBackend {
    Memory(MemoryCodeCache),
    Redis(RedisCodeCache),
}

impl CodeCache for CodeCacheBackend {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AccountsError> {
        match self {
            Self::Memory(c) => c.set(key, value, ttl).await,
            Self::Redis(c) => c.set(key, value, ttl).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AccountsError> {
        match self {
            Self::Memory(c) => c.get(key).await,
            Self::Redis(c) => c.get(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AccountsError> {
        match self {
            Self::Memory(c) => c.delete(key).await,
            Self::Redis(c) => c.delete(key).await,
        }
    }
}
