use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;
use worldbite_domain::contact::{Channel, ContactIdentifier};
use worldbite_domain::pagination::PageRequest;

use worldbite_accounts::domain::repository::{
    AddressRepository, LoginHistoryRepository, OutboxRepository, SessionRepository,
    UserRepository,
};
use worldbite_accounts::domain::types::{
    Address, ClientInfo, LoginAttempt, LoginReason, MAX_VERIFICATION_ATTEMPTS, OutboxEvent,
    Session, User,
};
use worldbite_accounts::error::AccountsError;
use worldbite_accounts::infra::cache::MemoryCodeCache;
use worldbite_accounts::infra::password::hash_password;
use worldbite_accounts::usecase::login::LoginUseCase;
use worldbite_testing::auth::TEST_JWT_SECRET;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// Rows that reads return instead of the live ones while frozen.
    snapshot: Arc<Mutex<Option<Vec<User>>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            snapshot: Arc::default(),
        }
    }

    /// Pin reads to the current rows while writes keep landing, the way a
    /// burst of requests that all read before any of them wrote sees them.
    pub fn freeze_reads(&self) {
        let rows = self.users.lock().unwrap().clone();
        *self.snapshot.lock().unwrap() = Some(rows);
    }

    fn read(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        if let Some(rows) = self.snapshot.lock().unwrap().as_ref() {
            return rows.iter().find(|u| pred(u)).cloned();
        }
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }

    /// Current state of a stored user.
    pub fn get(&self, id: Uuid) -> User {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .expect("user exists")
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut User)) {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            f(user);
            user.updated_at = Utc::now();
        }
    }
}

fn matches_identifier(user: &User, identifier: &ContactIdentifier) -> bool {
    match identifier {
        ContactIdentifier::Email(e) => user.email.as_deref() == Some(e.as_str()),
        ContactIdentifier::Phone(p) => user.phone.as_deref() == Some(p.as_str()),
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsError> {
        Ok(self.read(|u| u.id == id))
    }

    async fn find_by_identifier(
        &self,
        identifier: &ContactIdentifier,
    ) -> Result<Option<User>, AccountsError> {
        Ok(self.read(|u| matches_identifier(u, identifier)))
    }

    async fn create(&self, user: &User) -> Result<(), AccountsError> {
        let mut users = self.users.lock().unwrap();
        let duplicate = users.iter().any(|u| {
            (u.email.is_some() && u.email == user.email)
                || (u.phone.is_some() && u.phone == user.phone)
        });
        if duplicate {
            return Err(AccountsError::Conflict("already registered".into()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn store_code_with_outbox(
        &self,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
        _event: &OutboxEvent,
    ) -> Result<(), AccountsError> {
        self.update(user_id, |u| {
            u.verification_code = Some(code.to_owned());
            u.verification_code_expires_at = Some(expires_at);
            u.verification_attempts = 0;
        });
        Ok(())
    }

    async fn record_failed_check(&self, user_id: Uuid) -> Result<(), AccountsError> {
        self.update(user_id, |u| u.verification_attempts += 1);
        Ok(())
    }

    async fn consume_code(
        &self,
        user_id: Uuid,
        code: &str,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountsError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(false);
        };
        let live = user.verification_code.as_deref() == Some(code)
            && user.verification_code_expires_at.is_some_and(|at| at > now)
            && user.verification_attempts < MAX_VERIFICATION_ATTEMPTS;
        if live {
            user.verification_code = None;
            user.verification_code_expires_at = None;
            user.verification_attempts = 0;
            user.mark_verified(channel);
            user.updated_at = now;
        }
        Ok(live)
    }

    async fn record_failed_login(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>, AccountsError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        match user.locked_until {
            Some(until) if until > now => return Ok(None),
            Some(_) => user.failed_login_attempts = 1,
            None => user.failed_login_attempts += 1,
        }
        user.locked_until = None;
        user.updated_at = now;
        Ok(Some(user.failed_login_attempts))
    }

    async fn lock_account(&self, user_id: Uuid, until: DateTime<Utc>) -> Result<(), AccountsError> {
        self.update(user_id, |u| {
            if u.locked_until.is_none() {
                u.locked_until = Some(until);
            }
        });
        Ok(())
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AccountsError> {
        self.update(user_id, |u| {
            u.failed_login_attempts = 0;
            u.locked_until = None;
            u.last_login = Some(at);
        });
        Ok(())
    }

    async fn update_name(&self, user_id: Uuid, name: &str) -> Result<(), AccountsError> {
        self.update(user_id, |u| u.name = name.to_owned());
        Ok(())
    }

    async fn set_password_hash(&self, user_id: Uuid, hash: &str) -> Result<(), AccountsError> {
        self.update(user_id, |u| u.password_hash = Some(hash.to_owned()));
        Ok(())
    }

    async fn deactivate(&self, user_id: Uuid) -> Result<(), AccountsError> {
        self.update(user_id, |u| u.active = false);
        Ok(())
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), AccountsError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, AccountsError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.refresh_token == token)
            .cloned())
    }

    async fn deactivate_by_refresh_token(&self, token: &str) -> Result<u64, AccountsError> {
        let mut changed = 0;
        for s in self.sessions.lock().unwrap().iter_mut() {
            if s.refresh_token == token && s.active {
                s.active = false;
                s.revoked_at = Some(Utc::now());
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, AccountsError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.is_usable(now))
            .cloned()
            .collect())
    }

    async fn revoke(&self, id: Uuid, user_id: Uuid) -> Result<bool, AccountsError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user_id && s.active)
        {
            Some(s) => {
                s.active = false;
                s.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AccountsError> {
        let mut changed = 0;
        for s in self.sessions.lock().unwrap().iter_mut() {
            if s.user_id == user_id && s.active {
                s.active = false;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

// ── MockLoginHistoryRepo ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockLoginHistoryRepo {
    pub attempts: Arc<Mutex<Vec<LoginAttempt>>>,
}

impl MockLoginHistoryRepo {
    pub fn reasons(&self) -> Vec<LoginReason> {
        self.attempts.lock().unwrap().iter().map(|a| a.reason).collect()
    }
}

impl LoginHistoryRepository for MockLoginHistoryRepo {
    async fn record(&self, attempt: &LoginAttempt) -> Result<(), AccountsError> {
        self.attempts.lock().unwrap().push(attempt.clone());
        Ok(())
    }

    async fn recent_successes(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<LoginAttempt>, AccountsError> {
        let mut rows: Vec<_> = self
            .attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                a.user_id == Some(user_id) && a.success && a.created_at >= since && a.id != exclude
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LoginAttempt>, AccountsError> {
        let mut rows: Vec<_> = self
            .attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == Some(user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

// ── MockOutboxRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOutboxRepo {
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl OutboxRepository for MockOutboxRepo {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), AccountsError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── MockAddressRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAddressRepo {
    pub addresses: Arc<Mutex<Vec<Address>>>,
}

impl AddressRepository for MockAddressRepo {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, AccountsError> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AccountsError> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn create(&self, address: &Address) -> Result<(), AccountsError> {
        self.addresses.lock().unwrap().push(address.clone());
        Ok(())
    }

    async fn update(&self, address: &Address) -> Result<(), AccountsError> {
        let mut addresses = self.addresses.lock().unwrap();
        if let Some(a) = addresses.iter_mut().find(|a| a.id == address.id) {
            *a = address.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AccountsError> {
        let mut addresses = self.addresses.lock().unwrap();
        let before = addresses.len();
        addresses.retain(|a| !(a.id == id && a.user_id == user_id));
        Ok(addresses.len() < before)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const PASSWORD: &str = "correct horse";

pub fn email(raw: &str) -> ContactIdentifier {
    ContactIdentifier::email(raw).unwrap()
}

pub fn verified_user(identifier: &ContactIdentifier) -> User {
    let mut user = User::new("Ana".into(), identifier, Utc::now());
    user.mark_verified(identifier.channel());
    user
}

pub fn user_with_password(identifier: &ContactIdentifier) -> User {
    let mut user = verified_user(identifier);
    user.password_hash = Some(hash_password(PASSWORD).unwrap());
    user
}

pub fn client(ip: &str, user_agent: &str) -> ClientInfo {
    ClientInfo {
        ip: Some(ip.to_owned()),
        user_agent: Some(user_agent.to_owned()),
    }
}

pub struct Harness {
    pub users: MockUserRepo,
    pub sessions: MockSessionRepo,
    pub history: MockLoginHistoryRepo,
    pub cache: MemoryCodeCache,
}

impl Harness {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: MockUserRepo::new(users),
            sessions: MockSessionRepo::default(),
            history: MockLoginHistoryRepo::default(),
            cache: MemoryCodeCache::new(),
        }
    }

    pub fn login(
        &self,
    ) -> LoginUseCase<MockUserRepo, MockSessionRepo, MockLoginHistoryRepo, MemoryCodeCache> {
        LoginUseCase {
            users: self.users.clone(),
            sessions: self.sessions.clone(),
            history: self.history.clone(),
            cache: self.cache.clone(),
            jwt_secret: TEST_JWT_SECRET.to_owned(),
        }
    }
}
