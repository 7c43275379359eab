use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;
use worldbite_accounts_schema::{addresses, login_history, outbox_events, sessions, users};
use worldbite_domain::contact::{Channel, ContactIdentifier};
use worldbite_domain::pagination::PageRequest;

use crate::domain::repository::{
    AddressRepository, LoginHistoryRepository, OutboxRepository, SessionRepository,
    UserRepository,
};
use crate::domain::types::{
    Address, LoginAttempt, LoginReason, MAX_VERIFICATION_ATTEMPTS, OutboxEvent, Session, User,
};
use crate::error::AccountsError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_identifier(
        &self,
        identifier: &ContactIdentifier,
    ) -> Result<Option<User>, AccountsError> {
        let column = match identifier {
            ContactIdentifier::Email(_) => users::Column::Email,
            ContactIdentifier::Phone(_) => users::Column::Phone,
        };
        let model = users::Entity::find()
            .filter(column.eq(identifier.as_str()))
            .one(&self.db)
            .await
            .context("find user by identifier")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), AccountsError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            password_hash: Set(user.password_hash.clone()),
            email_verified: Set(user.email_verified),
            phone_verified: Set(user.phone_verified),
            verification_code: Set(None),
            verification_code_expires_at: Set(None),
            verification_attempts: Set(0),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            last_login: Set(None),
            active: Set(user.active),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                AccountsError::Conflict("email or phone already registered".to_owned()),
            ),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn store_code_with_outbox(
        &self,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), AccountsError> {
        let code = code.to_owned();
        let event = event.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        verification_code: Set(Some(code)),
                        verification_code_expires_at: Set(Some(expires_at)),
                        verification_attempts: Set(0),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await
                })
            })
            .await
            .context("store verification code with outbox")?;
        Ok(())
    }

    async fn record_failed_check(&self, user_id: Uuid) -> Result<(), AccountsError> {
        // Increment in SQL so concurrent checks cannot lose a count.
        users::Entity::update_many()
            .col_expr(
                users::Column::VerificationAttempts,
                Expr::col(users::Column::VerificationAttempts).add(1),
            )
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .context("record failed code check")?;
        Ok(())
    }

    async fn consume_code(
        &self,
        user_id: Uuid,
        code: &str,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountsError> {
        let verified = match channel {
            Channel::Email => users::Column::EmailVerified,
            Channel::Sms => users::Column::PhoneVerified,
        };
        let result = users::Entity::update_many()
            .col_expr(users::Column::VerificationCode, Expr::value(None::<String>))
            .col_expr(
                users::Column::VerificationCodeExpiresAt,
                Expr::value(None::<DateTime<Utc>>),
            )
            .col_expr(users::Column::VerificationAttempts, Expr::value(0))
            .col_expr(verified, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::VerificationCode.eq(code))
            .filter(users::Column::VerificationCodeExpiresAt.gt(now))
            .filter(users::Column::VerificationAttempts.lt(MAX_VERIFICATION_ATTEMPTS))
            .exec(&self.db)
            .await
            .context("consume verification code")?;
        Ok(result.rows_affected == 1)
    }

    async fn record_failed_login(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>, AccountsError> {
        // A non-null lockout that passed the filter has elapsed.
        let attempts = Expr::case(
            users::Column::LockedUntil.is_null(),
            Expr::col(users::Column::FailedLoginAttempts).add(1),
        )
        .finally(1);
        let updated = users::Entity::update_many()
            .col_expr(users::Column::FailedLoginAttempts, attempts.into())
            .col_expr(users::Column::LockedUntil, Expr::value(None::<DateTime<Utc>>))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(user_id))
            .filter(
                Condition::any()
                    .add(users::Column::LockedUntil.is_null())
                    .add(users::Column::LockedUntil.lte(now)),
            )
            .exec_with_returning(&self.db)
            .await
            .context("record failed login")?;
        Ok(updated.first().map(|user| user.failed_login_attempts))
    }

    async fn lock_account(&self, user_id: Uuid, until: DateTime<Utc>) -> Result<(), AccountsError> {
        users::Entity::update_many()
            .col_expr(users::Column::LockedUntil, Expr::value(until))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::LockedUntil.is_null())
            .exec(&self.db)
            .await
            .context("lock account")?;
        Ok(())
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AccountsError> {
        users::ActiveModel {
            id: Set(user_id),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            last_login: Set(Some(at)),
            updated_at: Set(at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record login")?;
        Ok(())
    }

    async fn update_name(&self, user_id: Uuid, name: &str) -> Result<(), AccountsError> {
        users::ActiveModel {
            id: Set(user_id),
            name: Set(name.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user name")?;
        Ok(())
    }

    async fn set_password_hash(&self, user_id: Uuid, hash: &str) -> Result<(), AccountsError> {
        users::ActiveModel {
            id: Set(user_id),
            password_hash: Set(Some(hash.to_owned())),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set password hash")?;
        Ok(())
    }

    async fn deactivate(&self, user_id: Uuid) -> Result<(), AccountsError> {
        users::ActiveModel {
            id: Set(user_id),
            active: Set(false),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("deactivate user")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        password_hash: model.password_hash,
        email_verified: model.email_verified,
        phone_verified: model.phone_verified,
        verification_code: model.verification_code,
        verification_code_expires_at: model.verification_code_expires_at,
        verification_attempts: model.verification_attempts,
        failed_login_attempts: model.failed_login_attempts,
        locked_until: model.locked_until,
        last_login: model.last_login,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AccountsError> {
        sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            refresh_token: Set(session.refresh_token.clone()),
            expires_at: Set(session.expires_at),
            ip: Set(session.ip.clone()),
            user_agent: Set(session.user_agent.clone()),
            active: Set(session.active),
            created_at: Set(session.created_at),
            revoked_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Session>, AccountsError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::RefreshToken.eq(token))
            .one(&self.db)
            .await
            .context("find session by refresh token")?;
        Ok(model.map(session_from_model))
    }

    async fn deactivate_by_refresh_token(&self, token: &str) -> Result<u64, AccountsError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::Active, Expr::value(false))
            .col_expr(sessions::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(sessions::Column::RefreshToken.eq(token))
            .filter(sessions::Column::Active.eq(true))
            .exec(&self.db)
            .await
            .context("deactivate session by refresh token")?;
        Ok(result.rows_affected)
    }

    async fn list_active_by_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, AccountsError> {
        let models = sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::Active.eq(true))
            .filter(sessions::Column::ExpiresAt.gt(now))
            .order_by_desc(sessions::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list active sessions")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn revoke(&self, id: Uuid, user_id: Uuid) -> Result<bool, AccountsError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::Active, Expr::value(false))
            .col_expr(sessions::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::Active.eq(true))
            .exec(&self.db)
            .await
            .context("revoke session")?;
        Ok(result.rows_affected > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AccountsError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::Active, Expr::value(false))
            .col_expr(sessions::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::Active.eq(true))
            .exec(&self.db)
            .await
            .context("revoke all sessions")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        user_id: model.user_id,
        refresh_token: model.refresh_token,
        expires_at: model.expires_at,
        ip: model.ip,
        user_agent: model.user_agent,
        active: model.active,
        created_at: model.created_at,
        revoked_at: model.revoked_at,
    }
}

// ── Login history repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLoginHistoryRepository {
    pub db: DatabaseConnection,
}

impl LoginHistoryRepository for DbLoginHistoryRepository {
    async fn record(&self, attempt: &LoginAttempt) -> Result<(), AccountsError> {
        login_history::ActiveModel {
            id: Set(attempt.id),
            user_id: Set(attempt.user_id),
            identifier: Set(attempt.identifier.clone()),
            reason: Set(attempt.reason.to_string()),
            success: Set(attempt.success),
            ip: Set(attempt.ip.clone()),
            user_agent: Set(attempt.user_agent.clone()),
            created_at: Set(attempt.created_at),
        }
        .insert(&self.db)
        .await
        .context("record login attempt")?;
        Ok(())
    }

    async fn recent_successes(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<LoginAttempt>, AccountsError> {
        let models = login_history::Entity::find()
            .filter(login_history::Column::UserId.eq(user_id))
            .filter(login_history::Column::Success.eq(true))
            .filter(login_history::Column::CreatedAt.gte(since))
            .filter(login_history::Column::Id.ne(exclude))
            .order_by_desc(login_history::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent successful logins")?;
        models.into_iter().map(attempt_from_model).collect()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<LoginAttempt>, AccountsError> {
        let models = login_history::Entity::find()
            .filter(login_history::Column::UserId.eq(user_id))
            .order_by_desc(login_history::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list login history")?;
        models.into_iter().map(attempt_from_model).collect()
    }
}

fn attempt_from_model(model: login_history::Model) -> Result<LoginAttempt, AccountsError> {
    let reason: LoginReason = model
        .reason
        .parse()
        .with_context(|| format!("login_history {} has unknown reason", model.id))?;
    Ok(LoginAttempt {
        id: model.id,
        user_id: model.user_id,
        identifier: model.identifier,
        reason,
        success: model.success,
        ip: model.ip,
        user_agent: model.user_agent,
        created_at: model.created_at,
    })
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), AccountsError> {
        let event = event.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move { insert_outbox_event(txn, &event).await })
            })
            .await
            .context("enqueue outbox event")?;
        Ok(())
    }
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        aggregate_id: Set(event.aggregate_id),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── Address repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: DatabaseConnection,
}

impl AddressRepository for DbAddressRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, AccountsError> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_asc(addresses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list addresses")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AccountsError> {
        let model = addresses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find address by id")?;
        Ok(model.map(address_from_model))
    }

    async fn create(&self, address: &Address) -> Result<(), AccountsError> {
        address_to_active_model(address)
            .insert(&self.db)
            .await
            .context("create address")?;
        Ok(())
    }

    async fn update(&self, address: &Address) -> Result<(), AccountsError> {
        let mut am = address_to_active_model(address);
        am.created_at = sea_orm::ActiveValue::NotSet;
        am.user_id = sea_orm::ActiveValue::NotSet;
        am.update(&self.db).await.context("update address")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AccountsError> {
        let result = addresses::Entity::delete_many()
            .filter(addresses::Column::Id.eq(id))
            .filter(addresses::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete address")?;
        Ok(result.rows_affected > 0)
    }
}

fn address_to_active_model(address: &Address) -> addresses::ActiveModel {
    addresses::ActiveModel {
        id: Set(address.id),
        user_id: Set(address.user_id),
        nickname: Set(address.nickname.clone()),
        street: Set(address.street.clone()),
        number: Set(address.number.clone()),
        complement: Set(address.complement.clone()),
        district: Set(address.district.clone()),
        city: Set(address.city.clone()),
        state: Set(address.state.clone()),
        postal_code: Set(address.postal_code.clone()),
        created_at: Set(address.created_at),
    }
}

fn address_from_model(model: addresses::Model) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        nickname: model.nickname,
        street: model.street,
        number: model.number,
        complement: model.complement,
        district: model.district,
        city: model.city,
        state: model.state,
        postal_code: model.postal_code,
        created_at: model.created_at,
    }
}
