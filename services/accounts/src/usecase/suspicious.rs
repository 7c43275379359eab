//! New-device heuristic run after every successful login.

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{LoginHistoryRepository, OutboxRepository};
use crate::domain::types::{
    ClientInfo, EVENT_SUSPICIOUS_LOGIN, OutboxEvent, SUSPICIOUS_LOOKBACK_DAYS, SUSPICIOUS_SAMPLE,
    user_agent_prefix,
};
use crate::error::AccountsError;

pub struct SuspiciousLoginCheck<H: LoginHistoryRepository, O: OutboxRepository> {
    pub history: H,
    pub outbox: O,
}

impl<H: LoginHistoryRepository, O: OutboxRepository> SuspiciousLoginCheck<H, O> {
    /// Compare this login against the user's recent successful logins. When
    /// neither the IP nor the user-agent prefix was seen before, enqueue a
    /// `suspicious_login` alert. No prior history is never suspicious.
    ///
    /// Returns whether an alert was enqueued.
    pub async fn execute(
        &self,
        user_id: Uuid,
        login_id: Uuid,
        client: &ClientInfo,
    ) -> Result<bool, AccountsError> {
        let since = Utc::now() - Duration::days(SUSPICIOUS_LOOKBACK_DAYS);
        let recent = self
            .history
            .recent_successes(user_id, since, login_id, SUSPICIOUS_SAMPLE)
            .await?;
        if recent.is_empty() {
            return Ok(false);
        }

        let known_ip = client
            .ip
            .as_deref()
            .is_some_and(|ip| recent.iter().any(|r| r.ip.as_deref() == Some(ip)));
        let known_agent = client.user_agent_prefix().is_some_and(|prefix| {
            recent.iter().any(|r| {
                r.user_agent.as_deref().and_then(user_agent_prefix) == Some(prefix)
            })
        });
        if known_ip || known_agent {
            return Ok(false);
        }

        let event = OutboxEvent::new(
            EVENT_SUSPICIOUS_LOGIN,
            user_id,
            json!({
                "loginId": login_id,
                "ip": client.ip,
                "userAgent": client.user_agent,
            }),
        );
        self.outbox.enqueue(&event).await?;
        tracing::info!(%user_id, %login_id, "suspicious login flagged");
        Ok(true)
    }

    /// Run [`Self::execute`], logging failures instead of returning them.
    pub async fn run_logged(&self, user_id: Uuid, login_id: Uuid, client: ClientInfo) {
        if let Err(e) = self.execute(user_id, login_id, &client).await {
            tracing::warn!(error = ?e, %user_id, "suspicious-login check failed");
        }
    }
}
