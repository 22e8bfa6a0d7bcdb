//! Minimal Telegram Bot API client over reqwest.
//!
//! Every method is a JSON POST to `https://api.telegram.org/bot<token>/<method>`.
//! Failures come back as `{"ok": false, "description": …}` (often with a non-2xx status);
//! `parameters.retry_after` is surfaced as `DomainError::FloodWait`.

use crate::adapters::telegram::mapper::Update;
use crate::domain::DomainError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const API_BASE: &str = "https://api.telegram.org";

/// Response envelope shared by all Bot API methods.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self, method: &str) -> Result<T, DomainError> {
        if let Some(seconds) = self.parameters.as_ref().and_then(|p| p.retry_after) {
            return Err(DomainError::FloodWait { seconds });
        }
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(DomainError::Platform(format!(
                "{} failed ({}): {}",
                method,
                self.error_code.unwrap_or_default(),
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

/// Member permissions as sent to `restrictChatMember`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatPermissions {
    pub can_send_messages: bool,
    pub can_send_polls: bool,
    pub can_send_other_messages: bool,
    pub can_add_web_page_previews: bool,
    pub can_invite_users: bool,
}

impl ChatPermissions {
    /// Read-only member.
    pub fn muted() -> Self {
        Self {
            can_send_messages: false,
            can_send_polls: false,
            can_send_other_messages: false,
            can_add_web_page_previews: false,
            can_invite_users: false,
        }
    }

    /// Ordinary member rights restored by a manual unrestrict.
    pub fn member_defaults() -> Self {
        Self {
            can_send_messages: true,
            can_send_polls: true,
            can_send_other_messages: true,
            can_add_web_page_previews: true,
            can_invite_users: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
}

pub struct BotApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl BotApiClient {
    /// `request_timeout` must exceed the long-poll timeout used with `get_updates`.
    pub fn new(token: &str, request_timeout: Duration) -> Result<Self, DomainError> {
        Self::with_base_url(format!("{API_BASE}/bot{token}"), request_timeout)
    }

    /// Point the client at another Bot API server (self-hosted `telegram-bot-api`).
    pub fn with_base_url(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, DomainError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, method);
        let res = self
            .client
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| DomainError::Platform(format!("{method} request failed: {e}")))?;

        let status = res.status();
        let body: ApiResponse<R> = res.json().await.map_err(|e| {
            warn!(method, status = %status, error = %e, "unparseable Bot API response");
            DomainError::Platform(format!("{method} HTTP {status}: {e}"))
        })?;
        body.into_result(method)
    }

    /// Long-poll for updates with `update_id >= offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, DomainError> {
        let params = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        let updates: Vec<Update> = self.call("getUpdates", &params).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), offset, "received updates");
        }
        Ok(updates)
    }

    /// Long polling is rejected while a webhook is set.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), DomainError> {
        let params = serde_json::json!({ "drop_pending_updates": drop_pending_updates });
        let _: bool = self.call("deleteWebhook", &params).await?;
        Ok(())
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        let params = serde_json::json!({ "chat_id": chat_id, "text": text });
        let _: serde_json::Value = self.call("sendMessage", &params).await?;
        Ok(())
    }

    /// `until_date` is a unix timestamp; `None` restricts until lifted.
    pub async fn restrict_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        permissions: ChatPermissions,
        until_date: Option<i64>,
    ) -> Result<(), DomainError> {
        let mut params = serde_json::json!({
            "chat_id": chat_id,
            "user_id": user_id,
            "permissions": permissions,
        });
        if let Some(until) = until_date {
            params["until_date"] = serde_json::Value::from(until);
        }
        let _: bool = self.call("restrictChatMember", &params).await?;
        Ok(())
    }

    pub async fn ban_chat_member(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        let params = serde_json::json!({ "chat_id": chat_id, "user_id": user_id });
        let _: bool = self.call("banChatMember", &params).await?;
        Ok(())
    }

    /// Member status: "creator", "administrator", "member", "restricted", "left" or "kicked".
    pub async fn get_chat_member_status(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<String, DomainError> {
        let params = serde_json::json!({ "chat_id": chat_id, "user_id": user_id });
        let member: ChatMember = self.call("getChatMember", &params).await?;
        Ok(member.status)
    }
}
