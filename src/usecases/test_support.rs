//! In-memory port doubles for use-case tests.

use crate::domain::{ChatSettings, ChatUserKey, DomainError, PunishmentEvent};
use crate::ports::{EnforcementGateway, StrikeStore};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct MemoryStore {
    strikes: Mutex<HashMap<ChatUserKey, u32>>,
    settings: Mutex<HashMap<i64, ChatSettings>>,
    pub fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::Storage("disk full".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl StrikeStore for MemoryStore {
    async fn increment_strikes(&self, chat_id: i64, user_id: i64) -> Result<u32, DomainError> {
        self.check_writable()?;
        let mut map = self.strikes.lock().unwrap();
        let n = map.entry(ChatUserKey::new(chat_id, user_id)).or_insert(0);
        *n += 1;
        Ok(*n)
    }

    async fn forgive(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.check_writable()?;
        self.strikes
            .lock()
            .unwrap()
            .insert(ChatUserKey::new(chat_id, user_id), 0);
        Ok(())
    }

    async fn get_strikes(&self, chat_id: i64, user_id: i64) -> Result<u32, DomainError> {
        Ok(self
            .strikes
            .lock()
            .unwrap()
            .get(&ChatUserKey::new(chat_id, user_id))
            .copied()
            .unwrap_or(0))
    }

    async fn get_chat_settings(&self, chat_id: i64) -> Result<ChatSettings, DomainError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_welcome(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        self.check_writable()?;
        self.settings
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_default()
            .welcome_text = Some(text.to_string());
        Ok(())
    }

    async fn set_rules(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        self.check_writable()?;
        self.settings
            .lock()
            .unwrap()
            .entry(chat_id)
            .or_default()
            .rules_text = Some(text.to_string());
        Ok(())
    }
}

/// Records every call. `admins` are reported by `is_chat_admin`.
#[derive(Default)]
pub struct RecordingGateway {
    pub enforced: Mutex<Vec<PunishmentEvent>>,
    pub messages: Mutex<Vec<(i64, String)>>,
    pub lifted: Mutex<Vec<ChatUserKey>>,
    pub banned: Mutex<Vec<ChatUserKey>>,
    pub admins: HashSet<ChatUserKey>,
    pub fail_enforce: bool,
    pub fail_admin_lookup: bool,
}

impl RecordingGateway {
    pub fn enforced(&self) -> Vec<PunishmentEvent> {
        self.enforced.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(i64, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EnforcementGateway for RecordingGateway {
    async fn enforce(&self, event: &PunishmentEvent) -> Result<(), DomainError> {
        self.enforced.lock().unwrap().push(event.clone());
        if self.fail_enforce {
            return Err(DomainError::Platform("not enough rights".into()));
        }
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        self.messages
            .lock()
            .unwrap()
            .push((chat_id, text.to_string()));
        Ok(())
    }

    async fn is_chat_admin(&self, chat_id: i64, user_id: i64) -> Result<bool, DomainError> {
        if self.fail_admin_lookup {
            return Err(DomainError::Platform("getChatMember failed".into()));
        }
        Ok(self.admins.contains(&ChatUserKey::new(chat_id, user_id)))
    }

    async fn lift_restrictions(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.lifted
            .lock()
            .unwrap()
            .push(ChatUserKey::new(chat_id, user_id));
        Ok(())
    }

    async fn ban(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.banned
            .lock()
            .unwrap()
            .push(ChatUserKey::new(chat_id, user_id));
        Ok(())
    }
}
