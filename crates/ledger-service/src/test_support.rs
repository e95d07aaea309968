//! In-memory repository backend for service tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ledger_common::auth::hash_password;
use ledger_core::traits::{
    AccountRepository, LedgerRepository, MessageRepository, RepoResult, SessionRepository,
    UserRepository,
};
use ledger_core::{
    audit, Account, AdjustDirection, BalanceChange, DomainError, GradeChange, Message, NewUser,
    Session, TransferReceipt, User,
};

use crate::services::ServiceContext;

pub const TEST_MASTER_KEY: &str = "test-master-key";

struct StoredUser {
    user: User,
    password_hash: String,
}

/// One backend implements every repository port, so a single instance backs
/// a whole [`ServiceContext`].
#[derive(Default)]
pub struct MemBackend {
    users: Mutex<Vec<StoredUser>>,
    accounts: Mutex<Vec<Account>>,
    sessions: Mutex<Vec<Session>>,
    messages: Mutex<Vec<Message>>,
    next_id: AtomicI64,
}

impl MemBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Register a user with an account at the given starting balance.
    pub fn seed_user(&self, username: &str, phone_number: &str, password: &str, balance: i64) {
        let now = Utc::now();
        let id = self.next_id();
        self.users.lock().unwrap().push(StoredUser {
            user: User {
                id,
                username: username.to_string(),
                phone_number: phone_number.to_string(),
                display_name: format!("{username} display"),
                created_at: now,
                updated_at: now,
            },
            password_hash: hash_password(password).unwrap(),
        });
        self.accounts.lock().unwrap().push(Account {
            id: self.next_id(),
            username: username.to_string(),
            phone_number: phone_number.to_string(),
            balance,
            grade: None,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn seed_session(&self, username: &str, key: &str, expires_at: DateTime<Utc>) {
        self.sessions.lock().unwrap().push(Session {
            id: self.next_id(),
            username: username.to_string(),
            key: key.to_string(),
            expires_at,
            created_at: Utc::now(),
        });
    }

    pub fn balance_of(&self, username: &str) -> i64 {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.balance)
            .unwrap()
    }

    pub fn messages_of(&self, username: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.username == username)
            .map(|m| m.content.clone())
            .collect()
    }

    /// Append a message with an explicit timestamp, for ordering tests.
    pub fn seed_message(&self, username: &str, content: &str, at: DateTime<Utc>) {
        self.append_message(username, content, at);
    }

    fn append_message(&self, username: &str, content: &str, now: DateTime<Utc>) {
        self.messages.lock().unwrap().push(Message {
            id: self.next_id(),
            username: username.to_string(),
            content: content.to_string(),
            date: now,
            time: Message::time_of_day(now),
            expires_at: Message::expiry_for(now),
        });
    }
}

#[async_trait]
impl UserRepository for MemBackend {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.username == username)
            .map(|s| s.user.clone()))
    }

    async fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.phone_number == phone_number)
            .map(|s| s.user.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(UserRepository::find_by_username(self, username)
            .await?
            .is_some())
    }

    async fn phone_exists(&self, phone_number: &str) -> RepoResult<bool> {
        Ok(UserRepository::find_by_phone(self, phone_number)
            .await?
            .is_some())
    }

    async fn create_with_account(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        if self.username_exists(&user.username).await? {
            return Err(DomainError::UsernameTaken);
        }
        if self.phone_exists(&user.phone_number).await? {
            return Err(DomainError::PhoneNumberTaken);
        }

        let now = Utc::now();
        let created = User {
            id: self.next_id(),
            username: user.username.clone(),
            phone_number: user.phone_number.clone(),
            display_name: user.display_name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(StoredUser {
            user: created.clone(),
            password_hash: password_hash.to_string(),
        });
        self.accounts.lock().unwrap().push(Account {
            id: self.next_id(),
            username: user.username.clone(),
            phone_number: user.phone_number.clone(),
            balance: 0,
            grade: None,
            created_at: now,
            updated_at: now,
        });
        Ok(created)
    }

    async fn get_password_hash(&self, username: &str) -> RepoResult<Option<String>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.username == username)
            .map(|s| s.password_hash.clone()))
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|s| s.user.username == username)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        stored.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_display_name(&self, username: &str, display_name: &str) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|s| s.user.username == username)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        stored.user.display_name = display_name.to_string();
        stored.user.updated_at = Utc::now();
        Ok(stored.user.clone())
    }

    async fn update_phone_number(&self, username: &str, phone_number: &str) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|s| s.user.username == username)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        stored.user.phone_number = phone_number.to_string();
        stored.user.updated_at = Utc::now();
        let updated = stored.user.clone();
        drop(users);

        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.username == username) {
            account.phone_number = phone_number.to_string();
            account.updated_at = Utc::now();
        }
        Ok(updated)
    }

    async fn rename(&self, username: &str, new_username: &str) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|s| s.user.username == username)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        stored.user.username = new_username.to_string();
        stored.user.updated_at = Utc::now();
        let updated = stored.user.clone();
        drop(users);

        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.username == username) {
            account.username = new_username.to_string();
            account.updated_at = Utc::now();
        }
        drop(accounts);

        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.username != username);
        Ok(updated)
    }

    async fn list(&self, limit: i64) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.user.clone())
            .collect();
        users.sort_by(|a, b| b.id.cmp(&a.id));
        users.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(users)
    }
}

#[async_trait]
impl AccountRepository for MemBackend {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.phone_number == phone_number)
            .cloned())
    }
}

#[async_trait]
impl LedgerRepository for MemBackend {
    async fn adjust(
        &self,
        username: &str,
        amount: i64,
        direction: AdjustDirection,
    ) -> RepoResult<BalanceChange> {
        if amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }

        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.username == username)
            .ok_or_else(|| DomainError::AccountNotFound(username.to_string()))?;

        if direction == AdjustDirection::Debit && account.balance < amount {
            return Err(DomainError::InsufficientFunds);
        }

        let old_balance = account.balance;
        account.balance = old_balance + direction.signed(amount);
        let new_balance = account.balance;
        drop(accounts);

        self.append_message(
            username,
            &audit::balance_adjusted(old_balance, new_balance),
            Utc::now(),
        );

        Ok(BalanceChange {
            username: username.to_string(),
            old_balance,
            new_balance,
        })
    }

    async fn transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: i64,
    ) -> RepoResult<TransferReceipt> {
        if amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }
        if sender == recipient {
            return Err(DomainError::SelfTransfer);
        }

        let mut accounts = self.accounts.lock().unwrap();

        let sender_balance = accounts
            .iter()
            .find(|a| a.username == sender)
            .ok_or_else(|| DomainError::AccountNotFound(sender.to_string()))?
            .balance;
        if !accounts.iter().any(|a| a.username == recipient) {
            return Err(DomainError::AccountNotFound(recipient.to_string()));
        }
        if sender_balance < amount {
            return Err(DomainError::InsufficientFunds);
        }

        let mut new_sender_balance = 0;
        let mut new_recipient_balance = 0;
        for account in accounts.iter_mut() {
            if account.username == sender {
                account.balance -= amount;
                new_sender_balance = account.balance;
            } else if account.username == recipient {
                account.balance += amount;
                new_recipient_balance = account.balance;
            }
        }
        drop(accounts);

        let now = Utc::now();
        self.append_message(sender, &audit::transfer_sent(amount, recipient), now);
        self.append_message(recipient, &audit::transfer_received(amount, sender), now);

        Ok(TransferReceipt {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
            sender_balance: new_sender_balance,
            recipient_balance: new_recipient_balance,
        })
    }

    async fn set_grade(&self, username: &str, grade: &str) -> RepoResult<GradeChange> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.username == username)
            .ok_or_else(|| DomainError::AccountNotFound(username.to_string()))?;

        let old_grade = account.grade.clone();
        account.grade = Some(grade.to_string());
        drop(accounts);

        self.append_message(
            username,
            &audit::grade_changed(old_grade.as_deref(), grade),
            Utc::now(),
        );

        Ok(GradeChange {
            username: username.to_string(),
            old_grade,
            new_grade: grade.to_string(),
        })
    }
}

#[async_trait]
impl SessionRepository for MemBackend {
    async fn find_live_by_key(&self, key: &str, now: DateTime<Utc>) -> RepoResult<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.key == key && s.expires_at > now)
            .cloned())
    }

    async fn find_live_by_username(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.username == username && s.expires_at > now)
            .cloned())
    }

    async fn upsert(
        &self,
        username: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|s| s.username != username);
        let session = Session {
            id: self.next_id(),
            username: username.to_string(),
            key: key.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[async_trait]
impl MessageRepository for MemBackend {
    async fn list_recent(&self, username: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.username == username)
            .cloned()
            .collect();
        messages.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.time.cmp(&a.time))
                .then(a.id.cmp(&b.id))
        });
        messages.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(messages)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| m.expires_at > now);
        Ok((before - messages.len()) as u64)
    }
}

/// Build a service context over a shared in-memory backend.
pub fn test_context(backend: &Arc<MemBackend>) -> ServiceContext {
    ServiceContext::builder()
        .users(backend.clone())
        .accounts(backend.clone())
        .ledger(backend.clone())
        .sessions(backend.clone())
        .messages(backend.clone())
        .master_key(TEST_MASTER_KEY)
        .build()
        .unwrap()
}
