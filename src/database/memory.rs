use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{RecordStore, UpdateOutcome};
use crate::utils::AppError;

/// In-process `RecordStore` used by the unit tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<Document>>,
    resorts: RwLock<Vec<Document>>,
    failing: bool,
    stale_reads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resorts(resorts: Vec<Document>) -> Self {
        Self {
            resorts: RwLock::new(resorts),
            ..Self::default()
        }
    }

    /// A store whose every call fails, for the 500 paths.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// A store whose `find_user` never sees existing users, as when two
    /// inserts for the same email race past the lookup.
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing {
            Err(AppError::Store("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn has_email(doc: &Document, email: &str) -> bool {
    matches!(doc.get_str("email"), Ok(e) if e == email)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_user(&self, email: &str) -> Result<Option<Document>, AppError> {
        self.check()?;
        if self.stale_reads {
            return Ok(None);
        }
        let users = self.users.read().await;
        Ok(users.iter().find(|u| has_email(u, email)).cloned())
    }

    async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        self.check()?;
        Ok(self.users.read().await.clone())
    }

    async fn insert_user(&self, mut user: Document) -> Result<Bson, AppError> {
        self.check()?;
        let mut users = self.users.write().await;

        if let Ok(email) = user.get_str("email") {
            if users.iter().any(|u| has_email(u, email)) {
                return Err(AppError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
        }

        let id = match user.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                user.insert("_id", id.clone());
                id
            }
        };
        users.push(user);
        Ok(id)
    }

    async fn update_user(&self, email: &str, fields: Document) -> Result<UpdateOutcome, AppError> {
        self.check()?;
        let mut users = self.users.write().await;

        let Some(user) = users.iter_mut().find(|u| has_email(u, email)) else {
            return Ok(UpdateOutcome { matched: 0, modified: 0 });
        };

        let mut changed = false;
        for (key, value) in fields {
            if user.get(&key) != Some(&value) {
                user.insert(key, value);
                changed = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn list_resorts(&self) -> Result<Vec<Document>, AppError> {
        self.check()?;
        Ok(self.resorts.read().await.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}
