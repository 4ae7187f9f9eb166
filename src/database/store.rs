use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Collection, Database};

use super::MongoDB;
use crate::utils::AppError;

/// Result of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Single-document operations the record service needs from the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_user(&self, email: &str) -> Result<Option<Document>, AppError>;

    async fn list_users(&self) -> Result<Vec<Document>, AppError>;

    /// Inserts a user and returns the identifier the store generated.
    async fn insert_user(&self, user: Document) -> Result<Bson, AppError>;

    /// Applies `fields` with `$set` to the user with this email.
    async fn update_user(&self, email: &str, fields: Document) -> Result<UpdateOutcome, AppError>;

    async fn list_resorts(&self) -> Result<Vec<Document>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// `RecordStore` over the two MongoDB collections.
pub struct MongoStore {
    db: Database,
    users: Collection<Document>,
    resorts: Collection<Document>,
}

impl MongoStore {
    pub fn new(db: &MongoDB, users_collection: &str, resorts_collection: &str) -> Self {
        Self {
            db: db.database().clone(),
            users: db.collection(users_collection),
            resorts: db.collection(resorts_collection),
        }
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn find_user(&self, email: &str) -> Result<Option<Document>, AppError> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self.users.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_user(&self, user: Document) -> Result<Bson, AppError> {
        let result = self.users.insert_one(user).await?;
        Ok(result.inserted_id)
    }

    async fn update_user(&self, email: &str, fields: Document) -> Result<UpdateOutcome, AppError> {
        let result = self
            .users
            .update_one(doc! { "email": email }, doc! { "$set": fields })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn list_resorts(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self.resorts.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
