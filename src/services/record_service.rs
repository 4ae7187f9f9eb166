// ==================== RECORD SERVICE ====================
// Users and resorts over the document store. Each operation is one request
// against the store; the store serializes concurrent writes.

use mongodb::bson::{to_bson, to_document, Document};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    database::RecordStore,
    models::{
        self, document_to_json, id_to_string, required, CreateUserRequest, UpdateInfoRequest,
        UpdateRoleRequest,
    },
    utils::AppError,
};

/// Handles shared by every request handler.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Inserts a new user. An existing email is rejected with `Conflict` and the
    /// stored record is left untouched. Returns the generated id.
    pub async fn create_user(&self, mut request: CreateUserRequest) -> Result<String, AppError> {
        let (Some(email), Some(_)) = (
            required(request.email.as_deref()),
            required(request.name.as_deref()),
        ) else {
            return Err(AppError::Validation("Name and email are required".to_string()));
        };
        let email = email.to_string();

        request.extra.remove(models::OBJECT_ID);
        for key in request.extra.keys() {
            models::check_field_name(key).map_err(AppError::Validation)?;
        }

        if self.store.find_user(&email).await?.is_some() {
            log::warn!("⚠️ User already exists: {}", email);
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        request.email = Some(email.clone());
        request.is_admin = Some(request.is_admin.unwrap_or(false));
        let user = to_document(&request)?;

        let id = self.store.insert_user(user).await?;
        log::info!("✅ User created: {}", email);

        Ok(id_to_string(&id))
    }

    pub async fn get_user(&self, email: Option<&str>) -> Result<Value, AppError> {
        let email = required(email).ok_or_else(|| {
            AppError::Validation("Email query parameter is required".to_string())
        })?;

        self.store
            .find_user(email)
            .await?
            .map(document_to_json)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Every user record, in store order. Unbounded.
    pub async fn list_users(&self) -> Result<Vec<Value>, AppError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(document_to_json).collect())
    }

    /// Sets the admin flag. An update that changes nothing counts as not found.
    pub async fn update_user_role(&self, request: UpdateRoleRequest) -> Result<(), AppError> {
        let (Some(email), Some(is_admin)) = (required(request.email.as_deref()), request.is_admin)
        else {
            return Err(AppError::Validation(
                "Email and a boolean isAdmin are required".to_string(),
            ));
        };

        let mut fields = Document::new();
        fields.insert(models::IS_ADMIN, is_admin);

        let outcome = self.store.update_user(email, fields).await?;
        if outcome.matched == 0 || outcome.modified == 0 {
            return Err(AppError::NotFound(
                "User not found or role unchanged".to_string(),
            ));
        }

        log::info!("✅ Role updated for {}: isAdmin={}", email, is_admin);
        Ok(())
    }

    /// Writes every payload field except `email` (and `_id`) onto the user.
    pub async fn update_user_info(&self, request: UpdateInfoRequest) -> Result<u64, AppError> {
        let email = required(request.email.as_deref())
            .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;

        let mut fields = Document::new();
        for (key, value) in request.fields {
            if key == models::OBJECT_ID || key == models::EMAIL {
                continue;
            }
            models::check_field_name(&key).map_err(AppError::Validation)?;
            models::check_field_type(&key, &value).map_err(AppError::Validation)?;
            fields.insert(key, to_bson(&value)?);
        }

        if fields.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        let outcome = self.store.update_user(email, fields).await?;
        if outcome.matched == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        log::info!("✅ Info updated for {} ({} modified)", email, outcome.modified);
        Ok(outcome.modified)
    }

    /// Every resort record, in store order. Unbounded.
    pub async fn list_resorts(&self) -> Result<Vec<Value>, AppError> {
        let resorts = self.store.list_resorts().await?;
        Ok(resorts.into_iter().map(document_to_json).collect())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use actix_web::{http::StatusCode, ResponseError};
    use serde_json::json;

    fn service() -> (RecordService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (RecordService::new(store.clone()), store)
    }

    fn create_request(body: Value) -> CreateUserRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (service, _) = service();

        let id = service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();
        assert_eq!(id.len(), 24);

        let user = service.get_user(Some("a@x.com")).await.unwrap();
        assert_eq!(user["name"], "Ana");
        assert_eq!(user["email"], "a@x.com");
        assert_eq!(user["isAdmin"], false);
        assert_eq!(user["_id"], json!(id));
    }

    #[tokio::test]
    async fn test_create_keeps_extra_fields() {
        let (service, _) = service();

        service
            .create_user(create_request(json!({
                "name": "Bo",
                "email": "b@x.com",
                "age": 40,
                "idNumber": "X-1",
                "address": { "city": "Lima" }
            })))
            .await
            .unwrap();

        let user = service.get_user(Some("b@x.com")).await.unwrap();
        assert_eq!(user["age"], 40);
        assert_eq!(user["idNumber"], "X-1");
        assert_eq!(user["address"]["city"], "Lima");
    }

    #[tokio::test]
    async fn test_create_requires_name_and_email() {
        let (service, store) = service();

        let missing_name = service
            .create_user(create_request(json!({ "email": "a@x.com" })))
            .await;
        assert!(matches!(missing_name, Err(AppError::Validation(_))));

        let blank_email = service
            .create_user(create_request(json!({ "name": "Ana", "email": "  " })))
            .await;
        assert!(matches!(blank_email, Err(AppError::Validation(_))));

        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_keeps_record() {
        let (service, store) = service();

        service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();
        let second = service
            .create_user(create_request(json!({ "name": "Other", "email": "a@x.com" })))
            .await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.user_count().await, 1);
        let user = service.get_user(Some("a@x.com")).await.unwrap();
        assert_eq!(user["name"], "Ana");
    }

    #[tokio::test]
    async fn test_insert_conflict_when_lookup_misses() {
        let store = Arc::new(MemoryStore::with_stale_reads());
        let service = RecordService::new(store.clone());

        service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();
        let second = service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await;

        let err = second.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_dotted_field_names_rejected() {
        let (service, store) = service();

        let created = service
            .create_user(create_request(json!({
                "name": "Ana",
                "email": "a@x.com",
                "address.city": "Lima"
            })))
            .await;
        assert!(matches!(created, Err(AppError::Validation(_))));
        assert_eq!(store.user_count().await, 0);

        service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();
        let request: UpdateInfoRequest =
            serde_json::from_value(json!({ "email": "a@x.com", "address.city": "Lima" }))
                .unwrap();
        assert!(matches!(
            service.update_user_info(request).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_user_requires_email() {
        let (service, _) = service();

        assert!(matches!(service.get_user(None).await, Err(AppError::Validation(_))));
        assert!(matches!(service.get_user(Some("")).await, Err(AppError::Validation(_))));
        assert!(matches!(
            service.get_user(Some("nobody@x.com")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_role() {
        let (service, store) = service();
        service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();

        let request = UpdateRoleRequest {
            email: Some("a@x.com".into()),
            is_admin: Some(true),
        };
        service.update_user_role(request.clone()).await.unwrap();
        let user = service.get_user(Some("a@x.com")).await.unwrap();
        assert_eq!(user["isAdmin"], true);

        // Same value again: nothing modified.
        assert!(matches!(
            service.update_user_role(request).await,
            Err(AppError::NotFound(_))
        ));

        let missing = service
            .update_user_role(UpdateRoleRequest {
                email: Some("missing@x.com".into()),
                is_admin: Some(true),
            })
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_role_requires_flag() {
        let (service, _) = service();
        let res = service
            .update_user_role(UpdateRoleRequest {
                email: Some("a@x.com".into()),
                is_admin: None,
            })
            .await;
        assert!(matches!(res, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_info_applies_all_fields_but_email() {
        let (service, _) = service();
        service
            .create_user(create_request(json!({ "name": "Ana", "email": "a@x.com" })))
            .await
            .unwrap();

        let request: UpdateInfoRequest = serde_json::from_value(json!({
            "email": "a@x.com",
            "age": 29,
            "securityDeposit": 150.5,
            "phone": "555-0101"
        }))
        .unwrap();
        let modified = service.update_user_info(request).await.unwrap();
        assert_eq!(modified, 1);

        let user = service.get_user(Some("a@x.com")).await.unwrap();
        assert_eq!(user["age"], 29);
        assert_eq!(user["securityDeposit"], 150.5);
        assert_eq!(user["phone"], "555-0101");
        assert_eq!(user["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_update_info_errors() {
        let (service, _) = service();

        let no_email: UpdateInfoRequest = serde_json::from_value(json!({ "age": 3 })).unwrap();
        assert!(matches!(
            service.update_user_info(no_email).await,
            Err(AppError::Validation(_))
        ));

        let nothing: UpdateInfoRequest =
            serde_json::from_value(json!({ "email": "a@x.com" })).unwrap();
        assert!(matches!(
            service.update_user_info(nothing).await,
            Err(AppError::Validation(_))
        ));

        let bad_type: UpdateInfoRequest =
            serde_json::from_value(json!({ "email": "a@x.com", "age": "old" })).unwrap();
        assert!(matches!(
            service.update_user_info(bad_type).await,
            Err(AppError::Validation(_))
        ));

        let missing: UpdateInfoRequest =
            serde_json::from_value(json!({ "email": "missing@x.com", "age": 3 })).unwrap();
        assert!(matches!(
            service.update_user_info(missing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lists_on_empty_store() {
        let (service, _) = service();
        assert!(service.list_users().await.unwrap().is_empty());
        assert!(service.list_resorts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_error() {
        let service = RecordService::new(Arc::new(MemoryStore::failing()));
        assert!(matches!(service.list_users().await, Err(AppError::Store(_))));
        assert!(matches!(
            service.get_user(Some("a@x.com")).await,
            Err(AppError::Store(_))
        ));
    }
}
