use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::{IntoParams, ToSchema};

pub const EMAIL: &str = "email";
pub const NAME: &str = "name";
pub const IS_ADMIN: &str = "isAdmin";
pub const AGE: &str = "age";
pub const SECURITY_DEPOSIT: &str = "securityDeposit";
pub const ID_NUMBER: &str = "idNumber";
pub const OBJECT_ID: &str = "_id";

/// Body of `POST /users`. Unknown fields are kept in `extra` and stored verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "isAdmin", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub age: Option<Number>,
    #[serde(rename = "securityDeposit", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub security_deposit: Option<Number>,
    #[serde(rename = "idNumber", skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

/// Body of `PATCH /update-user`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub email: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
}

/// Body of `PATCH /update-user-info`: `email` selects the record, every other
/// top-level field is written to it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateInfoRequest {
    pub email: Option<String>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Email of the user to fetch
    pub email: Option<String>,
}

/// Returns the trimmed value when it is present and not blank.
pub fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Checks the JSON type of a field this service knows about. Unknown fields pass.
pub fn check_field_type(key: &str, value: &Value) -> Result<(), String> {
    let ok = match key {
        NAME | ID_NUMBER => value.is_string(),
        IS_ADMIN => value.is_boolean(),
        AGE | SECURITY_DEPOSIT => value.is_number(),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(format!("Field '{}' has an invalid type", key))
    }
}

/// Field names the store would read as operators or nested paths are refused.
pub fn check_field_name(key: &str) -> Result<(), String> {
    if key.starts_with('$') || key.contains('.') {
        Err(format!("Field name '{}' is not allowed", key))
    } else {
        Ok(())
    }
}
