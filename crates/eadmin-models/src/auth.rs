//! Payloads of the auth service.
//!
//! Register and login bodies are deserialized leniently (every field
//! defaults to an empty string) so that the handlers can trim and report
//! missing fields with one fixed message instead of a serde error.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default, rename = "fullName")]
    #[schema(example = "Ana Anić")]
    pub full_name: String,
    #[serde(default)]
    #[schema(example = "ana@uni.rs")]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// One of `student`, `professor`, `employee`, `candidate`. Defaults to `candidate`.
    #[serde(default)]
    #[schema(example = "student")]
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "ana@uni.rs")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Stored credentials, loaded only by the login flow.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUserResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub ok: bool,
    pub email: String,
    pub role: String,
}

/// `?role=a&role=b&any=c,d`; every listed role is accepted.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeParams {
    /// Repeatable role parameter
    #[serde(default)]
    pub role: Vec<String>,
    /// Comma separated roles
    #[serde(default)]
    pub any: Option<String>,
}

impl AuthorizeParams {
    /// Flattens both parameter styles into one lowercase set.
    pub fn requested_roles(&self) -> Vec<String> {
        let from_any = self
            .any
            .iter()
            .flat_map(|list| list.split(','))
            .map(str::to_string);

        self.role
            .iter()
            .cloned()
            .chain(from_any)
            .map(|r| r.trim().to_ascii_lowercase())
            .filter(|r| !r.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorizeResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert!(req.full_name.is_empty());
        assert!(req.role.is_empty());
    }

    #[test]
    fn test_register_request_reads_camel_case_name() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"fullName":"Ana","email":"a@x.com","password":"p"}"#)
                .unwrap();
        assert_eq!(req.full_name, "Ana");
    }

    #[test]
    fn test_auth_user_serializes_full_name() {
        let user = AuthUserResponse {
            id: Uuid::nil(),
            full_name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            role: "student".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["fullName"], "Ana");
    }

    #[test]
    fn test_requested_roles_merges_both_styles() {
        let params = AuthorizeParams {
            role: vec!["Student".to_string()],
            any: Some("professor, ,employee".to_string()),
        };
        assert_eq!(
            params.requested_roles(),
            vec!["student", "professor", "employee"]
        );
    }

    #[test]
    fn test_authorize_response_omits_empty_fields() {
        let denied = AuthorizeResponse {
            allowed: false,
            email: None,
            role: "student".to_string(),
            reason: Some("insufficient role".to_string()),
        };
        let json = serde_json::to_value(&denied).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["reason"], "insufficient role");
    }
}
