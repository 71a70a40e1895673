use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload embedded in every issued token.
///
/// `name`, `email` and `role` decode as empty strings when absent so that
/// tokens missing an optional field still verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let json = r#"{"email":"a@x.com","iat":1,"exp":9999999999}"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name, "");
        assert_eq!(claims.role, "");
    }

    #[test]
    fn test_serialize_field_names() {
        let claims = TokenClaims {
            name: "Ana".to_string(),
            email: "ana@uni.rs".to_string(),
            role: "student".to_string(),
            iat: 10,
            exp: 20,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["name"], "Ana");
        assert_eq!(value["role"], "student");
        assert_eq!(value["exp"], 20);
    }
}
