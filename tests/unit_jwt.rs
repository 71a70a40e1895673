use chrono::Utc;

use eadmin_auth::{Role, TokenClaims, TokenError, encode_claims, issue_token, verify_token};
use eadmin_config::JwtConfig;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        token_ttl: 3600,
    }
}

#[test]
fn test_issue_and_verify_every_role() {
    let jwt_config = get_test_jwt_config();

    for role in Role::ALL {
        let token = issue_token("Ana Anić", "ana@uni.rs", role, &jwt_config).unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();

        assert_eq!(claims.name, "Ana Anić");
        assert_eq!(claims.email, "ana@uni.rs");
        assert_eq!(claims.role, role.as_str());
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}

#[test]
fn test_verify_token_wrong_secret() {
    let token = issue_token("Ana", "ana@uni.rs", Role::Student, &get_test_jwt_config()).unwrap();

    let other = JwtConfig {
        secret: "a_completely_different_secret_value".to_string(),
        token_ttl: 3600,
    };

    assert!(matches!(
        verify_token(&token, &other),
        Err(TokenError::Invalid(_))
    ));
}

#[test]
fn test_verify_token_expired() {
    let jwt_config = get_test_jwt_config();
    let now = Utc::now().timestamp() as usize;
    let claims = TokenClaims {
        name: "Ana".to_string(),
        email: "ana@uni.rs".to_string(),
        role: "student".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode_claims(&claims, &jwt_config).unwrap();

    assert!(verify_token(&token, &jwt_config).is_err());
}

#[test]
fn test_verify_token_tampered_payload() {
    let jwt_config = get_test_jwt_config();
    let token = issue_token("Ana", "ana@uni.rs", Role::Student, &jwt_config).unwrap();
    let admin = issue_token("Ana", "ana@uni.rs", Role::FacultyAdmin, &jwt_config).unwrap();

    // Splice the admin payload onto the student's signature.
    let parts: Vec<&str> = token.split('.').collect();
    let admin_parts: Vec<&str> = admin.split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

    assert!(verify_token(&forged, &jwt_config).is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();

    assert!(verify_token("", &jwt_config).is_err());
    assert!(verify_token("not.a.jwt", &jwt_config).is_err());
}
