//! Role gates used by the handlers.
//!
//! A caller whose role is not in the allowed set, including a token that
//! carries an unknown role string, is rejected with 403.

use anyhow::anyhow;

use eadmin_auth::Role;
use eadmin_core::AppError;

use crate::middleware::auth::AuthUser;

/// Rejects the caller with 403 unless their token carries `required_role`.
///
/// # Example
///
/// ```rust,ignore
/// use crate::middleware::role::check_role;
/// use eadmin_auth::Role;
///
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     check_role(&auth_user, Role::Professor)?;
///     // Handler logic
/// }
/// ```
pub fn check_role(auth_user: &AuthUser, required_role: Role) -> Result<(), AppError> {
    check_any_role(auth_user, &[required_role])
}

/// Lets the caller through when their role is one of `allowed_roles`, 403 otherwise.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    match auth_user.role() {
        Some(role) if allowed_roles.contains(&role) => Ok(()),
        _ => Err(AppError::forbidden(anyhow!(
            "access denied: requires role {}",
            describe(allowed_roles)
        ))),
    }
}

fn describe(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn user_with_role(role: &str) -> AuthUser {
        AuthUser {
            email: "user@uni.rs".to_string(),
            role: role.to_string(),
            token: "t".to_string(),
        }
    }

    #[test]
    fn test_check_role_allows_matching_role() {
        assert!(check_role(&user_with_role("professor"), Role::Professor).is_ok());
    }

    #[test]
    fn test_check_role_rejects_other_roles() {
        let err = check_role(&user_with_role("student"), Role::Professor).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "access denied: requires role professor");
    }

    #[test]
    fn test_check_any_role() {
        let allowed = [Role::Employee, Role::SszAdmin];
        assert!(check_any_role(&user_with_role("sszadmin"), &allowed).is_ok());
        let err = check_any_role(&user_with_role("candidate"), &allowed).unwrap_err();
        assert_eq!(err.message(), "access denied: requires role employee or sszadmin");
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        let err = check_role(&user_with_role("janitor"), Role::Student).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
