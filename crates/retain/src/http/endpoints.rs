//! Endpoint paths and credential exchange wire types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Credential exchange: username + password for an access/refresh pair.
pub const TOKEN: &str = "/token/";

/// Refresh exchange: refresh credential for a new access credential.
pub const TOKEN_REFRESH: &str = "/token/refresh/";

pub const REGISTER: &str = "/register/";
pub const PREDICT: &str = "/predict/";
pub const STUDENTS: &str = "/students/";
pub const CLASS_AVERAGE: &str = "/class-average/";
pub const HEALTH: &str = "/health/";
pub const UPLOAD: &str = "/upload/";
pub const SUPPORT: &str = "/support/";
pub const NOTIFICATIONS: &str = "/notifications/";
pub const NOTIFICATIONS_MARK_ALL_READ: &str = "/notifications/mark_all_read/";

/// `/students/{id}/`
pub fn student(id: i64) -> String {
    format!("{}{}/", STUDENTS, id)
}

/// `/notifications/{id}/mark_read/`
pub fn notification_mark_read(id: i64) -> String {
    format!("{}{}/mark_read/", NOTIFICATIONS, id)
}

// ============================================================================
// Credential Exchange Types
// ============================================================================

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
pub struct TokenRefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response from the refresh endpoint.
///
/// The refresh credential is only present when the server rotates it.
#[derive(Debug, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_paths() {
        assert_eq!(student(42), "/students/42/");
        assert_eq!(notification_mark_read(7), "/notifications/7/mark_read/");
    }

    #[test]
    fn refresh_response_rotation_is_optional() {
        let plain: TokenRefreshResponse = serde_json::from_str(r#"{"access":"A2"}"#).unwrap();
        assert_eq!(plain.refresh, None);

        let rotated: TokenRefreshResponse =
            serde_json::from_str(r#"{"access":"A2","refresh":"R2"}"#).unwrap();
        assert_eq!(rotated.refresh.as_deref(), Some("R2"));
    }
}
