/// Login and signup bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Login request; the username is the account email
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Signup request
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(custom(function = "not_blank"))]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,

    /// "First Last"; split on the first space
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
}

/// Successful login payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub role_id: i32,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_missing_fields_fail_validation() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"a@b.com"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"a@b.com","password":"pw"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_request_rejects_blank_name() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pw","fullName":"   "}"#)
                .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
    }
}
