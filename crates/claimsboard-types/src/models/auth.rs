use serde::{Deserialize, Serialize};

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Absent in the login response, present after registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// `POST /auth/login` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// `POST /auth/login` response data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_data_camel_case() {
        let json = r#"{
            "token": "jwt.abc",
            "user": { "userId": "u-1", "email": "jane@example.com", "firstName": "Jane", "lastName": "Doe" }
        }"#;
        let data: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(data.user.user_id, "u-1");
        assert!(data.user.created_at.is_none());
        assert_eq!(data.user.display_name(), "Jane Doe");
    }

    #[test]
    fn test_register_payload_serializes_camel_case() {
        let payload = RegisterPayload {
            email: "jane@example.com".into(),
            password: "secret123".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["lastName"], "Doe");
    }
}
