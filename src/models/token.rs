use serde::Deserialize;
use std::fmt;

/// Bearer credential issued by `POST /api/auth`
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    token: String,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            token: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// Never print the credential itself
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token").field("token", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_auth_response() {
        let token: Token = serde_json::from_str(r#"{"token": "abc123"}"#).unwrap();
        assert_eq!(token.as_str(), "abc123");
        assert_eq!(token.bearer(), "Bearer abc123");
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = Token::new("super-secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
