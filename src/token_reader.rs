use serde_json::Value;

use crate::{Error, Result, ACCESS_TOKEN_KEY};

/// Represents response of the authorization code exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenExchange {
    /// OAuth access token, if the payload carried one
    pub access_token: Option<String>,
    /// The full decoded payload, including the `user` object
    pub raw: Value,
}

impl TokenExchange {
    pub fn from_value(raw: Value) -> Self {
        let access_token = raw
            .get(ACCESS_TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);
        TokenExchange { access_token, raw }
    }

    /// Consumes the result and keeps only the access token.
    pub fn into_access_token(self) -> Result<String> {
        match self.access_token {
            Some(token) => Ok(token),
            None => Err(Error::TokenNotFound(self.raw.to_string())),
        }
    }
}

impl From<Value> for TokenExchange {
    fn from(raw: Value) -> Self {
        TokenExchange::from_value(raw)
    }
}
