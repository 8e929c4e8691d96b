use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration is missing required field : {0}")]
    Configuration(&'static str),
    #[error("invalid scope permission : {0}")]
    InvalidScope(String),
    #[error("invalid relationship modification : {0}")]
    InvalidAction(String),
    #[error("{0} - this method requires an authenticated user's access token.")]
    Unauthenticated(String),
    #[error("missing required parameter : {0}")]
    MissingParameter(&'static str),
    #[error("request failed : {0}")]
    Transport(#[from] TransportError),
    #[error("response is not valid json : {0}")]
    Decode(#[from] serde_json::Error),
    #[error("resource path does not form a valid url : {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid resource path : {0:?}")]
    InvalidPath(String),
    #[error("parameters could not be form encoded : {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("header value could not be constructed : {0}")]
    InvalidHeader(String),
    #[error("response has malformed format: not found access_token in {0}")]
    TokenNotFound(String),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    Custom(String),
}

impl TransportError {
    /// Wraps the cause text reported by a non-reqwest transport.
    pub fn custom<T: Into<String>>(cause: T) -> Self {
        TransportError::Custom(cause.into())
    }
}
