use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::{Error, Result, API_OAUTH_TOKEN_URL, API_OAUTH_URL, API_URL};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Constructor input of [`Instagram`](crate::Instagram).
///
/// Field names follow the `apiKey` / `apiSecret` / `apiCallback` convention,
/// so the configuration can be read straight from a JSON or TOML document.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_callback: Option<String>,
    /// Connection timeout, read from `connectTimeoutMs` in milliseconds.
    #[serde(
        rename = "connectTimeoutMs",
        default = "default_connect_timeout",
        deserialize_with = "deserialize_millis"
    )]
    pub connect_timeout: Duration,
    /// Skips TLS certificate verification.
    ///
    /// # Note
    /// Only meant for talking to a test server with a self-signed
    /// certificate. Never enable this against the real API.
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

impl Config {
    pub fn new<TKey, TSecret, TCallback>(
        api_key: TKey,
        api_secret: TSecret,
        api_callback: TCallback,
    ) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
        TCallback: Into<String>,
    {
        Config {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            api_callback: Some(api_callback.into()),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            danger_accept_invalid_certs: false,
            endpoints: Endpoints::default(),
        }
    }

    /// set the connection timeout
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        Config {
            connect_timeout: timeout,
            ..self
        }
    }

    /// override the remote endpoints
    pub fn endpoints(self, endpoints: Endpoints) -> Self {
        Config { endpoints, ..self }
    }

    /// disable TLS certificate verification (testing only)
    pub fn danger_accept_invalid_certs(self, accept: bool) -> Self {
        Config {
            danger_accept_invalid_certs: accept,
            ..self
        }
    }

    /// Extracts the required `(api_key, api_secret, api_callback)` triple.
    pub(crate) fn required(&self) -> Result<(&str, &str, &str)> {
        Ok((
            required_field(&self.api_key, "apiKey")?,
            required_field(&self.api_secret, "apiSecret")?,
            required_field(&self.api_callback, "apiCallback")?,
        ))
    }
}

fn required_field<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Configuration(name)),
    }
}

/// The remote URLs the client talks to.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    /// Resource API root, resource paths are appended to it verbatim.
    pub api_url: String,
    pub oauth_url: String,
    pub oauth_token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            api_url: API_URL.to_string(),
            oauth_url: API_OAUTH_URL.to_string(),
            oauth_token_url: API_OAUTH_TOKEN_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint at the same host, e.g. a local test server.
    ///
    /// `base` must not end with a slash.
    pub fn with_base<T: AsRef<str>>(base: T) -> Self {
        let base = base.as_ref();
        Endpoints {
            api_url: format!("{}/v1/", base),
            oauth_url: format!("{}/oauth/authorize", base),
            oauth_token_url: format!("{}/oauth/access_token", base),
        }
    }
}
