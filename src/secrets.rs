use crate::TokenExchange;

/// Read access to the credentials an authenticated call needs.
pub trait SecretsProvider {
    /// Returns `(api_key, api_secret)`.
    fn get_client_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_callback_url<'a>(&'a self) -> &'a str;

    fn get_access_token_option<'a>(&'a self) -> Option<&'a str>;

    fn is_signed_header(&self) -> bool {
        false
    }
}

/// Holds the application credentials and the current user access token.
///
/// Values are read through [`SecretsProvider`].
///
/// The store performs no locking. Mutation goes through `&mut self`, so
/// sharing it across in-flight calls needs external synchronization.
#[derive(Debug, Clone)]
pub struct Secrets {
    api_key: String,
    api_secret: String,
    callback_url: String,
    access_token: Option<String>,
    signed_header: bool,
}

impl Secrets {
    pub fn new<TKey, TSecret, TCallback>(
        api_key: TKey,
        api_secret: TSecret,
        callback_url: TCallback,
    ) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
        TCallback: Into<String>,
    {
        Secrets {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            callback_url: callback_url.into(),
            access_token: None,
            signed_header: false,
        }
    }

    /// Builder-style variant of [`set_access_token`](Secrets::set_access_token).
    pub fn token<T: Into<String>>(self, access_token: T) -> Self {
        Secrets {
            access_token: Some(access_token.into()),
            ..self
        }
    }

    pub fn set_api_key<T: Into<String>>(&mut self, api_key: T) {
        self.api_key = api_key.into();
    }

    pub fn set_api_secret<T: Into<String>>(&mut self, api_secret: T) {
        self.api_secret = api_secret.into();
    }

    pub fn set_callback_url<T: Into<String>>(&mut self, callback_url: T) {
        self.callback_url = callback_url.into();
    }

    /// Stores a raw access token. The token is opaque and not validated.
    pub fn set_access_token<T: Into<String>>(&mut self, access_token: T) {
        self.access_token = Some(access_token.into());
    }

    /// Stores the `access_token` field of a code exchange result.
    ///
    /// Returns `false` and leaves the current token untouched when the
    /// result carries no token.
    pub fn set_access_token_from_exchange_result(&mut self, result: &TokenExchange) -> bool {
        match result.access_token.as_ref() {
            Some(token) => {
                self.access_token = Some(token.clone());
                true
            }
            None => false,
        }
    }

    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    /// Enables the `X-Insta-Forwarded-For` header on non-GET calls.
    pub fn set_signed_header(&mut self, signed_header: bool) {
        self.signed_header = signed_header;
    }
}

impl SecretsProvider for Secrets {
    fn get_client_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.api_key, &self.api_secret)
    }

    fn get_callback_url<'a>(&'a self) -> &'a str {
        &self.callback_url
    }

    fn get_access_token_option<'a>(&'a self) -> Option<&'a str> {
        self.access_token.as_deref()
    }

    fn is_signed_header(&self) -> bool {
        self.signed_header
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    static API_KEY: &str = "<API_KEY>";
    static API_SECRET: &str = "<API_SECRET>";
    static CALLBACK: &str = "https://example.com/callback";

    #[test]
    fn new_has_no_token() {
        let secrets = Secrets::new(API_KEY, API_SECRET, CALLBACK);
        assert_eq!(secrets.get_client_pair(), (API_KEY, API_SECRET));
        assert_eq!(secrets.get_callback_url(), CALLBACK);
        assert_eq!(secrets.get_access_token_option(), None);
        assert!(!secrets.is_signed_header());
    }

    #[test]
    fn token_can_be_replaced() {
        let mut secrets = Secrets::new(API_KEY, API_SECRET, CALLBACK).token("first");
        assert_eq!(secrets.get_access_token_option(), Some("first"));
        secrets.set_access_token("second");
        assert_eq!(secrets.get_access_token_option(), Some("second"));
        secrets.clear_access_token();
        assert_eq!(secrets.get_access_token_option(), None);
    }

    #[test]
    fn token_from_exchange_result() {
        let mut secrets = Secrets::new(API_KEY, API_SECRET, CALLBACK);
        let exchange = TokenExchange::from_value(json!({
            "access_token": "fb2e77d.47a0479900504cb3ab4a1f626d174d2d",
            "user": { "id": "1574083", "username": "snoopdogg" }
        }));
        assert!(secrets.set_access_token_from_exchange_result(&exchange));
        assert_eq!(
            secrets.get_access_token_option(),
            Some("fb2e77d.47a0479900504cb3ab4a1f626d174d2d")
        );
    }

    #[test]
    fn exchange_result_without_token_keeps_current() {
        let mut secrets = Secrets::new(API_KEY, API_SECRET, CALLBACK).token("current");
        let exchange = TokenExchange::from_value(json!({
            "error_type": "OAuthException",
            "code": 400,
            "error_message": "No matching code found."
        }));
        assert!(!secrets.set_access_token_from_exchange_result(&exchange));
        assert_eq!(secrets.get_access_token_option(), Some("current"));
    }

    #[test]
    fn setters_replace_values() {
        let mut secrets = Secrets::new(API_KEY, API_SECRET, CALLBACK);
        secrets.set_api_key("k");
        secrets.set_api_secret("s");
        secrets.set_callback_url("c");
        secrets.set_signed_header(true);
        assert_eq!(secrets.get_client_pair(), ("k", "s"));
        assert_eq!(secrets.get_callback_url(), "c");
        assert!(secrets.is_signed_header());
    }
}
