use std::str::FromStr;

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::request::{encode_form, encode_resource};
use crate::{
    Config, Endpoints, Error, Params, PreparedRequest, Result, Scope, Secrets, SecretsProvider,
    Signer, TokenExchange, Transport, Verb, SIGNED_HEADER_NAME,
};

const JSON_CONTENT_TYPE: &str = "application/json";
const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

/// Instagram API client.
///
/// Holds the credentials, the remote endpoints and the transport every
/// call goes through. Resource methods live in the `facade` module.
#[derive(Debug, Clone)]
pub struct Instagram<T = ReqwestClient> {
    secrets: Secrets,
    endpoints: Endpoints,
    caller_address: Option<String>,
    transport: T,
}

impl Instagram<ReqwestClient> {
    /// Constructs a new `Instagram` client backed by `reqwest`.
    ///
    /// The inner `reqwest::Client` verifies TLS certificates unless the
    /// configuration explicitly opts out.
    ///
    /// # Errors
    ///
    /// This method fails whenever a required configuration field is missing
    /// or the HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()
            .map_err(crate::TransportError::from)?;
        Instagram::new_with_client(config, client)
    }
}

impl<T> Instagram<T>
where
    T: Transport,
{
    /// Constructs a new `Instagram` client with specifying the transport.
    ///
    /// Only the credentials and the endpoints of `config` are used.
    /// `connect_timeout` and `danger_accept_invalid_certs` configure the
    /// `reqwest::Client` built by [`Instagram::new`] and are ignored here;
    /// set them on `transport` itself.
    ///
    /// # Errors
    ///
    /// This method fails whenever a required configuration field is missing.
    pub fn new_with_client(config: Config, transport: T) -> Result<Self> {
        let (api_key, api_secret, api_callback) = config.required()?;
        Ok(Instagram {
            secrets: Secrets::new(api_key, api_secret, api_callback),
            endpoints: config.endpoints,
            caller_address: None,
            transport,
        })
    }

    // ------------------------------------------------------------------------
    // Credential access

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    pub fn secrets_mut(&mut self) -> &mut Secrets {
        &mut self.secrets
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn access_token(&self) -> Option<&str> {
        self.secrets.get_access_token_option()
    }

    pub fn set_access_token<S: Into<String>>(&mut self, access_token: S) {
        self.secrets.set_access_token(access_token);
    }

    /// See [`Secrets::set_access_token_from_exchange_result`].
    pub fn set_access_token_from_exchange_result(&mut self, result: &TokenExchange) -> bool {
        self.secrets.set_access_token_from_exchange_result(result)
    }

    /// Enables or disables the signed `X-Insta-Forwarded-For` header.
    pub fn set_signed_header(&mut self, signed_header: bool) {
        self.secrets.set_signed_header(signed_header);
    }

    /// Sets the outbound address the signed header is derived from, usually
    /// taken from the request context of the embedding service.
    pub fn set_caller_address<S: Into<String>>(&mut self, caller_address: S) {
        self.caller_address = Some(caller_address.into());
    }

    pub fn caller_address(&self) -> Option<&str> {
        self.caller_address.as_deref()
    }

    // ------------------------------------------------------------------------
    // OAuth

    /// Generates the OAuth login URL for the given scopes.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidScope`] when `scopes` is empty or holds an
    /// unknown permission.
    pub fn login_url<S: AsRef<str>>(&self, scopes: &[S]) -> Result<String> {
        let (api_key, _) = self.secrets.get_client_pair();
        build_login_url_with_base(
            &self.endpoints.oauth_url,
            api_key,
            self.secrets.get_callback_url(),
            scopes,
        )
    }

    /// Generates the OAuth login URL requesting the `basic` scope only.
    pub fn login_url_default(&self) -> Result<String> {
        self.login_url(&[Scope::Basic.to_string()])
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// The token endpoint is unauthenticated, so no access token is needed.
    /// The returned value carries the full decoded payload; the stored
    /// access token is not modified.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchange> {
        let (api_key, api_secret) = self.secrets.get_client_pair();
        let params = Params::new()
            .param("grant_type", GRANT_TYPE_AUTHORIZATION_CODE)
            .param("client_id", api_key)
            .param("client_secret", api_secret)
            .param("redirect_uri", self.secrets.get_callback_url())
            .param("code", code);

        let url = Url::parse(&self.endpoints.oauth_token_url)?;
        let body = encode_form(&params)?;
        let request = PreparedRequest::new(Verb::Post, url, Some(body), accept_headers());
        let value = self.dispatch(request).await?;
        Ok(TokenExchange::from_value(value))
    }

    /// Exchanges an authorization code and returns the access token only.
    pub async fn get_oauth_access_token(&self, code: &str) -> Result<String> {
        self.exchange_code(code).await?.into_access_token()
    }

    // ------------------------------------------------------------------------
    // Authenticated calls

    /// Encodes an authenticated resource request without sending it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unauthenticated`] when no access token is set and
    /// with [`Error::InvalidPath`] when `path` holds a query, a fragment or a
    /// dot segment. Caller supplied values should go through
    /// [`path_segment`](crate::path_segment).
    pub fn prepare(
        &self,
        path: &str,
        params: Option<&Params<'_>>,
        verb: Verb,
    ) -> Result<PreparedRequest> {
        let access_token = self
            .secrets
            .get_access_token_option()
            .ok_or_else(|| Error::Unauthenticated(path.to_string()))?;
        let (url, body) =
            encode_resource(&self.endpoints.api_url, path, params, verb, access_token)?;

        let mut headers = accept_headers();
        if self.secrets.is_signed_header() && verb != Verb::Get {
            let address = self
                .caller_address
                .as_deref()
                .ok_or(Error::MissingParameter("caller_address"))?;
            let signature = Signer::new(&self.secrets).generate_header(address)?;
            let value = HeaderValue::from_str(&signature)
                .map_err(|e| Error::InvalidHeader(e.to_string()))?;
            headers.insert(HeaderName::from_static(SIGNED_HEADER_NAME), value);
        }

        Ok(PreparedRequest::new(verb, url, body, headers))
    }

    /// Calls a resource path with the user access token and decodes the
    /// JSON response as-is.
    ///
    /// # Errors
    ///
    /// This method fails if no access token is set (before any network
    /// activity), if the transport fails, or if the response is not JSON.
    #[instrument(skip(self, params, verb), fields(verb = %verb))]
    pub async fn call(&self, path: &str, params: Option<&Params<'_>>, verb: Verb) -> Result<Value> {
        let request = self.prepare(path, params, verb)?;
        self.dispatch(request).await
    }

    /// Shorthand for a `GET` [`call`](Instagram::call).
    pub async fn get(&self, path: &str, params: Option<&Params<'_>>) -> Result<Value> {
        self.call(path, params, Verb::Get).await
    }

    async fn dispatch(&self, request: PreparedRequest) -> Result<Value> {
        tracing::debug!(method = %request.verb(), path = request.url().path(), "sending request");
        let text = self.transport.send(request).await?;
        tracing::trace!(len = text.len(), "decoding response");
        Ok(serde_json::from_str(&text)?)
    }
}

fn accept_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers
}

/// Builds the OAuth authorize URL against the default endpoint.
///
/// # Errors
///
/// Fails with [`Error::InvalidScope`] when `scopes` is empty or holds an
/// unknown permission.
pub fn build_login_url<S: AsRef<str>>(
    api_key: &str,
    callback_url: &str,
    scopes: &[S],
) -> Result<String> {
    build_login_url_with_base(crate::API_OAUTH_URL, api_key, callback_url, scopes)
}

fn build_login_url_with_base<S: AsRef<str>>(
    oauth_url: &str,
    api_key: &str,
    callback_url: &str,
    scopes: &[S],
) -> Result<String> {
    if scopes.is_empty() {
        return Err(Error::InvalidScope(String::new()));
    }
    let scopes = scopes
        .iter()
        .map(|s| {
            Scope::from_str(s.as_ref())
                .map(<&'static str>::from)
                .map_err(|_| Error::InvalidScope(s.as_ref().to_string()))
        })
        .collect::<Result<Vec<&'static str>>>()?;
    let redirect_uri: String =
        url::form_urlencoded::byte_serialize(callback_url.as_bytes()).collect();
    Ok(format!(
        "{}?client_id={}&redirect_uri={}&scope={}&response_type=code",
        oauth_url,
        api_key,
        redirect_uri,
        scopes.join("+")
    ))
}
