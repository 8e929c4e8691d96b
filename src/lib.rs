/*!
reqwest-instagram: Instagram API client on top of [reqwest](https://crates.io/crates/reqwest).

# Overview

This library talks to the Instagram REST API with the OAuth2
authorization-code flow: it builds the login URL, exchanges the returned
code for an access token, and dispatches authenticated resource calls whose
JSON responses are returned as [`serde_json::Value`] without further
validation.

Every call is a single attempt. Token persistence and retry decisions are
left to the caller.

# How to use

## Basic usecase 1 - acquiring the access token

```no_run
# async fn run() -> reqwest_instagram::Result<()> {
use reqwest_instagram::{Config, Instagram};

let config = Config::new("[API_KEY]", "[API_SECRET]", "https://example.com/callback");
let mut instagram = Instagram::new(config)?;

// step 1: send the user to the login page
let login_url = instagram.login_url(&["basic", "likes"])?;
println!("please access to: {}", login_url);

// step 2: the callback receives `?code=...`, trade it for a token
let code = "[CODE]";
let exchange = instagram.exchange_code(code).await?;
instagram.set_access_token_from_exchange_result(&exchange);
println!("logged in as: {}", exchange.raw["user"]["username"]);
# Ok(())
# }
```

## Basic usecase 2 - calling resources

```no_run
# async fn run() -> reqwest_instagram::Result<()> {
use reqwest_instagram::{Config, Instagram, Params, Verb};

let mut instagram = Instagram::new(Config::new("[API_KEY]", "[API_SECRET]", "[CALLBACK]"))?;
instagram.set_access_token("[ACCESS_TOKEN]");

// thin per-endpoint methods
let me = instagram.get_user("self").await?;
let recent = instagram.get_user_media("self", Some(10), None, None).await?;
instagram.add_media_comment("1234", "Nice shot!").await?;

// any path not covered by a method
let params = Params::new().param("count", 5);
let likes = instagram.call("users/self/media/liked", Some(&params), Verb::Get).await?;
# Ok(())
# }
```

## Signed requests

When "Enforce signed requests" is enabled for the application, write calls
must carry `X-Insta-Forwarded-For`. The caller address is supplied by the
embedding service:

```no_run
# fn run() -> reqwest_instagram::Result<()> {
# use reqwest_instagram::{Config, Instagram};
let mut instagram = Instagram::new(Config::new("[API_KEY]", "[API_SECRET]", "[CALLBACK]"))?;
instagram.set_signed_header(true);
instagram.set_caller_address("203.0.113.7");
# Ok(())
# }
```
*/
mod client;
mod config;
mod error;
mod facade;
mod request;
mod scope;
mod secrets;
mod signer;
mod token_reader;
mod transport;

// exposed to external program
pub use client::{build_login_url, Instagram};
pub use config::{Config, Endpoints};
pub use error::{Error, Result, TransportError, TransportResult};
pub use request::{encode_form, encode_resource, path_segment, Params, PreparedRequest, Verb};
pub use scope::{Action, Scope};
pub use secrets::{Secrets, SecretsProvider};
pub use signer::{sign_address, Signer};
pub use token_reader::TokenExchange;
pub use transport::Transport;

// exposed constant variables
/// Resource API root.
pub const API_URL: &str = "https://api.instagram.com/v1/";
/// OAuth authorize endpoint.
pub const API_OAUTH_URL: &str = "https://api.instagram.com/oauth/authorize";
/// OAuth token endpoint.
pub const API_OAUTH_TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
/// Represents `access_token`.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Represents `X-Insta-Forwarded-For`, lowercased as a header name.
pub const SIGNED_HEADER_NAME: &str = "x-insta-forwarded-for";
