use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Error, Result, SecretsProvider};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_SEPARATOR: char = '|';

/// Produces the `X-Insta-Forwarded-For` trust header.
///
/// The caller address is an explicit input: the signer never looks it up
/// from the hosting environment.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider) -> Self {
        Signer { secrets }
    }

    /// Returns `"<address>|<hex hmac-sha256(address, api_secret)>"`.
    pub fn generate_header(&self, caller_address: &str) -> Result<String> {
        let (_, api_secret) = self.secrets.get_client_pair();
        sign_address(caller_address, api_secret)
    }
}

/// Signs `address` with `secret` and joins both with `|`.
pub fn sign_address(address: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::InvalidHeader(e.to_string()))?;
    mac.update(address.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    Ok(format!("{}{}{}", address, SIGNATURE_SEPARATOR, signature))
}
