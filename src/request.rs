use std::{borrow::Cow, fmt, iter::FromIterator};

use http::{header::HeaderMap, Method};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use strum::{Display, EnumString};
use url::Url;

use crate::{Error, Result, ACCESS_TOKEN_KEY};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// HTTP verbs the remote API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Default for Verb {
    fn default() -> Self {
        Verb::Get
    }
}

impl Verb {
    /// Returns `true` when the parameters travel in a form body.
    pub fn has_body(&self) -> bool {
        matches!(self, Verb::Post | Verb::Put)
    }

    pub fn to_method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// Ordered request parameters.
///
/// Values that are absent or empty are kept in the list but never encoded,
/// so optional filters (`count`, `max_id`, ...) can be added unconditionally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params<'a> {
    pairs: Vec<(Cow<'a, str>, Option<String>)>,
}

impl<'a> Params<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a parameter.
    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: fmt::Display,
    {
        self.pairs.push((key.into(), Some(value.to_string())));
        self
    }

    /// Appends a parameter that is only encoded when `value` is `Some`.
    pub fn optional<K, V>(mut self, key: K, value: Option<V>) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: fmt::Display,
    {
        self.pairs.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Appends every pair of `other`, keeping its order.
    pub fn merge(mut self, other: Params<'a>) -> Self {
        self.pairs.extend(other.pairs);
        self
    }

    /// The pairs that will actually be encoded, in insertion order.
    pub fn encoded_pairs(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| match v.as_deref() {
                None | Some("") => None,
                Some(v) => Some((k.as_ref(), v)),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs
            .iter()
            .all(|(_, v)| v.as_deref().map_or(true, str::is_empty))
    }
}

impl<'a, K, V> FromIterator<(K, V)> for Params<'a>
where
    K: Into<Cow<'a, str>>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Params::new(), |params, (k, v)| params.param(k, v))
    }
}

/// A fully encoded request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    verb: Verb,
    url: Url,
    body: Option<String>,
    headers: HeaderMap,
}

impl PreparedRequest {
    pub(crate) fn new(verb: Verb, url: Url, body: Option<String>, headers: HeaderMap) -> Self {
        PreparedRequest {
            verb,
            url,
            body,
            headers,
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `application/x-www-form-urlencoded` body, only present for POST and PUT
    /// with at least one encoded parameter.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn into_parts(self) -> (Verb, Url, Option<String>, HeaderMap) {
        (self.verb, self.url, self.body, self.headers)
    }
}

/// Escapes a caller supplied id, tag name or shortcode as one path segment.
///
/// `/`, `?` and `#` are percent-encoded so the value cannot leave its
/// segment. Empty values and the dot segments `.` and `..` are rejected with
/// [`Error::InvalidPath`].
pub fn path_segment<V: fmt::Display>(value: V) -> Result<String> {
    let value = value.to_string();
    if is_dot_or_empty(&value) {
        return Err(Error::InvalidPath(value));
    }
    Ok(utf8_percent_encode(&value, SEGMENT).to_string())
}

fn is_dot_or_empty(segment: &str) -> bool {
    matches!(
        percent_decode_str(segment).decode_utf8_lossy().as_ref(),
        "" | "." | ".."
    )
}

/// Builds the resource URL and, for POST and PUT, the form body.
///
/// `path` is relative to `api_url` and may not carry a query, a fragment or
/// dot segments. `access_token` always comes first in the query string. GET
/// and DELETE append the remaining parameters to the query, POST and PUT
/// form-encode them into the body.
pub fn encode_resource(
    api_url: &str,
    path: &str,
    params: Option<&Params<'_>>,
    verb: Verb,
    access_token: &str,
) -> Result<(Url, Option<String>)> {
    if path.contains(|c| matches!(c, '?' | '#' | '\\'))
        || path.split('/').any(|s| !s.is_empty() && is_dot_or_empty(s))
    {
        return Err(Error::InvalidPath(path.to_string()));
    }
    let mut url = Url::parse(&format!("{}{}", api_url, path))?;
    let params = params.filter(|p| !p.is_empty());

    // NOTE: the query is reset so that the token is always the first pair
    url.set_query(None);
    let mut body = None;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(ACCESS_TOKEN_KEY, access_token);
        if let Some(params) = params {
            if verb.has_body() {
                body = Some(encode_form(params)?);
            } else {
                pairs.extend_pairs(params.encoded_pairs());
            }
        }
    }
    Ok((url, body))
}

/// Builds the form body of an unauthenticated call, e.g. the token exchange.
pub fn encode_form(params: &Params<'_>) -> Result<String> {
    Ok(serde_urlencoded::to_string(params.encoded_pairs())?)
}
