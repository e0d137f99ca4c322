//! Measurement cookies.
//!
//! # Responsibilities
//! - Parse `__session` and `ar_debug` from the `Cookie` header
//! - Issue both cookies when the browser does not have them yet
//!
//! # Design Decisions
//! - Issuance is idempotent: a cookie already present is never replaced
//! - `__session` stands in for a legacy third-party measurement cookie and
//!   doubles as the debug key; its value comes from `fastrand` (not secret)
//! - `ar_debug` opts the browser into debug reports

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;

pub const SESSION_COOKIE: &str = "__session";
pub const DEBUG_COOKIE: &str = "ar_debug";

const COOKIE_ATTRIBUTES: &str = "SameSite=None; Secure; HttpOnly";

/// Upper bound (exclusive) for generated session values.
const MAX_SESSION_VALUE: u64 = 1_000_000_000_000_000;

/// Parse every `Cookie` header into name → value. First occurrence wins.
///
/// Values are percent-decoded and stripped of surrounding quotes. Values that
/// decode to control characters are dropped since they end up in response
/// headers.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse_encoded(value).flatten() {
            let val = cookie.value_trimmed();
            if val.chars().any(char::is_control) {
                continue;
            }
            cookies
                .entry(cookie.name().to_string())
                .or_insert_with(|| val.to_string());
        }
    }
    cookies
}

/// The two cookies this server cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementCookies {
    pub session: Option<String>,
    pub ar_debug: Option<String>,
}

impl MeasurementCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = parse_cookies(headers);
        Self {
            session: cookies.remove(SESSION_COOKIE),
            ar_debug: cookies.remove(DEBUG_COOKIE),
        }
    }

    /// `Set-Cookie` values for whichever cookies are missing.
    pub fn missing_cookies(&self) -> Vec<String> {
        let mut set = Vec::new();
        if self.session.is_none() {
            set.push(format!(
                "{}={}; {}",
                SESSION_COOKIE,
                fastrand::u64(0..MAX_SESSION_VALUE),
                COOKIE_ATTRIBUTES
            ));
        }
        if self.ar_debug.is_none() {
            set.push(format!("{}=1; {}", DEBUG_COOKIE, COOKIE_ATTRIBUTES));
        }
        set
    }
}

impl<S> FromRequestParts<S> for MeasurementCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Middleware issuing measurement cookies on every response.
pub async fn issue_measurement_cookies(request: Request<Body>, next: Next) -> Response {
    let cookies = MeasurementCookies::from_headers(request.headers());
    tracing::debug!(
        path = %request.uri().path(),
        session = ?cookies.session,
        ar_debug = ?cookies.ar_debug,
        "Request cookies"
    );

    let mut response = next.run(request).await;
    for cookie in cookies.missing_cookies() {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
