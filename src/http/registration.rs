//! Source and trigger registration endpoints.
//!
//! # Responsibilities
//! - `/register-source-{js,image,href}`: attach the source header, then
//!   answer with text, an image, or a redirect to the advertiser
//! - `/conversion`: validate the query, attach the trigger header
//!
//! # Design Decisions
//! - The `__session` cookie is the debug key on both sides, so debug
//!   reports can be joined to the cookie
//! - Invalid conversions get a 400 and no trigger header

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::cookies::MeasurementCookies;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::measurement::{RegistrationHeader, SourceParams, TriggerQuery};
use crate::observability::metrics;

/// Creative returned by `/register-source-image`.
pub const AD_IMAGE_PNG: &[u8] = include_bytes!("../../assets/blue-shoes.png");

/// Render a registration as its response header.
pub fn registration_headers<T: RegistrationHeader>(
    registration: &T,
) -> Result<HeaderMap, ApiError> {
    let json = registration
        .to_header_json()
        .map_err(|e| ApiError::Encoding(e.to_string()))?;
    let name = HeaderName::from_bytes(T::HEADER_NAME.as_bytes())
        .map_err(|e| ApiError::Encoding(e.to_string()))?;
    let value = HeaderValue::from_bytes(json.as_bytes())
        .map_err(|e| ApiError::Encoding(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(name, value);
    Ok(headers)
}

fn source_headers(
    state: &AppState,
    cookies: &MeasurementCookies,
    kind: &'static str,
) -> Result<HeaderMap, ApiError> {
    let params = SourceParams {
        debug_key: cookies.session.clone(),
    };
    let registration = state.headers.build_source(&params);
    let headers = registration_headers(&registration)?;

    tracing::info!(
        kind,
        source_event_id = registration.source_event_id,
        header = ?headers,
        "Registering source"
    );
    metrics::record_source_registration(kind);
    Ok(headers)
}

pub async fn register_source_js(
    State(state): State<AppState>,
    cookies: MeasurementCookies,
) -> Result<Response, ApiError> {
    let headers = source_headers(&state, &cookies, "js")?;
    Ok((StatusCode::OK, headers, "OK").into_response())
}

pub async fn register_source_image(
    State(state): State<AppState>,
    cookies: MeasurementCookies,
) -> Result<Response, ApiError> {
    let headers = source_headers(&state, &cookies, "image")?;
    Ok((
        StatusCode::OK,
        headers,
        [(header::CONTENT_TYPE, "image/png")],
        Bytes::from_static(AD_IMAGE_PNG),
    )
        .into_response())
}

pub async fn register_source_href(
    State(state): State<AppState>,
    cookies: MeasurementCookies,
) -> Result<Response, ApiError> {
    let mut headers = source_headers(&state, &cookies, "href")?;
    let location = HeaderValue::from_str(&state.config.origins.advertiser_url)
        .map_err(|e| ApiError::Encoding(e.to_string()))?;
    headers.insert(header::LOCATION, location);
    Ok((StatusCode::FOUND, headers).into_response())
}

pub async fn conversion(
    State(state): State<AppState>,
    cookies: MeasurementCookies,
    Query(query): Query<TriggerQuery>,
) -> Result<Response, ApiError> {
    let registration = query
        .validate(cookies.session.clone())
        .and_then(|params| {
            let registration = state.headers.build_trigger(&params)?;
            metrics::record_trigger_registration(params.conversion_type);
            Ok(registration)
        })
        .inspect_err(|e| {
            tracing::warn!(error = %e, "Rejecting conversion");
            metrics::record_trigger_rejection();
        })?;

    let headers = registration_headers(&registration)?;
    tracing::info!(header = ?headers, "Registering trigger");

    Ok((StatusCode::OK, headers).into_response())
}
