//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, cookies, metrics)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AdtechConfig;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::{ads, cookies, registration, reports};
use crate::measurement::HeaderBuilder;
use crate::observability::metrics;
use crate::reports::{ReportKind, ReportStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AdtechConfig>,
    pub headers: Arc<HeaderBuilder>,
    pub reports: Arc<ReportStore>,
}

impl AppState {
    pub fn new(config: AdtechConfig) -> Self {
        Self {
            headers: Arc::new(HeaderBuilder::from_config(&config)),
            reports: Arc::new(ReportStore::new(config.reports.capacity)),
            config: Arc::new(config),
        }
    }
}

/// HTTP server for the ad-tech demo.
pub struct AdtechServer {
    router: Router,
    state: AppState,
}

impl AdtechServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AdtechConfig) -> Self {
        let state = AppState::new(config);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let ads = Router::new()
            .route("/", get(ads::index))
            .route("/ad-click", get(ads::ad_click))
            .route("/ad-click-js", get(ads::ad_click_js))
            .route("/ad-view-img", get(ads::ad_view_img))
            .route("/ad-script-view-img", get(ads::ad_script_view_img))
            .route("/ad-script-click-element", get(ads::ad_script_click_element))
            .route("/ad-script-click-js", get(ads::ad_script_click_js));

        let registrations = Router::new()
            .route("/register-source-js", get(registration::register_source_js))
            .route("/register-source-image", get(registration::register_source_image))
            .route("/register-source-href", get(registration::register_source_href))
            .route("/conversion", get(registration::conversion))
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ));

        let mut intake = Router::new().route(
            "/reports",
            get(reports::list_reports).delete(reports::clear_reports),
        );
        for kind in ReportKind::ALL {
            intake = intake.route(
                kind.path(),
                post(move |State(state): State<AppState>, body: Bytes| {
                    reports::receive_report(kind, state, body)
                }),
            );
        }

        Router::new()
            .merge(ads)
            .merge(registrations)
            .merge(intake)
            .layer(middleware::from_fn(cookies::issue_measurement_cookies))
            .layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            adtech_url = %self.state.config.origins.adtech_url,
            advertiser_url = %self.state.config.origins.advertiser_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The configured router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AdtechConfig {
        &self.state.config
    }
}
