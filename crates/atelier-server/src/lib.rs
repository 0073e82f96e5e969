mod cors;
mod health;

use std::{net::SocketAddr, time::Duration};

use atelier_config::{Config, parse_duration};
use atelier_core::GenerationError;
use axum::{BoxError, Router, error_handling::HandleErrorLayer, response::IntoResponse};
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::trace::TraceLayer;

use health::HealthState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a capability server or the avatar client fails to
    /// initialize, or the request timeout does not parse
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)));

        let request_timeout = parse_duration(&config.server.request_timeout)?;

        let image_state = atelier_imagegen::build_server(config)?;
        let script_state = atelier_script::build_server(config)?;
        let studio = atelier_video::build_studio(config, script_state.clone(), image_state.clone())?;
        let avatar_state = atelier_avatar::build_state(config)?;

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            let health_state = HealthState {
                image: image_state.clone(),
                script: script_state.clone(),
                studio: studio.clone(),
                avatar: avatar_state.clone(),
            };
            app = app.route(
                &config.server.health.path,
                axum::routing::get(health::health_handler).with_state(health_state),
            );
        }

        // Image generation routes
        app = app.merge(atelier_imagegen::endpoint_router().with_state(image_state));

        // Script routes
        app = app.merge(atelier_script::endpoint_router().with_state(script_state));

        // Text-to-video and composed routes
        app = app.merge(atelier_video::endpoint_router().with_state(studio));

        // Avatar facade routes
        app = app.merge(atelier_avatar::endpoint_router().with_state(avatar_state));

        // Apply middleware layers (innermost first)

        // Overall request budget; dropping the handler stops any job polling
        app = with_request_timeout(app, request_timeout);

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

/// Bound every request by `budget`, answering with an error envelope on expiry
fn with_request_timeout(router: Router, budget: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(move |error: BoxError| async move {
                timeout_response(&error, budget)
            }))
            .layer(TimeoutLayer::new(budget)),
    )
}

/// Render a request that outlived its budget as an error envelope
fn timeout_response(error: &BoxError, budget: Duration) -> axum::response::Response {
    if error.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!(budget_ms = budget.as_millis(), "request timed out");
        return GenerationError::RequestTimeout(budget).into_response();
    }

    tracing::error!(error = %error, "unhandled middleware error");
    GenerationError::Configuration(format!("unhandled middleware error: {error}")).into_response()
}
