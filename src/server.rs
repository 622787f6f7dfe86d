use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use axum::{handler::Handler, middleware, routing::get, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    cli_args::CliArgs,
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    route,
    state::ApiState,
    upstream::{UpstreamClient, DEFAULT_UPSTREAM_URL},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub upstream_url: String,
    pub public_dir: PathBuf,
    pub error_verbosity: ErrorVerbosity,
    pub trace_response_body: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            public_dir: PathBuf::from("public"),
            error_verbosity: ErrorVerbosity::default(),
            trace_response_body: false,
        }
    }
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file `{}`", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file `{}`", path.display()))
    }

    /// Starts from the configuration file, if any, or the defaults, then applies
    /// the values given on the command line or through the environment.
    pub async fn from_cli_args(args: CliArgs) -> anyhow::Result<Self> {
        let mut config = match &args.config_file {
            Some(path) => Self::from_config_file(path).await?,
            None => Self::default(),
        };

        if let Some(host) = args.host {
            config.host = host;
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(upstream_url) = args.upstream_url {
            config.upstream_url = upstream_url;
        }
        if let Some(public_dir) = args.public_dir {
            config.public_dir = public_dir;
        }
        if let Some(error_verbosity) = args.error_verbosity {
            config.error_verbosity = error_verbosity;
        }
        if let Some(trace_response_body) = args.trace_response_body {
            config.trace_response_body = trace_response_body;
        }

        Ok(config)
    }

    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn router(&self) -> Router {
        let upstream = UpstreamClient::new(self.config.upstream_url.clone(), reqwest::Client::new());
        let state = ApiState::new(self.config.error_verbosity, upstream);

        let index = ServeFile::new(self.config.public_dir.join("index.html"));
        let assets = ServeDir::new(&self.config.public_dir)
            .not_found_service(not_found.with_state(state.clone()));

        let app = Router::new()
            .route_service("/", index)
            .route("/health", get(route::health::health))
            .nest("/api", route::api::app::app())
            .fallback_service(assets)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                method_not_allowed::<ApiState>,
            ));

        let app = if self.config.trace_response_body {
            app.layer(middleware::from_fn_with_state(
                state.clone(),
                trace_response_body,
            ))
        } else {
            app
        };

        app.with_state(state).layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let socket_address = self.config.socket_address();

        tracing::info!(addr = %socket_address, upstream = %self.config.upstream_url, "Starting server");

        let listener = TcpListener::bind(&socket_address)
            .await
            .context("Bind failed")?;

        tracing::info!("Server running on port {}", self.config.port);
        tracing::info!("Visit: http://localhost:{}", self.config.port);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
