//! VesselHire Backend Server
//!
//! REST API server and operational commands for the vessel hire tracker.

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;
use vesselhire_backend::api::create_router;
use vesselhire_backend::commands::{demo_users, dev_server, seed};
use vesselhire_backend::config::Config;
use vesselhire_backend::db::{DailyTotals, VesselData};
use vesselhire_backend::models::{
    AccessTokenResponse, CreateVesselRequest, CreateVesselResponse, HealthResponse, LoginRequest,
    RefreshRequest, TokenPairResponse, UserSummary, VesselRecord,
};
use vesselhire_backend::state::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        vesselhire_backend::api::handlers::health_check,
        vesselhire_backend::api::handlers::list_vessels,
        vesselhire_backend::api::handlers::create_vessel,
        vesselhire_backend::api::handlers::aggregate_vessels,
        vesselhire_backend::api::auth::login,
        vesselhire_backend::api::auth::refresh,
        vesselhire_backend::api::auth::revoke,
    ),
    components(
        schemas(
            HealthResponse,
            VesselRecord,
            VesselData,
            DailyTotals,
            CreateVesselRequest,
            CreateVesselResponse,
            LoginRequest,
            TokenPairResponse,
            UserSummary,
            RefreshRequest,
            AccessTokenResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Token issuance and refresh"),
        (name = "Vessels", description = "Vessel hire and market rates"),
    ),
    info(
        title = "VesselHire API",
        version = "0.1.0",
        description = "REST API for tracking vessel hire and market rates",
        license(name = "MIT")
    )
)]
struct ApiDoc;

/// Registers the bearer token security scheme.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "vesselhire-backend", version, about = "Vessel hire rate tracker")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "VESSELHIRE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the API and frontend server (default).
    Serve,
    /// Start the frontend dev server in the background, then run the server.
    Dev {
        /// Directory containing the frontend `package.json`.
        #[arg(long, default_value = ".")]
        frontend_dir: PathBuf,
        /// Seconds to wait for the frontend before starting the server.
        #[arg(long, default_value_t = 3)]
        startup_delay_secs: u64,
    },
    /// Replace all vessel data with 30 days of demo data for three vessels.
    Seed,
    /// Create the demo admin and regular accounts if missing.
    CreateDemoUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref()).context("invalid configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Dev {
            frontend_dir,
            startup_delay_secs,
        } => {
            if let Err(e) = dev_server::spawn_frontend(&frontend_dir) {
                warn!("Could not launch frontend dev server thread: {}", e);
            }
            info!("Waiting {}s for the frontend to start", startup_delay_secs);
            tokio::time::sleep(Duration::from_secs(startup_delay_secs)).await;
            serve(config).await
        }
        Command::Seed => {
            let state = persistent_state(config).await?;
            let mut rng = StdRng::from_entropy();
            let today = Local::now().date_naive();
            let inserted = seed::seed_vessels(&state.vessels, today, &mut rng).await?;
            info!("Seeded {} vessel records", inserted);
            Ok(())
        }
        Command::CreateDemoUsers => {
            let state = persistent_state(config).await?;
            let created = demo_users::create_demo_users(&state.auth, state.users.as_ref()).await?;
            info!("Created {} demo users", created.len());
            for account in [demo_users::DEMO_ADMIN, demo_users::DEMO_USER] {
                let label = if account.is_admin { "Admin" } else { "User" };
                info!("  {}: {} / {}", label, account.username, account.password);
            }
            Ok(())
        }
    }
}

/// State for commands that only make sense against a real database.
async fn persistent_state(config: Config) -> anyhow::Result<AppState> {
    if config.database.url.is_none() {
        anyhow::bail!("this command requires a database (set DATABASE_URL)");
    }
    AppState::from_config(config).await
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let cors = cors_layer(&config)?;
    let state = Arc::new(AppState::from_config(config).await?);

    if state.is_ephemeral() {
        bootstrap_demo_data(&state).await?;
    }

    info!("Starting VesselHire Backend on {}", addr);
    info!("Swagger UI available at http://{}/swagger-ui/", addr);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Makes the in-memory store usable out of the box.
async fn bootstrap_demo_data(state: &AppState) -> anyhow::Result<()> {
    demo_users::create_demo_users(&state.auth, state.users.as_ref()).await?;
    let mut rng = StdRng::from_entropy();
    seed::seed_vessels(&state.vessels, Local::now().date_naive(), &mut rng).await?;
    info!("In-memory store bootstrapped with demo users and data");
    Ok(())
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config.cors_origins()?;
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    Ok(if !origins.is_empty() {
        layer.allow_origin(AllowOrigin::list(origins))
    } else if config.server.debug {
        layer.allow_origin(Any)
    } else {
        layer
    })
}
