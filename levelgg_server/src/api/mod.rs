//! HTTP API for the tournament platform.
//!
//! # Modules
//!
//! - [`tournaments`]: tournament creation, statistics, registration and withdrawal
//! - [`registrations`]: status changes and deletion by creators and admins
//! - [`teams`]: captaincy transfer
//! - [`draft`]: position and squad assignment, draft overview
//! - [`middleware`]: bearer token authentication for protected endpoints
//! - [`error`]: JSON error responses
//!
//! # Endpoints
//!
//! ```text
//! GET    /health                                  - Health check (public)
//! GET    /api/tournaments/{id}/stats              - Registration totals (public)
//! POST   /api/tournaments                         - Create tournament
//! POST   /api/tournaments/{id}/register           - Register a team
//! DELETE /api/tournaments/{id}/register?team_id=  - Withdraw a team
//! PUT    /api/registrations/{id}                  - Change registration status
//! DELETE /api/registrations/{id}                  - Delete registration
//! PUT    /api/teams/{id}/captain                  - Transfer captaincy
//! GET    /api/draft/{tournament_id}               - Draft overview
//! POST   /api/draft/{tournament_id}/assign        - Auto or manual assignment
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use levelgg::{auth::AuthManager, db::MemoryRepository};
//! use levelgg_server::api::{AppState, create_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth_manager = Arc::new(AuthManager::new("0123456789abcdef0123456789abcdef".into()));
//! let state = AppState::new(Arc::new(MemoryRepository::new()), auth_manager);
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod draft;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod registrations;
pub mod request_id;
pub mod teams;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
};
use levelgg::{
    auth::AuthManager,
    db::Repository,
    draft::DraftManager,
    registration::RegistrationManager,
    team::TeamManager,
    tournament::TournamentManager,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Every manager holds the same repository handle.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub repo: Arc<dyn Repository>,
    pub draft_manager: Arc<DraftManager>,
    pub registration_manager: Arc<RegistrationManager>,
    pub team_manager: Arc<TeamManager>,
    pub tournament_manager: Arc<TournamentManager>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, auth_manager: Arc<AuthManager>) -> Self {
        Self {
            auth_manager,
            draft_manager: Arc::new(DraftManager::new(repo.clone())),
            registration_manager: Arc::new(RegistrationManager::new(repo.clone())),
            team_manager: Arc::new(TeamManager::new(repo.clone())),
            tournament_manager: Arc::new(TournamentManager::new(repo.clone())),
            repo,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let api_routes = create_api_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_api_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new().route(
        "/tournaments/{id}/stats",
        get(tournaments::tournament_stats),
    );

    let protected_routes = Router::new()
        .route("/tournaments", post(tournaments::create_tournament))
        .route(
            "/tournaments/{id}/register",
            post(tournaments::register_team).delete(tournaments::withdraw_team),
        )
        .route(
            "/registrations/{id}",
            put(registrations::update_registration).delete(registrations::delete_registration),
        )
        .route("/teams/{id}/captain", put(teams::transfer_captaincy))
        .route("/draft/{tournament_id}", get(draft::draft_overview))
        .route("/draft/{tournament_id}/assign", post(draft::assign_players))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the store answers, `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","database":true,"timestamp":"2026-10-18T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = state.repo.ping().await.is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
