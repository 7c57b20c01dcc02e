//! Tournaments: creation, lookup and registration statistics.
//!
//! ## Example
//!
//! ```no_run
//! use levelgg::db::{Database, PgRepository};
//! use levelgg::tournament::{CreateTournamentRequest, TournamentManager};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let repo = Arc::new(PgRepository::new(Arc::new(db.pool().clone())));
//!     let tournaments = TournamentManager::new(repo);
//!
//!     let request = CreateTournamentRequest {
//!         title: Some("Sunday Siege".to_string()),
//!         mode: Some("32v32".to_string()),
//!         max_players: Some(256),
//!         start_date: None,
//!     };
//!     let tournament = tournaments.create_tournament(Uuid::new_v4(), request).await?;
//!     println!("Created tournament: {}", tournament.id);
//!
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::{TournamentError, TournamentManager, TournamentResult};
pub use models::{
    CreateTournamentRequest, NewTournament, Tournament, TournamentId, TournamentMode,
    TournamentStats,
};
