//! # LevelGG
//!
//! Tournament organization for large team modes (8v8 up to 64v64): team
//! registration with capacity checks, captaincy transfer, and the draft that
//! places confirmed players into positions and squads.
//!
//! ## Core Modules
//!
//! - [`draft`]: auto and manual position/squad assignment
//! - [`registration`]: registration preconditions and the tournament player counter
//! - [`team`]: teams, memberships and captaincy transfer
//! - [`tournament`]: tournament creation and statistics
//! - [`db`]: the [`Repository`](db::Repository) store abstraction, PostgreSQL and in-memory
//! - [`auth`]: access token verification
//!
//! ## Example
//!
//! ```
//! use levelgg::team::{Position, Squad};
//! use levelgg::draft::max_specialized_roles;
//!
//! assert_eq!(max_specialized_roles(24), 3);
//! assert_eq!(Squad::for_slot(9), Squad::Bravo);
//! assert!(Position::Armor.is_specialized());
//! ```

pub mod auth;
pub mod db;
pub mod draft;
pub mod errors;
pub mod profile;
pub mod registration;
pub mod team;
pub mod tournament;

pub use errors::ErrorKind;
pub use profile::{PlayerId, Profile, Tier};
