//! Draft: placing confirmed players into positions and squads.
//!
//! [`planner`] computes auto-assignments from rosters. [`DraftManager`]
//! authorizes the caller, picks the plan (computed or caller-supplied) and
//! writes it member by member.

pub mod manager;
pub mod models;
pub mod planner;

pub use manager::{DraftError, DraftManager, DraftResult};
pub use models::{
    AssignmentRequest, AssignmentSummary, AssignmentType, DraftMember, DraftOverview,
    DraftPlayer, DraftStatistics, DraftTeam, DraftTournament, PlayerAssignment, TeamAssignment,
};
pub use planner::{max_specialized_roles, plan_auto_assignment, plan_team};
