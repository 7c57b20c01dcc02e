//! Teams, memberships and squad/position vocabulary.

pub mod manager;
pub mod models;

pub use manager::{TeamError, TeamManager, TeamResult};
pub use models::{
    MemberId, MemberRole, Position, RosterEntry, RosterProfile, Squad, Team, TeamId, TeamMember,
    TeamRoster, TransferCaptaincyRequest,
};
