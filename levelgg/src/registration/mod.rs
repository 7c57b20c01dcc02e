//! Tournament registrations and the player counter kept alongside them.

pub mod manager;
pub mod models;

pub use manager::{RegistrationError, RegistrationManager, RegistrationResult};
pub use models::{
    CounterAdjustment, CounterSync, NewRegistration, RegisterTeamRequest, Registration,
    RegistrationChange, RegistrationId, RegistrationStatus, UpdateRegistrationRequest,
};
