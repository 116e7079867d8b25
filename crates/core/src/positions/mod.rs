//! Positions module - holdings, the versioned position store and its service.

mod positions_model;
mod positions_service;
mod positions_traits;

pub use positions_model::*;
pub use positions_service::PositionService;
pub use positions_traits::{PositionServiceTrait, StateMutation, StateRepositoryTrait};
