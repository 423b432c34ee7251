//! Control core for a player avatar: a fixed set of states, guarded action
//! transitions and a fixed-tick update loop over ECS-held aspects.

pub mod app;
pub mod components;
pub mod controller;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod scene;
pub mod systems;

pub use controller::{Feedback, PlayerController};
pub use error::ControlError;
pub use fsm::StateId;
