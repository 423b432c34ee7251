mod aiming;
mod aspects;
pub mod guards;
mod player;

pub use aiming::aim_vector;
pub use aspects::aspect_system;
pub use player::{ActiveState, BarrageState, BlastState, DashState, DownState, StateSet};
