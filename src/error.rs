use hecs::Entity;
use thiserror::Error;

use crate::scene::AvatarKind;

/// Failures that leave the controller unable to run.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("no avatar template registered for {0:?}")]
    UnmappedAvatar(AvatarKind),

    #[error("avatar {entity:?} has no {aspect} aspect")]
    MissingAspect { entity: Entity, aspect: &'static str },

    #[error("avatar hierarchy broken: {0}")]
    EntityGone(#[from] hecs::NoSuchEntity),

    #[error("aspect lost after setup: {0}")]
    AspectLost(#[from] hecs::ComponentError),
}
