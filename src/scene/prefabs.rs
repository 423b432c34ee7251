use hecs::{Entity, World};
use tracing::info;

use crate::components::{add_child, AvatarAspect, BarrageAspect, BlastAspect, Locomotion};
use crate::error::ControlError;

/// The four selectable avatars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AvatarKind {
    Balanced,
    Heavy,
    Floaty,
    Swift,
}

#[derive(Clone, Copy, Debug)]
pub struct BarrageTemplate {
    pub recovery_ticks: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct BlastTemplate {
    pub release_ticks: u32,
    pub projectile_lifetime: u32,
}

/// Everything needed to spawn one avatar variant.
///
/// An attack template left as `None` spawns an avatar without that aspect,
/// which setup rejects.
#[derive(Clone, Debug)]
pub struct AvatarTemplate {
    pub kind: AvatarKind,
    pub locomotion: Locomotion,
    pub barrage: Option<BarrageTemplate>,
    pub blast: Option<BlastTemplate>,
}

/// Variant → template table.
#[derive(Clone, Debug, Default)]
pub struct AvatarRoster {
    templates: Vec<AvatarTemplate>,
}

impl AvatarRoster {
    pub fn new(templates: Vec<AvatarTemplate>) -> Self {
        Self { templates }
    }

    /// The shipped tuning for all four variants.
    pub fn standard() -> Self {
        Self::new(vec![
            standard_template(AvatarKind::Balanced),
            standard_template(AvatarKind::Heavy),
            standard_template(AvatarKind::Floaty),
            standard_template(AvatarKind::Swift),
        ])
    }

    pub fn get(&self, kind: AvatarKind) -> Option<&AvatarTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    pub fn get_mut(&mut self, kind: AvatarKind) -> Option<&mut AvatarTemplate> {
        self.templates.iter_mut().find(|t| t.kind == kind)
    }
}

pub fn standard_template(kind: AvatarKind) -> AvatarTemplate {
    // (run, jump, dash, slow, air dashes, barrage recovery, projectile lifetime)
    let (run, jump, dash, slow, air_dashes, recovery, lifetime) = match kind {
        AvatarKind::Balanced => (6.0, 7.0, 12.0, 0.5, 1, 20, 40),
        AvatarKind::Heavy => (4.5, 6.0, 9.0, 0.3, 0, 30, 50),
        AvatarKind::Floaty => (5.0, 8.5, 10.0, 0.6, 2, 20, 40),
        AvatarKind::Swift => (8.0, 7.0, 15.0, 0.5, 1, 12, 30),
    };
    AvatarTemplate {
        kind,
        locomotion: Locomotion {
            run_speed: run,
            jump_impulse: jump,
            dash_speed: dash,
            slow_factor: slow,
            max_air_dashes: air_dashes,
        },
        barrage: Some(BarrageTemplate { recovery_ticks: recovery }),
        blast: Some(BlastTemplate { release_ticks: 8, projectile_lifetime: lifetime }),
    }
}

/// Spawn the avatar for `kind`: the root carries the avatar aspect, each
/// attack aspect lives on its own child entity.
pub fn manifest_avatar(
    world: &mut World,
    roster: &AvatarRoster,
    kind: AvatarKind,
) -> Result<Entity, ControlError> {
    let template = roster.get(kind).ok_or(ControlError::UnmappedAvatar(kind))?;

    let root = world.spawn((AvatarAspect::new(template.locomotion),));

    if let Some(barrage) = template.barrage {
        let child = world.spawn((BarrageAspect::new(barrage.recovery_ticks),));
        add_child(world, root, child)?;
    }
    if let Some(blast) = template.blast {
        let child = world.spawn((BlastAspect::new(blast.release_ticks, blast.projectile_lifetime),));
        add_child(world, root, child)?;
    }

    info!(?kind, ?root, "manifested avatar");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{find_in_children, Children};

    #[test]
    fn standard_roster_maps_every_kind() {
        let roster = AvatarRoster::standard();
        for kind in [AvatarKind::Balanced, AvatarKind::Heavy, AvatarKind::Floaty, AvatarKind::Swift] {
            assert_eq!(roster.get(kind).map(|t| t.kind), Some(kind));
        }
    }

    #[test]
    fn manifest_builds_hierarchy() {
        let mut world = World::new();
        let root = manifest_avatar(&mut world, &AvatarRoster::standard(), AvatarKind::Floaty).unwrap();

        assert_eq!(world.get::<&AvatarAspect>(root).unwrap().remaining_air_dashes, 2);
        assert_eq!(world.get::<&Children>(root).unwrap().0.len(), 2);
        assert!(find_in_children::<BarrageAspect>(&world, root).is_some());
        assert!(find_in_children::<BlastAspect>(&world, root).is_some());
    }

    #[test]
    fn unmapped_kind_fails() {
        let mut world = World::new();
        let roster = AvatarRoster::new(vec![standard_template(AvatarKind::Balanced)]);
        let err = manifest_avatar(&mut world, &roster, AvatarKind::Swift).unwrap_err();
        assert!(matches!(err, ControlError::UnmappedAvatar(AvatarKind::Swift)));
        assert_eq!(world.len(), 0);
    }
}
