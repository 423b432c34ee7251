use hecs::World;

use crate::components::{AvatarAspect, BarrageAspect, BlastAspect};

/// Stand-in for the combat collaborators: counts down the timers that own
/// the recovering, blasting, projectile and hit-stun flags. Runs once per
/// fixed tick, after the controller.
pub fn aspect_system(world: &mut World) {
    for (_e, barrage) in world.query_mut::<&mut BarrageAspect>() {
        if barrage.recovering {
            barrage.recovery_ticks = barrage.recovery_ticks.saturating_sub(1);
            barrage.recovering = barrage.recovery_ticks > 0;
        }
    }

    for (_e, blast) in world.query_mut::<&mut BlastAspect>() {
        if blast.blasting {
            blast.release_ticks = blast.release_ticks.saturating_sub(1);
            blast.blasting = blast.release_ticks > 0;
        }
        if blast.projectile_active {
            blast.projectile_ticks = blast.projectile_ticks.saturating_sub(1);
            blast.projectile_active = blast.projectile_ticks > 0;
        }
    }

    for (_e, avatar) in world.query_mut::<&mut AvatarAspect>() {
        if avatar.in_hit_stun {
            avatar.hit_stun_ticks = avatar.hit_stun_ticks.saturating_sub(1);
            avatar.in_hit_stun = avatar.hit_stun_ticks > 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Locomotion;

    #[test]
    fn recovery_window_closes_after_duration() {
        let mut world = World::new();
        let mut barrage = BarrageAspect::new(3);
        barrage.end_strike();
        let e = world.spawn((barrage,));

        for _ in 0..2 {
            aspect_system(&mut world);
            assert!(world.get::<&BarrageAspect>(e).unwrap().recovering);
        }
        aspect_system(&mut world);
        assert!(!world.get::<&BarrageAspect>(e).unwrap().recovering);
    }

    #[test]
    fn projectile_outlives_release() {
        let mut world = World::new();
        let mut blast = BlastAspect::new(1, 2);
        blast.fire(glam::Vec2::X);
        let e = world.spawn((blast,));

        aspect_system(&mut world);
        {
            let blast = world.get::<&BlastAspect>(e).unwrap();
            assert!(!blast.blasting);
            assert!(blast.projectile_active);
        }
        aspect_system(&mut world);
        assert!(!world.get::<&BlastAspect>(e).unwrap().projectile_active);
    }

    #[test]
    fn hit_stun_counts_down() {
        let mut world = World::new();
        let mut avatar = AvatarAspect::new(Locomotion {
            run_speed: 6.0,
            jump_impulse: 7.0,
            dash_speed: 12.0,
            slow_factor: 0.5,
            max_air_dashes: 1,
        });
        avatar.take_hit(1);
        let e = world.spawn((avatar,));

        aspect_system(&mut world);
        assert!(!world.get::<&AvatarAspect>(e).unwrap().in_hit_stun);
    }
}
