mod character;

pub use character::{AvatarAspect, BarrageAspect, BlastAspect, Locomotion};

use hecs::{Entity, NoSuchEntity, World};

/// Points to the parent entity in the avatar hierarchy.
pub struct Parent(pub Entity);

/// Lists child entities in the avatar hierarchy.
pub struct Children(pub Vec<Entity>);

/// Marker: entity can be targeted by blast projectiles.
pub struct Target;

/// Attach `child` under `parent`. Fails if either entity is gone.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) -> Result<(), NoSuchEntity> {
    if !world.contains(child) {
        return Err(NoSuchEntity);
    }
    let appended = match world.get::<&mut Children>(parent) {
        Ok(mut children) => {
            if !children.0.contains(&child) {
                children.0.push(child);
            }
            true
        }
        Err(_) => false,
    };
    if !appended {
        world.insert_one(parent, Children(vec![child]))?;
    }

    world.insert_one(child, Parent(parent))
}

/// Despawn `root` and everything below it.
pub fn despawn_recursive(world: &mut World, root: Entity) {
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if let Ok(children) = world.get::<&Children>(entity) {
            stack.extend(children.0.iter().copied());
        }
        // Already gone is fine.
        let _ = world.despawn(entity);
    }
}

/// Breadth-first search below `root` for the first entity carrying `T`.
/// `root` itself is not considered.
pub fn find_in_children<T: hecs::Component>(world: &World, root: Entity) -> Option<Entity> {
    let mut queue: std::collections::VecDeque<Entity> = match world.get::<&Children>(root) {
        Ok(children) => children.0.iter().copied().collect(),
        Err(_) => return None,
    };

    while let Some(entity) = queue.pop_front() {
        if world.entity(entity).map_or(false, |e| e.has::<T>()) {
            return Some(entity);
        }
        if let Ok(children) = world.get::<&Children>(entity) {
            queue.extend(children.0.iter().copied());
        }
    }
    None
}
