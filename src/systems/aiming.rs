use glam::Vec2;

/// Unit aim direction from the two stick axes. The Y axis is inverted and a
/// centred stick yields `Vec2::ZERO`.
pub fn aim_vector(aim_x: f32, aim_y: f32) -> Vec2 {
    Vec2::new(aim_x, -aim_y).normalize_or_zero()
}
