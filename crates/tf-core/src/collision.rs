use glam::Vec2;

use crate::shapes::Aabb2;

/// Push a mobile disc out of a fixed disc. Returns `true` if they overlapped.
///
/// Coincident centers are separated along +X.
pub fn push_disc_out_of_disc(
    mobile_center: &mut Vec2,
    mobile_radius: f32,
    fixed_center: Vec2,
    fixed_radius: f32,
) -> bool {
    let offset = *mobile_center - fixed_center;
    let reach = mobile_radius + fixed_radius;
    let distance_sq = offset.length_squared();
    if distance_sq >= reach * reach {
        return false;
    }
    let distance = distance_sq.sqrt();
    let direction = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec2::X
    };
    *mobile_center = fixed_center + direction * reach;
    true
}

/// Push a disc out of a box. Returns `true` if they overlapped.
///
/// A center inside the box leaves through the nearest face.
pub fn push_disc_out_of_aabb(center: &mut Vec2, radius: f32, aabb: &Aabb2) -> bool {
    let nearest = aabb.nearest_point(*center);
    let offset = *center - nearest;
    let distance_sq = offset.length_squared();

    if distance_sq > f32::EPSILON * f32::EPSILON {
        if distance_sq >= radius * radius {
            return false;
        }
        *center = nearest + offset / distance_sq.sqrt() * radius;
        return true;
    }

    // Center is inside the box.
    let exits = [
        (center.x - aabb.min.x, Vec2::new(aabb.min.x - radius, center.y)),
        (aabb.max.x - center.x, Vec2::new(aabb.max.x + radius, center.y)),
        (center.y - aabb.min.y, Vec2::new(center.x, aabb.min.y - radius)),
        (aabb.max.y - center.y, Vec2::new(center.x, aabb.max.y + radius)),
    ];
    if let Some((_, exit)) = exits
        .iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
    {
        *center = *exit;
    }
    true
}

/// Whether `point` lies in the circular sector at `tip` facing `forward`.
///
/// `half_angle_degrees` is measured from `forward` to the sector's edge.
pub fn is_point_in_directed_sector(
    point: Vec2,
    tip: Vec2,
    forward: Vec2,
    half_angle_degrees: f32,
    radius: f32,
) -> bool {
    let offset = point - tip;
    let distance_sq = offset.length_squared();
    if distance_sq > radius * radius {
        return false;
    }
    if distance_sq <= f32::EPSILON {
        return true;
    }
    let forward = forward.normalize_or_zero();
    if forward == Vec2::ZERO {
        return false;
    }
    let cos = (forward.dot(offset) / distance_sq.sqrt()).clamp(-1.0, 1.0);
    cos.acos().to_degrees() <= half_angle_degrees
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_push_out_resolves_overlap() {
        let mut mobile = Vec2::new(0.5, 0.0);
        assert!(push_disc_out_of_disc(&mut mobile, 0.5, Vec2::ZERO, 0.5));
        assert!((mobile.x - 1.0).abs() < 1e-5);
        assert!(mobile.y.abs() < 1e-5);
    }

    #[test]
    fn disc_push_out_ignores_separated_discs() {
        let mut mobile = Vec2::new(2.0, 0.0);
        assert!(!push_disc_out_of_disc(&mut mobile, 0.5, Vec2::ZERO, 0.5));
        assert_eq!(mobile, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn disc_push_out_coincident_centers() {
        let mut mobile = Vec2::ZERO;
        assert!(push_disc_out_of_disc(&mut mobile, 0.25, Vec2::ZERO, 0.25));
        assert!((mobile - Vec2::new(0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn aabb_push_out_from_side() {
        let wall = Aabb2::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let mut center = Vec2::new(0.9, 0.5);
        assert!(push_disc_out_of_aabb(&mut center, 0.25, &wall));
        assert!((center.x - 0.75).abs() < 1e-5);
        assert!((center.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn aabb_push_out_from_inside_uses_nearest_face() {
        let wall = Aabb2::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let mut center = Vec2::new(1.9, 0.5);
        assert!(push_disc_out_of_aabb(&mut center, 0.25, &wall));
        assert!((center.x - 2.25).abs() < 1e-5);
    }

    #[test]
    fn aabb_push_out_ignores_distant_disc() {
        let wall = Aabb2::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let mut center = Vec2::new(0.0, 0.5);
        assert!(!push_disc_out_of_aabb(&mut center, 0.25, &wall));
    }

    #[test]
    fn sector_accepts_points_within_angle_and_radius() {
        let tip = Vec2::ZERO;
        assert!(is_point_in_directed_sector(Vec2::new(5.0, 1.0), tip, Vec2::X, 30.0, 10.0));
        assert!(!is_point_in_directed_sector(Vec2::new(0.0, 5.0), tip, Vec2::X, 30.0, 10.0));
        assert!(!is_point_in_directed_sector(Vec2::new(11.0, 0.0), tip, Vec2::X, 30.0, 10.0));
        assert!(is_point_in_directed_sector(Vec2::new(0.0, 5.0), tip, Vec2::X, 95.0, 10.0));
    }
}
