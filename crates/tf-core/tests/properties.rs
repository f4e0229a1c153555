//! Property tests for push-out resolution and cylinder queries.

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tf_core::{Aabb2, Cylinder, FloatRange, push_disc_out_of_aabb, push_disc_out_of_disc};

fn coord() -> impl Strategy<Value = f32> {
    -10.0f32..10.0
}

fn radius() -> impl Strategy<Value = f32> {
    0.05f32..2.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn pushed_discs_stop_overlapping(
        mx in coord(), my in coord(), mr in radius(),
        fx in coord(), fy in coord(), fr in radius(),
    ) {
        let fixed = Vec2::new(fx, fy);
        let mut mobile = Vec2::new(mx, my);
        let overlapped = mobile.distance(fixed) < mr + fr;

        prop_assert_eq!(push_disc_out_of_disc(&mut mobile, mr, fixed, fr), overlapped);
        prop_assert!(mobile.distance(fixed) >= mr + fr - 1e-3);
    }

    #[test]
    fn pushed_disc_clears_box(
        cx in coord(), cy in coord(), r in radius(),
        x in coord(), y in coord(), w in 0.1f32..4.0, h in 0.1f32..4.0,
    ) {
        let aabb = Aabb2::new(Vec2::new(x, y), Vec2::new(x + w, y + h));
        let mut center = Vec2::new(cx, cy);
        push_disc_out_of_aabb(&mut center, r, &aabb);

        prop_assert!(!aabb.contains(center));
        prop_assert!(aabb.nearest_point(center).distance(center) >= r - 1e-3);
    }

    #[test]
    fn nearest_point_lies_in_cylinder(
        bx in coord(), by in coord(), bz in 0.0f32..2.0, r in radius(), height in 0.1f32..2.0,
        px in coord(), py in coord(), pz in -5.0f32..5.0,
    ) {
        let cylinder = Cylinder::new(Vec3::new(bx, by, bz), r, height);
        let nearest = cylinder.nearest_point(Vec3::new(px, py, pz));
        let grown = Cylinder::new(cylinder.base - Vec3::Z * 1e-3, r + 1e-3, height + 2e-3);
        prop_assert!(grown.contains(nearest));
    }

    #[test]
    fn ray_hits_land_on_the_cylinder(
        sx in coord(), sy in coord(), sz in -2.0f32..4.0,
        dx in -1.0f32..1.0, dy in -1.0f32..1.0, dz in -1.0f32..1.0,
        r in radius(), max in 0.5f32..30.0,
    ) {
        let forward = Vec3::new(dx, dy, dz).normalize_or_zero();
        prop_assume!(forward != Vec3::ZERO);
        let cylinder = Cylinder::new(Vec3::new(1.0, -2.0, 0.0), r, 1.5);

        if let Some(hit) = cylinder.raycast(Vec3::new(sx, sy, sz), forward, max) {
            prop_assert!(hit.distance >= 0.0 && hit.distance <= max);
            let grown = Cylinder::new(cylinder.base - Vec3::Z * 1e-2, r + 1e-2, 1.5 + 2e-2);
            prop_assert!(grown.contains(hit.position));
        }
    }

    #[test]
    fn samples_stay_in_range(a in -50.0f32..50.0, b in -50.0f32..50.0, seed in any::<u64>()) {
        let range = FloatRange::new(a, b);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..8 {
            prop_assert!(range.contains(range.sample(&mut rng)));
        }
    }
}
