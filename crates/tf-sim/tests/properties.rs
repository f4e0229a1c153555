//! Property tests for handles, raycasts, and the fixed physics timestep.

use std::sync::Arc;

use glam::Vec3;
use proptest::prelude::*;
use tf_sim::{
    ActorHandle, Definitions, FixedTimestep, PhysicsSystem, SimConfig, Simulation, SpawnInfo,
    TileMap, World,
};

fn definitions() -> Arc<Definitions> {
    Arc::new(Definitions::builtin().expect("builtin definitions load"))
}

fn arena_world() -> World {
    World::new(definitions(), "Arena").expect("arena builds")
}

#[derive(Debug, Clone)]
enum Op {
    Spawn,
    Remove(usize),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![Just(Op::Spawn), (0..16usize).prop_map(Op::Remove)],
        1..80,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn removed_handles_never_resolve(ops in ops()) {
        let mut world = arena_world();
        let mut live: Vec<ActorHandle> = Vec::new();
        let mut removed: Vec<ActorHandle> = Vec::new();

        for op in ops {
            match op {
                Op::Spawn => {
                    let info = SpawnInfo::new("Demon", Vec3::new(5.5, 5.5, 0.0));
                    live.push(world.spawn_actor(&info, 0.0).expect("slot available"));
                }
                Op::Remove(i) if !live.is_empty() => {
                    let handle = live.remove(i % live.len());
                    prop_assert!(world.actors.remove(handle).is_some());
                    removed.push(handle);
                }
                Op::Remove(_) => {}
            }
            for handle in &removed {
                prop_assert!(world.resolve(*handle).is_none());
            }
            for handle in &live {
                prop_assert_eq!(world.resolve(*handle).map(|a| a.handle), Some(*handle));
            }
        }
    }

    #[test]
    fn raycasts_are_idempotent(
        x in 1.0f32..11.0,
        y in 1.0f32..11.0,
        z in 0.05f32..0.95,
        yaw in -180.0f32..180.0,
        pitch in -60.0f32..60.0,
        range in 0.5f32..20.0,
    ) {
        let mut world = arena_world();
        world
            .spawn_actor(&SpawnInfo::new("Demon", Vec3::new(6.0, 6.0, 0.0)), 0.0)
            .expect("spawn");
        let direction = tf_core::EulerAngles::new(yaw, pitch).forward();
        let start = Vec3::new(x, y, z);

        let first = world.raycast_all(start, direction, range, None);
        let second = world.raycast_all(start, direction, range, None);
        prop_assert_eq!(first, second);
        prop_assert!(first.impact_distance <= range);
    }

    #[test]
    fn timestep_ignores_frame_slicing(
        frames in prop::collection::vec(0.001f64..0.05, 1..200),
    ) {
        let total: f64 = frames.iter().sum();
        let mut sliced = FixedTimestep::new(240);
        let issued: u64 = frames.iter().map(|&dt| u64::from(sliced.advance(dt))).sum();

        let mut whole = FixedTimestep::new(240);
        let at_once = u64::from(whole.advance(total));

        prop_assert!(issued.abs_diff(at_once) <= 1);
        prop_assert_eq!(issued, sliced.steps());
    }

    #[test]
    fn halving_frame_rate_keeps_physics_identical(
        half_fps in 10u32..60,
        half_frames in 1u64..60,
        speed in 0.1f32..3.0,
    ) {
        let seconds = half_frames as f64 / f64::from(half_fps);
        let run = |fps: u32| {
            let defs = definitions();
            let layout = ["##########", "#........#", "#........#", "#........#", "##########"];
            let map = TileMap::from_layout("lane", &layout, defs.tiles(), 1.0).expect("map");
            let mut sim = Simulation::from_world(World::with_map(defs, map), SimConfig::default().with_ai(false))
                .expect("sim");
            let marine = sim.with_context(|ctx| {
                ctx.spawn_actor(
                    &SpawnInfo::new("Marine", Vec3::new(1.5, 2.5, 0.2))
                        .with_velocity(Vec3::new(speed, 0.0, 0.0)),
                )
                .expect("spawn")
            });
            sim.run_for(seconds, fps).expect("run");
            let steps = sim.get_system::<PhysicsSystem>().expect("physics").steps_run();
            let position = sim.world().resolve(marine).expect("alive").position;
            (steps, position)
        };

        let (fast_steps, fast_position) = run(half_fps * 2);
        let (slow_steps, slow_position) = run(half_fps);
        prop_assert_eq!(fast_steps, slow_steps);
        prop_assert_eq!(fast_position, slow_position);
    }
}
