use starstrafe_core::{
    Command, EnemyKind, Event, Footprint, SceneryDescriptor, SceneryKind, ScrollPosition,
    VegetationKind, SEGMENT_LENGTH,
};
use starstrafe_system_level_generation::{LevelCatalog, LevelGeneration};
use starstrafe_world::{self as world, query, World};

fn catalog() -> LevelCatalog {
    LevelCatalog::new(
        vec![
            SceneryDescriptor::new(SceneryKind::new(0), Footprint::new(8, 8)),
            SceneryDescriptor::new(SceneryKind::new(1), Footprint::new(4, 6)),
            SceneryDescriptor::new(SceneryKind::new(2), Footprint::new(2, 2)),
            SceneryDescriptor::turret(SceneryKind::new(3), Footprint::new(2, 2)),
        ],
        vec![VegetationKind::new(0), VegetationKind::new(1)],
    )
}

#[test]
fn generated_segments_materialize_in_the_world() {
    let mut world = World::new();
    let mut generator = LevelGeneration::new(21, catalog());

    let mut commands = Vec::new();
    generator.handle(ScrollPosition::new(0.0), &mut commands);
    assert!(!commands.is_empty());

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let scenery = query::scenery_view(&world);
    let vegetation = query::vegetation_view(&world);
    let enemies = query::enemy_view(&world);
    assert!(!scenery.is_empty(), "segments placed no ground objects");
    assert!(!vegetation.is_empty(), "segments scattered no vegetation");
    assert!(
        enemies
            .iter()
            .all(|enemy| enemy.kind == EnemyKind::Turret),
        "level generation spawns only turrets"
    );
    // Turrets sit still and carry a weapon.
    for turret in &enemies {
        assert_eq!(turret.movement.x(), 0.0);
        assert_eq!(turret.movement.z(), 0.0);
        assert!(turret.weapon.is_some());
    }
}

#[test]
fn large_scroll_jumps_skip_no_segments() {
    let mut generator = LevelGeneration::new(8, catalog());
    let mut commands = Vec::new();

    // Jump ten segments ahead in one call, as after a frame hitch.
    generator.handle(ScrollPosition::new(SEGMENT_LENGTH * 10.0), &mut commands);

    // Every crossed segment must have been emitted: each contributes at
    // least its vegetation batch in a contiguous band.
    for segment in 0..=10u32 {
        let start = segment as f32 * SEGMENT_LENGTH + SEGMENT_LENGTH;
        let in_band = commands.iter().any(|command| {
            matches!(
                command,
                Command::ScatterVegetation { position, .. }
                    if position.z() >= start && position.z() < start + SEGMENT_LENGTH
            )
        });
        assert!(in_band, "segment {segment} emitted nothing");
    }
    assert_eq!(generator.next_segment(), 11);
}

#[test]
fn turret_stats_freeze_at_spawn_difficulty() {
    let mut world = World::new();
    let mut events = Vec::new();

    // Advance difficulty before the segment spawns its turrets.
    world::apply(
        &mut world,
        Command::ConfigureScrolling { speed: 0.0 },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::Tick {
            dt: std::time::Duration::from_secs(60),
        },
        &mut events,
    );

    let mut generator = LevelGeneration::new(4, catalog());
    let mut commands = Vec::new();
    generator.handle(ScrollPosition::new(0.0), &mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    // difficulty 6 after a minute: damage 3 + 3, health 10 + 6.
    let mut spawned = 0;
    for event in &events {
        if let Event::EnemySpawned { health, damage, .. } = event {
            assert_eq!(*health, 16);
            assert_eq!(*damage, 6);
            spawned += 1;
        }
    }
    assert!(spawned > 0, "segments spawned no turrets");
}
