use std::time::Duration;

use starstrafe_core::{Command, Event, ScrollPosition};
use starstrafe_system_wave_scheduling::{WaveConfig, WaveScheduling};
use starstrafe_world::{self as world, query, World};

#[test]
fn wave_enemies_freeze_stats_at_spawn_difficulty() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureScrolling { speed: 0.0 },
        &mut events,
    );

    let mut scheduler = WaveScheduling::new(6, WaveConfig::default());

    // First wave at difficulty zero.
    let mut commands = Vec::new();
    scheduler.handle(Duration::from_secs(3), ScrollPosition::new(0.0), &mut commands);
    assert_eq!(scheduler.waves_emitted(), 1);
    events.clear();
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }
    for event in &events {
        if let Event::EnemySpawned { health, damage, .. } = event {
            assert_eq!(*health, 10);
            assert_eq!(*damage, 3);
        }
    }
    let first_wave_size = query::enemy_view(&world).len();
    assert_eq!(first_wave_size, 26);

    // Eighty seconds later the next wave spawns harder enemies, while the
    // first wave keeps its frozen stats.
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(80),
        },
        &mut events,
    );
    scheduler.handle(Duration::from_secs(80), ScrollPosition::new(0.0), &mut commands);
    assert_eq!(scheduler.waves_emitted(), 2);
    events.clear();
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }
    for event in &events {
        if let Event::EnemySpawned { health, damage, .. } = event {
            assert_eq!(*health, 18);
            assert_eq!(*damage, 7);
        }
    }

    // The first wave drifted behind the cull horizon during the long tick,
    // so every enemy left carries the later difficulty's stats.
    let view = query::enemy_view(&world);
    assert!(!view.is_empty());
    assert!(view
        .iter()
        .all(|enemy| enemy.health == 18 && enemy.damage == 7));
}

#[test]
fn cadence_holds_over_a_simulated_minute() {
    let mut world = World::new();
    let mut scheduler = WaveScheduling::new(12, WaveConfig::default());
    let mut events = Vec::new();
    let mut commands = Vec::new();
    let dt = Duration::from_secs_f32(1.0 / 60.0);

    for _ in 0..(60 * 60) {
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        scheduler.handle(dt, query::scroll_position(&world), &mut commands);
        events.clear();
        commands.clear();
    }

    // Waves at 3s, then every 8s: 3, 11, 19, 27, 35, 43, 51, 59.
    assert_eq!(scheduler.waves_emitted(), 8);
}
