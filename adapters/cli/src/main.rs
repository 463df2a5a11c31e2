#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless Starstrafe session.
//!
//! The adapter owns the tick loop and every external collaborator the core
//! treats as outside its boundary: the clock, contact detection, and a
//! simple autopilot standing in for player input. Each tick it advances the
//! world, lets the generation and scheduling systems plan, sweeps for
//! contacts, and applies the resulting command batches in order.

use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use starstrafe_core::{Command, ContactTarget, Event, Footprint, Owner, SceneryDescriptor,
    SceneryKind, VegetationKind};
use starstrafe_system_combat::FireControl;
use starstrafe_system_level_generation::{LevelCatalog, LevelGeneration};
use starstrafe_system_wave_scheduling::{WaveConfig, WaveScheduling};
use starstrafe_world::{apply, query, World};

/// Radius within which a projectile contacts an enemy.
const ENEMY_HIT_RADIUS: f32 = 8.0;

/// Radius within which a projectile contacts the player.
const PLAYER_HIT_RADIUS: f32 = 5.0;

/// How often the autopilot picks a new lateral strafe target.
const STRAFE_RETARGET_INTERVAL: f32 = 2.0;

/// Lateral speed at which the autopilot chases its strafe target.
const STRAFE_SPEED: f32 = 45.0;

/// Headless Starstrafe session driver.
#[derive(Debug, Parser)]
#[command(name = "starstrafe", about = "Run a headless Starstrafe session")]
struct Args {
    /// Seed for level generation, wave scheduling, and the autopilot.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated session length in seconds.
    #[arg(long, default_value_t = 120.0)]
    duration: f32,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = 60)]
    tick_hz: u32,
}

#[derive(Debug, Default)]
struct SessionTally {
    enemies_spawned: u32,
    enemies_destroyed: u32,
    pickups_collected: u32,
    shots_fired: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.tick_hz > 0, "tick rate must be positive");
    ensure!(args.duration > 0.0, "duration must be positive");

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let dt = Duration::from_secs_f64(1.0 / f64::from(args.tick_hz));
    let ticks = (args.duration * args.tick_hz as f32).ceil() as u64;

    let catalog = LevelCatalog::new(default_scenery(), default_vegetation());
    let mut level = LevelGeneration::new(seed, catalog);
    let mut waves = WaveScheduling::new(seed, WaveConfig::default());
    let mut fire_control = FireControl::new();
    let mut autopilot = Autopilot::new(seed);

    let mut world = World::new();
    let mut events = Vec::new();
    let mut commands = Vec::new();
    let mut tally = SessionTally::default();

    apply(
        &mut world,
        Command::SetFiring { firing: true },
        &mut events,
    );

    for _ in 0..ticks {
        events.clear();
        apply(&mut world, Command::Tick { dt }, &mut events);

        let scroll = query::scroll_position(&world);
        commands.clear();
        level.handle(scroll, &mut commands);
        waves.handle(dt, scroll, &mut commands);
        fire_control.handle(
            query::player_fire_snapshot(&world),
            query::enemy_fire_view(&world),
            &mut commands,
        );
        commands.push(autopilot.steer(&world, dt));
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        sweep_contacts(&mut world, &mut events);
        tally.observe(&events);

        if query::is_game_over(&world) {
            break;
        }
    }

    print_summary(seed, &world, &waves, &tally);
    Ok(())
}

/// Naive all-pairs contact sweep. Contact detection is an external
/// collaborator of the core; the world only resolves what gets reported.
fn sweep_contacts(world: &mut World, events: &mut Vec<Event>) {
    let player = to_vec2(query::player_position(world));
    let enemies: Vec<_> = query::enemy_view(world)
        .into_iter()
        .map(|enemy| (enemy.id, to_vec2(enemy.position)))
        .collect();

    let mut reports = Vec::new();
    for projectile in query::projectile_view(world) {
        let position = to_vec2(projectile.position);
        match projectile.owner {
            Owner::Player => {
                if let Some((enemy, _)) = enemies
                    .iter()
                    .find(|(_, center)| center.distance(position) <= ENEMY_HIT_RADIUS)
                {
                    reports.push(Command::ReportContact {
                        projectile: projectile.id,
                        target: ContactTarget::Enemy(*enemy),
                    });
                }
            }
            Owner::Enemy => {
                if player.distance(position) <= PLAYER_HIT_RADIUS {
                    reports.push(Command::ReportContact {
                        projectile: projectile.id,
                        target: ContactTarget::Player,
                    });
                }
            }
        }
    }

    for pickup in query::pickup_view(world) {
        if player.distance(to_vec2(pickup.position)) <= PLAYER_HIT_RADIUS {
            reports.push(Command::CollectPickup { pickup: pickup.id });
        }
    }

    for report in reports {
        apply(world, report, events);
    }
}

fn to_vec2(point: starstrafe_core::WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.z())
}

/// Stand-in for player input: strafes toward a periodically re-rolled
/// lateral target while holding the trigger.
#[derive(Debug)]
struct Autopilot {
    rng: ChaCha8Rng,
    target_side: f32,
    retarget_in: f32,
    side: f32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            target_side: 0.0,
            retarget_in: 0.0,
            side: 0.0,
        }
    }

    fn steer(&mut self, world: &World, dt: Duration) -> Command {
        let dtf = dt.as_secs_f32();
        self.retarget_in -= dtf;
        if self.retarget_in <= 0.0 {
            self.retarget_in += STRAFE_RETARGET_INTERVAL;
            self.target_side = self.rng.gen_range(-60.0..=60.0);
        }

        let step = STRAFE_SPEED * dtf;
        let gap = self.target_side - self.side;
        self.side += gap.clamp(-step, step);

        let forward = query::player_position(world).z() - query::scroll_position(world).get();
        Command::MovePlayer {
            side: self.side,
            forward,
        }
    }
}

impl SessionTally {
    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.enemies_spawned += 1,
                Event::EnemyDestroyed { .. } => self.enemies_destroyed += 1,
                Event::PickupCollected { .. } => self.pickups_collected += 1,
                Event::ProjectileSpawned { .. } => self.shots_fired += 1,
                _ => {}
            }
        }
    }
}

fn print_summary(seed: u64, world: &World, waves: &WaveScheduling, tally: &SessionTally) {
    println!("seed: {seed}");
    println!("scroll distance: {:.1}", query::scroll_position(world).get());
    println!("difficulty: {:.2}", query::difficulty(world).value());
    println!("waves: {}", waves.waves_emitted());
    println!(
        "enemies: {} spawned, {} destroyed",
        tally.enemies_spawned, tally.enemies_destroyed
    );
    println!("shots fired: {}", tally.shots_fired);
    println!("pickups collected: {}", tally.pickups_collected);
    println!("score: {}", query::score(world));
    println!("lives remaining: {}", query::lives(world));
    println!(
        "session {}",
        if query::is_game_over(world) {
            "ended in defeat"
        } else {
            "survived"
        }
    );
}

/// Default ground-object catalog, from large structures down to turret
/// emplacements.
fn default_scenery() -> Vec<SceneryDescriptor> {
    vec![
        SceneryDescriptor::new(SceneryKind::new(0), Footprint::new(8, 8)),
        SceneryDescriptor::new(SceneryKind::new(1), Footprint::new(6, 10)),
        SceneryDescriptor::new(SceneryKind::new(2), Footprint::new(6, 6)),
        SceneryDescriptor::new(SceneryKind::new(3), Footprint::new(4, 4)),
        SceneryDescriptor::new(SceneryKind::new(4), Footprint::new(2, 2)),
        SceneryDescriptor::turret(SceneryKind::new(5), Footprint::new(2, 2)),
    ]
}

fn default_vegetation() -> Vec<VegetationKind> {
    (0..4).map(VegetationKind::new).collect()
}
