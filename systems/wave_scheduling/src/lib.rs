#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduling system.
//!
//! A countdown fires one wave per interval, carrying over any overshoot so
//! the average cadence survives frame-time jitter. Each wave spawns a batch
//! of fighters in one of three spatial formations and a batch of drones in
//! one of two, all offset ahead of the scroll position so the batch enters
//! the playfield from the far edge. Formation rolls and placement jitter
//! draw from per-wave labeled seed streams, so the same seed always emits
//! the same waves.

use std::time::Duration;

use starstrafe_core::{
    Command, EnemyKind, ScrollPosition, Velocity, WeaponKind, WorldPoint, RNG_STREAM_FORMATION,
    RNG_STREAM_PLACEMENT,
};
use sha2::{Digest, Sha256};

/// Velocity applied to enemies that fly straight down the playfield.
const DEFAULT_MOVEMENT: Velocity = Velocity::new(0.0, 5.0);

/// Lateral drift applied to grouped fighter formations.
const GROUP_DRIFT: f32 = 35.0;

/// Base spawn distance ahead of the scroll position.
const BASE_DISTANCE: f32 = 100.0;

/// Distance added ahead of the previous spawn within one batch.
const DISTANCE_STEP: f32 = 10.0;

/// Half-width of the random-scatter spawn band.
const SCATTER_HALF_WIDTH: i64 = 75;

/// Lateral position of the two drone columns.
const DRONE_COLUMN_X: f32 = 50.0;

/// Depth stagger applied to the odd drone column.
const DRONE_COLUMN_STAGGER: f32 = 25.0;

/// Tunable parameters of the wave scheduler.
#[derive(Clone, Copy, Debug)]
pub struct WaveConfig {
    /// Seconds between wave emissions.
    pub interval: f32,
    /// Seconds before the first wave.
    pub initial_delay: f32,
    /// Fighters spawned per wave.
    pub fighters_per_wave: u32,
    /// Drones spawned per wave.
    pub drones_per_wave: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            interval: 8.0,
            initial_delay: 3.0,
            fighters_per_wave: 20,
            drones_per_wave: 6,
        }
    }
}

/// Pure system that emits enemy spawn commands on a fixed cadence.
#[derive(Debug)]
pub struct WaveScheduling {
    seed: u64,
    config: WaveConfig,
    next_wave_in: f32,
    wave_index: u32,
}

impl WaveScheduling {
    /// Creates a scheduler for the provided seed and configuration.
    #[must_use]
    pub fn new(seed: u64, config: WaveConfig) -> Self {
        Self {
            seed,
            config,
            next_wave_in: config.initial_delay,
            wave_index: 0,
        }
    }

    /// Seconds remaining until the next wave fires.
    #[must_use]
    pub fn next_wave_in(&self) -> f32 {
        self.next_wave_in
    }

    /// Number of waves emitted so far.
    #[must_use]
    pub fn waves_emitted(&self) -> u32 {
        self.wave_index
    }

    /// Advances the countdown and emits at most one wave per call. On firing,
    /// the countdown gains the full interval back, so overshoot from a late
    /// tick shortens the wait for the next wave instead of being dropped.
    pub fn handle(&mut self, dt: Duration, scroll: ScrollPosition, out_commands: &mut Vec<Command>) {
        self.next_wave_in -= dt.as_secs_f32();
        if self.next_wave_in > 0.0 {
            return;
        }
        let wave = self.wave_index;
        self.wave_index += 1;
        self.next_wave_in += self.config.interval;
        self.emit_wave(wave, scroll, out_commands);
    }

    fn emit_wave(&self, wave: u32, scroll: ScrollPosition, out_commands: &mut Vec<Command>) {
        let base_seed = derive_wave_seed(self.seed, wave);
        let mut formation_rng =
            SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_FORMATION));
        let mut placement_rng =
            SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_PLACEMENT));

        self.emit_fighters(scroll, &mut formation_rng, &mut placement_rng, out_commands);
        self.emit_drones(scroll, &mut formation_rng, &mut placement_rng, out_commands);
    }

    /// Rolls one of five outcomes: the two grouped formations take one slot
    /// each and the remaining three all fall through to random scatter, so
    /// scatter is three times as likely as either group.
    fn emit_fighters(
        &self,
        scroll: ScrollPosition,
        formation_rng: &mut SplitMix64,
        placement_rng: &mut SplitMix64,
        out_commands: &mut Vec<Command>,
    ) {
        if self.config.fighters_per_wave == 0 {
            return;
        }
        let formation = formation_rng.next_index(5);
        let weapon = pick_weapon(formation_rng);
        let mut distance = BASE_DISTANCE;

        for _ in 0..self.config.fighters_per_wave {
            distance += DISTANCE_STEP;
            let (x, movement) = match formation {
                0 => (-distance, Velocity::new(-GROUP_DRIFT, DEFAULT_MOVEMENT.z())),
                1 => (distance, Velocity::new(GROUP_DRIFT, DEFAULT_MOVEMENT.z())),
                _ => (placement_rng.next_scatter(), DEFAULT_MOVEMENT),
            };
            out_commands.push(Command::SpawnEnemy {
                kind: EnemyKind::Fighter,
                position: WorldPoint::new(x, scroll.get() + distance),
                movement,
                weapon: Some(weapon),
            });
        }
    }

    fn emit_drones(
        &self,
        scroll: ScrollPosition,
        formation_rng: &mut SplitMix64,
        placement_rng: &mut SplitMix64,
        out_commands: &mut Vec<Command>,
    ) {
        if self.config.drones_per_wave == 0 {
            return;
        }
        // Drone batches start offset from the fighter batch so the two waves
        // never spatially coincide.
        let mut distance = BASE_DISTANCE
            + (self.config.fighters_per_wave as f32 - self.config.drones_per_wave as f32)
                * DISTANCE_STEP;
        let formation = formation_rng.next_index(2);

        for index in 0..self.config.drones_per_wave {
            distance += DISTANCE_STEP;
            let (x, depth_offset) = match formation {
                0 => (placement_rng.next_scatter(), 0.0),
                _ => {
                    if index % 2 == 1 {
                        (-DRONE_COLUMN_X, -DRONE_COLUMN_STAGGER)
                    } else {
                        (DRONE_COLUMN_X, 0.0)
                    }
                }
            };
            out_commands.push(Command::SpawnEnemy {
                kind: EnemyKind::Drone,
                position: WorldPoint::new(x, scroll.get() + distance + depth_offset),
                movement: DEFAULT_MOVEMENT,
                weapon: Some(pick_weapon(placement_rng)),
            });
        }
    }
}

fn pick_weapon(rng: &mut SplitMix64) -> WeaponKind {
    match rng.next_index(3) {
        0 => WeaponKind::Photon,
        1 => WeaponKind::Scatter,
        _ => WeaponKind::Laser,
    }
}

fn derive_wave_seed(global_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    finalize_seed(hasher)
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    /// Uniform whole-unit lateral position across the scatter band.
    fn next_scatter(&mut self) -> f32 {
        let span = (SCATTER_HALF_WIDTH * 2 + 1) as u64;
        (self.next_u64() % span) as i64 as f32 - SCATTER_HALF_WIDTH as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighters_of(commands: &[Command]) -> Vec<(WorldPoint, Velocity, Option<WeaponKind>)> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnEnemy {
                    kind: EnemyKind::Fighter,
                    position,
                    movement,
                    weapon,
                } => Some((*position, *movement, *weapon)),
                _ => None,
            })
            .collect()
    }

    fn drones_of(commands: &[Command]) -> Vec<(WorldPoint, Velocity, Option<WeaponKind>)> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnEnemy {
                    kind: EnemyKind::Drone,
                    position,
                    movement,
                    weapon,
                } => Some((*position, *movement, *weapon)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cadence_survives_frame_jitter() {
        let mut scheduler = WaveScheduling::new(
            1,
            WaveConfig {
                initial_delay: 8.0,
                ..WaveConfig::default()
            },
        );
        let mut commands = Vec::new();
        // Uneven ticks summing to 20 seconds, none above the interval.
        let ticks = [0.7, 1.3, 2.0, 0.5, 3.5, 1.0, 2.5, 1.5, 3.0, 2.0, 2.0];
        assert!((ticks.iter().sum::<f32>() - 20.0).abs() < 1e-5);
        for dt in ticks {
            scheduler.handle(
                Duration::from_secs_f32(dt),
                ScrollPosition::new(0.0),
                &mut commands,
            );
        }
        assert_eq!(scheduler.waves_emitted(), 2);
        // Countdown carries overshoot: 8 - 20 + 2 * 8 = 4.
        assert!((scheduler.next_wave_in() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn overshoot_shortens_the_next_wait() {
        let mut scheduler = WaveScheduling::new(1, WaveConfig::default());
        let mut commands = Vec::new();
        scheduler.handle(
            Duration::from_secs_f32(3.5),
            ScrollPosition::new(0.0),
            &mut commands,
        );
        assert_eq!(scheduler.waves_emitted(), 1);
        assert!((scheduler.next_wave_in() - 7.5).abs() < 1e-4);
    }

    #[test]
    fn waves_spawn_full_batches_ahead_of_the_scroll() {
        let mut scheduler = WaveScheduling::new(17, WaveConfig::default());
        let mut commands = Vec::new();
        let scroll = ScrollPosition::new(400.0);
        scheduler.handle(Duration::from_secs(3), scroll, &mut commands);

        let fighters = fighters_of(&commands);
        let drones = drones_of(&commands);
        assert_eq!(fighters.len(), 20);
        assert_eq!(drones.len(), 6);
        for (position, _, weapon) in fighters.iter().chain(drones.iter()) {
            assert!(position.z() > scroll.get() + BASE_DISTANCE);
            assert!(weapon.is_some());
        }
        // Fighter batch marches outward in depth.
        for pair in fighters.windows(2) {
            assert!(pair[1].0.z() > pair[0].0.z());
        }
    }

    #[test]
    fn fighter_formations_match_one_of_three_shapes() {
        for seed in 0..32 {
            let mut scheduler = WaveScheduling::new(seed, WaveConfig::default());
            let mut commands = Vec::new();
            scheduler.handle(Duration::from_secs(3), ScrollPosition::new(0.0), &mut commands);
            let fighters = fighters_of(&commands);

            let left = fighters
                .iter()
                .all(|(position, movement, _)| {
                    movement.x() == -GROUP_DRIFT && position.x() == -position.z()
                });
            let right = fighters
                .iter()
                .all(|(position, movement, _)| {
                    movement.x() == GROUP_DRIFT && position.x() == position.z()
                });
            let scatter = fighters.iter().all(|(position, movement, _)| {
                movement.x() == 0.0 && position.x().abs() <= SCATTER_HALF_WIDTH as f32
            });
            assert!(left || right || scatter, "seed {seed} formed no known shape");

            // One weapon kind per fighter wave.
            let first_weapon = fighters[0].2;
            assert!(fighters.iter().all(|(_, _, weapon)| *weapon == first_weapon));
        }
    }

    #[test]
    fn drone_formations_match_one_of_two_shapes() {
        for seed in 0..32 {
            let mut scheduler = WaveScheduling::new(seed, WaveConfig::default());
            let mut commands = Vec::new();
            scheduler.handle(Duration::from_secs(3), ScrollPosition::new(0.0), &mut commands);
            let drones = drones_of(&commands);

            let scatter = drones
                .iter()
                .all(|(position, _, _)| position.x().abs() <= SCATTER_HALF_WIDTH as f32);
            let columns = drones
                .iter()
                .all(|(position, _, _)| position.x().abs() == DRONE_COLUMN_X);
            assert!(scatter || columns, "seed {seed} formed no known shape");

            // Drone batches start at the offset depth, clear of the fighter
            // batch's opening positions.
            let drone_base = BASE_DISTANCE + (20.0 - 6.0) * DISTANCE_STEP;
            for (position, _, _) in &drones {
                assert!(position.z() >= drone_base + DISTANCE_STEP - DRONE_COLUMN_STAGGER);
            }
        }
    }

    #[test]
    fn identical_seeds_reproduce_the_waves() {
        let mut left = WaveScheduling::new(5, WaveConfig::default());
        let mut right = WaveScheduling::new(5, WaveConfig::default());
        let mut left_commands = Vec::new();
        let mut right_commands = Vec::new();
        for _ in 0..4 {
            left.handle(
                Duration::from_secs(4),
                ScrollPosition::new(0.0),
                &mut left_commands,
            );
            right.handle(
                Duration::from_secs(4),
                ScrollPosition::new(0.0),
                &mut right_commands,
            );
        }
        assert_eq!(left_commands, right_commands);
        assert!(!left_commands.is_empty());
    }

    #[test]
    fn empty_batches_emit_nothing() {
        let mut scheduler = WaveScheduling::new(
            1,
            WaveConfig {
                fighters_per_wave: 0,
                drones_per_wave: 0,
                ..WaveConfig::default()
            },
        );
        let mut commands = Vec::new();
        scheduler.handle(Duration::from_secs(5), ScrollPosition::new(0.0), &mut commands);
        assert_eq!(scheduler.waves_emitted(), 1);
        assert!(commands.is_empty());
    }
}
