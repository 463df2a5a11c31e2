#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Starstrafe.
//!
//! The world owns the scroll clock, the difficulty scale, the player, and
//! every entity in flight. Adapters and systems mutate it exclusively through
//! [`apply`], which executes one [`Command`] and reports the consequences as
//! [`Event`] values. Combat resolution runs here as one ordered pass per
//! reported contact: damage, death, loot, and score are queued as events
//! rather than performed re-entrantly, so a kill can never be processed
//! twice.

use std::time::Duration;

use starstrafe_core::{
    Command, ContactTarget, Difficulty, EnemyId, EnemyKind, Event, Orientation, Owner, PickupId,
    PickupKind, ProjectileId, SceneryId, SceneryKind, VegetationKind, Velocity, WeaponKind,
    WeaponProgress, WorldPoint, BEAM_TICK_INTERVAL, PLAYER_MAX_HEALTH, RESPAWN_GRACE,
    STARTING_LIVES,
};

const DEFAULT_SCROLL_SPEED: f32 = 25.0;

/// Seed for the loot-roll generator. Loot is the one random draw the world
/// owns; everything else is decided by the systems that submit commands.
const LOOT_ROLL_SEED: u64 = 0x7c3a_9d14_52e8_b06f;

const PLAYER_SHOT_SPEED: f32 = 200.0;
const ENEMY_SHOT_SPEED: f32 = 75.0;
const ENEMY_SHOT_INTERVAL: f32 = 0.5;
const MUZZLE_OFFSET: f32 = 12.0;
const FIGHTER_NOSE_OFFSET: f32 = 10.0;

const HEALTH_REGEN_PER_SECOND: f32 = 3.0;
const SIDE_LIMIT: f32 = 80.0;
const FORWARD_LIMIT: f32 = 55.0;
const DEFAULT_FORWARD_OFFSET: f32 = -35.0;

/// Enemies and pickups this far behind the scroll front are culled.
const CULL_BEHIND: f32 = 50.0;
/// Enemies only shoot inside the window `[-CULL_BEHIND, FIRE_WINDOW_AHEAD]`
/// relative to the scroll front.
const FIRE_WINDOW_AHEAD: f32 = 150.0;

const PROJECTILE_LATERAL_BOUND: f32 = 150.0;
const PROJECTILE_BEHIND_BOUND: f32 = 100.0;
const PROJECTILE_AHEAD_BOUND: f32 = 400.0;

const PHOTON_DAMAGE: i32 = 4;
const PHOTON_LANE_SPACING: f32 = 2.5;
const SCATTER_DAMAGE: i32 = 2;
const SCATTER_LANE_SPACING: f32 = 1.5;
const SCATTER_SPREAD_DEGREES: f32 = 20.0;

const KILL_SCORE_BASE: i32 = 100;
const EXPERIENCE_SCORE: i32 = 25;
const WEAPON_PICKUP_SCORE: i32 = 50;
/// The free starting weapon grant offsets the negative starting score.
const STARTING_SCORE: i32 = -50 + WEAPON_PICKUP_SCORE;

const LOOT_DROP_CHANCE: f32 = 0.5;
const RARE_DROP_CHANCE: f32 = 0.25;
const RARE_DROPS: [PickupKind; 3] = [
    PickupKind::Weapon(WeaponKind::Photon),
    PickupKind::Weapon(WeaponKind::Scatter),
    PickupKind::Weapon(WeaponKind::Laser),
];

const DRONE_SHAKE_INTENSITY: f32 = 5.0;
const DRONE_SHAKE_AMPLITUDE: f32 = 5.0;
const AIM_LEAD_EXPONENT: f32 = 0.775;
const BOSS_SWEEP_RATE: f32 = std::f32::consts::PI * 0.15;
const BOSS_ENTRY_DEPTH: f32 = 165.0;
const BOSS_HOLD_DEPTH: f32 = 40.0;
const BOSS_MUZZLE_SPACING: f32 = 10.0;

#[derive(Debug)]
struct Player {
    side: f32,
    forward: f32,
    health: f32,
    lives: u32,
    since_spawn: f32,
    weapon: WeaponProgress,
    firing: bool,
    ready_in: f32,
    beam_ready_in: f32,
    score: i32,
}

impl Player {
    fn new() -> Self {
        Self {
            side: 0.0,
            forward: DEFAULT_FORWARD_OFFSET,
            health: PLAYER_MAX_HEALTH,
            lives: STARTING_LIVES,
            since_spawn: RESPAWN_GRACE,
            weapon: WeaponProgress::new(WeaponKind::Photon),
            firing: false,
            ready_in: 0.0,
            beam_ready_in: 0.0,
            score: STARTING_SCORE,
        }
    }

    fn position(&self, scroll: f32) -> WorldPoint {
        WorldPoint::new(self.side, scroll + self.forward)
    }
}

#[derive(Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: WorldPoint,
    movement: Velocity,
    health: i32,
    damage: i32,
    weapon: Option<WeaponKind>,
    shot_ready_in: f32,
    age: f32,
    shake: f32,
    dead: bool,
}

#[derive(Debug)]
struct Projectile {
    id: ProjectileId,
    owner: Owner,
    kind: WeaponKind,
    damage: i32,
    position: WorldPoint,
    velocity: Velocity,
    /// Timed projectiles never move; moving projectiles never time out.
    destroy_in: Option<f32>,
}

#[derive(Debug)]
struct Pickup {
    id: PickupId,
    kind: PickupKind,
    position: WorldPoint,
}

#[derive(Debug)]
struct Scenery {
    id: SceneryId,
    kind: SceneryKind,
    position: WorldPoint,
    orientation: Orientation,
}

#[derive(Debug)]
struct Vegetation {
    id: SceneryId,
    kind: VegetationKind,
    position: WorldPoint,
    yaw: f32,
}

/// Represents the authoritative Starstrafe world state.
#[derive(Debug)]
pub struct World {
    scroll: f32,
    scroll_speed: f32,
    difficulty: Difficulty,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    scenery: Vec<Scenery>,
    vegetation: Vec<Vegetation>,
    next_enemy: u32,
    next_projectile: u32,
    next_pickup: u32,
    next_scenery: u32,
    loot_rng: u64,
    game_over: bool,
}

impl World {
    /// Creates a new world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scroll: 0.0,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            difficulty: Difficulty::new(),
            player: Player::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            scenery: Vec::new(),
            vegetation: Vec::new(),
            next_enemy: 0,
            next_projectile: 0,
            next_pickup: 0,
            next_scenery: 0,
            loot_rng: LOOT_ROLL_SEED,
            game_over: false,
        }
    }

    fn allocate_enemy(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        id
    }

    fn allocate_projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        id
    }

    fn allocate_pickup(&mut self) -> PickupId {
        let id = PickupId::new(self.next_pickup);
        self.next_pickup = self.next_pickup.wrapping_add(1);
        id
    }

    fn allocate_scenery(&mut self) -> SceneryId {
        let id = SceneryId::new(self.next_scenery);
        self.next_scenery = self.next_scenery.wrapping_add(1);
        id
    }

    fn next_loot_unit(&mut self) -> f32 {
        self.loot_rng = next_random(self.loot_rng);
        ((self.loot_rng >> 40) as f32) / (1u64 << 24) as f32
    }

    fn next_loot_index(&mut self, len: usize) -> usize {
        self.loot_rng = next_random(self.loot_rng);
        (self.loot_rng % len as u64) as usize
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn projectile_index(&self, projectile: ProjectileId) -> Option<usize> {
        self.projectiles
            .iter()
            .position(|candidate| candidate.id == projectile)
    }

    fn in_fire_window(&self, position: WorldPoint) -> bool {
        let relative = position.z() - self.scroll;
        (-CULL_BEHIND..=FIRE_WINDOW_AHEAD).contains(&relative)
    }

    fn spawn_projectile(
        &mut self,
        owner: Owner,
        kind: WeaponKind,
        damage: i32,
        position: WorldPoint,
        velocity: Velocity,
        destroy_in: Option<f32>,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_projectile();
        self.projectiles.push(Projectile {
            id,
            owner,
            kind,
            damage,
            position,
            velocity,
            destroy_in,
        });
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            owner,
            kind,
            damage,
            position,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        let dtf = dt.as_secs_f32();

        self.scroll += self.scroll_speed * dtf;
        self.difficulty.advance(dt);

        self.player.since_spawn += dtf;
        self.player.health =
            (self.player.health + HEALTH_REGEN_PER_SECOND * dtf).min(PLAYER_MAX_HEALTH);
        self.player.ready_in = (self.player.ready_in - dtf).max(0.0);
        if self.player.firing && self.player.weapon.kind() == WeaponKind::Laser {
            self.player.beam_ready_in -= dtf;
        }

        self.step_enemies(dtf);
        self.step_projectiles(dtf, out_events);
        self.cull(out_events);
    }

    fn step_enemies(&mut self, dtf: f32) {
        let scroll = self.scroll;
        for enemy in &mut self.enemies {
            enemy.age += dtf;
            enemy.shot_ready_in -= dtf;
            let generic = WorldPoint::new(
                enemy.position.x() - enemy.movement.x() * dtf,
                enemy.position.z() - enemy.movement.z() * dtf,
            );
            enemy.position = match enemy.kind {
                EnemyKind::Fighter | EnemyKind::Turret => generic,
                EnemyKind::Drone => {
                    let shake =
                        (enemy.age * DRONE_SHAKE_INTENSITY).sin() * DRONE_SHAKE_AMPLITUDE;
                    let shifted = WorldPoint::new(generic.x() + shake - enemy.shake, generic.z());
                    enemy.shake = shake;
                    shifted
                }
                EnemyKind::Boss => {
                    let sweep = (enemy.age * BOSS_SWEEP_RATE).sin() * SIDE_LIMIT;
                    let progress = enemy.age.min(1.0);
                    let depth = BOSS_ENTRY_DEPTH + (BOSS_HOLD_DEPTH - BOSS_ENTRY_DEPTH) * progress;
                    WorldPoint::new(sweep, scroll + depth)
                }
            };
        }
    }

    fn step_projectiles(&mut self, dtf: f32, out_events: &mut Vec<Event>) {
        let scroll = self.scroll;
        self.projectiles.retain_mut(|projectile| {
            if let Some(remaining) = projectile.destroy_in.as_mut() {
                *remaining -= dtf;
                if *remaining <= 0.0 {
                    out_events.push(Event::ProjectileDespawned {
                        projectile: projectile.id,
                    });
                    return false;
                }
                return true;
            }

            projectile.position = WorldPoint::new(
                projectile.position.x() + projectile.velocity.x() * dtf,
                projectile.position.z() + projectile.velocity.z() * dtf,
            );
            let relative = projectile.position.z() - scroll;
            let inside = projectile.position.x().abs() <= PROJECTILE_LATERAL_BOUND
                && (-PROJECTILE_BEHIND_BOUND..=PROJECTILE_AHEAD_BOUND).contains(&relative);
            if !inside {
                out_events.push(Event::ProjectileDespawned {
                    projectile: projectile.id,
                });
            }
            inside
        });
    }

    fn cull(&mut self, out_events: &mut Vec<Event>) {
        let horizon = self.scroll - CULL_BEHIND;
        self.enemies.retain(|enemy| {
            let keep = enemy.position.z() >= horizon;
            if !keep {
                out_events.push(Event::EnemyDespawned { enemy: enemy.id });
            }
            keep
        });
        self.pickups.retain(|pickup| {
            let keep = pickup.position.z() >= horizon;
            if !keep {
                out_events.push(Event::PickupDespawned { pickup: pickup.id });
            }
            keep
        });
    }

    fn fire_player_weapon(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over || self.player.ready_in > 0.0 {
            return;
        }
        let level = i32::from(self.player.weapon.level());
        let kind = self.player.weapon.kind();
        let origin = self.player.position(self.scroll);
        match kind {
            WeaponKind::Photon => {
                let mut lane = (level - 1) as f32 * -(PHOTON_LANE_SPACING / 2.0);
                for _ in 0..level {
                    let position =
                        WorldPoint::new(origin.x() + lane, origin.z() + MUZZLE_OFFSET);
                    self.spawn_projectile(
                        Owner::Player,
                        WeaponKind::Photon,
                        PHOTON_DAMAGE,
                        position,
                        Velocity::new(0.0, PLAYER_SHOT_SPEED),
                        None,
                        out_events,
                    );
                    lane += PHOTON_LANE_SPACING;
                }
            }
            WeaponKind::Scatter => {
                let count = 3 * level;
                let mut lane = (count - 1) as f32 * -(SCATTER_LANE_SPACING / 2.0);
                let mut angle = -(SCATTER_SPREAD_DEGREES / 2.0);
                let step = SCATTER_SPREAD_DEGREES / (count - 1) as f32;
                for _ in 0..count {
                    let radians = angle.to_radians();
                    let position =
                        WorldPoint::new(origin.x() + lane, origin.z() + MUZZLE_OFFSET);
                    self.spawn_projectile(
                        Owner::Player,
                        WeaponKind::Scatter,
                        SCATTER_DAMAGE,
                        position,
                        Velocity::new(
                            radians.sin() * PLAYER_SHOT_SPEED,
                            radians.cos() * PLAYER_SHOT_SPEED,
                        ),
                        None,
                        out_events,
                    );
                    angle += step;
                    lane += SCATTER_LANE_SPACING;
                }
            }
            WeaponKind::Laser => {
                // The beam spawns every tick; only the 16 Hz sub-cycle carries
                // damage.
                let damage = if self.player.beam_ready_in <= 0.0 {
                    self.player.beam_ready_in += BEAM_TICK_INTERVAL;
                    level + 1
                } else {
                    0
                };
                let position = WorldPoint::new(origin.x(), origin.z() + MUZZLE_OFFSET);
                self.spawn_projectile(
                    Owner::Player,
                    WeaponKind::Laser,
                    damage,
                    position,
                    Velocity::new(0.0, 0.0),
                    Some(BEAM_TICK_INTERVAL),
                    out_events,
                );
            }
        }
        self.player.ready_in = kind.fire_cooldown();
    }

    fn fire_enemy_weapon(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemy_index(enemy) else {
            return;
        };
        let shooter = &self.enemies[index];
        let Some(weapon) = shooter.weapon else {
            return;
        };
        if shooter.dead || shooter.shot_ready_in > 0.0 || !self.in_fire_window(shooter.position) {
            return;
        }

        let damage = shooter.damage;
        let origin = shooter.position;
        let kind = shooter.kind;
        let player_position = self.player.position(self.scroll);
        self.enemies[index].shot_ready_in += ENEMY_SHOT_INTERVAL;

        match kind {
            EnemyKind::Fighter => {
                let position = WorldPoint::new(origin.x(), origin.z() - FIGHTER_NOSE_OFFSET);
                self.spawn_projectile(
                    Owner::Enemy,
                    weapon,
                    damage,
                    position,
                    Velocity::new(0.0, -ENEMY_SHOT_SPEED),
                    None,
                    out_events,
                );
            }
            EnemyKind::Drone | EnemyKind::Turret => {
                let velocity = aim_at(origin, player_position);
                self.spawn_projectile(Owner::Enemy, weapon, damage, origin, velocity, None, out_events);
            }
            EnemyKind::Boss => {
                for lane in [-BOSS_MUZZLE_SPACING, 0.0, BOSS_MUZZLE_SPACING] {
                    let muzzle = WorldPoint::new(origin.x() + lane, origin.z());
                    let velocity = aim_at(muzzle, player_position);
                    self.spawn_projectile(
                        Owner::Enemy,
                        weapon,
                        damage,
                        muzzle,
                        velocity,
                        None,
                        out_events,
                    );
                }
            }
        }
    }

    fn resolve_contact(
        &mut self,
        projectile: ProjectileId,
        target: ContactTarget,
        out_events: &mut Vec<Event>,
    ) {
        let Some(projectile_index) = self.projectile_index(projectile) else {
            return;
        };

        match target {
            ContactTarget::Enemy(enemy) => {
                let Some(enemy_index) = self.enemy_index(enemy) else {
                    return;
                };
                if self.enemies[enemy_index].dead {
                    return;
                }
                if self.projectiles[projectile_index].owner != Owner::Player {
                    return;
                }

                let shot = self.projectiles.swap_remove(projectile_index);
                out_events.push(Event::ProjectileDespawned { projectile: shot.id });

                let resistance =
                    i32::from(self.enemies[enemy_index].weapon == Some(shot.kind));
                let amount = shot.damage - resistance;
                self.enemies[enemy_index].health -= amount;
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    remaining: self.enemies[enemy_index].health,
                });

                if self.enemies[enemy_index].health <= 0 {
                    // The dead flag goes up before any side effect so a
                    // re-reported contact in the same pass cannot kill twice.
                    self.enemies[enemy_index].dead = true;
                    self.destroy_enemy(enemy_index, out_events);
                }
            }
            ContactTarget::Player => {
                if self.projectiles[projectile_index].owner != Owner::Enemy {
                    return;
                }
                // Inside the respawn grace window the shot passes through
                // without being consumed.
                if self.player.since_spawn < RESPAWN_GRACE {
                    return;
                }

                let shot = self.projectiles.swap_remove(projectile_index);
                out_events.push(Event::ProjectileDespawned { projectile: shot.id });

                let resistance = i32::from(self.player.weapon.kind() == shot.kind);
                let amount = shot.damage - resistance;
                self.player.health -= amount as f32;
                out_events.push(Event::PlayerDamaged {
                    amount,
                    remaining_health: self.player.health,
                });

                if self.player.health <= 0.0 {
                    self.player.health += PLAYER_MAX_HEALTH;
                    self.player.lives -= 1;
                    self.player.since_spawn = 0.0;
                    out_events.push(Event::PlayerLifeLost {
                        lives_remaining: self.player.lives,
                    });
                    if self.player.lives == 0 {
                        self.game_over = true;
                        self.player.firing = false;
                        out_events.push(Event::GameOver {
                            score: self.player.score,
                        });
                    }
                }
            }
        }
    }

    fn destroy_enemy(&mut self, enemy_index: usize, out_events: &mut Vec<Event>) {
        let position = self.enemies[enemy_index].position;
        let enemy = self.enemies[enemy_index].id;

        let loot = if self.next_loot_unit() < LOOT_DROP_CHANCE {
            let kind = if self.next_loot_unit() < RARE_DROP_CHANCE && !RARE_DROPS.is_empty() {
                RARE_DROPS[self.next_loot_index(RARE_DROPS.len())]
            } else {
                PickupKind::Experience
            };
            let id = self.allocate_pickup();
            self.pickups.push(Pickup {
                id,
                kind,
                position,
            });
            out_events.push(Event::PickupSpawned {
                pickup: id,
                kind,
                position,
            });
            Some(kind)
        } else {
            None
        };

        let score_awarded = KILL_SCORE_BASE + self.difficulty.kill_score_bonus();
        self.player.score += score_awarded;
        out_events.push(Event::EnemyDestroyed {
            enemy,
            loot,
            score_awarded,
        });
        let _ = self.enemies.swap_remove(enemy_index);
    }

    fn collect_pickup(&mut self, pickup: PickupId, out_events: &mut Vec<Event>) {
        let Some(index) = self
            .pickups
            .iter()
            .position(|candidate| candidate.id == pickup)
        else {
            return;
        };
        let collected = self.pickups.swap_remove(index);
        let level_before = self.player.weapon.level();

        let score_awarded = match collected.kind {
            PickupKind::Experience => {
                self.player.weapon.add_experience();
                EXPERIENCE_SCORE
            }
            PickupKind::Weapon(kind) => {
                if self.player.weapon.pick_up(kind) {
                    out_events.push(Event::WeaponSwitched {
                        kind,
                        level: self.player.weapon.level(),
                    });
                }
                WEAPON_PICKUP_SCORE
            }
        };
        self.player.score += score_awarded;

        if self.player.weapon.level() > level_before {
            out_events.push(Event::WeaponLeveled {
                kind: self.player.weapon.kind(),
                level: self.player.weapon.level(),
            });
        }
        out_events.push(Event::PickupCollected {
            pickup: collected.id,
            kind: collected.kind,
            score_awarded,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureScrolling { speed } => {
            world.scroll_speed = speed;
            out_events.push(Event::ScrollingConfigured { speed });
        }
        Command::Tick { dt } => {
            // A finished session no longer advances; the terminal state is
            // the game-over event already emitted.
            if !world.game_over {
                world.tick(dt, out_events);
            }
        }
        Command::SetFiring { firing } => {
            if !world.game_over {
                world.player.firing = firing;
            }
        }
        Command::MovePlayer { side, forward } => {
            world.player.side = side.clamp(-SIDE_LIMIT, SIDE_LIMIT);
            world.player.forward = forward.clamp(-FORWARD_LIMIT, FORWARD_LIMIT);
        }
        Command::PlaceScenery {
            kind,
            position,
            orientation,
        } => {
            let id = world.allocate_scenery();
            world.scenery.push(Scenery {
                id,
                kind,
                position,
                orientation,
            });
            out_events.push(Event::SceneryPlaced {
                scenery: id,
                kind,
                position,
                orientation,
            });
        }
        Command::ScatterVegetation {
            kind,
            position,
            yaw,
        } => {
            let id = world.allocate_scenery();
            world.vegetation.push(Vegetation {
                id,
                kind,
                position,
                yaw,
            });
            out_events.push(Event::VegetationScattered {
                scenery: id,
                kind,
                position,
                yaw,
            });
        }
        Command::SpawnEnemy {
            kind,
            position,
            movement,
            weapon,
        } => {
            let id = world.allocate_enemy();
            let health = world.difficulty.enemy_health();
            let damage = world.difficulty.enemy_damage();
            world.enemies.push(Enemy {
                id,
                kind,
                position,
                movement,
                health,
                damage,
                weapon,
                shot_ready_in: ENEMY_SHOT_INTERVAL,
                age: 0.0,
                shake: 0.0,
                dead: false,
            });
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position,
                health,
                damage,
                weapon,
            });
        }
        Command::FirePlayerWeapon => world.fire_player_weapon(out_events),
        Command::FireEnemyWeapon { enemy } => world.fire_enemy_weapon(enemy, out_events),
        Command::ReportContact { projectile, target } => {
            world.resolve_contact(projectile, target, out_events);
        }
        Command::CollectPickup { pickup } => world.collect_pickup(pickup, out_events),
    }
}

fn aim_at(origin: WorldPoint, player: WorldPoint) -> Velocity {
    // Shots lead the player by a sublinear function of the distance, so far
    // shooters aim ahead of the ship's drift.
    let dx = player.x() - origin.x();
    let dz = player.z() - origin.z();
    let distance = (dx * dx + dz * dz).sqrt();
    if distance < f32::EPSILON {
        return Velocity::new(0.0, -ENEMY_SHOT_SPEED);
    }
    let lead_z = dz + distance.powf(AIM_LEAD_EXPONENT);
    let length = (dx * dx + lead_z * lead_z).sqrt();
    if length < f32::EPSILON {
        return Velocity::new(0.0, -ENEMY_SHOT_SPEED);
    }
    Velocity::new(
        dx / length * ENEMY_SHOT_SPEED,
        lead_z / length * ENEMY_SHOT_SPEED,
    )
}

fn next_random(state: u64) -> u64 {
    state.wrapping_mul(636_413_622_384_679_3005).wrapping_add(1)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use starstrafe_core::{
        Difficulty, EnemyFireSnapshot, EnemyFireView, EnemyId, EnemyKind, Orientation, Owner,
        PickupId, PickupKind, PlayerFireSnapshot, ProjectileId, SceneryId, SceneryKind,
        ScrollPosition, VegetationKind, Velocity, WeaponKind, WorldPoint,
    };

    /// Current scroll distance along the level axis.
    #[must_use]
    pub fn scroll_position(world: &World) -> ScrollPosition {
        ScrollPosition::new(world.scroll)
    }

    /// Current difficulty scale, from which enemy stats and the kill bonus
    /// derive.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// The player's current score.
    #[must_use]
    pub fn score(world: &World) -> i32 {
        world.player.score
    }

    /// Lives the player has remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.player.lives
    }

    /// The player's current health.
    #[must_use]
    pub fn player_health(world: &World) -> f32 {
        world.player.health
    }

    /// The player's world-space position.
    #[must_use]
    pub fn player_position(world: &World) -> WorldPoint {
        world.player.position(world.scroll)
    }

    /// The player's weapon progression state.
    #[must_use]
    pub fn player_weapon(world: &World) -> starstrafe_core::WeaponProgress {
        world.player.weapon
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Snapshot of the player's weapon for the firing system.
    #[must_use]
    pub fn player_fire_snapshot(world: &World) -> PlayerFireSnapshot {
        PlayerFireSnapshot {
            kind: world.player.weapon.kind(),
            ready: world.player.ready_in <= 0.0 && !world.game_over,
            firing: world.player.firing,
        }
    }

    /// Snapshot view of enemy shooting state for the firing system.
    #[must_use]
    pub fn enemy_fire_view(world: &World) -> EnemyFireView {
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| EnemyFireSnapshot {
                enemy: enemy.id,
                ready: enemy.shot_ready_in <= 0.0,
                armed: enemy.weapon.is_some(),
                in_view: world.in_fire_window(enemy.position),
            })
            .collect();
        EnemyFireView::from_snapshots(snapshots)
    }

    /// Immutable representation of a single enemy's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier assigned to the enemy.
        pub id: EnemyId,
        /// Behavior variant of the enemy.
        pub kind: EnemyKind,
        /// Current world-space position.
        pub position: WorldPoint,
        /// Current movement vector.
        pub movement: Velocity,
        /// Health remaining.
        pub health: i32,
        /// Damage the enemy's shots carry.
        pub damage: i32,
        /// Weapon the enemy carries, if any.
        pub weapon: Option<WeaponKind>,
    }

    /// Captures a read-only view of the enemies in flight, in identifier
    /// order.
    #[must_use]
    pub fn enemy_view(world: &World) -> Vec<EnemySnapshot> {
        let mut snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                movement: enemy.movement,
                health: enemy.health,
                damage: enemy.damage,
                weapon: enemy.weapon,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Immutable representation of a single projectile used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier assigned to the projectile.
        pub id: ProjectileId,
        /// Side that produced the projectile.
        pub owner: Owner,
        /// Weapon kind tagged onto the projectile.
        pub kind: WeaponKind,
        /// Damage the projectile carries.
        pub damage: i32,
        /// Current world-space position.
        pub position: WorldPoint,
    }

    /// Captures a read-only view of the projectiles in flight, in identifier
    /// order.
    #[must_use]
    pub fn projectile_view(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                owner: projectile.owner,
                kind: projectile.kind,
                damage: projectile.damage,
                position: projectile.position,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Immutable representation of a dropped pickup used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PickupSnapshot {
        /// Identifier assigned to the pickup.
        pub id: PickupId,
        /// Kind of the dropped item.
        pub kind: PickupKind,
        /// Current world-space position.
        pub position: WorldPoint,
    }

    /// Captures a read-only view of the pickups awaiting collection.
    #[must_use]
    pub fn pickup_view(world: &World) -> Vec<PickupSnapshot> {
        let mut snapshots: Vec<PickupSnapshot> = world
            .pickups
            .iter()
            .map(|pickup| PickupSnapshot {
                id: pickup.id,
                kind: pickup.kind,
                position: pickup.position,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Immutable representation of a placed scenery object used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ScenerySnapshot {
        /// Identifier assigned to the object.
        pub id: SceneryId,
        /// Kind of the placed object.
        pub kind: SceneryKind,
        /// World-space center of the object.
        pub position: WorldPoint,
        /// Facing chosen at placement.
        pub orientation: Orientation,
    }

    /// Captures a read-only view of the placed ground objects.
    #[must_use]
    pub fn scenery_view(world: &World) -> Vec<ScenerySnapshot> {
        world
            .scenery
            .iter()
            .map(|piece| ScenerySnapshot {
                id: piece.id,
                kind: piece.kind,
                position: piece.position,
                orientation: piece.orientation,
            })
            .collect()
    }

    /// Immutable representation of a vegetation decoration used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct VegetationSnapshot {
        /// Identifier assigned to the decoration.
        pub id: SceneryId,
        /// Kind of the decoration.
        pub kind: VegetationKind,
        /// World-space position of the decoration.
        pub position: WorldPoint,
        /// Yaw assigned at placement, in degrees.
        pub yaw: f32,
    }

    /// Captures a read-only view of the scattered vegetation.
    #[must_use]
    pub fn vegetation_view(world: &World) -> Vec<VegetationSnapshot> {
        world
            .vegetation
            .iter()
            .map(|piece| VegetationSnapshot {
                id: piece.id,
                kind: piece.kind,
                position: piece.position,
                yaw: piece.yaw,
            })
            .collect()
    }
}
