#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared vocabulary of the Starstrafe simulation.
//!
//! Everything that crosses a crate boundary is declared here: typed
//! identifiers, the [`Command`] and [`Event`] message surface, weapon
//! progression, the difficulty scale, and the descriptors the level
//! generator packs from. The world is the only writer of state; systems see
//! it through read-only snapshots and answer with command batches, so this
//! crate carries no behavior beyond the arithmetic of its own types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Length of one level segment along the scroll axis, in world units.
pub const SEGMENT_LENGTH: f32 = 100.0;

/// Number of occupancy columns spanning a segment's footprint.
pub const GRID_COLUMNS: u32 = 40;

/// Number of occupancy rows spanning a segment's footprint.
pub const GRID_ROWS: u32 = 30;

/// Rows carried over from the far edge of one segment into the next, so
/// objects straddling the seam stay collision-free.
pub const OVERLAP_ROWS: u32 = 10;

/// Side length of one occupancy cell in world units.
pub const CELL_SIZE: f32 = 5.0;

/// Maximum (and starting) player health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Lives the player starts a session with.
pub const STARTING_LIVES: u32 = 3;

/// Seconds after a respawn during which the player ignores all damage.
pub const RESPAWN_GRACE: f32 = 3.0;

/// Interval between laser beam damage ticks. The beam renders continuously
/// but only carries damage at this cadence.
pub const BEAM_TICK_INTERVAL: f32 = 0.0625;

/// RNG stream label for segment object packing.
pub const RNG_STREAM_PACKING: &str = "packing";

/// RNG stream label for vegetation scattering.
pub const RNG_STREAM_VEGETATION: &str = "vegetation";

/// RNG stream label for wave formation selection.
pub const RNG_STREAM_FORMATION: &str = "formation";

/// RNG stream label for per-spawn placement jitter within a formation.
pub const RNG_STREAM_PLACEMENT: &str = "placement";

/// Weapons the player and armed enemies can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Straight forward shots, one lane per weapon level.
    Photon,
    /// A fan of weak shots spread across a fixed angle.
    Scatter,
    /// A continuous beam dealing damage on a fixed sub-cycle.
    Laser,
}

impl WeaponKind {
    /// Seconds between shots for this weapon kind.
    ///
    /// The laser has no cooldown of its own: a beam entity is produced every
    /// tick while firing, and [`BEAM_TICK_INTERVAL`] gates its damage.
    #[must_use]
    pub const fn fire_cooldown(self) -> f32 {
        match self {
            Self::Photon | Self::Scatter => 0.1,
            Self::Laser => 0.0,
        }
    }
}

/// Weapon progression state: kind, level, and experience toward the next
/// level.
///
/// The level invariant is enforced at every mutation site: it stays within
/// `[1, 5]`, experience within `[0, 24]`, and only switching weapon kinds can
/// lower the level, by exactly one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponProgress {
    kind: WeaponKind,
    level: u8,
    xp: u8,
}

/// Lowest weapon level.
pub const MIN_WEAPON_LEVEL: u8 = 1;

/// Highest weapon level.
pub const MAX_WEAPON_LEVEL: u8 = 5;

/// Experience required to roll into the next weapon level.
pub const XP_PER_LEVEL: u8 = 25;

impl WeaponProgress {
    /// Creates a fresh level-1 weapon of the provided kind.
    #[must_use]
    pub const fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            level: MIN_WEAPON_LEVEL,
            xp: 0,
        }
    }

    /// Kind of the equipped weapon.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Current weapon level.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Experience accumulated toward the next level.
    #[must_use]
    pub const fn xp(&self) -> u8 {
        self.xp
    }

    /// Raises the weapon level by one, resetting experience. No effect at the
    /// level cap.
    pub fn add_level(&mut self) {
        if self.level < MAX_WEAPON_LEVEL {
            self.level += 1;
            self.xp = 0;
        }
    }

    /// Adds one experience point, rolling into the next level at
    /// [`XP_PER_LEVEL`]. No effect at the level cap.
    pub fn add_experience(&mut self) {
        if self.level == MAX_WEAPON_LEVEL {
            return;
        }
        self.xp += 1;
        if self.xp >= XP_PER_LEVEL {
            self.level += 1;
            self.xp = 0;
        }
    }

    /// Picks up a weapon of the provided kind.
    ///
    /// Matching the equipped kind raises the level instead. Switching kinds
    /// downgrades the level by one step, floored at [`MIN_WEAPON_LEVEL`], and
    /// resets experience. Returns whether the equipped kind changed.
    pub fn pick_up(&mut self, kind: WeaponKind) -> bool {
        if self.kind == kind {
            self.add_level();
            return false;
        }
        self.kind = kind;
        self.level = self.level.saturating_sub(1).max(MIN_WEAPON_LEVEL);
        self.xp = 0;
        true
    }
}

/// Monotonic difficulty scale driving enemy stats and score bonuses.
///
/// Difficulty accrues one point per ten seconds of play. Derived stats are
/// frozen onto enemies at spawn time, so raising difficulty never affects
/// entities already in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Difficulty {
    value: f32,
}

impl Difficulty {
    /// Creates a difficulty scale starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: 0.0 }
    }

    /// Advances difficulty by one tenth of a point per elapsed second.
    pub fn advance(&mut self, dt: Duration) {
        self.value += dt.as_secs_f32() / 10.0;
    }

    /// Raw difficulty value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Damage dealt by enemies spawned at the current difficulty.
    #[must_use]
    pub fn enemy_damage(&self) -> i32 {
        3 + (self.value / 2.0).floor() as i32
    }

    /// Health of enemies spawned at the current difficulty.
    #[must_use]
    pub fn enemy_health(&self) -> i32 {
        10 + self.value.floor() as i32
    }

    /// Score bonus added to the base kill reward.
    #[must_use]
    pub fn kill_score_bonus(&self) -> i32 {
        self.value.floor() as i32
    }
}

/// Monotonically increasing scroll distance along the level axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ScrollPosition {
    distance: f32,
}

impl ScrollPosition {
    /// Creates a scroll position at the provided distance.
    #[must_use]
    pub const fn new(distance: f32) -> Self {
        Self { distance }
    }

    /// Distance scrolled since the session started, in world units.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.distance
    }

    /// Index of the segment the scroll position currently lies in.
    #[must_use]
    pub fn segment_index(&self) -> i32 {
        (self.distance / SEGMENT_LENGTH).floor() as i32
    }
}

/// A point on the playfield plane: lateral `x` and forward `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    x: f32,
    z: f32,
}

impl WorldPoint {
    /// Creates a point from lateral and forward coordinates.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Lateral coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Forward coordinate along the scroll axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

/// A velocity on the playfield plane, in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    x: f32,
    z: f32,
}

impl Velocity {
    /// Creates a velocity from lateral and forward components.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Lateral component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Forward component.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

/// Facing assigned to a packed scenery object: forward, or rotated a half
/// turn. Chosen by coin flip at placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Facing along the scroll direction.
    Forward,
    /// Rotated 180 degrees.
    Reversed,
}

/// Location of a single occupancy cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new occupancy cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Footprint of a placeable object measured in whole occupancy cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    columns: u32,
    rows: u32,
}

impl Footprint {
    /// Creates a footprint with explicit cell dimensions. A zero dimension
    /// is rounded up to one cell, so every footprint covers at least one
    /// cell and packing always makes progress.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: if columns == 0 { 1 } else { columns },
            rows: if rows == 0 { 1 } else { rows },
        }
    }

    /// Width of the footprint in cells.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Depth of the footprint in cells.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }
}

/// Identifier of a ground-object kind available to the segment packer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneryKind(u32);

impl SceneryKind {
    /// Creates a new scenery kind identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a vegetation decoration kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VegetationKind(u32);

impl VegetationKind {
    /// Creates a new vegetation kind identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Describes one ground-object kind the packer may place into a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneryDescriptor {
    kind: SceneryKind,
    footprint: Footprint,
    is_turret: bool,
    segment_limit: Option<u32>,
}

impl SceneryDescriptor {
    /// Creates a descriptor for a plain scenery kind.
    #[must_use]
    pub const fn new(kind: SceneryKind, footprint: Footprint) -> Self {
        Self {
            kind,
            footprint,
            is_turret: false,
            segment_limit: None,
        }
    }

    /// Creates a descriptor for a turret emplacement. Turrets occupy grid
    /// cells like scenery but spawn as armed enemies, and at most one is
    /// placed per segment.
    #[must_use]
    pub const fn turret(kind: SceneryKind, footprint: Footprint) -> Self {
        Self {
            kind,
            footprint,
            is_turret: true,
            segment_limit: Some(1),
        }
    }

    /// Caps how many objects of this kind one segment may hold.
    #[must_use]
    pub const fn with_segment_limit(mut self, limit: u32) -> Self {
        self.segment_limit = Some(limit);
        self
    }

    /// Kind identifier of the described object.
    #[must_use]
    pub const fn kind(&self) -> SceneryKind {
        self.kind
    }

    /// Placement cap per segment, if any.
    #[must_use]
    pub const fn segment_limit(&self) -> Option<u32> {
        self.segment_limit
    }

    /// Footprint of the described object in occupancy cells.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Whether the described object is a turret emplacement.
    #[must_use]
    pub const fn is_turret(&self) -> bool {
        self.is_turret
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a placed scenery or vegetation entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneryId(u32);

impl SceneryId {
    /// Creates a new scenery identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a dropped pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behavior variants an enemy can be spawned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Flies with its wave velocity and shoots straight ahead.
    Fighter,
    /// Weaves laterally on a sine wave and shoots aimed at the player.
    Drone,
    /// Static ground emplacement shooting aimed at the player.
    Turret,
    /// Sweeps across the front of the screen with a spread shot.
    Boss,
}

/// Which side produced a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Fired by the player's weapon.
    Player,
    /// Fired by an enemy.
    Enemy,
}

/// Items an enemy can drop and the player can collect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// One point of weapon experience plus a small score reward.
    Experience,
    /// A weapon of the given kind, applying the pickup progression rules.
    Weapon(WeaponKind),
}

/// The damageable entity on the receiving end of a reported contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactTarget {
    /// The player's ship.
    Player,
    /// The enemy with the given identifier.
    Enemy(EnemyId),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Updates the scrolling speed driving the world clock.
    ConfigureScrolling {
        /// Scroll distance gained per second of simulated time.
        speed: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets whether the player's weapon trigger is held this tick.
    SetFiring {
        /// Trigger state supplied by the input collaborator.
        firing: bool,
    },
    /// Moves the player within the playfield bounds.
    MovePlayer {
        /// Lateral position, clamped to the playfield width.
        side: f32,
        /// Forward offset relative to the scroll position, clamped.
        forward: f32,
    },
    /// Instantiates a packed ground object into the world.
    PlaceScenery {
        /// Kind of ground object to place.
        kind: SceneryKind,
        /// World-space center of the object.
        position: WorldPoint,
        /// Coin-flip facing chosen at placement.
        orientation: Orientation,
    },
    /// Instantiates a vegetation decoration into the world.
    ScatterVegetation {
        /// Kind of decoration to place.
        kind: VegetationKind,
        /// World-space position of the decoration.
        position: WorldPoint,
        /// Uniform-random yaw in degrees.
        yaw: f32,
    },
    /// Spawns an enemy with stats frozen from the current difficulty.
    SpawnEnemy {
        /// Behavior variant of the enemy.
        kind: EnemyKind,
        /// World-space spawn position.
        position: WorldPoint,
        /// Initial movement applied every tick.
        movement: Velocity,
        /// Weapon assigned to the enemy, if any. Unarmed enemies never shoot.
        weapon: Option<WeaponKind>,
    },
    /// Fires the player's weapon if its cooldown has expired.
    FirePlayerWeapon,
    /// Fires the given enemy's weapon if its cooldown has expired.
    FireEnemyWeapon {
        /// Identifier of the shooting enemy.
        enemy: EnemyId,
    },
    /// Reports a contact between a projectile and a damageable entity.
    ///
    /// Contact detection belongs to an external collaborator; the world only
    /// resolves the consequences of a reported overlap.
    ReportContact {
        /// Projectile involved in the contact.
        projectile: ProjectileId,
        /// Entity the projectile touched.
        target: ContactTarget,
    },
    /// Reports the player touching a dropped pickup.
    CollectPickup {
        /// Identifier of the touched pickup.
        pickup: PickupId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms a scrolling speed change.
    ScrollingConfigured {
        /// Newly active scroll speed.
        speed: f32,
    },
    /// Confirms that a ground object was instantiated.
    SceneryPlaced {
        /// Identifier assigned to the placed object.
        scenery: SceneryId,
        /// Kind of the placed object.
        kind: SceneryKind,
        /// World-space center of the object.
        position: WorldPoint,
        /// Facing chosen at placement.
        orientation: Orientation,
    },
    /// Confirms that a vegetation decoration was instantiated.
    VegetationScattered {
        /// Identifier assigned to the decoration.
        scenery: SceneryId,
        /// Kind of the decoration.
        kind: VegetationKind,
        /// World-space position of the decoration.
        position: WorldPoint,
        /// Yaw assigned at placement, in degrees.
        yaw: f32,
    },
    /// Confirms that an enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Behavior variant of the enemy.
        kind: EnemyKind,
        /// World-space spawn position.
        position: WorldPoint,
        /// Health frozen from the difficulty at spawn time.
        health: i32,
        /// Damage frozen from the difficulty at spawn time.
        damage: i32,
        /// Weapon assigned to the enemy, if any.
        weapon: Option<WeaponKind>,
    },
    /// Confirms that a projectile entered the world.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Side that produced the projectile.
        owner: Owner,
        /// Weapon kind tagged onto the projectile.
        kind: WeaponKind,
        /// Damage the projectile carries.
        damage: i32,
        /// World-space spawn position.
        position: WorldPoint,
    },
    /// Reports that a projectile left the world.
    ProjectileDespawned {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Reports that an enemy scrolled out of bounds and was culled.
    EnemyDespawned {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Reports that an uncollected pickup scrolled out of bounds and was
    /// culled.
    PickupDespawned {
        /// Identifier of the removed pickup.
        pickup: PickupId,
    },
    /// Reports damage applied to an enemy.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Damage applied after same-weapon resistance.
        amount: i32,
        /// Health remaining after the hit.
        remaining: i32,
    },
    /// Reports an enemy kill and its side effects, in resolution order.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Loot dropped by the kill, if the loot roll succeeded.
        loot: Option<PickupKind>,
        /// Score awarded to the player for the kill.
        score_awarded: i32,
    },
    /// Confirms that a dropped pickup entered the world.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Kind of the dropped item.
        kind: PickupKind,
        /// World-space drop position.
        position: WorldPoint,
    },
    /// Confirms that the player collected a pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Kind of the collected item.
        kind: PickupKind,
        /// Score awarded for the collection.
        score_awarded: i32,
    },
    /// Reports that the player switched weapon kinds.
    WeaponSwitched {
        /// Newly equipped weapon kind.
        kind: WeaponKind,
        /// Level after the downgrade-on-swap rule.
        level: u8,
    },
    /// Reports that the player's weapon gained a level.
    WeaponLeveled {
        /// Equipped weapon kind.
        kind: WeaponKind,
        /// Level after the increase.
        level: u8,
    },
    /// Reports damage applied to the player.
    PlayerDamaged {
        /// Damage applied after same-weapon resistance.
        amount: i32,
        /// Health remaining after the hit.
        remaining_health: f32,
    },
    /// Reports that the player lost a life and respawned.
    PlayerLifeLost {
        /// Lives remaining after the loss.
        lives_remaining: u32,
    },
    /// Reports that the player ran out of lives. Terminal for the session.
    GameOver {
        /// Final score.
        score: i32,
    },
}

/// Snapshot of the player's weapon used by the firing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerFireSnapshot {
    /// Equipped weapon kind.
    pub kind: WeaponKind,
    /// Whether the weapon cooldown has expired.
    pub ready: bool,
    /// Whether the trigger is held this tick.
    pub firing: bool,
}

/// Snapshot of one enemy's shooting state used by the firing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyFireSnapshot {
    /// Identifier of the enemy.
    pub enemy: EnemyId,
    /// Whether the shot cooldown has expired.
    pub ready: bool,
    /// Whether the enemy carries a weapon at all.
    pub armed: bool,
    /// Whether the enemy is inside the active window where shooting is
    /// allowed.
    pub in_view: bool,
}

/// Read-only view over enemy fire snapshots in deterministic order.
#[derive(Clone, Debug, Default)]
pub struct EnemyFireView {
    snapshots: Vec<EnemyFireSnapshot>,
}

impl EnemyFireView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemyFireSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.enemy);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemyFireSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemyFireSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn zero_footprint_dimensions_round_up_to_one_cell() {
        let footprint = Footprint::new(0, 0);
        assert_eq!(footprint.columns(), 1);
        assert_eq!(footprint.rows(), 1);

        let footprint = Footprint::new(0, 3);
        assert_eq!(footprint.columns(), 1);
        assert_eq!(footprint.rows(), 3);

        let footprint = Footprint::new(4, 2);
        assert_eq!(footprint.columns(), 4);
        assert_eq!(footprint.rows(), 2);
    }

    #[test]
    fn weapon_level_stays_in_bounds() {
        let mut weapon = WeaponProgress::new(WeaponKind::Photon);
        for _ in 0..300 {
            weapon.add_experience();
            assert!((MIN_WEAPON_LEVEL..=MAX_WEAPON_LEVEL).contains(&weapon.level()));
            assert!(weapon.xp() < XP_PER_LEVEL);
        }
        assert_eq!(weapon.level(), MAX_WEAPON_LEVEL);
        assert_eq!(weapon.xp(), 0);

        weapon.add_level();
        assert_eq!(weapon.level(), MAX_WEAPON_LEVEL);
    }

    #[test]
    fn experience_rolls_into_next_level() {
        let mut weapon = WeaponProgress::new(WeaponKind::Scatter);
        for _ in 0..u16::from(XP_PER_LEVEL) - 1 {
            weapon.add_experience();
        }
        assert_eq!(weapon.level(), 1);
        assert_eq!(weapon.xp(), XP_PER_LEVEL - 1);

        weapon.add_experience();
        assert_eq!(weapon.level(), 2);
        assert_eq!(weapon.xp(), 0);
    }

    #[test]
    fn switching_kinds_downgrades_one_level() {
        let mut weapon = WeaponProgress::new(WeaponKind::Photon);
        weapon.add_level();
        weapon.add_level();
        assert_eq!(weapon.level(), 3);

        assert!(weapon.pick_up(WeaponKind::Laser));
        assert_eq!(weapon.kind(), WeaponKind::Laser);
        assert_eq!(weapon.level(), 2);
        assert_eq!(weapon.xp(), 0);
    }

    #[test]
    fn switch_never_drops_below_minimum_level() {
        let mut weapon = WeaponProgress::new(WeaponKind::Photon);
        assert!(weapon.pick_up(WeaponKind::Scatter));
        assert_eq!(weapon.level(), MIN_WEAPON_LEVEL);
    }

    #[test]
    fn same_kind_pickup_adds_a_level() {
        let mut weapon = WeaponProgress::new(WeaponKind::Laser);
        assert!(!weapon.pick_up(WeaponKind::Laser));
        assert_eq!(weapon.level(), 2);
    }

    #[test]
    fn difficulty_derived_stats_match_curve() {
        let mut difficulty = Difficulty::new();
        assert_eq!(difficulty.enemy_damage(), 3);
        assert_eq!(difficulty.enemy_health(), 10);
        assert_eq!(difficulty.kill_score_bonus(), 0);

        difficulty.advance(Duration::from_secs(40));
        assert!((difficulty.value() - 4.0).abs() < 1e-4);
        assert_eq!(difficulty.enemy_damage(), 5);
        assert_eq!(difficulty.enemy_health(), 14);
        assert_eq!(difficulty.kill_score_bonus(), 4);
    }

    #[test]
    fn difficulty_is_monotonic() {
        let mut difficulty = Difficulty::new();
        let mut previous = (
            difficulty.enemy_damage(),
            difficulty.enemy_health(),
            difficulty.kill_score_bonus(),
        );
        for _ in 0..100 {
            difficulty.advance(Duration::from_millis(700));
            let current = (
                difficulty.enemy_damage(),
                difficulty.enemy_health(),
                difficulty.kill_score_bonus(),
            );
            assert!(current.0 >= previous.0);
            assert!(current.1 >= previous.1);
            assert!(current.2 >= previous.2);
            previous = current;
        }
    }

    #[test]
    fn scroll_position_maps_to_segment_index() {
        assert_eq!(ScrollPosition::new(0.0).segment_index(), 0);
        assert_eq!(ScrollPosition::new(99.9).segment_index(), 0);
        assert_eq!(ScrollPosition::new(100.0).segment_index(), 1);
        assert_eq!(ScrollPosition::new(250.0).segment_index(), 2);
    }

    #[test]
    fn enemy_fire_view_orders_snapshots() {
        let view = EnemyFireView::from_snapshots(vec![
            EnemyFireSnapshot {
                enemy: EnemyId::new(9),
                ready: true,
                armed: true,
                in_view: true,
            },
            EnemyFireSnapshot {
                enemy: EnemyId::new(2),
                ready: false,
                armed: true,
                in_view: true,
            },
        ]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.enemy.get()).collect();
        assert_eq!(ids, vec![2, 9]);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&EnemyId::new(7));
        assert_round_trip(&ProjectileId::new(11));
        assert_round_trip(&SceneryId::new(42));
        assert_round_trip(&PickupId::new(3));
    }

    #[test]
    fn descriptors_round_trip_through_bincode() {
        let descriptor = SceneryDescriptor::turret(SceneryKind::new(4), Footprint::new(2, 2));
        assert_round_trip(&descriptor);
        assert_round_trip(&PickupKind::Weapon(WeaponKind::Laser));
        assert_round_trip(&CellCoord::new(5, 7));
    }
}
