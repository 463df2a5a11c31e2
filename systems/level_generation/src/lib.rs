#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural level generation system.
//!
//! The level is an endless sequence of fixed-length segments. Each segment
//! owns an occupancy grid that is packed greedily with ground objects drawn
//! from a catalog, and the far edge of every grid is carried into the next
//! segment so objects straddling the seam never overlap a later placement.
//! The system is pure: it reads the scroll position and emits placement
//! commands, and the same seed always yields the same level.

use starstrafe_core::{
    CellCoord, Command, EnemyKind, Footprint, Orientation, SceneryDescriptor, ScrollPosition,
    VegetationKind, Velocity, WeaponKind, WorldPoint, CELL_SIZE, GRID_COLUMNS, GRID_ROWS,
    OVERLAP_ROWS, RNG_STREAM_PACKING, RNG_STREAM_VEGETATION, SEGMENT_LENGTH,
};
use sha2::{Digest, Sha256};

/// Vegetation decorations scattered alongside each segment.
const VEGETATION_PER_SEGMENT: u32 = 50;

/// Lateral half-width of the vegetation scatter band.
const VEGETATION_BAND_HALF_WIDTH: f32 = 60.0;

/// Lateral offset pushing vegetation beyond the playfield edge.
const VEGETATION_BAND_OFFSET: f32 = 100.0;

/// Half the grid's world-space width; grids are centered on the scroll axis.
const GRID_HALF_WIDTH: f32 = GRID_COLUMNS as f32 * CELL_SIZE / 2.0;

/// Occupancy grid covering one segment's footprint.
///
/// Cells are addressed as `(column, row)` with row zero nearest the segment
/// start. The grid spans more rows than one segment length; the surplus rows
/// at the far edge describe the opening of the next segment and are carried
/// into its grid before packing begins.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![false; (GRID_COLUMNS * GRID_ROWS) as usize],
        }
    }

    fn index(column: u32, row: u32) -> usize {
        (row * GRID_COLUMNS + column) as usize
    }

    /// Whether the provided cell is occupied.
    #[must_use]
    pub fn occupied(&self, cell: CellCoord) -> bool {
        self.cells[Self::index(cell.column(), cell.row())]
    }

    /// Whether a footprint anchored at the provided cell fits entirely on
    /// free cells. Anchors beyond `grid size - footprint` never fit.
    #[must_use]
    pub fn fits(&self, anchor: CellCoord, footprint: Footprint) -> bool {
        if anchor.column() + footprint.columns() > GRID_COLUMNS
            || anchor.row() + footprint.rows() > GRID_ROWS
        {
            return false;
        }
        for row in anchor.row()..anchor.row() + footprint.rows() {
            for column in anchor.column()..anchor.column() + footprint.columns() {
                if self.cells[Self::index(column, row)] {
                    return false;
                }
            }
        }
        true
    }

    /// Marks every cell under the footprint as occupied.
    pub fn occupy(&mut self, anchor: CellCoord, footprint: Footprint) {
        for row in anchor.row()..anchor.row() + footprint.rows() {
            for column in anchor.column()..anchor.column() + footprint.columns() {
                self.cells[Self::index(column, row)] = true;
            }
        }
    }

    /// Collects every anchor at which the footprint fits, in row-major order.
    #[must_use]
    pub fn free_anchors(&self, footprint: Footprint) -> Vec<CellCoord> {
        let mut anchors = Vec::new();
        for row in 0..=GRID_ROWS.saturating_sub(footprint.rows()) {
            for column in 0..=GRID_COLUMNS.saturating_sub(footprint.columns()) {
                let anchor = CellCoord::new(column, row);
                if self.fits(anchor, footprint) {
                    anchors.push(anchor);
                }
            }
        }
        anchors
    }

    /// Copies this grid's far-edge rows into the opening rows of a fresh
    /// grid for the next segment.
    #[must_use]
    pub fn carry_overlap(&self) -> Self {
        let mut next = Self::new();
        for row in 0..OVERLAP_ROWS {
            let source_row = GRID_ROWS - OVERLAP_ROWS + row;
            for column in 0..GRID_COLUMNS {
                next.cells[Self::index(column, row)] = self.cells[Self::index(column, source_row)];
            }
        }
        next
    }
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog of scenery and vegetation the generator draws from.
#[derive(Clone, Debug)]
pub struct LevelCatalog {
    scenery: Vec<SceneryDescriptor>,
    vegetation: Vec<VegetationKind>,
}

impl LevelCatalog {
    /// Creates a catalog from the provided descriptors. Either list may be
    /// empty: without scenery a segment holds only vegetation, and without
    /// vegetation the ground stays bare.
    #[must_use]
    pub fn new(scenery: Vec<SceneryDescriptor>, vegetation: Vec<VegetationKind>) -> Self {
        Self {
            scenery,
            vegetation,
        }
    }

    /// Descriptors of the placeable ground objects.
    #[must_use]
    pub fn scenery(&self) -> &[SceneryDescriptor] {
        &self.scenery
    }

    /// Kinds of vegetation decoration.
    #[must_use]
    pub fn vegetation(&self) -> &[VegetationKind] {
        &self.vegetation
    }
}

/// Pure system that emits placement commands for level segments.
#[derive(Debug)]
pub struct LevelGeneration {
    seed: u64,
    catalog: LevelCatalog,
    next_segment: u32,
    carried: OccupancyGrid,
}

impl LevelGeneration {
    /// Creates a generator for the provided seed and catalog.
    #[must_use]
    pub fn new(seed: u64, catalog: LevelCatalog) -> Self {
        Self {
            seed,
            catalog,
            next_segment: 0,
            carried: OccupancyGrid::new(),
        }
    }

    /// Index of the next segment the generator will emit.
    #[must_use]
    pub fn next_segment(&self) -> u32 {
        self.next_segment
    }

    /// Emits placement commands for every segment the scroll position now
    /// requires, in segment order. The catch-up loop guarantees no segment
    /// is skipped even when one tick jumps the scroll across several
    /// boundaries; each segment is generated exactly once.
    pub fn handle(&mut self, scroll: ScrollPosition, out_commands: &mut Vec<Command>) {
        while self.next_segment <= scroll.segment_index().max(0) as u32 {
            let segment = self.next_segment;
            self.next_segment += 1;
            self.generate_segment(segment, out_commands);
        }
    }

    fn generate_segment(&mut self, segment: u32, out_commands: &mut Vec<Command>) {
        let base_seed = derive_segment_seed(self.seed, segment);
        let mut grid = self.carried.carry_overlap();
        let mut packing_rng = SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_PACKING));

        self.pack_segment(segment, &mut grid, &mut packing_rng, out_commands);
        self.carried = grid;

        let mut vegetation_rng =
            SplitMix64::new(derive_labeled_seed(base_seed, RNG_STREAM_VEGETATION));
        self.scatter_vegetation(segment, &mut vegetation_rng, out_commands);
    }

    /// Greedy random fill: keep drawing a kind that still fits somewhere and
    /// a uniform anchor among its valid positions until nothing fits. Every
    /// draw places an object, so the loop shrinks the free area each pass
    /// and terminates.
    fn pack_segment(
        &self,
        segment: u32,
        grid: &mut OccupancyGrid,
        rng: &mut SplitMix64,
        out_commands: &mut Vec<Command>,
    ) {
        let start = segment_start(segment);
        let mut remaining: Vec<Option<u32>> = self
            .catalog
            .scenery()
            .iter()
            .map(SceneryDescriptor::segment_limit)
            .collect();

        loop {
            let mut candidates: Vec<(usize, Vec<CellCoord>)> = Vec::new();
            for (index, descriptor) in self.catalog.scenery().iter().enumerate() {
                if remaining[index] == Some(0) {
                    continue;
                }
                let anchors = grid.free_anchors(descriptor.footprint());
                if !anchors.is_empty() {
                    candidates.push((index, anchors));
                }
            }
            let Some((index, anchors)) = pick(rng, candidates) else {
                break;
            };
            let descriptor = &self.catalog.scenery()[index];
            if let Some(count) = remaining[index].as_mut() {
                *count -= 1;
            }

            let anchor = anchors[rng.next_index(anchors.len())];
            grid.occupy(anchor, descriptor.footprint());
            let position = cell_center(anchor, descriptor.footprint(), start);

            if descriptor.is_turret() {
                out_commands.push(Command::SpawnEnemy {
                    kind: EnemyKind::Turret,
                    position,
                    movement: Velocity::new(0.0, 0.0),
                    weapon: Some(pick_weapon(rng)),
                });
            } else {
                let orientation = if rng.next_bool() {
                    Orientation::Forward
                } else {
                    Orientation::Reversed
                };
                out_commands.push(Command::PlaceScenery {
                    kind: descriptor.kind(),
                    position,
                    orientation,
                });
            }
        }
    }

    fn scatter_vegetation(
        &self,
        segment: u32,
        rng: &mut SplitMix64,
        out_commands: &mut Vec<Command>,
    ) {
        if self.catalog.vegetation().is_empty() {
            return;
        }
        let start = segment_start(segment);
        for _ in 0..VEGETATION_PER_SEGMENT {
            let kind = self.catalog.vegetation()[rng.next_index(self.catalog.vegetation().len())];
            let side = if rng.next_bool() { 1.0 } else { -1.0 };
            let x = rng.next_range(-VEGETATION_BAND_HALF_WIDTH, VEGETATION_BAND_HALF_WIDTH)
                + side * VEGETATION_BAND_OFFSET;
            let z = start + rng.next_range(0.0, SEGMENT_LENGTH);
            let yaw = rng.next_range(0.0, 360.0);
            out_commands.push(Command::ScatterVegetation {
                kind,
                position: WorldPoint::new(x, z),
                yaw,
            });
        }
    }
}

/// World-space z at which the provided segment's grid begins. The opening
/// segment starts one segment length ahead of the origin.
#[must_use]
pub fn segment_start(segment: u32) -> f32 {
    segment as f32 * SEGMENT_LENGTH + SEGMENT_LENGTH
}

/// World-space center of a footprint anchored at the provided cell within a
/// segment starting at `start`.
#[must_use]
pub fn cell_center(anchor: CellCoord, footprint: Footprint, start: f32) -> WorldPoint {
    let width = footprint.columns() as f32 * CELL_SIZE;
    let depth = footprint.rows() as f32 * CELL_SIZE;
    WorldPoint::new(
        anchor.column() as f32 * CELL_SIZE + width / 2.0 - GRID_HALF_WIDTH,
        anchor.row() as f32 * CELL_SIZE + depth / 2.0 + start,
    )
}

fn pick<T>(rng: &mut SplitMix64, mut candidates: Vec<T>) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.next_index(candidates.len());
    Some(candidates.swap_remove(index))
}

fn pick_weapon(rng: &mut SplitMix64) -> WeaponKind {
    match rng.next_index(3) {
        0 => WeaponKind::Photon,
        1 => WeaponKind::Scatter,
        _ => WeaponKind::Laser,
    }
}

fn derive_segment_seed(global_seed: u64, segment: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(segment.to_le_bytes());
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

    fn next_unit(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
        let value = self.next_u64() >> 11;
        (value as f64) * SCALE
    }

    fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    fn next_range(&mut self, low: f32, high: f32) -> f32 {
        low + (self.next_unit() as f32) * (high - low)
    }
}
