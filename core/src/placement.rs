// Candidate centre generators for recipe expansion.
//
// A `Placer` is a stateful stream of points. `Uniform` and `Ring` never run
// dry; `Poisson` and `GridJitter` return `None` once the area is saturated.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{Result, TerrainError};
use crate::model::{FitRect, PlacementSpec};

// Darts thrown per requested point before the sweep fallback kicks in
const POISSON_DARTS: usize = 30;
// Sweep candidates tried inside each empty cell
const POISSON_SWEEP_TRIES: usize = 4;
const DEFAULT_GRID_JITTER: f64 = 0.25;

pub enum Placer {
    Uniform { area: FitRect },
    Poisson(PoissonDisc),
    Grid { points: Vec<(f64, f64)>, next: usize },
    Ring { cx: f64, cz: f64, r_min_sq: f64, r_max_sq: f64 },
}

impl Placer {
    // `index` is the recipe index, used only for error reporting.
    pub fn new<R: Rng + ?Sized>(
        spec: &PlacementSpec,
        area: FitRect,
        index: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let needs_area = !matches!(spec, PlacementSpec::Ring { .. });
        if needs_area && !(area.width > 0.0 && area.depth > 0.0) {
            return Err(TerrainError::ZeroArea { index });
        }

        match *spec {
            PlacementSpec::Uniform => Ok(Placer::Uniform { area }),
            PlacementSpec::Poisson { min_distance } => {
                if !(min_distance > 0.0) {
                    return Err(TerrainError::recipe(index, "poisson minDistance must be > 0"));
                }
                Ok(Placer::Poisson(PoissonDisc::new(area, min_distance)))
            }
            PlacementSpec::GridJitter { cell, jitter } => {
                if !(cell > 0.0) {
                    return Err(TerrainError::recipe(index, "gridJitter cell must be > 0"));
                }
                let jitter = jitter.unwrap_or(DEFAULT_GRID_JITTER).clamp(0.0, 1.0);
                Ok(Placer::Grid {
                    points: jittered_grid(area, cell, jitter, rng),
                    next: 0,
                })
            }
            PlacementSpec::Ring { center, r_min, r_max } => {
                if r_min < 0.0 || r_max < r_min {
                    return Err(TerrainError::recipe(
                        index,
                        format!("ring radii must satisfy 0 <= rMin <= rMax (got {r_min}, {r_max})"),
                    ));
                }
                Ok(Placer::Ring {
                    cx: center[0],
                    cz: center[1],
                    r_min_sq: r_min * r_min,
                    r_max_sq: r_max * r_max,
                })
            }
        }
    }

    pub fn next_point<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(f64, f64)> {
        match self {
            Placer::Uniform { area } => Some(uniform_in(area, rng)),
            Placer::Poisson(disc) => disc.next_point(rng),
            Placer::Grid { points, next } => {
                let p = points.get(*next).copied();
                *next += 1;
                p
            }
            Placer::Ring { cx, cz, r_min_sq, r_max_sq } => {
                let angle = rng.gen_range(0.0..std::f64::consts::TAU);
                let u = rng.gen_range(0.0..1.0);
                // Area-proportional radius so points don't bunch at the centre
                let r = crate::utils::lerp(*r_min_sq, *r_max_sq, u).sqrt();
                Some((*cx + r * angle.cos(), *cz + r * angle.sin()))
            }
        }
    }

    // Drop an accepted point from the Poisson spacing grid. Used when a
    // candidate is produced but then rejected by bias.
    pub fn reject_last(&mut self) {
        if let Placer::Poisson(disc) = self {
            disc.pop();
        }
    }
}

fn uniform_in<R: Rng + ?Sized>(area: &FitRect, rng: &mut R) -> (f64, f64) {
    (
        rng.gen_range(area.x..area.max_x()),
        rng.gen_range(area.z..area.max_z()),
    )
}

fn jittered_grid<R: Rng + ?Sized>(
    area: FitRect,
    cell: f64,
    jitter: f64,
    rng: &mut R,
) -> Vec<(f64, f64)> {
    let cols = (area.width / cell).ceil().max(1.0) as usize;
    let rows = (area.depth / cell).ceil().max(1.0) as usize;
    let amp = jitter * cell;
    let mut points = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let mut x = area.x + (col as f64 + 0.5) * cell;
            let mut z = area.z + (row as f64 + 0.5) * cell;
            if amp > 0.0 {
                x += rng.gen_range(-amp..=amp);
                z += rng.gen_range(-amp..=amp);
            }
            if area.contains(x, z) {
                points.push((x, z));
            }
        }
    }
    // Visit cells in random order so a small count doesn't fill one corner
    points.shuffle(rng);
    points
}

// Dart-throwing Poisson-disc sampler over a hash grid with cell size d/√2,
// so each cell holds at most one accepted point.
pub struct PoissonDisc {
    area: FitRect,
    min_dist: f64,
    cell: f64,
    cols: usize,
    rows: usize,
    grid: Vec<Option<usize>>,
    points: Vec<(f64, f64)>,
    sweep_cursor: usize,
    saturated: bool,
}

impl PoissonDisc {
    pub fn new(area: FitRect, min_dist: f64) -> Self {
        let cell = min_dist / std::f64::consts::SQRT_2;
        let cols = (area.width / cell).ceil().max(1.0) as usize;
        let rows = (area.depth / cell).ceil().max(1.0) as usize;
        Self {
            area,
            min_dist,
            cell,
            cols,
            rows,
            grid: vec![None; cols * rows],
            points: Vec::new(),
            sweep_cursor: 0,
            saturated: false,
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    #[inline]
    fn cell_of(&self, x: f64, z: f64) -> (usize, usize) {
        let cx = ((x - self.area.x) / self.cell).floor().max(0.0) as usize;
        let cz = ((z - self.area.z) / self.cell).floor().max(0.0) as usize;
        (cx.min(self.cols - 1), cz.min(self.rows - 1))
    }

    fn fits(&self, x: f64, z: f64) -> bool {
        let (cx, cz) = self.cell_of(x, z);
        let d2 = self.min_dist * self.min_dist;
        // Cell diagonal is d, so neighbours further than 2 cells are out of reach
        let x0 = cx.saturating_sub(2);
        let z0 = cz.saturating_sub(2);
        let x1 = (cx + 2).min(self.cols - 1);
        let z1 = (cz + 2).min(self.rows - 1);
        for gz in z0..=z1 {
            for gx in x0..=x1 {
                if let Some(i) = self.grid[gz * self.cols + gx] {
                    let (px, pz) = self.points[i];
                    let (dx, dz) = (px - x, pz - z);
                    if dx * dx + dz * dz < d2 {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn insert(&mut self, x: f64, z: f64) {
        let (cx, cz) = self.cell_of(x, z);
        self.grid[cz * self.cols + cx] = Some(self.points.len());
        self.points.push((x, z));
    }

    fn pop(&mut self) {
        if let Some((x, z)) = self.points.pop() {
            let (cx, cz) = self.cell_of(x, z);
            self.grid[cz * self.cols + cx] = None;
        }
    }

    pub fn next_point<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(f64, f64)> {
        if self.saturated {
            return None;
        }
        for _ in 0..POISSON_DARTS {
            let (x, z) = uniform_in(&self.area, rng);
            if self.fits(x, z) {
                self.insert(x, z);
                return Some((x, z));
            }
        }

        // Darts keep missing: sweep the remaining empty cells in order
        while self.sweep_cursor < self.grid.len() {
            let idx = self.sweep_cursor;
            if self.grid[idx].is_none() {
                let gx = (idx % self.cols) as f64;
                let gz = (idx / self.cols) as f64;
                for attempt in 0..POISSON_SWEEP_TRIES {
                    let (ox, oz) = if attempt == 0 {
                        (0.5, 0.5)
                    } else {
                        (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0))
                    };
                    let x = (self.area.x + (gx + ox) * self.cell).min(self.area.max_x());
                    let z = (self.area.z + (gz + oz) * self.cell).min(self.area.max_z());
                    if self.fits(x, z) {
                        self.insert(x, z);
                        return Some((x, z));
                    }
                }
            }
            self.sweep_cursor += 1;
        }

        self.saturated = true;
        None
    }
}
