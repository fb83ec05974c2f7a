// core holds recipe expansion, the height-field evaluator, the fit helpers and
// the splat synthesizer
pub mod budget;
pub mod error;
pub mod expand;
pub mod fit;
pub mod heightfield;
pub mod heightmap;
pub mod model;
pub mod perlin2;
pub mod placement;
pub mod rng;
pub mod splat;
pub mod utils;

pub use budget::{
    BudgetChange, BudgetResult, auto_budget, estimate_ops_for_recipes, suggest_global_budget,
};
pub use error::{Result, TerrainError};
pub use expand::{
    ExpandContext, GeneratedTerrain, PoolExpansion, RecipeExpansion, RecipeReport, derive_config,
    expand_pool, expand_recipe,
};
pub use fit::{
    Continuity, Direction, FitResult, RidgeBandFitOptions, RidgePattern, ValleyFitOptions,
    Variation, ridge_band_fit_to_recipes, valley_fit_to_recipes,
};
pub use heightfield::HeightField;
pub use heightmap::HeightmapPixels;
pub use model::*;
pub use splat::{SplatOutput, SplatParams, SplatStats, compute_weights};

// Finite-difference step used for normals, in world units
pub const NORMAL_EPS: f64 = 0.25;

// Anything that can report terrain elevation at a world point.
// Only `height` is required; normals and slope fall out of finite differences.
pub trait HeightSampler {
    // Elevation at world (x, z)
    fn height(&self, x: f64, z: f64) -> f64;

    // Unit surface normal from symmetric differences: normalize(-dh/dx, 1, -dh/dz)
    fn normal(&self, x: f64, z: f64) -> [f64; 3] {
        let e = NORMAL_EPS;
        let dhdx = (self.height(x + e, z) - self.height(x - e, z)) / (2.0 * e);
        let dhdz = (self.height(x, z + e) - self.height(x, z - e)) / (2.0 * e);
        let (nx, ny, nz) = (-dhdx, 1.0, -dhdz);
        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        if !len.is_finite() || len == 0.0 {
            return [0.0, 1.0, 0.0];
        }
        [nx / len, ny / len, nz / len]
    }

    // Angle between the normal and +Y, radians
    fn slope(&self, x: f64, z: f64) -> f64 {
        self.normal(x, z)[1].clamp(-1.0, 1.0).acos()
    }
}

// Plain closures work as samplers, handy for tests and externally cached fields
impl<F> HeightSampler for F
where
    F: Fn(f64, f64) -> f64,
{
    fn height(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}
