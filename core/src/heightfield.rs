// Height-field evaluator: base source plus the ordered list of elliptical ops.

use crate::HeightSampler;
use crate::error::{Result, TerrainError};
use crate::heightmap::{HeightmapPixels, HeightmapSampler, LegacyGrid};
use crate::model::{Falloff, OpMode, TerrainConfig, TerrainOp, TerrainSource};
use crate::perlin2::Perlin2D;
use crate::utils::{lerp, smoothstep};

// Steepness of the `gauss` falloff: `exp(-((1 - t) * k)^2)`.
// With k = 2.5 the weight at the ellipse rim is exp(-6.25) ≈ 0.002.
pub const GAUSS_K: f64 = 2.5;

enum BaseSource {
    Perlin(Perlin2D),
    Heightmap(HeightmapSampler),
    Legacy(LegacyGrid),
}

// TerrainOp with its inverse transform precomputed
struct PreparedOp {
    x: f64,
    z: f64,
    inv_rx: f64,
    inv_rz: f64,
    cos: f64,
    sin: f64,
    reach: f64,
    intensity: f64,
    mode: OpMode,
    falloff: Falloff,
}

impl PreparedOp {
    fn new(op: &TerrainOp) -> Result<Self> {
        let rz = op.radius_z();
        if !(op.radius > 0.0) || !(rz > 0.0) {
            return Err(TerrainError::InvalidOp {
                id: op.id.clone(),
                reason: format!("radius must be > 0 (got {} x {})", op.radius, rz),
            });
        }
        let (sin, cos) = op.rotation().sin_cos();
        Ok(Self {
            x: op.x,
            z: op.z,
            inv_rx: 1.0 / op.radius,
            inv_rz: 1.0 / rz,
            cos,
            sin,
            reach: op.bounding_radius(),
            intensity: op.intensity,
            mode: op.mode,
            falloff: op.falloff(),
        })
    }

    // Falloff weight at (x, z), or None outside the ellipse
    #[inline]
    fn weight(&self, x: f64, z: f64) -> Option<f64> {
        let dx = x - self.x;
        let dz = z - self.z;
        if dx.abs() >= self.reach || dz.abs() >= self.reach {
            return None;
        }
        // Rotate into the op's local frame
        let lx = dx * self.cos + dz * self.sin;
        let lz = -dx * self.sin + dz * self.cos;
        let d = ((lx * self.inv_rx).powi(2) + (lz * self.inv_rz).powi(2)).sqrt();
        if d >= 1.0 {
            return None;
        }
        Some(falloff_weight(self.falloff, 1.0 - d))
    }

    #[inline]
    fn apply(&self, h: f64, w: f64) -> f64 {
        match self.mode {
            OpMode::Add => h + self.intensity * w,
            OpMode::Sub => h - self.intensity * w,
            OpMode::Set => lerp(h, self.intensity, w),
        }
    }
}

// `t` is 1 at the op centre and 0 at its rim.
#[inline]
pub fn falloff_weight(falloff: Falloff, t: f64) -> f64 {
    match falloff {
        Falloff::Smoothstep => smoothstep(t),
        Falloff::Gauss => {
            let e = (1.0 - t) * GAUSS_K;
            (-e * e).exp()
        }
        Falloff::Linear => t.clamp(0.0, 1.0),
    }
}

// Sampler over a `TerrainConfig`. Cheap to build, immutable afterwards and
// safe to share between threads.
pub struct HeightField {
    width: f64,
    depth: f64,
    base: BaseSource,
    base_scale: f64,
    edge_fade: f64,
    ops: Vec<PreparedOp>,
}

impl HeightField {
    // Build from a config whose source needs no external pixels.
    pub fn new(config: &TerrainConfig) -> Result<Self> {
        Self::build(config, None, true)
    }

    // Build from a heightmap config with its decoded pixels.
    pub fn with_heightmap(config: &TerrainConfig, pixels: HeightmapPixels) -> Result<Self> {
        Self::build(config, Some(pixels), true)
    }

    // Same base terrain, no ops. Used to bias placement against the unmodified ground.
    pub fn base_only(config: &TerrainConfig, pixels: Option<HeightmapPixels>) -> Result<Self> {
        Self::build(config, pixels, false)
    }

    fn build(
        config: &TerrainConfig,
        pixels: Option<HeightmapPixels>,
        with_ops: bool,
    ) -> Result<Self> {
        if !(config.width > 0.0) || !(config.height > 0.0) {
            return Err(TerrainError::InvalidSource(format!(
                "world extent must be positive (got {} x {})",
                config.width, config.height
            )));
        }
        let base = match &config.source {
            TerrainSource::Perlin(params) => {
                BaseSource::Perlin(Perlin2D::new(params, config.width, config.height))
            }
            TerrainSource::Heightmap {
                asset,
                width,
                height,
                min_height,
                max_height,
                edge,
            } => {
                let pixels = pixels.ok_or_else(|| {
                    TerrainError::InvalidSource(format!("heightmap '{asset}' has no pixel data"))
                })?;
                if pixels.width() != *width as usize || pixels.height() != *height as usize {
                    log::warn!(
                        "heightmap '{}' declared {}x{} but pixels are {}x{}",
                        asset,
                        width,
                        height,
                        pixels.width(),
                        pixels.height()
                    );
                }
                BaseSource::Heightmap(HeightmapSampler::new(
                    pixels,
                    *min_height,
                    *max_height,
                    *edge,
                ))
            }
            TerrainSource::Legacy { data, width, height } => {
                BaseSource::Legacy(LegacyGrid::new(*width, *height, data.clone())?)
            }
        };

        let ops = if with_ops {
            config.ops.iter().map(PreparedOp::new).collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        Ok(Self {
            width: config.width,
            depth: config.height,
            base,
            base_scale: config.intensity_scale.unwrap_or(1.0),
            edge_fade: config.edge_fade.unwrap_or(0.0).clamp(0.0, 1.0),
            ops,
        })
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    pub fn base_height(&self, x: f64, z: f64) -> f64 {
        let raw = match &self.base {
            BaseSource::Perlin(p) => p.height(x, z),
            BaseSource::Heightmap(hm) => {
                let (u, v) = self.to_uv(x, z);
                hm.height(u, v)
            }
            BaseSource::Legacy(grid) => {
                let (u, v) = self.to_uv(x, z);
                grid.height(u, v)
            }
        };
        raw * self.base_scale
    }

    // World is centred on the origin
    #[inline]
    fn to_uv(&self, x: f64, z: f64) -> (f64, f64) {
        ((x / self.width) + 0.5, (z / self.depth) + 0.5)
    }

    // Multiplier for op contributions; falls linearly to 0 at the world border.
    pub fn edge_factor(&self, x: f64, z: f64) -> f64 {
        if self.edge_fade <= 0.0 {
            return 1.0;
        }
        let hw = self.width * 0.5;
        let hd = self.depth * 0.5;
        let fx = ((hw - x.abs()) / (self.edge_fade * hw)).clamp(0.0, 1.0);
        let fz = ((hd - z.abs()) / (self.edge_fade * hd)).clamp(0.0, 1.0);
        fx.min(fz)
    }
}

impl HeightSampler for HeightField {
    fn height(&self, x: f64, z: f64) -> f64 {
        let base = self.base_height(x, z);
        if self.ops.is_empty() {
            return base;
        }
        let mut h = base;
        for op in &self.ops {
            if let Some(w) = op.weight(x, z) {
                h = op.apply(h, w);
            }
        }
        base + (h - base) * self.edge_factor(x, z)
    }
}
