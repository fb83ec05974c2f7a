// Terrain data model: sources, operations, configuration and the declarative
// procedural spec. These are plain value types with no behaviour beyond small
// accessors; everything serializes as camelCase JSON.

use serde::{Deserialize, Serialize};

// How an op combines with the height accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpMode {
    #[default]
    Add,
    Sub,
    // Pull the height toward `intensity`, weighted by the falloff
    Set,
}

// Radial attenuation shape of an op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Falloff {
    #[default]
    Smoothstep,
    Gauss,
    Linear,
}

// One elliptical height modifier in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainOp {
    pub id: String,
    pub mode: OpMode,
    pub x: f64,
    pub z: f64,
    // Semi-axis along local X. Always > 0.
    pub radius: f64,
    // Semi-axis along local Z; `None` means a circle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_z: Option<f64>,
    pub intensity: f64,
    // Radians, counter-clockwise from +X toward +Z.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub falloff: Option<Falloff>,
}

impl TerrainOp {
    pub fn radius_z(&self) -> f64 {
        self.radius_z.unwrap_or(self.radius)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }

    pub fn falloff(&self) -> Falloff {
        self.falloff.unwrap_or_default()
    }

    // Largest semi-axis, used for coarse overlap tests
    pub fn bounding_radius(&self) -> f64 {
        self.radius.max(self.radius_z())
    }
}

// Sampling behaviour outside a heightmap's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoiseOffset {
    pub dx: f64,
    pub dz: f64,
}

// Base fBm noise. `width`/`height` are the number of noise lattice cells that
// span the world along X/Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerlinParams {
    pub seed: u64,
    pub octaves: u32,
    pub amplitude: f64,
    pub persistence: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<NoiseOffset>,
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            amplitude: 10.0,
            persistence: 0.5,
            width: 4.0,
            height: 4.0,
            offset: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TerrainSource {
    Perlin(PerlinParams),
    #[serde(rename_all = "camelCase")]
    Heightmap {
        // Resolved by the caller's asset store; the core never loads it
        asset: String,
        width: u32,
        height: u32,
        min_height: f64,
        max_height: f64,
        #[serde(default)]
        edge: EdgeMode,
    },
    // Migration path for configs that stored raw height samples
    Legacy {
        data: Vec<f64>,
        width: usize,
        height: usize,
    },
}

// Fully resolved terrain: what the height-field evaluator consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_fade: Option<f64>,
    pub source: TerrainSource,
    #[serde(default)]
    pub ops: Vec<TerrainOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_scale: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: f64,
    pub depth: f64,
}

impl WorldSize {
    pub fn new(width: f64, depth: f64) -> Self {
        Self { width, depth }
    }

    // World extent as a rectangle centred on the origin
    pub fn rect(&self) -> FitRect {
        FitRect::new(-self.width * 0.5, -self.depth * 0.5, self.width, self.depth)
    }
}

// Axis-aligned rectangle; `(x, z)` is the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRect {
    pub x: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
}

impl FitRect {
    pub fn new(x: f64, z: f64, width: f64, depth: f64) -> Self {
        Self { x, z, width, depth }
    }

    pub fn centered(cx: f64, cz: f64, width: f64, depth: f64) -> Self {
        Self::new(cx - width * 0.5, cz - depth * 0.5, width, depth)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.z + self.depth * 0.5)
    }

    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_z(&self) -> f64 {
        self.z + self.depth
    }

    pub fn contains(&self, x: f64, z: f64) -> bool {
        x >= self.x && x <= self.max_x() && z >= self.z && z <= self.max_z()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpKind {
    Hill,
    Basin,
    Ridge,
    Valley,
    Crater,
    Plateau,
    Terrace,
    Dune,
}

impl OpKind {
    // Ridge and valley strokes are drawn as a chain of ellipses when `step` is set.
    pub fn is_stroke(self) -> bool {
        matches!(self, OpKind::Ridge | OpKind::Valley)
    }

    // Ops emitted for each placed centre.
    pub fn ops_per_center(self, step: Option<f64>) -> u32 {
        match self {
            OpKind::Ridge | OpKind::Valley if step.is_some_and(|s| s > 0.0) => STROKE_NODES,
            OpKind::Crater => 2,
            OpKind::Terrace => TERRACE_TIERS,
            _ => 1,
        }
    }

    // Higher survives budget trimming longer
    pub fn trim_priority(self) -> u8 {
        match self {
            OpKind::Valley => 3,
            OpKind::Ridge => 2,
            _ => 1,
        }
    }

    // Smallest count budget trimming may reduce this kind to
    pub fn min_count(self) -> u32 {
        match self {
            OpKind::Valley => 1,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OpKind::Hill => "hill",
            OpKind::Basin => "basin",
            OpKind::Ridge => "ridge",
            OpKind::Valley => "valley",
            OpKind::Crater => "crater",
            OpKind::Plateau => "plateau",
            OpKind::Terrace => "terrace",
            OpKind::Dune => "dune",
        }
    }
}

pub const STROKE_NODES: u32 = 5;
pub const TERRACE_TIERS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecipeMode {
    #[default]
    Auto,
    Add,
    Sub,
    Set,
}

impl RecipeMode {
    // Mode of the primary op for `kind`. Crater rims and terrace tiers add
    // their own fixed secondary modes in the expander.
    pub fn resolve(self, kind: OpKind) -> OpMode {
        match self {
            RecipeMode::Add => OpMode::Add,
            RecipeMode::Sub => OpMode::Sub,
            RecipeMode::Set => OpMode::Set,
            RecipeMode::Auto => match kind {
                OpKind::Hill | OpKind::Ridge | OpKind::Dune => OpMode::Add,
                OpKind::Basin | OpKind::Valley | OpKind::Crater => OpMode::Sub,
                OpKind::Plateau | OpKind::Terrace => OpMode::Set,
            },
        }
    }
}

// Fixed count or inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountSpec {
    Fixed(u32),
    Range([u32; 2]),
}

impl CountSpec {
    pub fn bounds(&self) -> (u32, u32) {
        match *self {
            CountSpec::Fixed(n) => (n, n),
            CountSpec::Range([a, b]) => (a.min(b), a.max(b)),
        }
    }

    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.bounds();
        (lo as f64 + hi as f64) * 0.5
    }

    // Count used for estimation: nearest integer of the midpoint
    pub fn estimate(&self) -> u32 {
        self.midpoint().round() as u32
    }
}

impl Default for CountSpec {
    fn default() -> Self {
        CountSpec::Fixed(1)
    }
}

// Fixed scalar or `[min, max]` range drawn uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    Fixed(f64),
    Range([f64; 2]),
}

impl ValueSpec {
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            ValueSpec::Fixed(v) => (v, v),
            ValueSpec::Range([a, b]) => (a.min(b), a.max(b)),
        }
    }

    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.bounds();
        (lo + hi) * 0.5
    }
}

impl From<f64> for ValueSpec {
    fn from(v: f64) -> Self {
        ValueSpec::Fixed(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlacementSpec {
    #[default]
    Uniform,
    #[serde(rename_all = "camelCase")]
    Poisson { min_distance: f64 },
    #[serde(rename_all = "camelCase")]
    GridJitter {
        cell: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        jitter: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Ring { center: [f64; 2], r_min: f64, r_max: f64 },
}

// Soft preference for a value band; `weight` in [0, 1] scales how strongly
// candidates outside the band are discouraged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPreference {
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer_height: Option<BandPreference>,
    // Radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer_slope: Option<BandPreference>,
    #[serde(default)]
    pub avoid_overlap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpRecipe {
    pub kind: OpKind,
    #[serde(default)]
    pub mode: RecipeMode,
    #[serde(default)]
    pub count: CountSpec,
    #[serde(default)]
    pub placement: PlacementSpec,
    pub radius: ValueSpec,
    // radiusZ / radius. Defaults to 1 (circle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<ValueSpec>,
    pub intensity: ValueSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<ValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub falloff: Option<Falloff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<BiasSpec>,
    // Positional jitter as a fraction of the resolved radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter: Option<f64>,
    // Spacing between stroke nodes (ridge/valley only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    // Placement area; the whole world when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<FitRect>,
}

impl OpRecipe {
    pub fn new(kind: OpKind, count: CountSpec, radius: ValueSpec, intensity: ValueSpec) -> Self {
        Self {
            kind,
            mode: RecipeMode::Auto,
            count,
            placement: PlacementSpec::Uniform,
            radius,
            aspect: None,
            intensity,
            rotation: None,
            falloff: None,
            bias: None,
            jitter: None,
            step: None,
            area: None,
        }
    }

    pub fn ops_per_center(&self) -> u32 {
        self.kind.ops_per_center(self.step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolGlobal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ops: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpPool {
    #[serde(default)]
    pub global: PoolGlobal,
    #[serde(default)]
    pub recipes: Vec<OpRecipe>,
}

// Compact declarative description of a whole terrain. Identical spec and
// seed always produce identical ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProceduralTerrainSpec {
    pub world: WorldSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_fade: Option<f64>,
    pub base: PerlinParams,
    pub pool: OpPool,
    pub seed: u64,
}
