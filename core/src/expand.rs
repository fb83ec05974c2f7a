// Recipe expansion: declarative shape recipes → concrete `TerrainOp`s.
//
// Each recipe draws from its own generator seeded by `(seed, recipe index)`,
// so reordering or editing one recipe never changes another's output.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::HeightSampler;
use crate::budget::{TrimSlot, pick_trim};
use crate::error::{Result, TerrainError};
use crate::heightfield::HeightField;
use crate::model::{
    BandPreference, BiasSpec, FitRect, OpKind, OpMode, OpPool, OpRecipe, ProceduralTerrainSpec,
    STROKE_NODES, TERRACE_TIERS, TerrainConfig, TerrainOp, TerrainSource, ValueSpec,
};
use crate::placement::Placer;
use crate::rng::recipe_rng;

// Candidate budget per requested centre when bias or overlap rejects points
const ATTEMPTS_PER_CENTER: u32 = 24;
// Crater rim: wider and lower than the bowl
const CRATER_RIM_SCALE: f64 = 1.35;
const CRATER_RIM_HEIGHT: f64 = 0.35;
// Terrace tiers shrink by this fraction of the base radius per step
const TERRACE_SHRINK: f64 = 0.2;
// Outside a preferred band, acceptance decays to zero over one band width (at least this)
const BAND_MIN_SPAN: f64 = 1e-3;

// Where and against what a recipe is expanded.
#[derive(Clone, Copy)]
pub struct ExpandContext<'a> {
    // Placement area for recipes without their own `area`.
    pub area: FitRect,
    // Ground used to score `preferHeight`/`preferSlope`. Without one those
    // preferences are ignored.
    pub sampler: Option<&'a dyn HeightSampler>,
}

impl<'a> ExpandContext<'a> {
    pub fn new(area: FitRect) -> Self {
        Self { area, sampler: None }
    }

    pub fn with_sampler(mut self, sampler: &'a dyn HeightSampler) -> Self {
        self.sampler = Some(sampler);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeExpansion {
    pub index: usize,
    pub kind: OpKind,
    pub ops: Vec<TerrainOp>,
    // Ops emitted per accepted centre (constant for a recipe).
    pub ops_per_center: usize,
    pub requested: u32,
    pub placed: u32,
    pub warnings: Vec<String>,
}

// Per-centre draws shared by every op of that centre
struct Shape {
    radius: f64,
    aspect: f64,
    intensity: f64,
    rotation: Option<f64>,
}

fn draw<R: Rng + ?Sized>(spec: &ValueSpec, rng: &mut R) -> f64 {
    let (lo, hi) = spec.bounds();
    if lo == hi { lo } else { rng.gen_range(lo..=hi) }
}

fn validate(recipe: &OpRecipe, index: usize) -> Result<()> {
    let (r_lo, r_hi) = recipe.radius.bounds();
    if !(r_lo > 0.0) || !r_hi.is_finite() {
        return Err(TerrainError::recipe(
            index,
            format!("radius must be > 0 (got {r_lo}..{r_hi})"),
        ));
    }
    if let Some(aspect) = &recipe.aspect {
        let (lo, hi) = aspect.bounds();
        if !(lo > 0.0) || !hi.is_finite() {
            return Err(TerrainError::recipe(index, "aspect must be > 0"));
        }
    }
    let (i_lo, i_hi) = recipe.intensity.bounds();
    if !i_lo.is_finite() || !i_hi.is_finite() {
        return Err(TerrainError::recipe(index, "intensity must be finite"));
    }
    if let Some(step) = recipe.step {
        if !(step >= 0.0) || !step.is_finite() {
            return Err(TerrainError::recipe(index, "step must be >= 0"));
        }
    }
    Ok(())
}

// Expand one recipe. Placement shortfalls are reported as warnings (and
// logged), never as errors.
pub fn expand_recipe<R: Rng + ?Sized>(
    recipe: &OpRecipe,
    index: usize,
    ctx: &ExpandContext<'_>,
    rng: &mut R,
) -> Result<RecipeExpansion> {
    validate(recipe, index)?;

    let (lo, hi) = recipe.count.bounds();
    let requested = if lo == hi { lo } else { rng.gen_range(lo..=hi) };
    let area = recipe.area.unwrap_or(ctx.area);
    let mut placer = Placer::new(&recipe.placement, area, index, rng)?;

    let per_center = recipe.ops_per_center() as usize;
    let mut ops: Vec<TerrainOp> = Vec::with_capacity(requested as usize * per_center);
    let mut placed = 0u32;
    let mut attempts = 0u32;
    let mut saturated = false;
    let max_attempts = requested.saturating_mul(ATTEMPTS_PER_CENTER);

    while placed < requested && attempts < max_attempts {
        attempts += 1;
        let Some((cx, cz)) = placer.next_point(rng) else {
            saturated = true;
            break;
        };
        let shape = Shape {
            radius: draw(&recipe.radius, rng),
            aspect: recipe.aspect.as_ref().map_or(1.0, |a| draw(a, rng)),
            intensity: draw(&recipe.intensity, rng),
            rotation: recipe.rotation.as_ref().map(|r| draw(r, rng)),
        };
        let candidate = emit_center(recipe, index, placed, (cx, cz), &shape, rng);

        if let Some(bias) = &recipe.bias {
            let p = acceptance(bias, ctx.sampler, cx, cz);
            if p < 1.0 && rng.gen_range(0.0..1.0) >= p {
                placer.reject_last();
                continue;
            }
            if bias.avoid_overlap && overlaps(&candidate, &ops) {
                placer.reject_last();
                continue;
            }
        }

        ops.extend(candidate);
        placed += 1;
    }

    let mut warnings = Vec::new();
    if placed < requested {
        let cause = if saturated {
            "placement saturated"
        } else {
            "attempt budget exhausted"
        };
        let msg = format!(
            "recipe #{index} ({}): placed {placed} of {requested} centres ({cause})",
            recipe.kind.name()
        );
        log::warn!("{msg}");
        warnings.push(msg);
    }
    log::debug!(
        "recipe #{index} ({}): {} ops from {placed} centres in {attempts} attempts",
        recipe.kind.name(),
        ops.len()
    );

    Ok(RecipeExpansion {
        index,
        kind: recipe.kind,
        ops,
        ops_per_center: per_center,
        requested,
        placed,
        warnings,
    })
}

// Ops for one accepted centre
fn emit_center<R: Rng + ?Sized>(
    recipe: &OpRecipe,
    index: usize,
    center_no: u32,
    (cx, cz): (f64, f64),
    shape: &Shape,
    rng: &mut R,
) -> Vec<TerrainOp> {
    let mode = recipe.mode.resolve(recipe.kind);
    let jitter = recipe.jitter.unwrap_or(0.0).max(0.0);
    let id = |k: u32| format!("{}-{}-{}-{}", recipe.kind.name(), index, center_no, k);
    let op = |k: u32, mode: OpMode, x: f64, z: f64, radius: f64, intensity: f64| TerrainOp {
        id: id(k),
        mode,
        x,
        z,
        radius,
        radius_z: (shape.aspect != 1.0).then_some(radius * shape.aspect),
        intensity,
        rotation: shape.rotation,
        falloff: recipe.falloff,
    };
    let mut nudge = |scale: f64| {
        if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter) * scale
        } else {
            0.0
        }
    };

    match recipe.kind {
        kind if kind.is_stroke() && recipe.step.is_some_and(|s| s > 0.0) => {
            let step = recipe.step.unwrap_or(0.0);
            let (sin, cos) = shape.rotation.unwrap_or(0.0).sin_cos();
            let half = (STROKE_NODES / 2) as i32;
            (-half..=half)
                .enumerate()
                .map(|(k, node)| {
                    let along = node as f64 * step;
                    // Lateral wobble keeps long strokes from looking ruled
                    let side = nudge(shape.radius);
                    let x = cx + cos * along - sin * side;
                    let z = cz + sin * along + cos * side;
                    op(k as u32, mode, x, z, shape.radius, shape.intensity)
                })
                .collect()
        }
        OpKind::Crater => {
            let (x, z) = (cx + nudge(shape.radius), cz + nudge(shape.radius));
            vec![
                op(
                    0,
                    OpMode::Add,
                    x,
                    z,
                    shape.radius * CRATER_RIM_SCALE,
                    shape.intensity * CRATER_RIM_HEIGHT,
                ),
                op(1, mode, x, z, shape.radius, shape.intensity),
            ]
        }
        OpKind::Terrace => {
            let (x, z) = (cx + nudge(shape.radius), cz + nudge(shape.radius));
            // Widest and lowest tier first so inner tiers override it
            (0..TERRACE_TIERS)
                .map(|k| {
                    let radius = shape.radius * (1.0 - TERRACE_SHRINK * k as f64);
                    let target = shape.intensity * (k + 1) as f64 / TERRACE_TIERS as f64;
                    op(k, mode, x, z, radius, target)
                })
                .collect()
        }
        _ => {
            let (x, z) = (cx + nudge(shape.radius), cz + nudge(shape.radius));
            vec![op(0, mode, x, z, shape.radius, shape.intensity)]
        }
    }
}

// 1 inside the band, decaying linearly to 0 one band-width outside it
fn band_score(value: f64, pref: &BandPreference) -> f64 {
    let lo = pref.min.min(pref.max);
    let hi = pref.min.max(pref.max);
    if value >= lo && value <= hi {
        return 1.0;
    }
    let span = (hi - lo).max(BAND_MIN_SPAN);
    let dist = if value < lo { lo - value } else { value - hi };
    (1.0 - dist / span).max(0.0)
}

fn soft(score: f64, weight: f64) -> f64 {
    1.0 - weight.clamp(0.0, 1.0) * (1.0 - score)
}

// Acceptance probability of a candidate centre under `bias`.
pub fn acceptance(bias: &BiasSpec, sampler: Option<&dyn HeightSampler>, x: f64, z: f64) -> f64 {
    let Some(sampler) = sampler else {
        return 1.0;
    };
    let mut p = 1.0;
    if let Some(pref) = &bias.prefer_height {
        p *= soft(band_score(sampler.height(x, z), pref), pref.weight);
    }
    if let Some(pref) = &bias.prefer_slope {
        p *= soft(band_score(sampler.slope(x, z), pref), pref.weight);
    }
    p
}

fn overlaps(candidate: &[TerrainOp], accepted: &[TerrainOp]) -> bool {
    candidate.iter().any(|c| {
        accepted.iter().any(|a| {
            let reach = c.bounding_radius() + a.bounding_radius();
            let (dx, dz) = (c.x - a.x, c.z - a.z);
            dx * dx + dz * dz < reach * reach
        })
    })
}

// Per-recipe outcome of a pool expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeReport {
    pub index: usize,
    pub kind: OpKind,
    pub requested: u32,
    pub placed: u32,
    pub ops: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolExpansion {
    pub ops: Vec<TerrainOp>,
    pub reports: Vec<RecipeReport>,
    pub warnings: Vec<String>,
}

// Expand every recipe of `pool` and enforce `global.maxOps`.
pub fn expand_pool(pool: &OpPool, seed: u64, ctx: &ExpandContext<'_>) -> Result<PoolExpansion> {
    if pool.recipes.is_empty() {
        return Err(TerrainError::EmptyPool);
    }

    let mut expansions = Vec::with_capacity(pool.recipes.len());
    for (index, recipe) in pool.recipes.iter().enumerate() {
        let mut rng: ChaCha8Rng = recipe_rng(seed, index);
        expansions.push(expand_recipe(recipe, index, ctx, &mut rng)?);
    }

    let mut warnings: Vec<String> = expansions
        .iter()
        .flat_map(|e| e.warnings.iter().cloned())
        .collect();
    if let Some(max_ops) = pool.global.max_ops {
        warnings.extend(trim_to_budget(&mut expansions, max_ops as usize));
    }

    let reports = expansions
        .iter()
        .map(|e| RecipeReport {
            index: e.index,
            kind: e.kind,
            requested: e.requested,
            placed: e.placed,
            ops: e.ops.len(),
        })
        .collect();
    let ops: Vec<TerrainOp> = expansions.into_iter().flat_map(|e| e.ops).collect();
    log::info!(
        "expanded {} recipes into {} ops",
        pool.recipes.len(),
        ops.len()
    );

    Ok(PoolExpansion { ops, reports, warnings })
}

// Drop whole trailing centres, lowest trim priority first, until the ops fit
fn trim_to_budget(expansions: &mut [RecipeExpansion], max_ops: usize) -> Vec<String> {
    let mut total: usize = expansions.iter().map(|e| e.ops.len()).sum();
    if total <= max_ops {
        return Vec::new();
    }
    let before: Vec<usize> = expansions.iter().map(|e| e.ops.len()).collect();

    for respect_floor in [true, false] {
        while total > max_ops {
            let slots: Vec<TrimSlot> = expansions
                .iter()
                .map(|e| TrimSlot {
                    kind: e.kind,
                    count: e.placed,
                    per_center: e.ops_per_center as u32,
                })
                .collect();
            let Some(i) = pick_trim(&slots, respect_floor) else {
                break;
            };
            let e = &mut expansions[i];
            let keep = e.ops.len().saturating_sub(e.ops_per_center);
            total -= e.ops.len() - keep;
            e.ops.truncate(keep);
            e.placed -= 1;
        }
    }

    expansions
        .iter()
        .zip(before)
        .filter(|(e, b)| e.ops.len() < *b)
        .map(|(e, b)| {
            let msg = format!(
                "maxOps {max_ops}: recipe #{} ({}) trimmed from {b} to {} ops",
                e.index,
                e.kind.name(),
                e.ops.len()
            );
            log::warn!("{msg}");
            msg
        })
        .collect()
}

// A spec resolved into a reusable config plus expansion diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTerrain {
    pub config: TerrainConfig,
    pub reports: Vec<RecipeReport>,
    pub warnings: Vec<String>,
}

// Resolve a procedural spec: build the base terrain, expand the pool
// against it (so height/slope bias sees the unmodified ground) and attach
// the resulting ops.
pub fn derive_config(spec: &ProceduralTerrainSpec) -> Result<GeneratedTerrain> {
    let mut config = TerrainConfig {
        width: spec.world.width,
        height: spec.world.depth,
        edge_fade: spec.edge_fade,
        source: TerrainSource::Perlin(spec.base.clone()),
        ops: Vec::new(),
        intensity_scale: spec.pool.global.intensity_scale,
    };
    let ground = HeightField::base_only(&config, None)?;
    let ctx = ExpandContext::new(spec.world.rect()).with_sampler(&ground);
    let expansion = expand_pool(&spec.pool, spec.seed, &ctx)?;
    config.ops = expansion.ops;

    Ok(GeneratedTerrain {
        config,
        reports: expansion.reports,
        warnings: expansion.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CountSpec, PlacementSpec, PoolGlobal, RecipeMode};

    fn world() -> FitRect {
        FitRect::new(-100.0, -100.0, 200.0, 200.0)
    }

    fn hills(count: CountSpec) -> OpRecipe {
        OpRecipe::new(
            OpKind::Hill,
            count,
            ValueSpec::Range([5.0, 15.0]),
            ValueSpec::Range([2.0, 6.0]),
        )
    }

    #[test]
    fn expand_is_deterministic() {
        let recipe = hills(CountSpec::Range([4, 9]));
        let ctx = ExpandContext::new(world());
        let a = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(77, 0)).unwrap();
        let b = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(77, 0)).unwrap();
        assert_eq!(a, b);
        assert!((4..=9).contains(&a.requested));
        assert_eq!(a.ops.len() as u32, a.placed);
    }

    #[test]
    fn expand_draws_stay_in_ranges() {
        let mut recipe = hills(CountSpec::Fixed(40));
        recipe.aspect = Some(ValueSpec::Range([0.5, 2.0]));
        recipe.rotation = Some(ValueSpec::Range([0.0, 1.0]));
        let ctx = ExpandContext::new(world());
        let e = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(1, 0)).unwrap();
        assert_eq!(e.ops.len(), 40);
        for op in &e.ops {
            assert!(op.radius >= 5.0 && op.radius <= 15.0);
            assert!(op.radius_z() > 0.0);
            assert!(op.intensity >= 2.0 && op.intensity <= 6.0);
            assert!(op.rotation() >= 0.0 && op.rotation() <= 1.0);
            assert_eq!(op.mode, OpMode::Add);
            assert!(world().contains(op.x, op.z));
        }
    }

    #[test]
    fn expand_stroke_emits_five_nodes_along_rotation() {
        let mut recipe = OpRecipe::new(
            OpKind::Valley,
            CountSpec::Fixed(1),
            ValueSpec::Fixed(6.0),
            ValueSpec::Fixed(4.0),
        );
        recipe.step = Some(10.0);
        recipe.rotation = Some(ValueSpec::Fixed(std::f64::consts::FRAC_PI_2));
        recipe.placement = PlacementSpec::Ring { center: [3.0, 7.0], r_min: 0.0, r_max: 0.0 };
        let ctx = ExpandContext::new(world());
        let e = expand_recipe(&recipe, 2, &ctx, &mut recipe_rng(5, 2)).unwrap();
        assert_eq!(e.ops.len(), 5);
        assert_eq!(e.ops_per_center, 5);
        for (k, op) in e.ops.iter().enumerate() {
            assert_eq!(op.mode, OpMode::Sub);
            assert!((op.x - 3.0).abs() < 1e-9);
            assert!((op.z - (7.0 + (k as f64 - 2.0) * 10.0)).abs() < 1e-9);
        }
        assert_eq!(e.ops[0].id, "valley-2-0-0");
    }

    #[test]
    fn expand_composite_kinds() {
        let ctx = ExpandContext::new(world());
        let crater = OpRecipe::new(
            OpKind::Crater,
            CountSpec::Fixed(3),
            ValueSpec::Fixed(10.0),
            ValueSpec::Fixed(5.0),
        );
        let e = expand_recipe(&crater, 0, &ctx, &mut recipe_rng(1, 0)).unwrap();
        assert_eq!(e.ops.len(), 6);
        assert_eq!(e.ops[0].mode, OpMode::Add);
        assert_eq!(e.ops[1].mode, OpMode::Sub);
        assert!(e.ops[0].radius > e.ops[1].radius);

        let terrace = OpRecipe::new(
            OpKind::Terrace,
            CountSpec::Fixed(1),
            ValueSpec::Fixed(20.0),
            ValueSpec::Fixed(8.0),
        );
        let e = expand_recipe(&terrace, 0, &ctx, &mut recipe_rng(1, 0)).unwrap();
        assert_eq!(e.ops.len(), 4);
        assert!(e.ops.iter().all(|op| op.mode == OpMode::Set));
        assert_eq!(e.ops[3].intensity, 8.0);
        assert!(e.ops[3].radius < e.ops[0].radius);

        let mut plateau = OpRecipe::new(
            OpKind::Plateau,
            CountSpec::Fixed(1),
            ValueSpec::Fixed(20.0),
            ValueSpec::Fixed(8.0),
        );
        plateau.mode = RecipeMode::Add;
        let e = expand_recipe(&plateau, 0, &ctx, &mut recipe_rng(1, 0)).unwrap();
        assert_eq!(e.ops[0].mode, OpMode::Add);
    }

    #[test]
    fn expand_rejects_non_positive_radius() {
        let recipe = OpRecipe::new(
            OpKind::Hill,
            CountSpec::Fixed(1),
            ValueSpec::Range([0.0, 3.0]),
            ValueSpec::Fixed(1.0),
        );
        let err = expand_recipe(&recipe, 6, &ExpandContext::new(world()), &mut recipe_rng(1, 6));
        assert!(matches!(err, Err(TerrainError::InvalidRecipe { index: 6, .. })));
    }

    #[test]
    fn expand_avoid_overlap_keeps_circles_apart() {
        let mut recipe = hills(CountSpec::Fixed(12));
        recipe.radius = ValueSpec::Fixed(10.0);
        recipe.bias = Some(BiasSpec {
            avoid_overlap: true,
            ..Default::default()
        });
        let ctx = ExpandContext::new(world());
        let e = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(4, 0)).unwrap();
        for (i, a) in e.ops.iter().enumerate() {
            for b in &e.ops[i + 1..] {
                let d = ((a.x - b.x).powi(2) + (a.z - b.z).powi(2)).sqrt();
                assert!(d >= 20.0);
            }
        }
    }

    #[test]
    fn expand_height_bias_prefers_band() {
        // Ground rises along x; the band covers x in [-100, -50] and its
        // acceptance ramp ends at x = 0
        let ground = |x: f64, _z: f64| x;
        let mut recipe = hills(CountSpec::Fixed(30));
        recipe.bias = Some(BiasSpec {
            prefer_height: Some(BandPreference { min: -100.0, max: -50.0, weight: 1.0 }),
            ..Default::default()
        });
        let ctx = ExpandContext::new(world()).with_sampler(&ground);
        let e = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(11, 0)).unwrap();
        assert_eq!(e.placed, 30);
        assert!(e.ops.iter().all(|op| op.x <= 0.0));
    }

    #[test]
    fn expand_slope_bias_prefers_flat_ground() {
        // Flat for x < 0, a 45° ramp beyond it
        let ground = |x: f64, _z: f64| x.max(0.0);
        let mut recipe = hills(CountSpec::Fixed(30));
        recipe.bias = Some(BiasSpec {
            prefer_slope: Some(BandPreference { min: 0.0, max: 0.1, weight: 1.0 }),
            ..Default::default()
        });
        let ctx = ExpandContext::new(world()).with_sampler(&ground);
        let e = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(12, 0)).unwrap();
        assert_eq!(e.placed, 30);
        // Only the finite-difference window around the crease sees a partial slope
        assert!(e.ops.iter().all(|op| op.x < crate::NORMAL_EPS));
    }

    #[test]
    fn expand_bias_without_sampler_accepts_all() {
        let bias = BiasSpec {
            prefer_height: Some(BandPreference { min: 0.0, max: 1.0, weight: 1.0 }),
            ..Default::default()
        };
        assert_eq!(acceptance(&bias, None, 500.0, 500.0), 1.0);
        let flat = |_x: f64, _z: f64| 3.0;
        // One band width outside: fully rejected; half a weight halves the penalty
        assert_eq!(acceptance(&bias, Some(&flat), 0.0, 0.0), 0.0);
        let half = BiasSpec {
            prefer_height: Some(BandPreference { min: 0.0, max: 1.0, weight: 0.5 }),
            ..Default::default()
        };
        assert!((acceptance(&half, Some(&flat), 0.0, 0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn expand_poisson_saturation_is_a_warning() {
        let mut recipe = hills(CountSpec::Fixed(50));
        recipe.placement = PlacementSpec::Poisson { min_distance: 10.0 };
        recipe.area = Some(FitRect::new(0.0, 0.0, 15.0, 15.0));
        let ctx = ExpandContext::new(world());
        let e = expand_recipe(&recipe, 0, &ctx, &mut recipe_rng(8, 0)).unwrap();
        assert!(e.placed < 50);
        assert_eq!(e.warnings.len(), 1);
        assert!(e.warnings[0].contains("saturated"));
    }

    #[test]
    fn expand_pool_enforces_max_ops() {
        let mut valley = OpRecipe::new(
            OpKind::Valley,
            CountSpec::Fixed(2),
            ValueSpec::Fixed(8.0),
            ValueSpec::Fixed(3.0),
        );
        valley.step = Some(6.0);
        let pool = OpPool {
            global: PoolGlobal { intensity_scale: None, max_ops: Some(12) },
            recipes: vec![valley, hills(CountSpec::Fixed(10))],
        };
        let out = expand_pool(&pool, 3, &ExpandContext::new(world())).unwrap();
        assert!(out.ops.len() <= 12);
        // Hills are cut first; valley strokes survive intact
        assert_eq!(out.reports[0].ops, 10);
        assert_eq!(out.reports[1].ops, 2);
        assert!(out.warnings.iter().any(|w| w.contains("maxOps")));
    }

    #[test]
    fn expand_pool_rejects_empty() {
        let err = expand_pool(&OpPool::default(), 0, &ExpandContext::new(world()));
        assert_eq!(err, Err(TerrainError::EmptyPool));
    }

    #[test]
    fn expand_recipe_streams_are_isolated() {
        let pool_a = OpPool {
            global: Default::default(),
            recipes: vec![hills(CountSpec::Fixed(3)), hills(CountSpec::Fixed(4))],
        };
        let mut pool_b = pool_a.clone();
        pool_b.recipes[0].count = CountSpec::Fixed(7);
        let ctx = ExpandContext::new(world());
        let a = expand_pool(&pool_a, 9, &ctx).unwrap();
        let b = expand_pool(&pool_b, 9, &ctx).unwrap();
        // Recipe #1 is unaffected by the edit to recipe #0
        assert_eq!(a.ops[3..], b.ops[7..]);
    }
}
