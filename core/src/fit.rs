// Fit helpers: derive valley / ridge-band recipes that fill a rectangle.
//
// Both fits lay a band along the resolved orientation. A continuous band is a
// single 5-ellipse stroke anchored at the rectangle centre; a segmented band is
// a run of independent ellipses scattered inside the rectangle.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::budget::estimate_ops_for_recipes;
use crate::error::{Result, TerrainError};
use crate::model::{
    CountSpec, Falloff, FitRect, OpKind, OpRecipe, PlacementSpec, ValueSpec, WorldSize,
};

// Stroke overlap: node radius as a fraction of node spacing
const STROKE_OVERLAP: f64 = 0.7;
// Share of the usable half-length the stroke is allowed to cover
const STROKE_FILL: f64 = 0.95;
const ASPECT_MIN: f64 = 0.3;
const ASPECT_MAX: f64 = 2.0;
const MIN_SHRUNK_RADIUS: f64 = 5.0;
const MARGIN_FRACTION: f64 = 0.05;
const SEGMENT_RADIUS_SCALE: f64 = 0.9;
const MIN_SEGMENTS: u32 = 3;
const VALLEY_BASE_DEPTH: f64 = 8.0;
const RIDGE_BASE_HEIGHT: f64 = 10.0;
// Endpoint reach above this share of the usable half-length gets a warning
const ENDPOINT_WARN_RATIO: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Auto,
    X,
    Z,
    #[serde(untagged)]
    Radians(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continuity {
    #[default]
    Continuous,
    Segmented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variation {
    Low,
    #[default]
    Medium,
    High,
}

impl Variation {
    // Relative spread applied to drawn radius / intensity
    fn spread(self) -> f64 {
        match self {
            Variation::Low => 0.1,
            Variation::Medium => 0.2,
            Variation::High => 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValleyFitOptions {
    // Cross-section width of the valley, world units.
    pub thickness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    // Used when `depth` is absent, as a percentage of the default depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prominence_pct: Option<f64>,
    pub direction: Direction,
    pub continuity: Continuity,
    pub variation: Variation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ops: Option<u32>,
    pub random_rotation: bool,
}

impl Default for ValleyFitOptions {
    fn default() -> Self {
        Self {
            thickness: 10.0,
            depth: None,
            prominence_pct: None,
            direction: Direction::Auto,
            continuity: Continuity::Continuous,
            variation: Variation::Medium,
            edge_margin: None,
            budget_share: None,
            max_ops: None,
            random_rotation: false,
        }
    }
}

// Manual ridge shape. Every field present replaces the derived value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RidgePattern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<CountSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<ValueSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect: Option<ValueSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<ValueSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub falloff: Option<Falloff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RidgeBandFitOptions {
    pub thickness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prominence_pct: Option<f64>,
    pub direction: Direction,
    pub continuity: Continuity,
    pub variation: Variation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ops: Option<u32>,
    pub random_rotation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<RidgePattern>,
}

impl Default for RidgeBandFitOptions {
    fn default() -> Self {
        Self {
            thickness: 10.0,
            height: None,
            prominence_pct: None,
            direction: Direction::Auto,
            continuity: Continuity::Continuous,
            variation: Variation::Medium,
            edge_margin: None,
            budget_share: None,
            max_ops: None,
            random_rotation: false,
            pattern: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResult {
    pub recipes: Vec<OpRecipe>,
    pub estimate_ops: u32,
    // Band direction in radians (0 = +X).
    pub orientation: f64,
    pub warnings: Vec<String>,
}

// Options shared by both fits
struct BandRequest {
    kind: OpKind,
    thickness: f64,
    amount: Option<f64>,
    prominence_pct: Option<f64>,
    base_amount: f64,
    direction: Direction,
    continuity: Continuity,
    variation: Variation,
    edge_margin: Option<f64>,
    budget_share: Option<f64>,
    max_ops: Option<u32>,
    random_rotation: bool,
}

// Recipes for a valley running through `rect`.
pub fn valley_fit_to_recipes(
    rect: FitRect,
    options: &ValleyFitOptions,
    world: WorldSize,
    edge_fade: Option<f64>,
) -> Result<FitResult> {
    let request = BandRequest {
        kind: OpKind::Valley,
        thickness: options.thickness,
        amount: options.depth,
        prominence_pct: options.prominence_pct,
        base_amount: VALLEY_BASE_DEPTH,
        direction: options.direction,
        continuity: options.continuity,
        variation: options.variation,
        edge_margin: options.edge_margin,
        budget_share: options.budget_share,
        max_ops: options.max_ops,
        random_rotation: options.random_rotation,
    };
    band_fit(rect, &request, None, world, edge_fade)
}

// Recipes for a ridge band through `rect`. A `pattern` overrides the
// derived shape field by field.
pub fn ridge_band_fit_to_recipes(
    rect: FitRect,
    options: &RidgeBandFitOptions,
    world: WorldSize,
    edge_fade: Option<f64>,
) -> Result<FitResult> {
    let request = BandRequest {
        kind: OpKind::Ridge,
        thickness: options.thickness,
        amount: options.height,
        prominence_pct: options.prominence_pct,
        base_amount: RIDGE_BASE_HEIGHT,
        direction: options.direction,
        continuity: options.continuity,
        variation: options.variation,
        edge_margin: options.edge_margin,
        budget_share: options.budget_share,
        max_ops: options.max_ops,
        random_rotation: options.random_rotation,
    };
    band_fit(rect, &request, options.pattern.as_ref(), world, edge_fade)
}

fn resolve_orientation(direction: Direction, rect: &FitRect) -> f64 {
    match direction {
        Direction::Radians(theta) => theta,
        Direction::X => 0.0,
        Direction::Z => FRAC_PI_2,
        Direction::Auto => {
            if rect.width >= rect.depth {
                0.0
            } else {
                FRAC_PI_2
            }
        }
    }
}

// Length of the centre line along `theta` clipped to the rectangle
fn band_length(rect: &FitRect, theta: f64) -> f64 {
    let c = theta.cos().abs();
    let s = theta.sin().abs();
    let along_x = if c > 1e-9 { rect.width / c } else { f64::INFINITY };
    let along_z = if s > 1e-9 { rect.depth / s } else { f64::INFINITY };
    along_x.min(along_z)
}

fn band_fit(
    rect: FitRect,
    req: &BandRequest,
    pattern: Option<&RidgePattern>,
    world: WorldSize,
    edge_fade: Option<f64>,
) -> Result<FitResult> {
    let kind = req.kind.name();
    if !(rect.width > 0.0 && rect.depth > 0.0) || !rect.x.is_finite() || !rect.z.is_finite() {
        return Err(TerrainError::InvalidFit(format!(
            "{kind} fit rectangle must have positive size (got {} x {})",
            rect.width, rect.depth
        )));
    }
    if !(req.thickness > 0.0) || !req.thickness.is_finite() {
        return Err(TerrainError::InvalidFit(format!(
            "{kind} thickness must be > 0 (got {})",
            req.thickness
        )));
    }

    let mut warnings = Vec::new();
    let orientation = resolve_orientation(req.direction, &rect);
    let length = band_length(&rect, orientation);

    let world_span = world.width.min(world.depth).max(0.0);
    let margin = req
        .edge_margin
        .unwrap_or(0.0)
        .max(MARGIN_FRACTION * rect.width.min(rect.depth))
        .max(edge_fade.unwrap_or(0.0).clamp(0.0, 1.0) * world_span * 0.5);
    let effective_half = length * 0.5 - margin;
    if !(effective_half > 0.0) {
        return Err(TerrainError::InvalidFit(format!(
            "{kind} rectangle too short: length {length:.2} leaves nothing inside \
             margin {margin:.2}"
        )));
    }

    let mut step = (STROKE_FILL * effective_half / (2.0 + STROKE_OVERLAP)).floor();
    let mut radius = (STROKE_OVERLAP * step).max(1.0);
    let radius_z = req.thickness * 0.5;
    if radius_z / radius > ASPECT_MAX {
        // Too thin a stroke for the requested width: widen the nodes instead
        radius = (radius_z / ASPECT_MAX)
            .max(MIN_SHRUNK_RADIUS)
            .min(effective_half * 0.5)
            .max(1.0);
    }
    let aspect = (radius_z / radius).clamp(ASPECT_MIN, ASPECT_MAX);

    let intensity = match req.amount {
        Some(amount) if amount.is_finite() => amount.abs(),
        _ => {
            let pct = req.prominence_pct.filter(|p| p.is_finite()).unwrap_or(100.0);
            warnings.push(format!(
                "{kind} intensity derived from prominence {pct}% of {}",
                req.base_amount
            ));
            req.base_amount * pct / 100.0
        }
    };

    let spread = req.variation.spread();
    let rotation = if req.random_rotation {
        ValueSpec::Range([
            orientation - spread * std::f64::consts::FRAC_PI_4,
            orientation + spread * std::f64::consts::FRAC_PI_4,
        ])
    } else {
        ValueSpec::Fixed(orientation)
    };
    let budget_cap = match (req.budget_share, req.max_ops) {
        (Some(share), Some(max_ops)) => {
            Some((share.clamp(0.0, 1.0) * max_ops as f64).floor() as u32)
        }
        _ => None,
    };

    let mut recipe = OpRecipe::new(
        req.kind,
        CountSpec::Fixed(1),
        ValueSpec::Fixed(radius),
        ValueSpec::Range([intensity * (1.0 - spread), intensity * (1.0 + spread)]),
    );
    recipe.aspect = Some(ValueSpec::Fixed(aspect));
    recipe.rotation = Some(rotation);

    match req.continuity {
        Continuity::Continuous => {
            let (cx, cz) = rect.center();
            recipe.placement = PlacementSpec::Ring { center: [cx, cz], r_min: 0.0, r_max: 0.0 };
            if step >= 1.0 {
                step = step.round();
                recipe.step = Some(step);
                recipe.jitter = Some(spread * 0.5);
            }
        }
        Continuity::Segmented => {
            let spacing = radius.round().max(1.0);
            let count = ((length / spacing).round() as u32).max(MIN_SEGMENTS);
            let seg_radius = radius * SEGMENT_RADIUS_SCALE;
            recipe.count = CountSpec::Fixed(count);
            recipe.radius =
                ValueSpec::Range([seg_radius * (1.0 - spread), seg_radius * (1.0 + spread)]);
            recipe.area = Some(band_area(&rect, margin));
        }
    }

    // Checks below look at the final recipe, pattern included
    if let Some(pattern) = pattern {
        apply_pattern(&mut recipe, pattern);
    }
    if req.continuity == Continuity::Continuous {
        match recipe.step.filter(|s| *s > 0.0) {
            Some(step) => {
                let reach = 2.0 * step + recipe.radius.bounds().1;
                if reach > ENDPOINT_WARN_RATIO * effective_half {
                    warnings.push(format!(
                        "{kind} stroke endpoints near rectangle border \
                         ({reach:.1} of {effective_half:.1})"
                    ));
                }
            }
            None => warnings.push(format!(
                "{kind} rectangle too short for a stroke; using a single ellipse"
            )),
        }
    }
    if let Some(cap) = budget_cap {
        let per_center = recipe.ops_per_center().max(1);
        let needed = estimate_ops_for_recipes(std::slice::from_ref(&recipe));
        if needed > cap {
            match req.continuity {
                Continuity::Segmented => {
                    let max_count = (cap / per_center).max(1);
                    warnings.push(format!(
                        "{kind} segments capped from {needed} ops to {} by budget share",
                        max_count * per_center
                    ));
                    recipe.count = CountSpec::Fixed(max_count);
                }
                Continuity::Continuous => warnings.push(format!(
                    "{kind} stroke needs {needed} ops, above its budget share of {cap}"
                )),
            }
        }
    }

    for w in &warnings {
        log::debug!("{w}");
    }
    let recipes = vec![recipe];
    Ok(FitResult {
        estimate_ops: estimate_ops_for_recipes(&recipes),
        recipes,
        orientation,
        warnings,
    })
}

// Rectangle inset by the margin, or the rectangle itself if the inset collapses
fn band_area(rect: &FitRect, margin: f64) -> FitRect {
    let inner = FitRect::new(
        rect.x + margin,
        rect.z + margin,
        rect.width - 2.0 * margin,
        rect.depth - 2.0 * margin,
    );
    if inner.width > 0.0 && inner.depth > 0.0 { inner } else { *rect }
}

fn apply_pattern(recipe: &mut OpRecipe, pattern: &RidgePattern) {
    if let Some(count) = pattern.count {
        recipe.count = count;
    }
    if let Some(radius) = pattern.radius {
        recipe.radius = radius;
    }
    if let Some(aspect) = pattern.aspect {
        let (lo, hi) = aspect.bounds();
        let (lo, hi) = (lo.clamp(ASPECT_MIN, ASPECT_MAX), hi.clamp(ASPECT_MIN, ASPECT_MAX));
        recipe.aspect = Some(if lo == hi {
            ValueSpec::Fixed(lo)
        } else {
            ValueSpec::Range([lo, hi])
        });
    }
    if let Some(intensity) = pattern.intensity {
        recipe.intensity = intensity;
    }
    if let Some(step) = pattern.step {
        recipe.step = (step > 0.0).then_some(step);
    }
    if let Some(falloff) = pattern.falloff {
        recipe.falloff = Some(falloff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldSize {
        WorldSize::new(400.0, 400.0)
    }

    fn aspect_of(recipe: &OpRecipe) -> (f64, f64) {
        recipe.aspect.map_or((1.0, 1.0), |a| a.bounds())
    }

    #[test]
    fn fit_valley_continuous_wide_rect() {
        let rect = FitRect::new(-50.0, -10.0, 100.0, 20.0);
        let result =
            valley_fit_to_recipes(rect, &ValleyFitOptions::default(), world(), None).unwrap();
        assert_eq!(result.recipes.len(), 1);
        let recipe = &result.recipes[0];
        assert_eq!(recipe.count, CountSpec::Fixed(1));
        assert_eq!(recipe.step, Some(17.0));
        assert_eq!(recipe.radius, ValueSpec::Fixed(0.7 * 17.0));
        let (lo, hi) = aspect_of(recipe);
        assert!(lo >= 0.3 && hi <= 2.0);
        assert!((lo - 5.0 / 11.9).abs() < 1e-9);
        assert_eq!(result.estimate_ops, 5);
        assert_eq!(result.orientation, 0.0);
        assert_eq!(
            recipe.placement,
            PlacementSpec::Ring { center: [0.0, 0.0], r_min: 0.0, r_max: 0.0 }
        );
        // No explicit depth: the heuristic is flagged
        assert!(result.warnings.iter().any(|w| w.contains("prominence")));
    }

    #[test]
    fn fit_orientation_resolution() {
        let tall = FitRect::new(0.0, 0.0, 20.0, 100.0);
        let r = valley_fit_to_recipes(tall, &ValleyFitOptions::default(), world(), None).unwrap();
        assert_eq!(r.orientation, FRAC_PI_2);

        let opts = ValleyFitOptions { direction: Direction::Radians(0.3), ..Default::default() };
        let r = valley_fit_to_recipes(tall, &opts, world(), None).unwrap();
        assert_eq!(r.orientation, 0.3);

        let opts = ValleyFitOptions { direction: Direction::X, ..Default::default() };
        let r = valley_fit_to_recipes(FitRect::new(0.0, 0.0, 100.0, 100.0), &opts, world(), None)
            .unwrap();
        assert_eq!(r.orientation, 0.0);
    }

    #[test]
    fn fit_aspect_always_clamped() {
        for thickness in [0.5, 2.0, 10.0, 40.0, 90.0, 300.0] {
            for continuity in [Continuity::Continuous, Continuity::Segmented] {
                let opts = RidgeBandFitOptions { thickness, continuity, ..Default::default() };
                let rect = FitRect::new(0.0, 0.0, 120.0, 60.0);
                let r = ridge_band_fit_to_recipes(rect, &opts, world(), Some(0.1)).unwrap();
                let (lo, hi) = aspect_of(&r.recipes[0]);
                assert!(lo >= 0.3 && hi <= 2.0, "thickness {thickness}: aspect {lo}..{hi}");
                assert!(r.recipes[0].radius.bounds().0 > 0.0);
            }
        }
    }

    #[test]
    fn fit_thick_band_widens_radius() {
        let opts = ValleyFitOptions { thickness: 80.0, ..Default::default() };
        let r = valley_fit_to_recipes(FitRect::new(0.0, 0.0, 100.0, 100.0), &opts, world(), None)
            .unwrap();
        // radiusZ 40 needs radius 20 at the aspect cap
        assert_eq!(r.recipes[0].radius, ValueSpec::Fixed(20.0));
        assert_eq!(aspect_of(&r.recipes[0]), (2.0, 2.0));
    }

    #[test]
    fn fit_segmented_counts_and_area() {
        let opts = ValleyFitOptions {
            continuity: Continuity::Segmented,
            depth: Some(6.0),
            ..Default::default()
        };
        let rect = FitRect::new(0.0, 0.0, 100.0, 20.0);
        let r = valley_fit_to_recipes(rect, &opts, world(), None).unwrap();
        let recipe = &r.recipes[0];
        // 100 / round(11.9) = 8.33 → 8
        assert_eq!(recipe.count, CountSpec::Fixed(8));
        assert_eq!(recipe.step, None);
        assert_eq!(recipe.area, Some(FitRect::new(1.0, 1.0, 98.0, 18.0)));
        assert_eq!(r.estimate_ops, 8);
        assert!(r.warnings.is_empty());
        let (lo, hi) = recipe.radius.bounds();
        assert!(((lo + hi) * 0.5 - 0.7 * 17.0 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn fit_budget_share_caps_segments() {
        let opts = RidgeBandFitOptions {
            continuity: Continuity::Segmented,
            budget_share: Some(0.25),
            max_ops: Some(20),
            ..Default::default()
        };
        let r = ridge_band_fit_to_recipes(FitRect::new(0.0, 0.0, 100.0, 20.0), &opts, world(), None)
            .unwrap();
        assert_eq!(r.recipes[0].count, CountSpec::Fixed(5));
        assert_eq!(r.estimate_ops, 5);
        assert!(r.warnings.iter().any(|w| w.contains("budget share")));
    }

    #[test]
    fn fit_edge_fade_widens_margin() {
        let rect = FitRect::new(0.0, 0.0, 100.0, 20.0);
        let opts = ValleyFitOptions::default();
        let plain = valley_fit_to_recipes(rect, &opts, world(), None).unwrap();
        let faded = valley_fit_to_recipes(rect, &opts, world(), Some(0.1)).unwrap();
        // margin 20 → effectiveHalf 30 → step 10
        assert_eq!(faded.recipes[0].step, Some(10.0));
        assert!(faded.recipes[0].step < plain.recipes[0].step);
    }

    #[test]
    fn fit_ridge_pattern_overrides() {
        let opts = RidgeBandFitOptions {
            height: Some(12.0),
            pattern: Some(RidgePattern {
                count: Some(CountSpec::Range([2, 4])),
                aspect: Some(ValueSpec::Range([0.1, 5.0])),
                step: Some(8.0),
                falloff: Some(Falloff::Gauss),
                ..Default::default()
            }),
            ..Default::default()
        };
        let r = ridge_band_fit_to_recipes(FitRect::new(0.0, 0.0, 100.0, 20.0), &opts, world(), None)
            .unwrap();
        let recipe = &r.recipes[0];
        assert_eq!(recipe.count, CountSpec::Range([2, 4]));
        assert_eq!(recipe.aspect, Some(ValueSpec::Range([0.3, 2.0])));
        assert_eq!(recipe.falloff, Some(Falloff::Gauss));
        assert_eq!(r.estimate_ops, 15);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn fit_pattern_checks_use_final_shape() {
        // Derived step 17 fits; a pattern step of 40 reaches 91.9 against 49
        let opts = RidgeBandFitOptions {
            height: Some(10.0),
            pattern: Some(RidgePattern { step: Some(40.0), ..Default::default() }),
            ..Default::default()
        };
        let rect = FitRect::new(0.0, 0.0, 100.0, 20.0);
        let r = ridge_band_fit_to_recipes(rect, &opts, world(), None).unwrap();
        assert_eq!(r.recipes[0].step, Some(40.0));
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].contains("endpoints"), "{:?}", r.warnings);

        // A pattern count is capped by the budget share, not the derived count
        let opts = RidgeBandFitOptions {
            height: Some(10.0),
            continuity: Continuity::Segmented,
            budget_share: Some(0.5),
            max_ops: Some(20),
            pattern: Some(RidgePattern {
                count: Some(CountSpec::Fixed(30)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let r = ridge_band_fit_to_recipes(rect, &opts, world(), None).unwrap();
        assert_eq!(r.recipes[0].count, CountSpec::Fixed(10));
        assert_eq!(r.estimate_ops, 10);
        assert!(r.warnings.iter().any(|w| w.contains("budget share")));

        // A pattern step on a stroke that was too short clears the short-band warning
        let opts = RidgeBandFitOptions {
            height: Some(10.0),
            pattern: Some(RidgePattern { step: Some(1.0), ..Default::default() }),
            ..Default::default()
        };
        let tiny = FitRect::new(0.0, 0.0, 4.0, 2.0);
        let r = ridge_band_fit_to_recipes(tiny, &opts, world(), None).unwrap();
        assert!(!r.warnings.iter().any(|w| w.contains("too short")));
    }

    #[test]
    fn fit_rejects_degenerate_input() {
        let opts = ValleyFitOptions::default();
        let err = valley_fit_to_recipes(FitRect::new(0.0, 0.0, 0.0, 10.0), &opts, world(), None);
        assert!(matches!(err, Err(TerrainError::InvalidFit(_))));
        let opts = ValleyFitOptions { thickness: -1.0, ..Default::default() };
        let err = valley_fit_to_recipes(FitRect::new(0.0, 0.0, 50.0, 10.0), &opts, world(), None);
        assert!(matches!(err, Err(TerrainError::InvalidFit(_))));
    }

    #[test]
    fn fit_options_from_json() {
        let opts: ValleyFitOptions = serde_json::from_str(
            r#"{"thickness": 14, "direction": 1.2,
                "continuity": "segmented", "prominencePct": 50}"#,
        )
        .unwrap();
        assert_eq!(opts.direction, Direction::Radians(1.2));
        assert_eq!(opts.continuity, Continuity::Segmented);
        assert_eq!(opts.prominence_pct, Some(50.0));
        let opts: RidgeBandFitOptions = serde_json::from_str(r#"{"direction": "z"}"#).unwrap();
        assert_eq!(opts.direction, Direction::Z);
        assert_eq!(opts.thickness, 10.0);
    }
}
