// Fits a valley and a ridge band into two rectangles, trims the recipes to a budget,
// expands them and saves a grayscale height image of the result.

use image::{GrayImage, Luma};
use std::path::Path;
use terrain_core::{
    Continuity, ExpandContext, FitRect, HeightField, HeightSampler, OpPool, PerlinParams,
    PoolGlobal, RidgeBandFitOptions, TerrainConfig, TerrainSource, ValleyFitOptions, Variation,
    WorldSize, auto_budget, expand_pool, ridge_band_fit_to_recipes, suggest_global_budget,
    valley_fit_to_recipes,
};

const SIZE: u32 = 257;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let world = WorldSize::new(400.0, 400.0);
    let edge_fade = Some(0.1);

    let valley = valley_fit_to_recipes(
        FitRect::new(-150.0, -40.0, 300.0, 60.0),
        &ValleyFitOptions {
            thickness: 24.0,
            depth: Some(9.0),
            ..Default::default()
        },
        world,
        edge_fade,
    )
    .expect("valley rect is valid");
    let ridge = ridge_band_fit_to_recipes(
        FitRect::new(60.0, -150.0, 70.0, 280.0),
        &RidgeBandFitOptions {
            thickness: 30.0,
            continuity: Continuity::Segmented,
            variation: Variation::High,
            random_rotation: true,
            ..Default::default()
        },
        world,
        edge_fade,
    )
    .expect("ridge rect is valid");

    for (name, fit) in [("valley", &valley), ("ridge", &ridge)] {
        println!(
            "{name}: orientation {:.2} rad, ~{} ops",
            fit.orientation, fit.estimate_ops
        );
        for w in &fit.warnings {
            println!("  warning: {w}");
        }
    }

    let recipes: Vec<_> = valley.recipes.into_iter().chain(ridge.recipes).collect();
    println!(
        "suggested budget: {}",
        suggest_global_budget(&recipes, terrain_core::budget::DEFAULT_BUDGET_MARGIN)
    );
    let budget = auto_budget(&recipes, 20);
    println!(
        "{}",
        serde_json::to_string_pretty(&budget.changes).expect("changes serialize")
    );

    let pool = OpPool {
        global: PoolGlobal {
            intensity_scale: None,
            max_ops: Some(20),
        },
        recipes: budget.recipes,
    };
    let expansion =
        expand_pool(&pool, 99, &ExpandContext::new(world.rect())).expect("pool expands");
    let config = TerrainConfig {
        width: world.width,
        height: world.depth,
        edge_fade,
        source: TerrainSource::Perlin(PerlinParams {
            seed: 3,
            amplitude: 4.0,
            ..Default::default()
        }),
        ops: expansion.ops,
        intensity_scale: None,
    };
    let field = HeightField::new(&config).expect("config builds");

    let mut heights = Vec::with_capacity((SIZE * SIZE) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let wx = (x as f64 / (SIZE - 1) as f64 - 0.5) * world.width;
            let wz = (y as f64 / (SIZE - 1) as f64 - 0.5) * world.depth;
            heights.push(field.height(wx, wz));
        }
    }
    let (min, max) = heights
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));

    let mut img = GrayImage::new(SIZE, SIZE);
    for (i, h) in heights.iter().enumerate() {
        let norm = if (max - min).abs() < f64::EPSILON {
            0.5
        } else {
            (h - min) / (max - min)
        };
        img.put_pixel(i as u32 % SIZE, i as u32 / SIZE, Luma([(norm * 255.0).round() as u8]));
    }
    let path = Path::new("valley_fit.png");
    img.save(path).expect("failed to write image");
    println!("Saved {:?}", path);
}
