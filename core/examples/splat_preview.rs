// Derives a terrain from a small procedural spec, computes its splat map and saves:
// the raw RGBA weights, and a preview tinting each layer and shading by the normals.

use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};
use std::path::Path;
use terrain_core::{
    CountSpec, HeightField, HeightSampler, OpKind, OpPool, OpRecipe, PerlinParams, PlacementSpec,
    PoolGlobal, ProceduralTerrainSpec, SplatParams, ValueSpec, WorldSize, compute_weights,
    derive_config,
};

const WORLD: f64 = 256.0;
const SIZE: u32 = 512;

fn spec() -> ProceduralTerrainSpec {
    let mut ridge = OpRecipe::new(
        OpKind::Ridge,
        CountSpec::Fixed(2),
        ValueSpec::Fixed(14.0),
        ValueSpec::Range([6.0, 9.0]),
    );
    ridge.step = Some(16.0);
    ridge.aspect = Some(ValueSpec::Fixed(0.6));
    ridge.rotation = Some(ValueSpec::Range([0.0, std::f64::consts::PI]));
    ridge.jitter = Some(0.15);

    let mut craters = OpRecipe::new(
        OpKind::Crater,
        CountSpec::Range([3, 5]),
        ValueSpec::Range([8.0, 16.0]),
        ValueSpec::Fixed(4.0),
    );
    craters.placement = PlacementSpec::Poisson { min_distance: 50.0 };

    ProceduralTerrainSpec {
        world: WorldSize::new(WORLD, WORLD),
        edge_fade: Some(0.1),
        base: PerlinParams {
            seed: 7,
            octaves: 5,
            amplitude: 6.0,
            ..Default::default()
        },
        pool: OpPool {
            global: PoolGlobal {
                intensity_scale: None,
                max_ops: Some(120),
            },
            recipes: vec![
                OpRecipe::new(
                    OpKind::Hill,
                    CountSpec::Range([10, 16]),
                    ValueSpec::Range([12.0, 30.0]),
                    ValueSpec::Range([2.0, 6.0]),
                ),
                ridge,
                craters,
            ],
        },
        seed: 2025,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let generated = derive_config(&spec()).expect("spec should expand");
    for w in &generated.warnings {
        println!("warning: {w}");
    }
    let field = HeightField::new(&generated.config).expect("config should build");

    let params = SplatParams {
        size: SIZE,
        world_size: WorldSize::new(WORLD, WORLD),
        layer_heights: vec![-6.0, 0.0, 6.0, 12.0],
        blend_height: 1.5,
        quality_scale: 0.5,
        blur_radius_px: 1,
        ..Default::default()
    };
    let splat = compute_weights(&field, &params).expect("splat params are valid");
    println!(
        "heights {:.2}..{:.2}, winners {:?}",
        splat.stats.min_height, splat.stats.max_height, splat.stats.winners
    );

    let weights_path = Path::new("splat_weights.png");
    splat
        .to_rgba_image()
        .expect("buffer matches size")
        .save(weights_path)
        .expect("failed to write weights image");
    println!("Saved {:?}", weights_path);

    // One tint per layer: mud, grass, rock, snow
    let palette = Gradient::with_domain(vec![
        (0.0, LinSrgb::new(0.35, 0.25, 0.15)),
        (1.0, LinSrgb::new(0.15, 0.55, 0.2)),
        (2.0, LinSrgb::new(0.45, 0.42, 0.4)),
        (3.0, LinSrgb::new(0.95, 0.95, 1.0)),
    ]);
    let tints: Vec<LinSrgb> = (0..4).map(|k| palette.get(k as f32)).collect();

    let mut img = RgbImage::new(SIZE, SIZE);
    for (i, px) in splat.bytes.chunks(4).enumerate() {
        let (x, y) = (i as u32 % SIZE, i as u32 / SIZE);
        let mut col = LinSrgb::new(0.0f32, 0.0, 0.0);
        for (k, tint) in tints.iter().enumerate() {
            let w = px[k] as f32 / 255.0;
            col = LinSrgb::new(
                col.red + tint.red * w,
                col.green + tint.green * w,
                col.blue + tint.blue * w,
            );
        }
        let wx = (x as f64 + 0.5) / SIZE as f64 * WORLD - WORLD * 0.5;
        let wz = (y as f64 + 0.5) / SIZE as f64 * WORLD - WORLD * 0.5;
        let n = field.normal(wx, wz);
        // Light from the north-west, 45° up
        let light = ((-n[0] - n[2]) * 0.5 + n[1] * std::f64::consts::FRAC_1_SQRT_2).max(0.0) as f32;
        let shade = (light * 0.6 + 0.4).clamp(0.0, 1.0);
        let rgb = col.into_format::<u8>();
        img.put_pixel(
            x,
            y,
            Rgb([
                (rgb.red as f32 * shade) as u8,
                (rgb.green as f32 * shade) as u8,
                (rgb.blue as f32 * shade) as u8,
            ]),
        );
    }

    let path = Path::new("splat_preview.png");
    img.save(path).expect("failed to write preview");
    println!("Saved splat preview to {:?}", path);
}
