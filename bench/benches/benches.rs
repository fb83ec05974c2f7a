use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use terrain_core::{
    CountSpec, HeightField, HeightSampler, OpKind, OpPool, OpRecipe, PerlinParams, PlacementSpec,
    PoolGlobal, ProceduralTerrainSpec, SplatParams, ValueSpec, WorldSize, compute_weights,
    derive_config,
};

const WORLD: f64 = 512.0;
const SEED: u64 = 2025;

fn spec() -> ProceduralTerrainSpec {
    let mut valley = OpRecipe::new(
        OpKind::Valley,
        CountSpec::Fixed(3),
        ValueSpec::Fixed(18.0),
        ValueSpec::Fixed(6.0),
    );
    valley.step = Some(20.0);
    valley.rotation = Some(ValueSpec::Range([0.0, std::f64::consts::PI]));
    let mut craters = OpRecipe::new(
        OpKind::Crater,
        CountSpec::Range([4, 8]),
        ValueSpec::Range([10.0, 20.0]),
        ValueSpec::Fixed(5.0),
    );
    craters.placement = PlacementSpec::Poisson { min_distance: 60.0 };

    ProceduralTerrainSpec {
        world: WorldSize::new(WORLD, WORLD),
        edge_fade: Some(0.1),
        base: PerlinParams {
            seed: SEED,
            octaves: 5,
            ..Default::default()
        },
        pool: OpPool {
            global: PoolGlobal {
                intensity_scale: None,
                max_ops: Some(200),
            },
            recipes: vec![
                OpRecipe::new(
                    OpKind::Hill,
                    CountSpec::Range([40, 60]),
                    ValueSpec::Range([15.0, 40.0]),
                    ValueSpec::Range([2.0, 8.0]),
                ),
                valley,
                craters,
                OpRecipe::new(
                    OpKind::Terrace,
                    CountSpec::Fixed(2),
                    ValueSpec::Fixed(50.0),
                    ValueSpec::Fixed(10.0),
                ),
            ],
        },
        seed: SEED,
    }
}

fn bench_derive_config(c: &mut Criterion) {
    let spec = spec();
    c.bench_function("derive_config (4 recipes, poisson + strokes)", |b| {
        b.iter(|| derive_config(black_box(&spec)).unwrap())
    });
}

fn bench_height_sampling(c: &mut Criterion) {
    let generated = derive_config(&spec()).unwrap();
    let field = HeightField::new(&generated.config).unwrap();
    c.bench_function("HeightField 128x128 height samples", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for j in 0..128 {
                for i in 0..128 {
                    let x = (i as f64 / 127.0 - 0.5) * WORLD;
                    let z = (j as f64 / 127.0 - 0.5) * WORLD;
                    sum += field.height(x, z);
                }
            }
            black_box(sum)
        })
    });
    c.bench_function("HeightField 64x64 normals", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for j in 0..64 {
                for i in 0..64 {
                    let x = (i as f64 / 63.0 - 0.5) * WORLD;
                    let z = (j as f64 / 63.0 - 0.5) * WORLD;
                    acc += field.normal(x, z)[1];
                }
            }
            black_box(acc)
        })
    });
}

fn bench_splat(c: &mut Criterion) {
    let generated = derive_config(&spec()).unwrap();
    let field = HeightField::new(&generated.config).unwrap();
    let full = SplatParams {
        size: 256,
        world_size: WorldSize::new(WORLD, WORLD),
        layer_heights: vec![-8.0, 0.0, 8.0, 16.0],
        ..Default::default()
    };
    let reduced = SplatParams {
        quality_scale: 0.5,
        blur_radius_px: 2,
        ..full.clone()
    };

    c.bench_function("compute_weights 256px full quality", |b| {
        b.iter(|| compute_weights(&field, black_box(&full)).unwrap())
    });
    c.bench_function("compute_weights 256px half quality + blur", |b| {
        b.iter(|| compute_weights(&field, black_box(&reduced)).unwrap())
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_derive_config,
    bench_height_sampling,
    bench_splat
);
criterion_main!(terrain_benchmarks);
