// Splat synthesizer: 4-layer blend weights from sampled heights.
//
// Heights are sampled at `calc_size²` texel centres (rows in parallel),
// turned into per-layer weights, optionally box-blurred, then resampled to
// the requested size and packed as RGBA bytes, one channel per layer.

use std::time::Instant;

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::HeightSampler;
use crate::error::{Result, TerrainError};
use crate::model::WorldSize;
use crate::rng::hash_signed;
use crate::utils::{clamp01, decode_unit, encode_unit, finite_or_zero, smoothstep};

pub const MAX_LAYERS: usize = 4;
pub const MIN_CALC_SIZE: u32 = 8;
// Dither moves a pair's midpoint by at most this share of the pair's height gap
const DITHER_SPAN: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplatParams {
    // Output edge length in texels.
    pub size: u32,
    // World point under the raster centre.
    pub center: [f64; 2],
    // World extent covered by the raster.
    pub world_size: WorldSize,
    // Reference height per layer, ascending, at most four.
    pub layer_heights: Vec<f64>,
    // Half-width of each transition window.
    pub blend_height: f64,
    // Fraction of `size` actually computed; the rest is interpolated.
    pub quality_scale: f64,
    // Box blur radius in computed texels (0 = off).
    pub blur_radius_px: u32,
    pub noise_amplitude: f64,
    pub noise_seed: u64,
}

impl Default for SplatParams {
    fn default() -> Self {
        Self {
            size: 256,
            center: [0.0, 0.0],
            world_size: WorldSize::new(256.0, 256.0),
            layer_heights: vec![0.0, 10.0, 20.0, 30.0],
            blend_height: 2.0,
            quality_scale: 1.0,
            blur_radius_px: 0,
            noise_amplitude: 0.2,
            noise_seed: 0,
        }
    }
}

impl SplatParams {
    // Resolution the weights are computed at before resampling.
    pub fn calc_size(&self) -> u32 {
        let q = self.quality_scale.clamp(f64::MIN_POSITIVE, 1.0);
        ((self.size as f64 * q).floor() as u32).max(MIN_CALC_SIZE)
    }

    fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(TerrainError::InvalidSplat("size must be > 0".into()));
        }
        let n = self.layer_heights.len();
        if n == 0 || n > MAX_LAYERS {
            return Err(TerrainError::InvalidSplat(format!(
                "expected 1 to {MAX_LAYERS} layer heights, got {n}"
            )));
        }
        if self.layer_heights.iter().any(|h| !h.is_finite()) {
            return Err(TerrainError::InvalidSplat("layer heights must be finite".into()));
        }
        if self.layer_heights.windows(2).any(|w| w[1] < w[0]) {
            return Err(TerrainError::InvalidSplat("layer heights must be ascending".into()));
        }
        if !(self.quality_scale > 0.0) || !self.quality_scale.is_finite() {
            return Err(TerrainError::InvalidSplat(format!(
                "quality scale must be > 0 (got {})",
                self.quality_scale
            )));
        }
        if !(self.world_size.width > 0.0 && self.world_size.depth > 0.0) {
            return Err(TerrainError::InvalidSplat("world size must be positive".into()));
        }
        Ok(())
    }
}

// Weights and encoded bytes at the raster's centre texel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterSample {
    pub pixel: [u32; 2],
    pub height: f64,
    pub weights: [f64; 4],
    pub bytes: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplatStats {
    pub calc_size: u32,
    pub min_height: f64,
    pub max_height: f64,
    pub channel_min: [f64; 4],
    pub channel_max: [f64; 4],
    // Texels whose strongest layer is each channel.
    pub winners: [u32; 4],
    pub center: CenterSample,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplatOutput {
    // Row-major RGBA, `size * size * 4` bytes.
    pub bytes: Vec<u8>,
    pub size: u32,
    pub stats: SplatStats,
}

impl SplatOutput {
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.size, self.size, self.bytes.clone()).ok_or_else(|| {
            TerrainError::InvalidSplat(format!(
                "{} bytes do not fill a {}x{} image",
                self.bytes.len(),
                self.size,
                self.size
            ))
        })
    }
}

// Blend weights for a single height. Channels past the layer count stay 0.
//
// Each adjacent pair blends over `[mid - hw, mid + hw]`; at or below the
// lower edge the lower layer wins outright, at or above the upper edge the
// next pair is considered.
pub fn layer_weights(h: f64, layers: &[f64], blend_height: f64, dither: f64) -> [f64; 4] {
    let mut w = [0.0; 4];
    let n = layers.len().min(MAX_LAYERS);
    if n == 0 {
        return w;
    }
    let hw = blend_height.abs();
    for i in 0..n - 1 {
        let (lo, hi) = (layers[i], layers[i + 1]);
        let mid = (lo + hi) * 0.5 + dither * DITHER_SPAN * (hi - lo).abs();
        if h <= mid - hw {
            w[i] = 1.0;
            return w;
        }
        if h >= mid + hw {
            continue;
        }
        let s = smoothstep((h - (mid - hw)) / (2.0 * hw));
        w[i] = 1.0 - s;
        w[i + 1] = s;
        return w;
    }
    w[n - 1] = 1.0;
    w
}

// Compute the splat raster for `sampler` over the area described by `params`.
pub fn compute_weights<S>(sampler: &S, params: &SplatParams) -> Result<SplatOutput>
where
    S: HeightSampler + Sync + ?Sized,
{
    params.validate()?;
    let started = Instant::now();
    let calc = params.calc_size() as usize;
    let size = params.size as usize;

    let heights = sample_heights(sampler, params, calc);
    let (min_height, max_height) = heights
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));

    let mut weights: Vec<[f64; 4]> = heights
        .par_iter()
        .enumerate()
        .map(|(i, &h)| {
            let dither = if params.noise_amplitude != 0.0 {
                let (x, y) = ((i % calc) as u32, (i / calc) as u32);
                hash_signed(params.noise_seed, x, y) * params.noise_amplitude
            } else {
                0.0
            };
            layer_weights(h, &params.layer_heights, params.blend_height, dither)
        })
        .collect();

    if params.blur_radius_px > 0 {
        box_blur(&mut weights, calc, params.blur_radius_px as usize);
    }
    let weights = if calc == size { weights } else { resample(&weights, calc, size) };

    let mut bytes = Vec::with_capacity(size * size * 4);
    let mut channel_min = [f64::INFINITY; 4];
    let mut channel_max = [f64::NEG_INFINITY; 4];
    let mut winners = [0u32; 4];
    for w in &weights {
        let mut best = 0;
        for c in 0..4 {
            let v = clamp01(w[c]);
            channel_min[c] = channel_min[c].min(v);
            channel_max[c] = channel_max[c].max(v);
            if v > clamp01(w[best]) {
                best = c;
            }
            bytes.push(encode_unit(v));
        }
        winners[best] += 1;
    }

    let (cx, cy) = (size / 2, size / 2);
    let center_weights = weights[cy * size + cx].map(clamp01);
    let (wx, wz) = texel_world(params, size, cx, cy);
    let center = CenterSample {
        pixel: [cx as u32, cy as u32],
        height: finite_or_zero(sampler.height(wx, wz)),
        weights: center_weights,
        bytes: center_weights.map(encode_unit),
    };
    debug_assert!(
        center
            .bytes
            .iter()
            .zip(&center.weights)
            .all(|(&b, &w)| (decode_unit(b) - w).abs() <= 1.0 / 255.0)
    );

    log::debug!(
        "splat {}x{} (calc {}, blur {}) in {:.1?}",
        size,
        size,
        calc,
        params.blur_radius_px,
        started.elapsed()
    );

    Ok(SplatOutput {
        bytes,
        size: params.size,
        stats: SplatStats {
            calc_size: calc as u32,
            min_height,
            max_height,
            channel_min,
            channel_max,
            winners,
            center,
        },
    })
}

// World position of texel (i, j) of an n x n raster, at the texel centre
fn texel_world(params: &SplatParams, n: usize, i: usize, j: usize) -> (f64, f64) {
    let WorldSize { width, depth } = params.world_size;
    let x = params.center[0] - width * 0.5 + (i as f64 + 0.5) / n as f64 * width;
    let z = params.center[1] - depth * 0.5 + (j as f64 + 0.5) / n as f64 * depth;
    (x, z)
}

fn sample_heights<S>(sampler: &S, params: &SplatParams, n: usize) -> Vec<f64>
where
    S: HeightSampler + Sync + ?Sized,
{
    let mut heights = vec![0.0; n * n];
    heights.par_chunks_mut(n).enumerate().for_each(|(j, row)| {
        for (i, h) in row.iter_mut().enumerate() {
            let (x, z) = texel_world(params, n, i, j);
            *h = finite_or_zero(sampler.height(x, z));
        }
    });
    heights
}

// Separable box blur with edge replication; running sums keep each pass O(n)
fn box_blur(buf: &mut [[f64; 4]], n: usize, radius: usize) {
    if n == 0 {
        return;
    }
    let mut scratch = vec![[0.0; 4]; n];
    let mut line = vec![[0.0; 4]; n];
    let norm = 1.0 / (2 * radius + 1) as f64;

    // Rows then columns
    for pass in 0..2 {
        for a in 0..n {
            let at = |b: usize| if pass == 0 { a * n + b } else { b * n + a };
            for b in 0..n {
                line[b] = buf[at(b)];
            }
            let fetch = |k: isize| line[k.clamp(0, n as isize - 1) as usize];

            // Window at b = 0: r clamped copies of the first texel, the line up to r,
            // and clamped copies of the last texel for whatever of r runs past the end
            let r = radius as isize;
            let inside = radius.min(n - 1);
            let past_end = (radius - inside) as f64;
            let mut sum = [0.0; 4];
            for c in 0..4 {
                sum[c] = radius as f64 * line[0][c] + past_end * line[n - 1][c];
            }
            for v in &line[..=inside] {
                for c in 0..4 {
                    sum[c] += v[c];
                }
            }
            for b in 0..n {
                for c in 0..4 {
                    scratch[b][c] = sum[c] * norm;
                }
                let (out, inc) = (fetch(b as isize - r), fetch(b as isize + r + 1));
                for c in 0..4 {
                    sum[c] += inc[c] - out[c];
                }
            }
            for b in 0..n {
                buf[at(b)] = scratch[b];
            }
        }
    }
}

// Bilinear resample between square rasters, texel centres aligned
fn resample(src: &[[f64; 4]], from: usize, to: usize) -> Vec<[f64; 4]> {
    let scale = from as f64 / to as f64;
    let max = (from - 1) as f64;
    let coord = |i: usize| {
        let s = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, max);
        let i0 = s.floor() as usize;
        let i1 = (i0 + 1).min(from - 1);
        (i0, i1, s - i0 as f64)
    };

    let mut out = vec![[0.0; 4]; to * to];
    out.par_chunks_mut(to).enumerate().for_each(|(j, row)| {
        let (y0, y1, ty) = coord(j);
        for (i, px) in row.iter_mut().enumerate() {
            let (x0, x1, tx) = coord(i);
            let (a, b) = (src[y0 * from + x0], src[y0 * from + x1]);
            let (c, d) = (src[y1 * from + x0], src[y1 * from + x1]);
            for k in 0..4 {
                let top = a[k] + (b[k] - a[k]) * tx;
                let bottom = c[k] + (d[k] - c[k]) * tx;
                px[k] = top + (bottom - top) * ty;
            }
        }
    });
    out
}
