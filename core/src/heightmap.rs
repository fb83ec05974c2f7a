// Sampling of externally decoded height images and legacy raw buffers.
//
// The core never fetches or decodes images: callers hand over an already
// decoded pixel grid (an `image` buffer or raw RGBA bytes) and this module
// interprets it as normalized heights.

use image::{GrayImage, ImageBuffer, Luma};

use crate::error::{Result, TerrainError};
use crate::model::EdgeMode;

// Decoded heightmap pixels, normalized to [0, 1], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapPixels {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl HeightmapPixels {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidSource(
                "heightmap has zero dimensions".into(),
            ));
        }
        if data.len() != width * height {
            return Err(TerrainError::InvalidSource(format!(
                "heightmap expects {} pixels, got {}",
                width * height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn from_gray8(img: &GrayImage) -> Result<Self> {
        let data = img.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
        Self::new(img.width() as usize, img.height() as usize, data)
    }

    pub fn from_gray16(img: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Result<Self> {
        let data = img.pixels().map(|p| p.0[0] as f32 / 65535.0).collect();
        Self::new(img.width() as usize, img.height() as usize, data)
    }

    // Browser-style RGBA bytes; only the red channel carries height
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != width * height * 4 {
            return Err(TerrainError::InvalidSource(format!(
                "rgba buffer expects {} bytes, got {}",
                width * height * 4,
                bytes.len()
            )));
        }
        let data = bytes.chunks_exact(4).map(|px| px[0] as f32 / 255.0).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn texel(&self, x: i64, y: i64, edge: EdgeMode) -> f64 {
        let xi = wrap_index(x, self.width, edge);
        let yi = wrap_index(y, self.height, edge);
        self.data[yi * self.width + xi] as f64
    }

    // Bilinear sample at normalized (u, v); texel centres sit at (i + 0.5) / n
    pub fn sample(&self, u: f64, v: f64, edge: EdgeMode) -> f64 {
        let fx = u * self.width as f64 - 0.5;
        let fy = v * self.height as f64 - 0.5;
        bilinear(fx, fy, |x, y| self.texel(x, y, edge))
    }
}

// Heightmap source bound to its pixels and vertical range.
#[derive(Debug, Clone)]
pub struct HeightmapSampler {
    pixels: HeightmapPixels,
    min_height: f64,
    max_height: f64,
    edge: EdgeMode,
}

impl HeightmapSampler {
    pub fn new(pixels: HeightmapPixels, min_height: f64, max_height: f64, edge: EdgeMode) -> Self {
        Self {
            pixels,
            min_height,
            max_height,
            edge,
        }
    }

    // (u, v) in [0, 1] across the world extent
    pub fn height(&self, u: f64, v: f64) -> f64 {
        let t = self.pixels.sample(u, v, self.edge);
        self.min_height + t * (self.max_height - self.min_height)
    }
}

// Raw height samples laid out on a regular grid spanning the world, corner to corner.
#[derive(Debug, Clone)]
pub struct LegacyGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl LegacyGrid {
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(TerrainError::InvalidSource(format!(
                "legacy buffer {}x{} does not match {} samples",
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn height(&self, u: f64, v: f64) -> f64 {
        let fx = u * (self.width - 1) as f64;
        let fy = v * (self.height - 1) as f64;
        bilinear(fx, fy, |x, y| {
            let xi = wrap_index(x, self.width, EdgeMode::Clamp);
            let yi = wrap_index(y, self.height, EdgeMode::Clamp);
            self.data[yi * self.width + xi]
        })
    }
}

fn wrap_index(i: i64, n: usize, edge: EdgeMode) -> usize {
    let n = n as i64;
    let idx = match edge {
        EdgeMode::Clamp => i.clamp(0, n - 1),
        EdgeMode::Repeat => i.rem_euclid(n),
        EdgeMode::Mirror => {
            let period = 2 * n;
            let m = i.rem_euclid(period);
            if m < n { m } else { period - 1 - m }
        }
    };
    idx as usize
}

fn bilinear(fx: f64, fy: f64, fetch: impl Fn(i64, i64) -> f64) -> f64 {
    if !fx.is_finite() || !fy.is_finite() {
        return 0.0;
    }
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    // Casts saturate for huge coordinates, so the neighbours must too
    let (x0, y0) = (x0 as i64, y0 as i64);
    let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

    let a = fetch(x0, y0);
    let b = fetch(x1, y0);
    let c = fetch(x0, y1);
    let d = fetch(x1, y1);

    let ab = a + (b - a) * tx;
    let cd = c + (d - c) * tx;
    ab + (cd - ab) * ty
}
