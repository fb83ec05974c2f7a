use crate::model::PerlinParams;

// Base terrain noise: multi-octave 2D Perlin (fBm) mapped onto world space.
pub struct Perlin2D {
    octaves: u32,
    persistence: f64,
    amplitude: f64,
    // World units → lattice units
    scale_x: f64,
    scale_z: f64,
    offset: (f64, f64),
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl Perlin2D {
    // `world_width`/`world_depth` are the world extent the lattice is stretched over
    pub fn new(params: &PerlinParams, world_width: f64, world_depth: f64) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        // xorshift64 drives the Fisher–Yates shuffle; seed 0 would lock xorshift at 0
        let mut x = params.seed ^ 0xDEAD_BEEF_CAFE_BABE_u64;
        if x == 0 {
            x = 0x2545_F491_4F6C_DD1D;
        }
        let mut next = || {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        };
        for i in (1..256).rev() {
            let j = (next() % (i as u64 + 1)) as usize;
            p.swap(i, j);
        }
        // Duplicated so corner lookups never need a modulo
        let perm: [u8; 512] = std::array::from_fn(|i| p[i & 255]);

        let offset = params.offset.map(|o| (o.dx, o.dz)).unwrap_or((0.0, 0.0));
        Self {
            octaves: params.octaves,
            persistence: params.persistence,
            amplitude: params.amplitude,
            scale_x: lattice_scale(params.width, world_width),
            scale_z: lattice_scale(params.height, world_depth),
            offset,
            perm,
        }
    }

    // Ken Perlin's quintic fade 6t^5 − 15t^4 + 10t^3
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let h = hash & 0xF;
        let u = if h < 8 { x } else { y };
        let v = if h < 8 { y } else { x };
        let su = if h & 1 == 0 { u } else { -u };
        let sv = if h & 2 == 0 { v } else { -v };
        su + sv
    }

    #[inline]
    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }

    // Single octave, roughly in [−√2, √2]
    fn noise(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let x1 = crate::utils::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = crate::utils::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        crate::utils::lerp(x1, x2, v)
    }

    // fBm in lattice space, normalized to about [−1, 1]
    pub fn fbm(&self, nx: f64, nz: f64) -> f64 {
        if self.octaves == 0 {
            return 0.0;
        }
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut total = 0.0;
        let mut max_amp = 0.0;
        for _ in 0..self.octaves {
            total += self.noise(nx * freq, nz * freq) * amp;
            max_amp += amp;
            amp *= self.persistence;
            freq *= 2.0;
        }
        if max_amp == 0.0 { 0.0 } else { total / max_amp }
    }

    // Height contribution at world (x, z)
    pub fn height(&self, x: f64, z: f64) -> f64 {
        let nx = x * self.scale_x + self.offset.0;
        let nz = z * self.scale_z + self.offset.1;
        self.fbm(nx, nz) * self.amplitude
    }
}

fn lattice_scale(cells: f64, world: f64) -> f64 {
    if world > 0.0 && cells.is_finite() {
        cells / world
    } else {
        0.0
    }
}
