// Small numeric helpers shared by the evaluator, the fit helper and the splat kernel.

// Linear interpolation
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

// Cubic Hermite smoothstep on an already-normalized t: t²(3 − 2t)
// Input is clamped to [0, 1] first so callers can pass raw ratios.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

// Clamp to [0, 1]; NaN collapses to 0 so it never reaches an output buffer
#[inline]
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

// Replace NaN / ±∞ with 0
#[inline]
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

// Quantize a weight to a byte: round(clamp01(w) · 255)
#[inline]
pub fn encode_unit(v: f64) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

// Inverse of `encode_unit`
#[inline]
pub fn decode_unit(b: u8) -> f64 {
    b as f64 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utils_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
        // Out of range input is clamped
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn utils_encode_clamps_garbage() {
        assert_eq!(encode_unit(f64::NAN), 0);
        assert_eq!(encode_unit(2.0), 255);
        assert_eq!(encode_unit(-1.0), 0);
        assert_eq!(encode_unit(0.5), 128);
        assert!((decode_unit(encode_unit(0.3)) - 0.3).abs() <= 1.0 / 255.0);
    }
}
