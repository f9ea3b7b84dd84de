//! Standard normal numerics.
//!
//! Everything here works on the standard scale z = (x - μ) / σ. The cdf is
//! built on a complementary error function with a fractional error below
//! 1.2e-7 over the whole real line, so tail probabilities keep their relative
//! accuracy. The quantile is seeded by a rational approximation and then
//! refined against that same cdf, which makes `cdf(quantile(p)) ≈ p` hold to
//! the requested tolerance regardless of the cdf's own approximation error.

use super::{QuantileError, QuantileSettings};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// cdf(-BRACKET) underflows to 0 and cdf(BRACKET) rounds to 1
const BRACKET: f64 = 40.0;

/// Complementary error function, fractional error < 1.2e-7 everywhere.
///
/// Chebyshev-fitted exponential form (Press et al., "erfcc").
pub(crate) fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

/// P(Z ≤ z)
pub(crate) fn cdf(z: f64) -> f64 {
    0.5 * erfc(-z * FRAC_1_SQRT_2)
}

/// P(Z > z), computed directly so that the upper tail does not cancel
pub(crate) fn survival(z: f64) -> f64 {
    0.5 * erfc(z * FRAC_1_SQRT_2)
}

pub(crate) fn pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

/// Rational approximation of the standard normal quantile (Acklam), relative
/// error about 1.15e-9. Requires 0 < p < 1.
fn initial_guess(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_690e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

/// Solve cdf(z) = p for z.
///
/// The endpoints map to the infinities; anything outside of [0, 1] (or NaN)
/// is a domain error. Interior probabilities are refined by Newton steps kept
/// inside a shrinking bracket, falling back to bisection whenever a step
/// would leave it.
pub(crate) fn quantile(p: f64, settings: &QuantileSettings) -> Result<f64, QuantileError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(QuantileError::Domain(p));
    }
    if p == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if p == 1.0 {
        return Ok(f64::INFINITY);
    }

    let target = settings.tolerance * p.min(1.0 - p);
    let (mut lo, mut hi) = (-BRACKET, BRACKET);
    let mut z = initial_guess(p).clamp(lo, hi);

    for _ in 0..settings.max_iterations {
        let residual = cdf(z) - p;
        if residual.abs() <= target {
            return Ok(z);
        }

        if residual < 0.0 {
            lo = z;
        } else {
            hi = z;
        }
        if hi - lo <= 4.0 * f64::EPSILON * z.abs().max(1.0) {
            return Ok(z);
        }

        let density = pdf(z);
        let step = if density > 0.0 {
            z - residual / density
        } else {
            f64::NAN
        };
        // NaN fails the comparison and bisects
        z = if lo < step && step < hi {
            step
        } else {
            0.5 * (lo + hi)
        };
    }

    Err(QuantileError::NoConvergence {
        probability: p,
        iterations: settings.max_iterations,
    })
}
