//! Littlewood's rule.
//!
//! With a cheap class B booking ahead of an expensive class A, the marginal
//! unit should be sold to B only while the chance that A would have bought it
//! is below the price ratio. The optimal protection level for A therefore
//! satisfies `P(D_A > y*) = p_B / p_A`, i.e. `y* = F_A⁻¹(1 - p_B / p_A)`.

use crate::TwoClassAllocation;
use rms_core::models::{ErrorKind, FareClass, QuantileError, QuantileSettings, TwoClass};
use tracing::{Level, event};

/// The raw (unclamped) protection level for `high` against a class paying `low_price`.
///
/// The result is negative when class A's demand is too small to be worth
/// protecting, and negative infinity when the prices are equal. It is always
/// finite otherwise: a price ratio too small to register against 1 is treated
/// as the smallest one that does, which caps the level near `μ + 8.2σ`.
///
/// # Errors
///
/// - [`LittlewoodError::PriceInversion`] if `low_price` exceeds the price of `high` (or is NaN)
/// - [`LittlewoodError::Quantile`] if the quantile refinement fails
pub fn protection_level(
    high: &FareClass,
    low_price: f64,
    settings: &QuantileSettings,
) -> Result<f64, LittlewoodError> {
    if !(low_price <= high.price()) {
        return Err(LittlewoodError::PriceInversion {
            high: high.price(),
            low: low_price,
        });
    }

    // 1 - ratio rounds to 1 below about 1.1e-16, whose quantile is +inf
    let p = (1.0 - low_price / high.price()).min(1.0 - f64::EPSILON / 2.0);
    Ok(high.demand().quantile_with(p, settings)?)
}

/// The optimal two-class allocation: `y*` clamped to `[0, C]` and `b* = C - y*`
pub fn optimal(query: &TwoClass, settings: &QuantileSettings) -> Result<TwoClassAllocation, LittlewoodError> {
    let raw = protection_level(&query.high, query.low.price(), settings)?;
    let capacity = query.capacity.get();
    if !(0.0..=capacity).contains(&raw) {
        event!(Level::DEBUG, raw, capacity, "protection level clamped");
    }
    Ok(TwoClassAllocation::from_protection(raw, query.capacity))
}

/// Errors that can occur when applying Littlewood's rule
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum LittlewoodError {
    /// The low-fare class pays more than the high-fare class
    #[error("low price {low} exceeds high price {high}; nothing to protect for")]
    PriceInversion {
        /// Price of the protected class
        high: f64,
        /// Price of the class being opened
        low: f64,
    },
    /// The quantile could not be evaluated
    #[error(transparent)]
    Quantile(#[from] QuantileError),
}

impl LittlewoodError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PriceInversion { .. } => ErrorKind::InvalidInput,
            Self::Quantile(err) => err.kind(),
        }
    }
}
