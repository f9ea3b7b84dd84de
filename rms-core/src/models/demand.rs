mod standard;

use super::ErrorKind;

/// A normally distributed demand model.
///
/// Demand for a fare class is physically non-negative, but it is modeled as
/// Normal(μ, σ) for tractability. The model is not truncated: queries are
/// answered for the untruncated distribution, and a negative quantile is a
/// valid output that callers read as "protect nothing".
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "NormalDemandDto", into = "NormalDemandDto")
)]
pub struct NormalDemand {
    mean: f64,
    stddev: f64,
}

impl NormalDemand {
    /// Creates a demand model, requiring a finite mean and a finite, positive stddev
    pub fn new(mean: f64, stddev: f64) -> Result<Self, NormalDemandError> {
        Self::try_from(NormalDemandDto { mean, stddev })
    }

    /// The expected demand μ
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The standard deviation σ
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// The variance σ²
    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }

    fn standardize(&self, x: f64) -> f64 {
        (x - self.mean) / self.stddev
    }

    /// P(D ≤ x), monotone non-decreasing in x
    pub fn cdf(&self, x: f64) -> f64 {
        standard::cdf(self.standardize(x))
    }

    /// P(D > x) = 1 - cdf(x)
    pub fn survival(&self, x: f64) -> f64 {
        standard::survival(self.standardize(x))
    }

    /// The probability density at x
    pub fn pdf(&self, x: f64) -> f64 {
        standard::pdf(self.standardize(x)) / self.stddev
    }

    /// The inverse of [`NormalDemand::cdf`], using the default solver settings.
    ///
    /// `quantile(0)` is negative infinity and `quantile(1)` is positive infinity.
    pub fn quantile(&self, p: f64) -> Result<f64, QuantileError> {
        self.quantile_with(p, &QuantileSettings::default())
    }

    /// The inverse of [`NormalDemand::cdf`] with explicit solver settings.
    ///
    /// # Errors
    ///
    /// - [`QuantileError::Domain`] if `p` is outside of [0, 1] or NaN
    /// - [`QuantileError::NoConvergence`] if the refinement runs out of iterations
    pub fn quantile_with(&self, p: f64, settings: &QuantileSettings) -> Result<f64, QuantileError> {
        let z = standard::quantile(p, settings)?;
        Ok(self.mean + self.stddev * z)
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalDemandDto {
    /// The expected demand
    pub mean: f64,
    /// The standard deviation of demand
    pub stddev: f64,
}

impl From<NormalDemand> for NormalDemandDto {
    fn from(value: NormalDemand) -> Self {
        Self {
            mean: value.mean,
            stddev: value.stddev,
        }
    }
}

impl TryFrom<NormalDemandDto> for NormalDemand {
    type Error = NormalDemandError;

    fn try_from(value: NormalDemandDto) -> Result<Self, Self::Error> {
        let NormalDemandDto { mean, stddev } = value;
        if !mean.is_finite() {
            return Err(NormalDemandError::NonFiniteMean(mean));
        }
        if !(stddev > 0.0 && stddev.is_finite()) {
            return Err(NormalDemandError::InvalidStdDev(stddev));
        }
        Ok(Self { mean, stddev })
    }
}

/// Errors that can occur when constructing a demand model
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum NormalDemandError {
    /// The mean is NaN or infinite
    #[error("mean {0} must be finite")]
    NonFiniteMean(f64),
    /// The standard deviation is not a finite, positive number
    #[error("stddev {0} must be positive and finite")]
    InvalidStdDev(f64),
}

impl NormalDemandError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidParameter
    }
}

/// Controls for the iterative quantile refinement
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct QuantileSettings {
    /// Accept z once |cdf(z) - p| ≤ tolerance · min(p, 1 - p)
    pub tolerance: f64,
    /// Give up (and report) after this many refinement steps
    pub max_iterations: usize,
}

impl Default for QuantileSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// Errors that can occur when evaluating a quantile
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum QuantileError {
    /// The requested probability is outside of [0, 1]
    #[error("probability {0} is outside of [0, 1]")]
    Domain(f64),
    /// The refinement did not converge; this does not happen for valid settings
    #[error("quantile of probability {probability} did not converge within {iterations} iterations")]
    NoConvergence {
        /// The requested probability
        probability: f64,
        /// The iteration budget that was exhausted
        iterations: usize,
    },
}

impl QuantileError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::DomainError,
            Self::NoConvergence { .. } => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_invalid_stddev() {
        assert_eq!(
            NormalDemand::new(10.0, 0.0).unwrap_err(),
            NormalDemandError::InvalidStdDev(0.0)
        );
        assert_eq!(
            NormalDemand::new(10.0, -1.0).unwrap_err(),
            NormalDemandError::InvalidStdDev(-1.0)
        );
        assert_eq!(
            NormalDemand::new(10.0, f64::INFINITY).unwrap_err(),
            NormalDemandError::InvalidStdDev(f64::INFINITY)
        );
        assert!(matches!(
            NormalDemand::new(10.0, f64::NAN),
            Err(NormalDemandError::InvalidStdDev(_))
        ));
        assert_eq!(
            NormalDemand::new(10.0, 0.0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_non_finite_mean() {
        assert!(matches!(
            NormalDemand::new(f64::NAN, 1.0),
            Err(NormalDemandError::NonFiniteMean(_))
        ));
        assert_eq!(
            NormalDemand::new(f64::NEG_INFINITY, 1.0).unwrap_err(),
            NormalDemandError::NonFiniteMean(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn test_cdf_and_survival() {
        let demand = NormalDemand::new(30.0, 10.0).unwrap();
        assert_abs_diff_eq!(demand.cdf(30.0), 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(demand.cdf(50.0), 0.977_249_868, epsilon = 1e-7);
        for x in [-10.0, 0.0, 25.0, 42.5, 90.0] {
            assert_abs_diff_eq!(demand.cdf(x) + demand.survival(x), 1.0, epsilon = 1e-12);
        }
        assert!(demand.cdf(20.0) < demand.cdf(20.5));
    }

    #[test]
    fn test_pdf_scales_with_stddev() {
        let demand = NormalDemand::new(0.0, 2.0).unwrap();
        assert_abs_diff_eq!(demand.pdf(0.0), 0.199_471_140, epsilon = 1e-9);
    }

    #[test]
    fn test_quantile_round_trip() {
        let demand = NormalDemand::new(275.0, 75.0).unwrap();
        for p in [1e-9, 0.001, 0.1, 0.4, 0.6, 0.9, 0.999, 1.0 - 1e-9] {
            let x = demand.quantile(p).unwrap();
            assert_abs_diff_eq!(demand.cdf(x), p, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_negative_quantiles_are_not_truncated() {
        let demand = NormalDemand::new(5.0, 10.0).unwrap();
        let x = demand.quantile(0.05).unwrap();
        assert!(x < 0.0);
        assert_abs_diff_eq!(x, 5.0 - 16.448_536, epsilon = 1e-4);
    }

    #[test]
    fn test_quantile_domain_error() {
        let demand = NormalDemand::new(5.0, 10.0).unwrap();
        let err = demand.quantile(1.01).unwrap_err();
        assert_eq!(err, QuantileError::Domain(1.01));
        assert_eq!(err.kind(), ErrorKind::DomainError);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok = serde_json::from_str::<NormalDemand>(r#"{ "mean": 30.0, "stddev": 10.0 }"#);
        assert_eq!(ok.unwrap(), NormalDemand::new(30.0, 10.0).unwrap());

        let bad = serde_json::from_str::<NormalDemand>(r#"{ "mean": 30.0, "stddev": -10.0 }"#);
        assert!(bad.is_err());
    }
}
