use crate::{HeuristicError, ProtectionHeuristic, littlewood};
use rms_core::models::{FareClass, FareClasses, QuantileSettings};

/// EMSR-b.
///
/// The classes ahead of the opening are pooled into one synthetic class with
/// summed mean, root-sum-of-squares stddev (independent demands) and the
/// demand-weighted average price. A single Littlewood evaluation of that class
/// against the class being opened gives the protection level, however many
/// classes were pooled.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmsrB(QuantileSettings);

impl EmsrB {
    /// The synthetic class standing in for `classes[..opening]`.
    ///
    /// # Errors
    ///
    /// - [`HeuristicError::Opening`] unless `1 <= opening < classes.len()`
    /// - [`HeuristicError::ZeroAggregateDemand`] if the pooled mean is zero
    /// - [`HeuristicError::Aggregate`] if the pooled parameters are not representable
    pub fn aggregate(classes: &FareClasses, opening: usize) -> Result<FareClass, HeuristicError> {
        let (higher, _) = classes
            .split_at_opening(opening)
            .ok_or(HeuristicError::Opening {
                opening,
                len: classes.len(),
            })?;

        let (mean, variance, revenue) =
            higher
                .iter()
                .fold((0.0, 0.0, 0.0), |(mean, variance, revenue), class| {
                    let demand = class.demand();
                    (
                        mean + demand.mean(),
                        variance + demand.variance(),
                        revenue + class.price() * demand.mean(),
                    )
                });

        if mean == 0.0 {
            return Err(HeuristicError::ZeroAggregateDemand { opening });
        }

        Ok(FareClass::new(revenue / mean, mean, variance.sqrt())?)
    }
}

impl ProtectionHeuristic for EmsrB {
    type Settings = QuantileSettings;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn protection_level(&self, classes: &FareClasses, opening: usize) -> Result<f64, HeuristicError> {
        let combined = Self::aggregate(classes, opening)?;
        let opened = &classes[opening];
        let level = littlewood::protection_level(&combined, opened.price(), &self.0)?;
        Ok(level.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn classes() -> FareClasses {
        FareClasses::new(vec![
            FareClass::new(250.0, 275.0, 75.0).unwrap(),
            FareClass::new(200.0, 525.0, 50.0).unwrap(),
            FareClass::new(100.0, 1000.0, 300.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_aggregate() {
        let combined = EmsrB::aggregate(&classes(), 2).unwrap();
        assert_abs_diff_eq!(combined.demand().mean(), 800.0);
        assert_abs_diff_eq!(combined.demand().stddev(), 90.1388, epsilon = 1e-4);
        assert_abs_diff_eq!(combined.price(), 217.1875, epsilon = 1e-10);
    }

    #[test]
    fn test_single_higher_class_is_itself() {
        let combined = EmsrB::aggregate(&classes(), 1).unwrap();
        assert_eq!(combined, classes()[0]);
    }

    #[test]
    fn test_zero_aggregate_demand() {
        let classes = FareClasses::new(vec![
            FareClass::new(250.0, 0.0, 75.0).unwrap(),
            FareClass::new(200.0, 0.0, 50.0).unwrap(),
            FareClass::new(100.0, 1000.0, 300.0).unwrap(),
        ])
        .unwrap();

        let err = EmsrB::default().protection_level(&classes, 2).unwrap_err();
        assert_eq!(err, HeuristicError::ZeroAggregateDemand { opening: 2 });
        assert_eq!(err.kind(), rms_core::models::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_protection_level() {
        // F⁻¹(1 - 100/217.1875) for N(800, 90.14)
        let level = EmsrB::default().protection_level(&classes(), 2).unwrap();
        assert_abs_diff_eq!(level, 808.95, epsilon = 0.05);
    }
}
