use crate::{HeuristicError, ProtectionHeuristic, littlewood};
use rms_core::models::{FareClasses, QuantileSettings};

/// EMSR-a.
///
/// Every higher class k is compared with the class being opened as if it were
/// the only competitor, `y_k = max(0, F_k⁻¹(1 - p_open / p_k))`, and the
/// pairwise levels are summed. Ignoring the pooling of demand across higher
/// classes tends to overstate the total as the number of classes grows.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmsrA(QuantileSettings);

impl EmsrA {
    /// The pairwise levels `y_k` of every class `k < opening` against the opened class.
    ///
    /// The total protection level is their sum.
    pub fn pairwise(&self, classes: &FareClasses, opening: usize) -> Result<Vec<f64>, HeuristicError> {
        let (higher, opened) = classes
            .split_at_opening(opening)
            .ok_or(HeuristicError::Opening {
                opening,
                len: classes.len(),
            })?;

        higher
            .iter()
            .map(|class| {
                let level = littlewood::protection_level(class, opened.price(), &self.0)?;
                Ok::<_, HeuristicError>(level.max(0.0))
            })
            .collect()
    }
}

impl ProtectionHeuristic for EmsrA {
    type Settings = QuantileSettings;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn protection_level(&self, classes: &FareClasses, opening: usize) -> Result<f64, HeuristicError> {
        Ok(self.pairwise(classes, opening)?.into_iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rms_core::models::FareClass;

    fn classes() -> FareClasses {
        FareClasses::new(vec![
            FareClass::new(250.0, 275.0, 75.0).unwrap(),
            FareClass::new(200.0, 525.0, 50.0).unwrap(),
            FareClass::new(100.0, 1000.0, 300.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_pairwise_sum() {
        let emsr = EmsrA::default();
        let pairs = emsr.pairwise(&classes(), 2).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_abs_diff_eq!(pairs[0], 294.0, epsilon = 0.5);
        assert_abs_diff_eq!(pairs[1], 525.0, epsilon = 0.5);

        let total = emsr.protection_level(&classes(), 2).unwrap();
        assert_eq!(total, pairs[0] + pairs[1]);
        assert_abs_diff_eq!(total, 819.0, epsilon = 0.1);
    }

    #[test]
    fn test_negative_pairs_count_as_zero() {
        let classes = FareClasses::new(vec![
            FareClass::new(100.0, 1.0, 10.0).unwrap(),
            FareClass::new(95.0, 50.0, 5.0).unwrap(),
            FareClass::new(90.0, 100.0, 20.0).unwrap(),
        ])
        .unwrap();
        // class 0: 1 + 10·F⁻¹(0.1) < 0, class 1: 50 + 5·F⁻¹(1 - 90/95) ≈ 41.9
        let pairs = EmsrA::default().pairwise(&classes, 2).unwrap();
        assert_eq!(pairs[0], 0.0);
        let level = EmsrA::default().protection_level(&classes, 2).unwrap();
        assert_abs_diff_eq!(level, 50.0 + 5.0 * -1.6199, epsilon = 0.01);
    }

    #[test]
    fn test_extreme_price_ratio_is_finite() {
        let classes = FareClasses::new(vec![
            FareClass::new(1e17, 30.0, 10.0).unwrap(),
            FareClass::new(1.0, 60.0, 10.0).unwrap(),
        ])
        .unwrap();
        let level = EmsrA::default().protection_level(&classes, 1).unwrap();
        assert!(level.is_finite());
        assert!(level > 30.0 + 8.0 * 10.0);
        assert!(serde_json::to_string(&level).unwrap() != "null");
    }

    #[test]
    fn test_bad_opening() {
        let emsr = EmsrA::default();
        assert_eq!(
            emsr.protection_level(&classes(), 0),
            Err(HeuristicError::Opening { opening: 0, len: 3 })
        );
        assert_eq!(
            emsr.protection_level(&classes(), 3),
            Err(HeuristicError::Opening { opening: 3, len: 3 })
        );
        assert_eq!(
            emsr.pairwise(&classes(), 0),
            Err(HeuristicError::Opening { opening: 0, len: 3 })
        );
    }
}
