use crate::{HeuristicError, ProtectionHeuristic};
use rms_core::models::{Capacity, Scenario};

/// The two-class decision: units protected for class A and units sellable to class B.
///
/// The fields always satisfy `protection_level + booking_limit == capacity`
/// exactly, with both values inside `[0, capacity]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoClassAllocation {
    /// Units reserved exclusively for the expensive class (y)
    pub protection_level: f64,
    /// Units that may be sold to the discounted class (b)
    pub booking_limit: f64,
}

impl TwoClassAllocation {
    /// Builds the allocation from a raw protection level.
    ///
    /// Negative levels protect nothing, levels beyond capacity protect everything.
    pub fn from_protection(raw: f64, capacity: Capacity) -> Self {
        let (protection_level, booking_limit) = split(raw, capacity);
        Self {
            protection_level,
            booking_limit,
        }
    }
}

/// Clamp `raw` to [0, C] and split the capacity into (y, b).
///
/// b is computed as C - y and y is then re-derived as C - b. By Sterbenz's
/// lemma one of the two subtractions is exact, which makes y + b == C hold
/// without rounding error.
fn split(raw: f64, capacity: Capacity) -> (f64, f64) {
    let total = capacity.get();
    let booking_limit = total - capacity.clamp(raw);
    (total - booking_limit, booking_limit)
}

/// One row of a nested booking-limit table
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassLimit {
    /// Position of the class in the ranking (0 is the most valuable)
    pub rank: usize,
    /// The price of the class
    pub price: f64,
    /// Units held back for the classes ranked above this one
    pub protection_level: f64,
    /// Units that may be sold to this class and everything ranked below it
    pub booking_limit: f64,
}

/// The nested booking limits of a full ranking.
///
/// Row `j` protects `y_j` units for classes `[0, j)` and caps the sales of
/// class `j` at `C - y_j`. The top class is never restricted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NestedAllocation {
    /// The capacity the table was computed for
    pub capacity: f64,
    /// One row per class, in rank order
    pub classes: Vec<ClassLimit>,
}

impl NestedAllocation {
    /// Evaluates `heuristic` at every opening of the scenario's ranking
    pub fn compute<H: ProtectionHeuristic>(
        heuristic: &H,
        scenario: &Scenario,
    ) -> Result<Self, HeuristicError> {
        let Scenario { capacity, classes } = scenario;
        let levels = heuristic.protection_levels(classes)?;

        let classes = classes
            .iter()
            .enumerate()
            .map(|(rank, class)| {
                // the top class has nothing ranked above it
                let raw = if rank == 0 { 0.0 } else { levels[rank - 1] };
                let (protection_level, booking_limit) = split(raw, *capacity);
                ClassLimit {
                    rank,
                    price: class.price(),
                    protection_level,
                    booking_limit,
                }
            })
            .collect();

        Ok(Self {
            capacity: capacity.get(),
            classes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_exact() {
        for capacity in [1.0, 3.0, 100.0, 100.5, 1e6] {
            let capacity = Capacity::new(capacity).unwrap();
            for raw in [0.1, 0.3, 1.0 / 3.0, 0.7, 2.0 / 3.0, 33.533_471, 66.1, 99.99] {
                let raw = raw * capacity.get();
                let allocation = TwoClassAllocation::from_protection(raw, capacity);
                assert_eq!(
                    allocation.protection_level + allocation.booking_limit,
                    capacity.get()
                );
            }
        }
    }

    #[test]
    fn test_clamps() {
        let capacity = Capacity::new(100.0).unwrap();
        assert_eq!(
            TwoClassAllocation::from_protection(-4.0, capacity),
            TwoClassAllocation {
                protection_level: 0.0,
                booking_limit: 100.0
            }
        );
        assert_eq!(
            TwoClassAllocation::from_protection(f64::NEG_INFINITY, capacity),
            TwoClassAllocation {
                protection_level: 0.0,
                booking_limit: 100.0
            }
        );
        assert_eq!(
            TwoClassAllocation::from_protection(140.0, capacity),
            TwoClassAllocation {
                protection_level: 100.0,
                booking_limit: 0.0
            }
        );
    }
}
