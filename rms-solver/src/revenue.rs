use rms_core::models::{Capacity, ErrorKind, FareClass, TwoClass};
use std::iter::FusedIterator;

/// Expected two-class revenue as a function of the booking limit b for class B.
///
/// The curve is built from marginal increments. Raising the booking limit
/// from b - 1 to b earns
///
/// ```text
/// ΔI(b) = p_B·S_B(b)·F_A(C-b) + (p_B - p_A)·S_B(b)·S_A(C-b)
/// ```
///
/// (the extra unit sells to B only if B's demand exceeds b; it displaces an A
/// sale only if A's demand exceeds the remaining protection C - b), starting
/// from `I(0) = p_A·C·F_A(C)`. Under the price ordering `p_B ≤ p_A` the curve
/// is unimodal and peaks at the Littlewood booking limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevenueCurve {
    high: FareClass,
    low: FareClass,
    capacity: Capacity,
    len: usize,
}

/// A sample of the revenue curve
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevenuePoint {
    /// The booking limit b for the discounted class
    pub booking_limit: usize,
    /// The expected revenue I(b)
    pub revenue: f64,
    /// P(D_B > b): the chance that class B fills its allotment
    pub low_overflow: f64,
    /// P(D_A > C - b): the chance that class A outgrows the protected units
    pub high_overflow: f64,
}

impl RevenueCurve {
    /// Creates the curve for a validated two-class query.
    ///
    /// # Errors
    ///
    /// [`RevenueError::TooManyUnits`] if one sample per whole unit of
    /// capacity cannot be indexed.
    pub fn new(query: &TwoClass) -> Result<Self, RevenueError> {
        let len = query
            .capacity
            .whole_units()
            .and_then(|units| units.checked_add(1))
            .ok_or(RevenueError::TooManyUnits(query.capacity.get()))?;

        Ok(Self {
            high: query.high,
            low: query.low,
            capacity: query.capacity,
            len,
        })
    }

    /// The number of samples, one per integer booking limit in `0..=⌊C⌋`
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, the curve has at least the sample at b = 0
    pub fn is_empty(&self) -> bool {
        false
    }

    /// I(0): every unit is protected for class A
    pub fn base(&self) -> f64 {
        let c = self.capacity.get();
        self.high.price() * c * self.high.demand().cdf(c)
    }

    /// (P(D_B > b), P(D_A > C - b))
    pub fn overflow(&self, booking_limit: usize) -> (f64, f64) {
        let b = booking_limit as f64;
        let y = self.capacity.get() - b;
        (self.low.demand().survival(b), self.high.demand().survival(y))
    }

    /// ΔI(b), the revenue gained by raising the booking limit to b
    pub fn marginal(&self, booking_limit: usize) -> f64 {
        let y = self.capacity.get() - booking_limit as f64;
        let (pa, pb) = (self.high.price(), self.low.price());
        let (low, high) = self.overflow(booking_limit);

        pb * low * self.high.demand().cdf(y) + (pb - pa) * low * high
    }

    /// I(b) from the explicit accumulator I(b - 1)
    pub fn step(&self, booking_limit: usize, previous: f64) -> f64 {
        previous + self.marginal(booking_limit)
    }

    /// I(b) recomputed from scratch, or `None` beyond the last whole unit
    pub fn value_at(&self, booking_limit: usize) -> Option<f64> {
        if booking_limit >= self.len() {
            return None;
        }
        Some((1..=booking_limit).fold(self.base(), |revenue, b| self.step(b, revenue)))
    }

    /// A fresh pass over the samples for b = 0..=⌊C⌋
    pub fn points(&self) -> RevenuePoints {
        RevenuePoints {
            curve: *self,
            next: 0,
            revenue: 0.0,
        }
    }

    /// The sample with the largest expected revenue (the first one on ties)
    pub fn argmax(&self) -> RevenuePoint {
        let mut points = self.points();
        // the sample at b = 0 always exists
        let first = points.sample(0, self.base());
        points.fold(first, |best, point| if point.revenue > best.revenue { point } else { best })
    }
}

impl IntoIterator for &RevenueCurve {
    type Item = RevenuePoint;
    type IntoIter = RevenuePoints;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

/// Errors that can occur when building a revenue curve
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RevenueError {
    /// The capacity has more whole units than can be sampled
    #[error("capacity {0} has too many whole units to sample one revenue point per unit")]
    TooManyUnits(f64),
}

impl RevenueError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidParameter
    }
}

/// Iterator over the samples of a [`RevenueCurve`]
#[derive(Clone, Debug)]
pub struct RevenuePoints {
    curve: RevenueCurve,
    next: usize,
    revenue: f64,
}

impl RevenuePoints {
    fn sample(&mut self, booking_limit: usize, revenue: f64) -> RevenuePoint {
        self.revenue = revenue;
        self.next = booking_limit + 1;
        let (low_overflow, high_overflow) = self.curve.overflow(booking_limit);
        RevenuePoint {
            booking_limit,
            revenue,
            low_overflow,
            high_overflow,
        }
    }
}

impl Iterator for RevenuePoints {
    type Item = RevenuePoint;

    fn next(&mut self) -> Option<Self::Item> {
        let booking_limit = self.next;
        if booking_limit >= self.curve.len() {
            return None;
        }

        let revenue = if booking_limit == 0 {
            self.curve.base()
        } else {
            self.curve.step(booking_limit, self.revenue)
        };
        Some(self.sample(booking_limit, revenue))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.curve.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RevenuePoints {}

impl FusedIterator for RevenuePoints {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> RevenueCurve {
        RevenueCurve::new(&TwoClass {
            capacity: Capacity::new(100.0).unwrap(),
            high: FareClass::new(5.0, 40.0, 8.0).unwrap(),
            low: FareClass::new(2.0, 60.0, 8.0).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_base_value() {
        // F_A(100) is 1 to within the approximation error
        assert_relative_eq!(curve().base(), 500.0, max_relative = 1e-9);
    }

    #[test]
    fn test_points_are_restartable() {
        let curve = curve();
        let first = curve.points().collect::<Vec<_>>();
        let second = (&curve).into_iter().collect::<Vec<_>>();

        assert_eq!(first.len(), 101);
        assert_eq!(first, second);
        assert_eq!(first[0].booking_limit, 0);
        assert_eq!(first[100].booking_limit, 100);
    }

    #[test]
    fn test_value_at_matches_accumulation() {
        let curve = curve();
        for point in curve.points().step_by(7) {
            assert_relative_eq!(
                curve.value_at(point.booking_limit).unwrap(),
                point.revenue,
                max_relative = 1e-12
            );
        }
        assert_eq!(curve.value_at(101), None);
    }

    #[test]
    fn test_fractional_capacity_stops_at_last_whole_unit() {
        let curve = RevenueCurve::new(&TwoClass {
            capacity: Capacity::new(10.5).unwrap(),
            high: FareClass::new(5.0, 4.0, 1.0).unwrap(),
            low: FareClass::new(2.0, 6.0, 1.0).unwrap(),
        })
        .unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve.points().len(), 11);
        assert_eq!(curve.points().last().unwrap().booking_limit, 10);
    }

    #[test]
    fn test_argmax_near_littlewood_limit() {
        // y* = F_A⁻¹(1 - 2/5) = 40 + 8·0.2533 ≈ 42.03, so b* ≈ 57.97
        let best = curve().argmax();
        assert_eq!(best.booking_limit, 57);
    }

    #[test]
    fn test_overflow_probabilities() {
        let curve = curve();
        let points = curve.points().collect::<Vec<_>>();

        // b = 60 is B's mean, C - b = 40 is A's mean
        assert_relative_eq!(points[60].low_overflow, 0.5, max_relative = 1e-6);
        assert_relative_eq!(points[60].high_overflow, 0.5, max_relative = 1e-6);

        // selling more to B makes B less likely to overflow and A more likely
        for pair in points.windows(2) {
            assert!(pair[0].low_overflow >= pair[1].low_overflow);
            assert!(pair[0].high_overflow <= pair[1].high_overflow);
        }
        assert_eq!(curve.argmax(), points[57]);
    }

    #[test]
    fn test_rejects_capacity_beyond_index_range() {
        let query = TwoClass {
            capacity: Capacity::new(1e20).unwrap(),
            high: FareClass::new(5.0, 40.0, 8.0).unwrap(),
            low: FareClass::new(2.0, 60.0, 8.0).unwrap(),
        };
        let err = RevenueCurve::new(&query).unwrap_err();
        assert_eq!(err, RevenueError::TooManyUnits(1e20));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
