use rms_solver::{RevenueCurve, RevenuePoint};
use serde::Serialize;

/// Every sample of a revenue curve, with its peak called out
#[derive(Debug, Serialize)]
pub struct Curve {
    pub best: RevenuePoint,
    pub points: Vec<RevenuePoint>,
}

impl Curve {
    pub fn sample(curve: &RevenueCurve) -> Self {
        Self {
            best: curve.argmax(),
            points: curve.points().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rms_core::models::{FareClassDto, TwoClassDto};
    use rms_solver::Allocator;

    #[test]
    fn test_sample() {
        let query = TwoClassDto {
            capacity: 100.0,
            high: FareClassDto {
                price: 100.0,
                mean: 30.0,
                stddev: 10.0,
            },
            low: FareClassDto {
                price: 40.0,
                mean: 80.0,
                stddev: 20.0,
            },
        };
        let curve = Curve::sample(&Allocator::default().revenue_curve(query).unwrap());

        assert_eq!(curve.points.len(), 101);
        assert_eq!(curve.best.booking_limit, 67);
        assert_eq!(curve.points[67], curve.best);
    }
}
