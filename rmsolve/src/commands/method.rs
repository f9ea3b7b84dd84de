use super::batch;
use clap::ValueEnum;
use rms_core::models::{Map, ScenarioDto};
use rms_solver::{
    Allocator, AllocatorError, EmsrA, EmsrB, NestedAllocation, ProtectionHeuristic as _,
    io::{Batch, ScenarioId},
};
use serde::Serialize;

// This explicitly articulates the available heuristics for the `emsr` and `batch` subcommands
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Method {
    /// EMSR-a: pairwise Littlewood levels, summed
    A,
    /// EMSR-b: one Littlewood level against the pooled higher classes
    B,
}

/// A single protection level, as reported with `--opening`
#[derive(Debug, PartialEq, Serialize)]
pub struct Level {
    pub opening: usize,
    pub protection_level: f64,
    /// EMSR-a only: the level against each higher class, in rank order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairwise: Option<Vec<f64>>,
}

// The same enum dispatches into the heuristic implementations
impl Method {
    pub fn protect(
        &self,
        allocator: &Allocator,
        scenario: &ScenarioDto,
        opening: usize,
    ) -> Result<Level, AllocatorError> {
        // the capacity plays no part in a single level, but the scenario must still be sound
        allocator.validate(scenario.clone())?;

        let (protection_level, pairwise) = match self {
            Self::A => {
                let pairs = allocator.emsr_a_pairwise(&scenario.classes, opening)?;
                (pairs.iter().sum(), Some(pairs))
            }
            Self::B => (allocator.emsr_b(&scenario.classes, opening)?, None),
        };
        Ok(Level {
            opening,
            protection_level,
            pairwise,
        })
    }

    pub fn nested(
        &self,
        allocator: &Allocator,
        scenario: ScenarioDto,
    ) -> Result<NestedAllocation, AllocatorError> {
        let settings = *allocator.settings();
        match self {
            Self::A => allocator.nested(&EmsrA::new(settings), scenario),
            Self::B => allocator.nested(&EmsrB::new(settings), scenario),
        }
    }

    pub async fn batch(
        &self,
        allocator: Allocator,
        scenarios: Batch,
    ) -> Map<ScenarioId, batch::Entry> {
        let settings = *allocator.settings();
        match self {
            Self::A => batch::run(allocator, EmsrA::new(settings), scenarios).await,
            Self::B => batch::run(allocator, EmsrB::new(settings), scenarios).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rms_core::models::{ErrorKind, FareClassDto};

    fn quidditch() -> ScenarioDto {
        let class = |price, mean, stddev| FareClassDto {
            price,
            mean,
            stddev,
        };
        ScenarioDto {
            capacity: 1000.0,
            classes: vec![
                class(250.0, 275.0, 75.0),
                class(200.0, 525.0, 50.0),
                class(100.0, 1000.0, 300.0),
            ],
        }
    }

    #[test]
    fn test_single_level_matches_table() {
        let allocator = Allocator::default();
        for method in [Method::A, Method::B] {
            let table = method.nested(&allocator, quidditch()).unwrap();
            let level = method.protect(&allocator, &quidditch(), 2).unwrap();
            assert_eq!(level.opening, 2);
            // below capacity, so the table row is not clamped
            assert!((table.classes[2].protection_level - level.protection_level).abs() < 1e-9);
        }
    }

    #[test]
    fn test_methods_differ_beyond_one_higher_class() {
        let allocator = Allocator::default();
        let a = Method::A.protect(&allocator, &quidditch(), 2).unwrap();
        let b = Method::B.protect(&allocator, &quidditch(), 2).unwrap();
        assert!(a.protection_level > b.protection_level);
    }

    #[test]
    fn test_pairwise_only_for_emsr_a() {
        let allocator = Allocator::default();
        let a = Method::A.protect(&allocator, &quidditch(), 2).unwrap();
        let pairs = a.pairwise.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.iter().sum::<f64>(), a.protection_level);

        let b = Method::B.protect(&allocator, &quidditch(), 2).unwrap();
        assert_eq!(b.pairwise, None);
    }

    #[test]
    fn test_single_level_validates_capacity() {
        let allocator = Allocator::default();
        let scenario = ScenarioDto {
            capacity: -5.0,
            ..quidditch()
        };
        for method in [Method::A, Method::B] {
            let err = method.protect(&allocator, &scenario, 2).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }
}
