use crate::{
    Allocator, AllocatorError, NestedAllocation, ProtectionHeuristic, RevenuePoint,
    TwoClassAllocation,
};
use rms_core::models::{Map, ScenarioDto, TwoClassDto};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_wrapper {
    ($struct:ident) => {
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        #[doc = concat!("A newtype wrapper for ", stringify!($struct))]
        pub struct $struct(String);

        impl fmt::Display for $struct {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

string_wrapper!(ScenarioId);

/// A batch of named scenarios, evaluated independently and reported in order
pub type Batch = Map<ScenarioId, ScenarioDto>;

/// Everything the allocator can say about one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The nested booking-limit table for the full ranking
    pub nested: NestedAllocation,
    /// The exact Littlewood answer, present only for two-class scenarios
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub two_class: Option<TwoClassReport>,
}

/// The two-class part of a [`Report`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoClassReport {
    /// Littlewood's protection level and booking limit
    pub allocation: TwoClassAllocation,
    /// The best sample of the expected-revenue curve
    pub best: RevenuePoint,
}

/// Reads the two classes of a scenario as a two-class query.
///
/// Returns `None` unless the scenario has exactly two classes; ordering is
/// left to the query's own validation.
pub fn as_two_class(scenario: &ScenarioDto) -> Option<TwoClassDto> {
    match scenario.classes.as_slice() {
        &[high, low] => Some(TwoClassDto {
            capacity: scenario.capacity,
            high,
            low,
        }),
        _ => None,
    }
}

/// Evaluate one scenario
pub fn evaluate<H: ProtectionHeuristic>(
    allocator: &Allocator,
    heuristic: &H,
    scenario: ScenarioDto,
) -> Result<Report, AllocatorError> {
    let two_class = as_two_class(&scenario);
    let nested = allocator.nested(heuristic, scenario)?;

    let two_class = match two_class {
        Some(query) => Some(TwoClassReport {
            allocation: allocator.optimal_two_class(query)?,
            best: allocator.revenue_curve(query)?.argmax(),
        }),
        None => None,
    };

    Ok(Report { nested, two_class })
}
