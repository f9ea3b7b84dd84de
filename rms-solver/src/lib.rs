#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use rms_core::models::{ErrorKind, FareClassError, FareClasses};

/**
 * The two-class rule and the allocation it induces.
 */
pub mod littlewood;
pub use littlewood::LittlewoodError;

/**
 * These are the multi-class heuristics.
 */
mod impls;
pub use impls::*;

mod outcome;
pub use outcome::*;

mod revenue;
pub use revenue::*;

mod allocator;
pub use allocator::*;

/// (De)serializable reports for batches of named scenarios
#[cfg(feature = "io")]
pub mod io;

/// The ProtectionHeuristic trait defines the interface for multi-class protection rules.
///
/// A heuristic looks at a ranked list of fare classes and decides how many
/// units to hold back for the classes `[0, opening)` before the class at
/// `opening` is put on sale. Implementations differ in how they combine the
/// higher classes; they share the same inputs, outputs and error contract.
pub trait ProtectionHeuristic {
    /// The configuration type for this heuristic
    type Settings;

    /// Create a new instance with the provided settings
    fn new(settings: Self::Settings) -> Self;

    /// The protection level (never negative) for classes `[0, opening)` against class `opening`.
    ///
    /// # Errors
    ///
    /// [`HeuristicError::Opening`] unless `1 <= opening < classes.len()`; this
    /// is checked before any numeric work.
    fn protection_level(&self, classes: &FareClasses, opening: usize) -> Result<f64, HeuristicError>;

    /// The protection levels for every opening `1..classes.len()`, in order
    fn protection_levels(&self, classes: &FareClasses) -> Result<Vec<f64>, HeuristicError> {
        (1..classes.len())
            .map(|opening| self.protection_level(classes, opening))
            .collect()
    }
}

/// Errors that can occur when evaluating a multi-class heuristic
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum HeuristicError {
    /// The opening index does not name a class below the top one
    #[error("opening index {opening} is outside of 1..{len}")]
    Opening {
        /// The requested opening index
        opening: usize,
        /// The number of ranked classes
        len: usize,
    },
    /// The classes ahead of the opening have no expected demand at all,
    /// so no demand-weighted price exists
    #[error("classes 0..{opening} have zero aggregate demand")]
    ZeroAggregateDemand {
        /// The requested opening index
        opening: usize,
    },
    /// The aggregated class is not representable (e.g. its variance overflows)
    #[error("aggregated class: {0}")]
    Aggregate(#[from] FareClassError),
    /// A Littlewood evaluation failed
    #[error(transparent)]
    Littlewood(#[from] LittlewoodError),
}

impl HeuristicError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Opening { .. } | Self::ZeroAggregateDemand { .. } | Self::Aggregate(_) => {
                ErrorKind::InvalidInput
            }
            Self::Littlewood(err) => err.kind(),
        }
    }
}
