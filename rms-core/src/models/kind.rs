use std::fmt;

/// The coarse classification shared by every error in the workspace.
///
/// Each error enum reports its kind through a `kind()` method, which lets a
/// collaborator (a CLI, a UI) react to the category of a failure without
/// matching on every variant of every module's error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// A scalar parameter is out of its admissible range (non-positive price,
    /// stddev or capacity, negative mean, non-finite values)
    InvalidParameter,
    /// A probability outside of [0, 1] was handed to a quantile query
    DomainError,
    /// Fare classes are not strictly descending in price
    OrderingViolation,
    /// The inputs are individually valid but cannot be combined
    /// (price inversion, zero aggregate demand, bad opening index)
    InvalidInput,
    /// A numeric routine failed on in-domain input
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidParameter => "invalid parameter",
            Self::DomainError => "domain error",
            Self::OrderingViolation => "ordering violation",
            Self::InvalidInput => "invalid input",
            Self::Internal => "internal error",
        };
        f.write_str(name)
    }
}
