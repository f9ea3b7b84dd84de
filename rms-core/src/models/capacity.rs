use super::ErrorKind;

/// The total number of interchangeable units that can be sold (seats, rooms, copies).
///
/// Capacity is a positive, finite real. Integer inventories are the common
/// case, but nothing in the allocation rules requires integrality.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(transparent))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Capacity(f64);

impl Capacity {
    /// Creates a capacity, requiring a finite, positive value
    pub fn new(units: f64) -> Result<Self, CapacityError> {
        Self::try_from(units)
    }

    /// The number of units
    pub fn get(&self) -> f64 {
        self.0
    }

    /// The number of whole units, i.e. the last integer booking limit.
    ///
    /// `None` if that count is not representable as a `usize`.
    pub fn whole_units(&self) -> Option<usize> {
        let units = self.0.floor();
        // usize::MAX rounds up to a power of two, so this bound is exclusive
        (units < usize::MAX as f64).then_some(units as usize)
    }

    /// Restricts an amount of units to [0, capacity]
    pub fn clamp(&self, units: f64) -> f64 {
        units.clamp(0.0, self.0)
    }
}

impl TryFrom<f64> for Capacity {
    type Error = CapacityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value > 0.0 && value.is_finite() {
            Ok(Self(value))
        } else {
            Err(CapacityError::NonPositive(value))
        }
    }
}

impl From<Capacity> for f64 {
    fn from(value: Capacity) -> Self {
        value.0
    }
}

/// Errors that can occur when constructing a capacity
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CapacityError {
    /// The capacity is zero, negative, NaN or infinite
    #[error("capacity {0} must be positive and finite")]
    NonPositive(f64),
}

impl CapacityError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidParameter
    }
}
