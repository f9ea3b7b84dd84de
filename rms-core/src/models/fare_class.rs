use super::{ErrorKind, NormalDemand, NormalDemandDto, NormalDemandError};

/// A demand segment paying a single fixed price.
///
/// A fare class is an immutable record of its price and its demand model. Its
/// rank is not stored: it is the position of the class inside a
/// [`FareClasses`] collection.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "FareClassDto", into = "FareClassDto")
)]
pub struct FareClass {
    price: f64,
    demand: NormalDemand,
}

impl FareClass {
    /// Creates a fare class with validation
    pub fn new(price: f64, mean: f64, stddev: f64) -> Result<Self, FareClassError> {
        Self::try_from(FareClassDto {
            price,
            mean,
            stddev,
        })
    }

    /// The price paid per unit
    pub fn price(&self) -> f64 {
        self.price
    }

    /// The demand model of the class
    pub fn demand(&self) -> &NormalDemand {
        &self.demand
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FareClassDto {
    /// The (positive) price paid per unit
    pub price: f64,
    /// The (non-negative) expected demand
    pub mean: f64,
    /// The (positive) standard deviation of demand
    pub stddev: f64,
}

impl From<FareClass> for FareClassDto {
    fn from(value: FareClass) -> Self {
        Self {
            price: value.price,
            mean: value.demand.mean(),
            stddev: value.demand.stddev(),
        }
    }
}

impl TryFrom<FareClassDto> for FareClass {
    type Error = FareClassError;

    fn try_from(value: FareClassDto) -> Result<Self, Self::Error> {
        let FareClassDto {
            price,
            mean,
            stddev,
        } = value;

        if !(price > 0.0 && price.is_finite()) {
            return Err(FareClassError::InvalidPrice(price));
        }
        // The demand model admits any finite mean; a fare class does not
        if mean < 0.0 {
            return Err(FareClassError::NegativeMean(mean));
        }
        let demand = NormalDemandDto { mean, stddev }.try_into()?;

        Ok(Self { price, demand })
    }
}

/// Errors that can occur when constructing a fare class
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FareClassError {
    /// The price is not a finite, positive number
    #[error("price {0} must be positive and finite")]
    InvalidPrice(f64),
    /// The expected demand is negative
    #[error("mean {0} must be non-negative")]
    NegativeMean(f64),
    /// The demand parameters are malformed
    #[error(transparent)]
    Demand(#[from] NormalDemandError),
}

impl FareClassError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidParameter
    }
}

/// A ranked list of fare classes, strictly descending in price.
///
/// Index 0 is the most valuable class, which is opened last; the final class
/// is the cheapest and is opened first. The ordering is validated, never
/// repaired: an out-of-order list is rejected rather than re-sorted, since a
/// re-sort would silently change which classes get protected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<FareClassDto>", into = "Vec<FareClassDto>")
)]
pub struct FareClasses(Vec<FareClass>);

impl FareClasses {
    /// Creates a ranked collection, validating the ordering
    pub fn new(classes: Vec<FareClass>) -> Result<Self, FareClassesError> {
        if classes.len() < 2 {
            return Err(FareClassesError::TooFew(classes.len()));
        }

        for (index, pair) in classes.windows(2).enumerate() {
            let (previous, price) = (pair[0].price, pair[1].price);
            if !(price < previous) {
                return Err(FareClassesError::NotDescending {
                    index: index + 1,
                    price,
                    previous,
                });
            }
        }

        Ok(Self(classes))
    }

    /// The number of classes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a ranked collection holds at least two classes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The classes in rank order
    pub fn as_slice(&self) -> &[FareClass] {
        &self.0
    }

    /// Iterate over the classes in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, FareClass> {
        self.0.iter()
    }

    /// Splits the ranking at `opening`, returning the classes protected ahead
    /// of it together with the class being opened.
    ///
    /// Returns `None` unless `1 <= opening < len`.
    pub fn split_at_opening(&self, opening: usize) -> Option<(&[FareClass], &FareClass)> {
        if opening == 0 {
            return None;
        }
        let class = self.0.get(opening)?;
        Some((&self.0[..opening], class))
    }
}

impl std::ops::Index<usize> for FareClasses {
    type Output = FareClass;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a FareClasses {
    type Item = &'a FareClass;
    type IntoIter = std::slice::Iter<'a, FareClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<Vec<FareClassDto>> for FareClasses {
    type Error = FareClassesError;

    /// Validates every class (reporting the first offending index) and then the ordering
    fn try_from(value: Vec<FareClassDto>) -> Result<Self, Self::Error> {
        let classes = value
            .into_iter()
            .enumerate()
            .map(|(index, dto)| {
                FareClass::try_from(dto).map_err(|source| FareClassesError::Class { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(classes)
    }
}

impl From<FareClasses> for Vec<FareClassDto> {
    fn from(value: FareClasses) -> Self {
        value.0.into_iter().map(Into::into).collect()
    }
}

/// Errors that can occur when constructing a ranked collection of fare classes
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FareClassesError {
    /// Fewer than two classes were supplied
    #[error("at least two fare classes are required, got {0}")]
    TooFew(usize),
    /// A class failed validation
    #[error("class {index}: {source}")]
    Class {
        /// The position of the offending class
        index: usize,
        /// What was wrong with it
        source: FareClassError,
    },
    /// A class is not strictly cheaper than its predecessor
    #[error("class {index}: price {price} is not below the price {previous} of class {}", .index - 1)]
    NotDescending {
        /// The position of the offending class
        index: usize,
        /// Its price
        price: f64,
        /// The price of the class ranked directly above it
        previous: f64,
    },
}

impl FareClassesError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooFew(_) => ErrorKind::InvalidInput,
            Self::Class { source, .. } => source.kind(),
            Self::NotDescending { .. } => ErrorKind::OrderingViolation,
        }
    }
}
