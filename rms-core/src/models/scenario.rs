use super::{
    Capacity, CapacityError, ErrorKind, FareClass, FareClassDto, FareClassError, FareClasses,
    FareClassesError,
};

/// A multi-class allocation query: a capacity and the ranked fare classes competing for it
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ScenarioDto", into = "ScenarioDto")
)]
pub struct Scenario {
    /// The total units available
    pub capacity: Capacity,
    /// The competing classes, most valuable first
    pub classes: FareClasses,
}

/// The raw form of a [`Scenario`], as supplied by a collaborator
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioDto {
    /// The total units available (positive)
    pub capacity: f64,
    /// The fare classes, strictly descending in price
    pub classes: Vec<FareClassDto>,
}

impl TryFrom<ScenarioDto> for Scenario {
    type Error = ScenarioError;

    fn try_from(value: ScenarioDto) -> Result<Self, Self::Error> {
        Ok(Self {
            capacity: value.capacity.try_into()?,
            classes: value.classes.try_into()?,
        })
    }
}

impl From<Scenario> for ScenarioDto {
    fn from(value: Scenario) -> Self {
        Self {
            capacity: value.capacity.into(),
            classes: value.classes.into(),
        }
    }
}

/// Errors that can occur when validating a scenario
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    /// The capacity is invalid
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    /// The fare classes are invalid or out of order
    #[error(transparent)]
    Classes(#[from] FareClassesError),
}

impl ScenarioError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Capacity(err) => err.kind(),
            Self::Classes(err) => err.kind(),
        }
    }
}

/// A two-class allocation query.
///
/// Class A (`high`) pays more and books late; class B (`low`) pays less and
/// books early. Equal prices are admitted (the answer is then to protect
/// nothing), a cheaper `high` class is not.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TwoClassDto", into = "TwoClassDto")
)]
pub struct TwoClass {
    /// The total units available
    pub capacity: Capacity,
    /// Class A, the expensive late-booking class
    pub high: FareClass,
    /// Class B, the discounted early-booking class
    pub low: FareClass,
}

/// The raw form of a [`TwoClass`] query
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoClassDto {
    /// The total units available (positive)
    pub capacity: f64,
    /// Class A
    pub high: FareClassDto,
    /// Class B, priced no higher than class A
    pub low: FareClassDto,
}

impl TryFrom<TwoClassDto> for TwoClass {
    type Error = TwoClassError;

    fn try_from(value: TwoClassDto) -> Result<Self, Self::Error> {
        let capacity = value.capacity.try_into()?;
        let high = FareClass::try_from(value.high).map_err(TwoClassError::High)?;
        let low = FareClass::try_from(value.low).map_err(TwoClassError::Low)?;

        if low.price() > high.price() {
            return Err(TwoClassError::PriceInversion {
                high: high.price(),
                low: low.price(),
            });
        }

        Ok(Self {
            capacity,
            high,
            low,
        })
    }
}

impl From<TwoClass> for TwoClassDto {
    fn from(value: TwoClass) -> Self {
        Self {
            capacity: value.capacity.into(),
            high: value.high.into(),
            low: value.low.into(),
        }
    }
}

/// Errors that can occur when validating a two-class query
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TwoClassError {
    /// The capacity is invalid
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    /// Class A is invalid
    #[error("class 0: {0}")]
    High(FareClassError),
    /// Class B is invalid
    #[error("class 1: {0}")]
    Low(FareClassError),
    /// Class B is more expensive than class A
    #[error("low price {low} exceeds high price {high}; nothing to protect for")]
    PriceInversion {
        /// Price of class A
        high: f64,
        /// Price of class B
        low: f64,
    },
}

impl TwoClassError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Capacity(err) => err.kind(),
            Self::High(err) | Self::Low(err) => err.kind(),
            Self::PriceInversion { .. } => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(price: f64, mean: f64, stddev: f64) -> FareClassDto {
        FareClassDto {
            price,
            mean,
            stddev,
        }
    }

    #[test]
    fn test_scenario_validation() {
        let scenario = Scenario::try_from(ScenarioDto {
            capacity: 1000.0,
            classes: vec![dto(250.0, 275.0, 75.0), dto(100.0, 1000.0, 300.0)],
        })
        .unwrap();
        assert_eq!(scenario.capacity.get(), 1000.0);
        assert_eq!(scenario.classes.len(), 2);

        let err = Scenario::try_from(ScenarioDto {
            capacity: 0.0,
            classes: vec![dto(250.0, 275.0, 75.0), dto(100.0, 1000.0, 300.0)],
        })
        .unwrap_err();
        assert_eq!(err, ScenarioError::Capacity(CapacityError::NonPositive(0.0)));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_two_class_equal_prices_allowed() {
        let query = TwoClass::try_from(TwoClassDto {
            capacity: 100.0,
            high: dto(100.0, 30.0, 10.0),
            low: dto(100.0, 60.0, 10.0),
        });
        assert!(query.is_ok());
    }

    #[test]
    fn test_two_class_price_inversion() {
        let err = TwoClass::try_from(TwoClassDto {
            capacity: 100.0,
            high: dto(40.0, 30.0, 10.0),
            low: dto(100.0, 60.0, 10.0),
        })
        .unwrap_err();
        assert_eq!(
            err,
            TwoClassError::PriceInversion {
                high: 40.0,
                low: 100.0
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_two_class_names_offending_class() {
        let err = TwoClass::try_from(TwoClassDto {
            capacity: 100.0,
            high: dto(100.0, 30.0, 10.0),
            low: dto(40.0, 60.0, -2.0),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "class 1: stddev -2 must be positive and finite");
    }

    #[test]
    fn test_deserialize_scenario() {
        let raw = r#"{
            "capacity": 1000,
            "classes": [
                { "price": 250, "mean": 275, "stddev": 75 },
                { "price": 200, "mean": 525, "stddev": 50 },
                { "price": 100, "mean": 1000, "stddev": 300 }
            ]
        }"#;
        let scenario = serde_json::from_str::<Scenario>(raw).unwrap();
        assert_eq!(scenario.classes.len(), 3);

        let roundtrip = serde_json::to_value(&scenario).unwrap();
        assert_eq!(roundtrip["classes"][1]["mean"], 525.0);
    }
}
