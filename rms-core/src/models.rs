mod capacity;
mod demand;
mod fare_class;
mod kind;
mod map;
mod scenario;

pub use capacity::{Capacity, CapacityError};
pub use demand::{NormalDemand, NormalDemandDto, NormalDemandError, QuantileError, QuantileSettings};
pub use fare_class::{FareClass, FareClassDto, FareClassError, FareClasses, FareClassesError};
pub use kind::ErrorKind;
pub use map::Map;
pub use scenario::{Scenario, ScenarioDto, ScenarioError, TwoClass, TwoClassDto, TwoClassError};
