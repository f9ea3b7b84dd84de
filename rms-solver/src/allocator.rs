use crate::{
    EmsrA, EmsrB, HeuristicError, LittlewoodError, NestedAllocation, ProtectionHeuristic,
    RevenueCurve, RevenueError, TwoClassAllocation, littlewood,
};
use rms_core::models::{
    ErrorKind, FareClassDto, FareClasses, FareClassesError, QuantileSettings, Scenario, ScenarioDto,
    ScenarioError, TwoClass, TwoClassDto, TwoClassError,
};
use tracing::{Level, event};

/// The entry point for collaborators holding raw numbers.
///
/// Every method first converts its raw input into validated models, failing
/// with an error that names the offending class and value, and only then runs
/// the numeric procedure. Results are never partial: a call either returns a
/// complete answer or an error.
///
/// The allocator itself only carries the quantile solver settings, so it is
/// cheap to copy and safe to share across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct Allocator {
    settings: QuantileSettings,
}

impl Allocator {
    /// Create a new instance with the provided quantile settings
    pub fn new(settings: QuantileSettings) -> Self {
        Self { settings }
    }

    /// The quantile settings handed to every procedure
    pub fn settings(&self) -> &QuantileSettings {
        &self.settings
    }

    /// Validate a multi-class scenario
    pub fn validate(&self, scenario: ScenarioDto) -> Result<Scenario, AllocatorError> {
        let scenario = Scenario::try_from(scenario)?;
        event!(
            Level::DEBUG,
            capacity = scenario.capacity.get(),
            classes = scenario.classes.len(),
            "validated scenario"
        );
        Ok(scenario)
    }

    /// Validate a two-class query
    pub fn validate_two_class(&self, query: TwoClassDto) -> Result<TwoClass, AllocatorError> {
        let query = TwoClass::try_from(query)?;
        event!(
            Level::DEBUG,
            capacity = query.capacity.get(),
            high = query.high.price(),
            low = query.low.price(),
            "validated two-class query"
        );
        Ok(query)
    }

    /// Littlewood's optimal protection level and booking limit for two classes
    pub fn optimal_two_class(&self, query: TwoClassDto) -> Result<TwoClassAllocation, AllocatorError> {
        let query = self.validate_two_class(query)?;
        let allocation = littlewood::optimal(&query, &self.settings)?;
        event!(
            Level::DEBUG,
            protection_level = allocation.protection_level,
            booking_limit = allocation.booking_limit,
            "two-class allocation"
        );
        Ok(allocation)
    }

    /// The expected-revenue curve over the booking limit for two classes
    pub fn revenue_curve(&self, query: TwoClassDto) -> Result<RevenueCurve, AllocatorError> {
        let query = self.validate_two_class(query)?;
        Ok(RevenueCurve::new(&query)?)
    }

    /// The EMSR-a protection level for the classes ranked above `opening`
    pub fn emsr_a(&self, classes: &[FareClassDto], opening: usize) -> Result<f64, AllocatorError> {
        self.protect(&EmsrA::new(self.settings), classes, opening)
    }

    /// The EMSR-a pairwise levels, one per class ranked above `opening`, that sum to [`Allocator::emsr_a`]
    pub fn emsr_a_pairwise(
        &self,
        classes: &[FareClassDto],
        opening: usize,
    ) -> Result<Vec<f64>, AllocatorError> {
        let classes = FareClasses::try_from(classes.to_vec())?;
        let levels = EmsrA::new(self.settings).pairwise(&classes, opening)?;
        event!(Level::DEBUG, opening, ?levels, "pairwise protection levels");
        Ok(levels)
    }

    /// The EMSR-b protection level for the classes ranked above `opening`
    pub fn emsr_b(&self, classes: &[FareClassDto], opening: usize) -> Result<f64, AllocatorError> {
        self.protect(&EmsrB::new(self.settings), classes, opening)
    }

    /// The protection level of an arbitrary heuristic for the classes ranked above `opening`
    pub fn protect<H: ProtectionHeuristic>(
        &self,
        heuristic: &H,
        classes: &[FareClassDto],
        opening: usize,
    ) -> Result<f64, AllocatorError> {
        let classes = FareClasses::try_from(classes.to_vec())?;
        let level = heuristic.protection_level(&classes, opening)?;
        event!(Level::DEBUG, opening, level, "protection level");
        Ok(level)
    }

    /// The nested booking-limit table of a full ranking under `heuristic`
    pub fn nested<H: ProtectionHeuristic>(
        &self,
        heuristic: &H,
        scenario: ScenarioDto,
    ) -> Result<NestedAllocation, AllocatorError> {
        let scenario = self.validate(scenario)?;
        let table = NestedAllocation::compute(heuristic, &scenario)?;
        for row in table.classes.iter() {
            event!(
                Level::DEBUG,
                rank = row.rank,
                protection_level = row.protection_level,
                booking_limit = row.booking_limit,
                "nested limit"
            );
        }
        Ok(table)
    }
}

/// Errors that can occur at the allocator boundary
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AllocatorError {
    /// The scenario failed validation
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
    /// The ranked classes failed validation
    #[error("invalid fare classes: {0}")]
    Classes(#[from] FareClassesError),
    /// The two-class query failed validation
    #[error("invalid two-class query: {0}")]
    TwoClass(#[from] TwoClassError),
    /// Littlewood's rule could not be applied
    #[error(transparent)]
    Littlewood(#[from] LittlewoodError),
    /// A multi-class heuristic could not be applied
    #[error(transparent)]
    Heuristic(#[from] HeuristicError),
    /// The revenue curve cannot be sampled
    #[error(transparent)]
    Revenue(#[from] RevenueError),
}

impl AllocatorError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Scenario(err) => err.kind(),
            Self::Classes(err) => err.kind(),
            Self::TwoClass(err) => err.kind(),
            Self::Littlewood(err) => err.kind(),
            Self::Heuristic(err) => err.kind(),
            Self::Revenue(err) => err.kind(),
        }
    }
}
