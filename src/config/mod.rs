//! Configuration for the affiliation network pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::temporal::{StepCountPolicy, TimeStep};
use crate::filter::PersistenceMode;
use crate::schema::ORG_TYPE;

/// Settings shared by edge building, metrics and windowed aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// How long affiliations keep members connected after their end date
    pub persistence: PersistenceMode,
    /// Months an event-type affiliation stays active after its end date
    pub event_linger_months: u32,
    /// Column that marks an affiliation's type
    pub event_type_column: String,
    /// Value of `event_type_column` identifying event-type affiliations
    pub event_type_value: String,
    /// Whether edges carry the names of the groups they came from
    pub get_edge_names: bool,
    /// Step unit for windowed aggregation
    pub timestep: TimeStep,
    /// How many windows an aggregation range is split into
    pub step_policy: StepCountPolicy,
    /// Compute windows on the rayon thread pool
    pub parallel: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            persistence: PersistenceMode::None,
            event_linger_months: 0,
            event_type_column: ORG_TYPE.to_string(),
            event_type_value: "event".to_string(),
            get_edge_names: true,
            timestep: TimeStep::Months,
            step_policy: StepCountPolicy::HistoricalShortByOne,
            parallel: false,
        }
    }
}

impl NetworkConfig {
    /// Set the persistence mode and event linger duration
    #[must_use]
    pub fn with_persistence(mut self, persistence: PersistenceMode, linger_months: u32) -> Self {
        self.persistence = persistence;
        self.event_linger_months = linger_months;
        self
    }

    /// Set the aggregation step unit
    #[must_use]
    pub fn with_timestep(mut self, timestep: TimeStep) -> Self {
        self.timestep = timestep;
        self
    }

    /// Enable or disable parallel window computation
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl fmt::Display for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network Configuration:")?;
        writeln!(f, "  Persistence: {}", self.persistence)?;
        if self.persistence == PersistenceMode::EventsOnly {
            writeln!(f, "  Event Linger: {} months", self.event_linger_months)?;
            writeln!(
                f,
                "  Event Type: {} = {}",
                self.event_type_column, self.event_type_value
            )?;
        }
        writeln!(f, "  Edge Names: {}", self.get_edge_names)?;
        writeln!(f, "  Timestep: {}", self.timestep)?;
        writeln!(f, "  Step Policy: {:?}", self.step_policy)?;
        writeln!(f, "  Parallel: {}", self.parallel)?;
        Ok(())
    }
}
