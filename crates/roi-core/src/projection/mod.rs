//! Year-by-year ROI projection: scenario validation, per-year policy rules
//! and the ledger recurrence.

pub mod engine;
pub mod scenario;
pub mod schedule;

pub use engine::{project_roi, ProjectionResult, SummaryRow, YearRecord};
pub use scenario::{Acquisition, DecayOffset, FeeTreatment, RoundingPrecision, ScenarioInput};
