//! Year-by-year return-on-investment projection for a leveraged off-plan
//! property purchase.
//!
//! The engine is a pure function of a [`projection::ScenarioInput`]: it
//! performs no I/O, holds no state between calls and is safe to call from
//! any thread.

pub mod error;
pub mod projection;
pub mod types;

#[cfg(feature = "sensitivity")]
pub mod scenarios;

pub use error::RoiError;
pub use types::*;

/// Standard result type for all roi-core operations
pub type RoiResult<T> = Result<T, RoiError>;
