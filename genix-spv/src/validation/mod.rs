//! Validation functionality for the Genix SPV chain core.

mod difficulty;
mod header;

pub use difficulty::{
    DifficultyAnchor, DifficultyAnchorResolver, NO_TRANSITION_TIME, TargetVerifier,
};
pub use header::HeaderValidator;

use crate::error::ValidationResult;

pub trait Validator<T> {
    fn validate(&self, data: T) -> ValidationResult<()>;
}
