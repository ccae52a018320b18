pub mod dto;
pub mod validation;

pub use validation::{FieldErrors, Validate};
