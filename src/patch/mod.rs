pub mod apply;
pub mod error;
pub mod types;

pub use apply::apply_patch;
pub use error::PatchError;
pub use types::{PatchOperation, Patchable};
