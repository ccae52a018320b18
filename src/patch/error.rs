use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatchError {
    #[error("Invalid path '{0}': expected a single JSON pointer segment such as /name")]
    InvalidPath(String),

    #[error("Path '{0}' does not exist on the target")]
    UnknownPath(String),

    #[error("Test operation failed for path '{0}'")]
    TestFailed(String),

    #[error("Patched document is not valid: {0}")]
    InvalidValue(String),
}
