use serde_json::{Map, Value};

use super::error::PatchError;
use super::types::{PatchOperation, Patchable};

/// Apply `operations` in order to a copy of `target`.
///
/// Either every operation succeeds and the patched copy is returned, or the first
/// failure is returned and `target` is left as it was.
pub fn apply_patch<T: Patchable>(target: &T, operations: &[PatchOperation]) -> Result<T, PatchError> {
    let mut document = match serde_json::to_value(target) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(PatchError::InvalidValue("target is not an object".to_string())),
        Err(e) => return Err(PatchError::InvalidValue(e.to_string())),
    };

    for operation in operations {
        apply_operation::<T>(&mut document, operation)?;
    }

    serde_json::from_value(Value::Object(document)).map_err(|e| PatchError::InvalidValue(e.to_string()))
}

fn apply_operation<T: Patchable>(document: &mut Map<String, Value>, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            let field = resolve_path::<T>(path)?;
            document.insert(field.to_string(), value.clone());
        }
        PatchOperation::Remove { path } => {
            let field = resolve_path::<T>(path)?;
            document.insert(field.to_string(), Value::Null);
        }
        PatchOperation::Copy { from, path } => {
            let source = resolve_path::<T>(from)?;
            let field = resolve_path::<T>(path)?;
            let value = document.get(source).cloned().unwrap_or(Value::Null);
            document.insert(field.to_string(), value);
        }
        PatchOperation::Move { from, path } => {
            let source = resolve_path::<T>(from)?;
            let field = resolve_path::<T>(path)?;
            if source != field {
                let value = document.insert(source.to_string(), Value::Null).unwrap_or(Value::Null);
                document.insert(field.to_string(), value);
            }
        }
        PatchOperation::Test { path, value } => {
            let field = resolve_path::<T>(path)?;
            if document.get(field).unwrap_or(&Value::Null) != value {
                return Err(PatchError::TestFailed(path.clone()));
            }
        }
    }
    Ok(())
}

/// Map a JSON pointer to one of the projection's field names, ignoring ASCII case
fn resolve_path<T: Patchable>(path: &str) -> Result<&'static str, PatchError> {
    let segment = path
        .strip_prefix('/')
        .filter(|s| !s.is_empty() && !s.contains('/'))
        .ok_or_else(|| PatchError::InvalidPath(path.to_string()))?;
    let segment = segment.replace("~1", "/").replace("~0", "~");

    T::FIELDS
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(&segment))
        .ok_or_else(|| PatchError::UnknownPath(path.to_string()))
}
