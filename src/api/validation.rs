use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Field name to client-facing message
pub type FieldErrors = HashMap<String, String>;

pub const NAME_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 200;

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Checks shared by every city and point of interest payload
pub fn validate_name_and_description(name: &str, description: Option<&str>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if name.trim().is_empty() {
        errors.insert("name".to_string(), "You must provide a name.".to_string());
    } else if name.chars().count() > NAME_MAX_LENGTH {
        errors.insert("name".to_string(), max_length_message("name", NAME_MAX_LENGTH));
    }

    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_LENGTH {
            errors.insert("description".to_string(), max_length_message("description", DESCRIPTION_MAX_LENGTH));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn max_length_message(field: &str, max: usize) -> String {
    format!("The field {} must be a string with a maximum length of {}.", field, max)
}

/// Deserialize a missing or null string as empty so the required-field check reports it
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_payload() {
        assert!(validate_name_and_description("Paris", Some("The one with the big tower.")).is_ok());
        assert!(validate_name_and_description("Paris", None).is_ok());
    }

    #[test]
    fn name_is_required() {
        for name in ["", "   "] {
            let errors = validate_name_and_description(name, None).unwrap_err();
            assert_eq!(errors.get("name").map(String::as_str), Some("You must provide a name."));
        }
    }

    #[test]
    fn lengths_are_bounded_by_characters() {
        let fifty = "é".repeat(50);
        assert!(validate_name_and_description(&fifty, None).is_ok());

        let errors = validate_name_and_description(&"a".repeat(51), Some(&"d".repeat(201))).unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("description"));
    }
}
