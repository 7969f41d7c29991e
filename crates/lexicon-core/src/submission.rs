//! Term submission payload and validation.

use serde::{Deserialize, Serialize};

use crate::error::{LexiconError, Result};

const MAX_TEXT_LEN: usize = 50;
const MAX_DEFINITION_LEN: usize = 500;
const MAX_EXAMPLE_LEN: usize = 200;

/// A new-term submission as received from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermSubmission {
    pub text: String,
    pub definition: String,
    pub example: String,
}

impl TermSubmission {
    /// Validate field presence and per-field limits.
    ///
    /// These limits bound what a submitter can push into the moderation
    /// pipeline; the pipeline's own 300-char combined budget is stricter
    /// and applies on top.
    pub fn validate(&self) -> Result<()> {
        check_field("term", &self.text, MAX_TEXT_LEN)?;
        check_field("definition", &self.definition, MAX_DEFINITION_LEN)?;
        check_field("example", &self.example, MAX_EXAMPLE_LEN)?;
        Ok(())
    }
}

fn check_field(name: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LexiconError::Validation(format!("{name} is required")));
    }
    if value.chars().count() > max {
        return Err(LexiconError::Validation(format!(
            "{name} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TermSubmission {
        TermSubmission {
            text: "rizz".to_string(),
            definition: "effortless charisma".to_string(),
            example: "that guy has rizz".to_string(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn empty_fields_are_rejected() {
        for field in ["text", "definition", "example"] {
            let mut s = valid();
            match field {
                "text" => s.text = "  ".to_string(),
                "definition" => s.definition = String::new(),
                _ => s.example = String::new(),
            }
            assert!(matches!(s.validate(), Err(LexiconError::Validation(_))));
        }
    }

    #[test]
    fn over_limit_fields_are_rejected() {
        let mut s = valid();
        s.text = "x".repeat(51);
        assert!(s.validate().is_err());

        let mut s = valid();
        s.definition = "x".repeat(501);
        assert!(s.validate().is_err());

        let mut s = valid();
        s.example = "x".repeat(201);
        assert!(s.validate().is_err());
    }

    #[test]
    fn limits_are_inclusive() {
        let mut s = valid();
        s.text = "x".repeat(50);
        s.definition = "y".repeat(500);
        s.example = "z".repeat(200);
        assert!(s.validate().is_ok());
    }
}
