use serde::{Deserialize, Serialize};
use std::fmt;

/// Tourist registration form
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(default)]
    pub full_name: String,
    /// Passport or Aadhaar number
    #[serde(default)]
    pub passport_number: String,
    #[serde(default)]
    pub emergency_contact: String,
    /// Key itinerary points, free text
    #[serde(default)]
    pub itinerary: String,
}

/// Form rejected before submission
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// Required fields that were empty or whitespace-only, in form order
    MissingFields(Vec<&'static str>),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for FormError {}

impl RegistrationForm {
    /// Presence check only. No format validation beyond non-blank values.
    pub fn validate(&self) -> Result<(), FormError> {
        let missing: Vec<&'static str> = [
            ("fullName", &self.full_name),
            ("passportNumber", &self.passport_number),
            ("emergencyContact", &self.emergency_contact),
            ("itinerary", &self.itinerary),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields(missing))
        }
    }
}
