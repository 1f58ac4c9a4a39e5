//! Wire shapes of the parsing API. Everything is optional: the payload is
//! loosely structured and any field may be missing or null.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResumeResponse {
    pub data: Option<RawResumeData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResumeData {
    pub name: Option<RawName>,
    pub emails: Option<Vec<String>>,
    pub phone_numbers: Option<Vec<String>>,
    pub location: Option<RawLocation>,
    pub education: Option<Vec<RawEducation>>,
    pub skills: Option<Vec<RawSkill>>,
    pub certifications: Option<Vec<String>>,
    pub summary: Option<String>,
    pub total_years_experience: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawName {
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEducation {
    pub organization: Option<String>,
    pub accreditation: Option<RawAccreditation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccreditation {
    pub education: Option<String>,
    pub education_level: Option<String>,
}

/// Skill records carry id/taxonomy metadata; only the name is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkill {
    pub name: Option<String>,
}

/// Error envelope of a non-2xx answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<RawErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawErrorDetail {
    pub detail: Option<String>,
}

impl RawErrorBody {
    /// `message` first, then the first non-empty `errors[].detail`.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                self.errors
                    .into_iter()
                    .filter_map(|e| e.detail)
                    .find(|d| !d.trim().is_empty())
            })
    }

    /// Parses an error body; `None` when the body is not the expected JSON.
    pub fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<RawErrorBody>(body)
            .ok()
            .and_then(RawErrorBody::into_message)
    }
}
