//! Maps the parser's raw payload onto `ParsedResume`.
//!
//! Optional upstream fields get safe defaults. A payload without `data` or
//! without `data.name.raw` cannot produce a complete record and is rejected
//! as a whole.

use crate::errors::UploadError;
use crate::parsing::models::{Accreditation, EducationEntry, ParsedResume};
use crate::parsing::raw::{RawEducation, RawResumeResponse};

pub fn normalize(raw: RawResumeResponse) -> Result<ParsedResume, UploadError> {
    let data = raw
        .data
        .ok_or_else(|| UploadError::Unknown("response has no `data` object".to_string()))?;

    let name = data
        .name
        .and_then(|n| n.raw)
        .ok_or_else(|| UploadError::Unknown("response has no `data.name.raw`".to_string()))?;

    Ok(ParsedResume {
        name,
        email: data.emails.unwrap_or_default(),
        phone_number: data.phone_numbers.unwrap_or_default(),
        location: data.location.and_then(|l| l.formatted),
        skills: data
            .skills
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.name)
            .collect(),
        education: data
            .education
            .unwrap_or_default()
            .into_iter()
            .map(education_entry)
            .collect(),
        certifications: data.certifications.unwrap_or_default(),
        summary: data.summary.unwrap_or_default(),
        total_experience: data.total_years_experience.unwrap_or(0.0),
    })
}

fn education_entry(raw: RawEducation) -> EducationEntry {
    let accreditation = raw.accreditation.unwrap_or_default();
    EducationEntry {
        organization: raw.organization,
        accreditation: Accreditation {
            education: accreditation.education,
            education_level: accreditation.education_level,
        },
    }
}
