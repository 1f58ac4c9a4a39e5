use bytes::Bytes;
use serde::Serialize;

/// The two document formats the picker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    /// Picker filter: `.pdf` or `.docx`, case-insensitive. Content is not inspected.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// A user-chosen resume held in memory until it is replaced or dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub kind: FileKind,
    pub content: Bytes,
}

impl SelectedFile {
    /// Returns `None` when the name fails the extension filter.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Option<Self> {
        let file_name = file_name.into();
        let kind = FileKind::from_file_name(&file_name)?;
        Some(Self {
            file_name,
            kind,
            content: content.into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accreditation {
    pub education: Option<String>,
    pub education_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EducationEntry {
    pub organization: Option<String>,
    pub accreditation: Accreditation,
}

/// The normalized display model. Always complete: built in one step from an
/// upstream response or not at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub name: String,
    pub email: Vec<String>,
    pub phone_number: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub summary: String,
    /// Years.
    pub total_experience: f64,
}

/// What the rendering layer observes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    Loading,
    Success(ParsedResume),
    Failure(String),
}

impl UploadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadStatus::Loading)
    }
}
