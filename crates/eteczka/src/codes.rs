//! Fixed code lists used when classifying personnel-file documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Part of the personnel file a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LegalSection {
    /// Documents collected before employment.
    A,
    /// Documents about the employment relationship.
    B,
    /// Documents about termination.
    C,
    /// Disciplinary liability.
    D,
    /// Sobriety and drug checks.
    E,
}

impl LegalSection {
    pub const ALL: [LegalSection; 5] = [
        LegalSection::A,
        LegalSection::B,
        LegalSection::C,
        LegalSection::D,
        LegalSection::E,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LegalSection::A => "A",
            LegalSection::B => "B",
            LegalSection::C => "C",
            LegalSection::D => "D",
            LegalSection::E => "E",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LegalSection::A => "Część A - dokumenty przed zatrudnieniem",
            LegalSection::B => "Część B - nawiązanie i przebieg zatrudnienia",
            LegalSection::C => "Część C - ustanie zatrudnienia",
            LegalSection::D => "Część D - odpowiedzialność porządkowa",
            LegalSection::E => "Część E - kontrola trzeźwości",
        }
    }
}

impl fmt::Display for LegalSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LegalSection {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(LegalSection::A),
            "B" => Ok(LegalSection::B),
            "C" => Ok(LegalSection::C),
            "D" => Ok(LegalSection::D),
            "E" => Ok(LegalSection::E),
            _ => Err(UnknownCode::new("legal section", s)),
        }
    }
}

/// Statutory retention period of an archived document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetentionPeriod {
    #[serde(rename = "10_years")]
    TenYears,
    #[serde(rename = "50_years")]
    FiftyYears,
    #[serde(rename = "permanent")]
    Permanent,
    #[serde(rename = "until_termination")]
    UntilTermination,
}

impl RetentionPeriod {
    pub const ALL: [RetentionPeriod; 4] = [
        RetentionPeriod::TenYears,
        RetentionPeriod::FiftyYears,
        RetentionPeriod::Permanent,
        RetentionPeriod::UntilTermination,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RetentionPeriod::TenYears => "10_years",
            RetentionPeriod::FiftyYears => "50_years",
            RetentionPeriod::Permanent => "permanent",
            RetentionPeriod::UntilTermination => "until_termination",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RetentionPeriod::TenYears => "10 lat (zatrudnienie od 2019)",
            RetentionPeriod::FiftyYears => "50 lat (zatrudnienie przed 2019)",
            RetentionPeriod::Permanent => "Bezterminowo",
            RetentionPeriod::UntilTermination => "Do ustania zatrudnienia",
        }
    }
}

impl fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RetentionPeriod {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RetentionPeriod::ALL
            .into_iter()
            .find(|r| r.code() == s.trim())
            .ok_or_else(|| UnknownCode::new("retention period", s))
    }
}

/// Kind of document stored in the personnel file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    Annex,
    Certificate,
    MedicalExam,
    Training,
    GdprConsent,
    Questionnaire,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 8] = [
        DocumentType::Contract,
        DocumentType::Annex,
        DocumentType::Certificate,
        DocumentType::MedicalExam,
        DocumentType::Training,
        DocumentType::GdprConsent,
        DocumentType::Questionnaire,
        DocumentType::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Annex => "annex",
            DocumentType::Certificate => "certificate",
            DocumentType::MedicalExam => "medical_exam",
            DocumentType::Training => "training",
            DocumentType::GdprConsent => "gdpr_consent",
            DocumentType::Questionnaire => "questionnaire",
            DocumentType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Contract => "Umowa o pracę",
            DocumentType::Annex => "Aneks do umowy",
            DocumentType::Certificate => "Świadectwo pracy",
            DocumentType::MedicalExam => "Orzeczenie lekarskie",
            DocumentType::Training => "Szkolenie BHP",
            DocumentType::GdprConsent => "Oświadczenie RODO",
            DocumentType::Questionnaire => "Kwestionariusz osobowy",
            DocumentType::Other => "Inny dokument",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.code() == s.trim())
            .ok_or_else(|| UnknownCode::new("document type", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code '{value}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownCode {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
