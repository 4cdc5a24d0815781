//! Final review: summary, attestations and commit status.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codes::LegalSection;
use crate::document::{DocumentRange, UploadedFile};
use crate::employee::Employee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationKind {
    DataVerified,
    LegalCompliance,
    SignatureConsent,
}

impl AttestationKind {
    pub const ALL: [AttestationKind; 3] = [
        AttestationKind::DataVerified,
        AttestationKind::LegalCompliance,
        AttestationKind::SignatureConsent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AttestationKind::DataVerified => "Potwierdzam poprawność danych",
            AttestationKind::LegalCompliance => "Dokumenty zgodne z przepisami prawa pracy",
            AttestationKind::SignatureConsent => "Wyrażam zgodę na podpis elektroniczny",
        }
    }
}

/// The checkboxes that must all be ticked before committing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestations {
    pub data_verified: bool,
    pub legal_compliance: bool,
    pub signature_consent: bool,
}

impl Attestations {
    pub fn set(&mut self, kind: AttestationKind, value: bool) {
        match kind {
            AttestationKind::DataVerified => self.data_verified = value,
            AttestationKind::LegalCompliance => self.legal_compliance = value,
            AttestationKind::SignatureConsent => self.signature_consent = value,
        }
    }

    pub fn get(&self, kind: AttestationKind) -> bool {
        match kind {
            AttestationKind::DataVerified => self.data_verified,
            AttestationKind::LegalCompliance => self.legal_compliance,
            AttestationKind::SignatureConsent => self.signature_consent,
        }
    }

    pub fn all_given(&self) -> bool {
        self.data_verified && self.legal_compliance && self.signature_consent
    }
}

/// Read-only aggregate shown on the preview step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub employee_name: Option<String>,
    pub file_count: usize,
    pub range_count: usize,
    /// Sum of range page counts; pages shared by overlapping ranges count
    /// once per range.
    pub total_pages: u32,
    pub by_section: BTreeMap<LegalSection, usize>,
    pub unsectioned: usize,
}

impl Summary {
    pub fn compute(
        employee: Option<&Employee>,
        files: &[UploadedFile],
        ranges: &[DocumentRange],
    ) -> Self {
        let mut by_section = BTreeMap::new();
        let mut unsectioned = 0;
        for range in ranges {
            match range.section {
                Some(section) => *by_section.entry(section).or_insert(0) += 1,
                None => unsectioned += 1,
            }
        }

        Self {
            employee_name: employee.map(|e| e.name.clone()),
            file_count: files.len(),
            range_count: ranges.len(),
            total_pages: ranges.iter().map(DocumentRange::page_count).sum(),
            by_section,
            unsectioned,
        }
    }
}

/// Returned by the archive once a batch is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReceipt {
    pub batch_id: String,
    pub employee_id: String,
    pub document_count: usize,
    pub total_pages: u32,
    pub committed_at: DateTime<Utc>,
    /// Where the batch ended up, when the archive has a notion of location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CommitStatus {
    #[default]
    Idle,
    Committing,
    Succeeded { receipt: CommitReceipt },
    /// The last attempt failed; committing again is allowed.
    Failed { error: String },
}

impl CommitStatus {
    pub fn is_committing(&self) -> bool {
        matches!(self, CommitStatus::Committing)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, CommitStatus::Succeeded { .. })
    }

    pub fn receipt(&self) -> Option<&CommitReceipt> {
        match self {
            CommitStatus::Succeeded { receipt } => Some(receipt),
            _ => None,
        }
    }
}
