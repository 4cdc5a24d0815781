//! Category and metadata assignment for document ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::{DocumentType, LegalSection, RetentionPeriod};
use crate::document::DocumentRange;
use crate::error::PartitionError;
use crate::suggest::infer_document_type;

/// A change to a single field of one range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum RangeUpdate {
    Title(String),
    ConfirmedCategory(Option<String>),
    DocumentType(Option<DocumentType>),
    Section(Option<LegalSection>),
    Date(Option<NaiveDate>),
    RetentionPeriod(Option<RetentionPeriod>),
    Notes(Option<String>),
}

impl RangeUpdate {
    /// Applies the update. Blank text values clear the field; a blank title
    /// is refused and leaves the range untouched.
    pub fn apply(self, range: &mut DocumentRange) -> Result<(), PartitionError> {
        match self {
            RangeUpdate::Title(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(PartitionError::EmptyTitle);
                }
                range.title = title.to_string();
            }
            RangeUpdate::ConfirmedCategory(category) => {
                range.confirmed_category = non_blank(category);
            }
            RangeUpdate::DocumentType(document_type) => range.document_type = document_type,
            RangeUpdate::Section(section) => range.section = section,
            RangeUpdate::Date(date) => range.date = date,
            RangeUpdate::RetentionPeriod(retention) => range.retention_period = retention,
            RangeUpdate::Notes(notes) => range.notes = non_blank(notes),
        }
        Ok(())
    }

    pub fn field(&self) -> &'static str {
        match self {
            RangeUpdate::Title(_) => "title",
            RangeUpdate::ConfirmedCategory(_) => "confirmed_category",
            RangeUpdate::DocumentType(_) => "document_type",
            RangeUpdate::Section(_) => "section",
            RangeUpdate::Date(_) => "date",
            RangeUpdate::RetentionPeriod(_) => "retention_period",
            RangeUpdate::Notes(_) => "notes",
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Copies the suggested category into the confirmed one and infers the
/// document type from it. Returns false when the range has no suggestion.
pub fn accept_suggestion(range: &mut DocumentRange) -> bool {
    let Some(suggested) = range.suggested_category.clone() else {
        return false;
    };

    range.document_type = infer_document_type(&suggested).or(range.document_type);
    range.confirmed_category = Some(suggested);
    true
}

/// Sets the same date and retention period on every range, replacing
/// whatever was there.
pub fn bulk_apply(ranges: &mut [DocumentRange], date: NaiveDate, retention: RetentionPeriod) {
    for range in ranges.iter_mut() {
        range.date = Some(date);
        range.retention_period = Some(retention);
    }
}

/// Count of ranges satisfying a completeness predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub complete: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_done(&self) -> bool {
        self.complete == self.total
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.complete, self.total)
    }
}

pub fn category_progress(ranges: &[DocumentRange]) -> Progress {
    Progress {
        complete: ranges.iter().filter(|r| r.is_category_complete()).count(),
        total: ranges.len(),
    }
}

pub fn metadata_progress(ranges: &[DocumentRange]) -> Progress {
    Progress {
        complete: ranges.iter().filter(|r| r.is_metadata_complete()).count(),
        total: ranges.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(title: &str) -> DocumentRange {
        DocumentRange::new(title, 1, 2, vec![])
    }

    #[test]
    fn test_update_sets_fields() {
        let mut r = range("Umowa");
        RangeUpdate::Section(Some(LegalSection::B)).apply(&mut r).unwrap();
        RangeUpdate::ConfirmedCategory(Some(" contract ".to_string()))
            .apply(&mut r)
            .unwrap();
        RangeUpdate::Notes(Some("   ".to_string())).apply(&mut r).unwrap();

        assert_eq!(r.section, Some(LegalSection::B));
        assert_eq!(r.confirmed_category.as_deref(), Some("contract"));
        assert_eq!(r.notes, None);
    }

    #[test]
    fn test_blank_title_refused() {
        let mut r = range("Umowa");
        let result = RangeUpdate::Title("  ".to_string()).apply(&mut r);
        assert_eq!(result, Err(PartitionError::EmptyTitle));
        assert_eq!(r.title, "Umowa");
    }

    #[test]
    fn test_accept_suggestion_infers_type() {
        let mut r = range("Umowa");
        r.suggested_category = Some("Umowa o pracę".to_string());

        assert!(accept_suggestion(&mut r));
        assert_eq!(r.confirmed_category.as_deref(), Some("Umowa o pracę"));
        assert_eq!(r.document_type, Some(DocumentType::Contract));
    }

    #[test]
    fn test_accept_without_suggestion_is_noop() {
        let mut r = range("Inne");
        r.document_type = Some(DocumentType::Other);
        assert!(!accept_suggestion(&mut r));
        assert_eq!(r.confirmed_category, None);
        assert_eq!(r.document_type, Some(DocumentType::Other));
    }

    #[test]
    fn test_bulk_apply_overwrites_and_is_idempotent() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut ranges = vec![range("a"), range("b")];
        ranges[0].date = NaiveDate::from_ymd_opt(2020, 5, 1);
        ranges[1].retention_period = Some(RetentionPeriod::Permanent);

        bulk_apply(&mut ranges, date, RetentionPeriod::TenYears);
        let once = ranges.clone();
        bulk_apply(&mut ranges, date, RetentionPeriod::TenYears);

        assert_eq!(ranges, once);
        assert!(ranges.iter().all(|r| r.date == Some(date)));
        assert!(ranges
            .iter()
            .all(|r| r.retention_period == Some(RetentionPeriod::TenYears)));
    }

    #[test]
    fn test_progress_counts() {
        let mut ranges = vec![range("a"), range("b"), range("c")];
        ranges[0].confirmed_category = Some("contract".to_string());
        ranges[0].section = Some(LegalSection::A);
        ranges[1].confirmed_category = Some("contract".to_string());

        let progress = category_progress(&ranges);
        assert_eq!(progress, Progress { complete: 1, total: 3 });
        assert!(!progress.is_done());
        assert_eq!(progress.to_string(), "1/3");

        assert_eq!(metadata_progress(&[]), Progress { complete: 0, total: 0 });
    }
}
