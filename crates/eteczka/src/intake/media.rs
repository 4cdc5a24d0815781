//! Media type screening for incoming files.

use serde::Serialize;
use thiserror::Error;

/// Why an incoming file was not queued.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("unsupported media type '{media_type}'")]
    UnsupportedMediaType { media_type: String },

    #[error("media type could not be determined")]
    UnknownMediaType,

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone)]
pub struct MediaFilter {
    accepted: Vec<String>,
    max_size: Option<u64>,
}

impl MediaFilter {
    pub fn new(accepted: &[String], max_size: Option<u64>) -> Self {
        Self {
            accepted: accepted.iter().map(|m| m.trim().to_ascii_lowercase()).collect(),
            max_size,
        }
    }

    /// The declared media type, or one guessed from the file name when none
    /// was declared. Parameters such as `; charset=` are dropped.
    pub fn resolve_media_type(name: &str, declared: Option<&str>) -> Option<String> {
        let declared = declared
            .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty());

        declared.or_else(|| mime_guess::from_path(name).first().map(|m| m.to_string()))
    }

    /// Returns the resolved media type when the file may be queued.
    pub fn check(
        &self,
        name: &str,
        declared: Option<&str>,
        size: u64,
    ) -> Result<String, RejectReason> {
        let media_type =
            Self::resolve_media_type(name, declared).ok_or(RejectReason::UnknownMediaType)?;

        if !self.accepts(&media_type) {
            return Err(RejectReason::UnsupportedMediaType { media_type });
        }

        if let Some(limit) = self.max_size {
            if size > limit {
                return Err(RejectReason::TooLarge { size, limit });
            }
        }

        Ok(media_type)
    }

    pub fn accepts(&self, media_type: &str) -> bool {
        self.accepted
            .iter()
            .any(|pattern| media_type_matches(pattern, media_type))
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new(&["application/pdf".to_string(), "image/*".to_string()], None)
    }
}

fn media_type_matches(pattern: &str, media_type: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(top_level) => media_type
            .split_once('/')
            .is_some_and(|(top, sub)| top == top_level && !sub.is_empty()),
        None => pattern == media_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf_and_images() {
        let filter = MediaFilter::default();
        assert!(filter.accepts("application/pdf"));
        assert!(filter.accepts("image/png"));
        assert!(filter.accepts("image/jpeg"));
        assert!(!filter.accepts("text/plain"));
        assert!(!filter.accepts("image/"));
    }

    #[test]
    fn test_declared_type_wins_over_extension() {
        assert_eq!(
            MediaFilter::resolve_media_type("scan.pdf", Some("image/png")),
            Some("image/png".to_string())
        );
    }

    #[test]
    fn test_declared_type_parameters_dropped() {
        assert_eq!(
            MediaFilter::resolve_media_type("notes", Some("Text/Plain; charset=utf-8")),
            Some("text/plain".to_string())
        );
    }

    #[test]
    fn test_guesses_from_extension() {
        assert_eq!(
            MediaFilter::resolve_media_type("umowa.pdf", None),
            Some("application/pdf".to_string())
        );
        assert_eq!(MediaFilter::resolve_media_type("noextension", None), None);
    }

    #[test]
    fn test_check_rejects_text_file() {
        let filter = MediaFilter::default();
        let result = filter.check("notes.txt", Some("text/plain"), 10);
        assert_eq!(
            result,
            Err(RejectReason::UnsupportedMediaType {
                media_type: "text/plain".to_string()
            })
        );
    }

    #[test]
    fn test_check_size_limit_only() {
        let filter = MediaFilter::new(&["application/pdf".to_string()], Some(100));
        assert_eq!(
            filter.check("a.pdf", Some("application/pdf"), 0),
            Ok("application/pdf".to_string())
        );
        assert_eq!(
            filter.check("a.pdf", None, 101),
            Err(RejectReason::TooLarge {
                size: 101,
                limit: 100
            })
        );
        assert_eq!(
            filter.check("a.pdf", None, 100),
            Ok("application/pdf".to_string())
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let filter = MediaFilter::default();
        assert_eq!(
            filter.check("blob", None, 5),
            Err(RejectReason::UnknownMediaType)
        );
    }
}
