//! Helpers for sanitizing data before it enters tracing span attributes.
//!
//! Personnel files carry personal data; these functions keep names and
//! full paths out of logs while still allowing correlation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Reduces a person's name to initials.
///
/// - `Jan Kowalski` → `J.K.`
/// - `Anna Maria Nowak-Zielińska` → `A.M.N.`
pub fn redact_name(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase().chain(std::iter::once('.')))
        .collect();

    if initials.is_empty() {
        "<anonymous>".to_string()
    } else {
        initials
    }
}

/// Returns a short deterministic hash of a value for correlation without
/// exposing the value itself.
pub fn hash_value(value: &str) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    let hash = hasher.finish();
    format!("{:016x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_path_returns_filename() {
        assert_eq!(
            redact_path(Path::new("/home/kadry/skany/umowa_kowalski.pdf")),
            "umowa_kowalski.pdf"
        );
    }

    #[test]
    fn test_redact_path_no_filename() {
        assert_eq!(redact_path(Path::new("/")), "<unknown>");
    }

    #[test]
    fn test_redact_name_initials() {
        assert_eq!(redact_name("Jan Kowalski"), "J.K.");
        assert_eq!(redact_name("anna maria nowak"), "A.M.N.");
        assert_eq!(redact_name("Łukasz Żak"), "Ł.Ż.");
    }

    #[test]
    fn test_redact_empty_name() {
        assert_eq!(redact_name("   "), "<anonymous>");
    }

    #[test]
    fn test_hash_value_deterministic() {
        let h1 = hash_value("EMP001");
        let h2 = hash_value("EMP001");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 16);
        assert_ne!(h1, hash_value("EMP002"));
    }
}
