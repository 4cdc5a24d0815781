use regex::Regex;
use std::collections::HashMap;

use crate::codes::DocumentType;
use crate::config::schema::{default_suggestion_rules, SuggestionRule};

/// Suggests a document category from page text using an ordered rule table.
pub struct Suggester {
    rules: Vec<SuggestionRule>,
    /// Pre-compiled regex patterns, indexed by pattern string
    compiled_patterns: HashMap<String, Regex>,
}

impl Suggester {
    pub fn new(rules: Vec<SuggestionRule>) -> Self {
        let mut compiled_patterns = HashMap::new();
        for rule in &rules {
            if let Some(pattern) = &rule.pattern {
                if !compiled_patterns.contains_key(pattern) {
                    if let Ok(regex) = Regex::new(pattern) {
                        compiled_patterns.insert(pattern.clone(), regex);
                    }
                }
            }
        }

        Self {
            rules,
            compiled_patterns,
        }
    }

    /// Returns the category of the first rule matching `text`.
    /// Keywords are compared against the lowercased text.
    pub fn suggest(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| self.matches(rule, text, &lowered))
            .map(|rule| rule.category.clone())
    }

    fn matches(&self, rule: &SuggestionRule, text: &str, lowered: &str) -> bool {
        if let Some(keyword) = &rule.keyword {
            return lowered.contains(&keyword.to_lowercase());
        }

        if let Some(pattern) = &rule.pattern {
            if let Some(regex) = self.compiled_patterns.get(pattern) {
                return regex.is_match(text);
            }
        }

        false
    }

    pub fn rules(&self) -> &[SuggestionRule] {
        &self.rules
    }
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(default_suggestion_rules())
    }
}

/// Fragments of a category label that identify a document type. Checked in order.
const TYPE_HINTS: &[(&str, DocumentType)] = &[
    ("aneks", DocumentType::Annex),
    ("umow", DocumentType::Contract),
    ("świadectw", DocumentType::Certificate),
    ("lekarsk", DocumentType::MedicalExam),
    ("badani", DocumentType::MedicalExam),
    ("bhp", DocumentType::Training),
    ("szkoleni", DocumentType::Training),
    ("rodo", DocumentType::GdprConsent),
    ("kwestionariusz", DocumentType::Questionnaire),
];

/// Infers a document type from a category label by substring match.
pub fn infer_document_type(category: &str) -> Option<DocumentType> {
    let lowered = category.to_lowercase();
    TYPE_HINTS
        .iter()
        .find(|(hint, _)| lowered.contains(hint))
        .map(|(_, doc_type)| *doc_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_contract() {
        let suggester = Suggester::default();
        assert_eq!(
            suggester.suggest("UMOWA O PRACĘ zawarta w dniu"),
            Some("Umowa o pracę".to_string())
        );
    }

    #[test]
    fn test_default_table_matches_gdpr() {
        let suggester = Suggester::default();
        assert_eq!(
            suggester.suggest("Klauzula informacyjna RODO"),
            Some("Oświadczenie RODO".to_string())
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let suggester = Suggester::new(vec![
            SuggestionRule::keyword("umowa", "first"),
            SuggestionRule::keyword("umowa", "second"),
        ]);
        assert_eq!(suggester.suggest("umowa"), Some("first".to_string()));
    }

    #[test]
    fn test_annex_takes_precedence_over_contract() {
        let suggester = Suggester::default();
        assert_eq!(
            suggester.suggest("Aneks nr 2 do umowy o pracę"),
            Some("Aneks do umowy".to_string())
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest("Lorem ipsum"), None);
    }

    #[test]
    fn test_pattern_rule() {
        let suggester = Suggester::new(vec![SuggestionRule::pattern(
            r"PIT-\d{1,2}",
            "Deklaracja podatkowa",
        )]);
        assert_eq!(
            suggester.suggest("Formularz PIT-11 za rok 2023"),
            Some("Deklaracja podatkowa".to_string())
        );
        assert_eq!(suggester.suggest("Formularz PIT"), None);
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let suggester = Suggester::new(vec![SuggestionRule::pattern("[bad", "x")]);
        assert_eq!(suggester.suggest("[bad"), None);
    }

    #[test]
    fn test_infer_document_type() {
        assert_eq!(
            infer_document_type("Umowa o pracę"),
            Some(DocumentType::Contract)
        );
        assert_eq!(
            infer_document_type("Oświadczenie RODO"),
            Some(DocumentType::GdprConsent)
        );
        assert_eq!(
            infer_document_type("Aneks do umowy"),
            Some(DocumentType::Annex)
        );
        assert_eq!(infer_document_type("Notatka"), None);
    }
}
