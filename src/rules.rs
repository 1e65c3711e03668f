//! Heuristic keyword and pattern tables.
//!
//! All language-specific knowledge used by the engine lives here as
//! immutable data injected into the passes: page-number and QCM patterns,
//! French connector words, label keywords, and the bullet glyph tables.
//! Extending the engine to another locale or corpus means building a
//! different `HeuristicRules`, not touching control flow.

use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Primary bullet glyph as it appears in extractor output (Symbol font).
const SYMBOL_BULLET: char = '\u{F0B7}';
/// Secondary square bullet glyph (Wingdings).
const SQUARE_BULLET: char = '\u{F0A7}';
/// Canonical prefix for normalized sub-bullets.
pub(crate) const SUB_BULLET_PREFIX: &str = "  - ";

/// Heuristic rule tables shared by every pass of the engine.
pub struct HeuristicRules {
    page_number: Regex,
    qcm_question: Regex,
    qcm_answer: Regex,
    sub_bullet_letter: Regex,
    sub_bullet_glyph: Regex,
    /// Connector words and elisions that signal a wrapped continuation line.
    connector_prefixes: Vec<&'static str>,
    /// Accent-folded keywords recognized as standalone labels.
    label_keywords: HashSet<&'static str>,
    /// Lowercase articles allowed inside a Title-Case label.
    label_articles: Vec<&'static str>,
    /// Marker phrases that trigger the label-split stage, with compiled patterns.
    label_markers: Vec<(String, Regex)>,
}

impl HeuristicRules {
    /// Build the default rule set (French/English course material).
    pub fn new() -> Self {
        let markers = vec!["En France".to_string()];
        Self {
            page_number: Regex::new(r"(?i)^(page\s*)?\d+(\s*(/|of)\s*\d+)?$")
                .expect("page number pattern"),
            qcm_question: Regex::new(r"(?i)^question\s+\d+").expect("qcm question pattern"),
            qcm_answer: Regex::new(r"(?i)^r[eé]ponses?\s*:?").expect("qcm answer pattern"),
            sub_bullet_letter: Regex::new(r"^[oO]\s+(.+)$").expect("sub-bullet pattern"),
            sub_bullet_glyph: Regex::new(r"^[\u{F0A7}\u{F0B7}]\s+(.+)$")
                .expect("sub-bullet glyph pattern"),
            connector_prefixes: vec![
                "d'", "d’", "l'", "l’", "de ", "du ", "des ", "et ", "ou ", "au ", "aux ", "a ",
                "à ", "en ", "par ", "pour ", "avec ", "sans ", "sur ", "sous ", "chez ", "dont ",
                "qui ", "que ", "où ",
            ],
            label_keywords: [
                "conclusion",
                "definition",
                "bilan",
                "graphique",
                "resume",
                "synthese",
                "objectif",
                "objectifs",
                "remarque",
                "remarques",
                "attention",
                "note",
                "notes",
            ]
            .into_iter()
            .collect(),
            label_articles: vec!["de", "du", "des", "la", "le", "les"],
            label_markers: Self::compile_markers(markers),
        }
    }

    /// Replace the label-split marker phrases.
    pub fn with_label_markers(mut self, markers: Vec<String>) -> Self {
        self.label_markers = Self::compile_markers(markers);
        self
    }

    fn compile_markers(markers: Vec<String>) -> Vec<(String, Regex)> {
        markers
            .into_iter()
            .map(|m| {
                let pattern = format!(r"\b{}\b", regex::escape(&m));
                let re = Regex::new(&pattern).expect("escaped marker pattern");
                (m, re)
            })
            .collect()
    }

    /// Check whether a line is a bare page number ("3", "Page 3", "3 / 12", "3 of 12").
    pub fn is_page_number(&self, text: &str) -> bool {
        self.page_number.is_match(text)
    }

    /// Check whether a line opens QCM content (question or answer key).
    pub fn is_qcm_line(&self, text: &str) -> bool {
        !text.is_empty() && (self.qcm_question.is_match(text) || self.qcm_answer.is_match(text))
    }

    /// Check whether a line starts a new bullet item.
    pub fn is_new_bullet(&self, text: &str) -> bool {
        let t = text.trim_start();
        if t.is_empty() {
            return false;
        }
        if t.starts_with('•')
            || t.starts_with('–')
            || t.starts_with('—')
            || t.starts_with("- ")
            || t.starts_with(SYMBOL_BULLET)
            || t.starts_with(SQUARE_BULLET)
        {
            return true;
        }
        // "o " / "O " used as a secondary bullet by some producers
        let mut chars = t.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some('o') | Some('O'), Some(c)) if c.is_whitespace()
        )
    }

    /// Canonical prefix for a block whose entire text is a lone bullet glyph.
    pub fn bullet_only_prefix(&self, text: &str) -> Option<&'static str> {
        let mut chars = text.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c {
            '•' | SYMBOL_BULLET => Some("• "),
            '-' => Some("- "),
            'o' | 'O' | SQUARE_BULLET => Some(SUB_BULLET_PREFIX),
            _ => None,
        }
    }

    /// Rewrite target for a secondary-bullet line ("o text", square-glyph text).
    ///
    /// Returns the text following the marker when the line matches.
    pub fn sub_bullet_rest<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self
            .sub_bullet_letter
            .captures(text)
            .or_else(|| self.sub_bullet_glyph.captures(text))?;
        caps.get(1).map(|m| m.as_str())
    }

    /// Check whether a line reads as the continuation of a wrapped sentence.
    ///
    /// True for recognized French connectors/elisions or when the first
    /// alphabetic character is lowercase. A leading digit is treated as a
    /// fresh line (enumerations, dates).
    pub fn starts_with_lower_or_continuation(&self, text: &str) -> bool {
        let t = text.trim_start();
        if t.is_empty() {
            return false;
        }
        let lower = t.to_lowercase();
        if self
            .connector_prefixes
            .iter()
            .any(|p| lower.starts_with(p))
        {
            return true;
        }
        for ch in t.chars() {
            if ch.is_alphabetic() {
                return ch.is_lowercase();
            }
            if ch.is_ascii_digit() {
                return false;
            }
        }
        false
    }

    /// Check whether `label` is a short Title-Case label (1-3 words, <=24 chars).
    ///
    /// Lowercase French articles and d'/l' elisions are allowed after the
    /// first word.
    pub fn is_title_case_label(&self, label: &str) -> bool {
        let words: Vec<&str> = label.split_whitespace().collect();
        if words.is_empty() || words.len() > 3 {
            return false;
        }
        if label.chars().count() > 24 {
            return false;
        }
        let first = words[0];
        if !first.chars().next().is_some_and(|c| c.is_uppercase()) {
            return false;
        }
        for w in &words[1..] {
            let lw = w.to_lowercase();
            if self.label_articles.contains(&lw.as_str()) {
                continue;
            }
            if w.contains('\'') || w.contains('’') {
                let head = w
                    .split(['\'', '’'])
                    .next()
                    .unwrap_or("")
                    .to_lowercase();
                if head == "d" || head == "l" {
                    continue;
                }
            }
            if w.chars().next().is_some_and(|c| c.is_uppercase()) {
                continue;
            }
            return false;
        }
        true
    }

    /// Accent-fold and case-fold a label for keyword lookup.
    pub fn normalize_label_key(&self, text: &str) -> String {
        text.trim()
            .to_lowercase()
            .replace('’', "'")
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect()
    }

    /// Check whether a block reads as a labeled callout ("Définition:", "Bilan").
    pub fn is_label_line(&self, text: &str) -> bool {
        let t = text.trim();
        if t.is_empty() {
            return false;
        }
        let key = self.normalize_label_key(t);
        if self.label_keywords.contains(key.trim_end_matches(':')) {
            return true;
        }
        t.ends_with(':') && t.chars().count() <= 80
    }

    /// Check whether a block reads as a short inline title.
    pub fn is_title_line(&self, text: &str) -> bool {
        let t = text.trim();
        if t.is_empty() || t.chars().count() > 60 {
            return false;
        }
        if ends_with_terminal_punct(t) {
            return false;
        }
        self.is_title_case_label(t)
    }

    /// Find the earliest label-split marker in `text`.
    ///
    /// Returns the byte offset where the marker starts.
    pub fn find_label_marker(&self, text: &str) -> Option<usize> {
        self.label_markers
            .iter()
            .filter_map(|(_, re)| re.find(text).map(|m| m.start()))
            .min()
    }
}

impl Default for HeuristicRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a line ends in sentence-terminal punctuation.
pub(crate) fn ends_with_terminal_punct(text: &str) -> bool {
    matches!(
        text.chars().last(),
        Some('.') | Some(':') | Some(';') | Some('!') | Some('?') | Some('…')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_pattern() {
        let rules = HeuristicRules::new();
        assert!(rules.is_page_number("3"));
        assert!(rules.is_page_number("Page 3"));
        assert!(rules.is_page_number("page3"));
        assert!(rules.is_page_number("3 / 12"));
        assert!(rules.is_page_number("3 of 12"));
        assert!(!rules.is_page_number("Chapitre 3"));
        assert!(!rules.is_page_number("3 pommes"));
    }

    #[test]
    fn test_qcm_patterns() {
        let rules = HeuristicRules::new();
        assert!(rules.is_qcm_line("Question 1: Quelle cause ?"));
        assert!(rules.is_qcm_line("question 12"));
        assert!(rules.is_qcm_line("Réponse: A"));
        assert!(rules.is_qcm_line("Réponses"));
        assert!(rules.is_qcm_line("reponse : B"));
        assert!(!rules.is_qcm_line("Questionnaire"));
        assert!(!rules.is_qcm_line("La réponse est simple."));
    }

    #[test]
    fn test_new_bullet_detection() {
        let rules = HeuristicRules::new();
        assert!(rules.is_new_bullet("• premier point"));
        assert!(rules.is_new_bullet("- tiret"));
        assert!(rules.is_new_bullet("– tiret demi-cadratin"));
        assert!(rules.is_new_bullet("o secondaire"));
        assert!(rules.is_new_bullet("  \u{F0B7} glyphe"));
        assert!(!rules.is_new_bullet("ordinaire"));
        assert!(!rules.is_new_bullet("-trait-d'union interne"));
        assert!(!rules.is_new_bullet(""));
    }

    #[test]
    fn test_bullet_only_prefix() {
        let rules = HeuristicRules::new();
        assert_eq!(rules.bullet_only_prefix("•"), Some("• "));
        assert_eq!(rules.bullet_only_prefix("-"), Some("- "));
        assert_eq!(rules.bullet_only_prefix("o"), Some(SUB_BULLET_PREFIX));
        assert_eq!(rules.bullet_only_prefix("\u{F0B7}"), Some("• "));
        assert_eq!(rules.bullet_only_prefix("\u{F0A7}"), Some(SUB_BULLET_PREFIX));
        assert_eq!(rules.bullet_only_prefix("texte"), None);
    }

    #[test]
    fn test_sub_bullet_rest() {
        let rules = HeuristicRules::new();
        assert_eq!(rules.sub_bullet_rest("o point secondaire"), Some("point secondaire"));
        assert_eq!(rules.sub_bullet_rest("\u{F0A7} carré"), Some("carré"));
        assert_eq!(rules.sub_bullet_rest("ordinaire"), None);
        assert_eq!(rules.sub_bullet_rest("o"), None);
    }

    #[test]
    fn test_continuation_detection() {
        let rules = HeuristicRules::new();
        assert!(rules.starts_with_lower_or_continuation("une hausse significative."));
        assert!(rules.starts_with_lower_or_continuation("de la population"));
        assert!(rules.starts_with_lower_or_continuation("d'abord"));
        assert!(rules.starts_with_lower_or_continuation("À suivre")); // "à " connector, case-folded
        assert!(!rules.starts_with_lower_or_continuation("Nouvelle phrase"));
        assert!(!rules.starts_with_lower_or_continuation("2024 était"));
        assert!(!rules.starts_with_lower_or_continuation(""));
    }

    #[test]
    fn test_title_case_label() {
        let rules = HeuristicRules::new();
        assert!(rules.is_title_case_label("Définition"));
        assert!(rules.is_title_case_label("Bilan du Chapitre"));
        assert!(rules.is_title_case_label("L'Essentiel du Cours"));
        assert!(!rules.is_title_case_label("définition"));
        // Four words exceed the label limit.
        assert!(!rules.is_title_case_label("Bilan de la Semaine"));
        assert!(!rules.is_title_case_label("Une phrase bien trop longue ici"));
        assert!(!rules.is_title_case_label("Bilan des choses vues"));
        assert!(!rules.is_title_case_label(""));
    }

    #[test]
    fn test_label_key_folding() {
        let rules = HeuristicRules::new();
        assert_eq!(rules.normalize_label_key("Définition"), "definition");
        assert_eq!(rules.normalize_label_key("SYNTHÈSE"), "synthese");
        assert_eq!(rules.normalize_label_key("  Résumé  "), "resume");
    }

    #[test]
    fn test_label_line() {
        let rules = HeuristicRules::new();
        assert!(rules.is_label_line("Définition"));
        assert!(rules.is_label_line("Conclusion:"));
        assert!(rules.is_label_line("Points à retenir:"));
        assert!(!rules.is_label_line("Une phrase complète."));
        assert!(!rules.is_label_line(""));
    }

    #[test]
    fn test_title_line() {
        let rules = HeuristicRules::new();
        assert!(rules.is_title_line("Le Climat"));
        assert!(!rules.is_title_line("Le climat change vite."));
        assert!(!rules.is_title_line("Fin."));
    }

    #[test]
    fn test_label_marker() {
        let rules = HeuristicRules::new();
        let text = "Définition En France, la population augmente.";
        let offset = rules.find_label_marker(text).unwrap();
        assert_eq!(&text[offset..offset + 9], "En France");
        assert!(rules.find_label_marker("Rien à signaler.").is_none());

        let rules = HeuristicRules::new().with_label_markers(vec!["Au Canada".to_string()]);
        assert!(rules.find_label_marker(text).is_none());
        assert!(rules.find_label_marker("Note Au Canada aussi.").is_some());
    }

    #[test]
    fn test_terminal_punct() {
        assert!(ends_with_terminal_punct("Fin."));
        assert!(ends_with_terminal_punct("Quoi ?"));
        assert!(ends_with_terminal_punct("Suite…"));
        assert!(!ends_with_terminal_punct("Sans ponctuation"));
        assert!(!ends_with_terminal_punct(""));
    }
}
