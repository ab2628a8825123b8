//! # Content Moderation
//!
//! The validation pipeline every free-text submission runs through before
//! anything is persisted: length checks and profanity screening against an
//! injected vocabulary. Pure functions over the input and the validator's
//! own word list: no I/O, no globals, so tests can substitute vocabularies.

use std::collections::HashSet;

/// Character used to mask disallowed tokens, one per masked character.
const MASK_CHAR: char = '*';

/// French vocabulary screened in addition to the English baseline.
const FRENCH_WORDS: &[&str] = &[
    "merde", "putain", "connard", "salope", "enculé", "con", "pute",
    "bite", "couille", "chier", "bordel", "cul", "pd", "fdp",
    "batard", "salaud", "connasse", "enfoiré", "crétin", "débile",
    "abruti", "idiot", "imbécile", "taré", "nul", "pourri",
];

/// English baseline, in the spirit of the `bad-words` default list.
const ENGLISH_WORDS: &[&str] = &[
    "fuck", "shit", "bitch", "asshole", "bastard", "dick", "cunt",
    "piss", "crap", "whore", "slut", "prick", "wanker", "douche",
    "dumbass", "jackass", "motherfucker", "bullshit",
];

/// Constraints applied to one piece of text.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    pub min_length: usize,
    pub max_length: usize,
    pub allow_profanity: bool,
}

impl ValidationOptions {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
            allow_profanity: false,
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::new(1, 1000)
    }
}

/// Outcome of validating one piece of text.
///
/// `cleaned_content` is the profanity-masked text when profanity caused the
/// rejection, and the original text in every other case. Callers may show
/// it as a preview even for rejected submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub message: String,
    pub cleaned_content: String,
}

/// Screens text against length constraints and a fixed moderation
/// vocabulary. The vocabulary is immutable once constructed.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    words: HashSet<String>,
}

impl Default for ContentValidator {
    /// Validator with the built-in French + English vocabulary.
    fn default() -> Self {
        Self::new(FRENCH_WORDS.iter().chain(ENGLISH_WORDS.iter()))
    }
}

impl ContentValidator {
    /// Builds a validator over the given word list. Words are matched
    /// case-insensitively and after leet-speak normalization.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Validates `text` against `options`.
    ///
    /// Checks run in a fixed order: minimum length (on the *trimmed* text),
    /// maximum length (on the *untrimmed* text), then profanity. The trim
    /// asymmetry between the two length checks is intentional; existing
    /// clients depend on it.
    pub fn validate(&self, text: &str, options: &ValidationOptions) -> ValidationReport {
        if text.trim().chars().count() < options.min_length {
            return ValidationReport {
                is_valid: false,
                message: format!(
                    "Le contenu doit contenir au moins {} caractère(s)",
                    options.min_length
                ),
                cleaned_content: text.to_owned(),
            };
        }

        if text.chars().count() > options.max_length {
            return ValidationReport {
                is_valid: false,
                message: format!(
                    "Le contenu ne peut pas dépasser {} caractères",
                    options.max_length
                ),
                cleaned_content: text.to_owned(),
            };
        }

        if !options.allow_profanity && self.is_profane(text) {
            return ValidationReport {
                is_valid: false,
                message: "Le contenu contient des mots inappropriés. \
                          Veuillez reformuler votre message de manière respectueuse."
                    .to_owned(),
                cleaned_content: self.redact(text),
            };
        }

        ValidationReport {
            is_valid: true,
            message: "Contenu valide".to_owned(),
            cleaned_content: text.to_owned(),
        }
    }

    /// True when `text` contains at least one listed word, matched as a
    /// whole token (standalone or with punctuation attached), never as a
    /// fragment of a longer word.
    pub fn is_profane(&self, text: &str) -> bool {
        !self.find_hits(text).is_empty()
    }

    /// Replaces every matched token with mask characters of equal length,
    /// leaving all surrounding text untouched. Used both for rejected
    /// submissions and for the standalone preview operation.
    pub fn redact(&self, text: &str) -> String {
        let hits = self.find_hits(text);
        if hits.is_empty() {
            return text.to_owned();
        }

        let mut chars: Vec<char> = text.chars().collect();
        for (start, end) in hits {
            for c in &mut chars[start..end] {
                *c = MASK_CHAR;
            }
        }
        chars.into_iter().collect()
    }

    /// Char spans (start inclusive, end exclusive) of matched tokens.
    ///
    /// Tokens are whitespace-separated runs with leading/trailing
    /// punctuation stripped. Each token core is checked lowercased, then
    /// again after leet-speak folding, so `sh1t` and `m3rde` still match
    /// while `conversation` never trips on its `con` prefix.
    fn find_hits(&self, text: &str) -> Vec<(usize, usize)> {
        let chars: Vec<char> = text.chars().collect();
        let mut hits = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }

            let token_start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            let token_end = i;

            // Strip punctuation fringe so "merde!" or "(con)" still match.
            let mut core_start = token_start;
            let mut core_end = token_end;
            while core_start < core_end && !chars[core_start].is_alphanumeric() {
                core_start += 1;
            }
            while core_end > core_start && !chars[core_end - 1].is_alphanumeric() {
                core_end -= 1;
            }
            if core_start == core_end {
                continue;
            }

            let core: String = chars[core_start..core_end]
                .iter()
                .collect::<String>()
                .to_lowercase();
            if self.words.contains(&core) || self.words.contains(&fold_leet(&core)) {
                hits.push((core_start, core_end));
                continue;
            }

            // Leet substitutions can sit on the token fringe ("$lut"),
            // where the punctuation strip above would hide them. Retry on
            // the whole token.
            let token: String = chars[token_start..token_end]
                .iter()
                .collect::<String>()
                .to_lowercase();
            if self.words.contains(&fold_leet(&token)) {
                hits.push((token_start, token_end));
            }
        }

        hits
    }
}

/// Folds common leet-speak substitutions back to letters.
fn fold_leet(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '@' | '4' => 'a',
            '0' => 'o',
            '1' | '!' => 'i',
            '3' => 'e',
            '5' | '$' => 's',
            '7' => 't',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ContentValidator {
        ContentValidator::default()
    }

    #[test]
    fn clean_text_passes_unchanged() {
        let report = validator().validate(
            "Une idée parfaitement correcte",
            &ValidationOptions::default(),
        );
        assert!(report.is_valid);
        assert_eq!(report.message, "Contenu valide");
        assert_eq!(report.cleaned_content, "Une idée parfaitement correcte");
    }

    #[test]
    fn empty_text_fails_minimum() {
        let report = validator().validate("", &ValidationOptions::default());
        assert!(!report.is_valid);
        assert!(report.message.contains("au moins 1"));
    }

    #[test]
    fn whitespace_only_fails_minimum() {
        // The minimum check trims; three spaces count as zero characters.
        let report = validator().validate("   ", &ValidationOptions::new(1, 100));
        assert!(!report.is_valid);
    }

    #[test]
    fn maximum_is_untrimmed() {
        // 499 chars + 2 surrounding spaces = 501 raw chars. The maximum
        // check does not trim, so this is over the limit even though the
        // trimmed text is not.
        let inner = "a".repeat(499);
        let padded = format!(" {inner} ");
        let report = validator().validate(&padded, &ValidationOptions::new(1, 500));
        assert!(!report.is_valid);
        assert!(report.message.contains("500"));
    }

    #[test]
    fn maximum_boundary() {
        let opts = ValidationOptions::new(1, 500);
        assert!(validator().validate(&"a".repeat(500), &opts).is_valid);
        assert!(!validator().validate(&"a".repeat(501), &opts).is_valid);
    }

    #[test]
    fn length_failure_returns_original_content() {
        let report = validator().validate("", &ValidationOptions::default());
        assert_eq!(report.cleaned_content, "");
    }

    #[test]
    fn profanity_rejected_and_masked() {
        let report = validator().validate(
            "quelle merde ce projet",
            &ValidationOptions::default(),
        );
        assert!(!report.is_valid);
        assert!(report.message.contains("respectueuse"));
        assert_eq!(report.cleaned_content, "quelle ***** ce projet");
    }

    #[test]
    fn profanity_allowed_when_flag_set() {
        let opts = ValidationOptions {
            allow_profanity: true,
            ..ValidationOptions::default()
        };
        let report = validator().validate("quelle merde", &opts);
        assert!(report.is_valid);
        assert_eq!(report.cleaned_content, "quelle merde");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(validator().is_profane("MERDE"));
        assert!(validator().is_profane("Shit happens"));
    }

    #[test]
    fn punctuation_attached_still_matches() {
        assert!(validator().is_profane("merde!"));
        assert!(validator().is_profane("(con)"));
        let masked = validator().redact("merde!");
        assert_eq!(masked, "*****!");
    }

    #[test]
    fn banned_prefix_of_longer_word_is_not_flagged() {
        // "con" is listed; "conversation" and "concours" are innocent.
        assert!(!validator().is_profane("une conversation sur le concours"));
        assert!(!validator().is_profane("culture et culinaire"));
    }

    #[test]
    fn leet_variants_match() {
        assert!(validator().is_profane("sh1t"));
        assert!(validator().is_profane("m3rde"));
        assert!(validator().is_profane("$lut"));
        assert_eq!(validator().redact("oh sh1t"), "oh ****");
    }

    #[test]
    fn vocabulary_is_injectable() {
        let custom = ContentValidator::new(["banane"]);
        assert!(custom.is_profane("pas de banane ici"));
        // The built-in list does not apply to a custom validator.
        assert!(!custom.is_profane("merde"));
    }

    #[test]
    fn redact_is_a_noop_on_clean_text() {
        assert_eq!(validator().redact("tout va bien"), "tout va bien");
    }

    #[test]
    fn mask_length_matches_token_length() {
        let masked = validator().redact("putain de bordel");
        assert_eq!(masked, "****** de ******");
    }
}
