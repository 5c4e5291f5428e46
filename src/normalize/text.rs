use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::normalize::config::CleanerError;

/// Raw capacity values that mean "unknown"
const MISSING_CAPACITY: [&str; 3] = ["", "n/a", "na"];

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"[-+]?\d*\.?\d+").expect("number pattern is valid"))
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Compiled drop and substitution rules for one text field
///
/// Drops are removed first, in order, then substitutions are applied in
/// order. All patterns match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TextRules {
    drops: Vec<Regex>,
    substitutions: Vec<(Regex, String)>,
}

impl TextRules {
    /// Rules that only lowercase, strip diacritics and collapse whitespace
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile drop patterns and `(pattern, replacement)` substitutions.
    ///
    /// Replacements use the `regex` crate syntax (`$1`, `${name}`).
    ///
    /// # Errors
    ///
    /// Returns `CleanerError::InvalidPattern` for the first pattern that
    /// does not compile.
    pub fn compile(
        drops: &[String],
        substitutions: &[(String, String)],
    ) -> Result<Self, CleanerError> {
        let drops = drops
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>, _>>()?;
        let substitutions = substitutions
            .iter()
            .map(|(p, r)| compile_pattern(p).map(|re| (re, r.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            drops,
            substitutions,
        })
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.drops.len() + self.substitutions.len()
    }

    /// Clean one value; `None` stays `None`.
    #[must_use]
    pub fn clean(&self, text: Option<&str>) -> Option<String> {
        clean_text(text, self)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, CleanerError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CleanerError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Canonicalize a free-text value.
///
/// Steps, in order: lowercase and trim, remove diacritics (NFD, then drop
/// combining marks), apply drop patterns, apply substitutions, collapse
/// runs of whitespace and trim.
///
/// # Examples
///
/// ```
/// use plant_recon::normalize::text::{clean_text, TextRules};
///
/// let rules = TextRules::none();
/// assert_eq!(clean_text(Some("  Nhơn  Trạch 2 "), &rules).as_deref(), Some("nhon trach 2"));
/// assert_eq!(clean_text(None, &rules), None);
/// ```
#[must_use]
pub fn clean_text(text: Option<&str>, rules: &TextRules) -> Option<String> {
    let text = text?;

    let lowered = text.to_lowercase();
    let mut s: String = lowered
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    for pattern in &rules.drops {
        let next = pattern.replace_all(&s, "").into_owned();
        tracing::trace!(pattern = pattern.as_str(), before = %s, after = %next, "drop");
        s = next;
    }

    for (pattern, replacement) in &rules.substitutions {
        let next = pattern.replace_all(&s, replacement.as_str()).into_owned();
        tracing::trace!(pattern = pattern.as_str(), before = %s, after = %next, "substitute");
        s = next;
    }

    Some(whitespace_regex().replace_all(&s, " ").trim().to_string())
}

/// Sort the tokens of a `/`-separated multi-value field.
///
/// `"gas/coal"` and `"coal/gas"` both become `"coal/gas"`. Values without a
/// separator are returned unchanged.
#[must_use]
pub fn sort_slash_tokens(value: &str) -> String {
    if !value.contains('/') {
        return value.to_string();
    }
    let mut tokens: Vec<&str> = value.split('/').map(str::trim).collect();
    tokens.sort_unstable();
    tokens.join("/")
}

/// Extract a capacity in MW from a noisy raw value.
///
/// Returns `None` for a missing value, for `""`, `"n/a"` and `"na"`, and
/// when the text holds no number. Otherwise returns the first decimal number
/// found anywhere in the value (`"approx. 1200 MW"` gives `1200.0`).
///
/// # Examples
///
/// ```
/// use plant_recon::normalize::text::parse_capacity;
///
/// assert_eq!(parse_capacity(Some("1,200 MW")), Some(1.0));
/// assert_eq!(parse_capacity(Some("about 600.5MW")), Some(600.5));
/// assert_eq!(parse_capacity(Some("N/A")), None);
/// ```
#[must_use]
pub fn parse_capacity(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim().to_lowercase();
    if MISSING_CAPACITY.contains(&value.as_str()) {
        return None;
    }
    number_regex()
        .find(&value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
