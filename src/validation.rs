//! Declarative field validation for the trial form.
//!
//! Rules run in a fixed order and stop at the first failure: required,
//! pattern, then minimum length. Fields without a rule always pass.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub message: String,
}

pub type RuleTable = HashMap<String, FieldRule>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationResult {
    pub valid: bool,
    pub error_message: Option<String>,
}

impl FieldValidationResult {
    pub fn ok() -> Self {
        Self { valid: true, error_message: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { valid: false, error_message: Some(message.into()) }
    }
}

static TRIAL_FORM_RULES: Lazy<RuleTable> = Lazy::new(|| {
    let mut rules = HashMap::new();
    rules.insert(
        "name".to_string(),
        FieldRule {
            required: true,
            min_length: Some(2),
            pattern: Some(Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex")),
            message: "Please enter a valid name (letters and spaces only)".to_string(),
        },
    );
    rules.insert(
        "email".to_string(),
        FieldRule {
            required: true,
            min_length: None,
            pattern: Some(Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")),
            message: "Please enter a valid email address".to_string(),
        },
    );
    rules.insert(
        "company".to_string(),
        FieldRule {
            required: false,
            min_length: Some(2),
            pattern: None,
            message: "Company name must be at least 2 characters".to_string(),
        },
    );
    rules
});

/// Rule table for the free-trial form, built once per process.
pub fn trial_form_rules() -> &'static RuleTable {
    &TRIAL_FORM_RULES
}

/// Upper-cases the first character only: `"name"` becomes `"Name"`.
fn display_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trims like a browser does, which also strips the byte order mark.
fn trim_input(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Lengths are UTF-16 code units, matching what the form input reports.
pub fn validate_field(field_name: &str, raw_value: &str, rules: &RuleTable) -> FieldValidationResult {
    let value = trim_input(raw_value);
    let Some(rule) = rules.get(field_name) else {
        return FieldValidationResult::ok();
    };

    if value.is_empty() {
        return if rule.required {
            FieldValidationResult::fail(format!("{} is required", display_name(field_name)))
        } else {
            FieldValidationResult::ok()
        };
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(value) {
            return FieldValidationResult::fail(rule.message.clone());
        }
    }

    if let Some(min_length) = rule.min_length {
        if value.encode_utf16().count() < min_length {
            return FieldValidationResult::fail(format!(
                "{} must be at least {} characters",
                display_name(field_name),
                min_length
            ));
        }
    }

    FieldValidationResult::ok()
}

/// Per-field outcome of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub fields: BTreeMap<String, FieldValidationResult>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|result| result.valid)
    }

    pub fn error_for(&self, field_name: &str) -> Option<&str> {
        self.fields
            .get(field_name)
            .and_then(|result| result.error_message.as_deref())
    }
}

/// Validates every present field independently.
pub fn validate_form<'a, I>(values: I, rules: &RuleTable) -> FormValidation
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let fields = values
        .into_iter()
        .map(|(name, value)| (name.to_string(), validate_field(name, value, rules)))
        .collect();
    FormValidation { fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_digits_with_the_rule_message() {
        let result = validate_field("name", "123", trial_form_rules());
        assert_eq!(
            result,
            FieldValidationResult::fail("Please enter a valid name (letters and spaces only)")
        );
    }

    #[test]
    fn name_accepts_letters_and_spaces() {
        assert_eq!(
            validate_field("name", "Ada Lovelace", trial_form_rules()),
            FieldValidationResult::ok()
        );
    }

    #[test]
    fn empty_required_field_names_the_field() {
        assert_eq!(
            validate_field("name", "", trial_form_rules()),
            FieldValidationResult::fail("Name is required")
        );
        assert_eq!(
            validate_field("email", "   ", trial_form_rules()),
            FieldValidationResult::fail("Email is required")
        );
    }

    #[test]
    fn pattern_runs_before_min_length() {
        // "1" fails both; the pattern message wins.
        assert_eq!(
            validate_field("name", "1", trial_form_rules()).error_message.as_deref(),
            Some("Please enter a valid name (letters and spaces only)")
        );
        assert_eq!(
            validate_field("name", "A", trial_form_rules()).error_message.as_deref(),
            Some("Name must be at least 2 characters")
        );
    }

    #[test]
    fn optional_empty_field_skips_remaining_rules() {
        assert!(validate_field("company", "", trial_form_rules()).valid);
        assert!(validate_field("company", "  ", trial_form_rules()).valid);
        assert_eq!(
            validate_field("company", "X", trial_form_rules()).error_message.as_deref(),
            Some("Company must be at least 2 characters")
        );
        assert!(validate_field("company", "Acme", trial_form_rules()).valid);
    }

    #[test]
    fn values_are_trimmed_before_checks() {
        assert!(validate_field("email", "  ada@example.com  ", trial_form_rules()).valid);
        assert!(!validate_field("email", "ada@example", trial_form_rules()).valid);
        assert!(!validate_field("email", "ada @example.com", trial_form_rules()).valid);
    }

    #[test]
    fn unknown_fields_always_pass() {
        for value in ["", "   ", "anything", "!!!"] {
            assert_eq!(
                validate_field("phone", value, trial_form_rules()),
                FieldValidationResult::ok()
            );
        }
    }

    #[test]
    fn min_length_counts_utf16_units_not_bytes() {
        let mut rules = RuleTable::new();
        rules.insert(
            "city".into(),
            FieldRule { required: false, min_length: Some(3), pattern: None, message: String::new() },
        );
        assert!(validate_field("city", "Åbo", &rules).valid);
        assert!(!validate_field("city", "Åb", &rules).valid);
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        assert!(validate_field("company", "😀", trial_form_rules()).valid);
        assert!(!validate_field("name", "A", trial_form_rules()).valid);
    }

    #[test]
    fn byte_order_mark_is_trimmed_like_whitespace() {
        assert!(validate_field("company", "\u{FEFF}", trial_form_rules()).valid);
        assert_eq!(
            validate_field("name", "\u{FEFF} \u{FEFF}", trial_form_rules()),
            FieldValidationResult::fail("Name is required")
        );
        assert!(validate_field("email", "\u{FEFF}ada@example.com\u{FEFF}", trial_form_rules()).valid);
    }

    #[test]
    fn built_in_rules_carry_their_patterns() {
        let rules = trial_form_rules();
        assert!(rules["name"].pattern.is_some());
        assert!(rules["email"].pattern.is_some());
        assert!(rules["company"].pattern.is_none());
    }

    #[test]
    fn form_is_valid_only_when_every_field_is() {
        let good = validate_form(
            [("name", "Ada Lovelace"), ("email", "ada@example.com"), ("company", "")],
            trial_form_rules(),
        );
        assert!(good.is_valid());

        let bad = validate_form(
            [("name", "Ada"), ("email", "nope"), ("company", "Analytical Engines")],
            trial_form_rules(),
        );
        assert!(!bad.is_valid());
        assert_eq!(bad.error_for("email"), Some("Please enter a valid email address"));
        assert_eq!(bad.error_for("name"), None);
    }

    #[test]
    fn display_name_only_touches_the_first_letter() {
        assert_eq!(display_name("email"), "Email");
        assert_eq!(display_name("companyName"), "CompanyName");
        assert_eq!(display_name(""), "");
    }
}
