//! Client-side form rules shared by the profile, hours and review forms.
//!
//! Rules other than [`Rule::Required`] accept an empty value, so optional
//! fields only need the pattern rule and mandatory ones stack `Required`
//! in front of it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::i18n::{Language, Text, localize, localize_with};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field is required")]
    Required,
    #[error("at least {0} characters required")]
    MinLength(usize),
    #[error("at most {0} characters allowed")]
    MaxLength(usize),
    #[error("invalid email address")]
    Email,
    #[error("invalid phone number")]
    Phone,
    #[error("invalid URL")]
    Url,
    #[error("invalid time, expected HH:MM")]
    Time,
    #[error("invalid video URL")]
    VideoUrl,
}

impl ValidationError {
    pub fn localized(&self, lang: Language) -> String {
        match self {
            ValidationError::Required => localize(lang, Text::RequiredField).to_string(),
            ValidationError::MinLength(n) => localize_with(lang, Text::MinLength, "length", n),
            ValidationError::MaxLength(n) => localize_with(lang, Text::MaxLength, "length", n),
            ValidationError::Email => localize(lang, Text::InvalidEmail).to_string(),
            ValidationError::Phone => localize(lang, Text::InvalidPhone).to_string(),
            ValidationError::Url => localize(lang, Text::InvalidUrl).to_string(),
            ValidationError::Time => localize(lang, Text::InvalidTimeFormat).to_string(),
            ValidationError::VideoUrl => localize(lang, Text::InvalidVideoUrl).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Phone,
    Url,
    Time,
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return match self {
                Rule::Required => Err(ValidationError::Required),
                _ => Ok(()),
            };
        }
        let ok = match self {
            Rule::Required => true,
            Rule::MinLength(n) => value.chars().count() >= *n,
            Rule::MaxLength(n) => value.chars().count() <= *n,
            Rule::Email => is_valid_email(value),
            Rule::Phone => is_valid_phone(value),
            Rule::Url => is_valid_url(value),
            Rule::Time => is_valid_time(value),
        };
        if ok { Ok(()) } else { Err(self.error()) }
    }

    fn error(&self) -> ValidationError {
        match self {
            Rule::Required => ValidationError::Required,
            Rule::MinLength(n) => ValidationError::MinLength(*n),
            Rule::MaxLength(n) => ValidationError::MaxLength(*n),
            Rule::Email => ValidationError::Email,
            Rule::Phone => ValidationError::Phone,
            Rule::Url => ValidationError::Url,
            Rule::Time => ValidationError::Time,
        }
    }
}

/// First failing rule, in declaration order.
pub fn validate(value: &str, rules: &[Rule]) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.check(value))
}

/// Per-field errors of one form, keyed by the form's own field enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, ValidationError>);

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    pub fn check(&mut self, field: F, value: &str, rules: &[Rule]) {
        match validate(value, rules) {
            Ok(()) => {
                self.0.remove(&field);
            }
            Err(e) => {
                self.0.insert(field, e);
            }
        }
    }

    pub fn insert(&mut self, field: F, error: ValidationError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: F) -> Option<ValidationError> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, ValidationError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }
}

const EMAIL_LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";

/// Email syntax as accepted by HTML form validation: dotted local atoms,
/// `@`, then dotted hostname labels.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > 254 {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    let local_ok = local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || EMAIL_LOCAL_SPECIALS.contains(c))
    });
    let domain_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    local_ok && domain_ok
}

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s\-()]{10,}$").expect("valid phone pattern"));
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").expect("valid URL pattern")
});
static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid time pattern")
});

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

pub fn is_valid_url(value: &str) -> bool {
    URL.is_match(value)
}

/// 24-hour `H:MM` or `HH:MM`.
pub fn is_valid_time(value: &str) -> bool {
    TIME.is_match(value)
}
