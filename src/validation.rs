//! Field-level validation helpers.
//!
//! A [`Validator`] collects every failing field instead of stopping at the
//! first one, so clients can highlight all problems at once. Blank means
//! absent, empty or whitespace-only. Lengths count characters, not bytes.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static TEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("contact number pattern compiles"));

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when the value is absent or only whitespace.
    pub fn not_blank(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.push(field, message);
        }
        self
    }

    /// Fails when a present value exceeds `max` characters.
    pub fn max_chars(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: usize,
        message: &str,
    ) -> &mut Self {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.push(field, message);
        }
        self
    }

    /// Fails when a present, non-empty value is not an email address.
    pub fn email(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if value.is_some_and(|v| !v.is_empty() && !EMAIL_PATTERN.is_match(v)) {
            self.push(field, message);
        }
        self
    }

    /// Fails when a present value is not exactly ten ASCII digits.
    pub fn ten_digits(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if value.is_some_and(|v| !TEN_DIGITS.is_match(v)) {
            self.push(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }
}
