use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Collection of validation errors
#[derive(Debug, Clone)]
pub struct ValidationErrors {
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: String) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message);
    }

    /// Folds another set of errors in, prefixing each key with `field`.
    pub fn merge_prefixed(&mut self, field: &str, other: ValidationErrors) {
        for (key, messages) in other.errors {
            for message in messages {
                self.add_error(&format!("{field}.{key}"), message);
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_field_errors(self) -> HashMap<String, Vec<String>> {
        self.errors
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator trait for implementing custom validation logic
pub trait Validator<T: ?Sized> {
    fn validate(&self, value: &T) -> ValidationResult<()>;
}

fn single_error(field: &str, message: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add_error(field, message.to_string());
    errors
}

/// Email validator
pub struct EmailValidator {
    max_length: usize,
}

impl EmailValidator {
    pub fn new() -> Self {
        Self { max_length: 254 }
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = length;
        self
    }

    pub fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        // RFC 5322 compliant email regex (simplified)
        let email_regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
            )
            .expect("email regex is valid")
        });

        email_regex.is_match(email)
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<str> for EmailValidator {
    fn validate(&self, email: &str) -> ValidationResult<()> {
        if email.is_empty() {
            return Err(single_error("required", "Email is required"));
        }

        if email.len() > self.max_length {
            return Err(single_error(
                "length",
                &format!("Must be no more than {} characters long", self.max_length),
            ));
        }

        if !Self::is_valid_email(email) {
            return Err(single_error("format", "Invalid email format"));
        }

        Ok(())
    }
}

/// Password validator
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    pub fn new() -> Self {
        Self { min_length: 8 }
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = length;
        self
    }
}

impl Default for PasswordValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<str> for PasswordValidator {
    fn validate(&self, password: &str) -> ValidationResult<()> {
        if password.is_empty() {
            return Err(single_error("required", "Password is required"));
        }

        if password.chars().count() < self.min_length {
            return Err(single_error(
                "length",
                &format!(
                    "Password must be at least {} characters long",
                    self.min_length
                ),
            ));
        }

        Ok(())
    }
}

/// String length validator
pub struct StringLengthValidator {
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl StringLengthValidator {
    pub fn new() -> Self {
        Self {
            min_length: None,
            max_length: None,
        }
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }
}

impl Default for StringLengthValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator<str> for StringLengthValidator {
    fn validate(&self, value: &str) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        let length = value.trim().chars().count();

        if let Some(min_len) = self.min_length {
            if length < min_len {
                errors.add_error(
                    "length",
                    format!("Must be at least {} characters long", min_len),
                );
            }
        }

        if let Some(max_len) = self.max_length {
            if length > max_len {
                errors.add_error(
                    "length",
                    format!("Must be no more than {} characters long", max_len),
                );
            }
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

/// Collection of common validation functions
pub mod validators {
    use super::*;

    /// Validate the profile fields submitted at registration
    pub fn validate_user_registration(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> ValidationResult<()> {
        let mut all_errors = ValidationErrors::new();
        let name_validator = StringLengthValidator::new().min_length(2).max_length(50);

        if let Err(errors) = name_validator.validate(first_name) {
            all_errors.merge_prefixed("firstName", errors);
        }

        if let Err(errors) = name_validator.validate(last_name) {
            all_errors.merge_prefixed("lastName", errors);
        }

        if let Err(errors) = EmailValidator::new().max_length(50).validate(email) {
            all_errors.merge_prefixed("email", errors);
        }

        if let Err(errors) = PasswordValidator::new().min_length(5).validate(password) {
            all_errors.merge_prefixed("password", errors);
        }

        if all_errors.has_errors() {
            Err(all_errors)
        } else {
            Ok(())
        }
    }
}
