//! Reader-facing forms: share a post, leave a comment, search.
//!
//! Forms arrive URL-encoded. Missing fields deserialize as empty strings so
//! that they surface as validation errors rather than extractor rejections.
//! Surrounding whitespace is stripped before validation.

use std::collections::BTreeMap;

use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::search;

/// Form for recommending a post to someone by email.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct EmailPostForm {
    /// Sender name.
    #[serde(default)]
    #[validate(
        length(max = 25, message = "Ensure this value has at most 25 characters."),
        custom(function = "required_text")
    )]
    pub name: String,

    /// Sender email.
    #[serde(default)]
    #[validate(custom(function = "valid_email"))]
    pub email: String,

    /// Recipient email.
    #[serde(default)]
    #[validate(custom(function = "valid_email"))]
    pub to: String,

    /// Optional message to the recipient.
    #[serde(default)]
    #[validate(custom(function = "no_control_chars"))]
    pub comments: String,
}

impl EmailPostForm {
    /// Strip surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        }
    }

    /// Field errors of this form as it stands; empty when valid.
    pub fn errors(&self) -> FormErrors {
        self.validate()
            .err()
            .map(FormErrors::from_validation_errors)
            .unwrap_or_default()
    }
}

/// Form for commenting on a post.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    /// Commenter name.
    #[serde(default)]
    #[validate(
        length(max = 80, message = "Ensure this value has at most 80 characters."),
        custom(function = "required_text")
    )]
    pub name: String,

    /// Commenter email.
    #[serde(default)]
    #[validate(custom(function = "valid_email"))]
    pub email: String,

    /// Comment text.
    #[serde(default)]
    #[validate(custom(function = "required_text"))]
    pub body: String,
}

impl CommentForm {
    /// Strip surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }

    /// Field errors of this form as it stands; empty when valid.
    pub fn errors(&self) -> FormErrors {
        self.validate()
            .err()
            .map(FormErrors::from_validation_errors)
            .unwrap_or_default()
    }
}

/// Search box.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchForm {
    /// The trimmed query, if one was entered.
    pub fn query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// Search terms of the query (stop words removed).
    pub fn terms(&self) -> Vec<String> {
        self.query().map(search::query_terms).unwrap_or_default()
    }
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Collect field messages from `validator` errors.
    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}.", field))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }

        Self(fields)
    }

    /// Whether there are no errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has at least one error.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages for `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate that a string does not contain control characters or NULL bytes.
pub fn no_control_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters.".into()));
    }
    Ok(())
}

/// Validate that a string is present and free of control characters.
pub fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("This field is required.".into()));
    }
    no_control_chars(value)
}

/// Validate a bare email address the way outgoing mail parses it.
///
/// Display names and angle brackets are not accepted.
pub fn valid_email(value: &str) -> Result<(), ValidationError> {
    match value.parse::<Mailbox>() {
        Ok(mailbox) if mailbox.name.is_none() && AsRef::<str>::as_ref(&mailbox.email) == value => Ok(()),
        _ => Err(ValidationError::new("email")
            .with_message("Enter a valid email address.".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(name: &str, email: &str, to: &str) -> EmailPostForm {
        EmailPostForm {
            name: name.to_string(),
            email: email.to_string(),
            to: to.to_string(),
            comments: String::new(),
        }
    }

    #[test]
    fn test_no_control_chars() {
        assert!(no_control_chars("Hello, world!").is_ok());
        assert!(no_control_chars("Line 1\nLine 2\tTabbed\r").is_ok());
        assert!(no_control_chars("Hello\x00World").is_err());
        assert!(no_control_chars("Hello\x1bWorld").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(required_text("x").is_ok());
        assert!(required_text("").is_err());
        assert!(required_text(" \t\n").is_err());
        assert!(required_text("bell\x07").is_err());
    }

    #[test]
    fn test_email_post_form_valid() {
        let form = share("  Ann ", "ann@example.com", " bob@example.com ").normalized();
        assert!(form.errors().is_empty());
        assert_eq!(form.name, "Ann");
        assert_eq!(form.to, "bob@example.com");
    }

    #[test]
    fn test_valid_email() {
        for good in ["ann@example.com", "first.last+tag@mail.example.org"] {
            assert!(valid_email(good).is_ok(), "{good}");
        }
        for bad in [
            "",
            "not-an-email",
            "a.@example.com",
            ".a@example.com",
            "a..b@example.com",
            "user@[127.0.0.1]",
            "Ann <ann@example.com>",
            "<ann@example.com>",
        ] {
            let err = valid_email(bad).unwrap_err();
            assert_eq!(
                err.message.as_deref(),
                Some("Enter a valid email address."),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_email_fields_reject_what_mail_cannot_send() {
        for bad in ["a.@example.com", ".a@example.com", "a..b@example.com", "user@[127.0.0.1]"] {
            let to_errors = share("Ann", "ann@example.com", bad).errors();
            assert_eq!(to_errors.get("to"), ["Enter a valid email address."], "{bad}");

            let from_errors = share("Ann", bad, "bob@example.com").errors();
            assert!(from_errors.has("email"), "{bad}");

            let comment = CommentForm {
                name: "Ann".to_string(),
                email: bad.to_string(),
                body: "Nice post".to_string(),
            };
            assert!(comment.errors().has("email"), "{bad}");
        }
    }

    #[test]
    fn test_email_post_form_missing_recipient() {
        let errors = share("Ann", "ann@example.com", "").errors();
        assert!(errors.has("to"));
        assert!(!errors.has("name"));
        assert_eq!(errors.get("to"), ["Enter a valid email address."]);
    }

    #[test]
    fn test_email_post_form_name_length() {
        assert!(share(&"a".repeat(25), "a@example.com", "b@example.com")
            .errors()
            .is_empty());

        let errors = share(&"a".repeat(26), "a@example.com", "b@example.com").errors();
        assert!(errors.has("name"));
    }

    #[test]
    fn test_email_post_form_blank_name() {
        let errors = share("   ", "a@example.com", "b@example.com")
            .normalized()
            .errors();
        assert_eq!(errors.get("name"), ["This field is required."]);
    }

    #[test]
    fn test_comment_form() {
        let ok = CommentForm {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            body: "Nice post".to_string(),
        };
        assert!(ok.errors().is_empty());

        let bad_email = CommentForm {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.errors().has("email"));

        let long_name = CommentForm {
            name: "n".repeat(81),
            ..ok.clone()
        };
        assert!(long_name.errors().has("name"));

        let empty_body = CommentForm {
            body: "  ".to_string(),
            ..ok
        };
        assert!(empty_body.normalized().errors().has("body"));
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let form: CommentForm = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
        assert_eq!(form.email, "");
        let errors = form.normalized().errors();
        assert!(errors.has("email"));
        assert!(errors.has("body"));
    }

    #[test]
    fn test_search_form_query() {
        let blank = SearchForm {
            query: Some("   ".to_string()),
        };
        assert_eq!(blank.query(), None);
        assert!(blank.terms().is_empty());

        let form = SearchForm {
            query: Some(" Django the Views ".to_string()),
        };
        assert_eq!(form.query(), Some("Django the Views"));
        assert_eq!(form.terms(), vec!["django", "views"]);

        assert_eq!(SearchForm::default().query(), None);
    }
}
