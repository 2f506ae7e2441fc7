//! Error types for the blog.

use thiserror::Error;

/// Common error type for the blog.
#[derive(Error, Debug)]
pub enum BlogError {
    /// Database error.
    ///
    /// Wraps errors from the database backend. Errors from sqlx are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Outbound mail error.
    #[error("mail error: {0}")]
    Mail(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BlogError {
    fn from(e: sqlx::Error) -> Self {
        BlogError::Database(e.to_string())
    }
}

/// Result type alias for blog operations.
pub type Result<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = BlogError::Validation("name too long".to_string());
        assert_eq!(err.to_string(), "validation error: name too long");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BlogError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_mail_error_display() {
        let err = BlogError::Mail("connection refused".to_string());
        assert_eq!(err.to_string(), "mail error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BlogError = io_err.into();
        assert!(matches!(err, BlogError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: BlogError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, BlogError::Database(_)));
    }

    #[test]
    fn test_template_error_conversion() {
        let err: BlogError = crate::template::TemplateError::NotFound("base".to_string()).into();
        assert_eq!(err.to_string(), "template error: Template not found: base");
    }
}
