use std::error::Error as _;
use std::fmt;

/// Why a translation did not produce text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Backend failure: {0}")]
    BackendFailure(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Nothing to translate")]
    EmptyText,

    #[error("Text is too long: {len} characters (limit {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("Translation cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedLanguage,
    BackendFailure,
    NotImplemented,
    InvalidInput,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::UnsupportedLanguage => "unsupported language",
            ErrorKind::BackendFailure => "backend failure",
            ErrorKind::NotImplemented => "not implemented",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::UnsupportedLanguage(_) => ErrorKind::UnsupportedLanguage,
            TranslateError::BackendFailure(_) => ErrorKind::BackendFailure,
            TranslateError::NotImplemented(_) => ErrorKind::NotImplemented,
            TranslateError::EmptyText | TranslateError::TextTooLong { .. } => {
                ErrorKind::InvalidInput
            }
            TranslateError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Worth retrying as-is, possibly on another backend
    pub fn is_retryable(&self) -> bool {
        matches!(self, TranslateError::BackendFailure(_))
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display hides the io cause, walk the chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        if err.is_timeout() {
            message = format!("request timed out: {message}");
        }

        TranslateError::BackendFailure(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            TranslateError::UnsupportedLanguage("klingon".into()).kind(),
            ErrorKind::UnsupportedLanguage
        );
        assert_eq!(
            TranslateError::TextTooLong { len: 6, max: 5 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(TranslateError::EmptyText.kind(), ErrorKind::InvalidInput);
        assert!(TranslateError::BackendFailure("boom".into()).is_retryable());
        assert!(!TranslateError::Cancelled.is_retryable());
    }

    #[test]
    fn messages_carry_the_cause() {
        let err = TranslateError::BackendFailure("Network error".into());
        assert_eq!(err.to_string(), "Backend failure: Network error");

        let err = TranslateError::UnsupportedLanguage("klingon".into());
        assert!(err.to_string().contains("klingon"));
    }
}
