//! JSON-LD processing error.

use std::fmt;

/// JSON-LD processing result.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kind for JSON-LD processing.
///
/// These are the stable identifiers a caller can switch on; the human-readable detail
/// lives in the wrapped source chain, not in the kind itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Nested arrays, a non-array `@list`, or some other structural violation.
    SyntaxError,
    /// Term expansion failed to stabilize.
    CyclicalContext,
    /// A context value has an unsupported shape for the requested lookup.
    InvalidContext,
    /// One or more `@context` URL fetches failed.
    ContextUrlError,
    /// A URL failed validation, or fetched content was not a map.
    InvalidUrl,
    /// `use_url_resolver` was asked for a resolver kind that was never registered.
    UnknownUrlResolver,
    /// Pre-compaction steps failed, or a typed value also carried `@language`.
    CompactError,
    /// Framing, normalization, and triple emission are not implemented.
    NotImplemented,
}

impl ErrorCode {
    /// Returns the error message string.
    pub fn message(self) -> &'static str {
        match self {
            Self::SyntaxError => "syntax error",
            Self::CyclicalContext => "cyclical context",
            Self::InvalidContext => "invalid context",
            Self::ContextUrlError => "context url error",
            Self::InvalidUrl => "invalid url",
            Self::UnknownUrlResolver => "unknown url resolver",
            Self::CompactError => "compaction error",
            Self::NotImplemented => "not implemented",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ErrorCode {}

/// JSON-LD processing error.
///
/// Carries a stable [`ErrorCode`] plus an optional wrapped cause chain. Nothing is
/// retried automatically; whether an error is fatal is the caller's choice.
#[derive(Debug, thiserror::Error)]
pub struct Error {
    /// Error code.
    code: ErrorCode,
    /// Details of the error (if available).
    #[source]
    source: Option<anyhow::Error>,
}

impl Error {
    /// Creates an error of the given kind with no further detail.
    pub fn new(code: ErrorCode) -> Self {
        Self { code, source: None }
    }

    /// Creates an error of the given kind wrapping a human-readable message.
    pub fn with_message(code: ErrorCode, message: impl fmt::Display + Send + Sync + 'static) -> Self {
        Self {
            code,
            source: Some(anyhow::anyhow!("{}", message)),
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Wraps the error with additional context.
    pub(crate) fn context<C>(self, context: C) -> Self
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        let source = match self.source {
            Some(source) => source.context(context),
            None => anyhow::anyhow!("{}", context),
        };

        Self {
            code: self.code,
            source: Some(source),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code.message())?;
        if let Some(source) = self.source.as_ref() {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self { code, source: None }
    }
}

/// Extension trait for attaching context to a [`Result`] as it propagates.
pub(crate) trait ResultExt<T> {
    /// Wraps the error value with the additional context.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| err.context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err: Error = ErrorCode::SyntaxError.into();
        let err = err.context("while expanding `foo`");
        assert_eq!(err.to_string(), "syntax error: while expanding `foo`");
    }

    #[test]
    fn code_is_preserved_through_context() {
        let err = Error::with_message(ErrorCode::CyclicalContext, "a -> b -> a")
            .context("resolving term `a`");
        assert_eq!(err.code(), ErrorCode::CyclicalContext);
    }
}
