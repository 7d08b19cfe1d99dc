use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Outcome of a single catalog fetch, passed by value between layers.
///
/// Failures never unwind past the repository; they travel as `Err(ErrorInfo)`.
pub type Fetched<T> = Result<T, ErrorInfo>;

/// Errors that can occur while talking to the catalog upstream.
/// Callers above the repository only ever see these folded into `ErrorInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Network-level failure (timeout, DNS, connection refused).
    Transport(String),
    /// The upstream answered, but not with a usable success response.
    Upstream { status: u16, message: String },
    /// The body could not be parsed into the expected shape.
    Decode(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Transport(msg) => write!(f, "network error: {msg}"),
            RepositoryError::Upstream { status, message } => {
                write!(f, "catalog error (HTTP {status}): {message}")
            }
            RepositoryError::Decode(msg) => write!(f, "unreadable response: {msg}"),
        }
    }
}

impl Error for RepositoryError {}

impl From<reqwest::Error> for RepositoryError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        let e = e.without_url();
        if e.is_timeout() {
            RepositoryError::Transport("request timed out".to_string())
        } else if e.is_decode() {
            RepositoryError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RepositoryError::Upstream {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepositoryError::Transport(e.to_string())
        }
    }
}

/// User-facing description of a failed fetch.
///
/// `message` is shown verbatim; `source` keeps the typed cause around for
/// logging without callers having to branch on it.
#[derive(Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub source: Option<Arc<dyn Error + Send + Sync>>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }
}

impl fmt::Debug for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorInfo")
            .field("message", &self.message)
            .field("source", &self.source.as_ref().map(|s| s.to_string()))
            .finish()
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Two `ErrorInfo`s are equal when they would read the same to the user.
impl PartialEq for ErrorInfo {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl Error for ErrorInfo {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn Error + 'static))
    }
}

impl From<RepositoryError> for ErrorInfo {
    fn from(e: RepositoryError) -> Self {
        // Upstream text is already user-readable ("Invalid API key!"), keep it as is.
        let message = match &e {
            RepositoryError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        };
        ErrorInfo::with_source(message, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_kept_verbatim() {
        let info = ErrorInfo::from(RepositoryError::Upstream {
            status: 200,
            message: "Invalid API key!".to_string(),
        });
        assert_eq!(info.message, "Invalid API key!");
        assert!(info.source.is_some());
    }

    #[test]
    fn test_transport_message_is_prefixed() {
        let info = ErrorInfo::from(RepositoryError::Transport("connection refused".to_string()));
        assert_eq!(info.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_source_chain_reaches_repository_error() {
        let info = ErrorInfo::from(RepositoryError::Decode("expected value".to_string()));
        let source = Error::source(&info).expect("source kept");
        assert_eq!(source.to_string(), "unreadable response: expected value");
    }

    #[test]
    fn test_equality_ignores_source() {
        let a = ErrorInfo::new("boom");
        let b = ErrorInfo::with_source("boom", RepositoryError::Transport("x".to_string()));
        assert_eq!(a, b);
    }
}
