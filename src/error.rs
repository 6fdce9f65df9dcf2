use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Reasons an inbound postback is dropped before any rule runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing or empty clickid")]
    MissingClickId { payout: f64 },

    #[error("negative payout: {payout}")]
    NegativePayout { payout: f64 },
}

impl ValidationError {
    /// Payout as the normalizer parsed it, for the DROP line.
    pub fn payout(&self) -> f64 {
        match self {
            ValidationError::MissingClickId { payout } | ValidationError::NegativePayout { payout } => *payout,
        }
    }
}

/// Category of an outbound GET that never produced an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Request,
}

impl TransportErrorKind {
    /// Numeric code reported in place of an HTTP status.
    ///
    /// Values follow libcurl's error numbers so log readers used to
    /// curl-based relays see familiar codes.
    pub fn code(self) -> u16 {
        match self {
            TransportErrorKind::Timeout => 28,
            TransportErrorKind::Connect => 7,
            TransportErrorKind::Redirect => 47,
            TransportErrorKind::Body => 56,
            TransportErrorKind::Request => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Redirect => "redirect",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Request => "request",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} error: {detail}", .kind.as_str())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Classify a reqwest failure. Timeouts win over connect errors since a
    /// connect that times out reports both. The request URL is stripped from
    /// the detail because it carries the unmasked click id.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, err.without_url().to_string())
    }
}
