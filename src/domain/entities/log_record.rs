use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a request log line, derived from the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `< 400` is info, `400..500` is warning, everything else is error.
    ///
    /// Codes outside the HTTP range are not special-cased and land in info.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            0..=399 => Self::Info,
            400..=499 => Self::Warning,
            _ => Self::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an authenticated user. Numeric ids stay numeric on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Str(String),
}

impl UserId {
    /// `0` and `""` do not identify anyone.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Int(id) => *id == 0,
            Self::Str(id) => id.is_empty(),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// One logged request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub ip: String,
    pub method: String,
    pub input: String,
    pub status_code: u16,
    pub user_id: Option<UserId>,
    pub url: String,
    pub ms: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
}

impl LogRecord {
    pub fn level(&self) -> LogLevel {
        LogLevel::from_status(self.status_code)
    }

    /// `userId` as it appears in the plain-text line.
    pub fn user_id_text(&self) -> String {
        self.user_id
            .as_ref()
            .map_or_else(|| "null".to_string(), ToString::to_string)
    }

    /// Positional text form: `ip method input statusCode userId url ms`.
    ///
    /// `code` never appears here.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.ip,
            self.method,
            self.input,
            self.status_code,
            self.user_id_text(),
            self.url,
            self.ms
        )
    }
}
