//! Status codes returned by the local backend.

use std::fmt;

/// Why a submission was rejected.
///
/// The numeric values are the status codes callers see; they are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No API key was set before submitting.
    MissingKey = 1,
    /// Identifier (or gaze target) was empty.
    EmptyIdentifier = 2,
    /// A numeric field was not locale-invariant decimal text.
    InvalidNumber = 3,
    /// An enum field held an ordinal with no matching variant.
    InvalidOrdinal = 4,
    /// The submission could not be written.
    Storage = 5,
}

impl ErrorCode {
    pub const ALL: [Self; 5] = [
        Self::MissingKey,
        Self::EmptyIdentifier,
        Self::InvalidNumber,
        Self::InvalidOrdinal,
        Self::Storage,
    ];

    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::MissingKey => "API key has not been set",
            Self::EmptyIdentifier => "stat identifier cannot be empty",
            Self::InvalidNumber => "value is not a valid decimal number",
            Self::InvalidOrdinal => "enum ordinal is out of range",
            Self::Storage => "failed to store stat",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Catalog text for any status code.
pub fn describe(code: i32) -> String {
    if code == 0 {
        return "no error".to_string();
    }
    ErrorCode::from_code(code).map_or_else(
        || format!("unknown error code: {code}"),
        |known| known.description().to_string(),
    )
}

/// A rejected submission: the code plus a message naming the bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rejection {
    pub code: ErrorCode,
    pub message: String,
}

impl Rejection {
    pub fn new(code: ErrorCode, detail: impl fmt::Display) -> Self {
        Self {
            code,
            message: format!("{}: {detail}", code.description()),
        }
    }
}
