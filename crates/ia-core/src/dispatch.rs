//! Turning stat events into backend calls and reading back the status.

use thiserror::Error;

use crate::backend::{AnalyticsBackend, BackendCall, STATUS_OK};
use crate::event::StatEvent;
use crate::resolver::ErrorResolver;
use crate::types::StatKind;

/// A submission the backend did not accept.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The backend returned an error code.
    #[error("backend rejected {kind} stat (code {code}): {message}")]
    Rejected {
        kind: StatKind,
        code: i32,
        message: String,
    },

    /// The backend returned a status outside its documented range.
    #[error("backend returned unrecognized status {code} for {kind} stat")]
    UnrecognizedStatus { kind: StatKind, code: i32 },
}

impl DispatchError {
    pub const fn code(&self) -> i32 {
        match self {
            Self::Rejected { code, .. } | Self::UnrecognizedStatus { code, .. } => *code,
        }
    }
}

/// Formats a magnitude as locale-invariant decimal text.
///
/// Whole numbers carry no fractional part (`25`, not `25.0`).
pub fn format_decimal(value: f32) -> String {
    value.to_string()
}

/// Formats a weight, which the backend always receives with one decimal
/// place (`1.0`).
pub fn format_weight(weight: f32) -> String {
    format!("{weight:.1}")
}

impl From<&StatEvent> for BackendCall {
    fn from(event: &StatEvent) -> Self {
        let identifier = event.identifier().to_string();
        match event.kind() {
            StatKind::Gain => Self::Gain {
                identifier,
                value: format_decimal(event.value()),
            },
            StatKind::Loss => Self::Loss {
                identifier,
                value: format_decimal(event.value()),
            },
            StatKind::CustomStat => Self::CustomStat {
                identifier,
                value: format_decimal(event.value()),
                measurement: event.measurement().wire(),
                formula: event.formula().wire(),
                target: event.target().to_string(),
            },
            StatKind::Keyword => Self::Keyword {
                keyword: identifier,
                weight: format_weight(event.value()),
                target: event.target().to_string(),
            },
            StatKind::Gesture => Self::Gesture {
                identifier,
                weight: format_weight(event.value()),
                gesture: event.gesture_kind().unwrap_or_default().wire(),
                target: event.target().to_string(),
                hold_length: format_decimal(event.hold_length()),
            },
            StatKind::Gaze => Self::Gaze {
                target: event.target().to_string(),
                length: format_decimal(event.value()),
            },
        }
    }
}

/// Sends stat events to a backend, one call per event, no retries.
#[derive(Debug)]
pub struct Dispatcher<B> {
    backend: B,
}

impl<B: AnalyticsBackend> Dispatcher<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn errors(&self) -> ErrorResolver<'_, B> {
        ErrorResolver::new(&self.backend)
    }

    /// Submits `event` and returns the raw backend status.
    pub fn send(&self, event: &StatEvent) -> i32 {
        let call = BackendCall::from(event);
        tracing::trace!(operation = call.operation(), args = ?call.args(), "backend call");
        call.invoke(&self.backend)
    }

    /// Submits `event`; a non-zero status becomes an error carrying the
    /// backend's description of it.
    pub fn dispatch(&self, event: &StatEvent) -> Result<(), DispatchError> {
        let code = self.send(event);
        if code == STATUS_OK {
            return Ok(());
        }

        let kind = event.kind();
        match self.errors().message_for(code) {
            Some(message) => Err(DispatchError::Rejected {
                kind,
                code,
                message,
            }),
            None => Err(DispatchError::UnrecognizedStatus { kind, code }),
        }
    }
}
