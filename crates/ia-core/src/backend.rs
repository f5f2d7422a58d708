//! The analytics backend capability.
//!
//! The backend is reached through a narrow synchronous surface: every
//! argument is text, every submission returns an integer status, and error
//! descriptions are looked up separately. Implementations are chosen when the
//! recorder is composed: [`NoopBackend`] when analytics are disabled,
//! [`MemoryBackend`] in tests, or a real store such as `ia_db::Database`.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Status code meaning the backend accepted a submission.
pub const STATUS_OK: i32 = 0;

/// Synchronous call surface of an analytics backend.
///
/// Submission methods return `0` on acceptance and a backend-defined code
/// greater than zero on rejection.
pub trait AnalyticsBackend {
    fn set_key(&self, key: &str);

    fn record_gain(&self, identifier: &str, value: &str) -> i32;

    fn record_loss(&self, identifier: &str, value: &str) -> i32;

    fn record_custom_stat(
        &self,
        identifier: &str,
        value: &str,
        measurement: &str,
        formula: &str,
        target: &str,
    ) -> i32;

    fn record_keyword(&self, keyword: &str, weight: &str, target: &str) -> i32;

    fn record_gesture(
        &self,
        identifier: &str,
        weight: &str,
        gesture: &str,
        target: &str,
        hold_length: &str,
    ) -> i32;

    fn record_gaze(&self, target: &str, length: &str) -> i32;

    /// Description of a status code.
    fn error_message(&self, code: i32) -> String;

    /// Description of the most recent error, whichever call produced it.
    fn last_error_message(&self) -> String;
}

/// One backend submission with its positional arguments, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Gain {
        identifier: String,
        value: String,
    },
    Loss {
        identifier: String,
        value: String,
    },
    CustomStat {
        identifier: String,
        value: String,
        measurement: String,
        formula: String,
        target: String,
    },
    Keyword {
        keyword: String,
        weight: String,
        target: String,
    },
    Gesture {
        identifier: String,
        weight: String,
        gesture: String,
        target: String,
        hold_length: String,
    },
    Gaze {
        target: String,
        length: String,
    },
}

impl BackendCall {
    /// Name of the backend operation.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Gain { .. } => "record_gain",
            Self::Loss { .. } => "record_loss",
            Self::CustomStat { .. } => "record_custom_stat",
            Self::Keyword { .. } => "record_keyword",
            Self::Gesture { .. } => "record_gesture",
            Self::Gaze { .. } => "record_gaze",
        }
    }

    /// Arguments in the order the backend receives them.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Self::Gain { identifier, value } | Self::Loss { identifier, value } => {
                vec![identifier.as_str(), value.as_str()]
            }
            Self::CustomStat {
                identifier,
                value,
                measurement,
                formula,
                target,
            } => vec![
                identifier.as_str(),
                value.as_str(),
                measurement.as_str(),
                formula.as_str(),
                target.as_str(),
            ],
            Self::Keyword {
                keyword,
                weight,
                target,
            } => vec![keyword.as_str(), weight.as_str(), target.as_str()],
            Self::Gesture {
                identifier,
                weight,
                gesture,
                target,
                hold_length,
            } => vec![
                identifier.as_str(),
                weight.as_str(),
                gesture.as_str(),
                target.as_str(),
                hold_length.as_str(),
            ],
            Self::Gaze { target, length } => vec![target.as_str(), length.as_str()],
        }
    }

    /// Makes exactly one backend call and returns its status.
    pub fn invoke<B: AnalyticsBackend + ?Sized>(&self, backend: &B) -> i32 {
        match self {
            Self::Gain { identifier, value } => backend.record_gain(identifier, value),
            Self::Loss { identifier, value } => backend.record_loss(identifier, value),
            Self::CustomStat {
                identifier,
                value,
                measurement,
                formula,
                target,
            } => backend.record_custom_stat(identifier, value, measurement, formula, target),
            Self::Keyword {
                keyword,
                weight,
                target,
            } => backend.record_keyword(keyword, weight, target),
            Self::Gesture {
                identifier,
                weight,
                gesture,
                target,
                hold_length,
            } => backend.record_gesture(identifier, weight, gesture, target, hold_length),
            Self::Gaze { target, length } => backend.record_gaze(target, length),
        }
    }
}

/// Backend that accepts everything and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

impl AnalyticsBackend for NoopBackend {
    fn set_key(&self, _key: &str) {}

    fn record_gain(&self, _identifier: &str, _value: &str) -> i32 {
        STATUS_OK
    }

    fn record_loss(&self, _identifier: &str, _value: &str) -> i32 {
        STATUS_OK
    }

    fn record_custom_stat(&self, _: &str, _: &str, _: &str, _: &str, _: &str) -> i32 {
        STATUS_OK
    }

    fn record_keyword(&self, _keyword: &str, _weight: &str, _target: &str) -> i32 {
        STATUS_OK
    }

    fn record_gesture(&self, _: &str, _: &str, _: &str, _: &str, _: &str) -> i32 {
        STATUS_OK
    }

    fn record_gaze(&self, _target: &str, _length: &str) -> i32 {
        STATUS_OK
    }

    fn error_message(&self, code: i32) -> String {
        format!("unknown error code: {code}")
    }

    fn last_error_message(&self) -> String {
        String::new()
    }
}

/// In-memory backend that records every call.
///
/// Clones share state, so a test keeps one handle while the recorder owns
/// another. Statuses are accepted by default; queue rejections with
/// [`MemoryBackend::reject_next`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    key: Option<String>,
    key_sets: usize,
    calls: Vec<BackendCall>,
    pending_statuses: VecDeque<i32>,
    messages: HashMap<i32, String>,
    message_lookups: Vec<i32>,
    last_error: String,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next submission return `code`, described by `message`.
    pub fn reject_next(&self, code: i32, message: impl Into<String>) {
        let mut state = self.inner.borrow_mut();
        state.pending_statuses.push_back(code);
        state.messages.insert(code, message.into());
    }

    /// Submissions received so far, in arrival order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.borrow().calls.clone()
    }

    /// Codes passed to [`AnalyticsBackend::error_message`].
    pub fn message_lookups(&self) -> Vec<i32> {
        self.inner.borrow().message_lookups.clone()
    }

    pub fn key(&self) -> Option<String> {
        self.inner.borrow().key.clone()
    }

    /// How many times a key was set.
    pub fn key_sets(&self) -> usize {
        self.inner.borrow().key_sets
    }

    fn submit(&self, call: BackendCall) -> i32 {
        let mut state = self.inner.borrow_mut();
        state.calls.push(call);
        let status = state.pending_statuses.pop_front().unwrap_or(STATUS_OK);
        if status != STATUS_OK {
            let message = state
                .messages
                .get(&status)
                .cloned()
                .unwrap_or_else(|| format!("unknown error code: {status}"));
            state.last_error = message;
        }
        status
    }
}

impl AnalyticsBackend for MemoryBackend {
    fn set_key(&self, key: &str) {
        let mut state = self.inner.borrow_mut();
        state.key = Some(key.to_string());
        state.key_sets += 1;
    }

    fn record_gain(&self, identifier: &str, value: &str) -> i32 {
        self.submit(BackendCall::Gain {
            identifier: identifier.to_string(),
            value: value.to_string(),
        })
    }

    fn record_loss(&self, identifier: &str, value: &str) -> i32 {
        self.submit(BackendCall::Loss {
            identifier: identifier.to_string(),
            value: value.to_string(),
        })
    }

    fn record_custom_stat(
        &self,
        identifier: &str,
        value: &str,
        measurement: &str,
        formula: &str,
        target: &str,
    ) -> i32 {
        self.submit(BackendCall::CustomStat {
            identifier: identifier.to_string(),
            value: value.to_string(),
            measurement: measurement.to_string(),
            formula: formula.to_string(),
            target: target.to_string(),
        })
    }

    fn record_keyword(&self, keyword: &str, weight: &str, target: &str) -> i32 {
        self.submit(BackendCall::Keyword {
            keyword: keyword.to_string(),
            weight: weight.to_string(),
            target: target.to_string(),
        })
    }

    fn record_gesture(
        &self,
        identifier: &str,
        weight: &str,
        gesture: &str,
        target: &str,
        hold_length: &str,
    ) -> i32 {
        self.submit(BackendCall::Gesture {
            identifier: identifier.to_string(),
            weight: weight.to_string(),
            gesture: gesture.to_string(),
            target: target.to_string(),
            hold_length: hold_length.to_string(),
        })
    }

    fn record_gaze(&self, target: &str, length: &str) -> i32 {
        self.submit(BackendCall::Gaze {
            target: target.to_string(),
            length: length.to_string(),
        })
    }

    fn error_message(&self, code: i32) -> String {
        let mut state = self.inner.borrow_mut();
        state.message_lookups.push(code);
        state
            .messages
            .get(&code)
            .cloned()
            .unwrap_or_else(|| format!("unknown error code: {code}"))
    }

    fn last_error_message(&self) -> String {
        self.inner.borrow().last_error.clone()
    }
}
