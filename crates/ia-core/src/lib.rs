//! Core event timing and dispatch for interaction analytics.
//!
//! This crate contains:
//! - Stat events: gains, losses, keywords, gestures, gaze dwell, custom stats
//! - Timed sessions: the gaze and hold timers behind dwell and hold lengths
//! - Dispatch: positional backend calls, status codes and error lookups
//! - The [`EventRecorder`] façade that ties these together

pub mod backend;
mod clock;
mod dispatch;
mod event;
mod gaze;
mod recorder;
mod resolver;
mod target;
mod timer;
pub mod types;

pub use backend::{AnalyticsBackend, BackendCall, MemoryBackend, NoopBackend, STATUS_OK};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use dispatch::{DispatchError, Dispatcher, format_decimal, format_weight};
pub use event::{GestureDetail, StatEvent, UNIT_WEIGHT};
pub use gaze::{GazeTracker, MAPPING_IDENTIFIER};
pub use recorder::{EventRecorder, HoldTiming, RecorderOptions};
pub use resolver::ErrorResolver;
pub use target::{FocusSlot, NoTarget, TargetResolver};
pub use timer::{SessionState, TimedSession};
pub use types::{ApiKey, Formula, GestureKind, Measurement, StatKind, ValidationError};
