//! The recording façade host code talks to.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::AnalyticsBackend;
use crate::clock::{Clock, MonotonicClock};
use crate::dispatch::Dispatcher;
use crate::event::StatEvent;
use crate::resolver::ErrorResolver;
use crate::target::{NoTarget, TargetResolver};
use crate::timer::TimedSession;
use crate::types::{ApiKey, Formula, GestureKind, Measurement, StatKind, ValidationError};

/// Which timer a completed hold reads its length from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldTiming {
    /// The hold timer's own window.
    #[default]
    Measured,
    /// The gaze timer, which is then reset. Matches what older integrations
    /// reported, for backends that need identical numbers.
    LegacyGazeTimer,
}

impl HoldTiming {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Measured => "measured",
            Self::LegacyGazeTimer => "legacy_gaze_timer",
        }
    }
}

impl FromStr for HoldTiming {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "measured" => Ok(Self::Measured),
            "legacy_gaze_timer" | "legacy" => Ok(Self::LegacyGazeTimer),
            _ => Err(ValidationError::UnknownVariant {
                kind: "hold timing",
                value: s.to_string(),
            }),
        }
    }
}

/// Recorder behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecorderOptions {
    /// Trace every constructed event at `info` level before it is sent.
    #[serde(default)]
    pub verbose_logging: bool,
    #[serde(default)]
    pub hold_timing: HoldTiming,
}

/// Records interaction stats and forwards each one to the backend as it
/// happens.
///
/// Owns the gaze and hold timers and the currently viewed object. Recording
/// methods never fail: a rejected stat is logged with the backend's
/// description and dropped.
///
/// Not thread-safe; hosts calling from several threads must serialize access.
#[derive(Debug)]
pub struct EventRecorder<B, T = NoTarget, C = MonotonicClock> {
    dispatcher: Dispatcher<B>,
    targets: T,
    clock: C,
    options: RecorderOptions,
    gaze: TimedSession,
    hold: TimedSession,
    viewed: Option<String>,
}

impl<B: AnalyticsBackend> EventRecorder<B> {
    /// Creates a recorder and hands `key` to the backend. The key is not
    /// changed afterwards.
    pub fn new(backend: B, key: &ApiKey, options: RecorderOptions) -> Self {
        backend.set_key(key.as_str());
        Self {
            dispatcher: Dispatcher::new(backend),
            targets: NoTarget,
            clock: MonotonicClock::new(),
            options,
            gaze: TimedSession::new("gaze"),
            hold: TimedSession::new("hold"),
            viewed: None,
        }
    }
}

impl<B, T, C> EventRecorder<B, T, C>
where
    B: AnalyticsBackend,
    T: TargetResolver,
    C: Clock,
{
    /// Replaces the source of the currently gazed object.
    pub fn with_target_resolver<R: TargetResolver>(self, targets: R) -> EventRecorder<B, R, C> {
        EventRecorder {
            dispatcher: self.dispatcher,
            targets,
            clock: self.clock,
            options: self.options,
            gaze: self.gaze,
            hold: self.hold,
            viewed: self.viewed,
        }
    }

    /// Replaces the time source used by the gaze and hold timers.
    pub fn with_clock<K: Clock>(self, clock: K) -> EventRecorder<B, T, K> {
        EventRecorder {
            dispatcher: self.dispatcher,
            targets: self.targets,
            clock,
            options: self.options,
            gaze: self.gaze,
            hold: self.hold,
            viewed: self.viewed,
        }
    }

    pub const fn options(&self) -> RecorderOptions {
        self.options
    }

    pub const fn backend(&self) -> &B {
        self.dispatcher.backend()
    }

    /// Error lookups against the backend.
    pub fn errors(&self) -> ErrorResolver<'_, B> {
        self.dispatcher.errors()
    }

    pub const fn gaze_timer(&self) -> &TimedSession {
        &self.gaze
    }

    pub const fn hold_timer(&self) -> &TimedSession {
        &self.hold
    }

    /// Object passed to the open [`record_gaze_on`](Self::record_gaze_on).
    pub fn viewed_target(&self) -> Option<&str> {
        self.viewed.as_deref()
    }

    /// Records a custom stat counted in units and totalled.
    pub fn record_custom_stat(&self, identifier: &str, value: f32) {
        self.record_custom_stat_with(identifier, value, Measurement::Count, Formula::Total, "");
    }

    /// Records a custom stat with an explicit unit, aggregation hint and
    /// fallback target.
    pub fn record_custom_stat_with(
        &self,
        identifier: &str,
        value: f32,
        measurement: Measurement,
        formula: Formula,
        fallback_target: &str,
    ) {
        let target = self.resolve_target(fallback_target);
        self.submit(&StatEvent::custom(identifier, value, measurement, formula, target));
    }

    pub fn record_gain(&self, identifier: &str, value: f32) {
        self.submit(&StatEvent::gain(identifier, value));
    }

    pub fn record_loss(&self, identifier: &str, value: f32) {
        self.submit(&StatEvent::loss(identifier, value));
    }

    pub fn record_keyword(&self, keyword: &str) {
        self.record_keyword_with(keyword, "");
    }

    pub fn record_keyword_with(&self, keyword: &str, fallback_target: &str) {
        let target = self.resolve_target(fallback_target);
        self.submit(&StatEvent::keyword(keyword, target));
    }

    /// Records a tap with no hold time.
    pub fn record_gesture(&self, identifier: &str) {
        self.record_gesture_with(identifier, 0.0, GestureKind::Tap, "");
    }

    pub fn record_gesture_with(
        &self,
        identifier: &str,
        hold_length: f32,
        kind: GestureKind,
        fallback_target: &str,
    ) {
        let target = self.resolve_target(fallback_target);
        self.submit(&StatEvent::gesture(identifier, kind, hold_length, target));
    }

    /// Starts timing a hold. A hold already in progress is discarded.
    pub fn record_hold_started(&mut self) {
        let now = self.clock.now();
        self.hold.start(now);
    }

    /// Ends the hold and records it as a [`GestureKind::Hold`] gesture.
    pub fn record_hold_complete(&mut self, identifier: &str) {
        let now = self.clock.now();
        self.hold.stop(now);

        let held = match self.options.hold_timing {
            HoldTiming::Measured => {
                let held = self.hold.elapsed();
                self.hold.reset();
                held
            }
            HoldTiming::LegacyGazeTimer => {
                let held = self.gaze.elapsed_at(now);
                tracing::debug!(
                    hold_secs = self.hold.elapsed().as_secs_f64(),
                    reported_secs = held.as_secs_f64(),
                    "hold length read from gaze timer"
                );
                self.gaze.reset();
                held
            }
        };

        self.record_gesture_with(identifier, seconds(held), GestureKind::Hold, "");
    }

    /// Starts timing a gaze on `target`. A gaze already in progress is
    /// discarded along with its target.
    pub fn record_gaze_on(&mut self, target: &str) {
        let now = self.clock.now();
        self.viewed = Some(target.to_string());
        self.gaze.start(now);
    }

    /// Ends the gaze and records how long the viewed object was looked at.
    pub fn record_gaze_off(&mut self) {
        let now = self.clock.now();
        let gazed = self.gaze.stop(now);
        let target = self.viewed.take().unwrap_or_else(|| {
            tracing::debug!("gaze ended without a viewed object");
            String::new()
        });

        self.submit(&StatEvent::gaze(target, seconds(gazed)));
        self.gaze.reset();
    }

    fn resolve_target(&self, fallback: &str) -> String {
        self.targets
            .current_target()
            .unwrap_or_else(|| fallback.to_string())
    }

    fn submit(&self, event: &StatEvent) {
        if self.options.verbose_logging {
            trace_event(event);
        }

        if let Err(err) = self.dispatcher.dispatch(event) {
            tracing::warn!(
                kind = %event.kind(),
                identifier = event.identifier(),
                code = err.code(),
                error = %err,
                "stat not recorded"
            );
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the backend takes single-precision seconds"
)]
fn seconds(duration: Duration) -> f32 {
    duration.as_secs_f64() as f32
}

fn trace_event(event: &StatEvent) {
    match event.kind() {
        StatKind::Gaze => tracing::info!(
            object = event.target(),
            seconds = event.value(),
            "object viewed"
        ),
        StatKind::Gesture => tracing::info!(
            identifier = event.identifier(),
            gesture = %event.gesture_kind().unwrap_or_default(),
            hold_length = event.hold_length(),
            object = event.target(),
            "gesture recorded"
        ),
        StatKind::Keyword => tracing::info!(
            keyword = event.identifier(),
            object = event.target(),
            "keyword recorded"
        ),
        StatKind::CustomStat | StatKind::Gain | StatKind::Loss => tracing::info!(
            kind = %event.kind(),
            identifier = event.identifier(),
            value = event.value(),
            measurement = event.measurement().ordinal(),
            formula = event.formula().ordinal(),
            object = event.target(),
            "stat recorded"
        ),
    }
}
