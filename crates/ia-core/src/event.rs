//! Normalized telemetry records.

use serde::Serialize;

use crate::types::{Formula, GestureKind, Measurement, StatKind};

/// One recordable occurrence, normalized for submission.
///
/// Fields are private so an event cannot change between construction and
/// dispatch. Use the per-kind constructors; each fills in the defaults its
/// backend operation implies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEvent {
    kind: StatKind,
    identifier: String,
    value: f32,
    measurement: Measurement,
    formula: Formula,
    #[serde(skip_serializing_if = "Option::is_none")]
    gesture: Option<GestureDetail>,
    target: String,
}

/// Gesture-only fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureDetail {
    pub kind: GestureKind,
    /// Seconds the gesture was held.
    pub hold_length: f32,
}

/// Weight sent with keyword and gesture events.
pub const UNIT_WEIGHT: f32 = 1.0;

impl StatEvent {
    pub fn custom(
        identifier: impl Into<String>,
        value: f32,
        measurement: Measurement,
        formula: Formula,
        target: impl Into<String>,
    ) -> Self {
        Self {
            kind: StatKind::CustomStat,
            identifier: identifier.into(),
            value,
            measurement,
            formula,
            gesture: None,
            target: target.into(),
        }
    }

    pub fn gain(identifier: impl Into<String>, value: f32) -> Self {
        Self::counted(StatKind::Gain, identifier.into(), value, String::new())
    }

    pub fn loss(identifier: impl Into<String>, value: f32) -> Self {
        Self::counted(StatKind::Loss, identifier.into(), value, String::new())
    }

    pub fn keyword(keyword: impl Into<String>, target: impl Into<String>) -> Self {
        Self::counted(StatKind::Keyword, keyword.into(), UNIT_WEIGHT, target.into())
    }

    pub fn gesture(
        identifier: impl Into<String>,
        kind: GestureKind,
        hold_length: f32,
        target: impl Into<String>,
    ) -> Self {
        Self {
            gesture: Some(GestureDetail { kind, hold_length }),
            ..Self::counted(StatKind::Gesture, identifier.into(), UNIT_WEIGHT, target.into())
        }
    }

    /// Dwell on `target` for `seconds`. The gazed object is both the
    /// identifier and the target of the stat.
    pub fn gaze(target: impl Into<String>, seconds: f32) -> Self {
        let target = target.into();
        Self {
            kind: StatKind::Gaze,
            identifier: target.clone(),
            value: seconds,
            measurement: Measurement::Second,
            formula: Formula::Total,
            gesture: None,
            target,
        }
    }

    fn counted(kind: StatKind, identifier: String, value: f32, target: String) -> Self {
        Self {
            kind,
            identifier,
            value,
            measurement: Measurement::Count,
            formula: Formula::Total,
            gesture: None,
            target,
        }
    }

    pub const fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub const fn value(&self) -> f32 {
        self.value
    }

    pub const fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub const fn formula(&self) -> Formula {
        self.formula
    }

    /// Gesture kind; `None` for every other stat kind.
    pub fn gesture_kind(&self) -> Option<GestureKind> {
        self.gesture.map(|g| g.kind)
    }

    /// Seconds held; zero for non-gesture stats.
    pub fn hold_length(&self) -> f32 {
        self.gesture.map_or(0.0, |g| g.hold_length)
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_and_loss_are_count_total() {
        for event in [StatEvent::gain("HealthGained", 25.0), StatEvent::loss("StageFailed", 1.0)] {
            assert_eq!(event.measurement(), Measurement::Count);
            assert_eq!(event.formula(), Formula::Total);
            assert_eq!(event.target(), "");
            assert_eq!(event.gesture_kind(), None);
        }
    }

    #[test]
    fn keyword_value_is_unit_weight() {
        let event = StatEvent::keyword("Fire", "Cannon");
        assert_eq!(event.kind(), StatKind::Keyword);
        assert!((event.value() - 1.0).abs() < f32::EPSILON);
        assert_eq!(event.target(), "Cannon");
    }

    #[test]
    fn gesture_carries_kind_and_hold_length() {
        let event = StatEvent::gesture("Laser", GestureKind::Hold, 1.2, "");
        assert_eq!(event.gesture_kind(), Some(GestureKind::Hold));
        assert!((event.hold_length() - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn gaze_uses_target_as_identifier() {
        let event = StatEvent::gaze("Cube", 2.5);
        assert_eq!(event.identifier(), "Cube");
        assert_eq!(event.target(), "Cube");
        assert_eq!(event.measurement(), Measurement::Second);
    }

    #[test]
    fn serializes_for_trace_output() {
        let event = StatEvent::gesture("Laser", GestureKind::DoubleTap, 0.0, "Ship");
        let json = serde_json::to_string(&event).unwrap();
        insta::assert_snapshot!(json, @r#"{"kind":"gesture","identifier":"Laser","value":1.0,"measurement":"count","formula":"total","gesture":{"kind":"double_tap","hold_length":0.0},"target":"Ship"}"#);
    }
}
