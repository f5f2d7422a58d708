//! Per-object gaze tracking helper.

use crate::backend::AnalyticsBackend;
use crate::clock::Clock;
use crate::recorder::EventRecorder;
use crate::target::TargetResolver;

/// Identifier shared by spatial-mapping surfaces.
pub const MAPPING_IDENTIFIER: &str = "Mapping";

/// Attach one of these to each object whose gaze dwell should be recorded.
///
/// Objects given the same custom identifier are reported as a single stat,
/// which is how many small pieces of one thing (the surfaces of a spatial
/// map, the parts of a model) are grouped together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GazeTracker {
    custom_identifier: Option<String>,
}

impl GazeTracker {
    /// Reports under each object's own name.
    pub const fn new() -> Self {
        Self {
            custom_identifier: None,
        }
    }

    /// Reports every tracked object under `identifier`.
    pub fn grouped(identifier: impl Into<String>) -> Self {
        Self {
            custom_identifier: Some(identifier.into()),
        }
    }

    /// Tracker for spatial-mapping surfaces.
    pub fn mapping() -> Self {
        Self::grouped(MAPPING_IDENTIFIER)
    }

    pub fn custom_identifier(&self) -> Option<&str> {
        self.custom_identifier.as_deref()
    }

    /// Name the gaze on `object_name` is recorded under.
    pub fn identifier_for<'a>(&'a self, object_name: &'a str) -> &'a str {
        self.custom_identifier.as_deref().unwrap_or(object_name)
    }

    /// Gaze entered the object.
    pub fn enter<B, T, C>(&self, recorder: &mut EventRecorder<B, T, C>, object_name: &str)
    where
        B: AnalyticsBackend,
        T: TargetResolver,
        C: Clock,
    {
        recorder.record_gaze_on(self.identifier_for(object_name));
    }

    /// Gaze left the object.
    pub fn exit<B, T, C>(&self, recorder: &mut EventRecorder<B, T, C>)
    where
        B: AnalyticsBackend,
        T: TargetResolver,
        C: Clock,
    {
        recorder.record_gaze_off();
    }
}
