//! Backend error lookups.

use crate::backend::AnalyticsBackend;

/// Reads error descriptions from the backend. Nothing is cached; every call
/// goes to the backend.
#[derive(Debug)]
pub struct ErrorResolver<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B: AnalyticsBackend + ?Sized> ErrorResolver<'a, B> {
    pub const fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Backend description of `code`. Only positive codes are errors, so
    /// anything else yields `None` without consulting the backend.
    pub fn message_for(&self, code: i32) -> Option<String> {
        (code > 0).then(|| self.backend.error_message(code))
    }

    /// The backend's most recent error description.
    ///
    /// This slot is global to the backend: if calls interleave, it need not
    /// belong to the caller's last submission.
    pub fn last_message(&self) -> String {
        self.backend.last_error_message()
    }
}
