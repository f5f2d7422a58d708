//! Host-supplied "currently gazed object".

use std::cell::RefCell;
use std::rc::Rc;

/// Reports which object the user is looking at right now, if any.
///
/// The recorder reads this on every event that carries a target; the value
/// wins over any fallback target the caller passes.
pub trait TargetResolver {
    fn current_target(&self) -> Option<String>;
}

/// Resolver for hosts without gaze input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTarget;

impl TargetResolver for NoTarget {
    fn current_target(&self) -> Option<String> {
        None
    }
}

/// A shared slot the host's input loop writes the focused object into.
#[derive(Debug, Clone, Default)]
pub struct FocusSlot {
    current: Rc<RefCell<Option<String>>>,
}

impl FocusSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self, target: impl Into<String>) {
        *self.current.borrow_mut() = Some(target.into());
    }

    pub fn clear(&self) {
        self.current.borrow_mut().take();
    }
}

impl TargetResolver for FocusSlot {
    fn current_target(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}

impl<F> TargetResolver for F
where
    F: Fn() -> Option<String>,
{
    fn current_target(&self) -> Option<String> {
        self()
    }
}
