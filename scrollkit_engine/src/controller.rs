// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional bridge to external scroll controllers.
//!
//! A scroll controller is a scrollbar-like collaborator: it renders one
//! axis' scroll range and originates offset changes of its own. The engine
//! mirrors `(min_offset, max_offset, offset, viewport)` into attached
//! controllers whenever the view changes, and translates controller-
//! originated requests into ordinary view changes via
//! [`crate::ScrollEngine::controller_scroll_to`] and
//! [`crate::ScrollEngine::controller_scroll_with_velocity`].
//!
//! Mirroring is suppressed while controller-originated operations are still
//! in flight, so a controller does not observe (and echo back) intermediate
//! values of its own request.

use core::fmt;

/// The axis an attached controller drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollOrientation {
    /// The horizontal offset.
    Horizontal,
    /// The vertical offset.
    Vertical,
}

/// Contract implemented by external scroll controllers.
///
/// Implementations receive state mirrors from the engine; they originate
/// changes by calling the engine's `controller_*` methods with their
/// orientation.
pub trait ScrollController: fmt::Debug {
    /// Receives the engine's current scroll range and position for the
    /// controller's axis.
    fn set_values(&mut self, min_offset: f64, max_offset: f64, offset: f64, viewport: f64);
}

/// One attach point: a controller plus its outstanding-operations guard.
#[derive(Debug, Default)]
pub(crate) struct ControllerSlot {
    controller: Option<Box<dyn ScrollController>>,
    operations: u32,
}

impl ControllerSlot {
    pub(crate) fn attach(&mut self, controller: Option<Box<dyn ScrollController>>) {
        self.controller = controller;
        self.operations = 0;
    }

    pub(crate) fn begin_operation(&mut self) {
        self.operations += 1;
    }

    pub(crate) fn end_operation(&mut self) {
        self.operations = self.operations.saturating_sub(1);
    }

    /// Mirrors values into the controller unless its own operations are
    /// still outstanding.
    pub(crate) fn push(&mut self, min_offset: f64, max_offset: f64, offset: f64, viewport: f64) {
        if self.operations > 0 {
            return;
        }
        if let Some(controller) = &mut self.controller {
            controller.set_values(min_offset, max_offset, offset, viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerSlot, ScrollController};

    #[derive(Debug, Default)]
    struct Recording {
        calls: Vec<(f64, f64, f64, f64)>,
    }

    impl ScrollController for Recording {
        fn set_values(&mut self, min_offset: f64, max_offset: f64, offset: f64, viewport: f64) {
            self.calls.push((min_offset, max_offset, offset, viewport));
        }
    }

    // Shared recorder so the test can observe calls after attaching.
    #[derive(Debug, Clone, Default)]
    struct Shared(std::rc::Rc<std::cell::RefCell<Recording>>);

    impl ScrollController for Shared {
        fn set_values(&mut self, min_offset: f64, max_offset: f64, offset: f64, viewport: f64) {
            self.0
                .borrow_mut()
                .set_values(min_offset, max_offset, offset, viewport);
        }
    }

    #[test]
    fn push_reaches_attached_controller() {
        let recorder = Shared::default();
        let mut slot = ControllerSlot::default();
        slot.attach(Some(Box::new(recorder.clone())));

        slot.push(0.0, 500.0, 120.0, 400.0);
        assert_eq!(recorder.0.borrow().calls, vec![(0.0, 500.0, 120.0, 400.0)]);
    }

    #[test]
    fn push_is_suppressed_while_operations_outstanding() {
        let recorder = Shared::default();
        let mut slot = ControllerSlot::default();
        slot.attach(Some(Box::new(recorder.clone())));

        slot.begin_operation();
        slot.push(0.0, 500.0, 120.0, 400.0);
        assert!(recorder.0.borrow().calls.is_empty());

        slot.end_operation();
        slot.push(0.0, 500.0, 130.0, 400.0);
        assert_eq!(recorder.0.borrow().calls.len(), 1);
    }

    #[test]
    fn push_without_controller_is_a_no_op() {
        let mut slot = ControllerSlot::default();
        slot.push(0.0, 1.0, 0.0, 1.0);
        slot.end_operation();
    }
}
