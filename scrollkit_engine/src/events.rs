// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notification payloads and the listener registry.
//!
//! The engine notifies consumers through an explicit subscribe/unsubscribe
//! registry: [`crate::ScrollEngine::subscribe_view_changed`] and friends
//! return a [`Subscription`] handle, and any number of independent listeners
//! can observe the same event.
//!
//! Ordering contract: for every accepted request, its `Changing*`
//! notification fires before any state is committed, and its completion
//! fires exactly once afterwards. Completions within an axis group fire in
//! the order their requests finished or were superseded, never out of order.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use scrollkit_view::{AnchorCandidate, AnchorDecision, ElementId};

use crate::engine::EngineCx;
use crate::request::{ChangeId, ChangeResult};

/// The two independently animated request groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisGroup {
    /// Horizontal and vertical offsets, which transition together.
    Offsets,
    /// The zoom factor.
    ZoomFactor,
}

/// The state of one axis group's transition machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// No transition is in flight.
    #[default]
    Idle,
    /// The user is directly manipulating the view.
    Interacting,
    /// A requested transition is animating.
    Animating,
    /// The view is settling onto a mandatory snap point after a user
    /// interaction ended.
    Snapping,
}

/// The content extent changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtentChanged {
    /// New unzoomed content extent, width then height.
    pub extent: (f64, f64),
}

/// An axis group's transition state changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateChanged {
    /// The group whose state changed.
    pub group: AxisGroup,
    /// The new state.
    pub state: InteractionState,
}

/// The view moved: offsets or zoom factor changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewChanged {
    /// Current horizontal offset.
    pub horizontal_offset: f64,
    /// Current vertical offset.
    pub vertical_offset: f64,
    /// Current zoom factor.
    pub zoom_factor: f32,
}

/// An offsets change is about to be committed.
///
/// Handlers may shorten or lengthen an animated transition through
/// `duration_ms`, or set `cancel` to abandon the change before anything is
/// applied; a cancelled request completes as interrupted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChangingOffsets {
    /// The id assigned to this request.
    pub change_id: ChangeId,
    /// Offsets at the start of the transition, horizontal then vertical.
    pub start: (f64, f64),
    /// Target offsets after clamping and snap resolution.
    pub end: (f64, f64),
    /// Whether the transition animates.
    pub animated: bool,
    /// Animation duration; `None` for non-animated changes. Mutable by
    /// handlers; overrides below one millisecond are treated as one.
    pub duration_ms: Option<u64>,
    /// Set by a handler to abandon the change.
    pub cancel: bool,
}

/// A zoom factor change is about to be committed.
///
/// Same override and cancellation semantics as [`ChangingOffsets`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChangingZoomFactor {
    /// The id assigned to this request.
    pub change_id: ChangeId,
    /// Zoom factor at the start of the transition.
    pub start: f32,
    /// Target zoom factor after clamping and snap resolution.
    pub end: f32,
    /// The viewport point held stationary during the zoom.
    pub center_point: Point,
    /// Whether the transition animates.
    pub animated: bool,
    /// Animation duration; `None` for non-animated changes. Mutable by
    /// handlers.
    pub duration_ms: Option<u64>,
    /// Set by a handler to abandon the change.
    pub cancel: bool,
}

/// An offsets request reached a terminal result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCompleted {
    /// The id of the completed request.
    pub change_id: ChangeId,
    /// How the request ended.
    pub result: ChangeResult,
}

/// A zoom factor request reached a terminal result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomCompleted {
    /// The id of the completed request.
    pub change_id: ChangeId,
    /// How the request ended.
    pub result: ChangeResult,
}

/// Anchoring is being evaluated; handlers supply candidates.
///
/// Fired at the start of [`crate::ScrollEngine::evaluate_anchoring`].
/// Handlers push additional candidates or pin an explicit anchor element,
/// which takes precedence over ratio-based selection.
#[derive(Debug, PartialEq)]
pub struct AnchorRequested {
    /// Candidate elements considered for anchoring, in priority order.
    pub candidates: Vec<AnchorCandidate>,
    /// Explicit anchor element, used unconditionally when set.
    pub pinned: Option<ElementId>,
}

/// Anchoring was evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorEvaluated {
    /// The selected anchor, if any.
    pub decision: AnchorDecision,
}

/// Which event a [`Subscription`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// [`ExtentChanged`].
    ExtentChanged,
    /// [`StateChanged`].
    StateChanged,
    /// [`ViewChanged`].
    ViewChanged,
    /// [`ChangingOffsets`].
    ChangingOffsets,
    /// [`ChangingZoomFactor`].
    ChangingZoomFactor,
    /// [`ScrollCompleted`].
    ScrollCompleted,
    /// [`ZoomCompleted`].
    ZoomCompleted,
    /// [`AnchorRequested`].
    AnchorRequested,
    /// [`AnchorEvaluated`].
    AnchorEvaluated,
}

/// Handle identifying one registered listener.
///
/// Pass it to [`crate::ScrollEngine::unsubscribe`] to stop receiving the
/// event. Handles are never reused within an engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub(crate) kind: EventKind,
    pub(crate) id: u64,
}

impl Subscription {
    /// Returns the event this subscription listens to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

type Handler<T> = Box<dyn FnMut(&mut EngineCx<'_>, &mut T)>;

/// Ordered listener list for one event type.
///
/// Listeners run in subscription order. Removal is by id, so handles stay
/// valid across other unsubscriptions.
pub(crate) struct Listeners<T> {
    // Most hosts attach zero or one listener per event.
    entries: SmallVec<[(u64, Handler<T>); 1]>,
}

impl<T> Listeners<T> {
    pub(crate) fn subscribe(&mut self, id: u64, handler: Handler<T>) {
        self.entries.push((id, handler));
    }

    pub(crate) fn unsubscribe(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn call(&mut self, cx: &mut EngineCx<'_>, payload: &mut T) {
        for (_, handler) in &mut self.entries {
            handler(cx, payload);
        }
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// All listener lists of one engine, plus the handle allocator.
#[derive(Debug, Default)]
pub(crate) struct EngineListeners {
    next_id: u64,
    pub(crate) extent_changed: Listeners<ExtentChanged>,
    pub(crate) state_changed: Listeners<StateChanged>,
    pub(crate) view_changed: Listeners<ViewChanged>,
    pub(crate) changing_offsets: Listeners<ChangingOffsets>,
    pub(crate) changing_zoom_factor: Listeners<ChangingZoomFactor>,
    pub(crate) scroll_completed: Listeners<ScrollCompleted>,
    pub(crate) zoom_completed: Listeners<ZoomCompleted>,
    pub(crate) anchor_requested: Listeners<AnchorRequested>,
    pub(crate) anchor_evaluated: Listeners<AnchorEvaluated>,
}

impl EngineListeners {
    pub(crate) fn next_handle(&mut self, kind: EventKind) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        Subscription { kind, id }
    }

    pub(crate) fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let id = subscription.id;
        match subscription.kind {
            EventKind::ExtentChanged => self.extent_changed.unsubscribe(id),
            EventKind::StateChanged => self.state_changed.unsubscribe(id),
            EventKind::ViewChanged => self.view_changed.unsubscribe(id),
            EventKind::ChangingOffsets => self.changing_offsets.unsubscribe(id),
            EventKind::ChangingZoomFactor => self.changing_zoom_factor.unsubscribe(id),
            EventKind::ScrollCompleted => self.scroll_completed.unsubscribe(id),
            EventKind::ZoomCompleted => self.zoom_completed.unsubscribe(id),
            EventKind::AnchorRequested => self.anchor_requested.unsubscribe(id),
            EventKind::AnchorEvaluated => self.anchor_evaluated.unsubscribe(id),
        }
    }
}
