// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scroll/zoom interaction engine.

use core::fmt;
use std::collections::VecDeque;

use kurbo::{Point, Rect};
use scrollkit_snap_points::{SnapAxis, SnapPoint, SnapPointError, SnapPointRegistry};
use scrollkit_view::{AnchorCandidate, AnchorConfig, AnchorDecision, ViewState, position_correction};

use crate::controller::{ControllerSlot, ScrollController, ScrollOrientation};
use crate::diagnostics::{DiagnosticsArea, DiagnosticsConfig, DiagnosticsLevel};
use crate::events::{
    AnchorEvaluated, AnchorRequested, AxisGroup, ChangingOffsets, ChangingZoomFactor,
    EngineListeners, EventKind, ExtentChanged, InteractionState, ScrollCompleted, StateChanged,
    Subscription, ViewChanged, ZoomCompleted,
};
use crate::request::{
    AnimationMode, ChangeId, ChangeResult, InputKinds, OffsetsChange, OffsetsVelocityChange,
    RequestError, SnapPointsMode, TargetKind, ZoomFactorChange, ZoomVelocityChange,
};
use crate::velocity::{
    DEFAULT_INERTIA_DECAY_RATE, MouseWheelConfig, VelocityProfile, inertia_displacement,
    velocity_for_displacement,
};

/// Logical pixels one scrolled line advances the vertical offset.
const WHEEL_LINE_HEIGHT: f64 = 16.0;

/// Logical pixels one scrolled character advances the horizontal offset.
const WHEEL_CHAR_WIDTH: f64 = 8.0;

/// Where a request originated, for completion bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trigger {
    /// Submitted through the public request API.
    Direct,
    /// Originated by the scroll controller on the given axis.
    Controller(ScrollOrientation),
}

#[derive(Clone, Copy, Debug)]
struct OffsetsTransition {
    id: ChangeId,
    start: (f64, f64),
    end: (f64, f64),
    duration_ms: u64,
    started_at: Option<u64>,
    trigger: Trigger,
}

#[derive(Clone, Copy, Debug)]
struct ZoomTransition {
    id: ChangeId,
    start_zoom: f32,
    end_zoom: f32,
    start_offsets: (f64, f64),
    center: Point,
    duration_ms: u64,
    started_at: Option<u64>,
}

#[derive(Debug)]
enum RequestPayload {
    Offsets(OffsetsChange),
    OffsetsVelocity(OffsetsVelocityChange),
    Zoom(ZoomFactorChange),
    ZoomVelocity(ZoomVelocityChange),
}

#[derive(Debug)]
struct QueuedRequest {
    id: ChangeId,
    payload: RequestPayload,
}

/// Context handed to notification handlers.
///
/// Handlers cannot touch the engine re-entrantly; instead they submit
/// follow-up requests here. Each submission is validated and assigned its
/// change id immediately, then processed in FIFO order once the current
/// notification finishes dispatching.
pub struct EngineCx<'a> {
    next_change_id: &'a mut i32,
    queued: &'a mut VecDeque<QueuedRequest>,
}

impl EngineCx<'_> {
    /// Queues an offsets change; see [`ScrollEngine::change_offsets`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite targets.
    pub fn change_offsets(&mut self, change: OffsetsChange) -> Result<ChangeId, RequestError> {
        validate_offsets_change(&change)?;
        Ok(self.queue(RequestPayload::Offsets(change)))
    }

    /// Queues a velocity-driven offsets change; see
    /// [`ScrollEngine::change_offsets_with_additional_velocity`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite velocities.
    pub fn change_offsets_with_additional_velocity(
        &mut self,
        change: OffsetsVelocityChange,
    ) -> Result<ChangeId, RequestError> {
        validate_offsets_velocity(&change)?;
        Ok(self.queue(RequestPayload::OffsetsVelocity(change)))
    }

    /// Queues a zoom factor change; see [`ScrollEngine::change_zoom_factor`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite targets.
    pub fn change_zoom_factor(
        &mut self,
        change: ZoomFactorChange,
    ) -> Result<ChangeId, RequestError> {
        validate_zoom_change(&change)?;
        Ok(self.queue(RequestPayload::Zoom(change)))
    }

    /// Queues a velocity-driven zoom change; see
    /// [`ScrollEngine::change_zoom_factor_with_additional_velocity`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite velocities.
    pub fn change_zoom_factor_with_additional_velocity(
        &mut self,
        change: ZoomVelocityChange,
    ) -> Result<ChangeId, RequestError> {
        validate_zoom_velocity(&change)?;
        Ok(self.queue(RequestPayload::ZoomVelocity(change)))
    }

    fn queue(&mut self, payload: RequestPayload) -> ChangeId {
        let id = allocate_change_id(self.next_change_id);
        self.queued.push_back(QueuedRequest { id, payload });
        id
    }
}

impl fmt::Debug for EngineCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCx")
            .field("next_change_id", &self.next_change_id)
            .field("queued", &self.queued.len())
            .finish()
    }
}

/// Dispatches one event payload through its listener list.
///
/// The list is taken out for the duration of the call so handlers can queue
/// requests through [`EngineCx`] without aliasing the engine.
macro_rules! dispatch {
    ($engine:ident, $field:ident, $payload:expr) => {{
        let mut listeners = core::mem::take(&mut $engine.listeners.$field);
        let mut cx = EngineCx {
            next_change_id: &mut $engine.next_change_id,
            queued: &mut $engine.queued,
        };
        listeners.call(&mut cx, $payload);
        $engine.listeners.$field = listeners;
    }};
}

/// Headless scroll/zoom interaction engine.
///
/// The engine owns the [`ViewState`], arbitrates view-change requests,
/// resolves snap points, and reports progress through subscribed listeners.
/// It is single-threaded and tick-driven: hosts call
/// [`ScrollEngine::on_tick`] with a monotonic millisecond clock to advance
/// animated transitions.
///
/// ```rust
/// use scrollkit_engine::{DiagnosticsConfig, OffsetsChange, ScrollEngine};
///
/// let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
/// engine.set_content_extent(400.0, 2000.0);
///
/// let id = engine.change_offsets(OffsetsChange::absolute(0.0, 5000.0)).unwrap();
/// assert!(id.get() >= 0);
///
/// // Drive the animation; the target clamps to the settled range.
/// engine.on_tick(0);
/// engine.on_tick(5000);
/// assert_eq!(engine.view().vertical_offset(), 1500.0);
/// ```
pub struct ScrollEngine {
    view: ViewState,
    snap_points: SnapPointRegistry,
    anchor: AnchorConfig,
    offsets_profile: VelocityProfile,
    zoom_profile: VelocityProfile,
    wheel: MouseWheelConfig,
    ignored_input: InputKinds,
    diagnostics: DiagnosticsConfig,
    listeners: EngineListeners,
    next_change_id: i32,
    queued: VecDeque<QueuedRequest>,
    offsets_transition: Option<OffsetsTransition>,
    zoom_transition: Option<ZoomTransition>,
    offsets_state: InteractionState,
    zoom_state: InteractionState,
    user_interacting: bool,
    horizontal_controller: ControllerSlot,
    vertical_controller: ControllerSlot,
}

impl ScrollEngine {
    /// Creates an engine over the given viewport.
    ///
    /// `diagnostics` is owned by the host; a fully disabled configuration
    /// never alters behavior.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64, diagnostics: DiagnosticsConfig) -> Self {
        Self {
            view: ViewState::new(viewport_width, viewport_height),
            snap_points: SnapPointRegistry::new(),
            anchor: AnchorConfig::new(),
            offsets_profile: VelocityProfile::OFFSETS,
            zoom_profile: VelocityProfile::ZOOM_FACTOR,
            wheel: MouseWheelConfig::default(),
            ignored_input: InputKinds::empty(),
            diagnostics,
            listeners: EngineListeners::default(),
            next_change_id: 1,
            queued: VecDeque::new(),
            offsets_transition: None,
            zoom_transition: None,
            offsets_state: InteractionState::Idle,
            zoom_state: InteractionState::Idle,
            user_interacting: false,
            horizontal_controller: ControllerSlot::default(),
            vertical_controller: ControllerSlot::default(),
        }
    }

    /// Returns the current view state.
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the transition state of an axis group.
    #[must_use]
    pub fn state(&self, group: AxisGroup) -> InteractionState {
        match group {
            AxisGroup::Offsets => self.offsets_state,
            AxisGroup::ZoomFactor => self.zoom_state,
        }
    }

    // --- Configuration -----------------------------------------------------

    /// Registers a snap point.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapPointError`] for malformed snap points; the registry
    /// is left unchanged.
    pub fn add_snap_point(
        &mut self,
        axis: SnapAxis,
        point: SnapPoint,
    ) -> Result<(), SnapPointError> {
        self.snap_points.add(axis, point)
    }

    /// Removes the snap point at `index` on `axis`, if present.
    pub fn remove_snap_point(&mut self, axis: SnapAxis, index: usize) -> Option<SnapPoint> {
        self.snap_points.remove(axis, index)
    }

    /// Removes all snap points on `axis`.
    pub fn clear_snap_points(&mut self, axis: SnapAxis) {
        self.snap_points.clear(axis);
    }

    /// Returns the registered snap points on `axis`, in order.
    #[must_use]
    pub fn snap_points(&self, axis: SnapAxis) -> &[SnapPoint] {
        self.snap_points.points(axis)
    }

    /// Returns the anchoring configuration.
    #[must_use]
    pub fn anchor_config(&self) -> &AnchorConfig {
        &self.anchor
    }

    /// Returns the anchoring configuration for mutation (ratios, extent-edge
    /// flags, pinning).
    pub fn anchor_config_mut(&mut self) -> &mut AnchorConfig {
        &mut self.anchor
    }

    /// Returns the offsets distance-to-duration profile.
    #[must_use]
    pub fn offsets_velocity_profile(&self) -> VelocityProfile {
        self.offsets_profile
    }

    /// Sets the offsets distance-to-duration profile.
    pub fn set_offsets_velocity_profile(&mut self, profile: VelocityProfile) {
        self.offsets_profile = profile;
    }

    /// Returns the zoom factor distance-to-duration profile.
    #[must_use]
    pub fn zoom_factor_velocity_profile(&self) -> VelocityProfile {
        self.zoom_profile
    }

    /// Sets the zoom factor distance-to-duration profile.
    pub fn set_zoom_factor_velocity_profile(&mut self, profile: VelocityProfile) {
        self.zoom_profile = profile;
    }

    /// Returns the mouse wheel configuration.
    #[must_use]
    pub fn mouse_wheel_config(&self) -> MouseWheelConfig {
        self.wheel
    }

    /// Sets the mouse wheel configuration.
    pub fn set_mouse_wheel_config(&mut self, config: MouseWheelConfig) {
        self.wheel = config;
    }

    /// Returns the input classes the engine ignores.
    #[must_use]
    pub fn ignored_input_kinds(&self) -> InputKinds {
        self.ignored_input
    }

    /// Sets the input classes the engine ignores.
    pub fn set_ignored_input_kinds(&mut self, kinds: InputKinds) {
        self.ignored_input = kinds;
    }

    /// Returns the diagnostics configuration.
    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsConfig {
        &self.diagnostics
    }

    // --- Geometry ----------------------------------------------------------

    /// Sets the viewport size, re-clamping offsets.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let before = self.offsets();
        self.view.set_viewport(width, height);
        if self.offsets() != before {
            self.emit_view_changed();
        }
        self.push_controller_values();
        self.process_queued();
    }

    /// Sets the unzoomed content extent.
    ///
    /// Fires [`ExtentChanged`]; offsets re-clamp against the new extent.
    /// Anchoring is evaluated separately via
    /// [`ScrollEngine::evaluate_anchoring`] so hosts can capture anchor
    /// bounds before and after their layout pass.
    pub fn set_content_extent(&mut self, width: f64, height: f64) {
        if self.view.extent() == (width.max(0.0), height.max(0.0)) {
            return;
        }
        let before = self.offsets();
        self.view.set_extent(width, height);
        let mut payload = ExtentChanged {
            extent: self.view.extent(),
        };
        dispatch!(self, extent_changed, &mut payload);
        if self.offsets() != before {
            self.emit_view_changed();
        }
        self.push_controller_values();
        self.process_queued();
    }

    /// Sets the zoom factor limits.
    ///
    /// The current zoom factor clamps into the new range and offsets
    /// re-clamp against the resulting scaled extent.
    pub fn set_zoom_limits(&mut self, min: f32, max: f32) {
        let before_zoom = self.view.zoom_factor();
        let before_offsets = self.offsets();
        self.view.set_zoom_limits(min, max);
        if self.view.zoom_factor() != before_zoom || self.offsets() != before_offsets {
            self.emit_view_changed();
            self.push_controller_values();
        }
        self.process_queued();
    }

    // --- Request submission ------------------------------------------------

    /// Requests an offsets change.
    ///
    /// Targets clamp silently into `[0, max(0, extent * zoom - viewport)]`
    /// per axis and, when the request respects snap points, resolve through
    /// the registry. The change id is assigned and returned before any
    /// transition starts; an in-flight offsets request is interrupted first
    /// and its completion fires before this request's notifications.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] when a target is NaN or
    /// infinite; nothing is mutated and no id is issued.
    pub fn change_offsets(&mut self, change: OffsetsChange) -> Result<ChangeId, RequestError> {
        validate_offsets_change(&change)?;
        let id = allocate_change_id(&mut self.next_change_id);
        self.diagnostics.emit(
            DiagnosticsArea::ViewChanges,
            DiagnosticsLevel::Info,
            format_args!("change_offsets id={} target=({}, {})", id.get(), change.horizontal, change.vertical),
        );
        self.process_offsets(id, change, Trigger::Direct);
        self.process_queued();
        Ok(id)
    }

    /// Requests an offsets change from an additional velocity.
    ///
    /// The velocity is projected to a displacement via the inertia model and
    /// animated like a relative [`ScrollEngine::change_offsets`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite velocities.
    pub fn change_offsets_with_additional_velocity(
        &mut self,
        change: OffsetsVelocityChange,
    ) -> Result<ChangeId, RequestError> {
        validate_offsets_velocity(&change)?;
        let id = allocate_change_id(&mut self.next_change_id);
        self.process_offsets_velocity(id, change, Trigger::Direct);
        self.process_queued();
        Ok(id)
    }

    /// Requests a zoom factor change.
    ///
    /// The target clamps into the configured zoom limits; `center_point`
    /// (viewport coordinates, defaulting to the viewport center) stays
    /// stationary on screen while the zoom changes.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite targets.
    pub fn change_zoom_factor(
        &mut self,
        change: ZoomFactorChange,
    ) -> Result<ChangeId, RequestError> {
        validate_zoom_change(&change)?;
        let id = allocate_change_id(&mut self.next_change_id);
        self.process_zoom(id, change);
        self.process_queued();
        Ok(id)
    }

    /// Requests a zoom factor change from an additional velocity.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite velocities.
    pub fn change_zoom_factor_with_additional_velocity(
        &mut self,
        change: ZoomVelocityChange,
    ) -> Result<ChangeId, RequestError> {
        validate_zoom_velocity(&change)?;
        let id = allocate_change_id(&mut self.next_change_id);
        self.process_zoom_velocity(id, change);
        self.process_queued();
        Ok(id)
    }

    /// Scrolls from mouse wheel deltas (one notch is conventionally ±120).
    ///
    /// Deltas convert to scrolled lines/chars per the wheel configuration
    /// and ride the velocity path with the wheel inertia decay rate.
    /// Returns `Ok(None)` when mouse wheel input is ignored or the deltas
    /// are too small to scroll.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for non-finite deltas.
    pub fn mouse_wheel_scroll(
        &mut self,
        delta_horizontal: f64,
        delta_vertical: f64,
    ) -> Result<Option<ChangeId>, RequestError> {
        if !delta_horizontal.is_finite() || !delta_vertical.is_finite() {
            return Err(RequestError::InvalidTarget);
        }
        if self.ignored_input.contains(InputKinds::MOUSE_WHEEL) {
            return Ok(None);
        }
        let units_h = f64::from(self.wheel.velocity_units_for_delta(delta_horizontal));
        let units_v = f64::from(self.wheel.velocity_units_for_delta(delta_vertical));
        if units_h == 0.0 && units_v == 0.0 {
            return Ok(None);
        }

        // One velocity unit scrolls `scroll_lines` lines (or `scroll_chars`
        // characters horizontally); the wheel decay rate converts that
        // displacement back into the velocity that coasts exactly as far.
        let decay = self.wheel.inertia_decay_rate;
        let displacement_h = units_h * f64::from(self.wheel.scroll_chars) * WHEEL_CHAR_WIDTH;
        let displacement_v = units_v * f64::from(self.wheel.scroll_lines) * WHEEL_LINE_HEIGHT;
        let change = OffsetsVelocityChange {
            horizontal_velocity: velocity_for_displacement(displacement_h, decay),
            vertical_velocity: velocity_for_displacement(displacement_v, decay),
            inertia_decay_rate: Some(decay),
        };
        self.change_offsets_with_additional_velocity(change).map(Some)
    }

    // --- Scroll controllers ------------------------------------------------

    /// Attaches (or detaches) the horizontal scroll controller.
    ///
    /// The controller immediately receives the current values.
    pub fn set_horizontal_scroll_controller(
        &mut self,
        controller: Option<Box<dyn ScrollController>>,
    ) {
        self.horizontal_controller.attach(controller);
        self.push_controller_values();
    }

    /// Attaches (or detaches) the vertical scroll controller.
    pub fn set_vertical_scroll_controller(&mut self, controller: Option<Box<dyn ScrollController>>) {
        self.vertical_controller.attach(controller);
        self.push_controller_values();
    }

    /// Handles a controller-originated absolute offset request.
    ///
    /// Value mirroring to the originating controller is suppressed until the
    /// resulting request completes.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for a non-finite offset.
    pub fn controller_scroll_to(
        &mut self,
        orientation: ScrollOrientation,
        offset: f64,
        animation: AnimationMode,
    ) -> Result<ChangeId, RequestError> {
        let change = self.controller_offsets_change(orientation, offset, animation);
        validate_offsets_change(&change)?;
        let id = allocate_change_id(&mut self.next_change_id);
        self.controller_slot(orientation).begin_operation();
        self.diagnostics.emit(
            DiagnosticsArea::Controllers,
            DiagnosticsLevel::Info,
            format_args!("controller {orientation:?} scroll to {offset} as id={}", id.get()),
        );
        self.process_offsets(id, change, Trigger::Controller(orientation));
        self.process_queued();
        Ok(id)
    }

    /// Handles a controller-originated velocity request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidTarget`] for a non-finite velocity or
    /// decay rate.
    pub fn controller_scroll_with_velocity(
        &mut self,
        orientation: ScrollOrientation,
        velocity: f32,
        inertia_decay_rate: Option<f32>,
    ) -> Result<ChangeId, RequestError> {
        let change = match orientation {
            ScrollOrientation::Horizontal => OffsetsVelocityChange {
                horizontal_velocity: velocity,
                vertical_velocity: 0.0,
                inertia_decay_rate,
            },
            ScrollOrientation::Vertical => OffsetsVelocityChange {
                horizontal_velocity: 0.0,
                vertical_velocity: velocity,
                inertia_decay_rate,
            },
        };
        validate_offsets_velocity(&change)?;
        let id = allocate_change_id(&mut self.next_change_id);
        self.controller_slot(orientation).begin_operation();
        self.process_offsets_velocity(id, change, Trigger::Controller(orientation));
        self.process_queued();
        Ok(id)
    }

    // --- User interaction --------------------------------------------------

    /// Marks the start of a direct user manipulation.
    ///
    /// In-flight transitions are interrupted; their completions fire
    /// immediately. While the interaction lasts, hosts report the user's
    /// movement as non-animated changes with snap points ignored; the view
    /// settles onto snap points when the interaction ends.
    pub fn begin_user_interaction(&mut self) {
        if self.user_interacting {
            return;
        }
        self.user_interacting = true;
        if let Some(transition) = self.offsets_transition.take() {
            self.set_offsets_state(InteractionState::Interacting);
            self.complete_offsets(transition.id, transition.trigger, ChangeResult::Interrupted);
        } else {
            self.set_offsets_state(InteractionState::Interacting);
        }
        if let Some(transition) = self.zoom_transition.take() {
            self.set_zoom_state(InteractionState::Interacting);
            self.complete_zoom(transition.id, ChangeResult::Interrupted);
        } else {
            self.set_zoom_state(InteractionState::Interacting);
        }
        self.process_queued();
    }

    /// Marks the end of a direct user manipulation.
    ///
    /// The view settles onto applicable snap points: offsets and zoom move
    /// through a snapping transition when the resolved position differs
    /// from where the user left them.
    pub fn end_user_interaction(&mut self) {
        if !self.user_interacting {
            return;
        }
        self.user_interacting = false;

        let (viewport_width, viewport_height) = self.view.viewport();
        let current = self.offsets();
        let settled = (
            self.view.clamp_horizontal(self.snap_points.resolve(
                SnapAxis::HorizontalOffset,
                current.0,
                viewport_width,
            )),
            self.view.clamp_vertical(self.snap_points.resolve(
                SnapAxis::VerticalOffset,
                current.1,
                viewport_height,
            )),
        );
        if settled != current {
            let distance = (settled.0 - current.0).hypot(settled.1 - current.1);
            self.offsets_transition = Some(OffsetsTransition {
                id: ChangeId::NONE,
                start: current,
                end: settled,
                duration_ms: self.offsets_profile.duration_ms(distance).max(1),
                started_at: None,
                trigger: Trigger::Direct,
            });
            self.set_offsets_state(InteractionState::Snapping);
        } else {
            self.set_offsets_state(InteractionState::Idle);
        }

        let zoom = self.view.zoom_factor();
        let settled_zoom = self.view.clamp_zoom_factor(self.snap_points.resolve(
            SnapAxis::ZoomFactor,
            f64::from(zoom),
            0.0,
        ) as f32);
        if settled_zoom != zoom {
            let distance = f64::from((settled_zoom - zoom).abs());
            self.zoom_transition = Some(ZoomTransition {
                id: ChangeId::NONE,
                start_zoom: zoom,
                end_zoom: settled_zoom,
                start_offsets: self.offsets(),
                center: self.viewport_center(),
                duration_ms: self.zoom_profile.duration_ms(distance).max(1),
                started_at: None,
            });
            self.set_zoom_state(InteractionState::Snapping);
        } else {
            self.set_zoom_state(InteractionState::Idle);
        }
        self.process_queued();
    }

    // --- Anchoring ---------------------------------------------------------

    /// Evaluates content anchoring against the given candidates.
    ///
    /// Fires [`AnchorRequested`] so listeners can add candidates or pin an
    /// explicit anchor, then [`AnchorEvaluated`] with the decision. Returns
    /// a non-anchored decision without firing anything while the user is
    /// directly manipulating the view.
    pub fn evaluate_anchoring(&mut self, candidates: Vec<AnchorCandidate>) -> AnchorDecision {
        if self.user_interacting {
            return AnchorDecision::none();
        }
        let mut request = AnchorRequested {
            candidates,
            pinned: self.anchor.pinned,
        };
        dispatch!(self, anchor_requested, &mut request);

        let mut config = self.anchor;
        config.pinned = request.pinned;
        let decision = config.evaluate(&self.view, &request.candidates);
        self.diagnostics.emit(
            DiagnosticsArea::Anchoring,
            DiagnosticsLevel::Info,
            format_args!("anchor decision: {decision:?}"),
        );

        let mut evaluated = AnchorEvaluated { decision };
        dispatch!(self, anchor_evaluated, &mut evaluated);
        self.process_queued();
        decision
    }

    /// Applies the anchor element's movement across a layout change.
    ///
    /// `pre_bounds`/`post_bounds` are the anchor's bounds before and after
    /// the change; their position delta shifts the offsets so the element
    /// stays visually fixed. The shift accumulates into the layout offsets
    /// readable via [`ViewState::layout_offsets`].
    pub fn apply_anchor_correction(&mut self, pre_bounds: Rect, post_bounds: Rect) {
        let delta = position_correction(pre_bounds, post_bounds);
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }
        self.view.apply_layout_correction(delta.x, delta.y);
        self.diagnostics.emit(
            DiagnosticsArea::Anchoring,
            DiagnosticsLevel::Verbose,
            format_args!("anchor correction ({}, {})", delta.x, delta.y),
        );
        self.emit_view_changed();
        self.push_controller_values();
        self.process_queued();
    }

    // --- Animation driving -------------------------------------------------

    /// Advances animated transitions to `now_ms` (a monotonic millisecond
    /// clock).
    ///
    /// Transitions interpolate with an ease-in-out curve and complete once
    /// their duration elapses. Requests queued by handlers during the tick
    /// are processed afterwards, preserving FIFO order.
    pub fn on_tick(&mut self, now_ms: u64) {
        self.tick_offsets(now_ms);
        self.tick_zoom(now_ms);
        self.process_queued();
    }

    // --- Subscriptions -----------------------------------------------------

    /// Subscribes to [`ExtentChanged`].
    pub fn subscribe_extent_changed(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut ExtentChanged) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::ExtentChanged);
        self.listeners.extent_changed.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`StateChanged`].
    pub fn subscribe_state_changed(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut StateChanged) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::StateChanged);
        self.listeners.state_changed.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`ViewChanged`].
    pub fn subscribe_view_changed(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut ViewChanged) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::ViewChanged);
        self.listeners.view_changed.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`ChangingOffsets`].
    ///
    /// Handlers may override the animation duration or cancel the change.
    pub fn subscribe_changing_offsets(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut ChangingOffsets) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::ChangingOffsets);
        self.listeners.changing_offsets.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`ChangingZoomFactor`].
    pub fn subscribe_changing_zoom_factor(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut ChangingZoomFactor) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::ChangingZoomFactor);
        self.listeners.changing_zoom_factor.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`ScrollCompleted`].
    pub fn subscribe_scroll_completed(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut ScrollCompleted) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::ScrollCompleted);
        self.listeners.scroll_completed.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`ZoomCompleted`].
    pub fn subscribe_zoom_completed(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut ZoomCompleted) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::ZoomCompleted);
        self.listeners.zoom_completed.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`AnchorRequested`].
    pub fn subscribe_anchor_requested(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut AnchorRequested) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::AnchorRequested);
        self.listeners.anchor_requested.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Subscribes to [`AnchorEvaluated`].
    pub fn subscribe_anchor_evaluated(
        &mut self,
        handler: impl FnMut(&mut EngineCx<'_>, &mut AnchorEvaluated) + 'static,
    ) -> Subscription {
        let sub = self.listeners.next_handle(EventKind::AnchorEvaluated);
        self.listeners.anchor_evaluated.subscribe(sub.id, Box::new(handler));
        sub
    }

    /// Removes a listener. Returns `false` when the handle was already
    /// unsubscribed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.unsubscribe(subscription)
    }

    // --- Request processing ------------------------------------------------

    fn process_queued(&mut self) {
        while let Some(request) = self.queued.pop_front() {
            match request.payload {
                RequestPayload::Offsets(change) => {
                    self.process_offsets(request.id, change, Trigger::Direct);
                }
                RequestPayload::OffsetsVelocity(change) => {
                    self.process_offsets_velocity(request.id, change, Trigger::Direct);
                }
                RequestPayload::Zoom(change) => self.process_zoom(request.id, change),
                RequestPayload::ZoomVelocity(change) => {
                    self.process_zoom_velocity(request.id, change);
                }
            }
        }
    }

    fn process_offsets(&mut self, id: ChangeId, change: OffsetsChange, trigger: Trigger) {
        // A new request supersedes the in-flight one; the superseded
        // completion fires before any of the new request's notifications.
        if let Some(old) = self.offsets_transition.take() {
            self.complete_offsets(old.id, old.trigger, ChangeResult::Interrupted);
        }

        let start = self.offsets();
        let (mut horizontal, mut vertical) = match change.kind {
            TargetKind::Absolute => (change.horizontal, change.vertical),
            TargetKind::RelativeToCurrentView => {
                (start.0 + change.horizontal, start.1 + change.vertical)
            }
        };
        horizontal = self.view.clamp_horizontal(horizontal);
        vertical = self.view.clamp_vertical(vertical);
        if change.snap_points == SnapPointsMode::Respect {
            let (viewport_width, viewport_height) = self.view.viewport();
            let snapped_h =
                self.snap_points
                    .resolve(SnapAxis::HorizontalOffset, horizontal, viewport_width);
            let snapped_v =
                self.snap_points
                    .resolve(SnapAxis::VerticalOffset, vertical, viewport_height);
            self.diagnostics.emit(
                DiagnosticsArea::SnapPoints,
                DiagnosticsLevel::Verbose,
                format_args!("resolved ({horizontal}, {vertical}) -> ({snapped_h}, {snapped_v})"),
            );
            horizontal = self.view.clamp_horizontal(snapped_h);
            vertical = self.view.clamp_vertical(snapped_v);
        }

        let animated = change.animation.is_animated();
        let distance = (horizontal - start.0).hypot(vertical - start.1);
        let duration = self.offsets_profile.duration_ms(distance);
        let mut changing = ChangingOffsets {
            change_id: id,
            start,
            end: (horizontal, vertical),
            animated,
            duration_ms: animated.then_some(duration),
            cancel: false,
        };
        dispatch!(self, changing_offsets, &mut changing);
        if changing.cancel {
            self.complete_offsets(id, trigger, ChangeResult::Interrupted);
            self.set_offsets_state(self.rest_state());
            return;
        }

        if animated {
            self.offsets_transition = Some(OffsetsTransition {
                id,
                start,
                end: (horizontal, vertical),
                duration_ms: changing.duration_ms.unwrap_or(duration).max(1),
                started_at: None,
                trigger,
            });
            self.set_offsets_state(InteractionState::Animating);
        } else {
            self.view.set_offsets(horizontal, vertical);
            self.emit_view_changed();
            self.push_controller_values();
            self.set_offsets_state(self.rest_state());
            self.complete_offsets(id, trigger, ChangeResult::Completed);
        }
    }

    fn process_offsets_velocity(
        &mut self,
        id: ChangeId,
        change: OffsetsVelocityChange,
        trigger: Trigger,
    ) {
        let decay = change.inertia_decay_rate.unwrap_or(DEFAULT_INERTIA_DECAY_RATE);
        let displacement_h = inertia_displacement(change.horizontal_velocity, decay);
        let displacement_v = inertia_displacement(change.vertical_velocity, decay);
        let projected = OffsetsChange::relative(displacement_h, displacement_v)
            .with_animation(AnimationMode::Allow);
        self.process_offsets(id, projected, trigger);
    }

    fn process_zoom(&mut self, id: ChangeId, change: ZoomFactorChange) {
        if let Some(old) = self.zoom_transition.take() {
            self.complete_zoom(old.id, ChangeResult::Interrupted);
        }

        let start_zoom = self.view.zoom_factor();
        let target = match change.kind {
            TargetKind::Absolute => change.zoom_factor,
            TargetKind::RelativeToCurrentView => start_zoom + change.zoom_factor,
        };
        let mut end_zoom = self.view.clamp_zoom_factor(target);
        if change.snap_points == SnapPointsMode::Respect {
            let snapped =
                self.snap_points
                    .resolve(SnapAxis::ZoomFactor, f64::from(end_zoom), 0.0) as f32;
            end_zoom = self.view.clamp_zoom_factor(snapped);
        }
        let center = change.center_point.unwrap_or_else(|| self.viewport_center());

        let animated = change.animation.is_animated();
        let duration = self
            .zoom_profile
            .duration_ms(f64::from((end_zoom - start_zoom).abs()));
        let mut changing = ChangingZoomFactor {
            change_id: id,
            start: start_zoom,
            end: end_zoom,
            center_point: center,
            animated,
            duration_ms: animated.then_some(duration),
            cancel: false,
        };
        dispatch!(self, changing_zoom_factor, &mut changing);
        if changing.cancel {
            self.complete_zoom(id, ChangeResult::Interrupted);
            self.set_zoom_state(self.rest_state());
            return;
        }

        if animated {
            self.zoom_transition = Some(ZoomTransition {
                id,
                start_zoom,
                end_zoom,
                start_offsets: self.offsets(),
                center,
                duration_ms: changing.duration_ms.unwrap_or(duration).max(1),
                started_at: None,
            });
            self.set_zoom_state(InteractionState::Animating);
        } else {
            let start_offsets = self.offsets();
            self.commit_zoom(start_zoom, start_offsets, end_zoom, center);
            self.emit_view_changed();
            self.push_controller_values();
            self.set_zoom_state(self.rest_state());
            self.complete_zoom(id, ChangeResult::Completed);
        }
    }

    fn process_zoom_velocity(&mut self, id: ChangeId, change: ZoomVelocityChange) {
        let decay = change.inertia_decay_rate.unwrap_or(DEFAULT_INERTIA_DECAY_RATE);
        let displacement = inertia_displacement(change.velocity, decay);
        let mut projected = ZoomFactorChange::relative(displacement as f32)
            .with_animation(AnimationMode::Allow);
        projected.center_point = change.center_point;
        self.process_zoom(id, projected);
    }

    // --- Transition driving ------------------------------------------------

    fn tick_offsets(&mut self, now_ms: u64) {
        let Some(mut transition) = self.offsets_transition.take() else {
            return;
        };
        let started = *transition.started_at.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(started);
        if elapsed >= transition.duration_ms {
            self.view.set_offsets(transition.end.0, transition.end.1);
            self.emit_view_changed();
            self.push_controller_values();
            self.set_offsets_state(InteractionState::Idle);
            self.complete_offsets(transition.id, transition.trigger, ChangeResult::Completed);
        } else {
            let progress = ease_in_out(elapsed as f64 / transition.duration_ms as f64);
            let horizontal = transition.start.0 + (transition.end.0 - transition.start.0) * progress;
            let vertical = transition.start.1 + (transition.end.1 - transition.start.1) * progress;
            self.view.set_offsets(horizontal, vertical);
            self.offsets_transition = Some(transition);
            self.emit_view_changed();
            self.push_controller_values();
        }
    }

    fn tick_zoom(&mut self, now_ms: u64) {
        let Some(mut transition) = self.zoom_transition.take() else {
            return;
        };
        let started = *transition.started_at.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(started);
        if elapsed >= transition.duration_ms {
            self.commit_zoom(
                transition.start_zoom,
                transition.start_offsets,
                transition.end_zoom,
                transition.center,
            );
            self.emit_view_changed();
            self.push_controller_values();
            self.set_zoom_state(InteractionState::Idle);
            self.complete_zoom(transition.id, ChangeResult::Completed);
        } else {
            let progress = ease_in_out(elapsed as f64 / transition.duration_ms as f64);
            let zoom = f64::from(transition.start_zoom)
                + f64::from(transition.end_zoom - transition.start_zoom) * progress;
            self.commit_zoom(
                transition.start_zoom,
                transition.start_offsets,
                zoom as f32,
                transition.center,
            );
            self.zoom_transition = Some(transition);
            self.emit_view_changed();
            self.push_controller_values();
        }
    }

    /// Applies a zoom step, keeping `center` (viewport coordinates)
    /// stationary on screen.
    fn commit_zoom(&mut self, start_zoom: f32, start_offsets: (f64, f64), zoom: f32, center: Point) {
        let ratio = if start_zoom > 0.0 {
            f64::from(zoom) / f64::from(start_zoom)
        } else {
            1.0
        };
        let horizontal = (start_offsets.0 + center.x) * ratio - center.x;
        let vertical = (start_offsets.1 + center.y) * ratio - center.y;
        self.view.set_zoom_factor(zoom);
        self.view.set_offsets(horizontal, vertical);
    }

    // --- Completion and notification helpers -------------------------------

    fn complete_offsets(&mut self, id: ChangeId, trigger: Trigger, result: ChangeResult) {
        if let Trigger::Controller(orientation) = trigger {
            self.controller_slot(orientation).end_operation();
            self.push_controller_values();
        }
        if id == ChangeId::NONE {
            return;
        }
        self.diagnostics.emit(
            DiagnosticsArea::ViewChanges,
            DiagnosticsLevel::Info,
            format_args!("offsets change id={} {:?}", id.get(), result),
        );
        let mut payload = ScrollCompleted {
            change_id: id,
            result,
        };
        dispatch!(self, scroll_completed, &mut payload);
    }

    fn complete_zoom(&mut self, id: ChangeId, result: ChangeResult) {
        if id == ChangeId::NONE {
            return;
        }
        self.diagnostics.emit(
            DiagnosticsArea::ViewChanges,
            DiagnosticsLevel::Info,
            format_args!("zoom change id={} {:?}", id.get(), result),
        );
        let mut payload = ZoomCompleted {
            change_id: id,
            result,
        };
        dispatch!(self, zoom_completed, &mut payload);
    }

    fn emit_view_changed(&mut self) {
        let mut payload = ViewChanged {
            horizontal_offset: self.view.horizontal_offset(),
            vertical_offset: self.view.vertical_offset(),
            zoom_factor: self.view.zoom_factor(),
        };
        dispatch!(self, view_changed, &mut payload);
    }

    fn set_offsets_state(&mut self, state: InteractionState) {
        if self.offsets_state == state {
            return;
        }
        self.offsets_state = state;
        let mut payload = StateChanged {
            group: AxisGroup::Offsets,
            state,
        };
        dispatch!(self, state_changed, &mut payload);
    }

    fn set_zoom_state(&mut self, state: InteractionState) {
        if self.zoom_state == state {
            return;
        }
        self.zoom_state = state;
        let mut payload = StateChanged {
            group: AxisGroup::ZoomFactor,
            state,
        };
        dispatch!(self, state_changed, &mut payload);
    }

    fn push_controller_values(&mut self) {
        let (viewport_width, viewport_height) = self.view.viewport();
        self.horizontal_controller.push(
            0.0,
            self.view.max_horizontal_offset(),
            self.view.horizontal_offset(),
            viewport_width,
        );
        self.vertical_controller.push(
            0.0,
            self.view.max_vertical_offset(),
            self.view.vertical_offset(),
            viewport_height,
        );
    }

    fn controller_slot(&mut self, orientation: ScrollOrientation) -> &mut ControllerSlot {
        match orientation {
            ScrollOrientation::Horizontal => &mut self.horizontal_controller,
            ScrollOrientation::Vertical => &mut self.vertical_controller,
        }
    }

    fn controller_offsets_change(
        &self,
        orientation: ScrollOrientation,
        offset: f64,
        animation: AnimationMode,
    ) -> OffsetsChange {
        let current = self.offsets();
        let (horizontal, vertical) = match orientation {
            ScrollOrientation::Horizontal => (offset, current.1),
            ScrollOrientation::Vertical => (current.0, offset),
        };
        OffsetsChange::absolute(horizontal, vertical).with_animation(animation)
    }

    /// The state an axis group returns to once no transition is in flight.
    /// Non-animated changes submitted mid-interaction leave the group in
    /// `Interacting`.
    fn rest_state(&self) -> InteractionState {
        if self.user_interacting {
            InteractionState::Interacting
        } else {
            InteractionState::Idle
        }
    }

    fn offsets(&self) -> (f64, f64) {
        (self.view.horizontal_offset(), self.view.vertical_offset())
    }

    fn viewport_center(&self) -> Point {
        let (viewport_width, viewport_height) = self.view.viewport();
        Point::new(viewport_width / 2.0, viewport_height / 2.0)
    }
}

impl fmt::Debug for ScrollEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollEngine")
            .field("view", &self.view)
            .field("offsets_state", &self.offsets_state)
            .field("zoom_state", &self.zoom_state)
            .field("next_change_id", &self.next_change_id)
            .field("offsets_transition", &self.offsets_transition)
            .field("zoom_transition", &self.zoom_transition)
            .field("user_interacting", &self.user_interacting)
            .finish_non_exhaustive()
    }
}

fn allocate_change_id(next: &mut i32) -> ChangeId {
    let id = ChangeId::from_raw(*next);
    *next += 1;
    id
}

/// Smoothstep easing; maps linear progress into an ease-in-out curve.
fn ease_in_out(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

fn validate_offsets_change(change: &OffsetsChange) -> Result<(), RequestError> {
    if change.horizontal.is_finite() && change.vertical.is_finite() {
        Ok(())
    } else {
        Err(RequestError::InvalidTarget)
    }
}

fn validate_offsets_velocity(change: &OffsetsVelocityChange) -> Result<(), RequestError> {
    let decay_ok = change.inertia_decay_rate.is_none_or(f32::is_finite);
    if change.horizontal_velocity.is_finite() && change.vertical_velocity.is_finite() && decay_ok {
        Ok(())
    } else {
        Err(RequestError::InvalidTarget)
    }
}

fn validate_zoom_change(change: &ZoomFactorChange) -> Result<(), RequestError> {
    let center_ok = change
        .center_point
        .is_none_or(|center| center.x.is_finite() && center.y.is_finite());
    if change.zoom_factor.is_finite() && center_ok {
        Ok(())
    } else {
        Err(RequestError::InvalidTarget)
    }
}

fn validate_zoom_velocity(change: &ZoomVelocityChange) -> Result<(), RequestError> {
    let decay_ok = change.inertia_decay_rate.is_none_or(f32::is_finite);
    let center_ok = change
        .center_point
        .is_none_or(|center| center.x.is_finite() && center.y.is_finite());
    if change.velocity.is_finite() && decay_ok && center_ok {
        Ok(())
    } else {
        Err(RequestError::InvalidTarget)
    }
}

#[cfg(test)]
mod tests {
    use scrollkit_snap_points::{SnapAxis, SnapPoint};

    use super::{ScrollEngine, ease_in_out};
    use crate::diagnostics::DiagnosticsConfig;
    use crate::events::{AxisGroup, InteractionState};
    use crate::request::{
        AnimationMode, ChangeId, InputKinds, OffsetsChange, OffsetsVelocityChange, RequestError,
        SnapPointsMode, ZoomFactorChange,
    };

    fn engine() -> ScrollEngine {
        let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
        engine.set_content_extent(800.0, 2000.0);
        engine
    }

    fn settle(engine: &mut ScrollEngine) {
        engine.on_tick(0);
        engine.on_tick(60_000);
    }

    #[test]
    fn change_ids_are_monotonic_and_above_sentinel() {
        let mut engine = engine();
        let a = engine
            .change_offsets(OffsetsChange::absolute(10.0, 10.0))
            .unwrap();
        let b = engine
            .change_offsets(OffsetsChange::absolute(20.0, 20.0))
            .unwrap();
        let c = engine.change_zoom_factor(ZoomFactorChange::absolute(2.0)).unwrap();
        assert!(a.get() > ChangeId::NONE.get());
        assert!(b > a, "ids must strictly increase");
        assert!(c > b, "ids are shared across axis groups");
    }

    #[test]
    fn non_finite_targets_are_rejected_without_mutation() {
        let mut engine = engine();
        let before = engine.view().vertical_offset();
        assert_eq!(
            engine.change_offsets(OffsetsChange::absolute(0.0, f64::NAN)),
            Err(RequestError::InvalidTarget)
        );
        assert_eq!(
            engine.change_zoom_factor(ZoomFactorChange::absolute(f32::INFINITY)),
            Err(RequestError::InvalidTarget)
        );
        assert_eq!(engine.view().vertical_offset(), before);
        // The failed requests consumed no ids.
        let id = engine
            .change_offsets(OffsetsChange::absolute(0.0, 0.0))
            .unwrap();
        assert_eq!(id.get(), 1);
    }

    #[test]
    fn targets_clamp_silently() {
        let mut engine = engine();
        engine
            .change_offsets(
                OffsetsChange::absolute(-100.0, 9999.0).with_animation(AnimationMode::Disable),
            )
            .unwrap();
        assert_eq!(engine.view().horizontal_offset(), 0.0);
        assert_eq!(engine.view().vertical_offset(), 1500.0);
    }

    #[test]
    fn mandatory_snap_point_resolves_target() {
        let mut engine = engine();
        engine
            .add_snap_point(SnapAxis::VerticalOffset, SnapPoint::irregular(600.0))
            .unwrap();

        engine
            .change_offsets(
                OffsetsChange::absolute(0.0, 650.0).with_animation(AnimationMode::Disable),
            )
            .unwrap();
        assert_eq!(engine.view().vertical_offset(), 600.0);

        engine
            .change_offsets(
                OffsetsChange::absolute(0.0, 650.0)
                    .with_animation(AnimationMode::Disable)
                    .with_snap_points(SnapPointsMode::Ignore),
            )
            .unwrap();
        assert_eq!(engine.view().vertical_offset(), 650.0);
    }

    #[test]
    fn animated_change_commits_over_ticks() {
        let mut engine = engine();
        engine
            .change_offsets(OffsetsChange::absolute(0.0, 1000.0))
            .unwrap();
        assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Animating);
        assert_eq!(engine.view().vertical_offset(), 0.0);

        engine.on_tick(0);
        engine.on_tick(500);
        let midway = engine.view().vertical_offset();
        assert!(midway > 0.0 && midway < 1000.0, "interpolating toward target");

        engine.on_tick(60_000);
        assert_eq!(engine.view().vertical_offset(), 1000.0);
        assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Idle);
    }

    #[test]
    fn zoom_keeps_center_point_stationary() {
        let mut engine = engine();
        engine
            .change_offsets(
                OffsetsChange::absolute(100.0, 300.0).with_animation(AnimationMode::Disable),
            )
            .unwrap();
        engine
            .change_zoom_factor(
                ZoomFactorChange::absolute(2.0)
                    .with_center_point(kurbo::Point::new(200.0, 250.0))
                    .with_animation(AnimationMode::Disable),
            )
            .unwrap();

        // Content point under the viewport center before: (300, 550); after
        // doubling, it sits at (600, 1100), so offsets become (400, 850).
        assert_eq!(engine.view().zoom_factor(), 2.0);
        assert_eq!(engine.view().horizontal_offset(), 400.0);
        assert_eq!(engine.view().vertical_offset(), 850.0);
    }

    #[test]
    fn zoom_target_clamps_to_limits() {
        let mut engine = engine();
        engine
            .change_zoom_factor(
                ZoomFactorChange::absolute(100.0).with_animation(AnimationMode::Disable),
            )
            .unwrap();
        assert_eq!(engine.view().zoom_factor(), 10.0);
    }

    #[test]
    fn tightened_zoom_limits_reclamp_the_view() {
        let mut engine = engine();
        engine
            .change_zoom_factor(
                ZoomFactorChange::absolute(4.0).with_animation(AnimationMode::Disable),
            )
            .unwrap();
        engine.set_zoom_limits(0.5, 2.0);
        assert_eq!(engine.view().zoom_factor(), 2.0);
        assert_eq!(engine.view().zoom_limits(), (0.5, 2.0));
    }

    #[test]
    fn velocity_request_coasts_and_settles() {
        let mut engine = engine();
        let id = engine
            .change_offsets_with_additional_velocity(OffsetsVelocityChange::new(0.0, 10.0))
            .unwrap();
        assert!(id.get() > 0);
        settle(&mut engine);
        // displacement = 10 / -ln(0.95) ≈ 194.96
        let offset = engine.view().vertical_offset();
        assert!((offset - 194.96).abs() < 0.1, "got {offset}");
    }

    #[test]
    fn zero_velocity_moves_nothing() {
        let mut engine = engine();
        engine
            .change_offsets_with_additional_velocity(OffsetsVelocityChange::new(0.0, 0.0))
            .unwrap();
        settle(&mut engine);
        assert_eq!(engine.view().vertical_offset(), 0.0);
    }

    #[test]
    fn ignored_mouse_wheel_is_dropped() {
        let mut engine = engine();
        engine.set_ignored_input_kinds(InputKinds::MOUSE_WHEEL);
        assert_eq!(engine.mouse_wheel_scroll(0.0, -120.0), Ok(None));

        engine.set_ignored_input_kinds(InputKinds::empty());
        let id = engine.mouse_wheel_scroll(0.0, -120.0).unwrap();
        assert!(id.is_some());
    }

    #[test]
    fn wheel_notch_scrolls_configured_lines() {
        let mut engine = engine();
        engine
            .change_offsets(
                OffsetsChange::absolute(0.0, 500.0).with_animation(AnimationMode::Disable),
            )
            .unwrap();
        // One notch toward the top: 3 lines * 16px = 48px.
        engine.mouse_wheel_scroll(0.0, -120.0).unwrap();
        settle(&mut engine);
        let offset = engine.view().vertical_offset();
        assert!((offset - 452.0).abs() < 0.5, "got {offset}");
    }

    #[test]
    fn snapping_settles_after_user_interaction() {
        let mut engine = engine();
        engine
            .add_snap_point(SnapAxis::VerticalOffset, SnapPoint::irregular(600.0))
            .unwrap();

        engine.begin_user_interaction();
        assert_eq!(
            engine.state(AxisGroup::Offsets),
            InteractionState::Interacting
        );
        // Anchoring is suppressed mid-drag.
        assert!(!engine.evaluate_anchoring(Vec::new()).is_anchored());

        engine.end_user_interaction();
        assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Snapping);
        settle(&mut engine);
        assert_eq!(engine.view().vertical_offset(), 600.0);
        assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Idle);
    }

    #[test]
    fn ease_curve_is_monotonic_and_bounded() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        let mut last = 0.0;
        for i in 1..=10 {
            let value = ease_in_out(f64::from(i) / 10.0);
            assert!(value >= last, "easing must not regress");
            last = value;
        }
        assert_eq!(ease_in_out(5.0), 1.0);
    }
}
