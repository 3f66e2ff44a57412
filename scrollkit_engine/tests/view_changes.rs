// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests of the view-change pipeline: notification ordering,
//! supersession, re-entrant submission, anchoring, and the controller bridge.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::Rect;
use scrollkit_engine::{
    AnimationMode, AxisGroup, ChangeId, ChangeResult, DiagnosticsConfig, InteractionState,
    OffsetsChange, ScrollController, ScrollEngine, ScrollOrientation, SnapPointsMode,
};
use scrollkit_view::{AnchorCandidate, ElementId};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Changing {
        id: ChangeId,
        end: (f64, f64),
        animated: bool,
    },
    View {
        vertical: f64,
    },
    State {
        group: AxisGroup,
        state: InteractionState,
    },
    Completed {
        id: ChangeId,
        result: ChangeResult,
    },
}

#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// 400x500 viewport over 400x2000 content, with every relevant event logged.
fn logged_engine() -> (ScrollEngine, Log) {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);
    let log = Log::default();

    let sink = log.clone();
    engine.subscribe_changing_offsets(move |_cx, event| {
        sink.push(Event::Changing {
            id: event.change_id,
            end: event.end,
            animated: event.animated,
        });
    });
    let sink = log.clone();
    engine.subscribe_view_changed(move |_cx, event| {
        sink.push(Event::View {
            vertical: event.vertical_offset,
        });
    });
    let sink = log.clone();
    engine.subscribe_state_changed(move |_cx, event| {
        sink.push(Event::State {
            group: event.group,
            state: event.state,
        });
    });
    let sink = log.clone();
    engine.subscribe_scroll_completed(move |_cx, event| {
        sink.push(Event::Completed {
            id: event.change_id,
            result: event.result,
        });
    });
    (engine, log)
}

#[test]
fn immediate_change_notifies_in_order() {
    let (mut engine, log) = logged_engine();
    let id = engine
        .change_offsets(OffsetsChange::absolute(0.0, 800.0).with_animation(AnimationMode::Disable))
        .unwrap();

    // Changing fires before the commit, the completion after it; the offsets
    // group never leaves Idle for a non-animated change.
    assert_eq!(
        log.take(),
        vec![
            Event::Changing {
                id,
                end: (0.0, 800.0),
                animated: false,
            },
            Event::View { vertical: 800.0 },
            Event::Completed {
                id,
                result: ChangeResult::Completed,
            },
        ]
    );
}

#[test]
fn animated_change_transitions_through_animating() {
    let (mut engine, log) = logged_engine();
    let id = engine
        .change_offsets(OffsetsChange::absolute(0.0, 800.0))
        .unwrap();
    assert_eq!(
        log.take(),
        vec![
            Event::Changing {
                id,
                end: (0.0, 800.0),
                animated: true,
            },
            Event::State {
                group: AxisGroup::Offsets,
                state: InteractionState::Animating,
            },
        ]
    );

    engine.on_tick(0);
    log.take();
    engine.on_tick(10_000);
    assert_eq!(
        log.take(),
        vec![
            Event::View { vertical: 800.0 },
            Event::State {
                group: AxisGroup::Offsets,
                state: InteractionState::Idle,
            },
            Event::Completed {
                id,
                result: ChangeResult::Completed,
            },
        ]
    );
}

#[test]
fn superseding_request_interrupts_predecessor_first() {
    let (mut engine, log) = logged_engine();
    let first = engine
        .change_offsets(OffsetsChange::absolute(0.0, 400.0))
        .unwrap();
    log.take();

    let second = engine
        .change_offsets(OffsetsChange::absolute(0.0, 800.0))
        .unwrap();
    let events = log.take();
    assert_eq!(
        events[0],
        Event::Completed {
            id: first,
            result: ChangeResult::Interrupted,
        },
        "the superseded completion precedes the new request's notifications"
    );
    assert_eq!(
        events[1],
        Event::Changing {
            id: second,
            end: (0.0, 800.0),
            animated: true,
        }
    );

    engine.on_tick(0);
    engine.on_tick(10_000);
    assert_eq!(engine.view().vertical_offset(), 800.0);
}

#[test]
fn handler_cancellation_interrupts_without_moving() {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);
    engine.subscribe_changing_offsets(|_cx, event| {
        event.cancel = true;
    });
    let result = Rc::new(Cell::new(None));
    let sink = result.clone();
    engine.subscribe_scroll_completed(move |_cx, event| {
        sink.set(Some(event.result));
    });

    engine
        .change_offsets(OffsetsChange::absolute(0.0, 800.0))
        .unwrap();
    assert_eq!(result.get(), Some(ChangeResult::Interrupted));
    assert_eq!(engine.view().vertical_offset(), 0.0);
}

#[test]
fn handler_duration_override_is_honored() {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);
    engine.subscribe_changing_offsets(|_cx, event| {
        assert!(event.duration_ms.is_some(), "animated changes carry a duration");
        event.duration_ms = Some(100);
    });

    engine
        .change_offsets(OffsetsChange::absolute(0.0, 800.0))
        .unwrap();
    engine.on_tick(0);
    engine.on_tick(100);
    assert_eq!(engine.view().vertical_offset(), 800.0);
    assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Idle);
}

#[test]
fn completion_handler_can_submit_followup_request() {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);

    let followup = Rc::new(Cell::new(None));
    let issued = followup.clone();
    engine.subscribe_scroll_completed(move |cx, _event| {
        if issued.get().is_none() {
            let id = cx
                .change_offsets(
                    OffsetsChange::absolute(0.0, 200.0).with_animation(AnimationMode::Disable),
                )
                .unwrap();
            issued.set(Some(id));
        }
    });

    let outer = engine
        .change_offsets(OffsetsChange::absolute(0.0, 100.0).with_animation(AnimationMode::Disable))
        .unwrap();

    // The queued request was assigned its id inside the handler and ran
    // before the submission call returned.
    let followup = followup.get().expect("handler submitted a follow-up");
    assert!(followup > outer, "ids stay monotonic across re-entry");
    assert_eq!(engine.view().vertical_offset(), 200.0);
}

#[test]
fn snapping_after_interaction_completes_silently() {
    let (mut engine, log) = logged_engine();
    engine
        .add_snap_point(
            scrollkit_snap_points::SnapAxis::VerticalOffset,
            scrollkit_snap_points::SnapPoint::irregular(600.0),
        )
        .unwrap();

    // The user drags the view off the snap point; the host reports the
    // movement as non-animated changes with snap points ignored.
    engine.begin_user_interaction();
    engine
        .change_offsets(
            OffsetsChange::absolute(0.0, 580.0)
                .with_animation(AnimationMode::Disable)
                .with_snap_points(SnapPointsMode::Ignore),
        )
        .unwrap();
    assert_eq!(engine.view().vertical_offset(), 580.0);
    assert_eq!(
        engine.state(AxisGroup::Offsets),
        InteractionState::Interacting,
        "mid-interaction changes keep the group interacting"
    );

    engine.end_user_interaction();
    assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Snapping);
    log.take();
    engine.on_tick(0);
    engine.on_tick(10_000);

    assert_eq!(engine.view().vertical_offset(), 600.0);
    let events = log.take();
    assert!(
        !events.iter().any(|event| matches!(event, Event::Completed { .. })),
        "snapping transitions have no requester and complete silently"
    );
    assert!(events.contains(&Event::State {
        group: AxisGroup::Offsets,
        state: InteractionState::Idle,
    }));
}

#[derive(Debug, Clone, Default)]
struct RecordingController(Rc<RefCell<Vec<f64>>>);

impl ScrollController for RecordingController {
    fn set_values(&mut self, _min_offset: f64, _max_offset: f64, offset: f64, _viewport: f64) {
        self.0.borrow_mut().push(offset);
    }
}

#[test]
fn controller_sees_no_echo_of_its_own_request() {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);

    let controller = RecordingController::default();
    engine.set_vertical_scroll_controller(Some(Box::new(controller.clone())));
    assert_eq!(*controller.0.borrow(), vec![0.0], "attach mirrors current values");

    let id = engine
        .controller_scroll_to(ScrollOrientation::Vertical, 300.0, AnimationMode::Disable)
        .unwrap();
    assert!(id.get() > 0);
    // Intermediate mirroring was suppressed; only the settled value arrives.
    assert_eq!(*controller.0.borrow(), vec![0.0, 300.0]);

    // Changes from elsewhere keep mirroring normally.
    engine
        .change_offsets(OffsetsChange::absolute(0.0, 120.0).with_animation(AnimationMode::Disable))
        .unwrap();
    assert_eq!(*controller.0.borrow(), vec![0.0, 300.0, 120.0]);
}

#[test]
fn controller_velocity_request_coasts() {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);

    engine
        .controller_scroll_with_velocity(ScrollOrientation::Vertical, 10.0, None)
        .unwrap();
    engine.on_tick(0);
    engine.on_tick(10_000);
    let offset = engine.view().vertical_offset();
    assert!((offset - 194.96).abs() < 0.1, "got {offset}");
}

#[test]
fn anchoring_handlers_supply_candidates_and_pin() {
    let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
    engine.set_content_extent(400.0, 2000.0);
    engine
        .change_offsets(OffsetsChange::absolute(0.0, 350.0).with_animation(AnimationMode::Disable))
        .unwrap();
    engine.anchor_config_mut().vertical_ratio = 0.0;

    engine.subscribe_anchor_requested(|_cx, request| {
        request.candidates.push(AnchorCandidate {
            id: ElementId::new(7),
            bounds: Rect::new(0.0, 360.0, 400.0, 500.0),
        });
    });

    let decision = engine.evaluate_anchoring(Vec::new());
    assert_eq!(decision.element, Some(ElementId::new(7)));
    assert_eq!(decision.viewport_anchor_point.1, 350.0);

    // A pinned element overrides candidate selection.
    engine.subscribe_anchor_requested(|_cx, request| {
        request.pinned = Some(ElementId::new(42));
    });
    let decision = engine.evaluate_anchoring(Vec::new());
    assert_eq!(decision.element, Some(ElementId::new(42)));
}

#[test]
fn anchor_correction_shifts_view_and_accumulates() {
    let (mut engine, log) = logged_engine();
    engine
        .change_offsets(OffsetsChange::absolute(0.0, 350.0).with_animation(AnimationMode::Disable))
        .unwrap();
    log.take();

    // Content above the anchor shrank by 30 pixels.
    let pre = Rect::new(0.0, 600.0, 400.0, 700.0);
    let post = Rect::new(0.0, 570.0, 400.0, 670.0);
    engine.apply_anchor_correction(pre, post);

    assert_eq!(engine.view().vertical_offset(), 320.0);
    assert_eq!(engine.view().layout_offsets(), (0.0, -30.0));
    assert_eq!(log.take(), vec![Event::View { vertical: 320.0 }]);

    // A second shrink accumulates.
    engine.apply_anchor_correction(post, Rect::new(0.0, 560.0, 400.0, 660.0));
    assert_eq!(engine.view().layout_offsets(), (0.0, -40.0));
}

#[test]
fn begin_interaction_interrupts_in_flight_animation() {
    let (mut engine, log) = logged_engine();
    let id = engine
        .change_offsets(OffsetsChange::absolute(0.0, 800.0))
        .unwrap();
    log.take();

    engine.begin_user_interaction();
    let events = log.take();
    assert!(events.contains(&Event::Completed {
        id,
        result: ChangeResult::Interrupted,
    }));
    assert_eq!(
        engine.state(AxisGroup::Offsets),
        InteractionState::Interacting
    );

    engine.end_user_interaction();
    assert_eq!(engine.state(AxisGroup::Offsets), InteractionState::Idle);
}
