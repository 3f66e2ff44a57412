// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollkit Engine: a headless scroll/zoom interaction engine.
//!
//! [`ScrollEngine`] owns the scrollable view model for one viewport and
//! arbitrates every way it can move:
//!
//! - Programmatic requests: [`ScrollEngine::change_offsets`],
//!   [`ScrollEngine::change_zoom_factor`], and their velocity-driven
//!   variants, each returning a [`ChangeId`] that correlates the request
//!   with its completion.
//! - Mouse wheel input via [`ScrollEngine::mouse_wheel_scroll`].
//! - External scroll controllers (scrollbar-like collaborators) through the
//!   [`ScrollController`] trait.
//! - Direct user manipulation bracketed by
//!   [`ScrollEngine::begin_user_interaction`] and
//!   [`ScrollEngine::end_user_interaction`], after which the view settles
//!   onto applicable snap points.
//!
//! The engine is single-threaded and tick-driven: it performs no I/O and
//! owns no clock. Hosts drive animated transitions by calling
//! [`ScrollEngine::on_tick`] with a monotonic millisecond timestamp and
//! observe progress through subscribed listeners.
//!
//! ```rust
//! use scrollkit_engine::{
//!     ChangeResult, DiagnosticsConfig, OffsetsChange, ScrollEngine,
//! };
//! use std::{cell::Cell, rc::Rc};
//!
//! let mut engine = ScrollEngine::new(400.0, 500.0, DiagnosticsConfig::disabled());
//! engine.set_content_extent(400.0, 2000.0);
//!
//! let completed = Rc::new(Cell::new(None));
//! let seen = completed.clone();
//! engine.subscribe_scroll_completed(move |_cx, event| {
//!     seen.set(Some((event.change_id, event.result)));
//! });
//!
//! let id = engine.change_offsets(OffsetsChange::absolute(0.0, 800.0)).unwrap();
//! engine.on_tick(0);
//! engine.on_tick(10_000);
//!
//! assert_eq!(completed.get(), Some((id, ChangeResult::Completed)));
//! assert_eq!(engine.view().vertical_offset(), 800.0);
//! ```
//!
//! Geometry, anchoring, and snap point modelling live in the companion
//! crates [`scrollkit_view`] and [`scrollkit_snap_points`]; their types are
//! re-exported here for convenience.

mod controller;
mod diagnostics;
mod engine;
mod events;
mod request;
mod velocity;

pub use controller::{ScrollController, ScrollOrientation};
pub use diagnostics::{DiagnosticsArea, DiagnosticsConfig, DiagnosticsLevel};
pub use engine::{EngineCx, ScrollEngine};
pub use events::{
    AnchorEvaluated, AnchorRequested, AxisGroup, ChangingOffsets, ChangingZoomFactor, EventKind,
    ExtentChanged, InteractionState, ScrollCompleted, StateChanged, Subscription, ViewChanged,
    ZoomCompleted,
};
pub use request::{
    AnimationMode, ChangeId, ChangeResult, InputKinds, OffsetsChange, OffsetsVelocityChange,
    RequestError, SnapPointsMode, TargetKind, ZoomFactorChange, ZoomVelocityChange,
};
pub use velocity::{
    DEFAULT_INERTIA_DECAY_RATE, MAX_WHEEL_VELOCITY_UNITS, MouseWheelConfig, VelocityProfile,
    inertia_displacement, velocity_for_displacement,
};

// Companion crates, re-exported so hosts depend on one crate.
pub use scrollkit_snap_points;
pub use scrollkit_view;
