// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View-change request types and their modes.

use core::fmt;

use bitflags::bitflags;
use kurbo::Point;

/// Identifier correlating a submitted view-change request with its later
/// completion notification.
///
/// Ids are assigned by the engine in strictly increasing order, starting
/// above the [`ChangeId::NONE`] sentinel, and are never reused within an
/// engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangeId(i32);

impl ChangeId {
    /// Sentinel denoting "no operation".
    pub const NONE: Self = Self(-1);

    /// Returns the raw id value. `-1` for the sentinel.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    pub(crate) const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }
}

/// Whether a view-change transition may animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// Animate the transition.
    Allow,
    /// Jump to the target without animating.
    Disable,
    /// Let the engine decide; resolves to animated.
    #[default]
    Auto,
}

impl AnimationMode {
    /// Returns `true` when this mode produces an animated transition.
    #[must_use]
    pub fn is_animated(self) -> bool {
        !matches!(self, Self::Disable)
    }
}

/// Whether a request's target is resolved against registered snap points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SnapPointsMode {
    /// Consult the snap point registry when determining the target.
    #[default]
    Respect,
    /// Use the requested target verbatim (after clamping).
    Ignore,
}

/// How a requested target value relates to the current view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TargetKind {
    /// The target is an absolute offset or zoom factor.
    #[default]
    Absolute,
    /// The target is a delta added to the current view.
    RelativeToCurrentView,
}

/// The terminal result of a view-change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeResult {
    /// The transition ran to its target.
    Completed,
    /// The request was superseded or cancelled before reaching its target.
    Interrupted,
}

/// An offsets change request.
///
/// Targets are clamped silently into the settled range; out-of-range values
/// are not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetsChange {
    /// Requested horizontal offset or delta, per [`OffsetsChange::kind`].
    pub horizontal: f64,
    /// Requested vertical offset or delta.
    pub vertical: f64,
    /// Absolute or relative interpretation of the targets.
    pub kind: TargetKind,
    /// Whether the transition animates.
    pub animation: AnimationMode,
    /// Whether the target is resolved against snap points.
    pub snap_points: SnapPointsMode,
}

impl OffsetsChange {
    /// An absolute offsets change with default animation and snap modes.
    #[must_use]
    pub fn absolute(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
            kind: TargetKind::Absolute,
            animation: AnimationMode::default(),
            snap_points: SnapPointsMode::default(),
        }
    }

    /// A change relative to the current view.
    #[must_use]
    pub fn relative(horizontal: f64, vertical: f64) -> Self {
        Self {
            kind: TargetKind::RelativeToCurrentView,
            ..Self::absolute(horizontal, vertical)
        }
    }

    /// Sets the animation mode.
    #[must_use]
    pub fn with_animation(mut self, animation: AnimationMode) -> Self {
        self.animation = animation;
        self
    }

    /// Sets the snap points mode.
    #[must_use]
    pub fn with_snap_points(mut self, snap_points: SnapPointsMode) -> Self {
        self.snap_points = snap_points;
        self
    }
}

/// An offsets change expressed as an additional velocity.
///
/// The engine converts the velocity into a displacement via the inertia
/// model and animates toward the resulting target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetsVelocityChange {
    /// Horizontal velocity in units per second.
    pub horizontal_velocity: f32,
    /// Vertical velocity in units per second.
    pub vertical_velocity: f32,
    /// Inertia decay rate in `(0, 1)`; the engine default applies if absent.
    pub inertia_decay_rate: Option<f32>,
}

impl OffsetsVelocityChange {
    /// A velocity change with the engine's default inertia decay rate.
    #[must_use]
    pub fn new(horizontal_velocity: f32, vertical_velocity: f32) -> Self {
        Self {
            horizontal_velocity,
            vertical_velocity,
            inertia_decay_rate: None,
        }
    }

    /// Sets an explicit inertia decay rate.
    #[must_use]
    pub fn with_inertia_decay_rate(mut self, rate: f32) -> Self {
        self.inertia_decay_rate = Some(rate);
        self
    }
}

/// A zoom factor change request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomFactorChange {
    /// Requested zoom factor or delta, per [`ZoomFactorChange::kind`].
    pub zoom_factor: f32,
    /// Absolute or relative interpretation of the target.
    pub kind: TargetKind,
    /// The viewport point held stationary during the zoom; the viewport
    /// center when absent.
    pub center_point: Option<Point>,
    /// Whether the transition animates.
    pub animation: AnimationMode,
    /// Whether the target is resolved against zoom snap points.
    pub snap_points: SnapPointsMode,
}

impl ZoomFactorChange {
    /// An absolute zoom change with default animation and snap modes.
    #[must_use]
    pub fn absolute(zoom_factor: f32) -> Self {
        Self {
            zoom_factor,
            kind: TargetKind::Absolute,
            center_point: None,
            animation: AnimationMode::default(),
            snap_points: SnapPointsMode::default(),
        }
    }

    /// A change relative to the current zoom factor.
    #[must_use]
    pub fn relative(delta: f32) -> Self {
        Self {
            kind: TargetKind::RelativeToCurrentView,
            ..Self::absolute(delta)
        }
    }

    /// Sets the viewport point held stationary during the zoom.
    #[must_use]
    pub fn with_center_point(mut self, center: Point) -> Self {
        self.center_point = Some(center);
        self
    }

    /// Sets the animation mode.
    #[must_use]
    pub fn with_animation(mut self, animation: AnimationMode) -> Self {
        self.animation = animation;
        self
    }

    /// Sets the snap points mode.
    #[must_use]
    pub fn with_snap_points(mut self, snap_points: SnapPointsMode) -> Self {
        self.snap_points = snap_points;
        self
    }
}

/// A zoom factor change expressed as an additional velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomVelocityChange {
    /// Zoom velocity in units per second.
    pub velocity: f32,
    /// Inertia decay rate in `(0, 1)`; the engine default applies if absent.
    pub inertia_decay_rate: Option<f32>,
    /// The viewport point held stationary during the zoom; the viewport
    /// center when absent.
    pub center_point: Option<Point>,
}

impl ZoomVelocityChange {
    /// A velocity change with the engine's default inertia decay rate.
    #[must_use]
    pub fn new(velocity: f32) -> Self {
        Self {
            velocity,
            inertia_decay_rate: None,
            center_point: None,
        }
    }

    /// Sets an explicit inertia decay rate.
    #[must_use]
    pub fn with_inertia_decay_rate(mut self, rate: f32) -> Self {
        self.inertia_decay_rate = Some(rate);
        self
    }

    /// Sets the viewport point held stationary during the zoom.
    #[must_use]
    pub fn with_center_point(mut self, center: Point) -> Self {
        self.center_point = Some(center);
        self
    }
}

bitflags! {
    /// The classes of user input the engine reacts to.
    ///
    /// A typed set with union/intersection, so input policies compose
    /// without raw bit arithmetic.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct InputKinds: u8 {
        /// Direct touch manipulation.
        const TOUCH = 1;
        /// Pen/stylus manipulation.
        const PEN = 1 << 1;
        /// Mouse wheel rotation.
        const MOUSE_WHEEL = 1 << 2;
        /// Keyboard scrolling keys.
        const KEYBOARD = 1 << 3;
        /// Gamepad stick/trigger input.
        const GAMEPAD = 1 << 4;
    }
}

/// Error returned when a view-change request is rejected.
///
/// No change id is issued and no state is mutated when a request fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestError {
    /// A target offset, zoom factor, or velocity is NaN or infinite.
    InvalidTarget,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget => write!(f, "view change target must be finite"),
        }
    }
}

impl core::error::Error for RequestError {}

#[cfg(test)]
mod tests {
    use super::{AnimationMode, InputKinds, OffsetsChange, TargetKind};

    #[test]
    fn builders_set_modes() {
        let change = OffsetsChange::relative(10.0, -5.0).with_animation(AnimationMode::Disable);
        assert_eq!(change.kind, TargetKind::RelativeToCurrentView);
        assert!(!change.animation.is_animated());
        assert!(AnimationMode::Auto.is_animated());
    }

    #[test]
    fn input_kinds_compose_as_a_set() {
        let ignored = InputKinds::MOUSE_WHEEL | InputKinds::KEYBOARD;
        assert!(ignored.contains(InputKinds::MOUSE_WHEEL));
        assert!(!ignored.contains(InputKinds::TOUCH));
        assert_eq!(
            ignored & (InputKinds::TOUCH | InputKinds::KEYBOARD),
            InputKinds::KEYBOARD
        );
    }
}
