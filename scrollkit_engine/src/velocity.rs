// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Velocity-to-displacement and distance-to-duration mapping.
//!
//! Velocity-driven requests project where inertia would carry the view using
//! an exponential decay model, then animate to that target over a duration
//! proportional to the distance covered. Both halves are configurable at
//! runtime so hosts and test harnesses can tune the feel.

/// Inertia decay rate applied when a velocity request does not specify one.
pub const DEFAULT_INERTIA_DECAY_RATE: f32 = 0.95;

/// Velocity units a single wheel notch (one [`MouseWheelConfig::delta_per_velocity_unit`]
/// worth of delta) contributes, at most, in either direction.
pub const MAX_WHEEL_VELOCITY_UNITS: f32 = 5.0;

/// Distance-to-duration parameters for one family of view changes.
///
/// The duration of an animated transition is
/// `clamp(distance * ms_per_unit, min_ms, max_ms)`. Offsets and zoom factor
/// changes carry independent profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VelocityProfile {
    /// Milliseconds of animation per unit of distance.
    pub ms_per_unit: u64,
    /// Shortest allowed animation, in milliseconds.
    pub min_ms: u64,
    /// Longest allowed animation, in milliseconds.
    pub max_ms: u64,
}

impl VelocityProfile {
    /// Default profile for offsets changes.
    pub const OFFSETS: Self = Self {
        ms_per_unit: 5,
        min_ms: 50,
        max_ms: 1000,
    };

    /// Default profile for zoom factor changes.
    ///
    /// Zoom distances are small (factors, not pixels), hence the much larger
    /// per-unit weight.
    pub const ZOOM_FACTOR: Self = Self {
        ms_per_unit: 250,
        min_ms: 50,
        max_ms: 1000,
    };

    /// Maps an absolute distance to an animation duration in milliseconds.
    ///
    /// A zero distance yields `min_ms`; very large distances clamp to
    /// `max_ms`.
    #[must_use]
    pub fn duration_ms(&self, distance: f64) -> u64 {
        let raw = distance.abs() * self.ms_per_unit as f64;
        if !raw.is_finite() {
            return self.max_ms;
        }
        // Truncation is fine: durations clamp well below 2^53 ms.
        (raw as u64).clamp(self.min_ms, self.max_ms)
    }
}

/// Projects the displacement inertia would cover for a starting velocity.
///
/// Integrating an exponentially decaying velocity `v * decay^t` over all time
/// gives `v / -ln(decay)`. The decay rate is clamped into `(0, 1)` so the
/// projection is always finite; a zero velocity yields zero displacement.
#[must_use]
pub fn inertia_displacement(velocity: f32, decay_rate: f32) -> f64 {
    if velocity == 0.0 {
        return 0.0;
    }
    let decay = f64::from(decay_rate).clamp(1e-6, 1.0 - 1e-6);
    f64::from(velocity) / -decay.ln()
}

/// Inverse of [`inertia_displacement`]: the starting velocity whose inertia
/// covers exactly `displacement` under `decay_rate`.
#[must_use]
pub fn velocity_for_displacement(displacement: f64, decay_rate: f32) -> f32 {
    if displacement == 0.0 {
        return 0.0;
    }
    let decay = f64::from(decay_rate).clamp(1e-6, 1.0 - 1e-6);
    (displacement * -decay.ln()) as f32
}

/// Mouse wheel input configuration.
///
/// Wheel rotation arrives as deltas in hardware units (one notch is
/// conventionally 120); the engine converts them into velocity units for the
/// inertia model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseWheelConfig {
    /// Wheel delta corresponding to one velocity unit.
    pub delta_per_velocity_unit: f64,
    /// Inertia decay rate applied to wheel-driven scrolling.
    pub inertia_decay_rate: f32,
    /// Text lines scrolled per notch for line-based hosts.
    pub scroll_lines: u32,
    /// Characters scrolled per notch for horizontal line-based hosts.
    pub scroll_chars: u32,
}

impl MouseWheelConfig {
    /// Converts a raw wheel delta into velocity units.
    ///
    /// The result is clamped to [`MAX_WHEEL_VELOCITY_UNITS`] in either
    /// direction so one large notch burst cannot fling the view arbitrarily
    /// far.
    #[must_use]
    pub fn velocity_units_for_delta(&self, delta: f64) -> f32 {
        if self.delta_per_velocity_unit == 0.0 {
            return 0.0;
        }
        let units = delta / self.delta_per_velocity_unit;
        // Truncation to f32 is deliberate: velocities are f32 throughout.
        (units as f32).clamp(-MAX_WHEEL_VELOCITY_UNITS, MAX_WHEEL_VELOCITY_UNITS)
    }
}

impl Default for MouseWheelConfig {
    fn default() -> Self {
        Self {
            delta_per_velocity_unit: 120.0,
            inertia_decay_rate: 0.999_972,
            scroll_lines: 3,
            scroll_chars: 3,
        }
    }
}
