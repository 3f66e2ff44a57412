// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis snap point collections and nearest-point resolution.

use crate::point::{SnapAlignment, SnapPoint, SnapPointError, SnapPointKind};

/// The axis a snap point collection constrains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapAxis {
    /// Horizontal scroll offset.
    HorizontalOffset,
    /// Vertical scroll offset.
    VerticalOffset,
    /// Zoom factor. Alignment is ignored on this axis (the viewport length
    /// passed to [`SnapPointRegistry::resolve`] is conventionally zero).
    ZoomFactor,
}

/// Ordered snap point collections for the three snappable axes.
///
/// Registration order is significant: when two applicable snap points are
/// equally attractive, the earlier-registered one wins, which keeps
/// resolution deterministic across repeated calls.
#[derive(Clone, Debug, Default)]
pub struct SnapPointRegistry {
    horizontal: Vec<SnapPoint>,
    vertical: Vec<SnapPoint>,
    zoom: Vec<SnapPoint>,
}

impl SnapPointRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a snap point on the given axis.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapPointError`] and leaves the registry unchanged when
    /// the snap point fails validation.
    pub fn add(&mut self, axis: SnapAxis, point: SnapPoint) -> Result<(), SnapPointError> {
        point.validate()?;
        self.points_mut(axis).push(point);
        Ok(())
    }

    /// Removes the snap point at `index` on the given axis.
    ///
    /// Returns the removed point, or `None` if the index is out of bounds.
    /// Later points shift down, preserving relative registration order.
    pub fn remove(&mut self, axis: SnapAxis, index: usize) -> Option<SnapPoint> {
        let points = self.points_mut(axis);
        if index < points.len() {
            Some(points.remove(index))
        } else {
            None
        }
    }

    /// Removes all snap points on the given axis.
    pub fn clear(&mut self, axis: SnapAxis) {
        self.points_mut(axis).clear();
    }

    /// Returns the snap points registered on the given axis, in order.
    #[must_use]
    pub fn points(&self, axis: SnapAxis) -> &[SnapPoint] {
        match axis {
            SnapAxis::HorizontalOffset => &self.horizontal,
            SnapAxis::VerticalOffset => &self.vertical,
            SnapAxis::ZoomFactor => &self.zoom,
        }
    }

    /// Resolves a proposed target against the axis' snap points.
    ///
    /// Returns the aligned position of the most attractive applicable snap
    /// point, or `raw_target` unchanged when none applies. Mandatory points
    /// are always considered; optional points only within their applicable
    /// range. Preference order: mandatory over optional, then smallest
    /// distance to `raw_target`, then registration order.
    ///
    /// `viewport` is the viewport length along the axis, used by center/far
    /// alignment.
    #[must_use]
    pub fn resolve(&self, axis: SnapAxis, raw_target: f64, viewport: f64) -> f64 {
        let mut best: Option<Resolution> = None;

        for (index, point) in self.points(axis).iter().enumerate() {
            let Some(aligned) = candidate_position(point, raw_target, viewport) else {
                continue;
            };
            let candidate = Resolution {
                aligned,
                distance: (aligned - raw_target).abs(),
                mandatory: point.mandatory,
                index,
            };
            match &best {
                None => best = Some(candidate),
                Some(current) if candidate.beats(current) => best = Some(candidate),
                Some(_) => {}
            }
        }

        best.map_or(raw_target, |r| r.aligned)
    }

    fn points_mut(&mut self, axis: SnapAxis) -> &mut Vec<SnapPoint> {
        match axis {
            SnapAxis::HorizontalOffset => &mut self.horizontal,
            SnapAxis::VerticalOffset => &mut self.vertical,
            SnapAxis::ZoomFactor => &mut self.zoom,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Resolution {
    aligned: f64,
    distance: f64,
    mandatory: bool,
    index: usize,
}

impl Resolution {
    /// Strict preference, so equal candidates keep the earlier registration.
    fn beats(&self, other: &Self) -> bool {
        debug_assert!(self.index > other.index, "candidates arrive in order");
        if self.mandatory != other.mandatory {
            return self.mandatory;
        }
        self.distance < other.distance
    }
}

/// Offset subtracted from a snap value to obtain its aligned position.
fn alignment_shift(alignment: SnapAlignment, viewport: f64) -> f64 {
    match alignment {
        SnapAlignment::Near => 0.0,
        SnapAlignment::Center => viewport / 2.0,
        SnapAlignment::Far => viewport,
    }
}

/// Returns the aligned settled position for `point`, or `None` when the
/// point does not apply to `raw_target`.
fn candidate_position(point: &SnapPoint, raw_target: f64, viewport: f64) -> Option<f64> {
    let shift = alignment_shift(point.alignment, viewport);
    match point.kind {
        SnapPointKind::Irregular {
            value,
            applicable_range,
        } => {
            let aligned = value - shift;
            if point.mandatory {
                return Some(aligned);
            }
            // An optional point with no range never applies.
            let range = applicable_range?;
            ((raw_target - aligned).abs() <= range).then_some(aligned)
        }
        SnapPointKind::Repeated {
            offset,
            interval,
            start,
            end,
            applicable_range,
        } => {
            // Nearest lattice value in snap-value space, clamped to the span.
            let target_value = raw_target + shift;
            let cell = ((target_value - offset) / interval).round();
            let value = (offset + cell * interval).clamp(start, end);
            let aligned = value - shift;
            if point.mandatory {
                return Some(aligned);
            }
            let range = applicable_range.unwrap_or(interval / 2.0);
            ((target_value - value).abs() <= range).then_some(aligned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapAxis, SnapPointRegistry};
    use crate::point::{SnapAlignment, SnapPoint};

    const AXIS: SnapAxis = SnapAxis::VerticalOffset;

    #[test]
    fn mandatory_point_attracts_nearby_target() {
        let mut registry = SnapPointRegistry::new();
        registry.add(AXIS, SnapPoint::irregular(600.0)).unwrap();

        assert_eq!(registry.resolve(AXIS, 650.0, 500.0), 600.0);
        assert_eq!(registry.resolve(AXIS, 0.0, 500.0), 600.0);
    }

    #[test]
    fn optional_points_only_apply_in_range() {
        let mut registry = SnapPointRegistry::new();
        registry
            .add(AXIS, SnapPoint::irregular(300.0).optional(50.0))
            .unwrap();
        registry
            .add(AXIS, SnapPoint::irregular(400.0).optional(25.0))
            .unwrap();

        // 370 lies outside 250..350 and outside 375..425.
        assert_eq!(registry.resolve(AXIS, 370.0, 500.0), 370.0);
        // 340 is inside the first zone.
        assert_eq!(registry.resolve(AXIS, 340.0, 500.0), 300.0);
        // 380 is inside the second zone.
        assert_eq!(registry.resolve(AXIS, 380.0, 500.0), 400.0);
    }

    #[test]
    fn equal_distance_prefers_earlier_registration() {
        let mut registry = SnapPointRegistry::new();
        registry
            .add(AXIS, SnapPoint::irregular(100.0).optional(60.0))
            .unwrap();
        registry
            .add(AXIS, SnapPoint::irregular(200.0).optional(60.0))
            .unwrap();

        // 150 is equidistant from both; resolution must be stable.
        for _ in 0..8 {
            assert_eq!(registry.resolve(AXIS, 150.0, 500.0), 100.0);
        }
    }

    #[test]
    fn mandatory_beats_closer_optional() {
        let mut registry = SnapPointRegistry::new();
        registry
            .add(AXIS, SnapPoint::irregular(140.0).optional(50.0))
            .unwrap();
        registry.add(AXIS, SnapPoint::irregular(400.0)).unwrap();

        assert_eq!(registry.resolve(AXIS, 150.0, 500.0), 400.0);
    }

    #[test]
    fn repeated_point_snaps_to_nearest_lattice_value() {
        let mut registry = SnapPointRegistry::new();
        registry
            .add(AXIS, SnapPoint::repeated(0.0, 100.0, 0.0, 1000.0))
            .unwrap();

        assert_eq!(registry.resolve(AXIS, 340.0, 500.0), 300.0);
        assert_eq!(registry.resolve(AXIS, 360.0, 500.0), 400.0);
        // Lattice values outside the span clamp to its edges.
        assert_eq!(registry.resolve(AXIS, 1_400.0, 500.0), 1_000.0);
    }

    #[test]
    fn optional_repeated_uses_explicit_zone() {
        let mut registry = SnapPointRegistry::new();
        let point = SnapPoint::repeated(0.0, 100.0, 0.0, 1000.0).optional(10.0);
        registry.add(AXIS, point).unwrap();

        // Inside the 10-unit zone around 300.
        assert_eq!(registry.resolve(AXIS, 305.0, 500.0), 300.0);
        // Between cells, outside every zone.
        assert_eq!(registry.resolve(AXIS, 350.0, 500.0), 350.0);
    }

    #[test]
    fn optional_repeated_defaults_to_half_interval_zone() {
        let mut registry = SnapPointRegistry::new();
        let mut point = SnapPoint::repeated(0.0, 100.0, 0.0, 1000.0);
        point.mandatory = false;
        registry.add(AXIS, point).unwrap();

        // Every in-span target is within half an interval of some lattice
        // value, so the point always applies inside its span.
        assert_eq!(registry.resolve(AXIS, 349.0, 500.0), 300.0);
        assert_eq!(registry.resolve(AXIS, 351.0, 500.0), 400.0);
        // Far outside the span the clamped edge value is out of reach.
        assert_eq!(registry.resolve(AXIS, 1_200.0, 500.0), 1_200.0);
    }

    #[test]
    fn center_and_far_alignment_shift_the_settled_position() {
        let viewport = 500.0;
        let mut registry = SnapPointRegistry::new();
        registry
            .add(
                AXIS,
                SnapPoint::irregular(600.0).with_alignment(SnapAlignment::Center),
            )
            .unwrap();
        assert_eq!(registry.resolve(AXIS, 340.0, viewport), 350.0);

        registry.clear(AXIS);
        registry
            .add(
                AXIS,
                SnapPoint::irregular(600.0).with_alignment(SnapAlignment::Far),
            )
            .unwrap();
        assert_eq!(registry.resolve(AXIS, 90.0, viewport), 100.0);
    }

    #[test]
    fn invalid_point_leaves_registry_unchanged() {
        let mut registry = SnapPointRegistry::new();
        let result = registry.add(AXIS, SnapPoint::repeated(0.0, -1.0, 0.0, 100.0));
        assert!(result.is_err());
        assert!(registry.points(AXIS).is_empty());
    }

    #[test]
    fn remove_and_clear_manage_the_collection() {
        let mut registry = SnapPointRegistry::new();
        registry.add(AXIS, SnapPoint::irregular(100.0)).unwrap();
        registry.add(AXIS, SnapPoint::irregular(200.0)).unwrap();

        let removed = registry.remove(AXIS, 0).unwrap();
        assert_eq!(removed, SnapPoint::irregular(100.0));
        assert_eq!(registry.points(AXIS).len(), 1);
        assert!(registry.remove(AXIS, 5).is_none());

        registry.clear(AXIS);
        assert!(registry.points(AXIS).is_empty());
    }

    #[test]
    fn axes_are_independent() {
        let mut registry = SnapPointRegistry::new();
        registry
            .add(SnapAxis::HorizontalOffset, SnapPoint::irregular(100.0))
            .unwrap();

        assert_eq!(registry.resolve(SnapAxis::VerticalOffset, 340.0, 500.0), 340.0);
        assert_eq!(
            registry.resolve(SnapAxis::HorizontalOffset, 340.0, 500.0),
            100.0
        );
    }
}
