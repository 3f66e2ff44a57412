// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content anchoring: selecting an element to hold visually stable across
//! extent changes.
//!
//! When content is inserted, removed, or resized while the user is not
//! dragging, the view should not appear to jump. The anchoring resolver picks
//! an anchor (an element, or an extent edge) and the host applies the
//! element's position delta as a corrective offset atomically with the size
//! change.

use kurbo::{Rect, Vec2};

use crate::ViewState;

/// Opaque identifier for a content element offered as an anchor candidate.
///
/// Hosts allocate these; the resolver only compares them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Creates an element id from a host-chosen value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A content element offered to the anchoring resolver.
///
/// Candidates are ephemeral: hosts rebuild the list each time anchoring is
/// evaluated, with `bounds` in the zoomed content coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorCandidate {
    /// The element this candidate refers to.
    pub id: ElementId,
    /// The element's current bounds in zoomed content pixels.
    pub bounds: Rect,
}

/// The outcome of an anchoring evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorDecision {
    /// The selected anchor element, if any.
    pub element: Option<ElementId>,
    /// The anchor point in zoomed content pixels, horizontal then vertical.
    ///
    /// A NaN component means the view is not anchored on that axis.
    pub viewport_anchor_point: (f64, f64),
}

impl AnchorDecision {
    /// A decision that anchors nothing on either axis.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            element: None,
            viewport_anchor_point: (f64::NAN, f64::NAN),
        }
    }

    /// Returns `true` when at least one axis is anchored.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        !self.viewport_anchor_point.0.is_nan() || !self.viewport_anchor_point.1.is_nan()
    }
}

/// Anchoring configuration, owned by the host and consulted on each
/// evaluation.
///
/// A ratio of `0.0` anchors at the near (top/left) viewport edge, `1.0` at
/// the far edge. Ratios outside `[0, 1]` or NaN disable anchoring on that
/// axis. `pinned` short-circuits candidate selection entirely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorConfig {
    /// Fraction into the viewport where the horizontal anchor point sits.
    pub horizontal_ratio: f64,
    /// Fraction into the viewport where the vertical anchor point sits.
    pub vertical_ratio: f64,
    /// Prefer the horizontal extent edge when the view sits at it.
    pub is_anchored_at_horizontal_extent: bool,
    /// Prefer the vertical extent edge when the view sits at it.
    pub is_anchored_at_vertical_extent: bool,
    /// Explicitly pinned anchor element; used unconditionally when set.
    pub pinned: Option<ElementId>,
    /// Tolerance for the "at the extent edge" check, in zoomed content
    /// pixels. Larger values treat offsets near the edge as at the edge.
    pub edge_epsilon: f64,
}

impl AnchorConfig {
    /// Creates a configuration with anchoring disabled on both axes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            horizontal_ratio: f64::NAN,
            vertical_ratio: f64::NAN,
            is_anchored_at_horizontal_extent: false,
            is_anchored_at_vertical_extent: false,
            pinned: None,
            edge_epsilon: 1.0,
        }
    }

    /// Evaluates anchoring for the current view against the candidate set.
    ///
    /// Extent-edge anchoring takes precedence over candidates on its axis;
    /// an explicitly pinned element takes precedence over selection. Among
    /// the remaining candidates, the one intersecting the viewport whose
    /// ratio point lies closest to the viewport anchor point wins, with ties
    /// going to the earlier candidate.
    #[must_use]
    pub fn evaluate(&self, view: &ViewState, candidates: &[AnchorCandidate]) -> AnchorDecision {
        let (viewport_width, viewport_height) = view.viewport();

        let horizontal = AxisAnchor::determine(
            valid_ratio(self.horizontal_ratio),
            self.is_anchored_at_horizontal_extent,
            view.horizontal_offset(),
            view.max_horizontal_offset(),
            view.scaled_extent_width(),
            viewport_width,
            self.edge_epsilon,
        );
        let vertical = AxisAnchor::determine(
            valid_ratio(self.vertical_ratio),
            self.is_anchored_at_vertical_extent,
            view.vertical_offset(),
            view.max_vertical_offset(),
            view.scaled_extent_height(),
            viewport_height,
            self.edge_epsilon,
        );

        let anchor_point = (horizontal.coordinate(), vertical.coordinate());
        if anchor_point.0.is_nan() && anchor_point.1.is_nan() {
            return AnchorDecision::none();
        }

        if let Some(pinned) = self.pinned {
            return AnchorDecision {
                element: Some(pinned),
                viewport_anchor_point: anchor_point,
            };
        }

        let element = self.select_element(view, candidates, horizontal, vertical);
        AnchorDecision {
            element,
            viewport_anchor_point: anchor_point,
        }
    }

    fn select_element(
        &self,
        view: &ViewState,
        candidates: &[AnchorCandidate],
        horizontal: AxisAnchor,
        vertical: AxisAnchor,
    ) -> Option<ElementId> {
        // Edge anchoring needs no element; only ratio-anchored axes
        // participate in the distance score.
        let h_target = horizontal.ratio_target();
        let v_target = vertical.ratio_target();
        if h_target.is_none() && v_target.is_none() {
            return None;
        }

        let (viewport_width, viewport_height) = view.viewport();
        let viewport_rect = Rect::new(
            view.horizontal_offset(),
            view.vertical_offset(),
            view.horizontal_offset() + viewport_width,
            view.vertical_offset() + viewport_height,
        );

        let mut best: Option<(f64, ElementId)> = None;
        for candidate in candidates {
            if candidate.bounds.intersect(viewport_rect).area() <= 0.0 {
                continue;
            }
            let mut score = 0.0;
            if let Some((ratio, target)) = h_target {
                let point = candidate.bounds.x0 + ratio * candidate.bounds.width();
                score += (point - target) * (point - target);
            }
            if let Some((ratio, target)) = v_target {
                let point = candidate.bounds.y0 + ratio * candidate.bounds.height();
                score += (point - target) * (point - target);
            }
            if best.is_none_or(|(best_score, _)| score < best_score) {
                best = Some((score, candidate.id));
            }
        }
        best.map(|(_, id)| id)
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the position delta of an anchor element across a layout change.
///
/// The returned vector is the element's movement within the content; applying
/// it via [`ViewState::apply_layout_correction`] keeps the element's
/// on-screen position unchanged.
#[must_use]
pub fn position_correction(pre_bounds: Rect, post_bounds: Rect) -> Vec2 {
    Vec2::new(post_bounds.x0 - pre_bounds.x0, post_bounds.y0 - pre_bounds.y0)
}

/// How a single axis is anchored, if at all.
#[derive(Clone, Copy, Debug)]
enum AxisAnchor {
    /// Not anchored on this axis.
    None,
    /// Anchored at a ratio fraction into the viewport.
    Ratio {
        ratio: f64,
        /// `offset + ratio * viewport`, in zoomed content pixels.
        target: f64,
    },
    /// Anchored to the far extent edge.
    ExtentEdge { edge: f64 },
}

impl AxisAnchor {
    fn determine(
        ratio: Option<f64>,
        anchored_at_extent: bool,
        offset: f64,
        max_offset: f64,
        scaled_extent: f64,
        viewport: f64,
        edge_epsilon: f64,
    ) -> Self {
        if anchored_at_extent && max_offset > 0.0 && offset + edge_epsilon >= max_offset {
            return Self::ExtentEdge {
                edge: scaled_extent,
            };
        }
        match ratio {
            Some(ratio) => Self::Ratio {
                ratio,
                target: offset + ratio * viewport,
            },
            None => Self::None,
        }
    }

    fn coordinate(self) -> f64 {
        match self {
            Self::None => f64::NAN,
            Self::Ratio { target, .. } => target,
            Self::ExtentEdge { edge } => edge,
        }
    }

    fn ratio_target(self) -> Option<(f64, f64)> {
        match self {
            Self::Ratio { ratio, target } => Some((ratio, target)),
            _ => None,
        }
    }
}

fn valid_ratio(ratio: f64) -> Option<f64> {
    (ratio.is_finite() && (0.0..=1.0).contains(&ratio)).then_some(ratio)
}
