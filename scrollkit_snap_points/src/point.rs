// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// How a snap point's value relates to the viewport when it settles.
///
/// Alignment shifts the settled position so that the snap value lands at the
/// near edge, the center, or the far edge of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SnapAlignment {
    /// The snap value itself becomes the settled offset (value at the
    /// top/left viewport edge).
    #[default]
    Near,
    /// The snap value lands at the viewport center: settled offset is
    /// `value - viewport / 2`.
    Center,
    /// The snap value lands at the far viewport edge: settled offset is
    /// `value - viewport`.
    Far,
}

/// The shape of a snap point: a single value or a repeating lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapPointKind {
    /// A single snap value with an optional symmetric applicable range.
    Irregular {
        /// The value an in-range target settles to.
        value: f64,
        /// Half-width of the zone in which an optional point applies.
        ///
        /// Mandatory points ignore this for applicability (they always
        /// apply); optional points with no range never apply.
        applicable_range: Option<f64>,
    },
    /// Snap values at `offset + k * interval` clamped into `[start, end]`.
    Repeated {
        /// Phase of the lattice: one snap value lies at `offset`.
        offset: f64,
        /// Spacing between consecutive snap values. Must be positive.
        interval: f64,
        /// Inclusive lower bound of the snapping span.
        start: f64,
        /// Inclusive upper bound of the snapping span. Must be `>= start`.
        end: f64,
        /// Half-width of the zone around each lattice value in which an
        /// optional point applies. Defaults to half the interval (the cell
        /// boundary) when absent.
        applicable_range: Option<f64>,
    },
}

/// A snap point constraining where an offset or zoom factor comes to rest.
///
/// Snap points are immutable once registered; to change one, remove it and
/// add a replacement. Construct with [`SnapPoint::irregular`] or
/// [`SnapPoint::repeated`] and refine with the consuming helpers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapPoint {
    /// The shape of this snap point.
    pub kind: SnapPointKind,
    /// Mandatory points are always considered during resolution; optional
    /// points only apply within their applicable range.
    pub mandatory: bool,
    /// Where the snap value lands relative to the viewport.
    pub alignment: SnapAlignment,
}

impl SnapPoint {
    /// Creates a mandatory irregular snap point at `value` with near
    /// alignment.
    #[must_use]
    pub fn irregular(value: f64) -> Self {
        Self {
            kind: SnapPointKind::Irregular {
                value,
                applicable_range: None,
            },
            mandatory: true,
            alignment: SnapAlignment::Near,
        }
    }

    /// Creates a mandatory repeated snap point with near alignment.
    ///
    /// Snap values lie at `offset + k * interval` for integer `k`, clamped
    /// into `[start, end]`.
    #[must_use]
    pub fn repeated(offset: f64, interval: f64, start: f64, end: f64) -> Self {
        Self {
            kind: SnapPointKind::Repeated {
                offset,
                interval,
                start,
                end,
                applicable_range: None,
            },
            mandatory: true,
            alignment: SnapAlignment::Near,
        }
    }

    /// Marks this snap point optional with the given applicable range.
    ///
    /// Optional points only attract targets within `range` of the snap
    /// value's aligned position.
    #[must_use]
    pub fn optional(mut self, range: f64) -> Self {
        self.mandatory = false;
        self.set_applicable_range(Some(range));
        self
    }

    /// Sets the applicable range without changing the mandatory flag.
    #[must_use]
    pub fn with_applicable_range(mut self, range: f64) -> Self {
        self.set_applicable_range(Some(range));
        self
    }

    /// Sets the alignment of this snap point.
    #[must_use]
    pub fn with_alignment(mut self, alignment: SnapAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns the applicable range, if one was specified.
    #[must_use]
    pub fn applicable_range(&self) -> Option<f64> {
        match self.kind {
            SnapPointKind::Irregular {
                applicable_range, ..
            }
            | SnapPointKind::Repeated {
                applicable_range, ..
            } => applicable_range,
        }
    }

    /// Checks the structural invariants of this snap point.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapPointError`] when `start > end`, the interval is not
    /// positive, the applicable range is negative, or any field is not
    /// finite.
    pub fn validate(&self) -> Result<(), SnapPointError> {
        if let Some(range) = self.applicable_range() {
            if !range.is_finite() {
                return Err(SnapPointError::NonFinite);
            }
            if range < 0.0 {
                return Err(SnapPointError::NegativeApplicableRange { range });
            }
        }
        match self.kind {
            SnapPointKind::Irregular { value, .. } => {
                if !value.is_finite() {
                    return Err(SnapPointError::NonFinite);
                }
            }
            SnapPointKind::Repeated {
                offset,
                interval,
                start,
                end,
                ..
            } => {
                if !(offset.is_finite() && interval.is_finite() && start.is_finite() && end.is_finite())
                {
                    return Err(SnapPointError::NonFinite);
                }
                if interval <= 0.0 {
                    return Err(SnapPointError::NonPositiveInterval { interval });
                }
                if start > end {
                    return Err(SnapPointError::StartAfterEnd { start, end });
                }
            }
        }
        Ok(())
    }

    fn set_applicable_range(&mut self, range: Option<f64>) {
        match &mut self.kind {
            SnapPointKind::Irregular {
                applicable_range, ..
            }
            | SnapPointKind::Repeated {
                applicable_range, ..
            } => *applicable_range = range,
        }
    }
}

/// Error returned when a malformed snap point is registered.
///
/// The registry is left unchanged when registration fails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapPointError {
    /// A repeated snap point's span is inverted.
    StartAfterEnd {
        /// The specified span start.
        start: f64,
        /// The specified span end.
        end: f64,
    },
    /// A repeated snap point's interval is zero or negative.
    NonPositiveInterval {
        /// The specified interval.
        interval: f64,
    },
    /// The applicable range is negative.
    NegativeApplicableRange {
        /// The specified range.
        range: f64,
    },
    /// A snap point field is NaN or infinite.
    NonFinite,
}

impl fmt::Display for SnapPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartAfterEnd { start, end } => {
                write!(f, "repeated snap point start {start} exceeds end {end}")
            }
            Self::NonPositiveInterval { interval } => {
                write!(f, "repeated snap point interval {interval} is not positive")
            }
            Self::NegativeApplicableRange { range } => {
                write!(f, "snap point applicable range {range} is negative")
            }
            Self::NonFinite => write!(f, "snap point fields must be finite"),
        }
    }
}

impl core::error::Error for SnapPointError {}
