// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollkit Snap Points: snap point model and per-axis resolution.
//!
//! Snap points constrain where a scroll offset or zoom factor comes to rest.
//! This crate provides:
//!
//! - [`SnapPoint`]: an irregular (single value) or repeated (interval lattice)
//!   snap point, each tagged mandatory or optional and carrying an
//!   [`SnapAlignment`] relative to the viewport.
//! - [`SnapPointRegistry`]: one ordered collection per [`SnapAxis`]
//!   (horizontal offset, vertical offset, zoom factor) with validated
//!   registration and deterministic nearest-point resolution.
//!
//! The registry is a pure model: it knows nothing about animations, input, or
//! the view-change pipeline. Engines consult [`SnapPointRegistry::resolve`]
//! when a request asks for its target to respect snap points, and skip the
//! registry entirely otherwise.
//!
//! ## Minimal example
//!
//! ```rust
//! use scrollkit_snap_points::{SnapAxis, SnapPoint, SnapPointRegistry};
//!
//! let mut registry = SnapPointRegistry::new();
//! registry
//!     .add(SnapAxis::VerticalOffset, SnapPoint::irregular(600.0))
//!     .unwrap();
//!
//! // A mandatory point always attracts the nearest target.
//! let resolved = registry.resolve(SnapAxis::VerticalOffset, 650.0, 500.0);
//! assert_eq!(resolved, 600.0);
//! ```
//!
//! Optional snap points only apply inside their applicable range:
//!
//! ```rust
//! use scrollkit_snap_points::{SnapAxis, SnapPoint, SnapPointRegistry};
//!
//! let mut registry = SnapPointRegistry::new();
//! registry
//!     .add(
//!         SnapAxis::VerticalOffset,
//!         SnapPoint::irregular(300.0).optional(50.0),
//!     )
//!     .unwrap();
//! registry
//!     .add(
//!         SnapAxis::VerticalOffset,
//!         SnapPoint::irregular(400.0).optional(25.0),
//!     )
//!     .unwrap();
//!
//! // 370 lies outside both 250..350 and 375..425, so it is left unchanged.
//! let resolved = registry.resolve(SnapAxis::VerticalOffset, 370.0, 500.0);
//! assert_eq!(resolved, 370.0);
//! ```

mod point;
mod registry;

pub use point::{SnapAlignment, SnapPoint, SnapPointError, SnapPointKind};
pub use registry::{SnapAxis, SnapPointRegistry};
