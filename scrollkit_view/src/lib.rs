// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollkit View: view state and content anchoring for scrollable surfaces.
//!
//! This crate provides the headless state model shared by the scrollkit
//! engine:
//!
//! - [`ViewState`]: the single source of truth for the current horizontal and
//!   vertical offsets, zoom factor, content extent, and viewport size, with
//!   clamping helpers and zoom limits.
//! - [`AnchorConfig`] / [`AnchorDecision`]: content anchoring, which keeps a
//!   chosen element visually stable when the content extent changes
//!   underneath the view.
//!
//! It does **not** own any element tree or rendering backend. Hosts are
//! expected to:
//! - Report extent and viewport changes into [`ViewState`] via the engine.
//! - Register anchor candidates (element ids plus bounds) each layout pass.
//! - Apply the corrective offset produced by anchoring atomically with the
//!   size change so no visible jump occurs.
//!
//! ## Minimal anchoring example
//!
//! ```rust
//! use kurbo::Rect;
//! use scrollkit_view::{AnchorCandidate, AnchorConfig, ElementId, ViewState};
//!
//! let mut view = ViewState::new(400.0, 500.0);
//! view.set_extent(400.0, 1000.0);
//! view.set_offsets(0.0, 350.0);
//!
//! let mut config = AnchorConfig::new();
//! config.vertical_ratio = 0.0;
//!
//! // One candidate straddling the top of the viewport.
//! let candidates = [AnchorCandidate {
//!     id: ElementId::new(7),
//!     bounds: Rect::new(0.0, 340.0, 400.0, 380.0),
//! }];
//!
//! let decision = config.evaluate(&view, &candidates);
//! assert_eq!(decision.element, Some(ElementId::new(7)));
//! ```
//!
//! All offsets, extents, and candidate bounds live in the zoomed content
//! coordinate space (content pixels multiplied by the current zoom factor),
//! which is the space scroll offsets are expressed in.
//!
//! This crate is `no_std`.

#![no_std]

mod anchor;
mod state;

pub use anchor::{AnchorCandidate, AnchorConfig, AnchorDecision, ElementId, position_correction};
pub use state::ViewState;
