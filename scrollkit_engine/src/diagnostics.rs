// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-owned diagnostic configuration.
//!
//! Diagnostics are explicitly auxiliary: levels gate what the engine reports
//! through the [`log`] facade, and a fully disabled configuration must not
//! change engine behavior in any observable way. The configuration is passed
//! in at construction; there are no hidden globals.

use core::fmt;

/// Verbosity of one diagnostic area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DiagnosticsLevel {
    /// No output.
    #[default]
    None,
    /// Coarse lifecycle messages (requests accepted, completions).
    Info,
    /// Per-tick and per-resolution detail.
    Verbose,
}

/// The engine areas that can be traced independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticsArea {
    /// Request intake, supersession, and completion.
    ViewChanges,
    /// Snap point resolution outcomes.
    SnapPoints,
    /// Anchor selection and corrections.
    Anchoring,
    /// Scroll controller mirroring.
    Controllers,
}

/// Per-area diagnostic levels for one engine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DiagnosticsConfig {
    /// Level for request intake, supersession, and completion.
    pub view_changes: DiagnosticsLevel,
    /// Level for snap point resolution outcomes.
    pub snap_points: DiagnosticsLevel,
    /// Level for anchor selection and corrections.
    pub anchoring: DiagnosticsLevel,
    /// Level for scroll controller mirroring.
    pub controllers: DiagnosticsLevel,
}

impl DiagnosticsConfig {
    /// A configuration with every area silenced.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A configuration tracing every area verbosely.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            view_changes: DiagnosticsLevel::Verbose,
            snap_points: DiagnosticsLevel::Verbose,
            anchoring: DiagnosticsLevel::Verbose,
            controllers: DiagnosticsLevel::Verbose,
        }
    }

    /// Returns the configured level for an area.
    #[must_use]
    pub fn level(&self, area: DiagnosticsArea) -> DiagnosticsLevel {
        match area {
            DiagnosticsArea::ViewChanges => self.view_changes,
            DiagnosticsArea::SnapPoints => self.snap_points,
            DiagnosticsArea::Anchoring => self.anchoring,
            DiagnosticsArea::Controllers => self.controllers,
        }
    }

    /// Routes a message to the `log` facade when the area is enabled at
    /// `level`.
    pub(crate) fn emit(&self, area: DiagnosticsArea, level: DiagnosticsLevel, args: fmt::Arguments<'_>) {
        if self.level(area) < level {
            return;
        }
        let target = match area {
            DiagnosticsArea::ViewChanges => "scrollkit::view_changes",
            DiagnosticsArea::SnapPoints => "scrollkit::snap_points",
            DiagnosticsArea::Anchoring => "scrollkit::anchoring",
            DiagnosticsArea::Controllers => "scrollkit::controllers",
        };
        match level {
            DiagnosticsLevel::None => {}
            DiagnosticsLevel::Info => log::debug!(target: target, "{args}"),
            DiagnosticsLevel::Verbose => log::trace!(target: target, "{args}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagnosticsArea, DiagnosticsConfig, DiagnosticsLevel};

    #[test]
    fn levels_order_none_info_verbose() {
        assert!(DiagnosticsLevel::None < DiagnosticsLevel::Info);
        assert!(DiagnosticsLevel::Info < DiagnosticsLevel::Verbose);
    }

    #[test]
    fn disabled_config_reports_none_everywhere() {
        let config = DiagnosticsConfig::disabled();
        assert_eq!(
            config.level(DiagnosticsArea::ViewChanges),
            DiagnosticsLevel::None
        );
        assert_eq!(
            config.level(DiagnosticsArea::Anchoring),
            DiagnosticsLevel::None
        );
    }
}
