// Copyright 2025 the Scrollkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Current view of a scrollable surface: offsets, zoom, extent, viewport.
///
/// `ViewState` is the single source of truth for where the view sits. It is
/// mutated only by the view-change pipeline and the anchoring resolver;
/// everything else reads snapshots.
///
/// Offsets are expressed in zoomed content pixels and, once settled, lie in
/// `[0, max(0, extent * zoom - viewport)]` per axis. Setters clamp silently;
/// out-of-range values are not an error.
#[derive(Clone, Debug)]
pub struct ViewState {
    horizontal_offset: f64,
    vertical_offset: f64,
    zoom_factor: f32,
    min_zoom_factor: f32,
    max_zoom_factor: f32,
    extent_width: f64,
    extent_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    horizontal_layout_offset: f64,
    vertical_layout_offset: f64,
}

impl ViewState {
    /// Creates a view over the given viewport with empty content.
    ///
    /// - Initial offsets are zero and the zoom factor is `1.0`.
    /// - Zoom is clamped to the range `[0.1, 10.0]` by default.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
            zoom_factor: 1.0,
            min_zoom_factor: 0.1,
            max_zoom_factor: 10.0,
            extent_width: 0.0,
            extent_height: 0.0,
            viewport_width,
            viewport_height,
            horizontal_layout_offset: 0.0,
            vertical_layout_offset: 0.0,
        }
    }

    /// Returns the current horizontal offset in zoomed content pixels.
    #[must_use]
    pub fn horizontal_offset(&self) -> f64 {
        self.horizontal_offset
    }

    /// Returns the current vertical offset in zoomed content pixels.
    #[must_use]
    pub fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    /// Returns the current zoom factor.
    #[must_use]
    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Returns the content extent (unzoomed), width then height.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        (self.extent_width, self.extent_height)
    }

    /// Returns the viewport size, width then height.
    #[must_use]
    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Returns the content width multiplied by the current zoom factor.
    #[must_use]
    pub fn scaled_extent_width(&self) -> f64 {
        self.extent_width * f64::from(self.zoom_factor)
    }

    /// Returns the content height multiplied by the current zoom factor.
    #[must_use]
    pub fn scaled_extent_height(&self) -> f64 {
        self.extent_height * f64::from(self.zoom_factor)
    }

    /// Returns the maximum settled horizontal offset.
    ///
    /// Zero when the content is narrower than the viewport.
    #[must_use]
    pub fn max_horizontal_offset(&self) -> f64 {
        (self.scaled_extent_width() - self.viewport_width).max(0.0)
    }

    /// Returns the maximum settled vertical offset.
    ///
    /// Zero when the content is shorter than the viewport.
    #[must_use]
    pub fn max_vertical_offset(&self) -> f64 {
        (self.scaled_extent_height() - self.viewport_height).max(0.0)
    }

    /// Clamps a proposed horizontal offset into the settled range.
    #[must_use]
    pub fn clamp_horizontal(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_horizontal_offset())
    }

    /// Clamps a proposed vertical offset into the settled range.
    #[must_use]
    pub fn clamp_vertical(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_vertical_offset())
    }

    /// Sets both offsets, clamping each into its settled range.
    pub fn set_offsets(&mut self, horizontal: f64, vertical: f64) {
        self.horizontal_offset = self.clamp_horizontal(horizontal);
        self.vertical_offset = self.clamp_vertical(vertical);
    }

    /// Sets the minimum and maximum zoom factors.
    ///
    /// The provided range is normalized so that `min <= max`. The current
    /// zoom factor is clamped into the new range.
    pub fn set_zoom_limits(&mut self, min: f32, max: f32) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_zoom_factor = min.max(0.0);
        self.max_zoom_factor = max.max(0.0);
        self.set_zoom_factor(self.zoom_factor);
    }

    /// Returns the zoom factor limits, minimum then maximum.
    #[must_use]
    pub fn zoom_limits(&self) -> (f32, f32) {
        (self.min_zoom_factor, self.max_zoom_factor)
    }

    /// Clamps a proposed zoom factor into the configured limits.
    #[must_use]
    pub fn clamp_zoom_factor(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom_factor, self.max_zoom_factor)
    }

    /// Sets the zoom factor, clamping it into the configured limits and
    /// re-clamping offsets against the new scaled extent.
    pub fn set_zoom_factor(&mut self, zoom: f32) {
        self.zoom_factor = self.clamp_zoom_factor(zoom);
        self.set_offsets(self.horizontal_offset, self.vertical_offset);
    }

    /// Sets the unzoomed content extent, re-clamping offsets.
    pub fn set_extent(&mut self, width: f64, height: f64) {
        self.extent_width = width.max(0.0);
        self.extent_height = height.max(0.0);
        self.set_offsets(self.horizontal_offset, self.vertical_offset);
    }

    /// Sets the viewport size, re-clamping offsets.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.set_offsets(self.horizontal_offset, self.vertical_offset);
    }

    /// Applies an anchoring correction to both offsets atomically.
    ///
    /// The deltas shift the offsets and accumulate into the layout offset
    /// corrections readable via [`ViewState::layout_offsets`]. Offsets are
    /// clamped after the shift.
    pub fn apply_layout_correction(&mut self, horizontal_delta: f64, vertical_delta: f64) {
        self.horizontal_layout_offset += horizontal_delta;
        self.vertical_layout_offset += vertical_delta;
        self.set_offsets(
            self.horizontal_offset + horizontal_delta,
            self.vertical_offset + vertical_delta,
        );
    }

    /// Returns the accumulated layout offset corrections produced by
    /// anchoring, horizontal then vertical. Diagnostic only.
    #[must_use]
    pub fn layout_offsets(&self) -> (f64, f64) {
        (self.horizontal_layout_offset, self.vertical_layout_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewState;

    #[test]
    fn offsets_clamp_into_settled_range() {
        let mut view = ViewState::new(500.0, 500.0);
        view.set_extent(800.0, 2000.0);

        view.set_offsets(-10.0, 5000.0);
        assert_eq!(view.horizontal_offset(), 0.0);
        assert_eq!(view.vertical_offset(), 1500.0);
    }

    #[test]
    fn small_content_pins_offsets_to_zero() {
        let mut view = ViewState::new(500.0, 500.0);
        view.set_extent(100.0, 100.0);

        view.set_offsets(50.0, 50.0);
        assert_eq!(view.horizontal_offset(), 0.0);
        assert_eq!(view.vertical_offset(), 0.0);
        assert_eq!(view.max_vertical_offset(), 0.0);
    }

    #[test]
    fn zoom_scales_the_offset_range() {
        let mut view = ViewState::new(500.0, 500.0);
        view.set_extent(1000.0, 1000.0);
        view.set_zoom_factor(2.0);

        assert_eq!(view.scaled_extent_height(), 2000.0);
        assert_eq!(view.max_vertical_offset(), 1500.0);

        // Zooming back out re-clamps offsets against the smaller extent.
        view.set_offsets(0.0, 1500.0);
        view.set_zoom_factor(1.0);
        assert_eq!(view.vertical_offset(), 500.0);
    }

    #[test]
    fn zoom_limits_are_normalized_and_applied() {
        let mut view = ViewState::new(500.0, 500.0);
        view.set_zoom_limits(4.0, 0.5);
        assert_eq!(view.zoom_limits(), (0.5, 4.0));

        view.set_zoom_factor(10.0);
        assert_eq!(view.zoom_factor(), 4.0);
        view.set_zoom_factor(0.01);
        assert_eq!(view.zoom_factor(), 0.5);
    }

    #[test]
    fn layout_correction_shifts_offsets_and_accumulates() {
        let mut view = ViewState::new(500.0, 500.0);
        view.set_extent(500.0, 2000.0);
        view.set_offsets(0.0, 350.0);

        view.apply_layout_correction(0.0, -30.0);
        assert_eq!(view.vertical_offset(), 320.0);
        assert_eq!(view.layout_offsets(), (0.0, -30.0));

        view.apply_layout_correction(0.0, -10.0);
        assert_eq!(view.layout_offsets(), (0.0, -40.0));
    }
}
