use std::fmt;
use std::sync::Arc;

use crate::types::{Axis, ItemMeasure, ScrollPhase};

/// Host callback that measures one item. `ItemMeasure::unknown()` means the
/// item cannot be sized yet; the controller renders it but will not reason
/// across it.
pub type MeasureFn<H> = Arc<dyn Fn(&H) -> ItemMeasure + Send + Sync>;

/// Host callback invoked for every gesture-originated delta before it is
/// applied. Returns the (possibly transformed) delta, or `None` to veto the
/// event entirely. The velocity argument is only present on
/// `ScrollPhase::End`.
pub type ScrollCallback =
    Arc<dyn Fn(f64, ScrollPhase, Option<f64>) -> Option<f64> + Send + Sync>;

/// Configuration for a [`ScrollView`](crate::ScrollView).
///
/// Built with [`ScrollViewOptions::new`] plus `with_*` setters; every field
/// except the measure callback has a default tuned for 60 Hz touch UIs.
/// Options can be swapped at runtime via
/// [`ScrollView::set_options`](crate::ScrollView::set_options).
pub struct ScrollViewOptions<H> {
    /// Measures one item by handle.
    pub measure: MeasureFn<H>,
    /// Scroll axis; picks the component out of 2-D touch/wheel input.
    pub axis: Axis,
    /// Strength of the permanent linear drag force (1/ms).
    pub drag_strength: f64,
    /// Damping ratio of the scroll springs (1.0 = critically damped).
    pub spring_damping_ratio: f64,
    /// Oscillation period of the scroll springs in milliseconds.
    pub spring_period_ms: f64,
    /// Granularity the effective offset is rounded to (px); `<= 0` disables
    /// rounding.
    pub offset_rounding: f64,
    /// Snap the resting offset to page (item) boundaries.
    pub paginated: bool,
    /// Particle energy below which pagination snapping engages.
    pub pagination_energy_threshold: f64,
    /// Stack items from the end edge toward the start edge.
    pub reverse: bool,
    /// Maximum angular deviation from the scroll axis for a touch to be
    /// accepted, in units of a quarter turn; `None` accepts everything.
    pub touch_direction_threshold: Option<f64>,
    /// Multiplier applied to wheel/trackpad deltas.
    pub wheel_scale: f64,
    /// Shift the cached render-group origin along with window
    /// normalization, so sequentially positioned content does not jump.
    pub sequential_scrolling_optimized: bool,
    /// Debug flag: suspend window normalization entirely.
    pub normalization_disabled: bool,
    /// Transforms or vetoes gesture deltas; see [`ScrollCallback`].
    pub scroll_callback: Option<ScrollCallback>,
    /// Upper clamp on the physics step, so a stalled frame cannot teleport
    /// the particle (ms).
    pub max_tick_ms: f64,
}

impl<H> ScrollViewOptions<H> {
    pub fn new(measure: MeasureFn<H>) -> Self {
        Self {
            measure,
            axis: Axis::Vertical,
            drag_strength: 0.001,
            spring_damping_ratio: 1.0,
            spring_period_ms: 500.0,
            offset_rounding: 1.0,
            paginated: false,
            pagination_energy_threshold: 0.001,
            reverse: false,
            touch_direction_threshold: None,
            wheel_scale: 1.0,
            sequential_scrolling_optimized: true,
            normalization_disabled: false,
            scroll_callback: None,
            max_tick_ms: 64.0,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_drag_strength(mut self, drag_strength: f64) -> Self {
        self.drag_strength = drag_strength;
        self
    }

    pub fn with_spring(mut self, damping_ratio: f64, period_ms: f64) -> Self {
        self.spring_damping_ratio = damping_ratio;
        self.spring_period_ms = period_ms;
        self
    }

    pub fn with_offset_rounding(mut self, rounding: f64) -> Self {
        self.offset_rounding = rounding;
        self
    }

    pub fn with_paginated(mut self, paginated: bool) -> Self {
        self.paginated = paginated;
        self
    }

    pub fn with_pagination_energy_threshold(mut self, threshold: f64) -> Self {
        self.pagination_energy_threshold = threshold;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_touch_direction_threshold(mut self, threshold: Option<f64>) -> Self {
        self.touch_direction_threshold = threshold;
        self
    }

    pub fn with_wheel_scale(mut self, scale: f64) -> Self {
        self.wheel_scale = scale;
        self
    }

    pub fn with_sequential_scrolling_optimized(mut self, enabled: bool) -> Self {
        self.sequential_scrolling_optimized = enabled;
        self
    }

    pub fn with_normalization_disabled(mut self, disabled: bool) -> Self {
        self.normalization_disabled = disabled;
        self
    }

    pub fn with_scroll_callback(mut self, callback: ScrollCallback) -> Self {
        self.scroll_callback = Some(callback);
        self
    }

    pub fn with_max_tick_ms(mut self, max_tick_ms: f64) -> Self {
        self.max_tick_ms = max_tick_ms;
        self
    }
}

impl<H> Clone for ScrollViewOptions<H> {
    fn clone(&self) -> Self {
        Self {
            measure: Arc::clone(&self.measure),
            axis: self.axis,
            drag_strength: self.drag_strength,
            spring_damping_ratio: self.spring_damping_ratio,
            spring_period_ms: self.spring_period_ms,
            offset_rounding: self.offset_rounding,
            paginated: self.paginated,
            pagination_energy_threshold: self.pagination_energy_threshold,
            reverse: self.reverse,
            touch_direction_threshold: self.touch_direction_threshold,
            wheel_scale: self.wheel_scale,
            sequential_scrolling_optimized: self.sequential_scrolling_optimized,
            normalization_disabled: self.normalization_disabled,
            scroll_callback: self.scroll_callback.as_ref().map(Arc::clone),
            max_tick_ms: self.max_tick_ms,
        }
    }
}

impl<H> fmt::Debug for ScrollViewOptions<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollViewOptions")
            .field("axis", &self.axis)
            .field("drag_strength", &self.drag_strength)
            .field("spring_damping_ratio", &self.spring_damping_ratio)
            .field("spring_period_ms", &self.spring_period_ms)
            .field("offset_rounding", &self.offset_rounding)
            .field("paginated", &self.paginated)
            .field(
                "pagination_energy_threshold",
                &self.pagination_energy_threshold,
            )
            .field("reverse", &self.reverse)
            .field(
                "touch_direction_threshold",
                &self.touch_direction_threshold,
            )
            .field("wheel_scale", &self.wheel_scale)
            .field(
                "sequential_scrolling_optimized",
                &self.sequential_scrolling_optimized,
            )
            .field("normalization_disabled", &self.normalization_disabled)
            .field("has_scroll_callback", &self.scroll_callback.is_some())
            .field("max_tick_ms", &self.max_tick_ms)
            .finish_non_exhaustive()
    }
}
