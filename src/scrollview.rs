use crate::force::ForceAccumulator;
use crate::gesture::{GestureEvent, GestureTranslator, TouchPoint, WheelDelta};
use crate::navigation::{self, GoToRequest};
use crate::options::ScrollViewOptions;
use crate::physics::PhysicsEngine;
use crate::sequence::ItemSequence;
use crate::types::{BoundsReached, PlacedItem, ScrollPhase, SpringSource, SpringTarget};
use crate::window::ItemWindow;
use crate::{bounds, force};

/// Default visible fraction for [`ScrollView::first_visible_item`].
const DEFAULT_VISIBLE_THRESHOLD: f64 = 0.99;

/// A headless, physics-driven scrollable viewport over an [`ItemSequence`].
///
/// The controller owns a 1-D particle, an anchor handle into the sequence,
/// and the transient gesture state. The host drives it once per frame with
/// [`commit`](Self::commit) and reads item placements back with
/// [`for_each_placed_item`](Self::for_each_placed_item); everything else
/// (bounds springs, rubber-banding, pagination snapping, go-to navigation,
/// window normalization) happens inside the commit.
///
/// All offsets are along the configured axis, in pixels: negative offsets
/// expose later content. The effective scroll offset is the anchor item's
/// leading-edge position in viewport space.
pub struct ScrollView<S: ItemSequence> {
    sequence: S,
    options: ScrollViewOptions<S::Handle>,
    engine: PhysicsEngine,
    forces: ForceAccumulator,
    gestures: GestureTranslator,
    gesture_offset: f64,
    window: ItemWindow<S::Handle>,
    anchor: Option<S::Handle>,
    goto_request: Option<GoToRequest<S::Handle>>,
    bounds: BoundsReached,
    spring: SpringTarget,
    scroll_offset: f64,
    extent: f64,
    group_start: f64,
    last_tick_ms: Option<f64>,
    dirty: bool,
}

impl<S: ItemSequence> core::fmt::Debug for ScrollView<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollView")
            .field("anchor", &self.anchor)
            .field("scroll_offset", &self.scroll_offset)
            .field("bounds", &self.bounds)
            .field("spring", &self.spring)
            .field("extent", &self.extent)
            .field("group_start", &self.group_start)
            .finish_non_exhaustive()
    }
}

impl<S: ItemSequence> ScrollView<S> {
    pub fn new(sequence: S, options: ScrollViewOptions<S::Handle>) -> Self {
        let engine = PhysicsEngine::new(
            options.drag_strength,
            options.spring_damping_ratio,
            options.spring_period_ms,
        );
        let gestures =
            GestureTranslator::new(options.axis, options.touch_direction_threshold);
        Self {
            sequence,
            options,
            engine,
            forces: ForceAccumulator::default(),
            gestures,
            gesture_offset: 0.0,
            window: ItemWindow::new(),
            anchor: None,
            goto_request: None,
            bounds: BoundsReached::None,
            spring: SpringTarget::default(),
            scroll_offset: 0.0,
            extent: 0.0,
            group_start: 0.0,
            last_tick_ms: None,
            dirty: true,
        }
    }

    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    /// Mutable sequence access; marks the layout dirty since items may have
    /// been inserted or removed.
    pub fn sequence_mut(&mut self) -> &mut S {
        self.dirty = true;
        &mut self.sequence
    }

    pub fn options(&self) -> &ScrollViewOptions<S::Handle> {
        &self.options
    }

    pub fn set_options(&mut self, options: ScrollViewOptions<S::Handle>) {
        self.engine.configure(
            options.drag_strength,
            options.spring_damping_ratio,
            options.spring_period_ms,
        );
        self.gestures
            .configure(options.axis, options.touch_direction_threshold);
        self.options = options;
        self.dirty = true;
    }

    pub fn anchor(&self) -> Option<S::Handle> {
        self.anchor
    }

    /// Sets the anchor item the scroll offset is measured against. The host
    /// typically sets this once; normalization moves it afterwards.
    pub fn set_anchor(&mut self, anchor: Option<S::Handle>) {
        self.anchor = anchor;
        self.dirty = true;
    }

    /// Forces a full layout pass on the next commit.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The effective scroll offset as of the last commit.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn bounds_reached(&self) -> BoundsReached {
        self.bounds
    }

    pub fn spring_target(&self) -> SpringTarget {
        self.spring
    }

    /// Particle velocity in px/ms.
    pub fn velocity(&self) -> f64 {
        self.engine.velocity()
    }

    /// Cumulative render-group origin shift from window normalization; hosts
    /// using the sequential-scrolling optimization translate their group by
    /// `group_start() + scroll_offset()` instead of repositioning each item.
    pub fn group_start(&self) -> f64 {
        self.group_start
    }

    /// Whether the view is still settling (coasting, springing, or being
    /// dragged).
    pub fn is_scrolling(&self) -> bool {
        self.engine.is_awake() || self.forces.is_active()
    }

    // -- per-tick drive ---------------------------------------------------

    /// Advances physics and runs the layout pass when anything changed.
    ///
    /// `viewport_extent` is the viewport size along the scroll axis;
    /// `now_ms` a monotonic timestamp. The physics step is clamped to
    /// `max_tick_ms` so a stalled frame cannot teleport the particle.
    pub fn commit(&mut self, viewport_extent: f64, now_ms: f64) {
        let dt = match self.last_tick_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.options.max_tick_ms),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        self.engine.step(dt);

        let offset = self.forces.blended_offset_normalizing(
            &mut self.engine,
            self.bounds,
            self.spring.position,
            self.options.offset_rounding,
        );

        let true_size_pending = self
            .window
            .after
            .iter()
            .chain(self.window.before.iter())
            .any(|item| item.true_size_requested);

        if viewport_extent != self.extent
            || self.dirty
            || true_size_pending
            || offset != self.scroll_offset
        {
            self.extent = viewport_extent;
            self.dirty = false;
            self.scroll_offset = self.layout(offset, false);
        }
    }

    /// One layout pass: rebuild the window, detect bounds, plan navigation
    /// and snapping, then re-derive the effective offset. When that offset
    /// differs from the one the pass was laid out with, the pass re-runs
    /// once with the new offset; the retry never recurses further.
    fn layout(&mut self, offset: f64, nested: bool) -> f64 {
        let prev_spring = self.spring;
        self.window
            .build(&self.sequence, self.anchor, self.extent, &self.options.measure);

        let (bounds, bound_position, bound_source) = bounds::detect(
            self.extent,
            offset,
            self.window.length_before(),
            self.window.length_after(),
            self.options.reverse,
        );
        self.bounds = bounds;
        self.spring = SpringTarget {
            position: bound_position,
            source: bound_source,
        };

        if let Some((position, source)) = navigation::plan_scroll_to(
            &mut self.goto_request,
            &self.window,
            bounds,
            offset,
            self.extent,
            self.options.offset_rounding,
        ) {
            self.spring = SpringTarget {
                position: Some(position),
                source,
            };
        }

        // The energy gate only guards first engagement; an engaged snap
        // spring sticks until it settles or another spring supersedes it.
        let snap_engaged = matches!(
            prev_spring.source,
            SpringSource::SnapPrev | SpringSource::SnapNext
        );
        if self.options.paginated
            && !self.forces.is_active()
            && self.spring.position.is_none()
            && (snap_engaged
                || self.engine.energy() <= self.options.pagination_energy_threshold)
        {
            if let Some((position, source)) = navigation::snap_to_page(
                &self.window,
                offset,
                self.extent,
                self.options.reverse,
            ) {
                self.spring = SpringTarget {
                    position: Some(position),
                    source,
                };
            }
        }

        let new_offset = self.forces.blended_offset_normalizing(
            &mut self.engine,
            self.bounds,
            self.spring.position,
            self.options.offset_rounding,
        );
        if !nested && new_offset != offset {
            svdebug!(offset, new_offset, "offset changed, re-running layout");
            return self.layout(new_offset, true);
        }

        let offset = self.normalize_window(offset);
        self.update_spring();
        offset
    }

    /// Moves the anchor so the scroll offset stays near zero, shifting the
    /// particle, any active spring, and the group origin by the same delta
    /// so nothing observable moves. Applying this twice in a row is a fixed
    /// point. Skipped while a drag is in progress.
    fn normalize_window(&mut self, offset: f64) -> f64 {
        if self.forces.is_active() || self.options.normalization_disabled {
            return offset;
        }

        let mut normalized = offset;
        if self.options.reverse {
            normalized = self.normalize_toward_next(normalized);
            if normalized == offset {
                normalized = self.normalize_toward_prev(normalized);
            }
        } else {
            normalized = self.normalize_toward_prev(normalized);
            if normalized == offset {
                normalized = self.normalize_toward_next(normalized);
            }
        }

        if normalized != offset {
            let delta = normalized - offset;
            svdebug!(delta, "normalized anchor");
            self.engine.shift_position(delta);
            if let Some(position) = &mut self.spring.position {
                *position += delta;
            }
            if self.options.sequential_scrolling_optimized {
                self.group_start -= delta;
            }
            // The anchor moved; re-materialize around it.
            self.window.build(
                &self.sequence,
                self.anchor,
                self.extent,
                &self.options.measure,
            );
        }
        normalized
    }

    /// Walks the anchor backward while its edge has drifted past the layout
    /// base; each move subtracts the moved-to item's own length.
    fn normalize_toward_prev(&mut self, mut offset: f64) -> f64 {
        for item in &self.window.before {
            let Some(length) = item.settled_length() else {
                break;
            };
            if offset <= 0.0 {
                break;
            }
            self.anchor = Some(item.handle);
            offset -= length;
        }
        offset
    }

    /// Walks the anchor forward; the added length lags one item behind, so
    /// the offset keeps up to one item of slack below zero.
    fn normalize_toward_next(&mut self, mut offset: f64) -> f64 {
        let Some(anchor) = self.window.after.first() else {
            return offset;
        };
        let Some(mut prev_length) = anchor.settled_length() else {
            return offset;
        };
        for item in self.window.after.iter().skip(1) {
            let Some(length) = item.settled_length() else {
                break;
            };
            if offset + prev_length >= 0.0 {
                break;
            }
            self.anchor = Some(item.handle);
            offset += prev_length;
            prev_length = length;
        }
        offset
    }

    /// Pushes the planned spring into the engine. The spring is suppressed
    /// entirely while a drag is in progress; the blend handles the
    /// rubber-band instead.
    fn update_spring(&mut self) {
        let value = if self.forces.is_active() {
            None
        } else {
            self.spring
                .position
                .map(|p| force::round_offset(p, self.options.offset_rounding))
        };
        self.engine.set_spring(value);
    }

    /// The effective offset right now, without folding any delta state.
    fn current_offset(&self) -> f64 {
        self.forces.blended_offset(
            self.engine.position(),
            self.bounds,
            self.spring.position,
            self.options.offset_rounding,
        )
    }

    // -- scrolling --------------------------------------------------------

    /// Scrolls by the given offset (negative exposes later content). The
    /// delta is absorbed into the next commit; bounds clamp it there.
    pub fn scroll(&mut self, delta: f64) {
        self.halt();
        self.forces.add_delta(delta);
    }

    /// Stops all motion: zeroes the velocity and cancels any pending go-to.
    /// Active bounds springs stay in place, so a view released out of bounds
    /// still settles back. Idempotent.
    pub fn halt(&mut self) {
        self.goto_request = None;
        self.engine.halt();
    }

    /// How much of `offset` can actually be scrolled before hitting a bound;
    /// returns `offset` unchanged when the relevant side is not fully
    /// measured, and `0` when all content fits in the viewport.
    pub fn can_scroll(&self, offset: f64) -> f64 {
        let current = self.current_offset();
        let before = self.window.length_before();
        let after = self.window.length_after();

        if let (Some(before), Some(after)) = (before, after) {
            if before + after <= self.extent {
                return 0.0;
            }
        }

        if offset < 0.0 {
            if let Some(after) = after {
                let room = (self.extent - (current + after)).min(0.0);
                return offset.max(room);
            }
        } else if offset > 0.0 {
            if let Some(before) = before {
                let room = (before - current).max(0.0);
                return offset.min(room);
            }
        }
        offset
    }

    // -- scroll forces (drag gestures) ------------------------------------

    /// Starts a held scroll force; must be balanced by
    /// [`release_scroll_force`](Self::release_scroll_force). While any force
    /// is held the spring is suppressed and out-of-bounds movement is
    /// halved (rubber-band).
    pub fn apply_scroll_force(&mut self, offset: f64) {
        self.halt();
        self.forces.apply(offset);
        self.dirty = true;
    }

    pub fn update_scroll_force(&mut self, prev_offset: f64, new_offset: f64) {
        self.halt();
        self.forces.update(prev_offset, new_offset);
        self.dirty = true;
    }

    /// Releases a held force. On the last release the blended offset is
    /// folded into the particle and the given velocity starts a coast, so
    /// the hand-off is seamless within the rounding granularity.
    pub fn release_scroll_force(&mut self, offset: f64, velocity: f64) {
        self.halt();
        if self.forces.count() == 1 {
            let position = self.current_offset();
            self.engine.set_position(position);
            self.engine.set_velocity(velocity);
            self.engine.wake();
            self.forces.clear_force();
            self.dirty = true;
        } else {
            self.forces.subtract(offset);
        }
        self.forces.decrement();
    }

    // -- navigation -------------------------------------------------------

    /// Scrolls so the next page (item) becomes visible.
    pub fn go_to_next_page(&mut self) {
        self.go_to_page(1);
    }

    /// Scrolls so the previous page (item) becomes visible. When the
    /// current first item is only partially visible, this first scrolls it
    /// fully into view.
    pub fn go_to_previous_page(&mut self) {
        self.go_to_page(-1);
    }

    /// Moves `amount` pages relative to the current target: the pending
    /// go-to target when one is in flight, otherwise the first visible
    /// item.
    pub fn go_to_page(&mut self, amount: i64) {
        // A partially visible item counts as the current page here, so a
        // "previous" from a half-scrolled item first shows it fully.
        let start = self
            .goto_request
            .map(|req| req.target)
            .or_else(|| self.first_visible_item_with(0.0))
            .or(self.anchor);
        let Some(mut handle) = start else {
            return;
        };

        let mut amount = amount;
        if self.goto_request.is_none() && amount < 0 && self.current_offset() < 0.0 {
            amount += 1;
        }

        for _ in 0..amount.unsigned_abs() {
            let step = if amount > 0 {
                self.sequence.next(handle)
            } else {
                self.sequence.previous(handle)
            };
            match step {
                Some(next) => handle = next,
                None => break,
            }
        }

        self.set_goto(handle, amount >= 0);
    }

    /// Scrolls the given item to the viewport's leading edge. The sequence
    /// is searched in both directions simultaneously from the anchor; when
    /// the item is not reachable this is a no-op.
    pub fn go_to_item(&mut self, target: S::Handle) {
        let Some(anchor) = self.anchor else {
            return;
        };
        if anchor == target {
            let toward_next = self.current_offset() >= 0.0;
            self.set_goto(target, toward_next);
            return;
        }

        let mut forward = self.sequence.next(anchor);
        let mut backward = self.sequence.previous(anchor);
        while forward.is_some() || backward.is_some() {
            if let Some(handle) = forward {
                // A cyclic sequence wrapped all the way around.
                if handle == anchor {
                    return;
                }
                if handle == target {
                    self.set_goto(target, true);
                    return;
                }
                forward = self.sequence.next(handle);
            }
            if let Some(handle) = backward {
                if handle == target {
                    self.set_goto(target, false);
                    return;
                }
                backward = self.sequence.previous(handle);
            }
        }
    }

    fn set_goto(&mut self, target: S::Handle, toward_next: bool) {
        svdebug!(?target, toward_next, "go-to requested");
        self.goto_request = Some(GoToRequest {
            target,
            toward_next,
        });
        self.dirty = true;
    }

    /// The first item of which at least 99% is visible.
    pub fn first_visible_item(&self) -> Option<S::Handle> {
        self.first_visible_item_with(DEFAULT_VISIBLE_THRESHOLD)
    }

    /// The first item whose visible fraction meets `threshold` (0..=1).
    pub fn first_visible_item_with(&self, threshold: f64) -> Option<S::Handle> {
        navigation::first_visible_item(&self.window, self.current_offset(), threshold)
    }

    // -- raw input --------------------------------------------------------

    /// Feeds a touch-down batch. `changed` are the new touches, `active`
    /// the full set currently on the surface (used to prune records whose
    /// touch-end was missed).
    pub fn touch_start(&mut self, changed: &[TouchPoint], active: &[TouchPoint], time_ms: f64) {
        if let GestureEvent::Begin = self.gestures.begin(changed, active, time_ms) {
            match self.run_callback(0.0, ScrollPhase::Start, None) {
                Some(delta) => {
                    self.gesture_offset = delta;
                    self.apply_scroll_force(delta);
                }
                None => self.gestures.reset(),
            }
        }
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint], time_ms: f64) {
        if let GestureEvent::Move { offset } = self.gestures.movement(touches, time_ms) {
            if let Some(delta) = self.run_callback(offset, ScrollPhase::Move, None) {
                let prev = self.gesture_offset;
                self.gesture_offset = delta;
                self.update_scroll_force(prev, delta);
            }
        }
    }

    /// Feeds a touch-up/cancel batch. Releasing the last touch converts the
    /// gesture's final velocity into a coast.
    pub fn touch_end(&mut self, ended: &[TouchPoint]) {
        match self.gestures.finish(ended) {
            GestureEvent::End { offset, velocity } => {
                match self.run_callback(offset, ScrollPhase::End, Some(velocity)) {
                    Some(delta) => self.release_scroll_force(delta, velocity),
                    // Vetoed: the force must still be balanced.
                    None => self.release_scroll_force(self.gesture_offset, 0.0),
                }
                self.gesture_offset = 0.0;
            }
            GestureEvent::Move { offset } => {
                let prev = self.gesture_offset;
                self.gesture_offset = offset;
                self.update_scroll_force(prev, offset);
            }
            _ => {}
        }
    }

    /// Feeds a wheel/trackpad tick; the axis component (scaled by
    /// `wheel_scale`) becomes a scroll delta.
    pub fn wheel(&mut self, delta: WheelDelta) {
        let scaled = delta.along(self.options.axis) * self.options.wheel_scale;
        if scaled == 0.0 {
            return;
        }
        if let Some(delta) = self.run_callback(scaled, ScrollPhase::Wheel, None) {
            self.scroll(delta);
        }
    }

    fn run_callback(
        &self,
        delta: f64,
        phase: ScrollPhase,
        velocity: Option<f64>,
    ) -> Option<f64> {
        match &self.options.scroll_callback {
            Some(callback) => callback(delta, phase, velocity),
            None => Some(delta),
        }
    }

    // -- placement --------------------------------------------------------

    /// Calls `f` for every materialized item with its placement as of the
    /// last commit. Items are visited anchor-first on the after side, then
    /// nearest-first on the before side. An item whose length is unknown is
    /// still reported (so the host can measure it) with its length `None`.
    ///
    /// In reverse mode the layout base moves from the viewport's leading
    /// edge to its trailing edge: the anchor's leading edge sits at
    /// `extent + scroll_offset` and the stacking is unchanged.
    pub fn for_each_placed_item<F>(&self, mut f: F)
    where
        F: FnMut(PlacedItem<S::Handle>),
    {
        let base = if self.options.reverse {
            self.extent + self.scroll_offset
        } else {
            self.scroll_offset
        };
        let mut position = base;
        for item in &self.window.after {
            f(PlacedItem {
                handle: item.handle,
                position,
                length: item.length,
            });
            position += item.length.unwrap_or(0.0);
        }
        let mut position = base;
        for item in &self.window.before {
            position -= item.length.unwrap_or(0.0);
            f(PlacedItem {
                handle: item.handle,
                position,
                length: item.length,
            });
        }
    }
}
