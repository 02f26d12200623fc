use crate::BoundsReached;
use crate::physics::PhysicsEngine;

/// Rounds an offset to the configured granularity so spring end states are
/// exactly reachable and comparisons are stable.
pub(crate) fn round_offset(offset: f64, rounding: f64) -> f64 {
    if rounding > 0.0 {
        (offset / rounding).round() * rounding
    } else {
        offset
    }
}

/// Transient, ungrounded interaction state blended with the particle
/// position to form the effective scroll offset.
///
/// A "force" is a continuous offset contribution from an in-progress
/// interaction (an active drag); a "delta" is a discrete contribution from a
/// wheel/trackpad tick. Neither disturbs the particle until the interaction
/// ends: forces fold into the particle on the last release, deltas fold in
/// during the once-per-tick normalizing read.
///
/// Invariant: `force_count` is brought back to exactly zero by one release
/// per apply; while it is positive the spring is disabled and window
/// normalization is suspended.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ForceAccumulator {
    force_sum: f64,
    force_count: usize,
    pending_delta: f64,
    normalized_delta: f64,
}

impl ForceAccumulator {
    pub(crate) fn apply(&mut self, offset: f64) {
        self.force_count += 1;
        self.force_sum += offset;
    }

    pub(crate) fn update(&mut self, prev_offset: f64, new_offset: f64) {
        self.force_sum += new_offset - prev_offset;
    }

    pub(crate) fn subtract(&mut self, offset: f64) {
        self.force_sum -= offset;
    }

    /// Decrements the outstanding force count; the caller decides whether
    /// this was the last force (and folds state into the particle) before
    /// calling this.
    pub(crate) fn decrement(&mut self) {
        debug_assert!(self.force_count > 0, "unbalanced release_scroll_force");
        self.force_count = self.force_count.saturating_sub(1);
    }

    pub(crate) fn clear_force(&mut self) {
        self.force_sum = 0.0;
    }

    pub(crate) fn add_delta(&mut self, delta: f64) {
        self.pending_delta += delta;
    }

    pub(crate) fn count(&self) -> usize {
        self.force_count
    }

    pub(crate) fn is_active(&self) -> bool {
        self.force_count > 0
    }

    /// The effective scroll offset without side effects.
    pub(crate) fn blended_offset(
        &self,
        particle_position: f64,
        bounds: BoundsReached,
        spring_position: Option<f64>,
        rounding: f64,
    ) -> f64 {
        let (offset, _) = self.blend(particle_position, bounds, spring_position);
        round_offset(offset, rounding)
    }

    /// The effective scroll offset, folding delta state as a side effect.
    ///
    /// Called once per tick: when no new delta arrived since the last call,
    /// the normalized delta collapses into the particle position; the
    /// pending delta then rolls over into the normalized delta. This keeps
    /// the particle authoritative once wheel input pauses while never
    /// counting a tick twice.
    pub(crate) fn blended_offset_normalizing(
        &mut self,
        engine: &mut PhysicsEngine,
        bounds: BoundsReached,
        spring_position: Option<f64>,
        rounding: f64,
    ) -> f64 {
        let (offset, delta_offset) = self.blend(engine.position(), bounds, spring_position);
        if let Some(clamped) = delta_offset {
            if self.pending_delta == 0.0 {
                self.normalized_delta = 0.0;
                engine.set_position(clamped);
            }
            self.normalized_delta += self.pending_delta;
            self.pending_delta = 0.0;
        }
        round_offset(offset, rounding)
    }

    /// Shared blend. The second return value is the delta-adjusted offset
    /// before force blending, present only when delta state was in play.
    fn blend(
        &self,
        particle_position: f64,
        bounds: BoundsReached,
        spring_position: Option<f64>,
    ) -> (f64, Option<f64>) {
        let mut offset = particle_position;
        let mut delta_offset = None;

        if self.pending_delta != 0.0 || self.normalized_delta != 0.0 {
            offset += self.pending_delta + self.normalized_delta;
            // A delta may not push past an active boundary spring.
            if let Some(spring) = spring_position {
                let past_start = bounds.reached_start() && offset > spring;
                let past_end = bounds.reached_end() && offset < spring;
                if past_start || past_end || bounds == BoundsReached::Both {
                    offset = spring;
                }
            }
            delta_offset = Some(offset);
        }

        if self.force_count > 0 {
            match spring_position {
                // Averaging against the spring target halves the apparent
                // drag distance near a boundary: the rubber-band effect.
                Some(spring) => offset = (offset + self.force_sum + spring) / 2.0,
                None => offset += self.force_sum,
            }
        }

        (offset, delta_offset)
    }
}
