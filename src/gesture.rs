use core::f64::consts::FRAC_PI_2;

use crate::Axis;

/// A single touch point as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchPoint {
    pub id: u64,
    pub position: [f64; 2],
}

/// Wheel/trackpad input; a pair carries both axes and the active one is
/// selected by the configured scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WheelDelta {
    Scalar(f64),
    Pair([f64; 2]),
}

impl WheelDelta {
    pub(crate) fn along(self, axis: Axis) -> f64 {
        match self {
            Self::Scalar(delta) => delta,
            Self::Pair(pair) => axis.component(pair),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TouchRecord {
    id: u64,
    start: [f64; 2],
    current: [f64; 2],
    prev: [f64; 2],
    time_ms: f64,
    prev_time_ms: f64,
}

/// What a gesture event translated into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum GestureEvent {
    /// First surviving touch went down; start a scroll force at 0.
    Begin,
    /// The primary touch moved; update the force to the given axis offset.
    Move { offset: f64 },
    /// The last touch lifted; release with the given offset and velocity
    /// (px/ms).
    End { offset: f64, velocity: f64 },
    /// Nothing to do (filtered out, or secondary touches remain).
    None,
}

/// Tracks active touches and folds them into scroll-force updates.
///
/// The primary touch is the oldest surviving record; when it is removed the
/// next record is promoted and its start position rebased so the reported
/// offset does not jump. Move samples travelling mostly across the scroll
/// axis are dropped by the optional direction filter.
#[derive(Clone, Debug)]
pub(crate) struct GestureTranslator {
    records: Vec<TouchRecord>,
    axis: Axis,
    direction_threshold: Option<f64>,
}

impl GestureTranslator {
    pub(crate) fn new(axis: Axis, direction_threshold: Option<f64>) -> Self {
        Self {
            records: Vec::new(),
            axis,
            direction_threshold,
        }
    }

    pub(crate) fn configure(&mut self, axis: Axis, direction_threshold: Option<f64>) {
        self.axis = axis;
        self.direction_threshold = direction_threshold;
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.records.is_empty()
    }

    /// Drops all records, e.g. when the host vetoes a gesture at its start.
    pub(crate) fn reset(&mut self) {
        self.records.clear();
    }

    /// Axis offset of the primary touch since its (possibly rebased) start.
    fn primary_offset(&self) -> f64 {
        match self.records.first() {
            Some(rec) => {
                self.axis.component(rec.current) - self.axis.component(rec.start)
            }
            None => 0.0,
        }
    }

    /// Instantaneous axis velocity of the primary touch, px/ms; zero when the
    /// last two samples share a timestamp.
    fn primary_velocity(&self) -> f64 {
        match self.records.first() {
            Some(rec) => {
                let dt = rec.time_ms - rec.prev_time_ms;
                if dt == 0.0 {
                    0.0
                } else {
                    (self.axis.component(rec.current) - self.axis.component(rec.prev)) / dt
                }
            }
            None => 0.0,
        }
    }

    /// Handles touch-down. `active` is the full set of touches currently on
    /// the surface; records for touches no longer in it are pruned first, so
    /// a missed touch-end cannot leave a stale primary behind.
    pub(crate) fn begin(
        &mut self,
        new_touches: &[TouchPoint],
        active: &[TouchPoint],
        time_ms: f64,
    ) -> GestureEvent {
        let was_active = !self.records.is_empty();

        self.records
            .retain(|rec| active.iter().any(|touch| touch.id == rec.id));

        for touch in new_touches {
            if self.records.iter().any(|rec| rec.id == touch.id) {
                continue;
            }
            self.records.push(TouchRecord {
                id: touch.id,
                start: touch.position,
                current: touch.position,
                prev: touch.position,
                time_ms,
                prev_time_ms: time_ms,
            });
        }

        if !was_active && !self.records.is_empty() {
            GestureEvent::Begin
        } else {
            GestureEvent::None
        }
    }

    /// Handles touch-move; only primary-touch movement produces an update.
    /// Primary samples whose travel since touch-down deviates from the
    /// scroll axis beyond the direction threshold are dropped.
    pub(crate) fn movement(&mut self, touches: &[TouchPoint], time_ms: f64) -> GestureEvent {
        let mut primary_moved = false;
        for touch in touches {
            if let Some(index) = self.records.iter().position(|rec| rec.id == touch.id) {
                if index == 0 && !self.accepts_direction(&self.records[index], touch.position) {
                    svtrace!(id = touch.id, "move sample rejected by direction filter");
                    continue;
                }
                let rec = &mut self.records[index];
                rec.prev = rec.current;
                rec.prev_time_ms = rec.time_ms;
                rec.current = touch.position;
                rec.time_ms = time_ms;
                if index == 0 {
                    primary_moved = true;
                }
            }
        }

        if primary_moved {
            GestureEvent::Move {
                offset: self.primary_offset(),
            }
        } else {
            GestureEvent::None
        }
    }

    /// Handles touch-up/cancel. Removing the primary rebases the next record
    /// so the force offset is continuous across the promotion.
    pub(crate) fn finish(&mut self, ended: &[TouchPoint]) -> GestureEvent {
        let offset = self.primary_offset();
        let velocity = self.primary_velocity();

        let mut primary_removed = false;
        for touch in ended {
            if let Some(index) = self.records.iter().position(|rec| rec.id == touch.id) {
                if index == 0 {
                    primary_removed = true;
                }
                self.records.remove(index);
            }
        }

        if self.records.is_empty() {
            if primary_removed {
                return GestureEvent::End { offset, velocity };
            }
            return GestureEvent::None;
        }

        if primary_removed {
            // Promote the next-oldest touch; keep the reported offset where
            // the old primary left it.
            let rec = &mut self.records[0];
            let start_axis = self.axis.component(rec.current) - offset;
            match self.axis {
                Axis::Horizontal => rec.start = [start_axis, rec.current[1]],
                Axis::Vertical => rec.start = [rec.current[0], start_axis],
            }
            return GestureEvent::Move { offset };
        }

        GestureEvent::None
    }

    /// Direction filter: the travel since touch-down, expressed as
    /// `atan2(|dy|, |dx|) / (pi/2)`, must stay within the threshold of the
    /// scroll axis. Zero travel always passes.
    fn accepts_direction(&self, rec: &TouchRecord, position: [f64; 2]) -> bool {
        let Some(threshold) = self.direction_threshold else {
            return true;
        };
        let dx = (position[0] - rec.start[0]).abs();
        let dy = (position[1] - rec.start[1]).abs();
        if dx == 0.0 && dy == 0.0 {
            return true;
        }
        let direction = dy.atan2(dx) / FRAC_PI_2;
        (direction - self.axis.as_direction()).abs() <= threshold
    }
}
