use core::f64::consts::TAU;

/// Velocity below which the particle is considered at rest (px/ms).
const REST_VELOCITY: f64 = 1e-3;

/// Remaining spring distance below which the particle snaps to its target.
const REST_DISTANCE: f64 = 1e-2;

/// A 1-D particle on the scroll axis.
///
/// Position and velocity are in pixels and pixels per millisecond; the
/// controller is the only writer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Particle {
    pub position: f64,
    pub velocity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SpringForce {
    target: f64,
    /// Angular frequency squared (1/ms^2).
    stiffness: f64,
    /// 2 * damping_ratio * omega (1/ms).
    damping: f64,
}

/// Integrates the scroll particle under a permanent linear drag force and an
/// optional spring toward a target position.
///
/// The engine sleeps when there is nothing left to do (velocity decayed and
/// either no spring or the spring at rest) and must be woken explicitly:
/// attaching or retargeting a spring wakes it, and so does releasing a
/// scroll force. A sleeping engine skips the per-tick step entirely.
#[derive(Clone, Debug)]
pub(crate) struct PhysicsEngine {
    particle: Particle,
    drag_strength: f64,
    damping_ratio: f64,
    period_ms: f64,
    spring: Option<SpringForce>,
    awake: bool,
}

impl PhysicsEngine {
    pub(crate) fn new(drag_strength: f64, damping_ratio: f64, period_ms: f64) -> Self {
        Self {
            particle: Particle::default(),
            drag_strength,
            damping_ratio,
            period_ms,
            spring: None,
            awake: false,
        }
    }

    pub(crate) fn configure(&mut self, drag_strength: f64, damping_ratio: f64, period_ms: f64) {
        self.drag_strength = drag_strength;
        self.damping_ratio = damping_ratio;
        self.period_ms = period_ms;
        if let Some(spring) = &mut self.spring {
            let omega = TAU / period_ms.max(1.0);
            spring.stiffness = omega * omega;
            spring.damping = 2.0 * damping_ratio * omega;
        }
    }

    pub(crate) fn position(&self) -> f64 {
        self.particle.position
    }

    pub(crate) fn velocity(&self) -> f64 {
        self.particle.velocity
    }

    /// Kinetic energy of the particle (unit mass): v^2 / 2.
    pub(crate) fn energy(&self) -> f64 {
        0.5 * self.particle.velocity * self.particle.velocity
    }

    pub(crate) fn is_awake(&self) -> bool {
        self.awake
    }

    pub(crate) fn wake(&mut self) {
        self.awake = true;
    }

    /// No-op when the position is unchanged, so a sleeping engine stays
    /// asleep across normalization shifts that cancel out.
    pub(crate) fn set_position(&mut self, position: f64) {
        if self.particle.position == position {
            return;
        }
        svtrace!(
            position,
            old = self.particle.position,
            "PhysicsEngine::set_position"
        );
        self.particle.position = position;
    }

    pub(crate) fn set_velocity(&mut self, velocity: f64) {
        if self.particle.velocity == velocity {
            return;
        }
        svtrace!(
            velocity,
            old = self.particle.velocity,
            "PhysicsEngine::set_velocity"
        );
        self.particle.velocity = velocity;
    }

    /// Shifts the particle without waking the engine; used by window
    /// normalization, which moves the spring target by the same delta.
    pub(crate) fn shift_position(&mut self, delta: f64) {
        if delta != 0.0 {
            self.particle.position += delta;
        }
    }

    pub(crate) fn halt(&mut self) {
        self.set_velocity(0.0);
    }

    pub(crate) fn spring_target(&self) -> Option<f64> {
        self.spring.map(|s| s.target)
    }

    /// Attaches, retargets, or detaches the spring. Attaching or moving the
    /// target wakes the engine; detaching leaves the wake state alone so a
    /// coasting particle keeps decaying under drag.
    pub(crate) fn set_spring(&mut self, target: Option<f64>) {
        match (target, &mut self.spring) {
            (None, spring @ Some(_)) => {
                svtrace!("spring detached");
                *spring = None;
            }
            (None, None) => {}
            (Some(t), Some(spring)) => {
                if spring.target != t {
                    svtrace!(target = t, "spring retargeted");
                    spring.target = t;
                    self.awake = true;
                }
            }
            (Some(t), spring @ None) => {
                let omega = TAU / self.period_ms.max(1.0);
                svtrace!(target = t, "spring attached");
                *spring = Some(SpringForce {
                    target: t,
                    stiffness: omega * omega,
                    damping: 2.0 * self.damping_ratio * omega,
                });
                self.awake = true;
            }
        }
    }

    /// Advances the particle by `dt_ms` using one semi-implicit Euler step.
    ///
    /// Returns `true` when the particle moved. Puts the engine to sleep once
    /// velocity has decayed and any spring has settled, snapping the
    /// position exactly onto the spring target so the rounded offset reaches
    /// a stable end state.
    pub(crate) fn step(&mut self, dt_ms: f64) -> bool {
        if !self.awake || dt_ms <= 0.0 {
            return false;
        }

        let p = &mut self.particle;
        let before = p.position;

        if let Some(spring) = self.spring {
            let accel =
                spring.stiffness * (spring.target - p.position) - spring.damping * p.velocity;
            p.velocity += accel * dt_ms;
        }
        // Linear drag integrated exactly: v' = -strength * v.
        p.velocity *= (-self.drag_strength * dt_ms).exp();
        p.position += p.velocity * dt_ms;

        debug_assert!(
            p.position.is_finite() && p.velocity.is_finite(),
            "particle state diverged (position={}, velocity={})",
            p.position,
            p.velocity
        );

        match self.spring {
            Some(spring) => {
                if (spring.target - p.position).abs() < REST_DISTANCE
                    && p.velocity.abs() < REST_VELOCITY
                {
                    p.position = spring.target;
                    p.velocity = 0.0;
                    self.awake = false;
                    svtrace!(position = p.position, "engine sleeping at spring target");
                }
            }
            None => {
                if p.velocity.abs() < REST_VELOCITY {
                    p.velocity = 0.0;
                    self.awake = false;
                    svtrace!(position = p.position, "engine sleeping");
                }
            }
        }

        self.particle.position != before
    }
}
