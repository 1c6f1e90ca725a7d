use bevy::math::Vec2;

/// Tunable constants for the arcade motion model. Fixed at scene start.
#[derive(Clone, Copy, Debug)]
pub struct CarParams {
    /// Forward acceleration while the throttle is held, in units/s².
    pub acceleration: f32,
    /// Deceleration while the brake is held, in units/s². Stronger than the
    /// throttle.
    pub braking: f32,
    /// Speed cap applied after integration, in units/s.
    pub max_velocity: f32,
    /// Coast deceleration applied when neither pedal is held, in units/s².
    pub drag: f32,
    /// Steering lock, in degrees. The wheel angle never leaves ±this.
    pub wheel_max_angle: f32,
    /// Rate at which held steering moves the wheel toward lock, in °/s.
    pub wheel_turn_rate: f32,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            acceleration: 300.0,
            braking: 450.0,
            max_velocity: 600.0,
            drag: 100.0,
            wheel_max_angle: 7.0,
            wheel_turn_rate: 28.0,
        }
    }
}

/// Per-frame keyboard snapshot. Sampled by the host, read-only here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

/// Kinematic state of one car, advanced once per fixed tick by [`tick`].
///
/// Position is deliberately absent: the model produces velocity and the
/// physics host integrates it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CarState {
    /// Facing angle in degrees, 0° = +X, counter-clockwise positive,
    /// wrapped to [-180, 180).
    pub heading: f32,
    /// Always collinear with the heading; the signed magnitude is negative
    /// when reversing.
    pub velocity: Vec2,
    /// Pedal acceleration applied this tick, zero while coasting.
    pub acceleration: Vec2,
    /// Coast deceleration applied this tick, zero under throttle/brake.
    pub drag: Vec2,
    /// Bounded steering accumulator in degrees. Half of it is added to the
    /// heading every tick, so it acts as a turn rate, not an absolute angle.
    pub wheel_angle: f32,
}

impl CarState {
    /// A car at rest facing `heading` degrees.
    pub fn at_heading(heading: f32) -> Self {
        Self {
            heading,
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec2 {
        heading_vec(self.heading)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Unit vector for a heading given in degrees (0° = +X, CCW positive).
pub fn heading_vec(heading_deg: f32) -> Vec2 {
    Vec2::from_angle(heading_deg.to_radians())
}

/// Wrap an angle in degrees into [-180, 180).
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Advance the motion model by one fixed tick of `dt` seconds.
///
/// Velocity is re-derived from the heading every tick, so the car never
/// slides laterally: steering rotates the whole velocity vector along with
/// the chassis.
pub fn tick(state: &CarState, input: CarInput, params: &CarParams, dt: f32) -> CarState {
    let forward = state.forward();
    // Signed speed; velocity is collinear with the heading by construction.
    let mut speed = state.velocity.dot(forward);

    let mut acceleration = Vec2::ZERO;
    let mut drag = Vec2::ZERO;
    if input.accelerate {
        acceleration = forward * params.acceleration;
    } else if input.brake {
        acceleration = forward * -params.braking;
    } else if speed != 0.0 {
        // Coast: bleed speed toward zero without crossing it.
        let step = (params.drag * dt).min(speed.abs());
        drag = forward * (-speed.signum() * params.drag);
        speed -= speed.signum() * step;
    }

    speed += acceleration.dot(forward) * dt;
    speed = speed.clamp(-params.max_velocity, params.max_velocity);

    let wheel_angle = if input.steer_left {
        (state.wheel_angle + params.wheel_turn_rate * dt).min(params.wheel_max_angle)
    } else if input.steer_right {
        (state.wheel_angle - params.wheel_turn_rate * dt).max(-params.wheel_max_angle)
    } else {
        state.wheel_angle * 0.5
    };
    let heading = wrap_degrees(state.heading + wheel_angle * 0.5);

    CarState {
        heading,
        velocity: heading_vec(heading) * speed,
        acceleration,
        drag,
        wheel_angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn throttle() -> CarInput {
        CarInput {
            accelerate: true,
            ..CarInput::default()
        }
    }

    fn brake() -> CarInput {
        CarInput {
            brake: true,
            ..CarInput::default()
        }
    }

    fn coast() -> CarInput {
        CarInput::default()
    }

    fn run(mut state: CarState, input: CarInput, params: &CarParams, ticks: usize) -> CarState {
        for _ in 0..ticks {
            state = tick(&state, input, params, DT);
        }
        state
    }

    #[test]
    fn speed_never_exceeds_max_under_sustained_throttle() {
        let params = CarParams::default();
        let mut state = CarState::default();
        for _ in 0..2000 {
            state = tick(&state, throttle(), &params, DT);
            assert!(state.speed() <= params.max_velocity * (1.0 + 1e-5));
        }
        assert!((state.speed() - params.max_velocity).abs() < 1e-2);
    }

    #[test]
    fn throttle_from_rest_is_strictly_increasing_until_clamped() {
        let params = CarParams::default();
        let mut state = CarState::default();
        let mut prev = 0.0;
        for _ in 0..150 {
            state = tick(&state, throttle(), &params, DT);
            let speed = state.speed();
            if prev < params.max_velocity - 1e-3 {
                assert!(speed > prev);
            } else {
                assert!((speed - params.max_velocity).abs() < 1e-2);
            }
            prev = speed;
        }
    }

    #[test]
    fn single_throttle_tick_from_rest_steps_along_heading() {
        let params = CarParams::default();
        let state = tick(&CarState::default(), throttle(), &params, DT);

        let expected = (params.acceleration * DT).min(params.max_velocity);
        assert!((state.speed() - expected).abs() < 1e-4);
        assert!((state.velocity - Vec2::new(expected, 0.0)).length() < 1e-4);
    }

    #[test]
    fn coast_decay_reaches_exactly_zero_and_stays() {
        let params = CarParams::default();
        let mut state = CarState {
            velocity: Vec2::new(250.0, 0.0),
            ..CarState::default()
        };

        let mut prev = state.speed();
        for _ in 0..200 {
            state = tick(&state, coast(), &params, DT);
            assert!(state.speed() <= prev);
            prev = state.speed();
        }
        assert_eq!(state.speed(), 0.0);

        state = tick(&state, coast(), &params, DT);
        assert_eq!(state.speed(), 0.0);
        assert_eq!(state.drag, Vec2::ZERO);
    }

    #[test]
    fn drag_applies_only_while_coasting() {
        let params = CarParams::default();
        let rolling = CarState {
            velocity: Vec2::new(250.0, 0.0),
            ..CarState::default()
        };

        let under_throttle = tick(&rolling, throttle(), &params, DT);
        assert_eq!(under_throttle.drag, Vec2::ZERO);

        let coasting = tick(&rolling, coast(), &params, DT);
        assert!((coasting.drag - Vec2::new(-params.drag, 0.0)).length() < 1e-4);
        assert!(coasting.drag.dot(coasting.velocity) < 0.0);
    }

    #[test]
    fn braking_outpaces_throttle_and_reverses_from_rest() {
        let params = CarParams::default();

        let forward = tick(&CarState::default(), throttle(), &params, DT);
        let reverse = tick(&CarState::default(), brake(), &params, DT);
        assert!(reverse.velocity.x < 0.0);
        assert!(reverse.speed() > forward.speed());

        let state = run(CarState::default(), brake(), &params, 2000);
        assert!((state.speed() - params.max_velocity).abs() < 1e-2);
        assert!(state.velocity.x < 0.0);
    }

    #[test]
    fn wheel_angle_stays_within_lock_both_directions() {
        let params = CarParams::default();
        let left = CarInput {
            steer_left: true,
            ..CarInput::default()
        };
        let right = CarInput {
            steer_right: true,
            ..CarInput::default()
        };

        let mut state = CarState::default();
        for _ in 0..300 {
            state = tick(&state, left, &params, DT);
            assert!(state.wheel_angle <= params.wheel_max_angle);
        }
        assert_eq!(state.wheel_angle, params.wheel_max_angle);

        for _ in 0..600 {
            state = tick(&state, right, &params, DT);
            assert!(state.wheel_angle >= -params.wheel_max_angle);
        }
        assert_eq!(state.wheel_angle, -params.wheel_max_angle);
    }

    #[test]
    fn released_wheel_relaxes_by_halving() {
        let params = CarParams::default();
        let left = CarInput {
            steer_left: true,
            ..CarInput::default()
        };

        let locked = run(CarState::default(), left, &params, 60);
        assert_eq!(locked.wheel_angle, params.wheel_max_angle);

        let released = tick(&locked, coast(), &params, DT);
        assert_eq!(released.wheel_angle, params.wheel_max_angle * 0.5);

        let again = tick(&released, coast(), &params, DT);
        assert_eq!(again.wheel_angle, params.wheel_max_angle * 0.25);
    }

    #[test]
    fn velocity_tracks_heading_through_a_turn() {
        let params = CarParams::default();
        let turning = CarInput {
            accelerate: true,
            steer_left: true,
            ..CarInput::default()
        };

        let mut state = CarState::default();
        for _ in 0..240 {
            state = tick(&state, turning, &params, DT);
            let lateral = state.velocity.perp_dot(state.forward());
            assert!(lateral.abs() <= state.speed().max(1.0) * 1e-5);
        }
        assert!(state.heading != 0.0);
    }

    #[test]
    fn heading_wraps_into_half_open_range() {
        let params = CarParams::default();
        let left = CarInput {
            steer_left: true,
            ..CarInput::default()
        };

        let mut state = CarState::default();
        for _ in 0..400 {
            state = tick(&state, left, &params, DT);
            assert!((-180.0..180.0).contains(&state.heading));
        }
    }

    #[test]
    fn wrap_degrees_covers_both_seams() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), -180.0);
        assert_eq!(wrap_degrees(-180.0), -180.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert!((wrap_degrees(270.0) - -90.0).abs() < 1e-4);
        assert!((wrap_degrees(-450.0) - -90.0).abs() < 1e-4);
    }
}
