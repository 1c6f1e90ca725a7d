use bevy::prelude::*;

pub mod motion;
pub mod track;
pub mod track_format;

/// The player-controlled car. Holds the motion-model state that the
/// fixed-tick driving system advances and mirrors into the physics body.
#[derive(Component, Default)]
pub struct Car {
    pub motion: motion::CarState,
}
