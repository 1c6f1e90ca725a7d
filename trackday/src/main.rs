use avian2d::prelude::*;
use bevy::{
    color::palettes::css::{BLUE, GREEN, RED, WHITE, YELLOW},
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    input::mouse::MouseWheel,
    prelude::*,
};

use trackday::Car;
use trackday::motion::{self, CarInput, CarParams, CarState};
use trackday::track::TrackLayout;
use trackday::track_format::TrackFile;

mod ui;

// Re-export types used by the UI module.
pub(crate) use main_game::*;

/// Game-wide types live here so `ui` can import them via `crate::main_game::*`.
mod main_game {
    use super::*;

    /// RUNNING accepts input and advances kinematics every fixed tick;
    /// GAME_OVER is terminal, entered on any boundary contact.
    #[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum SimState {
        #[default]
        Running,
        GameOver,
    }

    /// Keyboard snapshot consumed by the fixed-tick driving system.
    #[derive(Resource, Default)]
    pub struct DriverInput(pub CarInput);

    /// Motion-model tunables, fixed at scene start.
    #[derive(Resource, Default)]
    pub struct CarTuning(pub CarParams);
}

const FIXED_TICK_HZ: u32 = 60;

const CAR_LENGTH: f32 = 40.0;
const CAR_WIDTH: f32 = 20.0;

fn main() {
    let track_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trackday/assets/track1.toml".to_string());

    App::new()
        .add_plugins((
            DefaultPlugins,
            FrameTimeDiagnosticsPlugin::default(),
            PhysicsPlugins::default(),
            ui::HudPlugin,
        ))
        .init_state::<SimState>()
        .insert_resource(Gravity::ZERO)
        .insert_resource(Time::<Fixed>::from_duration(
            std::time::Duration::from_secs_f32(1.0 / FIXED_TICK_HZ as f32),
        ))
        .insert_resource(TrackPath(track_path))
        .insert_resource(DriverInput::default())
        .insert_resource(CarTuning::default())
        .add_systems(Startup, (setup_track, setup.after(setup_track)))
        // Freeze the physics clock for good once the run ends.
        .add_systems(OnEnter(SimState::GameOver), pause_physics)
        .add_systems(Update, sample_driver_input)
        .add_systems(
            FixedUpdate,
            (drive_car, detect_boundary_collision)
                .chain()
                .run_if(in_state(SimState::Running)),
        )
        .add_systems(
            Update,
            (update_fps_counter, update_camera, draw_motion_vectors),
        )
        .run();
}

#[derive(Resource)]
struct TrackPath(String);

/// Marker for the static collision posts that close off the track.
#[derive(Component)]
struct BoundaryPost;

fn setup_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    track_path: Res<TrackPath>,
) {
    let track_file = TrackFile::load(std::path::Path::new(&track_path.0))
        .unwrap_or_else(|_| panic!("Failed to load track file: {}", track_path.0));
    let layout = TrackLayout::from_file(&track_file);
    info!(
        "loaded track '{}' with {} boundary posts",
        track_file.metadata.name,
        layout.posts.len()
    );

    // Ground plane
    let center = layout.center();
    let ground = layout.ground_size();
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(ground.x, ground.y))),
        MeshMaterial2d(materials.add(Color::srgb(0.2, 0.6, 0.2))),
        Transform::from_xyz(center.x, center.y, -1.0),
    ));

    // Boundary posts: static colliders; touching any of them ends the run.
    let post_mesh = meshes.add(Circle::new(layout.post_radius));
    let post_material = materials.add(Color::srgb(0.85, 0.3, 0.1));
    for post in &layout.posts {
        commands.spawn((
            Mesh2d(post_mesh.clone()),
            MeshMaterial2d(post_material.clone()),
            Transform::from_xyz(post.x, post.y, 0.5),
            RigidBody::Static,
            Collider::circle(layout.post_radius),
            BoundaryPost,
        ));
    }

    commands.insert_resource(layout);
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    layout: Res<TrackLayout>,
) {
    let start = layout.start_position;
    let heading = layout.start_heading;

    // The car is kinematic: the motion model owns its velocity and heading,
    // avian integrates position and reports boundary contacts.
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(CAR_LENGTH, CAR_WIDTH))),
        MeshMaterial2d(materials.add(Color::srgb(0.9, 0.85, 0.2))),
        Transform::from_xyz(start.x, start.y, 1.0)
            .with_rotation(Quat::from_rotation_z(heading.to_radians())),
        RigidBody::Kinematic,
        Collider::rectangle(CAR_LENGTH, CAR_WIDTH),
        CollisionEventsEnabled,
        CollidingEntities::default(),
        Car {
            motion: CarState::at_heading(heading),
        },
    ));

    // FPS counter
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        Text::new("FPS: --"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(WHITE.into()),
        FpsCounterText,
    ));

    commands.spawn(Camera2d);
}

#[derive(Component)]
struct FpsCounterText;

fn update_fps_counter(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsCounterText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    if let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|value| value.smoothed())
    {
        text.0 = format!("FPS: {fps:>3.0}");
    }
}

fn pause_physics(mut physics_time: ResMut<Time<Physics>>) {
    physics_time.pause();
}

// ── Driving ─────────────────────────────────────────────────────────────────

fn sample_driver_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<DriverInput>) {
    input.0 = CarInput {
        accelerate: keyboard.pressed(KeyCode::ArrowUp) || keyboard.pressed(KeyCode::KeyW),
        brake: keyboard.pressed(KeyCode::ArrowDown) || keyboard.pressed(KeyCode::KeyS),
        steer_left: keyboard.pressed(KeyCode::ArrowLeft) || keyboard.pressed(KeyCode::KeyA),
        steer_right: keyboard.pressed(KeyCode::ArrowRight) || keyboard.pressed(KeyCode::KeyD),
    };
}

fn drive_car(
    time: Res<Time>,
    input: Res<DriverInput>,
    tuning: Res<CarTuning>,
    mut car_query: Query<(&mut Car, &mut LinearVelocity, &mut Rotation)>,
) {
    let dt = time.delta_secs();
    for (mut car, mut velocity, mut rotation) in &mut car_query {
        let next = motion::tick(&car.motion, input.0, &tuning.0, dt);
        velocity.0 = next.velocity;
        *rotation = Rotation::degrees(next.heading);
        car.motion = next;
    }
}

fn detect_boundary_collision(
    car_query: Query<&CollidingEntities, With<Car>>,
    post_query: Query<(), With<BoundaryPost>>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    for colliding in &car_query {
        if colliding.0.iter().any(|&entity| post_query.contains(entity)) {
            next_state.set(SimState::GameOver);
        }
    }
}

// ── Debug overlay ───────────────────────────────────────────────────────────

/// Heading, velocity, acceleration and drag vectors anchored at the car.
/// Recomputed from the motion state every frame, never persisted.
fn draw_motion_vectors(car_query: Query<(&Transform, &Car)>, mut gizmos: Gizmos) {
    for (transform, car) in &car_query {
        let position = transform.translation.xy();
        let state = &car.motion;

        gizmos.arrow_2d(position, position + state.forward() * 100.0, YELLOW);

        let speed = state.speed();
        if speed > f32::EPSILON {
            let length = 50.0 * (speed / 100.0 + 1.0);
            gizmos.arrow_2d(position, position + state.velocity / speed * length, GREEN);
        }

        let accel = state.acceleration.length();
        if accel > f32::EPSILON {
            let length = 50.0 * (accel / 100.0);
            gizmos.arrow_2d(
                position,
                position + state.acceleration / accel * length,
                BLUE,
            );
        }

        let drag = state.drag.length();
        if drag > f32::EPSILON {
            let length = 50.0 * (drag / 100.0);
            gizmos.arrow_2d(position, position + state.drag / drag * length, RED);
        }
    }
}

// ── Camera ──────────────────────────────────────────────────────────────────

fn update_camera(
    car_query: Query<&Transform, With<Car>>,
    mut camera_query: Query<(&mut Transform, &mut Projection), (With<Camera2d>, Without<Car>)>,
    mut scroll_events: MessageReader<MouseWheel>,
) {
    let Ok((mut camera_transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    if let Projection::Orthographic(ref mut ortho) = *projection {
        for event in scroll_events.read() {
            let zoom_delta = match event.unit {
                bevy::input::mouse::MouseScrollUnit::Line => event.y * 0.1,
                bevy::input::mouse::MouseScrollUnit::Pixel => event.y * 0.001,
            };

            ortho.scale *= 1.0 - zoom_delta;
            ortho.scale = ortho.scale.clamp(0.1, 10.0);
        }
    }

    let Ok(car_transform) = car_query.single() else {
        return;
    };
    camera_transform.translation.x = car_transform.translation.x;
    camera_transform.translation.y = car_transform.translation.y;
}
