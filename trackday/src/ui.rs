use bevy::prelude::*;

use crate::main_game::SimState;
use trackday::Car;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, (update_speed_text, update_drag_text))
            .add_systems(OnEnter(SimState::GameOver), spawn_game_over);
    }
}

#[derive(Component)]
struct SpeedText;
#[derive(Component)]
struct DragText;

const PANEL_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);
const TEXT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
const GAME_OVER_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

fn px(val: f32) -> Val {
    Val::Px(val)
}

fn text_font(size: f32) -> TextFont {
    TextFont {
        font_size: size,
        ..default()
    }
}

fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: px(8.0),
                right: px(8.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::axes(px(8.0), px(4.0)),
                row_gap: px(2.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Speed: 0"),
                text_font(14.0),
                TextColor(TEXT_COLOR),
                SpeedText,
            ));
            parent.spawn((
                Text::new("Drag: 0 x 0"),
                text_font(14.0),
                TextColor(TEXT_COLOR),
                DragText,
            ));
        });
}

fn update_speed_text(
    car_query: Query<&Car>,
    mut text_query: Query<&mut Text, With<SpeedText>>,
) {
    let Ok(car) = car_query.single() else {
        return;
    };
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    text.0 = format!("Speed: {}", car.motion.speed().floor() as i32);
}

fn update_drag_text(
    car_query: Query<&Car>,
    mut text_query: Query<&mut Text, With<DragText>>,
) {
    let Ok(car) = car_query.single() else {
        return;
    };
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    let drag = car.motion.drag;
    text.0 = format!("Drag: {:.0} x {:.0}", drag.y, drag.x);
}

/// Terminal overlay, spawned once on entering `GameOver` and never removed.
fn spawn_game_over(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: px(0.0),
            right: px(0.0),
            top: px(0.0),
            bottom: px(0.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("GAME OVER"),
                text_font(64.0),
                TextColor(GAME_OVER_COLOR),
            ));
        });
}
