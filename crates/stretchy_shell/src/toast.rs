use core::time::Duration;

use bevy::color::Alpha;
use bevy::prelude::*;

/// Roughly the length of a short platform toast.
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);

#[derive(Component)]
pub struct Toast {
    timer: Timer,
}

/// Shows a short message near the bottom of the screen.
pub fn spawn_toast(commands: &mut Commands, message: &str, duration: Duration) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Percent(12.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Toast {
                timer: Timer::new(duration, TimerMode::Once),
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(message),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(10.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.25, 0.25, 0.25, 0.9)),
                BorderRadius::all(Val::Px(18.0)),
            ));
        });
}

/// Opacity of a toast at `progress` (0..=1) through its lifetime.
pub fn toast_opacity(progress: f32) -> f32 {
    const FADE_IN: f32 = 0.1;
    const FADE_OUT: f32 = 0.3;

    let progress = progress.clamp(0.0, 1.0);
    if progress < FADE_IN {
        progress / FADE_IN
    } else if progress > 1.0 - FADE_OUT {
        (1.0 - progress) / FADE_OUT
    } else {
        1.0
    }
}

pub fn animate_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toasts: Query<(Entity, &mut Toast, &Children)>,
    mut labels: Query<(&mut TextColor, &mut BackgroundColor)>,
) {
    for (entity, mut toast, children) in &mut toasts {
        toast.timer.tick(time.delta());
        let alpha = toast_opacity(toast.timer.fraction());

        for &child in children.iter() {
            if let Ok((mut text_color, mut background)) = labels.get_mut(child) {
                text_color.0.set_alpha(alpha);
                background.0.set_alpha(alpha * 0.9);
            }
        }

        if toast.timer.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}

pub struct ToastPlugin;

impl Plugin for ToastPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, animate_toasts);
    }
}
