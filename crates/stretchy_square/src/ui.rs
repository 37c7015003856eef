use bevy::prelude::*;

use crate::controller::DragInteractionController;
use crate::countdown::{CountdownSlot, countdown_label};
use crate::gameplay::{SquareAnimation, SquareSystems};
use crate::settings::{SquareSettings, validate_settings};

#[derive(Component)]
struct CountdownPanel;

#[derive(Component)]
struct CountdownText;

#[derive(Component)]
struct StopButton;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup.after(validate_settings))
            .add_systems(
                Update,
                (handle_stop_button, update_countdown_panel)
                    .chain()
                    .after(SquareSystems),
            );
    }
}

fn setup(mut commands: Commands, settings: Res<SquareSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                padding: UiRect::horizontal(Val::Px(24.0)),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                ..default()
            },
            CountdownPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(countdown_label(true, &CountdownSlot::default(), 0.0)),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                CountdownText,
            ));

            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(18.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(Color::Srgba(settings.top_color)),
                    BorderRadius::all(Val::Px(4.0)),
                    StopButton,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("Stop"),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(Color::BLACK),
                    ));
                });
        });
}

fn handle_stop_button(
    mut slot: ResMut<CountdownSlot>,
    interaction_query: Query<&Interaction, (Changed<Interaction>, With<StopButton>)>,
) {
    for interaction in &interaction_query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match slot.cancel() {
            Some(cancelled) => info!(
                "Countdown stopped with {}s left",
                cancelled.seconds_remaining()
            ),
            None => debug!("Stop pressed without a running countdown"),
        }
    }
}

/// Keeps the countdown text and Stop button just inside the square's resting edge.
fn update_countdown_panel(
    controller: Res<DragInteractionController>,
    animation: Res<SquareAnimation>,
    settings: Res<SquareSettings>,
    slot: Res<CountdownSlot>,
    mut panel: Query<&mut Node, With<CountdownPanel>>,
    mut text: Query<&mut Text, With<CountdownText>>,
    mut button: Query<&mut BackgroundColor, With<StopButton>>,
) {
    let size = controller.widget_size();
    if let Ok(mut node) = panel.get_single_mut() {
        node.top = Val::Px(animation.offset() + size / 3.0);
    }

    if let Ok(mut text) = text.get_single_mut() {
        let label = countdown_label(
            controller.is_stuck(),
            &slot,
            controller.state().absolute_translation,
        );
        if text.0 != label {
            text.0 = label;
        }
    }

    if let Ok(mut background) = button.get_single_mut() {
        background.0 = Color::Srgba(animation.accent_color(&settings));
    }
}
