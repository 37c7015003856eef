use bevy::prelude::*;

pub mod animation;
pub mod bounds;
pub mod controller;
pub mod countdown;
pub mod gameplay;
pub mod settings;
mod ui;

pub fn run() {
    stretchy_shell::get_default_app(env!("CARGO_PKG_NAME"))
        .add_plugins((gameplay::SquarePlugin, ui::UiPlugin))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
