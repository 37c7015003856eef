use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{WindowMode, WindowResolution};

#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

// typical smartphone screen ratio (9:16)
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

/// Builds the Bevy app every stretchy widget runs in: a phone-shaped window,
/// a black background and frame pacing.
pub fn get_default_app(title: &str) -> App {
    let mut app = App::new();

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some("#stretchy".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Keep browser shortcuts (F5, Ctrl+R) working on wasm.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL,
            ),
            power_preference: bevy::render::settings::PowerPreference::LowPower,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(DefaultPlugins.set(window_plugin).set(render_plugin));

    // The widget is idle most of the time, pace frames to save battery on phones.
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(Color::BLACK));

    #[cfg(target_arch = "wasm32")]
    app.add_systems(PreUpdate, handle_browser_resize);

    app
}

/// Converts a window position (origin top-left, y down) into 2D world space for a
/// default `Camera2d` (origin at the center, y up).
pub fn screen_to_world(screen: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        screen.x - window_size.x / 2.0,
        window_size.y / 2.0 - screen.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_corners_map_to_world_corners() {
        let size = Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT);
        assert_eq!(
            screen_to_world(Vec2::ZERO, size),
            Vec2::new(-180.0, 320.0)
        );
        assert_eq!(screen_to_world(size, size), Vec2::new(180.0, -320.0));
        assert_eq!(screen_to_world(size / 2.0, size), Vec2::ZERO);
    }
}
