// wgpu refuses surfaces larger than the maximum texture extent (2048 on WebGL2).
const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Size the canvas should take for a browser viewport of `width` x `height`.
#[cfg_attr(not(any(target_arch = "wasm32", test)), expect(dead_code))]
fn clamped_surface_size(width: f32, height: f32) -> (f32, f32) {
    (width.min(MAX_SURFACE_EXTENT), height.min(MAX_SURFACE_EXTENT))
}

/// Follows the browser viewport so the widget's layout height tracks the page.
#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(browser_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) =
        (browser_window.inner_width(), browser_window.inner_height())
    else {
        return;
    };
    let (Some(width), Some(height)) = (inner_width.as_f64(), inner_height.as_f64()) else {
        return;
    };
    let (width, height) = clamped_surface_size(width as f32, height as f32);

    for mut window in &mut primary_query {
        if (window.resolution.width() - width).abs() > f32::EPSILON
            || (window.resolution.height() - height).abs() > f32::EPSILON
        {
            bevy::log::debug!("Resizing canvas to {width}x{height}");
            window.resolution.set(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_viewports_are_kept() {
        assert_eq!(clamped_surface_size(390.0, 844.0), (390.0, 844.0));
    }

    #[test]
    fn large_viewports_are_capped_per_axis() {
        assert_eq!(clamped_surface_size(1284.0, 2418.0), (1284.0, 2048.0));
    }
}
