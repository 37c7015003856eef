use bevy::color::Mix;
use bevy::math::Isometry2d;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::window::PrimaryWindow;
use stretchy_shell::input::{PointerDrag, PointerDragPlugin};
use stretchy_shell::screen_to_world;
use stretchy_shell::toast::{ToastPlugin, spawn_toast};

use crate::animation::{
    AnimatedValue, Easing, STIFFNESS_MEDIUM, offset_easing, stretch_easing,
};
use crate::bounds::{StretchedOutline, compute_outline};
use crate::controller::{DragInteractionController, SquarePhase, Settled, Unstuck};
use crate::countdown::{CountdownSlot, CountdownTick, whole_seconds};
use crate::settings::{SquareSettings, validate_settings};

pub const CANCELLED_TIMER_MESSAGE: &str = "Oops, you just cancelled your timer!";

const ACCENT_EASING: Easing = Easing::Spring {
    damping_ratio: 1.0,
    stiffness: STIFFNESS_MEDIUM,
};

pub struct SquarePlugin;

impl Plugin for SquarePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PointerDragPlugin, ToastPlugin))
            .init_resource::<SquareSettings>()
            .init_resource::<CountdownSlot>()
            .init_resource::<SquareAnimation>()
            .add_event::<SquareUnstuck>()
            .add_event::<SquareSettled>()
            .add_systems(Startup, (validate_settings, spawn_square).chain())
            .add_systems(
                Update,
                (
                    sync_layout,
                    drive_controller,
                    cancel_countdown_on_unstuck,
                    start_countdown_on_settle,
                    tick_countdown,
                    animate_square,
                    draw_square,
                )
                    .chain()
                    .in_set(SquareSystems),
            );
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub struct SquareSystems;

#[derive(Event, Debug, Clone, Copy)]
pub struct SquareUnstuck(pub Unstuck);

#[derive(Event, Debug, Clone, Copy)]
pub struct SquareSettled(pub Settled);

#[derive(Component)]
pub struct StretchySquare;

/// Rendered values easing towards what the controller reports.
#[derive(Resource, Debug)]
pub struct SquareAnimation {
    phase: SquarePhase,
    stretch_easing: Easing,
    offset_easing: Easing,
    stretch: AnimatedValue,
    offset: AnimatedValue,
    /// 0 for the top accent color, 1 for the bottom one.
    accent: AnimatedValue,
}

impl Default for SquareAnimation {
    fn default() -> Self {
        let phase = SquarePhase::default();
        Self {
            phase,
            stretch_easing: stretch_easing(phase, phase),
            offset_easing: offset_easing(phase, phase),
            stretch: AnimatedValue::new(0.0, stretch_easing(phase, phase)),
            offset: AnimatedValue::new(0.0, offset_easing(phase, phase)),
            accent: AnimatedValue::new(0.0, ACCENT_EASING),
        }
    }
}

impl SquareAnimation {
    /// Rendered distance of the widget's top edge from the top of the screen.
    pub fn offset(&self) -> f32 {
        self.offset.value()
    }

    pub fn accent_color(&self, settings: &SquareSettings) -> Srgba {
        settings
            .top_color
            .mix(&settings.bottom_color, self.accent.value().clamp(0.0, 1.0))
    }
}

fn spawn_square(
    mut commands: Commands,
    settings: Res<SquareSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let controller = DragInteractionController::from_settings(&settings);
    let mesh = silhouette_mesh(&controller.current_outline(), &settings, true);

    commands.spawn((
        Mesh2d(meshes.add(mesh)),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::Srgba(settings.top_color)))),
        Transform::default(),
        StretchySquare,
    ));
    commands.insert_resource(controller);
}

fn sync_layout(
    windows: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut controller: ResMut<DragInteractionController>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    controller.on_layout(window.height());
}

fn drive_controller(
    mut drags: EventReader<PointerDrag>,
    mut controller: ResMut<DragInteractionController>,
    mut unstuck_events: EventWriter<SquareUnstuck>,
    mut settled_events: EventWriter<SquareSettled>,
) {
    for drag in drags.read() {
        match *drag {
            PointerDrag::Delta(delta) => {
                if let Some(unstuck) = controller.on_drag_delta(delta.y) {
                    info!(
                        "Square unstuck after {:.0}px (top: {})",
                        unstuck.translation, unstuck.potentially_at_top
                    );
                    unstuck_events.send(SquareUnstuck(unstuck));
                }
            }
            PointerDrag::Stopped => {
                let settled = controller.on_drag_stopped();
                info!(
                    "Square settled at the {} after {:.0}px",
                    if settled.potentially_at_top { "top" } else { "bottom" },
                    settled.translation
                );
                settled_events.send(SquareSettled(settled));
            }
        }
    }
}

fn cancel_countdown_on_unstuck(
    mut commands: Commands,
    mut unstuck_events: EventReader<SquareUnstuck>,
    mut slot: ResMut<CountdownSlot>,
    settings: Res<SquareSettings>,
) {
    for _ in unstuck_events.read() {
        if let Some(cancelled) = slot.cancel() {
            info!(
                "Countdown cancelled with {}s left",
                cancelled.seconds_remaining()
            );
        }
        spawn_toast(&mut commands, CANCELLED_TIMER_MESSAGE, settings.toast_duration);
    }
}

fn start_countdown_on_settle(
    mut settled_events: EventReader<SquareSettled>,
    mut slot: ResMut<CountdownSlot>,
) {
    for SquareSettled(settled) in settled_events.read() {
        if !settled.was_stuck {
            continue;
        }
        let seconds = whole_seconds(settled.translation);
        if seconds == 0 {
            continue;
        }
        if let Some(previous) = slot.start(seconds) {
            info!(
                "Replaced countdown with {}s left",
                previous.seconds_remaining()
            );
        }
        info!("Countdown started for {seconds}s");
    }
}

fn tick_countdown(time: Res<Time>, mut slot: ResMut<CountdownSlot>) {
    match slot.tick(time.delta()) {
        Some(CountdownTick::Finished) => info!("Countdown finished"),
        Some(CountdownTick::Running(seconds)) => trace!("Countdown at {seconds}s"),
        None => {}
    }
}

fn animate_square(
    time: Res<Time>,
    controller: Res<DragInteractionController>,
    mut animation: ResMut<SquareAnimation>,
) {
    let phase = controller.phase();
    if phase != animation.phase {
        animation.stretch_easing = stretch_easing(animation.phase, phase);
        animation.offset_easing = offset_easing(animation.phase, phase);
        animation.phase = phase;
    }

    let delta = time.delta_secs();
    let (stretch_easing, offset_easing) = (animation.stretch_easing, animation.offset_easing);

    animation
        .stretch
        .animate_to(controller.stretch_factor(), stretch_easing);
    animation.stretch.update(delta);

    animation
        .offset
        .animate_to(controller.frame_offset(), offset_easing);
    animation.offset.update(delta);

    let accent_target = if controller.potentially_at_top() { 0.0 } else { 1.0 };
    animation.accent.animate_to(accent_target, ACCENT_EASING);
    animation.accent.update(delta);
}

fn draw_square(
    controller: Res<DragInteractionController>,
    animation: Res<SquareAnimation>,
    settings: Res<SquareSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut squares: Query<
        (
            &Mesh2d,
            &MeshMaterial2d<ColorMaterial>,
            &mut Transform,
            &mut Visibility,
        ),
        With<StretchySquare>,
    >,
    mut gizmos: Gizmos,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((mesh_handle, material_handle, mut transform, mut visibility)) =
        squares.get_single_mut()
    else {
        return;
    };

    let size = controller.widget_size();
    let at_top = controller.potentially_at_top();
    // The spring may overshoot past 1 on release; the bounce is meant to show in the outline.
    let outline = compute_outline(&controller.outline_rect(), animation.stretch.value());
    let window_size = Vec2::new(window.width(), window.height());
    let center = screen_to_world(
        Vec2::new(window_size.x / 2.0, animation.offset.value() + size / 2.0),
        window_size,
    );
    transform.translation = center.extend(0.0);

    let color = animation.accent_color(&settings);

    if settings.debug_outline {
        *visibility = Visibility::Hidden;
        let mut points: Vec<Vec2> = outline
            .flatten(settings.curve_steps)
            .into_iter()
            .map(|point| center + to_local(point, size, at_top))
            .collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        gizmos.linestrip_2d(points, Color::WHITE);
        for control in [
            outline.control_to_bottom_trailing,
            outline.control_to_top_leading,
        ] {
            gizmos.circle_2d(
                Isometry2d::from_translation(center + to_local(control, size, at_top)),
                5.0,
                Color::Srgba(color),
            );
        }
        return;
    }

    *visibility = Visibility::Inherited;
    if let Some(mesh) = meshes.get_mut(&mesh_handle.0) {
        *mesh = silhouette_mesh(&outline, &settings, at_top);
    }
    if let Some(material) = materials.get_mut(&material_handle.0) {
        material.color = Color::Srgba(color);
    }
}

/// Maps a widget-space point (y down, origin at the top-left corner of the
/// resting square) to mesh space (y up, origin at the square's center).
///
/// When resting at the bottom the shape is mirrored about the square's
/// horizontal center line so it stretches upwards.
pub fn to_local(point: Vec2, widget_size: f32, at_top: bool) -> Vec2 {
    let y = if at_top { point.y } else { widget_size - point.y };
    Vec2::new(point.x - widget_size / 2.0, widget_size / 2.0 - y)
}

/// Triangles filling the silhouette, counter-clockwise in mesh space.
pub fn silhouette_triangles(
    outline: &StretchedOutline,
    curve_steps: usize,
    widget_size: f32,
    at_top: bool,
) -> (Vec<Vec2>, Vec<u32>) {
    let slices = outline.slices(curve_steps);
    let mut positions = Vec::with_capacity(slices.len() * 2);
    for [leading, trailing] in &slices {
        positions.push(to_local(*leading, widget_size, at_top));
        positions.push(to_local(*trailing, widget_size, at_top));
    }

    let mut indices = Vec::with_capacity((slices.len() - 1) * 6);
    for row in 0..slices.len() as u32 - 1 {
        let (leading, trailing) = (row * 2, row * 2 + 1);
        let (next_leading, next_trailing) = (leading + 2, trailing + 2);
        // Mirroring flips the winding of every triangle.
        if at_top {
            indices.extend([leading, next_trailing, trailing]);
            indices.extend([leading, next_leading, next_trailing]);
        } else {
            indices.extend([leading, trailing, next_trailing]);
            indices.extend([leading, next_trailing, next_leading]);
        }
    }
    (positions, indices)
}

fn silhouette_mesh(outline: &StretchedOutline, settings: &SquareSettings, at_top: bool) -> Mesh {
    let (positions, indices) =
        silhouette_triangles(outline, settings.curve_steps, settings.widget_size, at_top);
    let vertex_count = positions.len();
    let positions: Vec<[f32; 3]> = positions.iter().map(|p| [p.x, p.y, 0.0]).collect();

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 0.0, 1.0]; vertex_count])
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0.0, 0.0]; vertex_count])
        .with_inserted_indices(Indices::U32(indices))
}
