//! Geometry of the stretched square silhouette.
//!
//! The outline is described in widget space: x grows to the right and y grows
//! downwards, with the resting edge at `start_y`. Flipping the shape when the
//! widget rests at the bottom of the screen is left to the renderer.

use bevy::math::Vec2;

/// Box the silhouette is drawn inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineRect {
    pub start_x: f32,
    pub end_x: f32,
    pub start_y: f32,
    pub end_y: f32,
}

impl OutlineRect {
    pub const fn new(start_x: f32, end_x: f32, start_y: f32, end_y: f32) -> Self {
        Self {
            start_x,
            end_x,
            start_y,
            end_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> f32 {
        self.end_y - self.start_y
    }
}

/// Points of one frame's silhouette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchedOutline {
    pub top_leading: Vec2,
    pub top_trailing: Vec2,
    pub control_to_bottom_trailing: Vec2,
    pub bottom_trailing: Vec2,
    pub bottom_leading: Vec2,
    pub control_to_top_leading: Vec2,
}

/// One step of a path traced by a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { control: Vec2, end: Vec2 },
}

fn lerp(rest: Vec2, pulled: Vec2, factor: f32) -> Vec2 {
    Vec2::new(
        factor.mul_add(pulled.x - rest.x, rest.x),
        factor.mul_add(pulled.y - rest.y, rest.y),
    )
}

/// Computes the silhouette for `rect` pinched by `stretch_factor`.
///
/// At factor 0 the outline is the plain rectangle. At factor 1 the bottom
/// corners and both control points are pulled in to 40% and 60% of the width.
pub fn compute_outline(rect: &OutlineRect, stretch_factor: f32) -> StretchedOutline {
    let inc_x = (rect.end_x - rect.start_x) / 10.0;
    let inc_y = (rect.end_y - rect.start_y) / 10.0;
    let mid_left_x = 4.0f32.mul_add(inc_x, rect.start_x);
    let mid_right_x = 6.0f32.mul_add(inc_x, rect.start_x);
    let control_y = rect.start_y + inc_y;

    StretchedOutline {
        top_leading: Vec2::new(rect.start_x, rect.start_y),
        top_trailing: Vec2::new(rect.end_x, rect.start_y),
        control_to_bottom_trailing: lerp(
            Vec2::new(rect.end_x, control_y),
            Vec2::new(mid_right_x, control_y),
            stretch_factor,
        ),
        bottom_trailing: lerp(
            Vec2::new(rect.end_x, rect.end_y),
            Vec2::new(mid_right_x, rect.end_y),
            stretch_factor,
        ),
        bottom_leading: lerp(
            Vec2::new(rect.start_x, rect.end_y),
            Vec2::new(mid_left_x, rect.end_y),
            stretch_factor,
        ),
        control_to_top_leading: lerp(
            Vec2::new(rect.start_x, control_y),
            Vec2::new(mid_left_x, control_y),
            stretch_factor,
        ),
    }
}

impl StretchedOutline {
    /// Closed path: across the top, down the trailing side, across the bottom
    /// and back up the leading side.
    pub fn path(&self) -> [PathSegment; 5] {
        [
            PathSegment::MoveTo(self.top_leading),
            PathSegment::LineTo(self.top_trailing),
            PathSegment::QuadTo {
                control: self.control_to_bottom_trailing,
                end: self.bottom_trailing,
            },
            PathSegment::LineTo(self.bottom_leading),
            PathSegment::QuadTo {
                control: self.control_to_top_leading,
                end: self.top_leading,
            },
        ]
    }

    /// The outline as a polygon, each curve sampled `curve_steps` times.
    ///
    /// The closing point (back at `top_leading`) is not repeated.
    pub fn flatten(&self, curve_steps: usize) -> Vec<Vec2> {
        let curve_steps = curve_steps.max(1);
        let mut points = Vec::with_capacity(3 + 2 * curve_steps);
        let mut cursor = Vec2::ZERO;

        for segment in self.path() {
            match segment {
                PathSegment::MoveTo(point) | PathSegment::LineTo(point) => {
                    points.push(point);
                    cursor = point;
                }
                PathSegment::QuadTo { control, end } => {
                    for step in 1..=curve_steps {
                        let t = step as f32 / curve_steps as f32;
                        points.push(quadratic_point(cursor, control, end, t));
                    }
                    cursor = end;
                }
            }
        }

        if points.len() > 1 && points.last() == points.first() {
            points.pop();
        }
        points
    }
}

impl StretchedOutline {
    /// Leading/trailing point pairs sampled down both curved sides, from the
    /// top edge to the bottom edge.
    ///
    /// Both sides share their y at every sample, so consecutive pairs bound a
    /// quad of the filled silhouette even when it is pinched.
    pub fn slices(&self, curve_steps: usize) -> Vec<[Vec2; 2]> {
        let curve_steps = curve_steps.max(1);
        (0..=curve_steps)
            .map(|step| {
                let t = step as f32 / curve_steps as f32;
                [
                    quadratic_point(
                        self.top_leading,
                        self.control_to_top_leading,
                        self.bottom_leading,
                        t,
                    ),
                    quadratic_point(
                        self.top_trailing,
                        self.control_to_bottom_trailing,
                        self.bottom_trailing,
                        t,
                    ),
                ]
            })
            .collect()
    }
}

fn quadratic_point(from: Vec2, control: Vec2, to: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    from * (u * u) + control * (2.0 * u * t) + to * (t * t)
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "tests index buffers of known length")]
mod tests {
    use super::*;

    const FACTORS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    fn rect() -> OutlineRect {
        OutlineRect::new(0.0, 300.0, 0.0, 420.0)
    }

    #[test]
    fn outline_is_deterministic() {
        let rects = [
            rect(),
            OutlineRect::new(12.5, 97.25, -3.0, 410.0),
            OutlineRect::new(0.0, 1.0, 0.0, 0.0),
        ];
        for rect in rects {
            for factor in FACTORS {
                let a = compute_outline(&rect, factor);
                let b = compute_outline(&rect, factor);
                assert_eq!(a, b);
                assert_eq!(a.bottom_trailing.x.to_bits(), b.bottom_trailing.x.to_bits());
                assert_eq!(a.control_to_top_leading.x.to_bits(), b.control_to_top_leading.x.to_bits());
            }
        }
    }

    #[test]
    fn unstretched_outline_has_no_pinch() {
        let rect = rect();
        let outline = compute_outline(&rect, 0.0);

        assert_eq!(outline.top_leading, Vec2::new(0.0, 0.0));
        assert_eq!(outline.top_trailing, Vec2::new(300.0, 0.0));
        assert_eq!(outline.bottom_trailing.x, rect.end_x);
        assert_eq!(outline.bottom_leading.x, rect.start_x);
        assert_eq!(outline.control_to_bottom_trailing.x, rect.end_x);
        assert_eq!(outline.control_to_top_leading.x, rect.start_x);
        assert_eq!(outline.control_to_top_leading.y, 42.0);
    }

    #[test]
    fn fully_stretched_outline_meets_the_mid_lines() {
        let rect = OutlineRect::new(10.0, 110.0, 0.0, 200.0);
        let inc_x = rect.width() / 10.0;
        let outline = compute_outline(&rect, 1.0);

        assert_eq!(outline.bottom_trailing.x, rect.start_x + 6.0 * inc_x);
        assert_eq!(outline.bottom_leading.x, rect.start_x + 4.0 * inc_x);
        assert_eq!(outline.control_to_bottom_trailing.x, 70.0);
        assert_eq!(outline.control_to_top_leading.x, 50.0);
        assert_eq!(outline.bottom_leading.y, 200.0);
    }

    #[test]
    fn pinch_moves_monotonically_without_overshoot() {
        let rect = rect();
        let mid_right_x = rect.start_x + 6.0 * rect.width() / 10.0;
        let mut previous = f32::INFINITY;

        for step in 0..=100 {
            let x = compute_outline(&rect, step as f32 / 100.0).bottom_trailing.x;
            assert!(x <= previous);
            assert!(x >= mid_right_x && x <= rect.end_x);
            previous = x;
        }
    }

    #[test]
    fn zero_height_rect_collapses_to_a_line() {
        let outline = compute_outline(&OutlineRect::new(0.0, 100.0, 50.0, 50.0), 0.5);
        assert_eq!(outline.bottom_leading.y, 50.0);
        assert_eq!(outline.control_to_bottom_trailing.y, 50.0);
    }

    #[test]
    fn path_traces_the_outline_in_order() {
        let outline = compute_outline(&rect(), 0.5);
        let path = outline.path();

        assert_eq!(path[0], PathSegment::MoveTo(outline.top_leading));
        assert_eq!(path[1], PathSegment::LineTo(outline.top_trailing));
        assert_eq!(
            path[2],
            PathSegment::QuadTo {
                control: outline.control_to_bottom_trailing,
                end: outline.bottom_trailing,
            }
        );
        assert_eq!(path[3], PathSegment::LineTo(outline.bottom_leading));
        assert_eq!(
            path[4],
            PathSegment::QuadTo {
                control: outline.control_to_top_leading,
                end: outline.top_leading,
            }
        );
    }

    #[test]
    fn flattened_outline_does_not_repeat_the_start() {
        let outline = compute_outline(&rect(), 1.0);
        let points = outline.flatten(8);

        // move + line + 8 curve samples + line + 7 curve samples (last one closes)
        assert_eq!(points.len(), 18);
        assert_eq!(points[0], outline.top_leading);
        assert_eq!(points[1], outline.top_trailing);
        assert_eq!(points[9], outline.bottom_trailing);
        assert_eq!(points[10], outline.bottom_leading);
    }

    #[test]
    fn slices_run_from_top_edge_to_bottom_edge() {
        let outline = compute_outline(&rect(), 0.75);
        let slices = outline.slices(4);

        assert_eq!(slices.len(), 5);
        assert_eq!(slices[0], [outline.top_leading, outline.top_trailing]);
        assert_eq!(slices[4], [outline.bottom_leading, outline.bottom_trailing]);
        for [leading, trailing] in slices {
            assert_eq!(leading.y, trailing.y);
            assert!(leading.x < trailing.x);
        }
    }

    #[test]
    fn flattened_curves_pass_between_anchor_and_control() {
        let outline = compute_outline(&rect(), 1.0);
        let points = outline.flatten(2);

        // Midpoint of the trailing curve.
        let mid = points[2];
        let expected = quadratic_point(
            outline.top_trailing,
            outline.control_to_bottom_trailing,
            outline.bottom_trailing,
            0.5,
        );
        assert_eq!(mid, expected);
        assert!(mid.x < outline.top_trailing.x && mid.x > outline.bottom_trailing.x);
    }

    #[test]
    fn spring_overshoot_pinches_past_the_mid_lines() {
        let outline = compute_outline(&rect(), 1.2);
        assert!(outline.bottom_trailing.x < 180.0);
        assert!(outline.bottom_leading.x > 120.0);
        assert!(outline.bottom_leading.x < outline.bottom_trailing.x);
        assert_eq!(outline.top_trailing, Vec2::new(300.0, 0.0));
    }
}
