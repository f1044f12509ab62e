//! Shape generation for 2D primitives
//!
//! Every draw command except text becomes a triangle list in arena pixel
//! coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::commands::DrawCommand;
use super::vertex::{Color, Vertex};
use crate::sim::collision::Rect;

/// Segments used for circles and ellipses
const CURVE_SEGMENTS: u32 = 24;

/// Tessellate a frame into triangles, in command order
pub fn tessellate(commands: &[DrawCommand], arena: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for command in commands {
        match command {
            DrawCommand::Fill { color } => {
                vertices.extend(rect(&Rect::new(0.0, 0.0, arena.x, arena.y), *color));
            }
            DrawCommand::Rect { rect: r, color } => vertices.extend(rect(r, *color)),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => vertices.extend(ellipse(
                *center,
                Vec2::splat(*radius),
                *color,
                CURVE_SEGMENTS,
            )),
            DrawCommand::Ellipse { rect: r, color } => vertices.extend(ellipse(
                r.center(),
                Vec2::new(r.w / 2.0, r.h / 2.0),
                *color,
                CURVE_SEGMENTS,
            )),
            DrawCommand::Polygon { points, color } => vertices.extend(polygon(points, *color)),
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => vertices.extend(line(*from, *to, *width, *color)),
            DrawCommand::Text { .. } => {}
        }
    }
    vertices
}

/// Generate vertices for a filled rectangle
pub fn rect(r: &Rect, color: Color) -> Vec<Vertex> {
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled ellipse (a circle when both radii match)
pub fn ellipse(center: Vec2, radii: Vec2, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a polygon that is star-shaped around its centroid
///
/// Covers convex shapes and the five-pointed pickup star.
pub fn polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(centroid.x, centroid.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::TextSize;
    use crate::renderer::colors;

    #[test]
    fn test_rect_two_triangles() {
        let v = rect(&Rect::new(10.0, 20.0, 30.0, 40.0), colors::WHITE);
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|p| p.position[0] >= 10.0 && p.position[0] <= 40.0));
        assert!(v.iter().all(|p| p.position[1] >= 20.0 && p.position[1] <= 60.0));
    }

    #[test]
    fn test_ellipse_stays_in_bounds() {
        let v = ellipse(
            Vec2::new(100.0, 100.0),
            Vec2::new(30.0, 15.0),
            colors::WHITE,
            16,
        );
        assert_eq!(v.len(), 48);
        for p in &v {
            assert!((p.position[0] - 100.0).abs() <= 30.001);
            assert!((p.position[1] - 100.0).abs() <= 15.001);
        }
    }

    #[test]
    fn test_star_polygon_fan() {
        let points: Vec<Vec2> = (0..10)
            .map(|i| crate::star_vertex(Vec2::new(50.0, 50.0), 20.0, i))
            .collect();
        let v = polygon(&points, colors::YELLOW);
        assert_eq!(v.len(), 30);
        // Fan hub is the star center
        assert!((v[0].position[0] - 50.0).abs() < 0.01);
        assert!((v[0].position[1] - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_shapes_are_empty() {
        assert!(polygon(&[Vec2::ZERO, Vec2::ONE], colors::RED).is_empty());
        assert!(line(Vec2::ONE, Vec2::ONE, 3.0, colors::RED).is_empty());
    }

    #[test]
    fn test_tessellate_skips_text() {
        let commands = vec![
            DrawCommand::Fill {
                color: colors::BLACK,
            },
            DrawCommand::Text {
                text: "Energy: 0".to_string(),
                pos: Vec2::ZERO,
                size: TextSize::Small,
                color: colors::WHITE,
            },
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::new(10.0, 0.0),
                width: 3.0,
                color: colors::RED,
            },
        ];
        let v = tessellate(&commands, Vec2::new(800.0, 600.0));
        assert_eq!(v.len(), 12);
        // Vertex buffers upload as raw bytes
        let bytes: &[u8] = bytemuck::cast_slice(&v);
        assert_eq!(bytes.len(), 12 * std::mem::size_of::<Vertex>());
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
