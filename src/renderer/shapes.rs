//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in screen pixels (+y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
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

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (top_left.x + size.x, top_left.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle outline drawn inside the rect's bounds
pub fn rect_outline(top_left: Vec2, size: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let w = width.min(size.x * 0.5).min(size.y * 0.5);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(top_left, Vec2::new(size.x, w), color));
    vertices.extend(rect(
        top_left + Vec2::new(0.0, size.y - w),
        Vec2::new(size.x, w),
        color,
    ));
    vertices.extend(rect(
        top_left + Vec2::new(0.0, w),
        Vec2::new(w, size.y - 2.0 * w),
        color,
    ));
    vertices.extend(rect(
        top_left + Vec2::new(size.x - w, w),
        Vec2::new(w, size.y - 2.0 * w),
        color,
    ));
    vertices
}

/// Rectangle of `size` centred on `center`, rotated by `angle_deg` (clockwise on screen)
pub fn rotated_rect(center: Vec2, size: Vec2, angle_deg: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle_deg.to_radians());
    let half = size * 0.5;
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));

    vec![
        Vertex::new(corners[0].x, corners[0].y, color),
        Vertex::new(corners[1].x, corners[1].y, color),
        Vertex::new(corners[3].x, corners[3].y, color),
        Vertex::new(corners[3].x, corners[3].y, color),
        Vertex::new(corners[1].x, corners[1].y, color),
        Vertex::new(corners[2].x, corners[2].y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, WHITE, 16).len(), 48);
        // Degenerate segment counts still produce a triangle fan
        assert_eq!(circle(Vec2::ZERO, 5.0, WHITE, 1).len(), 9);
    }

    #[test]
    fn test_ring_stays_between_radii() {
        for v in ring(Vec2::new(10.0, 10.0), 4.0, 6.0, WHITE, 12) {
            let d = Vec2::from(v.position).distance(Vec2::new(10.0, 10.0));
            assert!(d > 3.99 && d < 6.01);
        }
    }

    #[test]
    fn test_rect_bounds() {
        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), WHITE);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((1.0..=4.0).contains(&v.position[0]));
            assert!((2.0..=6.0).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let verts = rotated_rect(Vec2::ZERO, Vec2::new(10.0, 2.0), 90.0, WHITE);
        for v in &verts {
            assert!(v.position[0].abs() <= 1.0 + 1e-4);
            assert!(v.position[1].abs() <= 5.0 + 1e-4);
        }
    }
}
