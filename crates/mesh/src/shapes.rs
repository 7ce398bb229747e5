//! Primitive solids emitted by the placeholder pipelines.

use std::collections::HashMap;

use crate::Mesh;

/// Outward-wound triangles of a box whose vertex `i` sits at the corner
/// selected by bits `x = i & 1`, `y = i & 2`, `z = i & 4`.
const BOX_TRIANGLES: [[u32; 3]; 12] = [
    [0, 4, 6],
    [0, 6, 2],
    [1, 3, 7],
    [1, 7, 5],
    [0, 1, 5],
    [0, 5, 4],
    [2, 6, 7],
    [2, 7, 3],
    [0, 2, 3],
    [0, 3, 1],
    [4, 5, 7],
    [4, 7, 6],
];

/// Axis-aligned box centred on `center` with the given half extents.
pub fn cuboid(center: [f64; 3], half_extents: [f64; 3]) -> Mesh {
    let vertices = (0..8u32)
        .map(|i| {
            let sign = |bit: u32| if (i & bit) == 0 { -1.0 } else { 1.0 };
            [
                center[0] + sign(1) * half_extents[0],
                center[1] + sign(2) * half_extents[1],
                center[2] + sign(4) * half_extents[2],
            ]
        })
        .collect();
    Mesh {
        vertices,
        triangles: BOX_TRIANGLES.to_vec(),
    }
}

/// Box of full `extents` centred on the origin.
pub fn box_mesh(extents: [f64; 3]) -> Mesh {
    cuboid(
        [0.0, 0.0, 0.0],
        [extents[0] / 2.0, extents[1] / 2.0, extents[2] / 2.0],
    )
}

/// Cube spanning `[-half, half]` on every axis.
pub fn cube(half: f64) -> Mesh {
    cuboid([0.0, 0.0, 0.0], [half, half, half])
}

/// The accessory described by the generated JSCAD source: a shell of
/// `wall` thickness around an object of `dimensions` (width, height,
/// depth), with the cavity shifted `wall / 2` along z to thicken the base.
pub fn hollow_case(dimensions: [f64; 3], wall: f64) -> Mesh {
    let [w, h, d] = dimensions;
    let mut mesh = cuboid(
        [0.0, 0.0, 0.0],
        [w / 2.0 + wall, h / 2.0 + wall, d / 2.0 + wall],
    );
    let cavity = cuboid([0.0, 0.0, wall / 2.0], [w / 2.0, h / 2.0, d / 2.0]).flipped();
    mesh.append(cavity);
    mesh
}

/// Geodesic sphere built by repeatedly splitting an icosahedron.
///
/// `subdivisions = 3` yields 642 vertices and 1280 triangles.
pub fn icosphere(subdivisions: u32, radius: f64) -> Mesh {
    let t = (1.0 + 5f64.sqrt()) / 2.0;
    let mut vertices: Vec<[f64; 3]> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .into_iter()
    .map(normalize)
    .collect();

    let mut triangles: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints = HashMap::<(u32, u32), u32>::new();
        let mut next = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in triangles {
            let ab = midpoint(&mut vertices, &mut midpoints, a, b);
            let bc = midpoint(&mut vertices, &mut midpoints, b, c);
            let ca = midpoint(&mut vertices, &mut midpoints, c, a);
            next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        triangles = next;
    }

    for v in &mut vertices {
        *v = [v[0] * radius, v[1] * radius, v[2] * radius];
    }

    Mesh {
        vertices,
        triangles,
    }
}

fn midpoint(
    vertices: &mut Vec<[f64; 3]>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    *cache.entry(key).or_insert_with(|| {
        let va = vertices[a as usize];
        let vb = vertices[b as usize];
        vertices.push(normalize([
            (va[0] + vb[0]) / 2.0,
            (va[1] + vb[1]) / 2.0,
            (va[2] + vb[2]) / 2.0,
        ]));
        (vertices.len() - 1) as u32
    })
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn box_is_closed_with_positive_volume() {
        let mesh = box_mesh([100.0, 80.0, 50.0]);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangles.len(), 12);
        assert!(mesh.is_closed());
        assert!((mesh.signed_volume() - 100.0 * 80.0 * 50.0).abs() < EPS);
    }

    #[test]
    fn icosphere_counts_match_subdivision_level() {
        let mesh = icosphere(3, 50.0);
        assert_eq!(mesh.vertices.len(), 642);
        assert_eq!(mesh.triangles.len(), 1280);
        assert!(mesh.is_closed());
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn icosphere_vertices_lie_on_radius() {
        let mesh = icosphere(2, 50.0);
        for v in &mesh.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 50.0).abs() < 1e-6);
        }
    }

    #[test]
    fn hollow_case_volume_is_shell_only() {
        let mesh = hollow_case([100.0, 80.0, 50.0], 3.0);
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.triangles.len(), 24);
        assert!(mesh.is_closed());

        let expected = 106.0 * 86.0 * 56.0 - 100.0 * 80.0 * 50.0;
        assert!((mesh.signed_volume() - expected).abs() < 1e-6);

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [-53.0, -43.0, -28.0]);
        assert_eq!(max, [53.0, 43.0, 28.0]);
    }
}
