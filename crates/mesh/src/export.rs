//! Mesh serialisation: Wavefront OBJ, binary STL and binary glTF (GLB).

use crate::glb::{GLB_MAGIC, GLB_VERSION, CHUNK_BIN, CHUNK_JSON};
use crate::{cross, Mesh};

/// glTF component type for `f32`.
const COMPONENT_FLOAT: u32 = 5126;
/// glTF component type for `u32`.
const COMPONENT_UNSIGNED_INT: u32 = 5125;
/// `bufferView.target` for vertex attributes.
const TARGET_ARRAY_BUFFER: u32 = 34962;
/// `bufferView.target` for indices.
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// The fixed quad-faced cube the orchestration API writes as its result.
pub fn demo_cube_obj() -> String {
    let mut out = String::from("# Simple cube demo model\n");
    for x in [-1.0f64, 1.0] {
        for y in [-1.0f64, 1.0] {
            for z in [-1.0f64, 1.0] {
                out.push_str(&format!("v {x:.1} {y:.1} {z:.1}\n"));
            }
        }
    }
    for face in [
        "1 2 4 3", "5 6 8 7", "1 2 6 5", "3 4 8 7", "1 3 7 5", "2 4 8 6",
    ] {
        out.push_str("f ");
        out.push_str(face);
        out.push('\n');
    }
    out
}

/// Triangulated Wavefront OBJ (1-based indices).
pub fn to_obj(mesh: &Mesh) -> String {
    let mut out = String::new();
    for v in &mesh.vertices {
        out.push_str(&format!("v {} {} {}\n", v[0], v[1], v[2]));
    }
    for t in &mesh.triangles {
        out.push_str(&format!("f {} {} {}\n", t[0] + 1, t[1] + 1, t[2] + 1));
    }
    out
}

/// Binary STL with per-facet normals. `name` fills the 80-byte header.
pub fn to_binary_stl(mesh: &Mesh, name: &str) -> Vec<u8> {
    let mut bytes = Vec::<u8>::with_capacity(84 + mesh.triangles.len() * 50);

    let mut header = [0u8; 80];
    let name_bytes = name.as_bytes();
    let header_len = name_bytes.len().min(80);
    header[..header_len].copy_from_slice(&name_bytes[..header_len]);
    bytes.extend_from_slice(&header);

    bytes.extend_from_slice(&(mesh.triangles.len() as u32).to_le_bytes());

    for tri in &mesh.triangles {
        let a = mesh.vertices[tri[0] as usize];
        let b = mesh.vertices[tri[1] as usize];
        let c = mesh.vertices[tri[2] as usize];
        let n = triangle_normal(a, b, c);

        push_f32_triplet(&mut bytes, n);
        push_f32_triplet(&mut bytes, a);
        push_f32_triplet(&mut bytes, b);
        push_f32_triplet(&mut bytes, c);
        bytes.extend_from_slice(&0u16.to_le_bytes());
    }

    bytes
}

/// Single-mesh, single-node GLB with `POSITION` (carrying `min`/`max`)
/// and `u32` indices packed into one binary chunk.
pub fn to_glb(mesh: &Mesh, name: &str) -> Vec<u8> {
    let mut bin = Vec::with_capacity(mesh.vertices.len() * 12 + mesh.triangles.len() * 12);
    for v in &mesh.vertices {
        push_f32_triplet(&mut bin, *v);
    }
    let positions_len = bin.len();
    for tri in &mesh.triangles {
        for idx in tri {
            bin.extend_from_slice(&idx.to_le_bytes());
        }
    }
    let indices_len = bin.len() - positions_len;
    pad_to_four(&mut bin, 0);

    let (min, max) = mesh
        .bounds()
        .map(|(min, max)| (min.map(|c| c as f32), max.map(|c| c as f32)))
        .unwrap_or(([0.0; 3], [0.0; 3]));

    let document = serde_json::json!({
        "asset": { "version": "2.0", "generator": "scan2cad" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "name": name }],
        "meshes": [{
            "name": name,
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }],
        }],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": [
            {
                "buffer": 0,
                "byteOffset": 0,
                "byteLength": positions_len,
                "target": TARGET_ARRAY_BUFFER,
            },
            {
                "buffer": 0,
                "byteOffset": positions_len,
                "byteLength": indices_len,
                "target": TARGET_ELEMENT_ARRAY_BUFFER,
            },
        ],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": COMPONENT_FLOAT,
                "count": mesh.vertices.len(),
                "type": "VEC3",
                "min": min,
                "max": max,
            },
            {
                "bufferView": 1,
                "componentType": COMPONENT_UNSIGNED_INT,
                "count": mesh.triangles.len() * 3,
                "type": "SCALAR",
            },
        ],
    });
    let mut json = document.to_string().into_bytes();
    pad_to_four(&mut json, b' ');

    let total_len = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total_len as u32).to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(&bin);

    out
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

#[inline]
fn triangle_normal(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [f64; 3] {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = cross(ab, ac);
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f64::EPSILON {
        [0.0, 0.0, 0.0]
    } else {
        [n[0] / len, n[1] / len, n[2] / len]
    }
}

#[inline]
fn push_f32_triplet(bytes: &mut Vec<u8>, value: [f64; 3]) {
    bytes.extend_from_slice(&(value[0] as f32).to_le_bytes());
    bytes.extend_from_slice(&(value[1] as f32).to_le_bytes());
    bytes.extend_from_slice(&(value[2] as f32).to_le_bytes());
}
