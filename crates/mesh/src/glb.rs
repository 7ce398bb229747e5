//! Minimal GLB container reading.
//!
//! Only the JSON chunk is inspected: the bounding box of the first mesh is
//! taken from the `min` / `max` of its `POSITION` accessor, which glTF 2.0
//! requires writers to emit.

use serde_json::Value;

use crate::MeshError;

/// `"glTF"` in little-endian.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
/// `"JSON"` chunk type.
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// `"BIN\0"` chunk type.
pub const CHUNK_BIN: u32 = 0x004E_4942;

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, MeshError> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| MeshError::InvalidGlb(format!("truncated at byte {offset}")))
}

/// Parse the JSON chunk of a GLB file.
pub fn read_json(bytes: &[u8]) -> Result<Value, MeshError> {
    if read_u32(bytes, 0)? != GLB_MAGIC {
        return Err(MeshError::InvalidGlb("bad magic".into()));
    }
    let version = read_u32(bytes, 4)?;
    if version != GLB_VERSION {
        return Err(MeshError::InvalidGlb(format!("unsupported version {version}")));
    }

    let chunk_len = read_u32(bytes, 12)? as usize;
    if read_u32(bytes, 16)? != CHUNK_JSON {
        return Err(MeshError::InvalidGlb("first chunk is not JSON".into()));
    }
    let chunk = 20usize
        .checked_add(chunk_len)
        .and_then(|end| bytes.get(20..end))
        .ok_or_else(|| MeshError::InvalidGlb("JSON chunk exceeds file".into()))?;

    serde_json::from_slice(chunk).map_err(|e| MeshError::InvalidGlb(e.to_string()))
}

/// Bounding box `(min, max)` of the first primitive of the first mesh.
pub fn read_bounds(bytes: &[u8]) -> Result<([f64; 3], [f64; 3]), MeshError> {
    let doc = read_json(bytes)?;

    let accessor_index = doc
        .pointer("/meshes/0/primitives/0/attributes/POSITION")
        .and_then(Value::as_u64)
        .ok_or_else(|| MeshError::InvalidGlb("no POSITION attribute".into()))?;
    let accessor = doc
        .get("accessors")
        .and_then(|a| a.get(accessor_index as usize))
        .ok_or_else(|| MeshError::InvalidGlb("POSITION accessor missing".into()))?;

    Ok((vec3(accessor, "min")?, vec3(accessor, "max")?))
}

fn vec3(accessor: &Value, key: &str) -> Result<[f64; 3], MeshError> {
    let values: Vec<f64> = accessor
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();
    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(MeshError::InvalidGlb(format!(
            "POSITION accessor has no 3-component '{key}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::export::to_glb;
    use crate::shapes::{box_mesh, icosphere};

    #[test]
    fn reads_back_written_bounds() {
        let glb = to_glb(&box_mesh([100.0, 80.0, 50.0]), "box");
        let (min, max) = read_bounds(&glb).unwrap();
        assert_eq!(min, [-50.0, -40.0, -25.0]);
        assert_eq!(max, [50.0, 40.0, 25.0]);
    }

    #[test]
    fn icosphere_bounds_span_diameter() {
        let glb = to_glb(&icosphere(3, 50.0), "object");
        let (min, max) = read_bounds(&glb).unwrap();
        for axis in 0..3 {
            assert!((max[axis] - min[axis] - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn counts_are_recorded() {
        let doc = read_json(&to_glb(&icosphere(3, 50.0), "object")).unwrap();
        assert_eq!(doc["accessors"][0]["count"], 642);
        assert_eq!(doc["accessors"][1]["count"], 1280 * 3);
    }

    #[test]
    fn rejects_non_glb_bytes() {
        assert_matches!(read_bounds(b"solid x"), Err(MeshError::InvalidGlb(_)));
        assert_matches!(read_bounds(b"glTF"), Err(MeshError::InvalidGlb(_)));
    }

    #[test]
    fn rejects_oversized_json_chunk_length() {
        let mut header = Vec::new();
        for word in [GLB_MAGIC, GLB_VERSION, 28, u32::MAX, CHUNK_JSON] {
            header.extend_from_slice(&word.to_le_bytes());
        }
        header.extend_from_slice(b"{}      ");

        assert_matches!(
            read_json(&header),
            Err(MeshError::InvalidGlb(ref m)) if m.contains("exceeds")
        );
    }
}
