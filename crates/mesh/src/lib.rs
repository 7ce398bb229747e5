//! Triangle meshes produced by the placeholder reconstruction and CAD
//! stages, plus the file formats they are written in.

pub mod export;
pub mod glb;
pub mod shapes;

/// Errors from mesh parsing and export.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("invalid GLB: {0}")]
    InvalidGlb(String),

    #[error("mesh has no vertices")]
    Empty,
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Append `other`, re-indexing its triangles.
    pub fn append(&mut self, other: Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.triangles.extend(
            other
                .triangles
                .into_iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    /// Reverse the winding of every triangle (flips normals inward).
    pub fn flipped(mut self) -> Self {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
        self
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> Result<([f64; 3], [f64; 3]), MeshError> {
        let first = *self.vertices.first().ok_or(MeshError::Empty)?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Ok((min, max))
    }

    /// Signed volume via the divergence theorem; positive for outward winding.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let a = self.vertices[tri[0] as usize];
                let b = self.vertices[tri[1] as usize];
                let c = self.vertices[tri[2] as usize];
                dot(a, cross(b, c)) / 6.0
            })
            .sum()
    }

    /// Every directed edge is matched by exactly one opposite edge.
    pub fn is_closed(&self) -> bool {
        let mut edges = std::collections::HashMap::<(u32, u32), i32>::new();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *edges.entry((a, b)).or_default() += 1;
            }
        }
        edges
            .iter()
            .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
    }
}

#[inline]
pub(crate) fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
