//! Triangle meshes carried by robot links, tools and external axes. Meshes are only
//! posed (moved together with the kinematic chain), never inspected for collisions.

use crate::kinematic_traits::Pose;
use nalgebra::Point3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f64>>, indices: Vec<[u32; 3]>) -> Self {
        Mesh { vertices, indices }
    }

    pub fn empty() -> Self {
        Mesh::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Copy of this mesh with all vertices moved by the pose.
    pub fn transformed(&self, pose: &Pose) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|v| pose * v).collect(),
            indices: self.indices.clone(),
        }
    }

    /// Moves the vertices in place.
    pub fn transform(&mut self, pose: &Pose) {
        for v in self.vertices.iter_mut() {
            *v = pose * *v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion};

    #[test]
    fn test_transformed_leaves_original() {
        let mesh = Mesh::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        );
        let shift = Isometry3::from_parts(Translation3::new(0.0, 0.0, 5.0), UnitQuaternion::identity());
        let moved = mesh.transformed(&shift);
        assert_eq!(moved.vertices[1], Point3::new(1.0, 0.0, 5.0));
        assert_eq!(mesh.vertices[1], Point3::new(1.0, 0.0, 0.0));

        let mut in_place = mesh.clone();
        in_place.transform(&shift);
        assert_eq!(in_place, moved);
    }
}
