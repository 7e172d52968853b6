//! nalgebra <-> glam at the render boundary.

use bevy::prelude::*;
use nalgebra::{Point3, Vector3};

pub fn vec3(v: Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn point3(p: Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub fn na_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_survive_the_boundary() {
        let v = Vec3::new(1.0, -2.5, 3.25);
        assert_eq!(vec3(na_vector(v)), v);
        assert_eq!(point3(Point3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }
}
