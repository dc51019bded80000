use nalgebra::{Point3, Rotation3, Unit, Vector3};
use std::f64::consts::PI;

/// Vectors shorter than this are treated as zero length.
pub const GEOMETRY_EPSILON: f64 = 1e-8;

/// Returns the rotation that takes the direction of `from` onto the direction of `to`.
///
/// Unlike [`Rotation3::rotation_between`], anti-parallel inputs are handled with a
/// half turn about an arbitrary perpendicular axis. Returns `None` if either vector
/// has zero length.
pub fn rotation_to_align(from: &Vector3<f64>, to: &Vector3<f64>) -> Option<Rotation3<f64>> {
    let a = from.try_normalize(GEOMETRY_EPSILON)?;
    let b = to.try_normalize(GEOMETRY_EPSILON)?;

    let cross = a.cross(&b);
    let cos_angle = a.dot(&b);

    match Unit::try_new(cross, GEOMETRY_EPSILON) {
        Some(axis) => Some(Rotation3::from_axis_angle(&axis, cross.norm().atan2(cos_angle))),
        None if cos_angle > 0.0 => Some(Rotation3::identity()),
        None => {
            let axis = Unit::new_normalize(any_perpendicular(&a));
            Some(Rotation3::from_axis_angle(&axis, PI))
        }
    }
}

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// Rotates `point` about `origin`.
#[inline]
pub fn rotate_about(
    point: &Point3<f64>,
    rotation: &Rotation3<f64>,
    origin: &Point3<f64>,
) -> Point3<f64> {
    origin + rotation * (point - origin)
}

/// Any unit vector perpendicular to the (normalized) input.
pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let temp = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (temp - v * v.dot(&temp)).normalize()
}

/// Angle `a-vertex-c` in radians, or `None` when either arm has zero length.
pub fn bond_angle(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> Option<f64> {
    let v1 = a - vertex;
    let v2 = c - vertex;
    let n1 = v1.norm();
    let n2 = v2.norm();
    if n1 < GEOMETRY_EPSILON || n2 < GEOMETRY_EPSILON {
        return None;
    }
    Some((v1.dot(&v2) / (n1 * n2)).clamp(-1.0, 1.0).acos())
}
