//! Math utilities and types
//!
//! Provides the fundamental vector types for the 3D simulation passes.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Check that every component of a vector is a finite number.
///
/// Snapshot data arrives from outside the engine; entries carrying NaN or
/// infinite coordinates are skipped rather than poisoning a whole pass.
pub fn is_finite(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_finite_rejects_nan() {
        assert!(is_finite(&Vec3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite(&Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(!is_finite(&Vec3::new(0.0, f32::INFINITY, 0.0)));
    }
}
