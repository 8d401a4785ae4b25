use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Computes the rigid transformation that optimally superposes `mobile` onto `reference`
/// (Kabsch algorithm).
///
/// Point `i` of `mobile` is paired with point `i` of `reference`. The returned isometry
/// minimizes the RMSD between the transformed mobile points and the reference points and is
/// always a proper rotation (reflections are corrected).
///
/// # Return
///
/// Returns `None` if the point sets are empty, differ in length, or the SVD fails.
pub fn superpose(mobile: &[Point3<f64>], reference: &[Point3<f64>]) -> Option<Isometry3<f64>> {
    if mobile.len() != reference.len() {
        return None;
    }
    let mobile_center = centroid(mobile)?;
    let reference_center = centroid(reference)?;

    let mut covariance = Matrix3::<f64>::zeros();
    for (m, r) in mobile.iter().zip(reference) {
        covariance += (m - mobile_center) * (r - reference_center).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;

    let mut correction = Matrix3::<f64>::identity();
    if (v_t.transpose() * u.transpose()).determinant() < 0.0 {
        correction[(2, 2)] = -1.0;
    }
    let rotation_matrix = v_t.transpose() * correction * u.transpose();
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
        rotation_matrix,
    ));

    let translation = reference_center.coords - rotation * mobile_center.coords;
    Some(Isometry3::from_parts(Translation3::from(translation), rotation))
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// RMSD after optimal superposition of `mobile` onto `reference`.
pub fn calculate_superposed_rmsd(mobile: &[Point3<f64>], reference: &[Point3<f64>]) -> Option<f64> {
    let transform = superpose(mobile, reference)?;
    let moved: Vec<Point3<f64>> = mobile.iter().map(|p| transform * p).collect();
    calculate_rmsd(&moved, reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn irregular_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.2, -0.3),
            Point3::new(2.1, 1.4, 0.5),
            Point3::new(-0.7, 2.2, 1.1),
            Point3::new(0.3, -1.2, 2.4),
        ]
    }

    #[test]
    fn centroid_of_empty_slice_is_none() {
        assert!(centroid(&[]).is_none());
        let c = centroid(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)]).unwrap();
        assert_eq!(c, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn calculate_rmsd_handles_mismatched_and_empty_inputs() {
        assert!(calculate_rmsd(&[], &[]).is_none());
        assert!(calculate_rmsd(&[Point3::origin()], &[]).is_none());
        let rmsd = calculate_rmsd(&[Point3::new(0.0, 0.0, 0.0)], &[Point3::new(3.0, 4.0, 0.0)]);
        assert!((rmsd.unwrap() - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn superpose_recovers_a_known_rigid_transform() {
        let reference = irregular_points();
        let applied = Isometry3::new(Vector3::new(4.0, -2.0, 7.5), Vector3::new(0.3, -1.1, 0.8));
        let mobile: Vec<_> = reference.iter().map(|p| applied * p).collect();

        let fitted = superpose(&mobile, &reference).unwrap();
        for (m, r) in mobile.iter().zip(&reference) {
            assert!((fitted * m - r).norm() < 1e-8);
        }
        assert!(calculate_superposed_rmsd(&mobile, &reference).unwrap() < 1e-8);
    }

    #[test]
    fn superpose_never_returns_a_reflection() {
        let reference = irregular_points();
        let mirrored: Vec<_> = reference
            .iter()
            .map(|p| Point3::new(-p.x, p.y, p.z))
            .collect();

        let fitted = superpose(&mirrored, &reference).unwrap();
        let det = fitted.rotation.to_rotation_matrix().matrix().determinant();
        assert!((det - 1.0).abs() < 1e-9);
        assert!(calculate_superposed_rmsd(&mirrored, &reference).unwrap() > 0.1);
    }

    #[test]
    fn superpose_single_point_is_a_pure_translation_fit() {
        let fitted = superpose(&[Point3::new(1.0, 1.0, 1.0)], &[Point3::new(3.0, 0.0, -1.0)])
            .unwrap();
        assert!((fitted * Point3::new(1.0, 1.0, 1.0) - Point3::new(3.0, 0.0, -1.0)).norm() < 1e-9);
    }

    #[test]
    fn superpose_rejects_mismatched_lengths() {
        assert!(superpose(&irregular_points(), &irregular_points()[..2]).is_none());
        assert!(superpose(&[], &[]).is_none());
    }
}
