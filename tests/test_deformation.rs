//! End-to-end tests for elastic deformation.

use ndarray::{Array2, Array3, Array4};
use voxtile::transforms::{resample, resample_one};
use voxtile::{deform, deform_one, generate_deformation_field, DeformationSettings, Error, Volume};

fn ramp2(rows: usize, cols: usize) -> Array2<f32> {
    Array2::from_shape_fn((rows, cols), |(x, y)| (x * cols + y) as f32)
}

#[test]
fn test_zero_alpha_is_identity() {
    let settings = DeformationSettings::new().scale(8).alpha(0.0);
    let field = generate_deformation_field(&[48, 40], &settings, Some(5)).unwrap();
    assert!(field.is_identity());

    let volume = Volume::from(Array3::from_shape_fn((3, 48, 40), |(z, x, y)| {
        (z * 10_000 + x * 100 + y) as f32
    }));
    let out = resample_one(&volume, &field).unwrap();
    assert_eq!(out, volume);
}

#[test]
fn test_deform_preserves_shape_for_all_ranks() {
    let settings = DeformationSettings::new().scale(10);
    let volumes = vec![
        Volume::from(ramp2(60, 50)),
        Volume::from(Array3::<f32>::ones((4, 60, 50))),
        Volume::from(Array4::<f32>::ones((2, 3, 60, 50))),
    ];
    let out = deform(&volumes, &settings, Some(11)).unwrap();

    assert_eq!(out.len(), 3);
    for (before, after) in volumes.iter().zip(&out) {
        assert_eq!(before.shape(), after.shape());
    }
    // constant inputs stay constant under nearest-neighbor lookup
    let Volume::D4(a) = &out[2] else {
        panic!("expected 4D volume");
    };
    assert!(a.iter().all(|&v| v == 1.0));
}

#[test]
fn test_deform_values_come_from_input() {
    let image = ramp2(80, 80);
    let out = deform_one(&Volume::from(image.clone()), &DeformationSettings::default(), Some(3))
        .unwrap();
    let Volume::D2(a) = out else {
        panic!("expected 2D volume");
    };
    let n = (80 * 80) as f32;
    assert!(a.iter().all(|&v| v >= 0.0 && v < n && v.fract() == 0.0));
}

#[test]
fn test_same_seed_same_output() {
    let volume = Volume::from(Array3::from_shape_fn((2, 64, 64), |(z, x, y)| {
        ((z + 1) * (x * 64 + y)) as u16
    }));
    let settings = DeformationSettings::new().scale(16).alpha(6.0).sigma(1.0);

    let a = deform_one(&volume, &settings, Some(99)).unwrap();
    let b = deform_one(&volume, &settings, Some(99)).unwrap();
    assert_eq!(a, b);

    let fa = generate_deformation_field(&[64, 64], &settings, Some(1)).unwrap();
    let fb = generate_deformation_field(&[64, 64], &settings, Some(2)).unwrap();
    assert_ne!(fa, fb);
}

#[test]
fn test_shared_field_across_volumes() {
    // image and label deformed together must stay aligned
    let image = Volume::from(ramp2(60, 60));
    let label = Volume::from(ramp2(60, 60));
    let out = deform(&[image, label], &DeformationSettings::new().scale(12), Some(21)).unwrap();
    assert_eq!(out[0], out[1]);
}

#[test]
fn test_field_matches_explicit_resample() {
    let settings = DeformationSettings::new().scale(10).alpha(8.0);
    let volumes = vec![Volume::from(ramp2(50, 70)), Volume::from(ramp2(50, 70))];

    let deformed = deform(&volumes, &settings, Some(4)).unwrap();
    let field = generate_deformation_field(&[50, 70], &settings, Some(4)).unwrap();
    let resampled = resample(&volumes, &field).unwrap();
    assert_eq!(deformed, resampled);
}

#[test]
fn test_field_stays_in_bounds() {
    let settings = DeformationSettings::new().scale(5).alpha(50.0).sigma(0.5);
    let field = generate_deformation_field(&[30, 25], &settings, Some(8)).unwrap();
    assert_eq!(field.len(), 30 * 25);
    assert!(field.x_indices().iter().all(|&x| (0.0..=29.0).contains(&x)));
    assert!(field.y_indices().iter().all(|&y| (0.0..=24.0).contains(&y)));
}

#[test]
fn test_deform_errors() {
    let settings = DeformationSettings::default();

    let mismatched = vec![
        Volume::from(Array2::<f32>::zeros((80, 80))),
        Volume::from(Array3::<f32>::zeros((2, 80, 81))),
    ];
    assert!(matches!(
        deform(&mismatched, &settings, Some(0)),
        Err(Error::ShapeMismatch(_))
    ));

    // scale larger than the image leaves no coarse grid
    let small = Volume::from(Array2::<f32>::zeros((20, 20)));
    assert!(matches!(
        deform_one(&small, &settings, Some(0)),
        Err(Error::Configuration(_))
    ));

    assert!(matches!(
        generate_deformation_field(&[10, 10, 10], &settings, None),
        Err(Error::InvalidDimensions(_))
    ));

    let empty: Vec<Volume<f32>> = Vec::new();
    assert!(deform(&empty, &settings, None).unwrap().is_empty());
}
