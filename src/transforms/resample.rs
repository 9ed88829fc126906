//! Nearest-neighbor resampling through a displacement field.

use ndarray::{Array, Dimension};
use rayon::prelude::*;

use super::augment::DisplacementField;
use crate::error::{Error, Result};
use crate::volume::Volume;

/// Ensure every volume shares the trailing (X, Y) extent of the first.
pub(crate) fn check_matching_xy<T>(volumes: &[Volume<T>]) -> Result<()> {
    let Some(first) = volumes.first() else {
        return Ok(());
    };
    let expected = first.xy_shape();
    for (i, volume) in volumes.iter().enumerate().skip(1) {
        if volume.xy_shape() != expected {
            return Err(Error::ShapeMismatch(format!(
                "volume {} has trailing shape {:?}, expected {:?}",
                i,
                volume.xy_shape(),
                expected
            )));
        }
    }
    Ok(())
}

/// Resample every volume through `field`.
///
/// Each 2D slice (per channel and per depth for 3D/4D volumes) is remapped
/// with nearest-neighbor lookup. Outputs keep the shape and element type of
/// their inputs; inputs are left untouched.
#[must_use = "this function returns new volumes and does not modify the originals"]
pub fn resample<T: Clone + Send + Sync>(
    volumes: &[Volume<T>],
    field: &DisplacementField,
) -> Result<Vec<Volume<T>>> {
    check_matching_xy(volumes)?;
    if let Some(first) = volumes.first() {
        check_field(first, field)?;
    }

    let lookup = field.nearest_indices();
    let resampled = volumes
        .iter()
        .map(|volume| remap_volume(volume, &lookup))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(volumes = resampled.len(), shape = ?field.shape(), "resampled volumes");
    Ok(resampled)
}

/// Resample a single volume through `field`.
#[must_use = "this function returns a new volume and does not modify the original"]
pub fn resample_one<T: Clone + Send + Sync>(
    volume: &Volume<T>,
    field: &DisplacementField,
) -> Result<Volume<T>> {
    check_field(volume, field)?;
    remap_volume(volume, &field.nearest_indices())
}

fn check_field<T>(volume: &Volume<T>, field: &DisplacementField) -> Result<()> {
    if volume.xy_shape() != field.shape() {
        return Err(Error::ShapeMismatch(format!(
            "volume trailing shape {:?} does not match displacement field shape {:?}",
            volume.xy_shape(),
            field.shape()
        )));
    }
    Ok(())
}

fn remap_volume<T: Clone + Send + Sync>(volume: &Volume<T>, lookup: &[usize]) -> Result<Volume<T>> {
    Ok(match volume {
        Volume::D2(a) => Volume::D2(remap_planes(a, lookup)?),
        Volume::D3(a) => Volume::D3(remap_planes(a, lookup)?),
        Volume::D4(a) => Volume::D4(remap_planes(a, lookup)?),
    })
}

/// Gather every trailing plane of `array` through `lookup`.
fn remap_planes<T, D>(array: &Array<T, D>, lookup: &[usize]) -> Result<Array<T, D>>
where
    T: Clone + Send + Sync,
    D: Dimension,
{
    let plane = lookup.len();
    // logical row-major order; strided or Fortran-order inputs are gathered first
    let gathered;
    let data = match array.as_slice() {
        Some(data) => data,
        None => {
            gathered = array.iter().cloned().collect::<Vec<_>>();
            &gathered[..]
        }
    };

    let output: Vec<T> = if plane == 0 {
        Vec::new()
    } else {
        data.par_chunks(plane)
            .flat_map_iter(|slice| lookup.iter().map(move |&i| slice[i].clone()))
            .collect()
    };

    Ok(Array::from_shape_vec(array.raw_dim(), output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array2, Array3, Array4, ShapeBuilder};

    fn flip_rows(shape: [usize; 2]) -> DisplacementField {
        let (x, y) = (0..shape[0])
            .flat_map(|i| (0..shape[1]).map(move |j| ((shape[0] - 1 - i) as f64, j as f64)))
            .unzip();
        DisplacementField::from_indices(shape, x, y).unwrap()
    }

    #[test]
    fn test_identity_preserves_all_ndims() {
        let field = DisplacementField::identity([4, 5]);
        let volumes = vec![
            Volume::D2(Array2::from_shape_fn((4, 5), |(x, y)| (x * 5 + y) as u16)),
            Volume::D3(Array3::from_shape_fn((3, 4, 5), |(z, x, y)| (z * 20 + x * 5 + y) as u16)),
            Volume::D4(Array4::from_shape_fn((2, 3, 4, 5), |(c, z, x, y)| {
                (c * 60 + z * 20 + x * 5 + y) as u16
            })),
        ];
        let out = resample(&volumes, &field).unwrap();
        assert_eq!(out, volumes);
    }

    #[test]
    fn test_flip_applies_to_every_slice() {
        let field = flip_rows([3, 2]);
        let volume = Volume::D3(Array3::from_shape_fn((2, 3, 2), |(z, x, y)| {
            (z * 100 + x * 10 + y) as i32
        }));
        let out = resample_one(&volume, &field).unwrap();
        let Volume::D3(a) = out else {
            panic!("expected 3D volume");
        };
        assert_eq!(a.shape(), &[2, 3, 2]);
        assert_eq!(a[[0, 0, 0]], 20);
        assert_eq!(a[[0, 2, 1]], 1);
        assert_eq!(a[[1, 0, 1]], 121);
        assert_eq!(a[[1, 1, 0]], 110);
    }

    #[test]
    fn test_fortran_layout_input() {
        let field = flip_rows([2, 3]);
        let mut f_order = Array2::<f64>::zeros((2, 3).f());
        f_order.assign(&Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap());
        let out = resample_one(&Volume::D2(f_order), &field).unwrap();
        let Volume::D2(a) = out else {
            panic!("expected 2D volume");
        };
        assert_eq!(a, Array2::from_shape_vec((2, 3), vec![4.0, 5.0, 6.0, 1.0, 2.0, 3.0]).unwrap());
    }

    #[test]
    fn test_strided_input() {
        let field = flip_rows([2, 2]);
        let full = Array2::from_shape_vec((2, 4), vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let strided = full.slice_move(s![.., ..;2]);
        assert!(strided.as_slice().is_none());

        let out = resample_one(&Volume::D2(strided), &field).unwrap();
        let Volume::D2(a) = out else {
            panic!("expected 2D volume");
        };
        assert_eq!(a, Array2::from_shape_vec((2, 2), vec![5, 7, 1, 3]).unwrap());
    }

    #[test]
    fn test_field_shape_mismatch() {
        let field = DisplacementField::identity([4, 4]);
        let volume = Volume::D2(Array2::<f32>::zeros((4, 5)));
        assert!(matches!(
            resample_one(&volume, &field),
            Err(Error::ShapeMismatch(_))
        ));
        assert!(matches!(
            resample(&[volume], &field),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_batch_shape_mismatch() {
        let field = DisplacementField::identity([4, 4]);
        let a = Volume::D2(Array2::<f32>::zeros((4, 4)));
        let b = Volume::D3(Array3::<f32>::zeros((2, 5, 4)));
        assert!(matches!(
            resample(&[a, b], &field),
            Err(Error::ShapeMismatch(_))
        ));
    }
}
