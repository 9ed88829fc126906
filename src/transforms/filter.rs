//! Separable Gaussian smoothing of 2D fields.

use ndarray::{Array2, Axis};

/// Kernel radius in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Normalized 1D Gaussian weights with radius `floor(4 * sigma + 0.5)`.
pub(crate) fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Map an index onto `[0, len)` by half-sample symmetric reflection
/// (`d c b a | a b c d | d c b a`).
pub(crate) fn reflect_index(i: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        2 * len - 1 - r
    }
}

/// Smooth `input` with an isotropic Gaussian of bandwidth `sigma`, reflecting at the borders.
pub(crate) fn gaussian_filter(input: &Array2<f64>, sigma: f64) -> Array2<f64> {
    let kernel = gaussian_kernel(sigma);
    let rows = correlate_axis(input, &kernel, Axis(0));
    correlate_axis(&rows, &kernel, Axis(1))
}

fn correlate_axis(input: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array2::zeros(input.raw_dim());

    for (src, mut dst) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        let n = src.len();
        for (i, out) in dst.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| w * src[reflect_index(i as isize + k as isize - radius, n)])
                .sum();
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(0.6);
        // radius = floor(2.4 + 0.5) = 2
        assert_eq!(k.len(), 5);
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-15);
        }
        assert!(k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn test_reflect_index_half_sample() {
        let mapped: Vec<usize> = (-4..9).map(|i| reflect_index(i, 4)).collect();
        assert_eq!(mapped, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0, 0]);

        for i in -3..3 {
            assert_eq!(reflect_index(i, 1), 0);
        }
    }

    #[test]
    fn test_constant_field_is_preserved() {
        let input = Array2::from_elem((3, 5), 0.75);
        let output = gaussian_filter(&input, 1.3);
        for &v in output.iter() {
            assert!((v - 0.75).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smoothing_preserves_mass_and_spreads_impulse() {
        let mut input = Array2::zeros((9, 9));
        input[[4, 4]] = 1.0;
        let output = gaussian_filter(&input, 1.0);

        let total: f64 = output.sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(output[[4, 4]] < 1.0);
        assert!(output[[4, 5]] > 0.0);
        assert!((output[[3, 4]] - output[[5, 4]]).abs() < 1e-15);
    }
}
