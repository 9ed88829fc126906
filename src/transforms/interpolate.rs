//! Linear upsampling of coarse 2D fields.

use ndarray::Array2;

/// Source sample `(lower, upper, weight of upper)` for each output position.
///
/// End points are aligned: output 0 reads input 0 and the last output reads
/// the last input.
fn sample_positions(n_in: usize, n_out: usize) -> Vec<(usize, usize, f64)> {
    let step = if n_out > 1 {
        (n_in - 1) as f64 / (n_out - 1) as f64
    } else {
        0.0
    };

    (0..n_out)
        .map(|o| {
            let pos = o as f64 * step;
            let lower = (pos.floor() as usize).min(n_in - 1);
            let upper = (lower + 1).min(n_in - 1);
            (lower, upper, pos - lower as f64)
        })
        .collect()
}

/// Resize `input` to `shape` by separable linear interpolation.
///
/// `input` must be non-empty along both axes.
pub(crate) fn zoom_linear(input: &Array2<f64>, shape: [usize; 2]) -> Array2<f64> {
    let (rows_in, cols_in) = input.dim();
    let rows = sample_positions(rows_in, shape[0]);
    let cols = sample_positions(cols_in, shape[1]);

    let stretched = Array2::from_shape_fn((shape[0], cols_in), |(r, c)| {
        let (lo, hi, t) = rows[r];
        input[[lo, c]] * (1.0 - t) + input[[hi, c]] * t
    });

    Array2::from_shape_fn((shape[0], shape[1]), |(r, c)| {
        let (lo, hi, t) = cols[c];
        stretched[[r, lo]] * (1.0 - t) + stretched[[r, hi]] * t
    })
}
