//! Reflective index ranges along a single axis.

use crate::error::{Error, Result};

/// Indices covering `[start, end)` on an axis of `axis_length`, mirroring
/// any out-of-bounds portion back into the volume.
///
/// Below zero the range reflects about index 0 without repeating it
/// (`-1 -> 1`, `-2 -> 2`); past the far edge it reflects about the last
/// index including it (`n -> n-1`, `n+1 -> n-2`). The result always has
/// `end - start` entries.
///
/// The mirror image only extends one axis length in each direction, so
/// `start` must be greater than `-axis_length` and `end` at most
/// `2 * axis_length`. A range may lie entirely outside the axis, e.g.
/// `[5, 7)` on an axis of 5 maps to `[4, 3]`.
///
/// # Example
///
/// ```
/// use voxtile::windowing::reflective_range;
///
/// let range = reflective_range(-2, 5, 5).unwrap();
/// assert_eq!(range, vec![2, 1, 0, 1, 2, 3, 4]);
/// ```
pub fn reflective_range(start: isize, end: isize, axis_length: usize) -> Result<Vec<usize>> {
    let len = axis_length as isize;

    if end <= start {
        return Err(Error::ShapeMismatch(format!(
            "empty window range [{}, {})",
            start, end
        )));
    }
    if start <= -len || end > 2 * len {
        return Err(Error::ShapeMismatch(format!(
            "window range [{}, {}) cannot be reflected into an axis of length {}",
            start, end, axis_length
        )));
    }

    let indices = (start..end)
        .map(|i| {
            let mirrored = if i < 0 {
                -i
            } else if i >= len {
                2 * len - 1 - i
            } else {
                i
            };
            mirrored as usize
        })
        .collect();

    Ok(indices)
}
