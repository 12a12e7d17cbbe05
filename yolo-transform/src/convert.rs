//! Batch box format conversion over `[N, 4]` arrays.

use crate::common::*;
use num_traits::Float;

/// Converts `[cx, cy, w, h]` rows to `[x1, y1, x2, y2]` rows into a new array.
///
/// NaN and negative sizes propagate without checks.
pub fn xywh_to_xyxy<T>(boxes: ArrayView2<T>) -> Array2<T>
where
    T: Float,
{
    let two = T::one() + T::one();
    let mut output = Array2::zeros(boxes.raw_dim());
    output
        .outer_iter_mut()
        .zip(boxes.outer_iter())
        .for_each(|(mut dst, src)| {
            let (cx, cy, w, h) = (src[0], src[1], src[2], src[3]);
            dst[0] = cx - w / two;
            dst[1] = cy - h / two;
            dst[2] = cx + w / two;
            dst[3] = cy + h / two;
        });
    output
}
