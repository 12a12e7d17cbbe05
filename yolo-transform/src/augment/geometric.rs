//! Geometric augmentations. Boxes follow the image.

use super::{Augmenter, BoxesOnImage};
use crate::common::*;

/// Row-major 2x3 affine matrix acting on `(x, y)` pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([[f64; 3]; 2]);

impl Matrix {
    fn translation(tx: f64, ty: f64) -> Self {
        Self([[1.0, 0.0, tx], [0.0, 1.0, ty]])
    }

    fn scaling(scale: f64) -> Self {
        Self([[scale, 0.0, 0.0], [0.0, scale, 0.0]])
    }

    fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self([[cos, -sin, 0.0], [sin, cos, 0.0]])
    }

    /// Computes `self * rhs`, applying `rhs` first.
    fn then_after(&self, rhs: &Self) -> Self {
        let [[a, b, c], [d, e, f]] = self.0;
        let [[g, h, i], [j, k, l]] = rhs.0;
        Self([
            [a * g + b * j, a * h + b * k, a * i + b * l + c],
            [d * g + e * j, d * h + e * k, d * i + e * l + f],
        ])
    }

    fn inverse(&self) -> Option<Self> {
        let [[a, b, c], [d, e, f]] = self.0;
        let det = a * e - b * d;
        if det.abs() <= f64::EPSILON {
            return None;
        }
        let (ia, ib, id, ie) = (e / det, -b / det, -d / det, a / det);
        Some(Self([
            [ia, ib, -(ia * c + ib * f)],
            [id, ie, -(id * c + ie * f)],
        ]))
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, b, c], [d, e, f]] = self.0;
        (a * x + b * y + c, d * x + e * y + f)
    }
}

fn sample_bilinear(image: &Array3<u8>, x: f64, y: f64, channel: usize) -> u8 {
    let (height, width, _) = image.dim();
    let pixel = |px: i64, py: i64| -> f64 {
        if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
            0.0
        } else {
            image[[py as usize, px as usize, channel]] as f64
        }
    };

    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);
    let value = pixel(x0, y0) * (1.0 - fx) * (1.0 - fy)
        + pixel(x0 + 1, y0) * fx * (1.0 - fy)
        + pixel(x0, y0 + 1) * (1.0 - fx) * fy
        + pixel(x0 + 1, y0 + 1) * fx * fy;
    value.round().clamp(0.0, 255.0) as u8
}

/// Options of [`Affine`]. Each range is sampled uniformly per image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AffineInit {
    /// Translation range as a fraction of the image width (x) and height (y).
    pub translate_percent: Option<(R64, R64)>,
    /// Scaling range, the same factor for both axes.
    pub scale: Option<(R64, R64)>,
    /// Rotation range in degrees.
    pub rotate: Option<(R64, R64)>,
}

impl AffineInit {
    pub fn build(self) -> Result<Affine> {
        let Self {
            translate_percent,
            scale,
            rotate,
        } = self;

        let check_range = |(lo, up): (R64, R64), name: &str| -> Result<_> {
            ensure!(lo <= up, "{} min must not exceed {} max", name, name);
            Ok((lo.raw(), up.raw()))
        };

        let translate_percent = translate_percent
            .map(|range| check_range(range, "translate_percent"))
            .transpose()?;
        let scale = scale
            .map(|range| {
                ensure!(range.0 > 0.0, "scale min must be positive");
                check_range(range, "scale")
            })
            .transpose()?;
        let rotate = rotate
            .map(|range| check_range(range, "rotate"))
            .transpose()?;

        Ok(Affine {
            translate_percent,
            scale,
            rotate,
        })
    }
}

/// Random scaling, rotation about the image center and translation.
///
/// The image is resampled bilinearly with zero fill. Boxes are replaced by the
/// axis-aligned hull of their transformed corners.
#[derive(Debug, Clone)]
pub struct Affine {
    translate_percent: Option<(f64, f64)>,
    scale: Option<(f64, f64)>,
    rotate: Option<(f64, f64)>,
}

impl Affine {
    fn sample_matrix(&self, rng: &mut StdRng, height: usize, width: usize) -> Matrix {
        let scale = self
            .scale
            .map(|(lo, up)| rng.gen_range(lo..=up))
            .unwrap_or(1.0);
        let angle = self
            .rotate
            .map(|(lo, up)| rng.gen_range(lo..=up))
            .unwrap_or(0.0)
            .to_radians();
        let (tx, ty) = self
            .translate_percent
            .map(|(lo, up)| {
                let tx = rng.gen_range(lo..=up) * width as f64;
                let ty = rng.gen_range(lo..=up) * height as f64;
                (tx, ty)
            })
            .unwrap_or((0.0, 0.0));

        let cx = width as f64 / 2.0 - 0.5;
        let cy = height as f64 / 2.0 - 0.5;

        Matrix::translation(tx + cx, ty + cy)
            .then_after(&Matrix::rotation(angle))
            .then_after(&Matrix::scaling(scale))
            .then_after(&Matrix::translation(-cx, -cy))
    }
}

impl Augmenter for Affine {
    fn augment(
        &self,
        rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        let (height, width, channels) = image.dim();
        let matrix = self.sample_matrix(rng, height, width);
        let inverse = matrix
            .inverse()
            .ok_or_else(|| format_err!("sampled a singular affine matrix"))?;

        let mut output = Array3::zeros((height, width, channels));
        for y in 0..height {
            for x in 0..width {
                let (src_x, src_y) = inverse.apply(x as f64, y as f64);
                for c in 0..channels {
                    output[[y, x, c]] = sample_bilinear(&image, src_x, src_y, c);
                }
            }
        }

        let labels = boxes
            .labels()
            .iter()
            .map(|label| {
                label.map_rect(|rect| {
                    let [l, t, r, b] = rect.xyxy();
                    // box edges sit half a pixel off the pixel centers the matrix maps
                    let corners = [(l, t), (r, t), (l, b), (r, b)].map(|(x, y)| {
                        let (x, y) = matrix.apply(x - 0.5, y - 0.5);
                        (x + 0.5, y + 0.5)
                    });
                    let (xs, ys): (Vec<_>, Vec<_>) = corners.iter().copied().unzip();
                    let min = |vals: &[f64]| vals.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = |vals: &[f64]| vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    PixelXYXY::from_xyxy([min(&xs), min(&ys), max(&xs), max(&ys)])
                })
            })
            .collect();

        Ok((output, BoxesOnImage::new(labels, boxes.shape())))
    }
}

/// Mirrors the image left to right with probability `p`.
#[derive(Debug, Clone)]
pub struct Fliplr {
    p: f64,
}

impl Fliplr {
    pub fn new(p: f64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&p),
            "flip probability must be within [0, 1], but get {}",
            p
        );
        Ok(Self { p })
    }
}

impl Augmenter for Fliplr {
    fn augment(
        &self,
        rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        if !rng.gen_bool(self.p) {
            return Ok((image, boxes));
        }

        let (_h, width, _c) = image.dim();
        let flipped = image.slice(s![.., ..;-1, ..]).to_owned();
        let boxes = boxes.transform(&bbox::Transform::horizontal_flip(width as f64));
        Ok((flipped, boxes))
    }
}

/// Zero-pads the image evenly on both sides until `width / height` reaches `ratio`.
#[derive(Debug, Clone)]
pub struct PadToAspectRatio {
    ratio: f64,
}

impl PadToAspectRatio {
    pub fn new(ratio: f64) -> Result<Self> {
        ensure!(
            ratio.is_finite() && ratio > 0.0,
            "aspect ratio must be positive, but get {}",
            ratio
        );
        Ok(Self { ratio })
    }

    /// Returns `(top, bottom, left, right)` paddings.
    fn paddings(&self, height: usize, width: usize) -> (usize, usize, usize, usize) {
        let (h, w) = (height as f64, width as f64);
        let current = w / h;

        if current < self.ratio {
            let diff = self.ratio * h - w;
            let left = (diff / 2.0).floor() as usize;
            let right = (diff / 2.0).ceil() as usize;
            (0, 0, left, right)
        } else if current > self.ratio {
            let diff = w / self.ratio - h;
            let top = (diff / 2.0).floor() as usize;
            let bottom = (diff / 2.0).ceil() as usize;
            (top, bottom, 0, 0)
        } else {
            (0, 0, 0, 0)
        }
    }
}

impl Augmenter for PadToAspectRatio {
    fn augment(
        &self,
        _rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        let (height, width, channels) = image.dim();
        ensure!(height > 0 && width > 0, "cannot pad an empty image");

        let (top, bottom, left, right) = self.paddings(height, width);
        let shape = (height + top + bottom, width + left + right, channels);
        let mut padded = Array3::zeros(shape);
        padded
            .slice_mut(s![top..top + height, left..left + width, ..])
            .assign(&image);

        let boxes = boxes
            .transform(&bbox::Transform::translation(left as f64, top as f64))
            .with_shape(shape);
        Ok((padded, boxes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn boxes_on(shape: (usize, usize, usize), rows: &[[f64; 4]]) -> BoxesOnImage {
        let labels = rows
            .iter()
            .enumerate()
            .map(|(class, &xyxy)| Label::new(class, PixelXYXY::from_xyxy(xyxy)))
            .collect();
        BoxesOnImage::new(labels, shape)
    }

    fn gradient(height: usize, width: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 3), |(y, x, c)| (y * 10 + x + c) as u8)
    }

    #[test]
    fn identity_affine() {
        let affine = AffineInit::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let image = gradient(6, 8);
        let boxes = boxes_on((6, 8, 3), &[[1.0, 2.0, 3.0, 4.0]]);

        let (out_image, out_boxes) = affine.augment(&mut rng, image.clone(), boxes).unwrap();
        assert_eq!(out_image, image);
        let [x1, y1, x2, y2] = out_boxes.labels()[0].xyxy();
        assert_abs_diff_eq!(x1, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y1, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x2, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y2, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn fixed_translation_moves_image_and_boxes() {
        let affine = AffineInit {
            translate_percent: Some((r64(0.25), r64(0.25))),
            ..Default::default()
        }
        .build()
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let image = gradient(4, 8);
        let boxes = boxes_on((4, 8, 3), &[[0.0, 0.0, 2.0, 2.0]]);

        let (out_image, out_boxes) = affine.augment(&mut rng, image.clone(), boxes).unwrap();
        assert_eq!(out_image[[1, 2, 0]], image[[0, 0, 0]]);
        assert_eq!(out_image[[0, 0, 1]], 0);
        let [x1, y1, x2, y2] = out_boxes.labels()[0].xyxy();
        assert_abs_diff_eq!(x1, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y1, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x2, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y2, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn rotation_encloses_corners() {
        let affine = AffineInit {
            rotate: Some((r64(90.0), r64(90.0))),
            ..Default::default()
        }
        .build()
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        // rotates about the image center (5, 5)
        let boxes = boxes_on((10, 10, 3), &[[3.0, 4.0, 7.0, 6.0]]);
        let (_, out_boxes) = affine
            .augment(&mut rng, Array3::zeros((10, 10, 3)), boxes)
            .unwrap();
        let rect = &out_boxes.labels()[0];
        assert_abs_diff_eq!(rect.cx(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.cy(), 5.0, epsilon = 1e-9);
        let [w, h] = [rect.w(), rect.h()];
        assert_abs_diff_eq!(w, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(h, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_affine_options() {
        let init = AffineInit {
            scale: Some((r64(0.0), r64(1.0))),
            ..Default::default()
        };
        assert!(init.build().is_err());

        let init = AffineInit {
            rotate: Some((r64(10.0), r64(-10.0))),
            ..Default::default()
        };
        assert!(init.build().is_err());
    }

    #[test]
    fn flip_mirrors_pixels_and_boxes() {
        let flip = Fliplr::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let image = gradient(2, 5);
        let boxes = boxes_on((2, 5, 3), &[[0.0, 0.0, 2.0, 1.0]]);

        let (out_image, out_boxes) = flip.augment(&mut rng, image.clone(), boxes).unwrap();
        assert_eq!(out_image[[1, 0, 2]], image[[1, 4, 2]]);
        assert_eq!(out_boxes.labels()[0].xyxy(), [3.0, 0.0, 5.0, 1.0]);
    }

    #[test]
    fn flip_never_with_zero_probability() {
        let flip = Fliplr::new(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let image = gradient(2, 5);
        let boxes = boxes_on((2, 5, 3), &[[0.0, 0.0, 2.0, 1.0]]);
        let (out_image, out_boxes) = flip
            .augment(&mut rng, image.clone(), boxes.clone())
            .unwrap();
        assert_eq!(out_image, image);
        assert_eq!(out_boxes, boxes);
        assert!(Fliplr::new(1.5).is_err());
    }

    #[test]
    fn pad_tall_image_to_square() {
        let pad = PadToAspectRatio::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let image = Array3::from_elem((5, 2, 3), 9u8);
        let boxes = boxes_on((5, 2, 3), &[[0.0, 0.0, 2.0, 5.0]]);

        let (padded, out_boxes) = pad.augment(&mut rng, image, boxes).unwrap();
        assert_eq!(padded.dim(), (5, 5, 3));
        assert_eq!(out_boxes.shape(), (5, 5, 3));
        assert_eq!(padded[[0, 0, 0]], 0);
        assert_eq!(padded[[0, 1, 0]], 9);
        assert_eq!(padded[[4, 2, 2]], 9);
        assert_eq!(padded[[4, 3, 2]], 0);
        assert_eq!(out_boxes.labels()[0].xyxy(), [1.0, 0.0, 3.0, 5.0]);
    }

    #[test]
    fn square_image_is_not_padded() {
        let pad = PadToAspectRatio::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let image = gradient(3, 3);
        let (padded, _) = pad
            .augment(&mut rng, image.clone(), boxes_on((3, 3, 3), &[]))
            .unwrap();
        assert_eq!(padded, image);
        assert!(PadToAspectRatio::new(0.0).is_err());
    }
}
