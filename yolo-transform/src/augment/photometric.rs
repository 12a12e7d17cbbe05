//! Color and filter augmentations. Boxes pass through unchanged.

use super::{Augmenter, BoxesOnImage};
use crate::common::*;

fn ensure_rgb(image: &Array3<u8>) -> Result<()> {
    let (_h, _w, channels) = image.dim();
    ensure!(
        channels == 3,
        "channel size must be 3, but get {}",
        channels
    );
    Ok(())
}

/// Index of the reflected neighbor, mirroring around the edge pixel.
fn reflect_101(index: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    let index = if index < 0 { -index } else { index };
    let index = if index >= len {
        2 * len - 2 - index
    } else {
        index
    };
    index as usize
}

/// Options of [`Sharpen`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharpenInit {
    /// Blending factor between the original and the sharpened image.
    pub alpha: (R64, R64),
    /// Brightness of the sharpened image.
    pub lightness: (R64, R64),
}

impl Default for SharpenInit {
    fn default() -> Self {
        Self {
            alpha: (r64(0.0), r64(0.2)),
            lightness: (r64(0.8), r64(1.2)),
        }
    }
}

impl SharpenInit {
    pub fn build(self) -> Result<Sharpen> {
        let Self {
            alpha: (alpha_lo, alpha_up),
            lightness: (light_lo, light_up),
        } = self;

        ensure!(
            alpha_lo >= 0.0 && alpha_up <= 1.0 && alpha_lo <= alpha_up,
            "alpha must be an ordered range within [0, 1]"
        );
        ensure!(
            light_lo >= 0.0 && light_lo <= light_up,
            "lightness must be an ordered non-negative range"
        );

        Ok(Sharpen {
            alpha: (alpha_lo.raw(), alpha_up.raw()),
            lightness: (light_lo.raw(), light_up.raw()),
        })
    }
}

/// Blends the image with a 3x3 sharpening filter of itself.
#[derive(Debug, Clone)]
pub struct Sharpen {
    alpha: (f64, f64),
    lightness: (f64, f64),
}

impl Sharpen {
    fn kernel(alpha: f64, lightness: f64) -> [[f64; 3]; 3] {
        let mut kernel = [[-alpha; 3]; 3];
        kernel[1][1] = (1.0 - alpha) + alpha * (8.0 + lightness);
        kernel
    }
}

impl Augmenter for Sharpen {
    fn augment(
        &self,
        rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        let alpha = rng.gen_range(self.alpha.0..=self.alpha.1);
        let lightness = rng.gen_range(self.lightness.0..=self.lightness.1);
        let kernel = Self::kernel(alpha, lightness);
        let (height, width, _) = image.dim();

        let output = Array3::from_shape_fn(image.dim(), |(y, x, c)| {
            let mut sum = 0.0;
            for (ky, row) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + ky as isize - 1, height);
                for (kx, &weight) in row.iter().enumerate() {
                    let sx = reflect_101(x as isize + kx as isize - 1, width);
                    sum += weight * image[[sy, sx, c]] as f64;
                }
            }
            sum.round().clamp(0.0, 255.0) as u8
        });

        Ok((output, boxes))
    }
}

/// Adds a random integer to the luma channel of an RGB image.
#[derive(Debug, Clone)]
pub struct AddToBrightness {
    range: (i32, i32),
}

impl AddToBrightness {
    pub fn new(lo: i32, up: i32) -> Result<Self> {
        ensure!(
            -255 <= lo && lo <= up && up <= 255,
            "brightness range must be ordered within [-255, 255], but get ({}, {})",
            lo,
            up
        );
        Ok(Self { range: (lo, up) })
    }
}

impl Augmenter for AddToBrightness {
    fn augment(
        &self,
        rng: &mut StdRng,
        mut image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        ensure_rgb(&image)?;
        let value = rng.gen_range(self.range.0..=self.range.1) as f64;

        image.lanes_mut(Axis(2)).into_iter().for_each(|mut pixel| {
            let [r, g, b] = [pixel[0], pixel[1], pixel[2]].map(f64::from);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            // chroma stays fixed, so a luma shift is an equal shift of every channel
            let delta = (luma + value).clamp(0.0, 255.0) - luma;
            pixel.mapv_inplace(|val| (val as f64 + delta).round().clamp(0.0, 255.0) as u8);
        });

        Ok((image, boxes))
    }
}

/// Shifts the hue of an RGB image. A value of 255 is a full turn of the color wheel.
#[derive(Debug, Clone)]
pub struct AddToHue {
    range: (i32, i32),
}

impl AddToHue {
    pub fn new(lo: i32, up: i32) -> Result<Self> {
        ensure!(
            -255 <= lo && lo <= up && up <= 255,
            "hue range must be ordered within [-255, 255], but get ({}, {})",
            lo,
            up
        );
        Ok(Self { range: (lo, up) })
    }
}

impl Augmenter for AddToHue {
    fn augment(
        &self,
        rng: &mut StdRng,
        mut image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        ensure_rgb(&image)?;
        let value = rng.gen_range(self.range.0..=self.range.1);
        if value == 0 {
            return Ok((image, boxes));
        }
        let shift = value as f64 / 255.0 * 360.0;

        image.lanes_mut(Axis(2)).into_iter().for_each(|mut pixel| {
            let rgb = [pixel[0], pixel[1], pixel[2]].map(|val| val as f64 / 255.0);
            let [hue, saturation, value] = rgb_to_hsv(rgb);
            let hue = (hue + shift).rem_euclid(360.0);
            let rgb = hsv_to_rgb([hue, saturation, value]);
            rgb.iter().zip(pixel.iter_mut()).for_each(|(&val, dst)| {
                *dst = (val * 255.0).round().clamp(0.0, 255.0) as u8;
            });
        });

        Ok((image, boxes))
    }
}

/// Hue in degrees, saturation and value in `[0, 1]`.
fn rgb_to_hsv([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    [hue, saturation, max]
}

fn hsv_to_rgb([hue, saturation, value]: [f64; 3]) -> [f64; 3] {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector.floor() as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let offset = value - chroma;
    [r + offset, g + offset, b + offset]
}
