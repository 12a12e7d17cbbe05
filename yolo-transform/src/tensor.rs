//! Tensor packing, normalization and resizing.

use crate::{
    common::*,
    pipeline::Transform,
    sample::{BoxLayout, BoxScale, Image, PackedTargets, Sample, Targets},
};

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Converts the HWC 8-bit image into a CHW float tensor in `[0, 1]` and packs
/// center-format boxes into `[0, class, cx, cy, w, h]` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Transform for ToTensor {
    fn name(&self) -> &str {
        "ToTensor"
    }

    fn forward(&self, sample: Sample) -> Result<Sample> {
        let Sample { image, targets } = sample;
        let hwc = image.into_hwc()?;
        let boxes = targets.into_boxes()?;
        let format = boxes.format();
        ensure!(
            format.layout == BoxLayout::Center,
            "only center format boxes can be packed, but get {}",
            format
        );

        let (height, width, channels) = hwc.dim();
        let chw = Array3::from_shape_fn((channels, height, width), |(c, y, x)| {
            hwc[[y, x, c]] as f32 / 255.0
        });

        let rows = boxes.rows();
        let mut tensor = Array2::zeros((rows.len(), PackedTargets::NUM_FIELDS));
        tensor
            .outer_iter_mut()
            .zip(&rows)
            .for_each(|(mut dst, (class, [c1, c2, c3, c4]))| {
                dst[1] = *class as f32;
                dst[2] = *c1 as f32;
                dst[3] = *c2 as f32;
                dst[4] = *c3 as f32;
                dst[5] = *c4 as f32;
            });

        Ok(Sample {
            image: Image::Chw(chw),
            targets: Targets::Packed(PackedTargets {
                scale: format.scale,
                tensor,
            }),
        })
    }
}

/// Per-channel `(x - mean) / std` on a CHW tensor. Boxes pass through.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalize {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl Normalize {
    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self> {
        ensure!(
            mean.len() == std.len(),
            "mean and std must have the same length, but get {} and {}",
            mean.len(),
            std.len()
        );
        ensure!(
            std.iter().all(|&val| val > 0.0),
            "std values must be positive"
        );
        Ok(Self { mean, std })
    }

}

impl Default for Normalize {
    fn default() -> Self {
        Self {
            mean: IMAGENET_MEAN.to_vec(),
            std: IMAGENET_STD.to_vec(),
        }
    }
}

impl Transform for Normalize {
    fn name(&self) -> &str {
        "Normalize"
    }

    fn forward(&self, sample: Sample) -> Result<Sample> {
        let Sample { image, targets } = sample;
        let channels = image.channels();
        let mut chw = image.into_chw()?;
        ensure!(
            channels == self.mean.len(),
            "expect {} channels, but get {}",
            self.mean.len(),
            channels
        );

        chw.outer_iter_mut()
            .zip(self.mean.iter().zip(&self.std))
            .for_each(|(mut plane, (&mean, &std))| {
                plane.mapv_inplace(|val| (val - mean) / std);
            });

        Ok(Sample {
            image: Image::Chw(chw),
            targets,
        })
    }
}

/// Nearest-neighbor resize of a CHW tensor.
///
/// Box coordinates are not touched, so the boxes must be in ratio units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resize {
    height: usize,
    width: usize,
}

impl Resize {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "resized image size must be positive, but get {}x{}",
            height,
            width
        );
        Ok(Self { height, width })
    }
}

impl Transform for Resize {
    fn name(&self) -> &str {
        "Resize"
    }

    fn forward(&self, sample: Sample) -> Result<Sample> {
        let Sample { image, targets } = sample;
        ensure!(
            targets.scale() == BoxScale::Ratio,
            "resizing keeps box coordinates, so boxes must be in ratio units"
        );
        let src = image.into_chw()?;
        let (channels, in_h, in_w) = src.dim();
        let Self {
            height: out_h,
            width: out_w,
        } = *self;
        ensure!(in_h > 0 && in_w > 0, "cannot resize an empty image");

        let dst = Array3::from_shape_fn((channels, out_h, out_w), |(c, y, x)| {
            let src_y = (y * in_h / out_h).min(in_h - 1);
            let src_x = (x * in_w / out_w).min(in_w - 1);
            src[[c, src_y, src_x]]
        });

        Ok(Sample {
            image: Image::Chw(dst),
            targets,
        })
    }
}
