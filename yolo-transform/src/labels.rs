//! Conversion between ratio and pixel box coordinates.

use crate::{
    common::*,
    pipeline::Transform,
    sample::{Sample, Targets},
};

fn image_size(sample: &Sample) -> Result<HW<f64>> {
    sample
        .image
        .size()
        .try_cast()
        .ok_or_else(|| format_err!("unable to cast the image size to f64"))
}

/// Scales ratio boxes to pixel coordinates, the x-axis fields by the image
/// width and the y-axis fields by the image height.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLabels;

impl Transform for AbsoluteLabels {
    fn name(&self) -> &str {
        "AbsoluteLabels"
    }

    fn forward(&self, sample: Sample) -> Result<Sample> {
        let size = image_size(&sample)?;
        let Sample { image, targets } = sample;
        let boxes = targets.into_boxes()?.to_pixel(&size)?;
        Ok(Sample {
            image,
            targets: Targets::Boxes(boxes),
        })
    }
}

/// Scales pixel boxes to fractions of the image size. The inverse of [`AbsoluteLabels`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeLabels;

impl Transform for RelativeLabels {
    fn name(&self) -> &str {
        "RelativeLabels"
    }

    fn forward(&self, sample: Sample) -> Result<Sample> {
        let size = image_size(&sample)?;
        let Sample { image, targets } = sample;
        let boxes = targets.into_boxes()?.to_ratio(&size)?;
        Ok(Sample {
            image,
            targets: Targets::Boxes(boxes),
        })
    }
}
