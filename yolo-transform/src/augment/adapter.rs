use super::{
    AddToBrightness, AddToHue, AffineInit, Augmenter, BoxesOnImage, Fliplr, PadToAspectRatio,
    Sequential, SharpenInit,
};
use crate::{
    common::*,
    pipeline::Transform,
    sample::{BoxList, Image, Sample},
};

/// Runs an [`Augmenter`] on a sample with HWC image and pixel center boxes.
///
/// Boxes are handed to the augmenter as corners, and the ones pushed out of
/// the augmented image are dropped or clipped on the way back. Each call
/// augments with a generator seeded from the adapter's own generator.
#[derive(Debug)]
pub struct ImgAug<A = Box<dyn Augmenter>>
where
    A: Augmenter,
{
    name: String,
    augmenter: A,
    rng: Mutex<StdRng>,
}

impl<A> ImgAug<A>
where
    A: Augmenter,
{
    /// Seeds the random generator from `seed`, or from system entropy if absent.
    pub fn new(name: impl Into<String>, augmenter: A, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            name: name.into(),
            augmenter,
            rng: Mutex::new(rng),
        }
    }
}

impl ImgAug<Sequential> {
    /// Sharpen, affine, brightness, hue and horizontal flip, in this order.
    pub fn default_aug(seed: Option<u64>) -> Result<Self> {
        let sharpen = SharpenInit {
            alpha: (r64(0.0), r64(0.1)),
            ..Default::default()
        }
        .build()?;
        let affine = AffineInit {
            rotate: Some((r64(0.0), r64(0.0))),
            translate_percent: Some((r64(-0.1), r64(0.1))),
            scale: Some((r64(0.8), r64(1.5))),
        }
        .build()?;

        let sequential = Sequential::new(vec![
            Box::new(sharpen),
            Box::new(affine),
            Box::new(AddToBrightness::new(-60, 40)?),
            Box::new(AddToHue::new(-10, 10)?),
            Box::new(Fliplr::new(0.5)?),
        ]);
        Ok(Self::new("DefaultAug", sequential, seed))
    }

    /// Zero pads the image to a square around the centered original.
    pub fn pad_square(seed: Option<u64>) -> Result<Self> {
        let sequential = Sequential::new(vec![Box::new(PadToAspectRatio::new(1.0)?)]);
        Ok(Self::new("PadSquare", sequential, seed))
    }
}

impl<A> Transform for ImgAug<A>
where
    A: Augmenter,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, sample: Sample) -> Result<Sample> {
        let Sample { image, targets } = sample;
        let image = image.into_hwc()?;
        let labels: Vec<_> = targets
            .into_boxes()?
            .into_pixel_center()?
            .iter()
            .map(|label| label.map_rect(|rect| PixelXYXY::from(rect)))
            .collect();
        let num_input = labels.len();
        let boxes = BoxesOnImage::new(labels, image.dim());

        // hold the lock only to draw a seed
        let seed: u64 = self
            .rng
            .lock()
            .map_err(|_| format_err!("the random generator of {} is poisoned", self.name))?
            .gen();
        let mut rng = StdRng::seed_from_u64(seed);
        let (image, boxes) = self.augmenter.augment(&mut rng, image, boxes)?;
        ensure!(
            boxes.len() <= num_input,
            "the augmenter produced {} boxes out of {} input boxes",
            boxes.len(),
            num_input
        );

        let boxes = boxes.with_shape(image.dim()).clip_out_of_image();
        let num_dropped = num_input - boxes.len();
        if num_dropped > 0 {
            debug!(
                "{} dropped {} out of {} boxes outside the image",
                self.name, num_dropped, num_input
            );
        }

        let labels = boxes
            .into_labels()
            .iter()
            .map(|label| label.map_rect(|rect| PixelCxCyWH::from(rect)))
            .collect();
        Ok(Sample::new(Image::Hwc(image), BoxList::PixelCenter(labels)))
    }
}
