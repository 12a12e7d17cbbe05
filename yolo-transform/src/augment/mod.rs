//! Image augmentation behind a narrow boundary, and the adapter that plugs it
//! into a pipeline.

mod adapter;
mod geometric;
mod photometric;

pub use adapter::*;
pub use geometric::*;
pub use photometric::*;

use crate::{common::*, sample::PixelCornerLabel};

/// An image augmentation operating on an HWC 8-bit image and the corner boxes on it.
///
/// Implementations may drop boxes but never create new ones.
pub trait Augmenter: Debug + Send + Sync {
    fn augment(
        &self,
        rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)>;
}

impl Augmenter for Box<dyn Augmenter> {
    fn augment(
        &self,
        rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        (**self).augment(rng, image, boxes)
    }
}

/// Pixel corner boxes associated with the shape of the image they lie on.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxesOnImage {
    labels: Vec<PixelCornerLabel>,
    shape: (usize, usize, usize),
}

impl BoxesOnImage {
    /// `shape` is the (height, width, channels) shape of the image.
    pub fn new(labels: Vec<PixelCornerLabel>, shape: (usize, usize, usize)) -> Self {
        Self { labels, shape }
    }

    pub fn labels(&self) -> &[PixelCornerLabel] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<PixelCornerLabel> {
        self.labels
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Image height and width in pixels.
    pub fn size(&self) -> HW<f64> {
        let (h, w, _c) = self.shape;
        HW::from((h, w)).cast()
    }

    pub fn with_shape(self, shape: (usize, usize, usize)) -> Self {
        Self { shape, ..self }
    }

    pub fn transform(self, transform: &bbox::Transform<f64>) -> Self {
        let labels = self.labels.iter().map(|label| transform * label).collect();
        Self { labels, ..self }
    }

    /// Drops boxes lying completely outside the image and cuts the rest to the image area.
    pub fn clip_out_of_image(self) -> Self {
        let size = self.size();
        let labels = self
            .labels
            .iter()
            .filter(|label| label.is_partly_within(&size))
            .map(|label| label.map_rect(|rect| rect.clip_to(&size)))
            .collect();
        Self { labels, ..self }
    }
}

/// Applies child augmenters one after another.
#[derive(Debug, Default)]
pub struct Sequential {
    children: Vec<Box<dyn Augmenter>>,
}

impl Sequential {
    pub fn new(children: Vec<Box<dyn Augmenter>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Augmenter for Sequential {
    fn augment(
        &self,
        rng: &mut StdRng,
        image: Array3<u8>,
        boxes: BoxesOnImage,
    ) -> Result<(Array3<u8>, BoxesOnImage)> {
        self.children
            .iter()
            .try_fold((image, boxes), |(image, boxes), child| {
                child.augment(rng, image, boxes)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(class: usize, xyxy: [f64; 4]) -> PixelCornerLabel {
        Label::new(class, PixelXYXY::from_xyxy(xyxy))
    }

    #[test]
    fn clip_out_of_image() {
        let boxes = BoxesOnImage::new(
            vec![
                corner(0, [10.0, 10.0, 20.0, 20.0]),
                corner(1, [-10.0, 40.0, 10.0, 60.0]),
                corner(2, [120.0, 10.0, 150.0, 20.0]),
                corner(3, [90.0, 90.0, 110.0, 130.0]),
            ],
            (100, 100, 3),
        );

        let clipped = boxes.clip_out_of_image();
        let rows: Vec<_> = clipped
            .labels()
            .iter()
            .map(|label| (label.class, label.xyxy()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (0, [10.0, 10.0, 20.0, 20.0]),
                (1, [0.0, 40.0, 10.0, 60.0]),
                (3, [90.0, 90.0, 100.0, 100.0]),
            ]
        );
    }

    #[test]
    fn sequential_runs_children_in_order() {
        let sequential = Sequential::new(vec![
            Box::new(PadToAspectRatio::new(1.0).unwrap()),
            Box::new(Fliplr::new(1.0).unwrap()),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        let image = Array3::zeros((2, 4, 3));
        let boxes = BoxesOnImage::new(vec![corner(5, [0.0, 0.0, 1.0, 1.0])], (2, 4, 3));

        let (image, boxes) = sequential.augment(&mut rng, image, boxes).unwrap();
        assert_eq!(image.dim(), (4, 4, 3));
        assert_eq!(boxes.shape(), (4, 4, 3));
        assert_eq!(boxes.labels()[0].xyxy(), [3.0, 1.0, 4.0, 2.0]);
    }

    #[test]
    fn empty_sequential_is_identity() {
        let mut rng = StdRng::seed_from_u64(0);
        let image = Array3::from_elem((2, 2, 3), 7u8);
        let boxes = BoxesOnImage::new(vec![corner(0, [0.0, 0.0, 1.0, 1.0])], (2, 2, 3));
        let (out_image, out_boxes) = Sequential::default()
            .augment(&mut rng, image.clone(), boxes.clone())
            .unwrap();
        assert_eq!(out_image, image);
        assert_eq!(out_boxes, boxes);
    }
}
