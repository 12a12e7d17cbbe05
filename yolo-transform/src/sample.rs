//! The sample flowing through a pipeline and its explicitly tagged parts.

use crate::common::*;

pub type PixelCenterLabel = Label<PixelCxCyWH<f64>>;
pub type PixelCornerLabel = Label<PixelXYXY<f64>>;
pub type RatioCenterLabel = Label<RatioCxCyWH<f64>>;
pub type RatioCornerLabel = Label<RatioXYXY<f64>>;

/// Memory layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageLayout {
    /// 8-bit pixels in (height, width, channels) order.
    Hwc,
    /// Float tensor in (channels, height, width) order.
    Chw,
}

/// An image in one of the layouts used along the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    Hwc(Array3<u8>),
    Chw(Array3<f32>),
}

impl Image {
    pub fn layout(&self) -> ImageLayout {
        match self {
            Self::Hwc(_) => ImageLayout::Hwc,
            Self::Chw(_) => ImageLayout::Chw,
        }
    }

    /// Height and width, read from the axes matching the layout.
    pub fn size(&self) -> HW<usize> {
        let (h, w) = match self {
            Self::Hwc(array) => {
                let (h, w, _c) = array.dim();
                (h, w)
            }
            Self::Chw(array) => {
                let (_c, h, w) = array.dim();
                (h, w)
            }
        };
        HW::from((h, w))
    }

    pub fn channels(&self) -> usize {
        match self {
            Self::Hwc(array) => array.dim().2,
            Self::Chw(array) => array.dim().0,
        }
    }

    /// Shape in the order of the stored axes.
    pub fn shape(&self) -> [usize; 3] {
        let (a, b, c) = match self {
            Self::Hwc(array) => array.dim(),
            Self::Chw(array) => array.dim(),
        };
        [a, b, c]
    }

    pub fn into_hwc(self) -> Result<Array3<u8>> {
        match self {
            Self::Hwc(array) => Ok(array),
            Self::Chw(_) => bail!("expect an HWC image, but get a CHW tensor"),
        }
    }

    pub fn into_chw(self) -> Result<Array3<f32>> {
        match self {
            Self::Chw(array) => Ok(array),
            Self::Hwc(_) => bail!("expect a CHW tensor, but get an HWC image"),
        }
    }
}

/// Whether box coordinates describe the center and size or the two corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxLayout {
    Center,
    Corner,
}

/// Whether box coordinates are in pixels or fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxScale {
    Pixel,
    Ratio,
}

/// The coordinate convention of a box list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxFormat {
    pub layout: BoxLayout,
    pub scale: BoxScale,
}

impl BoxFormat {
    pub const PIXEL_CENTER: Self = Self {
        layout: BoxLayout::Center,
        scale: BoxScale::Pixel,
    };
    pub const PIXEL_CORNER: Self = Self {
        layout: BoxLayout::Corner,
        scale: BoxScale::Pixel,
    };
    pub const RATIO_CENTER: Self = Self {
        layout: BoxLayout::Center,
        scale: BoxScale::Ratio,
    };
    pub const RATIO_CORNER: Self = Self {
        layout: BoxLayout::Corner,
        scale: BoxScale::Ratio,
    };
}

impl Display for BoxFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = match self.scale {
            BoxScale::Pixel => PixelUnit::NAME,
            BoxScale::Ratio => RatioUnit::NAME,
        };
        let layout = match self.layout {
            BoxLayout::Center => "cxcywh",
            BoxLayout::Corner => "xyxy",
        };
        write!(f, "{} {}", scale, layout)
    }
}

/// An ordered list of labeled boxes tagged with their coordinate format.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxList {
    PixelCenter(Vec<PixelCenterLabel>),
    PixelCorner(Vec<PixelCornerLabel>),
    RatioCenter(Vec<RatioCenterLabel>),
    RatioCorner(Vec<RatioCornerLabel>),
}

impl BoxList {
    /// Builds a list from `(class, [c1, c2, c3, c4])` rows interpreted in `format`.
    pub fn from_rows<I>(format: BoxFormat, rows: I) -> Self
    where
        I: IntoIterator<Item = (usize, [f64; 4])>,
    {
        let rows = rows.into_iter();
        match (format.layout, format.scale) {
            (BoxLayout::Center, BoxScale::Pixel) => Self::PixelCenter(
                rows.map(|(class, c)| Label::new(class, PixelCxCyWH::from_cxcywh(c)))
                    .collect(),
            ),
            (BoxLayout::Corner, BoxScale::Pixel) => Self::PixelCorner(
                rows.map(|(class, c)| Label::new(class, PixelXYXY::from_xyxy(c)))
                    .collect(),
            ),
            (BoxLayout::Center, BoxScale::Ratio) => Self::RatioCenter(
                rows.map(|(class, c)| Label::new(class, RatioCxCyWH::from_cxcywh(c)))
                    .collect(),
            ),
            (BoxLayout::Corner, BoxScale::Ratio) => Self::RatioCorner(
                rows.map(|(class, c)| Label::new(class, RatioXYXY::from_xyxy(c)))
                    .collect(),
            ),
        }
    }

    /// Returns `(class, coordinates)` rows in the field order of the current format.
    pub fn rows(&self) -> Vec<(usize, [f64; 4])> {
        match self {
            Self::PixelCenter(labels) => labels.iter().map(|l| (l.class, l.cxcywh())).collect(),
            Self::PixelCorner(labels) => labels.iter().map(|l| (l.class, l.xyxy())).collect(),
            Self::RatioCenter(labels) => labels.iter().map(|l| (l.class, l.cxcywh())).collect(),
            Self::RatioCorner(labels) => labels.iter().map(|l| (l.class, l.xyxy())).collect(),
        }
    }

    pub fn format(&self) -> BoxFormat {
        match self {
            Self::PixelCenter(_) => BoxFormat::PIXEL_CENTER,
            Self::PixelCorner(_) => BoxFormat::PIXEL_CORNER,
            Self::RatioCenter(_) => BoxFormat::RATIO_CENTER,
            Self::RatioCorner(_) => BoxFormat::RATIO_CORNER,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::PixelCenter(labels) => labels.len(),
            Self::PixelCorner(labels) => labels.len(),
            Self::RatioCenter(labels) => labels.len(),
            Self::RatioCorner(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts corner boxes to center boxes. Center boxes are returned unchanged.
    pub fn to_center(self) -> Self {
        match self {
            Self::PixelCorner(labels) => Self::PixelCenter(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| PixelCxCyWH::from(r)))
                    .collect(),
            ),
            Self::RatioCorner(labels) => Self::RatioCenter(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| RatioCxCyWH::from(r)))
                    .collect(),
            ),
            center => center,
        }
    }

    /// Converts center boxes to corner boxes. Corner boxes are returned unchanged.
    pub fn to_corner(self) -> Self {
        match self {
            Self::PixelCenter(labels) => Self::PixelCorner(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| PixelXYXY::from(r)))
                    .collect(),
            ),
            Self::RatioCenter(labels) => Self::RatioCorner(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| RatioXYXY::from(r)))
                    .collect(),
            ),
            corner => corner,
        }
    }

    /// Scales ratio boxes to pixel units of an image of `size`, keeping the layout.
    pub fn to_pixel(self, size: &HW<f64>) -> Result<Self> {
        let boxes = match self {
            Self::RatioCenter(labels) => Self::PixelCenter(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| r.to_pixel(size)))
                    .collect(),
            ),
            Self::RatioCorner(labels) => Self::PixelCorner(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| r.to_pixel(size)))
                    .collect(),
            ),
            other => bail!(
                "boxes are already in pixel units ({} format)",
                other.format()
            ),
        };
        Ok(boxes)
    }

    /// Scales pixel boxes to fractions of an image of `size`, keeping the layout.
    pub fn to_ratio(self, size: &HW<f64>) -> Result<Self> {
        let boxes = match self {
            Self::PixelCenter(labels) => Self::RatioCenter(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| r.to_ratio(size)))
                    .collect(),
            ),
            Self::PixelCorner(labels) => Self::RatioCorner(
                labels
                    .iter()
                    .map(|l| l.map_rect(|r| r.to_ratio(size)))
                    .collect(),
            ),
            other => bail!(
                "boxes are already in ratio units ({} format)",
                other.format()
            ),
        };
        Ok(boxes)
    }

    pub fn into_pixel_center(self) -> Result<Vec<PixelCenterLabel>> {
        match self {
            Self::PixelCenter(labels) => Ok(labels),
            other => bail!(
                "expect boxes in {} format, but get {}",
                BoxFormat::PIXEL_CENTER,
                other.format()
            ),
        }
    }
}

/// Boxes packed into an `[N, 6]` tensor of `[reserved, class, cx, cy, w, h]` rows.
///
/// The reserved column is zero and gets the sample index from the batch collator.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedTargets {
    pub scale: BoxScale,
    pub tensor: Array2<f32>,
}

impl PackedTargets {
    pub const NUM_FIELDS: usize = 6;

    pub fn len(&self) -> usize {
        self.tensor.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The box columns converted to `[x1, y1, x2, y2]` rows.
    pub fn corners(&self) -> Array2<f32> {
        crate::convert::xywh_to_xyxy(self.tensor.slice(s![.., 2..]))
    }
}

/// Boxes of a sample, either as a box list or packed into a tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    Boxes(BoxList),
    Packed(PackedTargets),
}

impl Targets {
    pub fn len(&self) -> usize {
        match self {
            Self::Boxes(boxes) => boxes.len(),
            Self::Packed(packed) => packed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scale(&self) -> BoxScale {
        match self {
            Self::Boxes(boxes) => boxes.format().scale,
            Self::Packed(packed) => packed.scale,
        }
    }

    pub fn into_boxes(self) -> Result<BoxList> {
        match self {
            Self::Boxes(boxes) => Ok(boxes),
            Self::Packed(_) => bail!("expect a box list, but the boxes are already packed"),
        }
    }
}

impl From<BoxList> for Targets {
    fn from(from: BoxList) -> Self {
        Self::Boxes(from)
    }
}

impl From<PackedTargets> for Targets {
    fn from(from: PackedTargets) -> Self {
        Self::Packed(from)
    }
}

/// An image with its boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub image: Image,
    pub targets: Targets,
}

impl Sample {
    pub fn new(image: Image, targets: impl Into<Targets>) -> Self {
        Self {
            image,
            targets: targets.into(),
        }
    }
}
