use super::{PixelUnit, RatioUnit, Rect, Unit, HW, XYXY};
use crate::{common::*, Transform};

/// Bounding box in center format, the center point followed by width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CxCyWH<T, U>
where
    U: Unit,
{
    pub(crate) cx: T,
    pub(crate) cy: T,
    pub(crate) w: T,
    pub(crate) h: T,
    pub(crate) _phantom: PhantomData<U>,
}

pub type PixelCxCyWH<T> = CxCyWH<T, PixelUnit>;
pub type RatioCxCyWH<T> = CxCyWH<T, RatioUnit>;

impl<T, U> CxCyWH<T, U>
where
    U: Unit,
{
    /// Builds a box without validating the size. Negative or NaN sizes are kept as is.
    pub fn from_cxcywh(cxcywh: [T; 4]) -> Self {
        let [cx, cy, w, h] = cxcywh;
        Self {
            cx,
            cy,
            w,
            h,
            _phantom: PhantomData,
        }
    }

    pub fn try_from_cxcywh(cxcywh: [T; 4]) -> Result<Self>
    where
        T: Num + PartialOrd,
    {
        let [cx, cy, w, h] = cxcywh;
        let zero = T::zero();
        ensure!(
            w >= zero && h >= zero,
            "box height and width must be non-negative"
        );
        Ok(Self::from_cxcywh([cx, cy, w, h]))
    }
}

impl<T, U> CxCyWH<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        CxCyWH::from_cxcywh([
            self.cx * transform.sx + transform.tx,
            self.cy * transform.sy + transform.ty,
            self.w * transform.sx,
            self.h * transform.sy,
        ])
    }
}

impl<T> PixelCxCyWH<T>
where
    T: Copy + Num,
{
    /// Divides the x-axis fields by the image width and the y-axis fields by the image height.
    pub fn to_ratio(&self, size: &HW<T>) -> RatioCxCyWH<T> {
        let (h, w) = (size.h(), size.w());
        CxCyWH::from_cxcywh([self.cx / w, self.cy / h, self.w / w, self.h / h])
    }
}

impl<T> RatioCxCyWH<T>
where
    T: Copy + Num,
{
    /// Multiplies the x-axis fields by the image width and the y-axis fields by the image height.
    pub fn to_pixel(&self, size: &HW<T>) -> PixelCxCyWH<T> {
        let (h, w) = (size.h(), size.w());
        CxCyWH::from_cxcywh([self.cx * w, self.cy * h, self.w * w, self.h * h])
    }
}

impl<T, U> Rect for CxCyWH<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    type Type = T;
    type Unit = U;

    fn l(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx - self.w / two
    }

    fn t(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy - self.h / two
    }

    fn r(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx + self.w / two
    }

    fn b(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy + self.h / two
    }

    fn cx(&self) -> Self::Type {
        self.cx
    }

    fn cy(&self) -> Self::Type {
        self.cy
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }
}

impl<T, U> From<XYXY<T, U>> for CxCyWH<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    fn from(from: XYXY<T, U>) -> Self {
        Self::from(&from)
    }
}

impl<T, U> From<&XYXY<T, U>> for CxCyWH<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    fn from(from: &XYXY<T, U>) -> Self {
        let two = T::one() + T::one();
        let XYXY { x1, y1, x2, y2, .. } = *from;
        Self::from_cxcywh([(x1 + x2) / two, (y1 + y2) / two, x2 - x1, y2 - y1])
    }
}
