use super::{CxCyWH, PixelUnit, RatioUnit, Rect, Unit, HW};
use crate::{common::*, Transform};

/// Bounding box in corner format, the top-left and bottom-right points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XYXY<T, U>
where
    U: Unit,
{
    pub(crate) x1: T,
    pub(crate) y1: T,
    pub(crate) x2: T,
    pub(crate) y2: T,
    pub(crate) _phantom: PhantomData<U>,
}

pub type PixelXYXY<T> = XYXY<T, PixelUnit>;
pub type RatioXYXY<T> = XYXY<T, RatioUnit>;

impl<T, U> XYXY<T, U>
where
    U: Unit,
{
    /// Builds a box without validating the corner order.
    pub fn from_xyxy(xyxy: [T; 4]) -> Self {
        let [x1, y1, x2, y2] = xyxy;
        Self {
            x1,
            y1,
            x2,
            y2,
            _phantom: PhantomData,
        }
    }

    pub fn try_from_xyxy(xyxy: [T; 4]) -> Result<Self>
    where
        T: PartialOrd,
    {
        let [x1, y1, x2, y2] = xyxy;
        ensure!(
            x1 <= x2 && y1 <= y2,
            "the bottom-right corner must not precede the top-left corner"
        );
        Ok(Self::from_xyxy([x1, y1, x2, y2]))
    }
}

impl<T, U> XYXY<T, U>
where
    T: Copy + Num + PartialOrd,
    U: Unit,
{
    /// Maps both corners and restores the corner order, so mirroring transforms
    /// still produce a well-formed box.
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        let x1 = self.x1 * transform.sx + transform.tx;
        let y1 = self.y1 * transform.sy + transform.ty;
        let x2 = self.x2 * transform.sx + transform.tx;
        let y2 = self.y2 * transform.sy + transform.ty;
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self::from_xyxy([x1, y1, x2, y2])
    }
}

impl<T> PixelXYXY<T>
where
    T: Copy + Num,
{
    pub fn to_ratio(&self, size: &HW<T>) -> RatioXYXY<T> {
        let (h, w) = (size.h(), size.w());
        XYXY::from_xyxy([self.x1 / w, self.y1 / h, self.x2 / w, self.y2 / h])
    }
}

impl<T> RatioXYXY<T>
where
    T: Copy + Num,
{
    pub fn to_pixel(&self, size: &HW<T>) -> PixelXYXY<T> {
        let (h, w) = (size.h(), size.w());
        XYXY::from_xyxy([self.x1 * w, self.y1 * h, self.x2 * w, self.y2 * h])
    }
}

impl<T, U> Rect for XYXY<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    type Type = T;
    type Unit = U;

    fn l(&self) -> Self::Type {
        self.x1
    }

    fn t(&self) -> Self::Type {
        self.y1
    }

    fn r(&self) -> Self::Type {
        self.x2
    }

    fn b(&self) -> Self::Type {
        self.y2
    }

    fn cx(&self) -> Self::Type {
        let two = T::one() + T::one();
        (self.x1 + self.x2) / two
    }

    fn cy(&self) -> Self::Type {
        let two = T::one() + T::one();
        (self.y1 + self.y2) / two
    }

    fn w(&self) -> Self::Type {
        self.x2 - self.x1
    }

    fn h(&self) -> Self::Type {
        self.y2 - self.y1
    }
}

impl<T, U> From<CxCyWH<T, U>> for XYXY<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    fn from(from: CxCyWH<T, U>) -> Self {
        Self::from(&from)
    }
}

impl<T, U> From<&CxCyWH<T, U>> for XYXY<T, U>
where
    T: Copy + Num,
    U: Unit,
{
    fn from(from: &CxCyWH<T, U>) -> Self {
        let two = T::one() + T::one();
        let CxCyWH { cx, cy, w, h, .. } = *from;
        Self::from_xyxy([cx - w / two, cy - h / two, cx + w / two, cy + h / two])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelCxCyWH, RectNum};
    use approx::assert_abs_diff_eq;

    #[test]
    fn center_to_corner() {
        let center = PixelCxCyWH::from_cxcywh([50.0, 40.0, 20.0, 10.0]);
        let corner = PixelXYXY::from(&center);
        assert_eq!(corner.xyxy(), [40.0, 35.0, 60.0, 45.0]);
    }

    #[test]
    fn nan_propagates_through_conversion() {
        let center = PixelCxCyWH::from_cxcywh([f64::NAN, 1.0, 2.0, 2.0]);
        let [x1, y1, x2, y2] = PixelXYXY::from(&center).xyxy();
        assert!(x1.is_nan() && x2.is_nan());
        assert_abs_diff_eq!(y1, 0.0);
        assert_abs_diff_eq!(y2, 2.0);
    }

    #[test]
    fn inverted_corners_are_rejected() {
        assert!(PixelXYXY::try_from_xyxy([10.0, 0.0, 5.0, 1.0]).is_err());
    }

    #[test]
    fn mirror_transform_keeps_corner_order() {
        let rect = PixelXYXY::from_xyxy([10.0, 5.0, 30.0, 15.0]);
        let mirror = Transform {
            sx: -1.0,
            sy: 1.0,
            tx: 100.0,
            ty: 0.0,
        };
        assert_eq!(rect.transform(&mirror).xyxy(), [70.0, 5.0, 90.0, 15.0]);
    }
}
