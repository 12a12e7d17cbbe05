use super::{Unit, HW, XYXY};
use crate::common::*;

/// The generic rectangle.
pub trait Rect {
    type Type;
    type Unit: Unit;

    fn l(&self) -> Self::Type;
    fn t(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn w(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
}

pub trait RectNum: Rect
where
    Self::Type: Num + Copy,
{
    fn xyxy(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.r(), self.b()]
    }

    fn cxcywh(&self) -> [Self::Type; 4] {
        [self.cx(), self.cy(), self.w(), self.h()]
    }
}

pub trait RectFloat: RectNum
where
    Self::Type: Float,
{
    /// Checks if the box meets the image area `[0, w) x [0, h)`.
    ///
    /// A box ending exactly on the left or top edge still counts, while one
    /// starting on the right or bottom edge does not.
    fn is_partly_within(&self, size: &HW<Self::Type>) -> bool {
        let zero = Self::Type::zero();
        self.l() < size.w() && self.r() >= zero && self.t() < size.h() && self.b() >= zero
    }

    /// Cuts off the parts of the box outside the image rectangle.
    fn clip_to(&self, size: &HW<Self::Type>) -> XYXY<Self::Type, Self::Unit> {
        let zero = Self::Type::zero();
        let clip_x = |x: Self::Type| x.max(zero).min(size.w());
        let clip_y = |y: Self::Type| y.max(zero).min(size.h());
        XYXY::from_xyxy([
            clip_x(self.l()),
            clip_y(self.t()),
            clip_x(self.r()),
            clip_y(self.b()),
        ])
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + Copy,
{
}

impl<T> RectFloat for T
where
    T: Rect,
    T::Type: Float,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelCxCyWH, PixelXYXY};

    #[test]
    fn rect_accessors() {
        let rect = PixelCxCyWH::from_cxcywh([5.0, 4.0, 2.0, 4.0]);
        assert_eq!(rect.xyxy(), [4.0, 2.0, 6.0, 6.0]);
        assert_eq!(rect.cxcywh(), [5.0, 4.0, 2.0, 4.0]);
    }

    #[test]
    fn partly_within_image() {
        let size = HW::try_from_hw([100.0, 200.0]).unwrap();
        let inside = PixelXYXY::from_xyxy([10.0, 10.0, 20.0, 20.0]);
        let straddling = PixelXYXY::from_xyxy([190.0, 90.0, 230.0, 120.0]);
        let outside = PixelXYXY::from_xyxy([210.0, 10.0, 230.0, 20.0]);

        assert!(inside.is_partly_within(&size));
        assert!(straddling.is_partly_within(&size));
        assert!(!outside.is_partly_within(&size));
    }

    #[test]
    fn boxes_touching_the_image_edge() {
        let size = HW::try_from_hw([100.0, 200.0]).unwrap();
        let left = PixelXYXY::from_xyxy([-10.0, 10.0, 0.0, 20.0]);
        let top = PixelXYXY::from_xyxy([10.0, -10.0, 20.0, 0.0]);
        let right = PixelXYXY::from_xyxy([200.0, 10.0, 210.0, 20.0]);
        let bottom = PixelXYXY::from_xyxy([10.0, 100.0, 20.0, 110.0]);

        assert!(left.is_partly_within(&size));
        assert!(top.is_partly_within(&size));
        assert!(!right.is_partly_within(&size));
        assert!(!bottom.is_partly_within(&size));
    }

    #[test]
    fn clip_to_image() {
        let size = HW::try_from_hw([100.0, 200.0]).unwrap();
        let rect = PixelXYXY::from_xyxy([-5.0, 90.0, 230.0, 120.0]).clip_to(&size);
        assert_eq!(rect.xyxy(), [0.0, 90.0, 200.0, 100.0]);
    }
}
