//! Class-labeled bounding boxes.

use bbox::{CxCyWH, Rect, Transform, Unit, XYXY};
use num_traits::Num;
use std::ops::Mul;

/// A bounding box with an integer class id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label<R>
where
    R: Rect,
{
    pub rect: R,
    pub class: usize,
}

impl<R> Label<R>
where
    R: Rect,
{
    pub fn new(class: usize, rect: R) -> Self {
        Self { rect, class }
    }

    /// Replaces the box and keeps the class id.
    pub fn map_rect<S, F>(&self, f: F) -> Label<S>
    where
        S: Rect,
        F: FnOnce(&R) -> S,
    {
        Label {
            rect: f(&self.rect),
            class: self.class,
        }
    }
}

impl<R> Rect for Label<R>
where
    R: Rect,
{
    type Type = R::Type;
    type Unit = R::Unit;

    fn l(&self) -> Self::Type {
        self.rect.l()
    }

    fn t(&self) -> Self::Type {
        self.rect.t()
    }

    fn r(&self) -> Self::Type {
        self.rect.r()
    }

    fn b(&self) -> Self::Type {
        self.rect.b()
    }

    fn cx(&self) -> Self::Type {
        self.rect.cx()
    }

    fn cy(&self) -> Self::Type {
        self.rect.cy()
    }

    fn w(&self) -> Self::Type {
        self.rect.w()
    }

    fn h(&self) -> Self::Type {
        self.rect.h()
    }
}

impl<'a, T, U> Mul<&'a Label<XYXY<T, U>>> for &'a Transform<T>
where
    T: Copy + Num + PartialOrd,
    U: Unit,
{
    type Output = Label<XYXY<T, U>>;

    fn mul(self, rhs: &'a Label<XYXY<T, U>>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class,
        }
    }
}

impl<'a, T, U> Mul<&'a Label<CxCyWH<T, U>>> for &'a Transform<T>
where
    T: Copy + Num,
    U: Unit,
{
    type Output = Label<CxCyWH<T, U>>;

    fn mul(self, rhs: &'a Label<CxCyWH<T, U>>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::{prelude::*, PixelCxCyWH, PixelXYXY};

    #[test]
    fn transform_keeps_class() {
        let label = Label::new(7, PixelXYXY::from_xyxy([0.0, 0.0, 2.0, 2.0]));
        let moved = &Transform::translation(1.0, 1.0) * &label;
        assert_eq!(moved.class, 7);
        assert_eq!(moved.xyxy(), [1.0, 1.0, 3.0, 3.0]);
    }

    #[test]
    fn map_rect_converts_format() {
        let label = Label::new(3, PixelCxCyWH::from_cxcywh([5.0, 5.0, 4.0, 2.0]));
        let corner: Label<PixelXYXY<f64>> = label.map_rect(|rect| PixelXYXY::from(rect));
        assert_eq!(corner.class, 3);
        assert_eq!(corner.rect.xyxy(), [3.0, 4.0, 7.0, 6.0]);
    }
}
