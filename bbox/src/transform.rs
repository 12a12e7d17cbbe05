use super::{CxCyWH, Unit, XYXY};
use crate::common::*;

/// Per-axis scaling followed by translation, `x' = x * sx + tx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sx: T,
    pub sy: T,
    pub tx: T,
    pub ty: T,
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    pub fn identity() -> Self {
        Self {
            sx: T::one(),
            sy: T::one(),
            tx: T::zero(),
            ty: T::zero(),
        }
    }

    pub fn translation(tx: T, ty: T) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    /// Mirrors the x-axis of an image of the given width.
    pub fn horizontal_flip(width: T) -> Self
    where
        T: Neg<Output = T>,
    {
        Self {
            sx: -T::one(),
            tx: width,
            ..Self::identity()
        }
    }
}

impl<T, U> Mul<&XYXY<T, U>> for &Transform<T>
where
    T: Copy + Num + PartialOrd,
    U: Unit,
{
    type Output = XYXY<T, U>;

    fn mul(self, rhs: &XYXY<T, U>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T, U> Mul<&CxCyWH<T, U>> for &Transform<T>
where
    T: Copy + Num,
    U: Unit,
{
    type Output = CxCyWH<T, U>;

    fn mul(self, rhs: &CxCyWH<T, U>) -> Self::Output {
        rhs.transform(self)
    }
}
