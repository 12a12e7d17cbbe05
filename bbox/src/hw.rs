use crate::common::*;

/// Image size in height-width order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HW<T> {
    h: T,
    w: T,
}

impl<T> HW<T> {
    pub fn try_cast<U>(self) -> Option<HW<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(HW {
            h: U::from(self.h)?,
            w: U::from(self.w)?,
        })
    }

    pub fn cast<U>(self) -> HW<U>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> HW<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_hw(hw: [T; 2]) -> Result<Self> {
        let [h, w] = hw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "height and width parameters must be non-negative"
        );
        Ok(Self { h, w })
    }
}

impl<T> HW<T>
where
    T: Num + Copy,
{
    pub fn hw(&self) -> [T; 2] {
        [self.h, self.w]
    }

    pub fn h(&self) -> T {
        self.h
    }

    pub fn w(&self) -> T {
        self.w
    }
}

impl From<(usize, usize)> for HW<usize> {
    fn from((h, w): (usize, usize)) -> Self {
        Self { h, w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn size_accessors_without_ordering() {
        fn width_of<T: Num + Copy>(size: &HW<T>) -> T {
            size.w()
        }

        let size = HW::try_from_hw([3.0, 2.0]).unwrap();
        assert_abs_diff_eq!(width_of(&size), 2.0);
        assert_abs_diff_eq!(size.h(), 3.0);
    }

    #[test]
    fn negative_size_is_rejected() {
        assert!(HW::try_from_hw([-1.0, 2.0]).is_err());
    }

    #[test]
    fn size_cast() {
        let size = HW::try_from_hw([480usize, 640]).unwrap();
        let size: HW<f64> = size.try_cast().unwrap();
        assert_eq!(size.hw(), [480.0, 640.0]);
    }
}
