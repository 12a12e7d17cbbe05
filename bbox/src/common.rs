pub use anyhow::{ensure, Result};
pub use num_traits::{Float, Num, NumCast, ToPrimitive, Zero};
pub use std::{
    fmt::Debug,
    hash::Hash,
    marker::PhantomData,
    ops::{Mul, Neg},
};
