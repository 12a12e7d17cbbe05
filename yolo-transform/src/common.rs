//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Result};
pub use bbox::{
    prelude::*, PixelCxCyWH, PixelUnit, PixelXYXY, RatioCxCyWH, RatioUnit, RatioXYXY, Unit, HW,
};
pub use itertools::Itertools as _;
pub use label::Label;
pub use log::{debug, trace};
pub use ndarray::{s, Array2, Array3, ArrayView2, Axis};
pub use noisy_float::prelude::*;
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::{self, Debug, Display},
    fs,
    path::Path,
    sync::Mutex,
};
