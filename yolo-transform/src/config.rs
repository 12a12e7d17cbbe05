//! Pipeline configuration format.

use crate::{
    augment::{
        AddToBrightness, AddToHue, AffineInit, Augmenter, Fliplr, ImgAug, PadToAspectRatio,
        Sequential, SharpenInit,
    },
    common::*,
    labels::{AbsoluteLabels, RelativeLabels},
    pipeline::{Pipeline, Transform},
    tensor::{Normalize, Resize, ToTensor, IMAGENET_MEAN, IMAGENET_STD},
};

/// The pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed of the augmentation stages. The stage at index `i` is seeded with `seed + i`.
    #[serde(default)]
    pub seed: Option<u64>,
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = json5::from_str(&text)
            .with_context(|| format!("unable to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn build(&self) -> Result<Pipeline> {
        let stages = self
            .stages
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                let seed = self.seed.map(|seed| seed.wrapping_add(index as u64));
                stage
                    .build(seed)
                    .with_context(|| format!("invalid config of stage {}", index))
            })
            .collect::<Result<Vec<_>>>()?;
        let pipeline = Pipeline::new(stages);
        debug!(
            "built pipeline with stages [{}]",
            pipeline.stage_names().join(", ")
        );
        Ok(pipeline)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            stages: vec![
                StageConfig::AbsoluteLabels,
                StageConfig::ToTensor,
                StageConfig::Normalize {
                    mean: None,
                    std: None,
                },
            ],
        }
    }
}

/// A pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StageConfig {
    AbsoluteLabels,
    RelativeLabels,
    /// The default training augmentation recipe.
    DefaultAug,
    /// Zero pads to a square image.
    PadSquare,
    /// A custom augmentation sequence.
    Augment {
        #[serde(default)]
        name: Option<String>,
        augmenters: Vec<AugmenterConfig>,
    },
    ToTensor,
    /// Channel normalization. Missing statistics default to ImageNet ones.
    Normalize {
        #[serde(default)]
        mean: Option<Vec<R64>>,
        #[serde(default)]
        std: Option<Vec<R64>>,
    },
    Resize {
        height: usize,
        width: usize,
    },
}

impl StageConfig {
    pub fn build(&self, seed: Option<u64>) -> Result<Box<dyn Transform>> {
        let stage: Box<dyn Transform> = match self {
            Self::AbsoluteLabels => Box::new(AbsoluteLabels),
            Self::RelativeLabels => Box::new(RelativeLabels),
            Self::DefaultAug => Box::new(ImgAug::default_aug(seed)?),
            Self::PadSquare => Box::new(ImgAug::pad_square(seed)?),
            Self::Augment { name, augmenters } => {
                let children: Vec<_> = augmenters
                    .iter()
                    .map(|config| config.build())
                    .collect::<Result<_>>()?;
                let name = name.as_deref().unwrap_or("Augment");
                Box::new(ImgAug::new(name, Sequential::new(children), seed))
            }
            Self::ToTensor => Box::new(ToTensor),
            Self::Normalize { mean, std } => {
                let to_f32 = |values: &Option<Vec<R64>>, default: &[f32]| -> Vec<f32> {
                    match values {
                        Some(values) => values.iter().map(|val| val.raw() as f32).collect(),
                        None => default.to_vec(),
                    }
                };
                Box::new(Normalize::new(
                    to_f32(mean, &IMAGENET_MEAN),
                    to_f32(std, &IMAGENET_STD),
                )?)
            }
            Self::Resize { height, width } => Box::new(Resize::new(*height, *width)?),
        };
        Ok(stage)
    }
}

/// An augmenter and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AugmenterConfig {
    Sharpen {
        alpha: (R64, R64),
        #[serde(default)]
        lightness: Option<(R64, R64)>,
    },
    Affine {
        #[serde(default)]
        translate_percent: Option<(R64, R64)>,
        #[serde(default)]
        scale: Option<(R64, R64)>,
        #[serde(default)]
        rotate: Option<(R64, R64)>,
    },
    AddToBrightness {
        range: (i32, i32),
    },
    AddToHue {
        range: (i32, i32),
    },
    Fliplr {
        p: R64,
    },
    PadToAspectRatio {
        ratio: R64,
    },
    Sequential {
        children: Vec<AugmenterConfig>,
    },
}

impl AugmenterConfig {
    pub fn build(&self) -> Result<Box<dyn Augmenter>> {
        let augmenter: Box<dyn Augmenter> = match *self {
            Self::Sharpen { alpha, lightness } => {
                let mut init = SharpenInit {
                    alpha,
                    ..Default::default()
                };
                if let Some(lightness) = lightness {
                    init.lightness = lightness;
                }
                Box::new(init.build()?)
            }
            Self::Affine {
                translate_percent,
                scale,
                rotate,
            } => Box::new(
                AffineInit {
                    translate_percent,
                    scale,
                    rotate,
                }
                .build()?,
            ),
            Self::AddToBrightness { range: (lo, up) } => Box::new(AddToBrightness::new(lo, up)?),
            Self::AddToHue { range: (lo, up) } => Box::new(AddToHue::new(lo, up)?),
            Self::Fliplr { p } => Box::new(Fliplr::new(p.raw())?),
            Self::PadToAspectRatio { ratio } => Box::new(PadToAspectRatio::new(ratio.raw())?),
            Self::Sequential { ref children } => {
                let children = children
                    .iter()
                    .map(|child| child.build())
                    .collect::<Result<_>>()?;
                Box::new(Sequential::new(children))
            }
        };
        Ok(augmenter)
    }
}
