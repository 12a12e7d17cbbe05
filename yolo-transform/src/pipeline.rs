//! Sequential composition of sample transforms.

use crate::{
    common::*,
    labels::AbsoluteLabels,
    sample::Sample,
    tensor::{Normalize, ToTensor},
};

/// A stage mapping a sample to a new sample.
pub trait Transform: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn forward(&self, sample: Sample) -> Result<Sample>;
}

/// An immutable, ordered list of transforms applied once per sample.
#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Transform>>) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Feeds the sample through every stage in order and stops at the first failure.
    pub fn forward(&self, sample: Sample) -> Result<Sample> {
        self.stages
            .iter()
            .enumerate()
            .try_fold(sample, |sample, (index, stage)| {
                trace!(
                    "stage {} ({}): image {:?}, {} boxes",
                    index,
                    stage.name(),
                    sample.image.shape(),
                    sample.targets.len()
                );
                stage
                    .forward(sample)
                    .with_context(|| format!("stage {} ({}) failed", index, stage.name()))
            })
    }
}

impl Default for Pipeline {
    /// `[AbsoluteLabels, ToTensor, Normalize]`
    fn default() -> Self {
        Self::new(vec![
            Box::new(AbsoluteLabels),
            Box::new(ToTensor),
            Box::new(Normalize::default()),
        ])
    }
}
