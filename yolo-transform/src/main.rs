use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use ndarray::Array2;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use structopt::StructOpt;
use yolo_transform::{
    io::load_sample, BoxFormat, BoxScale, ImageLayout, PipelineConfig, Sample, Targets,
};

#[derive(Debug, Clone, StructOpt)]
/// Run a transform pipeline on a labeled image and print a summary of the output.
struct Args {
    /// pipeline configuration file, the default pipeline if absent
    #[structopt(long)]
    config: Option<PathBuf>,
    /// image file
    image: PathBuf,
    /// YOLO label file
    labels: PathBuf,
    /// output JSON file, stdout if absent
    #[structopt(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Summary {
    image_layout: ImageLayout,
    image_shape: [usize; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    box_format: Option<BoxFormat>,
    box_scale: BoxScale,
    targets: Vec<Vec<f64>>,
    /// `[x1, y1, x2, y2]` of each packed target
    #[serde(skip_serializing_if = "Vec::is_empty")]
    corners: Vec<Vec<f64>>,
}

impl Summary {
    fn new(sample: &Sample) -> Self {
        let to_rows = |array: &Array2<f32>| -> Vec<Vec<f64>> {
            array
                .outer_iter()
                .map(|row| row.iter().map(|&val| val as f64).collect())
                .collect()
        };

        let (box_format, targets, corners) = match &sample.targets {
            Targets::Boxes(boxes) => {
                let rows = boxes
                    .rows()
                    .into_iter()
                    .map(|(class, coords)| {
                        std::iter::once(class as f64).chain(coords).collect()
                    })
                    .collect();
                (Some(boxes.format()), rows, vec![])
            }
            Targets::Packed(packed) => (
                None,
                to_rows(&packed.tensor),
                to_rows(&packed.corners()),
            ),
        };

        Self {
            image_layout: sample.image.layout(),
            image_shape: sample.image.shape(),
            box_format,
            box_scale: sample.targets.scale(),
            targets,
            corners,
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args {
        config,
        image,
        labels,
        output,
    } = Args::from_args();

    let config = match config {
        Some(path) => PipelineConfig::open(path)?,
        None => PipelineConfig::default(),
    };
    let pipeline = config.build()?;
    info!("pipeline: [{}]", pipeline.stage_names().join(", "));

    let sample = load_sample(&image, &labels)?;
    let sample = pipeline
        .forward(sample)
        .with_context(|| format!("failed to transform {}", image.display()))?;
    let summary = Summary::new(&sample);

    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(writer, &summary)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &summary)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
