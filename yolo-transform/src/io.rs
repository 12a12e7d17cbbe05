//! Loading images and YOLO label files.

use crate::{
    common::*,
    sample::{BoxFormat, BoxList, Image, Sample},
};
use image::FlatSamples;

/// Decodes an image file into an RGB HWC array.
pub fn load_image<P>(path: P) -> Result<Array3<u8>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let rgb = image::io::Reader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| {
            format!(
                "failed to determine the image file format: {}",
                path.display()
            )
        })?
        .decode()
        .with_context(|| format!("failed to decode image file: {}", path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    let FlatSamples { samples, .. } = rgb.into_flat_samples();
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), samples)?;
    Ok(array)
}

/// Parses `class cx cy w h` lines in image ratio units. Blank lines are skipped.
pub fn parse_yolo_labels(text: &str) -> Result<BoxList> {
    let rows: Vec<_> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).with_context(|| format!("invalid label at line {}", index + 1))
        })
        .collect::<Result<_>>()?;
    Ok(BoxList::from_rows(BoxFormat::RATIO_CENTER, rows))
}

fn parse_line(line: &str) -> Result<(usize, [f64; 4])> {
    let tokens: Vec<_> = line.split_whitespace().collect();
    ensure!(
        tokens.len() == 5,
        "expect 5 fields, but get {}",
        tokens.len()
    );

    let class: usize = tokens[0].parse()?;
    let mut cxcywh = [0.0; 4];
    for (dst, token) in cxcywh.iter_mut().zip(&tokens[1..]) {
        *dst = token.parse()?;
    }
    // validate the size
    let rect = RatioCxCyWH::try_from_cxcywh(cxcywh)?;
    Ok((class, rect.cxcywh()))
}

pub fn load_yolo_labels<P>(path: P) -> Result<BoxList>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read label file {}", path.display()))?;
    parse_yolo_labels(&text)
}

/// Loads an image and its label file into a sample with ratio center boxes.
pub fn load_sample<P, Q>(image_path: P, label_path: Q) -> Result<Sample>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let image = load_image(image_path)?;
    let boxes = load_yolo_labels(label_path)?;
    debug!("loaded image {:?} with {} boxes", image.dim(), boxes.len());
    Ok(Sample::new(Image::Hwc(image), boxes))
}
