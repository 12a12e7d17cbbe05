use approx::assert_abs_diff_eq;
use ndarray::Array3;
use yolo_transform::{
    labels::{AbsoluteLabels, RelativeLabels},
    tensor::ToTensor,
    BoxFormat, BoxList, BoxScale, Image, Pipeline, PipelineConfig, Sample, Targets,
};

const TRAINING_CONFIG: &str = r#"
{
    seed: 17,
    stages: [
        { kind: "AbsoluteLabels" },
        { kind: "DefaultAug" },
        { kind: "PadSquare" },
        { kind: "RelativeLabels" },
        { kind: "ToTensor" },
        { kind: "Resize", height: 64, width: 64 },
        { kind: "Normalize" },
    ],
}
"#;

fn gradient_sample(height: usize, width: usize) -> Sample {
    let image = Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
        ((y * 3 + x * 5 + c * 40) % 256) as u8
    });
    let boxes = BoxList::from_rows(
        BoxFormat::RATIO_CENTER,
        vec![
            (0, [0.5, 0.5, 0.2, 0.1]),
            (4, [0.1, 0.2, 0.1, 0.2]),
            (9, [0.9, 0.8, 0.15, 0.3]),
        ],
    );
    Sample::new(Image::Hwc(image), boxes)
}

#[test]
fn default_pipeline_packs_pixel_boxes() {
    let image = Image::Hwc(Array3::zeros((100, 200, 3)));
    let boxes = BoxList::from_rows(BoxFormat::RATIO_CENTER, vec![(1, [0.5, 0.5, 0.2, 0.1])]);

    let output = Pipeline::default()
        .forward(Sample::new(image, boxes))
        .unwrap();
    assert_eq!(output.image.shape(), [3, 100, 200]);

    let packed = match output.targets {
        Targets::Packed(packed) => packed,
        Targets::Boxes(_) => panic!("boxes are not packed"),
    };
    assert_eq!(packed.scale, BoxScale::Pixel);
    let row = packed.tensor.row(0).to_vec();
    assert_eq!(row, vec![0.0, 1.0, 100.0, 50.0, 40.0, 10.0]);

    let chw = output.image.into_chw().unwrap();
    assert_abs_diff_eq!(chw[[0, 0, 0]], -0.485 / 0.229, epsilon = 1e-5);
    assert_abs_diff_eq!(chw[[0, 0, 0]], -2.1179, epsilon = 1e-4);
    assert_abs_diff_eq!(chw[[2, 99, 199]], -0.406 / 0.225, epsilon = 1e-5);
}

#[test]
fn training_pipeline_from_config() {
    let config: PipelineConfig = json5::from_str(TRAINING_CONFIG).unwrap();
    let pipeline = config.build().unwrap();

    for _ in 0..5 {
        let output = pipeline.forward(gradient_sample(60, 90)).unwrap();
        assert_eq!(output.image.shape(), [3, 64, 64]);

        let packed = match output.targets {
            Targets::Packed(packed) => packed,
            Targets::Boxes(_) => panic!("boxes are not packed"),
        };
        assert_eq!(packed.scale, BoxScale::Ratio);
        assert!(packed.len() <= 3);
        packed.tensor.outer_iter().for_each(|row| {
            assert_eq!(row[0], 0.0);
            assert!([0.0, 4.0, 9.0].contains(&row[1]));
            row.iter().skip(2).for_each(|&val| {
                assert!((-1e-5..=1.0 + 1e-5).contains(&val), "{} out of range", val)
            });
        });
    }
}

#[test]
fn seeded_pipelines_are_reproducible() {
    let config: PipelineConfig = json5::from_str(TRAINING_CONFIG).unwrap();
    let lhs = config.build().unwrap().forward(gradient_sample(40, 30)).unwrap();
    let rhs = config.build().unwrap().forward(gradient_sample(40, 30)).unwrap();
    assert_eq!(lhs, rhs);
}

#[test]
fn absolute_then_relative_is_identity() {
    let pipeline = Pipeline::new(vec![Box::new(AbsoluteLabels), Box::new(RelativeLabels)]);
    let input = gradient_sample(37, 53);
    let expect = input.targets.clone().into_boxes().unwrap().rows();

    let output = pipeline.forward(input).unwrap();
    let boxes = output.targets.into_boxes().unwrap();
    assert_eq!(boxes.format(), BoxFormat::RATIO_CENTER);
    boxes
        .rows()
        .iter()
        .zip(&expect)
        .for_each(|((lclass, lhs), (rclass, rhs))| {
            assert_eq!(lclass, rclass);
            lhs.iter()
                .zip(rhs)
                .for_each(|(l, r)| assert_abs_diff_eq!(l, r, epsilon = 1e-12));
        });
}

#[test]
fn misordered_stages_fail_with_stage_context() {
    let pipeline = Pipeline::new(vec![Box::new(ToTensor), Box::new(AbsoluteLabels)]);
    let err = pipeline.forward(gradient_sample(8, 8)).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("stage 1 (AbsoluteLabels)"), "{}", message);
}

#[test]
fn augmentation_requires_pixel_boxes() {
    let config: PipelineConfig =
        json5::from_str(r#"{ stages: [{ kind: "DefaultAug" }] }"#).unwrap();
    let result = config.build().unwrap().forward(gradient_sample(8, 8));
    assert!(result.is_err());
}

#[test]
fn empty_sample_goes_through() {
    let config: PipelineConfig = json5::from_str(TRAINING_CONFIG).unwrap();
    let sample = Sample::new(
        Image::Hwc(Array3::zeros((10, 20, 3))),
        BoxList::from_rows(BoxFormat::RATIO_CENTER, vec![]),
    );
    let output = config.build().unwrap().forward(sample).unwrap();
    match output.targets {
        Targets::Packed(packed) => assert_eq!(packed.tensor.dim(), (0, 6)),
        Targets::Boxes(_) => panic!("boxes are not packed"),
    }
}
