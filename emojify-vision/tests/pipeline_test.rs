use anyhow::Result;
use emojify_vision::{
    Expression, FaceObservation, OverlayCatalog, Pipeline, Signal, Thresholds,
};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

fn background() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 100, Rgb([0, 0, 0])))
}

fn solid(color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        10,
        10,
        Rgba([color[0], color[1], color[2], 255]),
    ))
}

fn face(x: f32, smiling: f32, left: f32, right: f32) -> FaceObservation {
    FaceObservation {
        position: (x, 10.0),
        width: 60.0,
        height: 60.0,
        smiling,
        left_eye_open: left,
        right_eye_open: right,
    }
}

fn full_catalog() -> OverlayCatalog {
    Expression::CONCRETE
        .iter()
        .enumerate()
        .fold(OverlayCatalog::new(), |catalog, (i, e)| {
            catalog.with(*e, solid([(i as u8 + 1) * 30, 0, 0]))
        })
}

#[test]
fn test_no_faces_returns_background() {
    env_logger::try_init().ok();
    let pipeline = Pipeline::new(full_catalog());
    let bg = background();

    let outcome = pipeline.process(&bg, &[]);
    assert_eq!(outcome.signals, vec![Signal::NoFacesDetected]);
    assert!(outcome.faces.is_empty());
    assert_eq!(outcome.image.as_bytes(), bg.as_bytes());
}

#[test]
fn test_each_face_gets_its_overlay() {
    let catalog = OverlayCatalog::new()
        .with(Expression::Smiling, solid([255, 0, 0]))
        .with(Expression::ClosedEyeFrowning, solid([0, 0, 255]));
    let pipeline = Pipeline::new(catalog);

    let faces = [face(0.0, 0.9, 0.9, 0.9), face(120.0, 0.1, 0.1, 0.1)];
    let outcome = pipeline.process(&background(), &faces);

    assert!(outcome.signals.is_empty());
    assert_eq!(outcome.applied(), 2);
    assert_eq!(outcome.faces[0].expression, Expression::Smiling);
    assert_eq!(outcome.faces[1].expression, Expression::ClosedEyeFrowning);

    let out = outcome.image.to_rgb8();
    assert_eq!(out.get_pixel(30, 40), &Rgb([255, 0, 0]));
    assert_eq!(out.get_pixel(150, 40), &Rgb([0, 0, 255]));
    assert_eq!(out.get_pixel(100, 40), &Rgb([0, 0, 0]));
}

#[test]
fn test_unmapped_category_leaves_region_unchanged() {
    let catalog = OverlayCatalog::new().with(Expression::Smiling, solid([255, 0, 0]));
    let pipeline = Pipeline::new(catalog);

    let faces = [face(0.0, 0.9, 0.9, 0.9), face(120.0, 0.1, 0.9, 0.9)];
    let outcome = pipeline.process(&background(), &faces);

    assert_eq!(
        outcome.signals,
        vec![Signal::NoOverlayForCategory {
            face: 1,
            expression: Expression::Frowning
        }]
    );
    assert!(outcome.faces[0].applied);
    assert!(!outcome.faces[1].applied);

    let out = outcome.image.to_rgb8();
    assert_eq!(out.get_pixel(30, 40), &Rgb([255, 0, 0]));
    for x in 120..180 {
        assert_eq!(out.get_pixel(x, 40), &Rgb([0, 0, 0]));
    }
}

#[test]
fn test_undetermined_face_is_skipped() {
    let pipeline = Pipeline::new(full_catalog());
    let bg = background();
    let faces = [face(0.0, f32::NAN, 0.9, 0.9)];

    let outcome = pipeline.process(&bg, &faces);
    assert_eq!(
        outcome.signals,
        vec![Signal::NoOverlayForCategory {
            face: 0,
            expression: Expression::Undetermined
        }]
    );
    assert_eq!(outcome.image.as_bytes(), bg.as_bytes());
}

#[test]
fn test_degenerate_overlay_does_not_stop_other_faces() {
    let catalog = OverlayCatalog::new()
        .with(Expression::Smiling, DynamicImage::new_rgba8(0, 0))
        .with(Expression::Frowning, solid([0, 255, 0]));
    let pipeline = Pipeline::new(catalog);

    let faces = [face(0.0, 0.9, 0.9, 0.9), face(120.0, 0.1, 0.9, 0.9)];
    let outcome = pipeline.process(&background(), &faces);

    assert_eq!(outcome.signals.len(), 1);
    assert!(matches!(
        outcome.signals[0],
        Signal::CompositeFailed { face: 0, .. }
    ));
    assert_eq!(outcome.applied(), 1);

    let out = outcome.image.to_rgb8();
    assert_eq!(out.get_pixel(30, 40), &Rgb([0, 0, 0]));
    assert_eq!(out.get_pixel(150, 40), &Rgb([0, 255, 0]));
}

#[test]
fn test_later_faces_draw_on_top() {
    let catalog = OverlayCatalog::new()
        .with(Expression::Smiling, solid([255, 0, 0]))
        .with(Expression::Frowning, solid([0, 255, 0]));
    let pipeline = Pipeline::new(catalog);

    let faces = [face(50.0, 0.9, 0.9, 0.9), face(50.0, 0.1, 0.9, 0.9)];
    let outcome = pipeline.process(&background(), &faces);
    assert_eq!(outcome.image.to_rgb8().get_pixel(80, 40), &Rgb([0, 255, 0]));

    let reversed = [faces[1], faces[0]];
    let outcome = pipeline.process(&background(), &reversed);
    assert_eq!(outcome.image.to_rgb8().get_pixel(80, 40), &Rgb([255, 0, 0]));
}

#[test]
fn test_background_is_not_mutated() {
    let pipeline = Pipeline::new(full_catalog());
    let bg = background();
    let snapshot = bg.as_bytes().to_vec();

    let outcome = pipeline.process(&bg, &[face(10.0, 0.9, 0.1, 0.9)]);
    assert_eq!(outcome.image.dimensions(), bg.dimensions());
    assert_ne!(outcome.image.as_bytes(), &snapshot[..]);
    assert_eq!(bg.as_bytes(), &snapshot[..]);
}

#[test]
fn test_custom_thresholds_and_scale() {
    let catalog = OverlayCatalog::new()
        .with(Expression::Smiling, solid([255, 0, 0]))
        .with(Expression::Frowning, solid([0, 255, 0]));
    let pipeline = Pipeline::new(catalog)
        .with_thresholds(Thresholds {
            smiling: 0.95,
            ..Thresholds::default()
        })
        .with_scale_factor(0.5);

    let outcome = pipeline.process(&background(), &[face(0.0, 0.9, 0.9, 0.9)]);
    assert_eq!(outcome.faces[0].expression, Expression::Frowning);

    // 30 wide overlay centered on the 60 wide face
    let out = outcome.image.to_rgb8();
    assert_eq!(out.get_pixel(15, 40), &Rgb([0, 255, 0]));
    assert_eq!(out.get_pixel(14, 40), &Rgb([0, 0, 0]));
    assert_eq!(out.get_pixel(45, 40), &Rgb([0, 0, 0]));
}

#[test]
fn test_detect_and_process_uses_detector() -> Result<()> {
    let pipeline = Pipeline::new(full_catalog());
    let mut detector = vec![face(0.0, 0.9, 0.9, 0.9)];

    let outcome = pipeline.detect_and_process(&mut detector, &background())?;
    assert_eq!(outcome.faces.len(), 1);
    assert_eq!(outcome.applied(), 1);
    Ok(())
}

#[test]
fn test_oversized_face_does_not_stop_later_faces() {
    let catalog = OverlayCatalog::new()
        .with(Expression::Smiling, solid([255, 0, 0]))
        .with(Expression::Frowning, solid([0, 255, 0]));
    let pipeline = Pipeline::new(catalog);

    let huge = FaceObservation {
        width: 1.0e10,
        ..face(0.0, 0.9, 0.9, 0.9)
    };
    let faces = [huge, face(120.0, 0.1, 0.9, 0.9)];
    let outcome = pipeline.process(&background(), &faces);

    assert_eq!(outcome.faces.len(), 2);
    assert!(outcome.faces[1].applied);
    assert_eq!(outcome.image.dimensions(), (200, 100));
    assert_eq!(outcome.image.to_rgb8().get_pixel(150, 40), &Rgb([0, 255, 0]));
}
