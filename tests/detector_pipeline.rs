//! End-to-end detection properties on synthetic frames.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spritescan::{detect, rank, select_closest, ImageView, RankConfig, Template};

fn textured(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push((((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8);
        }
    }
    data
}

fn extract_patch(
    image: &[u8],
    img_width: usize,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            out.push(image[(y0 + y) * img_width + x0 + x]);
        }
    }
    out
}

#[test]
fn exact_patch_matches_with_full_confidence() {
    let img_width = 96;
    let img_height = 72;
    let frame = textured(img_width, img_height);
    let (x0, y0) = (37, 22);
    let patch = extract_patch(&frame, img_width, x0, y0, 12, 10);
    let template = Template::from_gray("slime", patch, 12, 10).unwrap();

    let frame_view = ImageView::from_slice(&frame, img_width, img_height).unwrap();
    let detections = detect(frame_view, &[template], 0.999);

    let hit = detections
        .iter()
        .find(|det| det.x == x0 && det.y == y0)
        .expect("exact placement must be reported");
    assert!(hit.confidence > 0.9999);
    assert!(hit.confidence <= 1.0);
    assert_eq!((hit.width, hit.height), (12, 10));
    for det in &detections {
        assert!(det.confidence >= 0.999);
    }
}

#[test]
fn unrelated_noise_yields_no_detections() {
    let mut rng = StdRng::seed_from_u64(7);
    let img_width = 160;
    let img_height = 120;
    let frame: Vec<u8> = (0..img_width * img_height)
        .map(|_| rng.random_range(0..=255u32) as u8)
        .collect();
    let tpl: Vec<u8> = (0..16 * 16).map(|_| rng.random_range(0..=255u32) as u8).collect();
    let template = Template::from_gray("ghost", tpl, 16, 16).unwrap();

    let frame_view = ImageView::from_slice(&frame, img_width, img_height).unwrap();
    let detections = detect(frame_view, &[template], 0.9);
    assert!(detections.is_empty(), "got {} detections", detections.len());
}

#[test]
fn oversized_template_is_skipped_not_fatal() {
    let img_width = 48;
    let img_height = 40;
    let frame = textured(img_width, img_height);
    let (x0, y0) = (11, 9);
    let patch = extract_patch(&frame, img_width, x0, y0, 8, 8);

    let too_big = Template::from_gray("boss", textured(64, 64), 64, 64).unwrap();
    let fits = Template::from_gray("slime", patch, 8, 8).unwrap();

    let frame_view = ImageView::from_slice(&frame, img_width, img_height).unwrap();
    let detections = detect(frame_view, &[too_big, fits], 0.999);

    assert!(!detections.is_empty());
    assert!(detections.iter().all(|det| det.name == "slime"));
}

#[test]
fn detect_is_idempotent_across_calls() {
    let img_width = 80;
    let img_height = 60;
    let frame = textured(img_width, img_height);
    let patch = extract_patch(&frame, img_width, 20, 15, 10, 10);
    let template = Template::from_gray("slime", patch, 10, 10).unwrap();
    let templates = [template];

    let frame_view = ImageView::from_slice(&frame, img_width, img_height).unwrap();
    let first = detect(frame_view, &templates, 0.8);
    let second = detect(frame_view, &templates, 0.8);
    assert_eq!(first, second);
}

#[test]
fn full_pipeline_selects_sprite_closest_to_center() {
    let img_width = 100;
    let img_height = 100;
    let mut frame = vec![0u8; img_width * img_height];
    let sprite = textured(9, 9);

    // Same sprite twice: near the center and in a corner.
    for &(x0, y0) in &[(44usize, 47usize), (4usize, 6usize)] {
        for y in 0..9 {
            for x in 0..9 {
                frame[(y0 + y) * img_width + (x0 + x)] = sprite[y * 9 + x];
            }
        }
    }
    let template = Template::from_gray("slime", sprite, 9, 9).unwrap();

    let frame_view = ImageView::from_slice(&frame, img_width, img_height).unwrap();
    let raw = detect(frame_view, &[template], 0.99);
    let ranked = rank(&raw, &RankConfig::default());
    assert_eq!(ranked.len(), 2);

    let target = select_closest(&ranked, (50.0, 50.0)).unwrap();
    assert_eq!((target.x, target.y), (44, 47));
}
