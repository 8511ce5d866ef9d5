//! Diagnostic overlay: bounding boxes and labels for detections.
//!
//! Available when the `image-io` feature is enabled. Purely a usability
//! aid; nothing in the detection path depends on it.

use crate::detect::Detection;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

mod font;

/// Fixed palette indexed by template-name hash. Colors are stable within
/// a run (and across runs of this implementation), chosen for contrast
/// against typical game backdrops.
const PALETTE: [Rgb<u8>; 12] = [
    Rgb([230, 25, 75]),
    Rgb([60, 180, 75]),
    Rgb([255, 225, 25]),
    Rgb([0, 130, 200]),
    Rgb([245, 130, 48]),
    Rgb([145, 30, 180]),
    Rgb([70, 240, 240]),
    Rgb([240, 50, 230]),
    Rgb([210, 245, 60]),
    Rgb([250, 190, 190]),
    Rgb([0, 128, 128]),
    Rgb([255, 215, 180]),
];

/// Returns the deterministic overlay color for a template name.
///
/// Pure function of the name: an FNV-1a hash indexes the fixed palette,
/// so the same template always renders the same color.
pub fn color_for(name: &str) -> Rgb<u8> {
    PALETTE[(fnv1a(name) % PALETTE.len() as u64) as usize]
}

fn fnv1a(s: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Draws a bounding box and a `name (confidence)` label per detection
/// onto a copy of the frame.
///
/// Never fails: an empty detection list returns an unmarked copy, and
/// boxes or labels that spill past the frame edge are clipped.
pub fn annotate(frame: &RgbImage, detections: &[Detection]) -> RgbImage {
    let mut out = frame.clone();
    for det in detections {
        let color = color_for(&det.name);
        let rect =
            Rect::at(det.x as i32, det.y as i32).of_size(det.width as u32, det.height as u32);
        draw_hollow_rect_mut(&mut out, rect, color);

        let label = format!("{} ({:.2})", det.name, det.confidence);
        let label_y = det.y as i32 - font::GLYPH_HEIGHT as i32 - 2;
        draw_text(&mut out, det.x as i32, label_y, &label, color);
    }
    out
}

/// Stamps a legend line (e.g. the active threshold) in the top-left
/// corner of an annotated image.
pub fn banner(img: &mut RgbImage, text: &str) {
    draw_text(img, 10, 10, text, Rgb([255, 0, 0]));
}

// Labels use a built-in 5x7 face so the crate does not bundle a font
// asset; imageproc's text drawing would require one.
fn draw_text(img: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
    let mut pen_x = x;
    for ch in text.chars() {
        let Some(glyph) = font::glyph(ch).or_else(|| font::glyph('?')) else {
            continue;
        };
        for (col, bits) in glyph.iter().enumerate() {
            for row in 0..font::GLYPH_HEIGHT {
                if bits >> row & 1 == 1 {
                    put_pixel_clipped(img, pen_x + col as i32, y + row as i32, color);
                }
            }
        }
        pen_x += font::GLYPH_WIDTH as i32 + 1;
    }
}

fn put_pixel_clipped(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, color);
    }
}
