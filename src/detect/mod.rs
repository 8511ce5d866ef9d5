//! Frame detection: every template against one captured frame.

use crate::matcher::match_template;
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::ImageView;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub mod nms;

/// One instance of a template believed to be present in a frame.
///
/// Width and height always equal the source template's dimensions.
/// Detections are never mutated after creation and live for one
/// detection cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Name of the matched template.
    pub name: String,
    /// X coordinate (column) of the top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the top-left corner.
    pub y: usize,
    /// Template width in pixels.
    pub width: usize,
    /// Template height in pixels.
    pub height: usize,
    /// ZNCC score in `[-1, 1]`.
    pub confidence: f32,
}

impl Detection {
    /// Returns the geometric center of the bounding box in frame space.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Scans all templates against one frame and emits every placement whose
/// confidence reaches `threshold`.
///
/// A real hit typically produces a cluster of detections one pixel apart,
/// because the correlation surface is smooth near a true match; collapsing
/// those is [`nms::rank`]'s job, not the detector's. Templates larger than
/// the frame are skipped, not fatal. With the `rayon` feature the
/// per-template loop runs in parallel; results are reassembled in template
/// order, so output order matches the serial path.
pub fn detect(frame: ImageView<'_, u8>, templates: &[Template], threshold: f32) -> Vec<Detection> {
    let _span = trace_span!(
        "detect",
        templates = templates.len(),
        frame_width = frame.width(),
        frame_height = frame.height()
    )
    .entered();

    #[cfg(feature = "rayon")]
    let per_template: Vec<Vec<Detection>> = templates
        .par_iter()
        .map(|tpl| scan_one(frame, tpl, threshold))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let per_template: Vec<Vec<Detection>> = templates
        .iter()
        .map(|tpl| scan_one(frame, tpl, threshold))
        .collect();

    let detections: Vec<Detection> = per_template.into_iter().flatten().collect();
    trace_event!("raw_detections", count = detections.len());
    detections
}

fn scan_one(frame: ImageView<'_, u8>, tpl: &Template, threshold: f32) -> Vec<Detection> {
    let surface = match match_template(frame, tpl.plan()) {
        Ok(surface) => surface,
        Err(_) => {
            // Template larger than the frame: no placement exists.
            trace_warn!(
                "template_skipped",
                template = tpl.name(),
                tpl_width = tpl.width(),
                tpl_height = tpl.height()
            );
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    let surface_width = surface.width();
    for (idx, &confidence) in surface.data().iter().enumerate() {
        if confidence >= threshold {
            out.push(Detection {
                name: tpl.name().to_string(),
                x: idx % surface_width,
                y: idx / surface_width,
                width: tpl.width(),
                height: tpl.height(),
                confidence,
            });
        }
    }
    out
}
