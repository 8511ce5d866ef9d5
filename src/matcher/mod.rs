//! Normalized cross-correlation of one template against one frame.
//!
//! ZNCC is used instead of raw correlation because it is invariant to
//! uniform brightness and contrast shifts between the template capture
//! and the live frame; sprite rendering varies slightly with lighting
//! and alpha blending.

use crate::template::TemplatePlan;
use crate::util::{SpriteScanError, SpriteScanResult};
use crate::ImageView;

/// Windows with less intensity variance than this score 0.0 rather than
/// dividing by a vanishing denominator.
const MIN_VAR_I: f32 = 1e-6;

/// Dense grid of per-placement correlation coefficients.
///
/// Cell `(x, y)` holds the ZNCC score for the template anchored with its
/// top-left corner at frame pixel `(x, y)`. Scores lie in `[-1, 1]`.
pub struct ScoreSurface {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl ScoreSurface {
    /// Returns the surface width, `frame_width - template_width + 1`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the surface height, `frame_height - template_height + 1`.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the score at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns the scores in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Correlates a template plan against every valid placement in the frame.
///
/// Fails with `TemplateTooLarge` when no placement exists. Both inputs
/// are read-only; the scan has no side effects.
pub fn match_template(
    frame: ImageView<'_, u8>,
    tpl: &TemplatePlan,
) -> SpriteScanResult<ScoreSurface> {
    let img_width = frame.width();
    let img_height = frame.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(SpriteScanError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }

    let out_width = img_width - tpl_width + 1;
    let out_height = img_height - tpl_height + 1;
    let var_t = tpl.var_t();
    let t_prime = tpl.t_prime();
    let n = (tpl_width * tpl_height) as f32;

    let mut data = Vec::with_capacity(out_width * out_height);
    for y in 0..out_height {
        for x in 0..out_width {
            let mut dot = 0.0f32;
            let mut sum_i = 0.0f32;
            let mut sum_i2 = 0.0f32;

            for ty in 0..tpl_height {
                let img_row = frame.row(y + ty).expect("row within bounds for scan");
                let base = ty * tpl_width;
                for tx in 0..tpl_width {
                    let value = img_row[x + tx] as f32;
                    dot += t_prime[base + tx] * value;
                    sum_i += value;
                    sum_i2 += value * value;
                }
            }

            let var_i = sum_i2 - (sum_i * sum_i) / n;
            if var_i <= MIN_VAR_I {
                data.push(0.0);
                continue;
            }

            let score = dot / (var_t * var_i).sqrt();
            if score.is_finite() {
                data.push(score.clamp(-1.0, 1.0));
            } else {
                data.push(0.0);
            }
        }
    }

    Ok(ScoreSurface {
        data,
        width: out_width,
        height: out_height,
    })
}
