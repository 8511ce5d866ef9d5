//! Template plan precomputation for ZNCC matching.

use crate::image::ImageView;
use crate::util::{SpriteScanError, SpriteScanResult};

/// Precomputed statistics and zero-mean buffer for template matching.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f32,
    var_t: f32,
    t_prime: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> SpriteScanResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(SpriteScanError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or_else(|| row_error(&tpl, y))?;
            for &value in row {
                let v = value as f64;
                sum += v;
                sum_sq += v * v;
            }
        }

        let count_f = count as f64;
        let mean_f64 = sum / count_f;
        // var_t is the sum of squared deviations, not the per-pixel variance.
        let var_t_f64 = sum_sq - sum * sum / count_f;
        if var_t_f64 / count_f <= 1e-8 {
            return Err(SpriteScanError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        let mean = mean_f64 as f32;
        let mut t_prime = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or_else(|| row_error(&tpl, y))?;
            for &value in row {
                t_prime.push(value as f32 - mean);
            }
        }

        Ok(Self {
            width,
            height,
            mean,
            var_t: var_t_f64 as f32,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }
}

fn row_error(tpl: &ImageView<'_, u8>, y: usize) -> SpriteScanError {
    let needed = (y + 1)
        .checked_mul(tpl.stride())
        .and_then(|v| v.checked_add(tpl.width()))
        .unwrap_or(usize::MAX);
    SpriteScanError::BufferTooSmall {
        needed,
        got: tpl.as_slice().len(),
    }
}
