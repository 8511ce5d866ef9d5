//! Sprite templates and their precomputed matching statistics.

use crate::image::{ImageView, OwnedImage};
use crate::util::SpriteScanResult;

mod plan;

pub use plan::TemplatePlan;

/// Named sprite template with owned grayscale pixels.
///
/// The matching plan is computed once at construction so repeated
/// detection cycles pay no per-frame setup cost. Templates are immutable
/// after creation and safe to share across concurrent scans.
pub struct Template {
    name: String,
    img: OwnedImage,
    plan: TemplatePlan,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    ///
    /// Fails with `DegenerateTemplate` for flat images, which carry no
    /// correlation signal.
    pub fn from_gray(
        name: impl Into<String>,
        data: Vec<u8>,
        width: usize,
        height: usize,
    ) -> SpriteScanResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        let plan = TemplatePlan::from_view(img.view())?;
        Ok(Self {
            name: name.into(),
            img,
            plan,
        })
    }

    /// Returns the template name (source file stem for loaded templates).
    ///
    /// Names are not guaranteed unique across a store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns the precomputed matching plan.
    pub fn plan(&self) -> &TemplatePlan {
        &self.plan
    }
}
