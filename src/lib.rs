//! SpriteScan locates known game sprites in captured frames.
//!
//! The core is a ZNCC (zero-mean normalized cross-correlation) matcher run
//! over a set of grayscale templates, followed by confidence thresholding,
//! non-maximum suppression, and nearest-to-center target selection. All I/O
//! (screen capture, input injection) sits behind the `runner` traits; the
//! detection path itself never blocks.
//!
//! Optional features: `image-io` (default) enables directory template
//! loading and the visualizer, `rayon` parallelizes the per-template scan,
//! `tracing` emits structured spans and events.

pub mod detect;
pub mod image;
pub mod matcher;
pub mod runner;
#[cfg(feature = "image-io")]
pub mod store;
pub mod target;
pub mod template;
pub mod util;
#[cfg(feature = "image-io")]
pub mod viz;

pub(crate) mod trace;

#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage};
pub use template::{Template, TemplatePlan};
pub use util::{SpriteScanError, SpriteScanResult};

pub use detect::nms::{rank, RankConfig};
pub use detect::{detect, Detection};
pub use matcher::{match_template, ScoreSurface};
pub use runner::{
    ActionSink, CycleConfig, CycleOutcome, FrameSource, Runner, Session, SessionEvent,
    SessionState,
};
#[cfg(feature = "image-io")]
pub use store::TemplateStore;
pub use target::select_closest;
