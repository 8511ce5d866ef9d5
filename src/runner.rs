//! Detection cycle orchestration behind explicit I/O seams.
//!
//! Capture and input injection live outside the core: a [`FrameSource`]
//! hands in one grayscale frame per cycle, an [`ActionSink`] receives the
//! chosen target's center coordinates in the same pixel space. The
//! original automation flow ("wait for login, then poll until quit")
//! becomes an explicit [`Session`] state machine driven by events, so the
//! whole loop is testable headlessly.

use crate::detect::nms::{rank, RankConfig};
use crate::detect::{detect, Detection};
use crate::image::OwnedImage;
use crate::target::select_closest;
use crate::template::Template;
use crate::trace::{trace_event, trace_span};
use crate::util::SpriteScanResult;

/// Supplies one captured frame per detection cycle.
///
/// Implementations report a capture failure through `Err`
/// (`SpriteScanError::Capture`); that is distinct from a frame with zero
/// detections.
pub trait FrameSource {
    /// Captures the current frame as single-channel grayscale.
    fn capture(&mut self) -> SpriteScanResult<OwnedImage>;
}

/// Receives the chosen target's center, in frame pixel space.
pub trait ActionSink {
    /// Acts on the target at `(x, y)`, e.g. injects a click.
    fn engage(&mut self, x: f32, y: f32) -> SpriteScanResult<()>;
}

/// Lifecycle of an automation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Login has not been confirmed; no detection runs.
    WaitingForLogin,
    /// Detection cycles run on each `step()`.
    Polling,
    /// Terminal; no further transitions.
    Stopped,
}

/// External events driving session transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The operator (or an automated check) confirmed login.
    LoginConfirmed,
    /// A stop was requested.
    StopRequested,
}

/// Event-driven session state machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::WaitingForLogin
    }
}

impl Session {
    /// Creates a session in `WaitingForLogin`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Applies an event. Unexpected events (a second login confirmation,
    /// anything after `Stopped`) are ignored.
    pub fn handle(&mut self, event: SessionEvent) {
        self.state = match (self.state, event) {
            (SessionState::WaitingForLogin, SessionEvent::LoginConfirmed) => SessionState::Polling,
            (_, SessionEvent::StopRequested) => SessionState::Stopped,
            (state, _) => state,
        };
    }
}

/// Per-cycle detection parameters, passed in explicitly rather than read
/// from ambient state.
#[derive(Clone, Copy, Debug)]
pub struct CycleConfig {
    /// Minimum confidence for a raw detection.
    pub threshold: f32,
    /// Suppression policy applied before target selection.
    pub rank: RankConfig,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            rank: RankConfig::default(),
        }
    }
}

/// Result of one `step()`.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// The session is not in `Polling`; nothing ran.
    NotPolling,
    /// A cycle ran and found nothing to act on. Not an error.
    NoTarget,
    /// A cycle ran and the sink was handed this detection's center.
    Engaged(Detection),
}

/// Drives capture → detect → rank → select → engage cycles.
pub struct Runner<S, A> {
    source: S,
    sink: A,
    templates: Vec<Template>,
    cfg: CycleConfig,
    session: Session,
}

impl<S: FrameSource, A: ActionSink> Runner<S, A> {
    /// Creates a runner in `WaitingForLogin`.
    pub fn new(source: S, sink: A, templates: Vec<Template>, cfg: CycleConfig) -> Self {
        Self {
            source,
            sink,
            templates,
            cfg,
            session: Session::new(),
        }
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Feeds a session event (login confirmed, stop requested).
    pub fn handle(&mut self, event: SessionEvent) {
        self.session.handle(event);
    }

    /// Runs one detection cycle if the session is polling.
    ///
    /// The reference point for target selection is the frame center.
    /// Capture and sink failures propagate and halt the cycle; an empty
    /// ranked list is the `NoTarget` outcome.
    pub fn step(&mut self) -> SpriteScanResult<CycleOutcome> {
        if self.session.state() != SessionState::Polling {
            return Ok(CycleOutcome::NotPolling);
        }

        let _span = trace_span!("cycle").entered();
        let frame = self.source.capture()?;
        let raw = detect(frame.view(), &self.templates, self.cfg.threshold);
        let ranked = rank(&raw, &self.cfg.rank);
        trace_event!("ranked_detections", count = ranked.len());

        let center = (frame.width() as f32 / 2.0, frame.height() as f32 / 2.0);
        match select_closest(&ranked, center) {
            Some(target) => {
                let (x, y) = target.center();
                self.sink.engage(x, y)?;
                Ok(CycleOutcome::Engaged(target.clone()))
            }
            None => Ok(CycleOutcome::NoTarget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ActionSink, CycleConfig, CycleOutcome, FrameSource, Runner, Session, SessionEvent,
        SessionState,
    };
    use crate::image::OwnedImage;
    use crate::template::Template;
    use crate::util::{SpriteScanError, SpriteScanResult};

    fn gradient(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 13) ^ (y * 7) ^ (x * y)) as u8);
            }
        }
        data
    }

    struct FixedFrame(Vec<u8>, usize, usize);

    impl FrameSource for FixedFrame {
        fn capture(&mut self) -> SpriteScanResult<OwnedImage> {
            OwnedImage::new(self.0.clone(), self.1, self.2)
        }
    }

    struct FailingFrame;

    impl FrameSource for FailingFrame {
        fn capture(&mut self) -> SpriteScanResult<OwnedImage> {
            Err(SpriteScanError::Capture {
                reason: "no canvas".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink(Vec<(f32, f32)>);

    impl ActionSink for RecordingSink {
        fn engage(&mut self, x: f32, y: f32) -> SpriteScanResult<()> {
            self.0.push((x, y));
            Ok(())
        }
    }

    #[test]
    fn session_transitions() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::WaitingForLogin);

        session.handle(SessionEvent::LoginConfirmed);
        assert_eq!(session.state(), SessionState::Polling);
        session.handle(SessionEvent::LoginConfirmed);
        assert_eq!(session.state(), SessionState::Polling);

        session.handle(SessionEvent::StopRequested);
        assert_eq!(session.state(), SessionState::Stopped);
        session.handle(SessionEvent::LoginConfirmed);
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn step_is_inert_before_login() {
        let frame = gradient(32, 32);
        let mut runner = Runner::new(
            FixedFrame(frame, 32, 32),
            RecordingSink::default(),
            Vec::new(),
            CycleConfig::default(),
        );
        assert_eq!(runner.step().unwrap(), CycleOutcome::NotPolling);
    }

    #[test]
    fn step_engages_embedded_sprite_center() {
        let width = 48;
        let height = 40;
        let mut frame = vec![0u8; width * height];
        let sprite = gradient(8, 8);
        let (x0, y0) = (20, 16);
        for y in 0..8 {
            for x in 0..8 {
                frame[(y0 + y) * width + (x0 + x)] = sprite[y * 8 + x];
            }
        }
        let template = Template::from_gray("slime", sprite, 8, 8).unwrap();

        let mut runner = Runner::new(
            FixedFrame(frame, width, height),
            RecordingSink::default(),
            vec![template],
            CycleConfig {
                threshold: 0.99,
                ..CycleConfig::default()
            },
        );
        runner.handle(SessionEvent::LoginConfirmed);

        match runner.step().unwrap() {
            CycleOutcome::Engaged(det) => {
                assert_eq!(det.name, "slime");
                assert_eq!((det.x, det.y), (x0, y0));
            }
            other => panic!("expected engagement, got {other:?}"),
        }
        assert_eq!(runner.sink.0, vec![(24.0, 20.0)]);
    }

    #[test]
    fn empty_frame_is_no_target_not_error() {
        let template = Template::from_gray("slime", gradient(8, 8), 8, 8).unwrap();
        let mut runner = Runner::new(
            FixedFrame(vec![0u8; 32 * 32], 32, 32),
            RecordingSink::default(),
            vec![template],
            CycleConfig {
                threshold: 0.9,
                ..CycleConfig::default()
            },
        );
        runner.handle(SessionEvent::LoginConfirmed);
        assert_eq!(runner.step().unwrap(), CycleOutcome::NoTarget);
        assert!(runner.sink.0.is_empty());
    }

    #[test]
    fn capture_failure_propagates() {
        let mut runner = Runner::new(
            FailingFrame,
            RecordingSink::default(),
            Vec::new(),
            CycleConfig::default(),
        );
        runner.handle(SessionEvent::LoginConfirmed);
        let err = runner.step().err().unwrap();
        assert_eq!(
            err,
            SpriteScanError::Capture {
                reason: "no canvas".to_string(),
            }
        );
    }
}
