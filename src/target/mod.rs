//! Target selection among ranked detections.

use crate::detect::Detection;

/// Picks the detection whose center is closest (Euclidean) to `reference`.
///
/// Returns `None` for an empty list: nothing to act on is a legitimate
/// outcome of a cycle, not an error. Ties resolve to the first detection
/// in input order; callers must not read meaning into which one wins.
pub fn select_closest<'a>(
    detections: &'a [Detection],
    reference: (f32, f32),
) -> Option<&'a Detection> {
    let mut best: Option<(&Detection, f32)> = None;
    for det in detections {
        let (cx, cy) = det.center();
        let dx = cx - reference.0;
        let dy = cy - reference.1;
        let dist_sq = dx * dx + dy * dy;
        match best {
            Some((_, best_sq)) if dist_sq >= best_sq => {}
            _ => best = Some((det, dist_sq)),
        }
    }
    best.map(|(det, _)| det)
}
