//! Non-maximum suppression and confidence ranking for detections.

use crate::detect::Detection;

/// Suppression policy for [`rank`].
#[derive(Clone, Copy, Debug)]
pub struct RankConfig {
    /// Fraction of the smaller box that must be covered before two
    /// detections count as overlapping. 0.0 means any overlap suppresses.
    pub overlap: f32,
    /// Suppress across template names as well. The default keeps only the
    /// same-name clustering that pixel-shift artifacts produce; whether
    /// two different templates may claim the same screen region is left
    /// to the caller.
    pub cross_template: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            overlap: 0.0,
            cross_template: false,
        }
    }
}

/// Orders detections by descending confidence and collapses overlapping
/// clusters to their highest-confidence representative.
///
/// The sort is stable, so equal confidences keep their emission order.
/// Greedy suppression then keeps each remaining maximum and discards
/// later detections whose boxes overlap it beyond `cfg.overlap`. The
/// result is deterministic and `rank` is idempotent.
pub fn rank(detections: &[Detection], cfg: &RankConfig) -> Vec<Detection> {
    let mut sorted: Vec<Detection> = detections.to_vec();
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::new();
    'outer: for det in sorted {
        for winner in &kept {
            if !cfg.cross_template && winner.name != det.name {
                continue;
            }
            if overlap_fraction(winner, &det) > cfg.overlap {
                continue 'outer;
            }
        }
        kept.push(det);
    }
    kept
}

/// Intersection area over the smaller box's area, 0.0 when disjoint.
fn overlap_fraction(a: &Detection, b: &Detection) -> f32 {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = (a.x + a.width).min(b.x + b.width);
    let y1 = (a.y + a.height).min(b.y + b.height);
    if x1 <= x0 || y1 <= y0 {
        return 0.0;
    }
    let inter = ((x1 - x0) * (y1 - y0)) as f32;
    let min_area = (a.width * a.height).min(b.width * b.height) as f32;
    inter / min_area
}

#[cfg(test)]
mod tests {
    use super::{overlap_fraction, rank, RankConfig};
    use crate::detect::Detection;

    fn det(name: &str, x: usize, y: usize, confidence: f32) -> Detection {
        Detection {
            name: name.to_string(),
            x,
            y,
            width: 10,
            height: 10,
            confidence,
        }
    }

    #[test]
    fn overlap_fraction_handles_disjoint_and_nested() {
        let a = det("a", 0, 0, 1.0);
        let b = det("a", 10, 0, 1.0);
        assert_eq!(overlap_fraction(&a, &b), 0.0);

        let c = det("a", 0, 0, 1.0);
        assert_eq!(overlap_fraction(&a, &c), 1.0);

        let d = det("a", 5, 0, 1.0);
        assert!((overlap_fraction(&a, &d) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn different_names_survive_by_default() {
        let input = vec![det("slime", 0, 0, 0.9), det("wolf", 2, 2, 0.8)];
        let ranked = rank(&input, &RankConfig::default());
        assert_eq!(ranked.len(), 2);

        let cross = rank(
            &input,
            &RankConfig {
                cross_template: true,
                ..RankConfig::default()
            },
        );
        assert_eq!(cross.len(), 1);
        assert_eq!(cross[0].name, "slime");
    }

    #[test]
    fn overlap_threshold_tolerates_small_intersections() {
        // 1/10th overlap on the smaller box, below a 0.25 threshold.
        let input = vec![det("slime", 0, 0, 0.9), det("slime", 9, 0, 0.8)];
        let cfg = RankConfig {
            overlap: 0.25,
            ..RankConfig::default()
        };
        assert_eq!(rank(&input, &cfg).len(), 2);
        assert_eq!(rank(&input, &RankConfig::default()).len(), 1);
    }

    #[test]
    fn equal_confidence_keeps_emission_order() {
        let input = vec![det("slime", 0, 0, 0.8), det("slime", 50, 50, 0.8)];
        let ranked = rank(&input, &RankConfig::default());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].x, 0);
        assert_eq!(ranked[1].x, 50);
    }
}
