//! Deduplication and ordering contracts of the ranker.

use spritescan::{rank, Detection, RankConfig};

fn det(name: &str, x: usize, y: usize, confidence: f32) -> Detection {
    Detection {
        name: name.to_string(),
        x,
        y,
        width: 20,
        height: 20,
        confidence,
    }
}

#[test]
fn cluster_collapses_to_single_maximum() {
    // Pixel-shift cluster around one real hit: fully overlapping boxes.
    let confidences = [0.71f32, 0.95, 0.80, 0.93, 0.72];
    let cluster: Vec<Detection> = confidences
        .iter()
        .map(|&c| det("slime", 40, 40, c))
        .collect();

    let ranked = rank(&cluster, &RankConfig::default());
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].confidence, 0.95);
}

#[test]
fn output_is_sorted_by_descending_confidence() {
    let input = vec![
        det("slime", 0, 0, 0.75),
        det("wolf", 200, 0, 0.92),
        det("ghost", 0, 200, 0.81),
    ];
    let ranked = rank(&input, &RankConfig::default());
    assert_eq!(ranked.len(), 3);
    let confidences: Vec<f32> = ranked.iter().map(|d| d.confidence).collect();
    assert_eq!(confidences, vec![0.92, 0.81, 0.75]);
}

#[test]
fn rank_is_idempotent() {
    let input = vec![
        det("slime", 0, 0, 0.9),
        det("slime", 1, 1, 0.8),
        det("wolf", 100, 100, 0.85),
        det("wolf", 300, 300, 0.85),
    ];
    let once = rank(&input, &RankConfig::default());
    let twice = rank(&once, &RankConfig::default());
    assert_eq!(once, twice);
}

#[test]
fn adjacent_clusters_keep_one_representative_each() {
    // Two real hits of the same sprite, 30px apart, each with a shifted echo.
    let input = vec![
        det("slime", 10, 10, 0.97),
        det("slime", 11, 10, 0.90),
        det("slime", 40, 10, 0.94),
        det("slime", 41, 10, 0.88),
    ];
    let ranked = rank(&input, &RankConfig::default());
    assert_eq!(ranked.len(), 2);
    assert_eq!((ranked[0].x, ranked[0].confidence), (10, 0.97));
    assert_eq!((ranked[1].x, ranked[1].confidence), (40, 0.94));
}

#[test]
fn cross_template_overlap_is_kept_unless_opted_in() {
    let input = vec![det("slime", 10, 10, 0.9), det("wolf", 12, 12, 0.8)];

    let default = rank(&input, &RankConfig::default());
    assert_eq!(default.len(), 2);

    let suppressed = rank(
        &input,
        &RankConfig {
            cross_template: true,
            ..RankConfig::default()
        },
    );
    assert_eq!(suppressed.len(), 1);
    assert_eq!(suppressed[0].name, "slime");
}
