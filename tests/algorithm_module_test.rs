/// 融合算法各组件的综合测试

use wifinav::algorithms::*;
use wifinav::FusionConfig;

/// 赤道附近每米对应的经度
const DEG_PER_METER: f64 = 1.0 / 111_319.49;

fn ap(id: &str, east_m: f64, accuracy: f64, signal_dbm: i16) -> PositionEstimate {
    PositionEstimate::new(id, 0.0, east_m * DEG_PER_METER, accuracy, signal_dbm)
}

// ============================================================================
// 聚类
// ============================================================================

#[test]
fn test_all_compatible_estimates_form_one_group() {
    let estimates = vec![
        ap("00:00:00:00:00:05", 0.0, 30.0, -60),
        ap("00:00:00:00:00:02", 40.0, 30.0, -70),
        ap("00:00:00:00:00:04", 80.0, 30.0, -65),
        ap("00:00:00:00:00:01", 120.0, 30.0, -80),
    ];
    let config = FusionConfig::default().with_tolerance(100.0);

    let groups = Clusterer::divide_in_groups(&estimates, config.tolerance_m);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 4);

    let survivors = Clusterer::cull(&estimates, &config).unwrap();
    assert_eq!(survivors.len(), 4);
}

#[test]
fn test_boundary_margin_is_compatible() {
    let a = ap("a", 0.0, 20.0, -60);
    let b = ap("b", 111.0, 20.0, -60);
    // 遍历顺序 a, b：b 与组内的 a 做比较
    let tolerance = b.compatibility_margin(&a);
    assert!(tolerance > 0.0);
    assert!(Clusterer::is_compatible(&b, &a, tolerance));

    let estimates = vec![a.clone(), b.clone()];
    let config = FusionConfig::default().with_tolerance(tolerance);
    assert_eq!(Clusterer::cull(&estimates, &config).map(|s| s.len()), Some(2));

    let tighter = FusionConfig::default().with_tolerance(tolerance - 1e-6);
    assert!(!Clusterer::is_compatible(&b, &a, tighter.tolerance_m));
    assert!(Clusterer::cull(&estimates, &tighter).is_none());
}

#[test]
fn test_far_outlier_is_discarded() {
    let estimates = vec![
        ap("aa:00:00:00:00:03", 5000.0, 20.0, -60),
        ap("aa:00:00:00:00:01", 0.0, 20.0, -60),
        ap("aa:00:00:00:00:02", 50.0, 20.0, -60),
    ];
    let config = FusionConfig::default().with_tolerance(50.0);

    let survivors = Clusterer::cull(&estimates, &config).unwrap();
    let ids: Vec<&str> = survivors.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(ids, vec!["aa:00:00:00:00:01", "aa:00:00:00:00:02"]);
}

#[test]
fn test_clustering_is_independent_of_input_order() {
    let mut estimates = vec![
        ap("a", 0.0, 10.0, -60),
        ap("b", 100.0, 10.0, -60),
        ap("c", 200.0, 10.0, -60),
        ap("d", 210.0, 10.0, -60),
    ];
    let config = FusionConfig::default().with_tolerance(100.0);
    let first: Vec<String> = Clusterer::cull(&estimates, &config)
        .unwrap()
        .into_iter()
        .map(|e| e.identifier)
        .collect();

    estimates.reverse();
    let second: Vec<String> = Clusterer::cull(&estimates, &config)
        .unwrap()
        .into_iter()
        .map(|e| e.identifier)
        .collect();
    assert_eq!(first, second);
}

// ============================================================================
// 加权平均
// ============================================================================

#[test]
fn test_identical_estimates_average_to_themselves() {
    let config = FusionConfig::default();
    let estimates: Vec<_> = (0..5)
        .map(|_| PositionEstimate::new("ap", 47.3769, 8.5417, 35.0, -72))
        .collect();

    let centroid = WeightedAverager::average(&estimates, &config).unwrap();
    assert!((centroid.latitude - 47.3769).abs() < 1e-12);
    assert!((centroid.longitude - 8.5417).abs() < 1e-12);
    assert_eq!(centroid.sample_count, 5);
}

#[test]
fn test_stronger_signal_pulls_centroid_closer() {
    let config = FusionConfig::default();
    let target = ap("a", 0.0, 30.0, -80);
    let other = ap("b", 100.0, 30.0, -80);

    let before = WeightedAverager::average(&[target.clone(), other.clone()], &config).unwrap();
    let mut stronger = target.clone();
    stronger.signal_dbm = -60;
    let after = WeightedAverager::average(&[stronger, other], &config).unwrap();

    let gap_before = (before.longitude - target.longitude).abs();
    let gap_after = (after.longitude - target.longitude).abs();
    assert!(gap_after < gap_before);
}

#[test]
fn test_shared_coordinate_is_invariant_to_weights() {
    let config = FusionConfig::default();
    let estimates = vec![
        PositionEstimate::new("strong", 51.5007, -0.1246, 30.0, -40),
        PositionEstimate::new("weak", 51.5007, -0.1246, 30.0, -90),
    ];
    let centroid = WeightedAverager::average(&estimates, &config).unwrap();
    assert!((centroid.latitude - 51.5007).abs() < 1e-12);
    assert!((centroid.longitude + 0.1246).abs() < 1e-12);
    assert!((centroid.accuracy - 30.0).abs() < 1e-12);
}

// ============================================================================
// 精度重估
// ============================================================================

#[test]
fn test_refined_accuracy_is_bounded_by_provisional() {
    let config = FusionConfig::default();
    let estimates = vec![
        ap("a", 0.0, 80.0, -60),
        ap("b", 30.0, 70.0, -75),
        ap("c", 15.0, 90.0, -85),
    ];
    let centroid = WeightedAverager::average(&estimates, &config).unwrap();
    let refined = AccuracyBounder::refine(&centroid, &estimates);

    assert!(refined >= 0.0);
    assert!(refined <= centroid.accuracy);
}

#[test]
fn test_refinement_falls_back_when_coverage_misses_centroid() {
    let config = FusionConfig::default();
    let estimates = vec![ap("a", 0.0, 10.0, -60), ap("b", 100.0, 10.0, -60)];
    let centroid = WeightedAverager::average(&estimates, &config).unwrap();

    assert_eq!(AccuracyBounder::refine(&centroid, &estimates), centroid.accuracy);
}
