use super::*;

#[test]
fn series_has_requested_length_and_floor() {
    for kind in SeriesKind::ALL {
        let values = series(kind, 7, 30);
        assert_eq!(values.len(), 30);
        assert!(values.iter().all(|v| *v >= SERIES_FLOOR), "{kind:?}: {values:?}");
    }
}

#[test]
fn series_is_deterministic_per_seed() {
    assert_eq!(series(SeriesKind::Users, 42, 30), series(SeriesKind::Users, 42, 30));
    assert_ne!(series(SeriesKind::Users, 42, 30), series(SeriesKind::Users, 43, 30));
}

#[test]
fn series_zero_seed_still_varies() {
    let values = series(SeriesKind::Revenue, 0, 30);
    assert!(values.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn bar_heights_scale_to_max() {
    assert_eq!(bar_heights(&[10, 20, 40]), [25, 50, 100]);
    assert_eq!(bar_heights(&[]), Vec::<u32>::new());
    assert_eq!(bar_heights(&[0, 0]), [0, 0]);
}

#[test]
fn metric_sign() {
    assert!(METRICS[0].is_positive());
    assert!(!METRICS[2].is_positive());
}
