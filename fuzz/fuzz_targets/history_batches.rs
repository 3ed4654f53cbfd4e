#![no_main]

use libfuzzer_sys::fuzz_target;
use rewrapped::sources::parse_batch;
use rewrapped::{EngineConfig, ListeningHistory, WrappedReport};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(batch) = parse_batch(raw, 0) else {
        return;
    };
    let Ok(history) = ListeningHistory::from_batches(vec![batch], EngineConfig::default()) else {
        return;
    };

    let top = history.top_n_artists(10).expect("top artists");
    let split = history.top_vs_rest_hours(top.iter().map(|row| row.artist.as_str()));
    assert!((split.total_hours() - history.total_hours()).abs() <= 1e-6 * history.total_hours().max(1.0));

    for series in history.cumulative_by_week(10).expect("weekly series") {
        assert_eq!(series.points.len(), 52);
    }
    let _ = WrappedReport::build(&history);
});
