use rewrapped::model::RawPlayEvent;
use rewrapped::{EngineConfig, EngineError, ListeningHistory, WrappedReport};
use std::fs;
use tempfile::tempdir;

const HOUR_MS: u64 = 3_600_000;

fn build(plays: Vec<RawPlayEvent>) -> ListeningHistory {
    ListeningHistory::from_batches(vec![plays], EngineConfig::default()).expect("history")
}

#[test]
fn short_play_is_skipped_not_aggregated() {
    let history = build(vec![RawPlayEvent::new(
        "Intro",
        "Someone",
        "2021-04-02 12:00",
        9_999,
    )]);

    assert_eq!(history.skipped().len(), 1);
    assert!(history.kept().is_empty());
    assert_eq!(history.total_hours(), 0.0);
    assert!(history.top_n_artists(5).expect("top").is_empty());
    assert!(history.hours_by_time_of_day().is_empty());
}

#[test]
fn one_play_every_day_completes_the_year() {
    let plays = (1..=365)
        .map(|day| {
            let date = chrono::NaiveDate::from_yo_opt(2021, day).expect("day");
            RawPlayEvent::new("Daily", "Routine", format!("{date} 07:30"), 200_000)
        })
        .collect();
    let result = build(plays).days_streamed();

    assert!(result.achieved);
    assert_eq!(result.days, 365);
}

#[test]
fn top_artist_against_the_rest() {
    let mut plays: Vec<RawPlayEvent> = (0..10)
        .map(|_| RawPlayEvent::new("Hit", "A", "2021-08-01 15:00", HOUR_MS))
        .collect();
    plays.push(RawPlayEvent::new("Deep cut", "B", "2021-08-02 15:00", HOUR_MS));
    let history = build(plays);

    let top = history.top_n_artists(1).expect("top");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].artist, "A");
    assert_eq!(top[0].hours, 10.0);

    let split = history.top_vs_rest_hours(["A"]);
    assert_eq!((split.top_hours, split.rest_hours), (10.0, 1.0));
}

#[test]
fn thriller_on_halloween_only() {
    let on_time = build(vec![RawPlayEvent::new(
        "Thriller",
        "Michael Jackson",
        "2021-10-31 20:00",
        357_000,
    )]);
    let a_day_early = build(vec![RawPlayEvent::new(
        "Thriller",
        "Michael Jackson",
        "2021-10-30 20:00",
        357_000,
    )]);

    assert!(on_time.deffinitive_halloween_experience());
    assert!(!a_day_early.deffinitive_halloween_experience());
}

#[test]
fn export_folder_to_report_file() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("StreamingHistory0.json"),
        r#"[
            {"endTime": "2020-12-31 23:59", "artistName": "Old", "trackName": "Last Year", "msPlayed": 200000},
            {"endTime": "2021-01-11 08:00", "artistName": "Neon", "trackName": "Night Drive", "msPlayed": 3600000},
            {"endTime": "2021-01-12 22:30", "artistName": "Blue", "trackName": "Ocean Room", "msPlayed": 1800000}
        ]"#,
    )
    .expect("write");
    fs::write(
        dir.path().join("StreamingHistory1.json"),
        r#"[
            {"endTime": "2021-12-20 18:00", "artistName": "Mariah Carey", "trackName": "All I Want for Christmas Is You", "msPlayed": 3600000},
            {"endTime": "2021-12-21 18:00", "artistName": "Neon", "trackName": "Skip", "msPlayed": 2000}
        ]"#,
    )
    .expect("write");

    let batches = rewrapped::sources::load_history_dir(dir.path()).expect("batches");
    let history = ListeningHistory::from_batches(batches, EngineConfig::default()).expect("history");
    assert_eq!(history.kept().len(), 3);
    assert_eq!(history.skipped().len(), 1);

    let report = WrappedReport::build(&history).expect("report");
    assert!(report.achievement("christmas_spirit").expect("christmas").achieved);
    assert_eq!(report.hours_by_time_of_day.len(), 3);

    let output = dir.path().join("report.json");
    rewrapped::report::save_report(&output, &report).expect("save");
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read")).expect("json");
    assert_eq!(saved["summary"]["plays"], 3);
    assert_eq!(
        saved["artists_through_the_year"]["series"][0]["points"]
            .as_array()
            .map(Vec::len),
        Some(52)
    );
}

#[test]
fn malformed_file_stops_the_run() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("StreamingHistory0.json"),
        r#"[{"endTime": "2021-01-11 08:00", "trackName": "No artist", "msPlayed": 20000}]"#,
    )
    .expect("write");

    let err = rewrapped::sources::load_history_dir(dir.path()).expect_err("malformed");
    let cause = err
        .downcast_ref::<EngineError>()
        .expect("engine error");
    assert!(matches!(
        cause,
        EngineError::MalformedRecord {
            batch: 0,
            index: 0,
            field: "artistName",
            ..
        }
    ));
}
