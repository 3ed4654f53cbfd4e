use crate::achievements::{CHRISTMAS_HOURS, DAYS_IN_YEAR, DaysStreamed, ShareOfHours, TrackHours};
use crate::error::EngineError;
use crate::history::ListeningHistory;
use crate::stats::{ArtistHours, DayOfWeekBreakdown, HourTotal, TopVsRest};
use crate::weekly::ArtistSeries;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

const TOP_ARTISTS_CHART: usize = 20;
const WEEKLY_CHART_ARTISTS: usize = 10;
const SHARE_CHART_ARTISTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedReport {
    pub summary: ReportSummary,
    pub top_artists: Vec<ArtistHours>,
    pub hours_by_time_of_day: Vec<HourTotal>,
    pub hours_by_day_of_week: DayOfWeekBreakdown,
    pub artists_through_the_year: WeeklyChart,
    pub top_artists_share: TopVsRest,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub year: i32,
    pub timezone: String,
    pub plays: usize,
    pub skipped_plays: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyChart {
    pub legend: Vec<String>,
    pub series: Vec<ArtistSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    pub achieved: bool,
    pub metric: AchievementMetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementMetric {
    Hours { hours: f64, target: f64 },
    Days { days: usize, target: usize },
    Share { ratio: f64 },
    None,
}

impl WrappedReport {
    pub fn build(history: &ListeningHistory) -> Result<Self, EngineError> {
        if history.is_empty() {
            return Err(EngineError::EmptyDataset);
        }

        let year = history.config().filter_year;
        let top_artists = history.top_n_artists(TOP_ARTISTS_CHART)?;

        let series = history.cumulative_by_week(WEEKLY_CHART_ARTISTS)?;
        let legend = history
            .top_n_artists(WEEKLY_CHART_ARTISTS)?
            .into_iter()
            .rev()
            .map(|row| row.artist)
            .collect();

        let share_artists = history.top_n_artists(SHARE_CHART_ARTISTS)?;
        let top_artists_share =
            history.top_vs_rest_hours(share_artists.iter().map(|row| row.artist.as_str()));

        let achievements = vec![
            christmas_spirit(history.all_i_want_for_christmas_is_you()),
            halloween(history.deffinitive_halloween_experience()),
            variety(history.variety_is_the_spice_of_life()?),
            everyday_routine(history.days_streamed(), year),
            pareto(history.pareto_principle()?),
        ];

        let report = Self {
            summary: ReportSummary {
                year,
                timezone: history.timezone().name().to_string(),
                plays: history.kept().len(),
                skipped_plays: history.skipped().len(),
                total_hours: history.total_hours(),
            },
            top_artists,
            hours_by_time_of_day: history.hours_by_time_of_day(),
            hours_by_day_of_week: history.hours_by_day_of_week(),
            artists_through_the_year: WeeklyChart { legend, series },
            top_artists_share,
            achievements,
        };
        log::info!(
            "report for {year}: {:.1} hours, {} of {} achievements",
            report.summary.total_hours,
            report.achieved_count(),
            report.achievements.len()
        );
        Ok(report)
    }

    pub fn achieved_count(&self) -> usize {
        self.achievements
            .iter()
            .filter(|achievement| achievement.achieved)
            .count()
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements
            .iter()
            .find(|achievement| achievement.id == id)
    }
}

fn christmas_spirit(result: TrackHours) -> Achievement {
    Achievement {
        id: "christmas_spirit",
        title: "Christmas spirit",
        description: format!(
            "I streamed at least 1 hour of\nAll I Want for Christmas Is You by Mariah Carey\n({:.2}/{:.1})",
            result.hours, CHRISTMAS_HOURS
        ),
        achieved: result.achieved,
        metric: AchievementMetric::Hours {
            hours: result.hours,
            target: CHRISTMAS_HOURS,
        },
    }
}

fn halloween(achieved: bool) -> Achievement {
    Achievement {
        id: "halloween",
        title: "The deffinitive Halloween experience",
        description: String::from("I streamed Thriller by Michael Jackson during\nHalloween"),
        achieved,
        metric: AchievementMetric::None,
    }
}

fn variety(result: ShareOfHours) -> Achievement {
    Achievement {
        id: "variety",
        title: "Variety is the Spice of Life",
        description: String::from(
            "Less than 30% of my total streams are from my\ntop 20 streamed artists",
        ),
        achieved: result.achieved,
        metric: AchievementMetric::Share {
            ratio: result.ratio,
        },
    }
}

fn everyday_routine(result: DaysStreamed, year: i32) -> Achievement {
    Achievement {
        id: "everyday_routine",
        title: "Everyday routine",
        description: format!(
            "I streamed at least one track every day of {year}\n({}/{DAYS_IN_YEAR})",
            result.days
        ),
        achieved: result.achieved,
        metric: AchievementMetric::Days {
            days: result.days,
            target: DAYS_IN_YEAR,
        },
    }
}

fn pareto(result: ShareOfHours) -> Achievement {
    Achievement {
        id: "pareto",
        title: "Pareto principle confirmed",
        description: format!(
            "More than 80% of my total streams are from my\ntop 20% streamed artists\n({:.2}%)",
            result.ratio * 100.0
        ),
        achieved: result.achieved,
        metric: AchievementMetric::Share {
            ratio: result.ratio,
        },
    }
}

pub fn save_report(path: &Path, report: &WrappedReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
