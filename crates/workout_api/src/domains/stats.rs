use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use sheet_store::rows::{WorkoutRow, format_mdy};

use crate::types::{WeekBucket, WeeklyStats};

/// Current week plus three complete weeks back.
pub const WEEK_COUNT: usize = 4;

/// Most recent Monday at or before `today`. On a Sunday this goes back six
/// days, keeping Monday-start weeks.
pub fn this_monday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_monday() as i64)
}

/// One Monday-to-Sunday aggregation window; `end` is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekSpan {
    pub index: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekSpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn key(&self) -> String {
        format!("week{}", self.index)
    }

    fn label(&self) -> String {
        let range = format!(
            "{} - {}",
            self.start.format("%m/%d"),
            self.end.format("%m/%d")
        );
        if self.index == 0 {
            format!("This Week ({range})")
        } else {
            range
        }
    }

    fn to_bucket(self) -> WeekBucket {
        WeekBucket {
            week_key: self.key(),
            week_label: self.label(),
            start_date: format_mdy(self.start),
            end_date: format_mdy(self.end),
            is_current_week: self.index == 0,
        }
    }
}

/// The four spans, index 0 = current week, descending from there.
pub fn week_spans(today: NaiveDate) -> Vec<WeekSpan> {
    let monday = this_monday(today);
    (0..WEEK_COUNT)
        .map(|index| {
            let start = monday - Duration::days(7 * index as i64);
            WeekSpan {
                index,
                start,
                end: start + Duration::days(6),
            }
        })
        .collect()
}

/// Bucket every workout row into its week and sum set counts per muscle
/// group. A muscle appears with all four week keys (zero-filled) once any
/// of its rows lands in a span; a blank muscle cell counts under "Other".
pub fn weekly_stats(rows: &[WorkoutRow], today: NaiveDate) -> WeeklyStats {
    let spans = week_spans(today);
    let mut muscle_groups: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

    for row in rows {
        let sets = row.set_count();
        for span in &spans {
            if !span.contains(row.date) {
                continue;
            }
            let muscle = if row.muscle.is_empty() {
                "Other"
            } else {
                row.muscle.as_str()
            };
            let per_week = muscle_groups
                .entry(muscle.to_string())
                .or_insert_with(|| spans.iter().map(|s| (s.key(), 0)).collect());
            *per_week.entry(span.key()).or_insert(0) += sets;
        }
    }

    WeeklyStats {
        weeks: spans.into_iter().map(WeekSpan::to_bucket).collect(),
        muscle_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%m/%d/%Y").unwrap()
    }

    fn row(d: &str, muscle: &str, reps: &str) -> WorkoutRow {
        WorkoutRow {
            date: date(d),
            exercise: "Squat".to_string(),
            muscle: muscle.to_string(),
            weight: 100.0,
            reps_csv: reps.to_string(),
            rir_csv: String::new(),
        }
    }

    #[test]
    fn monday_anchor_handles_every_weekday() {
        // 01/12/2026 is a Monday.
        assert_eq!(this_monday(date("01/12/2026")), date("01/12/2026"));
        assert_eq!(this_monday(date("01/15/2026")), date("01/12/2026"));
        // Sunday goes back six days, not forward.
        assert_eq!(this_monday(date("01/18/2026")), date("01/12/2026"));
    }

    #[test]
    fn bucket_zero_contains_today_and_spans_are_contiguous() {
        let today = date("01/15/2026");
        let spans = week_spans(today);
        assert_eq!(spans.len(), WEEK_COUNT);
        assert!(spans[0].contains(today));
        for pair in spans.windows(2) {
            assert_eq!(pair[1].end + Duration::days(1), pair[0].start);
        }
        // Non-overlapping: a date in one span is in no other.
        for span in &spans[1..] {
            assert!(!span.contains(today));
        }
    }

    #[test]
    fn labels_mark_the_current_week() {
        let spans = week_spans(date("01/15/2026"));
        assert_eq!(spans[0].label(), "This Week (01/12 - 01/18)");
        assert_eq!(spans[1].label(), "01/05 - 01/11");
    }

    #[test]
    fn set_counts_accumulate_per_muscle_and_week() {
        let today = date("01/15/2026");
        let rows = vec![
            row("01/13/2026", "Legs", "10,8,6"),
            row("01/14/2026", "Legs", "12"),
            row("01/07/2026", "Back", "5,5"),
            row("01/13/2026", "", "8"),
            // Older than the four-week window: ignored.
            row("11/01/2025", "Legs", "10"),
        ];
        let stats = weekly_stats(&rows, today);

        assert_eq!(stats.muscle_groups["Legs"]["week0"], 4);
        assert_eq!(stats.muscle_groups["Legs"]["week1"], 0);
        assert_eq!(stats.muscle_groups["Back"]["week1"], 2);
        assert_eq!(stats.muscle_groups["Other"]["week0"], 1);

        // Alphabetical muscle ordering.
        let keys: Vec<&String> = stats.muscle_groups.keys().collect();
        assert_eq!(keys, vec!["Back", "Legs", "Other"]);

        assert!(stats.weeks[0].is_current_week);
        assert_eq!(stats.weeks[0].start_date, "01/12/2026");
        assert_eq!(stats.weeks[3].start_date, "12/22/2025");
    }
}
