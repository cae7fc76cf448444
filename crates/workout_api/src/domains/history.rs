use sheet_store::rows::{StatsRow, WorkoutRow, format_mdy};

use crate::types::{HistoryRecord, RepsField};

/// Merge the live workout log and the coarser Stats archive into one
/// chronological history for `exercise` (matched case-insensitively).
///
/// The single most recent matching workout row comes first, reps/rir kept
/// as raw CSV strings; date ties resolve to the highest row index. Archive
/// records follow, sorted date descending then weight descending.
pub fn merge_history(
    workouts: &[WorkoutRow],
    stats: &[StatsRow],
    exercise: &str,
) -> Vec<HistoryRecord> {
    let needle = exercise.to_lowercase();

    let mut recent: Option<&WorkoutRow> = None;
    for row in workouts {
        if row.exercise.to_lowercase() != needle || !row.has_set_data() {
            continue;
        }
        // `>=` so a later row wins a date tie.
        if recent.is_none_or(|best| row.date >= best.date) {
            recent = Some(row);
        }
    }

    let mut archived: Vec<&StatsRow> = stats
        .iter()
        .filter(|r| r.exercise.to_lowercase() == needle && r.weight != 0.0 && r.reps != 0)
        .collect();
    archived.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.weight.total_cmp(&a.weight))
    });

    let mut records = Vec::with_capacity(archived.len() + 1);
    if let Some(row) = recent {
        records.push(HistoryRecord {
            weight: row.weight,
            reps: RepsField::Csv(row.reps_csv.clone()),
            rir: Some(row.rir_csv.clone()),
            date: format_mdy(row.date),
            is_recent_workout: true,
        });
    }
    records.extend(archived.into_iter().map(|r| HistoryRecord {
        weight: r.weight,
        reps: RepsField::Count(r.reps),
        rir: None,
        date: format_mdy(r.date),
        is_recent_workout: false,
    }));
    records
}
