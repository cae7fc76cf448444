use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use sheet_store::rows::{WorkoutRow, format_mdy, format_number};

use super::stats::this_monday;
use crate::types::{ExerciseSets, Session, SessionExercise, SetDetail};

/// How many sessions the recent-workouts view shows.
pub const SESSION_LIMIT: usize = 5;

/// All rows of one calendar date, before display formatting.
#[derive(Clone, Debug)]
pub struct DaySession {
    pub date: NaiveDate,
    pub exercises: Vec<SessionExercise>,
    pub muscles: BTreeSet<String>,
}

fn sets_summary(row: &WorkoutRow) -> String {
    let reps = row.reps_list();
    let mut info = format!("{} sets", reps.len());
    if !reps.is_empty() {
        info.push_str(&format!(
            " ({} reps @ {} lbs)",
            reps.join(", "),
            format_number(row.weight)
        ));
    }
    info
}

/// Group workout rows by calendar date, most recent date first. Row order
/// within a date is preserved; a blank muscle cell counts as "Other".
pub fn build_sessions(rows: &[WorkoutRow]) -> Vec<DaySession> {
    let mut by_date: BTreeMap<NaiveDate, DaySession> = BTreeMap::new();
    for row in rows {
        let muscle = if row.muscle.is_empty() {
            "Other".to_string()
        } else {
            row.muscle.clone()
        };
        let session = by_date.entry(row.date).or_insert_with(|| DaySession {
            date: row.date,
            exercises: Vec::new(),
            muscles: BTreeSet::new(),
        });
        session.exercises.push(SessionExercise {
            exercise: row.exercise.clone(),
            muscle: muscle.clone(),
            weight: row.weight,
            reps: row.reps_csv.clone(),
            rir: row.rir_csv.clone(),
            sets_info: sets_summary(row),
        });
        session.muscles.insert(muscle);
    }
    by_date.into_values().rev().collect()
}

fn finalize(session: DaySession) -> Session {
    let date = format_mdy(session.date);
    let muscles: Vec<String> = session.muscles.into_iter().collect();
    Session {
        day_name: session.date.format("%A").to_string(),
        workout_name: format!("{} - {}", date, muscles.join(", ")),
        date,
        exercises: session.exercises,
        muscle_groups: muscles,
    }
}

/// Pick the sessions to display: the previous calendar week's sessions if
/// there are at least [`SESSION_LIMIT`] of them, otherwise the most recent
/// sessions overall. `sessions` must already be date-descending (as
/// [`build_sessions`] returns them).
pub fn select_recent(sessions: Vec<DaySession>, today: NaiveDate) -> Vec<Session> {
    let last_monday = this_monday(today) - Duration::days(7);
    let last_sunday = last_monday + Duration::days(6);
    let in_prev_week = |s: &DaySession| s.date >= last_monday && s.date <= last_sunday;

    let prev_count = sessions.iter().filter(|s| in_prev_week(s)).count();
    let picked: Vec<DaySession> = if prev_count >= SESSION_LIMIT {
        sessions
            .into_iter()
            .filter(in_prev_week)
            .take(SESSION_LIMIT)
            .collect()
    } else {
        sessions.into_iter().take(SESSION_LIMIT).collect()
    };

    picked.into_iter().map(finalize).collect()
}

/// Rebuild the per-set breakdown for every exercise logged on `date`. Sets
/// come back positionally from the CSV columns; a missing RIR slot is an
/// empty string.
pub fn session_for_date(rows: &[WorkoutRow], date: NaiveDate) -> Vec<ExerciseSets> {
    rows.iter()
        .filter(|row| row.date == date)
        .map(|row| {
            let reps = row.reps_list();
            let rirs = row.rir_list();
            let sets = reps
                .iter()
                .enumerate()
                .map(|(i, reps)| SetDetail {
                    reps: reps.clone(),
                    weight: row.weight,
                    rir: rirs.get(i).cloned().unwrap_or_default(),
                })
                .collect();
            ExerciseSets {
                exercise: row.exercise.clone(),
                muscle: row.muscle.clone(),
                sets,
            }
        })
        .collect()
}
