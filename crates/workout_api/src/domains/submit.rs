use chrono::NaiveDate;
use sheet_store::rows::{WorkoutRow, format_number};

use crate::types::{ExerciseEntry, WorkoutSubmission};

/// Expand a form submission into sheet rows, one row per distinct weight of
/// each exercise entry, weights in first-seen order.
///
/// RIR cells keep positional blanks (`"2,,1"`) so the RIR column stays
/// index-aligned with the reps column; a weight group with no rated set at
/// all gets an empty cell.
pub fn expand_submission(submission: &WorkoutSubmission, today: NaiveDate) -> Vec<WorkoutRow> {
    submission
        .exercises
        .iter()
        .flat_map(|entry| expand_entry(entry, today))
        .collect()
}

fn expand_entry(entry: &ExerciseEntry, today: NaiveDate) -> Vec<WorkoutRow> {
    // The picker label is "{muscle} - {exercise}"; a label without the
    // separator is a bare exercise name.
    let (muscle, exercise) = match entry.exercise.split_once(" - ") {
        Some((muscle, exercise)) => (muscle, exercise),
        None => ("", entry.exercise.as_str()),
    };

    // f64 keys rule out a HashMap; a scan keeps first-seen weight order.
    let mut groups: Vec<(f64, Vec<String>, Vec<String>)> = Vec::new();
    for set in &entry.sets {
        let reps = format_number(set.reps);
        let rir = set.rir.map(format_number).unwrap_or_default();
        match groups.iter_mut().find(|(w, _, _)| *w == set.weight) {
            Some((_, reps_list, rir_list)) => {
                reps_list.push(reps);
                rir_list.push(rir);
            }
            None => groups.push((set.weight, vec![reps], vec![rir])),
        }
    }

    groups
        .into_iter()
        .map(|(weight, reps_list, rir_list)| {
            let rir_csv = if rir_list.iter().all(String::is_empty) {
                String::new()
            } else {
                rir_list.join(",")
            };
            WorkoutRow {
                date: today,
                exercise: exercise.to_string(),
                muscle: muscle.to_string(),
                weight,
                reps_csv: reps_list.join(","),
                rir_csv,
            }
        })
        .collect()
}
