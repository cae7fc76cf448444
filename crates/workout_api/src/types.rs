//! Request and response types for the form-facing JSON API.
//!
//! Field names mirror what the form's client script sends and expects, so
//! several serialized names are camelCase.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A whole form submission: one entry per exercise picked.
#[derive(Clone, Debug, Deserialize)]
pub struct WorkoutSubmission {
    pub exercises: Vec<ExerciseEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseEntry {
    /// Combined `"{group} - {name}"` label as the picker produces it.
    pub exercise: String,
    pub sets: Vec<SetInput>,
}

/// One set as entered in the form. The form posts numbers as strings, so
/// both fields deserialize leniently: numeric strings parse, anything else
/// coerces to 0, and a blank RIR is "not rated".
#[derive(Clone, Debug, Deserialize)]
pub struct SetInput {
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub reps: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub weight: f64,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub rir: Option<f64>,
}

fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Reps of a history record: the latest workout keeps the raw CSV string,
/// archived observations are single numbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RepsField {
    Count(u32),
    Csv(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub weight: f64,
    pub reps: RepsField,
    /// Present (possibly empty) only on the recent-workout record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rir: Option<String>,
    pub date: String,
    #[serde(rename = "isRecentWorkout")]
    pub is_recent_workout: bool,
}

/// One exercise line within a session view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionExercise {
    pub exercise: String,
    pub muscle: String,
    pub weight: f64,
    pub reps: String,
    pub rir: String,
    #[serde(rename = "setsInfo")]
    pub sets_info: String,
}

/// All exercises logged under one calendar date.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Session {
    pub date: String,
    #[serde(rename = "dayName")]
    pub day_name: String,
    #[serde(rename = "workoutName")]
    pub workout_name: String,
    pub exercises: Vec<SessionExercise>,
    #[serde(rename = "muscleGroups")]
    pub muscle_groups: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SetDetail {
    pub reps: String,
    pub weight: f64,
    pub rir: String,
}

/// Per-exercise set breakdown for a single date.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseSets {
    pub exercise: String,
    pub muscle: String,
    pub sets: Vec<SetDetail>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeekBucket {
    #[serde(rename = "weekKey")]
    pub week_key: String,
    #[serde(rename = "weekLabel")]
    pub week_label: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(rename = "isCurrentWeek")]
    pub is_current_week: bool,
}

/// `weeks` is index-0-first (current week first); `muscleGroups` maps each
/// muscle to per-week set counts, keys sorted alphabetically by the
/// `BTreeMap`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub weeks: Vec<WeekBucket>,
    #[serde(rename = "muscleGroups")]
    pub muscle_groups: BTreeMap<String, BTreeMap<String, u32>>,
}
