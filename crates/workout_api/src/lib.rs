//! Workout-logging JSON API over the spreadsheet store.
//!
//! One service struct wraps an `Arc<dyn SheetStore>` and exposes the six
//! operations the form consumes, plus an axum router over them. Read
//! operations follow one policy throughout: a missing sheet (or a failed
//! read) is an empty result and a warning in the log; only the write path
//! surfaces storage errors to the caller.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{FixedOffset, NaiveDate, Utc};
use metrics::counter;
use serde::Deserialize;

use sheet_store::rows::{ExerciseRow, StatsRow, WorkoutRow, parse_mdy};
use sheet_store::{RawRow, SheetStore, Table};

pub mod domains;
pub mod error;
pub mod types;

use domains::{catalog, history, sessions, stats, submit};
use error::{ApiError, ApiResult};
use types::{ExerciseSets, HistoryRecord, Session, WeeklyStats, WorkoutSubmission};

#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn SheetStore>,
    utc_offset: FixedOffset,
}

impl WorkoutService {
    pub fn new(store: Arc<dyn SheetStore>, utc_offset: FixedOffset) -> Self {
        Self { store, utc_offset }
    }

    /// Today in the configured timezone. Computed once per request at this
    /// boundary; the domain functions only ever see it as a parameter.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    async fn read_or_empty(&self, table: Table, op: &'static str) -> Vec<RawRow> {
        match self.store.read_rows(table).await {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                tracing::warn!(op, table = table.title(), "sheet missing, returning empty result");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    op,
                    table = table.title(),
                    error = %e,
                    "read failed, returning empty result"
                );
                Vec::new()
            }
        }
    }

    async fn workout_rows(&self, op: &'static str) -> Vec<WorkoutRow> {
        self.read_or_empty(Table::Workouts, op)
            .await
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                let parsed = WorkoutRow::parse(raw);
                if parsed.is_none() {
                    // Data rows start at sheet row 2.
                    tracing::warn!(op, row = i + 2, "skipping workout row with unparsable date");
                }
                parsed
            })
            .collect()
    }

    /// Catalog of pickable exercises, `"{group} - {name}"` per listable row.
    pub async fn list_exercises(&self) -> Vec<String> {
        let rows: Vec<ExerciseRow> = self
            .read_or_empty(Table::Exercises, "list_exercises")
            .await
            .iter()
            .filter_map(ExerciseRow::parse)
            .collect();
        catalog::format_catalog(&rows)
    }

    /// Merged history for one exercise: most recent workout first, then the
    /// Stats archive sorted date/weight descending.
    pub async fn history(&self, exercise: &str) -> Vec<HistoryRecord> {
        let workouts = self.workout_rows("history").await;
        let archive: Vec<StatsRow> = self
            .read_or_empty(Table::Stats, "history")
            .await
            .iter()
            .filter_map(StatsRow::parse)
            .collect();
        history::merge_history(&workouts, &archive, exercise)
    }

    /// Up to five sessions: the previous calendar week's when it was busy
    /// enough, the most recent overall otherwise.
    pub async fn recent_sessions(&self) -> Vec<Session> {
        let rows = self.workout_rows("recent_sessions").await;
        sessions::select_recent(sessions::build_sessions(&rows), self.today())
    }

    /// Per-exercise set breakdown for one date (`MM/dd/yyyy`).
    pub async fn session_by_date(&self, date: &str) -> ApiResult<Vec<ExerciseSets>> {
        let date = parse_mdy(date)
            .ok_or_else(|| ApiError::Validation(format!("invalid date: {date}")))?;
        let rows = self.workout_rows("session_by_date").await;
        Ok(sessions::session_for_date(&rows, date))
    }

    /// Four Monday-anchored week buckets and the muscle-group set matrix.
    pub async fn weekly_stats(&self) -> WeeklyStats {
        let rows = self.workout_rows("weekly_stats").await;
        stats::weekly_stats(&rows, self.today())
    }

    /// Expand a submission and insert it as one block at the head of the
    /// Workouts sheet, then outline the block. The only operation that
    /// propagates storage errors: a silently dropped write is data loss.
    pub async fn submit_workout(&self, submission: &WorkoutSubmission) -> ApiResult<u32> {
        let rows = submit::expand_submission(submission, self.today());
        if rows.is_empty() {
            tracing::info!("submission contained no sets, nothing to insert");
            return Ok(0);
        }
        let raw: Vec<RawRow> = rows.iter().map(WorkoutRow::to_raw).collect();
        let inserted = self.store.insert_rows_at_head(Table::Workouts, &raw).await?;
        // The block sits directly below the header, sheet row 2.
        self.store.outline_rows(Table::Workouts, 2, inserted).await?;
        counter!("workout_submissions_total").increment(1);
        tracing::info!(rows = inserted, "workout submission stored");
        Ok(inserted)
    }
}

#[derive(Deserialize)]
struct HistoryQuery {
    exercise: String,
}

#[derive(Deserialize)]
struct DateQuery {
    date: String,
}

/// The form-facing routes, state included.
pub fn router(service: WorkoutService) -> Router {
    Router::new()
        .route("/api/exercises", get(list_exercises_handler))
        .route("/api/history", get(history_handler))
        .route("/api/sessions/recent", get(recent_sessions_handler))
        .route("/api/session", get(session_by_date_handler))
        .route("/api/stats/weekly", get(weekly_stats_handler))
        .route("/api/workouts", post(submit_workout_handler))
        .with_state(service)
}

async fn list_exercises_handler(State(svc): State<WorkoutService>) -> Json<Vec<String>> {
    Json(svc.list_exercises().await)
}

async fn history_handler(
    State(svc): State<WorkoutService>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<HistoryRecord>> {
    Json(svc.history(&q.exercise).await)
}

async fn recent_sessions_handler(State(svc): State<WorkoutService>) -> Json<Vec<Session>> {
    Json(svc.recent_sessions().await)
}

async fn session_by_date_handler(
    State(svc): State<WorkoutService>,
    Query(q): Query<DateQuery>,
) -> ApiResult<Json<Vec<ExerciseSets>>> {
    Ok(Json(svc.session_by_date(&q.date).await?))
}

async fn weekly_stats_handler(State(svc): State<WorkoutService>) -> Json<WeeklyStats> {
    Json(svc.weekly_stats().await)
}

async fn submit_workout_handler(
    State(svc): State<WorkoutService>,
    Json(submission): Json<WorkoutSubmission>,
) -> ApiResult<&'static str> {
    svc.submit_workout(&submission).await?;
    Ok("Success")
}
