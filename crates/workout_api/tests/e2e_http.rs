//! End-to-end coverage over a real listener: the axum router served on an
//! ephemeral port, backed by the in-memory store, exercised with reqwest
//! the way the form's client script would.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use sheet_store::memory::InMemorySheetStore;
use sheet_store::{RawRow, Table};
use workout_api::WorkoutService;

fn raw(cells: &[&str]) -> RawRow {
    cells.iter().map(|c| c.to_string()).collect()
}

fn today_mdy() -> String {
    Utc::now().date_naive().format("%m/%d/%Y").to_string()
}

async fn serve(store: Arc<InMemorySheetStore>) -> SocketAddr {
    let service = WorkoutService::new(store, FixedOffset::east_opt(0).unwrap());
    let app = workout_api::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("server");
    });
    addr
}

#[tokio::test]
async fn exercises_endpoint_lists_complete_rows_in_order() {
    let store = Arc::new(InMemorySheetStore::new());
    store
        .seed(
            Table::Exercises,
            vec![
                raw(&["Back", "Row"]),
                raw(&["", "Curl"]),
                raw(&["Legs", "Squat"]),
            ],
        )
        .await;
    let addr = serve(store).await;

    let list: Vec<String> = reqwest::get(format!("http://{addr}/api/exercises"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(list, vec!["Back - Row", "Legs - Squat"]);
}

#[tokio::test]
async fn submit_then_session_and_history_round_trip() {
    let store = Arc::new(InMemorySheetStore::new());
    store.create_table(Table::Workouts).await;
    let addr = serve(store).await;
    let client = reqwest::Client::new();

    let submission = serde_json::json!({
        "exercises": [{
            "exercise": "Legs - Squat",
            "sets": [
                { "reps": "10", "weight": "100", "rir": "2" },
                { "reps": "8",  "weight": "100", "rir": "" },
                { "reps": "6",  "weight": "90",  "rir": "1" }
            ]
        }]
    });
    let resp = client
        .post(format!("http://{addr}/api/workouts"))
        .json(&submission)
        .send()
        .await
        .expect("submit");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.expect("body"), "Success");

    let today = today_mdy();
    let session: serde_json::Value = client
        .get(format!("http://{addr}/api/session"))
        .query(&[("date", today.as_str())])
        .send()
        .await
        .expect("session")
        .json()
        .await
        .expect("json");
    let exercises = session.as_array().expect("array");
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["exercise"], "Squat");
    assert_eq!(exercises[0]["sets"][0]["reps"], "10");
    assert_eq!(exercises[0]["sets"][0]["weight"], 100.0);
    assert_eq!(exercises[0]["sets"][1]["rir"], "");
    assert_eq!(exercises[1]["sets"][0]["weight"], 90.0);

    let history: serde_json::Value = client
        .get(format!("http://{addr}/api/history"))
        .query(&[("exercise", "squat")])
        .send()
        .await
        .expect("history")
        .json()
        .await
        .expect("json");
    let records = history.as_array().expect("array");
    assert!(!records.is_empty());
    assert_eq!(records[0]["isRecentWorkout"], true);
    assert_eq!(records[0]["date"], today);
    // Exactly one recent record.
    let recent = records
        .iter()
        .filter(|r| r["isRecentWorkout"] == true)
        .count();
    assert_eq!(recent, 1);
}

#[tokio::test]
async fn weekly_stats_bucket_zero_contains_today() {
    let store = Arc::new(InMemorySheetStore::new());
    let today = today_mdy();
    store
        .seed(
            Table::Workouts,
            vec![raw(&[&today, "Squat", "Legs", "100", "10,8,6", ""])],
        )
        .await;
    let addr = serve(store).await;

    let stats: serde_json::Value = reqwest::get(format!("http://{addr}/api/stats/weekly"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    let weeks = stats["weeks"].as_array().expect("weeks");
    assert_eq!(weeks.len(), 4);
    assert_eq!(weeks[0]["weekKey"], "week0");
    assert_eq!(weeks[0]["isCurrentWeek"], true);
    assert_eq!(stats["muscleGroups"]["Legs"]["week0"], 3);
}

#[tokio::test]
async fn recent_sessions_carry_display_names() {
    let store = Arc::new(InMemorySheetStore::new());
    let today = today_mdy();
    store
        .seed(
            Table::Workouts,
            vec![
                raw(&[&today, "Squat", "Legs", "100", "10,8", "2,1"]),
                raw(&[&today, "Row", "Back", "60", "12", ""]),
            ],
        )
        .await;
    let addr = serve(store).await;

    let sessions: serde_json::Value =
        reqwest::get(format!("http://{addr}/api/sessions/recent"))
            .await
            .expect("request")
            .json()
            .await
            .expect("json");
    let sessions = sessions.as_array().expect("array");
    assert_eq!(sessions.len(), 1);
    assert_eq!(
        sessions[0]["workoutName"],
        format!("{today} - Back, Legs")
    );
    assert_eq!(sessions[0]["exercises"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_session_date_is_a_bad_request() {
    let addr = serve(Arc::new(InMemorySheetStore::new())).await;
    let resp = reqwest::get(format!("http://{addr}/api/session?date=soonish"))
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert!(body["error"].as_str().unwrap().contains("invalid date"));
}

#[tokio::test]
async fn submit_without_workouts_sheet_is_an_error() {
    let addr = serve(Arc::new(InMemorySheetStore::new())).await;
    let submission = serde_json::json!({
        "exercises": [{
            "exercise": "Legs - Squat",
            "sets": [{ "reps": 10, "weight": 100 }]
        }]
    });
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/workouts"))
        .json(&submission)
        .send()
        .await
        .expect("submit");
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert!(body["error"].as_str().unwrap().contains("sheet not found"));
}

#[tokio::test]
async fn reads_against_missing_sheets_stay_empty_and_ok() {
    let addr = serve(Arc::new(InMemorySheetStore::new())).await;
    let client = reqwest::Client::new();

    let exercises: Vec<String> = client
        .get(format!("http://{addr}/api/exercises"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert!(exercises.is_empty());

    let history: serde_json::Value = client
        .get(format!("http://{addr}/api/history?exercise=Squat"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(history, serde_json::json!([]));
}
