//! Typed records for the three sheets, with lenient coercion at the
//! boundary: malformed numbers become 0, malformed dates make a row
//! unparsable so callers can skip it with a warning instead of failing
//! the whole read.

use chrono::NaiveDate;

use crate::RawRow;

/// Date formatting convention used everywhere: `MM/dd/yyyy`.
pub const DATE_FMT: &str = "%m/%d/%Y";

pub fn format_mdy(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Parse a sheet date cell. The spreadsheet host formats date cells as
/// `MM/dd/yyyy`, but ISO dates show up when cells were entered by hand.
pub fn parse_mdy(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FMT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Coerce a cell to a number; anything unparsable is 0.
pub fn coerce_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// Render a number the way the sheet shows it: no trailing `.0` on whole
/// values.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn cell(raw: &RawRow, idx: usize) -> &str {
    raw.get(idx).map(String::as_str).unwrap_or("").trim()
}

/// One row of the Exercises sheet: `[Group, Exercise]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseRow {
    pub group: String,
    pub name: String,
}

impl ExerciseRow {
    /// Rows with either field empty are not listable and parse to `None`.
    pub fn parse(raw: &RawRow) -> Option<Self> {
        let group = cell(raw, 0);
        let name = cell(raw, 1);
        if group.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            group: group.to_string(),
            name: name.to_string(),
        })
    }
}

/// One row of the Workouts sheet:
/// `[Date, Exercise, Muscle, Weight, Reps(CSV), RIR(CSV)]`.
///
/// One row covers every set of one (date, exercise, weight) combination;
/// `reps_csv` and `rir_csv` are positionally aligned, with `rir_csv`
/// possibly shorter when trailing sets carry no RIR.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutRow {
    pub date: NaiveDate,
    pub exercise: String,
    pub muscle: String,
    pub weight: f64,
    pub reps_csv: String,
    pub rir_csv: String,
}

impl WorkoutRow {
    /// `None` when the date cell is unparsable; every other field coerces.
    pub fn parse(raw: &RawRow) -> Option<Self> {
        let date = parse_mdy(cell(raw, 0))?;
        Some(Self {
            date,
            exercise: cell(raw, 1).to_string(),
            muscle: cell(raw, 2).to_string(),
            weight: coerce_number(cell(raw, 3)),
            reps_csv: cell(raw, 4).to_string(),
            rir_csv: cell(raw, 5).to_string(),
        })
    }

    /// Whether the row carries actual set data (non-zero weight and at
    /// least one reps entry). History queries skip rows without it.
    pub fn has_set_data(&self) -> bool {
        self.weight != 0.0 && !self.reps_csv.is_empty()
    }

    /// Number of sets = number of comma-separated reps entries.
    pub fn set_count(&self) -> u32 {
        if self.reps_csv.is_empty() {
            0
        } else {
            self.reps_csv.split(',').count() as u32
        }
    }

    pub fn reps_list(&self) -> Vec<String> {
        if self.reps_csv.is_empty() {
            return Vec::new();
        }
        self.reps_csv
            .split(',')
            .map(|p| p.trim().to_string())
            .collect()
    }

    pub fn rir_list(&self) -> Vec<String> {
        if self.rir_csv.is_empty() {
            return Vec::new();
        }
        self.rir_csv
            .split(',')
            .map(|p| p.trim().to_string())
            .collect()
    }

    pub fn to_raw(&self) -> RawRow {
        vec![
            format_mdy(self.date),
            self.exercise.clone(),
            self.muscle.clone(),
            format_number(self.weight),
            self.reps_csv.clone(),
            self.rir_csv.clone(),
        ]
    }
}

/// One row of the Stats archive sheet: `[Exercise, Weight, Reps, Date]`.
/// Coarser than `WorkoutRow`: one historical single-set observation.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsRow {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub date: NaiveDate,
}

impl StatsRow {
    pub fn parse(raw: &RawRow) -> Option<Self> {
        let date = parse_mdy(cell(raw, 3))?;
        Some(Self {
            exercise: cell(raw, 0).to_string(),
            weight: coerce_number(cell(raw, 1)),
            reps: coerce_number(cell(raw, 2)) as u32,
            date,
        })
    }
}
