use sheet_store::rows::ExerciseRow;

/// Format the exercise catalog as the picker expects: `"{group} - {name}"`,
/// row order preserved. Rows with an empty field never reach this point;
/// `ExerciseRow::parse` already drops them.
pub fn format_catalog(rows: &[ExerciseRow]) -> Vec<String> {
    rows.iter()
        .map(|r| format!("{} - {}", r.group, r.name))
        .collect()
}
