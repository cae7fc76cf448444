use chrono::FixedOffset;
use secrecy::SecretString;

use crate::SheetStoreError;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_token: SecretString,
    pub spreadsheet_id: String,
    pub base_url: String,
    /// Timezone is explicit configuration, never ambient host state: every
    /// "today" the service computes goes through this offset.
    pub utc_offset: FixedOffset,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, SheetStoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, SheetStoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("WORKOUT_SHEETS_TOKEN")
            .ok_or_else(|| SheetStoreError::Config("WORKOUT_SHEETS_TOKEN missing".into()))?;
        let spreadsheet_id = get("WORKOUT_SHEETS_SPREADSHEET_ID").ok_or_else(|| {
            SheetStoreError::Config("WORKOUT_SHEETS_SPREADSHEET_ID missing".into())
        })?;
        let base_url = get("WORKOUT_SHEETS_BASE_URL")
            .unwrap_or_else(|| "https://sheets.googleapis.com".into());
        let offset_raw = get("WORKOUT_UTC_OFFSET").unwrap_or_else(|| "+00:00".into());
        let utc_offset = parse_utc_offset(&offset_raw).ok_or_else(|| {
            SheetStoreError::Config(format!("invalid WORKOUT_UTC_OFFSET: {offset_raw}"))
        })?;
        let bind_addr = get("WORKOUT_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".into());
        Ok(Self {
            api_token: SecretString::new(token.into()),
            spreadsheet_id,
            base_url,
            utc_offset,
            bind_addr,
        })
    }
}

/// Parse an offset of the form `+HH:MM` / `-HH:MM` (or `Z`).
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match s.bytes().next()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
