// Quotation and roster CSV loading.
//
// The surrounding league manager exports squads and the transfer market as
// CSV files whose headers vary by source. Rows are parsed into the same
// raw record shape the in-memory API accepts, so file-based callers share
// the adapter's field-precedence resolution. Malformed rows are skipped
// with a warning, never fatal.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::market::adapter::RawPlayerRecord;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum QuotationError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One CSV row. Header spellings differ between quotation exports and
/// squad exports; aliases cover the known variants.
#[derive(Debug, Deserialize)]
struct RawCsvRow {
    #[serde(default, alias = "Name", alias = "Player")]
    name: Option<String>,
    #[serde(default, alias = "Role", alias = "Position", alias = "R")]
    role: Option<String>,
    #[serde(default, alias = "Club", alias = "Team")]
    club: Option<String>,
    #[serde(default, alias = "Value", alias = "Quotation", alias = "Price")]
    value: Option<f64>,
    #[serde(default, alias = "SeasonScore", alias = "AverageScore")]
    season_score: Option<f64>,
    #[serde(default, alias = "BonusScore", alias = "ExpectedBonus")]
    bonus_score: Option<f64>,
    #[serde(default, alias = "Departed", alias = "Starred")]
    departed: Option<bool>,
    #[serde(default, alias = "StarterOdds", alias = "Playtime")]
    starter_odds: Option<f64>,
}

impl From<RawCsvRow> for RawPlayerRecord {
    fn from(row: RawCsvRow) -> Self {
        RawPlayerRecord {
            name: row.name,
            role: row.role,
            club: row.club,
            quotation: row.value,
            season_score: row.season_score,
            bonus_score: row.bonus_score,
            departed: row.departed,
            starter_odds: row.starter_odds,
            ..RawPlayerRecord::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<RawPlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawCsvRow>() {
        match result {
            Ok(row) => records.push(row.into()),
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(records)
}

/// Load player records from a CSV export (squad or quotation file).
///
/// The returned records still need `adapter::normalize`; blank names and
/// unknown roles are dealt with there.
pub fn load_player_csv(path: &Path) -> Result<Vec<RawPlayerRecord>, QuotationError> {
    let file = std::fs::File::open(path).map_err(|e| QuotationError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_from_reader(file).map_err(|e| QuotationError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::adapter::normalize;
    use crate::market::player::Role;

    #[test]
    fn parses_quotation_style_headers() {
        let csv_text = "\
Name,Role,Club,Quotation,AverageScore,ExpectedBonus
Osimhen,FWD,Napoli,38.0,7.2,4.1
Di Lorenzo,DEF,Napoli,18.0,6.4,1.2
";
        let records = load_from_reader(csv_text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("Osimhen"));
        assert_eq!(records[0].resolved_value(), 38.0);

        let (_, pool) = normalize(&[], &records);
        assert_eq!(pool[0].role, Role::Forward);
        assert_eq!(pool[1].club, "Napoli");
    }

    #[test]
    fn parses_squad_style_headers() {
        let csv_text = "\
Player,Position,Team,Price,SeasonScore,Departed
Old Keeper,GK,Verona,10.0,5.5,false
Leaver,MID,Spezia,3.0,5.0,true
";
        let records = load_from_reader(csv_text.as_bytes()).unwrap();
        let (squad, _) = normalize(&records, &[]);
        assert_eq!(squad.len(), 2);
        assert!(!squad[0].departed);
        assert!(squad[1].departed);
        assert!((squad[0].current_value - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn optional_columns_default() {
        let csv_text = "Name,Role\nBare,DEF\n";
        let records = load_from_reader(csv_text.as_bytes()).unwrap();
        let (_, pool) = normalize(&[], &records);
        assert_eq!(pool[0].current_value, 0.0);
        assert_eq!(pool[0].season_score, 0.0);
        assert!(pool[0].starter_odds.is_none());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let csv_text = "\
Name,Role,Quotation
Good,DEF,9.0
Bad,DEF,not-a-number
Also Good,MID,4.0
";
        let records = load_from_reader(csv_text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name.as_deref(), Some("Also Good"));
    }

    #[test]
    fn starter_odds_column_is_passed_through() {
        let csv_text = "Name,Role,StarterOdds\nRotation Guy,FWD,0.4\n";
        let records = load_from_reader(csv_text.as_bytes()).unwrap();
        let (_, pool) = normalize(&[], &records);
        assert_eq!(pool[0].starter_odds, Some(0.4));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_player_csv(Path::new("/nonexistent/quotations.csv")).unwrap_err();
        assert!(matches!(err, QuotationError::Io { .. }));
    }
}
