use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use watchlist_models::{Platform, TitleRecord};

use crate::schema::{CsvSchema, GENERIC_HEADER, IMDB_LIST_HEADER};

/// Serialize records into the requested schema.
///
/// Fields are quoted only when they contain a comma, a double quote, or a
/// newline, with internal quotes doubled; this round-trips through
/// [`crate::decode::parse_titles`] modulo the decoder's whitespace trim.
pub fn encode(records: &[TitleRecord], schema: CsvSchema) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    match schema {
        CsvSchema::Simple => {
            writer.write_record(["Position", "Title"])?;
            for (idx, record) in records.iter().enumerate() {
                writer.write_record([&(idx + 1).to_string(), &record.title])?;
            }
        }
        CsvSchema::Generic => {
            writer.write_record(GENERIC_HEADER)?;
            for record in records {
                writer.write_record([
                    record.title.as_str(),
                    record.media_type.as_str(),
                    record.platform.display_name(),
                    record.image_url.as_deref().unwrap_or(""),
                    &record.extracted.to_string(),
                ])?;
            }
        }
        CsvSchema::ImdbList => {
            writer.write_record(IMDB_LIST_HEADER)?;
            for (idx, record) in records.iter().enumerate() {
                let date = record.extracted.to_string();
                let mut row = vec![String::new(); IMDB_LIST_HEADER.len()];
                row[0] = (idx + 1).to_string(); // Position
                row[2] = date.clone(); // Created
                row[3] = date; // Modified
                row[4] = record.platform.display_name().to_string(); // Description
                row[5] = record.title.clone(); // Title
                writer.write_record(&row)?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e))?;
    let text = String::from_utf8(bytes)?;
    // The csv writer terminates the last record too; exported files carry
    // no trailing newline.
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

/// Filename for a downloaded export: `{platform}-watchlist-{ISO-date}.csv`.
pub fn export_filename(platform: Platform, date: NaiveDate) -> String {
    format!("{}-watchlist-{}.csv", platform.slug(), date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(title: &str) -> TitleRecord {
        TitleRecord::new(
            title,
            Platform::Netflix,
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        )
    }

    #[test]
    fn test_simple_schema_quotes_only_when_needed() {
        let records = vec![record("A"), record("B,C")];
        let csv = encode(&records, CsvSchema::Simple).unwrap();
        assert_eq!(csv, "Position,Title\n1,A\n2,\"B,C\"");
    }

    #[test]
    fn test_simple_schema_doubles_internal_quotes() {
        let records = vec![record("Say \"hi\"")];
        let csv = encode(&records, CsvSchema::Simple).unwrap();
        assert_eq!(csv, "Position,Title\n1,\"Say \"\"hi\"\"\"");
    }

    #[test]
    fn test_generic_schema_columns() {
        let records = vec![record("Dark").with_image_url(Some("https://img.example/d.jpg".into()))];
        let csv = encode(&records, CsvSchema::Generic).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Title,Type,Platform,Image URL,Extracted Date");
        assert_eq!(
            lines.next().unwrap(),
            "Dark,Movie/Show,Netflix,https://img.example/d.jpg,2026-08-23"
        );
    }

    #[test]
    fn test_imdb_schema_populates_five_columns() {
        let csv = encode(&[record("Dark")], CsvSchema::ImdbList).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Position,Const,Created,Modified,Description,Title,Title Type,Directors,You Rated,IMDb Rating,Runtime (mins),Year,Genres,Num Votes,Release Date,URL"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,,2026-08-23,2026-08-23,Netflix,Dark,,,,,,,,,,"
        );
    }

    #[test]
    fn test_empty_input_yields_header_only() {
        let csv = encode(&[], CsvSchema::Simple).unwrap();
        assert_eq!(csv, "Position,Title");
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(
            export_filename(Platform::DisneyPlus, date),
            "disney-watchlist-2026-08-23.csv"
        );
    }
}
