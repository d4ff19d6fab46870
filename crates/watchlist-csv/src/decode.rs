use csv::ReaderBuilder;
use tracing::debug;

/// Extract a title list from uploaded CSV text of arbitrary schema.
///
/// Column selection: a case-insensitive "title" header wins; without one,
/// a leading "position" header means titles sit in column 2, otherwise
/// column 1. Values are unquoted by the parser, then stripped of one
/// remaining layer of surrounding double quotes (files produced by naive
/// exporters carry them literally) and trimmed; empties are dropped.
/// Quoted fields with embedded commas and newlines parse correctly.
pub fn parse_titles(csv_text: &str) -> Vec<String> {
    let text = csv_text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(Ok(header)) => header,
        _ => return Vec::new(),
    };

    let title_index = header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("title"))
        .unwrap_or_else(|| {
            let position_first = header
                .get(0)
                .map(|h| h.trim().eq_ignore_ascii_case("position"))
                .unwrap_or(false);
            if position_first {
                1
            } else {
                0
            }
        });

    debug!(title_index, columns = header.len(), "Parsing uploaded CSV");

    let mut titles = Vec::new();
    for row in rows {
        let record = match row {
            Ok(record) => record,
            Err(_) => continue, // skip unparseable rows, never abort
        };
        if let Some(value) = record.get(title_index) {
            let title = clean_field(value);
            if !title.is_empty() {
                titles.push(title);
            }
        }
    }

    titles
}

/// Strip one layer of surrounding double quotes and outer whitespace.
fn clean_field(value: &str) -> String {
    let trimmed = value.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::schema::CsvSchema;
    use chrono::NaiveDate;
    use watchlist_models::{Platform, TitleRecord};

    #[test]
    fn test_parse_with_title_header() {
        let csv = "Position,Title\n1,\"Show, The\"\n2,Movie\n";
        assert_eq!(parse_titles(csv), vec!["Show, The", "Movie"]);
    }

    #[test]
    fn test_parse_title_header_case_insensitive() {
        let csv = "Name,TITLE,Year\nx,Alien,1979\ny,Heat,1995";
        assert_eq!(parse_titles(csv), vec!["Alien", "Heat"]);
    }

    #[test]
    fn test_position_first_heuristic() {
        // No "title" header; leading "position" means column 2 holds titles.
        let csv = "Position,Name\n1,Alien\n2,Heat";
        assert_eq!(parse_titles(csv), vec!["Alien", "Heat"]);
    }

    #[test]
    fn test_first_column_fallback() {
        let csv = "Name,Year\nAlien,1979\nHeat,1995";
        assert_eq!(parse_titles(csv), vec!["Alien", "Heat"]);
    }

    #[test]
    fn test_drops_empty_values() {
        let csv = "Title\nAlien\n\nHeat\n   \n";
        assert_eq!(parse_titles(csv), vec!["Alien", "Heat"]);
    }

    #[test]
    fn test_strips_literal_quote_layer() {
        // Naive exporters leave quote characters inside already-parsed fields.
        let csv = "Title,Year\n\"\"\"Alien\"\"\",1979";
        assert_eq!(parse_titles(csv), vec!["Alien"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_titles("").is_empty());
        assert!(parse_titles("   \n  ").is_empty());
    }

    #[test]
    fn test_round_trip_comma_quote_newline() {
        let title = "Long, strange \"trip\"\nback home";
        let records = vec![TitleRecord::new(
            title,
            Platform::Hulu,
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        )];
        let csv = encode(&records, CsvSchema::Simple).unwrap();
        assert_eq!(parse_titles(&csv), vec![title]);
    }
}
