use std::fmt;
use std::str::FromStr;

/// Output schemas for exported watchlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvSchema {
    /// Position,Title only. The default export format.
    Simple,
    /// One column per TitleRecord field.
    Generic,
    /// The fixed 16-column IMDB list export header, with only
    /// Position/Created/Modified/Description/Title populated so the file
    /// can be fed to IMDB-compatible list tooling.
    ImdbList,
}

/// Exact header IMDB list exports use. Column order matters to consumers.
pub const IMDB_LIST_HEADER: [&str; 16] = [
    "Position",
    "Const",
    "Created",
    "Modified",
    "Description",
    "Title",
    "Title Type",
    "Directors",
    "You Rated",
    "IMDb Rating",
    "Runtime (mins)",
    "Year",
    "Genres",
    "Num Votes",
    "Release Date",
    "URL",
];

pub const GENERIC_HEADER: [&str; 5] = ["Title", "Type", "Platform", "Image URL", "Extracted Date"];

impl fmt::Display for CsvSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CsvSchema::Simple => "simple",
            CsvSchema::Generic => "full",
            CsvSchema::ImdbList => "imdb-list",
        };
        f.write_str(name)
    }
}

impl FromStr for CsvSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(CsvSchema::Simple),
            "full" | "generic" => Ok(CsvSchema::Generic),
            "imdb-list" | "imdb" => Ok(CsvSchema::ImdbList),
            other => Err(format!(
                "Unknown CSV format '{}'. Use 'simple', 'full', or 'imdb-list'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imdb_header_shape() {
        assert_eq!(
            IMDB_LIST_HEADER.join(","),
            "Position,Const,Created,Modified,Description,Title,Title Type,Directors,You Rated,IMDb Rating,Runtime (mins),Year,Genres,Num Votes,Release Date,URL"
        );
    }

    #[test]
    fn test_schema_parse() {
        assert_eq!("simple".parse::<CsvSchema>().unwrap(), CsvSchema::Simple);
        assert_eq!("FULL".parse::<CsvSchema>().unwrap(), CsvSchema::Generic);
        assert_eq!("imdb-list".parse::<CsvSchema>().unwrap(), CsvSchema::ImdbList);
        assert!("xlsx".parse::<CsvSchema>().is_err());
    }
}
