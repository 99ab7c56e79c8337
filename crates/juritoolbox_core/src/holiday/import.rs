//! Tabular holiday import.
//!
//! # Responsibility
//! - Parse CSV-like text with at least one date-like column.
//! - Apply the leniency policy: bad rows are dropped and counted.
//!
//! # Invariants
//! - Import never fails hard: the worst outcome is an empty set plus warning.
//! - A leading row without any date is treated as a header, not a drop.
//! - Only counts and status are logged, never row content.

use crate::model::calendar::{parse_calendar_date, HolidaySet};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Non-fatal holiday parsing failure.
///
/// Callers continue with an empty holiday set and surface this as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayParseError {
    /// Input had data rows but none contained a recognizable date.
    NoDates { rows: usize },
    /// Input could not be read at all.
    Unreadable(String),
}

impl Display for HolidayParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDates { rows } => write!(
                f,
                "no holiday dates recognized in {rows} row(s); continuing without holidays"
            ),
            Self::Unreadable(details) => write!(
                f,
                "holiday list could not be read ({details}); continuing without holidays"
            ),
        }
    }
}

impl Error for HolidayParseError {}

/// Outcome of one holiday import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayImport {
    pub holidays: HolidaySet,
    /// Rows that yielded a date (duplicates included).
    pub accepted_rows: usize,
    /// Rows dropped because no field parsed as a date.
    pub dropped_rows: usize,
    /// Set when nothing usable could be extracted from non-empty input.
    pub warning: Option<HolidayParseError>,
}

impl HolidayImport {
    /// Import result for "no upload".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads and imports a holiday file.
    ///
    /// Unreadable files degrade to an empty set with a warning.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => import_holidays(&bytes),
            Err(err) => {
                warn!(
                    "event=holiday_import module=holiday status=degraded reason=unreadable_file"
                );
                Self {
                    warning: Some(HolidayParseError::Unreadable(format!(
                        "{}: {err}",
                        path.display()
                    ))),
                    ..Self::default()
                }
            }
        }
    }
}

/// Imports holidays from text.
pub fn import_holidays_str(data: &str) -> HolidayImport {
    import_holidays(data.as_bytes())
}

/// Imports holidays from raw tabular bytes.
///
/// # Contract
/// - Delimiter is taken from the first line holding a date: `;` when a
///   semicolon-separated field parses, else `,`. Without any such line the
///   first line decides (`;` only when it has semicolons and no commas).
/// - Each row contributes its first field that parses as a date.
/// - Empty input returns an empty import with no warning.
pub fn import_holidays(data: &[u8]) -> HolidayImport {
    let mut import = HolidayImport::default();
    if data.iter().all(u8::is_ascii_whitespace) {
        return import;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(detect_delimiter(data))
        .from_reader(data);

    let mut non_blank_rows = 0_usize;
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => {
                import.warning = Some(HolidayParseError::Unreadable(err.to_string()));
                break;
            }
            Err(_) => {
                non_blank_rows += 1;
                import.dropped_rows += 1;
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        non_blank_rows += 1;
        match first_date(&record) {
            Some(date) => {
                import.accepted_rows += 1;
                import.holidays.insert(date);
            }
            None if non_blank_rows == 1 => {
                debug!("event=holiday_import module=holiday status=ok header_row=true");
            }
            None => {
                import.dropped_rows += 1;
            }
        }
    }

    if import.holidays.is_empty() && import.warning.is_none() && non_blank_rows > 0 {
        import.warning = Some(HolidayParseError::NoDates {
            rows: non_blank_rows,
        });
    }

    if import.warning.is_some() {
        warn!(
            "event=holiday_import module=holiday status=degraded accepted={} dropped={}",
            import.accepted_rows, import.dropped_rows
        );
    } else if import.dropped_rows > 0 {
        warn!(
            "event=holiday_import module=holiday status=partial accepted={} dropped={}",
            import.accepted_rows, import.dropped_rows
        );
    } else {
        debug!(
            "event=holiday_import module=holiday status=ok accepted={} distinct={}",
            import.accepted_rows,
            import.holidays.len()
        );
    }
    import
}

fn detect_delimiter(data: &[u8]) -> u8 {
    let mut lines = data.split(|byte| *byte == b'\n');
    for line in lines.clone() {
        let Ok(line) = std::str::from_utf8(line) else {
            continue;
        };
        if line.contains(';') && has_date_field(line, ';') {
            return b';';
        }
        if has_date_field(line, ',') {
            return b',';
        }
    }

    let first_line = lines.next().unwrap_or(data);
    if first_line.contains(&b';') && !first_line.contains(&b',') {
        b';'
    } else {
        b','
    }
}

fn has_date_field(line: &str, delimiter: char) -> bool {
    line.split(delimiter)
        .any(|field| parse_calendar_date(field).is_some())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}

fn first_date(record: &StringRecord) -> Option<crate::model::calendar::CalendarDate> {
    record.iter().find_map(parse_calendar_date)
}

#[cfg(test)]
mod tests {
    use super::{detect_delimiter, import_holidays, import_holidays_str, HolidayParseError};

    #[test]
    fn delimiter_is_detected_from_first_dated_line() {
        assert_eq!(detect_delimiter(b"data;descricao\n2024-01-01;Ano Novo"), b';');
        assert_eq!(detect_delimiter(b"date,name\n2024-01-01,New Year"), b',');
        assert_eq!(detect_delimiter(b"data\n2024-01-01;Ano Novo"), b';');
        assert_eq!(detect_delimiter(b"data;nome\nsem datas"), b';');
        assert_eq!(detect_delimiter(b"2024-01-01"), b',');
    }

    #[test]
    fn single_column_header_with_semicolon_rows_is_accepted() {
        let import = import_holidays_str("data\n2024-01-01;Ano Novo\n2024-12-25;Natal\n");
        assert_eq!(import.holidays.len(), 2);
        assert_eq!(import.dropped_rows, 0);
        assert!(import.warning.is_none());
    }

    #[test]
    fn header_after_blank_leading_row_is_not_dropped() {
        let import = import_holidays_str(",\ndata,descricao\n2024-01-01,Ano Novo\n");
        assert_eq!(import.accepted_rows, 1);
        assert_eq!(import.dropped_rows, 0);
        assert!(import.warning.is_none());
    }

    #[test]
    fn blank_lines_are_neither_accepted_nor_dropped() {
        let import = import_holidays_str("2024-01-01\n\n,\n2024-12-25\n");
        assert_eq!(import.accepted_rows, 2);
        assert_eq!(import.dropped_rows, 0);
        assert!(import.warning.is_none());
    }

    #[test]
    fn invalid_utf8_rows_are_dropped() {
        let mut data = b"2024-01-01\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"2024-12-25\n");
        let import = import_holidays(&data);
        assert_eq!(import.holidays.len(), 2);
        assert_eq!(import.dropped_rows, 1);
    }

    #[test]
    fn header_only_input_warns_without_counting_header_as_dropped() {
        let import = import_holidays_str("data,descricao\n");
        assert!(import.holidays.is_empty());
        assert_eq!(import.dropped_rows, 0);
        assert_eq!(import.warning, Some(HolidayParseError::NoDates { rows: 1 }));

        let import = import_holidays_str("data\nsem data\n");
        assert_eq!(import.dropped_rows, 1);
        assert_eq!(import.warning, Some(HolidayParseError::NoDates { rows: 2 }));
    }
}
