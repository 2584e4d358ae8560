use chrono::NaiveDate;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;

/// Format used to render and parse date-time cells.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date-only format accepted when coercing text to a date-time.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single scalar cell value as handed back by a spreadsheet host.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Blank cell, or a value that was never set
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean(bool),
    /// Numeric values
    Number(f64),
    /// Plain text
    Text(String),
    /// Date/time values
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Returns true for a blank cell.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns true for a blank cell or empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.is_empty(),
            _ => false,
        }
    }

    /// Strict equality: same variant and same value, no coercion.
    pub fn strict_eq(&self, other: &CellValue) -> bool {
        self == other
    }

    /// Coercive equality.
    ///
    /// - blanks behave as empty text
    /// - numbers and text compare after parsing the trimmed text (empty text is `0`)
    /// - booleans are coerced to `1`/`0` and compared again
    /// - date-times and text compare after parsing the text as a date-time
    pub fn loose_eq(&self, other: &CellValue) -> bool {
        use CellValue::*;
        match (self, other) {
            (Empty, Empty) => true,
            (Empty, rest) | (rest, Empty) => Text(String::new()).loose_eq(rest),
            (Boolean(a), Boolean(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Number(number), Text(text)) | (Text(text), Number(number)) => parse_number(text)
                .map(|value| value == *number)
                .unwrap_or(false),
            (Boolean(value), rest) | (rest, Boolean(value)) => {
                Number(if *value { 1.0 } else { 0.0 }).loose_eq(rest)
            }
            (DateTime(date_time), Text(text)) | (Text(text), DateTime(date_time)) => {
                parse_date_time(text).map(|value| value == *date_time).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Coercive ordering used by the relational operators.
    /// Returns None when the pair is incomparable, which makes every comparison false.
    pub fn loose_cmp(&self, other: &CellValue) -> Option<Ordering> {
        use CellValue::*;
        match (self, other) {
            (Text(a), Text(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            (DateTime(a), Text(text)) => parse_date_time(text).map(|b| a.cmp(&b)),
            (Text(text), DateTime(b)) => parse_date_time(text).map(|a| a.cmp(b)),
            (DateTime(_), _) | (_, DateTime(_)) => None,
            _ => self.to_number()?.partial_cmp(&other.to_number()?),
        }
    }

    /// Numeric coercion; None stands for "not a number".
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => Some(0.0),
            CellValue::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
            CellValue::Number(value) => Some(*value).filter(|value| !value.is_nan()),
            CellValue::Text(value) => parse_number(value),
            CellValue::DateTime(_) => None,
        }
    }

    /// Date-time coercion: date-time cells as is, text parsed, anything else None.
    pub fn to_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(value) => Some(*value),
            CellValue::Text(value) => parse_date_time(value),
            _ => None,
        }
    }
}

/// Parses trimmed text as a number, treating empty text as zero.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Parses text as `%Y-%m-%d %H:%M:%S`, falling back to a bare `%Y-%m-%d` at midnight.
fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(value) => write!(f, "{}", value),
            CellValue::Number(value) if value.is_infinite() => {
                write!(f, "{}", if *value > 0.0 { "Infinity" } else { "-Infinity" })
            }
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::DateTime(value) => write!(f, "{}", value.format(DATE_TIME_FORMAT)),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
