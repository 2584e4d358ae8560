use crate::error::Result;
use crate::error::RustyRangeError;
use crate::spreadsheet::cell::CellValue;
use regex::Regex;
use std::cmp::Ordering;

/// Named comparison operators usable in a where-spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    /// Coercive equality
    Equal,
    /// Strict equality, no coercion
    DeepEqual,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Operand list contains the cell value
    Includes,
    /// Operand list does not contain the cell value
    Excludes,
    /// Cell value lies within the operand list's lowest and highest values, inclusive
    Between,
    /// Pattern matches the cell's text
    Match,
    /// Any of the patterns matches the cell's text
    MatchAny,
}

impl Operator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::DeepEqual => "deepEqual",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Includes => "includes",
            Self::Excludes => "excludes",
            Self::Between => "between",
            Self::Match => "match",
            Self::MatchAny => "matchAny",
        }
    }

    /// Looks up an operator by its exact name.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "equal" => Ok(Self::Equal),
            "deepEqual" => Ok(Self::DeepEqual),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "includes" => Ok(Self::Includes),
            "excludes" => Ok(Self::Excludes),
            "between" => Ok(Self::Between),
            "match" => Ok(Self::Match),
            "matchAny" => Ok(Self::MatchAny),
            _ => Err(RustyRangeError::UnknownOperator(name.to_owned())),
        }
    }

    /// Describes the operand shape this operator takes.
    const fn expects(&self) -> &'static str {
        match self {
            Self::Equal | Self::DeepEqual | Self::Gt | Self::Gte | Self::Lt | Self::Lte => {
                "a single value"
            }
            Self::Includes | Self::Excludes | Self::Between => "a list of values",
            Self::Match => "a pattern",
            Self::MatchAny => "a list of patterns",
        }
    }

    fn accepts(&self, operand: &Operand) -> bool {
        match self {
            Self::Equal | Self::DeepEqual | Self::Gt | Self::Gte | Self::Lt | Self::Lte => {
                matches!(operand, Operand::Value(_))
            }
            Self::Includes | Self::Excludes | Self::Between => matches!(operand, Operand::List(_)),
            Self::Match => matches!(operand, Operand::Pattern(_)),
            Self::MatchAny => matches!(operand, Operand::Patterns(_)),
        }
    }
}

/// Right-hand side of a condition.
#[derive(Clone, Debug)]
pub enum Operand {
    Value(CellValue),
    List(Vec<CellValue>),
    Pattern(Regex),
    Patterns(Vec<Regex>),
}

impl Operand {
    pub fn value(value: impl Into<CellValue>) -> Self {
        Operand::Value(value.into())
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<CellValue> for Operand {
    fn from(value: CellValue) -> Self {
        Operand::Value(value)
    }
}

impl From<Vec<CellValue>> for Operand {
    fn from(values: Vec<CellValue>) -> Self {
        Operand::List(values)
    }
}

impl From<Regex> for Operand {
    fn from(pattern: Regex) -> Self {
        Operand::Pattern(pattern)
    }
}

impl From<Vec<Regex>> for Operand {
    fn from(patterns: Vec<Regex>) -> Self {
        Operand::Patterns(patterns)
    }
}

/// An operator paired with an operand of the shape it expects.
#[derive(Clone, Debug)]
pub struct Condition {
    operator: Operator,
    operand: Operand,
}

impl Condition {
    pub fn new(operator: Operator, operand: Operand) -> Result<Self> {
        if !operator.accepts(&operand) {
            return Err(RustyRangeError::OperandMismatch {
                operator: operator.as_str(),
                expected: operator.expects(),
            });
        }
        Ok(Self { operator, operand })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Evaluates the condition against a cell value.
    pub fn evaluate(&self, actual: &CellValue) -> bool {
        match (self.operator, &self.operand) {
            (Operator::Equal, Operand::Value(expected)) => actual.loose_eq(expected),
            (Operator::DeepEqual, Operand::Value(expected)) => actual.strict_eq(expected),
            (Operator::Gt, Operand::Value(expected)) => {
                actual.loose_cmp(expected) == Some(Ordering::Greater)
            }
            (Operator::Gte, Operand::Value(expected)) => {
                matches!(actual.loose_cmp(expected), Some(Ordering::Greater | Ordering::Equal))
            }
            (Operator::Lt, Operand::Value(expected)) => {
                actual.loose_cmp(expected) == Some(Ordering::Less)
            }
            (Operator::Lte, Operand::Value(expected)) => {
                matches!(actual.loose_cmp(expected), Some(Ordering::Less | Ordering::Equal))
            }
            (Operator::Includes, Operand::List(expected)) => includes(expected, actual),
            (Operator::Excludes, Operand::List(expected)) => !includes(expected, actual),
            (Operator::Between, Operand::List(expected)) => between(expected, actual),
            (Operator::Match, Operand::Pattern(pattern)) => pattern.is_match(&actual.to_string()),
            (Operator::MatchAny, Operand::Patterns(patterns)) => {
                let text = actual.to_string();
                patterns.iter().any(|pattern| pattern.is_match(&text))
            }
            _ => false,
        }
    }
}

/// Strict membership; NaN is a member of a list holding NaN.
fn includes(expected: &[CellValue], actual: &CellValue) -> bool {
    expected.iter().any(|value| match (value, actual) {
        (CellValue::Number(a), CellValue::Number(b)) if a.is_nan() && b.is_nan() => true,
        _ => value.strict_eq(actual),
    })
}

/// Inclusive range check against the numerically lowest and highest operands.
///
/// Operands and the cell are coerced to numbers, text included. A list made
/// only of date-times is ordered chronologically instead. An empty list, or
/// one holding a value that fits neither ordering, matches nothing.
fn between(expected: &[CellValue], actual: &CellValue) -> bool {
    if let Some((lower, upper)) = bounds(expected, CellValue::to_number) {
        return actual
            .to_number()
            .is_some_and(|value| lower <= value && value <= upper);
    }
    if let Some((lower, upper)) = bounds(expected, CellValue::to_date_time) {
        return actual
            .to_date_time()
            .is_some_and(|value| lower <= value && value <= upper);
    }
    false
}

/// Lowest and highest of `values` after coercion; None when any value does not coerce.
fn bounds<T, F>(values: &[CellValue], coerce: F) -> Option<(T, T)>
where
    T: PartialOrd + Copy,
    F: Fn(&CellValue) -> Option<T>,
{
    let mut coerced = values.iter().map(coerce);
    let first = coerced.next()??;
    coerced.try_fold((first, first), |(lower, upper), value| {
        let value = value?;
        Some((
            if value < lower { value } else { lower },
            if value > upper { value } else { upper },
        ))
    })
}

/// Filter applied to one column.
#[derive(Clone, Debug)]
pub enum Filter {
    /// Implicit `equal` against a raw value
    Scalar(CellValue),
    /// Operator name → operand pairs; all must hold
    Conditions(Vec<(String, Operand)>),
}

impl Filter {
    /// Resolves operator names and checks operand shapes.
    pub(crate) fn compile(&self) -> Result<Vec<Condition>> {
        match self {
            Filter::Scalar(value) => {
                Ok(vec![Condition::new(Operator::Equal, Operand::Value(value.clone()))?])
            }
            Filter::Conditions(conditions) => conditions
                .iter()
                .map(|(name, operand)| Condition::new(Operator::parse(name)?, operand.clone()))
                .collect(),
        }
    }
}

/// Declarative per-column filter description, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct WhereSpec {
    filters: Vec<(String, Filter)>,
}

impl WhereSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column's filter, replacing any previous one.
    pub fn filter(mut self, column: &str, filter: Filter) -> Self {
        match self.filters.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = filter,
            None => self.filters.push((column.to_owned(), filter)),
        }
        self
    }

    /// Column must loosely equal `value`.
    pub fn equals(self, column: &str, value: impl Into<CellValue>) -> Self {
        self.filter(column, Filter::Scalar(value.into()))
    }

    /// Adds a named condition to the column. Conditions on one column accumulate;
    /// repeating an operator name replaces its operand.
    pub fn condition(mut self, column: &str, operator: &str, operand: impl Into<Operand>) -> Self {
        let operand = operand.into();
        match self.filters.iter_mut().find(|(name, _)| name == column) {
            Some((_, Filter::Conditions(conditions))) => {
                match conditions.iter_mut().find(|(name, _)| name == operator) {
                    Some((_, existing)) => *existing = operand,
                    None => conditions.push((operator.to_owned(), operand)),
                }
            }
            Some((_, existing)) => {
                *existing = Filter::Conditions(vec![(operator.to_owned(), operand)])
            }
            None => {
                let conditions = vec![(operator.to_owned(), operand)];
                self.filters.push((column.to_owned(), Filter::Conditions(conditions)))
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Filter)> {
        self.filters.iter().map(|(column, filter)| (column.as_str(), filter))
    }
}
