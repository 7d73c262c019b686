//! Cell content and value types

use cellflow_core::CellName;
use cellflow_formula::{EvalError, Expression, FormulaResult, FormulaValue};
use std::fmt;

/// What a user put into a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    /// No content; an empty cell is absent from the sheet
    #[default]
    Empty,

    /// A number
    Number(f64),

    /// Plain text
    Text(String),

    /// A formula, entered with a leading `=`
    Formula(Expression),
}

impl CellContent {
    /// Classify user input
    ///
    /// - an empty string is [`CellContent::Empty`]
    /// - anything that parses as a finite number (surrounding whitespace
    ///   allowed) is [`CellContent::Number`]
    /// - text starting with `=` is a formula; the rest must parse
    /// - everything else is [`CellContent::Text`]
    ///
    /// # Example
    /// ```rust
    /// use cellflow::CellContent;
    ///
    /// assert_eq!(CellContent::classify("2.50").unwrap(), CellContent::Number(2.5));
    /// assert_eq!(CellContent::classify("hi").unwrap(), CellContent::Text("hi".into()));
    /// assert!(CellContent::classify("=a1+1").unwrap().is_formula());
    /// assert!(CellContent::classify("=1+").is_err());
    /// ```
    pub fn classify(text: &str) -> FormulaResult<Self> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        if let Ok(n) = text.trim().parse::<f64>() {
            if n.is_finite() {
                return Ok(CellContent::Number(n));
            }
        }
        match text.strip_prefix('=') {
            Some(formula) => Ok(CellContent::Formula(Expression::parse(formula)?)),
            None => Ok(CellContent::Text(text.to_string())),
        }
    }

    /// Check if the content is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Check if the content is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// Get the number, if the content is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellContent::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text, if the content is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellContent::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the expression, if the content is a formula
    pub fn as_formula(&self) -> Option<&Expression> {
        match self {
            CellContent::Formula(expr) => Some(expr),
            _ => None,
        }
    }

    /// Cells this content reads; empty unless it is a formula
    pub fn variables(&self) -> impl Iterator<Item = &CellName> + '_ {
        self.as_formula()
            .into_iter()
            .flat_map(|expr| expr.variables().iter())
    }
}

/// The string form of content: what [`CellContent::classify`] turns back
/// into the same content
impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Empty => Ok(()),
            CellContent::Number(n) => write!(f, "{n}"),
            CellContent::Text(s) => f.write_str(s),
            CellContent::Formula(expr) => write!(f, "={expr}"),
        }
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<Expression> for CellContent {
    fn from(expr: Expression) -> Self {
        CellContent::Formula(expr)
    }
}

/// The cached result of a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Never computed (the cell has no content)
    #[default]
    Unset,

    /// A number
    Number(f64),

    /// Text
    Text(String),

    /// A formula that could not produce a number
    Error(EvalError),
}

impl CellValue {
    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is unset
    pub fn is_unset(&self) -> bool {
        matches!(self, CellValue::Unset)
    }

    /// Check if the value is an evaluation error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Get the error if this is one
    pub fn get_error(&self) -> Option<&EvalError> {
        match self {
            CellValue::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::Error(e) => CellValue::Error(e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Unset => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "#ERROR: {e}"),
        }
    }
}

/// A non-empty cell: content plus its cached value
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) content: CellContent,
    pub(crate) value: CellValue,
}

impl Cell {
    pub(crate) fn new(content: CellContent) -> Self {
        Self {
            content,
            value: CellValue::Unset,
        }
    }

    /// The cell's content
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// The cell's cached value
    pub fn value(&self) -> &CellValue {
        &self.value
    }
}
