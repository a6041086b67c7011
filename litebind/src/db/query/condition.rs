//! WHERE conditions and their compilation into SQL fragments.
//!
//! A [`Condition`] is validated when it is built and compiled on demand with
//! the position it takes in the statement, so that two conditions on the same
//! column never produce the same placeholder.

use std::fmt;
use std::str::FromStr;

use super::binding::ParamBinding;
use super::{placeholder, Scope};
use crate::types::{infer_type, Value};
use crate::utils::quote_ident;
use crate::{Error, Result};

/// Comparison operators a condition can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

/// How many values an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    Single,
    Pair,
    List,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
        Operator::NotBetween,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull => Arity::None,
            Operator::Between | Operator::NotBetween => Arity::Pair,
            Operator::In | Operator::NotIn => Arity::List,
            _ => Arity::Single,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = Error;

    /// Parses an operator token, case-insensitively and ignoring extra spaces.
    /// `==` and `<>` are accepted as spellings of `=` and `!=`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        let normalized = normalized.to_ascii_uppercase();
        match normalized.as_str() {
            "==" => return Ok(Operator::Equals),
            "<>" => return Ok(Operator::NotEquals),
            _ => {}
        }
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == normalized)
            .ok_or_else(|| Error::UnsupportedOperator(s.to_string()))
    }
}

/// The value side of a condition as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Scalar(Value),
    List(Vec<Value>),
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Scalar(value)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Operand::List(values)
    }
}

impl Operand {
    /// Builds a list operand from anything iterable.
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    fn shape(&self) -> String {
        match self {
            Operand::None => "no value".to_string(),
            Operand::Scalar(_) => "a single value".to_string(),
            Operand::List(values) => format!("a list of {} values", values.len()),
        }
    }
}

/// A validated `column <operator> value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    column: String,
    operator: Operator,
    values: Vec<Value>,
}

/// SQL fragment and the bindings it references.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCondition {
    pub fragment: String,
    pub bindings: Vec<ParamBinding>,
}

impl Condition {
    /// Builds a condition, checking the operand against the operator's arity.
    ///
    /// Operands of `IS NULL` / `IS NOT NULL` are ignored.
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        operand: impl Into<Operand>,
    ) -> Result<Self> {
        let column = column.into();
        let operand = operand.into();

        let values = match (operator.arity(), operand) {
            (Arity::None, _) => Vec::new(),
            (Arity::Single, Operand::Scalar(value)) => vec![value],
            (Arity::Pair, Operand::List(values)) if values.len() == 2 => values,
            (Arity::List, Operand::List(values)) if !values.is_empty() => values,
            (arity, operand) => {
                let expected = match arity {
                    Arity::Single => "a single value",
                    Arity::Pair => "a pair",
                    _ => "a non-empty list",
                };
                return Err(Error::invalid_argument(format!(
                    "value for '{column} {operator}' must be {expected}, got {}",
                    operand.shape()
                )));
            }
        };

        if let Some(value) = values.iter().find(|v| infer_type(v).is_none()) {
            return Err(Error::invalid_argument(format!(
                "value for '{column} {operator}' cannot be a {}",
                value.kind()
            )));
        }

        Ok(Self {
            column,
            operator,
            values,
        })
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::Equals, value.into())
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::NotEquals, value.into())
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::GreaterThan, value.into())
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::GreaterThanOrEqual, value.into())
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::LessThan, value.into())
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::LessThanOrEqual, value.into())
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::Like, pattern.into())
    }

    pub fn not_like(column: impl Into<String>, pattern: impl Into<Value>) -> Result<Self> {
        Self::new(column, Operator::NotLike, pattern.into())
    }

    pub fn in_list<I, T>(column: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::new(column, Operator::In, Operand::list(values))
    }

    pub fn not_in<I, T>(column: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::new(column, Operator::NotIn, Operand::list(values))
    }

    pub fn between(
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Result<Self> {
        Self::new(
            column,
            Operator::Between,
            Operand::List(vec![low.into(), high.into()]),
        )
    }

    pub fn not_between(
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Result<Self> {
        Self::new(
            column,
            Operator::NotBetween,
            Operand::List(vec![low.into(), high.into()]),
        )
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: Operator::IsNull,
            values: Vec::new(),
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: Operator::IsNotNull,
            values: Vec::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Renders the condition as the `clause`-th condition of a statement.
    pub fn compile(&self, clause: usize) -> CompiledCondition {
        let column = quote_ident(&self.column);
        let token = self.operator.token();

        let bindings: Vec<ParamBinding> = self
            .values
            .iter()
            .enumerate()
            .map(|(element, value)| {
                ParamBinding::prevalidated(
                    placeholder(Scope::Condition(clause), &self.column, element),
                    value.clone(),
                )
            })
            .collect();
        let names: Vec<&str> = bindings.iter().map(ParamBinding::name).collect();

        let fragment = match self.operator.arity() {
            Arity::None => format!("{column} {token}"),
            Arity::Single => format!("{column} {token} {}", names[0]),
            Arity::Pair => format!("{column} {token} {} AND {}", names[0], names[1]),
            Arity::List => format!("{column} {token} ({})", names.join(", ")),
        };

        CompiledCondition { fragment, bindings }
    }
}

/// Compiles `conditions` in order and joins them with `AND`.
///
/// Returns an empty fragment when there are no conditions.
pub fn where_clause(conditions: &[Condition]) -> CompiledCondition {
    let mut fragments = Vec::with_capacity(conditions.len());
    let mut bindings = Vec::new();
    for (clause, condition) in conditions.iter().enumerate() {
        let compiled = condition.compile(clause);
        fragments.push(compiled.fragment);
        bindings.extend(compiled.bindings);
    }

    CompiledCondition {
        fragment: fragments.join(" AND "),
        bindings,
    }
}
