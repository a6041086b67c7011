pub mod binding;
pub mod builder;
pub mod condition;

pub use binding::ParamBinding;

use crate::utils::placeholder_safe;

/// SQL text plus every binding it references, ready to hand to the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub sql: String,
    pub bindings: Vec<ParamBinding>,
}

/// Where in a statement a placeholder lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The n-th WHERE condition.
    Condition(usize),
    /// The n-th column of an INSERT column list or UPDATE SET list.
    Assignment(usize),
}

/// Name for the `element`-th placeholder of `column` inside `scope`.
///
/// The scope letter and the numeric prefix alone make every name unique within
/// a statement; the column is only appended to keep the SQL readable.
pub fn placeholder(scope: Scope, column: &str, element: usize) -> String {
    let column = placeholder_safe(column);
    match scope {
        Scope::Condition(clause) => format!(":w{clause}_{element}_{column}"),
        Scope::Assignment(index) => format!(":s{index}_{column}"),
    }
}
