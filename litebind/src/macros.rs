/// Builds a `Vec<Assignment>` for INSERT and UPDATE from `column = value` pairs.
///
/// # Example
///
/// ```
/// use litebind::prelude::*;
///
/// let assignments = kwargs!(id = 2, name = "Bob", age = 25);
/// assert_eq!(assignments[1].column, "name");
/// ```
#[macro_export]
macro_rules! kwargs {
    ($($field:ident = $value:expr),* $(,)?) => {
        vec![
            $(
                $crate::db::query::builder::Assignment::new(stringify!($field), $value),
            )*
        ]
    };
}

/// Builds a `Result<Condition>` from `column <op> value`.
///
/// Supported operators: `=`, `==`, `!=`, `<`, `<=`, `>`, `>=`. Use a
/// `table.column` path for qualified columns.
///
/// # Example
///
/// ```
/// use litebind::prelude::*;
///
/// let adult = cond!(age >= 18).unwrap();
/// assert_eq!(adult.operator(), Operator::GreaterThanOrEqual);
/// let owner = cond!(users.id == 7).unwrap();
/// assert_eq!(owner.column(), "users.id");
/// ```
#[macro_export]
macro_rules! cond {
    ($table:ident.$column:ident $op:tt $value:expr) => {
        $crate::cond!(@build format!("{}.{}", stringify!($table), stringify!($column)), $op, $value)
    };

    ($field:ident $op:tt $value:expr) => {
        $crate::cond!(@build stringify!($field), $op, $value)
    };

    (@build $column:expr, $op:tt, $value:expr) => {
        match stringify!($op).parse::<$crate::db::query::condition::Operator>() {
            Ok(operator) => $crate::db::query::condition::Condition::new(
                $column,
                operator,
                $crate::types::Value::from($value),
            ),
            Err(err) => Err(err),
        }
    };
}
