pub use super::db::query::builder::Assignment;
pub use super::db::query::condition::{Condition, Operand, Operator};
pub use super::db::query::ParamBinding;
pub use super::db::row::{ResultSet, Row};
pub use super::types::{ParamType, Value};
pub use super::{cond, kwargs};
pub use super::{Config, Connection, Error, Result};
