// core logic - query gate, statement store, and summaries

mod store;
mod summary;
mod validate;

pub use store::{ColumnInfo, QueryResult, Statement, StatementStatistics, Store};
pub use summary::{Summary, data_summary};
pub use validate::Validation;
