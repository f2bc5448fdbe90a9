// finql library - validated read-only sql over a statement database

pub mod cli;
mod core;
mod error;
mod output;
mod server;

pub use core::{
    ColumnInfo, QueryResult, Statement, StatementStatistics, Store, Summary, Validation,
    data_summary,
};
pub use error::Error;
pub use server::Server;
