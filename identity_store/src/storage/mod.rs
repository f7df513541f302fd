mod database;
mod params;
mod row;
mod schema;

pub use database::Database;
pub use params::{Params, SqlValue};
pub use row::{DbRow, FromDbRow};

pub(crate) use row::{format_timestamp, non_empty, parse_flag, parse_timestamp};
