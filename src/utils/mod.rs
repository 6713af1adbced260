pub mod logger;
pub mod query;

pub use query::{parse_query_param, with_query_flag, Location};
