pub mod decode;
pub mod encode;
pub mod schema;

pub use decode::parse_titles;
pub use encode::{encode, export_filename};
pub use schema::CsvSchema;
