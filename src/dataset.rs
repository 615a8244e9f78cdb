/// CSV ingestion into labeled tables
pub mod csv_reader;
/// Numerical / categorical partition of feature columns
pub mod schema;
/// File layout and constants of the online shoppers purchasing intention dataset
pub mod shoppers;
/// Named-column numeric tables
pub mod table;

pub use csv_reader::*;
pub use schema::*;
pub use shoppers::*;
pub use table::*;
