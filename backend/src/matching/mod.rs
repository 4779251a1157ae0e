//! Header discovery: fuzzy scoring, candidate rows and field mapping.

pub mod fuzzy;
pub mod header;
pub mod schema;

pub use fuzzy::{weighted_ratio, Similarity, WeightedRatio};
pub use header::locate_header_candidates;
pub use schema::{match_schema, SchemaMatch};
