//! Reading the input datasets and writing query results to disk.

pub mod error;
pub mod loader;
pub mod naming;
pub mod writer;

pub use error::ReportError;
pub use loader::load;
pub use naming::{TIMESTAMP_FORMAT, output_file_name, output_path, prepare_output_dir};
pub use writer::write;
