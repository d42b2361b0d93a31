#![deny(missing_docs)]

//! File collaborators for spgen: trajectory loading, `.sp` table output and
//! JSON run reports.

mod load;
mod report;
mod write;

pub use load::{load_csv, read_trajectory, strip_label, Trajectory};
pub use report::{
    hash_file, to_canonical_json_bytes, write_report, RunReport, REPORT_SCHEMA,
};
pub use write::{format_general, render_plain_table, write_plain_table};
