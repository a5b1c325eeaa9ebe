//! Library side of the `fieldmap` command-line tool.

pub mod input;
pub mod logging;
pub mod pipeline;
pub mod report;
