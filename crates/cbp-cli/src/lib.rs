//! Library side of the `cbp-clinical` command.

pub mod cli;
pub mod logging;
pub mod pipeline;
pub mod types;
