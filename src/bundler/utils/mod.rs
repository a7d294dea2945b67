//! Helpers shared by the packaging stages.

pub mod fs;
pub mod http;
pub mod process;
pub mod text;
