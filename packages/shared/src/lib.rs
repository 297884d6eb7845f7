//! Utilities shared by the Parlor binaries: logging setup and clocks.

pub mod logger;
pub mod time;
