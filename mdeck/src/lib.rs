//! Expose mdeck's internal API for use in unit testing. It is not meant to be
//! used as a library; depend on `mdeck-engine` instead.
pub mod cli;
pub mod init;
pub mod render;
