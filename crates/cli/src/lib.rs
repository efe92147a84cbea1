//! fonthost CLI - command definitions for the `fonthost` binary.

pub mod cli;
