//! Command workflows wired to the terminal.

pub mod orchestration;
