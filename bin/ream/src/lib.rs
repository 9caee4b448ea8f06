pub mod cli;
pub mod clock;
