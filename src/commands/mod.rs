pub mod config;
pub mod generate;
pub mod locate;
pub mod preview;
