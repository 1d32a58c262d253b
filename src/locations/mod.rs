pub mod directory;
pub mod error;
pub mod region;
