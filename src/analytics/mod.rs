pub mod engine;
pub mod pool;
pub(crate) mod ranking;
pub mod statistics;
