pub mod fetch;
pub mod location;
pub mod metric;
pub mod observation;
pub mod result;
