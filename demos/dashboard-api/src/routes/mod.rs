pub mod members;
pub mod stats;
pub mod trades;
