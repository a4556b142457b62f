//! Query modules for the trades SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes typed results.

pub mod members;
pub mod stats;
pub mod trades;

pub use members::MemberQuery;
pub use stats::StatsQuery;
pub use trades::TradeQuery;
