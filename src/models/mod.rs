pub mod amount;
pub mod member;
pub mod snapshot;
pub mod stats;
pub mod trade;

pub use amount::*;
pub use member::*;
pub use snapshot::*;
pub use stats::*;
pub use trade::*;
