pub mod account;
pub mod movement;
pub mod period;

pub use account::{Account, CURRENT_SCHEMA_VERSION};
pub use movement::{BalanceScope, Movement, MovementSet, Resource, Split};
pub use period::Period;
