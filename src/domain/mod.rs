mod ledger;
mod money;
mod schedule;
mod transaction;
mod undo;

pub use ledger::*;
pub use money::*;
pub use schedule::*;
pub use transaction::*;
pub use undo::*;
