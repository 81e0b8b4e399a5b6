// Moving ledger data out to files
pub mod export;

pub use export::*;
