pub mod initialize;
pub mod register_ledger;
pub mod request_mint;
pub mod initiate_withdraw;
pub mod settle_withdraw;
pub mod create_metadata;

pub use initialize::*;
pub use register_ledger::*;
pub use request_mint::*;
pub use initiate_withdraw::*;
pub use settle_withdraw::*;
pub use create_metadata::*;
