pub mod initialize_vault;
pub mod register_asset;
pub mod lock;
pub mod release;

pub use initialize_vault::*;
pub use register_asset::*;
pub use lock::*;
pub use release::*;
