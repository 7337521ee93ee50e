use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pubkey {0:?}")]
    InvalidPubkey(String),

    #[error("account data is not hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("chain {chain_id}: account #{index} is neither an asset vault nor a mint ledger")]
    UnknownAccount { chain_id: u64, index: usize },

    #[error("chain {0} appears in more than one snapshot")]
    DuplicateChain(u64),
}

pub type Result<T> = std::result::Result<T, ReconcilerError>;
