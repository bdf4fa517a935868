use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error(transparent)]
    InvalidSize(#[from] catalog::InvalidSize),

    #[error("your cart is empty")]
    EmptyCart,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
