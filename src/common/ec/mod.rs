mod block;
mod encoder;
mod galois;
mod poly;

pub use block::*;
pub use encoder::*;

// Largest ecc codeword count of a block across all QR versions
pub const MAX_EC_SIZE: usize = 30;
