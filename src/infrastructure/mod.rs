pub mod clock;
pub mod filter_store;
pub mod logger;
pub mod query_codec;
pub mod query_store;

#[cfg(test)]
pub mod test_utils;

pub use clock::*;
pub use filter_store::*;
pub use logger::*;
pub use query_codec::*;
pub use query_store::*;
