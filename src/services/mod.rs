//! Core services: market state, price feed supply and signal computation.

pub mod feed;
pub mod market_store;
pub mod signals;

pub use feed::FeedDriver;
pub use market_store::MarketStore;
pub use signals::compute_signal;
