//! Shared test utilities

pub mod advertisement;
pub mod fetcher;

#[allow(unused_imports)]
pub use advertisement::*;
#[allow(unused_imports)]
pub use fetcher::*;
