// * Network layer: page fetching with bounded retries

pub mod errors;
pub mod fetcher;

pub use errors::NetworkError;
pub use fetcher::{FetcherConfig, PageFetcher};
