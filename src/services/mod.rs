pub mod aggregate;
pub mod metadata;
pub mod posters;
pub mod similarity;

pub use aggregate::DetailAggregator;
pub use metadata::{MetadataProvider, ProxyMetadataClient};
pub use posters::PosterResolver;
pub use similarity::{BackendClient, RecommendationBackend, SimilarityReply};
