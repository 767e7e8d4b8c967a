//! Response compression layer.

use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{And, DefaultPredicate, NotForContentType, Predicate};

/// Predicate used by [`build_compression_layer`].
pub type CompressionPredicate = And<DefaultPredicate, NotForContentType>;

/// Gzip for JSON and static text; video streams are sent as is.
pub fn build_compression_layer() -> CompressionLayer<CompressionPredicate> {
    CompressionLayer::new()
        .compress_when(DefaultPredicate::new().and(NotForContentType::const_new("video/")))
}
