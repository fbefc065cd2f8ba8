//! SmartSite Feature Screening
//!
//! Sorts free-text feature requests into one of three buckets:
//!
//! ```text
//! description ──► keyword match ──hit──► category of matched module
//!                      │
//!                     miss
//!                      ▼
//!              completion backend ──► registry lookup ──miss──► wishlist
//! ```
//!
//! Wishlist items are optionally forwarded to an external collection
//! endpoint. The completion backend and the wishlist sink are traits so
//! callers (and tests) inject their own clients.

pub mod completion;
mod error;
pub mod registry;
pub mod screener;
pub mod wishlist;

pub use completion::{CompletionBackend, CompletionRequest, OpenAiClient};
pub use error::{
    ClassificationError, CompletionError, RegistryError, ScreenerBuildError, WishlistError,
};
pub use registry::{ModuleCategory, ModuleRegistry};
pub use screener::{
    response_for_category, Classification, FeatureScreener, ScreeningConfig, ScreeningOutcome,
};
pub use wishlist::{HttpWishlistSink, RequestKind, WishlistItem, WishlistSink};
