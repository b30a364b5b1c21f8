//! In-process cache over the Book collection.
//!
//! Three independent slots front the document store:
//!
//! - `books`: snapshot of the full collection, created lazily on the first
//!   list-read miss and patched by [`BookCacheSync`] on every book write.
//! - `book`: the single most-recently-fetched book (detail-read misses).
//! - `top_rated`: top-3-by-rating snapshot.
//!
//! The slots are deliberately uncoordinated: write-path maintenance patches
//! `books` only, so `book` and `top_rated` can serve stale data until they
//! are overwritten or the store is reset. Entries have no TTL and no size
//! bound; they live for the process lifetime.

mod lock;
mod store;
mod sync;

pub use store::BookCacheStore;
pub use sync::BookCacheSync;
