//! Pure, synchronous transforms over schedule collections.
//!
//! Nothing in here touches the network or suspends; controllers call into
//! these between request completion and state update.

pub mod merge_key;
pub mod reconcile;
pub mod selection;

pub use merge_key::{derive_merge_key, MERGE_KEY_SEPARATOR};
pub use reconcile::reconcile;
pub use selection::{selected_keys, toggle};
