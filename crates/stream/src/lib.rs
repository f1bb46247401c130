//! Named, shaped `f32` buffers shared between the predictive-filter core
//! and its host.
//!
//! A [`Stream`] is a flat float buffer with per-axis shape metadata, a
//! single-writer advisory write flag, and two monotonic counters: a
//! semaphore-style post count (consumers woken) and an update count
//! (completed publications). A [`StreamStore`] resolves streams by name
//! with either fail-fast or warn-and-fall-back semantics, and creates
//! streams with an explicit shape or the shape of an existing stream.
//!
//! # Quick start
//!
//! ```
//! use presage_stream::StreamStore;
//!
//! let mut store = StreamStore::new();
//! store.create("outPF", &[5, 1]).unwrap();
//!
//! let out = store.resolve_mut("outPF").unwrap();
//! out.begin_write();
//! out.as_mut_slice()[0] = 1.5;
//! out.post();
//! out.end_write();
//! out.increment_count();
//!
//! assert_eq!(out.update_count(), 1);
//! ```

mod error;
mod store;
mod stream;

pub use error::StreamError;
pub use store::StreamStore;
pub use stream::Stream;
