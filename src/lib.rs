//! Duration histogram filtering for trace and span result lists.
//!
//! The core is [`model::DurationHistogram`]: a fixed-cardinality histogram
//! over the durations of a record list plus an exact inclusive range
//! filter over the same list. [`widgets`] wraps it in egui widgets: a bar
//! chart, a dual-handle range slider, and the [`widgets::DurationFilter`]
//! composite that ties the two together and reports filtered lists to the
//! caller.

pub mod format;
pub mod model;
pub mod themes;
pub mod widgets;

pub use model::{Bucket, DurationHistogram, ListKind, Selection, BUCKET_COUNT};
pub use widgets::DurationFilter;
