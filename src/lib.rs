//! Headless, physics-driven scroll-view controller for virtualized lists.
//!
//! `scrollview` owns the scrolling model only: a 1-D particle under drag and
//! spring forces, an anchor into an [`ItemSequence`], and the translation of
//! raw touch/wheel input into scroll forces. It renders nothing and never
//! measures items itself; the host supplies an [`ItemMeasure`] per handle
//! and reads item placements back after each [`commit`](ScrollView::commit).
//!
//! The model follows the mobile scrolling idiom: momentum with exponential
//! decay, rubber-banding while dragging past an edge, springs that settle
//! the view exactly on boundaries or page edges, and window normalization
//! that keeps the anchor near the viewport so offsets never grow without
//! bound.
//!
//! ```
//! use std::sync::Arc;
//! use scrollview::{ItemMeasure, NodeId, ScrollView, ScrollViewOptions, VecSequence};
//!
//! let sequence: VecSequence<&str> = ["a", "b", "c"].into_iter().collect();
//! let first = sequence.first_handle();
//! let options = ScrollViewOptions::new(Arc::new(|_: &NodeId| ItemMeasure::known(100.0)));
//! let mut view = ScrollView::new(sequence, options);
//! view.set_anchor(first);
//! view.commit(500.0, 0.0);
//! view.for_each_placed_item(|item| {
//!     println!("{:?} at {}", item.handle, item.position);
//! });
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the plain data types.
//! - `tracing`: emits `trace`/`debug` events under the `scrollview` target.

#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod bounds;
mod force;
mod gesture;
mod navigation;
mod options;
mod physics;
mod scrollview;
mod sequence;
mod types;
mod window;

pub use gesture::{TouchPoint, WheelDelta};
pub use options::{MeasureFn, ScrollCallback, ScrollViewOptions};
pub use scrollview::ScrollView;
pub use sequence::{ItemSequence, NodeId, VecSequence};
pub use types::{
    Axis, BoundsReached, ItemMeasure, PlacedItem, ScrollPhase, SpringSource, SpringTarget,
};

#[cfg(test)]
mod tests;
