use std::sync::Arc;

use crate::sequence::ItemSequence;
use crate::types::ItemMeasure;

/// One materialized item plus its measurement for this tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WindowItem<H> {
    pub handle: H,
    pub length: Option<f64>,
    pub true_size_requested: bool,
}

impl<H> WindowItem<H> {
    /// Length usable for bounds/normalization; `None` when the item blocks
    /// reasoning across it.
    pub(crate) fn settled_length(&self) -> Option<f64> {
        if self.true_size_requested {
            None
        } else {
            self.length
        }
    }
}

/// The materialized window of items around the anchor.
///
/// Rebuilt every layout pass by walking the sequence outward from the
/// anchor: forward until two viewport extents of measured content have been
/// covered, backward until one extent, i.e. the window
/// `[offset - extent, offset + 2*extent]` around the anchor position. An
/// unmeasurable item is still included (the host needs to see it to measure
/// it) but stops further extension on its side.
#[derive(Clone, Debug)]
pub(crate) struct ItemWindow<H> {
    /// Items from the anchor forward; the anchor is first.
    pub after: Vec<WindowItem<H>>,
    /// Items before the anchor, nearest first.
    pub before: Vec<WindowItem<H>>,
}

impl<H: Copy + PartialEq> ItemWindow<H> {
    pub(crate) fn new() -> Self {
        Self {
            after: Vec::new(),
            before: Vec::new(),
        }
    }

    pub(crate) fn build<S>(
        &mut self,
        seq: &S,
        anchor: Option<H>,
        extent: f64,
        measure: &Arc<dyn Fn(&H) -> ItemMeasure + Send + Sync>,
    ) where
        S: ItemSequence<Handle = H>,
    {
        self.after.clear();
        self.before.clear();

        let Some(anchor) = anchor else {
            return;
        };

        let mut covered = 0.0;
        let mut handle = anchor;
        loop {
            let m = measure(&handle);
            self.after.push(WindowItem {
                handle,
                length: m.length,
                true_size_requested: m.true_size_requested,
            });
            let Some(length) = m.length else {
                break;
            };
            covered += length;
            if covered >= 2.0 * extent {
                break;
            }
            match seq.next(handle) {
                Some(next) if next != anchor => handle = next,
                _ => break,
            }
        }

        let mut covered = 0.0;
        let mut handle = anchor;
        while let Some(prev) = seq.previous(handle) {
            if prev == anchor {
                break;
            }
            let m = measure(&prev);
            self.before.push(WindowItem {
                handle: prev,
                length: m.length,
                true_size_requested: m.true_size_requested,
            });
            let Some(length) = m.length else {
                break;
            };
            covered += length;
            if covered >= extent {
                break;
            }
            handle = prev;
        }
    }

    /// Cumulative settled length of the items before the anchor, `None` when
    /// any of them is unknown.
    pub(crate) fn length_before(&self) -> Option<f64> {
        Self::total(&self.before)
    }

    /// Cumulative settled length of the anchor and the items after it,
    /// `None` when any of them is unknown.
    pub(crate) fn length_after(&self) -> Option<f64> {
        Self::total(&self.after)
    }

    fn total(items: &[WindowItem<H>]) -> Option<f64> {
        let mut sum = 0.0;
        for item in items {
            sum += item.settled_length()?;
        }
        Some(sum)
    }
}
