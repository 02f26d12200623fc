/// A forward-and-backward-iterable handle into the host's item sequence.
///
/// The sequence may be infinite or lazily produced; the controller never
/// assumes it can enumerate all items. Handles must be cheap to copy and
/// compare with stable identity: two handles are equal iff they refer to the
/// same item.
///
/// Cyclic sequences are allowed; searches that walk the sequence guard
/// against wrapping past their starting point.
pub trait ItemSequence {
    type Handle: Copy + PartialEq + core::fmt::Debug;

    /// The item after `handle`, or `None` at the end of the sequence.
    fn next(&self, handle: Self::Handle) -> Option<Self::Handle>;

    /// The item before `handle`, or `None` at the start of the sequence.
    fn previous(&self, handle: Self::Handle) -> Option<Self::Handle>;
}

/// An arena-backed handle for [`VecSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A simple finite sequence over a `Vec` arena.
///
/// Handles are indexes into the arena; they stay valid across `push` (items
/// are never removed or reordered), which makes them safe to hold across
/// ticks.
#[derive(Clone, Debug, Default)]
pub struct VecSequence<T> {
    items: Vec<T>,
}

impl<T> VecSequence<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) -> NodeId {
        let id = NodeId(self.items.len());
        self.items.push(item);
        id
    }

    pub fn get(&self, handle: NodeId) -> Option<&T> {
        self.items.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: NodeId) -> Option<&mut T> {
        self.items.get_mut(handle.0)
    }

    /// Handle for the item at `index`, if it exists.
    pub fn handle(&self, index: usize) -> Option<NodeId> {
        (index < self.items.len()).then_some(NodeId(index))
    }

    pub fn first_handle(&self) -> Option<NodeId> {
        self.handle(0)
    }

    pub fn last_handle(&self) -> Option<NodeId> {
        self.items.len().checked_sub(1).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> FromIterator<T> for VecSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> ItemSequence for VecSequence<T> {
    type Handle = NodeId;

    fn next(&self, handle: NodeId) -> Option<NodeId> {
        let next = handle.0.checked_add(1)?;
        (next < self.items.len()).then_some(NodeId(next))
    }

    fn previous(&self, handle: NodeId) -> Option<NodeId> {
        handle.0.checked_sub(1).map(NodeId)
    }
}
