/// The scroll axis, used to pick the relevant component out of 2-D input
/// (touch positions, wheel delta pairs).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub(crate) fn component(self, point: [f64; 2]) -> f64 {
        match self {
            Self::Horizontal => point[0],
            Self::Vertical => point[1],
        }
    }

    /// 0 for horizontal, 1 for vertical; used by the touch direction filter.
    pub(crate) fn as_direction(self) -> f64 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 1.0,
        }
    }
}

/// Which content edges are currently exposed at the viewport edge.
///
/// `Both` means the total content is smaller than the viewport, so both edges
/// are pinned at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundsReached {
    #[default]
    None,
    Start,
    End,
    Both,
}

impl BoundsReached {
    pub fn reached_start(self) -> bool {
        matches!(self, Self::Start | Self::Both)
    }

    pub fn reached_end(self) -> bool {
        matches!(self, Self::End | Self::Both)
    }

    pub fn any(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Who set the active spring target.
///
/// At most one source wins per layout pass, in strict priority order:
/// bounds (`StartBounds`/`EndBounds`/`MinSize`) over scroll-to
/// (`GoToItem`/`GoToPrevDirection`/`GoToNextDirection`) over pagination
/// snapping (`SnapPrev`/`SnapNext`). Later writers only run when the earlier
/// ones left the target unset, except scroll-to, which may override a
/// bounds spring that does not block its direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpringSource {
    #[default]
    None,
    StartBounds,
    EndBounds,
    MinSize,
    GoToItem,
    GoToPrevDirection,
    GoToNextDirection,
    SnapPrev,
    SnapNext,
}

/// The position the physics spring pulls the particle toward.
///
/// `position: None` disables the spring force entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringTarget {
    pub position: Option<f64>,
    pub source: SpringSource,
}

/// The phase reported to the scroll-delta transform callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPhase {
    /// A wheel/trackpad tick about to be applied via `scroll`.
    Wheel,
    /// A touch gesture began (delta is always 0 here).
    Start,
    /// A touch drag moved; delta is the accumulated axis offset since start.
    Move,
    /// The last touch lifted; delta is the final offset, velocity is set.
    End,
}

/// Per-item measurement supplied by the host.
///
/// `length: None` means the item cannot be measured yet; bounds checks and
/// window normalization treat it as unknown and skip past it conservatively.
/// `true_size_requested` marks an item whose current length is a stale
/// estimate awaiting a precise re-measurement; it blocks normalization the
/// same way an unknown length does.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemMeasure {
    pub length: Option<f64>,
    pub true_size_requested: bool,
}

impl ItemMeasure {
    pub fn known(length: f64) -> Self {
        Self {
            length: Some(length),
            true_size_requested: false,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

/// A materialized item with its placement for the current tick.
///
/// `position` is the item's leading edge in viewport space (0 is the
/// viewport's leading edge). In reverse mode items stack toward the start
/// edge instead, and `position` still refers to the item's leading edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedItem<H> {
    pub handle: H,
    pub position: f64,
    pub length: Option<f64>,
}
