use crate::force::round_offset;
use crate::window::ItemWindow;
use crate::{BoundsReached, SpringSource};

/// A pending programmatic scroll request.
///
/// Cleared when the target is reached, when a boundary blocks further motion
/// in the requested direction, or when a newer request supersedes it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GoToRequest<H> {
    pub target: H,
    pub toward_next: bool,
}

/// Computes the scroll-to spring for an in-flight go-to request.
///
/// The materialized window is searched forward from the anchor first,
/// falling back to a backward search. When the target is outside the window
/// the spring is nudged one full viewport extent in the requested direction,
/// so the window advances until the target becomes reachable.
pub(crate) fn plan_scroll_to<H: Copy + PartialEq>(
    request: &mut Option<GoToRequest<H>>,
    window: &ItemWindow<H>,
    bounds: BoundsReached,
    offset: f64,
    extent: f64,
    rounding: f64,
) -> Option<(f64, SpringSource)> {
    let req = (*request)?;

    let blocked = bounds == BoundsReached::Both
        || (!req.toward_next && bounds == BoundsReached::Start)
        || (req.toward_next && bounds == BoundsReached::End);
    if blocked {
        svdebug!(toward_next = req.toward_next, "go-to blocked by bounds");
        *request = None;
        return None;
    }

    let mut found = None;

    let mut acc = 0.0;
    for item in &window.after {
        let Some(length) = item.length else {
            break;
        };
        if item.handle == req.target {
            found = Some(acc);
            break;
        }
        acc -= length;
    }

    if found.is_none() {
        let mut acc = 0.0;
        for item in &window.before {
            let Some(length) = item.length else {
                break;
            };
            acc += length;
            if item.handle == req.target {
                found = Some(acc);
                break;
            }
        }
    }

    if let Some(target_offset) = found {
        if round_offset(target_offset, rounding) == round_offset(offset, rounding) {
            *request = None;
        }
        return Some((target_offset, SpringSource::GoToItem));
    }

    if req.toward_next {
        Some((offset - extent, SpringSource::GoToNextDirection))
    } else {
        Some((offset + extent, SpringSource::GoToPrevDirection))
    }
}

/// Finds the page boundary to dock against the viewport's leading edge.
///
/// The caller has already checked the preconditions (pagination enabled, no
/// active force, kinetic energy under the threshold, no other spring set).
/// Walks backward from the anchor looking for the page containing the edge;
/// when the edge is at or before the anchor, walks forward instead. Docks
/// whichever neighboring boundary is closer; ties go to the previous one.
pub(crate) fn snap_to_page<H: Copy>(
    window: &ItemWindow<H>,
    offset: f64,
    extent: f64,
    reverse: bool,
) -> Option<(f64, SpringSource)> {
    let edge = if reverse { extent } else { 0.0 };

    let mut page_offset = offset;
    let mut page_length: Option<f64> = None;
    let mut has_next = false;

    for item in &window.before {
        let Some(length) = item.length else {
            break;
        };
        if length == 0.0 {
            continue;
        }
        if page_offset <= edge {
            break;
        }
        has_next = page_length.is_some();
        page_length = Some(length);
        page_offset -= length;
    }

    if page_length.is_none() {
        for item in &window.after {
            let Some(length) = item.length else {
                break;
            };
            if length == 0.0 {
                continue;
            }
            has_next = page_length.is_some();
            if let Some(prev_length) = page_length {
                if page_offset + prev_length > edge {
                    break;
                }
                page_offset += prev_length;
            }
            page_length = Some(length);
        }
    }

    let page_length = page_length.filter(|&l| l != 0.0)?;

    let edge_offset = page_offset - edge;
    if !has_next || edge_offset.abs() <= (edge_offset + page_length).abs() {
        Some(((offset - page_offset) + edge, SpringSource::SnapPrev))
    } else {
        Some((
            (offset - (page_offset + page_length)) + edge,
            SpringSource::SnapNext,
        ))
    }
}

/// Returns the first item whose visible fraction meets `threshold`.
///
/// Walks forward from the anchor when the anchor's edge is at or above the
/// viewport's leading edge, backward otherwise. An unmeasurable item ends
/// the walk.
pub(crate) fn first_visible_item<H: Copy>(
    window: &ItemWindow<H>,
    offset: f64,
    threshold: f64,
) -> Option<H> {
    let slack = 1.0 - threshold.clamp(0.0, 1.0);

    if offset <= 0.0 {
        let mut position = offset;
        for item in &window.after {
            let length = item.length?;
            if position >= 0.0 {
                return Some(item.handle);
            }
            let hidden = -position;
            if hidden <= slack * length {
                return Some(item.handle);
            }
            position += length;
        }
        return None;
    }

    // The anchor's edge is below the leading edge; earlier items are showing.
    let mut position = offset;
    let mut candidate = window.after.first().map(|item| item.handle);
    for item in &window.before {
        let Some(length) = item.length else {
            break;
        };
        position -= length;
        if position <= 0.0 {
            let hidden = -position;
            if hidden <= slack * length {
                return Some(item.handle);
            }
            return candidate;
        }
        candidate = Some(item.handle);
    }
    candidate
}
