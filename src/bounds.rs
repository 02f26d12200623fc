use crate::{BoundsReached, SpringSource};

/// Boundary detection for one layout pass.
///
/// `length_before`/`length_after` are the cumulative rendered lengths of the
/// materialized items before and from the anchor (the anchor belongs to the
/// "after" side); `None` when any item on that side cannot be measured yet,
/// which makes the corresponding check unknowable and skips it.
///
/// Checks run in order, first match wins:
/// 1. minimum-content bound (total content fits in the viewport)
/// 2. primary-direction bound (start edge, or end edge in reverse mode)
/// 3. secondary-direction bound
///
/// The returned spring position pins the view exactly at the matched
/// boundary; `None` when no bound is reached.
pub(crate) fn detect(
    extent: f64,
    offset: f64,
    length_before: Option<f64>,
    length_after: Option<f64>,
    reverse: bool,
) -> (BoundsReached, Option<f64>, SpringSource) {
    // Content smaller than the viewport pins both edges; this outranks the
    // directional checks so a zero-length before side at offset 0 cannot
    // read as a plain start bound.
    if let (Some(before), Some(after)) = (length_before, length_after) {
        if before + after <= extent {
            let pin = if reverse { -after } else { before };
            return (BoundsReached::Both, Some(pin), SpringSource::MinSize);
        }
    }

    if reverse {
        if let Some(after) = length_after {
            if offset + after <= 0.0 {
                return (BoundsReached::End, Some(-after), SpringSource::EndBounds);
            }
        }
    } else if let Some(before) = length_before {
        if offset - before >= 0.0 {
            return (
                BoundsReached::Start,
                Some(before),
                SpringSource::StartBounds,
            );
        }
    }

    if reverse {
        if let Some(before) = length_before {
            if offset - before >= -extent {
                return (
                    BoundsReached::Start,
                    Some(-extent + before),
                    SpringSource::StartBounds,
                );
            }
        }
    } else if let Some(after) = length_after {
        if offset + after <= extent {
            return (
                BoundsReached::End,
                Some(extent - after),
                SpringSource::EndBounds,
            );
        }
    }

    (BoundsReached::None, None, SpringSource::None)
}
