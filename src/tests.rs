use crate::*;

use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_i64(&mut self, start: i64, end_exclusive: i64) -> i64 {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as i64
    }
}

fn uniform_view(count: usize, length: f64) -> ScrollView<VecSequence<usize>> {
    let sequence: VecSequence<usize> = (0..count).collect();
    let measure: MeasureFn<NodeId> = Arc::new(move |_: &NodeId| ItemMeasure::known(length));
    let mut view = ScrollView::new(sequence, ScrollViewOptions::new(measure));
    let first = view.sequence().first_handle();
    view.set_anchor(first);
    view
}

fn view_with_measures(measures: Vec<ItemMeasure>) -> ScrollView<VecSequence<usize>> {
    let sequence: VecSequence<usize> = (0..measures.len()).collect();
    let measure: MeasureFn<NodeId> = Arc::new(move |h: &NodeId| measures[h.index()]);
    let mut view = ScrollView::new(sequence, ScrollViewOptions::new(measure));
    let first = view.sequence().first_handle();
    view.set_anchor(first);
    view
}

fn anchor_at(view: &mut ScrollView<VecSequence<usize>>, index: usize) {
    let handle = view.sequence().handle(index);
    assert!(handle.is_some(), "no item at index {index}");
    view.set_anchor(handle);
}

/// Runs `ticks` commits at 16 ms intervals starting after `from_ms`;
/// returns the final timestamp.
fn settle(
    view: &mut ScrollView<VecSequence<usize>>,
    extent: f64,
    from_ms: f64,
    ticks: u32,
) -> f64 {
    let mut now = from_ms;
    for _ in 0..ticks {
        now += 16.0;
        view.commit(extent, now);
    }
    now
}

fn placement_of(view: &ScrollView<VecSequence<usize>>, index: usize) -> Option<PlacedItem<NodeId>> {
    let handle = view.sequence().handle(index)?;
    let mut found = None;
    view.for_each_placed_item(|item| {
        if item.handle == handle {
            found = Some(item);
        }
    });
    found
}

fn placed_count(view: &ScrollView<VecSequence<usize>>) -> usize {
    let mut count = 0;
    view.for_each_placed_item(|_| count += 1);
    count
}

fn set_paginated(view: &mut ScrollView<VecSequence<usize>>) {
    let mut options = view.options().clone();
    options.paginated = true;
    view.set_options(options);
}

fn set_reverse(view: &mut ScrollView<VecSequence<usize>>) {
    let mut options = view.options().clone();
    options.reverse = true;
    view.set_options(options);
}

#[test]
fn items_place_forward_from_the_anchor() {
    let mut view = uniform_view(10, 100.0);
    view.commit(500.0, 0.0);

    assert_eq!(view.scroll_offset(), 0.0);
    assert_eq!(placed_count(&view), 10);
    for index in 0..10 {
        let item = placement_of(&view, index).unwrap();
        assert_eq!(item.position, index as f64 * 100.0);
        assert_eq!(item.length, Some(100.0));
    }
}

#[test]
fn start_bound_engages_at_rest() {
    let mut view = uniform_view(10, 100.0);
    view.commit(500.0, 0.0);

    assert!(view.bounds_reached().reached_start());
    let spring = view.spring_target();
    assert_eq!(spring.position, Some(0.0));
    assert_eq!(spring.source, SpringSource::StartBounds);
}

#[test]
fn scroll_applies_immediately_mid_content() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    view.commit(400.0, 0.0);
    assert_eq!(view.bounds_reached(), BoundsReached::None);

    view.scroll(-60.0);
    settle(&mut view, 400.0, 0.0, 5);
    assert_eq!(view.scroll_offset(), -60.0);

    view.scroll(25.0);
    settle(&mut view, 400.0, 80.0, 5);
    assert_eq!(view.scroll_offset(), -35.0);
}

#[test]
fn scroll_past_start_is_clamped_by_the_bound() {
    let mut view = uniform_view(10, 100.0);
    view.commit(500.0, 0.0);

    view.scroll(100.0);
    settle(&mut view, 500.0, 0.0, 10);
    assert_eq!(view.scroll_offset(), 0.0);
    assert!(view.bounds_reached().reached_start());
}

#[test]
fn small_content_pins_both_bounds_and_blocks_scrolling() {
    let mut view = uniform_view(3, 50.0);
    view.commit(500.0, 0.0);

    assert_eq!(view.bounds_reached(), BoundsReached::Both);
    assert_eq!(view.spring_target().source, SpringSource::MinSize);
    assert_eq!(view.can_scroll(-40.0), 0.0);
    assert_eq!(view.can_scroll(40.0), 0.0);

    view.scroll(-40.0);
    settle(&mut view, 500.0, 0.0, 20);
    assert_eq!(view.scroll_offset(), 0.0);
}

#[test]
fn overscroll_settles_exactly_on_the_end_bound() {
    let mut view = uniform_view(10, 100.0);
    view.commit(500.0, 0.0);

    view.scroll(-10_000.0);
    settle(&mut view, 500.0, 0.0, 50);

    assert!(view.bounds_reached().reached_end());
    // The last item's trailing edge sits exactly on the viewport's end edge.
    let last = placement_of(&view, 9).unwrap();
    assert_eq!(last.position + last.length.unwrap(), 500.0);
    assert_eq!(view.can_scroll(-50.0), 0.0);
    assert_eq!(view.can_scroll(-1.0), 0.0);
}

#[test]
fn can_scroll_reports_remaining_room() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    view.commit(400.0, 0.0);

    assert_eq!(view.can_scroll(-50.0), -50.0);
    // Room toward earlier content is capped by the materialized window.
    let room = view.can_scroll(10_000.0);
    assert!(room > 0.0);
    assert!(room < 10_000.0);
}

#[test]
fn drag_follows_forces_exactly_mid_content() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    view.commit(400.0, 0.0);

    view.apply_scroll_force(0.0);
    view.update_scroll_force(0.0, -30.0);
    settle(&mut view, 400.0, 0.0, 2);
    assert_eq!(view.scroll_offset(), -30.0);

    view.release_scroll_force(-30.0, 0.0);
    settle(&mut view, 400.0, 32.0, 20);
    assert_eq!(view.scroll_offset(), -30.0);
    assert!(!view.is_scrolling());
}

#[test]
fn nested_scroll_forces_stay_balanced() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    view.commit(400.0, 0.0);

    view.apply_scroll_force(0.0);
    view.update_scroll_force(0.0, -30.0);
    view.apply_scroll_force(-10.0);
    settle(&mut view, 400.0, 0.0, 2);
    // Both held forces contribute to the blended offset.
    assert_eq!(view.scroll_offset(), -40.0);

    // Releasing the second force subtracts its contribution only; the first
    // one still holds the view.
    view.release_scroll_force(-10.0, 0.0);
    settle(&mut view, 400.0, 32.0, 2);
    assert_eq!(view.scroll_offset(), -30.0);
    assert!(view.is_scrolling());

    // The last release folds the remainder into the particle.
    view.release_scroll_force(-30.0, 0.0);
    settle(&mut view, 400.0, 64.0, 20);
    assert_eq!(view.scroll_offset(), -30.0);
    assert!(!view.is_scrolling());
}

#[test]
fn rubber_band_halves_a_drag_past_the_start() {
    let mut view = uniform_view(10, 100.0);
    view.commit(500.0, 0.0);

    view.apply_scroll_force(0.0);
    view.update_scroll_force(0.0, 100.0);
    settle(&mut view, 500.0, 0.0, 2);
    // Averaged with the boundary spring at 0: (0 + 100 + 0) / 2.
    assert_eq!(view.scroll_offset(), 50.0);

    view.release_scroll_force(100.0, 0.0);
    settle(&mut view, 500.0, 32.0, 300);
    assert_eq!(view.scroll_offset(), 0.0);
    assert!(view.bounds_reached().reached_start());
}

#[test]
fn released_drag_coasts_and_settles_on_the_start_bound() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    view.commit(400.0, 0.0);

    let down = [TouchPoint {
        id: 1,
        position: [0.0, 100.0],
    }];
    view.touch_start(&down, &down, 0.0);
    let moved = [TouchPoint {
        id: 1,
        position: [0.0, 160.0],
    }];
    view.touch_move(&moved, 16.0);
    view.commit(400.0, 16.0);
    assert_eq!(view.scroll_offset(), 60.0);

    let moved = [TouchPoint {
        id: 1,
        position: [0.0, 220.0],
    }];
    view.touch_move(&moved, 32.0);
    view.touch_end(&moved);
    assert!(view.is_scrolling());

    settle(&mut view, 400.0, 32.0, 1200);
    assert_eq!(view.scroll_offset(), 0.0);
    assert!(view.bounds_reached().reached_start());
    assert_eq!(view.first_visible_item(), view.sequence().handle(0));
    assert!(!view.is_scrolling());
}

#[test]
fn off_axis_touch_travel_does_not_scroll() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    let mut options = view.options().clone();
    options.touch_direction_threshold = Some(0.3);
    view.set_options(options);
    view.commit(400.0, 0.0);

    let down = [TouchPoint {
        id: 1,
        position: [0.0, 100.0],
    }];
    view.touch_start(&down, &down, 0.0);

    // A mostly horizontal drag on a vertical axis: the sample is dropped
    // and no part of it leaks into the scroll offset.
    let moved = [TouchPoint {
        id: 1,
        position: [100.0, 110.0],
    }];
    view.touch_move(&moved, 16.0);
    view.commit(400.0, 16.0);
    assert_eq!(view.scroll_offset(), 0.0);

    view.touch_end(&moved);
    settle(&mut view, 400.0, 16.0, 5);
    assert_eq!(view.scroll_offset(), 0.0);
}

#[test]
fn halt_stops_a_coast_and_is_idempotent() {
    let mut view = uniform_view(40, 100.0);
    anchor_at(&mut view, 20);
    view.commit(400.0, 0.0);

    view.apply_scroll_force(0.0);
    view.release_scroll_force(0.0, -2.0);
    let now = settle(&mut view, 400.0, 0.0, 5);
    assert!(view.scroll_offset() < 0.0);

    view.halt();
    assert_eq!(view.velocity(), 0.0);
    let now = settle(&mut view, 400.0, now, 10);
    let stopped_at = view.scroll_offset();

    view.halt();
    settle(&mut view, 400.0, now, 10);
    assert_eq!(view.scroll_offset(), stopped_at);
}

#[test]
fn go_to_next_page_springs_to_the_next_item() {
    let mut view = uniform_view(10, 200.0);
    view.commit(500.0, 0.0);

    view.go_to_next_page();
    view.commit(500.0, 16.0);
    let spring = view.spring_target();
    assert_eq!(spring.position, Some(-200.0));
    assert_eq!(spring.source, SpringSource::GoToItem);

    settle(&mut view, 500.0, 16.0, 300);
    assert_eq!(view.scroll_offset(), -200.0);
    assert_eq!(view.first_visible_item(), view.sequence().handle(1));
}

#[test]
fn go_to_previous_page_first_reveals_a_partial_item() {
    let mut view = uniform_view(10, 200.0);
    view.commit(500.0, 0.0);
    view.scroll(-80.0);
    let now = settle(&mut view, 500.0, 0.0, 5);
    assert_eq!(view.scroll_offset(), -80.0);

    // Item 0 is partially hidden, so "previous" means: show it fully.
    view.go_to_previous_page();
    settle(&mut view, 500.0, now, 300);
    assert_eq!(view.scroll_offset(), 0.0);
    assert_eq!(view.first_visible_item(), view.sequence().handle(0));
}

#[test]
fn go_to_item_scrolls_backward_to_an_earlier_item() {
    let mut view = uniform_view(10, 200.0);
    view.commit(500.0, 0.0);
    view.go_to_next_page();
    let now = settle(&mut view, 500.0, 0.0, 300);
    assert_eq!(view.scroll_offset(), -200.0);

    let first = view.sequence().handle(0).unwrap();
    view.go_to_item(first);
    settle(&mut view, 500.0, now, 300);
    assert_eq!(view.scroll_offset(), 0.0);
    assert_eq!(view.first_visible_item(), Some(first));
}

#[test]
fn go_to_item_outside_the_window_nudges_by_one_viewport() {
    let mut view = uniform_view(50, 100.0);
    view.commit(300.0, 0.0);

    let target = view.sequence().handle(40).unwrap();
    view.go_to_item(target);
    view.commit(300.0, 16.0);
    let spring = view.spring_target();
    assert_eq!(spring.source, SpringSource::GoToNextDirection);
    assert_eq!(spring.position, Some(view.scroll_offset() - 300.0));

    settle(&mut view, 300.0, 16.0, 2000);
    let item = placement_of(&view, 40).unwrap();
    assert_eq!(item.position, 0.0);
    assert!(!view.is_scrolling());
}

#[test]
fn snap_docks_the_nearer_page_edge() {
    let mut view = uniform_view(10, 200.0);
    set_paginated(&mut view);
    view.commit(500.0, 0.0);

    view.scroll(-80.0);
    view.commit(500.0, 16.0);
    assert_eq!(view.spring_target().source, SpringSource::SnapPrev);

    settle(&mut view, 500.0, 16.0, 3000);
    assert_eq!(view.scroll_offset(), 0.0);
}

#[test]
fn snap_advances_past_the_midpoint() {
    let mut view = uniform_view(10, 200.0);
    set_paginated(&mut view);
    view.commit(500.0, 0.0);

    view.scroll(-120.0);
    view.commit(500.0, 16.0);
    let spring = view.spring_target();
    assert_eq!(spring.source, SpringSource::SnapNext);
    assert_eq!(spring.position, Some(-200.0));

    settle(&mut view, 500.0, 16.0, 3000);
    assert_eq!(view.scroll_offset(), -200.0);
    assert_eq!(view.first_visible_item(), view.sequence().handle(1));
}

#[test]
fn snap_tie_resolves_to_the_previous_page() {
    let mut view = uniform_view(10, 200.0);
    set_paginated(&mut view);
    view.commit(500.0, 0.0);

    view.scroll(-100.0);
    view.commit(500.0, 16.0);
    assert_eq!(view.spring_target().source, SpringSource::SnapPrev);

    settle(&mut view, 500.0, 16.0, 3000);
    assert_eq!(view.scroll_offset(), 0.0);
}

#[test]
fn snap_spring_stays_engaged_while_settling() {
    let mut view = uniform_view(10, 200.0);
    set_paginated(&mut view);
    view.commit(500.0, 0.0);

    view.scroll(-120.0);
    view.commit(500.0, 16.0);
    assert_eq!(view.spring_target().source, SpringSource::SnapNext);

    // Mid-flight the spring's own motion carries more kinetic energy than
    // the engagement threshold allows; the spring must persist regardless.
    for tick in 2..20u32 {
        view.commit(500.0, f64::from(tick) * 16.0);
        assert_eq!(view.spring_target().source, SpringSource::SnapNext);
        assert!(view.is_scrolling());
    }

    settle(&mut view, 500.0, 320.0, 300);
    assert_eq!(view.scroll_offset(), -200.0);
    assert!(!view.is_scrolling());
}

#[test]
fn normalization_moves_the_anchor_and_nothing_observable() {
    let mut view = uniform_view(20, 100.0);
    view.commit(400.0, 0.0);

    view.scroll(-350.0);
    view.commit(400.0, 16.0);

    // The anchor advanced; the offset wrapped to keep one item of slack.
    assert_eq!(view.anchor(), view.sequence().handle(3));
    assert_eq!(view.scroll_offset(), -50.0);
    assert_eq!(view.group_start(), -300.0);
    let item = placement_of(&view, 3).unwrap();
    assert_eq!(item.position, -50.0);
    let item = placement_of(&view, 4).unwrap();
    assert_eq!(item.position, 50.0);

    // Normalization is a fixed point: another commit changes nothing.
    view.commit(400.0, 32.0);
    assert_eq!(view.anchor(), view.sequence().handle(3));
    assert_eq!(view.scroll_offset(), -50.0);
    assert_eq!(view.group_start(), -300.0);
}

#[test]
fn reverse_view_rests_with_the_first_item_at_the_top() {
    let mut view = uniform_view(10, 100.0);
    set_reverse(&mut view);
    view.commit(500.0, 0.0);
    assert_eq!(view.spring_target().source, SpringSource::StartBounds);
    assert_eq!(view.spring_target().position, Some(-500.0));

    let now = settle(&mut view, 500.0, 0.0, 600);
    assert!(view.bounds_reached().reached_start());
    assert_eq!(view.scroll_offset(), -100.0);
    // Normalization advanced the anchor while the spring settled.
    assert_eq!(view.anchor(), view.sequence().handle(4));
    assert_eq!(view.group_start(), -400.0);
    let first = placement_of(&view, 0).unwrap();
    assert_eq!(first.position, 0.0);

    // Normalization is a fixed point here too.
    view.commit(500.0, now + 16.0);
    assert_eq!(view.scroll_offset(), -100.0);
    assert_eq!(view.anchor(), view.sequence().handle(4));
}

#[test]
fn reverse_overscroll_pins_the_last_item_to_the_bottom_edge() {
    let mut view = uniform_view(10, 100.0);
    set_reverse(&mut view);
    view.commit(500.0, 0.0);

    view.scroll(-10_000.0);
    settle(&mut view, 500.0, 0.0, 600);

    assert!(view.bounds_reached().reached_end());
    assert_eq!(view.scroll_offset(), -100.0);
    let last = placement_of(&view, 9).unwrap();
    assert_eq!(last.position + last.length.unwrap(), 500.0);
}

#[test]
fn reverse_small_content_rests_at_the_bottom_edge() {
    let mut view = uniform_view(3, 50.0);
    set_reverse(&mut view);
    view.commit(500.0, 0.0);
    assert_eq!(view.bounds_reached(), BoundsReached::Both);
    assert_eq!(view.spring_target().source, SpringSource::MinSize);

    settle(&mut view, 500.0, 0.0, 600);
    assert_eq!(view.scroll_offset(), -50.0);
    let last = placement_of(&view, 2).unwrap();
    assert_eq!(last.position + last.length.unwrap(), 500.0);
    let first = placement_of(&view, 0).unwrap();
    assert_eq!(first.position, 350.0);
    assert_eq!(view.can_scroll(-40.0), 0.0);
}

#[test]
fn wheel_applies_the_scaled_axis_component() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    let mut options = view.options().clone();
    options.wheel_scale = 2.0;
    view.set_options(options);
    view.commit(400.0, 0.0);

    view.wheel(WheelDelta::Pair([7.0, -50.0]));
    settle(&mut view, 400.0, 0.0, 5);
    assert_eq!(view.scroll_offset(), -100.0);

    view.wheel(WheelDelta::Scalar(15.0));
    settle(&mut view, 400.0, 80.0, 5);
    assert_eq!(view.scroll_offset(), -70.0);
}

#[test]
fn scroll_callback_transforms_and_vetoes_deltas() {
    let mut view = uniform_view(20, 100.0);
    anchor_at(&mut view, 5);
    let mut options = view.options().clone();
    options.scroll_callback = Some(Arc::new(|delta, phase, _velocity| match phase {
        ScrollPhase::Wheel => (delta < 0.0).then_some(delta / 2.0),
        _ => Some(delta),
    }));
    view.set_options(options);
    view.commit(400.0, 0.0);

    // Positive wheel deltas are vetoed entirely.
    view.wheel(WheelDelta::Scalar(40.0));
    settle(&mut view, 400.0, 0.0, 5);
    assert_eq!(view.scroll_offset(), 0.0);

    // Negative ones are halved.
    view.wheel(WheelDelta::Scalar(-80.0));
    settle(&mut view, 400.0, 80.0, 5);
    assert_eq!(view.scroll_offset(), -40.0);
}

#[test]
fn unmeasured_item_disables_the_end_bound() {
    let mut measures = vec![ItemMeasure::known(100.0); 6];
    measures[3] = ItemMeasure::unknown();
    let mut view = view_with_measures(measures);
    view.commit(400.0, 0.0);

    view.scroll(-5000.0);
    settle(&mut view, 400.0, 0.0, 10);

    // No end bound can be computed past the unmeasured item, so the offset
    // is taken as-is; normalization stops at the unmeasured item too.
    assert_eq!(view.bounds_reached(), BoundsReached::None);
    assert_eq!(view.anchor(), view.sequence().handle(2));
    assert_eq!(view.scroll_offset(), -4800.0);
    let item = placement_of(&view, 3).unwrap();
    assert_eq!(item.length, None);
}

#[test]
fn random_scrolls_keep_content_positions_consistent() {
    let mut view = uniform_view(100, 100.0);
    anchor_at(&mut view, 50);
    view.commit(400.0, 0.0);

    let mut rng = Lcg::new(0xfeed_beef);
    let mut cumulative: i64 = 0;
    let mut now = 0.0;
    for _ in 0..300 {
        let mut delta = rng.gen_range_i64(-80, 81);
        if (cumulative + delta).abs() > 3000 {
            delta = -delta;
        }
        cumulative += delta;
        view.scroll(delta as f64);
        now = settle(&mut view, 400.0, now, 2);

        // The viewport's absolute position in content coordinates equals
        // the starting position minus every scroll applied so far.
        let anchor = view.anchor().unwrap();
        let content_top = anchor.index() as f64 * 100.0 - view.scroll_offset();
        assert_eq!(content_top, 5000.0 - cumulative as f64);
        // The anchor never drifts more than one item from the viewport; the
        // forward walk keeps exactly one item of slack, so -100 is reachable.
        assert!(view.scroll_offset() <= 0.0 && view.scroll_offset() >= -100.0);
    }
}
