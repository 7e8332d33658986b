//! Click and drag selection over calendar day cells.
//!
//! A click either starts a selection (first click) or finishes it (second
//! click). A press followed by movement onto another day paints a range from
//! the pressed day instead, and the release that ends it never counts as a
//! click. Both modes live in one [`Selection`] value so a drag can't leave a
//! stale click phase behind.

use chrono::NaiveDate;

use super::range::DateRange;

/// Which click the next plain click will be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPhase {
    First,
    Second,
}

/// Pointer input over the day grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button went down on a day cell
    Press(NaiveDate),
    /// Pointer moved onto a day cell
    Enter(NaiveDate),
    /// Button released, on a cell or anywhere else
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    AwaitingFirstClick,
    /// One day picked, the next click extends or collapses it
    AwaitingSecondClick { anchor: NaiveDate },
    /// Button is down on `day` and hasn't moved to another cell yet
    Pressed { day: NaiveDate, resume: ClickPhase },
    /// Button is down and the range follows the pointer from `anchor`
    Dragging { anchor: NaiveDate, current: NaiveDate },
}

impl Selection {
    /// Phase matching a range handed in from outside: a lone day waits for
    /// its second click, anything else starts over.
    pub fn initial(range: &DateRange) -> Self {
        match range.from() {
            Some(day) if range.is_single_day() => Selection::AwaitingSecondClick { anchor: day },
            _ => Selection::AwaitingFirstClick,
        }
    }

    pub fn click_phase(&self) -> ClickPhase {
        match self {
            Selection::AwaitingFirstClick => ClickPhase::First,
            Selection::AwaitingSecondClick { .. } => ClickPhase::Second,
            Selection::Pressed { resume, .. } => *resume,
            Selection::Dragging { .. } => ClickPhase::First,
        }
    }

    /// True while a button press is in progress. The caller has to deliver
    /// the matching `Release` even when it happens outside the grid.
    pub fn captures_pointer(&self) -> bool {
        matches!(self, Selection::Pressed { .. } | Selection::Dragging { .. })
    }

    /// Advance on one pointer event, updating `range` in place
    pub fn apply(self, range: &mut DateRange, event: PointerEvent) -> Self {
        match (self, event) {
            (_, PointerEvent::Press(day)) => Selection::Pressed {
                day,
                resume: self.click_phase(),
            },

            (Selection::Pressed { day, .. }, PointerEvent::Enter(current)) if current != day => {
                drag_to(range, day, current)
            }
            (Selection::Dragging { anchor, .. }, PointerEvent::Enter(current)) => {
                drag_to(range, anchor, current)
            }
            (_, PointerEvent::Enter(_)) => self,

            (Selection::Dragging { .. }, PointerEvent::Release) => Selection::AwaitingFirstClick,
            (Selection::Pressed { day, resume }, PointerEvent::Release) => click(resume, range, day),
            (_, PointerEvent::Release) => self,
        }
    }
}

fn drag_to(range: &mut DateRange, anchor: NaiveDate, current: NaiveDate) -> Selection {
    *range = DateRange::between(anchor, current);
    Selection::Dragging { anchor, current }
}

fn click(phase: ClickPhase, range: &mut DateRange, day: NaiveDate) -> Selection {
    if phase == ClickPhase::Second {
        if let (Some(from), Some(to)) = (range.from(), range.to()) {
            if day < from {
                range.extend_back(day);
            } else if day > to {
                range.extend_forward(day);
            } else {
                *range = DateRange::single(day);
            }
            return Selection::AwaitingFirstClick;
        }
    }

    *range = DateRange::single(day);
    Selection::AwaitingSecondClick { anchor: day }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june(d: u32) -> NaiveDate {
        date(2025, 6, d)
    }

    fn click_on(state: Selection, range: &mut DateRange, day: NaiveDate) -> Selection {
        state
            .apply(range, PointerEvent::Press(day))
            .apply(range, PointerEvent::Release)
    }

    #[test]
    fn click_extend_then_collapse() {
        let mut range = DateRange::empty();
        let mut state = Selection::initial(&range);

        state = click_on(state, &mut range, june(10));
        assert_eq!(range, DateRange::single(june(10)));
        assert_eq!(state.click_phase(), ClickPhase::Second);

        state = click_on(state, &mut range, june(15));
        assert_eq!(range, DateRange::between(june(10), june(15)));
        assert_eq!(state, Selection::AwaitingFirstClick);

        state = click_on(state, &mut range, june(12));
        assert_eq!(range, DateRange::single(june(12)));
        assert_eq!(state.click_phase(), ClickPhase::Second);
    }

    #[test]
    fn second_click_before_start_extends_backward() {
        let mut range = DateRange::empty();
        let mut state = click_on(Selection::AwaitingFirstClick, &mut range, june(10));
        state = click_on(state, &mut range, june(3));
        assert_eq!(range, DateRange::between(june(3), june(10)));
        assert_eq!(state, Selection::AwaitingFirstClick);
    }

    #[test]
    fn second_click_on_same_day_keeps_single_day() {
        let mut range = DateRange::empty();
        let mut state = click_on(Selection::AwaitingFirstClick, &mut range, june(10));
        state = click_on(state, &mut range, june(10));
        assert_eq!(range, DateRange::single(june(10)));
        assert_eq!(state, Selection::AwaitingFirstClick);
    }

    #[test]
    fn second_click_inside_preset_range_collapses() {
        let mut range = DateRange::between(june(9), june(15));
        let state = click_on(Selection::AwaitingSecondClick { anchor: june(9) }, &mut range, june(11));
        assert_eq!(range, DateRange::single(june(11)));
        assert_eq!(state, Selection::AwaitingFirstClick);
    }

    #[test]
    fn first_click_replaces_complete_range() {
        let mut range = DateRange::between(june(1), june(30));
        let state = click_on(Selection::AwaitingFirstClick, &mut range, june(12));
        assert_eq!(range, DateRange::single(june(12)));
        assert_eq!(state, Selection::AwaitingSecondClick { anchor: june(12) });
    }

    #[test]
    fn initial_phase_follows_incoming_range() {
        assert_eq!(Selection::initial(&DateRange::empty()), Selection::AwaitingFirstClick);
        assert_eq!(
            Selection::initial(&DateRange::single(june(4))),
            Selection::AwaitingSecondClick { anchor: june(4) }
        );
        assert_eq!(
            Selection::initial(&DateRange::between(june(4), june(5))),
            Selection::AwaitingFirstClick
        );
        assert_eq!(
            Selection::initial(&DateRange::new(Some(june(4)), None)),
            Selection::AwaitingFirstClick
        );
    }

    #[test]
    fn drag_backward_orders_range() {
        let mut range = DateRange::empty();
        let state = Selection::AwaitingFirstClick
            .apply(&mut range, PointerEvent::Press(june(20)))
            .apply(&mut range, PointerEvent::Enter(june(18)));
        assert_eq!(state, Selection::Dragging { anchor: june(20), current: june(18) });

        let state = state.apply(&mut range, PointerEvent::Release);
        assert_eq!(range, DateRange::between(june(18), june(20)));
        assert_eq!(state, Selection::AwaitingFirstClick);
    }

    #[test]
    fn drag_follows_pointer_across_anchor() {
        let mut range = DateRange::empty();
        let mut state = Selection::AwaitingFirstClick.apply(&mut range, PointerEvent::Press(june(10)));
        state = state.apply(&mut range, PointerEvent::Enter(june(14)));
        assert_eq!(range, DateRange::between(june(10), june(14)));

        state = state.apply(&mut range, PointerEvent::Enter(june(7)));
        assert_eq!(range, DateRange::between(june(7), june(10)));

        state = state.apply(&mut range, PointerEvent::Enter(june(10)));
        assert_eq!(range, DateRange::single(june(10)));
        assert!(matches!(state, Selection::Dragging { .. }));

        state = state.apply(&mut range, PointerEvent::Release);
        assert_eq!(range, DateRange::single(june(10)));
        assert_eq!(state, Selection::AwaitingFirstClick);
    }

    #[test]
    fn drag_release_resets_pending_second_click() {
        let mut range = DateRange::empty();
        let mut state = click_on(Selection::AwaitingFirstClick, &mut range, june(2));
        assert_eq!(state.click_phase(), ClickPhase::Second);

        state = state
            .apply(&mut range, PointerEvent::Press(june(5)))
            .apply(&mut range, PointerEvent::Enter(june(8)))
            .apply(&mut range, PointerEvent::Release);
        assert_eq!(range, DateRange::between(june(5), june(8)));
        assert_eq!(state, Selection::AwaitingFirstClick);
    }

    #[test]
    fn press_without_movement_is_a_click() {
        let mut range = DateRange::empty();
        let state = Selection::AwaitingFirstClick
            .apply(&mut range, PointerEvent::Press(june(6)))
            .apply(&mut range, PointerEvent::Enter(june(6)));
        assert_eq!(state, Selection::Pressed { day: june(6), resume: ClickPhase::First });
        assert!(state.captures_pointer());

        let state = state.apply(&mut range, PointerEvent::Release);
        assert_eq!(range, DateRange::single(june(6)));
        assert!(!state.captures_pointer());
    }

    #[test]
    fn hover_and_stray_release_are_ignored_when_idle() {
        let mut range = DateRange::between(june(1), june(3));
        let state = Selection::AwaitingFirstClick
            .apply(&mut range, PointerEvent::Enter(june(9)))
            .apply(&mut range, PointerEvent::Release);
        assert_eq!(state, Selection::AwaitingFirstClick);
        assert_eq!(range, DateRange::between(june(1), june(3)));
    }

    fn event_strategy() -> impl Strategy<Value = PointerEvent> {
        let day = (0i64..120).prop_map(|offset| date(2025, 1, 1) + chrono::Duration::days(offset));
        prop_oneof![
            day.clone().prop_map(PointerEvent::Press),
            day.prop_map(PointerEvent::Enter),
            Just(PointerEvent::Release),
        ]
    }

    proptest! {
        /// No interaction sequence can produce a reversed range
        #[test]
        fn range_stays_ordered(events in proptest::collection::vec(event_strategy(), 0..64)) {
            let mut range = DateRange::empty();
            let mut state = Selection::initial(&range);
            for event in events {
                state = state.apply(&mut range, event);
                if let (Some(from), Some(to)) = (range.from(), range.to()) {
                    prop_assert!(from <= to, "{} > {} after {:?}", from, to, event);
                }
                if let Selection::AwaitingSecondClick { anchor } = state {
                    prop_assert_eq!(range, DateRange::single(anchor));
                }
            }
        }
    }
}
