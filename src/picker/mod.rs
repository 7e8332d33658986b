//! Date range picker state: staged selection, calendar view and the
//! confirm/cancel boundary to the owner of the filter.

mod date;
mod presets;
mod range;
mod selection;

pub use date::{format_date, format_local_date, Navigation, ViewMonth};
pub use presets::Preset;
pub use range::DateRange;
pub use selection::{PointerEvent, Selection};

use chrono::NaiveDate;

/// Which trigger button opened the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    From,
    To,
}

/// Everything the popup can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    /// Open on the month of the clicked end
    Open(RangeEnd),
    Pointer(PointerEvent),
    Preset(Preset),
    Navigate(Navigation),
    Confirm,
    Cancel,
    /// Pointer went down outside the popup
    ClickOutside,
}

/// Popup state for one date range filter.
///
/// Edits are staged and only leave through [`PickerAction::Confirm`]; the
/// owner's value is never touched while the user is still selecting.
#[derive(Debug, Clone)]
pub struct DateRangePicker {
    value: DateRange,
    staged: DateRange,
    selection: Selection,
    view: ViewMonth,
    open: bool,
}

impl DateRangePicker {
    pub fn new(value: DateRange, today: NaiveDate) -> Self {
        Self {
            value,
            staged: value,
            selection: Selection::initial(&value),
            view: ViewMonth::containing(value.from().unwrap_or(today)),
            open: false,
        }
    }

    /// Owner's current value
    pub fn value(&self) -> DateRange {
        self.value
    }

    pub fn staged(&self) -> DateRange {
        self.staged
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn view(&self) -> ViewMonth {
        self.view
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// A press is in progress and its release must reach the picker
    /// wherever it happens
    pub fn captures_pointer(&self) -> bool {
        self.open && self.selection.captures_pointer()
    }

    /// Owner changed the value (e.g. filters reset). Staged edits are dropped.
    pub fn set_value(&mut self, value: DateRange) {
        if value == self.value {
            return;
        }
        tracing::debug!(?value, "date range value changed by owner");
        self.value = value;
        self.reset_staged();
    }

    /// Apply one action. Returns the range to hand to the owner, which only
    /// happens on confirm.
    pub fn dispatch(&mut self, action: PickerAction, today: NaiveDate) -> Option<DateRange> {
        match action {
            PickerAction::Open(end) => {
                if !self.open {
                    self.open = true;
                    let shown = match end {
                        RangeEnd::From => self.staged.from(),
                        RangeEnd::To => self.staged.to().or(self.staged.from()),
                    };
                    self.view = ViewMonth::containing(shown.unwrap_or(today));
                }
                None
            }
            PickerAction::Confirm if self.open => {
                self.value = self.staged;
                self.selection = Selection::initial(&self.value);
                self.open = false;
                tracing::debug!(range = ?self.value, "date range confirmed");
                Some(self.value)
            }
            PickerAction::Cancel | PickerAction::ClickOutside if self.open => {
                self.reset_staged();
                self.open = false;
                None
            }
            _ if !self.open => None,
            PickerAction::Pointer(event) => {
                self.selection = self.selection.apply(&mut self.staged, event);
                None
            }
            PickerAction::Preset(preset) => {
                self.staged = preset.range(today);
                self.selection = preset.selection(today);
                None
            }
            PickerAction::Navigate(nav) => {
                self.view = self.view.navigate(nav);
                None
            }
            PickerAction::Confirm | PickerAction::Cancel | PickerAction::ClickOutside => None,
        }
    }

    fn reset_staged(&mut self) {
        self.staged = self.value;
        self.selection = Selection::initial(&self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::selection::ClickPhase;

    fn june(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn today() -> NaiveDate {
        june(15)
    }

    fn open_picker(value: DateRange) -> DateRangePicker {
        let mut picker = DateRangePicker::new(value, today());
        picker.dispatch(PickerAction::Open(RangeEnd::From), today());
        picker
    }

    fn click(picker: &mut DateRangePicker, day: NaiveDate) -> Option<DateRange> {
        let pressed = picker.dispatch(PickerAction::Pointer(PointerEvent::Press(day)), today());
        let released = picker.dispatch(PickerAction::Pointer(PointerEvent::Release), today());
        pressed.or(released)
    }

    #[test]
    fn opening_shows_month_of_selection_or_today() {
        let picker = open_picker(DateRange::single(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()));
        assert_eq!(picker.view(), ViewMonth { year: 2024, month0: 1 });

        let picker = open_picker(DateRange::empty());
        assert_eq!(picker.view(), ViewMonth { year: 2025, month0: 5 });
    }

    #[test]
    fn opening_from_to_button_shows_month_of_end() {
        let range = DateRange::between(
            NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
        );
        let mut picker = DateRangePicker::new(range, today());
        picker.dispatch(PickerAction::Open(RangeEnd::To), today());
        assert_eq!(picker.view(), ViewMonth { year: 2025, month0: 0 });

        picker.dispatch(PickerAction::Cancel, today());
        picker.dispatch(PickerAction::Open(RangeEnd::From), today());
        assert_eq!(picker.view(), ViewMonth { year: 2024, month0: 10 });

        let mut picker = DateRangePicker::new(DateRange::empty(), today());
        picker.dispatch(PickerAction::Open(RangeEnd::To), today());
        assert_eq!(picker.view(), ViewMonth { year: 2025, month0: 5 });
    }

    #[test]
    fn cancel_restores_value_and_emits_nothing() {
        let value = DateRange::between(june(1), june(3));
        let mut picker = open_picker(value);

        assert_eq!(click(&mut picker, june(10)), None);
        assert_eq!(picker.dispatch(PickerAction::Preset(Preset::Last14Days), today()), None);
        assert_ne!(picker.staged(), value);

        assert_eq!(picker.dispatch(PickerAction::Cancel, today()), None);
        assert!(!picker.is_open());
        assert_eq!(picker.staged(), value);
        assert_eq!(picker.value(), value);
        assert_eq!(picker.selection(), Selection::AwaitingFirstClick);
    }

    #[test]
    fn click_outside_behaves_like_cancel() {
        let mut picker = open_picker(DateRange::empty());
        click(&mut picker, june(4));
        assert_eq!(picker.dispatch(PickerAction::ClickOutside, today()), None);
        assert!(!picker.is_open());
        assert!(picker.staged().is_empty());
    }

    #[test]
    fn confirm_emits_final_range_exactly_once() {
        let mut picker = open_picker(DateRange::empty());
        let mut emitted = Vec::new();

        let actions = [
            PickerAction::Pointer(PointerEvent::Press(june(20))),
            PickerAction::Pointer(PointerEvent::Enter(june(19))),
            PickerAction::Pointer(PointerEvent::Enter(june(18))),
            PickerAction::Pointer(PointerEvent::Release),
            PickerAction::Navigate(Navigation::PreviousMonth),
            PickerAction::Preset(Preset::Today),
            PickerAction::Pointer(PointerEvent::Press(june(10))),
            PickerAction::Pointer(PointerEvent::Release),
            PickerAction::Confirm,
            PickerAction::Confirm,
            PickerAction::Cancel,
        ];
        for action in actions {
            emitted.extend(picker.dispatch(action, today()));
        }

        assert_eq!(emitted, vec![DateRange::between(june(10), june(15))]);
        assert_eq!(picker.value(), DateRange::between(june(10), june(15)));
    }

    #[test]
    fn drag_inside_popup_confirms_ordered_range() {
        let mut picker = open_picker(DateRange::empty());
        picker.dispatch(PickerAction::Pointer(PointerEvent::Press(june(20))), today());
        picker.dispatch(PickerAction::Pointer(PointerEvent::Enter(june(18))), today());
        assert!(picker.captures_pointer());
        picker.dispatch(PickerAction::Pointer(PointerEvent::Release), today());
        assert!(!picker.captures_pointer());

        let confirmed = picker.dispatch(PickerAction::Confirm, today());
        assert_eq!(confirmed, Some(DateRange::between(june(18), june(20))));
    }

    #[test]
    fn cancel_during_drag_drops_capture() {
        let mut picker = open_picker(DateRange::empty());
        picker.dispatch(PickerAction::Pointer(PointerEvent::Press(june(2))), today());
        picker.dispatch(PickerAction::Pointer(PointerEvent::Enter(june(5))), today());
        picker.dispatch(PickerAction::Cancel, today());
        assert!(!picker.captures_pointer());
        assert!(picker.staged().is_empty());
    }

    #[test]
    fn navigation_leaves_selection_alone() {
        let mut picker = open_picker(DateRange::single(june(3)));
        picker.dispatch(PickerAction::Navigate(Navigation::NextYear), today());
        picker.dispatch(PickerAction::Navigate(Navigation::NextMonth), today());
        assert_eq!(picker.view(), ViewMonth { year: 2026, month0: 6 });
        assert_eq!(picker.staged(), DateRange::single(june(3)));
        assert_eq!(picker.selection(), Selection::AwaitingSecondClick { anchor: june(3) });
    }

    #[test]
    fn interaction_while_closed_is_ignored() {
        let mut picker = DateRangePicker::new(DateRange::empty(), today());
        assert_eq!(click(&mut picker, june(3)), None);
        assert_eq!(picker.dispatch(PickerAction::Confirm, today()), None);
        assert!(picker.staged().is_empty());
    }

    #[test]
    fn external_value_change_resyncs_click_phase() {
        let mut picker = open_picker(DateRange::between(june(1), june(5)));
        click(&mut picker, june(9));
        assert_eq!(picker.selection().click_phase(), ClickPhase::Second);

        picker.set_value(DateRange::single(june(12)));
        assert_eq!(picker.staged(), DateRange::single(june(12)));
        assert_eq!(picker.selection(), Selection::AwaitingSecondClick { anchor: june(12) });

        picker.set_value(DateRange::empty());
        assert!(picker.staged().is_empty());
        assert_eq!(picker.selection(), Selection::AwaitingFirstClick);
    }

    #[test]
    fn unchanged_external_value_keeps_staged_edits() {
        let value = DateRange::between(june(1), june(5));
        let mut picker = open_picker(value);
        click(&mut picker, june(9));
        picker.set_value(value);
        assert_eq!(picker.staged(), DateRange::single(june(9)));
    }

    #[test]
    fn single_day_value_extends_on_first_click_after_open() {
        let mut picker = open_picker(DateRange::single(june(10)));
        click(&mut picker, june(14));
        assert_eq!(picker.staged(), DateRange::between(june(10), june(14)));
    }
}
