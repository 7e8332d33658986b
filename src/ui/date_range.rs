//! egui front end for [`DateRangePicker`]: two trigger buttons and a calendar
//! popup. Raw pointer input is turned into [`PickerAction`]s and dispatched
//! once the popup has been drawn.

use chrono::{Local, NaiveDate};
use egui::{Color32, Rect, RichText, Sense, Ui};

use crate::picker::{
    format_local_date, DateRange, DateRangePicker, Navigation, PickerAction, PointerEvent, Preset, RangeEnd, Selection,
};
use super::theme::{button_colors, range_colors};

const WEEKDAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const CELL_SIZE: f32 = 32.0;
const CELL_GAP: f32 = 4.0;

/// Draw the filter control. Returns the confirmed range, only on the frame
/// where the user pressed OK.
pub fn date_range_filter(
    ui: &mut Ui,
    picker: &mut DateRangePicker,
    id_salt: &str,
    today: NaiveDate,
) -> Option<DateRange> {
    let mut actions = Vec::new();

    let (from_text, to_text) = picker.staged().display("Please select");
    let trigger = ui.horizontal(|ui| {
        let from = trigger_button(ui, &from_text);
        ui.label(RichText::new(egui_phosphor::regular::ARROW_RIGHT).color(button_colors().1));
        let to = trigger_button(ui, &to_text);
        if from.clicked() {
            actions.push(PickerAction::Open(RangeEnd::From));
        } else if to.clicked() {
            actions.push(PickerAction::Open(RangeEnd::To));
        }
    });
    let trigger_rect = trigger.response.rect;
    trigger.response.on_hover_text(format!("Today is {}", format_local_date(&Local::now())));

    if picker.is_open() {
        let popup_rect = render_popup(ui, picker, id_salt, trigger_rect, &mut actions);

        // Outside clicks close without committing
        let (pressed, pos) = ui.input(|i| (i.pointer.any_pressed(), i.pointer.interact_pos()));
        if pressed {
            if let Some(pos) = pos {
                if !popup_rect.contains(pos) && !trigger_rect.contains(pos) {
                    actions.push(PickerAction::ClickOutside);
                }
            }
        }
    }

    let mut confirmed = None;
    for action in actions {
        if let Some(range) = picker.dispatch(action, today) {
            confirmed = Some(range);
        }
    }
    if picker.captures_pointer() {
        ui.ctx().request_repaint();
    }
    confirmed
}

fn trigger_button(ui: &mut Ui, text: &str) -> egui::Response {
    let (bg, fg) = button_colors();
    ui.add(
        egui::Button::new(
            RichText::new(format!("{}  {}", text, egui_phosphor::regular::CALENDAR_BLANK)).color(fg),
        )
        .fill(bg)
        .min_size(egui::vec2(150.0, 28.0)),
    )
}

/// Draw the calendar popup below the trigger and return its rect
fn render_popup(
    ui: &mut Ui,
    picker: &DateRangePicker,
    id_salt: &str,
    trigger_rect: Rect,
    actions: &mut Vec<PickerAction>,
) -> Rect {
    let area = egui::Area::new(ui.id().with(id_salt).with("calendar_popup"))
        .order(egui::Order::Foreground)
        .fixed_pos(trigger_rect.left_bottom() + egui::vec2(0.0, 4.0))
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(7.0 * (CELL_SIZE + CELL_GAP));
                render_navigation(ui, picker, actions);
                ui.add_space(6.0);
                render_day_grid(ui, picker, actions);
                ui.label(RichText::new(selection_hint(picker.selection())).small().color(Color32::GRAY));
                ui.separator();
                render_presets(ui, actions);
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("OK").clicked() {
                            actions.push(PickerAction::Confirm);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(PickerAction::Cancel);
                        }
                    });
                });
            });
        });
    area.response.rect
}

fn render_navigation(ui: &mut Ui, picker: &DateRangePicker, actions: &mut Vec<PickerAction>) {
    use egui_phosphor::regular::{CARET_DOUBLE_LEFT, CARET_DOUBLE_RIGHT, CARET_LEFT, CARET_RIGHT};

    ui.horizontal(|ui| {
        for (icon, nav, tip) in [
            (CARET_DOUBLE_LEFT, Navigation::PreviousYear, "Previous year"),
            (CARET_LEFT, Navigation::PreviousMonth, "Previous month"),
        ] {
            if ui.small_button(icon).on_hover_text(tip).clicked() {
                actions.push(PickerAction::Navigate(nav));
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for (icon, nav, tip) in [
                (CARET_DOUBLE_RIGHT, Navigation::NextYear, "Next year"),
                (CARET_RIGHT, Navigation::NextMonth, "Next month"),
            ] {
                if ui.small_button(icon).on_hover_text(tip).clicked() {
                    actions.push(PickerAction::Navigate(nav));
                }
            }
            ui.centered_and_justified(|ui| {
                ui.strong(picker.view().label());
            });
        });
    });
}

fn render_day_grid(ui: &mut Ui, picker: &DateRangePicker, actions: &mut Vec<PickerAction>) {
    let view = picker.view();
    let staged = picker.staged();
    let capturing = picker.captures_pointer();
    let (endpoint_fill, range_fill, range_text) = range_colors();

    let (pressed, released, pointer) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos().or(i.pointer.hover_pos()),
        )
    });
    let mut pressed_here = false;

    egui::Grid::new(ui.id().with("day_grid"))
        .num_columns(7)
        .spacing([CELL_GAP, CELL_GAP])
        .show(ui, |ui| {
            for label in WEEKDAY_LABELS {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(label).small().color(Color32::GRAY));
                });
            }
            ui.end_row();

            for (index, cell) in view.grid().into_iter().enumerate() {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(CELL_SIZE, CELL_SIZE), Sense::click_and_drag());
                if let Some(day) = cell.and_then(|d| view.day(d)) {
                    let under_pointer = pointer.is_some_and(|p| rect.contains(p));
                    if pressed && under_pointer {
                        actions.push(PickerAction::Pointer(PointerEvent::Press(day)));
                        pressed_here = true;
                    } else if capturing && under_pointer {
                        actions.push(PickerAction::Pointer(PointerEvent::Enter(day)));
                    }

                    let (fill, text) = if staged.is_endpoint(day) {
                        (endpoint_fill, Color32::WHITE)
                    } else if staged.contains(day) {
                        (range_fill, range_text)
                    } else if under_pointer {
                        (ui.visuals().widgets.hovered.bg_fill, Color32::WHITE)
                    } else {
                        (Color32::TRANSPARENT, ui.visuals().text_color())
                    };
                    paint_day(ui, rect, &day.format("%-d").to_string(), fill, text);
                }

                if index % 7 == 6 {
                    ui.end_row();
                }
            }
        });

    // The release ends the press wherever the pointer is, inside the grid or not
    if released && (capturing || pressed_here) {
        actions.push(PickerAction::Pointer(PointerEvent::Release));
    }
}

fn selection_hint(selection: Selection) -> &'static str {
    match selection {
        Selection::AwaitingFirstClick => "Click a day or drag across days",
        Selection::AwaitingSecondClick { .. } => "Click another day to extend the range",
        Selection::Pressed { .. } | Selection::Dragging { .. } => "Release to finish",
    }
}

fn paint_day(ui: &Ui, rect: Rect, label: &str, fill: Color32, text: Color32) {
    if !ui.is_rect_visible(rect) {
        return;
    }
    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, fill);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(14.0),
        text,
    );
}

fn render_presets(ui: &mut Ui, actions: &mut Vec<PickerAction>) {
    ui.horizontal_wrapped(|ui| {
        for preset in Preset::ALL {
            if ui.small_button(preset.label()).clicked() {
                actions.push(PickerAction::Preset(preset));
            }
        }
    });
}
