use chrono::NaiveDate;
use egui::{Color32, RichText, Ui};

use crate::api::{Case, CaseDetail, CaseFilters, DiagnosedFilter, GenderFilter};
use crate::picker::{DateRange, DateRangePicker};
use super::date_range::date_range_filter;
use super::theme::{card_colors, error_color, ACCENT};

const CARD_WIDTH: f32 = 320.0;
const CARD_HEIGHT: f32 = 150.0;
const CARDS_PER_ROW: usize = 3;

/// Result from filter panel interactions
#[derive(Default)]
pub struct FilterPanelResult {
    /// A text or combo filter changed (applied locally)
    pub changed: bool,
    /// Date range confirmed in the popup (needs a re-fetch)
    pub created_confirmed: Option<DateRange>,
    pub cleared: bool,
}

/// Result from case card interactions
#[derive(Default)]
pub struct CardResult {
    pub view: Option<i64>,
    pub delete: Option<Case>,
}

pub fn render_filter_panel(
    ui: &mut Ui,
    filters: &mut CaseFilters,
    created_picker: &mut DateRangePicker,
    today: NaiveDate,
) -> FilterPanelResult {
    let mut result = FilterPanelResult::default();

    egui::Grid::new("case_filters")
        .num_columns(4)
        .spacing([16.0, 8.0])
        .show(ui, |ui| {
            result.changed |= text_filter(ui, "Patient name", &mut filters.patient_name, "Name");
            result.changed |= text_filter(ui, "Case no.", &mut filters.patient_id, "Patient ID");
            ui.end_row();

            result.changed |= text_filter(ui, "Complaint", &mut filters.chief_complaint, "Chief complaint");
            ui.label("Gender");
            egui::ComboBox::from_id_salt("gender_filter")
                .selected_text(filters.gender.label())
                .show_ui(ui, |ui| {
                    for option in GenderFilter::ALL {
                        result.changed |= ui
                            .selectable_value(&mut filters.gender, option, option.label())
                            .changed();
                    }
                });
            ui.end_row();

            ui.label("Diagnosis");
            egui::ComboBox::from_id_salt("diagnosed_filter")
                .selected_text(filters.diagnosed.label())
                .show_ui(ui, |ui| {
                    for option in DiagnosedFilter::ALL {
                        result.changed |= ui
                            .selectable_value(&mut filters.diagnosed, option, option.label())
                            .changed();
                    }
                });
            result.changed |= text_filter(ui, "Creator", &mut filters.creator_username, "Username");
            ui.end_row();

            ui.label("Created");
            result.created_confirmed = date_range_filter(ui, created_picker, "created_range", today);
            ui.end_row();
        });

    if filters.is_active() {
        ui.add_space(4.0);
        if ui.button(format!("{} Clear filters", egui_phosphor::regular::X)).clicked() {
            result.cleared = true;
        }
    }

    result
}

fn text_filter(ui: &mut Ui, label: &str, value: &mut String, hint: &str) -> bool {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(200.0),
    )
    .changed()
}

/// Cards for one page of cases, three to a row
pub fn render_case_cards(ui: &mut Ui, cases: &[Case]) -> CardResult {
    let mut result = CardResult::default();

    if cases.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("No cases match the current filters").color(Color32::GRAY));
        });
        return result;
    }

    for row in cases.chunks(CARDS_PER_ROW) {
        ui.horizontal(|ui| {
            for case in row {
                let (view, delete) = render_case_card(ui, case);
                if view {
                    result.view = Some(case.id);
                }
                if delete {
                    result.delete = Some(case.clone());
                }
            }
        });
        ui.add_space(8.0);
    }

    result
}

/// Returns (view_clicked, delete_clicked)
fn render_case_card(ui: &mut Ui, case: &Case) -> (bool, bool) {
    let (bg, text, secondary) = card_colors();
    let mut view_clicked = false;
    let mut delete_clicked = false;

    egui::Frame::none()
        .fill(bg)
        .rounding(8.0)
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(56, 56, 52)))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(CARD_WIDTH, CARD_HEIGHT));
            ui.set_max_width(CARD_WIDTH);

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(case.patient_name.as_deref().unwrap_or("Unnamed patient"))
                        .strong()
                        .color(text),
                );
                if let Some(id) = &case.patient_id {
                    ui.label(RichText::new(id).small().color(secondary));
                }
            });

            let mut facts = Vec::new();
            if let Some(gender) = &case.gender {
                facts.push(gender.clone());
            }
            if let Some(age) = case.age {
                facts.push(format!("{} y", age));
            }
            if let Some(created) = case.created_date() {
                facts.push(crate::picker::format_date(created));
            }
            ui.label(RichText::new(facts.join(" · ")).small().color(secondary));

            ui.add(
                egui::Label::new(
                    RichText::new(case.chief_complaint.as_deref().unwrap_or("No chief complaint"))
                        .color(text),
                )
                .truncate(),
            );

            ui.horizontal(|ui| {
                let (icon, label, color) = if case.is_diagnosed() {
                    (egui_phosphor::regular::STETHOSCOPE, "Diagnosed", ACCENT)
                } else {
                    (egui_phosphor::regular::CLOCK, "Awaiting diagnosis", secondary)
                };
                ui.label(RichText::new(format!("{} {}", icon, label)).small().color(color));
                if let Some(creator) = case.creator_username() {
                    ui.label(RichText::new(format!("{} {}", egui_phosphor::regular::USER, creator)).small().color(secondary));
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Max), |ui| {
                if ui.small_button(egui_phosphor::regular::TRASH).on_hover_text("Delete case").clicked() {
                    delete_clicked = true;
                }
                if ui.small_button("View").clicked() {
                    view_clicked = true;
                }
            });
        });

    (view_clicked, delete_clicked)
}

/// Page buttons and a jump box. Returns the page to switch to.
pub fn render_pagination(
    ui: &mut Ui,
    current_page: usize,
    total_pages: usize,
    jump_input: &mut String,
) -> Option<usize> {
    if total_pages <= 1 {
        return None;
    }

    let mut target = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(current_page > 1, egui::Button::new(egui_phosphor::regular::CARET_LEFT))
            .clicked()
        {
            target = Some(current_page - 1);
        }
        ui.label(format!("Page {} of {}", current_page, total_pages));
        if ui
            .add_enabled(current_page < total_pages, egui::Button::new(egui_phosphor::regular::CARET_RIGHT))
            .clicked()
        {
            target = Some(current_page + 1);
        }

        ui.add_space(16.0);
        ui.label("Go to");
        let response = ui.add(egui::TextEdit::singleline(jump_input).desired_width(40.0));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Go").clicked() || submitted {
            match crate::api::parse_jump(jump_input, total_pages) {
                Some(page) => {
                    target = Some(page);
                    jump_input.clear();
                }
                None => tracing::debug!(input = %jump_input, "ignoring invalid page number"),
            }
        }
    });

    target
}

/// Read-only detail window. Returns true when closed.
pub fn render_case_detail(ctx: &egui::Context, detail: &CaseDetail) -> bool {
    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new(format!(
        "Case {}",
        detail.patient_id.as_deref().unwrap_or("(no id)")
    ))
    .open(&mut open)
    .collapsible(false)
    .resizable(true)
    .default_width(520.0)
    .show(ctx, |ui| {
        egui::Grid::new("case_detail").num_columns(2).show(ui, |ui| {
            let rows = [
                ("Patient", detail.patient_name.clone()),
                ("Gender", detail.gender.clone()),
                ("Age", detail.age.map(|a| a.to_string())),
                ("Complaint", detail.chief_complaint.clone()),
                ("Created", detail.created_at.clone()),
            ];
            for (label, value) in rows {
                ui.label(label);
                ui.label(value.unwrap_or_else(|| "-".to_string()));
                ui.end_row();
            }
        });
        ui.separator();
        egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
            if detail.raw_report.trim().is_empty() {
                ui.label(RichText::new("No report text").color(error_color()));
            } else {
                ui.label(&detail.raw_report);
            }
        });
        ui.add_space(8.0);
        if ui.button("Close").clicked() {
            close_clicked = true;
        }
    });

    !open || close_clicked
}
