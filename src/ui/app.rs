use chrono::{Local, NaiveDate};
use eframe::egui;
use egui::RichText;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::api::{clamp_page, page_bounds, page_count, Case, CaseClient, CaseDetail, CaseFilters};
use crate::config::Config;
use crate::picker::{DateRange, DateRangePicker};
use super::views;

pub struct CaseDeskApp {
    config: Config,
    state: AppState,

    // Data
    cases: Vec<Case>,
    filters: CaseFilters,
    created_picker: DateRangePicker,

    // Paging
    current_page: usize,
    jump_to_page: String,

    // Detail window
    detail: Option<CaseDetail>,

    // Delete confirmation
    pending_delete: Option<Case>,

    // Settings dialog
    show_settings: bool,
    settings_url: String,
    settings_token: String,
    settings_page_size: usize,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    cases_loading: bool,
    refetch_pending: bool,
    case_action_loading: bool,
    is_offline: bool,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Main,
}

/// Background request a result belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
enum Request {
    Cases,
    CaseDetail,
    DeleteCase,
}

enum AsyncResult {
    CasesLoaded(Vec<Case>),
    CaseDetailLoaded(CaseDetail),
    CaseDeleted(i64),
    Error(Request, String),
    Offline(Request),
}

impl CaseDeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, runtime: tokio::runtime::Runtime) -> Self {
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let mut app = Self::with_runtime(config, runtime);
        if app.state == AppState::Main {
            app.refresh_cases();
        }
        app
    }

    fn with_runtime(config: Config, runtime: tokio::runtime::Runtime) -> Self {
        let state = if config.is_configured() {
            AppState::Main
        } else {
            AppState::Setup
        };

        let (result_tx, result_rx) = channel();
        let filters = CaseFilters {
            created: config.created_range(),
            ..CaseFilters::default()
        };

        Self {
            show_settings: false,
            settings_url: config.api_base_url.clone(),
            settings_token: String::new(),
            settings_page_size: config.page_size,
            created_picker: DateRangePicker::new(filters.created, today()),
            filters,
            config,
            state,
            cases: Vec::new(),
            current_page: 1,
            jump_to_page: String::new(),
            detail: None,
            pending_delete: None,
            status_message: None,
            cases_loading: false,
            refetch_pending: false,
            case_action_loading: false,
            is_offline: false,
            runtime,
            result_rx,
            result_tx,
        }
    }

    fn is_busy(&self) -> bool {
        self.cases_loading || self.case_action_loading
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::CasesLoaded(cases) => {
                    self.cases = cases;
                    self.is_offline = false;
                    self.status_message = None;
                    self.current_page = clamp_page(self.current_page, self.filtered_len(), self.config.page_size);
                    self.finish_cases_request();
                }
                AsyncResult::CaseDetailLoaded(detail) => {
                    self.case_action_loading = false;
                    self.detail = Some(detail);
                }
                AsyncResult::CaseDeleted(case_id) => {
                    self.case_action_loading = false;
                    // Remove locally instead of a full refresh
                    self.cases.retain(|c| c.id != case_id);
                    self.current_page = clamp_page(self.current_page, self.filtered_len(), self.config.page_size);
                    self.status_message = Some(("Case deleted".to_string(), false));
                }
                AsyncResult::Error(request, msg) => {
                    self.is_offline = false;
                    self.status_message = Some((msg, true));
                    self.finish_request(request);
                }
                AsyncResult::Offline(request) => {
                    self.is_offline = true;
                    self.status_message = None;
                    self.finish_request(request);
                }
            }
        }
    }

    fn finish_request(&mut self, request: Request) {
        match request {
            Request::Cases => self.finish_cases_request(),
            Request::CaseDetail | Request::DeleteCase => self.case_action_loading = false,
        }
    }

    /// The list request is done; issue the fetch queued behind it, if any
    fn finish_cases_request(&mut self) {
        self.cases_loading = false;
        if std::mem::take(&mut self.refetch_pending) {
            self.refresh_cases();
        }
    }

    /// Fetch the case list with the current filters as query parameters.
    /// While a request is in flight the fetch is queued behind it.
    fn refresh_cases(&mut self) {
        if !self.config.is_configured() {
            return;
        }
        if self.cases_loading {
            self.refetch_pending = true;
            return;
        }
        self.cases_loading = true;

        let config = self.config.clone();
        let filters = self.filters.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = CaseClient::new(&config)?;
                client.get_cases(&filters).await
            }.await;

            match result {
                Ok(cases) => {
                    let _ = tx.send(AsyncResult::CasesLoaded(cases));
                }
                Err(e) => send_error(&tx, Request::Cases, "Failed to load cases", e),
            }
        });
    }

    fn load_case_detail(&mut self, case_id: i64) {
        self.case_action_loading = true;
        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = CaseClient::new(&config)?;
                client.get_case_detail(case_id).await
            }.await;

            match result {
                Ok(detail) => {
                    let _ = tx.send(AsyncResult::CaseDetailLoaded(detail));
                }
                Err(e) => send_error(&tx, Request::CaseDetail, "Failed to load case", e),
            }
        });
    }

    fn delete_case(&mut self, case: &Case) {
        self.case_action_loading = true;
        let case_id = case.id;
        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = CaseClient::new(&config)?;
                client.delete_case(case_id).await
            }.await;

            match result {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::CaseDeleted(case_id));
                }
                Err(e) => send_error(&tx, Request::DeleteCase, "Delete failed, please retry", e),
            }
        });
    }

    fn save_settings(&mut self) {
        self.config.api_base_url = self.settings_url.trim().to_string();
        if !self.settings_token.trim().is_empty() {
            self.config.access_token = Some(self.settings_token.trim().to_string());
        }
        self.config.page_size = self.settings_page_size.max(1);

        if let Err(e) = self.config.save() {
            tracing::error!(error = %e, "failed to save config");
            self.status_message = Some((format!("Failed to save settings: {}", e), true));
            return;
        }

        self.settings_token.clear();
        self.show_settings = false;
        if self.config.is_configured() {
            self.state = AppState::Main;
            self.cases.clear();
            self.refresh_cases();
        }
    }

    fn filtered_len(&self) -> usize {
        self.cases.iter().filter(|c| self.filters.matches(c)).count()
    }

    fn clear_filters(&mut self) {
        self.filters = CaseFilters::default();
        self.created_picker.set_value(DateRange::empty());
        self.remember_created_range();
        self.current_page = 1;
        self.refresh_cases();
    }

    fn remember_created_range(&mut self) {
        self.config.set_created_range(self.created_picker.value());
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "failed to save created range");
        }
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Casedesk setup");
            ui.add_space(12.0);
            ui.label("Enter the case server address and your access token.");
            ui.add_space(20.0);
        });

        self.render_connection_fields(ui);

        ui.add_space(20.0);
        if ui.button("Save and connect").clicked() {
            self.save_settings();
        }
        self.render_status(ui);
    }

    fn render_connection_fields(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("connection_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Server URL:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_url)
                        .hint_text("http://localhost:8000")
                        .desired_width(350.0)
                );
                ui.end_row();

                ui.label("Access token:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_token)
                        .password(true)
                        .hint_text("Paste your access token here")
                        .desired_width(350.0)
                );
                ui.end_row();
            });
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        let today = today();

        ui.horizontal(|ui| {
            ui.heading("Cases");
            if self.is_busy() {
                ui.spinner();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(egui_phosphor::regular::GEAR).on_hover_text("Settings").clicked() {
                    self.show_settings = true;
                }
                if ui.button(format!("{} Refresh", egui_phosphor::regular::ARROW_CLOCKWISE)).clicked() {
                    self.refresh_cases();
                }
            });
        });
        ui.separator();

        let panel = views::render_filter_panel(ui, &mut self.filters, &mut self.created_picker, today);
        if panel.changed {
            self.current_page = 1;
        }
        if let Some(range) = panel.created_confirmed {
            tracing::info!(from = ?range.from(), to = ?range.to(), "created range filter applied");
            self.filters.created = range;
            self.remember_created_range();
            self.current_page = 1;
            self.refresh_cases();
        }
        if panel.cleared {
            self.clear_filters();
        }

        ui.separator();
        self.render_status(ui);

        let filtered: Vec<Case> = self.cases.iter()
            .filter(|c| self.filters.matches(c))
            .cloned()
            .collect();
        let per_page = self.config.page_size.max(1);
        let total_pages = page_count(filtered.len(), per_page);
        let bounds = page_bounds(filtered.len(), self.current_page, per_page);

        ui.label(
            RichText::new(format!("{} of {} cases", filtered.len(), self.cases.len()))
                .small()
                .color(egui::Color32::GRAY),
        );

        let cards = egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 48.0).max(120.0))
            .show(ui, |ui| views::render_case_cards(ui, &filtered[bounds]))
            .inner;

        if let Some(case_id) = cards.view {
            self.load_case_detail(case_id);
        }
        if let Some(case) = cards.delete {
            self.pending_delete = Some(case);
        }

        if let Some(page) = views::render_pagination(ui, self.current_page, total_pages, &mut self.jump_to_page) {
            self.current_page = page;
        }
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        if self.is_offline {
            ui.label(
                RichText::new(format!("{} Cannot reach the case server", egui_phosphor::regular::WIFI_SLASH))
                    .color(super::theme::error_color()),
            );
        } else if let Some((msg, is_error)) = &self.status_message {
            let color = if *is_error {
                super::theme::error_color()
            } else {
                egui::Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    }

    fn render_delete_confirm(&mut self, ctx: &egui::Context) {
        let Some(case) = self.pending_delete.clone() else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Delete case")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete the case of {}? This cannot be undone.",
                    case.patient_name.as_deref().unwrap_or("this patient")
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.pending_delete = None;
            self.delete_case(&case);
        } else if cancelled {
            self.pending_delete = None;
        }
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                self.render_connection_fields(ui);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Cases per page:");
                    ui.add(egui::DragValue::new(&mut self.settings_page_size).range(1..=60));
                });
                ui.add_space(12.0);
                if ui.button("Save").clicked() {
                    self.save_settings();
                }
            });
        if !open {
            self.show_settings = false;
        }
    }
}

impl eframe::App for CaseDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();
        if self.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state {
                AppState::Setup => self.render_setup(ui),
                AppState::Main => self.render_main(ui),
            }
        });

        if self.show_settings {
            self.render_settings(ctx);
        }
        self.render_delete_confirm(ctx);

        if let Some(detail) = &self.detail {
            if views::render_case_detail(ctx, detail) {
                self.detail = None;
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn send_error(tx: &Sender<AsyncResult>, request: Request, context: &str, error: anyhow::Error) {
    tracing::warn!(error = %error, ?request, "{}", context);
    if is_offline_error(&error) {
        let _ = tx.send(AsyncResult::Offline(request));
    } else {
        let _ = tx.send(AsyncResult::Error(request, format!("{}: {}", context, error)));
    }
}

/// Network-level failures, as opposed to the server rejecting the request
fn is_offline_error(error: &anyhow::Error) -> bool {
    if let Some(e) = error.downcast_ref::<reqwest::Error>() {
        if e.is_connect() || e.is_timeout() {
            return true;
        }
    }
    let err_str = format!("{:#}", error).to_lowercase();
    ["connection", "dns", "timeout", "unreachable", "error sending request", "no route", "failed to lookup"]
        .iter()
        .any(|needle| err_str.contains(needle))
}
