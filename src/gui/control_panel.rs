//! Control Panel Widget
//! Left side panel: dashboard choice, selection widgets, upload and export.

use chartboard::dashboards::FlightsTab;
use egui::{Color32, ComboBox, RichText};

/// The three dashboards of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardKind {
    #[default]
    Mbti,
    Upload,
    Flights,
}

impl DashboardKind {
    pub const ALL: [DashboardKind; 3] = [
        DashboardKind::Mbti,
        DashboardKind::Upload,
        DashboardKind::Flights,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardKind::Mbti => "🌍 MBTI by Country",
            DashboardKind::Upload => "📁 Upload CSV",
            DashboardKind::Flights => "✈ Flight Routes",
        }
    }
}

/// Current widget values.
#[derive(Debug, Default, Clone)]
pub struct UserSettings {
    pub dashboard: DashboardKind,
    pub mbti_type: String,
    pub upload_type: String,
    pub airline: String,
    pub flights_tab: FlightsTab,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub mbti_types: Vec<String>,
    pub upload_types: Vec<String>,
    pub airlines: Vec<String>,
    pub upload_name: Option<String>,
    pub flights_loading: bool,
    pub export_enabled: bool,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            mbti_types: Vec::new(),
            upload_types: Vec::new(),
            airlines: Vec::new(),
            upload_name: None,
            flights_loading: false,
            export_enabled: false,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the MBTI type options, keeping the selection when still valid.
    pub fn update_mbti_types(&mut self, types: Vec<String>) {
        self.settings.mbti_type = keep_or_first(&self.settings.mbti_type, &types);
        self.mbti_types = types;
    }

    pub fn update_upload_types(&mut self, types: Vec<String>) {
        self.settings.upload_type = keep_or_first(&self.settings.upload_type, &types);
        self.upload_types = types;
    }

    pub fn update_airlines(&mut self, airlines: Vec<String>) {
        self.settings.airline = keep_or_first(&self.settings.airline, &airlines);
        self.airlines = airlines;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Chartboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Top 10 dashboards").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dashboard Section =====
        ui.label(RichText::new("🗂 Dashboard").size(14.0).strong());
        ui.add_space(5.0);

        for kind in DashboardKind::ALL {
            if ui
                .radio_value(&mut self.settings.dashboard, kind, kind.title())
                .changed()
            {
                action = ControlPanelAction::SelectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🔧 Selection").size(14.0).strong());
        ui.add_space(8.0);

        match self.settings.dashboard {
            DashboardKind::Mbti => {
                if combo(ui, "mbti_type", "MBTI Type:", &mut self.settings.mbti_type, &self.mbti_types) {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
            DashboardKind::Upload => {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let name = self
                                .upload_name
                                .clone()
                                .unwrap_or_else(|| "No file selected".to_string());
                            let color = if self.upload_name.is_some() {
                                Color32::WHITE
                            } else {
                                Color32::GRAY
                            };
                            ui.label(RichText::new(name).size(12.0).color(color));

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("📂 Browse").clicked() {
                                    action = ControlPanelAction::BrowseCsv;
                                }
                            });
                        });
                    });
                ui.add_space(5.0);
                if combo(ui, "upload_type", "MBTI Type:", &mut self.settings.upload_type, &self.upload_types) {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
            DashboardKind::Flights => {
                if self.flights_loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading routes and airports...");
                    });
                } else if self.airlines.is_empty() && ui.button("🔄 Load datasets").clicked() {
                    action = ControlPanelAction::LoadFlights;
                }

                if combo(ui, "airline", "Airline:", &mut self.settings.airline, &self.airlines) {
                    action = ControlPanelAction::SelectionChanged;
                }

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    for tab in FlightsTab::ALL {
                        if ui
                            .selectable_value(&mut self.settings.flights_tab, tab, tab.title())
                            .changed()
                        {
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let png = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png).clicked() {
                    action = ControlPanelAction::ExportPng;
                }

                ui.add_space(8.0);

                let spec = egui::Button::new(RichText::new("📄 Export Chart Spec").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(spec).clicked() {
                    action = ControlPanelAction::ExportSpec;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Labeled combo box. Returns true when the selection changed.
fn combo(ui: &mut egui::Ui, id: &str, label: &str, selected: &mut String, options: &[String]) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized([90.0, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(170.0)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for option in options {
                    let is_selected = selected.as_str() == option.as_str();
                    if ui.selectable_label(is_selected, option).clicked() && !is_selected {
                        *selected = option.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}

fn keep_or_first(current: &str, options: &[String]) -> String {
    if options.iter().any(|o| o == current) {
        current.to_string()
    } else {
        options.first().cloned().unwrap_or_default()
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    BrowseCsv,
    LoadFlights,
    ExportPng,
    ExportSpec,
}
