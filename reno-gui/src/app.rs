use eframe::egui;
use egui_extras::DatePickerButton;
use uuid::Uuid;

use reno_core::{
    codec, collator::summarize, CardSummary, Collator, Config, DetailField, FormSession, Level,
};

#[derive(Default, PartialEq, Clone)]
enum View {
    #[default]
    Editor,
    Collator,
}

fn level_caption(level: Level, risk: bool) -> &'static str {
    match (level, risk) {
        (Level::Low, true) => "Simple change, config only or small function tweaks.",
        (Level::Medium, true) => "More significant changes to larger application components.",
        (Level::High, true) => "Major changes across multiple components or non-backwards-compatible modifications.",
        (Level::Low, false) => "Minor improvements or maintenance.",
        (Level::Medium, false) => "Noticeable value or efficiency gains.",
        (Level::High, false) => "Significant new features or major customer impact.",
    }
}

pub struct RenoApp {
    config: Config,
    current_view: View,

    // Editor state
    session: FormSession,
    export_text: String,
    import_text: String,

    // Collator state
    collator: Collator,
    collator_input: String,

    // Messages
    message: Option<(String, bool)>, // (message, is_error)

    // Pending operations (to avoid borrow checker issues)
    pending_remove: Option<Uuid>,
    pending_clear_collator: bool,
}

impl RenoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self {
            config,
            current_view: View::Editor,
            session: FormSession::new(),
            export_text: String::new(),
            import_text: String::new(),
            collator: Collator::new(),
            collator_input: String::new(),
            message: None,
            pending_remove: None,
            pending_clear_collator: false,
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string())) {
            Ok(()) => self.message = Some(("Copied to clipboard".to_string(), false)),
            Err(e) => self.message = Some((format!("Clipboard error: {}", e), true)),
        }
    }

    fn show_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.current_view, View::Editor, "📝 Note Editor");
                ui.selectable_value(&mut self.current_view, View::Collator, "📄 Collator");

                ui.separator();
                if self.current_view == View::Collator {
                    ui.label(format!("Notes: {}", self.collator.len()));
                }

                if let Some((msg, is_error)) = &self.message {
                    ui.separator();
                    let color = if *is_error { egui::Color32::RED } else { egui::Color32::GREEN };
                    ui.colored_label(color, msg);
                }
            });
        });
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Release Note Editor");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear Form").clicked() {
                    self.session.clear();
                    self.export_text.clear();
                    self.import_text.clear();
                    self.message = None;
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("basics_grid")
                .num_columns(2)
                .spacing([40.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Release note date:");
                    ui.add(DatePickerButton::new(&mut self.session.release_date));
                    ui.end_row();

                    ui.label("Point of contact:");
                    let contacts = self.config.contact_names().to_vec();
                    egui::ComboBox::new("contact_combo", "")
                        .selected_text(if self.session.contact.is_empty() {
                            "Select…".to_string()
                        } else {
                            self.session.contact.clone()
                        })
                        .show_ui(ui, |ui| {
                            for name in &contacts {
                                ui.selectable_value(&mut self.session.contact, name.clone(), name);
                            }
                        });
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.label("Select services:");
            let services = self.config.service_names().to_vec();
            ui.horizontal_wrapped(|ui| {
                for name in &services {
                    let mut selected = self.session.is_selected(name);
                    if ui.checkbox(&mut selected, name).changed() {
                        self.session.toggle_service(name);
                    }
                }
            });

            let selected = self.session.selected_services.clone();
            for name in &selected {
                ui.add_space(8.0);
                egui::CollapsingHeader::new(name)
                    .id_salt(format!("svc_{name}"))
                    .default_open(true)
                    .show(ui, |ui| {
                        self.show_service_form(ui, name);
                    });
            }

            ui.add_space(12.0);
            ui.separator();
            self.show_preview_and_transfer(ui);
        });
    }

    fn show_service_form(&mut self, ui: &mut egui::Ui, service: &str) {
        let state = self.session.service_state_mut(service);

        ui.checkbox(&mut state.config_only, "Config only");

        ui.label("Change description:");
        ui.text_edit_multiline(&mut state.change_description);

        egui::Grid::new(format!("levels_{service}"))
            .num_columns(2)
            .spacing([40.0, 8.0])
            .show(ui, |ui| {
                ui.label("Risk level:");
                egui::ComboBox::new(format!("risk_{service}"), "")
                    .selected_text(state.risk_level.to_string())
                    .show_ui(ui, |ui| {
                        for level in Level::all() {
                            ui.selectable_value(&mut state.risk_level, level, level.to_string());
                        }
                    });
                ui.end_row();

                ui.label("");
                ui.small(level_caption(state.risk_level, true));
                ui.end_row();

                ui.label("Benefit delivered:");
                egui::ComboBox::new(format!("benefit_{service}"), "")
                    .selected_text(state.benefit_level.to_string())
                    .show_ui(ui, |ui| {
                        for level in Level::all() {
                            ui.selectable_value(&mut state.benefit_level, level, level.to_string());
                        }
                    });
                ui.end_row();

                ui.label("");
                ui.small(level_caption(state.benefit_level, false));
                ui.end_row();

                ui.label("Version:");
                ui.text_edit_singleline(&mut state.version);
                ui.end_row();
            });

        ui.label("Known issues, risks and mitigations:");
        ui.text_edit_multiline(&mut state.known_issues);

        ui.label("PR links (one per line):");
        ui.text_edit_multiline(&mut state.pr_links_text);
        ui.label("Design links (one per line):");
        ui.text_edit_multiline(&mut state.design_links_text);
        ui.label("Code quality links (one per line):");
        ui.text_edit_multiline(&mut state.code_quality_links_text);
        ui.label("Additional links (one per line):");
        ui.text_edit_multiline(&mut state.additional_links_text);
    }

    fn show_preview_and_transfer(&mut self, ui: &mut egui::Ui) {
        // Live preview: re-assembled every frame from the current state.
        let record = self.session.assemble();
        let json = serde_json::to_string_pretty(&codec::to_canonical_json(&record))
            .unwrap_or_else(|_| "{}".to_string());

        ui.heading("Form Data JSON");
        ui.add(
            egui::TextEdit::multiline(&mut json.as_str())
                .code_editor()
                .desired_width(f32::INFINITY),
        );

        ui.add_space(8.0);
        ui.columns(2, |columns| {
            columns[0].group(|ui| {
                ui.label("Export");
                if ui.button("Export portable string").clicked() {
                    self.export_text = codec::encode(&record);
                }
                if !self.export_text.is_empty() {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.export_text)
                            .desired_rows(4)
                            .desired_width(f32::INFINITY),
                    );
                    if ui.button("📋 Copy").clicked() {
                        let text = self.export_text.clone();
                        self.copy_to_clipboard(&text);
                    }
                }
            });

            columns[1].group(|ui| {
                ui.label("Import");
                ui.add(
                    egui::TextEdit::multiline(&mut self.import_text)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
                if ui.button("Load portable string").clicked() {
                    match self.session.import(&self.import_text) {
                        Ok(()) => {
                            // Applied by begin_pass() at the top of the next
                            // frame, before any widget reads the session.
                            self.message = Some(("Release note loaded".to_string(), false));
                            ui.ctx().request_repaint();
                        }
                        Err(e) => {
                            self.message = Some((format!("Error loading data: {}", e), true));
                        }
                    }
                }
            });
        });
    }

    fn show_collator(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Release Collator");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear all").clicked() {
                    self.pending_clear_collator = true;
                }
            });
        });
        ui.separator();

        ui.label("Paste portable strings, one per line:");
        ui.add(
            egui::TextEdit::multiline(&mut self.collator_input)
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        if ui.button("➕ Add release notes").clicked() {
            let report = self.collator.ingest(&self.collator_input);
            self.collator_input.clear();
            let msg = format!("{} added, {} failed", report.added, report.failed);
            self.message = Some((msg, report.failed > 0));
        }

        ui.separator();

        let cards: Vec<CardSummary> = self.collator.entries().iter().map(summarize).collect();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if cards.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.label("No release notes yet");
                });
                return;
            }

            for card in &cards {
                self.show_card(ui, card);
            }
        });
    }

    fn show_card(&mut self, ui: &mut egui::Ui, card: &CardSummary) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong(&card.headline);
                ui.label(&card.service_line);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").clicked() {
                        self.pending_remove = Some(card.id);
                    }
                });
            });

            egui::CollapsingHeader::new("Details")
                .id_salt(card.id)
                .show(ui, |ui| {
                    for detail in &card.details {
                        ui.strong(&detail.service);
                        egui::Grid::new((card.id, detail.service.as_str()))
                            .num_columns(2)
                            .spacing([30.0, 4.0])
                            .show(ui, |ui| {
                                for field in &detail.fields {
                                    match field {
                                        DetailField::Text { label, value } => {
                                            ui.label(*label);
                                            ui.label(value);
                                            ui.end_row();
                                        }
                                        DetailField::Links { label, items } => {
                                            ui.label(*label);
                                            ui.vertical(|ui| {
                                                for item in items {
                                                    if item.is_url {
                                                        ui.hyperlink_to(&item.text, &item.text);
                                                    } else {
                                                        ui.label(&item.text);
                                                    }
                                                }
                                            });
                                            ui.end_row();
                                        }
                                    }
                                }
                            });
                        ui.add_space(6.0);
                    }
                });
        });
    }
}

impl eframe::App for RenoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply any staged import before a single widget reads the session.
        self.session.begin_pass();

        // Handle pending operations (to avoid borrow checker issues)
        if let Some(id) = self.pending_remove.take() {
            self.collator.remove(id);
        }
        if self.pending_clear_collator {
            self.pending_clear_collator = false;
            self.collator.clear();
        }

        self.show_top_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match &self.current_view {
            View::Editor => {
                self.show_editor(ui);
            }
            View::Collator => {
                self.show_collator(ui);
            }
        });
    }
}
