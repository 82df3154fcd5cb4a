use std::{path::Path, thread, time::Duration};

use client_core::{
    load_settings, InterviewApi, PendingFile, SubmissionController, UploadForm,
};
use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use shared::protocol::InterviewRecord;

enum BackendCommand {
    Submit {
        files: Vec<PendingFile>,
        description: String,
    },
    RefreshInterviews,
}

enum UiEvent {
    SubmissionAccepted,
    SubmissionRejected(String),
    SnapshotReplaced(Vec<InterviewRecord>),
    Info(String),
}

/// Runs the submission controller on a dedicated worker thread with its own
/// tokio runtime; the UI thread stays free while requests are in flight.
fn start_backend_bridge(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::SubmissionRejected(format!(
                    "backend worker startup failure: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let settings = load_settings();
            tracing::info!(api_base_url = %settings.api_base_url, "backend worker ready");
            let mut controller = SubmissionController::new(InterviewApi::from_settings(&settings));

            match controller.refresh_interviews().await {
                Ok(()) => {
                    let _ = ui_tx.try_send(UiEvent::SnapshotReplaced(
                        controller.interviews().to_vec(),
                    ));
                }
                Err(err) => {
                    tracing::warn!("startup interview fetch failed: {err:#}");
                    let _ = ui_tx.try_send(UiEvent::Info(
                        "Could not load past analyses yet.".to_string(),
                    ));
                }
            }

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    BackendCommand::Submit { files, description } => {
                        let mut form = UploadForm::new();
                        form.add_files(files);
                        form.set_description(description);
                        match controller.submit(&mut form).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::SubmissionAccepted);
                                let _ = ui_tx.try_send(UiEvent::SnapshotReplaced(
                                    controller.interviews().to_vec(),
                                ));
                            }
                            Err(err) => {
                                let _ =
                                    ui_tx.try_send(UiEvent::SubmissionRejected(err.to_string()));
                            }
                        }
                    }
                    BackendCommand::RefreshInterviews => match controller.refresh_interviews().await
                    {
                        Ok(()) => {
                            let _ = ui_tx.try_send(UiEvent::SnapshotReplaced(
                                controller.interviews().to_vec(),
                            ));
                        }
                        Err(err) => tracing::warn!("interview refresh failed: {err:#}"),
                    },
                }
            }
        });
    });
}

struct InterviewApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: UploadForm,
    loading: bool,
    error: Option<String>,
    status: Option<String>,
    interviews: Vec<InterviewRecord>,
}

impl InterviewApp {
    fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            form: UploadForm::new(),
            loading: false,
            error: None,
            status: None,
            interviews: Vec::new(),
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::SubmissionAccepted => {
                    // The controller confirmed the upload: pending files and
                    // description go away together.
                    self.form.clear();
                    self.loading = false;
                    self.error = None;
                }
                UiEvent::SubmissionRejected(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
                UiEvent::SnapshotReplaced(interviews) => {
                    self.interviews = interviews;
                }
                UiEvent::Info(message) => {
                    self.status = Some(message);
                }
            }
        }
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if hovering {
            self.form.drag_over();
        } else if self.form.drag_active() {
            self.form.drag_leave();
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            self.form
                .drop_files(dropped.into_iter().filter_map(pending_from_dropped));
        }
    }

    fn submit(&mut self) {
        // Errors from the previous attempt clear as soon as a new one starts.
        self.error = None;
        self.status = None;
        self.loading = true;
        let command = BackendCommand::Submit {
            files: self.form.files().to_vec(),
            description: self.form.description().to_string(),
        };
        if self.cmd_tx.try_send(command).is_err() {
            self.loading = false;
            self.error = Some("Backend worker is unavailable.".to_string());
        }
    }

    fn render_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Customer Interview Analysis");
        ui.label("Paste your product description and upload interview transcripts to get insights.");
        ui.add_space(10.0);

        ui.label(egui::RichText::new("Product description").strong());
        ui.add(
            egui::TextEdit::multiline(self.form.description_mut())
                .hint_text("Paste product description (optional)")
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Interview transcripts").strong());
        self.render_dropzone(ui);

        if self.form.has_files() {
            let count = self.form.file_count();
            let suffix = if count > 1 { "s" } else { "" };
            ui.label(format!("{count} file{suffix} selected"));
            for file in self.form.files() {
                ui.weak(format!("• {} ({} bytes)", file.name, file.size_bytes()));
            }
        }

        if let Some(error) = &self.error {
            ui.add_space(6.0);
            ui.colored_label(egui::Color32::from_rgb(180, 35, 24), error);
        }
        if let Some(status) = &self.status {
            ui.add_space(6.0);
            ui.weak(status);
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let label = if self.loading {
                "Analyzing…"
            } else {
                "Analyze interviews"
            };
            let clicked = ui
                .add_enabled(!self.loading, egui::Button::new(label))
                .clicked();
            if self.loading {
                ui.spinner();
            }
            if clicked {
                self.submit();
            }
        });
    }

    fn render_dropzone(&mut self, ui: &mut egui::Ui) {
        let stroke = if self.form.drag_active() {
            egui::Stroke::new(2.0, egui::Color32::from_rgb(122, 166, 236))
        } else {
            egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        egui::Frame::group(ui.style())
            .stroke(stroke)
            .inner_margin(egui::Margin::symmetric(16, 20))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("Drag & drop PDF or TXT files here").strong());
                    ui.label("or");
                    if ui.button("Choose files…").clicked() {
                        if let Some(paths) = rfd::FileDialog::new()
                            .add_filter("Transcripts", &["pdf", "txt"])
                            .pick_files()
                        {
                            self.form
                                .add_files(paths.iter().filter_map(|path| read_pending_file(path)));
                        }
                    }
                });
            });
    }

    fn render_interviews(&mut self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.heading("Recent analyses");
            if ui.small_button("Refresh").clicked() {
                let _ = self.cmd_tx.try_send(BackendCommand::RefreshInterviews);
            }
        });

        if self.interviews.is_empty() {
            ui.weak("No analyses yet.");
            return;
        }

        for interview in &self.interviews {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.strong(interview.title.as_str());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(interview.created_at.format("%b %d, %Y %H:%M").to_string());
                    });
                });
                egui::CollapsingHeader::new("Transcript")
                    .id_salt(("transcript", interview.id.0))
                    .show(ui, |ui| {
                        ui.label(interview.transcript.as_str());
                    });
                if let Some(analysis) = &interview.analysis {
                    ui.add_space(4.0);
                    ui.strong("Analysis");
                    ui.label(analysis.as_str());
                }
            });
            ui.add_space(6.0);
        }
    }
}

impl eframe::App for InterviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();
        self.handle_file_drops(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .show(ui, |ui| {
                    self.render_form(ui);
                    ui.add_space(18.0);
                    self.render_interviews(ui);
                });
        });

        // Backend events arrive outside the input stream; poll for them.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

fn pending_from_dropped(file: egui::DroppedFile) -> Option<PendingFile> {
    if let Some(bytes) = file.bytes {
        let name = if file.name.is_empty() {
            "dropped".to_string()
        } else {
            file.name
        };
        return Some(PendingFile::new(name, bytes.to_vec()));
    }
    let path = file.path?;
    read_pending_file(&path)
}

fn read_pending_file(path: &Path) -> Option<PendingFile> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Some(PendingFile::new(name, bytes))
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to read selected file: {err}");
            None
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    start_backend_bridge(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_title("Customer Interview Analysis"),
        ..Default::default()
    };
    eframe::run_native(
        "Customer Interview Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(InterviewApp::new(cmd_tx, ui_rx)))),
    )
}
