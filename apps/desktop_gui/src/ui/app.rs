use std::{collections::VecDeque, time::Duration};

use client_core::{
    FormMode, GatewayCall, GatewayReply, NoteSession, Notice, DELETE_CONFIRMATION,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Note, UserId, TITLE_MAX_CHARS};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{reduce, Effect, UiAction};

const APP_HEADER: &str = "Notes Manager";
const EMPTY_STATE: &str = "Select a note or create a new one.";
const NOTE_ACTIONS_HEIGHT: f32 = 40.0;

/// Room left for note content once the action row is reserved.
fn content_height(available: f32) -> f32 {
    (available - NOTE_ACTIONS_HEIGHT).max(0.0)
}

/// Heading and submit label for the compose pane.
fn form_labels(mode: FormMode) -> (&'static str, &'static str) {
    match mode {
        FormMode::Editing(_) => ("Edit Note", "Save"),
        FormMode::Creating | FormMode::Closed => ("New Note", "Add"),
    }
}

pub struct NotesApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: NoteSession,
    notices: VecDeque<Notice>,
    status: String,
    backend_error: Option<UiError>,
}

impl NotesApp {
    /// Builds the shell and queues the initial load.
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, user_id: UserId) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            session: NoteSession::new(user_id),
            notices: VecDeque::new(),
            status: "Starting".to_string(),
            backend_error: None,
        };
        app.apply(UiAction::Reload);
        app
    }

    fn apply(&mut self, action: UiAction) {
        match reduce(&mut self.session, action) {
            Effect::None => {}
            Effect::Issue(call) => self.issue(call),
            Effect::Notify(notice) => self.surface(notice),
        }
    }

    fn issue(&mut self, call: GatewayCall) {
        if let Err((cmd, err)) = dispatch_backend_command(&self.cmd_tx, call.into()) {
            self.status = err.message.clone();
            let reply = cmd.into_call().fail(err);
            self.settle(reply);
        }
    }

    fn settle(&mut self, reply: GatewayReply) {
        if let Some(notice) = self.session.reconcile(reply) {
            self.surface(notice);
        }
    }

    fn surface(&mut self, notice: Notice) {
        tracing::warn!(
            context = ?notice.context(),
            detail = notice.detail().unwrap_or_default(),
            "{}",
            notice.message()
        );
        self.notices.push_back(notice);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Reply(reply) => self.settle(reply),
                UiEvent::Error(error) => {
                    tracing::error!(context = ?error.context(), "{}", error.message());
                    self.status = error.summary();
                    self.backend_error = Some(error);
                }
            }
        }
    }

    fn modal_open(&self) -> bool {
        self.session.pending_delete().is_some() || !self.notices.is_empty()
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(APP_HEADER);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(error) = &self.backend_error {
                        ui.colored_label(ui.visuals().error_fg_color, error.summary());
                    } else {
                        ui.weak(&self.status);
                    }
                });
            });
        });
    }

    fn show_note_list(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        if ui.button("+ New Note").clicked() {
            actions.push(UiAction::NewDraft);
        }
        ui.separator();

        if self.session.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading notes...");
            });
            return;
        }
        if self.session.notes().is_empty() {
            ui.weak("No notes");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for note in self.session.notes() {
                ui.horizontal(|ui| {
                    let selected = self.session.selected_id() == Some(note.id);
                    if ui.selectable_label(selected, note.display_title()).clicked() {
                        actions.push(UiAction::Select(note.id));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Delete").clicked() {
                            actions.push(UiAction::RequestDelete(note.id));
                        }
                    });
                });
            }
        });
    }

    fn show_form(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let (heading, submit_label) = form_labels(self.session.mode());
        ui.heading(heading);
        ui.add_space(8.0);

        ui.add(
            egui::TextEdit::singleline(self.session.draft_title_mut())
                .char_limit(TITLE_MAX_CHARS)
                .hint_text("Title")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);
        ui.add(
            egui::TextEdit::multiline(self.session.draft_content_mut())
                .hint_text("Content")
                .desired_rows(12)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button(submit_label).clicked() {
                actions.push(UiAction::Submit);
            }
            if ui.button("Cancel").clicked() {
                actions.push(UiAction::CancelEdit);
            }
        });
    }

    fn show_note(note: &Note, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.heading(note.display_title());
        if let Some(updated_at) = note.updated_at {
            ui.weak(
                updated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            );
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .max_height(content_height(ui.available_height()))
            .show(ui, |ui| {
                let paragraphs = note.paragraphs();
                if paragraphs.is_empty() {
                    ui.weak("No content");
                }
                for paragraph in paragraphs {
                    ui.label(paragraph);
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Edit").clicked() {
                actions.push(UiAction::StartEdit);
            }
            if ui.button("Close").clicked() {
                actions.push(UiAction::CloseSelection);
            }
        });
    }

    fn show_detail(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        if self.session.mode().is_open() {
            self.show_form(ui, actions);
        } else if let Some(note) = self.session.selected_note() {
            Self::show_note(note, ui, actions);
        } else {
            ui.centered_and_justified(|ui| {
                ui.weak(EMPTY_STATE);
            });
        }
    }

    fn show_modals(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        if self.session.pending_delete().is_some() {
            egui::Window::new("Confirm")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(DELETE_CONFIRMATION);
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            actions.push(UiAction::ConfirmDelete);
                        }
                        if ui.button("No").clicked() {
                            actions.push(UiAction::DeclineDelete);
                        }
                    });
                });
            return;
        }

        let mut dismissed = false;
        if let Some(notice) = self.notices.front() {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(notice.message());
                    if let Some(detail) =
                        notice.detail().filter(|detail| !notice.message().contains(detail))
                    {
                        ui.weak(detail);
                    }
                    ui.add_space(8.0);
                    dismissed = ui.button("OK").clicked();
                });
        }
        if dismissed {
            self.notices.pop_front();
        }
    }
}

impl eframe::App for NotesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        let interactive = !self.modal_open();

        self.show_header(ctx);
        egui::SidePanel::left("note_list")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_enabled_ui(interactive, |ui| self.show_note_list(ui, &mut actions));
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| self.show_detail(ui, &mut actions));
        });
        self.show_modals(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use client_core::NoticeContext;
    use crossbeam_channel::bounded;
    use shared::{domain::NoteId, error::TransportError};

    use super::*;

    fn app_with_queue(capacity: usize) -> (NotesApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(capacity);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(16);
        (NotesApp::new(cmd_tx, ui_rx, UserId(1)), cmd_rx, ui_tx)
    }

    fn note(id: i64, title: &str) -> Note {
        Note {
            id: NoteId(id),
            user_id: UserId(1),
            title: title.to_string(),
            content: String::new(),
            updated_at: None,
        }
    }

    #[test]
    fn form_labels_follow_the_form_mode() {
        let (mut app, _cmd_rx, ui_tx) = app_with_queue(4);
        ui_tx
            .send(UiEvent::Reply(GatewayReply::Listed(Ok(vec![note(1, "A")]))))
            .expect("send list");
        app.process_ui_events();

        app.apply(UiAction::NewDraft);
        assert_eq!(form_labels(app.session.mode()), ("New Note", "Add"));

        app.apply(UiAction::Select(NoteId(1)));
        app.apply(UiAction::StartEdit);
        assert_eq!(form_labels(app.session.mode()), ("Edit Note", "Save"));
    }

    #[test]
    fn content_height_never_goes_negative() {
        assert_eq!(content_height(300.0), 260.0);
        assert_eq!(content_height(25.0), 0.0);
    }

    #[test]
    fn startup_queues_a_load() {
        let (app, cmd_rx, _ui_tx) = app_with_queue(4);

        assert!(app.session.is_loading());
        assert_eq!(
            cmd_rx.try_recv().map(BackendCommand::into_call).ok(),
            Some(GatewayCall::List)
        );
    }

    #[test]
    fn replies_from_the_backend_update_the_session() {
        let (mut app, _cmd_rx, ui_tx) = app_with_queue(4);

        ui_tx
            .send(UiEvent::Reply(GatewayReply::Listed(Ok(vec![
                note(2, "B"),
                note(1, ""),
            ]))))
            .expect("send reply");
        app.process_ui_events();

        assert!(!app.session.is_loading());
        assert_eq!(app.session.notes()[1].display_title(), "(Untitled)");
        assert!(!app.modal_open());
    }

    #[test]
    fn failed_delete_shows_a_blocking_notice() {
        let (mut app, _cmd_rx, ui_tx) = app_with_queue(4);
        ui_tx
            .send(UiEvent::Reply(GatewayReply::Listed(Ok(vec![note(1, "A")]))))
            .expect("send list");
        app.process_ui_events();

        app.apply(UiAction::RequestDelete(NoteId(1)));
        assert!(app.modal_open());
        app.apply(UiAction::ConfirmDelete);
        ui_tx
            .send(UiEvent::Reply(GatewayReply::Deleted {
                id: NoteId(1),
                result: Err(TransportError::with_status(500, "boom")),
            }))
            .expect("send delete");
        app.process_ui_events();

        assert_eq!(app.session.notes().len(), 1);
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.notices[0].context(), NoticeContext::Delete);
        assert_eq!(app.notices[0].message(), "Failed to delete note.");
        assert!(app.modal_open());
    }

    #[test]
    fn rejected_command_settles_as_a_failure() {
        let (mut app, cmd_rx, _ui_tx) = app_with_queue(1);
        assert!(app.session.is_loading());

        app.apply(UiAction::Reload);

        assert!(!app.session.is_loading());
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.notices[0].message(), "Failed to fetch notes.");
        assert_eq!(cmd_rx.len(), 1);
    }
}
