//! Local note session: the cached collection, selection, form mode and drafts.
//!
//! Handlers that need the store return a [`GatewayCall`] instead of awaiting
//! it; whoever runs the call feeds the [`GatewayReply`] back through
//! [`NoteSession::reconcile`]. Replies are applied in arrival order, so
//! the last one to resolve wins.

use shared::{
    domain::{Note, NoteDraft, NoteId, NotePatch, UserId},
    error::{TransportError, ValidationError},
};
use tracing::debug;

use crate::{GatewayCall, GatewayReply};

/// Question put to the user before a note is deleted.
pub const DELETE_CONFIRMATION: &str = "Delete this note?";

/// What the compose pane is doing. Form submission dispatches on this alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    Creating,
    Editing(NoteId),
}

impl FormMode {
    pub fn is_open(self) -> bool {
        self != FormMode::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeContext {
    Load,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Transport,
    Validation,
}

/// A blocking, user-facing failure message naming the failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    context: NoticeContext,
    kind: NoticeKind,
    message: String,
    detail: Option<String>,
}

impl Notice {
    fn transport(context: NoticeContext, err: &TransportError) -> Self {
        let message = match context {
            NoticeContext::Load => "Failed to fetch notes.".to_string(),
            NoticeContext::Create => format!("Failed to add note. {}", err.message)
                .trim_end()
                .to_string(),
            NoticeContext::Update => "Failed to update note.".to_string(),
            NoticeContext::Delete => "Failed to delete note.".to_string(),
        };
        Self {
            context,
            kind: NoticeKind::Transport,
            message,
            detail: Some(err.message.clone()).filter(|m| !m.is_empty()),
        }
    }

    fn validation(err: ValidationError) -> Self {
        Self {
            context: NoticeContext::Create,
            kind: NoticeKind::Validation,
            message: err.to_string(),
            detail: None,
        }
    }

    pub fn context(&self) -> NoticeContext {
        self.context
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw store message, when the store gave one.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct NoteSession {
    user_id: UserId,
    notes: Vec<Note>,
    selected: Option<NoteId>,
    mode: FormMode,
    loading: bool,
    draft_title: String,
    draft_content: String,
    pending_delete: Option<NoteId>,
}

impl NoteSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            notes: Vec::new(),
            selected: None,
            mode: FormMode::Closed,
            loading: false,
            draft_title: String::new(),
            draft_content: String::new(),
            pending_delete: None,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_id(&self) -> Option<NoteId> {
        self.selected
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected.and_then(|id| self.find(id))
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn draft_content(&self) -> &str {
        &self.draft_content
    }

    pub fn draft_title_mut(&mut self) -> &mut String {
        &mut self.draft_title
    }

    pub fn draft_content_mut(&mut self) -> &mut String {
        &mut self.draft_content
    }

    pub fn set_drafts(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.draft_title = title.into();
        self.draft_content = content.into();
    }

    /// Id awaiting a yes/no answer before it is deleted.
    pub fn pending_delete(&self) -> Option<NoteId> {
        self.pending_delete
    }

    pub fn begin_load(&mut self) -> GatewayCall {
        self.loading = true;
        GatewayCall::List
    }

    pub fn start_new_draft(&mut self) {
        self.selected = None;
        self.mode = FormMode::Creating;
        self.clear_drafts();
    }

    /// Drafts are prefilled so a later edit starts from the note's text.
    pub fn select(&mut self, id: NoteId) {
        self.selected = Some(id);
        self.mode = FormMode::Closed;
        let (title, content) = self
            .find(id)
            .map(|note| (note.title.clone(), note.content.clone()))
            .unwrap_or_default();
        self.set_drafts(title, content);
    }

    pub fn close_selection(&mut self) {
        self.selected = None;
    }

    /// No-op without a selection. Returns whether edit mode was entered.
    pub fn start_edit(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let (title, content) = self
            .find(id)
            .map(|note| (note.title.clone(), note.content.clone()))
            .unwrap_or_default();
        self.set_drafts(title, content);
        self.mode = FormMode::Editing(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.mode = FormMode::Closed;
        self.clear_drafts();
    }

    /// Form submission: create or edit depending on the current mode.
    pub fn submit(&mut self) -> Result<Option<GatewayCall>, Notice> {
        match self.mode {
            FormMode::Closed => Ok(None),
            FormMode::Creating => self.submit_draft().map(Some),
            FormMode::Editing(_) => Ok(self.submit_edit()),
        }
    }

    pub fn submit_draft(&mut self) -> Result<GatewayCall, Notice> {
        ValidationError::check_draft(&self.draft_title, &self.draft_content)
            .map_err(Notice::validation)?;
        Ok(GatewayCall::Insert(NoteDraft {
            user_id: self.user_id,
            title: self.draft_title.clone(),
            content: self.draft_content.clone(),
        }))
    }

    /// Edits are sent as typed; emptiness is left for the store to judge.
    pub fn submit_edit(&mut self) -> Option<GatewayCall> {
        let FormMode::Editing(id) = self.mode else {
            return None;
        };
        Some(GatewayCall::Update {
            id,
            patch: NotePatch::full(self.draft_title.clone(), self.draft_content.clone()),
        })
    }

    pub fn request_delete(&mut self, id: NoteId) {
        self.pending_delete = Some(id);
    }

    pub fn confirm_delete(&mut self) -> Option<GatewayCall> {
        self.pending_delete.take().map(GatewayCall::Delete)
    }

    pub fn decline_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Applies a resolved call. Failures commit nothing and come back as a
    /// notice for the user.
    pub fn reconcile(&mut self, reply: GatewayReply) -> Option<Notice> {
        match reply {
            GatewayReply::Listed(Ok(notes)) => {
                debug!(count = notes.len(), "notes loaded");
                self.notes = notes;
                self.loading = false;
                None
            }
            GatewayReply::Listed(Err(err)) => {
                self.notes.clear();
                self.loading = false;
                Some(Notice::transport(NoticeContext::Load, &err))
            }
            GatewayReply::Inserted(Ok(note)) => {
                debug!(id = %note.id, "note created");
                self.selected = Some(note.id);
                self.notes.insert(0, note);
                self.mode = FormMode::Closed;
                self.clear_drafts();
                None
            }
            GatewayReply::Inserted(Err(err)) => {
                Some(Notice::transport(NoticeContext::Create, &err))
            }
            GatewayReply::Updated { id, result: Ok(note) } => {
                match self.notes.iter_mut().find(|entry| entry.id == id) {
                    Some(entry) => entry.merge_from(note),
                    None => debug!(%id, "updated note is no longer cached"),
                }
                self.mode = FormMode::Closed;
                None
            }
            GatewayReply::Updated { result: Err(err), .. } => {
                Some(Notice::transport(NoticeContext::Update, &err))
            }
            GatewayReply::Deleted { id, result: Ok(()) } => {
                debug!(%id, "note deleted");
                self.notes.retain(|note| note.id != id);
                if self.selected == Some(id) || self.mode == FormMode::Editing(id) {
                    self.selected = None;
                    self.mode = FormMode::Closed;
                }
                None
            }
            GatewayReply::Deleted { result: Err(err), .. } => {
                Some(Notice::transport(NoticeContext::Delete, &err))
            }
        }
    }

    fn find(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    fn clear_drafts(&mut self) {
        self.draft_title.clear();
        self.draft_content.clear();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
