//! Awaiting face of [`NoteSession`]: each handler runs its gateway call to
//! completion and reconciles before returning.

use shared::domain::{NoteId, UserId};
use tracing::{info, warn};

use crate::{execute, GatewayCall, NoteGateway, NoteSession, Notice, DELETE_CONFIRMATION};

/// Blocking yes/no question asked before destructive actions.
pub trait ConfirmPrompt {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

pub struct NoteController<G> {
    gateway: G,
    session: NoteSession,
    notices: Vec<Notice>,
}

impl<G: NoteGateway> NoteController<G> {
    pub fn new(gateway: G, user_id: UserId) -> Self {
        Self {
            gateway,
            session: NoteSession::new(user_id),
            notices: Vec::new(),
        }
    }

    pub fn session(&self) -> &NoteSession {
        &self.session
    }

    /// Direct access for input bindings (draft text fields).
    pub fn session_mut(&mut self) -> &mut NoteSession {
        &mut self.session
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Notices surfaced so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn load(&mut self) {
        let call = self.session.begin_load();
        self.run(call).await;
    }

    pub fn start_new_draft(&mut self) {
        self.session.start_new_draft();
    }

    pub fn select(&mut self, id: NoteId) {
        self.session.select(id);
    }

    pub fn close_selection(&mut self) {
        self.session.close_selection();
    }

    pub fn start_edit(&mut self) -> bool {
        self.session.start_edit()
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel_edit();
    }

    pub fn set_drafts(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.session.set_drafts(title, content);
    }

    pub async fn submit(&mut self) {
        match self.session.submit() {
            Ok(Some(call)) => self.run(call).await,
            Ok(None) => {}
            Err(notice) => self.surface(notice),
        }
    }

    pub async fn submit_draft(&mut self) {
        match self.session.submit_draft() {
            Ok(call) => self.run(call).await,
            Err(notice) => self.surface(notice),
        }
    }

    pub async fn submit_edit(&mut self) {
        if let Some(call) = self.session.submit_edit() {
            self.run(call).await;
        }
    }

    /// Asks `prompt` first; a declined prompt leaves everything untouched.
    pub async fn delete_note(&mut self, id: NoteId, prompt: &mut impl ConfirmPrompt) {
        self.session.request_delete(id);
        if !prompt.confirm(DELETE_CONFIRMATION) {
            info!(%id, "delete declined");
            self.session.decline_delete();
            return;
        }
        if let Some(call) = self.session.confirm_delete() {
            self.run(call).await;
        }
    }

    async fn run(&mut self, call: GatewayCall) {
        let reply = execute(&self.gateway, call).await;
        if let Some(notice) = self.session.reconcile(reply) {
            self.surface(notice);
        }
    }

    fn surface(&mut self, notice: Notice) {
        warn!(context = ?notice.context(), "{}", notice.message());
        self.notices.push(notice);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
