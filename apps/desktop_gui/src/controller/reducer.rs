//! Maps widget interactions onto session transitions.

use client_core::{GatewayCall, NoteSession, Notice};
use shared::domain::NoteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    NewDraft,
    Select(NoteId),
    CloseSelection,
    StartEdit,
    CancelEdit,
    Submit,
    RequestDelete(NoteId),
    ConfirmDelete,
    DeclineDelete,
    Reload,
}

/// What the shell has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Issue(GatewayCall),
    Notify(Notice),
}

pub fn reduce(session: &mut NoteSession, action: UiAction) -> Effect {
    match action {
        UiAction::NewDraft => session.start_new_draft(),
        UiAction::Select(id) => session.select(id),
        UiAction::CloseSelection => session.close_selection(),
        UiAction::StartEdit => {
            session.start_edit();
        }
        UiAction::CancelEdit => session.cancel_edit(),
        UiAction::Submit => {
            return match session.submit() {
                Ok(Some(call)) => Effect::Issue(call),
                Ok(None) => Effect::None,
                Err(notice) => Effect::Notify(notice),
            };
        }
        UiAction::RequestDelete(id) => session.request_delete(id),
        UiAction::ConfirmDelete => {
            return session
                .confirm_delete()
                .map_or(Effect::None, Effect::Issue);
        }
        UiAction::DeclineDelete => session.decline_delete(),
        UiAction::Reload => return Effect::Issue(session.begin_load()),
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use client_core::{FormMode, GatewayReply, NoticeKind};
    use shared::domain::{Note, NotePatch, UserId};

    use super::*;

    fn loaded_session() -> NoteSession {
        let mut session = NoteSession::new(UserId(1));
        let call = reduce(&mut session, UiAction::Reload);
        assert_eq!(call, Effect::Issue(GatewayCall::List));
        session.reconcile(GatewayReply::Listed(Ok(vec![Note {
            id: NoteId(1),
            user_id: UserId(1),
            title: "A".to_string(),
            content: "x".to_string(),
            updated_at: None,
        }])));
        session
    }

    #[test]
    fn submit_in_create_mode_validates_before_issuing() {
        let mut session = loaded_session();
        reduce(&mut session, UiAction::NewDraft);
        session.set_drafts("Title", "  ");

        match reduce(&mut session, UiAction::Submit) {
            Effect::Notify(notice) => {
                assert_eq!(notice.kind(), NoticeKind::Validation);
                assert_eq!(notice.message(), "Content is required.");
            }
            other => panic!("unexpected effect: {other:?}"),
        }
        assert_eq!(session.mode(), FormMode::Creating);
    }

    #[test]
    fn submit_in_edit_mode_issues_an_update() {
        let mut session = loaded_session();
        reduce(&mut session, UiAction::Select(NoteId(1)));
        reduce(&mut session, UiAction::StartEdit);
        session.draft_title_mut().push('!');

        assert_eq!(
            reduce(&mut session, UiAction::Submit),
            Effect::Issue(GatewayCall::Update {
                id: NoteId(1),
                patch: NotePatch::full("A!", "x"),
            })
        );
    }

    #[test]
    fn submit_without_an_open_form_does_nothing() {
        let mut session = loaded_session();
        assert_eq!(reduce(&mut session, UiAction::Submit), Effect::None);
    }

    #[test]
    fn delete_goes_through_confirmation() {
        let mut session = loaded_session();

        assert_eq!(
            reduce(&mut session, UiAction::RequestDelete(NoteId(1))),
            Effect::None
        );
        assert_eq!(session.pending_delete(), Some(NoteId(1)));
        reduce(&mut session, UiAction::DeclineDelete);
        assert_eq!(session.pending_delete(), None);
        assert_eq!(reduce(&mut session, UiAction::ConfirmDelete), Effect::None);

        reduce(&mut session, UiAction::RequestDelete(NoteId(1)));
        assert_eq!(
            reduce(&mut session, UiAction::ConfirmDelete),
            Effect::Issue(GatewayCall::Delete(NoteId(1)))
        );
        assert_eq!(session.pending_delete(), None);
    }

    #[test]
    fn cancel_and_close_only_touch_local_state() {
        let mut session = loaded_session();
        reduce(&mut session, UiAction::Select(NoteId(1)));
        reduce(&mut session, UiAction::StartEdit);

        assert_eq!(reduce(&mut session, UiAction::CancelEdit), Effect::None);
        assert!(!session.is_editing());
        assert_eq!(reduce(&mut session, UiAction::CloseSelection), Effect::None);
        assert_eq!(session.selected_id(), None);
    }
}
