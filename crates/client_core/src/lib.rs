use async_trait::async_trait;
use shared::{
    domain::{Note, NoteDraft, NoteId, NotePatch},
    error::TransportError,
};

pub mod config;
mod controller;
mod rest;
mod session;

pub use controller::{ConfirmPrompt, NoteController};
pub use rest::RestNoteGateway;
pub use session::{
    FormMode, NoteSession, Notice, NoticeContext, NoticeKind, DELETE_CONFIRMATION,
};

pub type GatewayResult<T> = std::result::Result<T, TransportError>;

/// Remote CRUD over the note table. Every call is single-shot: no retries,
/// no batching.
#[async_trait]
pub trait NoteGateway: Send + Sync {
    /// All notes, newest `updated_at` first.
    async fn list(&self) -> GatewayResult<Vec<Note>>;
    async fn insert(&self, draft: &NoteDraft) -> GatewayResult<Note>;
    async fn update(&self, id: NoteId, patch: &NotePatch) -> GatewayResult<Note>;
    async fn delete(&self, id: NoteId) -> GatewayResult<()>;
}

#[async_trait]
impl<G> NoteGateway for std::sync::Arc<G>
where
    G: NoteGateway + ?Sized,
{
    async fn list(&self) -> GatewayResult<Vec<Note>> {
        (**self).list().await
    }

    async fn insert(&self, draft: &NoteDraft) -> GatewayResult<Note> {
        (**self).insert(draft).await
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> GatewayResult<Note> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: NoteId) -> GatewayResult<()> {
        (**self).delete(id).await
    }
}

/// A gateway request issued by the session, detached from its execution so
/// it can be shipped to whichever runtime owns the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List,
    Insert(NoteDraft),
    Update { id: NoteId, patch: NotePatch },
    Delete(NoteId),
}

impl GatewayCall {
    pub fn name(&self) -> &'static str {
        match self {
            GatewayCall::List => "list_notes",
            GatewayCall::Insert(_) => "insert_note",
            GatewayCall::Update { .. } => "update_note",
            GatewayCall::Delete(_) => "delete_note",
        }
    }

    /// The reply this call gets when it never reaches the store.
    pub fn fail(self, err: TransportError) -> GatewayReply {
        match self {
            GatewayCall::List => GatewayReply::Listed(Err(err)),
            GatewayCall::Insert(_) => GatewayReply::Inserted(Err(err)),
            GatewayCall::Update { id, .. } => GatewayReply::Updated {
                id,
                result: Err(err),
            },
            GatewayCall::Delete(id) => GatewayReply::Deleted {
                id,
                result: Err(err),
            },
        }
    }
}

/// Outcome of a [`GatewayCall`], keyed by the note it concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    Listed(GatewayResult<Vec<Note>>),
    Inserted(GatewayResult<Note>),
    Updated {
        id: NoteId,
        result: GatewayResult<Note>,
    },
    Deleted {
        id: NoteId,
        result: GatewayResult<()>,
    },
}

pub async fn execute<G>(gateway: &G, call: GatewayCall) -> GatewayReply
where
    G: NoteGateway + ?Sized,
{
    match call {
        GatewayCall::List => GatewayReply::Listed(gateway.list().await),
        GatewayCall::Insert(draft) => GatewayReply::Inserted(gateway.insert(&draft).await),
        GatewayCall::Update { id, patch } => GatewayReply::Updated {
            id,
            result: gateway.update(id, &patch).await,
        },
        GatewayCall::Delete(id) => GatewayReply::Deleted {
            id,
            result: gateway.delete(id).await,
        },
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
