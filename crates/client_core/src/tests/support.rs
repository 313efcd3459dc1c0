use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{Note, NoteDraft, NoteId, NotePatch, UserId},
    error::TransportError,
};
use tokio::sync::Mutex;

use crate::{GatewayCall, GatewayResult, NoteGateway};

pub(crate) fn note(id: i64, title: &str, content: &str) -> Note {
    Note {
        id: NoteId(id),
        user_id: UserId(1),
        title: title.to_string(),
        content: content.to_string(),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}

/// In-memory note table that records every call it receives.
#[derive(Clone, Default)]
pub(crate) struct FakeGateway {
    rows: Arc<Mutex<Vec<Note>>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    fail_with: Arc<Mutex<Option<TransportError>>>,
    next_id: Arc<Mutex<i64>>,
}

impl FakeGateway {
    pub(crate) fn with_rows(rows: Vec<Note>) -> Self {
        let next_id = rows.iter().map(|n| n.id.0).max().unwrap_or(0) + 1;
        Self {
            rows: Arc::new(Mutex::new(rows)),
            next_id: Arc::new(Mutex::new(next_id)),
            ..Self::default()
        }
    }

    pub(crate) async fn fail_with(&self, message: &str) {
        *self.fail_with.lock().await = Some(TransportError::with_status(400, message));
    }

    pub(crate) async fn recover(&self) {
        *self.fail_with.lock().await = None;
    }

    pub(crate) async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn rows(&self) -> Vec<Note> {
        self.rows.lock().await.clone()
    }

    async fn record(&self, call: GatewayCall) -> GatewayResult<()> {
        self.calls.lock().await.push(call);
        match self.fail_with.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NoteGateway for FakeGateway {
    async fn list(&self) -> GatewayResult<Vec<Note>> {
        self.record(GatewayCall::List).await?;
        let mut rows = self.rows().await;
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn insert(&self, draft: &NoteDraft) -> GatewayResult<Note> {
        self.record(GatewayCall::Insert(draft.clone())).await?;
        let mut next_id = self.next_id.lock().await;
        let created = Note {
            id: NoteId(*next_id),
            user_id: draft.user_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            updated_at: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
        };
        *next_id += 1;
        self.rows.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> GatewayResult<Note> {
        self.record(GatewayCall::Update {
            id,
            patch: patch.clone(),
        })
        .await?;
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| TransportError::new(format!("note {id} not found")))?;
        if let Some(title) = &patch.title {
            row.title = title.clone();
        }
        if let Some(content) = &patch.content {
            row.content = content.clone();
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: NoteId) -> GatewayResult<()> {
        self.record(GatewayCall::Delete(id)).await?;
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(TransportError::new(format!("note {id} not found")));
        }
        Ok(())
    }
}
