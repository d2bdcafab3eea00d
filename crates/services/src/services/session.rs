//! In-memory editing session for one migration document.
//!
//! Owns the working replica between an explicit load and an explicit
//! save. Local edits mutate only this copy and flip the dirty flag; the
//! remote store stays the system of record until `save` replaces the
//! replica with whatever the server returns.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use models::{
    migration::{Migration, UpdateMigration},
    question::{DeltaItem, UpdateQuestion},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::remote::{MigrationStore, RemoteStoreError};

const LOAD_FALLBACK: &str = "Failed to load migration";
const SAVE_FALLBACK: &str = "Failed to save migration";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error("no migration loaded")]
    NothingLoaded,
    #[error("{0}")]
    Remote(String),
}

/// Persistent indicator state the presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Error,
    Unsaved,
    Saved,
}

/// The single owner of the migration document being edited.
///
/// All mutation goes through [`update_question`](Self::update_question),
/// [`update_client_info`](Self::update_client_info) and the delta item
/// operations; the `&mut` receivers keep a second mutable copy of the
/// document unrepresentable. Saves are explicit — nothing here persists
/// automatically.
pub struct MigrationSession {
    store: Arc<dyn MigrationStore>,
    migration_id: Option<String>,
    document: Option<Migration>,
    loading: bool,
    load_error: Option<String>,
    saving: bool,
    save_error: Option<String>,
    dirty: bool,
    last_saved_at: Option<DateTime<Utc>>,
}

impl MigrationSession {
    pub fn new(store: Arc<dyn MigrationStore>) -> Self {
        Self {
            store,
            migration_id: None,
            document: None,
            loading: false,
            load_error: None,
            saving: false,
            save_error: None,
            dirty: false,
            last_saved_at: None,
        }
    }

    /// Bind `id` and fetch its document. An absent or empty id reports
    /// not-loading without contacting the store: the "create new" flow
    /// has no id yet.
    ///
    /// Success replaces the document wholesale and clears the dirty
    /// flag; failure records a human-readable message and leaves the
    /// document unpopulated.
    pub async fn load(&mut self, id: Option<String>) {
        self.migration_id = id.filter(|id| !id.is_empty());
        let Some(id) = self.migration_id.clone() else {
            self.loading = false;
            return;
        };

        self.loading = true;
        match self.store.fetch_migration(&id).await {
            Ok(document) => {
                info!(
                    migration_id = %id,
                    questions = document.questions.len(),
                    "migration loaded"
                );
                self.document = Some(document);
                self.dirty = false;
                self.load_error = None;
            }
            Err(err) => {
                warn!(migration_id = %id, error = %err, "failed to load migration");
                self.load_error = Some(err.user_message(LOAD_FALLBACK));
            }
        }
        self.loading = false;
    }

    /// Re-run the load for the currently bound id, subject to the same
    /// no-op rule when none is bound.
    pub async fn refetch(&mut self) {
        let id = self.migration_id.clone();
        self.load(id).await;
    }

    /// Shallow-merge `update` into the question with the given stable
    /// id. The mutation boundary matches by `id` alone — intentionally
    /// narrower than the dual-scheme resolver. Siblings are untouched.
    pub fn update_question(&mut self, question_id: &str, update: UpdateQuestion) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        match document.questions.iter_mut().find(|q| q.id == question_id) {
            Some(question) => {
                question.apply(update);
                self.mark_edited();
            }
            None => debug!(question_id, "update for unknown question id ignored"),
        }
    }

    /// Merge one intake field into the client info.
    pub fn update_client_info(&mut self, field: &str, value: impl Into<String>) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        document.client_info.set(field, value);
        self.mark_edited();
    }

    /// Append a delta tracking row under a delta-parent question.
    pub fn add_delta_item(&mut self, question_id: &str, item: DeltaItem) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        match document.questions.iter_mut().find(|q| q.id == question_id) {
            Some(question) => {
                question.delta_items.push(item);
                self.mark_edited();
            }
            None => debug!(question_id, "delta item add for unknown question id ignored"),
        }
    }

    /// Remove a delta tracking row by its id.
    pub fn remove_delta_item(&mut self, question_id: &str, item_id: Uuid) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        let Some(question) = document.questions.iter_mut().find(|q| q.id == question_id)
        else {
            debug!(question_id, "delta item remove for unknown question id ignored");
            return;
        };
        let before = question.delta_items.len();
        question.delta_items.retain(|item| item.id != item_id);
        if question.delta_items.len() != before {
            self.mark_edited();
        }
    }

    /// Push the local edits: exactly `clientInfo` and `questions`,
    /// nothing else. On success the whole local document is replaced by
    /// the server's response — that is how server-assigned provenance
    /// reaches the client. On failure the dirty flag survives, so a
    /// retry needs no re-editing.
    pub async fn save(&mut self) -> Result<(), SaveError> {
        let Some(document) = self.document.as_ref() else {
            return Err(SaveError::NothingLoaded);
        };
        let id = document.id.clone();
        let changes = UpdateMigration {
            client_info: document.client_info.clone(),
            questions: document.questions.clone(),
        };

        self.saving = true;
        let result = self.store.save_migration(&id, &changes).await;
        self.saving = false;

        match result {
            Ok(saved) => {
                info!(migration_id = %id, "migration saved");
                self.document = Some(saved);
                self.dirty = false;
                self.save_error = None;
                self.last_saved_at = Some(Utc::now());
                Ok(())
            }
            Err(err) => {
                warn!(migration_id = %id, error = %err, "failed to save migration");
                let message = err.user_message(SAVE_FALLBACK);
                self.save_error = Some(message.clone());
                Err(SaveError::Remote(message))
            }
        }
    }

    /// Alias of [`save`](Self::save), kept as a separate name for the
    /// retry affordance.
    pub async fn retry(&mut self) -> Result<(), SaveError> {
        self.save().await
    }

    pub fn document(&self) -> Option<&Migration> {
        self.document.as_ref()
    }

    pub fn migration_id(&self) -> Option<&str> {
        self.migration_id.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn status(&self) -> SaveStatus {
        if self.saving {
            SaveStatus::Saving
        } else if self.save_error.is_some() {
            SaveStatus::Error
        } else if self.dirty {
            SaveStatus::Unsaved
        } else if self.last_saved_at.is_some() {
            SaveStatus::Saved
        } else {
            SaveStatus::Idle
        }
    }

    fn mark_edited(&mut self) {
        self.dirty = true;
        // a new edit clears any stale save error
        self.save_error = None;
    }
}
