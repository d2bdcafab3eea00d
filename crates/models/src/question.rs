use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Input variant a checklist question renders as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionType {
    Checkbox,
    Text,
    Date,
    Dropdown,
    Number,
    YesNo,
    MultiSelect,
    /// Parent of dynamically added delta tracking rows.
    DeltaParent,
}

/// Team responsible for a delta tracking row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeltaOwner {
    #[default]
    Unassigned,
    Client,
    MigrationTeam,
}

/// Typed answer payload; which variant is in play follows `question_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Number(f64),
    Text(String),
    Multi(Vec<String>),
}

impl Answer {
    /// True when the answer carries actual content. Empty text and empty
    /// selections count as unanswered; so does an unticked flag.
    pub fn has_content(&self) -> bool {
        match self {
            Answer::Flag(set) => *set,
            Answer::Number(_) => true,
            Answer::Text(text) => !text.trim().is_empty(),
            Answer::Multi(values) => !values.is_empty(),
        }
    }
}

/// One dynamically added row under a delta-parent question, tracking an
/// itemized piece of the migration (e.g. a runbook of workbooks).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct DeltaItem {
    pub id: Uuid,
    #[serde(default)]
    pub runbook: String,
    #[serde(default)]
    pub migrated_count: i64,
    #[serde(default)]
    pub owner: DeltaOwner,
    pub date: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub complete: bool,
}

impl DeltaItem {
    pub fn new(runbook: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            runbook: runbook.into(),
            migrated_count: 0,
            owner: DeltaOwner::Unassigned,
            date: None,
            notes: None,
            complete: false,
        }
    }
}

/// One checklist entry with a typed answer and completion state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    /// Semantic identifier from newer templates; preferred over `id`
    /// when resolving.
    pub question_key: Option<String>,
    pub question_text: String,
    pub question_type: QuestionType,
    pub section: String,
    #[serde(default)]
    pub answer: Option<Answer>,
    #[serde(default)]
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    /// Server-assigned provenance; absent until the first successful save.
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delta_items: Vec<DeltaItem>,
}

/// Partial update applied to one question; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestion {
    pub answer: Option<Answer>,
    pub completed: Option<bool>,
    pub delta_items: Option<Vec<DeltaItem>>,
}

impl UpdateQuestion {
    pub fn answer(answer: Answer) -> Self {
        Self {
            answer: Some(answer),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

impl Question {
    /// Shallow-merge a partial update into this question.
    pub fn apply(&mut self, update: UpdateQuestion) {
        if let Some(answer) = update.answer {
            self.answer = Some(answer);
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        if let Some(delta_items) = update.delta_items {
            self.delta_items = delta_items;
        }
    }

    /// True when this question already holds a persisted answer: it has
    /// answer content (a ticked checkbox counts) and at least one
    /// provenance signal from an earlier save.
    pub fn previously_answered(&self) -> bool {
        let answered = self.answer.as_ref().is_some_and(Answer::has_content)
            || (self.question_type == QuestionType::Checkbox && self.completed);
        let provenance =
            self.updated_at.is_some() || self.completed_at.is_some() || self.completed;
        answered && provenance
    }

    /// Whether applying `update` would overwrite a previously persisted
    /// answer. The presentation layer must ask the user before such an
    /// edit; the session store itself applies whatever it is given.
    pub fn needs_overwrite_confirmation(&self, update: &UpdateQuestion) -> bool {
        if !self.previously_answered() {
            return false;
        }
        let answer_changes = update
            .answer
            .as_ref()
            .is_some_and(|answer| self.answer.as_ref() != Some(answer));
        let completed_changes = update
            .completed
            .is_some_and(|completed| completed != self.completed);
        answer_changes || completed_changes
    }
}
