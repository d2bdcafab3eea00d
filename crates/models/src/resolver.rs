//! Question lookup across the two identifier schemes.
//!
//! Questions carry a stable `id` and, in newer checklist templates, a
//! semantic `questionKey`. Call sites pass either one; the semantic key
//! wins when both schemes match. The precedence rule lives here and only
//! here — nothing else re-implements it.
//!
//! A miss is a normal state (conditional questions are often absent), so
//! every lookup degrades to `None` and nothing in this module errors.

use serde_json::Value;

use crate::question::Question;

/// Resolve a question by `questionKey` first, falling back to `id`.
pub fn find<'a>(questions: &'a [Question], identifier: &str) -> Option<&'a Question> {
    questions
        .iter()
        .find(|q| q.question_key.as_deref() == Some(identifier))
        .or_else(|| questions.iter().find(|q| q.id == identifier))
}

/// Look up one field of a resolved question by its wire name. An absent
/// question, an absent field, and a null field all come back as `None`.
pub fn field_value(questions: &[Question], identifier: &str, field: &str) -> Option<Value> {
    let question = find(questions, identifier)?;
    let serialized = serde_json::to_value(question).ok()?;
    serialized.get(field).filter(|v| !v.is_null()).cloned()
}

/// The resolved question's answer, if it has one.
pub fn answer_value(questions: &[Question], identifier: &str) -> Option<Value> {
    field_value(questions, identifier, "answer")
}

pub fn exists(questions: &[Question], identifier: &str) -> bool {
    find(questions, identifier).is_some()
}

/// Resolve a batch of identifiers, silently dropping the ones that miss.
pub fn find_many<'a>(questions: &'a [Question], identifiers: &[&str]) -> Vec<&'a Question> {
    identifiers
        .iter()
        .filter_map(|identifier| find(questions, identifier))
        .collect()
}
