//! Completion tallies for the checklist header and section summaries.

use serde::Serialize;
use ts_rs::TS;

use crate::question::{Answer, Question};

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total: usize,
    pub answered: usize,
    pub completed: usize,
    pub percent_complete: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub section: String,
    pub total: usize,
    pub answered: usize,
    pub completed: usize,
}

fn is_answered(question: &Question) -> bool {
    question.completed || question.answer.as_ref().is_some_and(Answer::has_content)
}

pub fn summarize(questions: &[Question]) -> ProgressSummary {
    let total = questions.len();
    let answered = questions.iter().filter(|q| is_answered(q)).count();
    let completed = questions.iter().filter(|q| q.completed).count();
    let percent_complete = if total == 0 {
        0
    } else {
        (answered * 100 / total) as u8
    };
    ProgressSummary {
        total,
        answered,
        completed,
        percent_complete,
    }
}

/// Per-section tallies, in the order sections first appear in the
/// question list (which is the display order).
pub fn by_section(questions: &[Question]) -> Vec<SectionProgress> {
    let mut sections: Vec<SectionProgress> = Vec::new();
    for question in questions {
        let idx = match sections.iter().position(|s| s.section == question.section) {
            Some(idx) => idx,
            None => {
                sections.push(SectionProgress {
                    section: question.section.clone(),
                    total: 0,
                    answered: 0,
                    completed: 0,
                });
                sections.len() - 1
            }
        };
        let entry = &mut sections[idx];
        entry.total += 1;
        if is_answered(question) {
            entry.answered += 1;
        }
        if question.completed {
            entry.completed += 1;
        }
    }
    sections
}
