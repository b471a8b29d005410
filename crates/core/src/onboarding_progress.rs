//! Per-user onboarding completion.
//!
//! Given the resolved steps and a snapshot of the user's data
//! ([`CompletionFacts`]), decides which active steps are done and where the
//! user should resume.

use std::collections::HashSet;

use serde::Serialize;

use crate::onboarding_steps::{HardcodedKind, StaticKind, StepDescriptor, StepKind};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Facts
// ---------------------------------------------------------------------------

/// The user's WhatsApp link, as far as onboarding cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhatsappLink {
    pub phone_number: Option<String>,
    pub receives_daily_verse: Option<bool>,
}

impl WhatsappLink {
    /// Connected means a non-blank phone number is on file.
    pub fn is_connected(&self) -> bool {
        self.phone_number
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// The daily verse question was answered, either way.
    pub fn answered_daily_verse(&self) -> bool {
        self.receives_daily_verse.is_some()
    }
}

/// Snapshot of everything that decides step completion for one user.
#[derive(Debug, Clone, Default)]
pub struct CompletionFacts {
    /// Forms the user has submitted a response for.
    pub answered_form_ids: HashSet<DbId>,
    /// The root form, whose response stands in for the preview step.
    pub root_form_id: Option<DbId>,
    pub whatsapp: Option<WhatsappLink>,
    /// Audio count of the routine playlist; `None` when it does not exist.
    pub routine_audio_count: Option<i64>,
}

/// Which facts must be loaded to judge a set of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactNeeds {
    pub form_ids: Vec<DbId>,
    pub whatsapp: bool,
    pub routine: bool,
}

/// Work out which lookups the given (active) steps require.
pub fn fact_needs(steps: &[StepDescriptor], root_form_id: Option<DbId>) -> FactNeeds {
    let mut needs = FactNeeds::default();
    for step in steps {
        match step.kind {
            StepKind::Form { form_id } | StepKind::Info { form_id } => {
                needs.form_ids.push(form_id);
            }
            StepKind::Static {
                static_kind: StaticKind::Preview,
            } => {
                if let Some(root_id) = root_form_id {
                    needs.form_ids.push(root_id);
                }
            }
            StepKind::Static {
                static_kind: StaticKind::Whatsapp,
            }
            | StepKind::Hardcoded {
                hardcoded_kind: HardcodedKind::WhatsappFinal | HardcodedKind::DailyVerse,
            } => needs.whatsapp = true,
            StepKind::Hardcoded {
                hardcoded_kind: HardcodedKind::Routine,
            } => needs.routine = true,
        }
    }
    needs.form_ids.sort_unstable();
    needs.form_ids.dedup();
    needs
}

/// Whether a single step is complete for the user described by `facts`.
pub fn is_step_completed(kind: &StepKind, facts: &CompletionFacts) -> bool {
    match kind {
        StepKind::Form { form_id } | StepKind::Info { form_id } => {
            facts.answered_form_ids.contains(form_id)
        }
        StepKind::Static {
            static_kind: StaticKind::Preview,
        } => facts
            .root_form_id
            .is_some_and(|root| facts.answered_form_ids.contains(&root)),
        StepKind::Static {
            static_kind: StaticKind::Whatsapp,
        }
        | StepKind::Hardcoded {
            hardcoded_kind: HardcodedKind::WhatsappFinal,
        } => facts.whatsapp.as_ref().is_some_and(WhatsappLink::is_connected),
        StepKind::Hardcoded {
            hardcoded_kind: HardcodedKind::Routine,
        } => facts.routine_audio_count.is_some_and(|n| n > 0),
        StepKind::Hardcoded {
            hardcoded_kind: HardcodedKind::DailyVerse,
        } => facts
            .whatsapp
            .as_ref()
            .is_some_and(WhatsappLink::answered_daily_verse),
    }
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// One row of the user-facing checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// 1-based display index among active steps.
    pub step_number: u32,
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub steps: Vec<ChecklistItem>,
    pub has_pending: bool,
    pub next_step: Option<u32>,
}

impl Checklist {
    /// The checklist for a user with nothing left to do.
    pub fn nothing_pending() -> Self {
        Self {
            steps: Vec::new(),
            has_pending: false,
            next_step: None,
        }
    }

    /// Display numbers of the steps still to do.
    pub fn pending_step_numbers(&self) -> Vec<u32> {
        self.steps
            .iter()
            .filter(|s| !s.completed)
            .map(|s| s.step_number)
            .collect()
    }
}

/// Whether any active step is backed by a form.
pub fn has_active_form_step(steps: &[StepDescriptor]) -> bool {
    steps
        .iter()
        .any(|s| s.is_active && s.kind.form_id().is_some())
}

/// Build the checklist for the active steps in `steps`. Inactive steps are
/// skipped and never affect `has_pending`.
///
/// Without any active form there is no onboarding to run: the fixed screens
/// alone never make a user pending.
pub fn build_checklist(steps: &[StepDescriptor], facts: &CompletionFacts) -> Checklist {
    if !has_active_form_step(steps) {
        return Checklist::nothing_pending();
    }

    let items: Vec<ChecklistItem> = steps
        .iter()
        .filter(|s| s.is_active)
        .zip(1u32..)
        .map(|(step, step_number)| ChecklistItem {
            step_number,
            label: step.title.clone(),
            completed: is_step_completed(&step.kind, facts),
        })
        .collect();

    let next_step = items.iter().find(|i| !i.completed).map(|i| i.step_number);

    Checklist {
        has_pending: next_step.is_some(),
        next_step,
        steps: items,
    }
}
