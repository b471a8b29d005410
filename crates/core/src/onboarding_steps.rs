//! Onboarding step resolution.
//!
//! Combines admin-authored forms with the five settings-driven fixed screens
//! into one ordered list of [`StepDescriptor`]s. The list is a pure function
//! of the settings and the form catalog; nothing here touches the database.
//!
//! Slot allocation:
//!
//! 1. The root form (entry point of the flow) takes position 1.
//! 2. Every other form with an `onboard_step` claims the first free position
//!    at or after it, in catalog order.
//! 3. The fixed steps claim the first free position at or after their
//!    configured position, in [`FixedStep::ALLOCATION_ORDER`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::settings::{FixedStep, OnboardingSettings, MAX_POSITION};
use crate::types::DbId;

/// Position reserved for the root form.
pub const ROOT_POSITION: i32 = 1;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The subset of a form record the resolver needs.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub schema: serde_json::Value,
    pub onboard_step: Option<i32>,
    pub is_active: bool,
    pub parent_form_id: Option<DbId>,
}

impl OnboardingForm {
    /// Whether the schema is an informational block rather than a list of
    /// questions.
    pub fn is_info_block(&self) -> bool {
        self.schema
            .as_object()
            .and_then(|obj| obj.get("type"))
            .and_then(|t| t.as_str())
            == Some("info")
    }
}

// ---------------------------------------------------------------------------
// Step descriptors
// ---------------------------------------------------------------------------

/// Static screens with special-cased behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaticKind {
    Preview,
    Whatsapp,
}

/// Fixed screens with no settings-driven behaviour beyond position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardcodedKind {
    Routine,
    WhatsappFinal,
    DailyVerse,
}

/// What a step is, serialized as `{"type": ..., <kind fields>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    Form {
        #[serde(rename = "formId")]
        form_id: DbId,
    },
    Info {
        #[serde(rename = "formId")]
        form_id: DbId,
    },
    Static {
        #[serde(rename = "staticKind")]
        static_kind: StaticKind,
    },
    Hardcoded {
        #[serde(rename = "hardcodedKind")]
        hardcoded_kind: HardcodedKind,
    },
}

impl StepKind {
    /// The backing form id for `form` and `info` steps.
    pub fn form_id(&self) -> Option<DbId> {
        match self {
            Self::Form { form_id } | Self::Info { form_id } => Some(*form_id),
            Self::Static { .. } | Self::Hardcoded { .. } => None,
        }
    }
}

impl From<FixedStep> for StepKind {
    fn from(step: FixedStep) -> Self {
        match step {
            FixedStep::Preview => Self::Static {
                static_kind: StaticKind::Preview,
            },
            FixedStep::Whatsapp => Self::Static {
                static_kind: StaticKind::Whatsapp,
            },
            FixedStep::Routine => Self::Hardcoded {
                hardcoded_kind: HardcodedKind::Routine,
            },
            FixedStep::WhatsappFinal => Self::Hardcoded {
                hardcoded_kind: HardcodedKind::WhatsappFinal,
            },
            FixedStep::DailyVerse => Self::Hardcoded {
                hardcoded_kind: HardcodedKind::DailyVerse,
            },
        }
    }
}

/// One resolved onboarding step. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub id: String,
    /// Ordering key; distinct from the user-facing display number.
    pub position: i32,
    #[serde(flatten)]
    pub kind: StepKind,
    pub title: String,
    pub description: String,
    pub is_active: bool,
}

impl StepDescriptor {
    fn from_form(form: &OnboardingForm, position: i32) -> Self {
        let kind = if form.is_info_block() {
            StepKind::Info { form_id: form.id }
        } else {
            StepKind::Form { form_id: form.id }
        };
        Self {
            id: format!("form-{}", form.id),
            position,
            kind,
            title: form.name.clone(),
            description: form.description.clone().unwrap_or_default(),
            is_active: form.is_active,
        }
    }

    fn from_fixed(step: FixedStep, settings: &OnboardingSettings, position: i32) -> Self {
        let config = settings.fixed(step);
        Self {
            id: step.step_id().to_string(),
            position,
            kind: step.into(),
            title: config.title.clone(),
            description: config.description.clone(),
            is_active: config.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Find the form that represents position 1.
///
/// Preference order: `onboard_step = 1` without a parent, any
/// `onboard_step = 1`, then the first parentless form with no step number.
/// A form numbered 2 or higher keeps its own slot and is never the root.
pub fn find_root_form(forms: &[OnboardingForm]) -> Option<&OnboardingForm> {
    forms
        .iter()
        .find(|f| f.onboard_step == Some(ROOT_POSITION) && f.parent_form_id.is_none())
        .or_else(|| forms.iter().find(|f| f.onboard_step == Some(ROOT_POSITION)))
        .or_else(|| {
            forms
                .iter()
                .find(|f| f.onboard_step.is_none() && f.parent_form_id.is_none())
        })
}

/// Resolve the full ordered step list, active and inactive.
///
/// `forms` must already be in catalog order (`onboard_step` nulls first,
/// then creation time); that order decides who wins a contested slot.
pub fn resolve_onboarding_steps(
    settings: &OnboardingSettings,
    forms: &[OnboardingForm],
) -> Vec<StepDescriptor> {
    let mut occupied = BTreeSet::new();
    let mut steps = Vec::with_capacity(forms.len() + FixedStep::ALLOCATION_ORDER.len());

    let root = find_root_form(forms);
    if let Some(root) = root {
        occupied.insert(ROOT_POSITION);
        steps.push(StepDescriptor::from_form(root, ROOT_POSITION));
    }
    let root_id = root.map(|r| r.id);

    for form in forms.iter().filter(|f| Some(f.id) != root_id) {
        let Some(desired) = form.onboard_step else {
            continue;
        };
        let position = claim_slot(&mut occupied, desired.clamp(ROOT_POSITION, MAX_POSITION));
        steps.push(StepDescriptor::from_form(form, position));
    }

    for step in FixedStep::ALLOCATION_ORDER {
        let desired = settings.fixed(step).desired_position;
        let position = claim_slot(&mut occupied, desired);
        steps.push(StepDescriptor::from_fixed(step, settings, position));
    }

    steps.sort_by_key(|s| s.position);
    steps
}

/// Only the steps a user should see, in order.
pub fn active_steps(steps: Vec<StepDescriptor>) -> Vec<StepDescriptor> {
    steps.into_iter().filter(|s| s.is_active).collect()
}

/// Claim the smallest free position `>= desired`.
///
/// Terminates after at most `occupied.len()` probes.
fn claim_slot(occupied: &mut BTreeSet<i32>, desired: i32) -> i32 {
    let mut candidate = desired;
    while occupied.contains(&candidate) {
        candidate += 1;
    }
    occupied.insert(candidate);
    candidate
}
