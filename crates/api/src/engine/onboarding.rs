//! Onboarding engine.
//!
//! Loads settings, the form catalog, and the per-user facts, then runs the
//! step resolver and completion checker from `agapefy_core`. Nothing is
//! cached: every call reflects the current database state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use agapefy_core::onboarding_progress::{
    build_checklist, fact_needs, has_active_form_step, Checklist, CompletionFacts, WhatsappLink,
};
use agapefy_core::onboarding_steps::{
    find_root_form, resolve_onboarding_steps, OnboardingForm, StepDescriptor,
};
use agapefy_core::settings::{onboarding_setting_keys, OnboardingSettings};
use agapefy_core::types::{DbId, UserId};
use agapefy_db::repositories::whatsapp_user_repo::UNLINKED_SCAN_LIMIT;
use agapefy_db::repositories::{
    FormRepo, FormResponseRepo, PlaylistRepo, SettingRepo, WhatsappUserRepo,
};
use sqlx::PgPool;

static MISSING_SERVICE_ROLE_WARNED: AtomicBool = AtomicBool::new(false);

/// Log the missing service-role pool once per process.
pub fn warn_missing_service_role() {
    if !MISSING_SERVICE_ROLE_WARNED.swap(true, Ordering::Relaxed) {
        tracing::warn!(
            "SERVICE_DATABASE_URL is not configured; onboarding status will report pending"
        );
    }
}

// ---------------------------------------------------------------------------
// Step resolution
// ---------------------------------------------------------------------------

/// Every resolved step (active and inactive) plus the root form id.
#[derive(Debug, Clone)]
pub struct ResolvedSteps {
    pub all: Vec<StepDescriptor>,
    pub root_form_id: Option<DbId>,
}

impl ResolvedSteps {
    /// Active steps in position order.
    pub fn active(&self) -> Vec<StepDescriptor> {
        self.all.iter().filter(|s| s.is_active).cloned().collect()
    }
}

/// Read the onboarding settings, with defaults for missing keys.
pub async fn load_settings(pool: &PgPool) -> Result<OnboardingSettings, sqlx::Error> {
    let rows = SettingRepo::get_many(pool, &onboarding_setting_keys()).await?;
    Ok(OnboardingSettings::from_pairs(
        rows.iter().map(|r| (r.key.as_str(), r.value.as_str())),
    ))
}

/// Load settings and the form catalog and resolve the ordered step list.
pub async fn resolve_steps(pool: &PgPool) -> Result<ResolvedSteps, sqlx::Error> {
    let settings = load_settings(pool).await?;
    let forms: Vec<OnboardingForm> = FormRepo::list_catalog(pool)
        .await?
        .into_iter()
        .map(OnboardingForm::from)
        .collect();

    let root_form_id = find_root_form(&forms).map(|f| f.id);
    let all = resolve_onboarding_steps(&settings, &forms);

    tracing::debug!(
        forms = forms.len(),
        steps = all.len(),
        ?root_form_id,
        "Resolved onboarding steps"
    );

    Ok(ResolvedSteps { all, root_form_id })
}

// ---------------------------------------------------------------------------
// Completion facts
// ---------------------------------------------------------------------------

/// Find the user's WhatsApp registration.
///
/// With `legacy_fallback`, a user with no linked row adopts the most
/// recently updated row that has no `user_id` at all. This is a guess and
/// can attribute someone else's number to the user.
pub async fn find_whatsapp_link(
    pool: &PgPool,
    user_id: UserId,
    legacy_fallback: bool,
) -> Result<Option<WhatsappLink>, sqlx::Error> {
    if let Some(row) = WhatsappUserRepo::find_by_user_id(pool, user_id).await? {
        return Ok(Some(row.into()));
    }
    if !legacy_fallback {
        return Ok(None);
    }

    let candidates = WhatsappUserRepo::list_recent_unlinked(pool, UNLINKED_SCAN_LIMIT).await?;
    let adopted = candidates.into_iter().next();
    if let Some(row) = &adopted {
        tracing::warn!(
            %user_id,
            whatsapp_user_id = row.id,
            "Adopting unlinked WhatsApp registration for onboarding check"
        );
    }
    Ok(adopted.map(WhatsappLink::from))
}

/// Gather the facts the given active steps need. Lookups no step needs
/// are skipped.
pub async fn load_completion_facts(
    pool: &PgPool,
    user_id: UserId,
    active: &[StepDescriptor],
    root_form_id: Option<DbId>,
    legacy_fallback: bool,
) -> Result<CompletionFacts, sqlx::Error> {
    let needs = fact_needs(active, root_form_id);

    let answered_form_ids: HashSet<DbId> =
        FormResponseRepo::answered_form_ids(pool, user_id, &needs.form_ids)
            .await?
            .into_iter()
            .collect();

    let whatsapp = if needs.whatsapp {
        find_whatsapp_link(pool, user_id, legacy_fallback).await?
    } else {
        None
    };

    let routine_audio_count = if needs.routine {
        PlaylistRepo::routine_audio_count(pool, user_id).await?
    } else {
        None
    };

    Ok(CompletionFacts {
        answered_form_ids,
        root_form_id,
        whatsapp,
        routine_audio_count,
    })
}

/// Resolve the steps and compute the user's checklist in one go.
pub async fn user_checklist(
    pool: &PgPool,
    user_id: UserId,
    legacy_fallback: bool,
) -> Result<Checklist, sqlx::Error> {
    let resolved = resolve_steps(pool).await?;
    let active = resolved.active();
    if !has_active_form_step(&active) {
        return Ok(Checklist::nothing_pending());
    }

    let facts =
        load_completion_facts(pool, user_id, &active, resolved.root_form_id, legacy_fallback)
            .await?;
    Ok(build_checklist(&active, &facts))
}
