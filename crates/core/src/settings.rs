//! Onboarding settings: keys, defaults, and parsing.
//!
//! The `app_settings` table is an untyped key/value store. Everything the
//! onboarding flow reads from it is parsed here, once, into
//! [`OnboardingSettings`] so that defaults live in a single place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fixed steps
// ---------------------------------------------------------------------------

/// The five built-in onboarding screens whose positions come from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedStep {
    /// Category preview screen (static).
    Preview,
    /// WhatsApp connect screen (static).
    Whatsapp,
    /// "Routine ready" screen (hardcoded 6).
    Routine,
    /// WhatsApp wrap-up screen (hardcoded 7).
    WhatsappFinal,
    /// Daily verse opt-in screen (hardcoded 8).
    DailyVerse,
}

impl FixedStep {
    /// Order in which fixed steps claim their slots.
    pub const ALLOCATION_ORDER: [FixedStep; 5] = [
        FixedStep::Preview,
        FixedStep::Whatsapp,
        FixedStep::Routine,
        FixedStep::WhatsappFinal,
        FixedStep::DailyVerse,
    ];

    fn index(self) -> usize {
        match self {
            Self::Preview => 0,
            Self::Whatsapp => 1,
            Self::Routine => 2,
            Self::WhatsappFinal => 3,
            Self::DailyVerse => 4,
        }
    }

    /// Stable step identifier used in API payloads.
    pub fn step_id(self) -> &'static str {
        match self {
            Self::Preview => "static-preview",
            Self::Whatsapp => "static-whatsapp",
            Self::Routine => "hardcoded-6",
            Self::WhatsappFinal => "hardcoded-7",
            Self::DailyVerse => "hardcoded-8",
        }
    }

    pub fn position_key(self) -> &'static str {
        match self {
            Self::Preview => "onboarding_static_preview_position",
            Self::Whatsapp => "onboarding_static_whatsapp_position",
            Self::Routine => "onboarding_hardcoded_6_position",
            Self::WhatsappFinal => "onboarding_hardcoded_7_position",
            Self::DailyVerse => "onboarding_hardcoded_8_position",
        }
    }

    pub fn active_key(self) -> &'static str {
        match self {
            Self::Preview => "onboarding_static_preview_active",
            Self::Whatsapp => "onboarding_static_whatsapp_active",
            Self::Routine => "onboarding_hardcoded_6_active",
            Self::WhatsappFinal => "onboarding_hardcoded_7_active",
            Self::DailyVerse => "onboarding_hardcoded_8_active",
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            Self::Preview => "onboarding_step2_title",
            Self::Whatsapp => "onboarding_step3_title",
            Self::Routine => "onboarding_step6_title",
            Self::WhatsappFinal => "onboarding_step7_title",
            Self::DailyVerse => "onboarding_step8_title",
        }
    }

    pub fn description_key(self) -> &'static str {
        match self {
            Self::Preview => "onboarding_step2_subtitle",
            Self::Whatsapp => "onboarding_step3_subtitle",
            Self::Routine => "onboarding_step6_subtitle",
            Self::WhatsappFinal => "onboarding_step7_subtitle",
            Self::DailyVerse => "onboarding_step8_subtitle",
        }
    }

    /// Position used when the setting is missing or unparseable.
    pub fn default_position(self) -> i32 {
        match self {
            Self::Preview => 2,
            Self::Whatsapp => 3,
            Self::Routine => 6,
            Self::WhatsappFinal => 7,
            Self::DailyVerse => 8,
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Preview => "Conheça suas orações",
            Self::Whatsapp => "Conecte seu WhatsApp",
            Self::Routine => "Sua rotina está pronta",
            Self::WhatsappFinal => "Tudo pronto no WhatsApp",
            Self::DailyVerse => "Versículo diário",
        }
    }

    pub fn default_description(self) -> &'static str {
        match self {
            Self::Preview => "Veja uma prévia das orações escolhidas para você",
            Self::Whatsapp => "Receba orações e mensagens diretamente no seu WhatsApp",
            Self::Routine => "Montamos uma rotina de oração com base nas suas respostas",
            Self::WhatsappFinal => "Seu companheiro espiritual já está disponível no WhatsApp",
            Self::DailyVerse => "Quer receber um versículo por dia no WhatsApp?",
        }
    }
}

/// Every settings key the onboarding flow reads.
pub fn onboarding_setting_keys() -> Vec<&'static str> {
    FixedStep::ALLOCATION_ORDER
        .iter()
        .flat_map(|step| {
            [
                step.position_key(),
                step.active_key(),
                step.title_key(),
                step.description_key(),
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parsed settings
// ---------------------------------------------------------------------------

/// Effective configuration for one fixed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStepSettings {
    pub desired_position: i32,
    pub is_active: bool,
    pub title: String,
    pub description: String,
}

/// Onboarding settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingSettings {
    fixed: [FixedStepSettings; 5],
}

impl OnboardingSettings {
    /// Build settings from raw `(key, value)` rows. Unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let raw: HashMap<&str, &str> = pairs.into_iter().collect();

        let fixed = FixedStep::ALLOCATION_ORDER.map(|step| FixedStepSettings {
            desired_position: parse_position(
                raw.get(step.position_key()).copied(),
                step.default_position(),
            ),
            is_active: parse_active_flag(raw.get(step.active_key()).copied()),
            title: text_or_default(raw.get(step.title_key()).copied(), step.default_title()),
            description: text_or_default(
                raw.get(step.description_key()).copied(),
                step.default_description(),
            ),
        });

        Self { fixed }
    }

    pub fn fixed(&self, step: FixedStep) -> &FixedStepSettings {
        &self.fixed[step.index()]
    }
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self::from_pairs(std::iter::empty())
    }
}

/// Highest position a setting (or a form's `onboard_step`) may request.
pub const MAX_POSITION: i32 = 9_999;

/// Parse a position setting. Anything that is not an integer in
/// `1..=MAX_POSITION` yields `default`.
pub fn parse_position(value: Option<&str>, default: i32) -> i32 {
    value
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|p| (1..=MAX_POSITION).contains(p))
        .unwrap_or(default)
}

/// Parse an `*_active` flag: active unless the value is literally `"false"`.
pub fn parse_active_flag(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim() != "false")
}

fn text_or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
