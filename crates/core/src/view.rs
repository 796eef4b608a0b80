#![allow(missing_docs)]

//! Pure view-model builders for the card and legend display.
//!
//! These are deterministic transforms from dataset records plus selection
//! state to display structures; they never touch the dataset itself.

use crate::effects::{foe_effects, Effect, ALL_EFFECTS};
use crate::filter::{filter_skills, FilterOptions, FilterRules};
use crate::models::{Entry, Foe, Mode};

/// Effect badge attached to a skill row or the legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectBadge {
    pub effect: Effect,
    pub label: String,
    pub color: Option<&'static str>,
}

impl EffectBadge {
    fn new(effect: Effect) -> Self {
        let label = effect.short_label().to_string();
        let color = effect.color();
        Self {
            effect,
            label,
            color,
        }
    }
}

/// One displayable skill row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillView {
    pub name: String,
    pub icon: Option<String>,
    pub wiki_url: Option<String>,
    pub badges: Vec<EffectBadge>,
}

/// One foe card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoeView {
    pub name: String,
    pub wiki_url: Option<String>,
    pub profession: Option<String>,
    pub profession_icon: Option<String>,
    pub is_boss: bool,
    pub variant: bool,
    pub skills: Vec<SkillView>,
}

/// Legend badge with its highlight state for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub effect: Effect,
    pub label: String,
    pub color: Option<&'static str>,
    pub active: bool,
}

/// Complete view model for one area/mission selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaView {
    pub title: String,
    pub campaign: String,
    pub wiki_url: Option<String>,
    /// Present only for mission records with Normal/Hard rosters.
    pub mode: Option<Mode>,
    /// Total roster size before any filtering.
    pub foe_count: usize,
    pub legend: Vec<LegendEntry>,
    pub foes: Vec<FoeView>,
}

/// Build the card for one foe, or `None` when no skills survive filtering —
/// such foes are hidden from the output entirely.
pub fn build_foe_view(foe: &Foe, opts: FilterOptions, rules: &FilterRules) -> Option<FoeView> {
    let kept = filter_skills(&foe.skills, opts, rules);
    if kept.is_empty() {
        return None;
    }

    let skills = kept
        .into_iter()
        .map(|skill| SkillView {
            name: skill.name.clone(),
            icon: skill.icon.clone(),
            wiki_url: skill.link().map(str::to_string),
            badges: skill.effect_tags().into_iter().map(EffectBadge::new).collect(),
        })
        .collect();

    Some(FoeView {
        name: foe.name.clone(),
        wiki_url: foe.wiki_url.clone(),
        profession: foe.profession.clone(),
        profession_icon: foe.profession_icon.clone(),
        is_boss: foe.is_boss,
        variant: foe.variant,
        skills,
    })
}

/// Legend over the fixed effect enumeration. Activity is computed from the
/// foes' unfiltered skills plus their variant flags, so the legend reflects
/// roster totals and never changes when display filters are toggled.
pub fn build_legend(foes: &[Foe]) -> Vec<LegendEntry> {
    let mut present = Vec::new();
    for foe in foes {
        for tag in foe_effects(foe) {
            if !present.contains(&tag) {
                present.push(tag);
            }
        }
    }

    ALL_EFFECTS
        .iter()
        .map(|effect| LegendEntry {
            effect: effect.clone(),
            label: effect.short_label().to_string(),
            color: effect.color(),
            active: present.contains(effect),
        })
        .collect()
}

/// Build the full view model for a selection. Mode switching is a pure
/// re-read of the mission's other roster.
pub fn build_area_view(
    entry: &Entry,
    mode: Mode,
    opts: FilterOptions,
    rules: &FilterRules,
) -> AreaView {
    let foes = entry.foes_for(mode);
    AreaView {
        title: entry.name.clone(),
        campaign: entry.campaign.clone(),
        wiki_url: entry.wiki_url.clone(),
        mode: entry.has_modes().then_some(mode),
        foe_count: foes.len(),
        legend: build_legend(foes),
        foes: foes
            .iter()
            .filter_map(|foe| build_foe_view(foe, opts, rules))
            .collect(),
    }
}
