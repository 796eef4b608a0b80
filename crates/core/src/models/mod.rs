#![allow(missing_docs)]

//! Shared domain models for the foe dataset.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;

/// One dataset record: a vanquishable area or a mission within a campaign.
///
/// Areas carry a flat foe roster; missions carry parallel Normal/Hard
/// rosters. Optional fields default to empty so partially-scraped records
/// still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub campaign: String,
    #[serde(default, alias = "area", alias = "mission")]
    pub name: String,
    #[serde(default)]
    pub wiki_url: Option<String>,
    #[serde(flatten)]
    pub roster: Roster,
    #[serde(default)]
    pub avg_foes: Option<f64>,
    #[serde(default)]
    pub min_foes: Option<u32>,
    #[serde(default)]
    pub max_foes: Option<u32>,
}

impl Entry {
    /// Whether this record carries separate Normal/Hard rosters.
    pub fn has_modes(&self) -> bool {
        matches!(self.roster, Roster::Modes { .. })
    }

    /// Foes for the requested mode. Areas ignore the mode and always return
    /// their single roster; reading a mode never mutates the record.
    pub fn foes_for(&self, mode: Mode) -> &[Foe] {
        match &self.roster {
            Roster::Modes { builds } => match mode {
                Mode::Normal => &builds.normal,
                Mode::Hard => &builds.hard,
            },
            Roster::Flat { foes } => foes,
        }
    }
}

/// Foe roster shape. Mission records nest two rosters under `builds`;
/// area records have a flat `foes` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Roster {
    Modes { builds: ModeBuilds },
    Flat {
        #[serde(default)]
        foes: Vec<Foe>,
    },
}

/// Normal- and Hard-mode rosters of a mission record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeBuilds {
    #[serde(default)]
    pub normal: Vec<Foe>,
    #[serde(default)]
    pub hard: Vec<Foe>,
}

/// Difficulty mode selector for mission records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Hard,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Normal => Mode::Hard,
            Mode::Hard => Mode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Normal Mode",
            Mode::Hard => "Hard Mode",
        }
    }
}

/// An enemy combatant within an area or mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Foe {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub profession_icon: Option<String>,
    #[serde(default)]
    pub wiki_url: Option<String>,
    #[serde(default)]
    pub is_boss: bool,
    /// The foe's build may differ by instance or area.
    #[serde(default, alias = "multiple_builds")]
    pub variant: bool,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

/// An ability usable by a foe. Effects are stored as raw labels and
/// normalized to canonical tags on use; the foe's overall effect set is
/// always derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub wiki_link: Option<String>,
    #[serde(default)]
    pub skill_page_url: Option<String>,
    #[serde(default)]
    pub effects: Vec<String>,
}

impl Skill {
    /// Canonical effect tags, de-duplicated, in first-seen order.
    pub fn effect_tags(&self) -> Vec<Effect> {
        let mut tags = Vec::new();
        for raw in &self.effects {
            let tag = Effect::normalize(raw);
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Preferred link target for the skill, when the dataset has one.
    pub fn link(&self) -> Option<&str> {
        self.skill_page_url
            .as_deref()
            .or(self.wiki_link.as_deref())
            .filter(|url| !url.is_empty())
    }
}
