//! Skill display filtering.
//!
//! Filtering always starts from a cleanup pass that drops placeholder
//! entries leaked into the dataset (category pages, roster pages, literal
//! "none" rows), then applies the two user toggles. Both toggles are
//! monotonic narrowing steps, so their evaluation order does not matter.

use serde::{Deserialize, Serialize};

use crate::effects::Effect;
use crate::models::Skill;

/// The two user-facing filter toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Keep only skills with at least one effect tag.
    pub require_effect: bool,
    /// Drop skills whose entire effect set is exactly `{Elite}`.
    pub hide_elite_only: bool,
}

/// Names of category/group wiki pages that appear as pseudo-skills in one
/// known dataset snapshot. Data-quality configuration, not core logic.
const DEFAULT_BLOCKLIST: &[&str] = &[
    "Warriors",
    "Rangers",
    "Monks",
    "Necromancers",
    "Mesmers",
    "Elementalists",
    "Assassins",
    "Ritualists",
    "Paragons",
    "Dervishes",
    "Humans",
    "Asura",
    "Charr",
    "Norn",
    "Sylvari",
    "Corsairs",
    "Kournans",
    "Undead",
    "Ghosts",
    "Dragons",
    "Demons",
    "NPCs",
    "Creatures",
    "Animals",
    "Bosses",
    "Elites",
    "Chahbek Village NPCs",
    "Consulate Docks NPCs",
    "Gate of Desolation NPCs",
    "Ruins of Morah NPCs",
    "Domain of Anguish NPCs",
];

/// Cleanup rules for placeholder pseudo-skill entries. The block-list
/// defaults to the known snapshot and can be replaced from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Exact skill names to treat as non-skills.
    pub blocklist: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            blocklist: DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilterRules {
    /// Rules with a caller-supplied block-list.
    pub fn with_blocklist(blocklist: Vec<String>) -> Self {
        Self { blocklist }
    }

    /// Whether a skill entry is a structural placeholder rather than an
    /// actual skill: empty or "none" name, a block-listed category/group
    /// name, or a link that points at a category or roster page.
    pub fn is_placeholder(&self, skill: &Skill) -> bool {
        let name = skill.name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            return true;
        }
        if self.blocklist.iter().any(|entry| entry == name) {
            return true;
        }
        if let Some(link) = skill.wiki_link.as_deref() {
            if link.contains("Category:") || link.ends_with("NPCs") {
                return true;
            }
        }
        if let Some(page) = skill.skill_page_url.as_deref() {
            if page.contains("Category:") || page.ends_with("NPCs") {
                return true;
            }
        }
        false
    }
}

/// Produce the displayable subset of a foe's skills, preserving input order.
pub fn filter_skills<'a>(
    skills: &'a [Skill],
    opts: FilterOptions,
    rules: &FilterRules,
) -> Vec<&'a Skill> {
    skills
        .iter()
        .filter(|skill| !rules.is_placeholder(skill))
        .filter(|skill| !opts.require_effect || !skill.effect_tags().is_empty())
        .filter(|skill| !opts.hide_elite_only || !is_elite_only(skill))
        .collect()
}

fn is_elite_only(skill: &Skill) -> bool {
    let tags = skill.effect_tags();
    tags.len() == 1 && tags[0] == Effect::Elite
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, effects: &[&str]) -> Skill {
        Skill {
            name: name.to_string(),
            icon: None,
            wiki_link: None,
            skill_page_url: None,
            effects: effects.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn base_cleanup_only_removes_placeholders() {
        let skills = vec![
            skill("Fireball", &["Elite"]),
            skill("none", &[]),
            skill("", &[]),
            skill("Corsairs", &[]),
            skill("Healing Breeze", &[]),
        ];
        let kept = filter_skills(&skills, FilterOptions::default(), &FilterRules::default());
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Fireball", "Healing Breeze"]);
    }

    #[test]
    fn category_links_are_placeholders() {
        let mut category = skill("Flare", &[]);
        category.wiki_link = Some("https://example.org/Category:Fire_Magic".to_string());
        let mut roster = skill("Torment", &[]);
        roster.skill_page_url = Some("https://example.org/Gate_of_Pain_NPCs".to_string());
        let skills = vec![category, roster, skill("Flare", &[])];
        let kept = filter_skills(&skills, FilterOptions::default(), &FilterRules::default());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn require_effect_drops_effectless_skills() {
        let skills = vec![skill("Fireball", &["Elite"]), skill("Heal", &[])];
        let opts = FilterOptions {
            require_effect: true,
            hide_elite_only: false,
        };
        let kept = filter_skills(&skills, opts, &FilterRules::default());
        assert!(kept.iter().all(|s| !s.effect_tags().is_empty()));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn hide_elite_only_keeps_elites_with_other_tags() {
        let skills = vec![
            skill("Fireball", &["Elite"]),
            skill("Backbreaker", &["Elite", "Knockdown"]),
            skill("Heal", &[]),
        ];
        let opts = FilterOptions {
            require_effect: false,
            hide_elite_only: true,
        };
        let kept = filter_skills(&skills, opts, &FilterRules::default());
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Backbreaker", "Heal"]);
    }

    #[test]
    fn elite_detection_is_case_insensitive() {
        let skills = vec![skill("Fireball", &["elite"])];
        let opts = FilterOptions {
            require_effect: false,
            hide_elite_only: true,
        };
        assert!(filter_skills(&skills, opts, &FilterRules::default()).is_empty());
    }

    #[test]
    fn both_toggles_leave_nothing_for_elite_and_effectless() {
        let skills = vec![skill("Fireball", &["Elite"]), skill("Heal", &[])];
        let opts = FilterOptions {
            require_effect: true,
            hide_elite_only: true,
        };
        assert!(filter_skills(&skills, opts, &FilterRules::default()).is_empty());
    }

    #[test]
    fn custom_blocklist_replaces_default() {
        let rules = FilterRules::with_blocklist(vec!["Fireball".to_string()]);
        let skills = vec![skill("Fireball", &["Elite"]), skill("Corsairs", &[])];
        let kept = filter_skills(&skills, FilterOptions::default(), &rules);
        // "Corsairs" is only blocked by the default list, not this one.
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Corsairs");
    }
}
