//! Effect tags and raw-label normalization.
//!
//! The dataset stores effect labels as free-form strings scraped from the
//! wiki; casing and punctuation are not consistent between records. Labels
//! are normalized to a closed set of canonical tags before any lookup, and
//! labels outside the set are passed through unchanged rather than rejected.

use std::fmt;

use crate::models::Foe;

/// Canonical tactical-effect tag carried by a skill.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {
    Knockdown,
    MonsterSkill,
    Resurrection,
    Interrupt,
    SlowCripple,
    EnchantmentRemoval,
    HexRemoval,
    ConditionRemoval,
    Ims,
    Elite,
    Variant,
    MultipleEffects,
    /// Unrecognized label, preserved verbatim.
    Other(String),
}

/// The fixed enumeration, in legend display order.
pub const ALL_EFFECTS: [Effect; 12] = [
    Effect::Knockdown,
    Effect::MonsterSkill,
    Effect::Resurrection,
    Effect::Interrupt,
    Effect::SlowCripple,
    Effect::EnchantmentRemoval,
    Effect::HexRemoval,
    Effect::ConditionRemoval,
    Effect::Ims,
    Effect::Elite,
    Effect::Variant,
    Effect::MultipleEffects,
];

impl Effect {
    /// Map a raw label to its canonical tag, insensitive to case and
    /// punctuation. Unknown labels come back as [`Effect::Other`] carrying
    /// the original string; this never fails.
    pub fn normalize(raw: &str) -> Effect {
        match canonical_key(raw).as_str() {
            "knockdown" => Effect::Knockdown,
            "monster_skill" => Effect::MonsterSkill,
            "resurrection" => Effect::Resurrection,
            "interrupt" => Effect::Interrupt,
            "slow_cripple" => Effect::SlowCripple,
            "enchantment_removal" => Effect::EnchantmentRemoval,
            "hex_removal" => Effect::HexRemoval,
            "condition_removal" => Effect::ConditionRemoval,
            "ims" => Effect::Ims,
            "elite" => Effect::Elite,
            "variant" => Effect::Variant,
            "multiple_effects" => Effect::MultipleEffects,
            _ => Effect::Other(raw.to_string()),
        }
    }

    /// Canonical tag string, as used in the dataset and the wiki.
    pub fn tag(&self) -> &str {
        match self {
            Effect::Knockdown => "Knockdown",
            Effect::MonsterSkill => "Monster_Skill",
            Effect::Resurrection => "Resurrection",
            Effect::Interrupt => "Interrupt",
            Effect::SlowCripple => "Slow_Cripple",
            Effect::EnchantmentRemoval => "Enchantment_Removal",
            Effect::HexRemoval => "Hex_Removal",
            Effect::ConditionRemoval => "Condition_Removal",
            Effect::Ims => "IMS",
            Effect::Elite => "Elite",
            Effect::Variant => "Variant",
            Effect::MultipleEffects => "Multiple_Effects",
            Effect::Other(raw) => raw,
        }
    }

    /// Short badge label. Unknown tags display as themselves.
    pub fn short_label(&self) -> &str {
        match self {
            Effect::Knockdown => "KD",
            Effect::MonsterSkill => "Monster Skill",
            Effect::Resurrection => "Rez",
            Effect::Interrupt => "Interrupt",
            Effect::SlowCripple => "Slow",
            Effect::EnchantmentRemoval => "Enchantment Strip",
            Effect::HexRemoval => "Hex Removal",
            Effect::ConditionRemoval => "Condition Removal",
            Effect::Ims => "IMS",
            Effect::Elite => "Elite",
            Effect::Variant => "Variant",
            Effect::MultipleEffects => "Multi",
            Effect::Other(raw) => raw,
        }
    }

    /// Highlight color as a `#rrggbb` hex string. Tags without a configured
    /// color render without a highlight.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Effect::Knockdown => Some("#f8f17a"),
            Effect::MonsterSkill => Some("#d86c00"),
            Effect::Resurrection => Some("#9bc4ff"),
            Effect::Interrupt => Some("#ff9aff"),
            Effect::SlowCripple => Some("#969664"),
            Effect::EnchantmentRemoval => Some("#cba3ff"),
            Effect::HexRemoval => Some("#b28aff"),
            Effect::ConditionRemoval => Some("#9966ff"),
            Effect::Ims => Some("#8fff8f"),
            Effect::Elite => Some("#fedd02"),
            Effect::Variant => Some("#ff6666"),
            Effect::MultipleEffects | Effect::Other(_) => None,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Lowercase, collapse to `[a-z0-9]` runs joined by single underscores,
/// trim leading/trailing underscores.
fn canonical_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    key
}

/// Derived effect set for a foe: the union of its skills' tags plus the
/// synthetic `Variant` tag when the foe's build differs by instance.
pub fn foe_effects(foe: &Foe) -> Vec<Effect> {
    let mut tags = Vec::new();
    for skill in &foe.skills {
        for tag in skill.effect_tags() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    if foe.variant && !tags.contains(&Effect::Variant) {
        tags.push(Effect::Variant);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skill;

    #[test]
    fn normalize_ignores_case_and_punctuation() {
        for raw in ["monster skill", "Monster_Skill", "MONSTER-SKILL", " monster  skill "] {
            assert_eq!(Effect::normalize(raw), Effect::MonsterSkill, "label {raw:?}");
        }
        assert_eq!(Effect::normalize("ims"), Effect::Ims);
        assert_eq!(Effect::normalize("Slow/Cripple"), Effect::SlowCripple);
    }

    #[test]
    fn unknown_labels_pass_through_unchanged() {
        let tag = Effect::normalize("Daze");
        assert_eq!(tag, Effect::Other("Daze".to_string()));
        assert_eq!(tag.tag(), "Daze");
        assert_eq!(tag.short_label(), "Daze");
        assert!(tag.color().is_none());
    }

    #[test]
    fn short_labels_match_display_table() {
        assert_eq!(Effect::Knockdown.short_label(), "KD");
        assert_eq!(Effect::Resurrection.short_label(), "Rez");
        assert_eq!(Effect::EnchantmentRemoval.short_label(), "Enchantment Strip");
        assert_eq!(Effect::MultipleEffects.short_label(), "Multi");
    }

    #[test]
    fn multiple_effects_has_no_color() {
        assert!(Effect::MultipleEffects.color().is_none());
        assert_eq!(Effect::Elite.color(), Some("#fedd02"));
    }

    #[test]
    fn foe_effects_include_variant_flag() {
        let foe = Foe {
            name: "Shiro'ken Assassin".to_string(),
            profession: None,
            profession_icon: None,
            wiki_url: None,
            is_boss: false,
            variant: true,
            skills: vec![Skill {
                name: "Horns of the Ox".to_string(),
                icon: None,
                wiki_link: None,
                skill_page_url: None,
                effects: vec!["Knockdown".to_string()],
            }],
        };
        assert_eq!(foe_effects(&foe), vec![Effect::Knockdown, Effect::Variant]);
    }
}
