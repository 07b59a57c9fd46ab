//! Difficulty module - style tiers for generated practice material

use std::fmt;

/// Difficulty tier for generated practice material
///
/// Each tier carries a fixed style directive that is sent to the backend:
/// - Beginner: short survival phrases and greetings
/// - Intermediate: casual conversational sentences
/// - Advanced: sophisticated idiomatic expressions, no cliched proverbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyTier {
    /// Essential daily phrases
    Beginner,

    /// Natural conversation
    #[default]
    Intermediate,

    /// Idioms, slang and professional register
    Advanced,
}

impl DifficultyTier {
    /// All tiers, easiest first
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(DifficultyTier::Beginner),
            "intermediate" => Some(DifficultyTier::Intermediate),
            "advanced" => Some(DifficultyTier::Advanced),
            _ => None,
        }
    }

    /// Style directive embedded in the expression prompt for this tier
    pub fn style_directive(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => {
                "Use short, essential survival phrases for daily life and basic greetings."
            }
            DifficultyTier::Intermediate => {
                "Use casual, natural conversational sentences expressing feelings, opinions, or everyday situations."
            }
            DifficultyTier::Advanced => {
                "Use sophisticated, idiomatic expressions, slang, or professional business phrasing as a native speaker would. Do not use cliched proverbs or textbook sayings."
            }
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid difficulty tier: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_is_case_insensitive() {
        assert_eq!(DifficultyTier::parse("beginner"), Some(DifficultyTier::Beginner));
        assert_eq!(DifficultyTier::parse("INTERMEDIATE"), Some(DifficultyTier::Intermediate));
        assert_eq!(DifficultyTier::parse(" Advanced "), Some(DifficultyTier::Advanced));
        assert_eq!(DifficultyTier::parse("expert"), None);
    }

    #[test]
    fn test_tier_from_str_round_trip() {
        for tier in DifficultyTier::ALL {
            let parsed: DifficultyTier = tier.to_string().parse().unwrap();
            assert_eq!(parsed, tier);
        }
        assert!("".parse::<DifficultyTier>().is_err());
    }

    #[test]
    fn test_advanced_excludes_proverbs() {
        assert!(DifficultyTier::Advanced.style_directive().contains("cliched proverbs"));
    }
}
