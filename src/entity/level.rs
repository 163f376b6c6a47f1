use serde::{Deserialize, Serialize};

/// A CEFR proficiency band, A1 (lowest) to C2 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CefrLevel {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "Beginner",
            CefrLevel::A2 => "Elementary",
            CefrLevel::B1 => "Intermediate",
            CefrLevel::B2 => "Upper Intermediate",
            CefrLevel::C1 => "Advanced",
            CefrLevel::C2 => "Proficient",
        }
    }

    pub fn coach_band(&self) -> CoachBand {
        match self {
            CefrLevel::A1 | CefrLevel::A2 => CoachBand::Beginner,
            CefrLevel::B1 | CefrLevel::B2 => CoachBand::Intermediate,
            CefrLevel::C1 | CefrLevel::C2 => CoachBand::Advanced,
        }
    }
}

impl std::fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            _ => Err(format!("Invalid CEFR level: {}", s)),
        }
    }
}

/// Coarser grouping of levels used to pick a coach program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoachBand {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CoachBand {
    pub const ALL: [CoachBand; 3] = [
        CoachBand::Beginner,
        CoachBand::Intermediate,
        CoachBand::Advanced,
    ];

    /// True if `name` is one of the coach programs.
    pub fn is_coach_program(name: &str) -> bool {
        Self::ALL.iter().any(|b| b.program_name() == name)
    }

    /// Name of the seeded coach program for this band.
    pub fn program_name(&self) -> &'static str {
        match self {
            CoachBand::Beginner => "English Coach A1-A2",
            CoachBand::Intermediate => "English Coach B1-B2",
            CoachBand::Advanced => "English Coach C1-C2",
        }
    }

    /// Band for a stored level name. Only exact names (`"B2"`, not `"b2"`)
    /// match; anything else falls back to beginner.
    pub fn for_level_name(level: &str) -> Self {
        CefrLevel::ALL
            .iter()
            .find(|l| l.as_str() == level)
            .map(|l| l.coach_band())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for CoachBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoachBand::Beginner => write!(f, "beginner"),
            CoachBand::Intermediate => write!(f, "intermediate"),
            CoachBand::Advanced => write!(f, "advanced"),
        }
    }
}
