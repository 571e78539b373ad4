use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal pavement condition class, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionClass {
    /// Very good condition
    Best,
    /// Good condition
    Good,
    /// Fair condition
    Fair,
    /// Poor condition
    Poor,
    /// Very poor condition
    Worst,
}

impl ConditionClass {
    /// Every class, best first.
    pub const ALL: [ConditionClass; 5] = [
        ConditionClass::Best,
        ConditionClass::Good,
        ConditionClass::Fair,
        ConditionClass::Poor,
        ConditionClass::Worst,
    ];

    /// Classes reachable in simplified mode.
    pub const SIMPLIFIED: [ConditionClass; 3] = [
        ConditionClass::Good,
        ConditionClass::Fair,
        ConditionClass::Poor,
    ];

    /// Stable machine key
    pub fn key(&self) -> &'static str {
        match self {
            ConditionClass::Best => "best",
            ConditionClass::Good => "good",
            ConditionClass::Fair => "fair",
            ConditionClass::Poor => "poor",
            ConditionClass::Worst => "worst",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ConditionClass::Best => "Very Good",
            ConditionClass::Good => "Good",
            ConditionClass::Fair => "Fair",
            ConditionClass::Poor => "Poor",
            ConditionClass::Worst => "Very Poor",
        }
    }

    /// Position in best-to-worst order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Collapse to the three-bucket view: best becomes good, worst becomes poor.
    ///
    /// A pure re-mapping; no thresholds are consulted.
    pub fn simplify(self) -> ConditionClass {
        match self {
            ConditionClass::Best => ConditionClass::Good,
            ConditionClass::Worst => ConditionClass::Poor,
            other => other,
        }
    }

    /// The next class on the worse side, if any.
    pub fn worse(self) -> Option<ConditionClass> {
        match self {
            ConditionClass::Best => Some(ConditionClass::Good),
            ConditionClass::Good => Some(ConditionClass::Fair),
            ConditionClass::Fair => Some(ConditionClass::Poor),
            ConditionClass::Poor => Some(ConditionClass::Worst),
            ConditionClass::Worst => None,
        }
    }

    pub fn is_fair_or_better(self) -> bool {
        self <= ConditionClass::Fair
    }
}

impl fmt::Display for ConditionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConditionClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" | "very good" | "very_good" => Ok(ConditionClass::Best),
            "good" => Ok(ConditionClass::Good),
            "fair" => Ok(ConditionClass::Fair),
            "poor" => Ok(ConditionClass::Poor),
            "worst" | "very poor" | "very_poor" => Ok(ConditionClass::Worst),
            other => Err(format!("unknown condition class '{}'", other)),
        }
    }
}

/// Class-count mode for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassMode {
    /// Five classes, best..worst
    #[default]
    Full,
    /// Three classes, good/fair/poor; the "best" boundary is ignored
    Simplified,
}

impl ClassMode {
    /// Classes this mode can produce, best first.
    pub fn classes(self) -> &'static [ConditionClass] {
        match self {
            ClassMode::Full => &ConditionClass::ALL,
            ClassMode::Simplified => &ConditionClass::SIMPLIFIED,
        }
    }

    /// Map a class into this mode's enumeration.
    pub fn project(self, class: ConditionClass) -> ConditionClass {
        match self {
            ClassMode::Full => class,
            ClassMode::Simplified => class.simplify(),
        }
    }
}
