use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::TestId;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct DifficultyParseError(pub String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DifficultyParseError(s.to_string()))
    }
}

//
// ─── CATALOG ENTRY ─────────────────────────────────────────────────────────────
//

/// A test as listed on the catalog page.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    pub id: TestId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub questions_count: u32,
    pub duration_minutes: u32,
    pub rating: f32,
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// Category/difficulty selection. `None` stands for "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl CatalogFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn matches(&self, test: &TestSummary) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|category| test.category == category);
        let difficulty_match = self
            .difficulty
            .is_none_or(|difficulty| test.difficulty == difficulty);
        category_match && difficulty_match
    }

    /// Keeps catalog order.
    pub fn apply<'a>(
        &self,
        tests: &'a [TestSummary],
    ) -> impl Iterator<Item = &'a TestSummary> + use<'a, '_> {
        tests.iter().filter(|test| self.matches(test))
    }
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn categories(tests: &[TestSummary]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for test in tests {
        if !out.contains(&test.category.as_str()) {
            out.push(test.category.as_str());
        }
    }
    out
}
