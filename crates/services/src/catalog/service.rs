use std::collections::HashMap;

use tracing::debug;

use quiz_core::model::{CatalogFilter, Question, TestDefinition, TestId, TestSummary, categories};

use super::data::{CatalogRecord, EMBEDDED_CATALOG, map_question};
use crate::error::CatalogError;

/// Read-only test catalog: what the home page lists and what a session loads.
#[derive(Debug, Clone)]
pub struct CatalogService {
    tests: Vec<TestSummary>,
    question_sets: HashMap<TestId, Vec<Question>>,
}

impl CatalogService {
    /// Catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded data is malformed.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Parses and validates catalog data.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, `DuplicateTest` or
    /// `UnknownTest` for inconsistent ids, and `Invalid` for questions that
    /// fail domain validation.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let record: CatalogRecord = serde_json::from_str(raw)?;

        let mut tests: Vec<TestSummary> = Vec::with_capacity(record.tests.len());
        for test in record.tests {
            if tests.iter().any(|existing| existing.id == test.id) {
                return Err(CatalogError::DuplicateTest(test.id));
            }
            tests.push(test.into());
        }

        let mut question_sets = HashMap::with_capacity(record.question_sets.len());
        for set in record.question_sets {
            if !tests.iter().any(|test| test.id == set.test_id) {
                return Err(CatalogError::UnknownTest(set.test_id));
            }
            let questions = set
                .questions
                .into_iter()
                .map(map_question)
                .collect::<Result<Vec<_>, _>>()?;
            if question_sets.insert(set.test_id, questions).is_some() {
                return Err(CatalogError::DuplicateTest(set.test_id));
            }
        }

        debug!(
            tests = tests.len(),
            question_sets = question_sets.len(),
            "catalog loaded"
        );
        Ok(Self {
            tests,
            question_sets,
        })
    }

    #[must_use]
    pub fn tests(&self) -> &[TestSummary] {
        &self.tests
    }

    #[must_use]
    pub fn filtered(&self, filter: &CatalogFilter) -> Vec<&TestSummary> {
        self.tests
            .iter()
            .filter(|test| filter.matches(test))
            .collect()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        categories(&self.tests)
    }

    #[must_use]
    pub fn summary(&self, id: TestId) -> Option<&TestSummary> {
        self.tests.iter().find(|test| test.id == id)
    }

    /// Builds the session configuration for one test.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownTest` for ids not in the catalog and
    /// `CatalogError::NoQuestions` for listed tests without a question set.
    pub fn load_test(&self, id: TestId) -> Result<TestDefinition, CatalogError> {
        let summary = self.summary(id).ok_or(CatalogError::UnknownTest(id))?;
        let questions = self
            .question_sets
            .get(&id)
            .ok_or(CatalogError::NoQuestions(id))?;

        let test = TestDefinition::new(
            summary.id,
            summary.title.clone(),
            summary.description.clone(),
            summary.duration_minutes,
            questions.clone(),
        )
        .map_err(quiz_core::Error::from)?;
        Ok(test)
    }
}
