use std::sync::Arc;

use tracing::info;

use quiz_core::model::TestId;
use quiz_core::{QuizSession, SessionOptions};

use crate::Clock;
use crate::catalog::CatalogService;
use crate::error::SessionError;

/// Creates sessions from catalog entries.
#[derive(Debug, Clone)]
pub struct QuizService {
    clock: Clock,
    catalog: Arc<CatalogService>,
    options: SessionOptions,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<CatalogService>) -> Self {
        Self {
            clock,
            catalog,
            options: SessionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Sets up a not-yet-started session for the given test.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if the test cannot be loaded.
    pub fn prepare_session(&self, test_id: TestId) -> Result<QuizSession, SessionError> {
        self.prepare_session_with_duration(test_id, None)
    }

    /// Like [`QuizService::prepare_session`], optionally replacing the test's
    /// time limit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if the test cannot be loaded and
    /// `SessionError::Test` if `duration_minutes` is zero.
    pub fn prepare_session_with_duration(
        &self,
        test_id: TestId,
        duration_minutes: Option<u32>,
    ) -> Result<QuizSession, SessionError> {
        let mut test = self.catalog.load_test(test_id)?;
        if let Some(minutes) = duration_minutes {
            test = test.with_duration_minutes(minutes)?;
        }

        let session = QuizSession::with_options(test, self.clock, self.options);
        info!(
            session = %session.session_id(),
            test = %test_id,
            minutes = session.test().duration_minutes(),
            "session prepared"
        );
        Ok(session)
    }
}
