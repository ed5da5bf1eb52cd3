//! View-state containers.
//!
//! A [`View`] owns the `data`/`loading`/`error` triple for one screen. It fetches through a
//! [`ViewSource`] when built, when its scope changes and after every mutation. Mutations never
//! touch `data` directly; the re-fetch is the only thing that updates it.

pub mod community;
pub mod content;
pub mod dashboard;

use crate::database::Database;
use crate::error::StoreError;
use log::{debug, error};

pub use community::{
    AchievementsSource, AchievementsView, DailyChallengesSource, DailyChallengesView, DailyProblemsSource,
    DailyProblemsView, FeedbackSource, FeedbackView, UsersSource, UsersView,
};
pub use content::{
    AssessmentsSource, AssessmentsView, CoursesSource, CoursesView, LessonsSource, LessonsView, ModulesSource,
    ModulesView, QuizzesSource, QuizzesView,
};
pub use dashboard::{Dashboard, DashboardSource, DashboardView, Section, SectionError};

/// Where a view loads its data from, including any scope such as a parent id
pub trait ViewSource {
    type Data: Default;

    fn fetch(&self, db: &Database) -> Result<Self::Data, StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct View<S: ViewSource> {
    db: Database,
    source: S,
    state: ViewState<S::Data>,
}

impl<S: ViewSource> View<S> {
    /// Builds the view and performs the first fetch
    pub fn new(db: Database, source: S) -> Self {
        let mut view = View {
            db,
            source,
            state: ViewState::default(),
        };
        view.refresh();
        view
    }

    pub fn state(&self) -> &ViewState<S::Data> {
        &self.state
    }

    pub fn data(&self) -> &S::Data {
        &self.state.data
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Re-runs the fetch. On failure the previous data is kept and the error recorded.
    pub fn refresh(&mut self) {
        self.state.loading = true;
        match self.source.fetch(&self.db) {
            Ok(data) => {
                self.state.data = data;
                self.state.error = None;
            }
            Err(e) => {
                error!("View refresh failed: {}", e);
                self.state.error = Some(e.to_string());
            }
        }
        self.state.loading = false;
    }

    /// Switches scope. Data from the old scope is dropped before fetching the new one.
    pub fn set_source(&mut self, source: S) {
        self.source = source;
        self.state.data = S::Data::default();
        self.refresh();
    }

    /// Runs `op` against the store, then re-fetches whatever the outcome.
    /// A failed `op` is recorded in `error` and returned.
    pub fn mutate<R>(
        &mut self,
        op: impl FnOnce(&Database, &S) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        self.state.loading = true;
        let result = op(&self.db, &self.source);
        self.refresh();
        if let Err(e) = &result {
            debug!("Mutation failed: {}", e);
            self.state.error = Some(e.to_string());
        }
        result
    }
}
