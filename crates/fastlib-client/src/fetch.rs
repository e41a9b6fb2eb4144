//! Fetch-then-render screen state with stale-response protection.
//!
//! Every request a screen issues is stamped with a [`Generation`] drawn
//! from one monotonically increasing [`GenerationCounter`]. A slot only
//! accepts the response for the generation it most recently issued, so a
//! slow response can never overwrite a newer one.

use crate::error::ApiError;

/// Identity of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct GenerationCounter {
    last: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> Generation {
        self.last += 1;
        Generation(self.last)
    }
}

/// Lifecycle of a single GET-backed record or collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// The server answered 404.
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Fetch<T> {
    state: FetchState<T>,
    pending: Option<Generation>,
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Idle,
            pending: None,
        }
    }
}

impl<T> Fetch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the fetch. Any earlier in-flight request becomes stale.
    pub fn begin(&mut self, counter: &mut GenerationCounter) -> Generation {
        let generation = counter.next();
        self.pending = Some(generation);
        self.state = FetchState::Loading;
        generation
    }

    /// Re-fetch while keeping already loaded data on screen until the
    /// response lands. Behaves like [`Fetch::begin`] when nothing is loaded.
    pub fn refresh(&mut self, counter: &mut GenerationCounter) -> Generation {
        if !matches!(self.state, FetchState::Loaded(_)) {
            return self.begin(counter);
        }
        let generation = counter.next();
        self.pending = Some(generation);
        generation
    }

    /// Apply a response. Returns `false` (and changes nothing) when the
    /// response belongs to a superseded or cancelled request.
    pub fn resolve(&mut self, generation: Generation, result: Result<T, ApiError>) -> bool {
        if self.pending != Some(generation) {
            tracing::debug!(generation = generation.value(), "discarding stale response");
            return false;
        }
        self.pending = None;
        self.state = match result {
            Ok(data) => FetchState::Loaded(data),
            Err(e) if e.is_not_found() => FetchState::NotFound,
            Err(e) => FetchState::Failed(e.user_message()),
        };
        true
    }

    /// Replace the held data with a record obtained some other way
    /// (e.g. the response to an update call).
    pub fn replace(&mut self, data: T) {
        self.pending = None;
        self.state = FetchState::Loaded(data);
    }

    /// Forget the in-flight request; its response will be ignored.
    pub fn cancel(&mut self) {
        self.pending = None;
        if self.is_loading() {
            self.state = FetchState::Idle;
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    pub fn pending(&self) -> Option<Generation> {
        self.pending
    }

    /// A request is outstanding, including a background [`Fetch::refresh`].
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Query-parameterized search with its own result set, independent of the
/// screen's main collection.
#[derive(Debug, Clone)]
pub struct Search<T> {
    query: String,
    results: Option<Vec<T>>,
    error: Option<String>,
    pending: Option<Generation>,
}

impl<T> Default for Search<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: None,
            error: None,
            pending: None,
        }
    }
}

impl<T> Search<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    /// The query the current results (or pending search) belong to.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Submit `query`. Returns `None` while a search is already pending;
    /// the rejected query is dropped and the shown one stays.
    pub fn begin(
        &mut self,
        query: impl Into<String>,
        counter: &mut GenerationCounter,
    ) -> Option<(Generation, String)> {
        if self.is_searching() {
            return None;
        }
        let generation = counter.next();
        self.query = query.into();
        self.pending = Some(generation);
        self.error = None;
        Some((generation, self.query.clone()))
    }

    pub fn resolve(&mut self, generation: Generation, result: Result<Vec<T>, ApiError>) -> bool {
        if self.pending != Some(generation) {
            tracing::debug!(generation = generation.value(), "discarding stale search response");
            return false;
        }
        self.pending = None;
        match result {
            Ok(found) => self.results = Some(found),
            Err(e) => {
                tracing::warn!(error = %e, query = %self.query, "search failed");
                self.error = Some(e.user_message());
            }
        }
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Drop the query, results and any pending search.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn results(&self) -> &[T] {
        self.results.as_deref().unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A completed search for a non-empty query that found nothing.
    pub fn shows_empty_notice(&self) -> bool {
        !self.query.trim().is_empty() && self.results.as_ref().is_some_and(|r| r.is_empty())
    }
}
