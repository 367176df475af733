//! Heatmap resolution.
//!
//! The host calls [`HeatmapResolver::resolve`] on every render with the
//! current specs. The resolver:
//!
//! 1. derives candidates from the specs, reusing the last derivation while the
//!    specs are unchanged;
//! 2. compares the candidates with the last *requested* candidates and stops
//!    there when they are equal;
//! 3. otherwise records them as requested under a fresh [`Generation`] and
//!    spawns a task that runs the [`HeatmapFilter`] and commits the result,
//!    but only if no newer request came in meanwhile.
//!
//! `resolve` never waits for step 3; it returns whatever is committed now.
//! Commits are also published on a `watch` channel, see
//! [`HeatmapResolver::subscribe`].
//!
//! ## Usage
//!
//! ```ignore
//! let resolver = HeatmapResolver::current(CompleteDataFilter)?;
//!
//! // per render
//! let layers = resolver.resolve(&specs);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{derive_candidates, Heatmap, HeatmapSpec};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("heatmap filter failed: {0}")]
    Filter(String),

    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("resolution task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ResolveError {
    /// Create a filter error.
    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }
}

/// Sequence number of a resolution request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Final step applied to the candidates before they are committed.
#[async_trait]
pub trait HeatmapFilter: Send + Sync + 'static {
    async fn filter(&self, candidates: Vec<Heatmap>) -> Result<Vec<Heatmap>, ResolveError>;
}

/// Drops candidates that have no data.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteDataFilter;

#[async_trait]
impl HeatmapFilter for CompleteDataFilter {
    async fn filter(&self, candidates: Vec<Heatmap>) -> Result<Vec<Heatmap>, ResolveError> {
        Ok(candidates
            .into_iter()
            .filter(|heatmap| heatmap.data.is_some())
            .collect())
    }
}

/// Counters describing what the resolver has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Times the candidates were re-derived from changed specs.
    pub derivations: u64,
    /// Resolution tasks started.
    pub requests: u64,
    /// Resolutions that replaced the committed output.
    pub commits: u64,
    /// Resolutions thrown away because a newer request superseded them.
    pub discarded: u64,
    /// Resolutions whose filter failed.
    pub failures: u64,
}

/// How a single resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Committed,
    Superseded,
    Failed,
}

/// Handle to a resolution started by [`HeatmapResolver::request`].
#[derive(Debug)]
pub struct Resolution {
    pub generation: Generation,
    handle: JoinHandle<ResolutionOutcome>,
}

impl Resolution {
    /// Wait for the resolution to finish.
    pub async fn outcome(self) -> Result<ResolutionOutcome, ResolveError> {
        Ok(self.handle.await?)
    }
}

struct Derivation {
    specs: Vec<HeatmapSpec>,
    candidates: Arc<Vec<Heatmap>>,
}

struct Requested {
    generation: Generation,
    candidates: Arc<Vec<Heatmap>>,
}

#[derive(Default)]
struct ResolverState {
    derived: Option<Derivation>,
    requested: Option<Requested>,
    last_generation: u64,
    stats: ResolverStats,
}

impl ResolverState {
    /// Candidates for `specs`, re-derived only when the specs changed.
    fn derive(&mut self, specs: &[HeatmapSpec]) -> Arc<Vec<Heatmap>> {
        if let Some(derived) = &self.derived {
            if derived.specs.as_slice() == specs {
                return derived.candidates.clone();
            }
        }

        let candidates = Arc::new(derive_candidates(specs));
        self.stats.derivations += 1;
        self.derived = Some(Derivation {
            specs: specs.to_vec(),
            candidates: candidates.clone(),
        });
        candidates
    }

    fn already_requested(&self, candidates: &[Heatmap]) -> bool {
        self.requested
            .as_ref()
            .is_some_and(|requested| requested.candidates.as_slice() == candidates)
    }

    fn next_generation(&mut self) -> Generation {
        self.last_generation += 1;
        Generation(self.last_generation)
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.requested
            .as_ref()
            .is_some_and(|requested| requested.generation == generation)
    }
}

/// Single-slot resolver for heatmap layers. See the module docs.
pub struct HeatmapResolver {
    state: Arc<Mutex<ResolverState>>,
    resolved: Arc<watch::Sender<Arc<Vec<Heatmap>>>>,
    filter: Arc<dyn HeatmapFilter>,
    runtime: Handle,
}

impl HeatmapResolver {
    /// Create a resolver that spawns its resolutions on `runtime`.
    pub fn new(runtime: Handle, filter: impl HeatmapFilter) -> Self {
        let (resolved, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            state: Arc::new(Mutex::new(ResolverState::default())),
            resolved: Arc::new(resolved),
            filter: Arc::new(filter),
            runtime,
        }
    }

    /// Create a resolver on the runtime the caller is running in.
    pub fn current(filter: impl HeatmapFilter) -> Result<Self, ResolveError> {
        Ok(Self::new(Handle::try_current()?, filter))
    }

    /// Feed the current specs and get the committed layers.
    pub fn resolve(&self, specs: &[HeatmapSpec]) -> Arc<Vec<Heatmap>> {
        // Fire and forget; the outcome shows up through `resolved`.
        drop(self.request(specs));
        self.resolved()
    }

    /// Start a resolution for `specs` unless they produce the candidates
    /// already requested. Returns the started resolution, if any.
    pub fn request(&self, specs: &[HeatmapSpec]) -> Option<Resolution> {
        let (generation, candidates) = {
            let mut state = lock(&self.state);
            let candidates = state.derive(specs);
            if state.already_requested(&candidates) {
                return None;
            }

            let generation = state.next_generation();
            state.requested = Some(Requested {
                generation,
                candidates: candidates.clone(),
            });
            state.stats.requests += 1;
            (generation, candidates)
        };

        tracing::debug!(
            generation = generation.value(),
            heatmaps = candidates.len(),
            "Requesting heatmap resolution"
        );

        let handle = self.runtime.spawn(settle(
            generation,
            candidates,
            self.filter.clone(),
            self.state.clone(),
            self.resolved.clone(),
        ));

        Some(Resolution { generation, handle })
    }

    /// The currently committed layers.
    pub fn resolved(&self) -> Arc<Vec<Heatmap>> {
        self.resolved.borrow().clone()
    }

    /// Receiver that is notified on every commit.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Heatmap>>> {
        self.resolved.subscribe()
    }

    /// Generation of the latest request, if any was made.
    pub fn requested_generation(&self) -> Option<Generation> {
        lock(&self.state)
            .requested
            .as_ref()
            .map(|requested| requested.generation)
    }

    pub fn stats(&self) -> ResolverStats {
        lock(&self.state).stats
    }
}

/// Run the filter and commit its result if `generation` is still current.
async fn settle(
    generation: Generation,
    candidates: Arc<Vec<Heatmap>>,
    filter: Arc<dyn HeatmapFilter>,
    state: Arc<Mutex<ResolverState>>,
    resolved: Arc<watch::Sender<Arc<Vec<Heatmap>>>>,
) -> ResolutionOutcome {
    let result = filter.filter(candidates.as_ref().clone()).await;

    let mut guard = lock(&state);
    match result {
        Ok(heatmaps) if guard.is_current(generation) => {
            tracing::debug!(
                generation = generation.value(),
                heatmaps = heatmaps.len(),
                "Committing heatmaps"
            );
            resolved.send_replace(Arc::new(heatmaps));
            guard.stats.commits += 1;
            ResolutionOutcome::Committed
        }
        Ok(_) => {
            tracing::debug!(
                generation = generation.value(),
                "Discarding superseded heatmap resolution"
            );
            guard.stats.discarded += 1;
            ResolutionOutcome::Superseded
        }
        Err(error) => {
            tracing::error!(
                generation = generation.value(),
                error = %error,
                "Failed to resolve heatmaps"
            );
            guard.stats.failures += 1;
            ResolutionOutcome::Failed
        }
    }
}

fn lock(state: &Mutex<ResolverState>) -> MutexGuard<'_, ResolverState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
