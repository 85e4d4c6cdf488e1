//! Pipeline executor
//!
//! Fans work units out over a semaphore-gated worker pool, publishes each
//! finished snapshot into the progress store, and drives a dedicated
//! render task that polls the store at a fixed interval until the pool
//! drains. Results come back in submission order, one per unit, only
//! after every unit has reached a terminal status.

use std::sync::{Arc, Mutex};

use convoy_core::domain::result::ExecutionResult;
use convoy_core::domain::unit::{UnitSnapshot, UnitStatus};
use convoy_core::error::PipelineError;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, warn};

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::render::Renderer;
use crate::render::spinner::SpinnerRenderer;
use crate::render::view::TerminalView;
use crate::store::ProgressStore;
use crate::unit::WorkUnit;

type SharedView = Arc<Mutex<TerminalView>>;

/// Executor for a list of work units
pub struct Pipeline {
    config: Config,
    renderer: Arc<dyn Renderer>,
}

impl Pipeline {
    /// Creates a pipeline with the default spinner renderer
    pub fn new(config: Config) -> Self {
        Self {
            config,
            renderer: Arc::new(SpinnerRenderer::new()),
        }
    }

    /// Replaces the renderer
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Runs every unit to completion and returns their results in
    /// submission order
    pub async fn run(&self, units: Vec<WorkUnit>) -> Result<Vec<ExecutionResult>, PipelineError> {
        self.run_with_cancel(units, CancelToken::new()).await
    }

    /// Like [`run`](Self::run), observing an explicit cancellation token
    ///
    /// The token is checked at phase boundaries: before workers start,
    /// before each queued unit is dispatched, on every render tick, and
    /// when the pool drains. On cancellation the render loop is stopped,
    /// the cursor restored, and `Interrupted` returned; units already
    /// running finish normally.
    pub async fn run_with_cancel(
        &self,
        units: Vec<WorkUnit>,
        cancel: CancelToken,
    ) -> Result<Vec<ExecutionResult>, PipelineError> {
        let view = Arc::new(Mutex::new(TerminalView::new()?));
        let result = self.run_live(units, cancel, Arc::clone(&view)).await;
        // dropping the last view handle restores the cursor on every path
        drop(view);
        result
    }

    /// Blocking entry point for synchronous callers
    ///
    /// Builds a multi-threaded runtime and drives [`run`](Self::run); if
    /// no runtime can be started, falls back to strictly sequential
    /// execution on the calling thread.
    pub fn run_blocking(&self, units: Vec<WorkUnit>) -> Result<Vec<ExecutionResult>, PipelineError> {
        match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(self.run(units)),
            Err(error) => {
                warn!("no worker runtime available, running sequentially: {error}");
                self.run_sequential(units)
            }
        }
    }

    /// Runs every unit on the calling thread, skipping the store and the
    /// render loop entirely
    pub fn run_sequential(
        &self,
        units: Vec<WorkUnit>,
    ) -> Result<Vec<ExecutionResult>, PipelineError> {
        let snapshots: Vec<UnitSnapshot> = units.iter().map(WorkUnit::snapshot).collect();

        let mut view = TerminalView::new()?;
        view.draw(&self.renderer.render_static(&snapshots))?;

        let mut results = Vec::with_capacity(units.len());
        for mut unit in units {
            results.push(unit.run());
        }

        let finished: Vec<UnitSnapshot> = results
            .iter()
            .map(|result| result.snapshot().clone())
            .collect();
        view.draw(&self.renderer.render(&finished, 0))?;

        Ok(results)
    }

    async fn run_live(
        &self,
        units: Vec<WorkUnit>,
        cancel: CancelToken,
        view: SharedView,
    ) -> Result<Vec<ExecutionResult>, PipelineError> {
        let snapshots: Vec<UnitSnapshot> = units.iter().map(WorkUnit::snapshot).collect();

        let store = Arc::new(ProgressStore::new(
            self.config.store_initial_capacity,
            self.config.store_capacity_limit,
        )?);

        // initial frame before any worker starts
        draw(&view, &self.renderer.render(&snapshots, 0))?;

        if cancel.is_cancelled() {
            return Err(PipelineError::Interrupted);
        }

        let render_loop = self.spawn_render_loop(
            Arc::clone(&store),
            snapshots,
            Arc::clone(&view),
            cancel.clone(),
        );

        let outcome = self.run_pool(units, Arc::clone(&store), cancel).await;

        // stop the render loop before the final frame so the two never race
        render_loop.abort();
        let _ = render_loop.await;

        let results = outcome?;

        let finished: Vec<UnitSnapshot> = results
            .iter()
            .map(|result| result.snapshot().clone())
            .collect();
        draw(&view, &self.renderer.render(&finished, 0))?;

        debug!("pipeline finished with {} result(s)", results.len());
        Ok(results)
    }

    /// Spawns one worker task per unit, gated by the concurrency semaphore
    async fn run_pool(
        &self,
        units: Vec<WorkUnit>,
        store: Arc<ProgressStore>,
        cancel: CancelToken,
    ) -> Result<Vec<ExecutionResult>, PipelineError> {
        let total = units.len();
        let permits = self
            .config
            .max_concurrency
            .unwrap_or(Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));

        let mut handles: Vec<JoinHandle<Result<(usize, ExecutionResult), PipelineError>>> =
            Vec::with_capacity(total);

        for (index, mut unit) in units.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(
                    "cancellation requested, {} unit(s) left unscheduled",
                    total - index
                );
                break;
            }

            let semaphore = Arc::clone(&semaphore);
            let store = Arc::clone(&store);
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");

                if cancel.is_cancelled() {
                    return Err(PipelineError::Interrupted);
                }

                let id = unit.id();
                let mut fallback = unit.snapshot();

                let result = match tokio::task::spawn_blocking(move || unit.run()).await {
                    Ok(result) => result,
                    Err(join_error) => {
                        warn!(unit = %id, "unit task panicked: {join_error}");
                        fallback.status = UnitStatus::Failed;
                        fallback
                            .error_messages
                            .push(format!("unit panicked: {join_error}"));
                        ExecutionResult::from_snapshot(fallback)
                    }
                };

                store.set(id, result.snapshot().clone())?;
                Ok((index, result))
            }));
        }

        let mut slots: Vec<Option<ExecutionResult>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);
        let mut failure: Option<PipelineError> = None;

        for handle in handles {
            match handle.await {
                Ok(Ok((index, result))) => slots[index] = Some(result),
                Ok(Err(PipelineError::Interrupted)) => {}
                Ok(Err(publish_error)) => {
                    error!("worker failed to publish result: {publish_error}");
                    if failure.is_none() {
                        failure = Some(publish_error);
                    }
                }
                Err(join_error) => {
                    warn!("worker task panicked: {join_error}");
                    if failure.is_none() {
                        failure = Some(PipelineError::Runtime(format!(
                            "worker task panicked: {join_error}"
                        )));
                    }
                }
            }
        }

        if let Some(failure) = failure {
            return Err(failure);
        }

        if cancel.is_cancelled() {
            return Err(PipelineError::Interrupted);
        }

        let results: Vec<ExecutionResult> = slots.into_iter().flatten().collect();
        if results.len() != total {
            return Err(PipelineError::Runtime(
                "worker pool lost unit results".to_string(),
            ));
        }

        Ok(results)
    }

    /// Spawns the render task: poll the store, merge newer snapshots into
    /// the local view, draw, repeat until stopped
    fn spawn_render_loop(
        &self,
        store: Arc<ProgressStore>,
        mut units: Vec<UnitSnapshot>,
        view: SharedView,
        cancel: CancelToken,
    ) -> JoinHandle<()> {
        let renderer = Arc::clone(&self.renderer);
        let interval = self.config.render_interval;

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            let mut count: usize = 0;

            loop {
                ticker.tick().await;

                if cancel.is_cancelled() {
                    break;
                }

                for unit in units.iter_mut() {
                    match store.get(unit.id) {
                        Ok(Some(updated)) => *unit = updated,
                        Ok(None) => {}
                        Err(store_error) => {
                            error!("failed to read snapshot from progress store: {store_error}");
                            return;
                        }
                    }
                }

                let lines = renderer.render(&units, count);
                if let Err(draw_error) = draw(&view, &lines) {
                    warn!("render loop stopped: {draw_error}");
                    return;
                }

                count += 1;
            }
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn draw(view: &SharedView, lines: &[String]) -> Result<(), PipelineError> {
    let mut view = view.lock().map_err(|_| PipelineError::LockPoisoned)?;
    Ok(view.draw(lines)?)
}
