//! Main pipeline orchestration.
//!
//! This module provides the [`Pipeline`] orchestrator that runs the four stages
//! in order and attributes any failure to the stage it happened in.

use crate::pipeline::{
    context::BuildContext,
    error::{Error, Failure, Result, StageResult},
    stage::{PipelineState, Stage},
    stages::{
        InstalledPackages, PackagedArtifact, ProvisionedEnvironment, PublishedArtifact, install,
        package, provision, publish,
    },
};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use super::tool_detection::{InterpreterLocator, SearchPathLocator};

/// Future that resolves when the operator asks the run to stop.
pub type Interrupt = Pin<Box<dyn Future<Output = ()>>>;

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Receives stage transitions, used by the CLI to render progress.
pub trait StageObserver {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage, _elapsed: Duration) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Outputs of a successful run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub environment: ProvisionedEnvironment,
    pub installed: InstalledPackages,
    pub packaged: PackagedArtifact,
    pub published: PublishedArtifact,
}

/// Main pipeline orchestrator.
///
/// Runs Provision → Install → Package → Publish. A stage starts only after the
/// previous one returned successfully; the first failure ends the run.
///
/// One interrupt listener (Ctrl-C by default) is armed for the whole run. When
/// it fires, the current stage is abandoned, any tool it was running is killed
/// and no further stage starts.
///
/// # Examples
///
/// ```no_run
/// use pillar_crop_bundler::pipeline::{BuildContextBuilder, Pipeline};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = BuildContextBuilder::new().build()?;
/// let mut pipeline = Pipeline::new(context);
///
/// match pipeline.run().await {
///     Ok(report) => println!("Published {}", report.published.path.display()),
///     Err(e) => std::process::exit(e.exit_code()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    context: BuildContext,
    locator: Box<dyn InterpreterLocator>,
    observer: Box<dyn StageObserver>,
    interrupt: Option<Interrupt>,
    state: PipelineState,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("context", &self.context)
            .field("candidates", &self.locator.candidates())
            .field("state", &self.state)
            .finish()
    }
}

impl Pipeline {
    /// Creates a pipeline that searches `PATH` for the system interpreter.
    pub fn new(context: BuildContext) -> Self {
        Self {
            context,
            locator: Box::new(SearchPathLocator::new()),
            observer: Box::new(NoopObserver),
            interrupt: None,
            state: PipelineState::Start,
        }
    }

    /// Replaces the interpreter locator.
    pub fn with_locator(mut self, locator: impl InterpreterLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Replaces the stage observer.
    pub fn with_observer(mut self, observer: impl StageObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replaces the Ctrl-C listener for the next run.
    pub fn with_interrupt(mut self, interrupt: impl Future<Output = ()> + 'static) -> Self {
        self.interrupt = Some(Box::pin(interrupt));
        self
    }

    /// Returns the build context.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Returns the current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure, wrapped in that stage's [`Error`] variant.
    /// The pipeline is left in [`PipelineState::Failed`].
    pub async fn run(&mut self) -> Result<BuildReport> {
        let Self {
            context,
            locator,
            observer,
            interrupt,
            state,
        } = self;
        let context: &BuildContext = context;
        let observer: &dyn StageObserver = &**observer;
        let mut interrupt = interrupt.take().unwrap_or_else(|| Box::pin(ctrl_c()));

        let environment = run_stage(
            state,
            observer,
            &mut interrupt,
            Stage::Provision,
            provision::provision(context, &**locator),
        )
        .await?;
        let installed = run_stage(
            state,
            observer,
            &mut interrupt,
            Stage::Install,
            install::install(context),
        )
        .await?;
        let packaged = run_stage(
            state,
            observer,
            &mut interrupt,
            Stage::Package,
            package::package(context),
        )
        .await?;
        let published = run_stage(
            state,
            observer,
            &mut interrupt,
            Stage::Publish,
            publish::publish(context, &packaged),
        )
        .await?;

        *state = PipelineState::Done;
        Ok(BuildReport {
            environment,
            installed,
            packaged,
            published,
        })
    }
}

/// Runs one stage, recording the state transition and attributing any failure.
///
/// The interrupt is polled first, so a Ctrl-C that arrived during the previous
/// stage stops the run before this one does any work.
async fn run_stage<T>(
    state: &mut PipelineState,
    observer: &dyn StageObserver,
    interrupt: &mut Interrupt,
    stage: Stage,
    work: impl Future<Output = StageResult<T>>,
) -> Result<T> {
    *state = stage.running_state();
    observer.stage_started(stage);
    log::debug!("Stage {} started", stage);
    let started = Instant::now();

    let outcome = tokio::select! {
        biased;
        _ = interrupt.as_mut() => {
            log::warn!("Interrupted during stage {}", stage);
            Err(Failure::Interrupted)
        }
        outcome = work => outcome,
    };

    match outcome {
        Ok(output) => {
            let elapsed = started.elapsed();
            log::debug!("Stage {} finished in {:?}", stage, elapsed);
            observer.stage_finished(stage, elapsed);
            Ok(output)
        }
        Err(failure) => {
            let error = Error::from_stage(stage, failure);
            log::debug!("Stage {} failed: {}", stage, error);
            *state = PipelineState::Failed {
                stage,
                exit_code: error.exit_code(),
            };
            Err(error)
        }
    }
}
