use glyphworld_input::InputSource;
use glyphworld_kernel::World;
use glyphworld_render::{Frame, Presenter, RenderError};

use crate::processing::{Directive, process_input};

/// Loop lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Configuration for the simulation loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopConfig {
    /// Stop after this many completed iterations. `None` runs until an exit
    /// is requested.
    pub max_iterations: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("render failed at tick {tick}: {source}")]
    Render {
        tick: u64,
        #[source]
        source: RenderError,
    },
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u64,
    pub final_tick: u64,
    pub frames_presented: u64,
    /// Entity ticks that failed and were skipped.
    pub behavior_failures: u64,
    /// World events drained from the log.
    pub events: u64,
}

/// Single-threaded render / input / process / tick loop over one world.
pub struct SimulationLoop<I, P> {
    world: World,
    input: I,
    presenter: P,
    config: LoopConfig,
    state: LoopState,
    exit_requested: bool,
    summary: RunSummary,
}

impl<I: InputSource, P: Presenter> SimulationLoop<I, P> {
    pub fn new(world: World, input: I, presenter: P) -> Self {
        Self::with_config(world, input, presenter, LoopConfig::default())
    }

    pub fn with_config(world: World, input: I, presenter: P, config: LoopConfig) -> Self {
        let state = match config.max_iterations {
            Some(0) => LoopState::Stopped,
            _ => LoopState::Running,
        };
        Self {
            world,
            input,
            presenter,
            config,
            state,
            exit_requested: false,
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            final_tick: self.world.tick(),
            ..self.summary
        }
    }

    /// Ask the loop to stop once the current (or next) iteration completes.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn into_parts(self) -> (World, I, P) {
        (self.world, self.input, self.presenter)
    }

    /// Run one full iteration. A stopped loop does nothing.
    pub fn step_once(&mut self) -> Result<LoopState, SimError> {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }
        let _span = tracing::debug_span!("iteration", tick = self.world.tick()).entered();

        // render: state as of the end of the previous tick phase
        let frame = Frame::capture(&self.world);
        if let Err(source) = self.presenter.present(&frame) {
            self.state = LoopState::Stopped;
            tracing::error!("presenter failed, halting loop: {source}");
            return Err(SimError::Render {
                tick: frame.tick,
                source,
            });
        }
        self.summary.frames_presented += 1;

        let event = match self.input.poll_input() {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("input failed, treating as no event: {e}");
                None
            }
        };

        if process_input(&mut self.world, event) == Directive::Exit {
            self.exit_requested = true;
        }

        let report = self.world.step();
        self.summary.behavior_failures += report.failures.len() as u64;
        self.summary.iterations += 1;

        // drained every iteration so the log stays bounded
        for event in self.world.drain_events() {
            tracing::trace!(?event, "world event");
            self.summary.events += 1;
        }

        let limit_reached = self
            .config
            .max_iterations
            .is_some_and(|max| self.summary.iterations >= max);
        if self.exit_requested || limit_reached {
            tracing::info!(
                iterations = self.summary.iterations,
                tick = self.world.tick(),
                "simulation stopped"
            );
            self.state = LoopState::Stopped;
        }
        Ok(self.state)
    }

    /// Iterate until the loop stops.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        while self.step_once()? == LoopState::Running {}
        Ok(self.summary())
    }
}
