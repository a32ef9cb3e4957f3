use clap::{Args, Parser, Subcommand};
use glyphworld_common::Position;
use glyphworld_input::{FailureLimit, InputSource, LineInput, ScriptedInput};
use glyphworld_kernel::{World, WorldConfig, WorldFactory, parse_position};
use glyphworld_persist::{MemoryStore, init_world_state};
use glyphworld_render::{AsciiViewport, Frame, Renderer, TextPresenter, ViewportConfig};
use glyphworld_sim::{LoopConfig, SimulationLoop};
use glyphworld_tools::WorldInspector;
use std::io;
use tracing_subscriber::EnvFilter;

/// Consecutive unreadable stdin polls before the run gives up.
const INPUT_FAILURE_LIMIT: u32 = 5;

#[derive(Parser)]
#[command(name = "glyphworld-cli", about = "Turn-based ASCII world simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and workspace info
    Info,
    /// Generate a new world and print its first frame
    New(WorldArgs),
    /// Run the simulation loop
    Run {
        #[command(flatten)]
        world: WorldArgs,
        /// Commands separated by ';' instead of reading stdin (e.g. "d;d;w;q")
        #[arg(long)]
        script: Option<String>,
        /// Stop after this many iterations
        #[arg(short, long)]
        iterations: Option<u64>,
    },
}

#[derive(Args)]
struct WorldArgs {
    /// Starter grass position as X,Y (repeatable; defaults to 10,10)
    #[arg(long = "grass", value_name = "X,Y")]
    grass: Vec<String>,
    /// Cells shown on each side of the view entity
    #[arg(short, long, default_value = "20")]
    radius: u32,
}

impl WorldArgs {
    fn factory(&self) -> anyhow::Result<WorldFactory> {
        let mut config = WorldConfig::default();
        if !self.grass.is_empty() {
            config.starter_grass = self
                .grass
                .iter()
                .map(String::as_str)
                .map(parse_position)
                .collect::<Result<Vec<Position>, _>>()?;
        }
        Ok(WorldFactory::new(config)?)
    }

    fn viewport(&self) -> anyhow::Result<AsciiViewport> {
        Ok(AsciiViewport::new(ViewportConfig {
            radius: self.radius,
        })?)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("glyphworld-cli v{}", env!("CARGO_PKG_VERSION"));
            let world = WorldFactory::default().generate_new_world();
            println!("default {}", WorldInspector::summary(&world));
        }
        Commands::New(args) => {
            let factory = args.factory()?;
            let viewport = args.viewport()?;
            let world = factory.generate_new_world();
            print!("{}", viewport.render(&Frame::capture(&world)));
            for id in WorldInspector::list_entities(&world) {
                if let Some(info) = WorldInspector::inspect_entity(&world, id) {
                    println!("{info}");
                }
            }
        }
        Commands::Run {
            world,
            script,
            iterations,
        } => {
            // configuration errors surface here, before the loop starts
            let factory = world.factory()?;
            let viewport = world.viewport()?;
            // nothing is saved across processes, so every run starts fresh
            let store = MemoryStore::new();
            let state = init_world_state(None, &store, &factory)?;

            match script {
                Some(script) => {
                    let input = ScriptedInput::parse(&script)?;
                    // a drained script never quits on its own
                    let config = LoopConfig {
                        max_iterations: iterations.or(Some(input.remaining() as u64)),
                    };
                    run(state, input, viewport, config)?
                }
                None => {
                    let config = LoopConfig {
                        max_iterations: iterations,
                    };
                    let input = FailureLimit::new(
                        LineInput::new(io::stdin().lock()),
                        INPUT_FAILURE_LIMIT,
                    );
                    run(state, input, viewport, config)?
                }
            }
        }
    }

    Ok(())
}

fn run<I: InputSource>(
    world: World,
    input: I,
    viewport: AsciiViewport,
    config: LoopConfig,
) -> anyhow::Result<()> {
    let presenter = TextPresenter::new(io::stdout().lock(), viewport);
    let mut sim = SimulationLoop::with_config(world, input, presenter, config);
    let summary = sim.run()?;
    tracing::info!(
        iterations = summary.iterations,
        behavior_failures = summary.behavior_failures,
        events = summary.events,
        "run finished"
    );
    let (world, _, _) = sim.into_parts();
    println!("{}", WorldInspector::summary(&world));
    Ok(())
}
