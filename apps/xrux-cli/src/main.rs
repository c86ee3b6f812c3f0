use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use xrux_common::{Layer, Ray};
use xrux_events::{EventBus, TypedValue};
use xrux_locomotion::{
    AppliedQuality, DesktopInput, LocomotionConfig, LocomotionController, QualityBackend,
    SceneRegistry, StaticWorld, XrMode,
};
use xrux_tools::LocomotionInspector;
use xrux_widgets::{Console, ToConsole};

mod script;

use script::{DEMO_SCRIPT, Script};

#[derive(Parser)]
#[command(name = "xrux-cli", about = "CLI tool for xrux locomotion")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the default locomotion configuration as YAML
    Config,
    /// Run the controller over a scripted input sequence in a demo world
    Simulate {
        /// Locomotion configuration (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Named scene objects with optional quality settings (YAML)
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Timed device events and pointer updates (YAML); a built-in demo when absent
        #[arg(long)]
        script: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "240")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Drive the rig in desktop mode with the mouse at screen centre
        #[arg(long)]
        desktop: bool,
        /// Print a summary every N frames (0 prints only the final one)
        #[arg(long, default_value = "60")]
        every: u32,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Quality backend that records what the controller applied.
#[derive(Clone, Default)]
struct RecordingBackend(Rc<RefCell<Vec<AppliedQuality>>>);

impl QualityBackend for RecordingBackend {
    fn apply(&mut self, quality: &AppliedQuality) {
        self.0.borrow_mut().push(*quality);
    }
}

/// Floor, a low platform to teleport onto and a wall across the path.
fn demo_world() -> StaticWorld {
    let mut world = StaticWorld::with_floor(50.0, 0.0);
    world
        .add_box(
            Vec3::new(3.0, 0.0, 2.0),
            Vec3::new(6.0, 0.5, 5.0),
            Layer::Walkable,
        )
        .add_box(
            Vec3::new(-3.0, 0.0, 0.5),
            Vec3::new(3.0, 3.0, 0.8),
            Layer::Blocked,
        )
        .add_box(
            Vec3::new(-1.0, 1.0, -4.0),
            Vec3::new(1.0, 2.0, -3.9),
            Layer::Ux,
        );
    world
}

/// Mouse at screen centre, looking down ahead of the rig.
fn centre_mouse(controller: &LocomotionController) -> DesktopInput {
    let rig = controller.transform();
    let eye = rig.position + Vec3::Y * controller.head_height();
    DesktopInput {
        mouse: Vec2::new(640.0, 360.0),
        screen_size: Vec2::new(1280.0, 720.0),
        pointer_ray: Ray::new(eye, rig.forward() - Vec3::Y),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("xrux-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("locomotion: {}", xrux_locomotion::crate_info());
            println!("widgets: {}", xrux_widgets::crate_info());
            println!("tools: {}", xrux_tools::crate_info());
        }
        Commands::Config => {
            print!("{}", LocomotionConfig::default().to_yaml()?);
        }
        Commands::Simulate {
            config,
            scene,
            script,
            frames,
            dt,
            desktop,
            every,
            json,
        } => {
            let config = match config {
                Some(path) => LocomotionConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => LocomotionConfig::default(),
            };
            let scene = match scene {
                Some(path) => SceneRegistry::load(&path)
                    .with_context(|| format!("loading scene {}", path.display()))?,
                None => SceneRegistry::new(),
            };
            let script = match script {
                Some(path) => Script::load(&path)
                    .with_context(|| format!("loading script {}", path.display()))?,
                None => Script::from_yaml_str(DEMO_SCRIPT)?,
            };
            if script.last_frame().is_some_and(|last| last >= frames) {
                tracing::warn!(frames, "script runs past the last simulated frame");
            }

            let backend = RecordingBackend::default();
            let xr_mode = if desktop {
                XrMode::Desktop
            } else {
                XrMode::Immersive
            };
            let controller = LocomotionController::builder(config, demo_world())
                .xr_mode(xr_mode)
                .quality_backend(backend.clone())
                .build()?;
            let controller = Rc::new(RefCell::new(controller));
            controller.borrow_mut().start(&scene);

            let bus = EventBus::new();
            LocomotionController::attach(&controller, &bus);
            let console = Rc::new(RefCell::new(Console::default()));
            bus.subscribe_listener(Rc::clone(&console));
            let log = ToConsole::new(bus.clone());

            println!(
                "Simulating {frames} frames at dt={dt} ({} script steps, {xr_mode:?})",
                script.step_count()
            );
            for frame in 0..frames {
                for step in script.steps_at(frame) {
                    if let Some(update) = &step.pointer {
                        controller
                            .borrow_mut()
                            .set_pointer(update.hand, update.state);
                    }
                    if let Some(command) = &step.command {
                        command.apply(&mut controller.borrow_mut());
                        log.input(&TypedValue::from(format!("frame {frame}: {command:?}")));
                    }
                    if let Some(event) = &step.event {
                        log.input(&TypedValue::from(format!(
                            "frame {frame}: {:?} {:?} {}",
                            event.event_type, event.action, event.data
                        )));
                        bus.publish(event);
                    }
                }

                let mut c = controller.borrow_mut();
                if desktop {
                    let input = centre_mouse(&c);
                    c.set_desktop_input(Some(input));
                }
                c.step(dt);
                if every > 0 && (frame + 1) % every == 0 {
                    println!("{}", LocomotionInspector::summary(&c));
                }
            }

            let c = controller.borrow();
            let summary = LocomotionInspector::summary(&c);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Final: {summary}");
                println!("{}", LocomotionInspector::pose(&c));
                println!("Quality switches: {}", backend.0.borrow().len());
                println!("Console:");
                for line in console.borrow().lines() {
                    println!("  {line}");
                }
            }
        }
    }

    Ok(())
}
