use clap::{Parser, Subcommand};
use portico::{catalog, config, output, scenario};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "portico")]
#[command(about = "Behavior harness for the Portico portfolio site front-end")]
#[command(long_about = "\
Behavior harness for the Portico portfolio site front-end

The engine that drives the production site's hero slideshow, lazy-loaded
project gallery, navigation chrome, and contact form also runs headless
against a simulated page. Use it to replay visitor sessions under scripted
network conditions and to validate the image catalog against the assets
directory.

A session script describes the page, the network, and a timeline of events:

  [page]
  slides = 3
  viewport = [375, 812]
  network = { effective_type = \"3g\" }

  [[steps]]
  action = \"scroll\"
  to = 1200.0

Run 'portico gen-scenario' for a complete example and 'portico gen-config'
for a documented portico.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Behavior config file (defaults apply when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scripted session and report the final page state
    Run {
        /// Session script (TOML)
        scenario: PathBuf,
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate the image catalog against an assets directory
    Check {
        /// Directory holding the site's images
        assets: PathBuf,
    },
    /// Print a stock portico.toml with all options documented
    GenConfig,
    /// Print an example session script
    GenScenario,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let behavior_config = match &cli.config {
        Some(path) => config::BehaviorConfig::load(path)?,
        None => config::BehaviorConfig::default(),
    };

    match cli.command {
        Command::Run { scenario: path, json } => {
            let script = scenario::Scenario::load(&path)?;
            let report = scenario::run(&script, &behavior_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_session_report(&report);
            }
        }
        Command::Check { assets } => {
            let images = catalog::ImageCatalog::new(behavior_config.catalog.images.clone())?;
            let report = catalog::check_assets(&images, &assets)?;
            let ok = output::print_check_report(&report);
            if !ok {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenScenario => {
            print!("{}", scenario::stock_scenario_toml());
        }
    }

    Ok(())
}
