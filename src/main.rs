use anyhow::Result;
use clap::{Parser, Subcommand};
use hawkshot::{
    animator::{LoadingAnimator, SystemClock, DEFAULT_MESSAGE},
    app::{Action, AppState, Effect},
    compare::{compare_products, list_tools},
    config::Config,
    output::{print_assessment, print_comparison, print_tools, OutputFormat},
    ApiError, AssessmentClient,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit codes for scripting
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

/// Spinner redraw interval; finer than the animator's 20 ms erase step.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Parser)]
#[command(name = "hawkshot")]
#[command(
    author,
    version,
    about = "Assess the security trustworthiness of SaaS products"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (table, json, markdown)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Assessment endpoint, overriding config and environment
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Category listing endpoint, overriding config and environment
    #[arg(long, global = true)]
    compare_endpoint: Option<String>,

    /// Show a static message instead of the animated one while loading
    #[arg(long, global = true)]
    no_animate: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a product by name, domain or URL
    Assess {
        /// Product name, domain or URL
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Assess two products side by side
    Compare {
        /// First product
        first: String,

        /// Second product
        second: String,
    },

    /// List previously assessed tools in a category
    Category {
        /// Category name, e.g. "Team Collaboration"
        name: String,

        /// Show the full assessment of the Nth tool in the listing
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        let mut config = Config::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    });
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(endpoint) = cli.compare_endpoint {
        config.compare_endpoint = endpoint;
    }
    if cli.no_animate {
        config.animate = false;
    }
    debug!(endpoint = %config.endpoint, compare_endpoint = %config.compare_endpoint, "configuration resolved");

    let format_str = cli.format.unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let loader = Loader {
        interactive: format == OutputFormat::Table,
        animate: config.animate,
    };
    let client = AssessmentClient::from_config(&config);

    match cli.command {
        Commands::Assess { query } => run_assess(&client, &query.join(" "), format, loader).await,
        Commands::Compare { first, second } => {
            let result = loader
                .run(compare_products(&client, &first, &second))
                .await;
            match result {
                Ok(comparison) => {
                    print_comparison(&comparison, format)?;
                    Ok(exit_codes::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Commands::Category { name, pick } => {
            let tools = match loader.run(list_tools(&client, &name)).await {
                Ok(tools) => tools,
                Err(e) => return Ok(report(&e)),
            };

            match pick {
                None => print_tools(&name, &tools, format)?,
                Some(n) => {
                    let tool = n
                        .checked_sub(1)
                        .and_then(|i| tools.get(i))
                        .ok_or_else(|| {
                            anyhow::anyhow!("No tool #{} in '{}' ({} listed)", n, name, tools.len())
                        })?;
                    print_assessment(tool, format)?;
                }
            }
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Drives a single query through the page controller.
async fn run_assess(
    client: &AssessmentClient,
    query: &str,
    format: OutputFormat,
    loader: Loader,
) -> Result<u8> {
    let mut state = AppState::new();

    let (seq, query) = match state.dispatch(Action::Submit(query.to_string())) {
        Effect::Request { seq, query } => (seq, query),
        Effect::None => return Ok(report(&ApiError::EmptyQuery)),
    };

    let result = loader.run(client.assess(&query)).await;
    state.dispatch(Action::Completed { seq, result });

    if let Some(message) = state.error() {
        eprintln!("{}", message);
        return Ok(exit_codes::ERROR);
    }

    match state.current() {
        Some(assessment) => {
            print_assessment(assessment, format)?;
            Ok(exit_codes::SUCCESS)
        }
        None => Ok(exit_codes::ERROR),
    }
}

fn report(error: &ApiError) -> u8 {
    eprintln!("{}", error.user_message());
    exit_codes::ERROR
}

/// Loading indicator shown while a request is in flight.
#[derive(Clone, Copy)]
struct Loader {
    interactive: bool,
    animate: bool,
}

impl Loader {
    async fn run<F, T>(self, future: F) -> T
    where
        F: Future<Output = T>,
    {
        if !self.interactive {
            return future.await;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(DEFAULT_MESSAGE);

        if !self.animate {
            pb.enable_steady_tick(Duration::from_millis(100));
            let output = future.await;
            pb.finish_and_clear();
            return output;
        }

        let clock = SystemClock::start();
        let mut animator = LoadingAnimator::new(DEFAULT_MESSAGE);
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        tokio::pin!(future);

        let output = loop {
            tokio::select! {
                output = &mut future => break output,
                _ = ticker.tick() => {
                    pb.set_message(animator.tick(&clock));
                    pb.tick();
                }
            }
        };

        pb.finish_and_clear();
        output
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'hawkshot config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
