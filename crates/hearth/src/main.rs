mod demo;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hearth_core::kernel::constants;
use hearth_core::{Application, Config, ExecutionContext, Request};
use log::{error, info};

use demo::{DemoHooks, DemoRoutesProvider};

/// Hearth: a minimal application kernel
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Configuration file (.json, .toml, .yaml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the environment label (app.env)
    #[arg(long)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Handle a single request and print the response
    Request {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, e.g. /health
        path: String,
        /// Request body
        #[arg(long, default_value = "")]
        body: String,
    },
    /// List the routes the demo application serves
    Routes,
    /// Show registered providers and the environment
    Info,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::new(),
    };
    if let Some(env) = &args.env {
        if let Err(e) = config.set(constants::ENV_CONFIG_KEY, env) {
            eprintln!("Failed to apply --env: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut app = match build_app(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Some(Commands::Request { method, path, body }) => {
            let request = Request::new(method, path).with_body(body);
            match app.handle(request) {
                Ok(response) => {
                    println!("{}", response);
                    println!("{}", response.body);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Request failed: {}", e);
                    let response = app.render_error(&e);
                    println!("{}", response);
                    println!("{}", response.body);
                    ExitCode::FAILURE
                }
            }
        }
        Some(Commands::Routes) => {
            match app.container().make::<Vec<(String, String)>>("demo.routes") {
                Ok(routes) => {
                    for (method, path) in routes.iter() {
                        println!("{:<6} {}", method, path);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Could not list routes: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Some(Commands::Info) | None => {
            println!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
            println!("Environment: {}", app.environment());
            println!("Context: {}", if app.is_cli() { "cli" } else { "server" });
            println!("Providers: {}", app.provider_names().join(", "));
            ExitCode::SUCCESS
        }
    }
}

fn build_app(config: Config) -> hearth_core::kernel::Result<Application> {
    let mut app = Application::with_context(config, ExecutionContext::Cli)?.with_hooks(DemoHooks);
    app.register(DemoRoutesProvider)?;
    info!("Application ready ({} providers)", app.provider_names().len());
    Ok(app)
}
