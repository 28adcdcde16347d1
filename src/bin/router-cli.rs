use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde::Serialize;

use bit_router::config::{build_router, load_config};
use bit_router::routing::Params;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect and test a bit-router route configuration offline", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Check,
    /// List registered routes in registration order
    Routes {
        /// Only list routes for this method
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Resolve a request against the route table
    Lookup {
        method: String,
        path: String,
    },
}

#[derive(Serialize)]
struct LookupResult<'a> {
    found: bool,
    method: &'a str,
    pattern: Option<&'a str>,
    path: &'a str,
    allowed: Vec<String>,
    params: Params,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let router = build_router(&config)?;

    match cli.command {
        Commands::Check => {
            println!(
                "{}: ok ({} routes)",
                cli.config.display(),
                router.table().len()
            );
        }
        Commands::Routes { method } => {
            let methods = match method {
                Some(m) => vec![m.to_uppercase().parse::<Method>()?],
                None => router.table().methods(),
            };
            for method in methods {
                for route in router.routes(&method) {
                    println!("{:<8}{}", method.as_str(), route);
                }
            }
        }
        Commands::Lookup { method, path } => {
            let method_name = method.to_uppercase();
            let parsed = method_name.parse::<Method>()?;
            let found = router.table().lookup(&parsed, &path);
            let result = LookupResult {
                found: found.is_some(),
                method: &method_name,
                pattern: found.as_ref().map(|m| m.pattern),
                path: &path,
                allowed: router
                    .allowed_methods(&path)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                params: found.map(|m| m.params).unwrap_or_default(),
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
