use clap::Parser;
use rms_core::models::ScenarioDto;
use rms_solver::{Allocator, io::as_two_class};
use std::path::PathBuf;

mod io;
pub use io::*;

mod config;
pub use config::{AppConfig, OutputConfig};

mod commands;
pub use commands::*;

// The top-level arguments: a config file and which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "RMS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub async fn evaluate(self, config: AppConfig) -> anyhow::Result<()> {
        let allocator = Allocator::new(config.quantile);
        let pretty = config.output.pretty;

        match self.command {
            Commands::TwoClass { io } => {
                let scenario = serde_json::from_reader::<_, ScenarioDto>(io.read()?)?;
                let query = as_two_class(&scenario)
                    .ok_or(CliError::TwoClassArity(scenario.classes.len()))?;
                let allocation = allocator.optimal_two_class(query)?;
                io.emit(&allocation, pretty)?;
            }
            Commands::Curve { io } => {
                let scenario = serde_json::from_reader::<_, ScenarioDto>(io.read()?)?;
                let query = as_two_class(&scenario)
                    .ok_or(CliError::TwoClassArity(scenario.classes.len()))?;
                let curve = curve::Curve::sample(&allocator.revenue_curve(query)?);
                io.emit(&curve, pretty)?;
            }
            Commands::Emsr {
                io,
                method,
                opening,
            } => {
                let scenario = serde_json::from_reader::<_, ScenarioDto>(io.read()?)?;
                match opening {
                    Some(opening) => {
                        let level = method.protect(&allocator, &scenario, opening)?;
                        io.emit(&level, pretty)?;
                    }
                    None => {
                        let table = method.nested(&allocator, scenario)?;
                        io.emit(&table, pretty)?;
                    }
                }
            }
            Commands::Batch { io, method } => {
                let batch = serde_json::from_reader(io.read()?)?;
                let results = method.batch(allocator, batch).await;
                io.emit(&results, pretty)?;
            }
            Commands::Schema { output } => {
                let schema = schemars::schema_for!(ScenarioDto);
                output.emit(&schema, pretty)?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("a two-class query needs exactly two classes, got {0}")]
    TwoClassArity(usize),
}
