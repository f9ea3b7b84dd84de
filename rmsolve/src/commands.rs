use super::{IOArgs, OutputArgs};
use clap::Subcommand;

pub mod batch;
pub mod curve;
mod method;
pub use method::Method;

#[derive(Subcommand)]
pub enum Commands {
    /// Littlewood's protection level and booking limit for exactly two classes
    TwoClass {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Sample the expected revenue at every whole booking limit for two classes
    Curve {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Protect the higher classes with an EMSR heuristic
    Emsr {
        #[command(flatten)]
        io: IOArgs,

        /// The heuristic to use
        #[arg(short, long, default_value = "b")]
        method: Method,

        /// Report the single level for the class at this (0-based) rank instead of the full table
        #[arg(long)]
        opening: Option<usize>,
    },

    /// Evaluate a map of named scenarios
    Batch {
        #[command(flatten)]
        io: IOArgs,

        /// The heuristic to use for the nested tables
        #[arg(short, long, default_value = "b")]
        method: Method,
    },

    /// Write the JSON schema of the scenario format
    Schema {
        #[command(flatten)]
        output: OutputArgs,
    },
}
