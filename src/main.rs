use std::path::Path;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use connectogram::{
    common, data_loader, generate_commands, matrix, plan, plan_execution, validation,
    ValidationMode,
};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[clap(short, long)]
        plan: String,
        #[clap(short, long)]
        watch: bool,
    },
    Init {
        #[clap(short, long)]
        plan: String,
    },
    Generate {
        #[clap(subcommand)]
        command: GenerateCommands,
    },
    /// Check a node file for duplicate names, dangling references and
    /// malformed weights
    Validate {
        #[clap(short, long)]
        nodes: String,
        /// Exit with an error when any error-level diagnostic is found
        #[clap(short, long)]
        strict: bool,
    },
    /// Convert a connectivity matrix into a node file
    Matrix {
        #[clap(short, long)]
        matrix: String,
        #[clap(short, long)]
        parcels: String,
        #[clap(short, long, default_value = "0.99")]
        threshold: f64,
        /// Output JSON file, stdout when omitted
        #[clap(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum GenerateCommands {
    Template { name: String },
    Sample { dir: String },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { plan, watch } => {
            info!("Running plan: {}", plan);
            plan_execution::execute_plan(plan, watch)?;
        }
        Commands::Init { plan } => {
            info!("Initializing plan: {}", plan);
            let plan_file_path = plan;
            let plan = plan::Plan::default();
            let serialized_plan = serde_yaml::to_string(&plan)?;
            common::write_string_to_file(Path::new(&plan_file_path), &serialized_plan)?;
        }
        Commands::Generate { command } => match command {
            GenerateCommands::Template { name } => {
                info!("Generating template: {}", name);
                generate_commands::generate_template(name);
            }
            GenerateCommands::Sample { dir } => {
                info!("Generating sample in {}", dir);
                generate_commands::generate_sample(dir);
            }
        },
        Commands::Validate { nodes, strict } => {
            info!("Validating nodes: {}", nodes);
            let nodes = data_loader::load_nodes(Path::new(&nodes))?;
            let report = validation::validate(&nodes);
            report.log();
            println!(
                "{} nodes, {} errors, {} warnings",
                nodes.len(),
                report.errors().count(),
                report.warnings().count()
            );
            let mode = if strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Lenient
            };
            report.enforce(mode)?;
        }
        Commands::Matrix {
            matrix: matrix_file,
            parcels,
            threshold,
            output,
        } => {
            info!("Converting matrix: {}", matrix_file);
            if !(0.0..=1.0).contains(&threshold) {
                bail!("Threshold must be between 0 and 1, got {}", threshold);
            }
            let connectivity = data_loader::load_matrix(Path::new(&matrix_file))?;
            let parcels = data_loader::load_parcels(Path::new(&parcels))?;
            let layout = data_loader::layout_from_parcels(&parcels);
            let nodes = matrix::matrix_to_nodes(&connectivity, &layout, threshold)?;
            let json = serde_json::to_string_pretty(&nodes)?;
            match output {
                Some(output) => common::write_string_to_file(Path::new(&output), &json)?,
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
