//! Stowage packing runner CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stowage::{pack_batch, pack_request, PackRequest, PackResponse};

#[derive(Parser)]
#[command(name = "stowage")]
#[command(about = "Pack items into containers from a JSON request")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a single request
    Pack {
        /// Path to the request JSON file
        request: PathBuf,

        /// Output file for the response (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Pack several independent requests in parallel
    Batch {
        /// Paths to request JSON files
        #[arg(required = true)]
        requests: Vec<PathBuf>,

        /// Directory for the response files
        #[arg(short = 'd', long, default_value = "responses")]
        output_dir: PathBuf,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
}

fn read_request(path: &Path) -> anyhow::Result<PackRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    PackRequest::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_summary(label: &str, response: &PackResponse) {
    match &response.result {
        Some(result) => eprintln!(
            "{}: {} of {} items packed into {} containers ({:.2}% utilization)",
            label,
            result.summary.total_packed_items,
            result.summary.total_items,
            result.summary.total_bins_used,
            result.summary.overall_utilization
        ),
        None => eprintln!("{}: {}", label, response.message),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack {
            request,
            output,
            compact,
        } => {
            let response = pack_request(&read_request(&request)?);
            print_summary(&request.display().to_string(), &response);

            let json = response.to_json(!compact)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("Response saved to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Batch {
            requests,
            output_dir,
            compact,
        } => {
            let parsed = requests
                .iter()
                .map(|path| read_request(path))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let responses = pack_batch(&parsed);

            std::fs::create_dir_all(&output_dir)?;
            for (path, response) in requests.iter().zip(&responses) {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "request".to_string());
                let file_path = output_dir.join(format!("{}.response.json", stem));
                std::fs::write(&file_path, response.to_json(!compact)?)?;
                print_summary(&stem, response);
            }

            println!("Responses saved to: {}", output_dir.display());
        }
    }

    Ok(())
}
