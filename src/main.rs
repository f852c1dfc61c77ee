use anyhow::Result;
use bench_plot::chart::{render_chart, Metric};
use bench_plot::dataset::collect_datasets;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bench-plot")]
#[command(about = "Generate benchmark comparison charts from CSV timing data")]
#[command(after_help = "\
Examples:
  # Auto-infer labels from filenames (recommended)
  bench-plot bench/data/results_amd_ryzen_9_9950x3d_avx2.csv

  # Single dataset with custom label
  bench-plot --input results.csv:AVX2

  # Custom output and title
  bench-plot bench/data/results_amd.csv bench/data/results_intel.csv \\
    --output my_chart.png --title \"My Custom Title\"

  # Plot GFLOP/s instead of time
  bench-plot bench/data/results_amd.csv --metric gflops")]
struct Cli {
    /// Input CSV files (labels auto-inferred from filenames)
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Input CSV files with optional labels, format: file.csv or file.csv:Label
    #[arg(short, long, value_name = "FILE[:LABEL]", num_args = 1..)]
    input: Vec<String>,

    /// Output image path
    #[arg(short, long, default_value = "docs/img/benchmark_vector_mul.png")]
    output: PathBuf,

    /// Chart title (auto-generated from CPU names if not specified)
    #[arg(short, long)]
    title: Option<String>,

    /// Metric to plot
    #[arg(short, long, value_enum, default_value = "time")]
    metric: Metric,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut specs = cli.files.clone();
    specs.extend(cli.input.iter().cloned());

    if specs.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "No input files specified. Provide files as positional arguments or use --input",
            )
            .exit();
    }

    let datasets = collect_datasets(&specs)?;

    println!("\nGenerating chart...");
    render_chart(&datasets, &cli.output, cli.title.as_deref(), cli.metric)?;
    println!("Done!");

    Ok(())
}
