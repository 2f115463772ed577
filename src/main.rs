use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use restaurant_insights::charts::{self, ChartKind, ChartSize};
use restaurant_insights::config::ServeConfig;
use restaurant_insights::records::{SearchMode, SortBy};
use restaurant_insights::search::DEFAULT_SEARCH_LIMIT;
use restaurant_insights::service::{AnalyticsService, DEFAULT_CACHE_TTL};
use restaurant_insights::{csv_reader, http, logging, RestaurantTable};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "restaurant-insights")]
#[command(about = "Restaurant analytics over a CSV dataset, as JSON, PNG charts, or an HTTP API", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Input {
    /// CSV file to analyse; reads stdin when omitted
    #[arg(long)]
    data: Option<PathBuf>,
}

impl Input {
    fn load(&self) -> Result<RestaurantTable> {
        match &self.data {
            Some(path) => csv_reader::load_restaurants(path),
            None => csv_reader::read_restaurants_from_stdin().context("Failed to read CSV from stdin"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API and dashboard pages
    Serve(ServeConfig),

    /// Per-type counts, share, average rating and cost
    Types {
        #[command(flatten)]
        input: Input,
    },

    /// Highest ranked restaurants after de-duplication
    Top {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=10))]
        limit: u64,
        #[arg(long, value_enum, default_value_t = SortBy::Votes)]
        sort_by: SortBy,
    },

    /// Locations with the most restaurants
    Areas {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=20))]
        limit: u64,
    },

    /// Case-insensitive substring search
    Search {
        #[command(flatten)]
        input: Input,
        query: String,
        #[arg(long, value_enum)]
        mode: SearchMode,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT as u64, value_parser = clap::value_parser!(u64).range(1..=10))]
        limit: u64,
    },

    /// Render a chart and write the PNG to stdout
    Chart {
        #[command(flatten)]
        input: Input,
        #[arg(value_enum)]
        kind: ChartKind,
        #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(300..=1200))]
        width: u32,
        #[arg(long, default_value_t = 400, value_parser = clap::value_parser!(u32).range(200..=800))]
        height: u32,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("Failed to write JSON")?;
    writeln!(handle).context("Failed to write JSON")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn analytics(input: &Input) -> Result<AnalyticsService> {
    Ok(AnalyticsService::new(input.load()?, DEFAULT_CACHE_TTL))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json);

    match cli.command {
        Command::Serve(config) => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            runtime.block_on(http::serve(config))
        }
        Command::Types { input } => print_json(&analytics(&input)?.type_summary()),
        Command::Top { input, limit, sort_by } => {
            print_json(&analytics(&input)?.top_restaurants(limit as usize, sort_by))
        }
        Command::Areas { input, limit } => print_json(&analytics(&input)?.foodie_areas(limit as usize)),
        Command::Search {
            input,
            query,
            mode,
            limit,
        } => print_json(&analytics(&input)?.search(&query, mode, limit as usize)),
        Command::Chart {
            input,
            kind,
            width,
            height,
        } => {
            let size = ChartSize::new(width, height).map_err(anyhow::Error::msg)?;
            let png_bytes = charts::render_png(&analytics(&input)?, kind, size)
                .context("Failed to render chart")?;

            // Write PNG to stdout
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&png_bytes)
                .context("Failed to write PNG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
            Ok(())
        }
    }
}
