use clap::{ArgAction, Parser, Subcommand};
use commands::{export, import, platforms};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchport")]
#[command(about = "Watchport - Export streaming watchlists to CSV and import them into IMDB lists")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a streaming watchlist to a CSV file
    #[command(
        long_about = "Open a streaming platform's watchlist page in a Chromium instance, scroll until every lazily loaded item has rendered, and write the extracted titles to a CSV file. Either point --url at a page on a supported site or name a platform directly with --platform."
    )]
    Export {
        /// Page URL on a supported streaming site; the watchlist page is
        /// derived when this points elsewhere on the site
        #[arg(long, conflicts_with = "platform")]
        url: Option<String>,

        /// Platform to export: netflix, amazon, hulu, disney, appletv, max, peacock, paramount
        #[arg(long)]
        platform: Option<String>,

        /// CSV schema: simple, full, or imdb-list
        #[arg(long)]
        format: Option<String>,

        /// Output file (defaults to {platform}-watchlist-{date}.csv)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Run the browser headless (needs an already logged-in profile)
        #[arg(long, action = ArgAction::SetTrue)]
        headless: bool,
    },
    /// Import titles from a CSV file into an IMDB list
    #[command(
        long_about = "Read titles from a CSV file (any schema with a Title column, or Position,Title), look each one up via the IMDB suggestion search, and add every match to the given list. Requires a logged-in imdb.com session cookie; it is prompted for when neither --cookie nor the config provides one."
    )]
    Import {
        /// CSV file containing the titles
        csv: PathBuf,

        /// IMDB list-edit URL, e.g. https://www.imdb.com/list/ls123456789/edit
        #[arg(long)]
        list_url: Option<String>,

        /// Session cookie header for imdb.com (prompted for when absent)
        #[arg(long)]
        cookie: Option<String>,
    },
    /// List the supported streaming platforms
    Platforms,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Export {
            url,
            platform,
            format,
            out,
            headless,
        } => export::run_export(url, platform, format, out, headless, &output).await,
        Commands::Import {
            csv,
            list_url,
            cookie,
        } => import::run_import(csv, list_url, cookie, &output).await,
        Commands::Platforms => platforms::run_platforms(&output),
    }
}
