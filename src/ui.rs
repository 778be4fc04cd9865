// UI layer: the interactive search-and-download flow using `dialoguer`
// prompts and `indicatif` progress output. Each step runs to completion
// before the next one starts.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::api::{SearchClient, SearchQuery, KNOWN_QUALITIES};
use crate::config::Config;
use crate::download::{prepare_target, DownloadOutcome, Downloader, Tally};
use crate::http::HttpTransport;
use crate::plan::{check_total, decide};

pub use crate::plan::Finish;

/// Run the whole flow: term, total, quantity, quality, links, downloads.
pub fn run(config: Config) -> Result<Finish> {
    let transport = HttpTransport::new()?;
    let client = SearchClient::new(&transport, &config);

    let term: String = Input::new()
        .with_prompt("What do you want to search for?")
        .interact_text()?;
    let query = SearchQuery::new(term.trim());

    let spinner = spinner("Searching...")?;
    let total = client.total_count(&query);
    spinner.finish_and_clear();
    let total = total.context("Failed to query the total number of images")?;

    println!("\nTotal images available: {total}");
    if let Err(finish) = check_total(total) {
        println!("Sorry, no image available for this search");
        return Ok(finish);
    }
    if !Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?
    {
        return Ok(Finish::Cancelled);
    }

    let requested: u64 = Input::new()
        .with_prompt("Enter number of images you want to download")
        .interact_text()?;
    let pages = match decide(total, requested, query.page_size) {
        Ok(pages) => pages,
        Err(finish) => {
            println!("Not a valid number: choose between 1 and {total}");
            return Ok(finish);
        }
    };
    debug!(requested, pages, "pages computed");

    println!("\nAvailable image quality: {}\n", KNOWN_QUALITIES.join(", "));
    let quality: String = Input::new()
        .with_prompt("Enter the quality")
        .default("regular".to_string())
        .interact_text()?;
    let quality = quality.trim();

    let items = client
        .get_links_with(&query, pages, quality, |item| {
            println!("name: {}\nurl: {}\n", item.safe_name, item.url);
        })
        .context("Failed to collect image links")?;
    if items.is_empty() {
        println!("No image offers the quality '{quality}'");
    }

    prepare_target(&config.output_dir)
        .with_context(|| format!("Cannot create {}", config.output_dir.display()))?;

    let start = Instant::now();
    println!("Download started...\n");
    let bar = ProgressBar::new(items.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {wide_msg}",
    )?);
    let mut stdout = io::stdout();
    let outcomes = Downloader::new(&transport).download_all_with(
        &items,
        &config.output_dir,
        |outcome| {
            if let Err(e) = report(&mut stdout, &bar, outcome) {
                warn!(error = %e, "failed to print download status");
            }
            bar.inc(1);
        },
    );
    bar.finish_and_clear();

    let tally = Tally::of(&outcomes);
    debug!(succeeded = tally.succeeded, failed = tally.failed, "batch finished");
    println!("\nDownloading finished.");
    println!("Downloaded: {}, failed: {}", tally.succeeded, tally.failed);
    println!("Time taken: {:.2?}", start.elapsed());
    Ok(Finish::Done(tally))
}

fn status_line(outcome: &DownloadOutcome) -> String {
    match &outcome.error {
        None => format!("Downloaded: {}", outcome.path.display()),
        Some(e) => format!("Failed to download {}: {e}", outcome.item.url),
    }
}

/// Write one status line to `out` with the bar cleared. Works the same
/// whether or not the bar is drawn.
fn report<W: Write>(out: &mut W, bar: &ProgressBar, outcome: &DownloadOutcome) -> io::Result<()> {
    let line = status_line(outcome);
    bar.suspend(|| writeln!(out, "{line}"))
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}
