//! Splitcart CLI
//!
//! Loads a fixture set, drops coupons seen in the last two days, and prints the best plan.

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use jiff::Timestamp;
use tracing::info;
use tracing_subscriber::EnvFilter;

use splitcart::{
    cli::CliArgs,
    fixtures::Fixture,
    optimizer::Optimizer,
    recency::{DEFAULT_WINDOW, filter_unseen},
    report::PlanReport,
};

#[expect(clippy::print_stdout, reason = "CLI output")]
fn main() -> Result<()> {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut fixture = Fixture::with_base_path(&args.fixtures);

    fixture.load_wishlist(&args.set)?.load_coupons(&args.set)?;

    let items = fixture.wishlist(args.n)?;
    let rules = filter_unseen(
        fixture.rules().to_vec(),
        fixture.seen(),
        Timestamp::now(),
        DEFAULT_WINDOW,
    );

    info!(
        items = items.len(),
        rules = rules.len(),
        skipped_items = fixture.skipped_items(),
        skipped_rules = fixture.skipped_rules(),
        "fixture loaded"
    );

    let start = Instant::now();

    let plan = Optimizer::new(args.optimizer_config()).run(items, &rules)?;

    let elapsed = start.elapsed().as_secs_f32();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    PlanReport::new(&plan, items, fixture.currency()?).write_to(&mut handle)?;

    println!("\nSolution: {elapsed}s");

    Ok(())
}
