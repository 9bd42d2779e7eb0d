//! Command line arguments for the `splitcart` binary

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::optimizer::{
    AllocationMode, DEFAULT_EXACT_ITEM_LIMIT, DEFAULT_EXACT_PARTITION_LIMIT, OptimizerConfig,
};

/// Allocation mode as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One coupon on the single best cart
    Single,

    /// One coupon per cart, as many carts as it pays
    Partitioned,
}

impl From<ModeArg> for AllocationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => AllocationMode::Single,
            ModeArg::Partitioned => AllocationMode::Partitioned,
        }
    }
}

/// Split a wishlist into carts that get the most out of the available coupons
#[derive(Debug, Parser)]
#[command(name = "splitcart", about, long_about = None)]
pub struct CliArgs {
    /// Directory holding `wishlists/` and `coupons/`
    #[arg(long, default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set to load
    #[arg(short, long, default_value = "default")]
    pub set: String,

    /// Only consider the first n wishlist items
    #[arg(short)]
    pub n: Option<usize>,

    /// How many coupons a plan may apply
    #[arg(short, long, value_enum, env = "SPLITCART_MODE", default_value = "single")]
    pub mode: ModeArg,

    /// Largest item count searched exhaustively in single mode
    #[arg(long, env = "SPLITCART_EXACT_LIMIT", default_value_t = DEFAULT_EXACT_ITEM_LIMIT)]
    pub exact_limit: usize,

    /// Largest item count searched exhaustively in partitioned mode
    #[arg(
        long,
        env = "SPLITCART_EXACT_PARTITION_LIMIT",
        default_value_t = DEFAULT_EXACT_PARTITION_LIMIT
    )]
    pub exact_partition_limit: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl CliArgs {
    /// Optimizer settings from the arguments
    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig::default()
            .with_mode(self.mode.into())
            .with_exact_item_limit(self.exact_limit)
            .with_exact_partition_limit(self.exact_partition_limit)
    }
}
