//! Optimizer
//!
//! Entry point tying the pieces together: validates the wishlist, normalizes coupon rules,
//! picks a solver for the input size and wraps the result in a [`Plan`].

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{Span, debug};

use crate::{
    coupons::{CouponRule, usable_coupons},
    items::{Item, first_negative_price, prices},
    plan::{Plan, Strategy},
    solvers::{
        Solver, SolverError, exact::ExactSolver, greedy::GreedySolver,
        partitioned::PartitionSolver, partitions::bell_number, subsets::subset_count,
    },
};

/// Default number of items up to which the single-cart search is exhaustive
pub const DEFAULT_EXACT_ITEM_LIMIT: usize = 12;

/// Default number of items up to which the partition search is exhaustive
pub const DEFAULT_EXACT_PARTITION_LIMIT: usize = 9;

/// Errors that abort an optimizer run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizerError {
    /// An item was priced below zero.
    #[error("item {identifier} has negative price {price}")]
    NegativePrice {
        /// Identifier of the offending item
        identifier: String,

        /// Its price
        price: Decimal,
    },

    /// Wrapped solver error
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// How many coupons a plan may apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllocationMode {
    /// One coupon on the single best cart; everything else at full price
    #[default]
    Single,

    /// Split the items into carts, each taking a different coupon
    Partitioned,
}

/// Optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    mode: AllocationMode,
    exact_item_limit: usize,
    exact_partition_limit: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            mode: AllocationMode::default(),
            exact_item_limit: DEFAULT_EXACT_ITEM_LIMIT,
            exact_partition_limit: DEFAULT_EXACT_PARTITION_LIMIT,
        }
    }
}

impl OptimizerConfig {
    /// Set the allocation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: AllocationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the largest item count searched exhaustively in single mode. Above it the greedy
    /// heuristic runs.
    #[must_use]
    pub fn with_exact_item_limit(mut self, limit: usize) -> Self {
        self.exact_item_limit = limit;
        self
    }

    /// Set the largest item count searched exhaustively in partitioned mode.
    #[must_use]
    pub fn with_exact_partition_limit(mut self, limit: usize) -> Self {
        self.exact_partition_limit = limit;
        self
    }

    /// Allocation mode
    pub fn mode(&self) -> AllocationMode {
        self.mode
    }

    /// Largest item count searched exhaustively in single mode
    pub fn exact_item_limit(&self) -> usize {
        self.exact_item_limit
    }

    /// Largest item count searched exhaustively in partitioned mode
    pub fn exact_partition_limit(&self) -> usize {
        self.exact_partition_limit
    }

    /// Largest item count searched exhaustively in the configured mode
    pub fn exact_limit(&self) -> usize {
        match self.mode {
            AllocationMode::Single => self.exact_item_limit,
            AllocationMode::Partitioned => self.exact_partition_limit,
        }
    }
}

/// Finds the best coupon plan for a wishlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    /// Create an optimizer with the given settings.
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// The optimizer's settings
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Allocate coupons over the items.
    ///
    /// Only rules with known terms take part; malformed ones are dropped and counted in
    /// [`Plan::excluded_coupons`]. With no items or no usable coupon the plan is empty.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::NegativePrice`] if an item has a negative price, or a wrapped
    /// [`SolverError`] if an amount overflows.
    #[tracing::instrument(
        name = "optimizer.run",
        skip_all,
        fields(
            items = items.len(),
            rules = rules.len(),
            mode = ?self.config.mode,
            strategy = tracing::field::Empty
        ),
        err
    )]
    pub fn run(&self, items: &[Item], rules: &[CouponRule]) -> Result<Plan, OptimizerError> {
        if let Some(item) = first_negative_price(items) {
            return Err(OptimizerError::NegativePrice {
                identifier: item.identifier().to_string(),
                price: item.price(),
            });
        }

        let usable = usable_coupons(rules);

        if items.is_empty() || usable.coupons.is_empty() {
            debug!(
                coupons = usable.coupons.len(),
                excluded = usable.excluded,
                "nothing to allocate"
            );

            return Ok(Plan::empty(items.len(), usable.excluded));
        }

        let prices = prices(items);
        let strategy = self.strategy_for(items.len());

        Span::current().record("strategy", tracing::field::display(strategy));

        let result = match (strategy, self.config.mode) {
            (Strategy::Exact, mode) => {
                debug!(
                    candidates = %search_space(items.len(), usable.coupons.len(), mode),
                    "starting exact search"
                );

                match mode {
                    AllocationMode::Single => ExactSolver.solve(&usable.coupons, &prices)?,
                    AllocationMode::Partitioned => {
                        PartitionSolver.solve(&usable.coupons, &prices)?
                    }
                }
            }
            (Strategy::Greedy, mode) => {
                debug!(
                    limit = self.config.exact_limit(),
                    "too many items for exact search, using greedy heuristic"
                );

                GreedySolver::new(mode).solve(&usable.coupons, &prices)?
            }
        };

        let plan = Plan::from_solver_result(
            result,
            items,
            &usable.coupons,
            strategy,
            usable.excluded,
        )?;

        debug!(
            total_saving = %plan.total_saving(),
            assignments = plan.assignments().len(),
            "plan selected"
        );

        Ok(plan)
    }

    fn strategy_for(&self, item_count: usize) -> Strategy {
        if item_count <= self.config.exact_limit() {
            Strategy::Exact
        } else {
            Strategy::Greedy
        }
    }
}

/// Allocate coupons with the default settings. See [`Optimizer::run`].
///
/// # Errors
///
/// See [`Optimizer::run`].
pub fn optimize(items: &[Item], rules: &[CouponRule]) -> Result<Plan, OptimizerError> {
    Optimizer::default().run(items, rules)
}

/// Number of candidates an exact search scores, saturating at `u128::MAX`.
///
/// Single mode scores every non-empty subset against every coupon; partitioned mode walks
/// every partition.
pub fn search_space(item_count: usize, coupon_count: usize, mode: AllocationMode) -> u128 {
    match mode {
        AllocationMode::Single => subset_count(item_count)
            .saturating_mul(u128::try_from(coupon_count).unwrap_or(u128::MAX)),
        AllocationMode::Partitioned => bell_number(item_count),
    }
}
