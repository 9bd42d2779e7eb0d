//! Splitcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    coupons::{Coupon, CouponError, CouponRule, UsableCoupons, usable_coupons},
    discounts::{Discount, DiscountError, saving},
    fixtures::{Fixture, FixtureError},
    items::{
        Item,
        groups::{ItemGroup, ItemGroupError},
    },
    optimizer::{AllocationMode, Optimizer, OptimizerConfig, OptimizerError, optimize},
    plan::{Plan, ScoredAssignment, Strategy},
    recency::{DEFAULT_WINDOW, SeenCoupon, filter_unseen},
    report::{PlanReport, ReportError},
    solvers::{
        Solver, SolverError, SolverResult, exact::ExactSolver, greedy::GreedySolver,
        partitioned::PartitionSolver,
    },
};
