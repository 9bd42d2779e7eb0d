//! Splitcart
//!
//! Splitcart takes a wishlist and a set of discount coupons and finds how to split the items into
//! carts so the coupons save the most. Each coupon is either a flat amount or a percentage off,
//! optionally capped and gated on a minimum purchase.
//!
//! Small wishlists are searched exhaustively; larger ones fall back to a greedy heuristic. See
//! [`optimizer::Optimizer`].

pub mod cli;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod optimizer;
pub mod plan;
pub mod prelude;
pub mod recency;
pub mod report;
pub mod solvers;
