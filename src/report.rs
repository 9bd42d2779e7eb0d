//! Plan report
//!
//! Renders a [`Plan`] as a table of carts followed by a savings summary.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{discounts::fraction, items::Item, plan::Plan};

/// Errors that can occur when rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An amount doesn't fit in the currency's minor units.
    #[error("amount {0} is out of range")]
    Amount(Decimal),

    /// The plan refers to an item that wasn't given.
    #[error("Item {0} not found")]
    MissingItem(usize),

    /// IO error
    #[error("IO error")]
    IO,
}

/// A plan ready to print, with the items and currency it was computed for.
#[derive(Debug, Clone, Copy)]
pub struct PlanReport<'a> {
    plan: &'a Plan,
    items: &'a [Item],
    currency: &'static Currency,
}

impl<'a> PlanReport<'a> {
    /// Create a report for `plan`, which must have been computed over `items`.
    pub fn new(plan: &'a Plan, items: &'a [Item], currency: &'static Currency) -> Self {
        Self {
            plan,
            items,
            currency,
        }
    }

    /// Sum of all item prices
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Amount`] if the sum overflows.
    pub fn subtotal(&self) -> Result<Decimal, ReportError> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.price()))
            .ok_or(ReportError::Amount(Decimal::MAX))
    }

    /// Convert an exact amount to money, rounding half away from zero to minor units.
    ///
    /// Every supported currency has two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Amount`] if the amount doesn't fit in `i64` minor units.
    pub fn money(&self, amount: Decimal) -> Result<Money<'static, Currency>, ReportError> {
        let minor = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|value| value.to_i64())
            .ok_or(ReportError::Amount(amount))?;

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Print the report.
    ///
    /// # Errors
    ///
    /// Returns an error if an item is missing, an amount is out of range, or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Coupon", "Price", "Savings", "Off"]);

        let mut cart_rows: SmallVec<[usize; 8]> = smallvec![];
        let mut row = 1; // header is row 0

        for assignment in self.plan.assignments() {
            cart_rows.push(row);

            for (pos, &idx) in assignment.items.iter().enumerate() {
                let item = self.item(idx)?;

                let (coupon, savings, off) = if pos == 0 {
                    (
                        assignment.coupon_code.clone(),
                        format!("{}", self.money(assignment.saving)?),
                        format!("{:.2}%", percent_points(assignment.saving_percentage)),
                    )
                } else {
                    (String::new(), String::new(), String::new())
                };

                builder.push_record([
                    format!("#{:<3}", idx + 1),
                    item.name().to_string(),
                    coupon,
                    format!("{}", self.money(item.price())?),
                    savings,
                    off,
                ]);

                row += 1;
            }
        }

        if !self.plan.full_price_items().is_empty() {
            cart_rows.push(row);

            for &idx in self.plan.full_price_items() {
                let item = self.item(idx)?;

                builder.push_record([
                    format!("#{:<3}", idx + 1),
                    item.name().to_string(),
                    "full price".to_string(),
                    format!("{}", self.money(item.price())?),
                    String::new(),
                    String::new(),
                ]);
            }
        }

        write_table(&mut out, builder, &cart_rows)?;

        self.write_summary(&mut out)
    }

    fn item(&self, idx: usize) -> Result<&Item, ReportError> {
        self.items.get(idx).ok_or(ReportError::MissingItem(idx))
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let subtotal = self.subtotal()?;
        let saving = self.plan.total_saving();
        let total = subtotal
            .checked_sub(saving)
            .ok_or(ReportError::Amount(subtotal))?;

        let lines = [
            (" Subtotal:", format!("{}  ", self.money(subtotal)?)),
            (" Total:", format!("{}  ", self.money(total)?)),
            (
                " Savings:",
                format!(
                    "(best {:.2}%) {}  ",
                    percent_points(self.plan.max_percentage()),
                    self.money(saving)?
                ),
            ),
            (" Strategy:", format!("{}  ", self.plan.strategy())),
        ];

        let label_width = lines
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let value_width = lines
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in &lines {
            writeln!(out, "{label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReportError::IO)?;
        }

        if self.plan.excluded_coupons() > 0 {
            writeln!(
                out,
                " {} malformed coupon(s) excluded",
                self.plan.excluded_coupons()
            )
            .map_err(|_err| ReportError::IO)?;
        }

        writeln!(out).map_err(|_err| ReportError::IO)
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    cart_rows: &[usize],
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in cart_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReportError::IO)
}

/// Percent points (25.00 for 0.25), rounded to two places.
fn percent_points(percentage: Percentage) -> Decimal {
    (fraction(&percentage) * Decimal::ONE_HUNDRED).round_dp(2)
}
