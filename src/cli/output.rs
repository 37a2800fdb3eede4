//! Shared terminal rendering helpers.

use jiff::{Timestamp, tz::TimeZone};
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Formats an amount in the store currency.
pub(crate) fn money(amount: Decimal) -> String {
    format!("{}", Money::from_decimal(amount, iso::THB))
}

/// Renders a builder as a rounded table with the given columns right-aligned.
pub(crate) fn render_table(builder: Builder, right_aligned: &[usize]) -> String {
    let mut table = builder.build();
    table.with(Style::modern_rounded());

    for &column in right_aligned {
        table.modify(Columns::new(column..=column), Alignment::right());
    }

    table.to_string()
}

/// Formats a timestamp in the system time zone, minute precision.
pub(crate) fn local_time(timestamp: Timestamp) -> String {
    timestamp
        .to_zoned(TimeZone::system())
        .strftime("%Y-%m-%d %H:%M")
        .to_string()
}
