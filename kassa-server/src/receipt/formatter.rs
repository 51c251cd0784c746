//! Receipt formatter
//!
//! Turns a validated [`ReceiptRequest`] into print directives. The layout is
//! fixed: header, customer block, item table, total, footer, cut.

use chrono::{DateTime, Local};
use kassa_printer::{Align, Column, Directive, Font, truncate_chars};

use super::model::{LineItem, ReceiptRequest};
use super::money::format_money;

/// Item names are cut to this many characters
pub const ITEM_NAME_MAX_CHARS: usize = 20;

/// Column shares of the paper width: Item, Qty, Price, Total
const COLUMN_WIDTHS: [f64; 4] = [0.4, 0.2, 0.2, 0.2];

/// Lines fed before cutting so the footer clears the cutter
const FEED_BEFORE_CUT: u8 = 3;

/// Receipt formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptFormatter;

impl ReceiptFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render a receipt printed at `now`
    pub fn format(&self, receipt: &ReceiptRequest, now: DateTime<Local>) -> Vec<Directive> {
        let mut out = Vec::with_capacity(32 + receipt.items.len());

        self.render_header(&mut out, receipt, now);
        self.render_customer(&mut out, receipt);
        self.render_items(&mut out, &receipt.items);
        self.render_total(&mut out, receipt);
        self.render_footer(&mut out, receipt, now);

        out
    }

    fn render_header(&self, out: &mut Vec<Directive>, receipt: &ReceiptRequest, now: DateTime<Local>) {
        out.push(Directive::Font(Font::A));
        out.push(Directive::Align(Align::Center));
        out.push(Directive::Bold(true));
        out.push(Directive::Size {
            width: 2,
            height: 2,
        });

        out.push(Directive::Text(receipt.shop_name().to_string()));
        out.push(Directive::Text(format!("Order #{}", receipt.order_ref)));
        let date = match &receipt.order_date {
            Some(date) => date.clone(),
            None => format_timestamp(now),
        };
        out.push(Directive::Text(date));
        out.push(Directive::BlankLine);

        // Back to normal print so the table fits the paper
        out.push(Directive::Size {
            width: 1,
            height: 1,
        });
        out.push(Directive::Bold(false));
    }

    fn render_customer(&self, out: &mut Vec<Directive>, receipt: &ReceiptRequest) {
        out.push(Directive::Align(Align::Left));
        out.push(Directive::Text(format!("Customer: {}", receipt.customer_name())));
        out.push(Directive::Text(format!("Phone: {}", receipt.customer_phone())));
        out.push(Directive::BlankLine);
    }

    fn render_items(&self, out: &mut Vec<Directive>, items: &[LineItem]) {
        out.push(row(["Item", "Qty", "Price", "Total"].map(String::from)));
        out.push(Directive::Separator);

        for item in items {
            out.push(row([
                truncate_chars(&item.name, ITEM_NAME_MAX_CHARS),
                item.quantity.to_string(),
                format_money(item.price),
                format_money(item.line_total()),
            ]));
        }

        out.push(Directive::Separator);
    }

    fn render_total(&self, out: &mut Vec<Directive>, receipt: &ReceiptRequest) {
        out.push(Directive::Align(Align::Right));
        out.push(Directive::Text(format!("Total: Rs.{}", format_money(receipt.total))));
        out.push(Directive::BlankLine);
    }

    fn render_footer(&self, out: &mut Vec<Directive>, receipt: &ReceiptRequest, now: DateTime<Local>) {
        out.push(Directive::Align(Align::Center));
        out.push(Directive::Text(receipt.footer().to_string()));
        out.push(Directive::BlankLine);
        out.push(Directive::Text(format_timestamp(now)));
        out.push(Directive::Feed(FEED_BEFORE_CUT));
        out.push(Directive::Cut);
    }
}

fn row(cells: [String; 4]) -> Directive {
    Directive::Row(
        cells
            .into_iter()
            .zip(COLUMN_WIDTHS)
            .map(|(text, width)| Column::new(text, width))
            .collect(),
    )
}

/// Local time as `M/D/YYYY, h:mm:ss AM`
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
