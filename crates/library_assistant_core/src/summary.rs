//! crates/library_assistant_core/src/summary.rs
//!
//! Renders a resolved set of books into the plain-text report that grounds
//! the AI answer. Output is deterministic for a given input order.

use crate::domain::{Book, QueryContext, QueryMode, User};
use std::fmt::Write;

/// Counts occurrences of each key, keeping the order keys were first seen.
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(seen, _)| *seen == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// Highest count first; `sort_by` is stable so ties keep first-seen order.
fn by_count_desc(mut counts: Vec<(&str, usize)>) -> Vec<(&str, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// Writing into a String cannot fail, so the fmt::Result is dropped.
fn push_breakdown(out: &mut String, heading: &str, counts: &[(&str, usize)]) {
    let _ = writeln!(out, "\n{}:", heading);
    for (key, count) in counts {
        let _ = writeln!(out, "- {}: {} books", key, count);
    }
}

/// Renders the report for `books` as seen by `principal` in `mode`.
pub fn summarize(books: &[Book], principal: &User, mode: QueryMode) -> String {
    let show_owner = principal.is_admin && mode != QueryMode::PersonalAdmin;

    let mut data = String::from("Library Data:\n\n");
    if mode == QueryMode::Recommendation {
        data.push_str("Books from other users (your own books are excluded):\n");
    } else {
        data.push_str("Books:\n");
    }

    for book in books {
        let _ = write!(
            data,
            "- {} by {}, Genre: {}, Status: {}, Price: ${:.2}",
            book.title, book.author, book.genre, book.status, book.price
        );
        if show_owner {
            let _ = write!(data, " (Owner: {})", book.owner_name);
        }
        data.push('\n');
    }

    // Seeded with +0.0: `Sum for f64` starts at -0.0 and would print "$-0.00".
    let total_value = books.iter().fold(0.0_f64, |acc, b| acc + b.price);
    let avg_price = if books.is_empty() {
        0.0
    } else {
        total_value / books.len() as f64
    };
    let _ = writeln!(data, "\nTotal Books: {}", books.len());
    let _ = writeln!(data, "Total Value: ${:.2}", total_value);
    let _ = writeln!(data, "Average Price: ${:.2}", avg_price);

    let genres = by_count_desc(tally(books.iter().map(|b| b.genre.as_str())));
    push_breakdown(&mut data, "Books by Genre", &genres);

    let statuses = tally(books.iter().map(|b| b.status.as_str()));
    push_breakdown(&mut data, "Books by Status", &statuses);

    if principal.is_admin && mode == QueryMode::NormalAdmin {
        let owners = by_count_desc(tally(books.iter().map(|b| b.owner_name.as_str())));
        push_breakdown(&mut data, "Books per User", &owners);
    }

    data
}

/// The text handed to the AI for a resolved question: the report, or the
/// mode's sentinel when nothing is in scope.
pub fn library_data(ctx: &QueryContext) -> String {
    if ctx.books.is_empty() {
        return ctx.mode.empty_message().to_string();
    }
    summarize(&ctx.books, &ctx.principal, ctx.mode)
}
