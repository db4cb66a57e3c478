//! Rendering primitives shared by every command.
//!
//! Each helper returns a `String` shaped for the context's [`OutputMode`]:
//! pretty output carries badges and tables, plain output sticks to
//! `key=value` lines and tab-separated rows that scripts can cut apart.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, NOTHING, UTF8_FULL};
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Longest store path shown in a header before it is shortened.
const MAX_PATH_DISPLAY: usize = 50;

/// Title line for a command, e.g. `Carlog · dashboard (ABC-1234)`.
///
/// With `store`, a second line names the store file. Plain mode reduces the
/// header to `carlog <command>`; JSON mode has none.
pub fn header_with_context(
    ctx: &UiContext,
    command: &str,
    subject: Option<&str>,
    store: Option<&str>,
) -> String {
    match ctx.mode {
        OutputMode::Json => String::new(),
        OutputMode::Plain => format!("carlog {}", command),
        OutputMode::Pretty => {
            let title = styled("Carlog", styles::bold(), ctx.color);
            let mut lines = vec![match subject {
                Some(subject) => format!("{} \u{00B7} {} ({})", title, command, subject),
                None => format!("{} \u{00B7} {}", title, command),
            }];
            if let Some(path) = store {
                lines.push(kv(ctx, "Store", &shorten_path(path)));
            }
            lines.join("\n")
        }
    }
}

pub fn header(ctx: &UiContext, command: &str, subject: Option<&str>) -> String {
    header_with_context(ctx, command, subject, None)
}

// Keeps the tail, where the file name is.
fn shorten_path(path: &str) -> String {
    let len = path.chars().count();
    if len <= MAX_PATH_DISPLAY {
        return path.to_string();
    }
    let tail: String = path.chars().skip(len - (MAX_PATH_DISPLAY - 3)).collect();
    format!("...{}", tail)
}

pub fn divider(ctx: &UiContext) -> String {
    match ctx.mode {
        OutputMode::Pretty => "\u{2500}".repeat(ctx.width.min(60)),
        _ => "---".to_string(),
    }
}

/// `[✓] message`, colored by badge kind.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let marker = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        marker
    } else {
        format!("{} {}", marker, message)
    }
}

/// `Key: value` in pretty mode, `key=value` otherwise.
///
/// Plain keys are lowercased with spaces turned into underscores, so
/// `Last service` becomes `last_service`.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", label, value)
    } else {
        format!("{}={}", plain_key(key), value)
    }
}

fn plain_key(key: &str) -> String {
    key.to_lowercase().replace(' ', "_")
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        format!("{} {}", styled("Hint:", styles::dim(), ctx.color), text)
    } else {
        format!("hint={}", text)
    }
}

/// Summary printed after a command changes the store.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let (first, indent) = if ctx.mode.is_pretty() {
        (badge(ctx, Badge::Ok, title), "  ")
    } else {
        ("status=ok".to_string(), "")
    };
    std::iter::once(first)
        .chain(
            items
                .iter()
                .map(|(key, value)| format!("{}{}", indent, kv(ctx, key, value))),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table column. Numeric columns are right-aligned in pretty tables.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub numeric: bool,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self {
            header,
            numeric: false,
        }
    }

    pub const fn numeric(header: &'static str) -> Self {
        Self {
            header,
            numeric: true,
        }
    }
}

/// Bordered table that fills the terminal width.
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }
    let mut table = Table::new();
    if ctx.unicode {
        table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_width(u16::try_from(ctx.width).unwrap_or(u16::MAX));
    fill(ctx, table, columns, rows)
}

/// Borderless table with a dimmed header row.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return plain_rows(rows);
    }
    let mut table = Table::new();
    table.load_preset(NOTHING);
    fill(ctx, table, columns, rows)
}

fn fill(ctx: &UiContext, mut table: Table, columns: &[Column], rows: &[Vec<String>]) -> String {
    table.set_content_arrangement(ContentArrangement::Dynamic);
    // Attributes go through comfy-table so widths ignore escape codes.
    table.set_header(columns.iter().map(|column| {
        let cell = Cell::new(column.header);
        if ctx.color {
            cell.add_attribute(Attribute::Dim)
        } else {
            cell
        }
    }));
    for row in rows {
        table.add_row(row);
    }
    for (index, column) in columns.iter().enumerate() {
        if let Some(col) = table.column_mut(index) {
            if column.numeric {
                col.set_cell_alignment(CellAlignment::Right);
            }
        }
    }
    table.to_string()
}

// Values contain spaces (service names, workshops), so plain rows use tabs.
fn plain_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write to stdout; JSON mode keeps stdout for the document alone.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// `[✗] message` plus a hint line, or `error=`/`hint=` lines in plain mode.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = vec![if ctx.mode.is_pretty() {
        badge(ctx, Badge::Err, message)
    } else {
        format!("error={}", message)
    }];
    lines.extend(error_hint.map(|text| hint(ctx, text)));
    lines.join("\n")
}

pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}
