use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MIN_TABLE_COLUMN_WIDTH: usize = 8;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(100);
    cmp::max(from_env, 40)
}

/// Character count; Cyrillic labels are multi-byte.
fn text_width(value: &str) -> usize {
    value.chars().count()
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let label_width = entries
        .iter()
        .map(|(label, _)| text_width(label))
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let natural = natural_column_widths(columns, rows);
    let minimums = columns
        .iter()
        .map(|column| cmp::max(text_width(column.name), MIN_TABLE_COLUMN_WIDTH))
        .collect::<Vec<usize>>();
    let gap_total = COLUMN_GAP * columns.len().saturating_sub(1);
    let budget = max_width.saturating_sub(INDENT).saturating_sub(gap_total);

    let Some(widths) = fit_widths_to_budget(&natural, &minimums, budget) else {
        return render_blocks(columns, rows, block_label);
    };

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];

    for row in rows {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                wrap_text(row.get(index).map(String::as_str).unwrap_or(""), *width)
            })
            .collect::<Vec<Vec<String>>>();
        let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        for line_index in 0..max_lines {
            let line_cells = wrapped
                .iter()
                .map(|chunks| chunks.get(line_index).cloned().unwrap_or_default())
                .collect::<Vec<String>>();
            output.push(format_row(columns, &line_cells, &widths));
        }
    }

    output
}

fn natural_column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| text_width(column.name))
        .collect::<Vec<usize>>();

    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, text_width(value));
            }
        }
    }

    widths
}

fn fit_widths_to_budget(
    natural: &[usize],
    minimums: &[usize],
    budget: usize,
) -> Option<Vec<usize>> {
    if natural.len() != minimums.len() || minimums.iter().sum::<usize>() > budget {
        return None;
    }

    let mut widths = natural.to_vec();
    let mut total = widths.iter().sum::<usize>();
    while total > budget {
        // Shrink the widest column that is still above its minimum.
        let candidate = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > minimums[*index])
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let index = candidate?;
        widths[index] -= 1;
        total -= 1;
    }

    Some(widths)
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let width = *widths.get(index).unwrap_or(&MIN_TABLE_COLUMN_WIDTH);
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            match column.align {
                Align::Left => format!("{value:<width$}"),
                Align::Right => format!("{value:>width$}"),
            }
        })
        .collect::<Vec<String>>();

    format!("{}{}", " ".repeat(INDENT), pieces.join("  ").trim_end())
}

fn wrap_text(value: &str, width: usize) -> Vec<String> {
    if width == 0 || text_width(value) <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        if !current.is_empty() && text_width(&current) + 1 + text_width(word) <= width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word) <= width {
            current.push_str(word);
        } else {
            let mut chunks = split_long_token(word, width);
            current = chunks.pop().unwrap_or_default();
            lines.extend(chunks);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn split_long_token(token: &str, width: usize) -> Vec<String> {
    let chars = token.chars().collect::<Vec<char>>();
    chars
        .chunks(cmp::max(width, 1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels.iter().map(|label| text_width(label)).max().unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        for (column_index, label) in labels.iter().enumerate() {
            let value = row.get(column_index).map(String::as_str).unwrap_or("");
            output.push(format!("    {label:<label_width$}  {value}"));
        }
    }

    output
}
