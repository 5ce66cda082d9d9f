//! Grid table rendering for task listings.

use scheduler_client::models::TaskSummary;
use unicode_width::UnicodeWidthStr;

const HEADERS: [&str; 6] = ["ID", "Name", "Enabled", "Model", "Commit", "Last Run Status"];

const ID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 30;
const MODEL_WIDTH: usize = 20;
const STATUS_WIDTH: usize = 15;

const DEFAULT_STATUS: &str = "Never";
const CHECK: &str = "✓";
const CROSS: &str = "✗";

/// Render tasks as a grid, one row per task in input order.
pub(crate) fn format_task_table(tasks: &[TaskSummary]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows: Vec<[String; 6]> = tasks.iter().map(task_row).collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_width(cell));
        }
    }

    let separator = border(&widths, '-');
    let mut lines = Vec::with_capacity(rows.len() * 2 + 3);
    lines.push(separator.clone());
    lines.extend(render_row(&HEADERS, &widths));
    lines.push(border(&widths, '='));
    for row in &rows {
        lines.extend(render_row(row, &widths));
        lines.push(separator.clone());
    }
    lines.join("\n")
}

fn task_row(task: &TaskSummary) -> [String; 6] {
    [
        truncate(task.id.as_deref().unwrap_or_default(), ID_WIDTH),
        truncate(task.name.as_deref().unwrap_or_default(), NAME_WIDTH),
        check(task.enabled.unwrap_or(false)).to_string(),
        truncate(task.model.as_deref().unwrap_or_default(), MODEL_WIDTH),
        check(task.commit_on_success.unwrap_or(true)).to_string(),
        truncate(
            task.last_run_status.as_deref().unwrap_or(DEFAULT_STATUS),
            STATUS_WIDTH,
        ),
    ]
}

fn check(flag: bool) -> &'static str {
    if flag {
        CHECK
    } else {
        CROSS
    }
}

/// Keep at most `max` characters.
fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line
}

/// Widest physical line of a cell.
fn cell_width(cell: &str) -> usize {
    cell.split('\n').map(|line| line.width()).max().unwrap_or(0)
}

/// Render one logical row. Cells with embedded newlines make the row span
/// several physical lines; shorter cells are padded with blanks.
fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> Vec<String> {
    let cell_lines: Vec<Vec<&str>> = cells
        .iter()
        .map(|cell| cell.as_ref().split('\n').collect())
        .collect();
    let height = cell_lines.iter().map(Vec::len).max().unwrap_or(1);

    (0..height)
        .map(|i| {
            let mut line = String::from("|");
            for (parts, width) in cell_lines.iter().zip(widths) {
                let part = parts.get(i).copied().unwrap_or_default();
                let padding = width.saturating_sub(part.width());
                line.push(' ');
                line.push_str(part);
                line.extend(std::iter::repeat_n(' ', padding + 1));
                line.push('|');
            }
            line
        })
        .collect()
}
