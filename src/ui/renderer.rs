use unicode_width::UnicodeWidthStr;

use crate::core::app::TaskRefresh;
use crate::core::message::Message;
use crate::core::tasks::{Task, TaskBatch};

const TASK_COLUMNS: [&str; 4] = ["Task", "Date", "Time", "Status"];
const COLUMN_GAP: &str = "  ";

/// Renders one transcript entry as `Label: content`, indenting continuation
/// lines under the content.
pub fn render_message(message: &Message) -> String {
    let label = message.role.display_label();
    let indent = " ".repeat(label.width() + 2);
    let mut lines = message.content.lines();
    let first = lines.next().unwrap_or_default();

    let mut rendered = format!("{label}: {first}");
    for line in lines {
        rendered.push('\n');
        if !line.is_empty() {
            rendered.push_str(&indent);
            rendered.push_str(line);
        }
    }
    rendered
}

pub fn render_status(disconnected: bool, base_url: &str) -> String {
    if disconnected {
        format!("⚠️ Backend Disconnected (cannot reach {base_url})")
    } else {
        "✅ Backend Connected".to_string()
    }
}

/// Lays the tasks out as an aligned table. The backend id is not shown.
pub fn render_task_table(tasks: &[Task]) -> String {
    let rows: Vec<[&str; 4]> = tasks
        .iter()
        .map(|task| {
            [
                task.task.as_str(),
                task.date.as_str(),
                task.time.as_str(),
                task.status.as_str(),
            ]
        })
        .collect();

    let mut widths = TASK_COLUMNS.map(|column| column.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(&TASK_COLUMNS, &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    for row in &rows {
        lines.push(render_row(row, &widths));
    }
    lines.join("\n")
}

fn render_row(cells: &[&str; 4], widths: &[usize; 4]) -> String {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    line.trim_end().to_string()
}

/// Everything shown for one task refresh, table included.
pub fn render_task_refresh(refresh: &TaskRefresh) -> String {
    match refresh {
        TaskRefresh::Loaded(batch) => render_task_batch(batch),
        TaskRefresh::Failed(err) => err.message().to_string(),
    }
}

fn render_task_batch(batch: &TaskBatch) -> String {
    if batch.tasks.is_empty() {
        return "ℹ️ No scheduled tasks found. Add tasks via the chat!".to_string();
    }

    let mut sections = vec![render_task_table(&batch.tasks)];
    for skipped in &batch.skipped {
        sections.push(format!(
            "⚠️ Skipped malformed task #{}: {}",
            skipped.index + 1,
            skipped.reason
        ));
    }
    sections.push(format!("✅ Loaded {} task(s)", batch.tasks.len()));
    sections.join("\n")
}
