use colored::*;
use jiff::civil::Date;

use crewboard::{
    models::{
        board::{Board, Column},
        completed::CompletedProject,
        project::Project,
        task::{Priority, Task},
    },
    services::archive::ShowcaseStats,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// First block of a UUID, enough to refer to an item from the command line
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Print `left` and right-align `right` (dimmed) when the terminal is wide enough
fn print_aligned(left: ColoredString, left_visible_len: usize, right: &str) {
    if right.is_empty() {
        println!("{}", left);
        return;
    }

    let terminal_width = get_terminal_width();
    let total_content = left_visible_len + right.chars().count();

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left, " ".repeat(padding), right.dimmed());
    } else {
        println!("{}", left);
    }
}

fn progress_bar(percentage: u8) -> String {
    let filled = usize::from(percentage) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn deadline_label(deadline: Option<Date>, approaching: bool) -> Option<String> {
    let deadline = deadline?;
    let label = format!("due {}", deadline.strftime("%b %d"));
    Some(if approaching { format!("! {}", label) } else { label })
}

/// Render one project row: short id, progress and title, with tags and deadline on the right
pub fn render_project_line(project: &Project, today: Date) {
    let progress = project.progress();
    let left_plain = format!(
        "  {}  {} {:>3}%  {}",
        short_id(&project.id),
        progress_bar(progress),
        progress,
        project.title
    );

    let styled_left = if progress == 100 {
        left_plain.green()
    } else {
        left_plain.bold()
    };

    let mut right_parts = vec![];
    if !project.tags.is_empty() {
        right_parts.push(project.tags.join(", "));
    }
    if let Some(label) = deadline_label(project.deadline, project.is_deadline_approaching(today)) {
        right_parts.push(label);
    }

    print_aligned(
        styled_left,
        left_plain.chars().count(),
        &right_parts.join("  ·  "),
    );
}

fn priority_glyph(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "▲".red(),
        Priority::Medium => "●".yellow(),
        Priority::Low => "▽".green(),
    }
}

fn render_task_line(task: &Task, column: Column, today: Date) {
    let glyph = priority_glyph(task.priority);
    let left_plain = format!("  {}  {}  {}", short_id(&task.id), " ", task.title);
    let left = format!("  {}  {}  {}", short_id(&task.id), glyph, task.title);

    let styled_left = if column == Column::Done {
        left.dimmed()
    } else {
        left.normal()
    };

    let mut right_parts = vec![task.assignee.initials.clone()];
    if !task.tags.is_empty() {
        right_parts.push(task.tags.join(", "));
    }
    if let Some(label) = deadline_label(task.deadline, task.is_deadline_approaching(today)) {
        right_parts.push(label);
    }

    print_aligned(
        styled_left,
        left_plain.chars().count(),
        &right_parts.join("  ·  "),
    );
}

/// Render the three columns of a board
pub fn render_board(project: &Project, board: &Board, today: Date) {
    let summary = board.aggregate();
    println!(
        "\n  {}  {} {}% ({}/{} done)",
        project.title.cyan().bold(),
        progress_bar(summary.progress_percentage),
        summary.progress_percentage,
        summary.completed_tasks,
        summary.total_tasks
    );
    if !project.description.is_empty() {
        println!("  {}", project.description.dimmed());
    }

    let members: Vec<_> = project
        .members
        .iter()
        .map(|m| format!("{} ({})", m.name, m.role))
        .collect();
    println!("  {} {}", "Team:".dimmed(), members.join(", "));

    for column in Column::ALL {
        let tasks = board.column(column);
        render_section_header(&format!("{} ({})", column.title(), tasks.len()));
        if tasks.is_empty() {
            println!("  {}", "—".dimmed());
        }
        for task in tasks {
            render_task_line(task, column, today);
        }
    }
    println!();
}

/// Render the completed works showcase
pub fn render_completed(records: &[CompletedProject], stats: ShowcaseStats) {
    println!(
        "\n  {} ({} projects completed, {} tasks delivered)\n",
        "COMPLETED WORK".cyan().bold(),
        stats.projects_completed,
        stats.tasks_delivered
    );

    for record in records {
        let left_plain = format!(
            "  ✓  {}  {}",
            short_id(&record.project.id),
            record.project.title
        );
        let mut right_parts = vec![format!("{} tasks", record.project.task_count())];
        if let Some(days) = record.duration_days() {
            let unit = if days == 1 { "day" } else { "days" };
            right_parts.push(format!("{days} {unit}"));
        }
        right_parts.push(format_completion_date(record.sort_key()));
        let right = right_parts.join("  ·  ");
        print_aligned(left_plain.green(), left_plain.chars().count(), &right);
    }
    println!();
}

/// Format a completion date for display (e.g., "Feb 15", "Today", "Yesterday")
fn format_completion_date(timestamp: jiff::Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    let date = zoned.date();
    let today = jiff::Zoned::now().date();

    if date == today {
        "Today".to_string()
    } else if today.yesterday().is_ok_and(|yesterday| yesterday == date) {
        "Yesterday".to_string()
    } else {
        date.strftime("%b %d, %Y").to_string()
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let noun = if count == 1 { "project" } else { "projects" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, noun);
}

/// Render a section header (e.g., "To Do", "Done")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}
