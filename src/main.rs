use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use jiff::civil::Date;
use uuid::Uuid;

use crewboard::{
    models::{board::Column, store::Store, task::Priority},
    services::{
        archive::{list_completed, showcase_stats},
        members::{AddMemberParameters, add_member},
        projects::{
            CreateProjectParameters, ProjectPatch, create_project, delete_project, update_project,
        },
        search::{ResolveError, list_projects, resolve_project},
        tasks::{
            CreateTaskParameters, TaskMutationResult, create_task, delete_task, move_task,
            resolve_task,
        },
    },
    storage::{json::JsonFileStorage, load_store},
};

mod config;
mod ui;

#[derive(Parser)]
#[command(
    name = "crewboard",
    about = "Projects, three-column task boards and a showcase of finished work"
)]
struct Cli {
    /// Directory holding the dashboard state
    #[arg(long, global = true, env = "CREWBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage tasks on a project board
    #[command(subcommand)]
    Task(TaskCommands),

    /// Manage project members
    #[command(subcommand)]
    Member(MemberCommands),

    /// Show completed projects, most recent first
    Work,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a new project
    New {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Comma separated tags
        #[arg(short, long, default_value = "")]
        tags: String,

        /// Deadline (e.g., "2026-03-01")
        #[arg(long)]
        deadline: Option<Date>,
    },
    /// List projects, optionally filtered by title or tag
    List { query: Option<String> },
    /// Show a project's board
    Show { project: String },
    /// Change a project's details
    Update {
        project: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Comma separated tags, replacing the current ones
        #[arg(short, long)]
        tags: Option<String>,

        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<Date>,

        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,
    },
    /// Delete a project and its board
    Delete { project: String },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task to the project's To Do column
    Add {
        project: String,
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Comma separated tags
        #[arg(short, long, default_value = "")]
        tags: String,

        /// low, medium or high
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Member id to assign the task to
        #[arg(short, long)]
        assignee: Option<String>,

        #[arg(long)]
        deadline: Option<Date>,
    },
    /// Move a task to another column (todo, in-progress, done)
    Move {
        project: String,
        task: String,
        to: Column,
    },
    /// Delete a task
    Delete { project: String, task: String },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Invite a member by email
    Add {
        project: String,
        email: String,
        role: String,
    },
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(1);
}

fn project_id(store: &Store, query: &str) -> Uuid {
    match resolve_project(store, query) {
        Ok(project) => project.id,
        Err(ResolveError::NotFound(query)) => {
            let titles: Vec<_> = store.projects().iter().map(|p| p.title.as_str()).collect();
            if titles.is_empty() {
                fail(format!("Project '{query}' not found. No projects exist yet."));
            }
            fail(format!(
                "Project '{query}' not found. Available projects: {}",
                titles.join(", ")
            ));
        }
        Err(e) => fail(e),
    }
}

fn report_task_change(verb: &str, result: &TaskMutationResult) {
    println!("✓ Task {}: {} ({})", verb, result.task.title, result.column);
    println!(
        "  Progress: {}% ({}/{} done)",
        result.summary.progress_percentage,
        result.summary.completed_tasks,
        result.summary.total_tasks
    );
    if let Some(record) = &result.archived {
        println!(
            "{}",
            format!("★ {} is complete and joins the showcase", record.project.title).green()
        );
    }
}

fn render_projects(store: &Store, query: &str, today: Date) {
    let projects = list_projects(store, query);
    if projects.is_empty() {
        println!("No projects found");
        return;
    }
    ui::render_view_header("PROJECTS", projects.len());
    for project in projects {
        ui::render_project_line(project, today);
    }
    println!();
}

fn main() {
    let cli = Cli::parse();
    config::init_logging();

    let data_dir = config::data_dir(cli.data_dir);
    let storage = JsonFileStorage::new(data_dir);
    let mut store = load_store(&storage);
    let today = jiff::Zoned::now().date();

    match cli.command {
        Some(Commands::Project(ProjectCommands::New {
            title,
            description,
            tags,
            deadline,
        })) => {
            let params = CreateProjectParameters {
                title,
                description,
                tags,
                deadline,
            };
            match create_project(&mut store, &storage, params) {
                Ok(project) => {
                    println!("✓ Project created: {}", project.title);
                    println!("  id {}", project.id);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Project(ProjectCommands::List { query })) => {
            render_projects(&store, &query.unwrap_or_default(), today);
        }
        None => render_projects(&store, "", today),
        Some(Commands::Project(ProjectCommands::Show { project })) => {
            let id = project_id(&store, &project);
            match (store.project(id), store.board(id)) {
                (Some(project), Some(board)) => ui::render_board(project, board, today),
                _ => fail(format!("Project '{project}' not found")),
            }
        }
        Some(Commands::Project(ProjectCommands::Update {
            project,
            title,
            description,
            tags,
            deadline,
            clear_deadline,
        })) => {
            let id = project_id(&store, &project);
            let patch = ProjectPatch {
                title,
                description,
                tags,
                deadline: if clear_deadline {
                    Some(None)
                } else {
                    deadline.map(Some)
                },
            };
            match update_project(&mut store, &storage, id, patch) {
                Ok(project) => println!("✓ Project updated: {}", project.title),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Project(ProjectCommands::Delete { project })) => {
            let id = project_id(&store, &project);
            match delete_project(&mut store, &storage, id) {
                Ok(result) => {
                    println!("✓ Project deleted: {}", result.project.title);
                    if result.removed_tasks_count > 0 {
                        println!("  └─ {} task(s) also deleted", result.removed_tasks_count);
                    }
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Task(TaskCommands::Add {
            project,
            title,
            description,
            tags,
            priority,
            assignee,
            deadline,
        })) => {
            let id = project_id(&store, &project);
            let params = CreateTaskParameters {
                title,
                description,
                tags,
                priority,
                assignee_id: assignee,
                deadline,
            };
            match create_task(&mut store, &storage, id, params) {
                Ok(result) => report_task_change("added", &result),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Task(TaskCommands::Move { project, task, to })) => {
            let id = project_id(&store, &project);
            let Some(board) = store.board(id) else {
                fail(format!("Project '{project}' not found"));
            };
            let (task_id, from) = match resolve_task(board, &task) {
                Ok(found) => match board.find(found.id) {
                    Some((column, _)) => (found.id, column),
                    None => fail(format!("Task '{task}' not found")),
                },
                Err(e) => fail(e),
            };

            match move_task(&mut store, &storage, id, task_id, from, to) {
                Ok(result) if from == to => {
                    println!("Task '{}' is already in {}", result.task.title, to);
                }
                Ok(result) => report_task_change("moved", &result),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Task(TaskCommands::Delete { project, task })) => {
            let id = project_id(&store, &project);
            let Some(board) = store.board(id) else {
                fail(format!("Project '{project}' not found"));
            };
            let task_id = match resolve_task(board, &task) {
                Ok(found) => found.id,
                Err(e) => fail(e),
            };

            match delete_task(&mut store, &storage, id, task_id) {
                Ok(Some(result)) => report_task_change("deleted", &result),
                Ok(None) => println!("Nothing to delete"),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Member(MemberCommands::Add {
            project,
            email,
            role,
        })) => {
            let id = project_id(&store, &project);
            let params = AddMemberParameters { email, role };
            match add_member(&mut store, &storage, id, params) {
                Ok(member) => {
                    println!("✓ Invited {} as {}", member.email, member.role);
                    println!("  member id {}", member.id);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Work) => {
            let records = list_completed(&store);
            if records.is_empty() {
                println!("No completed projects yet. Complete your first project to see it here.");
            } else {
                ui::render_completed(&records, showcase_stats(&records));
            }
        }
    }
}
