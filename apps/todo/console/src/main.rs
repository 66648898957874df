//! Interactive console for the todo services.
//!
//! **Deprecated**: superseded by the HTTP API (`todo_api`). Kept as a thin
//! client over the two services for quick local experiments; it runs
//! against the in-memory repository, so nothing it does is persisted.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use core_config::limits::LimitsConfig;
use core_config::{Environment, FromEnv};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_todo::{
    CreateProject, CreateTask, InMemoryRepository, Project, ProjectService, Task, TaskService,
    TodoError, UpdateProject, UpdateTask,
};
use uuid::Uuid;

type ConsoleProjectService = ProjectService<InMemoryRepository>;
type ConsoleTaskService = TaskService<InMemoryRepository, InMemoryRepository>;

fn print_project(project: &Project) {
    println!(
        "ID: {}, Name: {}, Description: {}, Created: {}",
        project.id,
        project.name,
        project.description.as_deref().unwrap_or("None"),
        project.created_at.format("%Y-%m-%d %H:%M:%S")
    );
}

fn print_task(task: &Task) {
    let deadline = task
        .deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "None".to_string());
    println!(
        "ID: {}, Title: {}, Status: {}, Deadline: {}, Description: {}, Created: {}",
        task.id,
        task.title,
        task.status,
        deadline,
        task.description.as_deref().unwrap_or("None"),
        task.created_at.format("%Y-%m-%d %H:%M:%S")
    );
}

/// Read a line of input, returning None for a blank optional field
fn get_input(prompt: &str, optional: bool) -> eyre::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        // EOF behaves like choosing Exit
        std::process::exit(0);
    }

    let value = line.trim();
    if value.is_empty() {
        if optional {
            return Ok(None);
        }
        eyre::bail!("{} is required", prompt.trim());
    }
    Ok(Some(value.to_string()))
}

fn get_required(prompt: &str) -> eyre::Result<String> {
    Ok(get_input(prompt, false)?.unwrap_or_default())
}

fn get_uuid(prompt: &str) -> eyre::Result<Uuid> {
    let raw = get_required(prompt)?;
    Uuid::from_str(&raw).map_err(|_| eyre::eyre!("Invalid ID '{}'", raw))
}

struct Console {
    project_service: ConsoleProjectService,
    task_service: ConsoleTaskService,
}

impl Console {
    async fn dispatch(&self, choice: &str) -> eyre::Result<()> {
        match choice {
            // Create project
            "1" => {
                let name = get_required("Project name: ")?;
                let description = get_input("Project description (optional): ", true)?;
                let project = self
                    .project_service
                    .create_project(CreateProject { name, description })
                    .await?;
                println!("Project created:");
                print_project(&project);
            }

            // Edit project
            "2" => {
                let id = get_uuid("Project ID: ")?;
                let name = get_input("New name (blank to skip): ", true)?;
                let description = get_input("New description (blank to skip): ", true)?;
                if name.is_none() && description.is_none() {
                    println!("No changes made.");
                    return Ok(());
                }
                let project = self
                    .project_service
                    .edit_project(id, UpdateProject { name, description })
                    .await?;
                println!("Project updated:");
                print_project(&project);
            }

            // Delete project
            "3" => {
                let id = get_uuid("Project ID: ")?;
                self.project_service.delete_project(id).await?;
                println!("Project deleted successfully.");
            }

            // List projects
            "4" => {
                let projects = self.project_service.list_projects().await?;
                if projects.is_empty() {
                    println!("No projects exist.");
                    return Ok(());
                }
                for project in &projects {
                    print_project(project);
                }
            }

            // Create task
            "5" => {
                let project_id = get_uuid("Project ID: ")?;
                let title = get_required("Task title: ")?;
                let description = get_input("Task description (optional): ", true)?;
                let status = get_input("Status (todo/doing/done, default todo): ", true)?;
                let deadline = get_input("Deadline (YYYY-MM-DD, blank for none): ", true)?;
                let task = self
                    .task_service
                    .create_task(
                        project_id,
                        CreateTask {
                            title,
                            description,
                            status,
                            deadline,
                        },
                    )
                    .await?;
                println!("Task created:");
                print_task(&task);
            }

            // Change task status
            "6" => {
                let project_id = get_uuid("Project ID: ")?;
                let task_id = get_uuid("Task ID: ")?;
                let status = get_required("New status (todo/doing/done): ")?;
                let task = self
                    .task_service
                    .change_task_status(project_id, task_id, &status)
                    .await?;
                println!("Task status updated:");
                print_task(&task);
            }

            // Edit task
            "7" => {
                let project_id = get_uuid("Project ID: ")?;
                let task_id = get_uuid("Task ID: ")?;
                let title = get_input("New title (blank to skip): ", true)?;
                let description = get_input("New description (blank to skip): ", true)?;
                let status = get_input("New status (todo/doing/done, blank to skip): ", true)?;
                let deadline = get_input("New deadline (YYYY-MM-DD, blank to skip): ", true)?;
                if title.is_none() && description.is_none() && status.is_none() && deadline.is_none()
                {
                    println!("No changes made.");
                    return Ok(());
                }
                let task = self
                    .task_service
                    .edit_task(
                        project_id,
                        task_id,
                        UpdateTask {
                            title,
                            description,
                            status,
                            deadline,
                        },
                    )
                    .await?;
                println!("Task updated:");
                print_task(&task);
            }

            // Delete task
            "8" => {
                let project_id = get_uuid("Project ID: ")?;
                let task_id = get_uuid("Task ID: ")?;
                self.task_service.delete_task(project_id, task_id).await?;
                println!("Task deleted successfully.");
            }

            // List tasks in project
            "9" => {
                let project_id = get_uuid("Project ID: ")?;
                let tasks = self.task_service.list_tasks(project_id).await?;
                if tasks.is_empty() {
                    println!("No tasks in this project.");
                    return Ok(());
                }
                for task in &tasks {
                    print_task(task);
                }
            }

            _ => println!("Invalid choice. Try again."),
        }

        Ok(())
    }

    async fn run(&self) -> eyre::Result<()> {
        loop {
            println!();
            println!("To-Do List Menu:");
            println!("1. Create Project");
            println!("2. Edit Project");
            println!("3. Delete Project");
            println!("4. List Projects");
            println!("5. Create Task");
            println!("6. Change Task Status");
            println!("7. Edit Task");
            println!("8. Delete Task");
            println!("9. List Tasks in Project");
            println!("10. Exit");

            let choice = get_required("Enter choice: ")?;
            if choice == "10" {
                return Ok(());
            }

            if let Err(e) = self.dispatch(&choice).await {
                match e.downcast_ref::<TodoError>() {
                    Some(domain_error) => println!("Error: {}", domain_error),
                    None => println!("Invalid input: {}", e),
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let limits = LimitsConfig::from_env()?;
    let store = InMemoryRepository::new();

    let console = Console {
        project_service: ProjectService::new(store.clone(), limits),
        task_service: TaskService::new(store.clone(), store, limits),
    };

    console.run().await
}
