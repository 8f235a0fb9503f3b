use std::error::Error;

use crate::core::app::{App, Command, CommandOutcome, TaskRefresh};
use crate::ui::renderer::render_task_refresh;

pub async fn run_task_list(mut app: App) -> Result<(), Box<dyn Error>> {
    match app.dispatch(Command::RefreshTasks).await {
        CommandOutcome::Tasks(refresh @ TaskRefresh::Loaded(_)) => {
            println!("{}", render_task_refresh(&refresh));
            Ok(())
        }
        CommandOutcome::Tasks(refresh @ TaskRefresh::Failed(_)) => {
            eprintln!("{}", render_task_refresh(&refresh));
            std::process::exit(1);
        }
        other => Err(format!("unexpected outcome for a task listing: {other:?}").into()),
    }
}
