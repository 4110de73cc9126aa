use std::io;

use chat_resume::logging::init_logging;
use chat_resume_cli::{run, CliConfig};

fn main() -> io::Result<()> {
    let config = CliConfig::from_env();
    init_logging(&config.env).map_err(io::Error::other)?;

    let cwd = std::env::current_dir()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run(&config, &cwd, &mut out).map_err(io::Error::other)?;

    tracing::info!(
        chat_id = %summary.chat_id,
        session = %summary.session_path.display(),
        resumed = summary.resumed,
        persisted = summary.persisted,
        history_len = summary.history_len,
        "chat session settled"
    );
    Ok(())
}
