//! Frontend dev server launcher for local development.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// Command used to start the frontend dev server.
pub const FRONTEND_DEV_COMMAND: (&str, &[&str]) = ("npm", &["run", "dev"]);

/// Starts `program args` in `dir` on a background thread.
///
/// Best effort: spawn failures and non-zero exits are logged, never
/// propagated. The thread ends when the child process exits.
///
/// # Errors
/// Returns error only if the thread itself cannot be created.
pub fn spawn_in_background(
    program: &str,
    args: &[&str],
    dir: &Path,
) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let program = program.to_string();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let dir: PathBuf = dir.to_path_buf();

    thread::Builder::new()
        .name("frontend-dev".to_string())
        .spawn(move || {
            info!(%program, ?args, dir = %dir.display(), "Starting frontend development server");
            match Command::new(&program).args(&args).current_dir(&dir).status() {
                Ok(status) if status.success() => {
                    info!("Frontend development server exited");
                    Some(status)
                }
                Ok(status) => {
                    warn!(%status, "Frontend development server exited with failure");
                    Some(status)
                }
                Err(e) => {
                    error!("Failed to start frontend development server: {}", e);
                    None
                }
            }
        })
}

/// Starts the frontend dev server (`npm run dev`) in `dir`.
///
/// # Errors
/// Returns error only if the thread cannot be created.
pub fn spawn_frontend(dir: &Path) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let (program, args) = FRONTEND_DEV_COMMAND;
    spawn_in_background(program, args, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_logged_not_fatal() {
        let handle = spawn_in_background(
            "vesselhire-definitely-not-a-real-program",
            &[],
            Path::new("."),
        )
        .expect("thread spawns");

        assert!(handle.join().expect("thread completes").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_reported() {
        let handle = spawn_in_background("true", &[], Path::new(".")).expect("thread spawns");
        let status = handle.join().expect("thread completes");
        assert!(status.is_some_and(|s| s.success()));
    }
}
