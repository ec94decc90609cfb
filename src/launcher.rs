// ABOUTME: Executes dock entry actions: detached process launches and URLs via the default handler
// ABOUTME: Failures are logged and swallowed so a bad entry never takes the dock down

use crate::entries::Action;
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Side-effecting half of a click. The dock only talks to this trait so the
/// click path can be exercised without spawning anything.
pub trait ActionRunner {
    fn launch_process(&self, command: &str) -> Result<()>;
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Runs actions against the real OS.
pub struct SystemRunner;

impl ActionRunner for SystemRunner {
    fn launch_process(&self, command: &str) -> Result<()> {
        let (program, mut child) = build_command(command)?;

        // Fire and forget: the child is never waited on
        child
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch '{program}'"))?;

        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            anyhow::bail!("Empty URL");
        }
        open::that_detached(url).with_context(|| format!("Failed to open '{url}'"))
    }
}

/// Splits `command` with shell-word rules and runs it directly, without a shell.
#[cfg(not(windows))]
fn build_command(command: &str) -> Result<(String, Command)> {
    let argv = shell_words::split(command)
        .with_context(|| format!("Invalid command line: {command}"))?;
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("Empty command line"))?;

    // Prefer the PATH-resolved binary so the error names the real cause
    let program_path = which::which(program).unwrap_or_else(|_| PathBuf::from(program));
    tracing::debug!("Spawning {} with args {:?}", program_path.display(), args);

    let mut child = Command::new(&program_path);
    child.args(args);
    Ok((program.clone(), child))
}

/// Windows reads its own command lines: only the program is split off and
/// the arguments reach the child exactly as written.
#[cfg(windows)]
fn build_command(command: &str) -> Result<(String, Command)> {
    use std::os::windows::process::CommandExt;
    use std::path::Path;

    let (program, args) = split_program(command, |candidate| Path::new(candidate).is_file())
        .ok_or_else(|| anyhow!("Empty command line"))?;

    let program_path = which::which(program).unwrap_or_else(|_| PathBuf::from(program));
    tracing::debug!("Spawning {} with args {}", program_path.display(), args);

    let mut child = Command::new(&program_path);
    if !args.is_empty() {
        child.raw_arg(args);
    }
    Ok((program.to_string(), child))
}

/// Separates the program from its arguments the way CreateProcess does. A
/// quoted first token is the program. Unquoted, each whitespace boundary is
/// tried in turn and the first prefix naming an existing file (with or
/// without `.exe`) wins, so `C:\Program Files\App\app.exe` needs no quotes.
/// Otherwise the first token is the program and is looked up on PATH.
#[cfg(any(windows, test))]
fn split_program(command: &str, exists: impl Fn(&str) -> bool) -> Option<(&str, &str)> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }

    if let Some(quoted) = command.strip_prefix('"') {
        let end = quoted.find('"').unwrap_or(quoted.len());
        let rest = quoted.get(end + 1..).unwrap_or("");
        return Some((&quoted[..end], rest.trim_start()));
    }

    let boundaries = command
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .chain(std::iter::once(command.len()));

    let mut first_token = None;
    for end in boundaries {
        let candidate = &command[..end];
        first_token.get_or_insert(end);
        if exists(candidate) || exists(&format!("{candidate}.exe")) {
            return Some((candidate, command[end..].trim_start()));
        }
    }

    let end = first_token.unwrap_or(command.len());
    Some((&command[..end], command[end..].trim_start()))
}

/// Runs `action`. Errors are logged once at error level and never returned.
pub fn dispatch(action: &Action, runner: &dyn ActionRunner) {
    match action {
        Action::LaunchProcess { command } => {
            tracing::debug!("Launching: {}", command);
            if let Err(e) = runner.launch_process(command) {
                tracing::error!("Error executing: {:#}", e);
            }
        }
        Action::OpenUrl { url } => {
            tracing::debug!("Opening URL: {}", url);
            if let Err(e) = runner.open_url(url) {
                tracing::error!("Error opening website: {:#}", e);
            }
        }
        Action::None => {}
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Invocation, RecordingRunner};
    use super::*;
    use crate::logging::capture_logs;

    #[test]
    fn test_dispatch_launch_uses_exact_command() {
        let runner = RecordingRunner::default();
        dispatch(
            &Action::LaunchProcess { command: "firefox --private-window".to_string() },
            &runner,
        );

        assert_eq!(
            runner.calls(),
            vec![Invocation::Launch("firefox --private-window".to_string())]
        );
    }

    #[test]
    fn test_dispatch_open_url_uses_exact_url() {
        let runner = RecordingRunner::default();
        dispatch(&Action::OpenUrl { url: "https://example.com".to_string() }, &runner);

        assert_eq!(runner.calls(), vec![Invocation::Open("https://example.com".to_string())]);
    }

    #[test]
    fn test_dispatch_none_does_nothing() {
        let runner = RecordingRunner::default();
        let logs = capture_logs(|| dispatch(&Action::None, &runner));

        assert!(runner.calls().is_empty());
        assert!(logs.is_empty());
    }

    #[test]
    fn test_launch_failure_logs_one_error() {
        let runner = RecordingRunner::failing();
        let logs = capture_logs(|| {
            dispatch(&Action::LaunchProcess { command: "no-such-app".to_string() }, &runner)
        });

        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - ERROR - Error executing: "));
        assert!(lines[0].contains("No such file or directory"));
    }

    #[test]
    fn test_open_url_failure_logs_one_error() {
        let runner = RecordingRunner::failing();
        let logs = capture_logs(|| {
            dispatch(&Action::OpenUrl { url: "https://example.com".to_string() }, &runner)
        });

        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - ERROR - Error opening website: "));
        assert!(lines[0].contains("no URL handler registered"));
    }

    #[test]
    fn test_system_runner_rejects_empty_command() {
        let result = SystemRunner.launch_process("   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty command line"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_system_runner_rejects_unbalanced_quotes() {
        let result = SystemRunner.launch_process("firefox \"unterminated");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid command line"));
    }

    #[test]
    fn test_system_runner_reports_missing_program() {
        let result = SystemRunner.launch_process("berth-definitely-not-installed --flag");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to launch 'berth-definitely-not-installed'")
        );
    }

    #[test]
    fn test_system_runner_rejects_empty_url() {
        assert!(SystemRunner.open_url("").is_err());
    }

    #[test]
    fn test_split_program_keeps_backslash_paths() {
        let split = split_program(r"C:\Windows\notepad.exe", |_| false);
        assert_eq!(split, Some((r"C:\Windows\notepad.exe", "")));

        let split = split_program(r"C:\Windows\notepad.exe C:\notes\todo.txt", |_| false);
        assert_eq!(split, Some((r"C:\Windows\notepad.exe", r"C:\notes\todo.txt")));
    }

    #[test]
    fn test_split_program_quoted_path_with_spaces() {
        let command = r#""C:\Program Files\Mozilla Firefox\firefox.exe" --private-window"#;

        assert_eq!(
            split_program(command, |_| false),
            Some((r"C:\Program Files\Mozilla Firefox\firefox.exe", "--private-window"))
        );
    }

    #[test]
    fn test_split_program_unquoted_path_with_spaces() {
        let firefox = r"C:\Program Files\Mozilla Firefox\firefox.exe";
        let command = format!("{firefox} -P work");

        assert_eq!(split_program(&command, |c| c == firefox), Some((firefox, "-P work")));
    }

    #[test]
    fn test_split_program_tries_exe_suffix() {
        let split = split_program(r"C:\Tools\My App\run --fast", |c| {
            c == r"C:\Tools\My App\run.exe"
        });

        assert_eq!(split, Some((r"C:\Tools\My App\run", "--fast")));
    }

    #[test]
    fn test_split_program_passes_arguments_verbatim() {
        let split = split_program(r#"app.exe "a b"  c\d"#, |_| false);
        assert_eq!(split, Some(("app.exe", r#""a b"  c\d"#)));
    }

    #[test]
    fn test_split_program_empty_command() {
        assert_eq!(split_program("   ", |_| true), None);
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_command_keeps_backslashes() {
        let (program, child) = build_command(r"C:\Windows\notepad.exe").unwrap();

        assert_eq!(program, r"C:\Windows\notepad.exe");
        assert!(child.get_program().to_string_lossy().contains('\\'));
    }
}
