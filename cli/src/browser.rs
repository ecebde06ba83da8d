//! Opening generated pages in a web browser

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread::JoinHandle;

/// `file://` URL of an existing file
pub fn file_url(path: &Path) -> Result<String> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("cannot resolve '{}'", path.display()))?;
    Ok(format!("file://{}", absolute.display()))
}

/// Build the command that opens `url`.
///
/// `template` is a command line where `%s` stands for the URL, e.g.
/// `firefox --new-tab %s`; without `%s` the URL is appended. Without a
/// template the platform's default opener is used.
pub fn open_command(url: &str, template: Option<&str>) -> Result<Command> {
    let Some(template) = template else {
        return Ok(default_opener(url));
    };

    let mut parts = template.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("browser command is empty");
    };

    let mut command = Command::new(program);
    let mut substituted = false;
    for part in parts {
        if part.contains("%s") {
            command.arg(part.replace("%s", url));
            substituted = true;
        } else {
            command.arg(part);
        }
    }
    if !substituted {
        command.arg(url);
    }
    Ok(command)
}

#[cfg(target_os = "macos")]
fn default_opener(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn default_opener(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_opener(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

/// Start `command` and reap it on a background thread once it exits
fn spawn_detached(mut command: Command) -> Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to launch {:?}", command.get_program()))?;
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            log::warn!("browser process: {}", e);
            None
        }
    }))
}

/// Open `path` in a browser without waiting for it
pub fn open(path: &Path, template: Option<&str>) -> Result<()> {
    let url = file_url(path)?;
    let command = open_command(&url, template)?;
    spawn_detached(command).with_context(|| format!("cannot open {}", url))?;
    Ok(())
}
