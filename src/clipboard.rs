use anyhow::{Context, Result};
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;

/// Hidden argument that turns the process into a clipboard owner (Linux).
pub const DAEMON_FLAG: &str = "__scopeyank_clipboard_daemon";

/// On X11/Wayland the clipboard empties when its owner exits, so a detached
/// child keeps the yanked paths alive.
#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;

    let mut clipboard = Clipboard::new()?;
    // Blocks until another program takes ownership of the selection.
    clipboard.set().wait().text(text)?;
    Ok(())
}

/// Runs the daemon if the flag is present. Returns Ok(true) when it did.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if !std::env::args().any(|a| a == DAEMON_FLAG) {
        return Ok(false);
    }
    #[cfg(target_os = "linux")]
    {
        run_daemon_mode()?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        tracing::warn!("{} used on a non-Linux system; ignoring", DAEMON_FLAG);
    }
    Ok(true)
}

pub fn copy_text_to_clipboard(text: &str) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
        clipboard.set_text(text.to_string())?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("failed to start clipboard daemon")?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to get stdin for clipboard daemon"))?;
        stdin.write_all(text.as_bytes())?;
        stdin.flush()?;
    }
    Ok(())
}
