use rollcall_core::clipboard::{Clipboard, ClipboardError};
use std::env;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Clipboard for CommandClipboard {
    fn backend_name(&self) -> &str {
        &self.program
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ClipboardError::Unavailable(format!(
                    "{} not found",
                    self.program
                )));
            }
            Err(err) => return Err(ClipboardError::Io(err)),
        };

        if let Some(mut stdin) = child.stdin.take() {
            // Tools that exit early close the pipe; the exit status is checked below.
            if let Err(err) = stdin.write_all(text.as_bytes()) {
                if err.kind() != ErrorKind::BrokenPipe {
                    return Err(ClipboardError::Io(err));
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("{} exited with status {}", self.program, output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(ClipboardError::Rejected(message));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<CommandClipboard>,
    used: Option<String>,
}

impl SystemClipboard {
    pub fn detect() -> Self {
        Self::with_candidates(platform_candidates())
    }

    pub fn with_candidates(candidates: Vec<CommandClipboard>) -> Self {
        Self {
            candidates,
            used: None,
        }
    }

    pub fn candidates(&self) -> &[CommandClipboard] {
        &self.candidates
    }
}

impl Clipboard for SystemClipboard {
    fn backend_name(&self) -> &str {
        self.used.as_deref().unwrap_or("system")
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut last = None;
        for candidate in &mut self.candidates {
            match candidate.write_text(text) {
                Ok(()) => {
                    self.used = Some(candidate.program().to_string());
                    return Ok(());
                }
                Err(ClipboardError::Unavailable(reason)) => {
                    debug!(program = candidate.program(), %reason, "clipboard tool missing");
                    last = Some(ClipboardError::Unavailable(reason));
                }
                Err(err) => {
                    debug!(program = candidate.program(), error = %err, "clipboard tool failed");
                    last = Some(err);
                }
            }
        }
        Err(last.unwrap_or_else(|| {
            ClipboardError::Unavailable("no clipboard tool for this platform".to_string())
        }))
    }
}

fn platform_candidates() -> Vec<CommandClipboard> {
    if cfg!(target_os = "macos") {
        return vec![CommandClipboard::new("pbcopy", Vec::new())];
    }
    if cfg!(windows) {
        return vec![CommandClipboard::new("clip", Vec::new())];
    }

    let mut candidates = Vec::new();
    if env::var_os("WAYLAND_DISPLAY").is_some() {
        candidates.push(CommandClipboard::new("wl-copy", Vec::new()));
    }
    candidates.push(CommandClipboard::new(
        "xclip",
        vec!["-selection".to_string(), "clipboard".to_string()],
    ));
    candidates.push(CommandClipboard::new(
        "xsel",
        vec!["--clipboard".to_string(), "--input".to_string()],
    ));
    candidates
}

#[cfg(all(test, unix))]
mod tests {
    use super::{CommandClipboard, SystemClipboard};
    use rollcall_core::clipboard::{Clipboard, ClipboardError};
    use std::fs;
    use tempfile::TempDir;

    fn writer_into(path: &std::path::Path) -> CommandClipboard {
        CommandClipboard::new(
            "sh",
            vec!["-c".to_string(), format!("cat > '{}'", path.display())],
        )
    }

    #[test]
    fn command_clipboard_pipes_payload() {
        let temp = TempDir::new().expect("tempdir");
        let out = temp.path().join("clip.txt");
        let mut clipboard = writer_into(&out);
        clipboard.write_text("+1 555\n+44 20").expect("write");
        assert_eq!(fs::read_to_string(&out).expect("read"), "+1 555\n+44 20");
    }

    #[test]
    fn missing_program_is_unavailable() {
        let mut clipboard = CommandClipboard::new("rollcall-no-such-clipboard-tool", Vec::new());
        let err = clipboard.write_text("x").unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }

    #[test]
    fn failing_program_is_rejected() {
        let mut clipboard = CommandClipboard::new("false", Vec::new());
        let err = clipboard.write_text("x").unwrap_err();
        assert!(matches!(err, ClipboardError::Rejected(_)));
    }

    #[test]
    fn system_clipboard_falls_through_to_working_tool() {
        let temp = TempDir::new().expect("tempdir");
        let out = temp.path().join("clip.txt");
        let mut clipboard = SystemClipboard::with_candidates(vec![
            CommandClipboard::new("rollcall-no-such-clipboard-tool", Vec::new()),
            writer_into(&out),
        ]);
        clipboard.write_text("+33 123 456 789").expect("write");
        assert_eq!(clipboard.backend_name(), "sh");
        assert_eq!(fs::read_to_string(&out).expect("read"), "+33 123 456 789");
    }

    #[test]
    fn system_clipboard_without_candidates_is_unavailable() {
        let mut clipboard = SystemClipboard::with_candidates(Vec::new());
        let err = clipboard.write_text("x").unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }

    #[test]
    fn from_argv_rejects_empty() {
        assert!(CommandClipboard::from_argv(&[]).is_none());
        let clip = CommandClipboard::from_argv(&["pbcopy".to_string()]).expect("argv");
        assert_eq!(clip.program(), "pbcopy");
    }
}
