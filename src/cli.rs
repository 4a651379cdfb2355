use crate::scope::PermissionMask;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Text,
    /// ASCII tree of the paths
    Tree,
    /// Role request with permission scopes
    Json,
}

/// scopeyank – tick folders in a tree and yank the minimal covering paths
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory served as `/` (defaults to CWD)
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Preselected folder, e.g. `/docs/2024`. Can be repeated.
    #[arg(long, value_name = "PATH")]
    pub select: Vec<String>,

    /// Restrict the tree to these roots. Can be repeated.
    #[arg(long, value_name = "PATH")]
    pub scope: Vec<String>,

    /// Base path for listings made without forcing the root
    #[arg(long, value_name = "PATH")]
    pub base: Option<String>,

    /// Pick one folder by navigation instead of ticking several
    #[arg(long)]
    pub single: bool,

    /// Optimize the --select paths and exit without the TUI
    #[arg(long)]
    pub headless: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Comma-separated permission names granted on every scope (json output)
    #[arg(long, value_name = "LIST")]
    pub permissions: Option<PermissionMask>,

    /// Role name (json output)
    #[arg(long, value_name = "NAME", default_value = "")]
    pub role_name: String,

    /// Credential sent with every listing
    #[arg(long, value_name = "SECRET")]
    pub password: Option<String>,

    /// Require this credential from listings of DIR
    #[arg(long, value_name = "SECRET")]
    pub require_password: Option<String>,

    /// Hide dot-folders
    #[arg(long)]
    pub hide_hidden: bool,

    /// Skip folders ignored by .gitignore
    #[arg(long)]
    pub respect_ignore: bool,

    /// Resolve listings below --base instead of DIR
    #[arg(long)]
    pub no_force_root: bool,

    /// Print the result instead of copying it to the clipboard
    #[arg(long)]
    pub dry_run: bool,

    /// Config file (defaults to <config dir>/scopeyank/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_selects_and_permissions() {
        let cli = Cli::try_parse_from([
            "scopeyank",
            "/srv/files",
            "--select",
            "/docs/a",
            "--select",
            "/docs/b",
            "--headless",
            "--format",
            "json",
            "--permissions",
            "write,delete",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/files"));
        assert_eq!(cli.select, vec!["/docs/a", "/docs/b"]);
        assert!(cli.headless);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.permissions.map(|p| p.bits()), Some((1 << 3) | (1 << 7)));
    }

    #[test]
    fn rejects_unknown_permission() {
        let parsed = Cli::try_parse_from(["scopeyank", "--permissions", "fly"]);
        assert!(parsed.is_err());
    }
}
