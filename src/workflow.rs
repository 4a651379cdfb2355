use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::lister::{DirectoryLister, LocalLister};
use crate::scope::{RoleRequest, build_permission_scopes};
use crate::selection::{PathSegments, SelectionSet};
use crate::tree::{SelectMode, TreeOptions, TreeSession};
use crate::{clipboard, tree_builder, tui};
use anyhow::{Context, Result};

const NOTHING_SELECTED: &str = "(no folders selected)";

// CLI flags win over the config file; negative flags only ever switch a
// feature off.
fn tree_options(cli: &Cli, config: &Config) -> TreeOptions {
    let scopes = if cli.scope.is_empty() {
        &config.access.scopes
    } else {
        &cli.scope
    };
    TreeOptions {
        mode: if cli.single {
            SelectMode::Single
        } else {
            SelectMode::Multi
        },
        force_root: config.tree.force_root && !cli.no_force_root,
        auto_open: cli.single,
        auto_expand_depth: config.tree.auto_expand_depth,
        show_hidden: config.tree.show_hidden && !cli.hide_hidden,
        scopes: scopes.iter().map(|s| PathSegments::parse(s)).collect(),
        credential: cli
            .password
            .clone()
            .unwrap_or_else(|| config.access.credential.clone()),
    }
}

fn build_lister(cli: &Cli, config: &Config) -> Result<LocalLister> {
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("cannot open root directory {}", cli.root.display()))?;
    anyhow::ensure!(root.is_dir(), "{} is not a directory", root.display());

    let base = cli
        .base
        .as_deref()
        .map(PathSegments::parse)
        .unwrap_or_else(PathSegments::root);
    Ok(LocalLister::new(root)
        .base(base)
        .password(cli.require_password.clone())
        .show_hidden(config.tree.show_hidden && !cli.hide_hidden)
        .include_ignored(config.tree.include_ignored && !cli.respect_ignore))
}

// Seeds the session from --select: the stored selection in multi mode, the
// navigation target in single mode.
fn seed_session(session: &mut TreeSession<LocalLister>, selects: &[String]) {
    let preselected: Vec<PathSegments> = selects.iter().map(|s| PathSegments::parse(s)).collect();
    match session.options().mode {
        SelectMode::Multi => session.set_selection(preselected.into_iter().collect()),
        SelectMode::Single => {
            if let Some(target) = preselected.into_iter().next() {
                session.navigate(&target);
            }
        }
    }
}

/// The paths a finished session yields: the optimized selection, or the
/// navigation target in single-select mode.
fn final_paths<L: DirectoryLister>(session: &TreeSession<L>) -> Vec<PathSegments> {
    match session.options().mode {
        SelectMode::Multi => session.optimized_selection(),
        SelectMode::Single => vec![session.current().clone()],
    }
}

fn generate_output_string(cli: &Cli, paths: &[PathSegments]) -> Result<String> {
    let output = match cli.format {
        OutputFormat::Text => {
            let mut lines: Vec<String> = paths.iter().map(PathSegments::to_slash_path).collect();
            lines.push(String::new());
            lines.join("\n")
        }
        OutputFormat::Tree => tree_builder::render_selection_tree(paths),
        OutputFormat::Json => {
            let request = RoleRequest {
                name: cli.role_name.clone(),
                description: String::new(),
                permission_scopes: build_permission_scopes(
                    paths,
                    cli.permissions.unwrap_or_default(),
                ),
            };
            let mut json = serde_json::to_string_pretty(&request)
                .context("failed to serialise role request")?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

// Performs the final action: printing for dry-run or copying to clipboard.
fn perform_final_action(output: &str, paths: &[PathSegments], summary_limit: usize, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{output}");
        println!(
            "(Dry run: would copy {} path(s). Clipboard not affected.)",
            paths.len()
        );
        return Ok(());
    }

    clipboard::copy_text_to_clipboard(output).context("failed to copy to clipboard")?;
    let summary = paths.iter().cloned().collect::<SelectionSet>().summary(summary_limit);
    println!("✅ Copied {} path(s): {}", paths.len(), summary);
    Ok(())
}

pub fn run_scopeyank(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    let lister = build_lister(&cli, &config)?;
    let options = tree_options(&cli, &config);
    tracing::debug!(root = %lister.root().display(), ?options, "starting session");

    let mut session = TreeSession::new(lister, options);
    session.on_change(|paths| tracing::debug!(?paths, "selection updated"));
    session.on_navigate(|target| tracing::debug!(to = target, "navigated"));
    seed_session(&mut session, &cli.select);

    let session = if cli.headless {
        session
    } else {
        match tui::run_tui(session, config.display.summary_limit)? {
            Some(session) => session,
            None => {
                println!("Selection cancelled.");
                return Ok(());
            }
        }
    };

    let paths = final_paths(&session);
    if paths.is_empty() {
        println!("{NOTHING_SELECTED}");
        return Ok(());
    }

    let output = generate_output_string(&cli, &paths)?;
    perform_final_action(&output, &paths, config.display.summary_limit, cli.dry_run)
}
