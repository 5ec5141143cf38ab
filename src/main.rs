mod action;
mod app;
mod async_diff;
mod cli;
mod components;
mod config;
mod editor;
mod event;
mod git;
mod labels;
mod logging;
mod navigation;
mod resolver;
mod session;
mod state;
mod theme;
mod tui;
mod uri;
mod watch;

use anyhow::Result;
use clap::Parser;
use std::env;

use crate::app::App;
use crate::cli::Cli;
use crate::git::RepoCache;
use crate::state::DiffOptions;
use crate::theme::Theme;
use crate::uri::ResourceUri;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        default_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();

    let _log_guard = match logging::init(cli.log_file.clone()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("revdiff: logging disabled: {e:#}");
            None
        }
    };

    let cwd = env::current_dir()?;

    // Validate we're in a git repo before launching TUI
    let repo = match RepoCache::open(&cwd) {
        Ok(r) => r,
        Err(_) => {
            eprintln!(
                "revdiff: not a git repository (or any parent up to mount point /)\n\
                 Run this command from inside a git working tree."
            );
            std::process::exit(1);
        }
    };
    let repo_path = repo.workdir().to_path_buf();
    drop(repo);

    let mut config = config::load_config();
    if let Some(ref theme_name) = cli.theme {
        config.theme = Theme::from_name(theme_name);
    }
    if cli.no_watch {
        config.watch = false;
    }

    let mut options = DiffOptions::new(repo_path.clone());
    options.range = cli.range();
    options.scope = cli.path.as_ref().map(|p| ResourceUri::file(&cwd.join(p)));

    let snapshot = if config.restore_session && !cli.fresh && !cli.is_explicit() {
        session::load_state(&repo_path).filter(|s| s.options.is_some())
    } else {
        None
    };

    tracing::info!(repo = %repo_path.display(), restored = snapshot.is_some(), "starting");

    let mut app = App::new(repo_path, &config);
    match snapshot {
        Some(snapshot) => app.restore(snapshot),
        None => app.set_options(options),
    }

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}
