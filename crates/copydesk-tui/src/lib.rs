//! Full-screen TUI implementation for the copydesk console.

pub mod common;
pub mod dialogs;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod router;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
use copydesk_core::api::ApiClient;
use copydesk_core::config::Config;
use copydesk_core::session::SessionStore;
pub use runtime::ConsoleRuntime;

/// Runs the interactive console.
pub async fn run_console(config: Config) -> Result<()> {
    // The console requires a terminal to render the TUI
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The console requires a terminal.\n\
             Use `copydesk login` / `copydesk whoami` for non-interactive use."
        );
    }

    let session = Arc::new(SessionStore::load()?);
    let api = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "copydesk console")?;
    writeln!(err, "API: {}", config.api_base_url)?;
    err.flush()?;

    let mut runtime = ConsoleRuntime::new(config, session, api)?;
    runtime.run()?;

    // Print goodbye after TUI exits (terminal restored)
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
