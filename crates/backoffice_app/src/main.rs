mod commands;
mod config;
mod effects;
mod logging;
mod render;
mod session;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use backoffice_core::{Msg, PageState};
use backoffice_logging::bo_info;

use crate::commands::{Command, HELP};
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::session::Session;

/// Extra time granted on top of the request timeout when waiting for a batch.
const SETTLE_MARGIN: Duration = Duration::from_secs(5);

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    let level = config.log_level()?;
    logging::initialize(config.log_destination, level);
    bo_info!(
        "Starting back-office on {} ({}, {} rows per page)",
        config.api.base_url,
        config.resource,
        config.page_size
    );

    let runner = EffectRunner::new(config.client_settings()).context("creating the API client")?;
    let state = PageState::new(config.resource).with_page_size(config.page_size);
    let mut session = Session::new(state, runner);
    for msg in config.initial_messages()? {
        session.dispatch(msg);
    }

    let settle_timeout = Duration::from_millis(config.api.request_timeout_ms) + SETTLE_MARGIN;
    session.dispatch(Msg::RefreshRequested);
    session.settle(settle_timeout);
    print_view(&mut session)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading a command")?;
        match commands::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Show) => print_view(&mut session)?,
            Ok(Command::Step(delta)) => {
                let current = session.view().current_page;
                let target = current.saturating_add_signed(delta).max(1);
                session.dispatch(Msg::PageRequested(target));
                print_view(&mut session)?;
            }
            Ok(Command::Dismiss) => {
                session.dispatch(Msg::ErrorDismissed);
                session.dispatch(Msg::NoticeDismissed);
                print_view(&mut session)?;
            }
            Ok(Command::Dispatch(msg)) => {
                session.dispatch(msg);
                session.settle(settle_timeout);
                if session.take_changed() {
                    print_view(&mut session)?;
                }
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    bo_info!("Back-office session closed");
    Ok(())
}

fn print_view(session: &mut Session) -> anyhow::Result<()> {
    session.take_changed();
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render::render(&session.view()))?;
    stdout.flush()?;
    Ok(())
}
