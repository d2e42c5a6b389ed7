pub mod actions;
pub mod collector;
pub mod container;
pub mod filter;
pub mod host;
pub mod humanize;
pub mod output;
pub mod report;
pub mod styles;

use std::io::Write;

use chrono::Utc;
use log::info;

use crate::api::Api;
use crate::utils::Result;
use actions::ActionReport;
use collector::Selection;
use styles::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Show,
    CheckUpdates,
    Update,
    Restart,
}

pub struct RunOptions {
    pub selection: Selection,
    pub action: Action,
    pub json: bool,
    pub styles: Styles,
    pub width: usize,
}

pub fn run(api: &impl Api, opts: &RunOptions, out: &mut impl Write) -> Result<()> {
    match opts.action {
        Action::Show => run_show(api, opts, out),
        Action::CheckUpdates => run_check_updates(api, opts, out),
        Action::Update => run_each(api, opts, out, "⬆️  Executing update for container", |api, h, c| {
            actions::execute_update(api, h, c)
        }),
        Action::Restart => run_each(api, opts, out, "♻️  Restarting container", |api, h, c| {
            actions::execute_restart(api, h, c)
        }),
    }
}

fn run_show(api: &impl Api, opts: &RunOptions, out: &mut impl Write) -> Result<()> {
    let fleet = collector::collect(api, &opts.selection)?;
    if opts.json {
        output::display_json(out, &fleet, Utc::now())
    } else {
        output::display_table(out, &fleet, &opts.styles, opts.width)
    }
}

fn run_check_updates(api: &impl Api, opts: &RunOptions, out: &mut impl Write) -> Result<()> {
    if opts.selection.host.is_none() && opts.selection.filter.name.is_none() {
        info!("triggering update check for all containers");
        actions::check_updates(api, None)?;
        return Ok(());
    }

    let fleet = collector::collect(api, &opts.selection)?;
    for (host, c) in fleet.containers() {
        if !opts.json {
            writeln!(
                out,
                "Checking update for host {} - {} container {} - {}",
                host.name, host.id, c.name, c.id
            )?;
        }
        actions::check_updates(api, Some((host.id.as_str(), c.id.as_str())))?;
    }
    Ok(())
}

/// Dispatch one mutating action per selected container, in display order.
///
/// In JSON mode only the first container is processed: its result is printed
/// and the run ends there.
fn run_each<A, F>(
    api: &A,
    opts: &RunOptions,
    out: &mut impl Write,
    banner: &str,
    action: F,
) -> Result<()>
where
    A: Api,
    F: Fn(&A, &str, &str) -> Result<ActionReport>,
{
    let fleet = collector::collect(api, &opts.selection)?;
    for (host, c) in fleet.containers() {
        if opts.json {
            let report = action(api, host.id.as_str(), c.id.as_str())?;
            return output::display_pretty(out, &report.payload);
        }
        writeln!(out, "{} {} on {}", banner, c.name, host.name)?;
        let report = action(api, host.id.as_str(), c.id.as_str())?;
        writeln!(out, "{} {}", report.outcome.glyph(), report.message)?;
    }
    Ok(())
}
