//! 输出层：接收 Fleet，渲染 table 或 json

use std::io::Write;

use chrono::{DateTime, Utc};
use console::{measure_text_width, pad_str, Alignment, Term};
use owo_colors::OwoColorize as _;
use serde::Serialize;

use crate::fleet::container::{Container, ContainerState, UNKNOWN_VERSION};
use crate::fleet::host::{Fleet, Host};
use crate::fleet::report;
use crate::fleet::styles::Styles;
use crate::utils::{DockmonError, Result};

const DEFAULT_WIDTH: usize = 100;
const STATUS_WIDTH: usize = 17;
const MIN_NAME_WIDTH: usize = 9;
const MIN_VERSION_WIDTH: usize = 9;

pub fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

// ── JSON ────────────────────────────────────────────────────────────────────

pub fn display_json(out: &mut impl Write, fleet: &Fleet, now: DateTime<Utc>) -> Result<()> {
    let json = serde_json::to_string(&report::build(fleet, now))
        .map_err(|e| DockmonError::Output(format!("JSON serialize: {}", e)))?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Pretty JSON with four-space indentation; `Value` maps are key-sorted.
pub fn display_pretty(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| DockmonError::Output(format!("JSON serialize: {}", e)))?;
    out.write_all(&buf)?;
    writeln!(out)?;
    Ok(())
}

// ── Table ───────────────────────────────────────────────────────────────────

pub fn display_table(out: &mut impl Write, fleet: &Fleet, styles: &Styles, width: usize) -> Result<()> {
    for host in fleet.hosts() {
        display_host(out, host, styles, width)?;
    }
    Ok(())
}

fn display_host(out: &mut impl Write, host: &Host, styles: &Styles, width: usize) -> Result<()> {
    writeln!(
        out,
        "{}{}\n",
        "Docker host: ".style(styles.bold),
        host.name.style(styles.host)
    )?;
    display_containers(out, &host.containers(), styles, width)
}

fn display_containers(
    out: &mut impl Write,
    containers: &[&Container],
    styles: &Styles,
    width: usize,
) -> Result<()> {
    if containers.is_empty() {
        writeln!(out, "{}\n", "⚠️  No containers found.".style(styles.warning))?;
        return Ok(());
    }

    let widest = |cell: fn(&Container) -> &str| {
        containers.iter().map(|c| measure_text_width(cell(c))).max().unwrap_or(0)
    };
    let name_w = widest(|c| c.name.as_str()).max(MIN_NAME_WIDTH) + 2;
    let image_w = widest(|c| c.image.as_str()) + 2;
    let version_w = widest(Container::version).max(MIN_VERSION_WIDTH) + 2;

    let header = format!(
        "{}{}{}{}UPDATE AVAILABLE",
        pad("CONTAINER", name_w),
        pad("IMAGE", image_w),
        pad("STATUS", STATUS_WIDTH),
        pad("VERSION", version_w),
    );
    writeln!(out, "{}", header.style(styles.header))?;
    let rule = "-".repeat(width.min(name_w + image_w + STATUS_WIDTH + version_w + 37));
    writeln!(out, "{}", rule.style(styles.muted))?;

    for c in containers {
        writeln!(
            out,
            "{}{}{}{}{}",
            pad(&c.name, name_w).style(styles.bold),
            pad(&c.image, image_w).style(styles.dim),
            state_cell(&c.state, styles),
            version_cell(c.version(), version_w, styles),
            update_cell(c, styles),
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}\n", summary_line(containers, styles))?;
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, None).into_owned()
}

fn state_cell(state: &ContainerState, styles: &Styles) -> String {
    let (glyph, style) = match state {
        ContainerState::Running => ("🟢", styles.success),
        ContainerState::Exited => ("🔴", styles.error),
        ContainerState::Paused => ("🟡", styles.warning),
        ContainerState::Other(_) => ("⚪", styles.muted),
    };
    pad(&format!("{} {}", glyph, state), STATUS_WIDTH)
        .style(style)
        .to_string()
}

fn version_cell(version: &str, width: usize, styles: &Styles) -> String {
    let style = if version == UNKNOWN_VERSION { styles.warning } else { styles.info };
    pad(version, width).style(style).to_string()
}

fn update_cell(c: &Container, styles: &Styles) -> String {
    let status = c.update_status();
    if status.update_available {
        let latest = status.latest_version.as_deref().unwrap_or("latest");
        format!("⬆️ update to {}", latest).style(styles.warning).to_string()
    } else {
        "✅ up to date".style(styles.success).to_string()
    }
}

// ── 统计 ─────────────────────────────────────────────────────────────────────

/// 每个主机表格下方的容器统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub running: usize,
    pub stopped: usize,
    pub updates: usize,
}

impl Tally {
    pub fn of(containers: &[&Container]) -> Self {
        containers.iter().fold(Tally::default(), |mut t, c| {
            t.total += 1;
            match c.state {
                ContainerState::Running => t.running += 1,
                ContainerState::Exited => t.stopped += 1,
                _ => {}
            }
            if c.update_available() {
                t.updates += 1;
            }
            t
        })
    }
}

fn summary_line(containers: &[&Container], styles: &Styles) -> String {
    let t = Tally::of(containers);
    let running_style = if t.running == 0 { styles.error } else { styles.success };
    let stopped_style = if t.stopped == 0 { styles.muted } else { styles.error };
    format!(
        "{} containers configured {} containers running and {} containers stopped. {} containers with update available",
        t.total.style(styles.bold),
        t.running.style(running_style),
        t.stopped.style(stopped_style),
        t.updates.style(styles.warning),
    )
}
