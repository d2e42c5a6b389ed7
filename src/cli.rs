use clap::{ArgAction, ArgGroup, Parser};

use crate::fleet::collector::Selection;
use crate::fleet::filter::ContainerFilter;
use crate::fleet::host::ContainerOrder;
use crate::fleet::Action;

#[derive(Parser, Debug)]
#[command(name = "dockmon")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIME"), ")"))]
#[command(about = "CLI tool for monitoring Docker containers via a DockMon API server", long_about = None)]
#[command(disable_help_flag = true)]
#[command(group(ArgGroup::new("action").args(["check_updates", "update", "restart"])))]
pub struct Cli {
    /// Limit to host (name or id)
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// Limit to container name
    #[arg(short, long)]
    pub container: Option<String>,

    /// Limit to image name
    #[arg(short, long)]
    pub image: Option<String>,

    /// Only containers with updates
    #[arg(short, long)]
    pub updates_only: bool,

    /// Container sort order
    #[arg(short, long, value_enum, default_value_t = ContainerOrder::Name)]
    pub order: ContainerOrder,

    /// JSON output
    #[arg(short, long)]
    pub json: bool,

    /// Check for updates
    #[arg(long)]
    pub check_updates: bool,

    /// Update containers
    #[arg(long, visible_alias = "upgrade")]
    pub update: bool,

    /// Restart containers
    #[arg(long, visible_alias = "reboot")]
    pub restart: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.check_updates {
            Action::CheckUpdates
        } else if self.update {
            Action::Update
        } else if self.restart {
            Action::Restart
        } else {
            Action::Show
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            host: self.host.clone().filter(|h| !h.is_empty()),
            filter: ContainerFilter::new(self.container.clone(), self.image.clone()),
            updates_only: self.updates_only,
            order: self.order,
        }
    }
}
