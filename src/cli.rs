use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use recon::Severity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "driftcheck")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Detect membership drift between a compute fleet and its service-discovery cluster", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the drift check and exit with the monitoring status code
    Check(CheckArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("fleet_filter").required(true).args(["fleet_tag", "balancer"])))]
#[command(group(ArgGroup::new("cluster_filter").required(true).args(["service", "members"])))]
pub struct CheckArgs {
    /// Fleet role filter: exact instance tag, KEY=VALUE
    #[arg(long, value_name = "KEY=VALUE")]
    pub fleet_tag: Option<String>,

    /// Fleet role filter: instances a load balancer reports InService
    #[arg(long, value_name = "NAME")]
    pub balancer: Option<String>,

    /// Cluster role filter: named entry in the service catalog
    #[arg(long, value_name = "NAME")]
    pub service: Option<String>,

    /// Restrict the catalog query to one service tag
    #[arg(long, value_name = "TAG", requires = "service")]
    pub service_tag: Option<String>,

    /// Cluster role filter: live gossip members instead of the catalog
    #[arg(long)]
    pub members: bool,

    /// Tag pair expected on gossip members, KEY=VALUE (defaults to --fleet-tag)
    #[arg(long, value_name = "KEY=VALUE", requires = "members")]
    pub member_tag: Option<String>,

    /// Compute inventory API base URL
    #[arg(long, env = "INVENTORY_ADDR", value_name = "URL")]
    pub inventory_addr: Option<String>,

    /// Service-discovery API base URL
    #[arg(long, env = "DIRECTORY_ADDR", value_name = "URL")]
    pub directory_addr: Option<String>,

    /// Severity when instances are missing from the cluster
    #[arg(long, value_enum, default_value_t = DriftAction::Critical)]
    pub on_fleet_only: DriftAction,

    /// Severity when cluster members are missing from the fleet
    #[arg(long, value_enum, default_value_t = DriftAction::Warning)]
    pub on_cluster_only: DriftAction,

    /// Per-request HTTP deadline in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Read endpoint defaults from a JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a per-side drift breakdown after the status line
    #[arg(long)]
    pub details: bool,
}

/// What to do when drift is found in one direction.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DriftAction {
    /// Do not check this direction at all
    Ignore,
    Warning,
    Critical,
}

impl DriftAction {
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::Ignore => None,
            Self::Warning => Some(Severity::Warning),
            Self::Critical => Some(Severity::Critical),
        }
    }
}
