pub mod command;
pub mod error;
pub mod listener;
pub mod table;
pub mod wire;

pub use command::{CommandSpec, PdRpc};
pub use error::RelayError;
pub use listener::RecordListener;
pub use table::{PdRpcProgrammer, TableProgrammer, ACTION_SELECTOR};
pub use wire::{WireRecord, RECORD_LEN};

// COMMAND LINE //

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use clap::Parser;

pub const DEFAULT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(172, 16, 44, 101));
pub const DEFAULT_PORT: u16 = 19876;

#[derive(Parser)]
#[command(long_about = None)]
struct Cli {
    #[arg(short, long, default_value_t = DEFAULT_IP)]
    ip: IpAddr,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path to the run_pd_rpc.py control-plane tool,
    /// defaults to $HOME/tools/run_pd_rpc.py
    #[arg(short, long)]
    tool: Option<PathBuf>,

    /// Don't mirror the tool's captured output to stdout
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

pub struct Config {
    pub addr: SocketAddr,
    pub tool: PathBuf,
    pub quiet: bool,
}

pub fn parse_config() -> Config {
    let cli = Cli::parse();
    Config {
        addr: SocketAddr::new(cli.ip, cli.port),
        tool: cli.tool.unwrap_or_else(default_tool_path),
        quiet: cli.quiet,
    }
}

// $HOME is only consulted here, in the CLI layer; core logic
// always gets the tool path as explicit configuration
fn default_tool_path() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join("tools").join("run_pd_rpc.py")
}

// LOGGING //

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

pub fn setup_logging() {
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::Layer::new().without_time().compact().with_ansi(true).with_writer(io::stdout));
    tracing::subscriber::set_global_default(subscriber)
            .expect("Unable to set a global subscriber");
}
