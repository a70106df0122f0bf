use qp_relay::{
    parse_config, setup_logging, CommandSpec, PdRpc, PdRpcProgrammer, RecordListener,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

// Traffic-manager follow-up issued after the entry is installed.
const CPU_PORT_CODE: &str = "tm.set_cpuport(128);";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let config = parse_config();

    let listener = RecordListener::bind(config.addr)?;
    tracing::info!("Listening on {}", config.addr);

    let rpc = PdRpc::new(config.tool.clone());
    let mut programmer = PdRpcProgrammer::new(rpc.clone());
    let record = listener.accept_once(&mut programmer).await?;
    tracing::info!("installed entry for qp {:#x}", record.queue_pair_id);

    tracing::info!("setting traffic-manager cpu port");
    rpc.run(&CommandSpec::from(CPU_PORT_CODE), config.quiet)?;
    tracing::info!("cpu port set");

    Ok(())
}
