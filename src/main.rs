//! `tpcc <num_warehouses> <memory_budget_bytes> [mode]`
//!
//! `mode=0` (default) runs the benchmark to completion, printing throughput
//! and memory/disk stats every [`config::EngineConfig::stats_interval`]
//! transactions. `mode=1` generates the schema, exports the cold tables plus
//! history to CSV under `./export`, and exits without running transactions.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use omendb::config::EngineConfig;
use omendb::driver::{generate, Client, GeneratorConfig};
use omendb::keycodec::MAX_WAREHOUSE_ID;
use omendb::{csvexport, logging, Store};

#[derive(Parser, Debug)]
#[command(name = "tpcc", about = "TPC-C benchmark engine with hybrid hot/cold storage")]
struct Cli {
    /// Number of warehouses to generate, 1..=MAX_WAREHOUSE_ID.
    num_warehouses: i32,

    /// Resident-memory budget in bytes before the eviction engine runs.
    memory_budget_bytes: u64,

    /// 0 = run the benchmark (default), 1 = export CSV and exit.
    #[arg(default_value_t = 0)]
    mode: u8,

    /// Optional TOML config file, layered under environment variables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// How many transactions to execute in benchmark mode.
    #[arg(long, default_value_t = 200_000)]
    transactions: u64,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    if !(1..=MAX_WAREHOUSE_ID).contains(&cli.num_warehouses) {
        error!(
            num_warehouses = cli.num_warehouses,
            max = MAX_WAREHOUSE_ID,
            "num_warehouses out of range"
        );
        eprintln!("num_warehouses must be in 1..={MAX_WAREHOUSE_ID}");
        std::process::exit(1);
    }

    if let Err(err) = run(&cli) {
        error!(%err, "fatal error");
        eprintln!("tpcc: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> omendb::Result<()> {
    let config = EngineConfig::load(cli.config.as_deref())?;

    let mut store = Store::new(config.index_fanout);
    let generator_config = GeneratorConfig {
        num_warehouses: cli.num_warehouses,
        seed: config.seed,
    };
    info!(num_warehouses = cli.num_warehouses, "generating schema");
    let c_run = generate(&mut store, &generator_config);

    let data_dir = PathBuf::from("./data");
    store.mount_cold_tables(&data_dir, config.dict_size, config.block_size)?;

    if cli.mode == 1 {
        let export_dir = PathBuf::from("./export");
        csvexport::export_all(&mut store, &export_dir)?;
        info!(dir = %export_dir.display(), "CSV export complete");
        return Ok(());
    }

    let mut eviction = omendb::eviction::EvictionEngine::new(cli.memory_budget_bytes);
    let mut client = Client::new(cli.num_warehouses, c_run, StdRng::seed_from_u64(config.seed ^ 0x5151));

    let start = Instant::now();
    let mut now = 0i64;
    for i in 1..=cli.transactions {
        now += 1;
        client.run_one(&mut store, now)?;
        eviction.run(&mut store)?;

        if i % config.stats_interval == 0 {
            let throughput = store.stats().throughput(start.elapsed());
            let mem_bytes = store.total_resident_bytes();
            let disk_bytes = store.stats().total_disk_bytes();
            info!(throughput, mem_bytes, disk_bytes, "progress report");
            println!("{throughput:.2}, {mem_bytes}, {disk_bytes}");
        }
    }

    info!(
        committed = store.stats().transactions_committed(),
        total = store.stats().transactions_total(),
        "run complete"
    );
    Ok(())
}
