use std::process::exit;

use clap::Parser;
use log::{error, info};

use workpool::{Result, ThreadPool, DEFAULT_WORKERS};

#[derive(Parser)]
#[command(name = "pool-demo", version, about = "Thread pool usage demo")]
struct Cli {
    /// Number of worker threads in the pool
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    threads: u32,

    /// Number of multiplication tasks to submit
    #[arg(long, default_value_t = 30)]
    tasks: u32,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("pool-demo {}", env!("CARGO_PKG_VERSION"));
    info!(
        "running {} tasks on {} worker threads ({} available cores)",
        cli.tasks,
        cli.threads,
        num_cpus::get()
    );

    let mut pool = ThreadPool::new(cli.threads)?;
    pool.init()?;

    let handles: Vec<_> = (1..=cli.tasks)
        .map(|i| pool.submit(move || multiply(i, i + 1)).map(|h| (i, h)))
        .collect::<Result<_>>()?;

    for (i, handle) in handles {
        println!("{} * {} = {}", i, i + 1, handle.get()?);
    }

    pool.shutdown()?;
    info!("all tasks completed, pool drained");
    Ok(())
}

fn multiply(a: u32, b: u32) -> u32 {
    a * b
}
