use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::time::Instant;
use clap::Parser;
use log::info;
use mmulib::config::{EvictionPolicyConfig, MmuConfig};
use mmulib::io::{open_backing_store, read_addresses};
use mmulib::report::{write_json, write_report};
use mmulib::simulator::Simulator;
use mmulib::util::{parse_report, verify};

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Simulates address translation through a TLB and a page table backed by a backing store file"))]
struct Args {
    /// Binary file holding every virtual page, in page number order
    backing_store: String,
    /// Newline separated decimal virtual addresses
    addresses: String,
    /// Eviction policy once the page table is full: fifo, lru, or none
    policy: Option<String>,

    /// JSON configuration file, flags given on the command line take precedence
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    frames: Option<usize>,

    #[arg(long)]
    tlb_size: Option<usize>,

    #[arg(long)]
    page_size: Option<u32>,

    #[arg(long)]
    page_bits: Option<u32>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Write the report as JSON
    #[arg(long)]
    json: bool,

    /// Reference report to check the run against
    #[arg(short, long)]
    expected: Option<String>,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn load_config(args: &Args) -> Result<MmuConfig, String> {
    // Unknown policies fail before any file is touched
    let policy = args.policy.as_deref().map(str::parse::<EvictionPolicyConfig>).transpose().map_err(|e| e.to_string())?;
    let mut config = match &args.config {
        Some(path) => {
            let config_file = File::open(path).map_err(|e| format!("Couldn't open the config file at path {path}: {e}"))?;
            MmuConfig::from_reader(BufReader::new(config_file)).map_err(|e| e.to_string())?
        }
        None => MmuConfig::default(),
    };
    if let Some(policy) = policy {
        config.replacement_policy = policy;
    }
    if let Some(frames) = args.frames {
        config.frame_count = frames;
    }
    if let Some(tlb_size) = args.tlb_size {
        config.tlb_size = tlb_size;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(page_bits) = args.page_bits {
        config.page_bits = page_bits;
    }
    Ok(config)
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "warn" })).init();

    let config = load_config(&args)?;
    let store_file = File::open(&args.backing_store).map_err(|e| format!("Couldn't open the backing store at path {}: {e}", args.backing_store))?;
    let store = open_backing_store(store_file).map_err(|e| e.to_string())?;
    let mut simulator = Simulator::new(&config, store).map_err(|e| e.to_string())?;
    let address_file = File::open(&args.addresses).map_err(|e| format!("Couldn't open the address list at path {}: {e}", args.addresses))?;
    let addresses = read_addresses(BufReader::new(address_file)).map_err(|e| e.to_string())?;
    info!("Translating {} addresses", addresses.len());

    let result = simulator.simulate(addresses).map_err(|e| e.to_string())?;
    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| format!("Couldn't create the output file at path {path}: {e}"))?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let written = if args.json {
        write_json(out, result)
    } else {
        write_report(out, result)
    };
    written.map_err(|e| format!("Couldn't write the report: {e}"))?;

    if let Some(path) = &args.expected {
        let text = fs::read_to_string(path).map_err(|e| format!("Couldn't read the reference report at path {path}: {e}"))?;
        let expected = parse_report(&text).map_err(|e| e.to_string())?;
        verify(&expected, result).map_err(|e| e.to_string())?;
        eprintln!("Run matches the reference report {path}");
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        eprintln!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        eprintln!("Total execution time (includes parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        eprintln!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        eprintln!("Parsed input configuration: {config:?}");
        eprintln!("Empty frames: {} of {}", simulator.get_empty_frame_count(), config.frame_count);
        eprintln!("Valid TLB entries: {} of {}", simulator.tlb().valid_entry_count(), config.tlb_size);
    }
    Ok(())
}
