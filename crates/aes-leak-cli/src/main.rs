//! Command-line interface for `aes-leak`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use aes_core::{decrypt_block, encrypt_block, expand_key};
use aes_leak::{
    crypt_and_leak, crypt_blocks, Aes128Key, Block, Capture, CaptureConfig, Direction,
    MIX_ROUNDS,
};
use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, LevelFilter};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// AES-128 8-bit leakage simulator CLI.
#[derive(Parser)]
#[command(
    name = "aesleak",
    version,
    author,
    about = "Simulate AES-128 on an 8-bit core and capture state traces and MixColumns leakage"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch given as hex blocks and print the results.
    Crypt {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// `encrypt` or `decrypt` (also `enc`/`dec`, `1`/`0`).
        #[arg(long, default_value = "encrypt")]
        direction: Direction,
        /// Input block as 32 hex characters; repeat for a batch.
        #[arg(long = "block", value_name = "HEX", required = true)]
        blocks: Vec<String>,
        /// Also print the 41 labelled checkpoints of every row.
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// Process a batch and store the full capture.
    Capture {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// `encrypt` or `decrypt`.
        #[arg(long, default_value = "encrypt")]
        direction: Direction,
        /// Raw input file (must be a multiple of 16 bytes).
        #[arg(long, value_name = "FILE", conflicts_with = "count")]
        input: Option<PathBuf>,
        /// Number of random input blocks to generate instead of reading a file.
        #[arg(long)]
        count: Option<usize>,
        /// Optional RNG seed for reproducible random inputs.
        #[arg(long)]
        seed: Option<u64>,
        /// Output path for the serialized capture.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Process rows on the calling thread only.
        #[arg(long, default_value_t = false)]
        serial: bool,
    },
    /// Print a summary of a stored capture.
    Inspect {
        /// Path to the serialized capture.
        #[arg(long, value_name = "FILE")]
        capture: PathBuf,
        /// Row whose trace and leak are printed.
        #[arg(long)]
        row: Option<usize>,
    },
    /// Verify round trip, trace symmetry and agreement with the reference cipher.
    Check {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Number of random samples to test.
        #[arg(long, default_value_t = 64)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a local demo: random key and block, encrypt, decrypt, compare traces.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Crypt {
            key_hex,
            direction,
            blocks,
            trace,
        } => cmd_crypt(&key_hex, direction, &blocks, trace),
        Commands::Capture {
            key_hex,
            direction,
            input,
            count,
            seed,
            out,
            serial,
        } => cmd_capture(&key_hex, direction, input.as_ref(), count, seed, &out, serial),
        Commands::Inspect { capture, row } => cmd_inspect(&capture, row),
        Commands::Check {
            key_hex,
            samples,
            seed,
        } => cmd_check(&key_hex, samples, seed),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn cmd_crypt(key_hex: &str, direction: Direction, blocks_hex: &[String], trace: bool) -> Result<()> {
    let key = parse_hex_16(key_hex).context("parse key")?;
    let rows = blocks_hex
        .iter()
        .enumerate()
        .map(|(i, b)| hex::decode(b.trim()).with_context(|| format!("decode block {i}")))
        .collect::<Result<Vec<_>>>()?;
    let capture = crypt_and_leak(&rows, &key, direction)?;

    for (row, result) in capture.result.iter().enumerate() {
        println!("{direction} [{row}]: {}", hex::encode(result));
        if trace {
            print_trace(&capture, row);
        }
    }
    Ok(())
}

fn cmd_capture(
    key_hex: &str,
    direction: Direction,
    input: Option<&PathBuf>,
    count: Option<usize>,
    seed: Option<u64>,
    out: &PathBuf,
    serial: bool,
) -> Result<()> {
    let key = Aes128Key::from(parse_hex_16(key_hex).context("parse key")?);
    let rows = match (input, count) {
        (Some(path), _) => read_rows(path)?,
        (None, Some(count)) => random_rows(&mut seeded_rng(seed), count),
        (None, None) => bail!("either --input or --count is required"),
    };
    let config = if serial {
        CaptureConfig::serial()
    } else {
        CaptureConfig::default()
    };

    let capture = crypt_blocks(&rows, &key, direction, &config)?;
    let bytes = capture.to_bytes().context("serialize capture")?;
    fs::write(out, &bytes).with_context(|| format!("write {}", out.display()))?;
    info!(
        "stored {} rows ({direction}) in {} ({} bytes)",
        capture.rows(),
        out.display(),
        bytes.len()
    );
    Ok(())
}

fn cmd_inspect(path: &PathBuf, row: Option<usize>) -> Result<()> {
    let capture = load_capture(path)?;
    let [rows, rounds, columns, steps] = capture.leak.shape();
    println!("direction: {}", capture.direction);
    println!("rows: {rows}");
    println!("leak shape (row, round, column, step): {rows} x {rounds} x {columns} x {steps}");
    for (round, key) in capture.round_keys.0.iter().enumerate() {
        println!("round key {round}: {}", hex::encode(key));
    }

    if let Some(row) = row {
        ensure!(row < rows, "row {row} out of range (capture has {rows} rows)");
        println!("result [{row}]: {}", hex::encode(capture.result[row]));
        print_trace(&capture, row);
        for round in 0..MIX_ROUNDS {
            for column in 0..columns {
                println!(
                    "  leak r{round} c{column}: {}",
                    hex::encode(capture.leak.get(row, round, column))
                );
            }
        }
    }
    Ok(())
}

fn cmd_check(key_hex: &str, samples: usize, seed: Option<u64>) -> Result<()> {
    ensure!(samples > 0, "need at least one sample");
    let key = Aes128Key::from(parse_hex_16(key_hex).context("parse key")?);
    let round_keys = expand_key(&key);
    let mut rng = seeded_rng(seed);
    let plain = random_rows(&mut rng, samples);

    let config = CaptureConfig::default();
    let enc = crypt_blocks(&plain, &key, Direction::Encrypt, &config)?;
    let dec = crypt_blocks(&enc.result, &key, Direction::Decrypt, &config)?;

    for (row, p) in plain.iter().enumerate() {
        if enc.result[row] != encrypt_block(p, &round_keys) {
            bail!("row {row}: ciphertext differs from reference AES");
        }
        if dec.result[row] != *p || decrypt_block(&enc.result[row], &round_keys) != *p {
            bail!("row {row}: decryption did not recover the plaintext");
        }
        if enc.state_trace.row(row) != dec.state_trace.row(row) {
            bail!("row {row}: encryption and decryption traces differ");
        }
    }
    debug!("checked {samples} samples");
    println!("ok: {samples} samples");
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let plain = random_rows(&mut rng, 1);

    let enc = crypt_and_leak(&plain, &key, Direction::Encrypt)?;
    let dec = crypt_and_leak(&enc.result, &key, Direction::Decrypt)?;

    println!("demo key: {}", hex::encode(key));
    println!("plaintext: {}", hex::encode(plain[0]));
    println!("ciphertext: {}", hex::encode(enc.result[0]));
    println!("decrypted: {}", hex::encode(dec.result[0]));
    println!(
        "leak values: {} (encrypt), {} (decrypt)",
        enc.leak.as_slice().len(),
        dec.leak.as_slice().len()
    );
    if dec.result[0] != plain[0] {
        bail!("demo roundtrip failed");
    }
    if enc.state_trace != dec.state_trace {
        bail!("demo traces differ between directions");
    }
    Ok(())
}

fn print_trace(capture: &Capture, row: usize) {
    for (checkpoint, state) in capture.state_trace.row(row).labelled() {
        let label = checkpoint.to_string();
        println!("  {:>2} {label:<3} {}", checkpoint.index(), hex::encode(state));
    }
}

fn parse_hex_16(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim()).context("decode hex")?;
    if bytes.len() != 16 {
        bail!("expected 16 bytes (32 hex characters), got {}", bytes.len());
    }
    let mut block = [0u8; 16];
    block.copy_from_slice(&bytes);
    Ok(block)
}

fn read_rows(path: &PathBuf) -> Result<Vec<Block>> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    if data.is_empty() || data.len() % 16 != 0 {
        bail!("input length must be a non-zero multiple of 16 bytes");
    }
    Ok(data
        .chunks_exact(16)
        .map(|chunk| {
            let mut block = [0u8; 16];
            block.copy_from_slice(chunk);
            block
        })
        .collect())
}

fn load_capture(path: &PathBuf) -> Result<Capture> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Capture::from_bytes(&bytes).context("deserialize capture")
}

fn random_rows(rng: &mut impl RngCore, count: usize) -> Vec<Block> {
    (0..count)
        .map(|_| {
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut block);
            block
        })
        .collect()
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => ChaCha20Rng::from_entropy(),
    }
}
