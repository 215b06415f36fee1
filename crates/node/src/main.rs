use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use ed25519_dalek::SigningKey;
use serde_json::Value;
use tracing::{debug, info};

use lightgate_crypto::{generate_keypair, hash_block, sign_precommit};
use lightgate_types::{Block, BlockProof, Hash32, PrecommitBody, SystemTime};
use lightgate_verifier::render::{proof_to_json, validators_to_json};
use lightgate_verifier::{try_verify_block, ValidatorSet, VerifierConfig};

#[derive(Parser)]
#[command(name = "lightgate")]
#[command(about = "Check that a block is finalized by a supermajority of precommits")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a proof file against a validator list
    Verify {
        /// JSON file with `{block, precommits}`
        #[arg(long)]
        proof: PathBuf,

        /// JSON array of hex public keys
        #[arg(long)]
        validators: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        network_id: i64,

        /// JSON verifier config; protocol defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a signed sample proof and its validator list
    Sample {
        #[arg(long, default_value_t = 4)]
        validators: u8,

        /// How many validators (from index 0) sign
        #[arg(long, default_value_t = 3)]
        signers: u8,

        #[arg(long, default_value_t = 1)]
        height: u64,

        #[arg(long, default_value_t = 0)]
        round: u32,

        #[arg(long, default_value_t = 0)]
        network_id: u8,

        /// Use fresh random keys instead of fixed dev seeds
        #[arg(long)]
        random_keys: bool,

        #[arg(long)]
        out_dir: PathBuf,
    },
}

fn short_hash(h: &Hash32) -> String {
    // first 8 bytes are enough to eyeball
    lightgate_types::hex::encode(&h[..8])
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn write_json(path: &Path, value: &Value) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))
}

fn run_verify(
    proof: &Path,
    validators: &Path,
    network_id: i64,
    config: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let config = match config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            VerifierConfig::from_json_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => VerifierConfig::default(),
    };
    debug!(?config, "verifier config");

    let data = read_json(proof)?;
    let validators = read_json(validators)?;

    match try_verify_block(&data, &validators, network_id, &config) {
        Ok(v) => {
            println!(
                "ACCEPTED {} (round {}, {}/{} validators)",
                short_hash(&v.block_hash),
                v.round,
                v.confirmed.len(),
                v.total
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("REJECTED: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_sample(
    validators: u8,
    signers: u8,
    height: u64,
    round: u32,
    network_id: u8,
    random_keys: bool,
    out_dir: &Path,
) -> anyhow::Result<ExitCode> {
    if signers > validators {
        bail!("--signers ({signers}) cannot exceed --validators ({validators})");
    }

    let keys: Vec<SigningKey> = (0..validators)
        .map(|i| {
            if random_keys {
                generate_keypair().0
            } else {
                SigningKey::from_bytes(&[i.wrapping_add(1); 32])
            }
        })
        .collect();

    let block = Block {
        height,
        propose_round: round,
        prev_hash: [0x01; 32],
        tx_hash: [0x02; 32],
        state_hash: [0x03; 32],
    };
    let config = VerifierConfig::default();
    let block_hash = hash_block(config.hash, &block)?;

    let precommits = keys
        .iter()
        .take(signers as usize)
        .zip(0u32..)
        .map(|(sk, validator)| {
            let body = PrecommitBody {
                validator,
                height,
                round,
                propose_hash: block_hash,
                block_hash,
                time: SystemTime::default(),
            };
            sign_precommit(sk, config.precommit_header(network_id), body)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let set = ValidatorSet::new(keys.iter().map(|k| k.verifying_key().to_bytes()).collect());

    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let proof_path = out_dir.join("proof.json");
    let validators_path = out_dir.join("validators.json");
    write_json(&proof_path, &proof_to_json(&BlockProof { block, precommits }))?;
    write_json(&validators_path, &validators_to_json(&set))?;

    info!(
        block = %short_hash(&block_hash),
        validators,
        signers,
        "wrote sample proof"
    );
    println!(
        "wrote {} and {}",
        proof_path.display(),
        validators_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightgate=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            proof,
            validators,
            network_id,
            config,
        } => run_verify(&proof, &validators, network_id, config.as_deref()),
        Commands::Sample {
            validators,
            signers,
            height,
            round,
            network_id,
            random_keys,
            out_dir,
        } => run_sample(
            validators,
            signers,
            height,
            round,
            network_id,
            random_keys,
            &out_dir,
        ),
    }
}
