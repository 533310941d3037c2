//! sol-signer command-line interface
//!
//! Derives Solana keys from a seed and prints signed transfer payloads.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use sol_signer::crypto::keys::public_key_to_address;
use sol_signer::crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, MnemonicStrength};
use sol_signer::transaction::{build_transfer_and_sign, Hash, PayloadEncoding, Pubkey, Signer};
use sol_signer::{Network, SignerConfig, SolanaAdapter};

const DEFAULT_PATH: &str = "m/44'/501'/0'/0'";

#[derive(Parser)]
#[command(name = "sol-signer")]
#[command(about = "Derive Solana keys along SLIP-10 paths and sign transactions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Target cluster (recorded only, derivation is the same everywhere)
    #[arg(long, global = true, default_value = "mainnet")]
    network: Network,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the key pair at a path
    Derive {
        #[command(flatten)]
        seed: SeedArgs,
        /// Hardened derivation path
        #[arg(long, default_value = DEFAULT_PATH)]
        path: String,
    },
    /// Build and sign a system transfer paid for by the derived key
    Transfer {
        #[command(flatten)]
        seed: SeedArgs,
        /// Hardened derivation path
        #[arg(long, default_value = DEFAULT_PATH)]
        path: String,
        /// Recipient address (defaults to the sender)
        #[arg(long)]
        to: Option<String>,
        /// Amount in lamports
        #[arg(long, default_value_t = 1)]
        lamports: u64,
        /// Recent blockhash in base58
        #[arg(long, default_value = "11111111111111111111111111111111")]
        blockhash: String,
    },
    /// Co-sign an externally built transaction
    Sign {
        #[command(flatten)]
        seed: SeedArgs,
        /// Hardened derivation path
        #[arg(long, default_value = DEFAULT_PATH)]
        path: String,
        /// Serialized transaction
        #[arg(long)]
        payload: String,
        /// Encoding of the input payload
        #[arg(long, default_value = "hex")]
        input: PayloadEncoding,
        /// Encoding of the signed payload
        #[arg(long, default_value = "base64")]
        output: PayloadEncoding,
    },
    /// Generate a new mnemonic phrase
    Mnemonic {
        /// Number of words, 12 or 24
        #[arg(long, default_value_t = 12)]
        words: u8,
    },
}

#[derive(Args)]
struct SeedArgs {
    /// Seed given as raw text bytes
    #[arg(long, conflicts_with_all = ["seed_hex", "mnemonic"])]
    seed: Option<String>,

    /// Seed given as hex
    #[arg(long, conflicts_with = "mnemonic")]
    seed_hex: Option<String>,

    /// BIP-39 mnemonic phrase
    #[arg(long)]
    mnemonic: Option<String>,

    /// BIP-39 passphrase
    #[arg(long, requires = "mnemonic")]
    passphrase: Option<String>,
}

impl SeedArgs {
    fn seed(&self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(text) = &self.seed {
            return Ok(Zeroizing::new(text.as_bytes().to_vec()));
        }
        if let Some(seed_hex) = &self.seed_hex {
            return Ok(Zeroizing::new(hex::decode(seed_hex).context("--seed-hex is not valid hex")?));
        }
        if let Some(phrase) = &self.mnemonic {
            return Ok(mnemonic_to_seed(phrase, self.passphrase.as_deref())?);
        }
        bail!("one of --seed, --seed-hex or --mnemonic is required")
    }
}

#[derive(Serialize)]
struct KeyOutput {
    path: String,
    private_key: String,
    public_key: String,
}

#[derive(Serialize)]
struct TransferOutput {
    #[serde(flatten)]
    keys: KeyOutput,
    to: String,
    lamports: u64,
    payload_hex: String,
}

#[derive(Serialize)]
struct SignOutput {
    signer: String,
    encoding: String,
    payload: String,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_lines(json: bool, value: &impl Serialize, lines: &[(&str, &str)]) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        for (label, text) in lines {
            println!("{}: {}", label, text);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let adapter = SolanaAdapter::new(SignerConfig {
        network: cli.network,
        ..SignerConfig::default()
    });

    match cli.command {
        Commands::Derive { seed, path } => {
            let seed = seed.seed()?;
            let key_pair = adapter
                .derive_key_pair(&seed, &path)
                .with_context(|| format!("failed to derive {}", path))?;
            let output = KeyOutput {
                path,
                private_key: key_pair.to_base58(),
                public_key: public_key_to_address(key_pair.public_key()),
            };
            print_lines(
                cli.json,
                &output,
                &[
                    ("Private Key (base58)", output.private_key.as_str()),
                    ("Public Key (base58)", output.public_key.as_str()),
                ],
            )?;
        }
        Commands::Transfer { seed, path, to, lamports, blockhash } => {
            let seed = seed.seed()?;
            let key_pair = adapter
                .derive_key_pair(&seed, &path)
                .with_context(|| format!("failed to derive {}", path))?;
            let from = key_pair.pubkey();
            let to: Pubkey = match to {
                Some(to) => to.parse::<Pubkey>().context("invalid --to address")?,
                None => from,
            };
            let blockhash = blockhash.parse::<Hash>().context("invalid --blockhash")?;

            let payload = build_transfer_and_sign(&key_pair, &from, &to, lamports, blockhash)?;
            info!(from = %from, to = %to, lamports, bytes = payload.len(), "built transfer");

            let output = TransferOutput {
                keys: KeyOutput {
                    path,
                    private_key: key_pair.to_base58(),
                    public_key: from.to_string(),
                },
                to: to.to_string(),
                lamports,
                payload_hex: PayloadEncoding::Hex.encode(&payload),
            };
            print_lines(
                cli.json,
                &output,
                &[
                    ("Private Key (base58)", output.keys.private_key.as_str()),
                    ("Public Key (base58)", output.keys.public_key.as_str()),
                    ("Payload (hex)", output.payload_hex.as_str()),
                ],
            )?;
        }
        Commands::Sign { seed, path, payload, input, output } => {
            let seed = seed.seed()?;
            let signer = adapter.derive_public_key(&seed, &path)?;
            let adapter = SolanaAdapter::new(SignerConfig {
                payload_encoding: output,
                ..adapter.config().clone()
            });
            let signed = adapter
                .create_signed_transaction_encoded(&seed, &path, &payload, input)
                .context("failed to sign transaction")?;

            let label = format!("Signed Payload ({})", output);
            let result = SignOutput {
                signer,
                encoding: output.to_string(),
                payload: signed,
            };
            print_lines(cli.json, &result, &[(label.as_str(), result.payload.as_str())])?;
        }
        Commands::Mnemonic { words } => {
            let strength = match words {
                12 => MnemonicStrength::Words12,
                24 => MnemonicStrength::Words24,
                other => bail!("--words must be 12 or 24, got {}", other),
            };
            let phrase = Zeroizing::new(generate_mnemonic(strength)?);
            println!("{}", *phrase);
        }
    }

    Ok(())
}
