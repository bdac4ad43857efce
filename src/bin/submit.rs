use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::Address;
use tracing_subscriber::EnvFilter;

use aligned_batcher_client::{
    ClientConfig, LocalSigner, PaymentOracle, ProofSigner, ProvingSystem, RpcPaymentOracle,
    StaticPaymentOracle, SubmissionSession, VerificationData,
};

fn print_help() {
    eprintln!(
        "\
aligned-submit

USAGE:
  aligned-submit submit [options]

submit OPTIONS:
  --batcher-url <ws_url>       Batcher endpoint (default: ws://localhost:8080)
  --proving-system <name>      One of the supported systems
                               (default: GnarkGroth16Bn254)
  --proof <path>               (required) File containing the proof bytes
  --public-input <path>        (optional) File containing the public input
  --vk <path>                  (optional) File containing the verification key
  --vm-program <path>          (optional) File containing the VM program code
  --proof-generator <address>  Proof generator address
                               (default: the submitter address)
  --repeat <n>                 Submit the same proof n times (default: 1)
  --rpc-url <http_url>         Execution-layer RPC for nonce and gas price
  --nonce <n>                  Pinned nonce (required without --rpc-url)
  --max-fee <wei>              Pinned fee cap (required without --rpc-url)

ENV:
  SUBMITTER_PRIVATE_KEY        (required) Hex private key paying for submissions
  BATCHER_WS_URL, BATCHER_CHAIN_ID, BATCHER_PAYMENT_SERVICE_ADDR,
  BATCHER_PROTOCOL_VERSION, BATCHER_HANDSHAKE_TIMEOUT_SECS,
  BATCHER_RESPONSE_TIMEOUT_SECS
                               Optional configuration overrides
"
    );
}

fn read_artifact(label: &str, path: &str) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow::anyhow!("failed to read {label} from {path}: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args: VecDeque<String> = std::env::args().skip(1).collect();
    let Some(command) = args.pop_front() else {
        print_help();
        return Ok(());
    };

    if matches!(command.as_str(), "-h" | "--help" | "help") {
        print_help();
        return Ok(());
    }

    match command.as_str() {
        "submit" => {
            let mut batcher_url: Option<String> = None;
            let mut proving_system = ProvingSystem::Groth16Bn254;
            let mut proof_path: Option<String> = None;
            let mut public_input_path: Option<String> = None;
            let mut vk_path: Option<String> = None;
            let mut vm_program_path: Option<String> = None;
            let mut proof_generator: Option<Address> = None;
            let mut repeat: usize = 1;
            let mut rpc_url: Option<String> = None;
            let mut nonce: Option<u64> = None;
            let mut max_fee: Option<u128> = None;

            while let Some(arg) = args.pop_front() {
                let mut value_for = |flag: &str| {
                    args.pop_front()
                        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
                };
                match arg.as_str() {
                    "--batcher-url" => batcher_url = Some(value_for("--batcher-url")?),
                    "--proving-system" => {
                        proving_system =
                            ProvingSystem::from_str(&value_for("--proving-system")?)?;
                    }
                    "--proof" => proof_path = Some(value_for("--proof")?),
                    "--public-input" => public_input_path = Some(value_for("--public-input")?),
                    "--vk" => vk_path = Some(value_for("--vk")?),
                    "--vm-program" => vm_program_path = Some(value_for("--vm-program")?),
                    "--proof-generator" => {
                        proof_generator = Some(
                            value_for("--proof-generator")?
                                .parse()
                                .map_err(|e| anyhow::anyhow!("invalid --proof-generator: {e}"))?,
                        );
                    }
                    "--repeat" => {
                        repeat = value_for("--repeat")?
                            .parse()
                            .map_err(|e| anyhow::anyhow!("invalid --repeat: {e}"))?;
                    }
                    "--rpc-url" => rpc_url = Some(value_for("--rpc-url")?),
                    "--nonce" => {
                        nonce = Some(
                            value_for("--nonce")?
                                .parse()
                                .map_err(|e| anyhow::anyhow!("invalid --nonce: {e}"))?,
                        );
                    }
                    "--max-fee" => {
                        max_fee = Some(
                            value_for("--max-fee")?
                                .parse()
                                .map_err(|e| anyhow::anyhow!("invalid --max-fee: {e}"))?,
                        );
                    }
                    "-h" | "--help" => {
                        print_help();
                        return Ok(());
                    }
                    other => anyhow::bail!("unexpected argument: {other}"),
                }
            }

            let proof_path =
                proof_path.ok_or_else(|| anyhow::anyhow!("--proof is required"))?;
            if repeat == 0 {
                anyhow::bail!("--repeat must be at least 1");
            }

            let key = std::env::var("SUBMITTER_PRIVATE_KEY")
                .map_err(|_| anyhow::anyhow!("SUBMITTER_PRIVATE_KEY is required"))?;
            let signer = LocalSigner::from_hex_key(&key)?;

            let mut config = ClientConfig::from_env()?;
            if let Some(url) = batcher_url {
                config.batcher_url = url;
            }

            let oracle: Arc<dyn PaymentOracle> = match (rpc_url, nonce, max_fee) {
                (Some(url), None, None) => Arc::new(RpcPaymentOracle::new(url)),
                (None, Some(nonce), Some(max_fee)) => {
                    Arc::new(StaticPaymentOracle::new(nonce, max_fee))
                }
                _ => anyhow::bail!(
                    "provide either --rpc-url, or both --nonce and --max-fee"
                ),
            };

            let proof = read_artifact("proof", &proof_path)?;
            let pub_input = public_input_path
                .map(|p| read_artifact("public input", &p))
                .transpose()?;
            let verification_key = vk_path
                .map(|p| read_artifact("verification key", &p))
                .transpose()?;
            let vm_program_code = vm_program_path
                .map(|p| read_artifact("vm program code", &p))
                .transpose()?;

            let data = VerificationData {
                proving_system,
                proof,
                pub_input,
                verification_key,
                vm_program_code,
                proof_generator_addr: proof_generator.unwrap_or_else(|| signer.address()),
            };
            let items = vec![data; repeat];

            let session =
                SubmissionSession::connect(config, Arc::new(signer), oracle).await?;
            let verified = session.submit_multiple(items).await?;

            for entry in &verified {
                println!(
                    "ok: included in batch 0x{} at index {}",
                    hex::encode(entry.batch_merkle_root),
                    entry.index_in_batch
                );
            }
            if verified.len() < repeat {
                eprintln!(
                    "warning: {} of {repeat} responses failed local verification",
                    repeat - verified.len()
                );
            }
            Ok(())
        }
        other => {
            print_help();
            anyhow::bail!("unknown command: {other}")
        }
    }
}
