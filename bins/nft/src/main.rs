//! nft-expr command - encode and decode nf_tables expressions.

mod output;

use clap::{Parser, Subcommand};
use nftexpr::nftables::{Dup, Expr, ExprConfig};
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(
    name = "nft-expr",
    version,
    about = "nf_tables expression encoder/decoder"
)]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode an expression to hex.
    #[command(visible_alias = "enc")]
    Encode {
        #[command(subcommand)]
        expr: EncodeExpr,
    },

    /// Decode a hex-encoded expression.
    #[command(visible_alias = "dec")]
    Decode {
        /// Hex bytes (read from stdin if omitted).
        hex: Option<String>,
    },
}

#[derive(Subcommand)]
enum EncodeExpr {
    /// Duplicate packets to the address and device held in registers.
    Dup {
        /// Register holding the destination address.
        #[arg(long, default_value_t = 0)]
        addr: u32,

        /// Register holding the output device index.
        #[arg(long, default_value_t = 0)]
        dev: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode { expr } => {
            let bytes = match expr {
                EncodeExpr::Dup { addr, dev } => Dup::new(addr, dev).to_bytes()?,
            };
            println!("{}", output::hex_encode(&bytes));
        }
        Command::Decode { hex } => {
            let input = match hex {
                Some(hex) => hex,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };
            let bytes = output::hex_decode(&input)?;
            tracing::debug!(len = bytes.len(), "decoding expression");
            let expr = Expr::from_bytes(&bytes)?;
            output::print_expr(&expr, cli.json, cli.pretty)?;
        }
    }

    Ok(())
}
