use anyhow::bail;
use clap::{Parser, Subcommand};

/// Runtime configuration for the `seqstamp` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file in the working directory); explicit flags win.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqstamp",
    version,
    about = "Generate, encode and parse monotonic timestamps and unique IDs"
)]
pub struct CliArgs {
    /// How many values the generating commands (`ids`, `stamps`, `random`)
    /// produce.
    ///
    /// Environment variable: `SEQSTAMP_COUNT`
    #[arg(short = 'n', long, env = "SEQSTAMP_COUNT", default_value_t = 10, global = true)]
    pub count: usize,

    /// Number of threads sharing one generator while producing `ids` or
    /// `stamps`. Each thread produces an equal share of `count`.
    ///
    /// Environment variable: `SEQSTAMP_THREADS`
    #[arg(short, long, env = "SEQSTAMP_THREADS", default_value_t = 1, global = true)]
    pub threads: usize,

    /// Sort the generated values before printing. Without it, values are
    /// printed thread by thread in the order each thread received them.
    #[arg(long, default_value_t = false, global = true)]
    pub sorted: bool,

    /// Upper bound accepted for `count`, guarding against accidental huge
    /// outputs.
    ///
    /// Environment variable: `SEQSTAMP_MAX_COUNT`
    #[arg(long, env = "SEQSTAMP_MAX_COUNT", default_value_t = 10_000_000)]
    pub max_count: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print counter-based unique identifiers as 11-character strings.
    Ids {
        /// Start the counter here instead of at a random value; the first ID
        /// is `seed + 1`.
        ///
        /// Environment variable: `SEQSTAMP_SEED`
        #[arg(long, env = "SEQSTAMP_SEED", allow_negative_numbers = true)]
        seed: Option<i64>,
    },
    /// Print strictly increasing timestamps from the system clock.
    Stamps {
        /// Also print the compact binary form of each timestamp as hex.
        #[arg(long, default_value_t = false)]
        hex: bool,
    },
    /// Render a 64-bit value in identifier form.
    Encode {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Recover the 64-bit value from an identifier string.
    Decode { text: String },
    /// Print random labels shaped like identifiers.
    Random,
    /// Parse a timestamp at the start of `text` (e.g. a file name) and print
    /// its components.
    Parse { text: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub count: usize,
    pub threads: usize,
    pub sorted: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.threads == 0 {
            bail!("SEQSTAMP_THREADS must be greater than 0");
        }

        if args.count > args.max_count {
            bail!(
                "SEQSTAMP_COUNT ({}) exceeds SEQSTAMP_MAX_COUNT ({})",
                args.count,
                args.max_count
            );
        }

        Ok(Self {
            count: args.count,
            threads: args.threads.min(args.count.max(1)),
            sorted: args.sorted,
            command: args.command,
        })
    }
}
