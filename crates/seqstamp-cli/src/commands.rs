use std::thread::scope;

use anyhow::Context;
use seqstamp::{
    MonotonicTimestamp, Scanner, SystemClock, TimestampSequencer, UniqueIdGenerator, decode,
    encode,
};

use crate::config::{Command, Config};

/// Runs the configured command and returns the lines to print.
pub fn run(config: &Config) -> anyhow::Result<Vec<String>> {
    match &config.command {
        Command::Ids { seed } => {
            let generator: UniqueIdGenerator = match seed {
                Some(seed) => UniqueIdGenerator::from_seed(*seed),
                None => UniqueIdGenerator::default(),
            };
            let mut ids = generate(&generator, config, |g| Ok(g.next_long()))?;
            if config.sorted {
                ids.sort_unstable();
            }
            Ok(ids.into_iter().map(encode).collect())
        }
        Command::Stamps { hex } => {
            let sequencer = TimestampSequencer::new(SystemClock);
            let mut stamps = generate(&sequencer, config, |s| s.next_now())?;
            if config.sorted {
                stamps.sort_unstable();
            }
            stamps
                .into_iter()
                .map(|ts| -> anyhow::Result<String> {
                    if *hex {
                        Ok(format!("{ts}\t{}", compact_hex(&ts)?))
                    } else {
                        Ok(ts.to_string())
                    }
                })
                .collect()
        }
        Command::Encode { value } => Ok(vec![encode(*value)]),
        Command::Decode { text } => {
            let value = decode(text)?;
            Ok(vec![value.to_string()])
        }
        Command::Random => {
            let generator: UniqueIdGenerator = UniqueIdGenerator::default();
            Ok((0..config.count).map(|_| generator.random_string()).collect())
        }
        Command::Parse { text } => parse(text).map(|line| vec![line]),
    }
}

/// Produces `config.count` values from one shared generator, split across
/// `config.threads` scoped threads. The result keeps each thread's values
/// together, in thread order.
fn generate<G, T>(
    generator: &G,
    config: &Config,
    next: impl Fn(&G) -> seqstamp::Result<T> + Sync,
) -> anyhow::Result<Vec<T>>
where
    G: Sync,
    T: Send,
{
    let threads = config.threads.max(1);
    let per_thread = config.count / threads;
    let remainder = config.count % threads;

    tracing::debug!(count = config.count, threads, "generating");

    let chunks = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let n = per_thread + usize::from(i < remainder);
                let next = &next;
                s.spawn(move || {
                    (0..n)
                        .map(|_| next(generator))
                        .collect::<seqstamp::Result<Vec<T>>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(chunk) => chunk.map_err(anyhow::Error::from),
                Err(_) => Err(anyhow::anyhow!("generator thread panicked")),
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    Ok(chunks.into_iter().flatten().collect())
}

fn compact_hex(ts: &MonotonicTimestamp) -> anyhow::Result<String> {
    let mut bytes = Vec::with_capacity(16);
    ts.write_to(&mut bytes)?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn parse(text: &str) -> anyhow::Result<String> {
    let mut scanner = Scanner::new(text);
    let ts = scanner
        .match_timestamp()
        .with_context(|| format!("no timestamp at the start of {text:?}"))?;
    let mut line = format!(
        "{ts}\tinstant={}\tuniquifier={}",
        ts.instant().to_rfc3339(),
        ts.uniquifier()
    );
    if !scanner.is_at_end() {
        line.push_str(&format!("\trest={}", scanner.remaining()));
    }
    Ok(line)
}
