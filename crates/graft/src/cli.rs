//! `graft`: check that a compiled grammar artifact loads.
//!
//! Usage:
//!   graft `<artifact.json>` [--min-abi `<N>`] [--max-abi `<N>`] [--verbose]
//!
//! Exits 0 when the artifact links, is ABI-compatible and yields a live
//! language handle; 1 when it does not; 2 on usage errors.

use facet::Facet;
use graft::{verify, Loader, Registry, Verdict, VersionRange};
use std::process::ExitCode;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Facet)]
struct Args {
    /// Path to the artifact JSON file.
    #[facet(positional)]
    artifact: String,

    /// Lowest accepted ABI version (defaults to the runtime minimum).
    #[facet(named, default)]
    min_abi: Option<u32>,

    /// Highest accepted ABI version (defaults to the runtime maximum).
    #[facet(named, default)]
    max_abi: Option<u32>,

    /// Log linking and loading at debug level.
    #[facet(named, default)]
    verbose: bool,
}

fn init_tracing(verbose: bool) -> Result<(), TryInitError> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}

fn main() -> ExitCode {
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    let supported = match VersionRange::new(
        args.min_abi.unwrap_or(VersionRange::RUNTIME.min()),
        args.max_abi.unwrap_or(VersionRange::RUNTIME.max()),
    ) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let mut registry = Registry::new();
    let name = match registry.link_file(&args.artifact) {
        Ok(linked) => linked.artifact().name().to_string(),
        Err(e) => {
            println!(
                "FAIL {}: grammar failed to load: ArtifactUnavailable: {e}",
                args.artifact
            );
            return ExitCode::FAILURE;
        }
    };

    match verify(Loader::new(&registry, supported), &name) {
        Verdict::Passed => {
            if let Some(linked) = registry.resolve(&name) {
                println!(
                    "ok {name} (abi {}, {} symbols, {} fields)",
                    linked.artifact().abi_version,
                    linked.symbols().symbol_count(),
                    linked.symbols().field_count(),
                );
            }
            ExitCode::SUCCESS
        }
        Verdict::Failed(failure) => {
            println!("FAIL {}: {failure}", args.artifact);
            ExitCode::FAILURE
        }
    }
}
