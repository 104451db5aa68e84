pub mod compress;
pub mod config;
pub mod diff;
pub mod err;
pub mod logging;
pub mod util;
pub mod wire;

use std::{
    fs,
    io::{self, Read, Write},
    process,
};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    compress::CompressionType,
    config::{Config, LogConfig, init_config},
    diff::{Diff, EditScript, Serde},
    err::{Error, Result},
    wire::Layout,
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// The number of threads in parallel computing
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Use verbose output (-vv very verbose, -vvv also to debug.log, -vvvv trace to trace.log)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the edit script turning the old file into the new file
    Diff(DiffArgs),
    /// Apply an edit script to the old file to rebuild the new file
    Patch(ApplyArgs),
    /// Apply an edit script backwards to the new file to rebuild the old file
    Revert(ApplyArgs),
}

#[derive(Debug, Args)]
struct DiffArgs {
    /// Path to old file, `-` for stdin
    old: String,
    /// Path to new file, `-` for stdin
    new: String,
    /// Path to save the script, stdout if omitted
    #[arg(short, long)]
    output: Option<String>,
    /// Script format
    #[arg(short, long, value_enum, default_value_t = ScriptFormat::Full)]
    format: ScriptFormat,
    /// Compression type of binary scripts
    #[arg(short, long, default_value = "zlib")]
    compression_type: CompressionType,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Path to base file, `-` for stdin
    base: String,
    /// Path to script file, `-` for stdin
    script: String,
    /// Path to save the result, stdout if omitted
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScriptFormat {
    /// One anchored instruction per line
    Full,
    /// Anchors only where hunks are not contiguous
    Compact,
    /// bincode, compressed
    Binary,
}

fn read_input(path: &str) -> Result<Vec<u8>> {
    read_input_with(path, io::stdin().lock())
}

fn read_input_with(path: &str, mut stdin: impl Read) -> Result<Vec<u8>> {
    if path == "-" {
        let mut bytes = Vec::new();
        stdin
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io("cannot read stdin", e))?;
        Ok(bytes)
    } else {
        fs::read(path).map_err(|e| Error::io(format!("cannot read {}", path), e))
    }
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).map_err(|e| Error::io(format!("cannot write {}", path), e))
        }
        None => {
            let mut writer = io::stdout().lock();
            writer
                .write_all(bytes)
                .and_then(|_| writer.flush())
                .map_err(|e| Error::io("cannot write stdout", e))
        }
    }
}

/// Text scripts start with an anchor, binary ones with a compression magic.
fn read_script(bytes: &[u8]) -> Result<EditScript> {
    match bytes.first().copied() {
        None => Ok(EditScript::default()),
        Some(b'@') => Ok(EditScript::new(wire::parse(bytes)?)),
        Some(_) => EditScript::deserialize(&CompressionType::unpack(bytes)?),
    }
}

fn run_diff(args: DiffArgs) -> Result<()> {
    log::info!("reading old file...");
    let old = read_input(&args.old)?;
    log::info!("reading new file...");
    let new = read_input(&args.new)?;
    log::info!("comparing {} and {} bytes...", old.len(), new.len());
    let script = EditScript::from_compare(&old, &new);
    log::info!(
        "{} hunks, {} bytes edited",
        script.hunks().len(),
        script.distance()
    );
    let out = match args.format {
        ScriptFormat::Full => wire::render(script.hunks(), Layout::Full),
        ScriptFormat::Compact => wire::render(script.hunks(), Layout::Compact),
        ScriptFormat::Binary => args.compression_type.pack(&script.serialize()?)?,
    };
    log::info!("writing script...");
    write_output(args.output.as_deref(), &out)
}

fn run_apply(args: ApplyArgs, forward: bool) -> Result<()> {
    log::info!("reading base file...");
    let base = read_input(&args.base)?;
    log::info!("reading script file...");
    let script = read_script(&read_input(&args.script)?)?;
    let rebuilt = if forward {
        log::info!("patching...");
        script.patch(&base)?
    } else {
        log::info!("reverting...");
        script.revert(&base)?
    };
    log::info!("writing {} bytes...", rebuilt.len());
    write_output(args.output.as_deref(), &rebuilt)
}

pub fn main() {
    let cli = Cli::parse();
    init_config(Config {
        log_config: LogConfig::Verbose(cli.verbose),
        threads: cli.threads,
    });
    log::debug!("cli args: {:#?}", cli);
    let result = match cli.command {
        Commands::Diff(args) => run_diff(args),
        Commands::Patch(args) => run_apply(args, true),
        Commands::Revert(args) => run_apply(args, false),
    };
    match result {
        Ok(()) => log::info!("success"),
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_script_detects_format() {
        let script = EditScript::from_compare(b"ABCABBA", b"CBABAC");

        let text = wire::render(script.hunks(), Layout::Compact);
        assert_eq!(read_script(&text).unwrap(), script);

        for compression in [CompressionType::Zlib, CompressionType::LZ4] {
            let binary = compression.pack(&script.serialize().unwrap()).unwrap();
            assert_eq!(read_script(&binary).unwrap(), script);
        }

        assert!(read_script(b"").unwrap().is_empty());
    }

    #[test]
    fn test_diff_then_patch_and_revert_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
        let old = b"the quick brown fox jumps over the lazy dog\n".repeat(8);
        let new = b"a quick brown dog leaps over the lazy fox\n".repeat(9);
        fs::write(path("old"), &old).unwrap();
        fs::write(path("new"), &new).unwrap();

        for (format, name) in [
            (ScriptFormat::Full, "full"),
            (ScriptFormat::Compact, "compact"),
            (ScriptFormat::Binary, "binary"),
        ] {
            run_diff(DiffArgs {
                old: path("old"),
                new: path("new"),
                output: Some(path(name)),
                format,
                compression_type: CompressionType::Gzip,
            })
            .unwrap();

            run_apply(
                ApplyArgs {
                    base: path("old"),
                    script: path(name),
                    output: Some(path("patched")),
                },
                true,
            )
            .unwrap();
            assert_eq!(fs::read(path("patched")).unwrap(), new, "format: {}", name);

            run_apply(
                ApplyArgs {
                    base: path("new"),
                    script: path(name),
                    output: Some(path("reverted")),
                },
                false,
            )
            .unwrap();
            assert_eq!(fs::read(path("reverted")).unwrap(), old, "format: {}", name);
        }

        assert!(matches!(
            run_diff(DiffArgs {
                old: path("missing"),
                new: path("new"),
                output: None,
                format: ScriptFormat::Full,
                compression_type: CompressionType::Zlib,
            }),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_dash_reads_stdin() {
        let bytes = read_input_with("-", io::Cursor::new(b"piped".to_vec())).unwrap();
        assert_eq!(bytes, b"piped");

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("input");
        fs::write(&file, b"on disk").unwrap();
        let bytes = read_input_with(&file.to_string_lossy(), io::empty()).unwrap();
        assert_eq!(bytes, b"on disk");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "edit-script", "-vv", "diff", "a.bin", "b.bin", "-f", "binary", "-c", "lz4",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Diff(args) => {
                assert_eq!(args.format, ScriptFormat::Binary);
                assert_eq!(args.compression_type, CompressionType::LZ4);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
