use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use scrub::{init_tracing, ClobberRules, RealFs, RunSummary, ScrubConfig, Scrubber};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Try to clean a directory tree: delete clobbered files, then collapse empty directories",
    long_about = None
)]
struct Args {
    /// Directories or files to scrub
    paths: Vec<PathBuf>,

    /// Add EXT to the list of extensions to be deleted
    #[arg(short = 'c', long = "clobber-extension", value_name = "EXT")]
    clobber_extensions: Vec<String>,

    /// Add NAME to the list of file names to be deleted
    #[arg(short = 'C', long = "clobber-name", value_name = "NAME")]
    clobber_names: Vec<String>,

    /// Load names and extensions to delete from a TOML file
    #[arg(short = 'r', long = "rules", value_name = "FILE")]
    rules_files: Vec<PathBuf>,

    /// Rather than treating hidden directories as normal directories, halt when one is discovered
    #[arg(short = 'H', long)]
    preserve_hidden: bool,

    /// Do not delete special files (such as sockets, block devices, pipes and symlinks)
    #[arg(long)]
    preserve_special: bool,

    /// Rather than removing anything, output a message for each removal
    #[arg(long)]
    simulate: bool,

    /// Verbose logging output
    #[arg(long)]
    verbose: bool,
}

fn build_config(args: &Args) -> Result<ScrubConfig> {
    let mut rules = ClobberRules::new();

    for path in &args.rules_files {
        let loaded = ClobberRules::load(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?;
        rules.merge(loaded);
    }
    for name in &args.clobber_names {
        rules.clobber_name(name.as_str());
    }
    for extension in &args.clobber_extensions {
        rules.clobber_extension(extension.as_str());
    }

    Ok(ScrubConfig::new(rules)
        .preserve_hidden(args.preserve_hidden)
        .preserve_special(args.preserve_special)
        .simulate(args.simulate)
        .verbose(args.verbose))
}

fn print_summary(summary: &RunSummary, simulate: bool) {
    let report = &summary.report;

    if simulate {
        println!(
            "{}",
            format!("Would remove {} entries", report.would_remove.len()).yellow()
        );
    } else {
        println!(
            "{}",
            format!(
                "Removed {} files and {} directories",
                report.removed_files.len(),
                report.removed_dirs.len()
            )
            .green()
        );
    }

    if !report.failures.is_empty() {
        println!(
            "{}",
            format!("{} entries could not be processed", report.failures.len()).red()
        );
    }

    for path in &summary.residue {
        println!("{} {}", "Not empty:".bold(), path.display());
    }
}

fn errno_exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version are reported through the error path too
            let code = if err.use_stderr() {
                errno_exit(libc::EINVAL)
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    if args.paths.is_empty() {
        eprint!("{}", Args::command().render_help());
        return ExitCode::SUCCESS;
    }

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return errno_exit(libc::EINVAL);
        }
    };

    if let Err(err) = init_tracing(config.verbose) {
        eprintln!("Warning: {}", err);
    }

    let summary = Scrubber::new(&config, &RealFs).run(&args.paths);

    if config.verbose {
        print_summary(&summary, config.simulate);
    }

    if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        errno_exit(libc::ENOTEMPTY)
    }
}
