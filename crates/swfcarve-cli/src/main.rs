//! swfcarve - Carve embedded SWF objects out of arbitrary binaries
//!
//! This tool scans files for embedded Shockwave Flash objects, resolves the
//! exact span of each one, and writes them out as standalone `.swf` files.

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::{Args, Parser, ValueEnum};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use swfcarve_core::swf::MIN_OBJECT_LEN;
use swfcarve_core::{
    Carver, CrossCheck, Error, RecognizerConfig, ScanResult, ScanStrategy, Scanner,
    ScannerConfig, StreamEnd, SwfCarver,
};
use tracing::{debug, error, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Files larger than this are skipped when walking a directory
const MAX_INPUT_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Carve embedded SWF objects out of binaries, memory dumps and disk images
#[derive(Parser, Debug)]
#[command(name = "swfcarve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Output directory for carved files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Maximum number of objects to carve per file (0 = unlimited)
    #[arg(long, default_value = "0")]
    max_results: usize,

    /// Dry run - don't write files, just show what would be carved
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files without prompting
    #[arg(long)]
    force: bool,

    /// Only list found objects without carving
    #[arg(long)]
    list_only: bool,

    /// How the walked size is compared against the header's file length
    #[arg(long, value_enum, default_value = "exact")]
    cross_check: CrossCheckArg,

    /// Which tag record ends an object
    #[arg(long, value_enum, default_value = "zero-length")]
    stream_end: StreamEndArg,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single file to carve objects from
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory of files to process
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

/// Length cross-check policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CrossCheckArg {
    /// Accept only objects whose walked size equals the declared size
    Exact,
    /// Accept only objects whose walked size differs from the declared size
    Literal,
}

impl From<CrossCheckArg> for CrossCheck {
    fn from(arg: CrossCheckArg) -> Self {
        match arg {
            CrossCheckArg::Exact => CrossCheck::Exact,
            CrossCheckArg::Literal => CrossCheck::Literal,
        }
    }
}

/// Tag stream terminator rule
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StreamEndArg {
    /// Any zero-length tag ends the object
    ZeroLength,
    /// Only the End tag ends the object
    EndTag,
}

impl From<StreamEndArg> for StreamEnd {
    fn from(arg: StreamEndArg) -> Self {
        match arg {
            StreamEndArg::ZeroLength => StreamEnd::ZeroLength,
            StreamEndArg::EndTag => StreamEnd::EndTag,
        }
    }
}

/// Tracks carved objects for deduplication
#[derive(Default)]
struct CarveRegistry {
    /// Content hashes already written
    seen: HashSet<blake3::Hash>,
    /// Output paths handed out so far
    paths: HashSet<PathBuf>,
    /// Statistics
    stats: RegistryStats,
}

#[derive(Default)]
struct RegistryStats {
    total_found: usize,
    duplicates_skipped: usize,
    conflicts_renamed: usize,
    written: usize,
}

impl CarveRegistry {
    fn new() -> Self {
        Self::default()
    }

    /// Short hex form of a content hash (first 8 chars)
    fn short_hash(hash: &blake3::Hash) -> String {
        hash.to_hex()[..8].to_string()
    }

    /// Register a carved object and return the resolved output path
    ///
    /// Returns `None` if identical content was already registered.
    fn register(&mut self, file_name: &str, content: &[u8], output_dir: &Path) -> Option<PathBuf> {
        self.stats.total_found += 1;

        let hash = blake3::hash(content);
        if !self.seen.insert(hash) {
            debug!("Skipping duplicate: {} (hash: {})", file_name, Self::short_hash(&hash));
            self.stats.duplicates_skipped += 1;
            return None;
        }

        let mut output_path = output_dir.join(file_name);
        if self.paths.contains(&output_path) {
            // Same source name and offset from another directory
            let new_name = Self::add_suffix(file_name, &format!("~{}", Self::short_hash(&hash)));
            info!("Conflict resolved: {} -> {} (content differs)", file_name, new_name);
            self.stats.conflicts_renamed += 1;
            output_path = output_dir.join(new_name);
        }
        self.paths.insert(output_path.clone());

        Some(output_path)
    }

    /// Add a suffix before the extension
    fn add_suffix(file_name: &str, suffix: &str) -> String {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) => format!("{}{}.{}", stem, suffix, ext),
            None => format!("{}{}", file_name, suffix),
        }
    }

    fn print_summary(&self) {
        info!(
            "Summary: {} found, {} duplicates skipped, {} conflicts renamed, {} written",
            self.stats.total_found,
            self.stats.duplicates_skipped,
            self.stats.conflicts_renamed,
            self.stats.written
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    // Dispatch based on input mode
    if let Some(ref file) = cli.input.file {
        process_single_file(&cli, file)
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&cli, directory)
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

/// Build the scanner described by the command line
fn build_scanner(cli: &Cli) -> Scanner {
    let recognizer = RecognizerConfig::new()
        .cross_check(cli.cross_check.into())
        .stream_end(cli.stream_end.into());
    let config = ScannerConfig::new().max_results(cli.max_results);
    Scanner::with_carver(SwfCarver::with_config(recognizer), config)
}

/// Process a single file
fn process_single_file(cli: &Cli, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let scanner = build_scanner(cli);
    let mut registry = CarveRegistry::new();
    process_binary(cli, &scanner, file, &mut registry)?;

    if !cli.list_only && !cli.dry_run {
        registry.print_summary();
    }

    Ok(())
}

/// Process a directory recursively
fn process_directory(cli: &Cli, directory: &Path) -> Result<()> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let scanner = build_scanner(cli);
    let extension = scanner.carver().output_extension();
    let output_dir = nested_output_dir(directory, &cli.output);
    let mut registry = CarveRegistry::new();
    let mut files_processed = 0;

    // Walk the directory
    for entry in WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        // Skip hidden files
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
        {
            continue;
        }

        // Never rescan our own output
        if is_carved_output(path, extension, output_dir.as_deref()) {
            trace!("Skipping output file: {}", path.display());
            continue;
        }

        if !is_scannable(path) {
            trace!("Skipping: {}", path.display());
            continue;
        }

        debug!("Processing file: {}", path.display());
        if let Err(e) = process_binary(cli, &scanner, path, &mut registry) {
            // Log error but continue with other files
            warn!("Error processing {}: {}", path.display(), e);
        }
        files_processed += 1;
    }

    info!("Processed {} files", files_processed);

    if !cli.list_only && !cli.dry_run {
        registry.print_summary();
    }

    Ok(())
}

/// Canonical output directory, if it is a separate tree from `directory`
///
/// When output goes into the scanned directory itself, only the extension
/// check in [`is_carved_output`] applies.
fn nested_output_dir(directory: &Path, output: &Path) -> Option<PathBuf> {
    let output = fs::canonicalize(output).ok()?;
    let root = fs::canonicalize(directory).ok()?;
    (output != root).then_some(output)
}

/// Whether `path` looks like something a previous run wrote
fn is_carved_output(path: &Path, extension: &str, output_dir: Option<&Path>) -> bool {
    let has_output_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false);
    if has_output_extension {
        return true;
    }

    match output_dir {
        Some(output_dir) => fs::canonicalize(path)
            .map(|p| p.starts_with(output_dir))
            .unwrap_or(false),
        None => false,
    }
}

/// Whether a file is worth reading at all
fn is_scannable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => {
            let size = metadata.len();
            (MIN_OBJECT_LEN..=MAX_INPUT_SIZE).contains(&size)
        }
        Err(_) => false,
    }
}

/// Output file name for an object carved from `source`
fn output_name(source: &Path, result: &ScanResult, extension: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    format!("{}@{:08x}.{}", stem, result.finding.start, extension)
}

/// Scan a single file and carve what it contains
fn process_binary(
    cli: &Cli,
    scanner: &Scanner,
    binary_path: &Path,
    registry: &mut CarveRegistry,
) -> Result<()> {
    // Read the input file
    trace!("Reading {}", binary_path.display());
    let data = fs::read(binary_path)
        .with_context(|| format!("Failed to read input file: {}", binary_path.display()))?;

    trace!("Read {} bytes from {}", data.len(), binary_path.display());

    let data = Bytes::from(data);
    let results = scanner
        .scan(&data)
        .with_context(|| format!("Failed to scan: {}", binary_path.display()))?;

    if results.is_empty() {
        trace!("No objects found in {}", binary_path.display());
        return Ok(());
    }

    debug!(
        "Found {} object(s) in {}",
        results.len(),
        binary_path.display()
    );

    let extension = scanner.carver().output_extension();
    for result in &results {
        if cli.list_only {
            println!(
                "{}\t{:#x}\t{:#x}\t{}",
                binary_path.display(),
                result.finding.start,
                result.finding.end,
                result.finding.len()
            );
            continue;
        }

        let file_name = output_name(binary_path, result, extension);
        let Some(output_path) = registry.register(&file_name, result.as_bytes(), &cli.output) else {
            continue;
        };

        if cli.dry_run {
            println!(
                "Would write: {} ({} bytes)",
                output_path.display(),
                result.finding.len()
            );
            continue;
        }

        match write_object_file(&output_path, result.as_bytes(), cli.force) {
            Ok(()) => {
                println!("Wrote {}", output_path.display());
                registry.stats.written += 1;
            }
            Err(e) => {
                error!("Failed to write {}: {}", output_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Write a carved object to disk
fn write_object_file(output_path: &Path, content: &[u8], force: bool) -> Result<()> {
    // Create parent directories
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }

    // Check if file exists
    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    // Write the file
    let mut file =
        fs::File::create(output_path).map_err(|e| Error::file_write(output_path, e))?;

    file.write_all(content)
        .map_err(|e| Error::file_write(output_path, e))?;

    Ok(())
}
