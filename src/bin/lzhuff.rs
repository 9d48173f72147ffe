use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use memmap2::Mmap;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use lzhuff::batch::{compress_all, decompress_all};
use lzhuff::{
    compress_with_stats, inspect, CodecConfig, ContainerFormat, DEFAULT_MAX_MATCH,
    DEFAULT_MIN_MATCH, DEFAULT_WINDOW_SIZE,
};

/// Extension appended to compressed files
const EXTENSION: &str = "lzh";

#[derive(Parser, Debug)]
#[command(name = "lzhuff")]
#[command(about = "Compress and decompress files with LZ77 + Huffman coding")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress one or more files
    Compress {
        #[command(flatten)]
        io_args: IoArgs,

        #[command(flatten)]
        codec: CodecArgs,

        /// Minimum match length
        #[arg(long, default_value_t = DEFAULT_MIN_MATCH)]
        min_match: u16,

        /// Container layout
        #[arg(long, value_enum, default_value_t = FormatArg::Framed)]
        format: FormatArg,

        /// Print size statistics for each input
        #[arg(long)]
        stats: bool,
    },
    /// Decompress one or more containers
    Decompress {
        #[command(flatten)]
        io_args: IoArgs,

        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Show container metadata without decoding
    Info {
        /// Container file (use - for stdin)
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input files (use - for stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for a single input (use - for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Sliding window size in bytes
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window: u32,

    /// Maximum match length
    #[arg(long, default_value_t = DEFAULT_MAX_MATCH)]
    max_match: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Bare header, tree and content
    Raw,
    /// Magic, version, parameters and CRC32 ahead of the raw container
    Framed,
}

impl From<FormatArg> for ContainerFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Raw => ContainerFormat::Raw,
            FormatArg::Framed => ContainerFormat::Framed,
        }
    }
}

/// Exit codes
const EXIT_OK: u8 = 0;
const EXIT_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber =
        FmtSubscriber::builder().with_max_level(level).with_writer(io::stderr).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: failed to install logger");
    }
}

fn run(cli: Cli) -> Result<u8, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Compress { io_args, codec, min_match, format, stats } => {
            let config = CodecConfig {
                window_size: codec.window,
                min_match,
                max_match: codec.max_match,
                format: format.into(),
            };
            config.validate()?;
            run_compress(&io_args, &config, stats)
        }
        Command::Decompress { io_args, codec } => {
            let config = CodecConfig::default()
                .with_window_size(codec.window)
                .with_max_match(codec.max_match)
                .with_min_match(DEFAULT_MIN_MATCH.min(codec.max_match));
            config.validate()?;
            run_decompress(&io_args, &config)
        }
        Command::Info { input } => run_info(&input),
    }
}

fn run_compress(
    args: &IoArgs,
    config: &CodecConfig,
    show_stats: bool,
) -> Result<u8, Box<dyn std::error::Error>> {
    let outputs = output_paths(args, |path| {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(EXTENSION);
        PathBuf::from(name)
    })?;
    let inputs = read_inputs(&args.inputs)?;

    let start = std::time::Instant::now();

    // Statistics need the single-call API; batch otherwise
    let results = if show_stats {
        inputs
            .iter()
            .zip(&args.inputs)
            .map(|(input, path)| {
                compress_with_stats(input.as_ref(), config).map(|(container, stats)| {
                    eprintln!("{}:", path.display());
                    eprintln!("  Original bytes:   {}", stats.original_size);
                    eprintln!("  Container bytes:  {}", stats.compressed_size);
                    eprintln!("  Tree bytes:       {}", stats.tree_size);
                    eprintln!("  Literal tokens:   {}", stats.literal_tokens);
                    eprintln!("  Match tokens:     {}", stats.match_tokens);
                    eprintln!("  Distinct symbols: {}", stats.distinct_symbols);
                    eprintln!("  Ratio:            {:.1}%", stats.ratio() * 100.0);
                    container
                })
            })
            .collect()
    } else {
        compress_all(&inputs, config, args.threads)?
    };

    let code = write_results(&args.inputs, &outputs, results, args.force)?;
    tracing::info!(files = inputs.len(), elapsed = ?start.elapsed(), "compression finished");

    Ok(code)
}

fn run_decompress(
    args: &IoArgs,
    config: &CodecConfig,
) -> Result<u8, Box<dyn std::error::Error>> {
    let outputs = output_paths(args, |path| match path.extension() {
        Some(ext) if ext == EXTENSION => path.with_extension(""),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        }
    })?;
    let inputs = read_inputs(&args.inputs)?;

    let start = std::time::Instant::now();
    let results = decompress_all(&inputs, config, args.threads)?;
    let code = write_results(&args.inputs, &outputs, results, args.force)?;
    tracing::info!(files = inputs.len(), elapsed = ?start.elapsed(), "decompression finished");

    Ok(code)
}

fn run_info(path: &Path) -> Result<u8, Box<dyn std::error::Error>> {
    let input = read_input(path)?;
    let info = inspect(input.as_ref())?;

    println!("Format:           {:?}", info.format);
    if let Some(frame) = &info.frame {
        println!("Version:          {}", frame.version);
        println!("Window size:      {}", frame.window_size);
        println!("Max match:        {}", frame.max_match);
        println!("CRC32:            0x{:08x}", frame.crc32);
    }
    println!("Original bytes:   {}", info.header.original_size);
    println!("Tree bytes:       {}", info.header.tree_size);
    println!("Tree leaves:      {}", info.leaf_count);
    println!("Content bytes:    {}", info.content_size);

    Ok(EXIT_OK)
}

/// Input bytes, memory-mapped for files and buffered for stdin
enum InputData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for InputData {
    fn as_ref(&self) -> &[u8] {
        match self {
            InputData::Mapped(map) => &map[..],
            InputData::Owned(data) => &data[..],
        }
    }
}

fn read_inputs(paths: &[PathBuf]) -> io::Result<Vec<InputData>> {
    paths.iter().map(|path| read_input(path)).collect()
}

fn read_input(path: &Path) -> io::Result<InputData> {
    if is_stdio(path) {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        return Ok(InputData::Owned(data));
    }

    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        // Zero-length files cannot be mapped on every platform
        return Ok(InputData::Owned(Vec::new()));
    }

    // SAFETY: the map is read-only and output paths never alias an input
    // (checked in `output_paths`); modification by other processes is not
    // guarded against.
    let map = unsafe { Mmap::map(&file)? };
    Ok(InputData::Mapped(map))
}

/// Resolve the output path of each input
fn output_paths(
    args: &IoArgs,
    derive: impl Fn(&Path) -> PathBuf,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if let Some(output) = &args.output {
        if args.inputs.len() != 1 {
            return Err("--output requires exactly one input".into());
        }
        if !is_stdio(output) && args.inputs.contains(output) {
            return Err(format!("output {} would overwrite an input", output.display()).into());
        }
        return Ok(vec![output.clone()]);
    }

    let outputs: Vec<PathBuf> = args
        .inputs
        .iter()
        .map(|path| if is_stdio(path) { PathBuf::from("-") } else { derive(path) })
        .collect();

    for output in outputs.iter().filter(|p| !is_stdio(p)) {
        if args.inputs.contains(output) {
            return Err(format!("output {} would overwrite an input", output.display()).into());
        }
    }

    Ok(outputs)
}

/// Write each successful result, reporting failures per input
fn write_results(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    results: Vec<lzhuff::Result<Vec<u8>>>,
    force: bool,
) -> io::Result<u8> {
    let mut code = EXIT_OK;

    for ((input, output), result) in inputs.iter().zip(outputs).zip(results) {
        match result {
            Ok(data) => {
                if is_stdio(output) {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&data)?;
                    stdout.flush()?;
                    continue;
                }
                if output.exists() && !force {
                    eprintln!("{}: {} exists, use --force", input.display(), output.display());
                    code = EXIT_FAILED;
                    continue;
                }
                std::fs::write(output, &data)?;
                tracing::info!(
                    input = %input.display(),
                    output = %output.display(),
                    bytes = data.len(),
                    "wrote output"
                );
            }
            Err(e) => {
                eprintln!("{}: {}", input.display(), e);
                code = EXIT_FAILED;
            }
        }
    }

    Ok(code)
}

fn is_stdio(path: &Path) -> bool {
    path.to_str() == Some("-")
}
