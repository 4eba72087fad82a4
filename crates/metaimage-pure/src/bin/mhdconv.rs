use metaimage_pure::document::{ReadOptions, WriteOptions};
use metaimage_pure::MetaImage;
use std::process;

const USAGE: &str = "\
Usage: mhdconv [-v] <subcommand> [args...]

Subcommands:
  compress <input.mhd> <output.mhd> [--level N]
      Rewrite a MetaImage with a zlib-compressed .zraw sidecar.
      N is -1 (default) or 0-9.

  decompress <input.mhd> <output.mhd> [--legacy-float]
      Rewrite a MetaImage with an uncompressed .raw sidecar.
      --legacy-float scales MET_FLOAT input by 255 into MET_UCHAR.

  info <input.mhd>
      Print dimensions, element type and channels.";

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    );
}

fn read_input(path: &str, options: &ReadOptions) -> Result<MetaImage, String> {
    MetaImage::read_with(path, options).map_err(|e| format!("Error reading '{}': {}", path, e))
}

fn cmd_convert(args: &[String], compress: bool) -> Result<String, String> {
    let mut read_opts = ReadOptions::default();
    let mut write_opts = WriteOptions::default().compressed(compress);
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--level" if compress => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--level requires a value".to_string())?;
                let level: i32 = value
                    .parse()
                    .map_err(|_| format!("Invalid compression level: {}", value))?;
                write_opts = write_opts.level(level);
            }
            "--legacy-float" if !compress => {
                read_opts = read_opts.legacy_float_rescale(true);
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {}", other));
            }
            _ => positional.push(arg.as_str()),
        }
    }

    let (input, output) = match positional.as_slice() {
        [input, output] => (*input, *output),
        _ => return Err(USAGE.to_string()),
    };

    let img = read_input(input, &read_opts)?;
    img.write_with(output, &write_opts)
        .map_err(|e| format!("Error writing '{}': {}", output, e))?;

    let action = if compress { "Compressed" } else { "Decompressed" };
    Ok(format!("{} '{}' -> '{}'\n", action, input, output))
}

fn cmd_info(args: &[String]) -> Result<String, String> {
    let path = match args {
        [path] => path.as_str(),
        _ => return Err(USAGE.to_string()),
    };
    let img = read_input(path, &ReadOptions::default())?;
    Ok(format!(
        "{}: {:?} {} x{}\n",
        path,
        img.dimensions(),
        img.element_type(),
        img.channels()
    ))
}

fn run(args: &[String]) -> Result<String, String> {
    let (verbose, args) = match args.first().map(String::as_str) {
        Some("-v") | Some("--verbose") => (true, &args[1..]),
        _ => (false, args),
    };
    let (subcommand, rest) = args.split_first().ok_or_else(|| USAGE.to_string())?;
    init_logging(verbose);
    match subcommand.as_str() {
        "compress" => cmd_convert(rest, true),
        "decompress" => cmd_convert(rest, false),
        "info" => cmd_info(rest),
        other => Err(format!("Unknown subcommand: {}\n\n{}", other, USAGE)),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => print!("{}", output),
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
    }
}
