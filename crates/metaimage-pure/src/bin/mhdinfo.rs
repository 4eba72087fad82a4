use metaimage_pure::file::{read_header, resolve_data_file};
use metaimage_pure::header::Header;
use metaimage_pure::MetaImage;
use std::path::Path;
use std::process;

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

fn format_image(path: &Path, img: &MetaImage, sidecar_len: u64, compressed: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", path.display()));
    out.push_str(&format!("  Dimensions: {:?}\n", img.dimensions()));
    out.push_str(&format!("  Element type: {}\n", img.element_type()));
    out.push_str(&format!("  Channels: {}\n", img.channels()));
    out.push_str(&format!("  Spacing: {:?}\n", img.spacing()));
    out.push_str(&format!("  Origin: {:?}\n", img.origin()));
    if let Some(axis) = img.slice_axis() {
        out.push_str(&format!("  Slice axis: {:?}\n", axis));
    }
    let label = if compressed { "compressed" } else { "raw" };
    out.push_str(&format!("  Data size: {} bytes ({})\n", sidecar_len, label));
    out
}

fn format_verbose_tags(header: &Header) -> String {
    let mut out = String::new();
    out.push_str("  Header tags:\n");
    for (tag, value) in header.iter() {
        out.push_str(&format!("    {} = {}\n", tag, value));
    }
    out
}

fn run(args: &[String]) -> Result<String, String> {
    let mut verbose = false;
    let mut file_path = None;

    for arg in args {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else if arg.starts_with('-') {
            return Err(format!("Unknown option: {}", arg));
        } else {
            if file_path.is_some() {
                return Err("Too many arguments".to_string());
            }
            file_path = Some(arg.as_str());
        }
    }

    let path = Path::new(file_path.ok_or_else(|| {
        "Usage: mhdinfo [-v] <file.mhd>\n\nPrint a summary of a MetaImage file.".to_string()
    })?);
    init_logging(verbose);

    let header =
        read_header(path).map_err(|e| format!("Error reading '{}': {}", path.display(), e))?;
    let data_path = resolve_data_file(path, &header)
        .map_err(|e| format!("Error parsing '{}': {}", path.display(), e))?;
    let sidecar_len = std::fs::metadata(&data_path)
        .map(|m| m.len())
        .map_err(|e| format!("Error reading '{}': {}", data_path.display(), e))?;
    let img =
        MetaImage::read(path).map_err(|e| format!("Error decoding '{}': {}", path.display(), e))?;

    let mut out = format_image(path, &img, sidecar_len, header.is_compressed());
    if verbose {
        out.push_str(&format_verbose_tags(&header));
    }
    Ok(out)
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
