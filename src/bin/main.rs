//! Command line front end.
//!
//! ```bash
//! qoif encode input.raw -W 640 -H 480 -c 4 -o output.qoi
//! qoif encode input.png -o output.qoi
//! qoif decode input.qoi -o output.raw
//! qoif info input.qoi
//! ```
//!
//! Set `RUST_LOG=debug` for codec diagnostics.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use qoif::{decode_header, encode, Channels, FormatRegistry};

#[derive(Parser)]
#[command(name = "qoif", version, about = "Encode and decode QOI images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an image into a .qoi file
    Encode {
        /// Raw interleaved samples when --width and --height are given,
        /// otherwise a PNG file
        input: String,
        /// Output file (.qoi)
        #[arg(short, long)]
        output: String,
        /// Width in pixels of a raw input
        #[arg(short = 'W', long, requires = "height")]
        width: Option<u32>,
        /// Height in pixels of a raw input
        #[arg(short = 'H', long, requires = "width")]
        height: Option<u32>,
        /// Bytes per pixel of a raw input: 3 or 4
        #[arg(short, long, default_value_t = 4)]
        channels: u8,
    },
    /// Decode a .qoi file to raw samples, or to PNG when the output ends in .png
    Decode {
        input: String,
        #[arg(short, long)]
        output: String,
    },
    /// Show the header of a .qoi file
    Info { input: String },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            width,
            height,
            channels,
        } => cmd_encode(&input, &output, width.zip(height), channels),
        Commands::Decode { input, output } => cmd_decode(&input, &output),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn create(output: &str) -> Result<BufWriter<File>, String> {
    File::create(output)
        .map(BufWriter::new)
        .map_err(|e| format!("create {output}: {e}"))
}

fn cmd_encode(
    input: &str,
    output: &str,
    dimensions: Option<(u32, u32)>,
    channels: u8,
) -> Result<(), String> {
    let mut writer = create(output)?;
    let channels = match dimensions {
        Some((width, height)) => {
            let channels = Channels::try_from(channels).map_err(|e| e.to_string())?;
            let raw = fs::read(input).map_err(|e| format!("read {input}: {e}"))?;
            encode(&mut writer, &raw, width, height, channels).map_err(|e| e.to_string())?;
            channels
        }
        None => encode_decoded(input, &mut writer)?,
    };
    writer
        .flush()
        .map_err(|e| format!("write {output}: {e}"))?;

    info!("wrote {output} with {} channels", channels.count());
    Ok(())
}

#[cfg(feature = "image")]
fn encode_decoded(input: &str, writer: &mut BufWriter<File>) -> Result<Channels, String> {
    let image = image::open(input).map_err(|e| format!("read {input}: {e}"))?;
    qoif::encode_image(writer, &image).map_err(|e| e.to_string())
}

#[cfg(not(feature = "image"))]
fn encode_decoded(_input: &str, _writer: &mut BufWriter<File>) -> Result<Channels, String> {
    Err("--width and --height are required without the `image` feature".to_string())
}

fn cmd_decode(input: &str, output: &str) -> Result<(), String> {
    let file = File::open(input).map_err(|e| format!("open {input}: {e}"))?;
    let registry = FormatRegistry::with_defaults();
    let (format, image) = registry
        .decode(BufReader::new(file))
        .map_err(|e| format!("decode {input}: {e}"))?;

    eprintln!(
        "decoded {} {}x{} ({} channels)",
        format.name,
        image.width,
        image.height,
        image.channels.count()
    );

    if output.ends_with(".png") {
        return save_png(image, output);
    }
    fs::write(output, &image.pixels).map_err(|e| format!("write {output}: {e}"))
}

#[cfg(feature = "image")]
fn save_png(image: qoif::RawImage, output: &str) -> Result<(), String> {
    image
        .into_dynamic_image()
        .map_err(|e| e.to_string())?
        .save(output)
        .map_err(|e| format!("write {output}: {e}"))
}

#[cfg(not(feature = "image"))]
fn save_png(_image: qoif::RawImage, _output: &str) -> Result<(), String> {
    Err("PNG output needs the `image` feature".to_string())
}

fn cmd_info(input: &str) -> Result<(), String> {
    let file = File::open(input).map_err(|e| format!("open {input}: {e}"))?;
    let size = file
        .metadata()
        .map_err(|e| format!("stat {input}: {e}"))?
        .len();
    let header = decode_header(&mut BufReader::new(file)).map_err(|e| e.to_string())?;

    let raw_size = header.byte_len() as u64;
    let ratio = if raw_size == 0 {
        0.0
    } else {
        size as f64 / raw_size as f64
    };

    println!("QOI Image Info");
    println!("  File:        {input}");
    println!("  File size:   {size} bytes");
    println!("  Width:       {}", header.width);
    println!("  Height:      {}", header.height);
    println!("  Channels:    {}", header.channels.count());
    println!("  Colorspace:  {:?}", header.colorspace);
    println!("  Raw size:    {raw_size} bytes");
    println!("  Ratio:       {:.1}%", ratio * 100.0);

    Ok(())
}
