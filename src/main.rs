use clap::Parser;
use img_press::cli::Args;
use img_press::{run_transcode, ConsoleReporter, PressCodec, RunConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = RunConfig::new(
        args.input,
        args.output,
        args.quality,
        args.max_width,
        args.max_height,
        !args.convert,
    )?;

    println!("🚀 Starting batch compression...");
    println!("📁 Input: {}", config.input_root.display());
    match &config.output_root {
        Some(root) => println!("📁 Output: {}", root.display()),
        None => println!("📁 Output: in place"),
    }

    let mut reporter = ConsoleReporter::new();
    let summary = run_transcode(&config, &PressCodec, &mut reporter)?;

    if summary.processed() == 0 {
        println!("⚠️  No image files found in the input path");
        return Ok(());
    }

    println!("\n📊 Batch Compression Summary:");
    println!(
        "  📁 Files processed: {} ({} failed)",
        summary.processed(),
        summary.failed
    );
    println!("  📊 Total original size: {} bytes", summary.bytes_before);
    println!("  📊 Total compressed size: {} bytes", summary.bytes_after);
    println!(
        "  🎯 Overall compression ratio: {:.1}%",
        summary.compression_ratio()
    );
    println!("  ⏱️  Total time: {:?}", summary.elapsed);

    Ok(())
}
