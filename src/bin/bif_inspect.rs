use bifpreview::bif::ScanEnd;
use bifpreview::keypoints::format_timestamp;
use bifpreview::preview::{select_frames, WindowBounds, DEFAULT_WINDOW_RADIUS_MS};
use bifpreview::{inspect_bif, parse_summary, DecodeReport, KeyPoint};
use std::env;
use std::fs;

#[tokio::main]
async fn main() {
    println!("🔍 BIF Inspector - Index and Preview Window Analysis");
    println!("===================================================");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: bif_inspect <file.bif|url> [summary.json]");
        println!("Example: bif_inspect videos/BV1xx.bif videos/BV1xx_summary.json");
        return;
    }

    let report = match inspect_bif(args[1].clone()).await {
        Ok(report) => report,
        Err(e) => {
            println!("\n❌ Decode failed: {}", e);
            return;
        }
    };
    print_report(&args[1], &report);

    if let Some(summary_path) = args.get(2) {
        match load_key_points(summary_path) {
            Ok(key_points) => print_windows(&report, &key_points),
            Err(e) => println!("\n❌ Summary failed: {}", e),
        }
    }

    println!("\n✅ Inspection completed");
}

fn load_key_points(path: &str) -> Result<Vec<KeyPoint>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(parse_summary(&json)?)
}

fn print_report(source: &str, report: &DecodeReport) {
    println!("📄 Source: {}", source);
    println!(
        "📏 Header: version {}, {} images declared, multiplier {} ms",
        report.header.version, report.header.image_count, report.header.timestamp_multiplier_ms
    );
    match report.scan_end {
        ScanEnd::SentinelFound { end_offset } => {
            println!("📦 Index closed by sentinel (end offset {})", end_offset)
        }
        ScanEnd::HeuristicStop => println!("⚠️  Index ran into image data, no sentinel"),
        ScanEnd::BufferExhausted => println!("⚠️  Index ran to end of buffer, no sentinel"),
    }

    println!("🖼️  {} frames decoded", report.frames.len());
    for (i, frame) in report.frames.iter().enumerate() {
        println!(
            "  [{:>4}] {:>9.2}s  {} bytes",
            i,
            frame.time_seconds,
            frame.payload.len()
        );
    }

    for diagnostic in &report.diagnostics {
        println!("  🔍 {:?}", diagnostic);
    }
}

fn print_windows(report: &DecodeReport, key_points: &[KeyPoint]) {
    println!("\n🎯 Preview windows for {} key points", key_points.len());
    for (i, point) in key_points.iter().enumerate() {
        let bounds = WindowBounds::around(point.timestamp_ms, DEFAULT_WINDOW_RADIUS_MS);
        let selected = select_frames(&report.frames, bounds);
        let kind = match selected.len() {
            0 => "no frames",
            1 => "static",
            _ => "animated",
        };
        println!(
            "  #{} [{}] {} ({}) -> {} frames, {}",
            i,
            format_timestamp(point.timestamp_ms),
            point.text,
            point.importance.name(),
            selected.len(),
            kind
        );
    }
}
