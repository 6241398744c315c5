use clap::Parser;
use site_pdf::{Mode, convert};
use std::process::ExitCode;

mod args;
use args::{Args, build_config};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();
    let mode = Mode::from(args.mode);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Note: Rendering requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using {}",
        config.webdriver_url
    );

    let start_time = std::time::Instant::now();
    let attachment = match convert(&config, &args.url, mode).await {
        Ok(attachment) => attachment,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| attachment.file_name.into());
    if let Err(e) = std::fs::write(&output, &attachment.bytes) {
        eprintln!("Failed to write {}: {}", output.display(), e);
        return ExitCode::FAILURE;
    }

    ::log::info!(
        "Wrote {} ({} bytes) in {:.2} seconds",
        output.display(),
        attachment.bytes.len(),
        start_time.elapsed().as_secs_f64()
    );
    ExitCode::SUCCESS
}
