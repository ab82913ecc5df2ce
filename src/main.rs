use clap::Parser;
use scrape_rows::{
    ClientConfig, ExportFormat, HttpBackend, ScrapeController, ScrapeError, SessionView,
    Transition,
};
use scrape_rows::utils::sanitize_filename;
use std::path::PathBuf;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    let backend = match HttpBackend::new(&config) {
        Ok(backend) => backend,
        Err(e) => {
            ::log::error!("Failed to set up backend client: {}", e);
            std::process::exit(2);
        }
    };

    ::log::info!("Using backend at {}", backend.base_url());
    let controller = ScrapeController::from_config(backend, &config);

    if let Err(e) = run(&args, &config, &controller).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Config file, then environment, then command-line flags
fn load_config(args: &Args) -> Result<ClientConfig, scrape_rows::ConfigError> {
    let config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    let mut config = config
        .apply_env()
        .with_backend_override(args.backend_url.clone());
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(out) = &args.out {
        config.export_dir = out.clone();
    }

    // Fail early on an unusable URL
    config.base_url()?;
    Ok(config)
}

async fn run(
    args: &Args,
    config: &ClientConfig,
    controller: &ScrapeController<HttpBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.scrape_request();
    let start_time = std::time::Instant::now();

    controller.scrape(request).await?;
    ::log::info!(
        "Scrape settled in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    if let Some(term) = &args.search {
        controller.search(term.clone()).await;
    }
    if args.page != 1 && controller.goto_page(args.page).await == Transition::Ignored {
        ::log::warn!("Page {} is out of range, showing page 1", args.page);
    }

    if args.summary {
        // A failed summary still leaves the table to print
        if let Err(e) = controller.summarize().await {
            eprintln!("Failed to generate AI summary: {e}");
        }
    }

    controller
        .with_session(|session| {
            print_view(&session.view());
            let lines = session.summary_lines();
            if !lines.is_empty() {
                println!("\nAI Summary");
                for line in lines {
                    println!("  {line}");
                }
            }
        })
        .await;

    if let Some(query) = &args.semantic {
        match controller.semantic_search(query).await {
            Ok(matches) => {
                println!("\nClosest matches for '{query}':");
                for (i, chunk) in matches.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, chunk);
                }
            }
            Err(e @ ScrapeError::Unsupported(_)) => eprintln!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(format) = args.export {
        let format = ExportFormat::from(format);
        let payload = controller.export(format).await?;
        let mut filename = sanitize_filename(&payload.filename);
        if filename.is_empty() {
            filename = format.default_filename().to_string();
        }
        let path = PathBuf::from(&config.export_dir).join(filename);
        std::fs::write(&path, &payload.bytes)?;
        println!("\nSaved {} export to {}", format, path.display());
    }

    Ok(())
}

/// Print the visible window as a plain-text table
fn print_view(view: &SessionView<'_>) {
    if view.total_rows == 0 {
        println!("No content extracted.");
        return;
    }

    println!("{:<10} | {:<40} | Content", "Type", "Page");
    println!("{}", "-".repeat(80));
    for row in &view.visible {
        println!(
            "{:<10} | {:<40} | {}",
            row.kind.display_name(),
            row.page,
            row.content
        );
    }

    println!(
        "\nPage {} of {} ({} of {} rows match '{}')",
        view.page_number, view.total_pages, view.matched_rows, view.total_rows, view.search_term
    );
}
