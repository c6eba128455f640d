use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

use vidlink::config::timeout_from_secs;
use vidlink::output::{Report, render_check, render_json, render_text};
use vidlink::resolve::ShortLinkResolver;
use vidlink::validate::is_supported_video_url;
use vidlink::{DetectError, PlatformDetector, VideoIdExtractor};

mod cli;

use cli::{Cli, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("vidlink.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidlink")
        .join("logs")
}

fn build_after_help() -> String {
    let log_path = log_dir().join("vidlink.log");
    let config_path = vidlink::config::config_path();
    let platforms = vidlink::get_supported_platforms().join(", ");

    format!(
        "\nSUPPORTED PLATFORMS:\n  {platforms}\n\nConfig is read from: {}\nLogs are written to: {}",
        config_path.display(),
        log_path.display()
    )
}

async fn inspect(
    detector: &PlatformDetector,
    extractor: &VideoIdExtractor,
    input: &str,
    extract: bool,
) -> Result<Report, DetectError> {
    let detection = detector.detect_platform(input, None).await?;

    let (video_id, extraction_error) = if extract {
        match extractor.extract_video_id(&detection, None).await {
            Ok(id) => (Some(id), None),
            Err(e) => {
                debug!("No video ID for {input}: {e}");
                (None, Some(e.to_string()))
            }
        }
    } else {
        (None, None)
    };

    Ok(Report {
        input: input.to_string(),
        detection,
        video_id,
        extraction_error,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = vidlink::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(OutputFormat::parse))
        .unwrap_or(OutputFormat::Text);
    let timeout = match cli.timeout {
        Some(secs) => match timeout_from_secs(secs) {
            Some(timeout) => Some(timeout),
            None => bail!("timeout must be a positive, representable number of seconds, got {secs}"),
        },
        None => config.timeout(),
    };

    if cli.verbose {
        let config_path = vidlink::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        if let Some(timeout) = timeout {
            debug!("Short link timeout: {timeout:?}");
        }
    }

    let mut resolver = ShortLinkResolver::new();
    if let Some(ref user_agent) = config.user_agent {
        resolver = resolver.user_agent(user_agent.clone());
    }
    let mut detector = PlatformDetector::with_resolver(resolver.clone());
    let mut extractor = VideoIdExtractor::new(resolver);
    if let Some(timeout) = timeout {
        detector = detector.timeout(timeout);
        extractor = extractor.timeout(timeout);
    }

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL provided\n\nUsage: vidlink <URL>\n       echo <URL> | vidlink");
    }

    let mut failures = 0;
    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }

        if cli.check {
            let supported = is_supported_video_url(url_input);
            debug!("Quick check for {url_input}: {supported}");
            if !supported {
                failures += 1;
            }
            println!("{}", render_check(url_input, supported, format == OutputFormat::Json));
            continue;
        }

        let outcome = inspect(&detector, &extractor, url_input, !cli.no_extract).await;

        if cli.verbose {
            match &outcome {
                Ok(report) => eprintln!(
                    "Input: {}\nPlatform: {} (confidence {:.2}, via {})\nResolved: {}",
                    report.input,
                    report.detection.platform(),
                    report.detection.confidence(),
                    report.detection.detection_method(),
                    report.detection.normalized_url(),
                ),
                Err(e) => eprintln!("Input: {url_input}\nFailed: {e} (code {})", e.code()),
            }
        }

        if outcome.is_err() {
            failures += 1;
        }

        let rendered = match format {
            OutputFormat::Text => render_text(&outcome),
            OutputFormat::Json => render_json(&outcome),
        };
        println!("{rendered}");
    }

    if failures > 0 {
        if cli.check {
            bail!("{failures} URL(s) failed the quick check");
        }
        bail!("{failures} URL(s) could not be recognized");
    }

    Ok(())
}
