use clap::Parser;
use normalize_path::NormalizePath;
use resolve_path::PathResolveExt;

mod capture;
mod cli;
mod config;
mod decode;
mod error;
mod resolver;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let args = cli::CliArgs::parse();
    let source_url = args.source_url.clone();
    let output_path = args.output.resolve().normalize();

    config::init_config(args);

    let binary = config::get_config().resolver.binary.clone().unwrap();
    if !resolver::ytdlp::check_binary(&binary).await {
        log::warn!("{} is not runnable, resolution will fail", binary);
    }

    log::info!(
        "Capturing first frame of {} to {}",
        source_url,
        output_path.display()
    );

    capture::capture_frame(&source_url, &output_path).await;
}
