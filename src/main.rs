use anyhow::Result;
use clap::Parser;
use fw_filter::cli::{Cli, ExtractorKind};
use fw_filter::config::Paths;
use fw_filter::dispatch::Dispatcher;
use fw_filter::download::CurlDownloader;
use fw_filter::logging;
use fw_filter::unpack::{BinwalkUnpacker, Unpacker, ZipUnpacker};
use std::io::Write;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let downloader = CurlDownloader::from_env();
    let binwalk = BinwalkUnpacker::from_env();
    let unpacker: &dyn Unpacker = match cli.extractor {
        ExtractorKind::Binwalk => &binwalk,
        ExtractorKind::Zip => &ZipUnpacker,
    };

    let dispatcher = Dispatcher {
        paths: Paths::resolve(&cli),
        downloader: &downloader,
        unpacker,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = dispatcher.run(&cli, &mut out)?;
    out.flush()?;

    tracing::debug!(?outcome, "done");
    Ok(())
}
