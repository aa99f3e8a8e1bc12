//! Command-line client: opens a session against a REST backend and logs the
//! reference chain, its variant columns and the initial viewer commands.

use std::sync::Arc;

use msalink::options::Options;
use msalink::selection::ResidueRange;
use msalink::session::Session;
use msalink::source::HttpSource;
use msalink::sync::{HighlightStyle, RenderSurface};

/// Surface that logs every command instead of drawing.
struct LogSurface;

impl RenderSurface for LogSurface {
    fn show(&mut self, chain_id: &str) {
        log::info!("show {chain_id}");
    }

    fn hide(&mut self, chain_id: &str) {
        log::info!("hide {chain_id}");
    }

    fn highlight(
        &mut self,
        chain_id: &str,
        range: ResidueRange,
        style: HighlightStyle,
    ) {
        log::info!(
            "highlight {chain_id} {}..={} ({style:?})",
            range.start,
            range.end
        );
    }

    fn clear_highlight(&mut self, chain_id: &str) {
        log::info!("clear highlight {chain_id}");
    }

    fn center_on(&mut self, chain_id: &str) {
        log::info!("center on {chain_id}");
    }

    fn show_ligands(&mut self, chain_id: &str) {
        log::info!("show ligands {chain_id}");
    }
}

fn load_options() -> Options {
    let Ok(path) = std::env::var("MSALINK_OPTIONS") else {
        return Options::default();
    };
    match Options::load(std::path::Path::new(&path)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let Some(chain_id) = std::env::args().nth(1) else {
        log::error!("Usage: msalink <CHAIN_ID> [BASE_URL]");
        std::process::exit(1);
    };

    let mut options = load_options();
    if let Some(base_url) = std::env::args().nth(2) {
        options.source.base_url = base_url;
    }

    let source = Arc::new(HttpSource::new(&options.source));
    let mut session = match Session::open(source, options, &chain_id) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Some(reference) = session.reference() {
        log::info!(
            "{} ({}) ec={} pfam={} uniprot={}",
            reference.chain_id,
            reference.title.as_deref().unwrap_or("untitled"),
            reference.ec.as_deref().unwrap_or("-"),
            reference.pfam.as_deref().unwrap_or("-"),
            reference.uniprot.as_deref().unwrap_or("-"),
        );
    }

    log::info!(
        "previous {} next {} ({} representatives)",
        session.neighbours(-1).unwrap_or("-"),
        session.neighbours(1).unwrap_or("-"),
        session.representative_chain_ids().len()
    );
    for alert in session.alerts() {
        log::warn!("{}", alert.message);
    }

    let alignment = session.alignment();
    let variants: Vec<usize> = alignment.variant_columns().collect();
    log::info!(
        "{} sequences, {} columns, {} variant columns: {variants:?}",
        alignment.sequence_count(),
        alignment.column_count(),
        variants.len()
    );
    for track in session.feature_tracks() {
        log::info!("track {:?}: {} points", track.name, track.points.len());
    }

    let _ = session.pump(&mut LogSurface);
}
