use std::pin::pin;
use std::sync::Arc;

use localpin_core::{AppConfig, DirectionsLinks};
use localpin_live::{DiscoverySession, LiveVendorStore, SessionView};
use tokio::io::BufReader;
use tokio::sync::watch;

use crate::origin::resolve_cli_origin;
use crate::{feed, render, QueryArgs};

/// Feed stdin into a live store and print every view the session publishes,
/// until stdin closes or the process is interrupted.
///
/// # Errors
///
/// Returns an error if the origin cannot be resolved.
pub(crate) async fn run_watch(config: &AppConfig, args: &QueryArgs) -> anyhow::Result<()> {
    let fix = resolve_cli_origin(config, args, None).await?;
    println!("{}", render::origin_line(&fix));

    let store = LiveVendorStore::new();
    let session = DiscoverySession::new(&store, args.query(fix.position, config));
    let links = DirectionsLinks::new(&config.directions_base_url);
    let mut views = session.watch();
    print_view(&mut views, &links);

    tracing::info!(collection = %config.vendor_collection, "reading vendor feed from stdin");
    let feed = feed::line_feed(BufReader::new(tokio::io::stdin()));
    let mut run = pin!(store.run(feed, shutdown_signal()));

    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            Ok(()) = views.changed() => print_view(&mut views, &links),
        }
    };
    if views.has_changed().unwrap_or(false) {
        print_view(&mut views, &links);
    }

    tracing::info!(?outcome, "vendor feed finished");
    Ok(())
}

fn print_view(views: &mut watch::Receiver<Arc<SessionView>>, links: &DirectionsLinks) {
    let view = Arc::clone(&views.borrow_and_update());
    println!("{}\n", render::view(&view, links));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping vendor feed");
}
