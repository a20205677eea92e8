use std::time::Duration;

use anyhow::bail;
use localpin_core::AppConfig;
use localpin_geocode::GeocodeClient;
use localpin_live::{resolve_origin, OriginFix, UnavailablePosition};

use crate::QueryArgs;

/// Work out the discovery origin for a command.
///
/// Explicit coordinates win, then a place search; with neither, the origin
/// goes through the device-position path, which on the command line always
/// falls back to the configured default.
///
/// # Errors
///
/// Returns an error if the place search fails or finds nothing.
pub(crate) async fn resolve_cli_origin(
    config: &AppConfig,
    args: &QueryArgs,
    place: Option<&str>,
) -> anyhow::Result<OriginFix> {
    if let Some(position) = args.position() {
        return Ok(OriginFix {
            position,
            fallback: None,
        });
    }

    if let Some(text) = place {
        let client = GeocodeClient::from_config(config)?;
        let places = client.search(text).await?;
        let Some(best) = places.into_iter().next() else {
            bail!("no place found for \"{}\"", text.trim());
        };
        tracing::info!(place = %best.display_name, position = %best.position, "origin resolved by place search");
        return Ok(OriginFix {
            position: best.position,
            fallback: None,
        });
    }

    Ok(resolve_origin(
        &UnavailablePosition::default(),
        Duration::from_secs(config.position_timeout_secs),
        config.default_origin,
    )
    .await)
}
