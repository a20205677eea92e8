use std::path::Path;

use anyhow::Context;
use localpin_core::{
    bounding_box, discover, normalize_snapshot, present_all, recently_online_banner, AppConfig,
    DirectionsLinks,
};

use crate::origin::resolve_cli_origin;
use crate::{feed, render, QueryArgs};

/// One-shot discovery over a vendor snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the origin cannot
/// be resolved, or the query is invalid.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    vendors_path: &Path,
    place: Option<&str>,
    args: &QueryArgs,
    json: bool,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(vendors_path)
        .await
        .with_context(|| format!("failed to read {}", vendors_path.display()))?;
    let docs = feed::parse_snapshot(&text)
        .with_context(|| format!("failed to parse {}", vendors_path.display()))?;
    let vendors = normalize_snapshot(&docs);
    tracing::debug!(vendors = vendors.len(), "vendor snapshot loaded");

    let fix = resolve_cli_origin(config, args, place).await?;
    let query = args.query(fix.position, config);
    let result = discover(&vendors, &query)?;
    let links = DirectionsLinks::new(&config.directions_base_url);

    if json {
        let report = serde_json::json!({
            "origin": fix.position,
            "origin_fallback": fix.fallback.as_ref().map(ToString::to_string),
            "radius_km": query.radius_km,
            "category": query.category.to_string(),
            "frame": bounding_box(query.origin, query.radius_km),
            "in_range": result.in_range.len(),
            "recently_online": recently_online_banner(&result.recently_online),
            "online": present_all(&result.online_in_range, Some(fix.position), &links),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::origin_line(&fix));
        println!("{}", render::discovery(&query, &result, &links));
    }
    Ok(())
}
