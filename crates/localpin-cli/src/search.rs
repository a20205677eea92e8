use localpin_core::AppConfig;
use localpin_geocode::{GeocodeClient, MIN_QUERY_CHARS};

use crate::render;

/// Look up a place by name and print the matches.
///
/// # Errors
///
/// Returns an error if the geocoder cannot be reached or answers with
/// something other than a result list.
pub(crate) async fn run_search(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    if text.trim().chars().count() < MIN_QUERY_CHARS {
        println!("Type at least {MIN_QUERY_CHARS} characters to search");
        return Ok(());
    }
    let client = GeocodeClient::from_config(config)?;
    let places = client.search(text).await?;
    println!("{}", render::places(text, &places));
    Ok(())
}
