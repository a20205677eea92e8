//! Plain-text rendering for command output.

use std::fmt::Write as _;

use localpin_core::{
    bounding_box, present_all, recently_online_banner, CategoryFilter, DirectionsLinks,
    DiscoveryQuery, DiscoveryResult, VendorCard,
};
use localpin_geocode::Place;
use localpin_live::{OriginFix, SessionView};

pub(crate) fn origin_line(fix: &OriginFix) -> String {
    match &fix.fallback {
        None => format!("Origin: {}", fix.position),
        Some(reason) => format!("Origin: {} (default, {reason})", fix.position),
    }
}

pub(crate) fn card(card: &VendorCard) -> String {
    let mut out = format!(
        "{} [{}] {} ({})",
        card.display_name,
        card.category_label,
        card.status.label(),
        card.status.color()
    );
    if let Some(description) = &card.description {
        let _ = write!(out, "\n  {description}");
    }
    let location = match (&card.distance_label, &card.coordinates_label) {
        (Some(distance), Some(coordinates)) => format!("{distance} away at {coordinates}"),
        (None, Some(coordinates)) => coordinates.clone(),
        _ => "location unknown".to_string(),
    };
    let _ = write!(out, "\n  {location}");
    if let Some(url) = &card.directions_url {
        let _ = write!(out, "\n  Directions: {url}");
    }
    let _ = write!(out, "\n  Last updated: {}", card.last_updated_label);
    out
}

/// The full discovery report: frame, counts, banner and online vendor cards.
pub(crate) fn discovery(
    query: &DiscoveryQuery,
    result: &DiscoveryResult,
    links: &DirectionsLinks,
) -> String {
    let frame = bounding_box(query.origin, query.radius_km);
    let scope = match query.category {
        CategoryFilter::All => String::new(),
        CategoryFilter::Only(category) => format!("{} ", category.as_str()),
    };
    let mut out = format!(
        "Map frame: {} to {}\n{} {scope}vendor(s) within {} km, {} online\nRecently online: {}",
        frame.south_west,
        frame.north_east,
        result.in_range.len(),
        query.radius_km,
        result.online_in_range.len(),
        recently_online_banner(&result.recently_online),
    );

    if result.online_in_range.is_empty() {
        out.push_str("\nNo online vendors in range");
    }
    for vendor_card in present_all(&result.online_in_range, Some(query.origin), links) {
        let _ = write!(out, "\n\n{}", card(&vendor_card));
    }
    out
}

pub(crate) fn view(view: &SessionView, links: &DirectionsLinks) -> String {
    match view {
        SessionView::Pending => "Waiting for vendors...".to_string(),
        SessionView::Invalid(err) => format!("Invalid query: {err}"),
        SessionView::Ready {
            generation,
            stale,
            query,
            result,
        } => {
            let header = if *stale {
                format!("== snapshot {generation} (feed disconnected, showing last known vendors) ==")
            } else {
                format!("== snapshot {generation} ==")
            };
            format!("{header}\n{}", discovery(query, result, links))
        }
    }
}

pub(crate) fn places(query: &str, places: &[Place]) -> String {
    if places.is_empty() {
        return format!("No places found for \"{}\"", query.trim());
    }
    places
        .iter()
        .map(|place| format!("{}  {}", place.position, place.display_name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use localpin_core::{Category, Position, ValidationError, VendorRecord, VendorStatus};
    use localpin_live::{FallbackReason, PositionError};

    use super::*;

    const ORIGIN: Position = Position::new(28.61, 77.21);

    fn vendor(id: &str, name: &str, online: bool) -> VendorRecord {
        VendorRecord {
            id: id.to_string(),
            name: name.to_string(),
            category: Some(Category::Food),
            service_description: None,
            location: Some(Position::new(28.61, 77.2)),
            online,
            last_online_at: 0,
        }
    }

    fn query() -> DiscoveryQuery {
        DiscoveryQuery {
            origin: ORIGIN,
            radius_km: 5.0,
            category: CategoryFilter::Only(Category::Food),
        }
    }

    #[test]
    fn origin_line_marks_fallback() {
        let fix = OriginFix {
            position: Position::new(28.6139, 77.209),
            fallback: Some(FallbackReason::Failed(PositionError::PermissionDenied)),
        };
        assert_eq!(
            origin_line(&fix),
            "Origin: 28.6139,77.209 (default, permission to read the device position was denied)"
        );
        let exact = OriginFix {
            position: ORIGIN,
            fallback: None,
        };
        assert_eq!(origin_line(&exact), "Origin: 28.61,77.21");
    }

    #[test]
    fn card_lists_distance_and_directions() {
        let vendor_card = VendorCard {
            id: "v1".to_string(),
            display_name: "Chaat Corner".to_string(),
            category_label: "Food".to_string(),
            description: Some("Golgappe".to_string()),
            distance_km: Some(0.98),
            distance_label: Some("1.0 km".to_string()),
            coordinates_label: Some("28.6100, 77.2000".to_string()),
            directions_url: Some("https://maps.example.test/dir/?api=1&destination=28.61,77.2".to_string()),
            status: VendorStatus::Online,
            last_updated_label: "N/A".to_string(),
        };
        assert_eq!(
            card(&vendor_card),
            "Chaat Corner [Food] Online (green)\n  Golgappe\n  1.0 km away at 28.6100, 77.2000\n  Directions: https://maps.example.test/dir/?api=1&destination=28.61,77.2\n  Last updated: N/A"
        );
    }

    #[test]
    fn discovery_report_shows_banner_and_online_cards_only() {
        let result = DiscoveryResult {
            in_range: vec![vendor("v1", "Chaat Corner", true), vendor("v2", "", false)],
            online_in_range: vec![vendor("v1", "Chaat Corner", true)],
            recently_online: vec![vendor("v1", "Chaat Corner", true)],
        };
        let text = discovery(&query(), &result, &DirectionsLinks::default());
        assert!(text.contains("2 food vendor(s) within 5 km, 1 online"), "{text}");
        assert!(text.contains("Recently online: Chaat Corner"), "{text}");
        assert!(text.contains("Chaat Corner [Food] Online"), "{text}");
        assert!(!text.contains("[Food] Offline"), "{text}");
        assert!(text.starts_with("Map frame: "), "{text}");
    }

    #[test]
    fn empty_discovery_report() {
        let text = discovery(&query(), &DiscoveryResult::default(), &DirectionsLinks::default());
        assert!(text.contains("Recently online: No one online yet"), "{text}");
        assert!(text.ends_with("No online vendors in range"), "{text}");
    }

    #[test]
    fn session_views() {
        let links = DirectionsLinks::default();
        assert_eq!(view(&SessionView::Pending, &links), "Waiting for vendors...");
        assert_eq!(
            view(&SessionView::Invalid(ValidationError::InvalidRadius(0.0)), &links),
            "Invalid query: search radius must be a positive number of kilometres, got 0"
        );
        let stale = SessionView::Ready {
            generation: 3,
            stale: true,
            query: query(),
            result: DiscoveryResult::default(),
        };
        assert!(view(&stale, &links).starts_with("== snapshot 3 (feed disconnected"));
    }

    #[test]
    fn place_list() {
        assert_eq!(places("  Xyzzy ", &[]), "No places found for \"Xyzzy\"");
        let hit = Place {
            place_id: Some(1),
            display_name: "Saket, New Delhi".to_string(),
            position: Position::new(28.5245, 77.2066),
        };
        assert_eq!(places("Saket", &[hit]), "28.5245,77.2066  Saket, New Delhi");
    }
}
