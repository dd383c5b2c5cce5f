//! Plain-text itinerary download

use super::TRAVEL_TIPS;
use crate::models::ItineraryBundle;
use crate::render::format_money;

const RULE: &str = "─────────────────────────────────────────────────────────────────";

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

/// Text summary of the whole trip
#[must_use]
pub fn render_text(bundle: &ItineraryBundle) -> String {
    let mut out = String::new();
    out.push_str("╔════════════════════════════════════════════════════════════════╗\n");
    out.push_str("║           🌍 YOUR PERSONALIZED TRIP ITINERARY 🌍              ║\n");
    out.push_str("╚════════════════════════════════════════════════════════════════╝\n");

    section(&mut out, "TRIP DETAILS");
    out.push_str(&format!("From: {}\n", bundle.from_place));
    out.push_str(&format!("To: {}\n", bundle.destination.label()));
    out.push_str(&format!("Start: {}\n", bundle.start_date.format("%Y-%m-%d")));
    out.push_str(&format!("Duration: {} days\n", bundle.num_days));
    out.push_str(&format!("Travelers: {} people\n", bundle.num_people));
    out.push_str(&format!(
        "Budget: {}\n",
        format_money(bundle.budget, &bundle.currency)
    ));

    section(&mut out, "RECOMMENDED ACCOMMODATIONS");
    if bundle.hotels.is_empty() {
        match &bundle.hotel_band {
            Some(band) => out.push_str(&format!("{}\n", band.empty_warning())),
            None => out.push_str("No hotels found.\n"),
        }
    }
    for hotel in &bundle.hotels {
        out.push_str(&format!(
            "★ {} - {}/night (Rating: {}/5)\n",
            hotel.name,
            format_money(hotel.price, &bundle.currency),
            hotel.rating
        ));
    }

    section(&mut out, "WHAT TO PACK");
    out.push_str(bundle.packing_tips.trim());
    out.push('\n');

    section(&mut out, "DAILY ITINERARIES");
    for plan in &bundle.day_plans {
        out.push_str(plan.text.trim_end());
        out.push_str("\n\n");
    }

    section(&mut out, "TOP ATTRACTIONS NOT TO MISS");
    for (i, attraction) in bundle.attractions.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            attraction.name,
            attraction.category
        ));
    }

    section(&mut out, "TRAVEL TIPS");
    for tip in TRAVEL_TIPS {
        out.push_str(&format!("• {tip}\n"));
    }

    out.push_str("\nGenerated with ❤️ by Itinerary Planner\n");
    out
}
