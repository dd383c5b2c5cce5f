//! HTML rendering of a generated itinerary
//!
//! Produces a self-contained result page with card grids for hotels,
//! attractions and activities. All provider text is escaped before it is
//! interpolated.

use chrono::Days;
use uuid::Uuid;

use crate::models::{ItineraryBundle, NewsArticle, PointOfInterest};

const ATTRACTION_IMAGE_FALLBACK: &str = "https://source.unsplash.com/400x300/?travel,landmark";
const ACTIVITY_IMAGE_FALLBACK: &str = "https://source.unsplash.com/400x300/?travel,fun";

/// Escape text for use in HTML element content and quoted attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace `**bold**` pairs in already escaped text
fn inline_bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut parts = text.split("**");
    let mut open = false;
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    let rest: Vec<&str> = parts.collect();
    let pairs = rest.len() / 2 * 2;
    for (i, part) in rest.iter().enumerate() {
        if i < pairs {
            out.push_str(if open { "</strong>" } else { "<strong>" });
            open = !open;
        } else {
            out.push_str("**");
        }
        out.push_str(part);
    }
    out
}

/// Minimal markdown for generated plan and packing text: `#` headings,
/// `-` bullets, `**bold**` and paragraphs
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for line in markdown.lines().map(str::trim) {
        let bullet = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
            .or_else(|| line.strip_prefix("• "));
        if bullet.is_none() && in_list {
            html.push_str("</ul>\n");
            in_list = false;
        }

        if line.is_empty() {
            continue;
        }
        if let Some(item) = bullet {
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{}</li>\n", inline_bold(&escape_html(item))));
            continue;
        }

        let level = line.chars().take_while(|&c| c == '#').count();
        if (1..=6).contains(&level) && line[level..].starts_with(' ') {
            let heading = inline_bold(&escape_html(line[level..].trim()));
            html.push_str(&format!("<h{level}>{heading}</h{level}>\n"));
        } else {
            html.push_str(&format!("<p>{}</p>\n", inline_bold(&escape_html(line))));
        }
    }

    if in_list {
        html.push_str("</ul>\n");
    }
    html
}

/// Amount with thousands separators; rupees get their symbol, other
/// currencies their code
#[must_use]
pub fn format_money(amount: u64, currency: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if currency.eq_ignore_ascii_case("INR") {
        format!("₹{grouped}")
    } else {
        format!("{grouped} {currency}")
    }
}

const PAGE_STYLE: &str = r#"<style>
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0 auto; max-width: 1100px; padding: 24px; color: #333; background: #f7f8fc; }
h1 { color: #667eea; }
h2 { border-top: 1px solid #ddd; padding-top: 18px; }
.warning { background: #fff3cd; border: 1px solid #ffe69c; padding: 10px 14px; border-radius: 8px; margin: 8px 0; }
.info { background: #e7f1ff; border-radius: 8px; padding: 12px 16px; }
.metrics { display: flex; gap: 16px; flex-wrap: wrap; }
.metric { background: white; border-radius: 10px; padding: 12px 18px; box-shadow: 0 2px 4px rgba(0,0,0,0.08); }
.metric .label { font-size: 12px; color: #777; }
.metric .value { font-size: 22px; font-weight: bold; }
table { border-collapse: collapse; width: 100%; background: white; }
th, td { border: 1px solid #e0e0e0; padding: 6px 10px; text-align: left; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; }
.carousel-container { display: flex; overflow-x: auto; gap: 20px; padding: 20px 0 40px 0; scroll-behavior: smooth; scrollbar-width: thin; scrollbar-color: #667eea #f0f2f6; }
.card { background: white; border-radius: 10px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); border: 1px solid #e0e0e0; overflow: hidden; }
.card img { width: 100%; height: 170px; object-fit: cover; }
.card .body { padding: 15px; }
.card a { text-decoration: none; color: #333; }
.poi { min-width: 300px; max-width: 300px; }
.category { font-size: 0.8rem; color: #e91e63; text-transform: uppercase; font-weight: bold; margin-bottom: 8px; }
.price { font-size: 18px; color: #28a745; font-weight: bold; }
.summary { font-size: 0.9rem; color: #555; line-height: 1.4; }
.day { display: grid; grid-template-columns: 3fr 2fr; gap: 20px; align-items: start; }
.day img { width: 100%; border-radius: 10px; }
.article { display: grid; grid-template-columns: 1fr 4fr; gap: 16px; margin-bottom: 18px; }
.article img { width: 100%; border-radius: 6px; }
.caption { font-size: 12px; color: #888; }
.downloads a { display: inline-block; margin-right: 12px; padding: 10px 18px; border-radius: 8px; background: #667eea; color: white; text-decoration: none; }
</style>"#;

const VISUAL_SCRIPT: &str = r#"<script>
async function generateVisual(button) {
  button.disabled = true;
  button.textContent = 'Creating unique visual...';
  const response = await fetch(button.dataset.url, { method: 'POST' });
  if (response.ok) {
    location.reload();
  } else {
    const body = await response.json().catch(() => ({ error: 'Could not generate image.' }));
    button.textContent = body.error || 'Could not generate image.';
  }
}
</script>"#;

fn summary_section(bundle: &ItineraryBundle) -> String {
    format!(
        "<h1>🌍 Your Trip to {to}</h1>\n<p>From <b>{from}</b> · starting {start} · {days} days · {people} travelers · budget {budget}</p>\n",
        to = escape_html(&bundle.destination.label()),
        from = escape_html(&bundle.from_place),
        start = bundle.start_date.format("%Y-%m-%d"),
        days = bundle.num_days,
        people = bundle.num_people,
        budget = format_money(bundle.budget, &bundle.currency),
    )
}

fn weather_section(bundle: &ItineraryBundle) -> String {
    let mut html = String::from("<h2>🌤️ Weather Forecast</h2>\n");
    let Some(weather) = &bundle.weather else {
        html.push_str("<p class=\"info\">Weather data is unavailable right now.</p>\n");
        return html;
    };

    if let Some(current) = &weather.current {
        html.push_str("<div class=\"metrics\">\n");
        for (label, value) in [
            ("Temperature", current.format_temperature()),
            ("Humidity", current.format_humidity()),
            ("Wind Speed", current.format_wind()),
            ("Conditions", current.condition().to_string()),
        ] {
            html.push_str(&format!(
                "<div class=\"metric\"><div class=\"label\">{label}</div><div class=\"value\">{}</div></div>\n",
                escape_html(&value)
            ));
        }
        html.push_str("</div>\n");
    }

    let rows = weather.daily.iter().take(bundle.num_days as usize);
    if !weather.daily.is_empty() {
        html.push_str("<h3>Daily Forecast</h3>\n<table>\n<tr><th>Date</th><th>Max Temp</th><th>Min Temp</th><th>Conditions</th></tr>\n");
        for (i, day) in rows.enumerate() {
            let date = bundle.start_date + Days::new(i as u64);
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                date.format("%Y-%m-%d"),
                day.temperature_max.map_or("–".to_string(), |t| format!("{t}°C")),
                day.temperature_min.map_or("–".to_string(), |t| format!("{t}°C")),
                day.condition()
            ));
        }
        html.push_str("</table>\n");
    }
    html
}

fn hotels_section(bundle: &ItineraryBundle) -> String {
    let mut html = String::from("<h2>🏨 Recommended Hotels</h2>\n");
    if bundle.hotels.is_empty() {
        html.push_str("<p class=\"info\">No hotels matched your strict budget criteria.</p>\n");
        return html;
    }
    html.push_str("<div class=\"grid\">\n");
    for hotel in &bundle.hotels {
        html.push_str(&format!(
            "<div class=\"card\"><img src=\"{image}\" alt=\"\"><div class=\"body\">\
<h4><a href=\"{link}\" target=\"_blank\">{name} 🔗</a></h4>\
<div>⭐ <b>{rating}</b> ({reviews} reviews)</div>\
<div class=\"price\">{price}/night</div>\
<p class=\"summary\">{address}</p></div></div>\n",
            image = escape_html(&hotel.image),
            link = escape_html(&hotel.link),
            name = escape_html(&hotel.name),
            rating = hotel.rating,
            reviews = hotel.reviews,
            price = format_money(hotel.price, &bundle.currency),
            address = escape_html(&hotel.address),
        ));
    }
    html.push_str("</div>\n");
    html
}

fn poi_cards(
    bundle: &ItineraryBundle,
    items: &[PointOfInterest],
    fallback_image: &str,
    link_to_wiki: bool,
) -> String {
    let mut html = String::from("<div class=\"carousel-container\">\n");
    for item in items {
        let image = bundle
            .images
            .get(&item.name)
            .map_or(fallback_image, String::as_str);
        let name = escape_html(&item.name);
        let title = if link_to_wiki {
            format!(
                "<a href=\"{}\" target=\"_blank\"><h3>{name} 🔗</h3></a>",
                escape_html(&item.wiki_url())
            )
        } else {
            format!("<h3>{name}</h3>")
        };
        html.push_str(&format!(
            "<div class=\"card poi\"><img src=\"{}\" alt=\"\"><div class=\"body\">{title}\
<div class=\"category\">{}</div><p class=\"summary\">{}</p></div></div>\n",
            escape_html(image),
            escape_html(&item.category),
            escape_html(&item.summary),
        ));
    }
    html.push_str("</div>\n");
    html
}

fn days_section(id: &Uuid, bundle: &ItineraryBundle) -> String {
    let mut html = String::from("<h2>📅 Daily Itineraries</h2>\n");
    if bundle.day_plans.is_empty() {
        html.push_str("<p class=\"info\">Daily plans need both a forecast and at least one attraction.</p>\n");
        return html;
    }
    for plan in &bundle.day_plans {
        let visual = match bundle.day_visuals.get(&plan.day) {
            Some(url) => format!(
                "<img src=\"{}\" alt=\"\"><div class=\"caption\">Day {} Vibes ✨</div>",
                escape_html(url),
                plan.day
            ),
            None => format!(
                "<p class=\"info\">🎨 Visualize this day!</p>\
<button data-url=\"/api/itineraries/{id}/days/{day}/visual\" onclick=\"generateVisual(this)\">✨ Generate Day {day} Visual</button>",
                day = plan.day
            ),
        };
        html.push_str(&format!(
            "<div class=\"day\"><div>{}</div><div>{visual}</div></div>\n",
            markdown_to_html(&plan.text)
        ));
    }
    html
}

fn news_item(article: &NewsArticle) -> String {
    let image = article.image.as_deref().map_or_else(
        || "📰".to_string(),
        |url| format!("<img src=\"{}\" alt=\"\">", escape_html(url)),
    );
    format!(
        "<div class=\"article\"><div>{image}</div><div><b><a href=\"{}\" target=\"_blank\">{}</a></b>\
<div class=\"caption\">{} • {}</div><p>{}</p></div></div>\n",
        escape_html(&article.url),
        escape_html(&article.title),
        escape_html(&article.source),
        escape_html(article.published_date()),
        escape_html(&article.description),
    )
}

/// Full result page for a stored itinerary
#[must_use]
pub fn render_itinerary(id: &Uuid, bundle: &ItineraryBundle) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Itinerary: {}</title>\n{PAGE_STYLE}\n{VISUAL_SCRIPT}\n</head>\n<body>\n",
        escape_html(bundle.to_place())
    ));

    html.push_str(&summary_section(bundle));
    for warning in &bundle.warnings {
        html.push_str(&format!("<div class=\"warning\">⚠️ {}</div>\n", escape_html(warning)));
    }
    html.push_str(&weather_section(bundle));
    html.push_str(&hotels_section(bundle));

    html.push_str("<h2>🎭 Top Attractions</h2>\n");
    html.push_str(&poi_cards(bundle, &bundle.attractions, ATTRACTION_IMAGE_FALLBACK, true));
    html.push_str("<h2>🏄 Exciting Activities</h2>\n");
    html.push_str(&poi_cards(bundle, &bundle.activities, ACTIVITY_IMAGE_FALLBACK, false));

    html.push_str("<h2>👕 What to Pack</h2>\n<div class=\"info\">");
    html.push_str(&markdown_to_html(&bundle.packing_tips));
    html.push_str("</div>\n");

    html.push_str(&days_section(id, bundle));

    if !bundle.news.is_empty() {
        html.push_str("<h2>📰 Latest News &amp; Updates</h2>\n");
        for article in &bundle.news {
            html.push_str(&news_item(article));
        }
    }

    html.push_str(&format!(
        "<h2>📥 Download Your Itinerary</h2>\n<div class=\"downloads\">\
<a href=\"/api/itineraries/{id}/export.html\">📄 Download Document</a>\
<a href=\"/api/itineraries/{id}/export.txt\">📝 Download Text</a></div>\n"
    ));
    html.push_str("</body>\n</html>\n");
    html
}
