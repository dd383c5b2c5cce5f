//! Paginated printable document with embedded images
//!
//! Images are downloaded and inlined as base64 data URIs so the file is
//! self-contained. A failed download drops that image (and its gallery
//! entry) instead of failing the document.

use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::http::Timeouts;
use crate::models::ItineraryBundle;
use crate::render::{escape_html, format_money, markdown_to_html};

const GALLERY_SUMMARY_CHARS: usize = 200;

const DOCUMENT_STYLE: &str = r#"<style>
@page { size: letter; margin: 0.5in; }
body { font-family: Helvetica, Arial, sans-serif; color: #2c3e50; font-size: 11pt; line-height: 1.45; }
h1 { text-align: center; font-size: 26pt; margin-bottom: 4px; }
.subtitle { text-align: center; font-style: italic; margin-top: 0; }
h2 { color: #e67e22; font-size: 18pt; margin-top: 20px; }
h3 { color: #34495e; font-size: 14pt; }
.cover { display: block; width: 6in; max-width: 100%; margin: 16px auto; }
table { border-collapse: collapse; }
.details td { padding: 10px; font-size: 12pt; }
.details td:first-child { background: #ecf0f1; font-weight: bold; width: 2.5in; }
.hotels th { background: #3498db; color: white; padding: 8px 12px; }
.hotels td { border: 1px solid #bdc3c7; padding: 6px 12px; text-align: center; }
.hotels tr:nth-child(odd) td { background: #f0f2f6; }
.visual { border: 1px solid #bdc3c7; width: 5.5in; max-width: 100%; display: block; margin: 8px auto 2px; }
.caption { text-align: center; font-style: italic; }
.keep { break-inside: avoid; page-break-inside: avoid; margin-bottom: 0.3in; }
.gallery img { width: 4in; max-width: 100%; }
.muted { color: gray; }
.page-break { break-after: page; page-break-after: always; }
</style>"#;

const PAGE_BREAK: &str = "<div class=\"page-break\"></div>\n";

/// Downloads images and inlines them as data URIs
#[derive(Clone)]
pub struct ImageEmbedder {
    client: ClientWithMiddleware,
    timeout: Duration,
}

impl ImageEmbedder {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            timeout: Timeouts::from(&config.http).request,
        }
    }

    /// `data:` URI of the image at `url`; `None` when it cannot be fetched
    pub async fn embed(&self, url: &str) -> Option<String> {
        if url.starts_with("data:") {
            return Some(url.to_string());
        }
        match self.embed_call(url).await {
            Ok(data_uri) => Some(data_uri),
            Err(e) => {
                warn!("Document image fetch error for {}: {:#}", url, e);
                None
            }
        }
    }

    async fn embed_call(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| v.starts_with("image/"))
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            bail!("Empty image body");
        }
        debug!("Embedded {} bytes of {}", bytes.len(), mime);
        Ok(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)))
    }
}

/// Build the document, fetching every image through `embedder`
#[instrument(skip_all, fields(destination = %bundle.to_place()))]
pub async fn build_document(bundle: &ItineraryBundle, embedder: &ImageEmbedder) -> String {
    let start_time = Instant::now();
    let place = escape_html(bundle.to_place());
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Trip to {place}</title>\n{DOCUMENT_STYLE}\n</head>\n<body>\n"
    ));

    // Title and cover
    html.push_str(&format!(
        "<h1>✈️ Trip to {place} 🌍</h1>\n<p class=\"subtitle\">Your Personalized Itinerary</p>\n"
    ));
    if let Some(cover) = bundle.cover_image()
        && let Some(data) = embedder.embed(cover).await
    {
        html.push_str(&format!("<img class=\"cover\" src=\"{data}\" alt=\"\">\n"));
    }

    // Trip summary
    html.push_str("<h2>Trip Summary</h2>\n<table class=\"details\">\n");
    for (label, value) in [
        ("📍 From:", bundle.from_place.clone()),
        ("📍 To:", bundle.destination.label()),
        ("📅 Start:", bundle.start_date.format("%Y-%m-%d").to_string()),
        ("📅 Duration:", format!("{} days", bundle.num_days)),
        ("👥 Travelers:", format!("{} people", bundle.num_people)),
        ("💰 Budget:", format_money(bundle.budget, &bundle.currency)),
    ] {
        html.push_str(&format!(
            "<tr><td>{label}</td><td>{}</td></tr>\n",
            escape_html(&value)
        ));
    }
    html.push_str("</table>\n");

    if !bundle.hotels.is_empty() {
        html.push_str("<h2>🏨 Recommended Hotels</h2>\n<table class=\"hotels\">\n<tr><th>Hotel Name</th><th>Price/Night</th><th>Rating</th></tr>\n");
        for hotel in &bundle.hotels {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}/5</td></tr>\n",
                escape_html(&hotel.name),
                format_money(hotel.price, &bundle.currency),
                hotel.rating
            ));
        }
        html.push_str("</table>\n");
    }

    html.push_str("<h2>🎒 What to Pack</h2>\n");
    html.push_str(&markdown_to_html(&bundle.packing_tips));
    html.push_str(PAGE_BREAK);

    // Daily itinerary
    html.push_str("<h2>📅 Daily Itinerary</h2>\n");
    for plan in &bundle.day_plans {
        html.push_str(&format!(
            "<h3>Day {}: {}</h3>\n",
            plan.day,
            escape_html(&plan.location)
        ));
        html.push_str(&markdown_to_html(&plan.text));
        if let Some(url) = bundle.day_visuals.get(&plan.day)
            && let Some(data) = embedder.embed(url).await
        {
            html.push_str(&format!(
                "<img class=\"visual\" src=\"{data}\" alt=\"\">\n<p class=\"caption\">AI Visual for Day {}</p>\n",
                plan.day
            ));
        }
    }
    html.push_str(PAGE_BREAK);

    // Gallery; attractions without a fetchable image are left out
    html.push_str("<h2>📸 Attractions Gallery</h2>\n<div class=\"gallery\">\n");
    let mut gallery_items = 0;
    for attraction in &bundle.attractions {
        let Some(url) = bundle.images.get(&attraction.name) else {
            continue;
        };
        let Some(data) = embedder.embed(url).await else {
            continue;
        };
        let summary: String = attraction.summary.chars().take(GALLERY_SUMMARY_CHARS).collect();
        html.push_str(&format!(
            "<div class=\"keep\"><h3>{}</h3><p class=\"muted\">{}</p><img src=\"{data}\" alt=\"\"><p>{}...</p></div>\n",
            escape_html(&attraction.name),
            escape_html(&attraction.category),
            escape_html(&summary)
        ));
        gallery_items += 1;
    }
    html.push_str("</div>\n");

    if !bundle.news.is_empty() {
        html.push_str(PAGE_BREAK);
        html.push_str("<h2>📰 Latest News &amp; Updates</h2>\n");
        for article in &bundle.news {
            let source = if article.source.is_empty() {
                "Source"
            } else {
                article.source.as_str()
            };
            html.push_str(&format!(
                "<div class=\"keep\"><h3><a href=\"{}\">{}</a></h3><p class=\"muted\">{} • {}</p><p><i>{}</i></p></div>\n",
                escape_html(&article.url),
                escape_html(&article.title),
                escape_html(source),
                escape_html(article.published_date()),
                escape_html(&article.description)
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    info!(
        "Built document with {} gallery images in {:.3}s",
        gallery_items,
        start_time.elapsed().as_secs_f64()
    );
    html
}
