//! Sequential planning pipeline
//!
//! One request drives every provider in a fixed order. Provider failures
//! degrade their section and never abort the run; only an invalid request
//! is rejected.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate, Utc};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{info, instrument, warn};

use crate::PlannerError;
use crate::config::{PlannerConfig, PlanningConfig};
use crate::content::llm::day_visual_prompt;
use crate::content::{Curator, LanguageModel, PlaceSearch, merge_attractions};
use crate::export::{ImageEmbedder, build_document};
use crate::geocoding::DestinationResolver;
use crate::hotels::HotelFinder;
use crate::http::Timeouts;
use crate::images::ImageResolver;
use crate::models::itinerary::MAX_DAYS;
use crate::models::{BudgetBand, DayPlan, DestinationCandidate, ItineraryBundle, TripRequest};
use crate::news::NewsFeed;
use crate::recommendations::{PackingAdvisor, day_plans};
use crate::weather::WeatherClient;

/// User-facing pipeline steps with their progress percentage
const STEPS: [(u8, &str); 9] = [
    (10, "📍 Finding your destination..."),
    (25, "🌤️ Fetching weather forecast..."),
    (40, "🎭 Discovering attractions..."),
    (50, "🏄 Finding exciting activities..."),
    (60, "🏨 Finding best hotels in your budget..."),
    (75, "📸 Fetching beautiful images..."),
    (85, "🎯 Generating personalized recommendations..."),
    (90, "📰 Checking latest news..."),
    (95, "✍️ Creating your itinerary..."),
];

/// Weather, place search, hotels and news
const PIPELINE_REQUEST_CALLS: u32 = 4;
/// Curated attractions, activities and packing tips
const PIPELINE_MODEL_CALLS: u32 = 3;
/// Unsplash, the DuckDuckGo token and search, then Wikipedia
const IMAGE_CALLS_PER_ITEM: u32 = 4;
/// Local work on top of the provider calls
const BUDGET_MARGIN: Duration = Duration::from_secs(30);

/// Longest a single web request may take when every provider hangs until
/// its timeout, covering both the planning run and the document export.
#[must_use]
pub fn request_budget(config: &PlannerConfig) -> Duration {
    let timeouts = Timeouts::from(&config.http);
    let retries = config.http.max_retries;
    let request = Timeouts::with_retries(timeouts.request, retries);
    let model = Timeouts::with_retries(timeouts.llm, retries);
    let image = Timeouts::with_retries(timeouts.image, retries);

    let image_items = (config.planning.max_attractions + config.planning.activities) as u32;
    let pipeline = request * PIPELINE_REQUEST_CALLS
        + model * PIPELINE_MODEL_CALLS
        + image * (IMAGE_CALLS_PER_ITEM * image_items);

    let embedded_images = 1 + MAX_DAYS + config.planning.max_attractions as u32;
    let document = request * embedded_images;

    pipeline.max(document).max(model) + BUDGET_MARGIN
}

fn step(index: usize) {
    let (progress, message) = STEPS[index];
    info!(progress, "{}", message);
}

#[derive(Clone)]
pub struct Planner {
    resolver: DestinationResolver,
    weather: WeatherClient,
    model: LanguageModel,
    curator: Curator,
    places: PlaceSearch,
    hotels: HotelFinder,
    images: ImageResolver,
    packing: PackingAdvisor,
    news: NewsFeed,
    embedder: ImageEmbedder,
    planning: PlanningConfig,
}

impl Planner {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        let model = LanguageModel::new(client.clone(), config);
        Self {
            resolver: DestinationResolver::new(client.clone(), config),
            weather: WeatherClient::new(client.clone(), config),
            curator: Curator::new(model.clone()),
            places: PlaceSearch::new(client.clone(), config),
            hotels: HotelFinder::new(client.clone(), config),
            images: ImageResolver::from_config(client.clone(), config),
            packing: PackingAdvisor::new(model.clone()),
            news: NewsFeed::new(client.clone(), config),
            embedder: ImageEmbedder::new(client, config),
            model,
            planning: config.planning.clone(),
        }
    }

    /// Destination candidates for the form's search box
    pub async fn search_destinations(&self, query: &str) -> Vec<DestinationCandidate> {
        self.resolver.search(query).await
    }

    /// Validate against the local date, then run the pipeline
    pub async fn plan(&self, request: &TripRequest) -> Result<ItineraryBundle, PlannerError> {
        self.plan_on(request, Local::now().date_naive()).await
    }

    /// Run the whole pipeline for a request, treating `today` as the
    /// earliest valid start date
    #[instrument(skip_all, fields(from = %request.from_place))]
    pub async fn plan_on(
        &self,
        request: &TripRequest,
        today: NaiveDate,
    ) -> Result<ItineraryBundle, PlannerError> {
        let destination = request.validate(today)?.clone();
        let place = destination.name.clone();
        let start_time = Instant::now();
        let mut warnings = Vec::new();

        step(0);
        info!("Planning {} days in {}", request.num_days, destination.label());

        step(1);
        let weather = self.weather.forecast(&destination).await;

        step(2);
        let curated = self
            .curator
            .attractions(&place, self.planning.curated_attractions)
            .await;
        let nearby = self
            .places
            .attractions(&destination, self.planning.place_attractions)
            .await;
        let attractions = merge_attractions(curated, nearby, self.planning.max_attractions);

        step(3);
        let activities = self.curator.activities(&place, self.planning.activities).await;

        step(4);
        let hotel_band = BudgetBand::from_budget(request.budget, request.num_days);
        let hotels = match &hotel_band {
            Some(band) => {
                let hotels = self.hotels.search(&place, band, request.num_people).await;
                if hotels.is_empty() {
                    warn!("No hotels inside the nightly budget band");
                    warnings.push(band.empty_warning());
                }
                hotels
            }
            None => Vec::new(),
        };

        step(5);
        let mut images = self.images.resolve(&attractions).await;
        images.extend(self.images.resolve(&activities).await);

        step(6);
        let packing_tips = self
            .packing
            .packing_tips(weather.as_ref(), request.num_days)
            .await;

        step(7);
        let news = self.news.latest(&place).await;

        step(8);
        let day_plans = day_plans(
            &place,
            request.start_date,
            request.num_days,
            &attractions,
            weather.as_ref(),
        );

        info!(
            progress = 100,
            "✅ Itinerary ready in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(ItineraryBundle {
            from_place: request.from_place.trim().to_string(),
            destination,
            start_date: request.start_date,
            num_days: request.num_days,
            num_people: request.num_people,
            budget: request.budget,
            currency: self.planning.currency.clone(),
            weather,
            attractions,
            activities,
            hotels,
            hotel_band,
            packing_tips,
            day_plans,
            images,
            day_visuals: Default::default(),
            news,
            warnings,
            generated_at: Utc::now(),
        })
    }

    /// Generate the travel visual for one day plan
    #[instrument(skip_all, fields(day = plan.day))]
    pub async fn day_visual(&self, plan: &DayPlan) -> Result<String, PlannerError> {
        if !self.model.is_configured() {
            return Err(PlannerError::config(
                "Image generation needs OPENAI_API_KEY to be configured",
            ));
        }
        let prompt = day_visual_prompt(&plan.location, &plan.highlight);
        self.model.generate_image(&prompt).await.map_err(|e| {
            warn!("Day visual error: {:#}", e);
            PlannerError::api("Could not generate image.")
        })
    }

    /// Printable document with embedded images
    pub async fn document(&self, bundle: &ItineraryBundle) -> String {
        build_document(bundle, &self.embedder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::itinerary::fixtures::request;

    /// Every provider pointed at a closed local port, all keys set
    fn offline_planner() -> Planner {
        let mut config = PlannerConfig::default();
        let offline = "http://127.0.0.1:9";
        for provider in [
            &mut config.providers.geocoding,
            &mut config.providers.forecast,
            &mut config.providers.openai,
            &mut config.providers.geoapify,
            &mut config.providers.serpapi,
            &mut config.providers.unsplash,
            &mut config.providers.duckduckgo,
            &mut config.providers.news,
        ] {
            provider.base_url = offline.to_string();
            provider.api_key = Some("test-key".to_string());
        }
        config.providers.wikipedia.base_url = format!("{offline}/w/api.php");
        let client = crate::http::build_client(&config.http).unwrap();
        Planner::new(client, &config)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_offline_pipeline_degrades_every_section() {
        let planner = offline_planner();
        let bundle = planner.plan_on(&request(), today()).await.unwrap();

        assert!(bundle.weather.is_none());
        assert_eq!(bundle.attractions.len(), 1);
        assert_eq!(bundle.attractions[0].name, "Check out Paris");
        assert_eq!(bundle.activities[0].name, "Walking Tour");
        assert!(bundle.hotels.is_empty());
        assert_eq!(bundle.warnings.len(), 1);
        assert!(bundle.warnings[0].starts_with("No hotels found strictly between"));
        assert_eq!(bundle.images.len(), 2);
        assert!(bundle.images["Walking Tour"].starts_with("https://placehold.co/"));
        assert_eq!(bundle.packing_tips, crate::recommendations::GENERIC_PACKING_TIPS);
        assert!(bundle.news.is_empty());
        assert!(bundle.day_plans.is_empty());
        assert_eq!(bundle.currency, "INR");
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let planner = offline_planner();
        let mut request = request();
        request.destination = None;
        let err = planner.plan_on(&request, today()).await.unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_day_visual_failure_is_api_error() {
        let planner = offline_planner();
        let plan = DayPlan {
            day: 1,
            date: today(),
            text: String::new(),
            highlight: "visiting Louvre Museum".to_string(),
            location: "Paris".to_string(),
            weather: String::new(),
        };
        let err = planner.day_visual(&plan).await.unwrap_err();
        assert!(matches!(err, PlannerError::Api { .. }));
    }

    #[test]
    fn test_request_budget_covers_hanging_providers() {
        let config = PlannerConfig::default();
        let worst_case = Duration::from_secs(4 * 5 + 3 * 60 + 16 * 4 * 3);
        let budget = request_budget(&config);
        assert!(budget > worst_case);
        assert_eq!(budget, worst_case + BUDGET_MARGIN);
    }

    #[test]
    fn test_request_budget_grows_with_retries() {
        let mut config = PlannerConfig::default();
        let single_shot = request_budget(&config);
        config.http.max_retries = 2;
        assert!(request_budget(&config) > single_shot * 3);
    }

    #[tokio::test]
    async fn test_offline_destination_search_is_empty() {
        assert!(offline_planner().search_destinations("Paris").await.is_empty());
    }
}
