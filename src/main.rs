mod briefing;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use tinyweather_core::{App, AppError};
use tinyweather_forecast::{
    tone_by_id, CachePersistence, CacheSnapshotStore, CacheSweeper, NarrationClient,
    OpenMeteoClient, SharedWeatherCache, TONES,
};
use tinyweather_places::{IpLocator, NominatimClient, PlaceSearch, SearchHistory};

use crate::briefing::Briefing;

/// Weather briefings with ranked place search and tone-flavoured narration
#[derive(Parser, Debug)]
#[command(name = "tinyweather", version, about, long_about = None)]
struct Cli {
    /// Place to brief on (e.g. "New York")
    places: Vec<String>,

    /// Narration tone (see --tones)
    #[arg(short, long, value_name = "ID")]
    tone: Option<String>,

    /// Ask a follow-up question about the forecast
    #[arg(short, long, value_name = "QUESTION")]
    ask: Option<String>,

    /// List narration tones
    #[arg(long)]
    tones: bool,

    /// Show popular searches
    #[arg(long)]
    popular: bool,
}

impl Cli {
    fn query(&self) -> String {
        self.places.join(" ")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tinyweather_core::init()?;

    let cli = Cli::parse();

    if cli.tones {
        for tone in &TONES {
            println!("{} {:<13} {}", tone.emoji, tone.id, tone.description);
        }
        return Ok(());
    }

    if cli.popular {
        let app = App::new()?;
        let config = app.config();
        let history = SearchHistory::load(&config.search_history_path(), &config.history)?;
        for place in history.popular(5) {
            println!("{}", place);
        }
        return Ok(());
    }

    let query = cli.query();
    if query.trim().is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }
    let Cli {
        tone: tone_id,
        ask: question,
        ..
    } = cli;

    let mut app = App::new()?;
    let config = app.shared_config();

    let tone_id = tone_id.unwrap_or_else(|| config.narration.default_tone.clone());
    let Some(tone) = tone_by_id(&tone_id) else {
        bail!("Unknown tone \"{}\"; run with --tones to list them", tone_id);
    };

    let cache = SharedWeatherCache::default();
    app.register(Box::new(CachePersistence::new(
        CacheSnapshotStore::new(config.weather_cache_path()),
        cache.clone(),
    )));
    app.register(Box::new(CacheSweeper::new(cache.clone())));
    app.initialize()?;

    let history_path = config.search_history_path();
    let history = SearchHistory::load(&history_path, &config.history).unwrap_or_else(|e| {
        tracing::warn!("Starting with empty search history: {}", e);
        SearchHistory::new(&config.history)
    });

    let briefing = Briefing::new(
        PlaceSearch::from_config(NominatimClient::new(&config.search)?, &config.search),
        IpLocator::new(&config.location)?,
        OpenMeteoClient::new(&config.forecast)?,
        NarrationClient::new(&config.narration)?,
        cache,
        history,
    )
    .with_history_path(history_path);

    let outcome = briefing.run(&query, tone).await;
    if let Ok(report) = &outcome {
        println!("{}", report);
        if let Some(question) = &question {
            match briefing
                .narrator()
                .answer_follow_up(question, &report.snapshot, &report.location_label)
                .await
            {
                Ok(answer) => println!("Q: {}\nA: {}", question, answer),
                Err(e) => {
                    tracing::warn!("Follow-up failed: {}", e);
                    eprintln!("{}", e.user_message());
                }
            }
        }
    }

    app.shutdown()?;

    if let Err(e) = outcome {
        tracing::error!("Briefing failed: {}", e);
        eprintln!("{}", user_message(&e, &query));
        std::process::exit(1);
    }
    Ok(())
}

fn user_message(error: &AppError, query: &str) -> String {
    match error {
        AppError::Weather(tinyweather_core::WeatherError::LocationNotFound(_)) => {
            format!("No matches for \"{}\".", query.trim())
        }
        other => other.user_message().to_string(),
    }
}
