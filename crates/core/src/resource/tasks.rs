use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{catalog::SkinIndex, models::Operator};

use super::loader::FeedLoader;

/// Outcome of one background feed load.
#[derive(Debug)]
pub enum LoadEvent {
    /// The agents feed finished.
    Operators(Result<Vec<Operator>>),
    /// The skins feed finished.
    Skins(Result<SkinIndex>),
    /// The random-user feed finished.
    Names(Result<Vec<String>>),
}

impl LoadEvent {
    /// Short feed label for status lines.
    pub fn feed(&self) -> &'static str {
        match self {
            LoadEvent::Operators(_) => "operators",
            LoadEvent::Skins(_) => "skins",
            LoadEvent::Names(_) => "names",
        }
    }

    /// Whether the load failed.
    pub fn is_err(&self) -> bool {
        match self {
            LoadEvent::Operators(result) => result.is_err(),
            LoadEvent::Skins(result) => result.is_err(),
            LoadEvent::Names(result) => result.is_err(),
        }
    }
}

/// Spawn the three feed loads; each sends exactly one [`LoadEvent`].
///
/// `price_seed` seeds the generator used for weapon prices so that a fixed
/// session seed gives reproducible prices.
pub fn spawn_loads(loader: FeedLoader, price_seed: Option<u64>, sender: mpsc::Sender<LoadEvent>) {
    let operators = loader.clone();
    let tx = sender.clone();
    tokio::spawn(async move {
        let result = operators.load_operators().await;
        deliver(&tx, LoadEvent::Operators(result)).await;
    });

    let skins = loader.clone();
    let tx = sender.clone();
    tokio::spawn(async move {
        let mut rng = match price_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let result = skins.load_skins(&mut rng).await;
        deliver(&tx, LoadEvent::Skins(result)).await;
    });

    tokio::spawn(async move {
        let count = loader.config().teammate_count;
        let result = loader.load_random_names(count).await;
        deliver(&sender, LoadEvent::Names(result)).await;
    });
}

async fn deliver(sender: &mpsc::Sender<LoadEvent>, event: LoadEvent) {
    let feed = event.feed();
    if let LoadEvent::Operators(Err(err))
    | LoadEvent::Skins(Err(err))
    | LoadEvent::Names(Err(err)) = &event
    {
        error!("Loading {feed} failed: {err:#}");
    }
    if sender.send(event).await.is_err() {
        info!("Dropping {feed} load result; receiver closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn unreachable_feeds_report_failures() {
        let config = AppConfig {
            operators_url: "http://127.0.0.1:9/agents.json".to_string(),
            skins_url: "http://127.0.0.1:9/skins.json".to_string(),
            names_url: "http://127.0.0.1:9/api/".to_string(),
            request_timeout_secs: 2,
            ..AppConfig::default()
        };
        let loader = FeedLoader::new(config).unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        spawn_loads(loader, Some(1), tx);

        let mut feeds = Vec::new();
        while let Some(event) = rx.recv().await {
            assert!(event.is_err());
            feeds.push(event.feed());
        }
        feeds.sort_unstable();
        assert_eq!(feeds, vec!["names", "operators", "skins"]);
    }
}
