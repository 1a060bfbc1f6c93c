use anyhow::{Context, Result};
use rand::Rng;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info};

use crate::{
    catalog::{normalize_operators, RawOperator, RawSkin, SkinIndex},
    config::AppConfig,
    models::Operator,
};

/// Fetches and shapes the three remote feeds.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: Client,
    config: AppConfig,
}

impl FeedLoader {
    /// Build a loader with the configured request timeout.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Operators from the agents feed, display names trimmed to the agent name.
    pub async fn load_operators(&self) -> Result<Vec<Operator>> {
        let records: Vec<RawOperator> = self
            .fetch_json(&self.config.operators_url)
            .await
            .context("failed to load operators")?;
        let operators = normalize_operators(records);
        info!(count = operators.len(), "Loaded operators");
        Ok(operators)
    }

    /// Weapon/skin index from the skins feed, with prices drawn from `rng`.
    pub async fn load_skins<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SkinIndex> {
        let records: Vec<RawSkin> = self
            .fetch_json(&self.config.skins_url)
            .await
            .context("failed to load skins")?;
        let index = SkinIndex::build(records, &self.config.excluded_weapon_prefixes, rng);
        info!(
            weapons = index.weapons.len(),
            skins = index.skins.len(),
            categories = index.category_order.len(),
            "Loaded skins"
        );
        Ok(index)
    }

    /// `count` usernames from the random-user feed.
    pub async fn load_random_names(&self, count: usize) -> Result<Vec<String>> {
        let url = names_url(&self.config.names_url, count);
        let response: RandomUserResponse = self
            .fetch_json(&url)
            .await
            .context("failed to load teammate names")?;
        let names = response.usernames();
        info!(count = names.len(), "Loaded teammate names");
        Ok(names)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "Fetching feed");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode response from {url}"))
    }
}

fn names_url(base: &str, count: usize) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}results={count}&inc=login")
}

#[derive(Debug, Default, Deserialize)]
struct RandomUserResponse {
    #[serde(default)]
    results: Vec<RandomUser>,
}

#[derive(Debug, Default, Deserialize)]
struct RandomUser {
    #[serde(default)]
    login: Option<RandomUserLogin>,
}

#[derive(Debug, Default, Deserialize)]
struct RandomUserLogin {
    #[serde(default)]
    username: String,
}

impl RandomUserResponse {
    fn usernames(self) -> Vec<String> {
        self.results
            .into_iter()
            .filter_map(|user| user.login)
            .map(|login| login.username.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}
