//! Weather lookup tool — current conditions from a text weather service.
//!
//! Issues a single `GET <base>/<city>?format=%C %t` against a wttr.in
//! compatible endpoint and wraps the one-line answer in a sentence.

use async_trait::async_trait;
use stepwise_core::error::ToolError;
use stepwise_core::session::SessionContext;
use stepwise_core::tool::{Tool, ToolResult, string_input};
use tracing::debug;

pub struct WeatherLookupTool {
    base_url: String,
    client: reqwest::Client,
}

impl WeatherLookupTool {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn build_url(&self, city: &str) -> Result<reqwest::Url, String> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("'{}' cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut().append_pair("format", "%C %t");
        Ok(url)
    }

    async fn fetch(&self, city: &str) -> Result<String, String> {
        let url = self.build_url(city)?;
        debug!(url = %url, "Fetching weather");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        response.text().await.map_err(|e| e.to_string())
    }
}

impl Default for WeatherLookupTool {
    fn default() -> Self {
        Self::new("https://wttr.in")
    }
}

#[async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the current weather conditions and temperature for a city."
    }

    fn input_description(&self) -> &str {
        "the city name, as a string"
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        _session: &mut SessionContext,
    ) -> Result<ToolResult, ToolError> {
        let city = string_input(self.name(), &input, "city")?;
        let city = city.trim();
        if city.is_empty() {
            return Err(ToolError::InvalidInput {
                tool_name: self.name().into(),
                reason: "empty city".into(),
            });
        }

        match self.fetch(city).await {
            Ok(text) => Ok(ToolResult::ok(format!(
                "The weather in {city} is {}.",
                text.trim()
            ))),
            Err(e) => Ok(ToolResult::failed(format!("Error fetching weather: {e}"))),
        }
    }
}
