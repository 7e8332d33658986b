use anyhow::{Context, Result};
use reqwest::{header, Client, Response};

use super::types::*;
use crate::config::Config;

pub struct CaseClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl CaseClient {
    pub fn new(config: &Config) -> Result<Self> {
        let token = config.access_token.as_ref()
            .context("Access token not configured")?;

        let client = Client::builder()
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            auth_header: format!("Bearer {}", token.trim()),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "GET");

        let response = self.client
            .get(&url)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = check_status(response).await?;
        let result = response.json::<T>().await
            .with_context(|| format!("Unexpected response body from {}", endpoint))?;
        Ok(result)
    }

    async fn delete(&self, endpoint: &str) -> Result<()> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "DELETE");

        let response = self.client
            .delete(&url)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// List cases, passing the filters as query parameters
    /// (`created_from` / `created_to` carry the confirmed date range)
    pub async fn get_cases(&self, filters: &CaseFilters) -> Result<Vec<Case>> {
        let endpoint = format!("/api/cases{}", filters.query_string());
        let cases: Vec<Case> = self.get(&endpoint).await?;
        tracing::info!(count = cases.len(), "loaded cases");
        Ok(cases)
    }

    pub async fn get_case_detail(&self, case_id: i64) -> Result<CaseDetail> {
        self.get(&format!("/api/cases/{}", case_id)).await
    }

    pub async fn delete_case(&self, case_id: i64) -> Result<()> {
        self.delete(&format!("/api/cases/{}", case_id)).await?;
        tracing::info!(case_id, "deleted case");
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "API request failed");
    anyhow::bail!("API request failed: {} - {}", status, body);
}
