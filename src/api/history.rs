//! Client of the history aggregation service.

#[cfg(test)]
pub mod fake;
pub mod models;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};

use self::models::{
    DataResponse,
    DetailedHistoryDatum,
    DetailedStatsDatum,
    HistoryDatum,
    HistoryRequest,
    SocStatsDatum,
    TemporalBounds,
    TimestampRangeRequest,
};
use crate::{api::client, prelude::*};

/// Pre-aggregated statistics provider.
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// 5-minute resolution history.
    async fn fetch_detailed_history(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<DetailedHistoryDatum>>;

    /// Daily, monthly, or yearly history.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<DataResponse<HistoryDatum>>;

    async fn fetch_soc_stats(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<SocStatsDatum>>;

    async fn fetch_detailed_stats(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<DetailedStatsDatum>>;

    async fn fetch_temporal_bounds(&self) -> Result<TemporalBounds>;
}

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    /// The endpoint paths are resolved under the base path, with or without its trailing slash.
    pub fn try_new(mut base_url: Url) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client: client::try_new()?, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).with_context(|| format!("failed to build the URL for `{path}`"))
    }

    #[instrument(skip_all, fields(path = path))]
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(%url, "posting…");
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to call `{path}`"))?
            .error_for_status()
            .with_context(|| format!("`{path}` failed"))?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the response from `{path}`"))
    }

    #[instrument(skip_all, fields(path = path))]
    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.url(path)?;
        debug!(%url, "getting…");
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to call `{path}`"))?
            .error_for_status()
            .with_context(|| format!("`{path}` failed"))?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the response from `{path}`"))
    }
}

#[async_trait]
impl HistoryApi for Api {
    async fn fetch_detailed_history(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<DetailedHistoryDatum>> {
        let response: DataResponse<DetailedHistoryDatum> =
            self.post("history/fetch/detailed", request).await?;
        info!(n_points = response.data.len(), "fetched the detailed history");
        Ok(response)
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<DataResponse<HistoryDatum>> {
        let response: DataResponse<HistoryDatum> = self.post("history/fetch", request).await?;
        info!(n_points = response.data.len(), granularity = ?request.granularity, "fetched the history");
        Ok(response)
    }

    async fn fetch_soc_stats(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<SocStatsDatum>> {
        let response: DataResponse<SocStatsDatum> =
            self.post("history/fetch/soc-stats", request).await?;
        info!(n_points = response.data.len(), "fetched the state-of-charge statistics");
        Ok(response)
    }

    async fn fetch_detailed_stats(
        &self,
        request: &TimestampRangeRequest,
    ) -> Result<DataResponse<DetailedStatsDatum>> {
        let response: DataResponse<DetailedStatsDatum> =
            self.post("history/fetch/detailed-stats", request).await?;
        info!(n_points = response.data.len(), "fetched the detailed statistics");
        Ok(response)
    }

    async fn fetch_temporal_bounds(&self) -> Result<TemporalBounds> {
        let bounds = self.get("history/fetch/temporal-bounds").await?;
        info!("fetched the temporal bounds");
        Ok(bounds)
    }
}
