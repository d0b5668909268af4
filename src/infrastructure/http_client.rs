// HTTP chart client backed by reqwest
use crate::application::ports::ChartClient;
use crate::domain::error::{DashboardError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReqwestChartClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestChartClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, target: &str) -> String {
        format!("{}{}", self.base_url, target)
    }
}

#[async_trait]
impl ChartClient for ReqwestChartClient {
    async fn get(&self, target: &str) -> Result<Bytes> {
        let url = self.url_for(target);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DashboardError::fetch(target, e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DashboardError::fetch(target, format!("status {}", status)));
        }

        response
            .bytes()
            .await
            .map_err(|e| DashboardError::fetch(target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::ChartRequestDispatcher;
    use crate::domain::params::QueryParams;
    use crate::domain::view::ChartSlot;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn serve() -> String {
        let router = Router::new()
            .route(
                "/api/covid/timeseries",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    Json(json!({
                        "data": [{"name": q.get("metric").cloned().unwrap_or_default()}],
                        "layout": {"show_ma": q.get("show_ma").cloned().unwrap_or_default()},
                    }))
                }),
            )
            .route(
                "/api/covid/treemap",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route("/api/impact/analysis", get(|| async { "<html></html>" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn dispatcher(base_url: &str) -> ChartRequestDispatcher {
        let client = ReqwestChartClient::new(base_url, Duration::from_secs(5)).unwrap();
        ChartRequestDispatcher::new(Arc::new(client))
    }

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let client = ReqwestChartClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url_for("/api/covid/treemap"), "http://localhost:5000/api/covid/treemap");
    }

    #[tokio::test]
    async fn test_fetches_payload_with_query() {
        let base = serve().await;
        let slot = ChartSlot::new("covid-timeseries", "/api/covid/timeseries");
        let params: QueryParams = [("metric", "deaths"), ("show_ma", "false")].into_iter().collect();

        let payload = dispatcher(&base).dispatch(&slot, &params).await.unwrap();
        assert_eq!(payload.data, json!([{"name": "deaths"}]));
        assert_eq!(payload.layout["show_ma"], Value::from("false"));
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_failure() {
        let base = serve().await;
        let slot = ChartSlot::new("covid-treemap", "/api/covid/treemap");

        let err = dispatcher(&base)
            .dispatch(&slot, &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::FetchFailure { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_html_body_is_parse_failure() {
        let base = serve().await;
        let slot = ChartSlot::new("impact-analysis", "/api/impact/analysis");

        let err = dispatcher(&base)
            .dispatch(&slot, &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::PayloadParseFailure { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let slot = ChartSlot::new("covid-treemap", "/api/covid/treemap");
        let err = dispatcher(&format!("http://{}", addr))
            .dispatch(&slot, &QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::FetchFailure { .. }));
    }
}
