use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::collectors::Collector;
use crate::error::CollectError;
use crate::models::{Domain, MetricValue, Reachability};

/// Reachability check: a single GET with bounded connect and read timeouts and
/// no retries.
pub struct NetworkCollector {
    client: Client,
    url: String,
}

/// The request never got a response: refused, reset, dropped mid-request or
/// timed out while connecting. A read timeout after connecting is not one.
fn is_connection_failure(e: &reqwest::Error) -> bool {
    if e.is_timeout() {
        return e.is_connect();
    }
    e.is_connect() || e.is_request()
}

impl NetworkCollector {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CollectError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub async fn check(&self) -> Result<Reachability, CollectError> {
        let start = Instant::now();
        let result: Result<Reachability, CollectError> =
            match self.client.get(&self.url).send().await {
                Ok(response) => Ok(Reachability::from_status(response.status().as_u16())),
                Err(e) if is_connection_failure(&e) => {
                    debug!("{} is unreachable: {}", self.url, e);
                    Ok(Reachability::Unreachable)
                }
                Err(e) => Err(e.into()),
            };
        debug!("reachability check took: {} ms", start.elapsed().as_millis());
        result
    }
}

#[async_trait]
impl Collector for NetworkCollector {
    fn domain(&self) -> Domain {
        Domain::Network
    }

    async fn sample(&self) -> Result<MetricValue, CollectError> {
        Ok(MetricValue::Reachability(self.check().await?))
    }
}
