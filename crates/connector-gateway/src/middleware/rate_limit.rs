//! Sliding-window per-minute rate limiting, adapted from the control plane's
//! API rate limiter.

use axum::{extract::Request, http::StatusCode, response::{IntoResponse, Response}};
use std::{
    collections::HashMap,
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tower::{Layer, Service};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn per_minute(max_requests: usize) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Default)]
struct RateLimiterState {
    requests: HashMap<IpAddr, Vec<Instant>>,
}

impl RateLimiterState {
    fn check(&mut self, ip: IpAddr, config: &RateLimitConfig) -> bool {
        let now = Instant::now();
        let cutoff = now - config.window;
        let requests = self.requests.entry(ip).or_default();
        requests.retain(|&time| time > cutoff);
        if requests.len() < config.max_requests {
            requests.push(now);
            true
        } else {
            false
        }
    }
}

#[derive(Clone)]
pub struct RateLimitLayer {
    state: Arc<Mutex<RateLimiterState>>,
    config: RateLimitConfig,
}

impl RateLimitLayer {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimiterState::default())),
            config,
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            state: self.state.clone(),
            config: self.config.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    state: Arc<Mutex<RateLimiterState>>,
    config: RateLimitConfig,
}

impl<S> Service<Request> for RateLimitService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let state = self.state.clone();
        let config = self.config.clone();

        let ip = req
            .extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
            .map(|ci| ci.0.ip())
            .unwrap_or(IpAddr::from([127, 0, 0, 1]));

        Box::pin(async move {
            let mut state = state.lock().await;
            let allowed = state.check(ip, &config);
            drop(state);

            if !allowed {
                return Ok((StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded").into_response());
            }

            inner.call(req).await
        })
    }
}
