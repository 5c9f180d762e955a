//! Advisory client: provider abstraction + file cache + daily limit.
//!
//! The engine never calls this module; the API layer does, after scoring.
//! Every failure path collapses into `None` so the caller can surface an
//! empty advisory state while the score stays available.

use std::fs;
use std::future::Future;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::advisory::AdvisoryConfig;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// Result returned by advisory providers: the generated markdown summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryResult {
    pub analysis: String,
}

/// Trait object used by handlers and tests.
pub trait AdvisoryClient: Send + Sync {
    /// Generate an advisory text for the prompt; `None` on any failure.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<AdvisoryResult>> + Send + 'a>>;
    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynAdvisoryClient = Arc<dyn AdvisoryClient>;

/// Factory: build a client according to config and environment variables.
///
/// * If `ADVISORY_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the real provider (Gemini) wrapped with caching + daily limit.
pub fn build_client_from_config(config: &AdvisoryConfig) -> DynAdvisoryClient {
    if std::env::var("ADVISORY_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        let mock = MockProvider {
            fixed: AdvisoryResult {
                analysis: "**Low Risk** (mock advisory summary).".to_string(),
            },
        };
        let client = CachingClient::new(mock, default_cache_dir(), config.daily_limit);
        return Arc::new(client);
    }

    if !config.enabled {
        return Arc::new(DisabledClient);
    }

    match config.provider.as_str() {
        "gemini" => {
            let provider = GeminiProvider::new(config.api_key.clone(), config.model.clone());
            let client = CachingClient::new(provider, default_cache_dir(), config.daily_limit);
            Arc::new(client)
        }
        _ => Arc::new(DisabledClient),
    }
}

// ------------------------------------------------------------
// Provider abstraction + concrete providers
// ------------------------------------------------------------

/// Low-level provider: does a *real* remote call. Separated so the same
/// caching wrapper serves production and tests.
pub trait Provider: Send + Sync + 'static {
    fn fetch<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<AdvisoryResult>> + Send + 'a>>;
    fn name(&self) -> &'static str;
}

/// Gemini provider (generateContent API). The key comes resolved from the
/// advisory config.
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("acracs-engine/0.1 (+github.com/acracs/acracs-engine)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model,
        }
    }
}

impl Provider for GeminiProvider {
    fn fetch<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<AdvisoryResult>> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return None;
            }

            #[derive(Serialize)]
            struct Part<'a> {
                text: &'a str,
            }
            #[derive(Serialize)]
            struct Content<'a> {
                parts: Vec<Part<'a>>,
            }
            #[derive(Serialize)]
            struct Req<'a> {
                contents: Vec<Content<'a>>,
            }
            #[derive(Deserialize)]
            struct Resp {
                #[serde(default)]
                candidates: Vec<Candidate>,
            }
            #[derive(Deserialize)]
            struct Candidate {
                content: Option<RespContent>,
            }
            #[derive(Deserialize)]
            struct RespContent {
                #[serde(default)]
                parts: Vec<RespPart>,
            }
            #[derive(Deserialize)]
            struct RespPart {
                #[serde(default)]
                text: String,
            }

            let url = format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                self.model
            );
            let req = Req {
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
            };

            let resp = self
                .http
                .post(url)
                .header("x-goog-api-key", self.api_key.as_str())
                .json(&req)
                .send()
                .await
                .ok()?;

            if !resp.status().is_success() {
                return None;
            }
            let body: Resp = resp.json().await.ok()?;
            let analysis = body
                .candidates
                .first()
                .and_then(|c| c.content.as_ref())
                .map(|c| {
                    c.parts
                        .iter()
                        .map(|p| p.text.as_str())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();

            let cleaned = analysis.trim().to_string();
            if cleaned.is_empty() {
                None
            } else {
                Some(AdvisoryResult { analysis: cleaned })
            }
        })
    }
    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Returns `None` always; used when the advisory path is disabled.
pub struct DisabledClient;

impl AdvisoryClient for DisabledClient {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<AdvisoryResult>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Simple mock provider for tests/local runs.
#[derive(Clone)]
pub struct MockProvider {
    pub fixed: AdvisoryResult,
}

impl Provider for MockProvider {
    fn fetch<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<AdvisoryResult>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

// ------------------------------------------------------------
// Caching client wrapper (file cache + daily limit)
// ------------------------------------------------------------

/// File cache plus a persisted per-day call counter. Cache hits do not
/// consume the daily budget; only real provider calls increment it.
pub struct CachingClient<P: Provider> {
    inner: P,
    cache_dir: PathBuf,
    daily_limit_max: u32,
    counter: Arc<Mutex<DailyCounter>>,
}

impl<P: Provider> CachingClient<P> {
    pub fn new(inner: P, cache_dir: PathBuf, daily_limit_max: u32) -> Self {
        let _ = fs::create_dir_all(&cache_dir);
        let counter = Arc::new(Mutex::new(
            load_daily_counter(&cache_dir).unwrap_or_default(),
        ));
        Self {
            inner,
            cache_dir,
            daily_limit_max,
            counter,
        }
    }

    async fn generate_impl(&self, prompt: &str) -> Option<AdvisoryResult> {
        // 1) Cache lookup.
        let key = cache_key(prompt);
        if let Some(hit) = read_cache_file(&self.cache_dir, &key) {
            return Some(hit);
        }

        // 2) Daily limit check.
        {
            let mut g = self.counter.lock().expect("poisoned counter");
            if g.is_expired() {
                g.reset_to_today();
                let _ = save_daily_counter(&self.cache_dir, &g);
            }
            if g.count >= self.daily_limit_max {
                return None;
            }
        }

        // 3) Real call.
        if let Some(mut fresh) = self.inner.fetch(prompt).await {
            fresh.analysis = fresh.analysis.trim().to_string();
            if !fresh.analysis.is_empty() {
                let _ = write_cache_file(&self.cache_dir, &key, &fresh);
                // Increment after a successful real call.
                let mut g = self.counter.lock().expect("poisoned counter");
                g.count = g.count.saturating_add(1);
                let _ = save_daily_counter(&self.cache_dir, &g);
                return Some(fresh);
            }
        }
        None
    }
}

impl<P: Provider> AdvisoryClient for CachingClient<P> {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<AdvisoryResult>> + Send + 'a>> {
        Box::pin(self.generate_impl(prompt))
    }
    fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

// ------------------------------------------------------------
// File cache helpers
// ------------------------------------------------------------

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache/advisory")
}

fn cache_key(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let mut out = String::with_capacity(32);
    for byte in digest.iter().take(16) {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn cache_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

fn read_cache_file(dir: &Path, key: &str) -> Option<AdvisoryResult> {
    let path = cache_path(dir, key);
    let mut file = fs::File::open(path).ok()?;
    let mut buf = String::new();
    file.read_to_string(&mut buf).ok()?;
    serde_json::from_str(&buf).ok()
}

fn write_cache_file(dir: &Path, key: &str, value: &AdvisoryResult) -> io::Result<()> {
    let path = cache_path(dir, key);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    let mut f = fs::File::create(&tmp)?;
    f.write_all(json.as_bytes())?;
    fs::rename(tmp, path)?;
    Ok(())
}

// ------------------------------------------------------------
// Daily counter helpers
// ------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DailyCounter {
    date: String,
    count: u32,
}
impl Default for DailyCounter {
    fn default() -> Self {
        Self {
            date: today(),
            count: 0,
        }
    }
}
impl DailyCounter {
    fn is_expired(&self) -> bool {
        self.date != today()
    }
    fn reset_to_today(&mut self) {
        self.date = today();
        self.count = 0;
    }
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

fn counter_path(dir: &Path) -> PathBuf {
    dir.join("daily_count.json")
}

fn load_daily_counter(dir: &Path) -> io::Result<DailyCounter> {
    let p = counter_path(dir);
    let s = fs::read_to_string(p)?;
    let dc: DailyCounter =
        serde_json::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(dc)
}

fn save_daily_counter(dir: &Path, dc: &DailyCounter) -> io::Result<()> {
    let p = counter_path(dir);
    let tmp = p.with_extension("json.tmp");
    let s = serde_json::to_string(dc).unwrap_or_else(|_| "{}".to_string());
    let mut f = fs::File::create(&tmp)?;
    f.write_all(s.as_bytes())?;
    fs::rename(tmp, p)?;
    Ok(())
}
