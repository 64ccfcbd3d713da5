//! Test utilities: a scripted in-memory browser for fetcher and batch tests

use kodegen_tools_imagescrape::{
    BrowserLauncher, BrowserSession, FetchError, HarvestConfig, RenderedPage,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Behaviour of a navigation
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Nav {
    Ok,
    Fail,
    Hang,
}

/// Behaviour of one content poll
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Poll {
    Markup(&'static str),
    Fail,
    Hang,
    Panic,
}

/// What a page at one URL does
#[derive(Debug, Clone)]
pub struct Script {
    pub nav: Nav,
    /// Poll steps in order; the last one repeats once exhausted
    pub polls: Vec<Poll>,
}

#[allow(dead_code)]
impl Script {
    pub fn renders(markup: &'static str) -> Self {
        Self {
            nav: Nav::Ok,
            polls: vec![Poll::Markup(markup)],
        }
    }

    pub fn polls(polls: Vec<Poll>) -> Self {
        Self { nav: Nav::Ok, polls }
    }

    pub fn navigation(nav: Nav) -> Self {
        Self {
            nav,
            polls: vec![Poll::Markup("<img src=\"/never-reached.jpg\">")],
        }
    }
}

/// Shared observation counters
#[derive(Debug, Default)]
pub struct Counters {
    pub prepares: AtomicUsize,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub polls: AtomicUsize,
    pub navigations: AtomicUsize,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
}

#[allow(dead_code)]
impl Counters {
    pub fn prepares(&self) -> usize {
        self.prepares.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

/// Launcher whose sessions follow per-URL scripts
#[derive(Debug, Clone)]
pub struct ScriptedLauncher {
    scripts: Arc<HashMap<String, Script>>,
    fallback: Script,
    start_error: Option<FetchError>,
    prepare_delay: Duration,
    pub counters: Arc<Counters>,
}

#[allow(dead_code)]
impl ScriptedLauncher {
    /// Every URL follows `script`
    pub fn uniform(script: Script) -> Self {
        Self {
            scripts: Arc::new(HashMap::new()),
            fallback: script,
            start_error: None,
            prepare_delay: Duration::ZERO,
            counters: Arc::new(Counters::default()),
        }
    }

    /// URLs follow their own script, others render a single image
    pub fn per_url(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: Arc::new(
                scripts
                    .into_iter()
                    .map(|(url, script)| (url.to_string(), script))
                    .collect(),
            ),
            fallback: Script::renders("<body><img src=\"/web/product/big/default.jpg\"></body>"),
            start_error: None,
            prepare_delay: Duration::ZERO,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Every session start fails with `error`
    pub fn failing_start(error: FetchError) -> Self {
        let mut launcher = Self::uniform(Script::renders("<img>"));
        launcher.start_error = Some(error);
        launcher
    }

    /// One-time setup takes `delay` (a slow browser download)
    pub fn with_prepare_delay(mut self, delay: Duration) -> Self {
        self.prepare_delay = delay;
        self
    }
}

impl BrowserLauncher for ScriptedLauncher {
    type Session = ScriptedSession;

    async fn prepare(&self) -> Result<(), FetchError> {
        tokio::time::sleep(self.prepare_delay).await;
        self.counters.prepares.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn start(&self) -> Result<ScriptedSession, FetchError> {
        self.counters.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.start_error {
            return Err(error.clone());
        }

        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(ScriptedSession {
            scripts: Arc::clone(&self.scripts),
            fallback: self.fallback.clone(),
            counters: Arc::clone(&self.counters),
        })
    }
}

pub struct ScriptedSession {
    scripts: Arc<HashMap<String, Script>>,
    fallback: Script,
    counters: Arc<Counters>,
}

impl BrowserSession for ScriptedSession {
    type Page = ScriptedPage;

    async fn get(&self, url: &str) -> Result<ScriptedPage, FetchError> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.get(url).unwrap_or(&self.fallback).clone();

        match script.nav {
            Nav::Ok => Ok(ScriptedPage {
                polls: script.polls,
                cursor: AtomicUsize::new(0),
                counters: Arc::clone(&self.counters),
            }),
            Nav::Fail => Err(FetchError::Browser("net::ERR_CONNECTION_REFUSED".into())),
            Nav::Hang => std::future::pending().await,
        }
    }

    async fn stop(self) {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ScriptedPage {
    polls: Vec<Poll>,
    cursor: AtomicUsize,
    counters: Arc<Counters>,
}

impl RenderedPage for ScriptedPage {
    async fn content(&self) -> Result<String, FetchError> {
        self.counters.polls.fetch_add(1, Ordering::SeqCst);
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let step = self
            .polls
            .get(index)
            .or_else(|| self.polls.last())
            .cloned()
            .unwrap_or(Poll::Markup(""));

        match step {
            Poll::Markup(markup) => Ok(markup.to_string()),
            Poll::Fail => Err(FetchError::Browser("Target closed".into())),
            Poll::Hang => std::future::pending().await,
            Poll::Panic => panic!("scripted page crash"),
        }
    }
}

/// Config with default timing and a throwaway output path
#[allow(dead_code)]
pub fn test_config() -> HarvestConfig {
    HarvestConfig::builder()
        .output_dir(std::env::temp_dir().join("imagescrape-test-output"))
        .build()
        .expect("default test config is valid")
}
