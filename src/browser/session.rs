use crate::error::{Result, ScrapeError};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Options for launching the browser
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Run without a visible window
    pub headless: bool,

    /// Window width in pixels
    pub window_width: u32,

    /// Window height in pixels
    pub window_height: u32,

    /// Path to the Chrome/Chromium binary, if not auto-detected
    pub chrome_path: Option<std::path::PathBuf>,

    /// Whether to run Chrome's sandbox (disabled in CI containers)
    pub sandbox: bool,

    /// User agent override
    pub user_agent: Option<String>,

    /// How long the browser may sit idle before headless_chrome kills it
    pub idle_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chrome_path: None,
            sandbox: false,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            ),
            idle_timeout: Duration::from_secs(5 * 60),
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Builder method: set window size
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }
}

/// Scoped browser session for one scrape run.
///
/// The underlying Chrome process is torn down when this is dropped, so a
/// failed run cannot leak browser processes into the next scheduled one.
pub struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: SessionOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.headless = options.headless;
        launch_opts.sandbox = options.sandbox;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.idle_browser_timeout = options.idle_timeout;

        // Images are not needed for field extraction and only slow the render down
        launch_opts.args.push(OsStr::new("--disable-dev-shm-usage"));
        launch_opts.args.push(OsStr::new("--disable-gpu"));
        launch_opts.args.push(OsStr::new("--disable-extensions"));
        launch_opts.args.push(OsStr::new("--blink-settings=imagesEnabled=false"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        let user_agent_arg = options
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(arg) = &user_agent_arg {
            launch_opts.args.push(OsStr::new(arg));
        }

        let browser =
            Browser::new(launch_opts).map_err(|e| ScrapeError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        log::debug!("Browser session launched (headless: {})", options.headless);

        Ok(Self { browser, tab })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(SessionOptions::default())
    }

    /// The tab this session scrapes with
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Navigate the tab to a URL and wait for the navigation to settle
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ScrapeError::RenderError {
                url: url.to_string(),
                reason: format!("navigation failed: {}", e),
            })?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| ScrapeError::RenderError {
                url: url.to_string(),
                reason: format!("navigation did not settle: {}", e),
            })?;

        Ok(())
    }

    /// Evaluate a JavaScript expression in the tab and return its value
    pub fn evaluate(&self, js: &str) -> Result<Option<serde_json::Value>> {
        let remote = self
            .tab
            .evaluate(js, false)
            .map_err(|e| ScrapeError::RenderError {
                url: self.tab.get_url(),
                reason: format!("evaluation failed: {}", e),
            })?;
        Ok(remote.value)
    }

    /// Evaluate a JavaScript expression expected to yield a boolean
    pub fn evaluate_bool(&self, js: &str) -> Result<bool> {
        Ok(self
            .evaluate(js)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    /// Close all tabs; the Chrome process exits when the session is dropped
    pub fn close(&self) -> Result<()> {
        if let Ok(tabs) = self.browser.get_tabs().lock() {
            for tab in tabs.iter() {
                let _ = tab.close(false);
            }
        }
        log::debug!("Browser session closed");
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
