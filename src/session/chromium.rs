//! Headless Chromium implementation of the controllable session

use super::{ControlSession, OptionEntry, SessionError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

/// A controllable session backed by a headless Chromium instance
///
/// Launching spawns the browser process and a handler task draining its CDP
/// event stream; [`ControlSession::close`] must be called to release both.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launches a headless Chromium instance with a single blank page
    pub async fn launch() -> Result<Self, SessionError> {
        let config = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        // Drain CDP events for the lifetime of the browser
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser.new_page("about:blank").await?;

        tracing::debug!("headless browser session launched");

        Ok(ChromiumSession {
            browser,
            page,
            handler_task,
        })
    }

    /// Selector for the option entries inside a control
    fn option_selector(control: &str) -> String {
        format!("{} option", control)
    }
}

#[async_trait]
impl ControlSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn find_options(&mut self, control: &str) -> Result<Vec<OptionEntry>, SessionError> {
        // The control itself must exist; an empty option list is valid,
        // a missing control is not.
        self.page
            .find_element(control)
            .await
            .map_err(|_| SessionError::MissingControl {
                selector: control.to_string(),
            })?;

        let selector = Self::option_selector(control);
        let elements = self.page.find_elements(selector.as_str()).await?;

        let mut options = Vec::with_capacity(elements.len());
        for element in elements {
            let value =
                element
                    .attribute("value")
                    .await?
                    .ok_or_else(|| SessionError::MissingAttribute {
                        selector: selector.clone(),
                        name: "value".to_string(),
                    })?;
            let disabled = element.attribute("disabled").await?.is_some();
            options.push(OptionEntry { value, disabled });
        }

        Ok(options)
    }

    async fn select_option(&mut self, control: &str, value: &str) -> Result<(), SessionError> {
        // Native <option> nodes have no layout box, so a synthetic mouse
        // click does not reliably activate them. Set the control's value
        // and dispatch a change event instead.
        let script = format!(
            r#"(() => {{
                const control = document.querySelector({control});
                if (!control) return false;
                const option = Array.from(control.options).find(o => o.value === {value});
                if (!option || option.disabled) return false;
                control.value = option.value;
                control.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            control = serde_json::Value::from(control),
            value = serde_json::Value::from(value),
        );

        let activated = self
            .page
            .evaluate(script)
            .await?
            .into_value::<bool>()
            .unwrap_or(false);

        if activated {
            Ok(())
        } else {
            Err(SessionError::MissingNode {
                selector: format!("{}[value={:?}]", Self::option_selector(control), value),
            })
        }
    }

    async fn text_of(&mut self, selector: &str) -> Result<String, SessionError> {
        let element =
            self.page
                .find_element(selector)
                .await
                .map_err(|_| SessionError::MissingNode {
                    selector: selector.to_string(),
                })?;

        let text = element
            .inner_text()
            .await?
            .ok_or_else(|| SessionError::MissingNode {
                selector: selector.to_string(),
            })?;

        Ok(text.trim().to_string())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        // Page::close needs an owned handle; Page is a cheap clone
        self.page.clone().close().await?;
        self.browser.close().await?;
        self.handler_task.abort();

        tracing::debug!("headless browser session closed");

        Ok(())
    }
}
