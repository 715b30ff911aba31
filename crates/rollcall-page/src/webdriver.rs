use std::time::Duration;

pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    pub endpoint: String,
    pub page_url: Option<String>,
    pub wait_for: Option<String>,
    pub login_timeout: Duration,
    pub poll_interval: Duration,
}

impl WebDriverOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            page_url: None,
            wait_for: None,
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Drops rows whose details could not be read, e.g. because the element went
/// stale while the list re-rendered. Siblings are kept.
#[cfg(any(feature = "webdriver", test))]
fn keep_readable<T, V, E>(selector: &str, rows: Vec<(T, Result<V, E>)>) -> Vec<(T, V)>
where
    E: std::fmt::Display,
{
    rows.into_iter()
        .filter_map(|(row, read)| match read {
            Ok(value) => Some((row, value)),
            Err(err) => {
                tracing::debug!(selector = %selector, error = %err, "skipping unreadable element");
                None
            }
        })
        .collect()
}

#[cfg(feature = "webdriver")]
mod imp {
    use super::{keep_readable, WebDriverOptions};
    use fantoccini::elements::Element as RemoteElement;
    use fantoccini::{Client, ClientBuilder, Locator};
    use rollcall_core::error::{PageError, Result};
    use rollcall_core::page::{Document, Element, ElementHandle};
    use rollcall_core::settle::{wait_until, SystemClock};
    use tokio::runtime::Runtime;
    use tracing::{debug, info, warn};

    const VISIBLE_TEXT_SCRIPT: &str = "return document.body ? document.body.innerText : '';";

    pub struct WebDriverDocument {
        endpoint: String,
        client: Client,
        runtime: Runtime,
        elements: Vec<RemoteElement>,
    }

    impl Document for WebDriverDocument {
        fn backend_name(&self) -> &str {
            "webdriver"
        }

        fn query_all(&mut self, selector: &str) -> Result<Vec<Element>> {
            let found = self.runtime.block_on(async {
                let remote = self
                    .client
                    .find_all(Locator::Css(selector))
                    .await
                    .map_err(|err| PageError::Backend(err.to_string()))?;
                let mut rows = Vec::with_capacity(remote.len());
                for element in remote {
                    let read = read_element(&element).await;
                    rows.push((element, read));
                }
                Ok::<_, PageError>(rows)
            })?;

            let readable = keep_readable(selector, found);
            let mut elements = Vec::with_capacity(readable.len());
            for (remote, (text, title)) in readable {
                let handle = ElementHandle(self.elements.len());
                self.elements.push(remote);
                elements.push(Element {
                    handle,
                    text,
                    title,
                });
            }
            Ok(elements)
        }

        fn exists(&mut self, selector: &str) -> Result<bool> {
            let found = self
                .runtime
                .block_on(self.client.find_all(Locator::Css(selector)))
                .map_err(|err| PageError::Backend(err.to_string()))?;
            Ok(!found.is_empty())
        }

        fn visible_text(&mut self) -> Result<String> {
            let value = self
                .runtime
                .block_on(self.client.execute(VISIBLE_TEXT_SCRIPT, Vec::new()))
                .map_err(|err| PageError::Backend(err.to_string()))?;
            Ok(value.as_str().unwrap_or_default().to_string())
        }

        fn activate(&mut self, element: &Element) -> Result<()> {
            let remote = self
                .elements
                .get(element.handle.0)
                .ok_or(PageError::StaleHandle(element.handle.0))?;
            self.runtime
                .block_on(remote.click())
                .map_err(|err| PageError::Backend(err.to_string()))
        }
    }

    async fn read_element(
        element: &RemoteElement,
    ) -> std::result::Result<(String, Option<String>), fantoccini::error::CmdError> {
        let text = element.prop("textContent").await?.unwrap_or_default();
        let title = element.attr("title").await?;
        Ok((text, title))
    }

    impl Drop for WebDriverDocument {
        fn drop(&mut self) {
            let client = self.client.clone();
            if let Err(err) = self.runtime.block_on(client.close()) {
                warn!(endpoint = %self.endpoint, error = %err, "failed to close webdriver session");
            }
        }
    }

    pub fn connect(options: &WebDriverOptions) -> Result<Box<dyn Document>> {
        let runtime = Runtime::new().map_err(|err| PageError::Backend(err.to_string()))?;
        debug!(endpoint = %options.endpoint, "connecting to webdriver");
        let client = runtime
            .block_on(ClientBuilder::native().connect(&options.endpoint))
            .map_err(|err| {
                PageError::Unavailable(format!(
                    "failed to connect to webdriver at {}: {err}",
                    options.endpoint
                ))
            })?;
        let document = WebDriverDocument {
            endpoint: options.endpoint.clone(),
            client,
            runtime,
            elements: Vec::new(),
        };

        if let Some(url) = &options.page_url {
            debug!(url = %url, "navigating");
            document
                .runtime
                .block_on(document.client.goto(url))
                .map_err(|err| PageError::Unavailable(format!("failed to open {url}: {err}")))?;
        }

        if let Some(selector) = &options.wait_for {
            info!(selector = %selector, "waiting for page to become ready");
            let outcome = wait_until(
                &SystemClock,
                options.login_timeout,
                options.poll_interval,
                || {
                    document
                        .runtime
                        .block_on(document.client.find_all(Locator::Css(selector)))
                        .is_ok_and(|found| !found.is_empty())
                },
            );
            if !outcome.is_ready() {
                return Err(PageError::Unavailable(format!(
                    "page never showed {selector} within {}s",
                    options.login_timeout.as_secs()
                )));
            }
        }

        Ok(Box::new(document))
    }
}

#[cfg(feature = "webdriver")]
pub use imp::{connect, WebDriverDocument};

#[cfg(not(feature = "webdriver"))]
pub fn connect(
    _options: &WebDriverOptions,
) -> rollcall_core::error::Result<Box<dyn rollcall_core::page::Document>> {
    Err(rollcall_core::error::PageError::Unavailable(
        "live pages require the webdriver feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::keep_readable;

    #[test]
    fn unreadable_rows_do_not_drop_their_siblings() {
        let rows = vec![
            ("alice", Ok("+1 555 0100")),
            ("gone", Err("stale element reference")),
            ("bob", Ok("+44 20 7946 0958")),
        ];
        let kept = keep_readable("[role=\"listitem\"]", rows);
        assert_eq!(kept, vec![("alice", "+1 555 0100"), ("bob", "+44 20 7946 0958")]);
    }

    #[test]
    fn every_row_failing_yields_nothing() {
        let rows: Vec<(u8, Result<u8, &str>)> = vec![(1, Err("stale")), (2, Err("stale"))];
        assert!(keep_readable("li", rows).is_empty());
    }
}
