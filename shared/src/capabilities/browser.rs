use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// URL that passed scheme validation and may be handed to the system browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUrl(String);

impl ExternalUrl {
    pub fn parse(raw: &str) -> Result<Self, BrowserError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BrowserError::InvalidUrl {
                url: raw.to_string(),
                reason: "URL cannot be empty".to_string(),
            });
        }

        let parsed = Url::parse(trimmed).map_err(|e| BrowserError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self(parsed.into())),
            other => Err(BrowserError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("scheme {other} is not allowed"),
            }),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum BrowserOperation {
    OpenUrl(ExternalUrl),
}

impl Operation for BrowserOperation {
    type Output = BrowserResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum BrowserError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no application can open this URL")]
    NoHandler,
}

pub type BrowserResult = Result<(), BrowserError>;

#[derive(Clone)]
pub struct Browser<E> {
    context: CapabilityContext<BrowserOperation, E>,
}

impl<Ev> Capability<Ev> for Browser<Ev> {
    type Operation = BrowserOperation;
    type MappedSelf<MappedEv> = Browser<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Browser::new(self.context.map_event(f))
    }
}

impl<E> Browser<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<BrowserOperation, E>) -> Self {
        Self { context }
    }

    pub fn open_url<F>(&self, url: ExternalUrl, callback: F)
    where
        F: FnOnce(BrowserResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(BrowserOperation::OpenUrl(url)).await;
            ctx.update_app(callback(result));
        });
    }
}
