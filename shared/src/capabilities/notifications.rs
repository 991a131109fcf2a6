use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    #[default]
    Default,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

/// Screens a notification tap can bring to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetScreen {
    Main,
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapAction {
    pub screen: TargetScreen,
    /// Start a fresh task instead of stacking on the current one.
    pub clear_task: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub id: i32,
    pub channel_id: String,
    pub title: String,
    pub text: String,
    pub large_image: String,
    pub big_picture: bool,
    pub auto_cancel: bool,
    pub tap_action: TapAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum NotificationOperation {
    CreateChannel(NotificationChannel),
    Show(NotificationPayload),
}

impl Operation for NotificationOperation {
    type Output = NotificationResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notifications are disabled for this app")]
    Disabled,

    #[error("notification channel {0} does not exist")]
    UnknownChannel(String),

    #[error("notification failed: {0}")]
    Platform(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NotificationOutput {
    ChannelCreated,
    Shown { id: i32 },
}

pub type NotificationResult = Result<NotificationOutput, NotificationError>;

#[derive(Clone)]
pub struct Notifications<E> {
    context: CapabilityContext<NotificationOperation, E>,
}

impl<Ev> Capability<Ev> for Notifications<Ev> {
    type Operation = NotificationOperation;
    type MappedSelf<MappedEv> = Notifications<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Notifications::new(self.context.map_event(f))
    }
}

impl<E> Notifications<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<NotificationOperation, E>) -> Self {
        Self { context }
    }

    pub fn create_channel<F>(&self, channel: NotificationChannel, callback: F)
    where
        F: FnOnce(NotificationResult) -> E + Send + 'static,
    {
        self.request(NotificationOperation::CreateChannel(channel), callback);
    }

    pub fn show<F>(&self, payload: NotificationPayload, callback: F)
    where
        F: FnOnce(NotificationResult) -> E + Send + 'static,
    {
        self.request(NotificationOperation::Show(payload), callback);
    }

    fn request<F>(&self, operation: NotificationOperation, callback: F)
    where
        F: FnOnce(NotificationResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}
