//! zbus-backed connection to the Freedesktop thumbnailer service.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info};
use zbus::zvariant::{Structure, Value};
use zbus::{Connection, Message, Proxy};

use crate::config::{BusConfig, BusKind};

use super::error::{ConnectError, SubmitError};
use super::traits::{BusConnector, ThumbnailerBus};
use super::types::{NotificationStream, PayloadValue, QueueRequest, RawEnvelope};

/// Opens one D-Bus connection (and proxy) per `connect` call.
#[derive(Debug, Clone)]
pub struct DbusConnector {
    config: BusConfig,
}

impl DbusConnector {
    pub fn new(config: BusConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BusConnector for DbusConnector {
    async fn connect(&self) -> Result<Arc<dyn ThumbnailerBus>, ConnectError> {
        let thumbnailer = DbusThumbnailer::connect(&self.config).await?;
        Ok(Arc::new(thumbnailer))
    }
}

/// A proxy for `org.freedesktop.thumbnails.Thumbnailer1` on its own
/// connection. Dropping it releases the connection.
pub struct DbusThumbnailer {
    proxy: Proxy<'static>,
}

impl DbusThumbnailer {
    /// Connects to the configured bus and builds the service proxy.
    ///
    /// The service itself is not contacted here; it is bus-activated by the
    /// first `Queue` call.
    pub async fn connect(config: &BusConfig) -> Result<Self, ConnectError> {
        let (bus_name, connection) = match config.bus {
            BusKind::Session => ("session", Connection::session().await),
            BusKind::System => ("system", Connection::system().await),
        };
        let connection = connection.map_err(|e| ConnectError::bus(bus_name, e.to_string()))?;

        let proxy = Proxy::new(
            &connection,
            config.service.clone(),
            config.path.clone(),
            config.interface.clone(),
        )
        .await
        .map_err(|e| ConnectError::proxy(&config.service, e.to_string()))?;

        info!(bus = bus_name, service = %config.service, "D-Bus connected");
        Ok(Self { proxy })
    }
}

#[async_trait]
impl ThumbnailerBus for DbusThumbnailer {
    fn name(&self) -> &str {
        "dbus"
    }

    async fn subscribe(&self) -> Result<NotificationStream, SubmitError> {
        let signals = self
            .proxy
            .receive_all_signals()
            .await
            .map_err(|e| SubmitError::subscribe(e.to_string()))?;

        Ok(signals.map(|message| envelope_from_message(&message)).boxed())
    }

    async fn submit_request(&self, request: &QueueRequest) -> Result<u32, SubmitError> {
        debug!(uris = ?request.uris, mime_types = ?request.mime_types, "Calling Queue");
        self.proxy
            .call(
                "Queue",
                &(
                    &request.uris,
                    &request.mime_types,
                    &request.priority,
                    &request.backend,
                    request.flags,
                ),
            )
            .await
            .map_err(submit_error)
    }
}

fn submit_error(error: zbus::Error) -> SubmitError {
    match error {
        zbus::Error::MethodError(name, detail, _) => match detail {
            Some(detail) => SubmitError::call(format!("{}: {}", name, detail)),
            None => SubmitError::call(name.to_string()),
        },
        zbus::Error::Variant(e) => SubmitError::malformed_reply(e.to_string()),
        zbus::Error::InputOutput(_) => SubmitError::Disconnected,
        other => SubmitError::call(other.to_string()),
    }
}

/// Reduces a signal message to its member name and arguments.
///
/// A body that cannot be read yields an empty payload; the decoder reports
/// the shape mismatch.
fn envelope_from_message(message: &Message) -> RawEnvelope {
    let header = message.header();
    let kind = header
        .member()
        .map(|member| member.as_str().to_string())
        .unwrap_or_default();

    let body = message.body();
    let payload = match body.deserialize::<Structure<'_>>() {
        Ok(fields) => fields.fields().iter().map(payload_value).collect(),
        Err(e) => {
            debug!(kind = %kind, error = %e, "Unreadable signal body");
            Vec::new()
        }
    };

    RawEnvelope { kind, payload }
}

fn payload_value(value: &Value<'_>) -> PayloadValue {
    match value {
        Value::U32(n) => PayloadValue::U32(*n),
        Value::I32(n) => PayloadValue::I32(*n),
        Value::Str(s) => PayloadValue::Str(s.as_str().to_string()),
        Value::Array(items) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| match item {
                    Value::Str(s) => Some(s.as_str().to_string()),
                    _ => None,
                })
                .collect();
            match strings {
                Some(strings) => PayloadValue::StrArray(strings),
                None => PayloadValue::Other(format!("{:?}", value)),
            }
        }
        other => PayloadValue::Other(format!("{:?}", other)),
    }
}
