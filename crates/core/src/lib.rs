pub mod bus;
pub mod config;
pub mod coordinator;
pub mod correlator;
pub mod notification;
pub mod session;
pub mod target;
pub mod testing;

pub use bus::{
    BusConnector, ConnectError, DbusConnector, DbusThumbnailer, NotificationStream, PayloadValue,
    QueueRequest, RawEnvelope, SubmitError, ThumbnailerBus,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, BusConfig,
    BusKind, Config, ConfigError, RequestConfig, SessionConfig, Topology,
};
pub use coordinator::{AggregateFailure, BatchReport, FileFailure, SessionCoordinator};
pub use correlator::{Correlator, CorrelatorError, Failure, FinishedScope, Outcome};
pub use notification::{decode, DecodeError, Notification};
pub use session::{
    Progress, Request, RequestSession, RequestState, SessionError, SessionOptions, SessionReport,
    SessionState,
};
pub use target::{file_uri, sniff_mime_type, FileTarget, ResolvedTarget, TargetError};
