pub mod cli;
pub mod config;
pub mod connectivity;
pub mod direct;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod relay;
pub mod request;
pub mod response;

pub use config::{ClientConfig, DEFAULT_RELAY_CHANNEL, DEFAULT_RELAY_URL};
pub use connectivity::{
    Connectivity, ConnectivityMode, EnvironmentProbe, FixedEnvironment, ReachabilityProbe,
};
pub use direct::DirectTransport;
pub use dispatcher::CyRestClient;
pub use error::{CyError, RelayError};
pub use logging::{HttpLogger, LogHttpLogger, NoopHttpLogger};
pub use relay::{RelayBridge, RelayEnvelope, RelayReply, decode_reply};
pub use request::{HttpRequest, RequestBody, Transport, Verb};
pub use response::{DirectResponse, HttpResponse, Payload, RelayedResponse, try_parse_json};
