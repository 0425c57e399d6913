//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                     |
//! |---------------|---------------|---------------------------------|
//! | `feed`        | ReadingsPort  | HTTP temperature page           |
//! | `cloud`       | DevicePort    | Smart-relay cloud API (HTTPS)   |
//! | `webhook`     | NotifierPort  | Incoming webhook / log          |
//! | `limits_file` | LimitsPort    | `key=value` text file           |
//! | `time`        | ClockPort     | Host system clock               |
//! | `log_sink`    | EventSink     | `log` facade                    |

pub mod cloud;
pub mod feed;
pub mod limits_file;
pub mod log_sink;
pub mod time;
pub(super) mod utils;
pub mod webhook;
