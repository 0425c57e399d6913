//! Cloud smart-relay adapter.
//!
//! Talks to the vendor's device API over HTTPS:
//!
//! | Call       | Request                                               |
//! |------------|-------------------------------------------------------|
//! | read state | `GET  {endpoint}/v1.0/iot-03/devices/{id}/status`     |
//! | set power  | `POST {endpoint}/v1.0/iot-03/devices/{id}/commands`   |
//!
//! Both answer with an envelope `{"success": bool, "result": ...}`.  The
//! status result is a list of data points `{"code": "switch_1", "value": true}`.
//!
//! Authentication is a bearer access token taken from the configuration;
//! obtaining and refreshing that token is left to the deployment.

use log::warn;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::ports::DevicePort;
use crate::config::SystemConfig;
use crate::control::RelayState;
use crate::error::{Error, Result};

use super::utils::{build_client, classify, join_url};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataPoint {
    code: String,
    value: Value,
}

#[derive(Debug, Serialize)]
struct Command<'a> {
    code: &'a str,
    value: bool,
}

#[derive(Debug, Serialize)]
struct CommandBody<'a> {
    commands: [Command<'a>; 1],
}

/// [`DevicePort`] backed by the cloud API.
pub struct CloudRelay {
    client: Client,
    status_url: String,
    commands_url: String,
    token: String,
    switch_code: String,
}

impl CloudRelay {
    pub fn new(config: &SystemConfig) -> Result<Self> {
        let device = format!("v1.0/iot-03/devices/{}", config.device_id);
        Ok(Self {
            client: build_client(config.request_timeout())?,
            status_url: join_url(&config.device_api_endpoint, &format!("{device}/status")),
            commands_url: join_url(&config.device_api_endpoint, &format!("{device}/commands")),
            token: config.device_access_token.clone(),
            switch_code: config.device_switch_code.clone(),
        })
    }

    /// Fetch the relay state, reporting why it could not be read.
    pub fn fetch_state(&self) -> Result<RelayState> {
        let body: Value = self
            .client
            .get(&self.status_url)
            .bearer_auth(&self.token)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::json)
            .map_err(|e| classify("device status", &e))?;
        parse_status(body, &self.switch_code)
    }

    fn send_command(&self, on: bool) -> Result<()> {
        let body = CommandBody {
            commands: [Command {
                code: &self.switch_code,
                value: on,
            }],
        };
        let reply: Value = self
            .client
            .post(&self.commands_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::json)
            .map_err(|e| classify("device command", &e))?;
        parse_command_reply(reply)
    }
}

impl DevicePort for CloudRelay {
    fn read_state(&mut self) -> RelayState {
        self.fetch_state().unwrap_or_else(|e| {
            warn!("Relay state unknown: {e}");
            RelayState::Unknown
        })
    }

    fn set_power(&mut self, on: bool) -> Result<()> {
        self.send_command(on)
    }
}

fn envelope(body: Value) -> Result<Envelope> {
    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| Error::protocol(format!("unexpected envelope: {e}")))?;
    if envelope.success {
        Ok(envelope)
    } else {
        Err(Error::protocol(format!(
            "device API refused: {}",
            envelope.msg.as_deref().unwrap_or("no message")
        )))
    }
}

/// Extract the relay state from a status response.
///
/// Uses the data point named `switch_code`, falling back to the first one
/// when no code matches.  Its value must be a boolean.
pub fn parse_status(body: Value, switch_code: &str) -> Result<RelayState> {
    let envelope = envelope(body)?;
    let points: Vec<DataPoint> = serde_json::from_value(envelope.result)
        .map_err(|e| Error::protocol(format!("status result is not a data-point list: {e}")))?;

    let point = points
        .iter()
        .find(|p| p.code == switch_code)
        .or_else(|| points.first())
        .ok_or_else(|| Error::protocol("status result is empty"))?;

    point
        .value
        .as_bool()
        .map(RelayState::from_power)
        .ok_or_else(|| {
            Error::protocol(format!(
                "data point `{}` is not a boolean: {}",
                point.code, point.value
            ))
        })
}

/// Check a command reply.
pub fn parse_command_reply(body: Value) -> Result<()> {
    envelope(body).map(|_| ())
}
