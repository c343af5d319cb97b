// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, time::Duration};

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, span, Level};

use super::LampError;
use crate::command::Function;

/// Where and as whom to reach the Particle cloud.
#[derive(Clone, Debug)]
pub struct Account {
    api_url: String,
    access_token: String,
    timeout: Option<Duration>,
}

impl Account {
    pub fn new(api_url: &str, access_token: &str, timeout: Option<Duration>) -> Account {
        Account {
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            timeout,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_url, path)
    }
}

/// A device as listed by the cloud.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct DeviceInfo {
    pub id: String,
    /// Devices that were never named have no name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub connected: bool,
}

impl DeviceInfo {
    /// Returns true if the device is called or identified by the given name.
    fn is(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name) || self.id == name
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id: {}, {})",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.id,
            if self.connected { "online" } else { "offline" }
        )
    }
}

/// The answer to a function call.
#[derive(Deserialize, Debug)]
struct FunctionResponse {
    return_value: i32,
}

/// The error body returned alongside non-success statuses.
#[derive(Deserialize, Debug)]
struct ApiError {
    error: Option<String>,
    error_description: Option<String>,
}

/// A client for the Particle device cloud.
pub struct Cloud {
    client: Client,
    account: Account,
}

impl Cloud {
    /// Creates a new cloud client. Doesn't talk to the cloud until asked to.
    pub fn new(account: &Account) -> Result<Cloud, LampError> {
        let mut builder = Client::builder();
        if let Some(timeout) = account.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Cloud {
            client: builder.build()?,
            account: account.clone(),
        })
    }

    /// Lists the devices claimed by the account.
    pub fn devices(&self) -> Result<Vec<DeviceInfo>, LampError> {
        let response = self
            .client
            .get(self.account.endpoint("devices"))
            .bearer_auth(&self.account.access_token)
            .send()?;

        Ok(check(response)?.json()?)
    }

    /// Finds the device with the given name or id.
    pub fn device(self, name: &str) -> Result<Device, LampError> {
        let info = find(self.devices()?, name)?;
        debug!(device = %info, "Found device.");
        Ok(Device { cloud: self, info })
    }
}

fn find(devices: Vec<DeviceInfo>, name: &str) -> Result<DeviceInfo, LampError> {
    devices
        .into_iter()
        .find(|device| device.is(name))
        .ok_or_else(|| LampError::NotFound {
            device: name.to_string(),
        })
}

/// Returns the response if it succeeded, otherwise the cloud's explanation of what went wrong.
fn check(response: Response) -> Result<Response, LampError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(LampError::Api {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string()),
    })
}

fn error_message(body: &str) -> Option<String> {
    let error: ApiError = serde_json::from_str(body).ok()?;
    error.error_description.or(error.error)
}

/// A lamp reached through the Particle cloud.
pub struct Device {
    cloud: Cloud,
    info: DeviceInfo,
}

impl super::Lamp for Device {
    fn name(&self) -> String {
        self.info.name.clone().unwrap_or_else(|| self.info.id.clone())
    }

    fn is_connected(&self) -> bool {
        self.info.connected
    }

    fn call(&self, function: Function, argument: &str) -> Result<i32, LampError> {
        let span = span!(Level::DEBUG, "call", device = self.info.id, %function);
        let _enter = span.enter();

        let response = self
            .cloud
            .client
            .post(
                self.cloud
                    .account
                    .endpoint(&format!("devices/{}/{}", self.info.id, function)),
            )
            .bearer_auth(&self.cloud.account.access_token)
            .form(&[("arg", argument)])
            .send()?;

        let response: FunctionResponse = check(response)?.json()?;
        info!(argument, result = response.return_value, "Called lamp.");
        Ok(response.return_value)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info)
    }
}
