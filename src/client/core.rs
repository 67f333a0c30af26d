// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::time::Duration;

use russh::client::{Config, Handle};

use super::auth::{ClientHandler, ServerCheckMethod};
use crate::channel::{ChannelSession, RemoteSession, TerminalRequest};
use crate::error::{Error, Result};

/// A session-oriented SSH client.
///
/// Call order matters: [`connect`](Self::connect), then one of the
/// `authenticate_*` methods, then operations. Calls made out of order fail
/// fast with a state error before any I/O. Always [`close`](Self::close)
/// when done; otherwise the transport keeps its background task running.
///
/// ```no_run
/// use std::time::Duration;
/// use sshkit::SshClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), sshkit::Error> {
///     let mut client = SshClient::new("10.10.10.2");
///     client.connect(Duration::from_secs(10)).await?;
///     client.authenticate_password("root", "root").await?;
///
///     let result = client.execute_command("echo Hello SSH", None).await?;
///     assert!(result.success);
///     assert_eq!(result.result, "Hello SSH\n");
///
///     client.close().await;
///     Ok(())
/// }
/// ```
pub struct SshClient {
    host: String,
    port: u16,
    server_check: ServerCheckMethod,
    transport: Option<Handle<ClientHandler>>,
    authenticated: bool,
    session: Option<RemoteSession>,
}

impl SshClient {
    /// Create a client for the given host on the default SSH port.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, 22)
    }

    /// Create a client for the given host and port.
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            server_check: ServerCheckMethod::NoCheck,
            transport: None,
            authenticated: false,
            session: None,
        }
    }

    /// Set the host-key verification policy used by the next
    /// [`connect`](Self::connect). The default accepts any host key.
    pub fn set_server_check(&mut self, server_check: ServerCheckMethod) {
        self.server_check = server_check;
    }

    /// The host this client connects to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Connect to the SSH server.
    ///
    /// A zero `timeout` means no bound on the connection attempt.
    pub async fn connect(&mut self, timeout: Duration) -> Result<()> {
        tracing::debug!("Connecting to {}:{}", self.host, self.port);

        let config = Arc::new(Config::default());
        let handler = ClientHandler::new(self.host.clone(), self.port, self.server_check.clone());
        let connect = russh::client::connect(config, (self.host.as_str(), self.port), handler);

        let handle = if timeout.is_zero() {
            connect.await?
        } else {
            tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| Error::ConnectTimeout(timeout.as_millis() as u64))??
        };

        self.transport = Some(handle);
        self.authenticated = false;
        Ok(())
    }

    /// Open a session channel on the authenticated transport and keep it as
    /// the client's current session (closing any previous one).
    ///
    /// The stored session is what [`open_terminal`](Self::open_terminal),
    /// [`write`](Self::write) and [`read`](Self::read) operate on.
    pub async fn open_session(&mut self) -> Result<()> {
        let session = self.open_channel_session().await?;
        if let Some(previous) = self.session.take() {
            previous.close().await;
        }
        self.session = Some(session);
        Ok(())
    }

    /// Request a very wide no-echo terminal plus a shell on the current
    /// session (RFC 4254 section 8).
    pub async fn open_terminal(&mut self) -> Result<()> {
        self.authenticated_transport()?;
        let session = self.session()?;
        session.request_terminal(&TerminalRequest::wide()).await?;
        session.start_shell().await
    }

    /// Disconnect from the SSH server.
    ///
    /// Closes the current session (if any) and tears down the transport.
    /// Idempotent: closing a closed or never-connected client does nothing.
    pub async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport
                .disconnect(russh::Disconnect::ByApplication, "", "")
                .await
            {
                tracing::debug!("Disconnect from {} failed: {e}", self.host);
            }
        }
        self.authenticated = false;
    }

    /// Open a dedicated session channel, without touching the client-held
    /// session. Used by command execution, interactive piping and the
    /// remote-removal fallback, which all own their session's lifecycle.
    pub(crate) async fn open_channel_session(&self) -> Result<RemoteSession> {
        let transport = self.authenticated_transport()?;
        let channel = transport.channel_open_session().await?;
        Ok(RemoteSession::new(channel))
    }

    pub(crate) fn set_authenticated(&mut self) {
        self.authenticated = true;
    }

    /// The transport, or a state error if `connect` has not been called.
    pub(crate) fn transport(&self) -> Result<&Handle<ClientHandler>> {
        self.transport.as_ref().ok_or(Error::NotConnected)
    }

    pub(crate) fn transport_mut(&mut self) -> Result<&mut Handle<ClientHandler>> {
        self.transport.as_mut().ok_or(Error::NotConnected)
    }

    /// The transport, or a state error if not connected or not yet
    /// authenticated.
    pub(crate) fn authenticated_transport(&self) -> Result<&Handle<ClientHandler>> {
        let transport = self.transport()?;
        if !self.authenticated {
            return Err(Error::NotAuthenticated);
        }
        Ok(transport)
    }

    /// The current session, or a state error if none is open.
    pub(crate) fn session(&self) -> Result<&RemoteSession> {
        self.session.as_ref().ok_or(Error::SessionNotOpened)
    }
}
