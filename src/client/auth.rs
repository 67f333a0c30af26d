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

//! Authentication methods and host-key verification policy.

use std::path::Path;
use std::sync::Arc;

use russh::client::{Handler, KeyboardInteractiveAuthResponse};
use zeroize::Zeroizing;

use super::core::SshClient;
use crate::error::{Error, Result};

/// How the server's host key is verified during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ServerCheckMethod {
    /// Accept any host key.
    #[default]
    NoCheck,
    /// base64 encoded key without the type prefix or hostname suffix (type is already encoded)
    PublicKey(String),
    PublicKeyFile(String),
    DefaultKnownHostsFile,
    KnownHostsFile(String),
}

impl ServerCheckMethod {
    /// Convenience method to create a [`ServerCheckMethod`] from a string literal.
    pub fn with_public_key(key: &str) -> Self {
        Self::PublicKey(key.to_string())
    }

    /// Convenience method to create a [`ServerCheckMethod`] from a string literal.
    pub fn with_public_key_file(key_file_name: &str) -> Self {
        Self::PublicKeyFile(key_file_name.to_string())
    }

    /// Convenience method to create a [`ServerCheckMethod`] from a string literal.
    pub fn with_known_hosts_file(known_hosts_file: &str) -> Self {
        Self::KnownHostsFile(known_hosts_file.to_string())
    }
}

/// SSH client handler for managing server key verification.
#[derive(Debug, Clone)]
pub(crate) struct ClientHandler {
    hostname: String,
    port: u16,
    server_check: ServerCheckMethod,
}

impl ClientHandler {
    pub(crate) fn new(hostname: String, port: u16, server_check: ServerCheckMethod) -> Self {
        Self {
            hostname,
            port,
            server_check,
        }
    }
}

impl Handler for ClientHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool> {
        match &self.server_check {
            ServerCheckMethod::NoCheck => Ok(true),
            ServerCheckMethod::PublicKey(key) => {
                let pk = russh::keys::parse_public_key_base64(key)
                    .map_err(|_| Error::ServerCheckFailed)?;

                Ok(pk == *server_public_key)
            }
            ServerCheckMethod::PublicKeyFile(key_file_name) => {
                let pk = russh::keys::load_public_key(key_file_name)
                    .map_err(|_| Error::ServerCheckFailed)?;

                Ok(pk == *server_public_key)
            }
            ServerCheckMethod::KnownHostsFile(known_hosts_path) => {
                let result = russh::keys::check_known_hosts_path(
                    &self.hostname,
                    self.port,
                    server_public_key,
                    known_hosts_path,
                )
                .map_err(|_| Error::ServerCheckFailed)?;

                Ok(result)
            }
            ServerCheckMethod::DefaultKnownHostsFile => {
                let result = russh::keys::check_known_hosts(
                    &self.hostname,
                    self.port,
                    server_public_key,
                )
                .map_err(|_| Error::ServerCheckFailed)?;

                Ok(result)
            }
        }
    }
}

impl SshClient {
    /// Authenticate with a password.
    ///
    /// Plain `password` authentication is tried first; if the server rejects
    /// it, `keyboard-interactive` is attempted, answering echoed prompts
    /// with the username and hidden prompts with the password.
    ///
    /// Returns whether the authentication succeeded.
    pub async fn authenticate_password(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<bool> {
        let password = Zeroizing::new(password.to_string());

        let handle = self.transport_mut()?;
        let result = handle.authenticate_password(username, &**password).await?;
        if result.success() {
            self.set_authenticated();
            return Ok(true);
        }

        tracing::debug!("Password authentication refused, trying keyboard-interactive");

        let mut response = handle
            .authenticate_keyboard_interactive_start(username, None::<String>)
            .await?;
        loop {
            let prompts = match response {
                KeyboardInteractiveAuthResponse::Success => {
                    self.set_authenticated();
                    return Ok(true);
                }
                KeyboardInteractiveAuthResponse::Failure { .. } => return Ok(false),
                KeyboardInteractiveAuthResponse::InfoRequest { prompts, .. } => prompts,
            };

            // If the input may be displayed, we are not being asked for a
            // password; send the username instead.
            let replies: Vec<String> = prompts
                .iter()
                .map(|prompt| {
                    if prompt.echo {
                        username.to_string()
                    } else {
                        password.to_string()
                    }
                })
                .collect();

            let handle = self.transport_mut()?;
            response = handle
                .authenticate_keyboard_interactive_respond(replies)
                .await?;
        }
    }

    /// Authenticate with a private key file, optionally passphrase-protected.
    ///
    /// Returns whether the authentication succeeded.
    pub async fn authenticate_key_file(
        &mut self,
        username: &str,
        key_file_path: impl AsRef<Path>,
        passphrase: Option<&str>,
    ) -> Result<bool> {
        let passphrase = passphrase.map(|p| Zeroizing::new(p.to_string()));
        let key = russh::keys::load_secret_key(
            key_file_path.as_ref(),
            passphrase.as_ref().map(|p| &***p),
        )?;

        let handle = self.transport_mut()?;
        let hash_alg = handle.best_supported_rsa_hash().await?.flatten();
        let result = handle
            .authenticate_publickey(
                username,
                russh::keys::PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
            )
            .await?;

        if result.success() {
            self.set_authenticated();
        }
        Ok(result.success())
    }

    /// Authenticate with the `none` method (no credentials).
    ///
    /// Returns whether the authentication succeeded.
    pub async fn authenticate_none(&mut self, username: &str) -> Result<bool> {
        let handle = self.transport_mut()?;
        let result = handle.authenticate_none(username).await?;
        if result.success() {
            self.set_authenticated();
        }
        Ok(result.success())
    }
}
