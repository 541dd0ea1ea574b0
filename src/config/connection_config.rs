//! Represents the configuration for an SSH connection.
///
/// This struct is used to store the connection details such as the IP address,
/// port, username and credentials of the remote shell the device exposes.
///
/// # Fields
///
/// - `ip`: A string representing the IP address or host name.
/// - `port`: An unsigned 16-bit integer representing the port number.
/// - `username`: A string representing the username.
/// - `password`: An optional string representing the password.
/// - `private_key_path`: An optional string representing the path to the private key file.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct ConnectionConfig {
    pub ip: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    pub private_key_path: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 22,
            username: "root".to_string(),
            password: None,
            private_key_path: None,
        }
    }
}
