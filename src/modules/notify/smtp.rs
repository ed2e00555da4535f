use keyring::Entry;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::PoolConfig;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};

use super::NotificationSender;
use crate::modules::utils::time::get_current_timestamp;

/// Structure to hold SMTP credentials with metadata
#[derive(Serialize, Deserialize)]
pub struct SmtpCredentials {
    // The email address/username for SMTP authentication
    pub username: String,
    // The password or app-specific password for SMTP
    pub password: String,
    // SMTP server hostname (e.g., smtp.gmail.com)
    pub host: String,
    // SMTP server port (typically 587 for TLS)
    pub port: u16,
    // When these credentials were last updated
    pub last_updated: u64,
}

/// Structure to manage secure email credentials
pub struct SecureEmailManager {
    // Keyring entry for storing credentials
    keyring: Entry,
}

impl SecureEmailManager {
    // Create a new instance of SecureEmailManager
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            // Create a new keyring entry for storing SMTP credentials
            keyring: Entry::new("techstore-reset", "smtp-credentials")
                .map_err(|e| format!("Failed to create keyring entry: {}", e))?,
        })
    }

    // Store new SMTP credentials in the system keyring
    pub fn store_credentials(
        &self,
        username: &str,
        password: &str,
        host: &str,
        port: u16,
    ) -> Result<(), String> {
        // Create new credentials structure
        let credentials = SmtpCredentials {
            username: username.to_string(),
            password: password.to_string(),
            host: host.to_string(),
            port,
            last_updated: get_current_timestamp(),
        };

        // Serialize credentials to JSON string
        let creds_json = serde_json::to_string(&credentials)
            .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

        // Store in system keyring
        self.keyring
            .set_password(&creds_json)
            .map_err(|e| format!("Failed to store credentials: {}", e))
    }

    // Retrieve stored SMTP credentials from the system keyring
    pub fn get_credentials(&self) -> Result<SmtpCredentials, String> {
        // Get credentials JSON from keyring
        let creds_json = self
            .keyring
            .get_password()
            .map_err(|e| format!("Failed to retrieve credentials: {}", e))?;

        // Deserialize JSON to SmtpCredentials structure
        serde_json::from_str(&creds_json).map_err(|e| format!("Failed to parse credentials: {}", e))
    }

    // Delete stored credentials from the system keyring
    pub fn delete_credentials(&self) -> Result<(), String> {
        self.keyring
            .delete_password()
            .map_err(|e| format!("Failed to delete credentials: {}", e))
    }
}

/// Email-backed notification capability using securely stored SMTP
/// credentials
pub struct SmtpSender {
    subject: String,
}

impl SmtpSender {
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
        }
    }
}

impl NotificationSender for SmtpSender {
    fn send(&self, destination: &str, message: &str) -> Result<(), String> {
        // Retrieve stored credentials
        let manager = SecureEmailManager::new()?;
        let creds = manager.get_credentials()?;

        // Create email message
        let email = Message::builder()
            .from(
                format!("TechStore <{}>", creds.username)
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(destination
                .parse()
                .map_err(|e| format!("Invalid to address: {}", e))?)
            .subject(&self.subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(message.to_string())
            .map_err(|e| format!("Failed to create email: {}", e))?;

        // Configure TLS parameters
        let tls_parameters = TlsParameters::builder(creds.host.clone())
            .build()
            .map_err(|e| format!("Failed to build TLS parameters: {}", e))?;

        // Set up SMTP transport with explicit TLS configuration
        let mailer = SmtpTransport::relay(&creds.host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            .credentials(Credentials::new(creds.username, creds.password))
            .port(creds.port)
            .tls(Tls::Required(tls_parameters))
            .pool_config(PoolConfig::new().max_size(1))
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();

        // Send the email; delivery failure propagates to the caller
        mailer
            .send(&email)
            .map(|_| ())
            .map_err(|e| format!("Failed to send email: {}", e))
    }
}
