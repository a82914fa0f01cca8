//! Application domain models
//!
//! An application is a push-enabled mobile app registered by an account. It
//! carries the keys clients use to call the push API, the FCM configuration
//! for Android delivery and the APNs credentials for iOS delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{required, OrgError, OrgResult};
use crate::image::Image;
use crate::keys::generate_key;
use crate::principal::Principal;

/// A push-enabled application.
///
/// # Architecture
///
/// ```text
/// Application (owned by one Principal via `user`)
///   ├─ api_key / api_secret (generated)
///   ├─ FCM config (fcm_server_key, sender_id)
///   ├─ APNs credentials (cert_pem, key_pem, pass_phrase)
///   ├─ Image (optional)
///   └─ Segments (reference the application by id)
/// ```
///
/// # Examples
///
/// ```
/// use pushboard_org::{Application, NewApplication, Principal};
/// use pushboard_rbac::Role;
///
/// let owner = Principal::new("owner@example.com", Role::User);
/// let app = Application::create(NewApplication::new("Shop", "com.example.shop"), &owner, 20).unwrap();
///
/// assert!(app.is_owned_by(&owner));
/// assert_eq!(app.api_key.len(), 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Unique identifier
    pub id: Uuid,

    /// Owning account
    pub user: Uuid,

    /// Display name
    pub app_name: String,

    /// Platform package / bundle identifier
    pub package_name: String,

    /// FCM server key for Android delivery
    pub fcm_server_key: Option<String>,

    /// FCM sender ID
    pub sender_id: Option<String>,

    /// Public API key
    pub api_key: String,

    /// API secret
    pub api_secret: String,

    /// App icon
    pub image: Option<Image>,

    /// APNs certificate (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_pem: Option<String>,

    /// APNs private key (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_pem: Option<String>,

    /// Pass phrase protecting `key_pem`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_phrase: Option<String>,

    /// When the application was created
    pub created_at: DateTime<Utc>,

    /// When the application was last updated
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewApplication {
    /// Display name
    pub app_name: String,
    /// Package / bundle identifier
    pub package_name: String,
    /// FCM server key
    #[serde(default)]
    pub fcm_server_key: Option<String>,
    /// FCM sender ID
    #[serde(default)]
    pub sender_id: Option<String>,
}

impl NewApplication {
    /// Create input with the two required fields.
    pub fn new(app_name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    /// Set the FCM configuration.
    pub fn with_fcm(mut self, server_key: impl Into<String>, sender_id: impl Into<String>) -> Self {
        self.fcm_server_key = Some(server_key.into());
        self.sender_id = Some(sender_id.into());
        self
    }
}

/// Partial update of an application's editable fields.
///
/// Only these fields can be changed through an update; ownership, id,
/// timestamps, image and credentials are not reachable from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationUpdate {
    /// New display name
    #[serde(default)]
    pub app_name: Option<String>,
    /// New package / bundle identifier
    #[serde(default)]
    pub package_name: Option<String>,
    /// New FCM server key
    #[serde(default)]
    pub fcm_server_key: Option<String>,
    /// New FCM sender ID
    #[serde(default)]
    pub sender_id: Option<String>,
    /// New API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// New API secret
    #[serde(default)]
    pub api_secret: Option<String>,
}

/// Credential slot on an application filled by a PEM upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CredentialSlot {
    /// APNs private key; comes with a pass phrase
    #[serde(rename = "keyPem")]
    KeyPem,
    /// APNs certificate
    #[serde(rename = "certPem")]
    CertPem,
}

impl CredentialSlot {
    /// Parse the slot name used by upload requests.
    ///
    /// # Examples
    ///
    /// ```
    /// use pushboard_org::CredentialSlot;
    ///
    /// assert_eq!(CredentialSlot::parse("certPem").unwrap(), CredentialSlot::CertPem);
    /// assert!(CredentialSlot::parse("passPhrase").is_err());
    /// ```
    pub fn parse(s: &str) -> OrgResult<Self> {
        match s {
            "keyPem" => Ok(Self::KeyPem),
            "certPem" => Ok(Self::CertPem),
            other => Err(OrgError::UnknownCredential(other.to_string())),
        }
    }

    /// Slot name as used by upload requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyPem => "keyPem",
            Self::CertPem => "certPem",
        }
    }
}

impl Default for CredentialSlot {
    fn default() -> Self {
        Self::KeyPem
    }
}

impl Application {
    /// Creates a new application owned by `owner`.
    ///
    /// The application is created with:
    /// - A newly generated UUID v7 ID
    /// - Freshly generated `api_key` and `api_secret` of `key_length` characters
    /// - No image or credentials
    ///
    /// # Errors
    ///
    /// [`OrgError::Validation`] if the owner is a guest, or the name or
    /// package name is blank.
    pub fn create(input: NewApplication, owner: &Principal, key_length: usize) -> OrgResult<Self> {
        if owner.role.is_anonymous() {
            return Err(OrgError::validation("user", "Guests can not own applications"));
        }
        let app_name = required("app_name", &input.app_name, "Application name can not be blank")?;
        let package_name = required(
            "package_name",
            &input.package_name,
            "Package name can not be blank",
        )?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::now_v7(),
            user: owner.id,
            app_name,
            package_name,
            fcm_server_key: input.fcm_server_key,
            sender_id: input.sender_id,
            api_key: generate_key(key_length),
            api_secret: generate_key(key_length),
            image: None,
            cert_pem: None,
            key_pem: None,
            pass_phrase: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check whether `principal` owns this application.
    ///
    /// Compares stable identities, so independently loaded copies of the same
    /// account match.
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.user == principal.id
    }

    /// Apply a partial update. Fields left as `None` are untouched.
    ///
    /// # Errors
    ///
    /// [`OrgError::Validation`] if a provided name or key is blank; the
    /// application is left unchanged in that case.
    pub fn apply(&mut self, update: ApplicationUpdate) -> OrgResult<()> {
        let app_name = update
            .app_name
            .map(|v| required("app_name", &v, "Application name can not be blank"))
            .transpose()?;
        let package_name = update
            .package_name
            .map(|v| required("package_name", &v, "Package name can not be blank"))
            .transpose()?;
        let api_key = update
            .api_key
            .map(|v| required("api_key", &v, "API key can not be blank"))
            .transpose()?;
        let api_secret = update
            .api_secret
            .map(|v| required("api_secret", &v, "API secret can not be blank"))
            .transpose()?;

        if let Some(v) = app_name {
            self.app_name = v;
        }
        if let Some(v) = package_name {
            self.package_name = v;
        }
        if let Some(v) = api_key {
            self.api_key = v;
        }
        if let Some(v) = api_secret {
            self.api_secret = v;
        }
        if let Some(v) = update.fcm_server_key {
            self.fcm_server_key = Some(v);
        }
        if let Some(v) = update.sender_id {
            self.sender_id = Some(v);
        }
        self.touch();
        Ok(())
    }

    /// Store an uploaded PEM in `slot`.
    ///
    /// A private key always resets the pass phrase: to `pass_phrase` if given,
    /// otherwise to the empty string.
    pub fn set_credential(&mut self, slot: CredentialSlot, pem: String, pass_phrase: Option<String>) {
        match slot {
            CredentialSlot::KeyPem => {
                self.key_pem = Some(pem);
                self.pass_phrase = Some(pass_phrase.unwrap_or_default());
            }
            CredentialSlot::CertPem => self.cert_pem = Some(pem),
        }
        self.touch();
    }

    /// Attach an uploaded image, returning the one it replaces.
    pub fn set_image(&mut self, image: Image) -> Option<Image> {
        let previous = self.image.replace(image);
        self.touch();
        previous
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
