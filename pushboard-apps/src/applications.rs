//! Application service
//!
//! Create, update, delete and list applications, and attach uploaded APNs
//! credentials and icons to them.

use pushboard_org::keys::generate_key;
use pushboard_org::{Application, ApplicationUpdate, CredentialSlot, NewApplication, Principal};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::blob::{BlobStore, Upload};
use crate::config::AppsConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::store::ApplicationStore;

const PEM_UPLOAD_FAILED: &str = "Error occurred while uploading file";
const IMAGE_UPLOAD_FAILED: &str = "Error occurred while uploading picture";

/// A PEM credential upload.
#[derive(Debug, Clone)]
pub struct CredentialUpload {
    /// Slot name from the request (`keyPem` or `certPem`); `None` means `keyPem`
    pub slot: Option<String>,
    /// Pass phrase for a `keyPem` upload
    pub pass_phrase: Option<String>,
    /// The uploaded file
    pub file: Upload,
}

/// Application operations.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn ApplicationStore>,
    blobs: Arc<dyn BlobStore>,
    config: AppsConfig,
}

impl std::fmt::Debug for ApplicationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApplicationService {
    /// Create the service.
    pub fn new(store: Arc<dyn ApplicationStore>, blobs: Arc<dyn BlobStore>, config: AppsConfig) -> Self {
        Self {
            store,
            blobs,
            config,
        }
    }

    /// Register a new application owned by `principal`, with fresh API
    /// credentials.
    pub async fn create(&self, principal: &Principal, input: NewApplication) -> ServiceResult<Application> {
        let application = Application::create(input, principal, self.config.api_key_length)?;
        self.store.save_application(application.clone()).await?;
        info!(application = %application.id, owner = %principal.id, "Application created");
        Ok(application)
    }

    /// Apply a partial update to a loaded application.
    pub async fn update(
        &self,
        mut application: Application,
        update: ApplicationUpdate,
    ) -> ServiceResult<Application> {
        application.apply(update)?;
        self.store.save_application(application.clone()).await?;
        debug!(application = %application.id, "Application updated");
        Ok(application)
    }

    /// Delete a loaded application.
    ///
    /// Segments and grants referring to it are left in place; they become
    /// unreachable because the application no longer loads.
    pub async fn delete(&self, application: Application) -> ServiceResult<Application> {
        self.store.delete_application(application.id).await?;
        if let Some(image) = &application.image {
            if let Err(e) = self.blobs.delete(&image.key).await {
                warn!(application = %application.id, error = %e, "Failed to delete application image");
            }
        }
        info!(application = %application.id, "Application deleted");
        Ok(application)
    }

    /// Applications visible to `principal`: a child account sees its parent's
    /// applications, everyone else their own. Newest first.
    pub async fn list(&self, principal: &Principal) -> ServiceResult<Vec<Application>> {
        Ok(self
            .store
            .applications_by_owner(principal.account_owner())
            .await?)
    }

    /// Store an uploaded PEM file in one of the application's credential slots.
    ///
    /// A `keyPem` upload also sets the pass phrase (empty when none is given).
    pub async fn upload_credential(
        &self,
        mut application: Application,
        upload: CredentialUpload,
    ) -> ServiceResult<Application> {
        let slot = match upload.slot.as_deref() {
            None => CredentialSlot::default(),
            Some(name) => CredentialSlot::parse(name)?,
        };
        self.check_size(&upload.file, PEM_UPLOAD_FAILED)?;

        let pem = String::from_utf8(upload.file.bytes).map_err(|_| {
            warn!(application = %application.id, "Credential upload is not UTF-8");
            ServiceError::Upload(PEM_UPLOAD_FAILED.to_string())
        })?;

        application.set_credential(slot, pem, upload.pass_phrase);
        self.store.save_application(application.clone()).await?;
        info!(application = %application.id, slot = slot.as_str(), "Credential uploaded");
        Ok(application)
    }

    /// Upload an icon to the blob store and attach it to the application.
    pub async fn upload_image(&self, mut application: Application, file: Upload) -> ServiceResult<Application> {
        self.check_size(&file, IMAGE_UPLOAD_FAILED)?;
        if !file.content_type.starts_with("image/") {
            return Err(ServiceError::Upload(IMAGE_UPLOAD_FAILED.to_string()));
        }

        let key = format!(
            "{}_{}",
            generate_key(self.config.upload_prefix_length),
            base_name(&file.file_name)
        );
        let image = self
            .blobs
            .put(&key, &file.content_type, file.bytes)
            .await
            .map_err(|e| {
                warn!(application = %application.id, error = %e, "Image upload failed");
                ServiceError::Upload(IMAGE_UPLOAD_FAILED.to_string())
            })?;

        let previous = application.set_image(image);
        if let Err(e) = self.store.save_application(application.clone()).await {
            if let Err(cleanup) = self.blobs.delete(&key).await {
                warn!(application = %application.id, error = %cleanup, "Failed to delete unsaved image");
            }
            return Err(e.into());
        }

        if let Some(previous) = previous {
            if let Err(e) = self.blobs.delete(&previous.key).await {
                warn!(application = %application.id, error = %e, "Failed to delete replaced image");
            }
        }
        Ok(application)
    }

    fn check_size(&self, file: &Upload, message: &str) -> ServiceResult<()> {
        if file.is_empty() || file.len() > self.config.max_upload_bytes {
            return Err(ServiceError::Upload(message.to_string()));
        }
        Ok(())
    }
}

/// Final path component of a client-supplied file name.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::store::MemoryDocumentStore;
    use async_trait::async_trait;
    use pushboard_access::{StoreError, StoreResult};
    use pushboard_rbac::Role;
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    struct Fixture {
        service: ApplicationService,
        store: Arc<MemoryDocumentStore>,
        blobs: Arc<MemoryBlobStore>,
        owner: Principal,
    }

    /// Document store whose application saves can be switched off.
    #[derive(Default)]
    struct FlakyApplicationStore {
        inner: MemoryDocumentStore,
        failing: AtomicBool,
    }

    #[async_trait]
    impl ApplicationStore for FlakyApplicationStore {
        async fn save_application(&self, application: Application) -> StoreResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("write rejected".into()));
            }
            self.inner.save_application(application).await
        }

        async fn get_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
            self.inner.get_application(id).await
        }

        async fn delete_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
            self.inner.delete_application(id).await
        }

        async fn applications_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Application>> {
            self.inner.applications_by_owner(owner).await
        }
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new("https://cdn.example.com"));
        let config = AppsConfig {
            max_upload_bytes: 64,
            ..AppsConfig::default()
        };
        Fixture {
            service: ApplicationService::new(store.clone(), blobs.clone(), config),
            store,
            blobs,
            owner: Principal::new("owner@example.com", Role::User),
        }
    }

    #[tokio::test]
    async fn test_create_generates_distinct_keys() {
        let f = fixture();
        let a = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();
        let b = f
            .service
            .create(&f.owner, NewApplication::new("Blog", "com.blog"))
            .await
            .unwrap();

        assert_eq!(a.user, f.owner.id);
        assert_eq!(a.api_key.len(), 20);
        assert_ne!(a.api_key, b.api_key);
        assert_ne!(a.api_secret, b.api_secret);
        assert!(f.store.get_application(a.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let f = fixture();
        let err = f
            .service
            .create(&f.owner, NewApplication::new("", "com.shop"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_update_persists() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        f.service
            .update(
                app.clone(),
                ApplicationUpdate {
                    fcm_server_key: Some("AAAA".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = f.store.get_application(app.id).await.unwrap().unwrap();
        assert_eq!(stored.fcm_server_key.as_deref(), Some("AAAA"));
        assert_eq!(stored.app_name, "Shop");
    }

    #[tokio::test]
    async fn test_child_account_lists_parent_applications() {
        let f = fixture();
        let child = Principal::child_of(&f.owner, "child@example.com");
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let own = f.service.list(&f.owner).await.unwrap();
        let childs = f.service.list(&child).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(childs.len(), 1);
        assert_eq!(childs[0].id, app.id);

        let stranger = Principal::new("stranger@example.com", Role::User);
        assert!(f.service.list(&stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_key_pem_defaults_pass_phrase() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let app = f
            .service
            .upload_credential(
                app,
                CredentialUpload {
                    slot: None,
                    pass_phrase: None,
                    file: Upload::new("key.pem", "application/x-pem-file", b"-----KEY-----".to_vec()),
                },
            )
            .await
            .unwrap();

        assert_eq!(app.key_pem.as_deref(), Some("-----KEY-----"));
        assert_eq!(app.pass_phrase.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_upload_cert_pem() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let app = f
            .service
            .upload_credential(
                app,
                CredentialUpload {
                    slot: Some("certPem".into()),
                    pass_phrase: Some("ignored".into()),
                    file: Upload::new("cert.pem", "application/x-pem-file", b"-----CERT-----".to_vec()),
                },
            )
            .await
            .unwrap();

        assert_eq!(app.cert_pem.as_deref(), Some("-----CERT-----"));
        assert!(app.pass_phrase.is_none());
    }

    #[tokio::test]
    async fn test_upload_credential_rejects_bad_input() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let unknown_slot = f
            .service
            .upload_credential(
                app.clone(),
                CredentialUpload {
                    slot: Some("apiSecret".into()),
                    pass_phrase: None,
                    file: Upload::new("x.pem", "text/plain", b"x".to_vec()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(unknown_slot.status_code(), 400);

        let binary = f
            .service
            .upload_credential(
                app.clone(),
                CredentialUpload {
                    slot: None,
                    pass_phrase: None,
                    file: Upload::new("x.pem", "text/plain", vec![0xff, 0xfe]),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(binary.to_string(), PEM_UPLOAD_FAILED);

        let too_big = f
            .service
            .upload_credential(
                app,
                CredentialUpload {
                    slot: None,
                    pass_phrase: None,
                    file: Upload::new("x.pem", "text/plain", vec![b'a'; 65]),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(too_big, ServiceError::Upload(_)));
    }

    #[tokio::test]
    async fn test_upload_image_replaces_previous() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let app = f
            .service
            .upload_image(app, Upload::new("icon.png", "image/png", vec![1, 2, 3]))
            .await
            .unwrap();
        let first = app.image.clone().unwrap();
        assert!(first.key.ends_with("_icon.png"));
        assert_eq!(first.key.len(), 10 + "_icon.png".len());
        assert!(first.url.starts_with("https://cdn.example.com/"));

        let app = f
            .service
            .upload_image(app, Upload::new("icon2.png", "image/png", vec![4]))
            .await
            .unwrap();
        assert!(f.blobs.get(&first.key).await.is_none());
        assert_eq!(f.blobs.len().await, 1);

        let stored = f.store.get_application(app.id).await.unwrap().unwrap();
        assert_eq!(stored.image, app.image);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_image() {
        let store = Arc::new(FlakyApplicationStore::default());
        let blobs = Arc::new(MemoryBlobStore::new("https://cdn.example.com"));
        let service = ApplicationService::new(store.clone(), blobs.clone(), AppsConfig::default());
        let owner = Principal::new("owner@example.com", Role::User);

        let app = service
            .create(&owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();
        let app = service
            .upload_image(app, Upload::new("a.png", "image/png", vec![1]))
            .await
            .unwrap();
        let first = app.image.clone().unwrap();

        store.failing.store(true, Ordering::SeqCst);
        let err = service
            .upload_image(app.clone(), Upload::new("b.png", "image/png", vec![2]))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);

        let stored = store.get_application(app.id).await.unwrap().unwrap();
        assert_eq!(stored.image.as_ref().map(|i| i.key.as_str()), Some(first.key.as_str()));
        assert!(blobs.get(&first.key).await.is_some());
        assert_eq!(blobs.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_image_strips_directories_from_file_name() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let app = f
            .service
            .upload_image(app, Upload::new("../../etc/icon.png", "image/png", vec![1]))
            .await
            .unwrap();
        let key = app.image.unwrap().key;
        assert!(key.ends_with("_icon.png"));
        assert!(!key.contains('/'));

        assert_eq!(base_name("C:\\Users\\me\\logo.png"), "logo.png");
        assert_eq!(base_name("plain.png"), "plain.png");
    }

    #[tokio::test]
    async fn test_upload_image_rejects_non_images() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();

        let err = f
            .service
            .upload_image(app, Upload::new("notes.txt", "text/plain", vec![1]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), IMAGE_UPLOAD_FAILED);
        assert_eq!(f.blobs.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_removes_application_and_image() {
        let f = fixture();
        let app = f
            .service
            .create(&f.owner, NewApplication::new("Shop", "com.shop"))
            .await
            .unwrap();
        let app = f
            .service
            .upload_image(app, Upload::new("icon.png", "image/png", vec![1]))
            .await
            .unwrap();

        f.service.delete(app.clone()).await.unwrap();
        assert!(f.store.get_application(app.id).await.unwrap().is_none());
        assert_eq!(f.blobs.len().await, 0);
    }
}
