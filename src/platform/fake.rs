use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::intent::{Intent, Uri};
use crate::platform::{DeviceInfo, MediaCollection, MediaEntry, Platform, PlatformError, ResolvedActivity};

/// In-memory platform that records what the resolver asked of it.
pub(crate) struct FakePlatform {
    pub device: DeviceInfo,
    pub granted: HashSet<String>,
    pub manifest: HashSet<String>,
    pub handlers: HashMap<String, Vec<ResolvedActivity>>,
    pub mime_types: HashMap<String, String>,
    pub cache_dir: PathBuf,
    pub dcim_dir: PathBuf,
    pub fail_inserts: bool,
    pub fail_file_provider: bool,
    pub inserted: RefCell<Vec<(MediaCollection, MediaEntry)>>,
    pub deleted: RefCell<Vec<Uri>>,
    pub queried: RefCell<Vec<Intent>>,
}

impl FakePlatform {
    pub fn new(sdk_int: i32, root: &Path) -> Self {
        let mime_types = [
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("mp4", "video/mp4"),
            ("pdf", "application/pdf"),
        ]
        .into_iter()
        .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
        .collect();

        FakePlatform {
            device: DeviceInfo { sdk_int, manufacturer: "Google".to_string() },
            granted: HashSet::new(),
            manifest: HashSet::new(),
            handlers: HashMap::new(),
            mime_types,
            cache_dir: root.join("cache"),
            dcim_dir: root.join("DCIM"),
            fail_inserts: false,
            fail_file_provider: false,
            inserted: RefCell::new(Vec::new()),
            deleted: RefCell::new(Vec::new()),
            queried: RefCell::new(Vec::new()),
        }
    }

    pub fn grant(mut self, permission: &str) -> Self {
        self.granted.insert(permission.to_string());
        self
    }

    pub fn declare(mut self, permission: &str) -> Self {
        self.manifest.insert(permission.to_string());
        self
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.device.manufacturer = manufacturer.to_string();
        self
    }

    pub fn handler(mut self, action: &str, package_name: &str, name: &str) -> Self {
        self.handlers.entry(action.to_string()).or_default().push(ResolvedActivity {
            package_name: package_name.to_string(),
            name: name.to_string(),
        });
        self
    }
}

impl Platform for FakePlatform {
    fn device(&self) -> DeviceInfo {
        self.device.clone()
    }

    fn is_permission_granted(&self, permission: &str) -> bool {
        self.granted.contains(permission)
    }

    fn has_manifest_permission(&self, permission: &str) -> bool {
        self.manifest.contains(permission)
    }

    fn query_intent_activities(&self, intent: &Intent) -> Vec<ResolvedActivity> {
        self.queried.borrow_mut().push(intent.clone());
        intent.action().and_then(|action| self.handlers.get(action)).cloned().unwrap_or_default()
    }

    fn mime_type_from_extension(&self, extension: &str) -> Option<String> {
        self.mime_types.get(extension).cloned()
    }

    fn insert_media(&self, collection: MediaCollection, entry: &MediaEntry) -> Result<Uri, PlatformError> {
        if self.fail_inserts {
            return Err(PlatformError::Null("ContentResolver.insert"));
        }
        let mut inserted = self.inserted.borrow_mut();
        inserted.push((collection, entry.clone()));
        Ok(Uri::parse(format!("{}/{}", collection.external_content_uri(), inserted.len())))
    }

    fn file_provider_uri(&self, path: &Path) -> Result<Uri, PlatformError> {
        if self.fail_file_provider {
            return Err(PlatformError::Null("FileProvider.getUriForFile"));
        }
        Ok(Uri::parse(format!("content://com.example.app.fileprovider{}", path.display())))
    }

    fn delete(&self, uri: &Uri) -> Result<usize, PlatformError> {
        self.deleted.borrow_mut().push(uri.clone());
        Ok(1)
    }

    fn cache_dir(&self) -> Result<PathBuf, PlatformError> {
        Ok(self.cache_dir.clone())
    }

    fn public_dcim_dir(&self) -> Result<PathBuf, PlatformError> {
        Ok(self.dcim_dir.clone())
    }
}
