use chrono::Local;

use crate::capture::{CaptureSlot, MediaKind};
use crate::chooser::{self, ChooserFacts, PickerStrategy, GOOGLE_PHOTOS_PACKAGE, SAMSUNG_MANUFACTURER};
use crate::config::AppConfig;
use crate::error::UploadError;
use crate::intent::{
    ComponentName, Extra, Intent, Uri, ACTION_GET_CONTENT, ACTION_PICK, ACTION_SAMSUNG_PICK_DATA,
    CATEGORY_DEFAULT, CATEGORY_OPENABLE, EXTRA_ALLOW_MULTIPLE, EXTRA_INITIAL_INTENTS, EXTRA_MIME_TYPES,
    EXTRA_OUTPUT, EXTRA_SAMSUNG_CONTENT_TYPE, EXTRA_VIDEO_QUALITY, IMAGES_EXTERNAL_CONTENT_URI,
};
use crate::mime::{UploadSpec, WILDCARD};
use crate::platform::{DeviceInfo, Platform, PERMISSION_CAMERA, PERMISSION_WRITE_EXTERNAL_STORAGE, SDK_Q};
use crate::storage::{self, GalleryStore};

/// Device facts fixed for the lifetime of an [`UploadIntents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContext {
    pub device: DeviceInfo,
    /// WRITE_EXTERNAL_STORAGE is requested by the manifest, which is what public
    /// DCIM writes need on Android 9 and lower.
    pub can_save_to_public_storage: bool,
}

impl DeviceContext {
    pub fn resolve(platform: &dyn Platform) -> Self {
        DeviceContext {
            device: platform.device(),
            can_save_to_public_storage: platform.has_manifest_permission(PERMISSION_WRITE_EXTERNAL_STORAGE),
        }
    }

    pub fn scoped_storage(&self) -> bool {
        self.device.sdk_int >= SDK_Q
    }
}

/// Builds the camera, gallery and file picker intents offered for a web upload request
/// and owns the output uris handed to camera apps.
pub struct UploadIntents<P: Platform> {
    platform: P,
    config: AppConfig,
    device: DeviceContext,
    gallery: Box<dyn GalleryStore>,
    spec: UploadSpec,
    capture: CaptureSlot,
    video_recording: CaptureSlot,
    force_save_to_internal_storage: bool,
}

impl<P: Platform> UploadIntents<P> {
    pub fn new(platform: P, config: AppConfig) -> Self {
        let device = DeviceContext::resolve(&platform);
        let gallery = storage::gallery_store_for(device.device.sdk_int);
        log::debug!(
            "upload intents for sdk {} ({}), gallery via {}",
            device.device.sdk_int,
            device.device.manufacturer,
            gallery.name()
        );
        UploadIntents {
            platform,
            config,
            device,
            gallery,
            spec: UploadSpec::default(),
            capture: CaptureSlot::default(),
            video_recording: CaptureSlot::default(),
            force_save_to_internal_storage: false,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    pub fn set_upload_specs<S: AsRef<str>>(&mut self, specs: &[S], allow_multiple: bool) {
        let platform = &self.platform;
        self.spec = UploadSpec::parse(specs, allow_multiple, |ext| platform.mime_type_from_extension(ext));
        log::debug!("upload spec set to [{}], multiple: {allow_multiple}", self.spec.joined());
    }

    pub fn upload_spec(&self) -> &UploadSpec {
        &self.spec
    }

    pub fn force_save_to_internal_storage(&self) -> bool {
        self.force_save_to_internal_storage
    }

    pub fn set_force_save_to_internal_storage(&mut self, force: bool) {
        self.force_save_to_internal_storage = force;
    }

    pub fn current_capture_uri(&self) -> Option<&Uri> {
        self.capture.get()
    }

    pub fn current_video_recording_uri(&self) -> Option<&Uri> {
        self.video_recording.get()
    }

    pub fn can_upload_image(&self) -> bool {
        self.spec.can_upload_image()
    }

    pub fn can_upload_video(&self) -> bool {
        self.spec.can_upload_video()
    }

    pub fn images_allowed(&self) -> bool {
        self.platform.is_permission_granted(PERMISSION_CAMERA) && self.can_upload_image()
    }

    pub fn videos_allowed(&self) -> bool {
        self.platform.is_permission_granted(PERMISSION_CAMERA) && self.can_upload_video()
    }

    /// Ask for WRITE_EXTERNAL_STORAGE before capturing: only on Android 9 and lower,
    /// when the manifest requests it and gallery saving is configured.
    pub fn needs_storage_permission_android9(&self) -> bool {
        !self.device.scoped_storage()
            && self.device.can_save_to_public_storage
            && self.config.camera_config.save_to_gallery
    }

    /// First capture intent for the preferred media kind, images when allowed.
    pub fn camera_intent(&mut self) -> Result<Intent, UploadError> {
        let kind = if self.images_allowed() { MediaKind::Image } else { MediaKind::Video };
        self.capture_intents(kind).into_iter().next().ok_or(UploadError::NoCaptureApp(kind))
    }

    pub fn chooser_intent(&mut self) -> Intent {
        let images_allowed = self.images_allowed();
        let videos_allowed = self.videos_allowed();

        let mut direct_capture = Vec::new();
        if images_allowed {
            direct_capture.extend(self.capture_intents(MediaKind::Image));
        }
        if videos_allowed {
            direct_capture.extend(self.capture_intents(MediaKind::Video));
        }

        let only_images_and_video = self.spec.only_images_and_video();
        let facts = ChooserFacts {
            images_allowed,
            videos_allowed,
            only_images_and_video,
            photos_sole_image_picker: only_images_and_video && self.photos_sole_image_picker(),
        };

        let picker = match chooser::select_strategy(&facts) {
            PickerStrategy::SingleMedia(kind) => self.media_pick_intent(kind),
            PickerStrategy::CombinedMedia => self.combined_media_intent(),
            PickerStrategy::Document => self.document_picker_intent(),
        };

        let mut chooser = Intent::create_chooser(picker, &self.config.chooser_title);
        chooser.put_extra(EXTRA_INITIAL_INTENTS, Extra::Intents(direct_capture));
        chooser
    }

    /// Deletes any pending capture outputs and forgets them.
    pub fn delete_uri_files(&mut self) {
        self.capture.release(&self.platform);
        self.video_recording.release(&self.platform);
    }

    fn saves_to_gallery(&self) -> bool {
        self.config.camera_config.save_to_gallery
            && self.gallery.available(self.device.can_save_to_public_storage)
            && !self.force_save_to_internal_storage
    }

    fn capture_output(&self, kind: MediaKind) -> Option<Uri> {
        if self.saves_to_gallery() {
            let file_name = kind.gallery_file_name(Local::now().naive_local());
            match self.gallery.create_output(&self.platform, kind, &file_name) {
                Ok(uri) => return Some(uri),
                Err(e) => log::warn!(
                    "could not create {kind} output in {}, using private cache: {e}",
                    self.gallery.name()
                ),
            }
        }

        match storage::temp_output_uri(&self.platform, kind) {
            Ok(uri) => Some(uri),
            Err(e) => {
                log::warn!("could not create temp output for {kind}: {e}");
                None
            }
        }
    }

    fn capture_intents(&mut self, kind: MediaKind) -> Vec<Intent> {
        if !self.config.direct_camera_uploads {
            return Vec::new();
        }

        let mut capture = Intent::new(kind.capture_action());
        if kind == MediaKind::Video {
            let quality = self.config.camera_config.capture_quality.video_quality_extra();
            capture.put_extra(EXTRA_VIDEO_QUALITY, Extra::Int(quality));
        }

        let Some(output) = self.capture_output(kind) else {
            return Vec::new();
        };
        capture.put_extra(EXTRA_OUTPUT, Extra::Uri(output.clone()));
        match kind {
            MediaKind::Image => self.capture.replace(output),
            MediaKind::Video => self.video_recording.replace(output),
        }

        self.explicit_intents(&capture)
    }

    /// One copy of `template` per resolved activity, each pinned to its component.
    fn explicit_intents(&self, template: &Intent) -> Vec<Intent> {
        self.platform
            .query_intent_activities(template)
            .into_iter()
            .map(|resolved| {
                let mut intent = template.clone();
                intent.set_component(ComponentName::new(&resolved.package_name, &resolved.name));
                intent.set_package(resolved.package_name);
                intent
            })
            .collect()
    }

    fn photos_sole_image_picker(&self) -> bool {
        let pick = Intent::with_data(ACTION_PICK, Uri::parse(IMAGES_EXTERNAL_CONTENT_URI));
        match self.platform.query_intent_activities(&pick).as_slice() {
            [only] => only.package_name == GOOGLE_PHOTOS_PACKAGE,
            _ => false,
        }
    }

    fn media_pick_intent(&self, kind: MediaKind) -> Intent {
        let mut intent = Intent::with_data(ACTION_PICK, kind.collection().external_content_uri());
        intent.put_extra(EXTRA_ALLOW_MULTIPLE, Extra::Bool(self.spec.allow_multiple()));
        intent
    }

    fn combined_media_intent(&self) -> Intent {
        let mut intent = Intent::with_data(ACTION_PICK, Uri::parse(IMAGES_EXTERNAL_CONTENT_URI));
        // setType drops the collection uri, same as on the platform.
        intent.set_type("image/*, video/*");
        intent.put_extra(EXTRA_MIME_TYPES, Extra::StringArray(vec!["image/*".into(), "video/*".into()]));
        intent.put_extra(EXTRA_ALLOW_MULTIPLE, Extra::Bool(self.spec.allow_multiple()));
        intent
    }

    fn document_picker_intent(&self) -> Intent {
        let mut intent = Intent::new(ACTION_GET_CONTENT);
        intent.set_type(self.spec.joined());
        intent.put_extra(EXTRA_MIME_TYPES, Extra::StringArray(self.spec.to_vec()));
        intent.put_extra(EXTRA_ALLOW_MULTIPLE, Extra::Bool(self.spec.allow_multiple()));
        intent.add_category(CATEGORY_OPENABLE);

        if self.platform.query_intent_activities(&intent).is_empty()
            && self.device.device.manufacturer.eq_ignore_ascii_case(SAMSUNG_MANUFACTURER)
        {
            log::debug!("no document picker resolved, using the Samsung file manager");
            let mut samsung = Intent::new(ACTION_SAMSUNG_PICK_DATA);
            samsung.put_extra(EXTRA_SAMSUNG_CONTENT_TYPE, Extra::String(WILDCARD.to_string()));
            samsung.add_category(CATEGORY_DEFAULT);
            return samsung;
        }

        intent
    }
}
