use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// Plain Rust model of android.content.Intent.

// Only the parts the upload flow touches are modelled: action, data, type, categories,
// an explicit component and typed extras. The Android backend turns this into a real
// Java Intent right before it is launched.

pub const ACTION_CHOOSER: &str = "android.intent.action.CHOOSER";
pub const ACTION_PICK: &str = "android.intent.action.PICK";
pub const ACTION_GET_CONTENT: &str = "android.intent.action.GET_CONTENT";
pub const ACTION_IMAGE_CAPTURE: &str = "android.media.action.IMAGE_CAPTURE";
pub const ACTION_VIDEO_CAPTURE: &str = "android.media.action.VIDEO_CAPTURE";
pub const ACTION_SAMSUNG_PICK_DATA: &str = "com.sec.android.app.myfiles.PICK_DATA";

pub const CATEGORY_OPENABLE: &str = "android.intent.category.OPENABLE";
pub const CATEGORY_DEFAULT: &str = "android.intent.category.DEFAULT";

pub const EXTRA_INTENT: &str = "android.intent.extra.INTENT";
pub const EXTRA_TITLE: &str = "android.intent.extra.TITLE";
pub const EXTRA_INITIAL_INTENTS: &str = "android.intent.extra.INITIAL_INTENTS";
pub const EXTRA_MIME_TYPES: &str = "android.intent.extra.MIME_TYPES";
pub const EXTRA_ALLOW_MULTIPLE: &str = "android.intent.extra.ALLOW_MULTIPLE";
pub const EXTRA_OUTPUT: &str = "output";
pub const EXTRA_VIDEO_QUALITY: &str = "android.intent.extra.videoQuality";
pub const EXTRA_SAMSUNG_CONTENT_TYPE: &str = "CONTENT_TYPE";

pub const IMAGES_EXTERNAL_CONTENT_URI: &str = "content://media/external/images/media";
pub const VIDEO_EXTERNAL_CONTENT_URI: &str = "content://media/external/video/media";

/// A content or file URI as handed around by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uri(String);

impl Uri {
    pub fn parse(uri: impl Into<String>) -> Self {
        Uri(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once(':').map(|(scheme, _)| scheme)
    }

    /// Authority of a hierarchical uri, `media` for `content://media/external/...`.
    pub fn authority(&self) -> Option<&str> {
        let rest = self.0.split_once("://")?.1;
        Some(rest.split('/').next().unwrap_or(rest))
    }

    pub fn path(&self) -> Option<&str> {
        let rest = self.0.split_once("://")?.1;
        rest.find('/').map(|i| &rest[i..])
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentName {
    pub package: String,
    pub class: String,
}

impl ComponentName {
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        ComponentName { package: package.into(), class: class.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Extra {
    Bool(bool),
    Int(i32),
    String(String),
    StringArray(Vec<String>),
    Uri(Uri),
    Intent(Box<Intent>),
    Intents(Vec<Intent>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    action: Option<String>,
    data: Option<Uri>,
    mime_type: Option<String>,
    categories: Vec<String>,
    component: Option<ComponentName>,
    package: Option<String>,
    extras: BTreeMap<String, Extra>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Intent { action: Some(action.into()), ..Default::default() }
    }

    pub fn with_data(action: impl Into<String>, data: Uri) -> Self {
        Intent { action: Some(action.into()), data: Some(data), ..Default::default() }
    }

    /// Wraps `target` in a system chooser dialog, same shape as `Intent.createChooser`.
    pub fn create_chooser(target: Intent, title: &str) -> Self {
        let mut chooser = Intent::new(ACTION_CHOOSER);
        chooser.put_extra(EXTRA_INTENT, Extra::Intent(Box::new(target)));
        chooser.put_extra(EXTRA_TITLE, Extra::String(title.to_string()));
        chooser
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn data(&self) -> Option<&Uri> {
        self.data.as_ref()
    }

    /// Clears any previously set type.
    pub fn set_data(&mut self, data: Uri) {
        self.data = Some(data);
        self.mime_type = None;
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Clears any previously set data uri.
    pub fn set_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = Some(mime_type.into());
        self.data = None;
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn add_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }

    pub fn component(&self) -> Option<&ComponentName> {
        self.component.as_ref()
    }

    pub fn set_component(&mut self, component: ComponentName) {
        self.component = Some(component);
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package = Some(package.into());
    }

    pub fn put_extra(&mut self, key: impl Into<String>, value: Extra) {
        self.extras.insert(key.into(), value);
    }

    pub fn extra(&self, key: &str) -> Option<&Extra> {
        self.extras.get(key)
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, &Extra)> {
        self.extras.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn bool_extra(&self, key: &str) -> Option<bool> {
        match self.extras.get(key) {
            Some(Extra::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn int_extra(&self, key: &str) -> Option<i32> {
        match self.extras.get(key) {
            Some(Extra::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn uri_extra(&self, key: &str) -> Option<&Uri> {
        match self.extras.get(key) {
            Some(Extra::Uri(uri)) => Some(uri),
            _ => None,
        }
    }

    pub fn string_array_extra(&self, key: &str) -> Option<&[String]> {
        match self.extras.get(key) {
            Some(Extra::StringArray(values)) => Some(values),
            _ => None,
        }
    }

    pub fn intent_extra(&self, key: &str) -> Option<&Intent> {
        match self.extras.get(key) {
            Some(Extra::Intent(intent)) => Some(intent),
            _ => None,
        }
    }

    pub fn intents_extra(&self, key: &str) -> Option<&[Intent]> {
        match self.extras.get(key) {
            Some(Extra::Intents(intents)) => Some(intents),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_parts() {
        let uri = Uri::parse("content://com.example.fileprovider/downloads/temp_capture_image.jpg");
        assert_eq!(uri.scheme(), Some("content"));
        assert_eq!(uri.authority(), Some("com.example.fileprovider"));
        assert_eq!(uri.path(), Some("/downloads/temp_capture_image.jpg"));
    }

    #[test]
    fn type_and_data_clear_each_other() {
        let mut intent = Intent::with_data(ACTION_PICK, Uri::parse(IMAGES_EXTERNAL_CONTENT_URI));
        intent.set_type("image/*, video/*");
        assert!(intent.data().is_none());
        assert_eq!(intent.mime_type(), Some("image/*, video/*"));

        intent.set_data(Uri::parse(VIDEO_EXTERNAL_CONTENT_URI));
        assert!(intent.mime_type().is_none());
    }

    #[test]
    fn chooser_wraps_target() {
        let target = Intent::new(ACTION_GET_CONTENT);
        let chooser = Intent::create_chooser(target.clone(), "Pick");
        assert_eq!(chooser.action(), Some(ACTION_CHOOSER));
        assert_eq!(chooser.intent_extra(EXTRA_INTENT), Some(&target));
        assert_eq!(chooser.extra(EXTRA_TITLE), Some(&Extra::String("Pick".into())));
    }

    #[test]
    fn intent_serializes_for_bridge() {
        let mut intent = Intent::new(ACTION_IMAGE_CAPTURE);
        intent.put_extra(EXTRA_OUTPUT, Extra::Uri(Uri::parse("content://media/external/images/media/7")));
        let json = serde_json::to_string(&intent).unwrap();
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
    }
}
