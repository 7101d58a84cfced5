use std::path::{Path, PathBuf};
use std::sync::Arc;

use jni::objects::{GlobalRef, JClass, JObject, JObjectArray, JString, JValue};
use jni::sys::jobject;
use jni::{JNIEnv, JavaVM};

use crate::intent::{Extra, Intent, Uri};
use crate::platform::{
    DeviceInfo, MediaCollection, MediaEntry, Platform, PlatformError, ResolvedActivity, SDK_TIRAMISU,
};

const MATCH_DEFAULT_ONLY: i32 = 0x0001_0000;
const GET_PERMISSIONS: i32 = 0x0000_1000;
const PERMISSION_GRANTED: i32 = 0;
const LOCAL_FRAME_CAPACITY: i32 = 64;
const FILE_PROVIDER_CLASS: &str = "androidx.core.content.FileProvider";

/// `PackageManager.queryIntentActivities` overload, picked once from the SDK level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivityQuery {
    /// Android 13+, flags wrapped in `PackageManager.ResolveInfoFlags`.
    ResolveInfoFlags,
    /// Plain `int` flags, deprecated from Android 13.
    IntFlags,
}

impl ActivityQuery {
    fn for_sdk(sdk_int: i32) -> Self {
        if sdk_int >= SDK_TIRAMISU {
            ActivityQuery::ResolveInfoFlags
        } else {
            ActivityQuery::IntFlags
        }
    }

    fn query<'a>(
        &self,
        env: &mut JNIEnv<'a>,
        package_manager: &JObject,
        intent: &JObject,
    ) -> Result<JObject<'a>, PlatformError> {
        let list = match self {
            ActivityQuery::ResolveInfoFlags => {
                let flags = env
                    .call_static_method(
                        "android/content/pm/PackageManager$ResolveInfoFlags",
                        "of",
                        "(J)Landroid/content/pm/PackageManager$ResolveInfoFlags;",
                        &[JValue::Long(MATCH_DEFAULT_ONLY as i64)],
                    )?
                    .l()?;
                env.call_method(
                    package_manager,
                    "queryIntentActivities",
                    "(Landroid/content/Intent;Landroid/content/pm/PackageManager$ResolveInfoFlags;)Ljava/util/List;",
                    &[JValue::Object(intent), JValue::Object(&flags)],
                )?
                .l()?
            }
            ActivityQuery::IntFlags => env
                .call_method(
                    package_manager,
                    "queryIntentActivities",
                    "(Landroid/content/Intent;I)Ljava/util/List;",
                    &[JValue::Object(intent), JValue::Int(MATCH_DEFAULT_ONLY)],
                )?
                .l()?,
        };
        Ok(list)
    }
}

/// [`Platform`] backed by the activity the app was started with.
pub struct AndroidPlatform {
    vm: Arc<JavaVM>,
    context: GlobalRef,
    device: DeviceInfo,
    query: ActivityQuery,
}

impl AndroidPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        let vm = Arc::new(unsafe { JavaVM::from_raw(ndk_context::android_context().vm().cast())? });

        let (context, device) = {
            let mut env = vm.attach_current_thread()?;

            let ctx_ptr = ndk_context::android_context().context();
            if ctx_ptr.is_null() {
                return Err(PlatformError::Null("ndk_context::android_context"));
            }

            let context_obj = unsafe { JObject::from_raw(ctx_ptr as jobject) };
            let context = env.new_global_ref(context_obj)?;
            let device = read_device(&mut env)?;
            (context, device)
        };

        log::info!("android platform ready, sdk {} ({})", device.sdk_int, device.manufacturer);
        Ok(Self { query: ActivityQuery::for_sdk(device.sdk_int), vm, context, device })
    }

    /// Launches `intent` from the app's activity; the result arrives through
    /// `onActivityResult` with `request_code`.
    pub fn start_activity_for_result(&self, intent: &Intent, request_code: i32) -> Result<(), PlatformError> {
        self.with_env(|env, context| {
            let java_intent = to_java_intent(env, intent)?;
            env.call_method(
                context,
                "startActivityForResult",
                "(Landroid/content/Intent;I)V",
                &[JValue::Object(&java_intent), JValue::Int(request_code)],
            )?;
            Ok(())
        })
    }

    fn with_env<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T, PlatformError>,
    ) -> Result<T, PlatformError> {
        let mut env = self.vm.attach_current_thread()?;
        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| {
            let context = env.new_local_ref(&self.context)?;
            f(env, &context)
        })
    }

    fn check_self_permission(&self, permission: &str) -> Result<bool, PlatformError> {
        self.with_env(|env, context| {
            let permission = env.new_string(permission)?;
            let result = env
                .call_method(
                    context,
                    "checkSelfPermission",
                    "(Ljava/lang/String;)I",
                    &[JValue::Object(&permission)],
                )?
                .i()?;
            Ok(result == PERMISSION_GRANTED)
        })
    }

    fn requested_permissions(&self) -> Result<Vec<String>, PlatformError> {
        self.with_env(|env, context| {
            let package_manager = package_manager(env, context)?;
            let package_name = env.call_method(context, "getPackageName", "()Ljava/lang/String;", &[])?.l()?;
            let info = env
                .call_method(
                    &package_manager,
                    "getPackageInfo",
                    "(Ljava/lang/String;I)Landroid/content/pm/PackageInfo;",
                    &[JValue::Object(&package_name), JValue::Int(GET_PERMISSIONS)],
                )?
                .l()?;

            let requested = env.get_field(&info, "requestedPermissions", "[Ljava/lang/String;")?.l()?;
            if requested.is_null() {
                return Ok(Vec::new());
            }

            let requested = JObjectArray::from(requested);
            let len = env.get_array_length(&requested)?;
            let mut permissions = Vec::with_capacity(len as usize);
            for i in 0..len {
                let permission = env.get_object_array_element(&requested, i)?;
                permissions.push(java_string(env, permission)?);
            }
            Ok(permissions)
        })
    }

    fn resolve_activities(&self, intent: &Intent) -> Result<Vec<ResolvedActivity>, PlatformError> {
        self.with_env(|env, context| {
            let java_intent = to_java_intent(env, intent)?;
            let package_manager = package_manager(env, context)?;
            let list = self.query.query(env, &package_manager, &java_intent)?;

            let size = env.call_method(&list, "size", "()I", &[])?.i()?;
            let mut resolved = Vec::with_capacity(size as usize);
            for i in 0..size {
                let info = env.call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(i)])?.l()?;
                let activity = env
                    .get_field(&info, "activityInfo", "Landroid/content/pm/ActivityInfo;")?
                    .l()?;
                let package_name = env.get_field(&activity, "packageName", "Ljava/lang/String;")?.l()?;
                let name = env.get_field(&activity, "name", "Ljava/lang/String;")?.l()?;
                resolved.push(ResolvedActivity {
                    package_name: java_string(env, package_name)?,
                    name: java_string(env, name)?,
                });
            }
            Ok(resolved)
        })
    }

    fn lookup_mime_type(&self, extension: &str) -> Result<Option<String>, PlatformError> {
        self.with_env(|env, _| {
            let map = env
                .call_static_method("android/webkit/MimeTypeMap", "getSingleton", "()Landroid/webkit/MimeTypeMap;", &[])?
                .l()?;
            let extension = env.new_string(extension)?;
            let mime_type = env
                .call_method(
                    &map,
                    "getMimeTypeFromExtension",
                    "(Ljava/lang/String;)Ljava/lang/String;",
                    &[JValue::Object(&extension)],
                )?
                .l()?;
            if mime_type.is_null() {
                return Ok(None);
            }
            Ok(Some(java_string(env, mime_type)?))
        })
    }
}

impl Platform for AndroidPlatform {
    fn device(&self) -> DeviceInfo {
        self.device.clone()
    }

    fn is_permission_granted(&self, permission: &str) -> bool {
        self.check_self_permission(permission).unwrap_or_else(|e| {
            log::warn!("checkSelfPermission({permission}) failed: {e}");
            false
        })
    }

    fn has_manifest_permission(&self, permission: &str) -> bool {
        match self.requested_permissions() {
            Ok(requested) => requested.iter().any(|p| p == permission),
            Err(e) => {
                log::warn!("could not read requested permissions: {e}");
                false
            }
        }
    }

    fn query_intent_activities(&self, intent: &Intent) -> Vec<ResolvedActivity> {
        self.resolve_activities(intent).unwrap_or_else(|e| {
            log::warn!("queryIntentActivities({:?}) failed: {e}", intent.action());
            Vec::new()
        })
    }

    fn mime_type_from_extension(&self, extension: &str) -> Option<String> {
        self.lookup_mime_type(extension).unwrap_or_else(|e| {
            log::warn!("MimeTypeMap lookup for {extension} failed: {e}");
            None
        })
    }

    fn insert_media(&self, collection: MediaCollection, entry: &MediaEntry) -> Result<Uri, PlatformError> {
        self.with_env(|env, context| {
            let values = env.new_object("android/content/ContentValues", "()V", &[])?;
            for (column, value) in [
                ("_display_name", &entry.display_name),
                ("mime_type", &entry.mime_type),
                ("relative_path", &entry.relative_path),
            ] {
                let column = env.new_string(column)?;
                let value = env.new_string(value)?;
                env.call_method(
                    &values,
                    "put",
                    "(Ljava/lang/String;Ljava/lang/String;)V",
                    &[JValue::Object(&column), JValue::Object(&value)],
                )?;
            }

            let collection_uri = parse_uri(env, collection.external_content_uri().as_str())?;
            let resolver = content_resolver(env, context)?;
            let uri = env
                .call_method(
                    &resolver,
                    "insert",
                    "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                    &[JValue::Object(&collection_uri), JValue::Object(&values)],
                )?
                .l()?;
            if uri.is_null() {
                return Err(PlatformError::Null("ContentResolver.insert"));
            }
            uri_to_string(env, &uri).map(Uri::parse)
        })
    }

    fn file_provider_uri(&self, path: &Path) -> Result<Uri, PlatformError> {
        self.with_env(|env, context| {
            let file_provider = load_app_class(env, context, FILE_PROVIDER_CLASS)?;
            let package_name = env.call_method(context, "getPackageName", "()Ljava/lang/String;", &[])?.l()?;
            let package_name = java_string(env, package_name)?;
            let authority = env.new_string(format!("{package_name}.fileprovider"))?;
            let path = env.new_string(path.to_string_lossy())?;
            let file = env.new_object("java/io/File", "(Ljava/lang/String;)V", &[JValue::Object(&path)])?;

            let uri = env
                .call_static_method(
                    &file_provider,
                    "getUriForFile",
                    "(Landroid/content/Context;Ljava/lang/String;Ljava/io/File;)Landroid/net/Uri;",
                    &[JValue::Object(context), JValue::Object(&authority), JValue::Object(&file)],
                )?
                .l()?;
            if uri.is_null() {
                return Err(PlatformError::Null("FileProvider.getUriForFile"));
            }
            uri_to_string(env, &uri).map(Uri::parse)
        })
    }

    fn delete(&self, uri: &Uri) -> Result<usize, PlatformError> {
        self.with_env(|env, context| {
            let uri = parse_uri(env, uri.as_str())?;
            let resolver = content_resolver(env, context)?;
            let rows = env
                .call_method(
                    &resolver,
                    "delete",
                    "(Landroid/net/Uri;Ljava/lang/String;[Ljava/lang/String;)I",
                    &[JValue::Object(&uri), JValue::Object(&JObject::null()), JValue::Object(&JObject::null())],
                )?
                .i()?;
            Ok(rows.max(0) as usize)
        })
    }

    fn cache_dir(&self) -> Result<PathBuf, PlatformError> {
        self.with_env(|env, context| {
            let dir = env.call_method(context, "getCacheDir", "()Ljava/io/File;", &[])?.l()?;
            file_path(env, dir)
        })
    }

    fn public_dcim_dir(&self) -> Result<PathBuf, PlatformError> {
        self.with_env(|env, _| {
            let dcim = env
                .get_static_field("android/os/Environment", "DIRECTORY_DCIM", "Ljava/lang/String;")?
                .l()?;
            let dir = env
                .call_static_method(
                    "android/os/Environment",
                    "getExternalStoragePublicDirectory",
                    "(Ljava/lang/String;)Ljava/io/File;",
                    &[JValue::Object(&dcim)],
                )?
                .l()?;
            file_path(env, dir)
        })
    }
}

/// Builds an `android.content.Intent` carrying everything set on `intent`.
pub fn to_java_intent<'a>(env: &mut JNIEnv<'a>, intent: &Intent) -> Result<JObject<'a>, PlatformError> {
    let java_intent = env.new_object("android/content/Intent", "()V", &[])?;

    if let Some(action) = intent.action() {
        let action = env.new_string(action)?;
        env.call_method(
            &java_intent,
            "setAction",
            "(Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&action)],
        )?;
    }

    match (intent.data(), intent.mime_type()) {
        (Some(data), Some(mime_type)) => {
            let data = parse_uri(env, data.as_str())?;
            let mime_type = env.new_string(mime_type)?;
            env.call_method(
                &java_intent,
                "setDataAndType",
                "(Landroid/net/Uri;Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&data), JValue::Object(&mime_type)],
            )?;
        }
        (Some(data), None) => {
            let data = parse_uri(env, data.as_str())?;
            env.call_method(
                &java_intent,
                "setData",
                "(Landroid/net/Uri;)Landroid/content/Intent;",
                &[JValue::Object(&data)],
            )?;
        }
        (None, Some(mime_type)) => {
            let mime_type = env.new_string(mime_type)?;
            env.call_method(
                &java_intent,
                "setType",
                "(Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&mime_type)],
            )?;
        }
        (None, None) => {}
    }

    for category in intent.categories() {
        let category = env.new_string(category)?;
        env.call_method(
            &java_intent,
            "addCategory",
            "(Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&category)],
        )?;
    }

    if let Some(component) = intent.component() {
        let package = env.new_string(&component.package)?;
        let class = env.new_string(&component.class)?;
        let component = env.new_object(
            "android/content/ComponentName",
            "(Ljava/lang/String;Ljava/lang/String;)V",
            &[JValue::Object(&package), JValue::Object(&class)],
        )?;
        env.call_method(
            &java_intent,
            "setComponent",
            "(Landroid/content/ComponentName;)Landroid/content/Intent;",
            &[JValue::Object(&component)],
        )?;
    }

    if let Some(package) = intent.package() {
        let package = env.new_string(package)?;
        env.call_method(
            &java_intent,
            "setPackage",
            "(Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&package)],
        )?;
    }

    for (key, extra) in intent.extras() {
        put_extra(env, &java_intent, key, extra)?;
    }

    Ok(java_intent)
}

fn put_extra(env: &mut JNIEnv, java_intent: &JObject, key: &str, extra: &Extra) -> Result<(), PlatformError> {
    let key = env.new_string(key)?;
    match extra {
        Extra::Bool(value) => {
            env.call_method(
                java_intent,
                "putExtra",
                "(Ljava/lang/String;Z)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Bool(u8::from(*value))],
            )?;
        }
        Extra::Int(value) => {
            env.call_method(
                java_intent,
                "putExtra",
                "(Ljava/lang/String;I)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Int(*value)],
            )?;
        }
        Extra::String(value) => {
            let value = env.new_string(value)?;
            env.call_method(
                java_intent,
                "putExtra",
                "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Object(&value)],
            )?;
        }
        Extra::StringArray(values) => {
            let array = env.new_object_array(values.len() as i32, "java/lang/String", JObject::null())?;
            for (i, value) in values.iter().enumerate() {
                let value = env.new_string(value)?;
                env.set_object_array_element(&array, i as i32, value)?;
            }
            env.call_method(
                java_intent,
                "putExtra",
                "(Ljava/lang/String;[Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Object(&array)],
            )?;
        }
        Extra::Uri(uri) => {
            let uri = parse_uri(env, uri.as_str())?;
            put_parcelable(env, java_intent, &key, &uri)?;
        }
        Extra::Intent(inner) => {
            let inner = to_java_intent(env, inner)?;
            put_parcelable(env, java_intent, &key, &inner)?;
        }
        Extra::Intents(intents) => {
            let array = env.new_object_array(intents.len() as i32, "android/os/Parcelable", JObject::null())?;
            for (i, inner) in intents.iter().enumerate() {
                let inner = to_java_intent(env, inner)?;
                env.set_object_array_element(&array, i as i32, inner)?;
            }
            env.call_method(
                java_intent,
                "putExtra",
                "(Ljava/lang/String;[Landroid/os/Parcelable;)Landroid/content/Intent;",
                &[JValue::Object(&key), JValue::Object(&array)],
            )?;
        }
    }
    Ok(())
}

fn put_parcelable(env: &mut JNIEnv, java_intent: &JObject, key: &JString, value: &JObject) -> Result<(), PlatformError> {
    env.call_method(
        java_intent,
        "putExtra",
        "(Ljava/lang/String;Landroid/os/Parcelable;)Landroid/content/Intent;",
        &[JValue::Object(key), JValue::Object(value)],
    )?;
    Ok(())
}

fn read_device(env: &mut JNIEnv) -> Result<DeviceInfo, PlatformError> {
    let sdk_int = env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")?.i()?;
    let manufacturer = env
        .get_static_field("android/os/Build", "MANUFACTURER", "Ljava/lang/String;")?
        .l()?;
    Ok(DeviceInfo { sdk_int, manufacturer: java_string(env, manufacturer)? })
}

fn java_string(env: &mut JNIEnv, obj: JObject) -> Result<String, PlatformError> {
    if obj.is_null() {
        return Err(PlatformError::Null("java.lang.String"));
    }
    Ok(env.get_string(&JString::from(obj))?.into())
}

fn file_path(env: &mut JNIEnv, file: JObject) -> Result<PathBuf, PlatformError> {
    if file.is_null() {
        return Err(PlatformError::Null("java.io.File"));
    }
    let path = env.call_method(&file, "getAbsolutePath", "()Ljava/lang/String;", &[])?.l()?;
    Ok(PathBuf::from(java_string(env, path)?))
}

fn parse_uri<'a>(env: &mut JNIEnv<'a>, uri: &str) -> Result<JObject<'a>, PlatformError> {
    let uri = env.new_string(uri)?;
    Ok(env
        .call_static_method("android/net/Uri", "parse", "(Ljava/lang/String;)Landroid/net/Uri;", &[JValue::Object(&uri)])?
        .l()?)
}

fn uri_to_string(env: &mut JNIEnv, uri: &JObject) -> Result<String, PlatformError> {
    let string = env.call_method(uri, "toString", "()Ljava/lang/String;", &[])?.l()?;
    java_string(env, string)
}

fn package_manager<'a>(env: &mut JNIEnv<'a>, context: &JObject) -> Result<JObject<'a>, PlatformError> {
    Ok(env
        .call_method(context, "getPackageManager", "()Landroid/content/pm/PackageManager;", &[])?
        .l()?)
}

fn content_resolver<'a>(env: &mut JNIEnv<'a>, context: &JObject) -> Result<JObject<'a>, PlatformError> {
    Ok(env
        .call_method(context, "getContentResolver", "()Landroid/content/ContentResolver;", &[])?
        .l()?)
}

/// App classes (androidx included) are invisible to `FindClass` from a native thread,
/// so they go through the context's class loader.
fn load_app_class<'a>(env: &mut JNIEnv<'a>, context: &JObject, name: &str) -> Result<JClass<'a>, PlatformError> {
    let loader = env.call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])?.l()?;
    let name = env.new_string(name)?;
    let class = env
        .call_method(&loader, "loadClass", "(Ljava/lang/String;)Ljava/lang/Class;", &[JValue::Object(&name)])?
        .l()?;
    Ok(JClass::from(class))
}
