use std::collections::BTreeSet;

pub const WILDCARD: &str = "*/*";

/// Accepted MIME types of one upload request plus its multiple-selection flag.
///
/// Built from the `accept` tokens a page hands over: `.ext` tokens go through the
/// platform's extension registry, tokens with a `/` are kept as MIME types, anything
/// else is dropped. Never empty, an input that yields nothing becomes `*/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    mime_types: BTreeSet<String>,
    allow_multiple: bool,
}

impl Default for UploadSpec {
    fn default() -> Self {
        UploadSpec { mime_types: BTreeSet::from([WILDCARD.to_string()]), allow_multiple: false }
    }
}

impl UploadSpec {
    pub fn parse<S: AsRef<str>>(
        specs: &[S],
        allow_multiple: bool,
        lookup_extension: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut mime_types = BTreeSet::new();

        for token in specs
            .iter()
            .flat_map(|spec| spec.as_ref().split(|c: char| c == ',' || c == ';' || c.is_whitespace()))
            .filter(|token| !token.is_empty())
        {
            if let Some(extension) = token.strip_prefix('.') {
                match lookup_extension(&extension.to_lowercase()) {
                    Some(mime_type) => {
                        mime_types.insert(mime_type);
                    }
                    None => log::debug!("dropping unmapped extension {token}"),
                }
            } else if token.contains('/') {
                mime_types.insert(token.to_string());
            } else {
                log::debug!("dropping unrecognized accept token {token}");
            }
        }

        if mime_types.is_empty() {
            mime_types.insert(WILDCARD.to_string());
        }

        UploadSpec { mime_types, allow_multiple }
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.mime_types.iter().map(String::as_str)
    }

    pub fn allow_multiple(&self) -> bool {
        self.allow_multiple
    }

    pub fn contains(&self, mime_type: &str) -> bool {
        self.mime_types.contains(mime_type)
    }

    pub fn accepts_any(&self) -> bool {
        self.contains(WILDCARD)
    }

    pub fn can_upload_image(&self) -> bool {
        self.accepts_any() || self.mime_types.iter().any(|m| m.contains("image/"))
    }

    pub fn can_upload_video(&self) -> bool {
        self.accepts_any() || self.mime_types.iter().any(|m| m.contains("video/"))
    }

    /// Every accepted type is an image or video type.
    pub fn only_images_and_video(&self) -> bool {
        self.mime_types.iter().all(|m| m.starts_with("image/") || m.starts_with("video/"))
    }

    /// Value for `Intent.setType` on the generic document picker.
    pub fn joined(&self) -> String {
        self.mime_types().collect::<Vec<_>>().join(", ")
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.mime_types.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ext: &str) -> Option<String> {
        match ext {
            "png" => Some("image/png".into()),
            "jpg" | "jpeg" => Some("image/jpeg".into()),
            "mp4" => Some("video/mp4".into()),
            "pdf" => Some("application/pdf".into()),
            _ => None,
        }
    }

    fn types(spec: &UploadSpec) -> Vec<&str> {
        spec.mime_types().collect()
    }

    #[test]
    fn extensions_resolve_through_registry() {
        let spec = UploadSpec::parse(&[".png", ".jpg"], false, registry);
        assert_eq!(types(&spec), vec!["image/jpeg", "image/png"]);
        assert!(!spec.allow_multiple());
    }

    #[test]
    fn extension_lookup_is_lowercased() {
        let spec = UploadSpec::parse(&[".PDF"], false, registry);
        assert_eq!(types(&spec), vec!["application/pdf"]);
    }

    #[test]
    fn splits_on_commas_semicolons_and_whitespace() {
        let spec = UploadSpec::parse(&["image/*, .pdf;video/mp4\ttext/plain"], true, registry);
        assert_eq!(types(&spec), vec!["application/pdf", "image/*", "text/plain", "video/mp4"]);
        assert!(spec.allow_multiple());
    }

    #[test]
    fn literal_types_pass_through_unchanged() {
        let spec = UploadSpec::parse(&["application/x-Custom+json"], false, registry);
        assert_eq!(types(&spec), vec!["application/x-Custom+json"]);
    }

    #[test]
    fn all_dropped_yields_wildcard() {
        for input in [vec![], vec![""], vec![".unknown", "image", "  "]] {
            let spec = UploadSpec::parse(input.as_slice(), false, registry);
            assert_eq!(types(&spec), vec![WILDCARD]);
        }
    }

    #[test]
    fn capability_queries() {
        let any = UploadSpec::default();
        assert!(any.can_upload_image() && any.can_upload_video());
        assert!(!any.only_images_and_video());

        let images = UploadSpec::parse(&["image/*"], false, registry);
        assert!(images.can_upload_image());
        assert!(!images.can_upload_video());
        assert!(images.only_images_and_video());

        let docs = UploadSpec::parse(&[".pdf"], false, registry);
        assert!(!docs.can_upload_image());
        assert!(!docs.can_upload_video());
    }

    #[test]
    fn joined_matches_set_order() {
        let spec = UploadSpec::parse(&["video/mp4", "image/png"], false, registry);
        assert_eq!(spec.joined(), "image/png, video/mp4");
        assert_eq!(spec.to_vec(), vec!["image/png".to_string(), "video/mp4".to_string()]);
    }
}
