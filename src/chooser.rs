use crate::capture::MediaKind;

pub const GOOGLE_PHOTOS_PACKAGE: &str = "com.google.android.apps.photos";
pub const SAMSUNG_MANUFACTURER: &str = "samsung";

/// Which picker sits behind the capture shortcuts in the chooser dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerStrategy {
    /// `ACTION_PICK` on a single media collection.
    SingleMedia(MediaKind),
    /// `ACTION_PICK` offering both images and videos.
    CombinedMedia,
    /// `ACTION_GET_CONTENT` over the accepted MIME types.
    Document,
}

/// Inputs to the picker decision, gathered once per chooser request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChooserFacts {
    pub images_allowed: bool,
    pub videos_allowed: bool,
    pub only_images_and_video: bool,
    /// Google Photos is the one and only handler of the image pick action.
    pub photos_sole_image_picker: bool,
}

pub struct ChooserRule {
    pub name: &'static str,
    pub applies: fn(&ChooserFacts) -> bool,
    pub strategy: fn(&ChooserFacts) -> PickerStrategy,
}

/// Evaluated top to bottom, the first matching rule wins.
///
/// Google Photos ignores the combined image/video pick, so when it is the only
/// handler the generic document picker is used instead.
pub const CHOOSER_RULES: &[ChooserRule] = &[
    ChooserRule {
        name: "single media",
        applies: |f| f.images_allowed ^ f.videos_allowed,
        strategy: |f| {
            if f.images_allowed {
                PickerStrategy::SingleMedia(MediaKind::Image)
            } else {
                PickerStrategy::SingleMedia(MediaKind::Video)
            }
        },
    },
    ChooserRule {
        name: "combined media",
        applies: |f| f.only_images_and_video && !f.photos_sole_image_picker,
        strategy: |_| PickerStrategy::CombinedMedia,
    },
    ChooserRule {
        name: "document",
        applies: |_| true,
        strategy: |_| PickerStrategy::Document,
    },
];

pub fn select_strategy(facts: &ChooserFacts) -> PickerStrategy {
    CHOOSER_RULES
        .iter()
        .find(|rule| (rule.applies)(facts))
        .map(|rule| {
            log::debug!("chooser rule '{}' matched {:?}", rule.name, facts);
            (rule.strategy)(facts)
        })
        .unwrap_or(PickerStrategy::Document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(images: bool, videos: bool, only_media: bool, photos_sole: bool) -> ChooserFacts {
        ChooserFacts {
            images_allowed: images,
            videos_allowed: videos,
            only_images_and_video: only_media,
            photos_sole_image_picker: photos_sole,
        }
    }

    #[test]
    fn exclusive_media_picks_that_collection() {
        for (only_media, photos_sole) in [(false, false), (true, true), (true, false), (false, true)] {
            assert_eq!(
                select_strategy(&facts(true, false, only_media, photos_sole)),
                PickerStrategy::SingleMedia(MediaKind::Image)
            );
            assert_eq!(
                select_strategy(&facts(false, true, only_media, photos_sole)),
                PickerStrategy::SingleMedia(MediaKind::Video)
            );
        }
    }

    #[test]
    fn both_or_neither_allowed_uses_combined_picker_for_media_only() {
        assert_eq!(select_strategy(&facts(true, true, true, false)), PickerStrategy::CombinedMedia);
        assert_eq!(select_strategy(&facts(false, false, true, false)), PickerStrategy::CombinedMedia);
    }

    #[test]
    fn sole_google_photos_falls_back_to_documents() {
        assert_eq!(select_strategy(&facts(true, true, true, true)), PickerStrategy::Document);
        assert_eq!(select_strategy(&facts(false, false, true, true)), PickerStrategy::Document);
    }

    #[test]
    fn mixed_types_use_documents() {
        assert_eq!(select_strategy(&facts(true, true, false, false)), PickerStrategy::Document);
        assert_eq!(select_strategy(&facts(false, false, false, false)), PickerStrategy::Document);
    }

    #[test]
    fn last_rule_always_applies() {
        let last = CHOOSER_RULES.last().unwrap();
        assert!((last.applies)(&ChooserFacts::default()));
    }
}
