use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// One displayable image, supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: String,
    pub width: f64,
    pub height: f64,
}

impl MediaItem {
    pub fn new(url: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// Width over height, if both dimensions are usable.
    pub fn aspect(&self) -> Option<f64> {
        if self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
        {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Rendered scale for a plane generated with `base` scale: keep the
    /// generated height and derive the width from the image aspect ratio.
    pub fn display_scale(&self, base: Vec3) -> Vec3 {
        match self.aspect() {
            Some(aspect) => Vec3::new(base.y * aspect, base.y, 1.0),
            None => base,
        }
    }
}

/// Ordered, immutable media list. Insertion order defines the stable index
/// used by the layout's media counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaList {
    items: Vec<MediaItem>,
}

impl MediaList {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Index selected by a plane's media counter: `counter mod len`.
    pub fn index_for(&self, counter: u32) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(counter as usize % self.items.len())
    }

    pub fn resolve(&self, counter: u32) -> Option<&MediaItem> {
        self.index_for(counter).and_then(|i| self.items.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaItem, MediaList};
    use foundation::math::Vec3;

    #[test]
    fn counters_wrap_modulo_length() {
        let list = MediaList::new(vec![
            MediaItem::new("a", 1.0, 1.0),
            MediaItem::new("b", 1.0, 1.0),
            MediaItem::new("c", 1.0, 1.0),
        ]);
        assert_eq!(list.index_for(0), Some(0));
        assert_eq!(list.index_for(4), Some(1));
        assert_eq!(list.index_for(u32::MAX), Some(u32::MAX as usize % 3));
        assert_eq!(list.resolve(5).map(|m| m.url.as_str()), Some("c"));
    }

    #[test]
    fn single_and_empty_lists() {
        let one = MediaList::new(vec![MediaItem::new("a", 800.0, 600.0)]);
        assert!((0..50).all(|c| one.index_for(c) == Some(0)));
        assert_eq!(MediaList::default().resolve(7), None);
    }

    #[test]
    fn display_scale_follows_aspect() {
        let item = MediaItem::new("a", 800.0, 400.0);
        assert_eq!(
            item.display_scale(Vec3::new(10.0, 10.0, 1.0)),
            Vec3::new(20.0, 10.0, 1.0)
        );
        let unknown = MediaItem::new("b", 0.0, 400.0);
        assert_eq!(
            unknown.display_scale(Vec3::new(3.0, 3.0, 1.0)),
            Vec3::new(3.0, 3.0, 1.0)
        );
    }

    #[test]
    fn parses_manifest_json() {
        let json = r#"[{"url":"a","width":800,"height":600}]"#;
        let list: MediaList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0], MediaItem::new("a", 800.0, 600.0));
    }
}
