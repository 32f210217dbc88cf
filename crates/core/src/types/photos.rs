//! Fixed photo slots on a product.
//!
//! A product has exactly four positional photo slots. Slot 1 is the cover
//! image shown in listings; the others feed the product carousel.

use serde::{Deserialize, Serialize};

/// Number of photo slots on every product.
pub const PHOTO_SLOT_COUNT: usize = 4;

/// Four positional, optional photo URLs.
///
/// Blank or whitespace-only URLs are stored as empty slots, so a form that
/// submits `""` for an unused input clears that slot.
///
/// On the wire the slots are the flat fields `photoUrl`, `photoUrl2`,
/// `photoUrl3` and `photoUrl4`; embed with `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PhotoSlotsRepr", into = "PhotoSlotsRepr")]
pub struct PhotoSlots([Option<String>; PHOTO_SLOT_COUNT]);

impl PhotoSlots {
    /// Build slots from positional values, normalising blanks to `None`.
    #[must_use]
    pub fn new(slots: [Option<String>; PHOTO_SLOT_COUNT]) -> Self {
        Self(slots.map(normalize))
    }

    /// The cover image (slot 1), if set.
    #[must_use]
    pub fn cover(&self) -> Option<&str> {
        self.slot(1)
    }

    /// URL in a 1-based slot. Out-of-range slots are empty.
    #[must_use]
    pub fn slot(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.0.get(index))
            .and_then(Option::as_deref)
    }

    /// All slots in order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(Option::as_deref)
    }

    /// Only the populated URLs, in slot order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(Option::as_deref)
    }

    /// Consume into the raw positional array.
    #[must_use]
    pub fn into_array(self) -> [Option<String>; PHOTO_SLOT_COUNT] {
        self.0
    }
}

fn normalize(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_owned()).filter(|u| !u.is_empty())
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoSlotsRepr {
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default, rename = "photoUrl2")]
    photo_url_2: Option<String>,
    #[serde(default, rename = "photoUrl3")]
    photo_url_3: Option<String>,
    #[serde(default, rename = "photoUrl4")]
    photo_url_4: Option<String>,
}

impl From<PhotoSlotsRepr> for PhotoSlots {
    fn from(repr: PhotoSlotsRepr) -> Self {
        Self::new([
            repr.photo_url,
            repr.photo_url_2,
            repr.photo_url_3,
            repr.photo_url_4,
        ])
    }
}

impl From<PhotoSlots> for PhotoSlotsRepr {
    fn from(slots: PhotoSlots) -> Self {
        let [photo_url, photo_url_2, photo_url_3, photo_url_4] = slots.0;
        Self {
            photo_url,
            photo_url_2,
            photo_url_3,
            photo_url_4,
        }
    }
}
