//! Catalog product model.
//!
//! Wire shapes match the AIMS backend's product JSON: shared fields at the
//! top level plus media-specific attributes discriminated by the `mediaType`
//! tag.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::media::{CoverType, DiscType, MediaType};

/// A product in the AIMS catalog.
///
/// `quantity` is the live stock count and is only ever mutated by the
/// backend (on order approval and product edits); the client treats it as a
/// read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    /// Base value the backend anchors its pricing rules on.
    pub value: Decimal,
    /// Current sell price in VND.
    pub current_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    pub barcode: String,
    /// Units in stock.
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_entry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(
        rename = "imageURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rush_order_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(flatten)]
    pub media: MediaAttributes,
}

impl Product {
    /// The media kind this product belongs to.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        self.media.media_type()
    }
}

/// Media-specific product attributes, tagged by `mediaType` on the wire.
///
/// CD and LP share the album attribute shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mediaType")]
pub enum MediaAttributes {
    #[serde(rename = "BOOK", rename_all = "camelCase")]
    Book {
        author: String,
        cover_type: CoverType,
        publisher: String,
        language: String,
        number_of_page: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        publication_date: Option<NaiveDate>,
    },
    #[serde(rename = "CD")]
    Cd(AlbumAttributes),
    #[serde(rename = "LP")]
    Lp(AlbumAttributes),
    #[serde(rename = "DVD", rename_all = "camelCase")]
    Dvd {
        director: String,
        /// Free-form runtime string, e.g. "142 min".
        runtime: String,
        disc_type: DiscType,
        studio: String,
        subtitle: String,
        language: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        release_date: Option<NaiveDate>,
    },
}

impl MediaAttributes {
    /// The media kind these attributes describe.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::Book { .. } => MediaType::Book,
            Self::Cd(_) => MediaType::Cd,
            Self::Lp(_) => MediaType::Lp,
            Self::Dvd { .. } => MediaType::Dvd,
        }
    }
}

/// Attributes shared by CD and LP records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAttributes {
    pub artist: String,
    pub album: String,
    pub record_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracklist: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn book_json() -> serde_json::Value {
        serde_json::json!({
            "id": 12,
            "mediaType": "BOOK",
            "title": "The Sympathizer",
            "category": "Fiction",
            "value": "180000",
            "currentPrice": "200000",
            "barcode": "8935036612345",
            "quantity": 30,
            "imageURL": "https://cdn.aims.example/p/12.jpg",
            "rushOrderEligible": true,
            "author": "Viet Thanh Nguyen",
            "coverType": "PAPERBACK",
            "publisher": "Grove Press",
            "language": "English",
            "numberOfPage": 384
        })
    }

    #[test]
    fn test_book_roundtrip() {
        let product: Product = serde_json::from_value(book_json()).unwrap();
        assert_eq!(product.media_type(), MediaType::Book);
        assert_eq!(product.current_price, Decimal::from(200_000));
        assert!(product.rush_order_eligible);

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["mediaType"], "BOOK");
        assert_eq!(back["author"], "Viet Thanh Nguyen");
    }

    #[test]
    fn test_cd_and_lp_share_album_shape() {
        let json = serde_json::json!({
            "id": 3,
            "mediaType": "LP",
            "title": "Kind of Blue",
            "category": "Jazz",
            "value": "400000",
            "currentPrice": "450000",
            "barcode": "0886974993-21",
            "quantity": 4,
            "artist": "Miles Davis",
            "album": "Kind of Blue",
            "recordLabel": "Columbia"
        });

        let product: Product = serde_json::from_value(json).unwrap();
        let MediaAttributes::Lp(album) = &product.media else {
            panic!("expected LP attributes");
        };
        assert_eq!(album.artist, "Miles Davis");
    }

    #[test]
    fn test_unknown_media_type_rejected() {
        let mut json = book_json();
        json["mediaType"] = "CASSETTE".into();
        assert!(serde_json::from_value::<Product>(json).is_err());
    }
}
