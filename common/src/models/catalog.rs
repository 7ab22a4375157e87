// common/src/models/catalog.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use chrono::{DateTime, Utc};

/// Chains a listing can live on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Blockchain {
    IC,
    ETH,
    SOL,
    BTC,
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Blockchain::IC => "IC",
            Blockchain::ETH => "ETH",
            Blockchain::SOL => "SOL",
            Blockchain::BTC => "BTC",
        };
        f.write_str(name)
    }
}

/// Free-form attribute value attached to a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// A tradable item held in the catalog store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub owner: String,
    pub blockchain: Blockchain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalties: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Item data submitted for listing; id is generated when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub owner: String,
    pub blockchain: Blockchain,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub attributes: Option<Attributes>,
    #[serde(default)]
    pub royalties: Option<f64>,
}

impl ListingDraft {
    /// Stamp the draft into a catalog item
    pub fn into_item(self, fallback_id: String, created_at: DateTime<Utc>) -> CatalogItem {
        CatalogItem {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or(fallback_id),
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            owner: self.owner,
            blockchain: self.blockchain,
            token_id: self.token_id,
            collection: self.collection,
            attributes: self.attributes,
            royalties: self.royalties,
            created_at,
        }
    }
}

/// Fetch sub-state reported alongside the catalog items
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Nothing fetched yet
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSnapshot {
    pub items: Vec<CatalogItem>,
    pub status: FetchStatus,
}

impl CatalogSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, FetchStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Errored(message) => Some(message),
            _ => None,
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_by_owner(&self, owner: &str) -> Vec<CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: Option<&str>) -> ListingDraft {
        ListingDraft {
            id: id.map(str::to_string),
            name: "Pixel Bank".to_string(),
            description: "Financial district property".to_string(),
            price: 6.3,
            image_url: "https://placehold.co/400x400".to_string(),
            owner: "ryjl3-tyaaa-aaaaa-aaaba-cai".to_string(),
            blockchain: Blockchain::IC,
            token_id: None,
            collection: None,
            attributes: None,
            royalties: Some(5.0),
        }
    }

    #[test]
    fn test_draft_keeps_explicit_id() {
        let item = draft(Some("bank-1")).into_item("generated".into(), Utc::now());
        assert_eq!(item.id, "bank-1");
    }

    #[test]
    fn test_draft_uses_fallback_for_missing_or_empty_id() {
        assert_eq!(draft(None).into_item("abc1234".into(), Utc::now()).id, "abc1234");
        assert_eq!(draft(Some("")).into_item("abc1234".into(), Utc::now()).id, "abc1234");
    }

    #[test]
    fn test_item_wire_shape() {
        let mut attributes = Attributes::new();
        attributes.insert("rarity".into(), "epic".into());
        attributes.insert("income".into(), 50.0.into());
        attributes.insert("tradable".into(), true.into());
        let mut item = draft(Some("8")).into_item(String::new(), Utc::now());
        item.attributes = Some(attributes);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["imageUrl"], "https://placehold.co/400x400");
        assert_eq!(json["blockchain"], "IC");
        assert_eq!(json["attributes"]["income"], 50.0);
        assert_eq!(json["attributes"]["tradable"], true);
        assert!(json.get("tokenId").is_none());

        let back: CatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.attributes, item.attributes);
    }

    #[test]
    fn test_snapshot_lookups() {
        let snapshot = CatalogSnapshot {
            items: vec![
                draft(Some("1")).into_item(String::new(), Utc::now()),
                draft(Some("2")).into_item(String::new(), Utc::now()),
            ],
            status: FetchStatus::Loaded,
        };
        assert_eq!(snapshot.get_by_id("2").map(|i| i.id.as_str()), Some("2"));
        assert!(snapshot.get_by_id("3").is_none());
        assert_eq!(snapshot.get_by_owner("ryjl3-tyaaa-aaaaa-aaaba-cai").len(), 2);
        assert!(snapshot.get_by_owner("nobody").is_empty());
    }
}
