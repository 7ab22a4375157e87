// marketplace-client/src/catalog_source.rs
use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::{Attributes, AttributeValue, Blockchain, CatalogError, CatalogItem};

/// Backend providing the marketplace listings
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Static listings standing in for the ledger backend
#[derive(Debug, Default, Clone)]
pub struct MockCatalogSource;

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: f64,
    image: &'static str,
    owner: &'static str,
    token_id: Option<&'static str>,
    collection: &'static str,
    attributes: &'static [(&'static str, Attr)],
    royalties: f64,
    age_days: i64,
}

#[derive(Clone, Copy)]
enum Attr {
    Text(&'static str),
    Number(f64),
}

const GENESIS: &str = "NFTropoly Genesis";
const AVATARS: &str = "NFTropoly Avatars";

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Metropoly Skyscraper #1",
        description: "A vibrant skyscraper property from the Metropoly district",
        price: 2.5,
        image: "https://placehold.co/400x400/4299e1/ffffff?text=Metropoly+Tower",
        owner: "rrkah-fqaaa-aaaaa-aaaaq-cai",
        token_id: None,
        collection: GENESIS,
        attributes: &[
            ("rarity", Attr::Text("rare")),
            ("district", Attr::Text("Metropoly")),
            ("income", Attr::Number(25.0)),
            ("multiplier", Attr::Number(1.5)),
        ],
        royalties: 5.0,
        age_days: 7,
    },
    Seed {
        id: "2",
        name: "Tycoon Avatar",
        description: "Limited edition Tycoon avatar with gold accessories",
        price: 1.8,
        image: "https://placehold.co/400x400/FFD700/000000?text=Tycoon+Avatar",
        owner: "ryjl3-tyaaa-aaaaa-aaaba-cai",
        token_id: Some("42"),
        collection: AVATARS,
        attributes: &[
            ("rarity", Attr::Text("epic")),
            ("type", Attr::Text("character")),
            ("accessory", Attr::Text("gold chain")),
            ("hat", Attr::Text("top hat")),
        ],
        royalties: 7.5,
        age_days: 14,
    },
    Seed {
        id: "3",
        name: "Rainbow Road Property",
        description: "A colorful road property with bonus movement speed",
        price: 3.2,
        image: "https://placehold.co/400x400/ff3864/ffffff?text=Rainbow+Road",
        owner: "renrk-eyaaa-aaaaa-aaada-cai",
        token_id: None,
        collection: GENESIS,
        attributes: &[
            ("rarity", Attr::Text("legendary")),
            ("district", Attr::Text("Rainbow District")),
            ("income", Attr::Number(35.0)),
            ("specialEffect", Attr::Text("speed boost")),
        ],
        royalties: 5.0,
        age_days: 3,
    },
    Seed {
        id: "4",
        name: "Neon Arcade",
        description: "A futuristic arcade property that generates bonus tokens",
        price: 4.7,
        image: "https://placehold.co/400x400/00ff9f/000000?text=Neon+Arcade",
        owner: "rrkah-fqaaa-aaaaa-aaaaq-cai",
        token_id: None,
        collection: GENESIS,
        attributes: &[
            ("rarity", Attr::Text("epic")),
            ("district", Attr::Text("Entertainment Zone")),
            ("income", Attr::Number(42.0)),
            ("specialEffect", Attr::Text("token generator")),
        ],
        royalties: 5.0,
        age_days: 5,
    },
    Seed {
        id: "5",
        name: "Robux Miner Avatar",
        description: "Special character with mining abilities",
        price: 2.9,
        image: "https://placehold.co/400x400/9d4edd/ffffff?text=Robux+Miner",
        owner: "ryjl3-tyaaa-aaaaa-aaaba-cai",
        token_id: None,
        collection: AVATARS,
        attributes: &[
            ("rarity", Attr::Text("rare")),
            ("type", Attr::Text("character")),
            ("ability", Attr::Text("mining")),
            ("tool", Attr::Text("golden pickaxe")),
        ],
        royalties: 7.5,
        age_days: 10,
    },
    Seed {
        id: "6",
        name: "Candy Factory",
        description: "Sweet property that produces candy resources",
        price: 5.1,
        image: "https://placehold.co/400x400/ff70a6/ffffff?text=Candy+Factory",
        owner: "renrk-eyaaa-aaaaa-aaada-cai",
        token_id: None,
        collection: GENESIS,
        attributes: &[
            ("rarity", Attr::Text("uncommon")),
            ("district", Attr::Text("Sugar Rush")),
            ("income", Attr::Number(30.0)),
            ("resource", Attr::Text("candy")),
        ],
        royalties: 5.0,
        age_days: 8,
    },
    Seed {
        id: "7",
        name: "Space Explorer",
        description: "Astronaut character with space exploration perks",
        price: 7.5,
        image: "https://placehold.co/400x400/3a86ff/ffffff?text=Space+Explorer",
        owner: "rrkah-fqaaa-aaaaa-aaaaq-cai",
        token_id: None,
        collection: AVATARS,
        attributes: &[
            ("rarity", Attr::Text("mythic")),
            ("type", Attr::Text("character")),
            ("ability", Attr::Text("zero gravity")),
            ("accessory", Attr::Text("oxygen tank")),
        ],
        royalties: 10.0,
        age_days: 2,
    },
    Seed {
        id: "8",
        name: "Pixel Bank",
        description: "Financial district property with interest generation",
        price: 6.3,
        image: "https://placehold.co/400x400/8338ec/ffffff?text=Pixel+Bank",
        owner: "ryjl3-tyaaa-aaaaa-aaaba-cai",
        token_id: None,
        collection: GENESIS,
        attributes: &[
            ("rarity", Attr::Text("epic")),
            ("district", Attr::Text("Financial District")),
            ("income", Attr::Number(50.0)),
            ("specialEffect", Attr::Text("interest bonus")),
        ],
        royalties: 5.0,
        age_days: 6,
    },
];

impl Seed {
    fn to_item(&self) -> CatalogItem {
        let attributes: Attributes = self
            .attributes
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Attr::Text(text) => AttributeValue::Text(text.to_string()),
                    Attr::Number(number) => AttributeValue::Number(*number),
                };
                (key.to_string(), value)
            })
            .collect();

        CatalogItem {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            price: self.price,
            image_url: self.image.to_string(),
            owner: self.owner.to_string(),
            blockchain: Blockchain::IC,
            token_id: self.token_id.map(str::to_string),
            collection: Some(self.collection.to_string()),
            attributes: Some(attributes),
            royalties: Some(self.royalties),
            created_at: Utc::now() - Duration::days(self.age_days),
        }
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch_listings(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(SEEDS.iter().map(Seed::to_item).collect())
    }
}
