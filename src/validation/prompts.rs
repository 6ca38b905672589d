//! Zero-shot category prompts. Order is significant: prompts are scored in
//! `FASHION_CATEGORIES ++ NON_FASHION_CATEGORIES` order and ties keep it.

pub const FASHION_CATEGORIES: &[&str] = &[
    "clothing",
    "fashion",
    "apparel",
    "wear",
    "dress",
    "shirt",
    "pants",
    "jeans",
    "t-shirt",
    "jacket",
    "coat",
    "sweater",
    "skirt",
    "blouse",
    "suit",
    "tie",
    "scarf",
    "hat",
    "cap",
    "shoes",
    "boots",
    "sneakers",
    "heels",
    "sandals",
    "accessories",
    "jewelry",
    "watch",
    "bag",
    "purse",
    "handbag",
    "backpack",
    "sunglasses",
    "glasses",
    "belt",
    "wallet",
];

/// Accessory prompts; a subset of [`FASHION_CATEGORIES`] held to a lower bar.
pub const ACCESSORY_CATEGORIES: &[&str] = &[
    "bag",
    "purse",
    "handbag",
    "backpack",
    "wallet",
    "accessories",
    "watch",
    "jewelry",
    "belt",
    "sunglasses",
    "glasses",
];

pub const NON_FASHION_CATEGORIES: &[&str] = &[
    "car",
    "vehicle",
    "landscape",
    "building",
    "food",
    "animal",
    "pet",
    "plant",
    "tree",
    "flower",
    "technology",
    "device",
    "furniture",
    "scenery",
    "nature",
    "mountain",
    "beach",
    "ocean",
    "river",
    "lake",
    "sky",
    "cloud",
    "road",
    "street",
    "city",
    "house",
    "apartment",
    "office",
    "restaurant",
    "cafe",
    "park",
    "garden",
    "forest",
    "desert",
    "logo",
    "symbol",
    "icon",
    "sign",
    "text",
    "diagram",
    "chart",
    "graph",
    "abstract",
    "pattern",
    "texture",
    "background",
    "wallpaper",
];

/// Substrings that count a category toward a variant's fashion confidence
/// in the rotation fallback.
pub const ROTATION_FASHION_KEYWORDS: &[&str] = &[
    "clothing",
    "fashion",
    "apparel",
    "wear",
    "dress",
    "shirt",
    "pants",
    "jeans",
    "jacket",
    "shoes",
    "accessories",
];

/// Every prompt in scoring order.
pub fn all_prompts() -> Vec<&'static str> {
    FASHION_CATEGORIES
        .iter()
        .chain(NON_FASHION_CATEGORIES.iter())
        .copied()
        .collect()
}

pub fn is_fashion(name: &str) -> bool {
    FASHION_CATEGORIES.contains(&name)
}

pub fn is_accessory(name: &str) -> bool {
    ACCESSORY_CATEGORIES.contains(&name)
}

pub fn is_non_fashion(name: &str) -> bool {
    NON_FASHION_CATEGORIES.contains(&name)
}

/// Case-insensitive substring match against any of `keywords`.
pub fn mentions_any(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
