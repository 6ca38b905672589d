//! Attribute vocabularies. Order is significant: brand tokens match first-wins
//! and every table is indexed by the attribute source.

/// `(lowercase token, display name)`; the first token found in a product name wins.
pub const BRANDS: &[(&str, &str)] = &[
    ("adidas", "ADIDAS"),
    ("nike", "Nike"),
    ("puma", "Puma"),
    ("reebok", "Reebok"),
    ("levis", "Levi's"),
    ("h&m", "H&M"),
    ("zara", "Zara"),
    ("gap", "GAP"),
    ("tommy", "Tommy Hilfiger"),
    ("calvin", "Calvin Klein"),
    ("gucci", "Gucci"),
    ("armani", "Armani"),
    ("tantra", "Tantra"),
    ("locomotive", "Locomotive"),
    ("mr.men", "Mr.Men"),
];

/// `(articleType, min, max)` in dollars.
pub const PRICE_RANGES: &[(&str, f64, f64)] = &[
    ("Tshirts", 19.99, 39.99),
    ("Shirts", 29.99, 59.99),
    ("Jeans", 39.99, 79.99),
    ("Trousers", 34.99, 69.99),
    ("Jackets", 49.99, 129.99),
    ("Sweaters", 39.99, 89.99),
    ("Dresses", 44.99, 99.99),
    ("Skirts", 29.99, 69.99),
    ("Shorts", 24.99, 49.99),
    ("Shoes", 59.99, 149.99),
    ("Watches", 99.99, 299.99),
    ("Bags", 49.99, 199.99),
];

/// Price range for article types without an entry.
pub const DEFAULT_PRICE_RANGE: (f64, f64) = (19.99, 119.99);

pub const MATERIALS: &[(&str, &[&str])] = &[
    ("Tshirts", &["Cotton", "Cotton Blend", "Polyester", "Jersey Knit"]),
    ("Shirts", &["Cotton", "Linen", "Polyester Blend", "Oxford Cloth"]),
    ("Jeans", &["Denim", "Stretch Denim", "Cotton Denim"]),
    ("Trousers", &["Cotton", "Polyester", "Wool Blend", "Khaki"]),
    ("Jackets", &["Leather", "Denim", "Polyester", "Nylon", "Cotton"]),
    ("Sweaters", &["Wool", "Cotton", "Cashmere", "Acrylic"]),
    ("Dresses", &["Cotton", "Polyester", "Silk", "Chiffon", "Satin"]),
    ("Skirts", &["Cotton", "Denim", "Polyester", "Pleated Fabric"]),
    ("Shorts", &["Cotton", "Denim", "Linen", "Polyester"]),
    ("Shoes", &["Leather", "Canvas", "Synthetic", "Mesh"]),
    ("Watches", &["Stainless Steel", "Leather", "Silicone", "Titanium"]),
    ("Bags", &["Leather", "Canvas", "Nylon", "Polyester"]),
];

pub const DEFAULT_MATERIALS: &[&str] = &["Cotton", "Polyester", "Blend"];

pub const PATTERNS: &[&str] = &[
    "Solid",
    "Striped",
    "Checked",
    "Graphic Print",
    "Floral",
    "Polka Dot",
    "Brand Logo",
    "Character Print",
    "Geometric",
    "Abstract",
    "Tie-Dye",
    "Camouflage",
];

/// Brand whose token appears in `name_lower`, first table entry wins.
pub fn brand_in_name(name_lower: &str) -> Option<&'static str> {
    BRANDS
        .iter()
        .find(|(token, _)| name_lower.contains(*token))
        .map(|(_, brand)| *brand)
}

pub fn price_range(article_type: Option<&str>) -> (f64, f64) {
    article_type
        .and_then(|t| PRICE_RANGES.iter().find(|(name, _, _)| *name == t))
        .map(|(_, min, max)| (*min, *max))
        .unwrap_or(DEFAULT_PRICE_RANGE)
}

pub fn materials(article_type: Option<&str>) -> &'static [&'static str] {
    article_type
        .and_then(|t| MATERIALS.iter().find(|(name, _)| *name == t))
        .map(|(_, materials)| *materials)
        .unwrap_or(DEFAULT_MATERIALS)
}
