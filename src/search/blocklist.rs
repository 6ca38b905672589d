use std::collections::HashSet;

/// Words that mark a text query as not about fashion.
pub const NON_FASHION_KEYWORDS: &[&str] = &[
    "car",
    "bike",
    "truck",
    "phone",
    "laptop",
    "computer",
    "tablet",
    "dog",
    "cat",
    "animal",
    "food",
    "pizza",
    "burger",
    "pasta",
    "fruit",
    "vegetable",
    "plant",
    "tree",
    "house",
    "apartment",
    "building",
    "city",
    "river",
    "ocean",
    "mountain",
    "road",
    "bridge",
    "train",
    "airplane",
    "boat",
    "ship",
    "microwave",
    "fridge",
    "washing machine",
    "television",
    "radio",
    "printer",
    "keyboard",
    "mouse",
    "book",
    "pen",
    "notebook",
    "paper",
    "chair",
    "table",
    "sofa",
    "bed",
    "lamp",
    "clock",
    "painting",
    "art",
    "sculpture",
    "music",
    "guitar",
    "piano",
    "violin",
    "camera",
    "drone",
    "candle",
    "mirror",
    "glass",
    "bottle",
    "cup",
    "plate",
    "basket",
    "toy",
    "game",
    "football",
    "basketball",
    "tennis",
    "rugby",
    "volleyball",
    "badminton",
    "hockey",
    "cricket",
    "wrestling",
];

/// Cheap keyword pre-filter for text queries.
///
/// Queries are lowercased and split on whitespace; each token is split again
/// on non-alphanumeric characters. Single-word keywords match a whole token or
/// any piece of one, so `car-print` hits `car`. Multi-word keywords match
/// consecutive pieces.
#[derive(Debug, Clone)]
pub struct Blocklist {
    words: HashSet<String>,
    phrases: Vec<Vec<String>>,
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::new(NON_FASHION_KEYWORDS.iter().copied())
    }
}

impl Blocklist {
    pub fn new<S: AsRef<str>>(keywords: impl IntoIterator<Item = S>) -> Self {
        let mut words = HashSet::new();
        let mut phrases = Vec::new();

        for keyword in keywords {
            let parts = pieces(&keyword.as_ref().to_lowercase());
            match parts.len() {
                0 => {}
                1 => {
                    words.extend(parts);
                }
                _ => phrases.push(parts),
            }
        }

        Self { words, phrases }
    }

    /// First blocked keyword found in `query`.
    pub fn find(&self, query: &str) -> Option<String> {
        let lowered = query.to_lowercase();

        for token in lowered.split_whitespace() {
            if self.words.contains(token) {
                return Some(token.to_string());
            }
        }

        let parts = pieces(&lowered);
        if let Some(part) = parts.iter().find(|p| self.words.contains(p.as_str())) {
            return Some(part.clone());
        }

        self.phrases
            .iter()
            .find(|phrase| parts.windows(phrase.len()).any(|w| w == phrase.as_slice()))
            .map(|phrase| phrase.join(" "))
    }

    pub fn blocks(&self, query: &str) -> bool {
        self.find(query).is_some()
    }
}

/// Splits on anything that is not alphanumeric, dropping empty pieces.
fn pieces(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
