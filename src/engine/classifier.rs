//! Name-based product classification.
//!
//! Product databases rarely say whether something is a drink or dairy, so
//! meal aggregation infers those traits from the product name. The keyword
//! strategy works on whole tokens: substring matching misreads compound
//! names (the Russian "свино-говядина" contains "вино", wine).

use serde::Serialize;
use strsim::jaro_winkler;

use crate::models::{AlcoholStrength, FoodTemperature, InsulinogenicType, ProteinType};

/// Traits inferred for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTraits {
    pub is_liquid: bool,
    pub insulinogenic: Option<InsulinogenicType>,
    pub protein_type: ProteinType,
    pub alcohol: Option<AlcoholStrength>,
    pub is_spicy: bool,
    pub has_caffeine: bool,
    pub has_resistant_starch: bool,
    pub temperature: Option<FoodTemperature>,
}

pub trait FoodClassifier {
    fn classify(&self, name: &str, category: Option<&str>) -> FoodTraits;
}

// ─── Keyword tables ─────────────────────────────────────────────────────────
// Stems match as token prefixes, words only as whole tokens.

struct Keywords {
    stems: &'static [&'static str],
    words: &'static [&'static str],
}

const LIQUID: Keywords = Keywords {
    stems: &[
        "молок", "кефир", "ряженк", "смузи", "сок", "коктейл", "бульон", "лимонад", "газировк",
        "milk", "kefir", "shake", "smoothie", "juice", "broth", "lemonade", "soda",
    ],
    words: &["кола", "cola", "пепси", "pepsi", "drink", "напиток"],
};

const LIQUID_DAIRY: Keywords = Keywords {
    stems: &["молок", "кефир", "ряженк", "простокваш", "айран", "milk", "kefir", "ayran", "buttermilk"],
    words: &[],
};

const SOFT_DAIRY: Keywords = Keywords {
    stems: &["творог", "йогурт", "сметан", "cottage", "yogurt", "yoghurt", "skyr", "quark"],
    words: &[],
};

const HARD_DAIRY: Keywords = Keywords {
    stems: &["сыр", "брынз", "cheese", "cheddar", "parmesan", "mozzarell", "gouda"],
    words: &[],
};

const PURE_PROTEIN: Keywords = Keywords {
    stems: &["протеин", "whey", "isolate", "изолят", "казеин", "casein", "сывороточн"],
    words: &[],
};

const HIGH_FIBER: Keywords = Keywords {
    stems: &["отруб", "клетчатк", "псиллиум", "bran", "fiber", "fibre", "psyllium"],
    words: &[],
};

const WHEY: Keywords = Keywords {
    stems: &["whey", "сывороточн", "изолят", "isolate", "гейнер", "gainer"],
    words: &["wpc", "wpi", "wph"],
};

const PLANT_PROTEIN: Keywords = Keywords {
    stems: &[
        "горох", "чечевиц", "фасол", "эдамаме", "соев", "тофу", "темпе", "натто", "мисо", "киноа",
        "амарант", "миндал", "арахис", "фисташк", "кешью", "сейтан", "chickpea", "lentil", "bean",
        "legume", "soy", "tofu", "tempeh", "edamame", "quinoa", "amaranth", "almond", "peanut",
        "cashew", "chia", "hemp", "seitan",
    ],
    words: &["нут", "бобы", "соя", "pea", "peas"],
};

const ANIMAL_PROTEIN: Keywords = Keywords {
    stems: &[
        "говядин", "свинин", "курин", "куриц", "индейк", "баранин", "телятин", "мяс", "фарш",
        "рыб", "лосос", "семг", "форел", "тунец", "скумбри", "треск", "минтай", "сельд", "креветк",
        "кальмар", "мидии", "яйц", "яичн", "омлет", "творог", "сыр", "брынз", "казеин", "печень",
        "beef", "pork", "chicken", "turkey", "lamb", "veal", "meat", "fish", "salmon", "tuna",
        "shrimp", "seafood", "egg", "omelet", "cheese", "cottage", "casein", "liver",
    ],
    words: &[],
};

const ANIMAL_CATEGORIES: &[&str] = &[
    "мясо", "рыба", "птица", "морепродукты", "яйца", "meat", "fish", "poultry", "seafood", "eggs",
];
const PLANT_CATEGORIES: &[&str] = &["бобовые", "орехи", "семена", "legumes", "nuts", "seeds"];
const DAIRY_CATEGORIES: &[&str] = &["молочные", "dairy"];

const STRONG_ALCOHOL: Keywords = Keywords {
    stems: &["алкогол", "alcohol"],
    words: &[
        "водка", "vodka", "виски", "whisky", "whiskey", "коньяк", "cognac", "текила", "tequila",
        "джин", "gin", "ром", "rum", "самогон",
    ],
};

const MEDIUM_ALCOHOL: Keywords = Keywords {
    stems: &[],
    words: &[
        "вино", "wine", "шампанское", "champagne", "просекко", "prosecco", "мартини", "martini",
        "вермут", "vermouth",
    ],
};

const WEAK_ALCOHOL: Keywords = Keywords {
    stems: &["лагер"],
    words: &["пиво", "beer", "сидр", "cider", "эль", "ale", "lager", "ликер", "liqueur"],
};

const SPICY: Keywords = Keywords {
    stems: &[
        "чили", "халапеньо", "табаско", "шрирач", "карри", "васаби", "хрен", "кимчи", "аджик",
        "харисс", "остр", "chili", "chilli", "jalapeno", "tabasco", "sriracha", "curry", "wasabi",
        "kimchi", "harissa", "spicy",
    ],
    words: &[],
};

const CAFFEINE: Keywords = Keywords {
    stems: &[
        "кофе", "эспрессо", "капучино", "латте", "американо", "мокко", "матча", "пуэр", "энергетик",
        "coffee", "espresso", "cappuccino", "latte", "americano", "mocha", "matcha",
    ],
    words: &["чай", "tea", "кола", "cola", "пепси", "pepsi"],
};

const RESISTANT_STARCH: Keywords = Keywords {
    stems: &["охлажд", "окрошк", "суши", "sushi"],
    words: &[],
};
const COOLED: &[&str] = &["холодн", "cold", "салат", "salad"];
const STARCHY: &[&str] = &["рис", "картоф", "rice", "potato"];

const HOT: Keywords = Keywords {
    stems: &[
        "суп", "борщ", "горяч", "каш", "рагу", "тушен", "запечен", "жарен", "гриль", "soup", "stew",
        "porridge", "grill", "roast",
    ],
    words: &["hot"],
};

const COLD: Keywords = Keywords {
    stems: &[
        "холодн", "морожен", "смузи", "салат", "окрошк", "гаспачо", "охлажд", "salad", "smoothie",
        "gazpacho", "iced",
    ],
    words: &["cold", "ice"],
};

/// Lowercase, fold "ё" into "е" and split on anything that is not a letter
/// or digit.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('ё', "е")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keyword-rule classifier with a fuzzy fallback for misspelled tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordClassifier {
    /// Minimum Jaro-Winkler similarity for a fuzzy stem match.
    pub fuzzy_threshold: f64,
    /// Shortest token and stem considered for fuzzy matching.
    pub fuzzy_min_len: usize,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.92,
            fuzzy_min_len: 5,
        }
    }
}

impl KeywordClassifier {
    fn exact(tokens: &[String], keywords: &Keywords) -> bool {
        tokens.iter().any(|t| {
            keywords.words.contains(&t.as_str()) || keywords.stems.iter().any(|s| t.starts_with(s))
        })
    }

    fn fuzzy(&self, tokens: &[String], keywords: &Keywords) -> bool {
        tokens
            .iter()
            .filter(|t| t.chars().count() >= self.fuzzy_min_len)
            .any(|t| {
                keywords
                    .stems
                    .iter()
                    .filter(|s| s.chars().count() >= self.fuzzy_min_len)
                    .any(|s| jaro_winkler(t, s) >= self.fuzzy_threshold)
            })
    }

    fn matches(&self, tokens: &[String], keywords: &Keywords) -> bool {
        Self::exact(tokens, keywords) || self.fuzzy(tokens, keywords)
    }

    /// First option with an exact hit, else the first with a fuzzy hit, so
    /// "chicken" never loses to a near miss like "chickpea".
    fn first_match<T: Copy>(&self, tokens: &[String], options: &[(&Keywords, T)]) -> Option<T> {
        options
            .iter()
            .find(|(keywords, _)| Self::exact(tokens, keywords))
            .or_else(|| options.iter().find(|(keywords, _)| self.fuzzy(tokens, keywords)))
            .map(|(_, value)| *value)
    }

    fn any_prefix(tokens: &[String], stems: &[&str]) -> bool {
        tokens.iter().any(|t| stems.iter().any(|s| t.starts_with(s)))
    }

    fn insulinogenic(&self, tokens: &[String]) -> Option<InsulinogenicType> {
        self.first_match(
            tokens,
            &[
                (&LIQUID_DAIRY, InsulinogenicType::LiquidDairy),
                (&SOFT_DAIRY, InsulinogenicType::SoftDairy),
                (&HARD_DAIRY, InsulinogenicType::HardDairy),
                (&PURE_PROTEIN, InsulinogenicType::PureProtein),
                (&HIGH_FIBER, InsulinogenicType::HighFiber),
            ],
        )
    }

    fn protein_type(&self, tokens: &[String], category: Option<&str>) -> ProteinType {
        // Whey before plant before animal: "soy meat" is plant protein
        let by_name = self.first_match(
            tokens,
            &[
                (&WHEY, ProteinType::Whey),
                (&PLANT_PROTEIN, ProteinType::Plant),
                (&ANIMAL_PROTEIN, ProteinType::Animal),
            ],
        );
        if let Some(kind) = by_name {
            return kind;
        }
        let category = category.map(|c| c.trim().to_lowercase()).unwrap_or_default();
        let category = category.as_str();
        if ANIMAL_CATEGORIES.contains(&category) || DAIRY_CATEGORIES.contains(&category) {
            ProteinType::Animal
        } else if PLANT_CATEGORIES.contains(&category) {
            ProteinType::Plant
        } else {
            ProteinType::Mixed
        }
    }

    /// Exact tokens only: short roots like "ром" hide inside unrelated words.
    fn alcohol(&self, tokens: &[String]) -> Option<AlcoholStrength> {
        [
            (&STRONG_ALCOHOL, AlcoholStrength::Strong),
            (&MEDIUM_ALCOHOL, AlcoholStrength::Medium),
            (&WEAK_ALCOHOL, AlcoholStrength::Weak),
        ]
        .into_iter()
        .find(|(keywords, _)| Self::exact(tokens, keywords))
        .map(|(_, strength)| strength)
    }

    fn resistant_starch(&self, tokens: &[String]) -> bool {
        self.matches(tokens, &RESISTANT_STARCH)
            || (Self::any_prefix(tokens, COOLED) && Self::any_prefix(tokens, STARCHY))
    }

    fn temperature(&self, tokens: &[String]) -> Option<FoodTemperature> {
        self.first_match(
            tokens,
            &[(&HOT, FoodTemperature::Hot), (&COLD, FoodTemperature::Cold)],
        )
    }
}

impl FoodClassifier for KeywordClassifier {
    fn classify(&self, name: &str, category: Option<&str>) -> FoodTraits {
        let tokens = tokenize(name);
        if tokens.is_empty() {
            return FoodTraits::default();
        }
        let insulinogenic = self.insulinogenic(&tokens);
        FoodTraits {
            is_liquid: self.matches(&tokens, &LIQUID)
                || insulinogenic == Some(InsulinogenicType::LiquidDairy),
            insulinogenic,
            protein_type: self.protein_type(&tokens, category),
            alcohol: self.alcohol(&tokens),
            is_spicy: self.matches(&tokens, &SPICY),
            has_caffeine: self.matches(&tokens, &CAFFEINE),
            has_resistant_starch: self.resistant_starch(&tokens),
            temperature: self.temperature(&tokens),
        }
    }
}
