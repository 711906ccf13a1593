//! Waste classification index.
//!
//! A fixed reference table of household waste items and a deterministic
//! three-stage lookup from free text to an item:
//!
//! 1. item name contains the query
//! 2. item category contains the query, or else any word of it
//! 3. keyword rules, tried in list order
//!
//! Every stage returns the first hit in table order and stops there.

use serde::Serialize;

/// Static reference record describing how to dispose of one kind of waste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteItem {
    pub name: &'static str,
    pub category: &'static str,
    /// Bin label shown to the citizen.
    pub classification: &'static str,
    pub degradation_method: &'static str,
    pub disposal_instructions: &'static [&'static str],
    pub icon: &'static str,
}

static WASTE_ITEMS: [WasteItem; 20] = [
    WasteItem {
        name: "Fruit and Vegetable Peels",
        category: "Biodegradable Organic Waste",
        classification: "🟢 Green Bin - Wet Waste",
        degradation_method: "Composting (7-30 days)",
        disposal_instructions: &[
            "Collect in a separate container for daily composting",
            "Can be composted at home in a kitchen composter or terrace garden",
            "Mix with dry leaves for faster decomposition",
            "Produces nutrient-rich organic manure within 45-60 days",
            "Can also be given to municipal green waste collection vehicles",
        ],
        icon: "🥕",
    },
    WasteItem {
        name: "Used Tea Leaves and Coffee Grounds",
        category: "Biodegradable Organic Waste",
        classification: "🟢 Green Bin - Wet Waste",
        degradation_method: "Composting (15-30 days)",
        disposal_instructions: &[
            "Add directly to compost bin or plant pots",
            "Acts as natural fertilizer for plants",
            "Can be mixed with soil for potted plants",
            "Helps improve soil texture and drainage",
            "Keep in wet waste bin if not composting",
        ],
        icon: "☕",
    },
    WasteItem {
        name: "Leftover Cooked Food",
        category: "Biodegradable Wet Waste",
        classification: "🟢 Green Bin - Wet Waste",
        degradation_method: "Composting or Biogas (5-15 days)",
        disposal_instructions: &[
            "Can be used as cattle feed if suitable and not spoiled",
            "Add to biogas plants if available in your area",
            "Compost in covered containers to avoid pests",
            "Separate oily food as it takes longer to decompose",
            "Municipal composting facilities can handle this effectively",
        ],
        icon: "🍛",
    },
    WasteItem {
        name: "Paper, Cardboard, Notebooks",
        category: "Recyclable Dry Waste",
        classification: "🔵 Blue Bin - Dry Recyclable",
        degradation_method: "Recycling Process",
        disposal_instructions: &[
            "Keep clean and dry - wet paper cannot be recycled",
            "Remove plastic covers, spiral bindings, and staples",
            "Flatten cardboard boxes to save space",
            "Send to paper recycling units or kabadiwala",
            "Can be repurposed for crafts or packaging before recycling",
        ],
        icon: "📄",
    },
    WasteItem {
        name: "Plastic Bottles (PET)",
        category: "Recyclable Plastic",
        classification: "🔵 Blue Bin - Plastic Recyclable",
        degradation_method: "Recycling (450+ years if not recycled)",
        disposal_instructions: &[
            "Rinse bottles to remove residue before recycling",
            "Remove caps and labels if possible",
            "Can be reused for safe storage of water or dry goods",
            "Send to authorized plastic recycling centers",
            "Check for recycling code (usually #1 PET) at bottom",
        ],
        icon: "🍾",
    },
    WasteItem {
        name: "Plastic Bags, Wrappers, Chips Packets",
        category: "Non-Biodegradable Plastic Waste",
        classification: "⚫ Grey Bin - Non-Recyclable",
        degradation_method: "Does not degrade (1000+ years)",
        disposal_instructions: &[
            "Collect separately and send to authorized plastic waste handlers",
            "NEVER burn as it releases toxic fumes",
            "Look for plastic collection drives in your area",
            "Try to minimize usage by using cloth bags",
            "Some companies accept back for recycling (check brand websites)",
        ],
        icon: "🛍️",
    },
    WasteItem {
        name: "Glass Bottles and Jars",
        category: "Recyclable Material",
        classification: "🟣 Glass Collection",
        degradation_method: "Fully recyclable (degrades in 1 million+ years)",
        disposal_instructions: &[
            "Clean and dry before recycling",
            "Do not break - intact glass has higher recycling value",
            "Remove metal caps and plastic labels",
            "Can be reused for storage before recycling",
            "Send to scrap dealers or glass recycling facilities",
        ],
        icon: "🫙",
    },
    WasteItem {
        name: "Metal Cans, Foils, Bottle Caps",
        category: "Recyclable Metal",
        classification: "🟡 Metal Collection",
        degradation_method: "Fully recyclable (50-200 years if buried)",
        disposal_instructions: &[
            "Clean and flatten cans to save space",
            "Collect separately in a container",
            "Send to metal recyclers or kabadiwala",
            "Aluminum foils can be cleaned and recycled",
            "High recycling value - never throw in general waste",
        ],
        icon: "🥫",
    },
    WasteItem {
        name: "Old Clothes, Rags, Fabrics",
        category: "Textile Waste",
        classification: "♻️ Textile Recycling",
        degradation_method: "6 months - 5 years (natural fabrics)",
        disposal_instructions: &[
            "Donate wearable clothes to NGOs or donation centers",
            "Torn clothes can be sent to textile recycling units",
            "Can be repurposed as cleaning rags",
            "Some brands offer take-back programs",
            "Natural fabrics (cotton) can be composted if shredded",
        ],
        icon: "👕",
    },
    WasteItem {
        name: "Used Batteries",
        category: "E-Waste / Hazardous",
        classification: "🔴 E-Waste Collection Center",
        degradation_method: "Toxic - Must be recycled properly",
        disposal_instructions: &[
            "NEVER throw in regular waste",
            "Collect in a separate container",
            "Take to certified e-waste collection centers",
            "Many electronics stores accept used batteries",
            "Contains toxic heavy metals harmful to soil and water",
        ],
        icon: "🔋",
    },
    WasteItem {
        name: "Mobile Phones, Chargers, Wires",
        category: "E-Waste",
        classification: "🔴 E-Waste Collection Center",
        degradation_method: "Recycling through specialized facilities",
        disposal_instructions: &[
            "Remove SIM cards and memory cards before disposal",
            "Erase all personal data from devices",
            "Take to manufacturer take-back programs",
            "Certified e-waste collectors will extract valuable metals",
            "Can also donate working devices to schools or NGOs",
        ],
        icon: "📱",
    },
    WasteItem {
        name: "Medicines and Expired Tablets",
        category: "Biomedical Hazardous Waste",
        classification: "🔴 Biomedical Disposal",
        degradation_method: "Special incineration required",
        disposal_instructions: &[
            "NEVER flush medicines down the toilet",
            "Return to pharmacies with take-back programs",
            "Place in special biomedical waste bins (if available)",
            "Do not throw in regular garbage",
            "Contact your municipality for medical waste collection days",
        ],
        icon: "💊",
    },
    WasteItem {
        name: "Sanitary Pads and Diapers",
        category: "Biomedical Waste",
        classification: "🔴 Biomedical Waste Bin",
        degradation_method: "500-800 years if not disposed properly",
        disposal_instructions: &[
            "Wrap in paper or newspaper",
            "Mark with a red dot for biomedical waste",
            "Dispose in separate sanitary waste bins (pink/red bins)",
            "Consider switching to biodegradable or reusable options",
            "NEVER flush down toilets - causes sewage blockages",
        ],
        icon: "🩹",
    },
    WasteItem {
        name: "Broken Ceramics, Bulbs, Tubelights",
        category: "Hazardous Waste",
        classification: "🔴 Hazardous Waste Collection",
        degradation_method: "Non-degradable / Contains mercury",
        disposal_instructions: &[
            "Wrap carefully in newspaper to prevent injury",
            "Place in a separate bag marked 'sharp objects'",
            "Tubelights and CFLs contain mercury - very hazardous",
            "Send to authorized recycling units only",
            "NEVER break intentionally - releases toxic mercury vapor",
        ],
        icon: "💡",
    },
    WasteItem {
        name: "Coconut Shells and Nutshells",
        category: "Biodegradable Hard Waste",
        classification: "🟢 Green Bin - Dry Organic",
        degradation_method: "6-12 months for full decomposition",
        disposal_instructions: &[
            "Can be composted but takes longer than soft organic waste",
            "Break into smaller pieces for faster decomposition",
            "Can be used for crafts, planters, or fuel",
            "Mix with wet waste in composting",
            "Municipal green waste collection can handle this",
        ],
        icon: "🥥",
    },
    WasteItem {
        name: "Leaves, Grass, Garden Waste",
        category: "Biodegradable Yard Waste",
        classification: "🟢 Green Bin - Garden Waste",
        degradation_method: "30-60 days composting",
        disposal_instructions: &[
            "Best for composting or mulching",
            "Can be used directly as mulch for plants",
            "Municipal green waste collection trucks accept this",
            "Create leaf compost pit in your garden",
            "Dry leaves can be used as brown matter in composting",
        ],
        icon: "🍃",
    },
    WasteItem {
        name: "Thermocol and Styrofoam",
        category: "Non-Biodegradable Plastic",
        classification: "⚫ Non-Recyclable Waste",
        degradation_method: "Does not biodegrade (500+ years)",
        disposal_instructions: &[
            "Avoid usage whenever possible",
            "Some specialized facilities can recycle - check locally",
            "If recycling not available, send to non-recyclable waste stream",
            "NEVER burn - releases toxic gases",
            "Try to refuse thermocol packaging when ordering items",
        ],
        icon: "📦",
    },
    WasteItem {
        name: "Used Cooking Oil",
        category: "Hazardous Liquid Waste",
        classification: "🔴 Special Collection",
        degradation_method: "Biodiesel conversion possible",
        disposal_instructions: &[
            "NEVER pour into drains - causes blockages",
            "Let it cool and store in a sealed container",
            "Can be given to biodiesel recycling units",
            "Some restaurants and waste collectors accept used oil",
            "Small amounts can be mixed with sawdust and composted",
        ],
        icon: "🛢️",
    },
    WasteItem {
        name: "Cigarette Butts",
        category: "Toxic Non-Biodegradable Waste",
        classification: "🔴 Hazardous Waste",
        degradation_method: "10-12 years, toxic to environment",
        disposal_instructions: &[
            "NEVER throw on roads or in drains",
            "Collect in closed containers",
            "Contains toxic chemicals and microplastics",
            "Send through hazardous waste handlers",
            "Some companies run cigarette waste collection programs",
        ],
        icon: "🚬",
    },
    WasteItem {
        name: "Packaging Cartons (Amazon boxes, etc.)",
        category: "Recyclable Paper Waste",
        classification: "🔵 Blue Bin - Cardboard Recycling",
        degradation_method: "Recycling process",
        disposal_instructions: &[
            "Remove all tape and plastic packaging",
            "Flatten boxes to save storage space",
            "Keep clean and dry for better recycling value",
            "Send to paper recyclers or kabadiwala",
            "Can be reused for storage or creative projects before recycling",
        ],
        icon: "📦",
    },
];

const PEELS: &str = "Fruit and Vegetable Peels";
const TEA: &str = "Used Tea Leaves and Coffee Grounds";
const FOOD: &str = "Leftover Cooked Food";
const PAPER: &str = "Paper, Cardboard, Notebooks";
const PET: &str = "Plastic Bottles (PET)";
const BAGS: &str = "Plastic Bags, Wrappers, Chips Packets";
const GLASS: &str = "Glass Bottles and Jars";
const METAL: &str = "Metal Cans, Foils, Bottle Caps";
const CLOTHES: &str = "Old Clothes, Rags, Fabrics";
const BATTERIES: &str = "Used Batteries";
const PHONES: &str = "Mobile Phones, Chargers, Wires";
const MEDICINES: &str = "Medicines and Expired Tablets";
const SANITARY: &str = "Sanitary Pads and Diapers";
const CERAMICS: &str = "Broken Ceramics, Bulbs, Tubelights";
const SHELLS: &str = "Coconut Shells and Nutshells";
const GARDEN: &str = "Leaves, Grass, Garden Waste";
const THERMOCOL: &str = "Thermocol and Styrofoam";
const OIL: &str = "Used Cooking Oil";
const CIGARETTES: &str = "Cigarette Butts";
const CARTONS: &str = "Packaging Cartons (Amazon boxes, etc.)";

/// Keyword fallback rules, evaluated top to bottom. The first keyword found
/// in the query wins; among its candidates the earliest table item is
/// returned, not the first listed.
pub static KEYWORD_RULES: &[(&str, &[&str])] = &[
    ("fruit", &[PEELS]),
    ("vegetable", &[PEELS]),
    ("peel", &[PEELS]),
    ("tea", &[TEA]),
    ("coffee", &[TEA]),
    ("food", &[FOOD]),
    ("paper", &[PAPER]),
    ("cardboard", &[PAPER, CARTONS]),
    ("notebook", &[PAPER]),
    ("bottle", &[PET, GLASS]),
    ("plastic", &[PET, BAGS]),
    ("bag", &[BAGS]),
    ("wrapper", &[BAGS]),
    ("chips", &[BAGS]),
    ("glass", &[GLASS]),
    ("jar", &[GLASS]),
    ("metal", &[METAL]),
    ("can", &[METAL]),
    ("foil", &[METAL]),
    ("cloth", &[CLOTHES]),
    ("clothes", &[CLOTHES]),
    ("fabric", &[CLOTHES]),
    ("battery", &[BATTERIES]),
    ("mobile", &[PHONES]),
    ("phone", &[PHONES]),
    ("charger", &[PHONES]),
    ("wire", &[PHONES]),
    ("medicine", &[MEDICINES]),
    ("tablet", &[MEDICINES]),
    ("sanitary", &[SANITARY]),
    ("pad", &[SANITARY]),
    ("diaper", &[SANITARY]),
    ("ceramic", &[CERAMICS]),
    ("bulb", &[CERAMICS]),
    ("tubelight", &[CERAMICS]),
    ("coconut", &[SHELLS]),
    ("shell", &[SHELLS]),
    ("leaf", &[GARDEN]),
    ("leaves", &[GARDEN]),
    ("grass", &[GARDEN]),
    ("garden", &[GARDEN]),
    ("thermocol", &[THERMOCOL]),
    ("styrofoam", &[THERMOCOL]),
    ("oil", &[OIL]),
    ("cooking", &[OIL]),
    ("cigarette", &[CIGARETTES]),
    ("butt", &[CIGARETTES]),
    ("box", &[CARTONS]),
    ("carton", &[CARTONS]),
    ("amazon", &[CARTONS]),
];

/// The full reference table in lookup order.
pub fn waste_items() -> &'static [WasteItem] {
    &WASTE_ITEMS
}

/// Exact, case-sensitive name lookup.
pub fn find_by_name(name: &str) -> Option<&'static WasteItem> {
    WASTE_ITEMS.iter().find(|item| item.name == name)
}

/// Resolves a free-text query to a waste item. Blank queries match nothing.
pub fn classify(query: &str) -> Option<&'static WasteItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    match_name(&query)
        .or_else(|| match_category(&query))
        .or_else(|| match_keyword(&query))
}

fn match_name(query: &str) -> Option<&'static WasteItem> {
    WASTE_ITEMS
        .iter()
        .find(|item| item.name.to_lowercase().contains(query))
}

fn match_category(query: &str) -> Option<&'static WasteItem> {
    WASTE_ITEMS
        .iter()
        .find(|item| item.category.to_lowercase().contains(query))
        .or_else(|| {
            WASTE_ITEMS.iter().find(|item| {
                let category = item.category.to_lowercase();
                query.split_whitespace().any(|word| category.contains(word))
            })
        })
}

fn match_keyword(query: &str) -> Option<&'static WasteItem> {
    match_rules(KEYWORD_RULES, query)
}

/// First rule whose keyword the query contains and whose candidates resolve
/// to a table item. A rule with no resolvable candidate falls through.
fn match_rules(rules: &[(&str, &[&str])], query: &str) -> Option<&'static WasteItem> {
    rules
        .iter()
        .filter(|(keyword, _)| query.contains(keyword))
        .find_map(|(_, candidates)| {
            WASTE_ITEMS
                .iter()
                .find(|item| candidates.contains(&item.name))
        })
}
