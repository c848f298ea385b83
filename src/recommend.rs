use crate::types::risk::RiskLevel;

const SAFE_ACTIONS: &[&str] = &[
    "☁️ Weather conditions are within normal limits",
    "👁️ Stay alert to changes in the weather",
    "🔧 Inspect drainage channels routinely",
    "🧹 Keep waterways clear of debris",
    "📚 Educate residents about disaster mitigation",
];

const WATCH_ACTIONS: &[&str] = &[
    "📡 Monitor weather updates regularly",
    "🎒 Prepare an evacuation plan and emergency bag",
    "👀 Watch for landslide signs (ground cracks, murky water)",
    "⛰️ Avoid activity near slopes",
    "💬 Keep in contact with neighbours",
    "🔦 Prepare lighting and emergency communication gear",
];

const DANGER_ACTIONS: &[&str] = &[
    "🚨 Evacuate immediately to safer, higher ground",
    "📞 Contact the authorities and the search and rescue team",
    "🏔️ Stay away from slopes and cliffs",
    "🎒 Take the emergency bag and important documents",
    "📻 Follow instructions from local officials",
    "👥 Help residents who need assistance evacuating",
];

/// Ordered advisory actions for a risk level.
pub fn recommendations_for(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Safe => SAFE_ACTIONS,
        RiskLevel::Watch => WATCH_ACTIONS,
        RiskLevel::Danger => DANGER_ACTIONS,
    }
}

/// Name-based lookup for external callers; unknown names get the SAFE list.
pub fn recommendations_for_name(name: &str) -> &'static [&'static str] {
    name.parse::<RiskLevel>()
        .map(recommendations_for)
        .unwrap_or(SAFE_ACTIONS)
}
