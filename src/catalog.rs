//! Static page content: government schemes, the weather snapshot and the home
//! screen shortcuts.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheme {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemeGroup {
    pub label: &'static str,
    /// CSS modifier for the group pill.
    pub accent: &'static str,
    pub schemes: &'static [Scheme],
}

const PM_KISAN: Scheme = Scheme {
    title: "Pradhan Mantri Kisan Samman Nidhi (PM-KISAN)",
    description: "Income support of ₹6,000 per year to landholding farmer families.",
};

const MINOR_IRRIGATION: Scheme = Scheme {
    title: "Minor Irrigation Scheme",
    description: "Construction of tube wells in alluvial soil. Revitalisation of open wells by deepening in hard rock areas. Selection of sites for construction of open wells and bore wells.",
};

pub const SCHEME_GROUPS: &[SchemeGroup] = &[
    SchemeGroup {
        label: "Central schemes",
        accent: "pill-blue",
        schemes: &[PM_KISAN, PM_KISAN, PM_KISAN],
    },
    SchemeGroup {
        label: "Tamilnadu schemes",
        accent: "pill-purple",
        schemes: &[MINOR_IRRIGATION, MINOR_IRRIGATION],
    },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherSnapshot {
    pub location: &'static str,
    pub temperature_c: i32,
    pub condition: &'static str,
    pub precipitation: &'static str,
    pub wind: &'static str,
    pub forecast_days: u8,
    pub day_title: &'static str,
    pub day_summary: &'static str,
    pub crop: &'static str,
    pub advice: &'static str,
}

pub const WEATHER: WeatherSnapshot = WeatherSnapshot {
    location: "Chennai, Tamilnadu",
    temperature_c: 28,
    condition: "Sunny",
    precipitation: "5.1 ml",
    wind: "23 m/s",
    forecast_days: 7,
    day_title: "Monday",
    day_summary: "Today, weather is not good so we need to focus on this and there is possibility of rain.",
    crop: "Paddy",
    advice: "High heat dries paddy quickly; irrigate early morning or evening to prevent crop stress.",
};

impl WeatherSnapshot {
    pub fn headline(&self) -> String {
        format!("{} ({}° C)", self.condition, self.temperature_c)
    }
}

/// Where a home card leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Chat,
    Analysis,
    Schemes,
    Activities,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureCard {
    pub title: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub background: &'static str,
    pub target: Shortcut,
}

pub const FEATURE_CARDS: &[FeatureCard] = &[
    FeatureCard {
        title: "FreshAir Bot",
        description: "Chat with our FreshAir bot to get rid of your doubts",
        color: "#113DFE",
        background: "#DFFAFF",
        target: Shortcut::Chat,
    },
    FeatureCard {
        title: "AI Analysis",
        description: "Capture the image and make analysis using AI",
        color: "#FE4511",
        background: "#FFEADF",
        target: Shortcut::Analysis,
    },
    FeatureCard {
        title: "Schemes",
        description: "Check out the schemes which matches you",
        color: "#2B127D",
        background: "#EBE7FF",
        target: Shortcut::Schemes,
    },
    FeatureCard {
        title: "Recent Activities",
        description: "Recent activities which have done by you",
        color: "#02760F",
        background: "#D9FFDD",
        target: Shortcut::Activities,
    },
];
