use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product modules a member can engage with. `Home` is the aggregate
/// landing surface and never owns roles of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Jobs,
    Marketplace,
    Events,
    Education,
    Community,
    AuPair,
    Visa,
    Home,
}

impl Module {
    pub const ALL: [Module; 8] = [
        Module::Jobs,
        Module::Marketplace,
        Module::Events,
        Module::Education,
        Module::Community,
        Module::AuPair,
        Module::Visa,
        Module::Home,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Jobs => "jobs",
            Module::Marketplace => "marketplace",
            Module::Events => "events",
            Module::Education => "education",
            Module::Community => "community",
            Module::AuPair => "au_pair",
            Module::Visa => "visa",
            Module::Home => "home",
        }
    }

    pub fn parse(value: &str) -> Option<Module> {
        match value {
            "jobs" => Some(Module::Jobs),
            "marketplace" => Some(Module::Marketplace),
            "events" => Some(Module::Events),
            "education" => Some(Module::Education),
            "community" => Some(Module::Community),
            "au_pair" => Some(Module::AuPair),
            "visa" => Some(Module::Visa),
            "home" => Some(Module::Home),
            _ => None,
        }
    }

    /// Canonical in-app route for the module's main surface.
    pub fn route(&self) -> &'static str {
        match self {
            Module::Jobs => "/jobs",
            Module::Marketplace => "/marketplace",
            Module::Events => "/events",
            Module::Education => "/education",
            Module::Community => "/community",
            Module::AuPair => "/au-pair",
            Module::Visa => "/visa",
            Module::Home => "/home",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single engagement interaction. Weights follow product analytics:
/// high-intent actions (apply, register) count more than passive visits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Visit,
    Save,
    Apply,
    Contact,
    Register,
    /// Module-specific action not covered by the common kinds.
    Other(String),
}

impl ActionKind {
    pub fn weight(&self) -> f64 {
        match self {
            ActionKind::Visit => 1.0,
            ActionKind::Save => 2.5,
            ActionKind::Apply => 3.0,
            ActionKind::Contact => 2.0,
            ActionKind::Register => 2.5,
            ActionKind::Other(_) => 0.5,
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            ActionKind::Visit => "visit",
            ActionKind::Save => "save",
            ActionKind::Apply => "apply",
            ActionKind::Contact => "contact",
            ActionKind::Register => "register",
            ActionKind::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Roles a member can hold inside a module. Each role belongs to exactly
/// one module; the pairing is enforced through [`RoleType::module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    JobSeeker,
    Employer,
    AuPair,
    HostFamily,
    Attendee,
    Organizer,
    Buyer,
    Seller,
    Student,
    Educator,
    Applicant,
    Consultant,
    Member,
    Moderator,
}

impl RoleType {
    pub const ALL: [RoleType; 14] = [
        RoleType::JobSeeker,
        RoleType::Employer,
        RoleType::AuPair,
        RoleType::HostFamily,
        RoleType::Attendee,
        RoleType::Organizer,
        RoleType::Buyer,
        RoleType::Seller,
        RoleType::Student,
        RoleType::Educator,
        RoleType::Applicant,
        RoleType::Consultant,
        RoleType::Member,
        RoleType::Moderator,
    ];

    /// The module this role lives in.
    pub fn module(&self) -> Module {
        match self {
            RoleType::JobSeeker | RoleType::Employer => Module::Jobs,
            RoleType::AuPair | RoleType::HostFamily => Module::AuPair,
            RoleType::Attendee | RoleType::Organizer => Module::Events,
            RoleType::Buyer | RoleType::Seller => Module::Marketplace,
            RoleType::Student | RoleType::Educator => Module::Education,
            RoleType::Applicant | RoleType::Consultant => Module::Visa,
            RoleType::Member | RoleType::Moderator => Module::Community,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::JobSeeker => "job_seeker",
            RoleType::Employer => "employer",
            RoleType::AuPair => "au_pair",
            RoleType::HostFamily => "host_family",
            RoleType::Attendee => "attendee",
            RoleType::Organizer => "organizer",
            RoleType::Buyer => "buyer",
            RoleType::Seller => "seller",
            RoleType::Student => "student",
            RoleType::Educator => "educator",
            RoleType::Applicant => "applicant",
            RoleType::Consultant => "consultant",
            RoleType::Member => "member",
            RoleType::Moderator => "moderator",
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role a member holds in a module, with the instant it was activated.
/// At most one role per module is held at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleRole {
    pub module: Module,
    pub role_type: RoleType,
    pub activated_at: DateTime<Utc>,
}

impl ModuleRole {
    pub fn new(role_type: RoleType, activated_at: DateTime<Utc>) -> Self {
        Self {
            module: role_type.module(),
            role_type,
            activated_at,
        }
    }

    /// Whether the stored module matches the role type's module.
    pub fn is_consistent(&self) -> bool {
        self.module == self.role_type.module()
    }
}

/// One append-only engagement log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEngagementEvent {
    pub user_id: Uuid,
    pub module: Module,
    pub action: ActionKind,
    pub occurred_at: DateTime<Utc>,
}

/// Aggregated engagement for one module. `engagement_score` is the
/// recency-weighted score in [0, 100]; `actions_count` is lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEngagementScore {
    pub module: Module,
    pub engagement_score: f64,
    pub actions_count: u64,
    pub last_engaged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestFrequency {
    Daily,
    Weekly,
    Never,
}

/// Per-member personalization settings. Created lazily with defaults on
/// first read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationPreferences {
    pub user_id: Uuid,
    pub show_recommendations: bool,
    pub auto_match_enabled: bool,
    pub email_digest_frequency: DigestFrequency,
    pub preferred_language: String,
    pub preferred_currency: String,
    pub favorite_modules: Vec<Module>,
    pub last_visited_module: Option<Module>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalizationPreferences {
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            show_recommendations: true,
            auto_match_enabled: true,
            email_digest_frequency: DigestFrequency::Weekly,
            preferred_language: "en".to_string(),
            preferred_currency: "CAD".to_string(),
            favorite_modules: Vec::new(),
            last_visited_module: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update; fields left `None` keep their value.
    pub fn apply(&mut self, update: PreferencesUpdate, now: DateTime<Utc>) {
        if let Some(show) = update.show_recommendations {
            self.show_recommendations = show;
        }
        if let Some(auto_match) = update.auto_match_enabled {
            self.auto_match_enabled = auto_match;
        }
        if let Some(frequency) = update.email_digest_frequency {
            self.email_digest_frequency = frequency;
        }
        if let Some(language) = update.preferred_language {
            self.preferred_language = language;
        }
        if let Some(currency) = update.preferred_currency {
            self.preferred_currency = currency;
        }
        if let Some(favorites) = update.favorite_modules {
            self.favorite_modules.clear();
            for module in favorites {
                if !self.favorite_modules.contains(&module) {
                    self.favorite_modules.push(module);
                }
            }
        }
        self.updated_at = now;
    }

    /// Returns false when the module was already a favorite.
    pub fn add_favorite(&mut self, module: Module, now: DateTime<Utc>) -> bool {
        if self.favorite_modules.contains(&module) {
            return false;
        }
        self.favorite_modules.push(module);
        self.updated_at = now;
        true
    }

    /// Returns false when the module was not a favorite.
    pub fn remove_favorite(&mut self, module: Module, now: DateTime<Utc>) -> bool {
        let before = self.favorite_modules.len();
        self.favorite_modules.retain(|m| *m != module);
        if self.favorite_modules.len() == before {
            return false;
        }
        self.updated_at = now;
        true
    }

    pub fn touch_last_visited(&mut self, module: Module, now: DateTime<Utc>) {
        self.last_visited_module = Some(module);
        self.updated_at = now;
    }
}

/// Partial preferences update. Favorites, when present, replace the whole
/// list (duplicates dropped, order preserved).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    pub show_recommendations: Option<bool>,
    pub auto_match_enabled: Option<bool>,
    pub email_digest_frequency: Option<DigestFrequency>,
    pub preferred_language: Option<String>,
    pub preferred_currency: Option<String>,
    pub favorite_modules: Option<Vec<Module>>,
}
