use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// How long a notification stays in the queue before it expires on its own.
pub const NOTIFICATION_TTL_MS: i64 = 4000;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Delegate,
    Advisor,
    Employee,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgKind {
    Single,
    Group,
}

/// The five thematic questionnaire blocks, kept as a closed enum so an
/// unknown block id can never reach the store.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum BlockId {
    Profile = 1,
    Identity = 2,
    Market = 3,
    Technology = 4,
    Execution = 5,
}

impl BlockId {
    pub const ALL: [BlockId; 5] = [
        BlockId::Profile,
        BlockId::Identity,
        BlockId::Market,
        BlockId::Technology,
        BlockId::Execution,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_number(n: u8) -> Option<BlockId> {
        BlockId::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            BlockId::Profile => "Profilo organizzativo",
            BlockId::Identity => "Identità e storia",
            BlockId::Market => "Mercato e contesto",
            BlockId::Technology => "Tecnologia",
            BlockId::Execution => "Esecuzione e processi",
        }
    }
}

impl From<BlockId> for u8 {
    fn from(id: BlockId) -> u8 {
        id.number()
    }
}

impl TryFrom<u8> for BlockId {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        BlockId::from_number(n).ok_or_else(|| format!("invalid block id {n}"))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockState {
    Locked,
    Todo,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlockStatus {
    pub id: BlockId,
    pub state: BlockState,
    pub progress: u8,
}

impl BlockStatus {
    fn initial(id: BlockId) -> Self {
        let state = if id == BlockId::Profile {
            BlockState::Todo
        } else {
            BlockState::Locked
        };
        BlockStatus {
            id,
            state,
            progress: 0,
        }
    }
}

/// The six fixed functional areas every company is organised into. One
/// department is seeded per (company, area) pair at registration time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    Finance,
    Sales,
    Operations,
    HumanResources,
    It,
    Legal,
}

impl Area {
    pub const ALL: [Area; 6] = [
        Area::Finance,
        Area::Sales,
        Area::Operations,
        Area::HumanResources,
        Area::It,
        Area::Legal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Area::Finance => "Amministrazione e Finanza",
            Area::Sales => "Commerciale e Marketing",
            Area::Operations => "Operazioni e Produzione",
            Area::HumanResources => "Risorse Umane",
            Area::It => "Sistemi Informativi",
            Area::Legal => "Legale e Compliance",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Area::Finance => "finanza",
            Area::Sales => "commerciale",
            Area::Operations => "operazioni",
            Area::HumanResources => "risorse-umane",
            Area::It => "it",
            Area::Legal => "legale",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Area> {
        Area::ALL.iter().copied().find(|a| a.slug() == raw)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub department: Option<Area>,
    pub assigned_blocks: Vec<BlockId>,
}

impl User {
    pub fn can_access_block(&self, block: BlockId) -> bool {
        self.assigned_blocks.contains(&block)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub vat_id: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub legal_form: String,
    #[serde(default)]
    pub employee_count: Option<u32>,
    pub is_main: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub id: Uuid,
    pub company_id: Uuid,
    pub area: Area,
    #[serde(default)]
    pub delegate: Option<Contact>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl Department {
    pub fn seeded(company_id: Uuid, area: Area) -> Self {
        Department {
            id: Uuid::new_v4(),
            company_id,
            area,
            delegate: None,
            members: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub kind: OrgKind,
    pub companies: Vec<Company>,
    pub departments: Vec<Department>,
}

impl Organization {
    pub fn main_company(&self) -> Option<&Company> {
        self.companies.iter().find(|c| c.is_main)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Must,
    Should,
    Could,
    Would,
}

/// Per-document user state. A document with no entry in the map is
/// implicitly MISSING; every transition below replaces the whole record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Uploaded,
    Assigned,
    NotAvailable,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DocumentState {
    pub status: DocumentStatus,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee: Option<Contact>,
}

impl DocumentState {
    pub fn uploaded(file_name: String, at: DateTime<Utc>) -> Self {
        DocumentState {
            status: DocumentStatus::Uploaded,
            file_name: Some(file_name),
            uploaded_at: Some(at),
            assignee: None,
        }
    }

    pub fn assigned(assignee: Contact) -> Self {
        DocumentState {
            status: DocumentStatus::Assigned,
            file_name: None,
            uploaded_at: None,
            assignee: Some(assignee),
        }
    }

    pub fn not_available() -> Self {
        DocumentState {
            status: DocumentStatus::NotAvailable,
            file_name: None,
            uploaded_at: None,
            assignee: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            expires_at: Some(Utc::now() + chrono::Duration::milliseconds(NOTIFICATION_TTL_MS)),
        }
    }
}

// ---------------------------------------------------------------------------
// Block form records. One flat, fully typed record per questionnaire block;
// block 5 (Execution) answers live in the generic `answers` map instead.
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileData {
    pub company_overview: String,
    pub mission: String,
    pub vision: String,
    pub core_values: Vec<String>,
    pub org_chart_notes: String,
    pub key_roles: String,
    pub employee_composition: String,
    pub governance_model: String,
    pub locations: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdentityData {
    pub founding_story: String,
    pub founders: String,
    pub milestones: Vec<String>,
    pub brand_positioning: String,
    pub product_lines: Vec<String>,
    pub turning_points: String,
    pub ownership_history: String,
    pub company_culture: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketData {
    pub target_market: String,
    pub customer_segments: Vec<String>,
    pub main_competitors: String,
    pub competitive_advantage: String,
    pub market_trends: String,
    pub sales_channels: Vec<String>,
    pub export_markets: String,
    pub pricing_strategy: String,
    /// Structured investment-planning entries; the first three count as
    /// dedicated completion slots.
    pub planned_investments: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TechData {
    pub erp_system: String,
    pub crm_system: String,
    pub it_infrastructure: String,
    pub digital_tools: Vec<String>,
    pub data_management: String,
    pub cybersecurity_measures: String,
    pub automation_initiatives: String,
    pub rd_projects: String,
}

// ---------------------------------------------------------------------------
// Root document
// ---------------------------------------------------------------------------

/// The single root document owned by the store. Everything the application
/// knows lives here; `notifications` is the only field excluded from
/// persistence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppDocument {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub organization: Option<Organization>,
    /// Legacy single-company view derived from the organization's main
    /// company at registration time.
    #[serde(default)]
    pub active_company: Option<Company>,
    #[serde(default)]
    pub onboarding_complete: bool,
    #[serde(default = "initial_blocks")]
    pub blocks: [BlockStatus; 5],
    #[serde(default)]
    pub profile: ProfileData,
    #[serde(default)]
    pub identity: IdentityData,
    #[serde(default)]
    pub market: MarketData,
    #[serde(default)]
    pub tech: TechData,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default)]
    pub audio_answers: BTreeMap<String, String>,
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentState>,
    #[serde(skip)]
    pub notifications: Vec<Notification>,
}

fn initial_blocks() -> [BlockStatus; 5] {
    [
        BlockStatus::initial(BlockId::Profile),
        BlockStatus::initial(BlockId::Identity),
        BlockStatus::initial(BlockId::Market),
        BlockStatus::initial(BlockId::Technology),
        BlockStatus::initial(BlockId::Execution),
    ]
}

impl Default for AppDocument {
    fn default() -> Self {
        AppDocument {
            user: None,
            organization: None,
            active_company: None,
            onboarding_complete: false,
            blocks: initial_blocks(),
            profile: ProfileData::default(),
            identity: IdentityData::default(),
            market: MarketData::default(),
            tech: TechData::default(),
            answers: BTreeMap::new(),
            audio_answers: BTreeMap::new(),
            documents: BTreeMap::new(),
            notifications: Vec::new(),
        }
    }
}

impl AppDocument {
    pub fn block(&self, id: BlockId) -> &BlockStatus {
        &self.blocks[id.index()]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BlockStatus {
        &mut self.blocks[id.index()]
    }

    /// Moves every LOCKED block to TODO; blocks already past TODO keep
    /// their state and progress.
    pub fn unlock_all_blocks(&mut self) {
        for status in self.blocks.iter_mut() {
            if status.state == BlockState::Locked {
                status.state = BlockState::Todo;
            }
        }
    }
}
