pub mod storage;

use crate::domain::access;
use crate::domain::models::{
    AppDocument, Area, BlockId, BlockState, Company, Contact, Department, DocumentState,
    IdentityData, MarketData, Notification, NotificationKind, OrgKind, Organization, ProfileData,
    Role, TeamMember, TechData, User,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use storage::JsonStorage;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// The application state manager. Owns the single root document, persists
/// it on every change and broadcasts each new snapshot to subscribers.
///
/// Every mutating operation is total over its input domain: there is no
/// error channel, and a failed durable write is logged without failing the
/// operation (the last successful write wins on the next load).
pub struct StateStore {
    doc: RwLock<AppDocument>,
    storage: JsonStorage,
    updates: watch::Sender<AppDocument>,
}

impl StateStore {
    pub fn open(storage: JsonStorage) -> Self {
        let doc = storage.load();
        let (updates, _) = watch::channel(doc.clone());
        StateStore {
            doc: RwLock::new(doc),
            storage,
            updates,
        }
    }

    pub async fn snapshot(&self) -> AppDocument {
        self.doc.read().await.clone()
    }

    /// Subscribers observe every new snapshot in order of commit.
    pub fn subscribe(&self) -> watch::Receiver<AppDocument> {
        self.updates.subscribe()
    }

    /// Applies one mutation under the write lock, persists the result
    /// before returning, then broadcasts and returns the new snapshot.
    /// The durable copy is therefore never behind what callers observe.
    async fn mutate<F>(&self, f: F) -> AppDocument
    where
        F: FnOnce(&mut AppDocument),
    {
        let mut guard = self.doc.write().await;
        f(&mut guard);
        if let Err(e) = self.storage.save(&guard) {
            tracing::error!("state persistence failed: {e}");
        }
        let snapshot = guard.clone();
        drop(guard);
        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    fn push_note(doc: &mut AppDocument, kind: NotificationKind, message: String) {
        doc.notifications.push(Notification::new(kind, message));
    }

    // -- session ----------------------------------------------------------

    /// Installs the demo user for the given role. Owners get every block
    /// unlocked immediately.
    pub async fn login(&self, role: Role) -> AppDocument {
        self.mutate(|doc| {
            let user = access::demo_user(role);
            let greeting = format!("Bentornato, {}", user.name);
            if role == Role::Owner {
                doc.unlock_all_blocks();
            }
            doc.user = Some(user);
            Self::push_note(doc, NotificationKind::Success, greeting);
        })
        .await
    }

    /// Clears the user only; the workspace data stays in place.
    pub async fn logout(&self) -> AppDocument {
        self.mutate(|doc| {
            doc.user = None;
        })
        .await
    }

    /// Installs the organization built by the registration wizard, derives
    /// the legacy active-company view from the flagged main company, seeds
    /// one department per (company, fixed area) pair and unlocks all five
    /// blocks. The caller is responsible for validating that `companies`
    /// is non-empty with exactly one main entry.
    pub async fn register_owner(
        &self,
        owner: User,
        kind: OrgKind,
        companies: Vec<Company>,
    ) -> AppDocument {
        self.mutate(|doc| {
            let departments = companies
                .iter()
                .flat_map(|company| {
                    Area::ALL
                        .iter()
                        .map(|area| Department::seeded(company.id, *area))
                })
                .collect();
            let organization = Organization {
                kind,
                companies,
                departments,
            };
            doc.active_company = organization.main_company().cloned();
            doc.organization = Some(organization);
            doc.user = Some(owner);
            doc.onboarding_complete = true;
            doc.unlock_all_blocks();
            Self::push_note(
                doc,
                NotificationKind::Success,
                "Registrazione completata".to_string(),
            );
        })
        .await
    }

    // -- blocks and answers -----------------------------------------------

    /// Merges progress (and optionally an explicit state) into the block's
    /// status record. With no explicit state, 100 resolves to COMPLETED and
    /// anything else to IN_PROGRESS. Progress is stored as received.
    pub async fn update_block_progress(
        &self,
        id: BlockId,
        progress: u8,
        state: Option<BlockState>,
    ) -> AppDocument {
        self.mutate(|doc| {
            let resolved = state.unwrap_or(if progress == 100 {
                BlockState::Completed
            } else {
                BlockState::InProgress
            });
            let status = doc.block_mut(id);
            status.progress = progress;
            status.state = resolved;
            let (kind, message) = if resolved == BlockState::Completed {
                (
                    NotificationKind::Success,
                    format!("Blocco \"{}\" completato", id.title()),
                )
            } else {
                (
                    NotificationKind::Info,
                    format!("Avanzamento del blocco \"{}\" salvato", id.title()),
                )
            };
            Self::push_note(doc, kind, message);
        })
        .await
    }

    /// Unconditional upsert; the empty string is a valid value.
    pub async fn save_answer(&self, key: String, value: String) -> AppDocument {
        self.mutate(|doc| {
            doc.answers.insert(key, value);
        })
        .await
    }

    /// Appends transcribed text to the question's current answer. The
    /// read-modify-write happens under the write lock, so an answer saved
    /// while the transcription service call was in flight is extended, not
    /// overwritten.
    pub async fn append_transcript(&self, key: String, text: String) -> AppDocument {
        self.mutate(|doc| {
            let entry = doc.answers.entry(key).or_default();
            if entry.is_empty() {
                *entry = text;
            } else {
                entry.push(' ');
                entry.push_str(&text);
            }
        })
        .await
    }

    /// Unconditional upsert; saving the empty string is the convention for
    /// deleting a recording (a tombstone, not a removed key).
    pub async fn save_audio_answer(&self, key: String, audio: String) -> AppDocument {
        self.mutate(|doc| {
            doc.audio_answers.insert(key, audio);
        })
        .await
    }

    pub async fn update_profile_data(&self, patch: ProfilePatch) -> AppDocument {
        self.mutate(|doc| patch.apply(&mut doc.profile)).await
    }

    pub async fn update_identity_data(&self, patch: IdentityPatch) -> AppDocument {
        self.mutate(|doc| patch.apply(&mut doc.identity)).await
    }

    pub async fn update_market_data(&self, patch: MarketPatch) -> AppDocument {
        self.mutate(|doc| patch.apply(&mut doc.market)).await
    }

    pub async fn update_tech_data(&self, patch: TechPatch) -> AppDocument {
        self.mutate(|doc| patch.apply(&mut doc.tech)).await
    }

    // -- documents --------------------------------------------------------
    //
    // Each transition replaces the whole per-document record: assigning a
    // previously uploaded document drops the upload metadata. A document is
    // always in exactly one state after any of these calls.

    pub async fn upload_document(&self, doc_id: &str, file_name: String) -> AppDocument {
        self.mutate(|doc| {
            doc.documents.insert(
                doc_id.to_string(),
                DocumentState::uploaded(file_name.clone(), Utc::now()),
            );
            Self::push_note(
                doc,
                NotificationKind::Success,
                format!("Documento \"{file_name}\" caricato"),
            );
        })
        .await
    }

    pub async fn assign_document(&self, doc_id: &str, assignee: Contact) -> AppDocument {
        self.mutate(|doc| {
            let message = format!("Documento assegnato a {}", assignee.name);
            doc.documents
                .insert(doc_id.to_string(), DocumentState::assigned(assignee));
            Self::push_note(doc, NotificationKind::Success, message);
        })
        .await
    }

    /// Explicit waiver. Accepted for any document: the MUST-priority
    /// restriction is a view-layer convention, not a data rule.
    pub async fn mark_document_not_available(&self, doc_id: &str) -> AppDocument {
        self.mutate(|doc| {
            doc.documents
                .insert(doc_id.to_string(), DocumentState::not_available());
            Self::push_note(
                doc,
                NotificationKind::Info,
                "Documento contrassegnato come non disponibile".to_string(),
            );
        })
        .await
    }

    // -- team and settings ------------------------------------------------

    pub async fn set_department_delegate(
        &self,
        department_id: Uuid,
        delegate: Option<Contact>,
    ) -> AppDocument {
        self.mutate(|doc| {
            if let Some(org) = doc.organization.as_mut() {
                if let Some(dept) = org.departments.iter_mut().find(|d| d.id == department_id) {
                    dept.delegate = delegate;
                    Self::push_note(
                        doc,
                        NotificationKind::Success,
                        "Referente di area aggiornato".to_string(),
                    );
                }
            }
        })
        .await
    }

    pub async fn add_team_member(&self, department_id: Uuid, member: TeamMember) -> AppDocument {
        self.mutate(|doc| {
            if let Some(org) = doc.organization.as_mut() {
                if let Some(dept) = org.departments.iter_mut().find(|d| d.id == department_id) {
                    let message = format!("{} aggiunto al team", member.name);
                    dept.members.push(member);
                    Self::push_note(doc, NotificationKind::Success, message);
                }
            }
        })
        .await
    }

    pub async fn remove_team_member(
        &self,
        department_id: Uuid,
        member_id: Uuid,
    ) -> AppDocument {
        self.mutate(|doc| {
            if let Some(org) = doc.organization.as_mut() {
                if let Some(dept) = org.departments.iter_mut().find(|d| d.id == department_id) {
                    dept.members.retain(|m| m.id != member_id);
                }
            }
        })
        .await
    }

    /// Settings mutation of a company; the legacy active-company view is
    /// kept in sync when it points at the same entity.
    pub async fn update_company(&self, company_id: Uuid, patch: CompanyPatch) -> AppDocument {
        self.mutate(|doc| {
            if let Some(org) = doc.organization.as_mut() {
                if let Some(company) = org.companies.iter_mut().find(|c| c.id == company_id) {
                    patch.apply(company);
                    if doc
                        .active_company
                        .as_ref()
                        .is_some_and(|c| c.id == company_id)
                    {
                        doc.active_company = Some(company.clone());
                    }
                    Self::push_note(
                        doc,
                        NotificationKind::Success,
                        "Dati aziendali aggiornati".to_string(),
                    );
                }
            }
        })
        .await
    }

    // -- notifications ----------------------------------------------------

    pub async fn add_notification(
        &self,
        kind: NotificationKind,
        message: String,
    ) -> AppDocument {
        self.mutate(|doc| Self::push_note(doc, kind, message)).await
    }

    pub async fn remove_notification(&self, id: Uuid) -> AppDocument {
        self.mutate(|doc| {
            doc.notifications.retain(|n| n.id != id);
        })
        .await
    }

    /// Drops notifications whose lifetime has elapsed. Driven by a small
    /// background task; returns how many were removed.
    pub async fn expire_notifications(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<Uuid> = {
            let guard = self.doc.read().await;
            guard
                .notifications
                .iter()
                .filter(|n| n.expires_at.is_some_and(|at| at <= now))
                .map(|n| n.id)
                .collect()
        };
        if expired.is_empty() {
            return 0;
        }
        let count = expired.len();
        self.mutate(|doc| {
            doc.notifications.retain(|n| !expired.contains(&n.id));
        })
        .await;
        count
    }

    /// Destructive full reset: the durable blob is removed and the initial
    /// document restored. Confirmation is a caller concern.
    pub async fn reset(&self) -> AppDocument {
        let mut guard = self.doc.write().await;
        if let Err(e) = self.storage.clear() {
            tracing::error!("failed to clear persisted state: {e}");
        }
        *guard = AppDocument::default();
        let snapshot = guard.clone();
        drop(guard);
        self.updates.send_replace(snapshot.clone());
        snapshot
    }
}

// ---------------------------------------------------------------------------
// Partial-update payloads: shallow merges where only the provided fields
// overwrite the stored record.
// ---------------------------------------------------------------------------

macro_rules! patch_fields {
    ($patch:ident => $target:ty { $($field:ident: $ty:ty),* $(,)? }) => {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        pub struct $patch {
            $(pub $field: Option<$ty>,)*
        }

        impl $patch {
            pub fn apply(self, data: &mut $target) {
                $(if let Some(value) = self.$field {
                    data.$field = value;
                })*
            }
        }
    };
}

patch_fields!(ProfilePatch => ProfileData {
    company_overview: String,
    mission: String,
    vision: String,
    core_values: Vec<String>,
    org_chart_notes: String,
    key_roles: String,
    employee_composition: String,
    governance_model: String,
    locations: Vec<String>,
});

patch_fields!(IdentityPatch => IdentityData {
    founding_story: String,
    founders: String,
    milestones: Vec<String>,
    brand_positioning: String,
    product_lines: Vec<String>,
    turning_points: String,
    ownership_history: String,
    company_culture: String,
});

patch_fields!(MarketPatch => MarketData {
    target_market: String,
    customer_segments: Vec<String>,
    main_competitors: String,
    competitive_advantage: String,
    market_trends: String,
    sales_channels: Vec<String>,
    export_markets: String,
    pricing_strategy: String,
    planned_investments: Vec<String>,
});

patch_fields!(TechPatch => TechData {
    erp_system: String,
    crm_system: String,
    it_infrastructure: String,
    digital_tools: Vec<String>,
    data_management: String,
    cybersecurity_measures: String,
    automation_initiatives: String,
    rd_projects: String,
});

patch_fields!(CompanyPatch => Company {
    name: String,
    vat_id: String,
    sector: String,
    legal_form: String,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::grant_for;
    use crate::domain::catalog;
    use crate::domain::models::{DocumentStatus, Priority};

    fn test_store(dir: &tempfile::TempDir) -> StateStore {
        StateStore::open(JsonStorage::new(dir.path().join("state.json")))
    }

    fn demo_company(name: &str, is_main: bool) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            vat_id: "IT01234567890".to_string(),
            logo: None,
            sector: "manifatturiero".to_string(),
            legal_form: "srl".to_string(),
            employee_count: Some(40),
            is_main,
        }
    }

    fn demo_owner() -> User {
        access::demo_user(Role::Owner)
    }

    #[tokio::test]
    async fn login_applies_the_static_role_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        for role in [Role::Owner, Role::Delegate, Role::Advisor, Role::Employee] {
            let doc = store.login(role).await;
            let user = doc.user.unwrap();
            let grant = grant_for(role);
            assert_eq!(user.name, grant.name);
            assert_eq!(user.department, grant.department);
            assert_eq!(user.assigned_blocks, grant.assigned_blocks.to_vec());
        }
    }

    #[tokio::test]
    async fn owner_login_unlocks_every_locked_block() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let doc = store.login(Role::Owner).await;
        for status in doc.blocks.iter() {
            assert_eq!(status.state, BlockState::Todo);
        }
    }

    #[tokio::test]
    async fn employee_login_leaves_blocks_locked() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let doc = store.login(Role::Employee).await;
        assert_eq!(doc.block(BlockId::Identity).state, BlockState::Locked);
    }

    #[tokio::test]
    async fn logout_clears_only_the_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.login(Role::Owner).await;
        store.save_answer("execution.kpi_tracking".into(), "report mensile".into()).await;
        let doc = store.logout().await;
        assert!(doc.user.is_none());
        assert_eq!(
            doc.answers.get("execution.kpi_tracking").map(String::as_str),
            Some("report mensile")
        );
    }

    #[tokio::test]
    async fn progress_one_hundred_defaults_to_completed() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let doc = store.update_block_progress(BlockId::Market, 100, None).await;
        assert_eq!(doc.block(BlockId::Market).state, BlockState::Completed);
        assert_eq!(doc.block(BlockId::Market).progress, 100);
    }

    #[tokio::test]
    async fn partial_progress_defaults_to_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        for progress in [1u8, 50, 99] {
            let doc = store
                .update_block_progress(BlockId::Profile, progress, None)
                .await;
            assert_eq!(doc.block(BlockId::Profile).state, BlockState::InProgress);
            assert_eq!(doc.block(BlockId::Profile).progress, progress);
        }
    }

    #[tokio::test]
    async fn explicit_state_wins_over_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let doc = store
            .update_block_progress(BlockId::Profile, 100, Some(BlockState::InProgress))
            .await;
        assert_eq!(doc.block(BlockId::Profile).state, BlockState::InProgress);
    }

    #[tokio::test]
    async fn assigning_an_uploaded_document_drops_upload_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.upload_document("statuto", "statuto-2026.pdf".into()).await;
        let doc = store
            .assign_document(
                "statuto",
                Contact {
                    name: "Paola Conti".into(),
                    email: "paola@studioconti.it".into(),
                },
            )
            .await;
        let state = doc.documents.get("statuto").unwrap();
        assert_eq!(state.status, DocumentStatus::Assigned);
        assert!(state.file_name.is_none());
        assert!(state.uploaded_at.is_none());
        assert_eq!(state.assignee.as_ref().unwrap().name, "Paola Conti");
    }

    #[tokio::test]
    async fn must_priority_waiver_is_accepted_by_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        assert_eq!(catalog::find("durc").unwrap().priority, Priority::Must);
        let doc = store.mark_document_not_available("durc").await;
        assert_eq!(
            doc.documents.get("durc").unwrap().status,
            DocumentStatus::NotAvailable
        );
    }

    #[tokio::test]
    async fn transcripts_extend_the_answer_current_at_commit_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store
            .save_answer("execution.kpi_tracking".into(), "modifica urgente".into())
            .await;
        let doc = store
            .append_transcript("execution.kpi_tracking".into(), "testo trascritto".into())
            .await;
        assert_eq!(
            doc.answers.get("execution.kpi_tracking").map(String::as_str),
            Some("modifica urgente testo trascritto")
        );
        let doc = store
            .append_transcript("execution.strategic_plan".into(), "solo trascritto".into())
            .await;
        assert_eq!(
            doc.answers.get("execution.strategic_plan").map(String::as_str),
            Some("solo trascritto")
        );
    }

    #[tokio::test]
    async fn empty_audio_answer_is_a_tombstone_not_a_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store
            .save_audio_answer("execution.kpi_tracking".into(), "b64-payload".into())
            .await;
        let doc = store
            .save_audio_answer("execution.kpi_tracking".into(), String::new())
            .await;
        assert_eq!(
            doc.audio_answers.get("execution.kpi_tracking").map(String::as_str),
            Some("")
        );
    }

    #[tokio::test]
    async fn registering_two_companies_seeds_twelve_departments() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let main = demo_company("Wallnut Holding", true);
        let second = demo_company("Wallnut Retail", false);
        let doc = store
            .register_owner(demo_owner(), OrgKind::Group, vec![main.clone(), second])
            .await;

        let org = doc.organization.as_ref().unwrap();
        assert_eq!(org.departments.len(), 12);
        for dept in &org.departments {
            assert!(dept.delegate.is_none());
            assert!(dept.members.is_empty());
        }
        assert!(doc.onboarding_complete);
        assert_eq!(doc.active_company.as_ref().unwrap().id, main.id);
        for status in doc.blocks.iter() {
            assert_eq!(status.state, BlockState::Todo);
        }
    }

    #[tokio::test]
    async fn shallow_merge_leaves_unnamed_fields_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store
            .update_market_data(MarketPatch {
                target_market: Some("PMI manifatturiere lombarde".into()),
                ..Default::default()
            })
            .await;
        let doc = store
            .update_market_data(MarketPatch {
                pricing_strategy: Some("listino con sconti volume".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(doc.market.target_market, "PMI manifatturiere lombarde");
        assert_eq!(doc.market.pricing_strategy, "listino con sconti volume");
    }

    #[tokio::test]
    async fn team_member_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let doc = store
            .register_owner(demo_owner(), OrgKind::Single, vec![demo_company("Wallnut", true)])
            .await;
        let dept = doc.organization.unwrap().departments[0].clone();

        let member = TeamMember {
            id: Uuid::new_v4(),
            name: "Sara Galli".into(),
            email: "sara@wallnut.it".into(),
            role_title: "Controller".into(),
        };
        let doc = store.add_team_member(dept.id, member.clone()).await;
        let members = &doc.organization.as_ref().unwrap().departments[0].members;
        assert_eq!(members.len(), 1);

        let doc = store.remove_team_member(dept.id, member.id).await;
        assert!(doc.organization.as_ref().unwrap().departments[0]
            .members
            .is_empty());
    }

    #[tokio::test]
    async fn updating_the_main_company_refreshes_the_active_view() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let company = demo_company("Wallnut", true);
        store
            .register_owner(demo_owner(), OrgKind::Single, vec![company.clone()])
            .await;
        let doc = store
            .update_company(
                company.id,
                CompanyPatch {
                    name: Some("Wallnut SpA".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(doc.active_company.as_ref().unwrap().name, "Wallnut SpA");
    }

    #[tokio::test]
    async fn notifications_expire_and_can_be_dismissed_early() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let doc = store
            .add_notification(NotificationKind::Info, "primo".into())
            .await;
        let first = doc.notifications[0].id;
        store
            .add_notification(NotificationKind::Info, "secondo".into())
            .await;

        let doc = store.remove_notification(first).await;
        assert_eq!(doc.notifications.len(), 1);

        let later = Utc::now() + chrono::Duration::milliseconds(crate::domain::models::NOTIFICATION_TTL_MS + 1);
        let removed = store.expire_notifications(later).await;
        assert_eq!(removed, 1);
        assert!(store.snapshot().await.notifications.is_empty());
    }

    #[tokio::test]
    async fn reset_restores_the_initial_document_and_removes_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.login(Role::Owner).await;
        store.upload_document("statuto", "statuto.pdf".into()).await;

        let doc = store.reset().await;
        assert_eq!(doc, AppDocument::default());
        assert!(!dir.path().join("state.json").exists());
    }

    #[tokio::test]
    async fn persisted_state_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = StateStore::open(JsonStorage::new(path.clone()));
            store.update_block_progress(BlockId::Technology, 60, None).await;
        }
        let store = StateStore::open(JsonStorage::new(path));
        let doc = store.snapshot().await;
        assert_eq!(doc.block(BlockId::Technology).progress, 60);
        assert_eq!(doc.block(BlockId::Technology).state, BlockState::InProgress);
        assert!(doc.notifications.is_empty());
    }

    #[tokio::test]
    async fn subscribers_observe_each_new_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let mut rx = store.subscribe();
        store.save_answer("execution.kpi_tracking".into(), "ok".into()).await;
        rx.changed().await.unwrap();
        assert!(rx
            .borrow()
            .answers
            .contains_key("execution.kpi_tracking"));
    }
}
