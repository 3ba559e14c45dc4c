//! Pure derivation rules over a document snapshot: completion percentages,
//! section flags and the dashboard aggregate. Nothing here mutates state.

use crate::domain::catalog;
use crate::domain::models::{
    AppDocument, BlockId, DocumentStatus, IdentityData, MarketData, ProfileData, TechData,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Answer keys that make up block 5 (Execution); answers live in the
/// generic answers map rather than a dedicated record.
pub const EXECUTION_QUESTIONS: &[&str] = &[
    "execution.strategic_plan",
    "execution.budgeting_process",
    "execution.kpi_tracking",
    "execution.meeting_cadence",
    "execution.delegation_model",
    "execution.risk_management",
    "execution.improvement_projects",
    "execution.succession_plan",
];

/// Market adds fixed completion slots for structured investment entries.
const INVESTMENT_SLOTS: usize = 3;

// Minimum trimmed length for a text answer to count as filled. Profile,
// Identity and Execution accept any non-empty text; Market and Tech expect
// more than a handful of characters.
const ANY_TEXT: usize = 0;
const SUBSTANTIAL_TEXT: usize = 5;

fn filled(value: &str, min_len: usize) -> bool {
    value.trim().len() > min_len
}

fn pct(filled_count: usize, total: usize) -> u8 {
    ((filled_count as f32 / total as f32) * 100.0).round() as u8
}

pub fn profile_completion(d: &ProfileData) -> u8 {
    let text = [
        &d.company_overview,
        &d.mission,
        &d.vision,
        &d.org_chart_notes,
        &d.key_roles,
        &d.employee_composition,
        &d.governance_model,
    ];
    let count = text.iter().filter(|v| filled(v, ANY_TEXT)).count()
        + usize::from(!d.core_values.is_empty())
        + usize::from(!d.locations.is_empty());
    pct(count, text.len() + 2)
}

pub fn identity_completion(d: &IdentityData) -> u8 {
    let text = [
        &d.founding_story,
        &d.founders,
        &d.brand_positioning,
        &d.turning_points,
        &d.ownership_history,
        &d.company_culture,
    ];
    let count = text.iter().filter(|v| filled(v, ANY_TEXT)).count()
        + usize::from(!d.milestones.is_empty())
        + usize::from(!d.product_lines.is_empty());
    pct(count, text.len() + 2)
}

pub fn market_completion(d: &MarketData) -> u8 {
    let text = [
        &d.target_market,
        &d.main_competitors,
        &d.competitive_advantage,
        &d.market_trends,
        &d.export_markets,
        &d.pricing_strategy,
    ];
    let investments = d
        .planned_investments
        .iter()
        .filter(|v| filled(v, ANY_TEXT))
        .take(INVESTMENT_SLOTS)
        .count();
    let count = text.iter().filter(|v| filled(v, SUBSTANTIAL_TEXT)).count()
        + usize::from(!d.customer_segments.is_empty())
        + usize::from(!d.sales_channels.is_empty())
        + investments;
    pct(count, text.len() + 2 + INVESTMENT_SLOTS)
}

pub fn tech_completion(d: &TechData) -> u8 {
    let text = [
        &d.erp_system,
        &d.crm_system,
        &d.it_infrastructure,
        &d.data_management,
        &d.cybersecurity_measures,
        &d.automation_initiatives,
        &d.rd_projects,
    ];
    let count = text.iter().filter(|v| filled(v, SUBSTANTIAL_TEXT)).count()
        + usize::from(!d.digital_tools.is_empty());
    pct(count, text.len() + 1)
}

pub fn execution_completion(answers: &BTreeMap<String, String>) -> u8 {
    let count = EXECUTION_QUESTIONS
        .iter()
        .filter(|key| answers.get(**key).is_some_and(|v| filled(v, ANY_TEXT)))
        .count();
    pct(count, EXECUTION_QUESTIONS.len())
}

pub fn block_completion(doc: &AppDocument, id: BlockId) -> u8 {
    match id {
        BlockId::Profile => profile_completion(&doc.profile),
        BlockId::Identity => identity_completion(&doc.identity),
        BlockId::Market => market_completion(&doc.market),
        BlockId::Technology => tech_completion(&doc.tech),
        BlockId::Execution => execution_completion(&doc.answers),
    }
}

/// Share of catalog documents in UPLOADED state, as a percentage.
pub fn documents_completion(doc: &AppDocument) -> u8 {
    let uploaded = doc
        .documents
        .values()
        .filter(|s| s.status == DocumentStatus::Uploaded)
        .count();
    pct(uploaded, catalog::catalog_len())
}

/// Dashboard aggregate: arithmetic mean of the five stored block
/// percentages (the stored values, not live recomputations).
pub fn overall_progress(doc: &AppDocument) -> u8 {
    let sum: u32 = doc.blocks.iter().map(|b| b.progress as u32).sum();
    (sum as f32 / doc.blocks.len() as f32).round() as u8
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SectionSummary {
    pub name: &'static str,
    pub complete: bool,
}

fn section(name: &'static str, values: &[&str], min_len: usize) -> SectionSummary {
    SectionSummary {
        name,
        complete: values.iter().all(|v| filled(v, min_len)),
    }
}

/// Section-complete flags shown in each block editor: AND over the
/// section's required fields.
pub fn block_sections(doc: &AppDocument, id: BlockId) -> Vec<SectionSummary> {
    match id {
        BlockId::Profile => vec![
            section(
                "presentazione",
                &[
                    &doc.profile.company_overview,
                    &doc.profile.mission,
                    &doc.profile.vision,
                ],
                ANY_TEXT,
            ),
            section(
                "organizzazione",
                &[
                    &doc.profile.org_chart_notes,
                    &doc.profile.key_roles,
                    &doc.profile.governance_model,
                ],
                ANY_TEXT,
            ),
        ],
        BlockId::Identity => vec![
            section(
                "origini",
                &[&doc.identity.founding_story, &doc.identity.founders],
                ANY_TEXT,
            ),
            section(
                "percorso",
                &[&doc.identity.turning_points, &doc.identity.ownership_history],
                ANY_TEXT,
            ),
        ],
        BlockId::Market => vec![
            section(
                "posizionamento",
                &[&doc.market.target_market, &doc.market.competitive_advantage],
                SUBSTANTIAL_TEXT,
            ),
            section(
                "contesto",
                &[&doc.market.main_competitors, &doc.market.market_trends],
                SUBSTANTIAL_TEXT,
            ),
        ],
        BlockId::Technology => vec![
            section(
                "sistemi",
                &[&doc.tech.erp_system, &doc.tech.crm_system, &doc.tech.it_infrastructure],
                SUBSTANTIAL_TEXT,
            ),
            section(
                "sicurezza",
                &[&doc.tech.data_management, &doc.tech.cybersecurity_measures],
                SUBSTANTIAL_TEXT,
            ),
        ],
        BlockId::Execution => {
            let empty = String::new();
            let values: Vec<&str> = EXECUTION_QUESTIONS
                .iter()
                .map(|key| doc.answers.get(*key).unwrap_or(&empty).as_str())
                .collect();
            vec![SectionSummary {
                name: "processi",
                complete: values.iter().all(|v| filled(v, ANY_TEXT)),
            }]
        }
    }
}
