use crate::domain::models::{Area, Priority};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Static catalog entry for one of the required business documents.
/// Reference data only; user state lives in `AppDocument::documents`.
#[derive(Clone, Copy, Debug)]
pub struct DocumentDefinition {
    pub id: &'static str,
    pub area: Area,
    pub label: &'static str,
    pub priority: Priority,
}

const fn doc(
    id: &'static str,
    area: Area,
    label: &'static str,
    priority: Priority,
) -> DocumentDefinition {
    DocumentDefinition {
        id,
        area,
        label,
        priority,
    }
}

use Area::*;
use Priority::*;

pub static CATALOG: &[DocumentDefinition] = &[
    // Amministrazione e Finanza
    doc("bilancio-ultimo", Finance, "Bilancio d'esercizio (ultimo anno)", Must),
    doc("bilancio-anno-2", Finance, "Bilancio d'esercizio (secondo anno precedente)", Must),
    doc("bilancio-anno-3", Finance, "Bilancio d'esercizio (terzo anno precedente)", Should),
    doc("nota-integrativa", Finance, "Nota integrativa all'ultimo bilancio", Must),
    doc("rendiconto-finanziario", Finance, "Rendiconto finanziario", Should),
    doc("situazione-patrimoniale", Finance, "Situazione patrimoniale infrannuale", Must),
    doc("dichiarazione-redditi-1", Finance, "Dichiarazione dei redditi (ultimo anno)", Must),
    doc("dichiarazione-redditi-2", Finance, "Dichiarazione dei redditi (anno precedente)", Should),
    doc("dichiarazione-iva", Finance, "Dichiarazione IVA annuale", Must),
    doc("registri-iva", Finance, "Registri IVA", Should),
    doc("libro-giornale", Finance, "Libro giornale", Should),
    doc("libro-inventari", Finance, "Libro degli inventari", Should),
    doc("f24-quietanze", Finance, "Quietanze F24 degli ultimi 12 mesi", Should),
    doc("estratti-conto", Finance, "Estratti conto bancari (ultimi 6 mesi)", Must),
    doc("affidamenti-bancari", Finance, "Prospetto degli affidamenti bancari", Must),
    doc("centrale-rischi", Finance, "Visura Centrale Rischi", Should),
    doc("piano-ammortamento-mutui", Finance, "Piani di ammortamento dei mutui in essere", Should),
    doc("contratti-leasing", Finance, "Contratti di leasing", Could),
    doc("contratti-factoring", Finance, "Contratti di factoring", Could),
    doc("budget-annuale", Finance, "Budget economico annuale", Must),
    doc("business-plan", Finance, "Business plan triennale", Should),
    doc("piano-finanziario", Finance, "Piano finanziario previsionale", Should),
    doc("report-controllo-gestione", Finance, "Report di controllo di gestione", Should),
    doc("analisi-scostamenti", Finance, "Analisi degli scostamenti budget/consuntivo", Could),
    doc("aging-crediti", Finance, "Aging dei crediti verso clienti", Must),
    doc("aging-debiti", Finance, "Aging dei debiti verso fornitori", Should),
    doc("valorizzazione-magazzino", Finance, "Valorizzazione del magazzino", Should),
    doc("registro-cespiti", Finance, "Registro dei cespiti", Could),
    doc("contributi-pubblici", Finance, "Elenco contributi e agevolazioni pubbliche", Could),
    doc("relazione-revisione", Finance, "Relazione del revisore o del collegio sindacale", Should),
    // Legale e Compliance
    doc("atto-costitutivo", Legal, "Atto costitutivo", Must),
    doc("statuto", Legal, "Statuto societario vigente", Must),
    doc("visura-camerale", Legal, "Visura camerale aggiornata", Must),
    doc("patti-parasociali", Legal, "Patti parasociali", Could),
    doc("libro-soci", Legal, "Libro soci", Must),
    doc("verbali-assemblea", Legal, "Verbali di assemblea (ultimi 3 anni)", Should),
    doc("verbali-cda", Legal, "Verbali del consiglio di amministrazione", Should),
    doc("deleghe-procure", Legal, "Deleghe e procure in essere", Should),
    doc("certificazioni-qualita", Legal, "Certificazioni di qualità (ISO e simili)", Should),
    doc("marchi-registrati", Legal, "Registrazioni di marchi", Could),
    doc("brevetti", Legal, "Brevetti e domande di brevetto", Could),
    doc("contratti-quadro-clienti", Legal, "Contratti quadro con i clienti principali", Must),
    doc("contratti-quadro-fornitori", Legal, "Contratti quadro con i fornitori principali", Should),
    doc("contratti-locazione", Legal, "Contratti di locazione degli immobili", Should),
    doc("polizze-assicurative", Legal, "Polizze assicurative attive", Must),
    doc("contenziosi", Legal, "Prospetto dei contenziosi in corso", Must),
    doc("registro-trattamenti", Legal, "Registro dei trattamenti (GDPR)", Must),
    doc("informative-privacy", Legal, "Informative privacy a clienti e dipendenti", Should),
    doc("nomina-dpo", Legal, "Nomina del DPO (se applicabile)", Could),
    doc("modello-231", Legal, "Modello organizzativo 231", Could),
    doc("codice-etico", Legal, "Codice etico", Could),
    doc("durc", Legal, "DURC in corso di validità", Must),
    doc("licenze-autorizzazioni", Legal, "Licenze e autorizzazioni all'esercizio", Must),
    doc("accordi-riservatezza", Legal, "Accordi di riservatezza (NDA) in essere", Could),
    doc("certificati-export", Legal, "Certificazioni e documenti per l'export", Would),
    // Risorse Umane
    doc("organigramma", HumanResources, "Organigramma aziendale", Must),
    doc("mansionario", HumanResources, "Mansionario", Should),
    doc("libro-unico-lavoro", HumanResources, "Libro unico del lavoro", Must),
    doc("contratti-dipendenti", HumanResources, "Contratti individuali dei dipendenti", Must),
    doc("ccnl", HumanResources, "CCNL applicato", Must),
    doc("regolamento-aziendale", HumanResources, "Regolamento aziendale", Should),
    doc("piano-formazione", HumanResources, "Piano di formazione", Should),
    doc("valutazione-competenze", HumanResources, "Schede di valutazione delle competenze", Could),
    doc("politiche-retributive", HumanResources, "Politiche retributive", Should),
    doc("sistema-incentivi", HumanResources, "Sistema di incentivazione (MBO)", Could),
    doc("welfare-aziendale", HumanResources, "Piano di welfare aziendale", Would),
    doc("report-turnover", HumanResources, "Report turnover del personale", Could),
    doc("piano-assunzioni", HumanResources, "Piano assunzioni", Could),
    doc("nomina-rspp", HumanResources, "Nomina RSPP", Must),
    doc("attestati-sicurezza", HumanResources, "Attestati di formazione sicurezza", Must),
    doc("sorveglianza-sanitaria", HumanResources, "Protocollo di sorveglianza sanitaria", Should),
    doc("registro-infortuni", HumanResources, "Registro infortuni", Must),
    doc("contratti-collaboratori", HumanResources, "Contratti con collaboratori esterni", Should),
    doc("accordi-smart-working", HumanResources, "Accordi di lavoro agile", Would),
    doc("piano-successione", HumanResources, "Piano di successione dei ruoli chiave", Would),
    doc("survey-clima", HumanResources, "Indagine di clima aziendale", Would),
    doc("piano-ferie-permessi", HumanResources, "Piano ferie e permessi", Could),
    // Commerciale e Marketing
    doc("listino-prezzi", Sales, "Listino prezzi in vigore", Must),
    doc("catalogo-prodotti", Sales, "Catalogo prodotti/servizi", Must),
    doc("piano-marketing", Sales, "Piano marketing", Should),
    doc("piano-commerciale", Sales, "Piano commerciale annuale", Must),
    doc("analisi-mercato", Sales, "Analisi di mercato", Should),
    doc("analisi-concorrenza", Sales, "Analisi della concorrenza", Should),
    doc("segmentazione-clienti", Sales, "Segmentazione della clientela", Could),
    doc("report-top-clienti", Sales, "Report sui principali clienti", Must),
    doc("pipeline-vendite", Sales, "Pipeline delle opportunità di vendita", Should),
    doc("forecast-vendite", Sales, "Forecast di vendita", Should),
    doc("contratti-agenti", Sales, "Contratti con agenti e rappresentanti", Should),
    doc("contratti-distributori", Sales, "Contratti con i distributori", Could),
    doc("condizioni-vendita", Sales, "Condizioni generali di vendita", Must),
    doc("customer-satisfaction", Sales, "Rilevazioni di customer satisfaction", Could),
    doc("registro-reclami", Sales, "Registro dei reclami clienti", Should),
    doc("brand-guidelines", Sales, "Linee guida del marchio", Would),
    doc("analytics-sito", Sales, "Report analytics del sito web", Would),
    doc("report-social", Sales, "Report dei canali social", Would),
    doc("piano-fiere", Sales, "Piano fiere ed eventi", Would),
    doc("materiale-promozionale", Sales, "Materiale promozionale istituzionale", Could),
    doc("politiche-sconti", Sales, "Politiche di sconto e listini riservati", Should),
    doc("documentazione-export", Sales, "Documentazione commerciale per l'export", Would),
    // Operazioni e Produzione
    doc("layout-stabilimento", Operations, "Layout dello stabilimento", Could),
    doc("distinta-base", Operations, "Distinte base dei prodotti", Should),
    doc("cicli-produzione", Operations, "Cicli di produzione", Should),
    doc("capacita-produttiva", Operations, "Analisi della capacità produttiva", Should),
    doc("piano-manutenzione", Operations, "Piano di manutenzione impianti", Should),
    doc("registro-manutenzioni", Operations, "Registro delle manutenzioni", Could),
    doc("qualifica-fornitori", Operations, "Procedura di qualifica dei fornitori", Should),
    doc("procedura-acquisti", Operations, "Procedura di gestione degli acquisti", Should),
    doc("procedura-scorte", Operations, "Procedura di gestione delle scorte", Could),
    doc("kpi-produzione", Operations, "Cruscotto KPI di produzione", Should),
    doc("report-scarti", Operations, "Report scarti e rilavorazioni", Could),
    doc("report-consegne", Operations, "Report puntualità delle consegne", Could),
    doc("procedure-operative", Operations, "Procedure operative standard", Must),
    doc("manuale-qualita", Operations, "Manuale della qualità", Should),
    doc("audit-interni", Operations, "Rapporti di audit interni", Could),
    doc("registro-non-conformita", Operations, "Registro delle non conformità", Should),
    doc("azioni-correttive", Operations, "Piano delle azioni correttive", Could),
    doc("tracciabilita-lotti", Operations, "Procedura di tracciabilità dei lotti", Could),
    doc("contratti-logistica", Operations, "Contratti con i partner logistici", Could),
    doc("dvr", Operations, "Documento di valutazione dei rischi (DVR)", Must),
    doc("piano-emergenza", Operations, "Piano di emergenza ed evacuazione", Must),
    doc("certificazioni-ambientali", Operations, "Certificazioni ambientali", Would),
    // Sistemi Informativi
    doc("inventario-hardware", It, "Inventario hardware", Should),
    doc("inventario-software", It, "Inventario software", Should),
    doc("licenze-software", It, "Licenze software in uso", Must),
    doc("mappa-applicativi", It, "Mappa degli applicativi aziendali", Should),
    doc("architettura-rete", It, "Schema dell'architettura di rete", Should),
    doc("politiche-backup", It, "Politiche di backup", Must),
    doc("disaster-recovery", It, "Piano di disaster recovery", Should),
    doc("politiche-sicurezza-it", It, "Politiche di sicurezza informatica", Must),
    doc("registro-incidenti-it", It, "Registro degli incidenti informatici", Could),
    doc("contratti-fornitori-it", It, "Contratti con i fornitori IT", Should),
    doc("sla-servizi-it", It, "SLA dei servizi IT", Could),
    doc("piano-sviluppo-it", It, "Piano di sviluppo dei sistemi", Could),
    doc("procedura-accessi", It, "Procedura di gestione degli accessi", Should),
    doc("report-vulnerability", It, "Report di vulnerability assessment", Would),
    doc("documentazione-erp", It, "Documentazione del sistema ERP", Could),
    doc("documentazione-crm", It, "Documentazione del sistema CRM", Would),
    doc("roadmap-digitale", It, "Roadmap di trasformazione digitale", Would),
];

static BY_ID: Lazy<HashMap<&'static str, &'static DocumentDefinition>> =
    Lazy::new(|| CATALOG.iter().map(|d| (d.id, d)).collect());

pub fn find(id: &str) -> Option<&'static DocumentDefinition> {
    BY_ID.get(id).copied()
}

pub fn catalog_len() -> usize {
    CATALOG.len()
}
