// src/resolver/mod.rs

mod charges;
mod detect;

use serde::{Deserialize, Serialize};

pub use charges::extract_misc_charges;
pub use detect::detect_term;

/// Standardized trade terms we recognise in shipment paperwork, including
/// the C&F / CNF spellings still common on invoices from Asian shippers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncotermCode {
    #[serde(rename = "DAP")]
    Dap,
    #[serde(rename = "CIF")]
    Cif,
    #[serde(rename = "CFR")]
    Cfr,
    #[serde(rename = "C&F")]
    CAndF,
    #[serde(rename = "CNF")]
    Cnf,
    #[serde(rename = "FOB")]
    Fob,
    #[serde(rename = "EXW")]
    Exw,
    #[serde(rename = "FCA")]
    Fca,
    #[serde(rename = "FAS")]
    Fas,
    #[serde(rename = "CPT")]
    Cpt,
    #[serde(rename = "CIP")]
    Cip,
    #[serde(rename = "DPU")]
    Dpu,
    #[serde(rename = "DDP")]
    Ddp,
    #[serde(rename = "DAT")]
    Dat,
}

impl IncotermCode {
    /// Detection priority. When a document mentions several terms the
    /// earliest code in this list wins; downstream job records depend on
    /// that tie-break, so the order must not change.
    pub const SCAN_ORDER: [IncotermCode; 14] = [
        IncotermCode::Dap,
        IncotermCode::Cif,
        IncotermCode::Cfr,
        IncotermCode::CAndF,
        IncotermCode::Cnf,
        IncotermCode::Fob,
        IncotermCode::Exw,
        IncotermCode::Fca,
        IncotermCode::Fas,
        IncotermCode::Cpt,
        IncotermCode::Cip,
        IncotermCode::Dpu,
        IncotermCode::Ddp,
        IncotermCode::Dat,
    ];

    /// The literal token as it appears in documents and persisted job records.
    pub fn token(self) -> &'static str {
        match self {
            IncotermCode::Dap => "DAP",
            IncotermCode::Cif => "CIF",
            IncotermCode::Cfr => "CFR",
            IncotermCode::CAndF => "C&F",
            IncotermCode::Cnf => "CNF",
            IncotermCode::Fob => "FOB",
            IncotermCode::Exw => "EXW",
            IncotermCode::Fca => "FCA",
            IncotermCode::Fas => "FAS",
            IncotermCode::Cpt => "CPT",
            IncotermCode::Cip => "CIP",
            IncotermCode::Dpu => "DPU",
            IncotermCode::Ddp => "DDP",
            IncotermCode::Dat => "DAT",
        }
    }

    /// Which document-requirement bucket this term belongs to.
    ///
    /// FAS, CPT, CIP, DPU, DDP and DAT have no bucket of their own yet and
    /// fall back to the basic document set.
    pub fn category(self) -> IncotermCategory {
        match self {
            IncotermCode::Dap | IncotermCode::Cif => IncotermCategory::Basic,
            IncotermCode::Cfr | IncotermCode::CAndF | IncotermCode::Cnf => {
                IncotermCategory::WithMisc
            }
            IncotermCode::Fob | IncotermCode::Exw | IncotermCode::Fca => {
                IncotermCategory::WithFreight
            }
            _ => IncotermCategory::Basic,
        }
    }
}

/// Document-requirement buckets. The bucket decides which uploads the job
/// needs and which extra extraction passes run on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncotermCategory {
    /// BL + invoice + packing list, nothing else.
    Basic,
    /// Base documents, plus misc charges pulled from the invoice.
    WithMisc,
    /// Base documents plus a freight certificate, plus misc charges.
    WithFreight,
}

/// Kinds of shipment paperwork a job can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Bl,
    Invoice,
    Pl,
    Freight,
}

impl DocKind {
    /// Parse a wire name as persisted on job records. `packing_list` is the
    /// long form the upload endpoint accepts for `pl`.
    pub fn parse(kind: &str) -> Option<DocKind> {
        match kind {
            "bl" => Some(DocKind::Bl),
            "invoice" => Some(DocKind::Invoice),
            "pl" | "packing_list" => Some(DocKind::Pl),
            "freight" => Some(DocKind::Freight),
            _ => None,
        }
    }
}

/// Documents every job needs regardless of trade term.
const BASE_DOCS: [DocKind; 3] = [DocKind::Bl, DocKind::Invoice, DocKind::Pl];

/// Outcome of resolving a detected (or undetected) trade term into the
/// documents a job must collect. Transient; the upload handler persists
/// whichever fields it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub detected: bool,
    pub term: Option<IncotermCode>,
    pub category: Option<IncotermCategory>,
    pub required_docs: Vec<DocKind>,
    pub needs_freight: bool,
    pub extract_misc: bool,
}

/// Map a detected term to its document requirements.
///
/// Total: an undetected term yields the base document set with both extra
/// passes switched off, never an error.
pub fn resolve(term: Option<IncotermCode>) -> ResolutionResult {
    let Some(term) = term else {
        return ResolutionResult {
            detected: false,
            term: None,
            category: None,
            required_docs: BASE_DOCS.to_vec(),
            needs_freight: false,
            extract_misc: false,
        };
    };

    let category = term.category();
    let needs_freight = category == IncotermCategory::WithFreight;
    let extract_misc = category != IncotermCategory::Basic;

    let mut required_docs = BASE_DOCS.to_vec();
    if needs_freight {
        required_docs.push(DocKind::Freight);
    }

    ResolutionResult {
        detected: true,
        term: Some(term),
        category: Some(category),
        required_docs,
        needs_freight,
        extract_misc,
    }
}

/// Requirements still unmet for a job, in requirement order.
pub fn missing_docs(required: &[DocKind], on_file: &[DocKind]) -> Vec<DocKind> {
    required
        .iter()
        .copied()
        .filter(|kind| !on_file.contains(kind))
        .collect()
}

/// Report for a processed packing list: extraction stats plus the resolved
/// document requirements.
#[derive(Debug, Clone, Serialize)]
pub struct PackingListReport {
    pub text_extracted: bool,
    pub text_length: usize,
    #[serde(flatten)]
    pub resolution: ResolutionResult,
}

/// Run term detection and requirement resolution over packing-list text.
pub fn process_packing_list(text: &str) -> PackingListReport {
    PackingListReport {
        text_extracted: !text.is_empty(),
        text_length: text.len(),
        resolution: resolve(detect_term(text)),
    }
}

/// Report for a processed invoice. `misc_charges` is present only when the
/// caller asked for the misc-charges pass.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceReport {
    pub text_extracted: bool,
    pub text_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc_charges: Option<f64>,
}

/// Run the invoice workflow over extracted invoice text.
pub fn process_invoice(text: &str, extract_misc: bool) -> InvoiceReport {
    InvoiceReport {
        text_extracted: !text.is_empty(),
        text_length: text.len(),
        misc_charges: extract_misc.then(|| extract_misc_charges(text)),
    }
}
