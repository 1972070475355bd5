//! Materiality-weighted ESG risk scoring for sustainability report analysis.
//!
//! Disclosures extracted from corporate sustainability reports are weighted
//! by their SASB materiality for the company's industry and folded into
//! Environmental, Social, Governance and Total percentages.

pub mod config;
pub mod error;
pub mod records;
pub mod scoring;
pub mod telemetry;
