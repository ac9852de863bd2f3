//! Document-understanding and budget-generation core.
//!
//! Turns uploaded business documents (scanned images, PDFs, spreadsheets)
//! into extracted text and, from there, into a structured cost proposal via
//! an interchangeable LLM backend. Upload handling, persistence and the
//! dashboard consume this crate through [`domain::FileInfo`] in and
//! [`domain::ProcessingResult`] / [`domain::BudgetResponse`] out.

pub mod application;
pub mod domain;
pub mod infrastructure;
