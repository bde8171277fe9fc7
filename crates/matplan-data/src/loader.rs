//! Loading pipeline: format detection, deserialization, and application of
//! a planning model to a session.
//!
//! Supports RON, JSON, and TOML, detected by file extension. All
//! `product@location` references resolve through lazy creation, so a model
//! file never has to pre-declare the entities its flows mention.

use std::path::{Path, PathBuf};

use matplan_core::fixed::Fixed64;
use matplan_core::flow::FlowError;
use matplan_core::ledger::LedgerError;
use matplan_core::registry::RegistryError;
use matplan_core::session::PlanningSession;

use crate::schema::ModelData;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during model loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {origin}: {detail}")]
    Parse { origin: String, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A registry operation failed while applying the model.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A flow operation failed while applying the model.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// A ledger operation failed while applying the model.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Parse a model document from a string in the given format.
pub fn load_model_str(content: &str, format: Format) -> Result<ModelData, DataLoadError> {
    parse_model(content, format, "inline model")
}

/// Read a file and parse it according to its format (detected from the
/// extension).
pub fn load_model_file(path: &Path) -> Result<ModelData, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_model(&content, format, &path.display().to_string())
}

fn parse_model(content: &str, format: Format, origin: &str) -> Result<ModelData, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        origin: origin.to_string(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

// ===========================================================================
// Application
// ===========================================================================

/// Populate a session from a parsed model: catalog entries first, then
/// operations with their flows, then opening inventory movements.
pub fn apply_model(data: &ModelData, session: &mut PlanningSession) -> Result<(), DataLoadError> {
    for name in &data.products {
        session.create_product(name)?;
    }
    for name in &data.locations {
        session.create_location(name)?;
    }

    for op_data in &data.operations {
        let op = session.create_operation(&op_data.key, op_data.priority)?;
        for input in &op_data.inputs {
            let target = session.create_product_location_by_key(&input.at)?;
            session.add_input(op, target, Fixed64::from_num(input.quantity_per))?;
        }
        if let Some(output) = &op_data.output {
            let target = session.create_product_location_by_key(&output.at)?;
            session.add_output(op, target, Fixed64::from_num(output.quantity_per))?;
        }
    }

    for movement in &data.inventory {
        let target = session.create_product_location_by_key(&movement.at)?;
        let Some(ledger) = session.ledger_mut(target) else {
            continue;
        };
        let quantity = Fixed64::from_num(movement.quantity);
        if movement.set {
            ledger.update(movement.time, quantity);
        } else if quantity > Fixed64::ZERO {
            ledger.add(movement.time, quantity)?;
        } else if quantity < Fixed64::ZERO {
            ledger.remove(movement.time, -quantity)?;
        } else {
            return Err(LedgerError::NonPositiveQuantity.into());
        }
    }

    Ok(())
}

/// Convenience: read, parse, and apply a model file in one step.
pub fn load_into(path: &Path, session: &mut PlanningSession) -> Result<(), DataLoadError> {
    let data = load_model_file(path)?;
    apply_model(&data, session)
}

// ===========================================================================
// Tests
// ===========================================================================
