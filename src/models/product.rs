//! Product Models
//!
//! The flat product record extracted from one spec-sheet PDF, and the field
//! table that drives its JSON schema, the table DDL and row inserts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use spec_rag_llm::types::ParameterSchema;

/// Storage and schema kind of a product field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Real,
    Integer,
}

impl FieldKind {
    /// Column type used in the table DDL
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "VARCHAR(60)",
            FieldKind::Real => "FLOAT",
            FieldKind::Integer => "INTEGER",
        }
    }

    fn schema(&self, description: &str) -> ParameterSchema {
        let description = Some(description).filter(|d| !d.is_empty());
        match self {
            FieldKind::Text => ParameterSchema::string(description),
            FieldKind::Real => ParameterSchema::number(description),
            FieldKind::Integer => ParameterSchema::integer(description),
        }
    }
}

/// One entry of the product field table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Unit or example passed to the model as the property description
    pub hint: &'static str,
}

const fn field(name: &'static str, kind: FieldKind, hint: &'static str) -> FieldSpec {
    FieldSpec { name, kind, hint }
}

/// Product fields in column order.
pub const PRODUCT_FIELDS: &[FieldSpec] = &[
    field("product_name", FieldKind::Text, ""),
    field("product_family", FieldKind::Text, ""),
    field("color_temperature", FieldKind::Text, "e.g. \"~6000 K (Daylight)\""),
    field("power_range", FieldKind::Text, "e.g. \"450…10,000 W\""),
    field("color_rendering_index", FieldKind::Text, "e.g. \"High (Ra > ...)\""),
    field("description", FieldKind::Text, ""),
    field("advantages", FieldKind::Text, ""),
    field("application_areas", FieldKind::Text, ""),
    field("rated_current", FieldKind::Real, "in Amperes (e.g. 75.00 A)"),
    field("current_control_min", FieldKind::Real, "lower bound in Amperes (e.g. 50 A)"),
    field("current_control_max", FieldKind::Real, "upper bound in Amperes (e.g. 85 A)"),
    field("rated_power", FieldKind::Real, "in Watts (e.g. 2000.00 W)"),
    field("rated_voltage", FieldKind::Real, "in Volts (e.g. 25.0 V)"),
    field("diameter", FieldKind::Real, "in mm (e.g. 46.0 mm)"),
    field("length", FieldKind::Real, "in mm (e.g. 236.0 mm)"),
    field("length_excluding_base", FieldKind::Real, "in mm (e.g. 220.0 mm)"),
    field("light_center_length", FieldKind::Real, "in mm (e.g. 95.0 mm)"),
    field("electrode_gap", FieldKind::Real, "in mm (e.g. 5.0 mm)"),
    field("product_weight", FieldKind::Real, "in grams (e.g. 391.00 g)"),
    field("cable_length", FieldKind::Real, "in mm (e.g. 265.0 mm)"),
    field("max_ambient_temperature", FieldKind::Real, "in °C (e.g. 230 °C)"),
    field("lifespan", FieldKind::Real, "in hours (e.g. 2000 h)"),
    field("anode_socket", FieldKind::Text, "e.g. \"SK27/50\""),
    field("cathode_socket", FieldKind::Text, "e.g. \"SFcX27-8\""),
    field("reach_declaration_date", FieldKind::Text, "e.g. \"10-02-2023\""),
    field("primary_product_number", FieldKind::Text, "e.g. \"4008321082077\""),
    field("candidate_substance", FieldKind::Text, "e.g. \"Lead\""),
    field("candidate_substance_cas", FieldKind::Text, "e.g. \"7439-92-1\""),
    field(
        "scip_declaration_number",
        FieldKind::Text,
        "e.g. \"d7d8f0b3-9cce-48bc-b9a2-a440e89f5b64\"",
    ),
    field("ean", FieldKind::Text, "e.g. \"4008321082077\""),
    field("metel_code", FieldKind::Text, "e.g. \"OSRXBO2000SHSCOFR\""),
    field("packaging_product_code", FieldKind::Text, "e.g. \"4008321082077\""),
    field("packaging_product_name", FieldKind::Text, "e.g. \"XBO 2000 W/SHSC OFR\""),
    field("packaging_unit", FieldKind::Integer, "pieces per unit (e.g. 1)"),
    field("dimension_length", FieldKind::Real, "in mm (e.g. 410 mm)"),
    field("dimension_width", FieldKind::Real, "in mm (e.g. 184 mm)"),
    field("dimension_height", FieldKind::Real, "in mm (e.g. 180 mm)"),
    field("volume", FieldKind::Real, "in dm³ (e.g. 13.58 dm³)"),
    field("gross_weight", FieldKind::Real, "in grams (e.g. 955.00 g)"),
];

/// Structured data extracted from one product spec sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    // General information
    pub product_name: String,
    pub product_family: String,
    pub color_temperature: String,
    pub power_range: String,
    pub color_rendering_index: String,
    pub description: String,
    pub advantages: String,
    pub application_areas: String,

    // Technical data
    pub rated_current: f64,
    pub current_control_min: f64,
    pub current_control_max: f64,
    pub rated_power: f64,
    pub rated_voltage: f64,
    pub diameter: f64,
    pub length: f64,
    pub length_excluding_base: f64,
    pub light_center_length: f64,
    pub electrode_gap: f64,
    pub product_weight: f64,
    pub cable_length: f64,
    pub max_ambient_temperature: f64,
    pub lifespan: f64,
    pub anode_socket: String,
    pub cathode_socket: String,

    // Environmental and regulatory information
    pub reach_declaration_date: String,
    pub primary_product_number: String,
    pub candidate_substance: String,
    pub candidate_substance_cas: String,
    pub scip_declaration_number: String,

    // Country-specific information
    pub ean: String,
    pub metel_code: String,

    // Logistical data
    pub packaging_product_code: String,
    pub packaging_product_name: String,
    pub packaging_unit: i64,
    pub dimension_length: f64,
    pub dimension_width: f64,
    pub dimension_height: f64,
    pub volume: f64,
    pub gross_weight: f64,
}

impl ProductItem {
    /// Name of the structured-output schema sent to the model
    pub const SCHEMA_NAME: &'static str = "ProductItem";

    /// Strict JSON schema: every field required, no extra properties.
    pub fn json_schema() -> ParameterSchema {
        let properties: HashMap<String, ParameterSchema> = PRODUCT_FIELDS
            .iter()
            .map(|f| (f.name.to_string(), f.kind.schema(f.hint)))
            .collect();
        ParameterSchema::strict_object(Some("Product specification sheet"), properties)
    }
}

/// A stored product: the extracted item plus database metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub item: ProductItem,
    /// Source PDF file name; primary key
    pub filename: String,
    /// Local ISO-8601 timestamp of when the record was created
    pub created_at: Option<String>,
}

impl ProductRecord {
    /// Create a record stamped with the current local time
    pub fn new(filename: impl Into<String>, item: ProductItem) -> Self {
        Self {
            item,
            filename: filename.into(),
            created_at: Some(chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()),
        }
    }
}
