//! Eurostat energy balance codes.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// The complete energy balances dataset.
pub const DATASET: &str = "nrg_bal_c";

/// The EU aggregate used when a request needs a single, always present country.
pub const EU_AGGREGATE: &str = "EU27_2020";

/// Dimension names of the energy balance datasets.
pub mod dimension {
    pub const GEO: &str = "geo";
    pub const TIME: &str = "time";
    pub const NRG_BAL: &str = "nrg_bal";
    pub const SIEC: &str = "siec";
    pub const UNIT: &str = "unit";
    pub const FREQ: &str = "freq";
}

/// `nrg_bal` balance flows.
pub mod flow {
    pub const PRODUCTION: &str = "PPRD";
    pub const IMPORTS: &str = "IMP";
    pub const EXPORTS: &str = "EXP";
    pub const GROSS_INLAND_CONSUMPTION: &str = "GIC";
    pub const FINAL_CONSUMPTION: &str = "FC_E";
    pub const TRANSFORMATION_INPUT: &str = "TI_EHG_E";
    pub const TRANSFORMATION_OUTPUT: &str = "TO_EHG";
}

/// `siec` energy products.
pub mod siec {
    pub const TOTAL: &str = "TOTAL";
    pub const ELECTRICITY: &str = "E7000";
    pub const HEAT: &str = "H8000";
}

/// Record field names shared by the reshaping, the categories and the renderer.
pub mod field {
    pub const PRODUCTION: &str = "production";
    pub const IMPORTS: &str = "imports";
    pub const EXPORTS: &str = "exports";
    pub const CONSUMPTION: &str = "consumption";
    pub const NET_IMPORTS: &str = "netImports";
    pub const DEPENDENCE: &str = "dependence";
    pub const SELF_SUFFICIENCY: &str = "selfSufficiency";
    pub const TOTAL: &str = "total";
    pub const HHI: &str = "hhi";
    pub const DIVERSITY: &str = "diversity";
    pub const INPUT: &str = "input";
    pub const ELECTRICITY: &str = "electricity";
    pub const HEAT: &str = "heat";
    pub const EFFICIENCY: &str = "efficiency";
    pub const LOSSES: &str = "losses";

    /// The name of the share field derived from `field`.
    pub fn share(field: &str) -> String {
        format!("{field}Share")
    }
}

/// A Eurostat code with the record field it feeds and a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub code: &'static str,
    pub field: &'static str,
    pub label: &'static str,
}

impl Code {
    const fn new(code: &'static str, field: &'static str, label: &'static str) -> Code {
        Self { code, field, label }
    }
}

/// Fuel groups of the gross inland consumption mix (`siec`).
pub const FUEL_GROUPS: [Code; 8] = [
    Code::new("C0000X0350-0370", "solidFossil", "Solid fossil fuels"),
    Code::new("O4000XBIO", "oil", "Oil and petroleum products"),
    Code::new("G3000", "gas", "Natural gas"),
    Code::new("N900H", "nuclear", "Nuclear heat"),
    Code::new("RA000", "renewables", "Renewables and biofuels"),
    Code::new("W6100_6220", "waste", "Non-renewable waste"),
    Code::new(siec::ELECTRICITY, "electricity", "Electricity"),
    Code::new(siec::HEAT, "heat", "Heat"),
];

/// Final energy consumption sectors (`nrg_bal`).
pub const SECTORS: [Code; 5] = [
    Code::new("FC_IND_E", "industry", "Industry"),
    Code::new("FC_TRA_E", "transport", "Transport"),
    Code::new("FC_OTH_HH_E", "households", "Households"),
    Code::new("FC_OTH_CP_E", "services", "Commercial and public services"),
    Code::new("FC_OTH_AF_E", "agriculture", "Agriculture and forestry"),
];

/// The measurement unit of the balance values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    /// Kilotonnes of oil equivalent.
    #[default]
    Ktoe,
    /// Gigawatt-hours.
    Gwh,
    /// Terajoules.
    Tj,
}

impl Unit {
    /// Returns the Eurostat `unit` code.
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Ktoe => "KTOE",
            Unit::Gwh => "GWH",
            Unit::Tj => "TJ",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "KTOE" => Ok(Unit::Ktoe),
            "GWH" => Ok(Unit::Gwh),
            "TJ" => Ok(Unit::Tj),
            other => Err(format!(
                "`{other}` is not a supported unit; expected one of KTOE, GWH, TJ"
            )),
        }
    }
}

/// Returns the display name of an EU country code, falling back to the code.
pub fn country_name(code: &str) -> &str {
    match code {
        "EU27_2020" => "European Union",
        "AT" => "Austria",
        "BE" => "Belgium",
        "BG" => "Bulgaria",
        "CY" => "Cyprus",
        "CZ" => "Czechia",
        "DE" => "Germany",
        "DK" => "Denmark",
        "EE" => "Estonia",
        "EL" => "Greece",
        "ES" => "Spain",
        "FI" => "Finland",
        "FR" => "France",
        "HR" => "Croatia",
        "HU" => "Hungary",
        "IE" => "Ireland",
        "IT" => "Italy",
        "LT" => "Lithuania",
        "LU" => "Luxembourg",
        "LV" => "Latvia",
        "MT" => "Malta",
        "NL" => "Netherlands",
        "PL" => "Poland",
        "PT" => "Portugal",
        "RO" => "Romania",
        "SE" => "Sweden",
        "SI" => "Slovenia",
        "SK" => "Slovakia",
        "NO" => "Norway",
        other => other,
    }
}
