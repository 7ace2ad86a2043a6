//! Known carrier tables.
//!
//! Both tables are configuration data. The built-in copy ships with the
//! crate; a newer version can be loaded from JSON at startup.

use std::collections::HashMap;

use serde::Deserialize;

/// Version of the built-in tables.
pub const BUILTIN_VERSION: u32 = 3;

/// Shop used by the state ferry operator for every line it runs.
const JADROLINIJA_SHOP: &str = "https://shop.jadrolinija.hr";

/// Sea lines with an explicitly assigned carrier.
///
/// A `None` URL means tickets are sold on board only.
const BUILTIN_SEA_LINES: &[(&str, &str, Option<&str>)] = &[
    ("602", "Jadrolinija", Some(JADROLINIJA_SHOP)),
    ("9602", "Jadrolinija", Some(JADROLINIJA_SHOP)),
    ("631", "Jadrolinija", Some(JADROLINIJA_SHOP)),
    ("612", "Bura Line", None),
    ("9604", "Kapetan Luka", Some("https://www.krilo.hr")),
];

/// Public ticket shops by operator name.
const BUILTIN_TICKET_URLS: &[(&str, &str)] = &[
    ("Jadrolinija", JADROLINIJA_SHOP),
    ("Kapetan Luka", "https://www.krilo.hr"),
    ("TP Line", "https://www.tp-line.hr"),
    ("Promet Split", "https://www.promet-split.hr"),
    ("Arriva Hrvatska", "https://www.arriva.com.hr"),
];

/// Carrier assigned to a sea line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeaLineCarrier {
    pub name: String,
    /// `None` when tickets are sold on board only.
    pub ticket_url: Option<String>,
}

/// Versioned lookup tables for carrier resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierTables {
    pub version: u32,
    /// Public line number to carrier.
    #[serde(default)]
    pub sea_lines: HashMap<String, SeaLineCarrier>,
    /// Operator name to ticket purchase URL.
    #[serde(default)]
    pub ticket_urls: HashMap<String, String>,
}

impl CarrierTables {
    /// The tables compiled into the crate.
    pub fn builtin() -> Self {
        let sea_lines = BUILTIN_SEA_LINES
            .iter()
            .map(|(number, name, url)| {
                (
                    (*number).to_string(),
                    SeaLineCarrier {
                        name: (*name).to_string(),
                        ticket_url: url.map(str::to_string),
                    },
                )
            })
            .collect();

        let ticket_urls = BUILTIN_TICKET_URLS
            .iter()
            .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
            .collect();

        Self {
            version: BUILTIN_VERSION,
            sea_lines,
            ticket_urls,
        }
    }

    /// Parse tables from their JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Carrier explicitly assigned to a line number.
    pub fn sea_line(&self, line_number: &str) -> Option<&SeaLineCarrier> {
        self.sea_lines.get(line_number.trim())
    }

    /// Ticket shop for an operator.
    pub fn ticket_url(&self, operator: &str) -> Option<&str> {
        self.ticket_urls.get(operator.trim()).map(String::as_str)
    }
}

impl Default for CarrierTables {
    fn default() -> Self {
        Self::builtin()
    }
}
