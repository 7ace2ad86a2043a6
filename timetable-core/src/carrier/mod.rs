//! Carrier and ticketing channel resolution.
//!
//! Resolution walks an ordered rule list; the first rule that produces a
//! result wins:
//!
//! 1. explicit sea-line table entry, used verbatim
//! 2. first contact's operator with a known ticket shop
//! 3. first contact's operator without a known shop
//!
//! If no rule matches there is no carrier information at all.

mod tables;

pub use tables::{BUILTIN_VERSION, CarrierTables, SeaLineCarrier};

use tracing::trace;

use crate::domain::{Contact, Line};

/// Resolved ticketing information for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierInfo {
    pub name: Option<String>,
    /// `None` means tickets are bought on board; there is no online channel.
    pub ticket_url: Option<String>,
}

/// How the ticketing block of a timetable is rendered.
///
/// The variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketPresentation {
    /// Tappable link to an online shop.
    Online {
        carrier: Option<String>,
        url: String,
    },
    /// Carrier shown as plain text with on-board purchase messaging.
    BoardingOnly { carrier: String },
    /// Generic fallback message.
    Unknown,
}

impl TicketPresentation {
    pub fn from_carrier(info: Option<&CarrierInfo>) -> Self {
        match info {
            Some(CarrierInfo {
                name,
                ticket_url: Some(url),
            }) => TicketPresentation::Online {
                carrier: name.clone(),
                url: url.clone(),
            },
            Some(CarrierInfo {
                name: Some(name),
                ticket_url: None,
            }) => TicketPresentation::BoardingOnly {
                carrier: name.clone(),
            },
            _ => TicketPresentation::Unknown,
        }
    }
}

/// Inputs a rule looks at.
struct Lookup<'a> {
    tables: &'a CarrierTables,
    line_number: Option<&'a str>,
    contacts: &'a [Contact],
}

impl Lookup<'_> {
    fn first_operator(&self) -> Option<&str> {
        self.contacts.first().and_then(Contact::operator_name)
    }
}

type Rule = fn(&Lookup<'_>) -> Option<CarrierInfo>;

/// Ordered resolution rules, first match wins.
const RULES: &[(&str, Rule)] = &[
    ("sea-line table", sea_line_entry as Rule),
    ("operator ticket shop", operator_with_shop as Rule),
    ("operator only", operator_without_shop as Rule),
];

fn sea_line_entry(lookup: &Lookup<'_>) -> Option<CarrierInfo> {
    let entry = lookup.tables.sea_line(lookup.line_number?)?;
    Some(CarrierInfo {
        name: Some(entry.name.clone()),
        ticket_url: entry.ticket_url.clone(),
    })
}

fn operator_with_shop(lookup: &Lookup<'_>) -> Option<CarrierInfo> {
    let operator = lookup.first_operator()?;
    let url = lookup.tables.ticket_url(operator)?;
    Some(CarrierInfo {
        name: Some(operator.to_string()),
        ticket_url: Some(url.to_string()),
    })
}

fn operator_without_shop(lookup: &Lookup<'_>) -> Option<CarrierInfo> {
    let operator = lookup.first_operator()?;
    Some(CarrierInfo {
        name: Some(operator.to_string()),
        ticket_url: None,
    })
}

/// Resolves the carrier and ticket channel for lines.
#[derive(Debug, Clone, Default)]
pub struct CarrierResolver {
    tables: CarrierTables,
}

impl CarrierResolver {
    /// Resolver over the built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: CarrierTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &CarrierTables {
        &self.tables
    }

    /// Resolve carrier information for a public line number and its contacts.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_core::carrier::CarrierResolver;
    ///
    /// let resolver = CarrierResolver::new();
    ///
    /// let online = resolver.resolve(Some("602"), &[]).unwrap();
    /// assert!(online.ticket_url.is_some());
    ///
    /// let boarding_only = resolver.resolve(Some("612"), &[]).unwrap();
    /// assert!(boarding_only.name.is_some());
    /// assert!(boarding_only.ticket_url.is_none());
    ///
    /// assert!(resolver.resolve(Some("000000"), &[]).is_none());
    /// ```
    pub fn resolve(&self, line_number: Option<&str>, contacts: &[Contact]) -> Option<CarrierInfo> {
        let lookup = Lookup {
            tables: &self.tables,
            line_number,
            contacts,
        };

        RULES.iter().find_map(|(name, rule)| {
            let info = rule(&lookup)?;
            trace!(rule = *name, line = ?line_number, "carrier resolved");
            Some(info)
        })
    }

    /// Resolve carrier information for a fetched line.
    pub fn resolve_line(&self, line: &Line) -> Option<CarrierInfo> {
        self.resolve(line.number.as_deref(), &line.contacts)
    }

    /// Resolve straight to the rendering decision.
    pub fn presentation(&self, line: &Line) -> TicketPresentation {
        TicketPresentation::from_carrier(self.resolve_line(line).as_ref())
    }
}
