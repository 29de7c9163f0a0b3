use serde::{Deserialize, Serialize};

/// Positional schema of a business-lead export, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Description,
    PrimaryIndustry,
    Location,
    Country,
    Domain,
    LinkedIn,
}

impl LeadField {
    pub const ALL: [LeadField; 7] = [
        LeadField::Name,
        LeadField::Description,
        LeadField::PrimaryIndustry,
        LeadField::Location,
        LeadField::Country,
        LeadField::Domain,
        LeadField::LinkedIn,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeadField::Name => "Name",
            LeadField::Description => "Description",
            LeadField::PrimaryIndustry => "Primary Industry",
            LeadField::Location => "Location",
            LeadField::Country => "Country",
            LeadField::Domain => "Domain",
            LeadField::LinkedIn => "LinkedIn",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            LeadField::PrimaryIndustry | LeadField::Location | LeadField::Country => "Unknown",
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessLead {
    pub id: String,
    pub name: String,
    pub description: String,
    pub primary_industry: String,
    pub location: String,
    pub country: String,
    pub domain: String,
    pub linkedin: String,
}

impl BusinessLead {
    /// Builds a lead from positional values, defaulting missing or empty
    /// columns. Returns `None` when the name column is empty.
    pub fn from_values<S: AsRef<str>>(ordinal: usize, values: &[S]) -> Option<Self> {
        let value = |field: LeadField| -> String {
            let idx = field as usize;
            let raw = values.get(idx).map(|v| v.as_ref().trim()).unwrap_or("");
            if raw.is_empty() {
                field.default_value().to_string()
            } else {
                raw.to_string()
            }
        };
        let name = value(LeadField::Name);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            id: lead_id(ordinal),
            name,
            description: value(LeadField::Description),
            primary_industry: value(LeadField::PrimaryIndustry),
            location: value(LeadField::Location),
            country: value(LeadField::Country),
            domain: value(LeadField::Domain),
            linkedin: value(LeadField::LinkedIn),
        })
    }

    pub fn get(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Description => &self.description,
            LeadField::PrimaryIndustry => &self.primary_industry,
            LeadField::Location => &self.location,
            LeadField::Country => &self.country,
            LeadField::Domain => &self.domain,
            LeadField::LinkedIn => &self.linkedin,
        }
    }

    pub fn values(&self) -> [&str; 7] {
        LeadField::ALL.map(|field| self.get(field))
    }

    /// Content equality, ignoring the per-run identifier.
    ///
    /// Ingestion replaces empty industry, location and country values with
    /// `Unknown`, so a lead built by hand with those fields empty compares
    /// unequal to its own export after re-ingestion. Leads from
    /// [`BusinessLead::from_values`] always survive the round trip.
    pub fn same_content(&self, other: &BusinessLead) -> bool {
        self.values() == other.values()
    }
}

pub fn lead_id(ordinal: usize) -> String {
    format!("lead_{:04}", ordinal)
}
