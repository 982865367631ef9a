use serde::{Deserialize, Serialize};

/// Company attributes that may appear in a listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Name,
    Code,
    Country,
    Website,
    Phone,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Name,
        Attribute::Code,
        Attribute::Country,
        Attribute::Website,
        Attribute::Phone,
    ];

    /// Case-insensitive lookup against the whitelist
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.column().eq_ignore_ascii_case(key))
    }

    /// Column name as it appears in the `company` table
    pub fn column(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Code => "code",
            Attribute::Country => "country",
            Attribute::Website => "website",
            Attribute::Phone => "phone",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Parameterized statement: SQL text plus positional `$n` arguments in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
