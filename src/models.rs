/// One sub-element of a country block, addressed by a fixed `(tag, class)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Capital,
    Population,
    Area,
    Region,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Capital,
        Field::Population,
        Field::Area,
        Field::Region,
    ];

    /// Tag name of the sub-element holding this field.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Name => "h3",
            Self::Capital | Self::Population | Self::Area | Self::Region => "span",
        }
    }

    /// Class name of the sub-element holding this field.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Name => "country-name",
            Self::Capital => "country-capital",
            Self::Population => "country-population",
            Self::Area => "country-area",
            Self::Region => "country-region",
        }
    }

    /// CSS selector equivalent of the `(tag, class)` pair, e.g. `h3.country-name`.
    pub fn css(&self) -> String {
        format!("{}.{}", self.tag(), self.class())
    }
}

/// Trimmed text of every field of one block, before any type coercion.
///
/// Missing sub-elements are represented by empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub name: String,
    pub capital: String,
    pub population: String,
    pub area: String,
    pub region: String,
}

/// One row of the output dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub country: String,
    pub capital: String,
    pub population: Option<u64>,
    pub area: Option<f64>,
    pub region: String,
}
