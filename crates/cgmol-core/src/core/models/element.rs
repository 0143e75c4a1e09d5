use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Element classes recognized when classifying coarse-grained atoms.
///
/// The class is derived from the leading character of the atom name, so only
/// single-letter element symbols can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    C,
    N,
    O,
    S,
    P,
}

/// Built-in symbol table with covalent radii in Angstroms.
static DEFAULT_ELEMENTS: Map<char, (Element, f64)> = phf_map! {
    'H' => (Element::H, 0.31),
    'C' => (Element::C, 0.76),
    'N' => (Element::N, 0.71),
    'O' => (Element::O, 0.66),
    'S' => (Element::S, 1.05),
    'P' => (Element::P, 1.07),
};

impl Element {
    pub fn symbol(&self) -> char {
        match self {
            Element::H => 'H',
            Element::C => 'C',
            Element::N => 'N',
            Element::O => 'O',
            Element::S => 'S',
            Element::P => 'P',
        }
    }

    /// Covalent radius from the built-in table, in Angstroms.
    pub fn default_radius(&self) -> f64 {
        DEFAULT_ELEMENTS
            .get(&self.symbol())
            .map(|(_, radius)| *radius)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => DEFAULT_ELEMENTS
                .get(&c.to_ascii_uppercase())
                .map(|(element, _)| *element)
                .ok_or_else(|| ParseElementError(s.to_string())),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
struct ElementEntry {
    radius: f64,
}

/// Maps the leading character of an atom name to an element class and a radius.
///
/// The default table covers H, C, N, O, S and P with covalent radii. A TOML file can
/// override radii, keyed by element symbol:
///
/// ```toml
/// [C]
/// radius = 0.77
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTable {
    symbols: HashMap<char, Element>,
    radii: HashMap<Element, f64>,
}

impl Default for ElementTable {
    fn default() -> Self {
        let mut symbols = HashMap::with_capacity(DEFAULT_ELEMENTS.len());
        let mut radii = HashMap::with_capacity(DEFAULT_ELEMENTS.len());
        for (symbol, (element, radius)) in DEFAULT_ELEMENTS.entries() {
            symbols.insert(*symbol, *element);
            radii.insert(*element, *radius);
        }
        Self { symbols, radii }
    }
}

impl ElementTable {
    /// Loads radius overrides from a TOML file on top of the built-in table.
    pub fn load(path: &Path) -> Result<Self, ElementTableError> {
        let content = std::fs::read_to_string(path).map_err(|e| ElementTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ElementTableError::Toml { source, .. } => ElementTableError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ElementTableError> {
        let entries: HashMap<String, ElementEntry> =
            toml::from_str(content).map_err(|e| ElementTableError::Toml {
                path: "<string>".to_string(),
                source: e,
            })?;

        let mut table = Self::default();
        for (symbol, entry) in entries {
            let element: Element = symbol
                .parse()
                .map_err(|_| ElementTableError::UnknownSymbol(symbol.clone()))?;
            table.set_radius(element, entry.radius)?;
        }
        Ok(table)
    }

    pub fn set_radius(&mut self, element: Element, radius: f64) -> Result<(), ElementTableError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ElementTableError::InvalidRadius { element, radius });
        }
        self.radii.insert(element, radius);
        Ok(())
    }

    /// Removes a symbol from the lookup; names starting with it no longer classify.
    pub fn remove_symbol(&mut self, symbol: char) -> Option<Element> {
        self.symbols.remove(&symbol)
    }

    /// Classifies an atom name by its first character.
    pub fn classify(&self, atom_name: &str) -> Option<Element> {
        atom_name
            .chars()
            .next()
            .and_then(|c| self.symbols.get(&c))
            .copied()
    }

    pub fn radius(&self, element: Element) -> f64 {
        self.radii
            .get(&element)
            .copied()
            .unwrap_or_else(|| element.default_radius())
    }

    pub fn max_radius(&self) -> f64 {
        self.radii.values().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Error)]
pub enum ElementTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown element symbol in table: '{0}'")]
    UnknownSymbol(String),
    #[error("Radius for element {element} must be finite and positive (got {radius})")]
    InvalidRadius { element: Element, radius: f64 },
}
