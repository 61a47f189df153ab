//! Brazilian tax identifiers
//!
//! Newtype wrappers keep CNPJ and CPF values normalized to bare digits,
//! the only form the ABRASF schema accepts. Parsing strips formatting
//! punctuation ("12.345.678/0001-95") and classifies by digit count.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

fn digits_of(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A company tax id (14 digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cnpj(String);

impl Cnpj {
    /// Parses a CNPJ, stripping all non-digit characters
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let digits = digits_of(value);
        if digits.len() != 14 {
            return Err(ValidationError::InvalidCnpj {
                value: value.to_string(),
                digits: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    /// Returns the bare digit string used on the wire
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cnpj {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An individual tax id (11 digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Parses a CPF, stripping all non-digit characters
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let digits = digits_of(value);
        if digits.len() != 11 {
            return Err(ValidationError::InvalidCpf {
                value: value.to_string(),
                digits: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    /// Returns the bare digit string used on the wire
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cpf {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Either kind of customer tax id, classified by normalized digit count
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxId {
    Cpf(Cpf),
    Cnpj(Cnpj),
}

impl TaxId {
    /// Parses a tax id: 11 digits is a CPF, 14 a CNPJ
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let digits = digits_of(value);
        match digits.len() {
            11 => Ok(Self::Cpf(Cpf(digits))),
            14 => Ok(Self::Cnpj(Cnpj(digits))),
            n => Err(ValidationError::InvalidTaxId {
                value: value.to_string(),
                digits: n,
            }),
        }
    }

    /// Returns the bare digit string used on the wire
    pub fn as_digits(&self) -> &str {
        match self {
            Self::Cpf(cpf) => cpf.as_digits(),
            Self::Cnpj(cnpj) => cnpj.as_digits(),
        }
    }

    /// Returns true for an individual (CPF) id
    pub fn is_individual(&self) -> bool {
        matches!(self, Self::Cpf(_))
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_digits())
    }
}

/// Target environment of the tax authority web service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Homolog,
    Production,
}

impl Environment {
    /// Stable lowercase name, used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homolog => "homolog",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "homolog" | "homologacao" => Ok(Self::Homolog),
            "production" | "prod" | "producao" => Ok(Self::Production),
            _ => Err(ValidationError::MissingField("environment")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cnpj_strips_punctuation() {
        let cnpj = Cnpj::parse("12.345.678/0001-95").unwrap();
        assert_eq!(cnpj.as_digits(), "12345678000195");
    }

    #[test]
    fn test_cnpj_rejects_wrong_length() {
        assert!(matches!(
            Cnpj::parse("12.345.678/0001"),
            Err(ValidationError::InvalidCnpj { digits: 12, .. })
        ));
    }

    #[test]
    fn test_cpf_strips_punctuation() {
        let cpf = Cpf::parse("123.456.789-09").unwrap();
        assert_eq!(cpf.as_digits(), "12345678909");
    }

    #[test]
    fn test_tax_id_classifies_by_length() {
        assert!(TaxId::parse("123.456.789-09").unwrap().is_individual());
        assert!(!TaxId::parse("12.345.678/0001-95").unwrap().is_individual());
        assert!(matches!(
            TaxId::parse("12345"),
            Err(ValidationError::InvalidTaxId { digits: 5, .. })
        ));
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("homolog".parse::<Environment>().unwrap(), Environment::Homolog);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }
}
