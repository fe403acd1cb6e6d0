use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Call for a single copy of a chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlleleCall {
    /// Copy carries the reference allele (`0`).
    Reference,
    /// Copy was not called (`.`).
    NoCall,
    /// Copy carries the alternative at this 0-based index into the
    /// record's alternative list (`1` in text is index 0).
    Alternative(usize),
}

impl AlleleCall {
    /// Index into the record's alternatives, if any.
    pub fn alternative_index(self) -> Option<usize> {
        match self {
            AlleleCall::Alternative(idx) => Some(idx),
            AlleleCall::Reference | AlleleCall::NoCall => None,
        }
    }
}

impl fmt::Display for AlleleCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlleleCall::Reference => f.write_str("0"),
            AlleleCall::NoCall => f.write_str("."),
            AlleleCall::Alternative(idx) => write!(f, "{}", idx + 1),
        }
    }
}

/// Failure to decompose a genotype string into allele calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenotypeParseError {
    /// Genotype field was empty.
    #[error("empty genotype")]
    Empty,
    /// One of the copies is neither `.` nor a non-negative integer.
    #[error("invalid allele '{allele}' in genotype '{genotype}'")]
    InvalidAllele {
        /// Full genotype text.
        genotype: String,
        /// Offending copy.
        allele: String,
    },
}

/// Genotype call for one genome at one record, one entry per copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeCall {
    copies: Vec<AlleleCall>,
    phased: bool,
}

impl GenotypeCall {
    /// Allele calls in copy order.
    pub fn copies(&self) -> &[AlleleCall] {
        &self.copies
    }

    /// Number of copies called.
    pub fn ploidy(&self) -> usize {
        self.copies.len()
    }

    /// Whether copies were separated with `|`.
    pub fn is_phased(&self) -> bool {
        self.phased
    }
}

impl FromStr for GenotypeCall {
    type Err = GenotypeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(GenotypeParseError::Empty);
        }

        let phased = trimmed.contains('|');
        let copies = trimmed
            .split(['/', '|'])
            .map(|allele| parse_allele(trimmed, allele))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { copies, phased })
    }
}

fn parse_allele(genotype: &str, allele: &str) -> Result<AlleleCall, GenotypeParseError> {
    let invalid = || GenotypeParseError::InvalidAllele {
        genotype: genotype.to_string(),
        allele: allele.to_string(),
    };

    match allele {
        "." => Ok(AlleleCall::NoCall),
        "0" => Ok(AlleleCall::Reference),
        "" => Err(invalid()),
        digits => {
            let index: usize = digits.parse().map_err(|_| invalid())?;
            match index {
                0 => Ok(AlleleCall::Reference),
                n => Ok(AlleleCall::Alternative(n - 1)),
            }
        }
    }
}
