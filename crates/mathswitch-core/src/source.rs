//! The knowledge sources MathSwitch aggregates.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A public knowledge source. The short code (e.g. `Wd`, `nL`) is the
/// persisted representation and the form used in URLs.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
pub enum Source {
  #[serde(rename = "Wd")]
  #[strum(serialize = "Wd")]
  Wikidata,
  #[serde(rename = "nL")]
  #[strum(serialize = "nL")]
  NLab,
  #[serde(rename = "MW")]
  #[strum(serialize = "MW")]
  MathWorld,
  #[serde(rename = "PW")]
  #[strum(serialize = "PW")]
  ProofWiki,
  #[serde(rename = "EoM")]
  #[strum(serialize = "EoM")]
  EncyclopediaOfMathematics,
  #[serde(rename = "WpEN")]
  #[strum(serialize = "WpEN")]
  WikipediaEn,
  #[serde(rename = "AUm")]
  #[strum(serialize = "AUm")]
  AgdaUnimath,
}

impl Source {
  /// The short code stored in the database.
  pub fn code(self) -> &'static str {
    match self {
      Self::Wikidata => "Wd",
      Self::NLab => "nL",
      Self::MathWorld => "MW",
      Self::ProofWiki => "PW",
      Self::EncyclopediaOfMathematics => "EoM",
      Self::WikipediaEn => "WpEN",
      Self::AgdaUnimath => "AUm",
    }
  }

  /// Human-readable name.
  pub fn display_name(self) -> &'static str {
    match self {
      Self::Wikidata => "Wikidata",
      Self::NLab => "nLab",
      Self::MathWorld => "MathWorld",
      Self::ProofWiki => "ProofWiki",
      Self::EncyclopediaOfMathematics => "Encyclopedia of Mathematics",
      Self::WikipediaEn => "Wikipedia (English)",
      Self::AgdaUnimath => "Agda Unimath",
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn code_matches_strum_and_serde() {
    for source in Source::iter() {
      assert_eq!(source.to_string(), source.code());
      assert_eq!(Source::from_str(source.code()).unwrap(), source);
      let json = serde_json::to_string(&source).unwrap();
      assert_eq!(json, format!("\"{}\"", source.code()));
    }
  }

  #[test]
  fn unknown_code_is_rejected() {
    assert!(Source::from_str("wd").is_err());
  }
}
