use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::error::DetectionError;


/// Penn Treebank part-of-speech tags, plus `Unknown` for phrases whose
/// part of speech cannot be recovered from their occurrence context.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, AsRefStr, EnumIter,
)]
pub enum PosTag {
    #[strum(serialize = "CC")]
    Cc,
    #[strum(serialize = "CD")]
    Cd,
    #[strum(serialize = "DT")]
    Dt,
    #[strum(serialize = "EX")]
    Ex,
    #[strum(serialize = "FW")]
    Fw,
    #[strum(serialize = "IN")]
    In,
    #[strum(serialize = "JJ")]
    Jj,
    #[strum(serialize = "JJR")]
    Jjr,
    #[strum(serialize = "JJS")]
    Jjs,
    #[strum(serialize = "LS")]
    Ls,
    #[strum(serialize = "MD")]
    Md,
    #[strum(serialize = "NN")]
    Nn,
    #[strum(serialize = "NNS")]
    Nns,
    #[strum(serialize = "NNP")]
    Nnp,
    #[strum(serialize = "NNPS")]
    Nnps,
    #[strum(serialize = "PDT")]
    Pdt,
    #[strum(serialize = "POS")]
    Pos,
    #[strum(serialize = "PRP")]
    Prp,
    #[strum(serialize = "PRP$")]
    PrpPossessive,
    #[strum(serialize = "RB")]
    Rb,
    #[strum(serialize = "RBR")]
    Rbr,
    #[strum(serialize = "RBS")]
    Rbs,
    #[strum(serialize = "RP")]
    Rp,
    #[strum(serialize = "SYM")]
    Sym,
    #[strum(serialize = "TO")]
    To,
    #[strum(serialize = "UH")]
    Uh,
    #[strum(serialize = "VB")]
    Vb,
    #[strum(serialize = "VBD")]
    Vbd,
    #[strum(serialize = "VBG")]
    Vbg,
    #[strum(serialize = "VBN")]
    Vbn,
    #[strum(serialize = "VBP")]
    Vbp,
    #[strum(serialize = "VBZ")]
    Vbz,
    #[strum(serialize = "WDT")]
    Wdt,
    #[strum(serialize = "WP")]
    Wp,
    #[strum(serialize = "WP$")]
    WpPossessive,
    #[strum(serialize = "WRB")]
    Wrb,
    #[strum(serialize = "$")]
    Dollar,
    #[strum(serialize = "#")]
    Pound,
    #[strum(serialize = "``")]
    OpenQuote,
    #[strum(serialize = "''")]
    CloseQuote,
    #[strum(to_string = "-LRB-", serialize = "(")]
    LeftParen,
    #[strum(to_string = "-RRB-", serialize = ")")]
    RightParen,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ".")]
    Period,
    #[strum(serialize = ":")]
    Colon,
    #[strum(serialize = "XXX")]
    Unknown,
}

/// Broad word class used for synonym lookup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PosClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PosTag {
    pub fn parse(tag: &str) -> Result<Self, DetectionError> {
        Self::from_str(tag).map_err(|_| DetectionError::UnknownPosTag(tag.to_string()))
    }

    pub fn is_noun(&self) -> bool {
        matches!(self, Self::Nn | Self::Nns | Self::Nnp | Self::Nnps)
    }

    pub fn is_verb(&self) -> bool {
        matches!(
            self,
            Self::Vb | Self::Vbd | Self::Vbg | Self::Vbn | Self::Vbp | Self::Vbz
        )
    }

    pub fn is_gerund(&self) -> bool {
        matches!(self, Self::Vbg)
    }

    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Self::OpenQuote
                | Self::CloseQuote
                | Self::LeftParen
                | Self::RightParen
                | Self::Comma
                | Self::Period
                | Self::Colon
        )
    }

    /// Tags with no broad class get no synonyms.
    pub fn class(&self) -> Option<PosClass> {
        match self {
            Self::Nn | Self::Nns | Self::Nnp | Self::Nnps => Some(PosClass::Noun),
            Self::Vb | Self::Vbd | Self::Vbg | Self::Vbn | Self::Vbp | Self::Vbz => {
                Some(PosClass::Verb)
            }
            Self::Jj | Self::Jjr | Self::Jjs => Some(PosClass::Adjective),
            Self::Rb | Self::Rbr | Self::Rbs => Some(PosClass::Adverb),
            _ => None,
        }
    }
}

impl Serialize for PosTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for PosTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PosTag::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_round_trips_penn_names() {
        for tag in PosTag::iter() {
            assert_eq!(PosTag::parse(tag.as_ref()).unwrap(), tag);
        }
    }

    #[test]
    fn test_unknown_sentinel_is_xxx() {
        assert_eq!(PosTag::Unknown.to_string(), "XXX");
        assert_eq!(PosTag::parse("XXX").unwrap(), PosTag::Unknown);
    }

    #[test]
    fn test_rejects_unrecognised_tag() {
        assert!(matches!(
            PosTag::parse("NOTATAG"),
            Err(DetectionError::UnknownPosTag(_))
        ));
    }

    #[test]
    fn test_class_mapping() {
        assert_eq!(PosTag::Nnp.class(), Some(PosClass::Noun));
        assert_eq!(PosTag::Vbz.class(), Some(PosClass::Verb));
        assert_eq!(PosTag::Jjs.class(), Some(PosClass::Adjective));
        assert_eq!(PosTag::Rb.class(), Some(PosClass::Adverb));
        assert_eq!(PosTag::Dt.class(), None);
        assert_eq!(PosTag::Unknown.class(), None);
    }

    #[test]
    fn test_verb_and_gerund() {
        assert!(PosTag::Vbg.is_verb());
        assert!(PosTag::Vbg.is_gerund());
        assert!(!PosTag::Vbd.is_gerund());
        assert!(PosTag::Nns.is_noun());
    }
}
