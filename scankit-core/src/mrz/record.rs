use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ScanError;

/// A field of the Machine-Readable Zone the recognizer can extract.
///
/// String forms match the field names used by the recognizers on both
/// platforms (`documentNumber`, `birthDateYYMMDD`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
pub enum MrzField {
    /// Document number, up to nine characters.
    #[strum(serialize = "documentNumber")]
    #[serde(rename = "documentNumber")]
    DocumentNumber,
    /// Date of birth exactly as printed, `YYMMDD`.
    #[strum(serialize = "birthDateYYMMDD")]
    #[serde(rename = "birthDateYYMMDD")]
    BirthDateYymmdd,
    /// Date of expiry exactly as printed, `YYMMDD`.
    #[strum(serialize = "expirationDateYYMMDD")]
    #[serde(rename = "expirationDateYYMMDD")]
    ExpirationDateYymmdd,
    /// Date of birth with the century resolved by the recognizer.
    #[strum(serialize = "birthDate")]
    #[serde(rename = "birthDate")]
    BirthDate,
    /// Date of expiry with the century resolved by the recognizer.
    #[strum(serialize = "validDate")]
    #[serde(rename = "validDate")]
    ValidDate,
    /// Issuing state or organization (ICAO three-letter code).
    #[strum(serialize = "issuingState")]
    #[serde(rename = "issuingState")]
    IssuingState,
    /// Holder's given names.
    #[strum(serialize = "givenName")]
    #[serde(rename = "givenName")]
    GivenName,
    /// Holder's surname.
    #[strum(serialize = "surName")]
    #[serde(rename = "surName")]
    Surname,
    /// Holder's nationality.
    #[strum(serialize = "nationality")]
    #[serde(rename = "nationality")]
    Nationality,
    /// Holder's sex.
    #[strum(serialize = "sex")]
    #[serde(rename = "sex")]
    Sex,
}

/// The fields captured from a passport: the BAC key material plus the dates
/// and issuer shown to the user for confirmation.
pub const PASSPORT_MRZ_FIELDS: [MrzField; 6] = [
    MrzField::DocumentNumber,
    MrzField::BirthDateYymmdd,
    MrzField::ExpirationDateYymmdd,
    MrzField::BirthDate,
    MrzField::ValidDate,
    MrzField::IssuingState,
];

/// Fields the chip's access control is keyed with.
pub const CHIP_ACCESS_FIELDS: [MrzField; 3] = [
    MrzField::DocumentNumber,
    MrzField::BirthDateYymmdd,
    MrzField::ExpirationDateYymmdd,
];

/// What the recognizer extracted from one evaluated frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct MrzCandidate {
    /// Document code from the first MRZ line (`P`, `PO`, `ID`, ...), if read.
    pub document_code: Option<String>,
    /// Recognized fields; absent keys were not read.
    pub fields: HashMap<MrzField, String>,
}

/// The MRZ fields captured for one passport.
///
/// A record is replaced as a whole, never edited in place. Any field may be
/// missing if the recognizer only produced a partial read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct MrzRecord {
    /// Document number.
    pub document_number: Option<String>,
    /// Date of birth, `YYMMDD`.
    #[serde(rename = "birthDateYYMMDD")]
    pub birth_date_yymmdd: Option<String>,
    /// Date of expiry, `YYMMDD`.
    #[serde(rename = "expirationDateYYMMDD")]
    pub expiration_date_yymmdd: Option<String>,
    /// Date of birth with resolved century.
    pub birth_date: Option<String>,
    /// Date of expiry with resolved century.
    pub valid_date: Option<String>,
    /// Issuing state.
    pub issuing_state: Option<String>,
}

/// BAC key material taken from a record whose access fields are all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChipAccessKey {
    pub document_number: String,
    pub date_of_birth: String,
    pub date_of_expiry: String,
}

impl MrzRecord {
    /// Builds a record from the `wanted` fields of a candidate.
    ///
    /// Blank values are dropped. Returns `None` when nothing usable is left.
    #[must_use]
    pub fn from_candidate(candidate: &MrzCandidate, wanted: &[MrzField]) -> Option<Self> {
        let pick = |field: MrzField| {
            if !wanted.contains(&field) {
                return None;
            }
            candidate
                .fields
                .get(&field)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        let record = Self {
            document_number: pick(MrzField::DocumentNumber),
            birth_date_yymmdd: pick(MrzField::BirthDateYymmdd),
            expiration_date_yymmdd: pick(MrzField::ExpirationDateYymmdd),
            birth_date: pick(MrzField::BirthDate),
            valid_date: pick(MrzField::ValidDate),
            issuing_state: pick(MrzField::IssuingState),
        };

        (!record.is_empty()).then_some(record)
    }

    /// Returns the value of `field`, if this record carries it.
    #[must_use]
    pub fn get(&self, field: MrzField) -> Option<&str> {
        let value = match field {
            MrzField::DocumentNumber => self.document_number.as_deref(),
            MrzField::BirthDateYymmdd => self.birth_date_yymmdd.as_deref(),
            MrzField::ExpirationDateYymmdd => self.expiration_date_yymmdd.as_deref(),
            MrzField::BirthDate => self.birth_date.as_deref(),
            MrzField::ValidDate => self.valid_date.as_deref(),
            MrzField::IssuingState => self.issuing_state.as_deref(),
            MrzField::GivenName | MrzField::Surname | MrzField::Nationality | MrzField::Sex => None,
        };
        value.filter(|value| !value.is_empty())
    }

    /// Whether no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        PASSPORT_MRZ_FIELDS
            .iter()
            .all(|field| self.get(*field).is_none())
    }

    /// Chip access fields that are absent or empty.
    #[must_use]
    pub fn missing_chip_fields(&self) -> Vec<MrzField> {
        CHIP_ACCESS_FIELDS
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Extracts the chip access key.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Validation`] listing the missing fields if any of
    /// the document number, date of birth or date of expiry is empty.
    pub(crate) fn chip_access_key(&self) -> Result<ChipAccessKey, ScanError> {
        match (
            self.get(MrzField::DocumentNumber),
            self.get(MrzField::BirthDateYymmdd),
            self.get(MrzField::ExpirationDateYymmdd),
        ) {
            (Some(document_number), Some(date_of_birth), Some(date_of_expiry)) => {
                Ok(ChipAccessKey {
                    document_number: document_number.to_owned(),
                    date_of_birth: date_of_birth.to_owned(),
                    date_of_expiry: date_of_expiry.to_owned(),
                })
            }
            _ => Err(ScanError::Validation {
                missing: self
                    .missing_chip_fields()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            }),
        }
    }
}
