//! The fixed field vocabulary shared by the classifier, disambiguator and
//! exporter.
//!
//! The vocabulary is closed and ordered: declaration order of the `Field`
//! enum is the column order of the rendered table and of the CSV export.
//! Every component refers to this single definition, so a produced record
//! cannot contain a key outside the vocabulary.

use serde::{Deserialize, Serialize};

/// A recognized output field.
///
/// `Ord` follows declaration order, which is the fixed column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "IMAGE NAME")]
    ImageName,
    #[serde(rename = "EMAIL ADDRESS")]
    EmailAddress,
    #[serde(rename = "STATE_1")]
    State1,
    #[serde(rename = "COUNTRY_1")]
    Country1,
    #[serde(rename = "HEIGHT")]
    Height,
    #[serde(rename = "BILLER NAME")]
    BillerName,
    #[serde(rename = "STATE_2")]
    State2,
    #[serde(rename = "FIN_NO2")]
    FinNo2,
    #[serde(rename = "PAST SURG")]
    PastSurg,
    #[serde(rename = "POLICY NO")]
    PolicyNo,
    #[serde(rename = "NAME_P_HOLDER")]
    NamePHolder,
    #[serde(rename = "DOB")]
    Dob,
    #[serde(rename = "MEDICINE")]
    Medicine,
    #[serde(rename = "PILL RATE")]
    PillRate,
    #[serde(rename = "TOTAL AMT")]
    TotalAmt,
    #[serde(rename = "RECORD NO")]
    RecordNo,
    #[serde(rename = "RES_ADDRESS")]
    ResAddress,
    #[serde(rename = "ZIP_1")]
    Zip1,
    #[serde(rename = "SEX_1")]
    Sex1,
    #[serde(rename = "WEIGHT")]
    Weight,
    #[serde(rename = "SHIPPER NAME")]
    ShipperName,
    #[serde(rename = "ZIP_2")]
    Zip2,
    #[serde(rename = "ALCOHOLIC")]
    Alcoholic,
    #[serde(rename = "DIABETIC")]
    Diabetic,
    #[serde(rename = "D.LIFE ASSURE")]
    DLifeAssure,
    #[serde(rename = "SEX_2")]
    Sex2,
    #[serde(rename = "DOSAGE")]
    Dosage,
    #[serde(rename = "COST")]
    Cost,
    #[serde(rename = "REMARK")]
    Remark,
    #[serde(rename = "CUSTOMER NAME")]
    CustomerName,
    #[serde(rename = "CITY_1")]
    City1,
    #[serde(rename = "FIN_NO1")]
    FinNo1,
    #[serde(rename = "D_BIRTH")]
    DBirth,
    #[serde(rename = "BLOOD GP")]
    BloodGp,
    #[serde(rename = "CITY_2")]
    City2,
    #[serde(rename = "COUNTRY_2")]
    Country2,
    #[serde(rename = "SMOKER")]
    Smoker,
    #[serde(rename = "ALLERGIES")]
    Allergies,
    #[serde(rename = "P_INST")]
    PInst,
    #[serde(rename = "STH CODE")]
    SthCode,
    #[serde(rename = "CARD NAME")]
    CardName,
    #[serde(rename = "TABLETS")]
    Tablets,
    #[serde(rename = "SHIPPING COST")]
    ShippingCost,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 43] = [
        Field::ImageName,
        Field::EmailAddress,
        Field::State1,
        Field::Country1,
        Field::Height,
        Field::BillerName,
        Field::State2,
        Field::FinNo2,
        Field::PastSurg,
        Field::PolicyNo,
        Field::NamePHolder,
        Field::Dob,
        Field::Medicine,
        Field::PillRate,
        Field::TotalAmt,
        Field::RecordNo,
        Field::ResAddress,
        Field::Zip1,
        Field::Sex1,
        Field::Weight,
        Field::ShipperName,
        Field::Zip2,
        Field::Alcoholic,
        Field::Diabetic,
        Field::DLifeAssure,
        Field::Sex2,
        Field::Dosage,
        Field::Cost,
        Field::Remark,
        Field::CustomerName,
        Field::City1,
        Field::FinNo1,
        Field::DBirth,
        Field::BloodGp,
        Field::City2,
        Field::Country2,
        Field::Smoker,
        Field::Allergies,
        Field::PInst,
        Field::SthCode,
        Field::CardName,
        Field::Tablets,
        Field::ShippingCost,
    ];

    /// The header string for this field, as rendered in the table and CSV.
    pub fn name(&self) -> &'static str {
        match self {
            Field::ImageName => "IMAGE NAME",
            Field::EmailAddress => "EMAIL ADDRESS",
            Field::State1 => "STATE_1",
            Field::Country1 => "COUNTRY_1",
            Field::Height => "HEIGHT",
            Field::BillerName => "BILLER NAME",
            Field::State2 => "STATE_2",
            Field::FinNo2 => "FIN_NO2",
            Field::PastSurg => "PAST SURG",
            Field::PolicyNo => "POLICY NO",
            Field::NamePHolder => "NAME_P_HOLDER",
            Field::Dob => "DOB",
            Field::Medicine => "MEDICINE",
            Field::PillRate => "PILL RATE",
            Field::TotalAmt => "TOTAL AMT",
            Field::RecordNo => "RECORD NO",
            Field::ResAddress => "RES_ADDRESS",
            Field::Zip1 => "ZIP_1",
            Field::Sex1 => "SEX_1",
            Field::Weight => "WEIGHT",
            Field::ShipperName => "SHIPPER NAME",
            Field::Zip2 => "ZIP_2",
            Field::Alcoholic => "ALCOHOLIC",
            Field::Diabetic => "DIABETIC",
            Field::DLifeAssure => "D.LIFE ASSURE",
            Field::Sex2 => "SEX_2",
            Field::Dosage => "DOSAGE",
            Field::Cost => "COST",
            Field::Remark => "REMARK",
            Field::CustomerName => "CUSTOMER NAME",
            Field::City1 => "CITY_1",
            Field::FinNo1 => "FIN_NO1",
            Field::DBirth => "D_BIRTH",
            Field::BloodGp => "BLOOD GP",
            Field::City2 => "CITY_2",
            Field::Country2 => "COUNTRY_2",
            Field::Smoker => "SMOKER",
            Field::Allergies => "ALLERGIES",
            Field::PInst => "P_INST",
            Field::SthCode => "STH CODE",
            Field::CardName => "CARD NAME",
            Field::Tablets => "TABLETS",
            Field::ShippingCost => "SHIPPING COST",
        }
    }

    /// Look a field up by its exact header string.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_closed_and_unique() {
        let mut names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), 43);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 43);
    }

    #[test]
    fn test_from_name_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("NOT A FIELD"), None);
    }

    #[test]
    fn test_order_follows_declaration() {
        assert!(Field::ImageName < Field::EmailAddress);
        assert!(Field::EmailAddress < Field::ShippingCost);

        let mut sorted = Field::ALL;
        sorted.sort_unstable();
        assert_eq!(sorted, Field::ALL);
    }

    #[test]
    fn test_serde_uses_header_names() {
        let json = serde_json::to_string(&Field::DLifeAssure).unwrap();
        assert_eq!(json, "\"D.LIFE ASSURE\"");

        let field: Field = serde_json::from_str("\"BLOOD GP\"").unwrap();
        assert_eq!(field, Field::BloodGp);
    }
}
