use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Account profile returned by `/api/users/profile`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    /// Avatar URL. Absent when the user signed up without one.
    #[serde(default)]
    pub picture: Option<String>,
}

/// Scalar wine fields as sent on upload and whole-record replace.
/// The backend's wire key for the category is `type`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct WineFields {
    pub name: String,
    pub region: String,
    #[serde(rename = "type")]
    pub category: String,
    pub vintage: i32,
}

/// List-view projection used by the sidebar and recommendation cards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct WineSummary {
    #[serde(rename = "wineId")]
    pub wine_id: String,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub vintage: i32,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// Full wine record as returned by `GET /api/wines/{id}`, notes included.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Wine {
    #[serde(rename = "wineId")]
    pub wine_id: String,
    pub name: String,
    pub region: String,
    #[serde(rename = "type")]
    pub category: String,
    pub vintage: i32,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub notes: Vec<TastingNote>,
}

/// Free-form tasting note. `content` may carry rich-text markup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TastingNote {
    #[serde(rename = "noteId")]
    pub note_id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Autocomplete suggestion from `GET /api/wines/search`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Suggestion {
    pub name: String,
    #[serde(default)]
    pub region: String,
}

macro_rules! sat_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(
            Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
            Display, EnumIter, EnumString,
        )]
        #[serde(rename_all = "kebab-case")]
        #[strum(serialize_all = "kebab-case")]
        pub(crate) enum $name {
            $($variant),+
        }
    };
}

sat_enum!(Sweetness { Dry, OffDry, MediumDry, MediumSweet, Sweet, Luscious });
sat_enum!(Acidity { Low, MediumMinus, Medium, MediumPlus, High });
sat_enum!(Tannin { Low, MediumMinus, Medium, MediumPlus, High });
sat_enum!(Alcohol { Low, Medium, High });
sat_enum!(Body { Light, MediumMinus, Medium, MediumPlus, Full });
sat_enum!(FlavourIntensity { Light, MediumMinus, Medium, MediumPlus, Pronounced });
sat_enum!(Finish { Short, MediumMinus, Medium, MediumPlus, Long });
sat_enum!(Quality { Faulty, Poor, Acceptable, Good, VeryGood, Outstanding });
sat_enum!(Readiness { TooYoung, DrinkNowWithPotential, DrinkNow, TooOld });

/// Structured WSET-style tasting assessment. At most one per wine; it has
/// no identifier of its own beyond the owning wine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SatNote {
    pub sweetness: Sweetness,
    pub acidity: Acidity,
    pub tannin: Tannin,
    pub alcohol: Alcohol,
    pub body: Body,
    pub flavour_intensity: FlavourIntensity,
    pub finish: Finish,
    pub quality: Quality,
    pub readiness: Readiness,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_wine_contract_deserialize() {
        // Contract based on notevino backend: GET /api/wines/{id}
        let json = r#"{
            "wineId": "w-1",
            "name": "Barolo Riserva",
            "region": "Piedmont",
            "type": "Red",
            "vintage": 2016,
            "imageUrl": null,
            "createdAt": "2024-02-10T09:00:00.000Z",
            "notes": [
                {
                    "noteId": "n-1",
                    "content": "<p>Tar and roses</p>",
                    "createdAt": "2024-02-11T10:00:00.000Z",
                    "updatedAt": "2024-02-12T10:00:00.000Z"
                }
            ]
        }"#;
        let wine: Wine = serde_json::from_str(json).expect("wine should parse");
        assert_eq!(wine.wine_id, "w-1");
        assert_eq!(wine.category, "Red");
        assert_eq!(wine.notes.len(), 1);
        assert_eq!(wine.notes[0].updated_at, "2024-02-12T10:00:00.000Z");
    }

    #[test]
    fn test_wine_notes_default_to_empty() {
        // list endpoint omits notes entirely
        let json = r#"{"wineId": "w-2", "name": "x", "region": "y", "type": "White", "vintage": 2020}"#;
        let wine: Wine = serde_json::from_str(json).expect("wine without notes should parse");
        assert!(wine.notes.is_empty());
        assert!(wine.image_url.is_none());
    }

    #[test]
    fn test_sat_note_contract_round_trip() {
        let json = r#"{
            "sweetness": "dry",
            "acidity": "medium-plus",
            "tannin": "high",
            "alcohol": "medium",
            "body": "full",
            "flavourIntensity": "pronounced",
            "finish": "long",
            "quality": "very-good",
            "readiness": "drink-now-with-potential"
        }"#;
        let sat: SatNote = serde_json::from_str(json).expect("sat note should parse");
        assert_eq!(sat.acidity, Acidity::MediumPlus);
        assert_eq!(sat.readiness, Readiness::DrinkNowWithPotential);

        let back = serde_json::to_value(sat).expect("should serialize");
        assert_eq!(back["flavourIntensity"], "pronounced");
        assert_eq!(back["quality"], "very-good");
    }

    #[test]
    fn test_sat_enum_display_matches_wire_value() {
        // Select options are written with Display and parsed back with
        // FromStr; both must agree with the serde wire value.
        assert_eq!(Sweetness::OffDry.to_string(), "off-dry");
        assert_eq!(
            Sweetness::from_str("off-dry").expect("should parse"),
            Sweetness::OffDry
        );
        assert_eq!(Quality::VeryGood.to_string(), "very-good");
    }

    #[test]
    fn test_wine_fields_use_type_as_wire_key() {
        let fields = WineFields {
            name: "Riesling".to_string(),
            region: "Mosel".to_string(),
            category: "White".to_string(),
            vintage: 2021,
        };
        let v = serde_json::to_value(&fields).expect("should serialize");
        assert_eq!(v["type"], "White");
        assert!(v.get("category").is_none());
    }
}
