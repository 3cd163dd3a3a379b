//! Edit buffers for the two structured forms. A draft holds raw form
//! state (strings and unset selects), validates locally, and only then
//! turns into a wire payload. Nothing here touches the network.

use crate::models::{
    Acidity, Alcohol, Body, Finish, FlavourIntensity, Quality, Readiness, SatNote, Sweetness,
    Tannin, Wine, WineFields,
};

/// Form state for creating or editing a wine's own fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WineDraft {
    pub name: String,
    pub region: String,
    pub category: String,
    pub vintage: String,
}

impl WineDraft {
    pub fn from_wine(wine: &Wine) -> Self {
        Self {
            name: wine.name.clone(),
            region: wine.region.clone(),
            category: wine.category.clone(),
            vintage: wine.vintage.to_string(),
        }
    }

    /// Checks the draft and produces the update payload. Whitespace-only
    /// input counts as empty.
    pub fn validate(&self) -> Result<WineFields, String> {
        let name = self.name.trim();
        let region = self.region.trim();
        let category = self.category.trim();
        let vintage = self.vintage.trim();

        if name.is_empty() || region.is_empty() || category.is_empty() || vintage.is_empty() {
            return Err("Please fill in all fields.".to_string());
        }

        let vintage: i32 = vintage
            .parse()
            .map_err(|_| "Vintage must be a year.".to_string())?;

        Ok(WineFields {
            name: name.to_string(),
            region: region.to_string(),
            category: category.to_string(),
            vintage,
        })
    }
}

/// Form state for the SAT assessment. Every dimension starts unset so a
/// half-filled form can be told apart from a deliberate choice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct SatDraft {
    pub sweetness: Option<Sweetness>,
    pub acidity: Option<Acidity>,
    pub tannin: Option<Tannin>,
    pub alcohol: Option<Alcohol>,
    pub body: Option<Body>,
    pub flavour_intensity: Option<FlavourIntensity>,
    pub finish: Option<Finish>,
    pub quality: Option<Quality>,
    pub readiness: Option<Readiness>,
}

impl SatDraft {
    pub fn from_sat(sat: &SatNote) -> Self {
        Self {
            sweetness: Some(sat.sweetness),
            acidity: Some(sat.acidity),
            tannin: Some(sat.tannin),
            alcohol: Some(sat.alcohol),
            body: Some(sat.body),
            flavour_intensity: Some(sat.flavour_intensity),
            finish: Some(sat.finish),
            quality: Some(sat.quality),
            readiness: Some(sat.readiness),
        }
    }

    /// Names of the dimensions still unset, in form order. Used verbatim
    /// in the validation banner.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sweetness.is_none() {
            missing.push("sweetness");
        }
        if self.acidity.is_none() {
            missing.push("acidity");
        }
        if self.tannin.is_none() {
            missing.push("tannin");
        }
        if self.alcohol.is_none() {
            missing.push("alcohol");
        }
        if self.body.is_none() {
            missing.push("body");
        }
        if self.flavour_intensity.is_none() {
            missing.push("flavour intensity");
        }
        if self.finish.is_none() {
            missing.push("finish");
        }
        if self.quality.is_none() {
            missing.push("quality");
        }
        if self.readiness.is_none() {
            missing.push("readiness");
        }
        missing
    }

    /// All nine dimensions must be chosen; otherwise the exact missing
    /// ones are reported so the form can point at them.
    pub fn validate(&self) -> Result<SatNote, Vec<&'static str>> {
        match (
            self.sweetness,
            self.acidity,
            self.tannin,
            self.alcohol,
            self.body,
            self.flavour_intensity,
            self.finish,
            self.quality,
            self.readiness,
        ) {
            (
                Some(sweetness),
                Some(acidity),
                Some(tannin),
                Some(alcohol),
                Some(body),
                Some(flavour_intensity),
                Some(finish),
                Some(quality),
                Some(readiness),
            ) => Ok(SatNote {
                sweetness,
                acidity,
                tannin,
                alcohol,
                body,
                flavour_intensity,
                finish,
                quality,
                readiness,
            }),
            _ => Err(self.missing_fields()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sat() -> SatNote {
        SatNote {
            sweetness: Sweetness::Dry,
            acidity: Acidity::High,
            tannin: Tannin::MediumMinus,
            alcohol: Alcohol::Medium,
            body: Body::Light,
            flavour_intensity: FlavourIntensity::Pronounced,
            finish: Finish::Long,
            quality: Quality::VeryGood,
            readiness: Readiness::DrinkNow,
        }
    }

    #[test]
    fn test_wine_draft_validate_trims_and_parses() {
        let draft = WineDraft {
            name: "  Chablis 1er Cru  ".to_string(),
            region: "Burgundy".to_string(),
            category: "white".to_string(),
            vintage: " 2019 ".to_string(),
        };
        let fields = draft.validate().expect("draft should be valid");
        assert_eq!(fields.name, "Chablis 1er Cru");
        assert_eq!(fields.vintage, 2019);
    }

    #[test]
    fn test_wine_draft_rejects_blank_fields() {
        let draft = WineDraft {
            name: "Chablis".to_string(),
            region: "   ".to_string(),
            category: "white".to_string(),
            vintage: "2019".to_string(),
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_wine_draft_rejects_non_numeric_vintage() {
        let draft = WineDraft {
            name: "Chablis".to_string(),
            region: "Burgundy".to_string(),
            category: "white".to_string(),
            vintage: "MMXIX".to_string(),
        };
        let err = draft.validate().expect_err("vintage should not parse");
        assert_eq!(err, "Vintage must be a year.");
    }

    #[test]
    fn test_sat_draft_reports_every_missing_field_in_order() {
        let draft = SatDraft::default();
        let missing = draft.validate().expect_err("empty draft cannot validate");
        assert_eq!(
            missing,
            vec![
                "sweetness",
                "acidity",
                "tannin",
                "alcohol",
                "body",
                "flavour intensity",
                "finish",
                "quality",
                "readiness",
            ]
        );
    }

    #[test]
    fn test_sat_draft_reports_only_the_unset_fields() {
        let mut draft = SatDraft::from_sat(&full_sat());
        draft.tannin = None;
        draft.readiness = None;
        let missing = draft.validate().expect_err("two fields are unset");
        assert_eq!(missing, vec!["tannin", "readiness"]);
    }

    #[test]
    fn test_sat_draft_round_trips_a_complete_note() {
        let sat = full_sat();
        let validated = SatDraft::from_sat(&sat)
            .validate()
            .expect("complete draft should validate");
        assert_eq!(validated, sat);
    }
}
