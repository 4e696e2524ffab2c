//! The audit flow as an explicit finite-state machine, independent of any
//! presentation layer. One session walks city -> facility -> details ->
//! verdict; re-selecting upstream clears everything downstream, and `reset`
//! returns to the start from anywhere.

use thiserror::Error;

use crate::catalog::{Catalog, Facility, Procedure};
use crate::classify::{ClassifyError, WardType};
use crate::engine;
use crate::lookup;
use crate::types::Rupees;
use crate::verdict::{Assessment, VerdictPolicy, assess};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("no city {0:?} in the catalog")]
    UnknownCity(String),

    #[error("no facility matching {query:?} in {city}")]
    UnknownFacility { city: String, query: String },

    #[error("no procedure with code {code:?} in the {tier} rate list")]
    UnknownProcedure { code: String, tier: &'static str },

    #[error("{action} is not valid while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

#[derive(Debug, Clone)]
enum Step {
    SelectingCity,
    SelectingFacility {
        city: String,
    },
    EnteringDetails {
        city: String,
        facility: Facility,
    },
    ShowingVerdict {
        city: String,
        facility: Facility,
        procedure: Procedure,
        ward: WardType,
        benchmark: Rupees,
        assessment: Option<Assessment>,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::SelectingCity => "selecting a city",
            Step::SelectingFacility { .. } => "selecting a facility",
            Step::EnteringDetails { .. } => "entering bill details",
            Step::ShowingVerdict { .. } => "showing the verdict",
        }
    }
}

pub struct AuditSession<'c> {
    catalog: &'c Catalog,
    step: Step,
}

impl<'c> AuditSession<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        AuditSession { catalog, step: Step::SelectingCity }
    }

    /// Human-readable name of the current step.
    pub fn step_name(&self) -> &'static str {
        self.step.name()
    }

    /// Selected city, once past the first step.
    pub fn city(&self) -> Option<&str> {
        match &self.step {
            Step::SelectingCity => None,
            Step::SelectingFacility { city }
            | Step::EnteringDetails { city, .. }
            | Step::ShowingVerdict { city, .. } => Some(city),
        }
    }

    /// Selected facility, once past the facility step.
    pub fn facility(&self) -> Option<&Facility> {
        match &self.step {
            Step::EnteringDetails { facility, .. } | Step::ShowingVerdict { facility, .. } => {
                Some(facility)
            }
            _ => None,
        }
    }

    pub fn procedure(&self) -> Option<&Procedure> {
        match &self.step {
            Step::ShowingVerdict { procedure, .. } => Some(procedure),
            _ => None,
        }
    }

    pub fn ward(&self) -> Option<WardType> {
        match &self.step {
            Step::ShowingVerdict { ward, .. } => Some(*ward),
            _ => None,
        }
    }

    pub fn benchmark(&self) -> Option<Rupees> {
        match &self.step {
            Step::ShowingVerdict { benchmark, .. } => Some(*benchmark),
            _ => None,
        }
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        match &self.step {
            Step::ShowingVerdict { assessment, .. } => assessment.as_ref(),
            _ => None,
        }
    }

    /// Pick a city. Valid from any step; anything chosen downstream is
    /// cleared, exactly like re-opening the first picker.
    pub fn select_city(&mut self, city: &str) -> Result<(), SessionError> {
        if !lookup::cities(self.catalog).contains(&city) {
            return Err(SessionError::UnknownCity(city.to_string()));
        }
        self.step = Step::SelectingFacility { city: city.to_string() };
        Ok(())
    }

    /// Pick a catalog facility by name substring within the selected city.
    /// Valid once a city is chosen; re-selection clears downstream choices.
    pub fn select_facility(&mut self, query: &str) -> Result<(), SessionError> {
        let city = self.require_city("select_facility")?;
        let matches = lookup::find_facilities(self.catalog, &city, query);
        let facility = match matches.first() {
            Some(f) => (*f).clone(),
            None => {
                return Err(SessionError::UnknownFacility { city, query: query.to_string() });
            }
        };
        self.step = Step::EnteringDetails { city, facility };
        Ok(())
    }

    /// Assert a facility the published list does not carry, classified from
    /// the same free-text attributes as a listed row.
    pub fn select_custom_facility(
        &mut self,
        name: &str,
        accreditation_text: &str,
        tier_label: &str,
        facilities_text: &str,
    ) -> Result<(), SessionError> {
        let city = self.require_city("select_custom_facility")?;
        let facility =
            Facility::user_asserted(name, accreditation_text, tier_label, &city, facilities_text)?;
        self.step = Step::EnteringDetails { city, facility };
        Ok(())
    }

    /// Submit the bill line: procedure code, ward, and optionally what the
    /// facility charged. Computes the benchmark and, when a quoted amount is
    /// given, the assessment. Also valid from the verdict step, which
    /// recomputes everything fresh.
    pub fn submit_details(
        &mut self,
        procedure_code: &str,
        ward: WardType,
        quoted: Option<Rupees>,
        policy: VerdictPolicy,
    ) -> Result<(), SessionError> {
        let (city, facility) = match &self.step {
            Step::EnteringDetails { city, facility } => (city.clone(), facility.clone()),
            Step::ShowingVerdict { city, facility, .. } => (city.clone(), facility.clone()),
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "submit_details",
                    state: other.name(),
                });
            }
        };

        let procedure = lookup::find_procedure_by_code(self.catalog, facility.tier, procedure_code)
            .cloned()
            .ok_or_else(|| SessionError::UnknownProcedure {
                code: procedure_code.to_string(),
                tier: facility.tier.rate_tier().code(),
            })?;

        let benchmark = engine::benchmark(&procedure, &facility, ward);
        let assessment = quoted.map(|q| assess(benchmark, q, policy));
        self.step =
            Step::ShowingVerdict { city, facility, procedure, ward, benchmark, assessment };
        Ok(())
    }

    /// Enter (or correct) the quoted amount against the verdict on display.
    pub fn quote(&mut self, quoted: Rupees, policy: VerdictPolicy) -> Result<(), SessionError> {
        match &mut self.step {
            Step::ShowingVerdict { benchmark, assessment, .. } => {
                *assessment = Some(assess(*benchmark, quoted, policy));
                Ok(())
            }
            other => Err(SessionError::InvalidTransition { action: "quote", state: other.name() }),
        }
    }

    /// Start over, from anywhere.
    pub fn reset(&mut self) {
        self.step = Step::SelectingCity;
    }

    fn require_city(&self, action: &'static str) -> Result<String, SessionError> {
        match &self.step {
            Step::SelectingCity => {
                Err(SessionError::InvalidTransition { action, state: self.step.name() })
            }
            Step::SelectingFacility { city }
            | Step::EnteringDetails { city, .. }
            | Step::ShowingVerdict { city, .. } => Ok(city.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;

    fn catalog() -> Catalog {
        Catalog::canonical()
    }

    // ── Happy path ────────────────────────────────────────────────────────────

    #[test]
    fn full_walk_from_city_to_verdict() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);

        session.select_city("Jaipur").unwrap();
        session.select_facility("Pink City").unwrap();
        session
            .submit_details("2339/II", WardType::General, Some(95000), VerdictPolicy::Binary)
            .unwrap();

        // NABH, Tier 2, General: 92000 * 0.90 * 0.95 = 78660.
        assert_eq!(session.benchmark(), Some(78660));
        let a = session.assessment().unwrap();
        assert_eq!(a.verdict, Verdict::Overcharge);
        assert_eq!(a.difference, 95000 - 78660);
    }

    #[test]
    fn benchmark_without_quote_then_quote_later() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        session.select_facility("Fortune").unwrap();
        session
            .submit_details("1/I", WardType::Private, None, VerdictPolicy::Binary)
            .unwrap();

        // Uniform consultation row: no ward adjustment.
        assert_eq!(session.benchmark(), Some(350));
        assert!(session.assessment().is_none());

        session.quote(350, VerdictPolicy::Binary).unwrap();
        assert_eq!(session.assessment().unwrap().verdict, Verdict::Compliant);
    }

    #[test]
    fn custom_facility_walk() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Nashik").unwrap();
        session
            .select_custom_facility(
                "Deolali Super Speciality Hospital",
                "NABH Accredited",
                "Tier 3",
                "Oncology",
            )
            .unwrap();

        let f = session.facility().unwrap();
        assert!(!f.listed);
        assert!(f.super_speciality);

        session
            .submit_details("1445/III", WardType::SemiPrivate, None, VerdictPolicy::Binary)
            .unwrap();
        // 23000 * 1.15 * 0.80 = 21160.
        assert_eq!(session.benchmark(), Some(21160));
    }

    // ── Clearing and reset ────────────────────────────────────────────────────

    #[test]
    fn reselecting_city_clears_downstream_choices() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        session.select_facility("Rajdhani").unwrap();
        assert!(session.facility().is_some());

        session.select_city("Mumbai").unwrap();
        assert_eq!(session.city(), Some("Mumbai"));
        assert!(session.facility().is_none(), "facility must be cleared");
        assert!(session.benchmark().is_none());
    }

    #[test]
    fn reset_returns_to_initial_from_any_step() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        session.select_facility("Sparsh").unwrap();
        session
            .submit_details("77/I", WardType::General, Some(200), VerdictPolicy::Binary)
            .unwrap();

        session.reset();
        assert_eq!(session.step_name(), "selecting a city");
        assert!(session.city().is_none());
        assert!(session.assessment().is_none());
    }

    #[test]
    fn resubmitting_recomputes_fresh() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        session.select_facility("Fortune").unwrap();
        session
            .submit_details("1445/I", WardType::General, Some(30000), VerdictPolicy::Binary)
            .unwrap();
        let first = session.benchmark().unwrap();

        // Same line resubmitted with a different ward replaces the result.
        session
            .submit_details("1445/I", WardType::Private, Some(30000), VerdictPolicy::Binary)
            .unwrap();
        assert!(session.benchmark().unwrap() > first);
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn unknown_city_is_rejected() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        assert_eq!(
            session.select_city("Atlantis"),
            Err(SessionError::UnknownCity("Atlantis".to_string()))
        );
        assert!(session.city().is_none());
    }

    #[test]
    fn facility_selection_requires_a_city() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        assert!(matches!(
            session.select_facility("Fortune"),
            Err(SessionError::InvalidTransition { action: "select_facility", .. })
        ));
    }

    #[test]
    fn unknown_facility_is_rejected() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        assert!(matches!(
            session.select_facility("Nonexistent"),
            Err(SessionError::UnknownFacility { .. })
        ));
    }

    #[test]
    fn submit_requires_a_facility() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        assert!(matches!(
            session.submit_details("1/I", WardType::General, None, VerdictPolicy::Binary),
            Err(SessionError::InvalidTransition { action: "submit_details", .. })
        ));
    }

    #[test]
    fn procedure_from_the_wrong_tier_is_rejected() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Jaipur").unwrap();
        session.select_facility("Amber").unwrap();
        // Tier 2 facility; tier I row code must not resolve.
        let err = session
            .submit_details("2339/I", WardType::General, None, VerdictPolicy::Binary)
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownProcedure { tier: "II", .. }));
    }

    #[test]
    fn quote_requires_a_verdict_on_display() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        assert!(matches!(
            session.quote(1000, VerdictPolicy::Binary),
            Err(SessionError::InvalidTransition { action: "quote", .. })
        ));
    }

    #[test]
    fn custom_facility_with_unknown_tier_label_errors() {
        let catalog = catalog();
        let mut session = AuditSession::new(&catalog);
        session.select_city("Delhi").unwrap();
        let err = session
            .select_custom_facility("Any Hospital", "NABH", "metro", "")
            .unwrap_err();
        assert!(matches!(err, SessionError::Classify(ClassifyError::UnknownTier(_))));
    }
}
