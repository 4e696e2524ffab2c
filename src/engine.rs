use crate::catalog::{Facility, Procedure};
use crate::classify::{Accreditation, WardType};
use crate::types::Rupees;

/// Premium multiplier for super-speciality facilities. Applies on top of the
/// accredited rate only; a non-accredited facility never earns it.
pub const SUPER_SPECIALITY_PREMIUM: f64 = 1.15;

/// The government-capped price in whole rupees for one procedure at one
/// facility in one ward class.
///
/// The adjustment chain is order-sensitive: each factor compounds on the
/// running value, not on the listed base rate. Rounding happens once, at the
/// end; ties round up (away from zero).
///
/// Pure computation over validated inputs: no I/O, no mutation, re-entrant.
pub fn benchmark(procedure: &Procedure, facility: &Facility, ward: WardType) -> Rupees {
    // 1. Accreditation selects which listed rate applies.
    let mut rate = match facility.accreditation {
        Accreditation::Nabh => procedure.nabh_rate,
        Accreditation::NonNabh => procedure.non_nabh_rate,
    };

    // 2. Super-speciality premium, accredited facilities only.
    if facility.super_speciality && facility.accreditation.is_accredited() {
        rate *= SUPER_SPECIALITY_PREMIUM;
    }

    // 3. City-tier discount.
    rate *= facility.tier.discount();

    // 4. Ward adjustment. Uniform categories price the same across wards.
    if !procedure.uniform {
        rate *= ward.multiplier();
    }

    rate.round() as Rupees
}
