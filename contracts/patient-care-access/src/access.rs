use soroban_sdk::{contracttype, Address, Env};

use crate::{admission, consent};

/// How a hospital's access to a patient's records is justified, if at all
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessPath {
    Denied,
    /// Implicit access while the patient is physically admitted; no consent
    /// required, ends at discharge
    ActiveAdmission,
    /// Explicit patient grant; ends at revocation
    GrantedConsent,
}

/// Resolve a hospital's access to a patient. Evaluated fresh on every call:
/// discharge or revocation must flip the answer on the next lookup, so the
/// result is never cached.
pub fn check_access(env: &Env, hospital: &Address, patient: &Address) -> AccessPath {
    if admission::has_active_admission(env, patient, hospital) {
        return AccessPath::ActiveAdmission;
    }

    if consent::has_granted(env, patient, hospital) {
        return AccessPath::GrantedConsent;
    }

    AccessPath::Denied
}
