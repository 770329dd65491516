use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::AccessError;
use crate::notify::{self, NotificationKind};
use crate::users::{self, Role};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConsentStatus {
    /// Requested by a hospital, awaiting the patient's response
    Pending,
    /// Granted by the patient; revocable by the hospital
    Granted,
    /// Denied by the patient (terminal)
    Denied,
    /// Revoked after a grant (terminal)
    Revoked,
}

/// A hospital's request for access to a patient's records.
///
/// `patient_name` and `patient_phone` are snapshots of what the hospital
/// claimed about the patient at request time. They are audit data and are
/// never re-joined against the user registry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Consent {
    pub id: u64,
    pub patient: Address,
    pub hospital: Address,
    pub patient_name: String,
    pub patient_phone: String,
    pub status: ConsentStatus,
    pub requested_at: u64,
    pub responded_at: Option<u64>,
    pub revoked_at: Option<u64>,
}

// Storage keys
const CONSENTS: Symbol = symbol_short!("CONSENTS");
// Slot holding the single pending-or-granted consent id per
// (patient, hospital) pair. Uniqueness is enforced by this slot at the
// storage layer, not by a check-then-create scan.
const OPEN_CONSENT: Symbol = symbol_short!("CON_OPEN");
const HOSPITAL_CONSENTS: Symbol = symbol_short!("CON_HOSP");
const PATIENT_CONSENTS: Symbol = symbol_short!("CON_PAT");
const NEXT_CONSENT_ID: Symbol = symbol_short!("NEXT_CID");

pub fn request_consent(
    env: &Env,
    hospital: Address,
    patient: Address,
    patient_name: String,
    patient_phone: String,
) -> Result<u64, AccessError> {
    hospital.require_auth();

    users::require_role(env, &hospital, Role::Hospital)?;
    users::require_role(env, &patient, Role::Patient)?;

    let slot = storage_key_open(&patient, &hospital);
    if env.storage().persistent().has(&slot) {
        // A pending request or an unrevoked grant already covers this pair
        return Err(AccessError::ConsentAlreadyOpen);
    }

    let consent_id = get_next_consent_id(env);
    let consent = Consent {
        id: consent_id,
        patient: patient.clone(),
        hospital: hospital.clone(),
        patient_name,
        patient_phone,
        status: ConsentStatus::Pending,
        requested_at: env.ledger().timestamp(),
        responded_at: None,
        revoked_at: None,
    };

    env.storage()
        .persistent()
        .set(&storage_key_consent(consent_id), &consent);
    env.storage().persistent().set(&slot, &consent_id);

    add_to_index(env, &storage_key_hospital_index(&hospital), consent_id);
    add_to_index(env, &storage_key_patient_index(&patient), consent_id);

    notify::push(
        env,
        &patient,
        NotificationKind::ConsentRequested,
        String::from_str(env, "Info Access Request"),
        String::from_str(env, "A hospital is requesting access to your medical records"),
        Some(consent_id),
    );

    Ok(consent_id)
}

pub fn respond_consent(
    env: &Env,
    patient: Address,
    consent_id: u64,
    grant: bool,
) -> Result<(), AccessError> {
    patient.require_auth();

    let mut consent = get_consent(env, consent_id)?;

    // Not revealing other patients' consent ids: a mismatch reads as missing
    if consent.patient != patient {
        return Err(AccessError::ConsentNotFound);
    }

    if consent.status != ConsentStatus::Pending {
        return Err(AccessError::ConsentNotPending);
    }

    consent.status = if grant {
        ConsentStatus::Granted
    } else {
        ConsentStatus::Denied
    };
    consent.responded_at = Some(env.ledger().timestamp());

    env.storage()
        .persistent()
        .set(&storage_key_consent(consent_id), &consent);

    if !grant {
        // Denied is terminal; free the pair slot for a fresh request
        env.storage()
            .persistent()
            .remove(&storage_key_open(&patient, &consent.hospital));
    }

    let (kind, title, message) = if grant {
        (
            NotificationKind::ConsentGranted,
            "Consent Granted",
            "Patient granted your access request",
        )
    } else {
        (
            NotificationKind::ConsentDenied,
            "Consent Denied",
            "Patient denied your access request",
        )
    };
    notify::push(
        env,
        &consent.hospital,
        kind,
        String::from_str(env, title),
        String::from_str(env, message),
        Some(consent_id),
    );

    Ok(())
}

pub fn revoke_consent(env: &Env, hospital: Address, consent_id: u64) -> Result<(), AccessError> {
    hospital.require_auth();

    let mut consent = get_consent(env, consent_id)?;

    if consent.hospital != hospital {
        return Err(AccessError::ConsentNotFound);
    }

    if consent.status != ConsentStatus::Granted {
        return Err(AccessError::ConsentNotGranted);
    }

    consent.status = ConsentStatus::Revoked;
    consent.revoked_at = Some(env.ledger().timestamp());

    env.storage()
        .persistent()
        .set(&storage_key_consent(consent_id), &consent);
    env.storage()
        .persistent()
        .remove(&storage_key_open(&consent.patient, &hospital));

    notify::push(
        env,
        &consent.patient,
        NotificationKind::ConsentRevoked,
        String::from_str(env, "Access Revoked"),
        String::from_str(env, "A hospital has revoked its access to your medical records"),
        Some(consent_id),
    );

    Ok(())
}

pub fn get_consent(env: &Env, consent_id: u64) -> Result<Consent, AccessError> {
    env.storage()
        .persistent()
        .get(&storage_key_consent(consent_id))
        .ok_or(AccessError::ConsentNotFound)
}

/// All consents requested by a hospital, newest request first
pub fn get_hospital_consents(env: &Env, hospital: &Address) -> Vec<Consent> {
    collect(env, &storage_key_hospital_index(hospital), None)
}

/// Currently granted consents for a hospital, newest request first
pub fn get_hospital_granted(env: &Env, hospital: &Address) -> Vec<Consent> {
    collect(
        env,
        &storage_key_hospital_index(hospital),
        Some(ConsentStatus::Granted),
    )
}

/// All consents referencing a patient, newest request first
pub fn get_patient_consents(env: &Env, patient: &Address) -> Vec<Consent> {
    collect(env, &storage_key_patient_index(patient), None)
}

/// True when the pair's slot points at a granted consent
pub fn has_granted(env: &Env, patient: &Address, hospital: &Address) -> bool {
    let consent_id: Option<u64> = env
        .storage()
        .persistent()
        .get(&storage_key_open(patient, hospital));

    match consent_id {
        Some(id) => match get_consent(env, id) {
            Ok(consent) => consent.status == ConsentStatus::Granted,
            Err(_) => false,
        },
        None => false,
    }
}

fn collect(
    env: &Env,
    index_key: &(Symbol, Address),
    status: Option<ConsentStatus>,
) -> Vec<Consent> {
    let consent_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));

    let mut consents = Vec::new(env);
    for i in 0..consent_ids.len() {
        let consent_id = consent_ids.get(i).unwrap();
        if let Ok(consent) = get_consent(env, consent_id) {
            let keep = match &status {
                Some(wanted) => consent.status == *wanted,
                None => true,
            };
            if keep {
                consents.push_back(consent);
            }
        }
    }

    consents
}

fn add_to_index(env: &Env, index_key: &(Symbol, Address), consent_id: u64) {
    let mut consent_ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(index_key)
        .unwrap_or_else(|| Vec::new(env));
    // Newest first
    consent_ids.push_front(consent_id);
    env.storage().persistent().set(index_key, &consent_ids);
}

fn get_next_consent_id(env: &Env) -> u64 {
    let current_id: u64 = env.storage().instance().get(&NEXT_CONSENT_ID).unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_CONSENT_ID, &(current_id + 1));
    current_id
}

fn storage_key_consent(consent_id: u64) -> (Symbol, u64) {
    (CONSENTS, consent_id)
}

fn storage_key_open(patient: &Address, hospital: &Address) -> (Symbol, Address, Address) {
    (OPEN_CONSENT, patient.clone(), hospital.clone())
}

fn storage_key_hospital_index(hospital: &Address) -> (Symbol, Address) {
    (HOSPITAL_CONSENTS, hospital.clone())
}

fn storage_key_patient_index(patient: &Address) -> (Symbol, Address) {
    (PATIENT_CONSENTS, patient.clone())
}
