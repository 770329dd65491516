use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::AccessError;
use crate::users::{self, Role};

/// A hospital stay. Access granted through an admission lasts exactly as
/// long as the admission is active; discharge is terminal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Admission {
    pub id: u64,
    pub patient: Address,
    pub hospital: Address,
    pub patient_name: String,
    pub admitted_at: u64,
    pub discharged_at: Option<u64>,
    pub is_active: bool,
    pub notes: String,
}

// Storage keys
const ADMISSIONS: Symbol = symbol_short!("ADMITS");
// One active admission per (patient, hospital) pair; the slot is removed on
// discharge so its presence means "currently admitted".
const ACTIVE_ADMISSION: Symbol = symbol_short!("ADM_OPEN");
const HOSPITAL_ADMISSIONS: Symbol = symbol_short!("ADM_HOSP");
const NEXT_ADMISSION_ID: Symbol = symbol_short!("NEXT_AID");

pub fn admit_patient(
    env: &Env,
    hospital: Address,
    patient: Address,
    patient_name: String,
    notes: String,
) -> Result<u64, AccessError> {
    hospital.require_auth();

    users::require_role(env, &hospital, Role::Hospital)?;
    users::require_role(env, &patient, Role::Patient)?;

    let slot = storage_key_active(&patient, &hospital);
    if env.storage().persistent().has(&slot) {
        return Err(AccessError::AlreadyAdmitted);
    }

    let admission_id = get_next_admission_id(env);
    let admission = Admission {
        id: admission_id,
        patient: patient.clone(),
        hospital: hospital.clone(),
        patient_name,
        admitted_at: env.ledger().timestamp(),
        discharged_at: None,
        is_active: true,
        notes,
    };

    env.storage()
        .persistent()
        .set(&storage_key_admission(admission_id), &admission);
    env.storage().persistent().set(&slot, &admission_id);

    let mut admission_ids = get_hospital_index(env, &hospital);
    admission_ids.push_front(admission_id);
    env.storage()
        .persistent()
        .set(&storage_key_hospital_index(&hospital), &admission_ids);

    Ok(admission_id)
}

pub fn discharge_patient(
    env: &Env,
    hospital: Address,
    admission_id: u64,
) -> Result<(), AccessError> {
    hospital.require_auth();

    let mut admission = get_admission(env, admission_id)?;

    if admission.hospital != hospital {
        return Err(AccessError::AdmissionNotFound);
    }

    if !admission.is_active {
        return Err(AccessError::AlreadyDischarged);
    }

    admission.is_active = false;
    admission.discharged_at = Some(env.ledger().timestamp());

    env.storage()
        .persistent()
        .set(&storage_key_admission(admission_id), &admission);
    env.storage()
        .persistent()
        .remove(&storage_key_active(&admission.patient, &hospital));

    Ok(())
}

pub fn get_admission(env: &Env, admission_id: u64) -> Result<Admission, AccessError> {
    env.storage()
        .persistent()
        .get(&storage_key_admission(admission_id))
        .ok_or(AccessError::AdmissionNotFound)
}

/// Admissions created by a hospital, newest first
pub fn get_hospital_admissions(env: &Env, hospital: &Address, active_only: bool) -> Vec<Admission> {
    let admission_ids = get_hospital_index(env, hospital);

    let mut admissions = Vec::new(env);
    for i in 0..admission_ids.len() {
        let admission_id = admission_ids.get(i).unwrap();
        if let Ok(admission) = get_admission(env, admission_id) {
            if !active_only || admission.is_active {
                admissions.push_back(admission);
            }
        }
    }

    admissions
}

pub fn has_active_admission(env: &Env, patient: &Address, hospital: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&storage_key_active(patient, hospital))
}

fn get_hospital_index(env: &Env, hospital: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&storage_key_hospital_index(hospital))
        .unwrap_or_else(|| Vec::new(env))
}

fn get_next_admission_id(env: &Env) -> u64 {
    let current_id: u64 = env
        .storage()
        .instance()
        .get(&NEXT_ADMISSION_ID)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&NEXT_ADMISSION_ID, &(current_id + 1));
    current_id
}

fn storage_key_admission(admission_id: u64) -> (Symbol, u64) {
    (ADMISSIONS, admission_id)
}

fn storage_key_active(patient: &Address, hospital: &Address) -> (Symbol, Address, Address) {
    (ACTIVE_ADMISSION, patient.clone(), hospital.clone())
}

fn storage_key_hospital_index(hospital: &Address) -> (Symbol, Address) {
    (HOSPITAL_ADMISSIONS, hospital.clone())
}
